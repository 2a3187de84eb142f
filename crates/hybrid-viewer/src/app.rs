use crate::{
    data::mesh::{MeshData, MeshGpu},
    error::ViewerError,
    input::FrameInputs,
    renderer::Renderer,
};
use std::{sync::Arc, time::Instant};
use winit::{event::WindowEvent, window::Window};

pub struct App {
    pub renderer: Renderer,
    inputs: Arc<FrameInputs>,
    mesh: Option<MeshGpu>,
    last_frame: Instant,
}

impl App {
    pub async fn new(window: Arc<Window>) -> Result<Self, ViewerError> {
        let renderer = Renderer::new(window).await?;
        let size = renderer.gfx.size;

        // The pointer starts at a quarter of the surface so the backdrop
        // has a sensible focus before the first cursor event arrives.
        let inputs = Arc::new(FrameInputs::new([
            size.width as f32 / 4.0,
            size.height as f32 / 4.0,
        ]));

        Ok(Self {
            renderer,
            inputs,
            mesh: None,
            last_frame: Instant::now(),
        })
    }

    /// Shared handle into the frame state, for sensor threads and event
    /// callbacks.
    pub fn inputs(&self) -> Arc<FrameInputs> {
        Arc::clone(&self.inputs)
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.renderer.gfx.size
    }

    /// Uploads the built-in demo model.
    pub fn load_demo_model(&mut self) -> Result<(), ViewerError> {
        let data = MeshData::demo_cube();
        let mesh = MeshGpu::upload(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &self.renderer.mesh_pipeline.mesh_layout,
            self.renderer.uniform_buffer(),
            &data,
        )?;
        log::info!(
            "Demo model uploaded: {} vertices, {} indices, {}x{} texture",
            data.vertices.len(),
            data.indices.len(),
            data.texture_size.0,
            data.texture_size.1
        );
        self.mesh = Some(mesh);
        Ok(())
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize(new_size);
    }

    /// Routes window events into the frame state. Returns `true` when the
    /// event is consumed.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.inputs
                    .update_pointer(position.x as f32, position.y as f32);
                true
            }
            WindowEvent::Resized(physical_size) => {
                self.resize(*physical_size);
                true
            }
            _ => false,
        }
    }

    /// Produces one frame: acquires the surface texture, advances the frame
    /// state once, runs compute + render, presents.
    ///
    /// Frame-local failures (no mesh yet, surface not available, degenerate
    /// projection) come back as errors so the caller can skip the frame and
    /// keep the loop alive.
    pub fn render(&mut self) -> Result<(), ViewerError> {
        let mesh = self
            .mesh
            .as_ref()
            .ok_or(ViewerError::ResourceMissing("mesh"))?;

        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let now = Instant::now();
        let delta_seconds = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        let snapshot = self.inputs.advance_frame(delta_seconds);

        self.renderer.render_frame(&swap_view, mesh, &snapshot)?;
        frame.present();
        Ok(())
    }
}
