//! The per-frame orchestrator. Owns the GPU context, the depth target, both
//! pipelines and the live input buffers, and encodes the compute pass and
//! the render pass for every frame.

pub mod context;
pub mod pipelines;
pub mod targets;

use self::{
    context::GfxContext,
    pipelines::{
        backdrop::{BackdropKernel, WORKGROUP_SIZE},
        mesh::MeshPipeline,
    },
    targets::Targets,
};
use crate::{
    data::{mesh::MeshGpu, types::Uniforms},
    error::ViewerError,
    input::FrameSnapshot,
    scene,
};
use std::sync::Arc;
use winit::window::Window;

/// Workgroup grid covering the surface at 8x8 threads per group.
///
/// Integer division: a right/bottom strip narrower than one group stays
/// unpainted on surfaces whose dimensions are not multiples of eight.
/// Accepted truncation, not an error.
pub fn dispatch_extent(width: u32, height: u32) -> (u32, u32, u32) {
    (width / WORKGROUP_SIZE, height / WORKGROUP_SIZE, 1)
}

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: Targets,
    pub backdrop: BackdropKernel,
    pub mesh_pipeline: MeshPipeline,

    // Live buffers: allocated once, rewritten through the queue every frame.
    uniform_buf: wgpu::Buffer,
    timer_buf: wgpu::Buffer,
    pointer_buf: wgpu::Buffer,
    orientation_buf: wgpu::Buffer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Result<Self, ViewerError> {
        let gfx = GfxContext::new(window).await?;
        let size = gfx.size;

        let targets = Targets::new(&gfx.device, size);
        let mesh_pipeline = MeshPipeline::new(&gfx.device, gfx.config.format, targets.depth_fmt);
        let backdrop = BackdropKernel::new(&gfx.device, gfx.config.format);

        let live_buffer = |label, size| {
            gfx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let uniform_buf = live_buffer("Transform UBO", std::mem::size_of::<Uniforms>() as u64);
        let timer_buf = live_buffer("Timer UBO", 4);
        let pointer_buf = live_buffer("Pointer UBO", 8);
        let orientation_buf = live_buffer("Orientation UBO", 12);

        Ok(Self {
            gfx,
            targets,
            backdrop,
            mesh_pipeline,
            uniform_buf,
            timer_buf,
            pointer_buf,
            orientation_buf,
        })
    }

    /// The shared transform uniform buffer; mesh bind groups are built
    /// against it at upload time.
    pub fn uniform_buffer(&self) -> &wgpu::Buffer {
        &self.uniform_buf
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.targets.resize(&self.gfx.device, new_size);
        }
    }

    /// Produces the GPU work for one frame: rewrites the uniform and live
    /// buffers from the snapshot, then encodes the compute dispatch and the
    /// mesh pass into a single command buffer. The caller acquires and
    /// presents the surface texture; this type never owns it.
    pub fn render_frame(
        &mut self,
        swap_view: &wgpu::TextureView,
        mesh: &MeshGpu,
        snapshot: &FrameSnapshot,
    ) -> Result<(), ViewerError> {
        // Step 1: frame uniform + live inputs. `write_buffer` stages the
        // copy and orders it with this frame's submission, so rewriting the
        // same buffers every frame cannot race the previous frame's reads.
        let aspect = self.gfx.config.width as f32 / self.gfx.config.height.max(1) as f32;
        let mvp = scene::build_mvp(snapshot, aspect)?;
        let uniforms = Uniforms {
            model_view_proj: (scene::OPENGL_TO_WGPU_MATRIX * mvp).to_cols_array_2d(),
        };
        self.gfx
            .queue
            .write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&uniforms));
        self.gfx
            .queue
            .write_buffer(&self.timer_buf, 0, bytemuck::bytes_of(&snapshot.timer));
        self.gfx
            .queue
            .write_buffer(&self.pointer_buf, 0, bytemuck::cast_slice(&snapshot.pointer));
        self.gfx.queue.write_buffer(
            &self.orientation_buf,
            0,
            bytemuck::cast_slice(&snapshot.orientation),
        );

        let bind = self.backdrop.bind(
            &self.gfx.device,
            swap_view,
            &self.timer_buf,
            &self.pointer_buf,
            &self.orientation_buf,
        );

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Pass 1: the kernel paints the whole surface.
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Backdrop Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.backdrop.pipeline);
            pass.set_bind_group(0, &bind, &[]);
            let (x, y, z) = dispatch_extent(self.gfx.config.width, self.gfx.config.height);
            pass.dispatch_workgroups(x, y, z);
        }

        // Pass 2: mesh on top. The color attachment loads what the compute
        // pass wrote instead of clearing it. Recording both passes into one
        // command buffer is what orders the draw after the dispatch; wgpu
        // inserts the storage-write -> attachment barrier between them.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Discard,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.mesh_pipeline.draw(&mut pass, mesh);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_grid_covers_an_aligned_surface_exactly() {
        assert_eq!(dispatch_extent(1024, 768), (128, 96, 1));
    }

    #[test]
    fn dispatch_grid_truncates_unaligned_surfaces() {
        // 1000 = 125 * 8, 700 = 87 * 8 + 4: the last 4 rows stay unpainted.
        assert_eq!(dispatch_extent(1000, 700), (125, 87, 1));
        assert_eq!(dispatch_extent(7, 7), (0, 0, 1));
    }
}
