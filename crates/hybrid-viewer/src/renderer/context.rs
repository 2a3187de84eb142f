use crate::error::ViewerError;
use std::sync::Arc;
use winit::window::Window;

/// Features the viewer cannot run without: compute-shader storage writes
/// into the BGRA8 surface, and the combined 32-float depth + 8-bit stencil
/// target.
pub const REQUIRED_FEATURES: wgpu::Features = wgpu::Features::BGRA8UNORM_STORAGE
    .union(wgpu::Features::DEPTH32FLOAT_STENCIL8);

/// Pixel format of the presentable surface. Fixed: the compute kernel
/// declares the same format on its storage binding.
pub const SURFACE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

/// Holds all device-level GPU state needed for rendering.
pub struct GfxContext {
    pub surface: wgpu::Surface<'static>,
    pub device:  wgpu::Device,
    pub queue:   wgpu::Queue,
    pub config:  wgpu::SurfaceConfiguration,
    pub size:    winit::dpi::PhysicalSize<u32>,
}

impl GfxContext {
    /// Creates a new graphics context bound to the given window.
    ///
    /// This is the one unrecoverable setup step: without an adapter that
    /// can do storage writes to the surface format there is no fallback.
    pub async fn new(window: Arc<Window>) -> Result<Self, ViewerError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        // The surface must outlive the window; `Arc` guarantees this.
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference:       wgpu::PowerPreference::HighPerformance,
                compatible_surface:     Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ViewerError::DeviceUnavailable)?;

        let missing = REQUIRED_FEATURES.difference(adapter.features());
        if !missing.is_empty() {
            return Err(ViewerError::MissingFeatures(missing));
        }

        let caps = surface.get_capabilities(&adapter);
        if !caps.formats.contains(&SURFACE_FORMAT) {
            return Err(ViewerError::UnsupportedSurfaceFormat(SURFACE_FORMAT));
        }

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label:             Some("Device"),
                    required_features: REQUIRED_FEATURES,
                    required_limits:   wgpu::Limits::default(),
                },
                None, // no trace
            )
            .await?;

        // The compute pass writes straight into the swapchain texture, so
        // the surface needs STORAGE_BINDING on top of the usual attachment
        // usage.
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::STORAGE_BINDING,
            format:                        SURFACE_FORMAT,
            width:                         size.width.max(1),
            height:                        size.height.max(1),
            present_mode:                  wgpu::PresentMode::Fifo, // V-sync
            alpha_mode:                    caps.alpha_modes[0],
            view_formats:                  vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    /// Resizes the swap chain when the window size changes.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }
}
