use thiserror::Error;

/// Everything that can go wrong between startup and a presented frame.
///
/// The first three variants are startup-only and fatal: without a capable
/// device there is nothing to recover to. The rest abort a single frame;
/// the caller skips it and keeps the loop running.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("no GPU adapter compatible with the window surface")]
    DeviceUnavailable,

    #[error("GPU adapter is missing required features: {0:?}")]
    MissingFeatures(wgpu::Features),

    #[error("surface does not support the {0:?} pixel format")]
    UnsupportedSurfaceFormat(wgpu::TextureFormat),

    #[error("failed to create the window surface")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("GPU device request failed")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// A resource the current frame needs is not loaded (yet).
    #[error("required resource is not loaded: {0}")]
    ResourceMissing(&'static str),

    /// The frame's transform could not be built; the frame is skipped.
    #[error(transparent)]
    DegenerateTransform(#[from] xform::XformError),

    /// The swapchain did not hand out a texture this frame.
    #[error("could not acquire the next surface texture")]
    SurfaceAcquire(#[from] wgpu::SurfaceError),
}
