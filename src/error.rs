//! Startup failures of the render host
//!
//! Everything here is fatal: the host logs the error and stops instead of retrying.

/// Errors raised while bringing up the browser page and the GPU
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("no canvas element with id '{0}'")]
    NoCanvas(String),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("surface reports no supported {0}")]
    NoSurfaceFormat(&'static str),
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("failed to register '{0}' listener")]
    Listener(&'static str),
}
