use thiserror::Error;

/// High-level response after a failed surface acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Window is occluded or minimized; nothing to draw until it is visible.
    Occluded,
    /// Unrecoverable; the loop ends.
    Fatal,
}

/// Why no surface image was handed out this tick.
///
/// Mirrors the failure cases of `wgpu::CurrentSurfaceTexture`, plus
/// `Unconfigured` for acquisitions attempted before `configure`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum AcquireError {
    #[error("timed out waiting for the next surface image")]
    Timeout,

    #[error("window is occluded")]
    Occluded,

    #[error("surface configuration is outdated")]
    Outdated,

    #[error("surface was lost")]
    Lost,

    #[error("validation error while acquiring the surface image")]
    Validation,

    #[error("surface is not configured")]
    Unconfigured,
}

/// Failures of the graphics context bootstrap.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("window has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("failed to create wgpu surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find a suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create wgpu device/queue: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats for this adapter")]
    NoSurfaceFormat,
}
