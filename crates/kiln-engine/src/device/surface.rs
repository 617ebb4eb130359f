use winit::dpi::PhysicalSize;

use super::{AcquireError, SurfaceErrorAction};

/// Drawable size of the surface in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// wgpu rejects 0-sized surface configurations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<PhysicalSize<u32>> for SurfaceSize {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Picks the swapchain format.
///
/// Order: `preferred` when listed, then the normalized 8-bit formats, then
/// whatever the surface lists first.
pub fn choose_surface_format(
    available: &[wgpu::TextureFormat],
    preferred: wgpu::TextureFormat,
) -> Option<wgpu::TextureFormat> {
    if available.is_empty() {
        return None;
    }

    let fallbacks = [
        preferred,
        wgpu::TextureFormat::Bgra8Unorm,
        wgpu::TextureFormat::Rgba8Unorm,
    ];
    for f in fallbacks {
        if available.contains(&f) {
            return Some(f);
        }
    }

    Some(available[0])
}

pub fn choose_alpha_mode(
    available: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| available.contains(m))
        .or_else(|| available.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Builds the render-attachment configuration used for every (re)configure.
pub fn surface_config(
    format: wgpu::TextureFormat,
    size: SurfaceSize,
    present_mode: wgpu::PresentMode,
    alpha_mode: wgpu::CompositeAlphaMode,
    desired_maximum_frame_latency: u32,
) -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency,
    }
}

/// Acquired surface image and whether it no longer matches the surface.
pub struct AcquiredTexture {
    pub texture: wgpu::SurfaceTexture,
    /// Present it, then reconfigure.
    pub suboptimal: bool,
}

/// Splits wgpu's acquisition result into an image or a typed failure.
pub fn split_current_texture(
    current: wgpu::CurrentSurfaceTexture,
) -> Result<AcquiredTexture, AcquireError> {
    use wgpu::CurrentSurfaceTexture as C;

    match current {
        C::Success(texture) => Ok(AcquiredTexture {
            texture,
            suboptimal: false,
        }),
        C::Suboptimal(texture) => Ok(AcquiredTexture {
            texture,
            suboptimal: true,
        }),
        C::Timeout => Err(AcquireError::Timeout),
        C::Occluded => Err(AcquireError::Occluded),
        C::Outdated => Err(AcquireError::Outdated),
        C::Lost => Err(AcquireError::Lost),
        C::Validation => Err(AcquireError::Validation),
    }
}

/// Maps a surface acquisition error to the action the frame loop takes.
///
/// Validation failures repeat every frame once they occur, so they end the
/// loop instead of being retried.
pub fn classify_surface_error(err: &AcquireError) -> SurfaceErrorAction {
    match err {
        AcquireError::Lost | AcquireError::Outdated => SurfaceErrorAction::Reconfigured,
        AcquireError::Timeout | AcquireError::Unconfigured => SurfaceErrorAction::SkipFrame,
        AcquireError::Occluded => SurfaceErrorAction::Occluded,
        AcquireError::Validation => SurfaceErrorAction::Fatal,
    }
}
