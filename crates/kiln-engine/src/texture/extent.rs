use super::TextureError;

/// Bytes per RGBA8 texel.
pub const BYTES_PER_PIXEL: u32 = 4;

/// Width and height of a 2D texture in texels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Extent2d {
    pub width: u32,
    pub height: u32,
}

impl Extent2d {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Tightly packed row length in bytes.
    #[inline]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * BYTES_PER_PIXEL
    }

    /// Byte length of a tightly packed RGBA8 image, `None` on overflow.
    pub fn byte_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(BYTES_PER_PIXEL as usize)
    }

    pub(super) fn to_wgpu(self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

/// Checks that `data_len` bytes form a valid tightly packed RGBA8 image of
/// `extent` on a device whose 2D textures are capped at `max_dimension`.
pub fn validate_rgba8(
    extent: Extent2d,
    data_len: usize,
    max_dimension: u32,
) -> Result<(), TextureError> {
    let Extent2d { width, height } = extent;

    if width == 0 || height == 0 {
        return Err(TextureError::ZeroExtent { width, height });
    }
    if width > max_dimension || height > max_dimension {
        return Err(TextureError::TooLarge {
            width,
            height,
            limit: max_dimension,
        });
    }

    let expected = extent.byte_len().ok_or(TextureError::TooLarge {
        width,
        height,
        limit: max_dimension,
    })?;
    if data_len != expected {
        return Err(TextureError::SizeMismatch {
            width,
            height,
            expected,
            actual: data_len,
        });
    }

    Ok(())
}

/// Builds a tightly packed buffer filled with one RGBA8 color.
pub fn solid_rgba8(extent: Extent2d, rgba: [u8; 4]) -> Vec<u8> {
    let texels = extent.width as usize * extent.height as usize;
    rgba.repeat(texels)
}

/// Row pitch for texture-to-buffer copies, which wgpu requires to be a
/// multiple of `COPY_BYTES_PER_ROW_ALIGNMENT`.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}
