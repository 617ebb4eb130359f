use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture dimensions must be non-zero (got {width}x{height})")]
    ZeroExtent { width: u32, height: u32 },

    #[error("{width}x{height} exceeds the device limit of {limit} texels per side")]
    TooLarge { width: u32, height: u32, limit: u32 },

    #[error("pixel buffer holds {actual} bytes; {width}x{height} RGBA8 needs {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("texture read-back failed: {0}")]
    ReadBack(String),
}
