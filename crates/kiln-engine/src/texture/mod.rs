//! Static RGBA8 texture upload.
//!
//! A [`StaticTexture`] is written once at construction and never changes.
//! It exists so the overlay has a real GPU texture to display.

mod error;
mod extent;
mod static_texture;

pub use error::TextureError;
pub use extent::{padded_bytes_per_row, solid_rgba8, validate_rgba8, Extent2d, BYTES_PER_PIXEL};
pub use static_texture::StaticTexture;
