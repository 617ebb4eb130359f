//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering

mod context;
mod error;
mod frame;
mod init;
pub mod surface;

pub use context::Gpu;
pub(crate) use context::request_device;
pub use error::{AcquireError, GpuError, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use init::GpuInit;
pub use surface::SurfaceSize;
