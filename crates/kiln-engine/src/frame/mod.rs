//! Per-tick frame lifecycle.
//!
//! A tick either applies a queued resize or renders one frame:
//! build the overlay, acquire the surface image, clear, paint, submit,
//! present. Every object created for the frame is released before the
//! tick returns.

mod clear;
mod renderer;
mod resize;
mod target;

pub use clear::ClearColor;
pub use renderer::{FrameInfo, FramePhase, FrameRenderer, TickOutcome};
pub use resize::ResizeQueue;
pub use target::{Overlay, SurfaceTarget};
