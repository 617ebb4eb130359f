//! Frame timing.
//!
//! One `FrameClock` per render loop; the frame renderer ticks it once per
//! presented frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
