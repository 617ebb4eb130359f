//! Kiln engine crate.
//!
//! Window, GPU context, static texture upload and the egui overlay frame
//! loop, plus a headless compute probe.

pub mod compute;
pub mod core;
pub mod device;
pub mod frame;
pub mod logging;
pub mod overlay;
pub mod texture;
pub mod time;
pub mod window;
