//! egui overlay.
//!
//! [`EguiOverlay`] bridges winit input into egui, runs the UI content each
//! tick, and draws the tessellated output into the frame's render pass.

mod egui_pass;

pub use egui_pass::{EguiOverlay, OverlayUi};
