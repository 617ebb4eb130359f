use winit::event::WindowEvent;

use crate::device::Gpu;
use crate::frame::Overlay;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by binaries.
pub trait App {
    /// Overlay drawn on top of every frame.
    type Overlay: Overlay<Gpu>;

    /// Called once after the window and GPU context exist and the surface is
    /// configured. Static resources are created here.
    fn init(&mut self, gpu: &Gpu) -> anyhow::Result<Self::Overlay>;

    /// Called for window events after the overlay has seen them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }
}
