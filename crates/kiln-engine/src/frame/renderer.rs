use crate::device::{SurfaceErrorAction, SurfaceSize};
use crate::time::{FrameClock, FrameTime};

use super::{ClearColor, Overlay, ResizeQueue, SurfaceTarget};

/// Path a tick took. Every tick starts and ends `Idle`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FramePhase {
    /// Nothing to do: minimized, occluded or shut down.
    Idle,
    /// Draining a queued resize and reconfiguring the surface.
    ResizePending,
    /// Building, recording and presenting a frame.
    RenderReady,
}

/// Result of one [`FrameRenderer::tick`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    /// A frame was submitted and presented.
    Rendered,
    /// The surface was reconfigured at this size; nothing was drawn.
    Reconfigured(SurfaceSize),
    /// The surface has a zero dimension or the window is occluded.
    Minimized,
    /// Surface acquisition failed with a recoverable error.
    Skipped(SurfaceErrorAction),
    /// Surface acquisition failed with an unrecoverable error.
    Fatal,
    /// `shutdown` already ran.
    ShutDown,
}

impl TickOutcome {
    pub fn phase(self) -> FramePhase {
        match self {
            TickOutcome::Reconfigured(_) => FramePhase::ResizePending,
            TickOutcome::Rendered | TickOutcome::Skipped(_) | TickOutcome::Fatal => {
                FramePhase::RenderReady
            }
            TickOutcome::Minimized | TickOutcome::ShutDown => FramePhase::Idle,
        }
    }
}

/// Per-tick data handed to the overlay.
#[derive(Debug, Copy, Clone)]
pub struct FrameInfo {
    pub time: FrameTime,
    pub size: SurfaceSize,
    pub reconfigurations: u64,
}

/// Drives one surface and one overlay, a tick at a time.
///
/// A tick either reconfigures (when a resize was queued) or renders, never
/// both, so the surface always matches the window before a pass begins.
pub struct FrameRenderer<T, O>
where
    T: SurfaceTarget,
    O: Overlay<T>,
{
    overlay: Option<O>,
    target: T,
    resizes: ResizeQueue,
    clock: FrameClock,
    clear: ClearColor,
    reconfigurations: u64,
    shut_down: bool,
}

impl<T, O> FrameRenderer<T, O>
where
    T: SurfaceTarget,
    O: Overlay<T>,
{
    /// Takes ownership of an already configured target and its overlay.
    pub fn new(target: T, overlay: O, clear: ClearColor) -> Self {
        Self {
            overlay: Some(overlay),
            target,
            resizes: ResizeQueue::new(),
            clock: FrameClock::new(),
            clear,
            reconfigurations: 0,
            shut_down: false,
        }
    }

    /// Handle for the event side; pushing into it never touches the GPU.
    pub fn resize_queue(&self) -> ResizeQueue {
        self.resizes.clone()
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn overlay_mut(&mut self) -> Option<&mut O> {
        self.overlay.as_mut()
    }

    pub fn reconfigurations(&self) -> u64 {
        self.reconfigurations
    }

    /// Frames submitted and presented; skipped acquisitions are not counted.
    pub fn frames_rendered(&self) -> u64 {
        self.clock.frames()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Runs one tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.shut_down {
            return TickOutcome::ShutDown;
        }

        if let Some(size) = self.resizes.drain_latest() {
            self.reconfigure(size);
            return TickOutcome::Reconfigured(size);
        }

        if self.target.size().is_empty() {
            return TickOutcome::Minimized;
        }

        self.render()
    }

    fn reconfigure(&mut self, size: SurfaceSize) {
        self.target.unconfigure();
        self.target.configure(size);
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.resize(size);
        }

        self.clock.reset();
        self.reconfigurations += 1;
        log::info!("surface reconfigured to {}x{}", size.width, size.height);
    }

    fn render(&mut self) -> TickOutcome {
        let Some(overlay) = self.overlay.as_mut() else {
            return TickOutcome::ShutDown;
        };

        let info = FrameInfo {
            time: self.clock.sample(),
            size: self.target.size(),
            reconfigurations: self.reconfigurations,
        };
        overlay.build(&info);

        let mut frame = match self.target.acquire() {
            Ok(frame) => frame,
            Err(err) => {
                return match self.target.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => TickOutcome::Fatal,
                    SurfaceErrorAction::Occluded => TickOutcome::Minimized,
                    action => TickOutcome::Skipped(action),
                };
            }
        };

        overlay.prepare(&self.target, T::encoder(&mut frame));

        // Pass scope: ends before the encoder is finished in `submit`.
        {
            let mut pass = self.target.begin_pass(&mut frame, self.clear.premultiplied());
            overlay.paint(&mut pass);
        }

        self.target.submit(frame);
        self.clock.advance(&info.time);
        TickOutcome::Rendered
    }

    /// Unconfigures the surface, then shuts the overlay down and drops it.
    ///
    /// Returns `false` when teardown already ran; nothing is released twice.
    pub fn shutdown(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        self.shut_down = true;

        self.target.unconfigure();
        if let Some(mut overlay) = self.overlay.take() {
            overlay.shutdown();
        }

        log::debug!("frame renderer shut down after {} frames", self.clock.frames());
        true
    }
}

impl<T, O> Drop for FrameRenderer<T, O>
where
    T: SurfaceTarget,
    O: Overlay<T>,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
