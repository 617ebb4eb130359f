use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl};
use crate::device::{Gpu, GpuInit, SurfaceSize};
use crate::frame::{ClearColor, FramePhase, FrameRenderer, Overlay, ResizeQueue, TickOutcome};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub clear_color: ClearColor,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "kiln".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            clear_color: ClearColor::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and renders into it until it is closed.
    ///
    /// Returns the first fatal error hit during startup or rendering.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Everything that exists while the window is open.
///
/// The renderer owns the GPU context, which holds its own window handle;
/// `window` is the last reference released.
struct Session<O: Overlay<Gpu>> {
    renderer: FrameRenderer<Gpu, O>,
    resizes: ResizeQueue,
    window: Arc<Window>,
}

struct AppState<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    session: Option<Session<A::Overlay>>,
    fatal: Option<anyhow::Error>,
    started: bool,
}

impl<A: App> AppState<A> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            session: None,
            fatal: None,
            started: false,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Session<A::Overlay>> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let mut gpu = Gpu::new(Arc::clone(&window), self.gpu_init.clone())
            .context("GPU initialization failed")?;
        gpu.configure(SurfaceSize::from(window.inner_size()));

        let overlay = self.app.init(&gpu).context("application init failed")?;

        let renderer = FrameRenderer::new(gpu, overlay, self.config.clear_color);
        let resizes = renderer.resize_queue();

        window.request_redraw();

        Ok(Session {
            renderer,
            resizes,
            window,
        })
    }

    /// Tears the session down and stops the loop. Safe to call repeatedly.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut session) = self.session.take() {
            session.renderer.shutdown();
            drop(session);
            log::info!("window closed");
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.shutdown(event_loop);
    }
}

impl<A: App> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Desktop platforms resume once; later resumes keep the session.
        if self.started {
            return;
        }
        self.started = true;

        match self.start(event_loop) {
            Ok(session) => self.session = Some(session),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the present mode paces the loop.
        if let Some(session) = &self.session {
            session.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.window.id() != window_id {
            return;
        }

        let consumed = session
            .renderer
            .overlay_mut()
            .is_some_and(|overlay| overlay.on_window_event(&event));

        // Input the overlay used (a click on a window, typing into a field)
        // is not forwarded to the app.
        if !consumed && self.app.on_window_event(&event) == AppControl::Exit {
            self.shutdown(event_loop);
            return;
        }

        if let Some(size) = queued_size(&event) {
            session.resizes.push(size);
            session.window.request_redraw();
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::RedrawRequested => {
                let outcome = session.renderer.tick();
                match outcome.phase() {
                    // A reconfiguration tick draws nothing; draw right after.
                    FramePhase::ResizePending => session.window.request_redraw(),
                    _ if outcome == TickOutcome::Fatal => self.fail(
                        event_loop,
                        anyhow!("surface acquisition failed with an unrecoverable error"),
                    ),
                    _ => {}
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.shutdown(event_loop);
    }
}

/// Size to queue for the next tick, if `event` changes the drawable size.
///
/// Only `Resized` carries the final size. `ScaleFactorChanged` is always
/// followed by a `Resized` with the new physical size, so it queues nothing.
fn queued_size(event: &WindowEvent) -> Option<SurfaceSize> {
    match event {
        WindowEvent::Resized(size) => Some(SurfaceSize::from(*size)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn resized_queues_its_physical_size() {
        let event = WindowEvent::Resized(PhysicalSize::new(400, 300));
        assert_eq!(queued_size(&event), Some(SurfaceSize::new(400, 300)));
    }

    #[test]
    fn other_events_queue_nothing() {
        for event in [
            WindowEvent::Focused(true),
            WindowEvent::CloseRequested,
            WindowEvent::RedrawRequested,
        ] {
            assert_eq!(queued_size(&event), None);
        }
    }
}
