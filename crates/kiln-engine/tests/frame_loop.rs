//! Frame loop behavior against a recording surface and overlay.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kiln_engine::device::surface::classify_surface_error;
use kiln_engine::device::{AcquireError, SurfaceErrorAction, SurfaceSize};
use kiln_engine::frame::{
    ClearColor, FrameInfo, FramePhase, FrameRenderer, Overlay, SurfaceTarget, TickOutcome,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Configure(SurfaceSize),
    Unconfigure,
    Acquire,
    BeginPass(wgpu::Color),
    Submit,
    Build { size: SurfaceSize, frame_index: u64 },
    Prepare,
    Paint,
    OverlayResize(SurfaceSize),
    OverlayShutdown,
}

/// Shared between the mocks and the test body.
#[derive(Clone, Default)]
struct Recorder {
    events: Rc<RefCell<Vec<Event>>>,
    live: Rc<Cell<i64>>,
}

impl Recorder {
    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    /// Events recorded since the last call.
    fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn guard(&self) -> LiveGuard {
        self.live.set(self.live.get() + 1);
        LiveGuard(Rc::clone(&self.live))
    }

    fn live(&self) -> i64 {
        self.live.get()
    }
}

/// Counts per-tick objects that are still alive.
struct LiveGuard(Rc<Cell<i64>>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

struct MockFrame {
    encoder: MockEncoder,
    _guard: LiveGuard,
}

struct MockEncoder {
    _guard: LiveGuard,
}

struct MockPass {
    _guard: LiveGuard,
}

struct MockTarget {
    rec: Recorder,
    size: SurfaceSize,
    configured: bool,
    fail_next: Option<AcquireError>,
}

impl MockTarget {
    /// A target that is already configured at `size`, as the runtime hands it over.
    fn configured(rec: &Recorder, size: SurfaceSize) -> Self {
        Self {
            rec: rec.clone(),
            size,
            configured: true,
            fail_next: None,
        }
    }
}

impl SurfaceTarget for MockTarget {
    type Frame = MockFrame;
    type Encoder = MockEncoder;
    type Pass = MockPass;

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn configure(&mut self, size: SurfaceSize) {
        self.rec.push(Event::Configure(size));
        self.size = size;
        self.configured = !size.is_empty();
    }

    fn unconfigure(&mut self) {
        self.rec.push(Event::Unconfigure);
        self.configured = false;
    }

    fn acquire(&mut self) -> Result<MockFrame, AcquireError> {
        self.rec.push(Event::Acquire);
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        assert!(self.configured, "acquire on an unconfigured surface");
        Ok(MockFrame {
            encoder: MockEncoder {
                _guard: self.rec.guard(),
            },
            _guard: self.rec.guard(),
        })
    }

    fn encoder(frame: &mut MockFrame) -> &mut MockEncoder {
        &mut frame.encoder
    }

    fn begin_pass(&self, _frame: &mut MockFrame, clear: wgpu::Color) -> MockPass {
        self.rec.push(Event::BeginPass(clear));
        MockPass {
            _guard: self.rec.guard(),
        }
    }

    fn submit(&mut self, frame: MockFrame) {
        // The pass must already be gone when the encoder is finished.
        assert_eq!(self.rec.live(), 2, "only the frame and encoder may be live at submit");
        self.rec.push(Event::Submit);
        drop(frame);
    }

    fn handle_surface_error(&mut self, err: AcquireError) -> SurfaceErrorAction {
        classify_surface_error(&err)
    }
}

struct MockOverlay {
    rec: Recorder,
}

impl Overlay<MockTarget> for MockOverlay {
    fn build(&mut self, info: &FrameInfo) {
        self.rec.push(Event::Build {
            size: info.size,
            frame_index: info.time.frame_index,
        });
    }

    fn prepare(&mut self, _target: &MockTarget, _encoder: &mut MockEncoder) {
        self.rec.push(Event::Prepare);
    }

    fn paint(&mut self, _pass: &mut MockPass) {
        self.rec.push(Event::Paint);
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.rec.push(Event::OverlayResize(size));
    }

    fn shutdown(&mut self) {
        self.rec.push(Event::OverlayShutdown);
    }
}

fn renderer_at(
    rec: &Recorder,
    width: u32,
    height: u32,
) -> FrameRenderer<MockTarget, MockOverlay> {
    FrameRenderer::new(
        MockTarget::configured(rec, SurfaceSize::new(width, height)),
        MockOverlay { rec: rec.clone() },
        ClearColor::default(),
    )
}

fn count(events: &[Event], pred: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[test]
fn render_tick_follows_build_acquire_prepare_paint_submit() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);

    assert_eq!(renderer.tick(), TickOutcome::Rendered);

    let clear = ClearColor::default().premultiplied();
    assert_eq!(
        rec.take(),
        vec![
            Event::Build {
                size: SurfaceSize::new(800, 600),
                frame_index: 0
            },
            Event::Acquire,
            Event::Prepare,
            Event::BeginPass(clear),
            Event::Paint,
            Event::Submit,
        ]
    );
    assert_eq!(TickOutcome::Rendered.phase(), FramePhase::RenderReady);
}

#[test]
fn consecutive_ticks_submit_once_each_and_leave_nothing_live() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);

    for i in 0..5 {
        assert_eq!(renderer.tick(), TickOutcome::Rendered);
        let events = rec.take();
        assert_eq!(count(&events, |e| *e == Event::Submit), 1, "tick {i}");
        assert_eq!(count(&events, |e| *e == Event::Acquire), 1, "tick {i}");
        assert_eq!(rec.live(), 0, "tick {i} leaked a per-frame object");
    }

    assert_eq!(renderer.frames_rendered(), 5);
}

#[test]
fn resize_tick_reconfigures_once_and_draws_nothing() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);
    let size = SurfaceSize::new(1024, 768);

    renderer.resize_queue().push(size);
    assert_eq!(renderer.tick(), TickOutcome::Reconfigured(size));

    assert_eq!(
        rec.take(),
        vec![
            Event::Unconfigure,
            Event::Configure(size),
            Event::OverlayResize(size),
        ]
    );
    assert_eq!(renderer.reconfigurations(), 1);
    assert_eq!(renderer.target().size(), size);
    assert_eq!(rec.live(), 0);
}

#[test]
fn latest_queued_size_wins() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);
    let queue = renderer.resize_queue();

    queue.push(SurfaceSize::new(640, 480));
    queue.push(SurfaceSize::new(700, 500));
    queue.push(SurfaceSize::new(320, 200));

    assert_eq!(
        renderer.tick(),
        TickOutcome::Reconfigured(SurfaceSize::new(320, 200))
    );
    let events = rec.take();
    assert_eq!(count(&events, |e| matches!(e, Event::Configure(_))), 1);
    assert!(queue.is_empty());
}

#[test]
fn resize_between_ticks_end_to_end() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);

    // Tick N at the initial size.
    assert_eq!(renderer.tick(), TickOutcome::Rendered);
    assert!(rec.take().contains(&Event::Build {
        size: SurfaceSize::new(800, 600),
        frame_index: 0
    }));

    renderer.resize_queue().push(SurfaceSize::new(400, 300));

    // Tick N+1 only reconfigures.
    assert_eq!(
        renderer.tick(),
        TickOutcome::Reconfigured(SurfaceSize::new(400, 300))
    );
    let events = rec.take();
    assert!(!events.iter().any(|e| matches!(e, Event::Build { .. })));
    assert!(!events.contains(&Event::Submit));

    // Tick N+2 renders at the new size.
    assert_eq!(renderer.tick(), TickOutcome::Rendered);
    let events = rec.take();
    assert!(events.contains(&Event::Build {
        size: SurfaceSize::new(400, 300),
        frame_index: 1
    }));
    assert_eq!(count(&events, |e| *e == Event::Submit), 1);
}

#[test]
fn zero_size_stays_minimized_until_restored() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);
    let queue = renderer.resize_queue();

    queue.push(SurfaceSize::new(0, 0));
    assert_eq!(
        renderer.tick(),
        TickOutcome::Reconfigured(SurfaceSize::new(0, 0))
    );
    rec.take();

    assert_eq!(renderer.tick(), TickOutcome::Minimized);
    assert_eq!(renderer.tick(), TickOutcome::Minimized);
    assert!(rec.take().is_empty());

    queue.push(SurfaceSize::new(800, 600));
    assert!(matches!(renderer.tick(), TickOutcome::Reconfigured(_)));
    assert_eq!(renderer.tick(), TickOutcome::Rendered);
}

#[test]
fn recoverable_acquire_errors_skip_the_frame() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);

    let cases = [
        (AcquireError::Timeout, SurfaceErrorAction::SkipFrame),
        (AcquireError::Outdated, SurfaceErrorAction::Reconfigured),
        (AcquireError::Lost, SurfaceErrorAction::Reconfigured),
    ];

    for (err, action) in cases {
        rec.take();
        renderer_target_fail(&mut renderer, err);
        let outcome = renderer.tick();
        assert_eq!(outcome, TickOutcome::Skipped(action));
        assert_eq!(outcome.phase(), FramePhase::RenderReady);
        let events = rec.take();
        assert!(!events.contains(&Event::Submit));
        assert!(!events.contains(&Event::Paint));
        assert_eq!(rec.live(), 0);
    }

    assert_eq!(renderer.tick(), TickOutcome::Rendered);
}

#[test]
fn skipped_frames_are_not_counted_as_rendered() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);

    renderer_target_fail(&mut renderer, AcquireError::Timeout);
    assert!(matches!(renderer.tick(), TickOutcome::Skipped(_)));
    assert_eq!(renderer.frames_rendered(), 0);

    assert_eq!(renderer.tick(), TickOutcome::Rendered);
    assert_eq!(renderer.frames_rendered(), 1);

    // The skipped build and the presented one share an index.
    let indices: Vec<u64> = rec
        .take()
        .into_iter()
        .filter_map(|e| match e {
            Event::Build { frame_index, .. } => Some(frame_index),
            _ => None,
        })
        .collect();
    assert_eq!(indices, vec![0, 0]);
}

#[test]
fn occluded_window_is_minimized() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);

    renderer_target_fail(&mut renderer, AcquireError::Occluded);
    let outcome = renderer.tick();
    assert_eq!(outcome, TickOutcome::Minimized);
    assert_eq!(outcome.phase(), FramePhase::Idle);
    assert_eq!(renderer.frames_rendered(), 0);

    assert_eq!(renderer.tick(), TickOutcome::Rendered);
}

#[test]
fn validation_failure_is_fatal() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);

    renderer_target_fail(&mut renderer, AcquireError::Validation);
    assert_eq!(renderer.tick(), TickOutcome::Fatal);
    assert_eq!(rec.live(), 0);
}

#[test]
fn resize_tick_reports_resize_phase() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);

    renderer.resize_queue().push(SurfaceSize::new(640, 480));
    assert_eq!(renderer.tick().phase(), FramePhase::ResizePending);
    assert_eq!(renderer.tick().phase(), FramePhase::RenderReady);
}

#[test]
fn shutdown_is_idempotent() {
    let rec = Recorder::default();
    let mut renderer = renderer_at(&rec, 800, 600);
    renderer.tick();
    rec.take();

    assert!(renderer.shutdown());
    assert_eq!(rec.take(), vec![Event::Unconfigure, Event::OverlayShutdown]);

    assert!(!renderer.shutdown());
    assert!(renderer.is_shut_down());
    assert_eq!(renderer.tick(), TickOutcome::ShutDown);
    assert!(renderer.overlay_mut().is_none());

    drop(renderer);
    assert!(rec.take().is_empty(), "drop after shutdown released something twice");
}

#[test]
fn drop_runs_shutdown_once() {
    let rec = Recorder::default();
    let renderer = renderer_at(&rec, 800, 600);

    drop(renderer);
    assert_eq!(rec.take(), vec![Event::Unconfigure, Event::OverlayShutdown]);
}

/// Arms the mock to fail its next acquire.
fn renderer_target_fail(
    renderer: &mut FrameRenderer<MockTarget, MockOverlay>,
    err: AcquireError,
) {
    renderer.target_mut().fail_next = Some(err);
}
