use winit::event::WindowEvent;

use crate::device::{AcquireError, Gpu, GpuFrame, SurfaceErrorAction, SurfaceSize};

use super::FrameInfo;

/// Presentable surface driven by the frame renderer.
///
/// `Gpu` is the production implementation. The associated types let the
/// renderer sequence a frame without naming wgpu recording objects.
pub trait SurfaceTarget {
    /// Everything acquired for one tick: surface image, view, encoder.
    type Frame;
    type Encoder;
    type Pass;

    fn size(&self) -> SurfaceSize;

    /// Applies a configuration for `size`, replacing the previous one.
    fn configure(&mut self, size: SurfaceSize);

    fn unconfigure(&mut self);

    fn acquire(&mut self) -> Result<Self::Frame, AcquireError>;

    fn encoder(frame: &mut Self::Frame) -> &mut Self::Encoder;

    /// Begins a pass that clears the frame's view to `clear`.
    fn begin_pass(&self, frame: &mut Self::Frame, clear: wgpu::Color) -> Self::Pass;

    /// Finishes, submits and presents `frame`, consuming it.
    fn submit(&mut self, frame: Self::Frame);

    fn handle_surface_error(&mut self, err: AcquireError) -> SurfaceErrorAction;
}

/// UI overlay drawn on top of the cleared frame.
///
/// Per tick the renderer calls `build`, then `prepare` before the pass
/// begins, then `paint` inside the pass.
pub trait Overlay<T: SurfaceTarget> {
    /// Starts a UI frame, declares widgets and finalizes the draw list.
    fn build(&mut self, info: &FrameInfo);

    /// Records uploads the draw list needs before the pass begins.
    fn prepare(&mut self, target: &T, encoder: &mut T::Encoder);

    fn paint(&mut self, pass: &mut T::Pass);

    fn resize(&mut self, size: SurfaceSize) {
        let _ = size;
    }

    /// Returns `true` when the overlay consumed the event.
    fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        let _ = event;
        false
    }

    /// Releases the overlay's renderer bindings and UI context.
    fn shutdown(&mut self) {}
}

impl SurfaceTarget for Gpu {
    type Frame = GpuFrame;
    type Encoder = wgpu::CommandEncoder;
    type Pass = wgpu::RenderPass<'static>;

    fn size(&self) -> SurfaceSize {
        Gpu::size(self)
    }

    fn configure(&mut self, size: SurfaceSize) {
        Gpu::configure(self, size);
    }

    fn unconfigure(&mut self) {
        Gpu::unconfigure(self);
    }

    fn acquire(&mut self) -> Result<GpuFrame, AcquireError> {
        self.begin_frame()
    }

    fn encoder(frame: &mut GpuFrame) -> &mut wgpu::CommandEncoder {
        &mut frame.encoder
    }

    fn begin_pass(&self, frame: &mut GpuFrame, clear: wgpu::Color) -> wgpu::RenderPass<'static> {
        // The pass must be dropped before `submit` finishes the encoder; the
        // renderer scopes it accordingly.
        frame
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("kiln overlay pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime()
    }

    fn submit(&mut self, frame: GpuFrame) {
        Gpu::submit(self, frame);
    }

    fn handle_surface_error(&mut self, err: AcquireError) -> SurfaceErrorAction {
        Gpu::handle_surface_error(self, err)
    }
}
