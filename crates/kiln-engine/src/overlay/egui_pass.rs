use std::sync::Arc;

use winit::event::WindowEvent;
use winit::window::Window;

use crate::device::{Gpu, SurfaceSize};
use crate::frame::{FrameInfo, Overlay};

/// UI content declared by the application each frame.
pub trait OverlayUi {
    fn ui(&mut self, ctx: &egui::Context, info: &FrameInfo);
}

impl<F> OverlayUi for F
where
    F: FnMut(&egui::Context, &FrameInfo),
{
    fn ui(&mut self, ctx: &egui::Context, info: &FrameInfo) {
        self(ctx, info)
    }
}

/// egui context, winit bridge and wgpu renderer for one window.
///
/// Lifecycle per tick:
///
/// ```text
/// build()    take input, begin pass, run content, end pass, tessellate
/// prepare()  upload texture deltas and vertex/index buffers
/// paint()    draw primitives into the frame pass, free stale textures
/// ```
pub struct EguiOverlay<U: OverlayUi> {
    ui: U,

    /// Egui's wgpu backend: pipelines, textures and vertex buffers.
    renderer: egui_wgpu::Renderer,

    /// Bridges winit events into egui raw input.
    state: egui_winit::State,

    /// Shared egui context (reference-counted internally).
    ctx: egui::Context,

    /// Output of the last `build`, consumed by `prepare` and `paint`.
    clipped_primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    screen_descriptor: egui_wgpu::ScreenDescriptor,

    window: Arc<Window>,
}

impl<U: OverlayUi> EguiOverlay<U> {
    /// Creates the egui context, its winit state and a renderer targeting the
    /// surface format of `gpu`.
    pub fn new(gpu: &Gpu, ui: U) -> Self {
        let window = Arc::clone(gpu.window());
        let size = gpu.size();

        let ctx = egui::Context::default();
        let viewport = ctx.viewport_id();
        let state = egui_winit::State::new(ctx.clone(), viewport, &*window, None, None, None);

        let renderer = egui_wgpu::Renderer::new(
            gpu.device(),
            gpu.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            ui,
            renderer,
            state,
            ctx,
            clipped_primitives: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [size.width, size.height],
                pixels_per_point: window.scale_factor() as f32,
            },
            window,
        }
    }

    /// Makes a wgpu texture view drawable from egui through the returned id.
    pub fn register_texture(
        &mut self,
        device: &wgpu::Device,
        view: &wgpu::TextureView,
        filter: wgpu::FilterMode,
    ) -> egui::TextureId {
        self.renderer.register_native_texture(device, view, filter)
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }
}

impl<U: OverlayUi> Overlay<Gpu> for EguiOverlay<U> {
    fn build(&mut self, info: &FrameInfo) {
        let raw_input = self.state.take_egui_input(&self.window);
        self.ctx.begin_pass(raw_input);
        self.ui.ui(&self.ctx, info);

        let egui::FullOutput {
            shapes,
            textures_delta,
            platform_output,
            pixels_per_point,
            ..
        } = self.ctx.end_pass();

        self.state.handle_platform_output(&self.window, platform_output);
        self.textures_delta.append(textures_delta);
        self.screen_descriptor.pixels_per_point = pixels_per_point;
        self.clipped_primitives = self.ctx.tessellate(shapes, pixels_per_point);
    }

    fn prepare(&mut self, gpu: &Gpu, encoder: &mut wgpu::CommandEncoder) {
        let device = gpu.device();
        let queue = gpu.queue();

        for (id, delta) in &self.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.textures_delta.set.clear();

        let callback_buffers = self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &self.clipped_primitives,
            &self.screen_descriptor,
        );
        // Only paint callbacks produce extra buffers; this overlay registers none.
        if !callback_buffers.is_empty() {
            queue.submit(callback_buffers);
        }
    }

    fn paint(&mut self, pass: &mut wgpu::RenderPass<'static>) {
        self.renderer
            .render(pass, &self.clipped_primitives, &self.screen_descriptor);

        for id in self.textures_delta.free.drain(..) {
            self.renderer.free_texture(&id);
        }
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.screen_descriptor.size_in_pixels = [size.width, size.height];
        self.screen_descriptor.pixels_per_point = self.window.scale_factor() as f32;
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        self.state.on_window_event(&self.window, event).consumed
    }

    fn shutdown(&mut self) {
        self.clipped_primitives.clear();
        self.textures_delta = egui::TexturesDelta::default();
        log::debug!("egui overlay shut down");
    }
}
