use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use kiln_engine::core::App;
use kiln_engine::device::{Gpu, GpuInit};
use kiln_engine::frame::{ClearColor, FrameInfo};
use kiln_engine::logging::{init_logging, LoggingConfig};
use kiln_engine::overlay::{EguiOverlay, OverlayUi};
use kiln_engine::texture::{Extent2d, StaticTexture};
use kiln_engine::window::{Runtime, RuntimeConfig};

const TEXTURE_EXTENT: Extent2d = Extent2d::new(512, 512);
const TEXTURE_FILL: [u8; 4] = [122, 122, 122, 122];

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(err) = run() {
        eprintln!("kiln-studio: {err:#}");
        std::process::exit(-1);
    }
}

fn run() -> Result<()> {
    let config = RuntimeConfig {
        title: "Kiln wgpu overlay".to_string(),
        initial_size: LogicalSize::new(1280.0, 720.0),
        clear_color: ClearColor::default(),
    };

    Runtime::run(config, GpuInit::default(), Studio)
}

/// Uploads the static texture and builds the overlay once the GPU exists.
struct Studio;

impl App for Studio {
    type Overlay = EguiOverlay<DemoUi>;

    fn init(&mut self, gpu: &Gpu) -> Result<Self::Overlay> {
        let texture = StaticTexture::solid(
            gpu.device(),
            gpu.queue(),
            TEXTURE_EXTENT,
            TEXTURE_FILL,
            Some("kiln static texture"),
        )
        .context("failed to upload static texture")?;

        let adapter = gpu.adapter_info();
        let ui = DemoUi {
            adapter: format!("{} ({:?})", adapter.name, adapter.backend),
            format: gpu.surface_format(),
            texture: None,
        };

        let mut overlay = EguiOverlay::new(gpu, ui);
        let id = overlay.register_texture(gpu.device(), texture.view(), wgpu::FilterMode::Linear);
        overlay.ui_mut().texture = Some((id, texture));

        Ok(overlay)
    }
}

struct DemoUi {
    adapter: String,
    format: wgpu::TextureFormat,

    /// Registered egui id plus the texture it refers to, kept alive here.
    texture: Option<(egui::TextureId, StaticTexture)>,
}

impl OverlayUi for DemoUi {
    fn ui(&mut self, ctx: &egui::Context, info: &FrameInfo) {
        if let Some((id, texture)) = &self.texture {
            let extent = texture.extent();
            egui::Window::new("Texture").show(ctx, |ui| {
                ui.label(format!("{}x{} RGBA8", extent.width, extent.height));
                let size = egui::vec2(extent.width as f32, extent.height as f32);
                ui.image(egui::load::SizedTexture::new(*id, size));
            });
        }

        egui::Window::new("Stats").show(ctx, |ui| {
            ui.label(format!("adapter: {}", self.adapter));
            ui.label(format!("surface: {:?}", self.format));
            ui.label(format!("size: {}x{}", info.size.width, info.size.height));
            ui.separator();
            ui.label(format!("frame: {}", info.time.frame_index));
            ui.label(format!(
                "dt: {:.2} ms ({:.0} fps)",
                info.time.dt * 1000.0,
                info.time.fps()
            ));
            ui.label(format!("reconfigurations: {}", info.reconfigurations));
        });
    }
}
