use std::sync::Arc;

use winit::window::Window;

use super::surface::{self, SurfaceSize};
use super::{AcquireError, GpuError, GpuFrame, GpuInit, SurfaceErrorAction};

/// Owns wgpu core objects and the surface configuration.
///
/// This type is the low-level rendering context:
/// - creates and stores Instance/Adapter/Device/Queue
/// - creates and configures the Surface (swapchain)
/// - acquires frames and provides an encoder + view for rendering
///
/// Fields drop in declaration order, which releases the handles in reverse
/// acquisition order: queue, device, adapter, surface, instance, window.
pub struct Gpu {
    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Whether `config` is currently applied to the surface.
    configured: bool,

    /// Current drawable size in physical pixels.
    size: SurfaceSize,

    /// Command queue.
    queue: wgpu::Queue,

    /// Logical device.
    device: wgpu::Device,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Surface bound to the window.
    surface: wgpu::Surface<'static>,

    /// wgpu instance used to create the adapter and surface; also recreates
    /// the surface after it is lost.
    instance: wgpu::Instance,

    window: Arc<Window>,
}

impl Gpu {
    /// Creates a GPU context bound to a window, blocking until the adapter
    /// and device requests resolve.
    ///
    /// The surface is created unconfigured; call [`Gpu::configure`] before the
    /// first frame.
    pub fn new(window: Arc<Window>, init: GpuInit) -> Result<Self, GpuError> {
        pollster::block_on(Self::new_async(window, init))
    }

    async fn new_async(window: Arc<Window>, init: GpuInit) -> Result<Self, GpuError> {
        let size = SurfaceSize::from(window.inner_size());
        if size.is_empty() {
            return Err(GpuError::ZeroSize {
                width: size.width,
                height: size.height,
            });
        }

        let instance = wgpu::Instance::default();

        // Surface lifetime is tied to the window through the Arc clone.
        let surface = instance.create_surface(Arc::clone(&window))?;

        let (adapter, device, queue) =
            request_device(&instance, Some(&surface), &init, "kiln device").await?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, init.preferred_format)
            .ok_or(GpuError::NoSurfaceFormat)?;
        if format != init.preferred_format {
            log::warn!(
                "surface does not support {:?}; using {:?}",
                init.preferred_format,
                format
            );
        }

        let alpha_mode = surface::choose_alpha_mode(&caps.alpha_modes, init.alpha_mode);

        let config = surface::surface_config(
            format,
            size,
            init.present_mode,
            alpha_mode,
            init.desired_maximum_frame_latency,
        );

        log::info!("surface format {format:?}, {}x{}", size.width, size.height);

        Ok(Self {
            config,
            configured: false,
            size,
            queue,
            device,
            adapter,
            surface,
            instance,
            window,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Applies a configuration for `size`, replacing any previous one.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size; in that
    /// case only the recorded size changes and the surface stays unconfigured.
    pub fn configure(&mut self, size: SurfaceSize) {
        self.size = size;
        if size.is_empty() {
            self.configured = false;
            log::debug!("surface left unconfigured at {}x{}", size.width, size.height);
            return;
        }

        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.configured = true;
    }

    /// Marks the current configuration as released.
    ///
    /// wgpu tears the old swapchain down inside the next `configure`; after this
    /// call no frame is acquired until the surface is configured again.
    pub fn unconfigure(&mut self) {
        self.configured = false;
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> Result<GpuFrame, AcquireError> {
        if !self.configured {
            return Err(AcquireError::Unconfigured);
        }

        let acquired = surface::split_current_texture(self.surface.get_current_texture())?;
        let view = acquired
            .texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("kiln frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture: acquired.texture,
            view,
            encoder,
            suboptimal: acquired.suboptimal,
        })
    }

    /// Finishes, submits and presents the frame, releasing every per-frame
    /// object before returning.
    ///
    /// A frame acquired as suboptimal is still presented; the surface is
    /// reconfigured right after.
    pub fn submit(&mut self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
            suboptimal,
        } = frame;

        let commands = encoder.finish();
        self.queue.submit(std::iter::once(commands));
        drop(view);

        self.window.pre_present_notify();
        surface_texture.present();

        if suboptimal {
            log::debug!("surface suboptimal; reconfiguring");
            self.configure(self.size);
        }
    }

    /// Converts an acquisition failure into a higher-level action. Outdated
    /// surfaces are reconfigured; lost surfaces are recreated, then configured.
    pub fn handle_surface_error(&mut self, err: AcquireError) -> SurfaceErrorAction {
        let action = surface::classify_surface_error(&err);
        match (err, action) {
            (AcquireError::Lost, _) => {
                log::warn!("surface lost; recreating");
                if let Err(e) = self.recreate_surface() {
                    log::error!("{e}");
                    return SurfaceErrorAction::Fatal;
                }
            }
            (_, SurfaceErrorAction::Reconfigured) => {
                log::debug!("{err}; reconfiguring");
                self.configure(self.size);
            }
            (_, SurfaceErrorAction::SkipFrame | SurfaceErrorAction::Occluded) => {
                log::debug!("{err}; skipping frame");
            }
            (_, SurfaceErrorAction::Fatal) => log::error!("{err}"),
        }
        action
    }

    fn recreate_surface(&mut self) -> Result<(), GpuError> {
        self.surface = self.instance.create_surface(Arc::clone(&self.window))?;
        self.configure(self.size);
        Ok(())
    }
}

/// Requests an adapter and a device, installing the diagnostic handlers.
///
/// Shared by the windowed bootstrap and the headless compute context.
pub(crate) async fn request_device(
    instance: &wgpu::Instance,
    compatible_surface: Option<&wgpu::Surface<'_>>,
    init: &GpuInit,
    label: &str,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue), GpuError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface,
            force_fallback_adapter: false,
        })
        .await?;

    let info = adapter.get_info();
    log::info!("selected GPU: {} ({:?})", info.name, info.backend);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some(label),
            required_features: init.required_features,
            required_limits: init.required_limits.clone(),
            memory_hints: wgpu::MemoryHints::Performance,
            ..Default::default()
        })
        .await?;

    install_diagnostics(&device);

    Ok((adapter, device, queue))
}

/// Routes uncaptured device errors and device loss to the log.
///
/// Neither handler changes control flow.
fn install_diagnostics(device: &wgpu::Device) {
    device.on_uncaptured_error(Arc::new(|err: wgpu::Error| {
        log::error!("wgpu error: {err}");
    }));

    device.set_device_lost_callback(|reason, message| {
        log::error!("wgpu device lost ({reason:?}): {message}");
    });
}
