use crate::device::{request_device, GpuError, GpuInit};

/// Instance, adapter, device and queue without a presentable surface.
pub struct HeadlessGpu {
    pub queue: wgpu::Queue,
    pub device: wgpu::Device,
    pub adapter: wgpu::Adapter,
    #[allow(dead_code)]
    instance: wgpu::Instance,
}

impl HeadlessGpu {
    /// Blocks until the adapter and device requests resolve.
    pub fn new(init: &GpuInit) -> Result<Self, GpuError> {
        pollster::block_on(async {
            let instance = wgpu::Instance::default();
            let (adapter, device, queue) =
                request_device(&instance, None, init, "kiln headless device").await?;
            Ok(Self {
                queue,
                device,
                adapter,
                instance,
            })
        })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }
}
