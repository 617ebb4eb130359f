use std::path::Path;

use wgpu::util::DeviceExt;

use super::{HeadlessGpu, ProbeError};

/// Invocations per workgroup in the built-in scan shader.
pub const WORKGROUP_SIZE: u32 = 64;

/// Built-in per-workgroup inclusive prefix scan.
pub const PREFIX_SCAN_WGSL: &str = include_str!("shaders/prefix_scan.wgsl");

/// CPU version of the built-in shader: an inclusive scan restarted at every
/// `WORKGROUP_SIZE` boundary.
pub fn scan_reference(input: &[i32]) -> Vec<i32> {
    input
        .chunks(WORKGROUP_SIZE as usize)
        .flat_map(|group| {
            group.iter().scan(0i32, |acc, &v| {
                *acc = acc.wrapping_add(v);
                Some(*acc)
            })
        })
        .collect()
}

/// Compute pipeline over a single read-write `array<i32>` at group 0,
/// binding 0, entry point `main`.
pub struct ScanProbe {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl ScanProbe {
    /// Compiles `wgsl` and builds the pipeline.
    ///
    /// Shader and pipeline validation errors are caught in an error scope and
    /// returned instead of reaching the device's uncaptured-error log.
    pub fn new(gpu: &HeadlessGpu, wgsl: &str) -> Result<Self, ProbeError> {
        let scope = gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("scan probe shader"),
                source: wgpu::ShaderSource::Wgsl(wgsl.into()),
            });

        // Layout derived from the shader; binding 0 is the data buffer.
        let pipeline = gpu
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("scan probe pipeline"),
                layout: None,
                module: &shader,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                cache: None,
            });
        let bind_group_layout = pipeline.get_bind_group_layout(0);

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(ProbeError::Shader(err.to_string()));
        }

        Ok(Self {
            pipeline,
            bind_group_layout,
        })
    }

    /// Loads a WGSL shader from disk.
    pub fn from_file(gpu: &HeadlessGpu, path: &Path) -> Result<Self, ProbeError> {
        let source = std::fs::read_to_string(path).map_err(|source| ProbeError::ShaderIo {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("read {} bytes from {}", source.len(), path.display());
        Self::new(gpu, &source)
    }

    /// Uploads `input`, dispatches one workgroup per `WORKGROUP_SIZE`
    /// elements, and returns the buffer contents after the dispatch.
    pub fn run(&self, gpu: &HeadlessGpu, input: &[i32]) -> Result<Vec<i32>, ProbeError> {
        if input.is_empty() {
            return Err(ProbeError::EmptyInput);
        }
        if input.len() % WORKGROUP_SIZE as usize != 0 {
            return Err(ProbeError::UnalignedLength {
                len: input.len(),
                workgroup: WORKGROUP_SIZE,
            });
        }

        let device = &gpu.device;
        let size = std::mem::size_of_val(input) as u64;

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let data_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scan probe data"),
            contents: bytemuck::cast_slice(input),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
        });

        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scan probe staging"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scan probe bind group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: data_buffer.as_entire_binding(),
            }],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scan probe encoder"),
        });

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("scan probe pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            let groups = input.len() as u32 / WORKGROUP_SIZE;
            pass.dispatch_workgroups(groups, 1, 1);
        }

        encoder.copy_buffer_to_buffer(&data_buffer, 0, &staging_buffer, 0, size);
        gpu.queue.submit(Some(encoder.finish()));

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(ProbeError::Dispatch(err.to_string()));
        }

        // Explicit wait: the map callback fires during `poll`, not before.
        let slice = staging_buffer.slice(..);
        let (sender, receiver) = flume::bounded(1);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| ProbeError::Poll(e.to_string()))?;
        receiver
            .recv()
            .map_err(|e| ProbeError::Map(e.to_string()))?
            .map_err(|e| ProbeError::Map(e.to_string()))?;

        let output = {
            let mapped = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, i32>(&mapped).to_vec()
        };
        staging_buffer.unmap();

        Ok(output)
    }
}
