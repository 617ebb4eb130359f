use super::{padded_bytes_per_row, solid_rgba8, validate_rgba8, Extent2d, TextureError};

/// GPU-resident RGBA8 texture with a full-extent 2D view.
///
/// The view is declared first so it is released before the texture.
pub struct StaticTexture {
    view: wgpu::TextureView,
    texture: wgpu::Texture,
    extent: Extent2d,
}

impl StaticTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Creates the texture and uploads `data` through the queue.
    ///
    /// `data` must be exactly `width * height * 4` bytes, row-major, no padding.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        extent: Extent2d,
        data: &[u8],
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        validate_rgba8(extent, data.len(), device.limits().max_texture_dimension_2d)?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: extent.to_wgpu(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(extent.bytes_per_row()),
                rows_per_image: Some(extent.height),
            },
            extent.to_wgpu(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label,
            format: Some(Self::FORMAT),
            dimension: Some(wgpu::TextureViewDimension::D2),
            aspect: wgpu::TextureAspect::All,
            base_mip_level: 0,
            mip_level_count: Some(1),
            base_array_layer: 0,
            array_layer_count: Some(1),
            ..Default::default()
        });

        log::debug!("uploaded {}x{} RGBA8 texture", extent.width, extent.height);

        Ok(Self {
            view,
            texture,
            extent,
        })
    }

    /// Creates a texture filled with a single color.
    pub fn solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        extent: Extent2d,
        rgba: [u8; 4],
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        Self::new(device, queue, extent, &solid_rgba8(extent, rgba), label)
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn extent(&self) -> Extent2d {
        self.extent
    }

    /// Copies the texture back to the CPU as tightly packed RGBA8.
    ///
    /// Blocks until the GPU has finished the copy.
    pub fn read_back(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Vec<u8>, TextureError> {
        let padded_row = padded_bytes_per_row(self.extent.width);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("texture read-back"),
            size: u64::from(padded_row) * u64::from(self.extent.height),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("texture read-back"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(self.extent.height),
                },
            },
            self.extent.to_wgpu(),
        );
        queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = flume::bounded(1);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| TextureError::ReadBack(e.to_string()))?;
        receiver
            .recv()
            .map_err(|e| TextureError::ReadBack(e.to_string()))?
            .map_err(|e| TextureError::ReadBack(e.to_string()))?;

        let row = self.extent.bytes_per_row() as usize;
        let mut pixels = Vec::with_capacity(row * self.extent.height as usize);
        {
            let mapped = slice.get_mapped_range();
            for padded in mapped.chunks(padded_row as usize) {
                pixels.extend_from_slice(&padded[..row]);
            }
        }
        staging.unmap();

        Ok(pixels)
    }
}
