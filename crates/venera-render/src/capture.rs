//! Offscreen nadir capture target with synchronous readback.
//!
//! The globe scene is rendered into this N×N color target once per frame and
//! the pixels are copied back to the CPU, where the red channel becomes the
//! height field. The render-plus-readback round trip blocks the tick until
//! the GPU finishes: the dominant per-frame cost, budgeted exactly once per
//! visible frame by the driver.

/// Errors reading the capture back to the CPU.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The readback buffer could not be mapped.
    #[error("failed to map capture readback buffer")]
    MapFailed,

    /// The map callback never delivered a result.
    #[error("capture readback callback was dropped")]
    ChannelClosed,
}

/// Round a tight row length up to wgpu's copy alignment.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// An N×N offscreen color target and its persistent readback buffer.
///
/// `Rgba8Unorm` (linear, not sRGB) so the bump-map bytes survive the round
/// trip unchanged: what the globe material samples is what the height field
/// receives.
pub struct CaptureTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    readback: wgpu::Buffer,
    resolution: u32,
    padded_row: u32,
}

impl CaptureTarget {
    /// Texture format of the capture target.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Create the target and its readback buffer for an N×N capture.
    pub fn new(device: &wgpu::Device, resolution: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("nadir-capture"),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let padded_row = padded_bytes_per_row(resolution);
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("nadir-capture-readback"),
            size: u64::from(padded_row) * u64::from(resolution),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            texture,
            view,
            readback,
            resolution,
            padded_row,
        }
    }

    /// Samples per axis.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Copy the rendered capture to the CPU and return tightly packed RGBA
    /// bytes (`resolution² * 4`), row padding stripped.
    ///
    /// Blocks until the GPU has finished all submitted work, including the
    /// capture render pass that must precede this call in the same tick.
    pub fn read_back(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Vec<u8>, CaptureError> {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("capture-readback-encoder"),
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_row),
                    rows_per_image: Some(self.resolution),
                },
            },
            wgpu::Extent3d {
                width: self.resolution,
                height: self.resolution,
                depth_or_array_layers: 1,
            },
        );

        queue.submit([encoder.finish()]);

        let buffer_slice = self.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        });

        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return Err(CaptureError::MapFailed),
            Err(_) => return Err(CaptureError::ChannelClosed),
        }

        let pixels = {
            let mapped = buffer_slice.get_mapped_range();
            let tight_row = (self.resolution * 4) as usize;
            let mut pixels = Vec::with_capacity(tight_row * self.resolution as usize);
            for row in 0..self.resolution {
                let start = (row * self.padded_row) as usize;
                pixels.extend_from_slice(&mapped[start..start + tight_row]);
            }
            pixels
        };
        self.readback.unmap();

        Ok(pixels)
    }
}
