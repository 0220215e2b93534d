//! wgpu texture factory.
//!
//! For engines that expose CPU-visible frames: each bind copies the frame
//! into a wgpu texture allocated once per output size.

use std::sync::Arc;

use crate::native::FrameHandle;
use crate::texture::{ExternalTextureDesc, FilterMode, FrameFormat, SamplingPolicy, TextureFactory, WrapMode};

const BYTES_PER_PIXEL: u32 = 4;

pub fn texture_format(format: FrameFormat) -> wgpu::TextureFormat {
    match format {
        FrameFormat::Bgra8 => wgpu::TextureFormat::Bgra8UnormSrgb,
    }
}

pub fn sampler_descriptor(policy: SamplingPolicy) -> wgpu::SamplerDescriptor<'static> {
    let filter = match policy.filter {
        FilterMode::Point => wgpu::FilterMode::Nearest,
        FilterMode::Bilinear => wgpu::FilterMode::Linear,
    };
    let address_mode = match policy.wrap {
        WrapMode::Clamp => wgpu::AddressMode::ClampToEdge,
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
    };

    wgpu::SamplerDescriptor {
        label: Some("video_frame_sampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    }
}

/// Whether a texture of `desc`'s size fits under the device's 2D limit.
pub fn fits_limits(desc: &ExternalTextureDesc, limits: &wgpu::Limits) -> bool {
    let max = limits.max_texture_dimension_2d;
    desc.width <= max && desc.height <= max
}

// ============================================================================
// Texture
// ============================================================================

pub struct WgpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    width: u32,
    height: u32,
}

impl WgpuTexture {
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

// ============================================================================
// Factory
// ============================================================================

pub struct WgpuTextures {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
}

impl WgpuTextures {
    /// # Safety
    ///
    /// Every frame handed to this factory must point to at least
    /// `width * height * 4` readable bytes of tightly packed BGRA8 pixels,
    /// where `width`/`height` are the texture's size, and stay readable for
    /// the duration of the bind call.
    pub unsafe fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self { device, queue }
    }

    fn upload(&self, texture: &WgpuTexture, frame: FrameHandle) {
        let len = texture.width as usize * texture.height as usize * BYTES_PER_PIXEL as usize;
        // Contract of `WgpuTextures::new`.
        let pixels = unsafe { std::slice::from_raw_parts(frame.as_ptr() as *const u8, len) };

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(texture.width * BYTES_PER_PIXEL),
                rows_per_image: Some(texture.height),
            },
            wgpu::Extent3d {
                width: texture.width,
                height: texture.height,
                depth_or_array_layers: 1,
            },
        );
    }
}

impl TextureFactory for WgpuTextures {
    type Texture = WgpuTexture;

    fn create_external(&mut self, desc: &ExternalTextureDesc, frame: FrameHandle) -> Option<WgpuTexture> {
        let limits = self.device.limits();
        if !fits_limits(desc, &limits) {
            tracing::warn!(
                "Video output {}x{} exceeds max texture dimension {}, not allocating",
                desc.width,
                desc.height,
                limits.max_texture_dimension_2d
            );
            return None;
        }

        // Engine frames are single-level; `desc.mipmaps` is never honored here.
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("video_frame_texture"),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(desc.format),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&sampler_descriptor(desc.sampling));

        let texture = WgpuTexture {
            texture,
            view,
            sampler,
            width: desc.width,
            height: desc.height,
        };
        self.upload(&texture, frame);
        Some(texture)
    }

    fn update_external(&mut self, texture: &mut WgpuTexture, frame: FrameHandle) {
        self.upload(texture, frame);
    }
}
