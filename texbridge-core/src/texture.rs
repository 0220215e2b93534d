//! Texture bridge.
//!
//! Polled once per render tick. Binds the engine's current frame to a single
//! host texture, allocating only on first use or when the output size
//! changes; every other tick rebinds the same texture in place. The engine is
//! expected to rotate its frame buffers internally, so steady-state playback
//! never allocates GPU memory here.

use crate::native::{FrameHandle, NativeEngine};
use crate::player::Player;

// ============================================================================
// Texture Description
// ============================================================================

/// Texel layout of engine frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// 8-bit BGRA, sRGB encoded.
    Bgra8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Point,
    Bilinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Clamp,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingPolicy {
    pub filter: FilterMode,
    pub wrap: WrapMode,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            filter: FilterMode::Bilinear,
            wrap: WrapMode::Repeat,
        }
    }
}

/// Everything a factory needs to allocate a texture over engine frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalTextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: FrameFormat,
    pub mipmaps: bool,
    pub sampling: SamplingPolicy,
}

impl ExternalTextureDesc {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: FrameFormat::Bgra8,
            mipmaps: false,
            sampling: SamplingPolicy::default(),
        }
    }
}

// ============================================================================
// Host Texture Factory
// ============================================================================

/// The host renderer's side of the bridge: creates textures over engine
/// frame memory and rebinds them when the engine hands out a new frame.
pub trait TextureFactory {
    type Texture;

    /// Allocate a texture described by `desc`, bound to `frame`. `None` when
    /// the host cannot allocate at that size; the bridge then presents nothing
    /// and asks again on the next tick.
    fn create_external(&mut self, desc: &ExternalTextureDesc, frame: FrameHandle) -> Option<Self::Texture>;

    /// Point an existing texture at `frame`. Must not reallocate.
    fn update_external(&mut self, texture: &mut Self::Texture, frame: FrameHandle);
}

// ============================================================================
// Bridge
// ============================================================================

struct Slot<T> {
    texture: T,
    width: u32,
    height: u32,
}

pub struct TextureBridge<F: TextureFactory> {
    factory: F,
    slot: Option<Slot<F::Texture>>,
    // Whether the last tick produced a texture; used to log transitions only.
    presenting: bool,
    allocations: u64,
}

impl<F: TextureFactory> TextureBridge<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            slot: None,
            presenting: false,
            allocations: 0,
        }
    }

    /// The texture showing the engine's current frame, or `None` when the
    /// engine is not ready or has no frame this tick.
    ///
    /// A missing frame does not free the texture: it is kept and rebound
    /// when frames come back at the same size.
    pub fn current_frame_texture<E: NativeEngine>(&mut self, player: &Player<E>) -> Option<&F::Texture> {
        let frame = if player.is_ready() {
            player.current_frame()
        } else {
            None
        };

        let Some(frame) = frame else {
            if self.presenting {
                tracing::debug!("Native frame is absent, no current texture");
            }
            self.presenting = false;
            return None;
        };

        let (width, height) = player.extents();
        let known_size = width != 0 && height != 0;

        let needs_texture = match &self.slot {
            None => true,
            Some(slot) => known_size && (slot.width, slot.height) != (width, height),
        };

        if needs_texture {
            if !known_size {
                // A frame without a size: nothing to allocate against yet.
                self.presenting = false;
                return None;
            }

            match &self.slot {
                Some(slot) => tracing::info!(
                    "Output size changed {}x{} -> {}x{}, recreating texture",
                    slot.width,
                    slot.height,
                    width,
                    height
                ),
                None => tracing::info!("Create texture width: {}, height: {}", width, height),
            }

            // The old texture no longer matches the engine's output either way.
            self.slot = None;
            let desc = ExternalTextureDesc::new(width, height);
            let Some(texture) = self.factory.create_external(&desc, frame) else {
                if self.presenting {
                    tracing::debug!("Host declined a {}x{} texture, no current texture", width, height);
                }
                self.presenting = false;
                return None;
            };
            self.slot = Some(Slot { texture, width, height });
            self.allocations += 1;
        } else if let Some(slot) = self.slot.as_mut() {
            tracing::trace!("Rebinding texture to {:?}", frame);
            self.factory.update_external(&mut slot.texture, frame);
        }

        self.presenting = true;
        self.slot.as_ref().map(|slot| &slot.texture)
    }

    /// Drop the held texture, e.g. after the player is released.
    pub fn reset(&mut self) {
        if self.slot.take().is_some() {
            tracing::debug!("Texture dropped");
        }
        self.presenting = false;
    }

    /// Number of textures created so far.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

// ============================================================================
// Tests
// ============================================================================
