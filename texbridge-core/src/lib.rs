//! # texbridge core
//!
//! Exposes a native media engine to a real-time renderer as a video source
//! that produces one texture per render tick.

// ============================================================================
// Status / Errors
// ============================================================================
pub mod error;
pub mod status;

// ============================================================================
// Native Engine
// ============================================================================
pub mod native;
pub mod dynamic;
#[cfg(target_os = "ios")]
pub mod ios;

// ============================================================================
// Bridge
// ============================================================================
pub mod probe;
pub mod player;
pub mod texture;
#[cfg(feature = "wgpu")]
pub mod wgpu_texture;

// ============================================================================
// Host Surface
// ============================================================================
pub mod config;
pub mod source;

#[cfg(test)]
pub(crate) mod spy;

pub use config::{SourceConfig, Volume};
pub use error::{ConfigError, LoadError, NativeError, Released};
pub use native::{platform_engine, FrameHandle, NativeEngine, PlatformEngine};
pub use player::{Player, PlayerState};
pub use source::VideoSource;
pub use status::{ErrorCode, LogLevel, MediaType};
pub use texture::{ExternalTextureDesc, TextureBridge, TextureFactory};

// ============================================================================
// Version
// ============================================================================
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
