//! The native engine seam.
//!
//! Every call the bridge makes across the foreign-function boundary goes
//! through [`NativeEngine`]. One implementation exists per platform:
//!
//! - [`DynamicEngine`](crate::dynamic::DynamicEngine) loads the engine as a
//!   shared library at runtime (Windows, Linux, macOS, Android).
//! - `StaticEngine` calls statically linked symbols (iOS, where dynamic
//!   loading of app code is not allowed).
//!
//! [`PlatformEngine`] names the default for the current target.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

use crate::status::{ErrorCode, LogLevel};

// ============================================================================
// Frame Handle
// ============================================================================

/// Opaque reference to the engine's most recent decoded frame.
///
/// The engine owns the memory behind it and may rotate or overwrite it at any
/// time; the bridge only passes it on to the texture factory. A zero pointer
/// from the engine never becomes a `FrameHandle`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(NonNull<c_void>);

impl FrameHandle {
    /// Wrap a raw engine pointer. Returns `None` for null.
    pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    /// The raw engine pointer, for texture factories that hand it to a GPU API.
    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

impl fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameHandle({:p})", self.0)
    }
}

// ============================================================================
// Engine Trait
// ============================================================================

/// Capability provider for one native engine instance.
///
/// Queries take `&self` and must not change engine state. Commands take
/// `&mut self`. Implementations are driven from a single thread.
pub trait NativeEngine {
    /// Whether `uri` can be decoded and rendered into a texture.
    fn can_output_to_texture(&self, uri: &str) -> bool;

    fn player_ready(&self) -> bool;

    fn duration_seconds(&self) -> f32;

    fn current_seconds(&self) -> f32;

    /// Output `(width, height)` in pixels, zero when not yet known.
    fn video_extents(&self) -> (i32, i32);

    /// Current frame, `None` when the engine has nothing to show.
    fn cur_frame_texture(&self) -> Option<FrameHandle>;

    /// Allocate the native context, configured for `log_level`.
    fn init_player(&mut self, log_level: LogLevel) -> ErrorCode;

    fn open_video(&mut self, uri: &str) -> ErrorCode;

    fn play_video(&mut self) -> ErrorCode;

    fn pause_video(&mut self);

    fn resume_video(&mut self);

    /// Tear down the native context. The engine must not be queried afterwards
    /// until the next `init_player`.
    fn release_player(&mut self);

    /// Backend name for logs.
    fn name(&self) -> &str;
}

// ============================================================================
// Platform Selection
// ============================================================================

#[cfg(target_os = "ios")]
pub type PlatformEngine = crate::ios::StaticEngine;

#[cfg(not(target_os = "ios"))]
pub type PlatformEngine = crate::dynamic::DynamicEngine;

/// Bring up the default engine for this platform.
#[cfg(target_os = "ios")]
pub fn platform_engine() -> Result<PlatformEngine, crate::error::LoadError> {
    Ok(crate::ios::StaticEngine::new())
}

/// Bring up the default engine for this platform.
#[cfg(not(target_os = "ios"))]
pub fn platform_engine() -> Result<PlatformEngine, crate::error::LoadError> {
    crate::dynamic::DynamicEngine::load_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_frame_is_absent() {
        assert!(FrameHandle::from_raw(std::ptr::null_mut()).is_none());
        let handle = FrameHandle::from_raw(0x1000 as *mut c_void).unwrap();
        assert_eq!(handle.as_ptr() as usize, 0x1000);
    }
}
