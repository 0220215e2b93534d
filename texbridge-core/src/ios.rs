//! Statically linked engine for iOS.
//!
//! App Store builds cannot `dlopen` engine code, so the UAVP_* symbols are
//! linked into the final binary and called directly.

use std::ffi::{c_char, c_void, CString};

use crate::native::{FrameHandle, NativeEngine};
use crate::status::{ErrorCode, LogLevel};

extern "C" {
    fn UAVP_CanOutputToTexture(video_path: *const c_char) -> bool;
    fn UAVP_PlayerReady() -> bool;
    fn UAVP_DurationSeconds() -> f32;
    fn UAVP_CurrentSeconds() -> f32;
    fn UAVP_VideoExtents(w: *mut i32, h: *mut i32);
    fn UAVP_CurFrameTexture() -> *mut c_void;
    fn UAVP_InitPlayer() -> i32;
    fn UAVP_OpenVideo(video_path: *const c_char) -> i32;
    fn UAVP_PlayVideo() -> i32;
    fn UAVP_PauseVideo();
    fn UAVP_ResumeVideo();
    fn UAVP_ReleasePlayer();
}

/// Engine whose entry points are resolved at link time.
#[derive(Debug, Default)]
pub struct StaticEngine {
    log_level: LogLevel,
}

impl StaticEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level passed to the most recent `init_player`.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }
}

impl NativeEngine for StaticEngine {
    fn can_output_to_texture(&self, uri: &str) -> bool {
        match CString::new(uri) {
            Ok(uri) => unsafe { UAVP_CanOutputToTexture(uri.as_ptr()) },
            Err(_) => false,
        }
    }

    fn player_ready(&self) -> bool {
        unsafe { UAVP_PlayerReady() }
    }

    fn duration_seconds(&self) -> f32 {
        unsafe { UAVP_DurationSeconds() }
    }

    fn current_seconds(&self) -> f32 {
        unsafe { UAVP_CurrentSeconds() }
    }

    fn video_extents(&self) -> (i32, i32) {
        let (mut w, mut h) = (0, 0);
        unsafe { UAVP_VideoExtents(&mut w, &mut h) };
        (w, h)
    }

    fn cur_frame_texture(&self) -> Option<FrameHandle> {
        FrameHandle::from_raw(unsafe { UAVP_CurFrameTexture() })
    }

    // The static build exports no log level entry point; the level is only
    // kept for diagnostics.
    fn init_player(&mut self, log_level: LogLevel) -> ErrorCode {
        self.log_level = log_level;
        ErrorCode::from_raw(unsafe { UAVP_InitPlayer() })
    }

    fn open_video(&mut self, uri: &str) -> ErrorCode {
        match CString::new(uri) {
            Ok(uri) => ErrorCode::from_raw(unsafe { UAVP_OpenVideo(uri.as_ptr()) }),
            Err(_) => ErrorCode::OPEN_FAILED,
        }
    }

    fn play_video(&mut self) -> ErrorCode {
        ErrorCode::from_raw(unsafe { UAVP_PlayVideo() })
    }

    fn pause_video(&mut self) {
        unsafe { UAVP_PauseVideo() }
    }

    fn resume_video(&mut self) {
        unsafe { UAVP_ResumeVideo() }
    }

    fn release_player(&mut self) {
        unsafe { UAVP_ReleasePlayer() }
    }

    fn name(&self) -> &str {
        "static"
    }
}
