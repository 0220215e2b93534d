//! Test doubles: a scripted engine that records every command and a texture
//! factory that counts allocations.

use std::cell::Cell;
use std::ffi::c_void;

use crate::native::{FrameHandle, NativeEngine};
use crate::status::{ErrorCode, LogLevel};
use crate::texture::{ExternalTextureDesc, TextureFactory};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Init(LogLevel),
    Open(String),
    Play,
    Pause,
    Resume,
    Release,
}

/// Engine whose queries return whatever the test sets.
#[derive(Debug, Default)]
pub(crate) struct SpyEngine {
    pub playable: bool,
    pub ready: bool,
    pub duration: f32,
    pub position: f32,
    pub extents: (i32, i32),
    /// Address returned by `cur_frame_texture`; 0 means no frame.
    pub frame: usize,
    pub init_result: ErrorCode,
    pub open_result: ErrorCode,
    pub play_result: ErrorCode,
    /// Commands, in the order they reached the engine.
    pub calls: Vec<Call>,
    /// `can_output_to_texture` is a query, so it is counted here rather than in `calls`.
    pub capability_checks: Cell<usize>,
    /// Value of `capability_checks` when the last `open_video` arrived.
    pub checks_at_open: Option<usize>,
}

impl SpyEngine {
    pub fn playable() -> Self {
        Self {
            playable: true,
            ..Self::default()
        }
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn opens(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Open(uri) => Some(uri.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl NativeEngine for SpyEngine {
    fn can_output_to_texture(&self, _uri: &str) -> bool {
        self.capability_checks.set(self.capability_checks.get() + 1);
        self.playable
    }

    fn player_ready(&self) -> bool {
        self.ready
    }

    fn duration_seconds(&self) -> f32 {
        self.duration
    }

    fn current_seconds(&self) -> f32 {
        self.position
    }

    fn video_extents(&self) -> (i32, i32) {
        self.extents
    }

    fn cur_frame_texture(&self) -> Option<FrameHandle> {
        FrameHandle::from_raw(self.frame as *mut c_void)
    }

    fn init_player(&mut self, log_level: LogLevel) -> ErrorCode {
        self.calls.push(Call::Init(log_level));
        self.init_result
    }

    fn open_video(&mut self, uri: &str) -> ErrorCode {
        self.calls.push(Call::Open(uri.to_string()));
        self.checks_at_open = Some(self.capability_checks.get());
        self.open_result
    }

    fn play_video(&mut self) -> ErrorCode {
        self.calls.push(Call::Play);
        self.play_result
    }

    fn pause_video(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn resume_video(&mut self) {
        self.calls.push(Call::Resume);
    }

    fn release_player(&mut self) {
        self.calls.push(Call::Release);
    }

    fn name(&self) -> &str {
        "spy"
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct FakeTexture {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub frame: usize,
}

#[derive(Debug, Default)]
pub(crate) struct CountingTextures {
    /// Largest width or height the factory agrees to allocate.
    pub max_dimension: Option<u32>,
    pub created: usize,
    pub updates: usize,
    pub last_desc: Option<ExternalTextureDesc>,
}

impl TextureFactory for CountingTextures {
    type Texture = FakeTexture;

    fn create_external(&mut self, desc: &ExternalTextureDesc, frame: FrameHandle) -> Option<FakeTexture> {
        self.last_desc = Some(*desc);
        if let Some(max) = self.max_dimension {
            if desc.width > max || desc.height > max {
                return None;
            }
        }
        self.created += 1;
        Some(FakeTexture {
            id: self.created,
            width: desc.width,
            height: desc.height,
            frame: frame.as_ptr() as usize,
        })
    }

    fn update_external(&mut self, texture: &mut FakeTexture, frame: FrameHandle) {
        self.updates += 1;
        texture.frame = frame.as_ptr() as usize;
    }
}
