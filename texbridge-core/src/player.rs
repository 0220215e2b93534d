//! Playback controller.
//!
//! Owns one native engine instance and walks it through its lifecycle:
//!
//! ```text
//! Uninitialized -> Initialized -> Opened -> Playing <-> Paused -> Released
//! ```
//!
//! Native result codes are returned verbatim. The controller only steps in
//! where calling the engine would be unsafe or pointless: opening a source the
//! probe rejected, pausing before the engine is ready, and anything after
//! release other than a fresh init.

use serde::Serialize;

use crate::error::Released;
use crate::native::{FrameHandle, NativeEngine};
use crate::probe;
use crate::status::{ErrorCode, LogLevel, MediaType};

/// Lifecycle position of the native context as seen by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Uninitialized,
    Initialized,
    Opened,
    Playing,
    Paused,
    Released,
}

pub struct Player<E> {
    engine: E,
    state: PlayerState,
}

impl<E: NativeEngine> Player<E> {
    pub fn new(engine: E) -> Self {
        tracing::debug!("Player created on {} engine", engine.name());
        Self {
            engine,
            state: PlayerState::Uninitialized,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Allocate the native context. Allowed from `Uninitialized` and, to start
    /// over, from `Released`; a second init on a live context is ignored.
    pub fn init(&mut self, log_level: LogLevel) -> ErrorCode {
        match self.state {
            PlayerState::Uninitialized | PlayerState::Released => {}
            state => {
                tracing::warn!("Init ignored: player already initialized ({:?})", state);
                return ErrorCode::NONE;
            }
        }

        tracing::debug!("Initializing player (log level {:?})", log_level);
        let code = self.engine.init_player(log_level);
        if code.is_ok() {
            self.state = PlayerState::Initialized;
        } else {
            tracing::warn!("Engine init failed: {}", code);
        }
        code
    }

    /// Open `uri`. Sources the capability probe rejects never reach the
    /// engine's open call and yield [`ErrorCode::OPEN_FAILED`].
    pub fn open(&mut self, uri: &str, media_type: MediaType) -> ErrorCode {
        tracing::info!("Opening {:?} source: {}", media_type, uri);

        if self.state == PlayerState::Released {
            tracing::warn!("Open ignored: player released");
            return ErrorCode::OPEN_FAILED;
        }

        if !probe::can_output_to_texture(&self.engine, uri) {
            return ErrorCode::OPEN_FAILED;
        }

        let code = self.engine.open_video(uri);
        if code.is_ok() {
            self.state = PlayerState::Opened;
        } else {
            tracing::warn!("Engine failed to open {}: {}", uri, code);
        }
        code
    }

    /// Start playback. The engine decides whether it is in a state to do so;
    /// its code is returned verbatim. After release the engine is not called
    /// and [`Released`] is returned instead.
    pub fn start(&mut self) -> Result<ErrorCode, Released> {
        if self.state == PlayerState::Released {
            tracing::warn!("Start ignored: player released");
            return Err(Released);
        }

        tracing::debug!("Starting playback");
        let code = self.engine.play_video();
        if code.is_ok() {
            self.state = PlayerState::Playing;
        } else {
            tracing::warn!("Engine failed to start playback: {}", code);
        }
        Ok(code)
    }

    /// Pause playback. Silently does nothing while the engine is not ready,
    /// since its context may still be initializing or opening.
    pub fn pause(&mut self) {
        if self.state == PlayerState::Released {
            tracing::warn!("Pause ignored: player released");
            return;
        }
        if !self.engine.player_ready() {
            tracing::debug!("Pause skipped: player not ready");
            return;
        }

        tracing::debug!("Pausing playback");
        self.engine.pause_video();
        if self.state == PlayerState::Playing {
            self.state = PlayerState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlayerState::Released {
            tracing::warn!("Resume ignored: player released");
            return;
        }

        tracing::debug!("Resuming playback");
        self.engine.resume_video();
        if self.state == PlayerState::Paused {
            self.state = PlayerState::Playing;
        }
    }

    /// Tear down the native context. Repeated calls are no-ops.
    pub fn release(&mut self) {
        if self.state == PlayerState::Released {
            tracing::debug!("Release ignored: already released");
            return;
        }

        tracing::debug!("Releasing player");
        self.engine.release_player();
        self.state = PlayerState::Released;
    }

    // ========================================================================
    // Queries
    // ========================================================================
    //
    // Straight forwards to the engine, except after release where the
    // context is gone and neutral values are returned instead.

    pub fn is_ready(&self) -> bool {
        self.is_live() && self.engine.player_ready()
    }

    /// Total playable time in seconds.
    pub fn duration(&self) -> f32 {
        if self.is_live() {
            self.engine.duration_seconds()
        } else {
            0.0
        }
    }

    /// Current playback position in seconds.
    pub fn position(&self) -> f32 {
        if self.is_live() {
            self.engine.current_seconds()
        } else {
            0.0
        }
    }

    /// Output `(width, height)` from a single engine call. Zero means unknown.
    pub fn extents(&self) -> (u32, u32) {
        if !self.is_live() {
            return (0, 0);
        }
        let (w, h) = self.engine.video_extents();
        (w.max(0) as u32, h.max(0) as u32)
    }

    pub fn width(&self) -> u32 {
        self.extents().0
    }

    pub fn height(&self) -> u32 {
        self.extents().1
    }

    pub(crate) fn current_frame(&self) -> Option<FrameHandle> {
        if self.is_live() {
            self.engine.cur_frame_texture()
        } else {
            None
        }
    }

    fn is_live(&self) -> bool {
        self.state != PlayerState::Released
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spy::{Call, SpyEngine};

    fn opened() -> Player<SpyEngine> {
        let mut player = Player::new(SpyEngine::playable());
        assert!(player.init(LogLevel::Info).is_ok());
        assert!(player.open("clip.mp4", MediaType::Video).is_ok());
        player
    }

    #[test]
    fn test_init_forwards_log_level() {
        let mut player = Player::new(SpyEngine::default());
        assert_eq!(player.init(LogLevel::Warning), ErrorCode::NONE);
        assert_eq!(player.state(), PlayerState::Initialized);
        assert_eq!(player.engine().calls, vec![Call::Init(LogLevel::Warning)]);
    }

    #[test]
    fn test_init_failure_is_passed_through() {
        let mut engine = SpyEngine::default();
        engine.init_result = ErrorCode::from_raw(9);
        let mut player = Player::new(engine);

        assert_eq!(player.init(LogLevel::Info), ErrorCode::from_raw(9));
        assert_eq!(player.state(), PlayerState::Uninitialized);
    }

    #[test]
    fn test_second_init_is_ignored() {
        let mut player = opened();
        assert!(player.init(LogLevel::Debug).is_ok());
        assert_eq!(player.engine().count(&Call::Init(LogLevel::Debug)), 0);
        assert_eq!(player.state(), PlayerState::Opened);
    }

    #[test]
    fn test_open_rejected_by_probe_skips_native_open() {
        let mut player = Player::new(SpyEngine::default());
        player.init(LogLevel::Info);

        assert_eq!(player.open("clip.xyz", MediaType::Video), ErrorCode::OPEN_FAILED);
        assert_eq!(player.engine().capability_checks.get(), 1);
        assert!(player.engine().opens().is_empty());
        assert_eq!(player.state(), PlayerState::Initialized);
    }

    #[test]
    fn test_open_checks_capability_once_before_native_open() {
        let mut player = Player::new(SpyEngine::playable());
        player.init(LogLevel::Info);

        assert!(player.open("clip.mp4", MediaType::Video).is_ok());
        assert_eq!(player.engine().capability_checks.get(), 1);
        assert_eq!(player.engine().checks_at_open, Some(1));
        assert_eq!(player.engine().opens(), vec!["clip.mp4"]);
    }

    #[test]
    fn test_open_forwards_once_and_returns_code_verbatim() {
        let mut engine = SpyEngine::playable();
        engine.open_result = ErrorCode::from_raw(17);
        let mut player = Player::new(engine);
        player.init(LogLevel::Info);

        assert_eq!(player.open("clip.mp4", MediaType::Video), ErrorCode::from_raw(17));
        assert_eq!(player.engine().opens(), vec!["clip.mp4"]);
        assert_eq!(player.state(), PlayerState::Initialized);
    }

    #[test]
    fn test_pause_when_not_ready_is_silent() {
        let mut player = opened();
        player.start().unwrap();

        player.pause();
        assert_eq!(player.engine().count(&Call::Pause), 0);
        assert_eq!(player.state(), PlayerState::Playing);
    }

    #[test]
    fn test_pause_and_resume_when_ready() {
        let mut player = opened();
        player.start().unwrap();
        player.engine_mut().ready = true;

        player.pause();
        assert_eq!(player.engine().count(&Call::Pause), 1);
        assert_eq!(player.state(), PlayerState::Paused);

        player.resume();
        assert_eq!(player.engine().count(&Call::Resume), 1);
        assert_eq!(player.state(), PlayerState::Playing);
    }

    #[test]
    fn test_resume_is_unconditional() {
        let mut player = Player::new(SpyEngine::default());
        player.resume();
        assert_eq!(player.engine().calls, vec![Call::Resume]);
    }

    #[test]
    fn test_start_without_open_reaches_engine() {
        let mut engine = SpyEngine::default();
        engine.play_result = ErrorCode::from_raw(3);
        let mut player = Player::new(engine);

        assert_eq!(player.start(), Ok(ErrorCode::from_raw(3)));
        assert_eq!(player.engine().calls, vec![Call::Play]);
    }

    #[test]
    fn test_negative_engine_code_is_not_a_release() {
        let mut engine = SpyEngine::playable();
        engine.play_result = ErrorCode::from_raw(-1);
        let mut player = Player::new(engine);
        player.init(LogLevel::Info);
        player.open("clip.mp4", MediaType::Video);

        let live = player.start();
        assert_eq!(live, Ok(ErrorCode::from_raw(-1)));
        assert_eq!(player.state(), PlayerState::Opened);

        player.release();
        let released = player.start();
        assert_eq!(released, Err(Released));
        assert_ne!(live, released);
        assert_eq!(player.engine().count(&Call::Play), 1);
    }

    #[test]
    fn test_released_player_rejects_commands() {
        let mut player = opened();
        player.release();
        player.release();
        assert_eq!(player.engine().count(&Call::Release), 1);

        let before = player.engine().calls.len();
        assert_eq!(player.start(), Err(Released));
        assert_eq!(player.open("clip.mp4", MediaType::Video), ErrorCode::OPEN_FAILED);
        player.pause();
        player.resume();
        assert_eq!(player.engine().calls.len(), before);
        assert_eq!(player.state(), PlayerState::Released);
    }

    #[test]
    fn test_init_after_release_starts_over() {
        let mut player = opened();
        player.release();

        assert!(player.init(LogLevel::Error).is_ok());
        assert_eq!(player.state(), PlayerState::Initialized);
        assert!(player.open("clip.mp4", MediaType::Video).is_ok());
    }

    #[test]
    fn test_queries_forward_to_engine() {
        let mut player = opened();
        {
            let engine = player.engine_mut();
            engine.ready = true;
            engine.duration = 12.5;
            engine.position = 3.0;
            engine.extents = (1280, 720);
        }

        assert!(player.is_ready());
        assert_eq!(player.duration(), 12.5);
        assert_eq!(player.position(), 3.0);
        assert_eq!(player.extents(), (1280, 720));
        assert_eq!(player.width(), 1280);
        assert_eq!(player.height(), 720);
    }

    #[test]
    fn test_negative_extents_are_unknown() {
        let mut player = opened();
        player.engine_mut().extents = (-1, 480);
        assert_eq!(player.extents(), (0, 480));
    }

    #[test]
    fn test_state_serializes_for_reports() {
        let mut player = opened();
        player.start().unwrap();
        assert_eq!(serde_json::to_string(&player.state()).unwrap(), "\"playing\"");
        player.release();
        assert_eq!(serde_json::to_string(&player.state()).unwrap(), "\"released\"");
    }

    #[test]
    fn test_queries_after_release_are_neutral() {
        let mut player = opened();
        {
            let engine = player.engine_mut();
            engine.ready = true;
            engine.duration = 8.0;
            engine.extents = (640, 480);
            engine.frame = 0x4000;
        }
        player.release();

        assert!(!player.is_ready());
        assert_eq!(player.duration(), 0.0);
        assert_eq!(player.extents(), (0, 0));
        assert!(player.current_frame().is_none());
    }
}
