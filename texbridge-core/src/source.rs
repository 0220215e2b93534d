//! # Video Source
//!
//! Host-facing surface: one engine instance, its texture bridge and the
//! playback flags a host sets from its inspector or config file.
//!
//! ```ignore
//! let engine = texbridge_core::platform_engine()?;
//! let mut source = VideoSource::new(engine, textures, SourceConfig::default());
//! source.init();
//! if source.open("clip.mp4", MediaType::Video).is_ok() {
//!     source.start();
//! }
//! // every render tick:
//! if let Some(texture) = source.current_frame_texture() { /* draw */ }
//! ```

use crate::config::{SourceConfig, Volume};
use crate::error::Released;
use crate::native::NativeEngine;
use crate::player::{Player, PlayerState};
use crate::status::{ErrorCode, LogLevel, MediaType};
use crate::texture::{TextureBridge, TextureFactory};

pub struct VideoSource<E: NativeEngine, F: TextureFactory> {
    player: Player<E>,
    textures: TextureBridge<F>,
    log_level: LogLevel,
    volume: Volume,
    mute: bool,
    looping: bool,
    auto_play: bool,
}

impl<E: NativeEngine, F: TextureFactory> VideoSource<E, F> {
    pub fn new(engine: E, factory: F, config: SourceConfig) -> Self {
        Self {
            player: Player::new(engine),
            textures: TextureBridge::new(factory),
            log_level: config.log_level,
            volume: Volume::from_percent(config.volume),
            mute: config.mute,
            looping: config.looping,
            auto_play: config.auto_play,
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Initialize the engine with the configured log level.
    pub fn init(&mut self) -> ErrorCode {
        self.player.init(self.log_level)
    }

    /// Open a source; with auto-play on, playback starts right after a
    /// successful open. Returns the open result.
    pub fn open(&mut self, uri: &str, media_type: MediaType) -> ErrorCode {
        let code = self.player.open(uri, media_type);
        if code.is_ok() && self.auto_play {
            tracing::debug!("Auto-play enabled, starting playback");
            match self.player.start() {
                Ok(started) if !started.is_ok() => {
                    tracing::warn!("Auto-play start failed: {}", started);
                }
                Ok(_) => {}
                Err(released) => tracing::warn!("Auto-play start failed: {}", released),
            }
        }
        code
    }

    pub fn start(&mut self) -> Result<ErrorCode, Released> {
        self.player.start()
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn resume(&mut self) {
        self.player.resume();
    }

    /// Release the engine and drop the texture bound to its frames.
    pub fn release(&mut self) {
        self.textures.reset();
        self.player.release();
    }

    // ------------------------------------------------------------------------
    // Per-frame
    // ------------------------------------------------------------------------

    /// Texture for this render tick, `None` when there is nothing to draw.
    pub fn current_frame_texture(&mut self) -> Option<&F::Texture> {
        self.textures.current_frame_texture(&self.player)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn is_ready(&self) -> bool {
        self.player.is_ready()
    }

    pub fn duration(&self) -> f32 {
        self.player.duration()
    }

    pub fn position(&self) -> f32 {
        self.player.position()
    }

    pub fn width(&self) -> u32 {
        self.player.width()
    }

    pub fn height(&self) -> u32 {
        self.player.height()
    }

    pub fn state(&self) -> PlayerState {
        self.player.state()
    }

    pub fn player(&self) -> &Player<E> {
        &self.player
    }

    pub fn textures(&self) -> &TextureBridge<F> {
        &self.textures
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Set the volume from a percentage; out-of-range input is clamped.
    pub fn set_volume(&mut self, percent: f32) {
        self.volume = Volume::from_percent(percent);
    }

    /// Gain to apply to audio output: zero while muted.
    pub fn effective_gain(&self) -> f32 {
        if self.mute {
            0.0
        } else {
            self.volume.gain()
        }
    }

    pub fn is_muted(&self) -> bool {
        self.mute
    }

    pub fn set_muted(&mut self, mute: bool) {
        self.mute = mute;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn auto_play(&self) -> bool {
        self.auto_play
    }

    pub fn set_auto_play(&mut self, auto_play: bool) {
        self.auto_play = auto_play;
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Takes effect at the next `init`.
    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spy::{Call, CountingTextures, SpyEngine};

    fn source(engine: SpyEngine, config: SourceConfig) -> VideoSource<SpyEngine, CountingTextures> {
        VideoSource::new(engine, CountingTextures::default(), config)
    }

    #[test]
    fn test_clip_playback_scenario() {
        let mut source = source(SpyEngine::playable(), SourceConfig::default());

        assert_eq!(source.init(), ErrorCode::NONE);
        assert!(crate::probe::can_output_to_texture(source.player().engine(), "clip.mp4"));
        assert_eq!(source.open("clip.mp4", MediaType::Video), ErrorCode::NONE);
        assert_eq!(source.start(), Ok(ErrorCode::NONE));
        assert_eq!(
            source.player().engine().calls,
            vec![
                Call::Init(LogLevel::Info),
                Call::Open("clip.mp4".to_string()),
                Call::Play
            ]
        );

        {
            let engine = source.player.engine_mut();
            engine.ready = true;
            engine.extents = (1920, 1080);
            engine.frame = 0xA000;
        }

        // tick 1: first frame allocates
        let first = source.current_frame_texture().unwrap();
        assert_eq!((first.id, first.width, first.height), (1, 1920, 1080));

        // tick 2: same frame, same size, same texture
        let second = source.current_frame_texture().unwrap();
        assert_eq!((second.id, second.frame), (1, 0xA000));
        assert_eq!(source.textures().allocations(), 1);
        assert_eq!(source.textures().factory().updates, 1);

        // tick 3: engine drops its frame
        source.player.engine_mut().frame = 0;
        assert!(source.current_frame_texture().is_none());

        source.release();
        assert_eq!(source.state(), PlayerState::Released);
        assert_eq!(source.player().engine().count(&Call::Release), 1);
        assert!(source.current_frame_texture().is_none());
        assert_eq!(source.start(), Err(Released));
    }

    #[test]
    fn test_auto_play_starts_after_open() {
        let config = SourceConfig {
            auto_play: true,
            ..SourceConfig::default()
        };
        let mut source = source(SpyEngine::playable(), config);
        source.init();

        assert!(source.open("clip.mp4", MediaType::Video).is_ok());
        assert_eq!(source.state(), PlayerState::Playing);
        assert_eq!(source.player().engine().count(&Call::Play), 1);
    }

    #[test]
    fn test_auto_play_skipped_when_open_fails() {
        let config = SourceConfig {
            auto_play: true,
            ..SourceConfig::default()
        };
        let mut source = source(SpyEngine::default(), config);
        source.init();

        assert_eq!(source.open("clip.mp4", MediaType::Video), ErrorCode::OPEN_FAILED);
        assert_eq!(source.player().engine().count(&Call::Play), 0);
    }

    #[test]
    fn test_volume_and_mute() {
        let mut source = source(SpyEngine::default(), SourceConfig::default());
        assert_eq!(source.effective_gain(), 1.0);

        source.set_volume(150.0);
        assert_eq!(source.volume().gain(), 1.0);
        source.set_volume(-10.0);
        assert_eq!(source.volume().gain(), 0.0);
        source.set_volume(50.0);
        assert_eq!(source.volume().gain(), 0.5);
        assert_eq!(source.volume().percent(), 50.0);

        source.set_muted(true);
        assert_eq!(source.effective_gain(), 0.0);
        assert_eq!(source.volume().gain(), 0.5);
    }

    #[test]
    fn test_config_is_applied() {
        let config = SourceConfig {
            log_level: LogLevel::Error,
            volume: 250.0,
            looping: true,
            ..SourceConfig::default()
        };
        let mut source = source(SpyEngine::default(), config);

        assert_eq!(source.volume().gain(), 1.0);
        assert!(source.is_looping());
        source.init();
        assert_eq!(source.player().engine().calls, vec![Call::Init(LogLevel::Error)]);

        source.set_log_level(LogLevel::Debug);
        assert_eq!(source.log_level(), LogLevel::Debug);
    }
}
