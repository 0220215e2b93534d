// Runtime-loaded native engine
//
// Loads the engine's shared library with libloading and resolves the UAVP_*
// entry points once. No link-time dependency on the engine.
//
// Lookup order for load_default():
// 1. $TEXBRIDGE_ENGINE (explicit path)
// 2. next to the executable
// 3. the platform default name, resolved by the system loader

use std::ffi::{c_char, c_void, CString};
use std::path::{Path, PathBuf};

use libloading::Library;

use crate::error::LoadError;
use crate::native::{FrameHandle, NativeEngine};
use crate::status::{ErrorCode, LogLevel};

/// Environment variable naming the engine library to load.
pub const ENGINE_ENV: &str = "TEXBRIDGE_ENGINE";

const LIBRARY_STEM: &str = "uavplayer";

// ============================================================================
// Function Types
// ============================================================================

type CanOutputToTextureFn = unsafe extern "C" fn(*const c_char) -> bool;
type PlayerReadyFn = unsafe extern "C" fn() -> bool;
type SecondsFn = unsafe extern "C" fn() -> f32;
type VideoExtentsFn = unsafe extern "C" fn(*mut i32, *mut i32);
type CurFrameTextureFn = unsafe extern "C" fn() -> *mut c_void;
type InitPlayerFn = unsafe extern "C" fn() -> i32;
type SetLogLevelFn = unsafe extern "C" fn(i32);
type OpenVideoFn = unsafe extern "C" fn(*const c_char) -> i32;
type PlayVideoFn = unsafe extern "C" fn() -> i32;
type VoidFn = unsafe extern "C" fn();

// ============================================================================
// Loaded Functions Container
// ============================================================================

struct EngineFns {
    can_output_to_texture: CanOutputToTextureFn,
    player_ready: PlayerReadyFn,
    duration_seconds: SecondsFn,
    current_seconds: SecondsFn,
    video_extents: VideoExtentsFn,
    cur_frame_texture: CurFrameTextureFn,
    init_player: InitPlayerFn,
    open_video: OpenVideoFn,
    play_video: PlayVideoFn,
    pause_video: VoidFn,
    resume_video: VoidFn,
    release_player: VoidFn,
    // Older engine builds have no log level entry point.
    set_log_level: Option<SetLogLevelFn>,
}

unsafe fn required<T: Copy>(lib: &Library, path: &Path, symbol: &'static str) -> Result<T, LoadError> {
    lib.get::<T>(symbol.as_bytes())
        .map(|sym| *sym)
        .map_err(|source| LoadError::MissingSymbol {
            path: path.to_path_buf(),
            symbol,
            source,
        })
}

impl EngineFns {
    unsafe fn resolve(lib: &Library, path: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            can_output_to_texture: required(lib, path, "UAVP_CanOutputToTexture")?,
            player_ready: required(lib, path, "UAVP_PlayerReady")?,
            duration_seconds: required(lib, path, "UAVP_DurationSeconds")?,
            current_seconds: required(lib, path, "UAVP_CurrentSeconds")?,
            video_extents: required(lib, path, "UAVP_VideoExtents")?,
            cur_frame_texture: required(lib, path, "UAVP_CurFrameTexture")?,
            init_player: required(lib, path, "UAVP_InitPlayer")?,
            open_video: required(lib, path, "UAVP_OpenVideo")?,
            play_video: required(lib, path, "UAVP_PlayVideo")?,
            pause_video: required(lib, path, "UAVP_PauseVideo")?,
            resume_video: required(lib, path, "UAVP_ResumeVideo")?,
            release_player: required(lib, path, "UAVP_ReleasePlayer")?,
            set_log_level: lib
                .get::<SetLogLevelFn>(b"UAVP_SetLogLevel")
                .map(|sym| *sym)
                .ok(),
        })
    }
}

// ============================================================================
// Dynamic Engine
// ============================================================================

/// Engine backed by a shared library loaded at runtime.
pub struct DynamicEngine {
    fns: EngineFns,
    path: PathBuf,
    // Keeps the function pointers in `fns` valid; must outlive them.
    _lib: Library,
}

impl DynamicEngine {
    /// Load the engine from an explicit path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();

        let lib = unsafe {
            Library::new(&path).map_err(|source| LoadError::Library {
                path: path.clone(),
                source,
            })?
        };
        let fns = unsafe { EngineFns::resolve(&lib, &path)? };

        tracing::info!(
            "Engine library loaded from {} (log level control: {})",
            path.display(),
            fns.set_log_level.is_some()
        );

        Ok(Self { fns, path, _lib: lib })
    }

    /// Load the engine using the default lookup order.
    pub fn load_default() -> Result<Self, LoadError> {
        if let Some(path) = std::env::var_os(ENGINE_ENV) {
            return Self::load(PathBuf::from(path));
        }

        let file_name = PathBuf::from(libloading::library_filename(LIBRARY_STEM));
        let mut tried = Vec::new();

        if let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
            let bundled = dir.join(&file_name);
            if bundled.exists() {
                match Self::load(&bundled) {
                    Ok(engine) => return Ok(engine),
                    Err(e) => tracing::warn!("{}", e),
                }
            }
            tried.push(bundled);
        }

        match Self::load(&file_name) {
            Ok(engine) => Ok(engine),
            Err(e) => {
                tracing::warn!("{}", e);
                tried.push(file_name);
                Err(LoadError::NotFound { tried })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn c_string(uri: &str) -> Option<CString> {
    match CString::new(uri) {
        Ok(s) => Some(s),
        Err(_) => {
            tracing::warn!("URI contains an interior NUL and cannot cross the engine boundary: {:?}", uri);
            None
        }
    }
}

impl NativeEngine for DynamicEngine {
    fn can_output_to_texture(&self, uri: &str) -> bool {
        let Some(uri) = c_string(uri) else { return false };
        unsafe { (self.fns.can_output_to_texture)(uri.as_ptr()) }
    }

    fn player_ready(&self) -> bool {
        unsafe { (self.fns.player_ready)() }
    }

    fn duration_seconds(&self) -> f32 {
        unsafe { (self.fns.duration_seconds)() }
    }

    fn current_seconds(&self) -> f32 {
        unsafe { (self.fns.current_seconds)() }
    }

    fn video_extents(&self) -> (i32, i32) {
        let mut w = 0;
        let mut h = 0;
        unsafe { (self.fns.video_extents)(&mut w, &mut h) };
        (w, h)
    }

    fn cur_frame_texture(&self) -> Option<FrameHandle> {
        FrameHandle::from_raw(unsafe { (self.fns.cur_frame_texture)() })
    }

    fn init_player(&mut self, log_level: LogLevel) -> ErrorCode {
        match self.fns.set_log_level {
            Some(set_log_level) => unsafe { set_log_level(log_level.as_raw()) },
            None => tracing::debug!("Engine has no UAVP_SetLogLevel, ignoring {:?}", log_level),
        }
        ErrorCode::from_raw(unsafe { (self.fns.init_player)() })
    }

    fn open_video(&mut self, uri: &str) -> ErrorCode {
        let Some(uri) = c_string(uri) else { return ErrorCode::OPEN_FAILED };
        ErrorCode::from_raw(unsafe { (self.fns.open_video)(uri.as_ptr()) })
    }

    fn play_video(&mut self) -> ErrorCode {
        ErrorCode::from_raw(unsafe { (self.fns.play_video)() })
    }

    fn pause_video(&mut self) {
        unsafe { (self.fns.pause_video)() }
    }

    fn resume_video(&mut self) {
        unsafe { (self.fns.resume_video)() }
    }

    fn release_player(&mut self) {
        unsafe { (self.fns.release_player)() }
    }

    fn name(&self) -> &str {
        "dynamic"
    }
}

// ============================================================================
// Tests
// ============================================================================
