//! Status vocabulary shared by every component: native result codes,
//! log severities and media kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NativeError;

// ============================================================================
// Error Codes
// ============================================================================

/// Result code returned by native commands.
///
/// The set of codes is owned by the engine. Only the values the bridge itself
/// produces or inspects are named; anything else is carried through untouched.
/// Display never guesses a meaning for non-zero codes, since the same value
/// may come from any command.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(i32);

impl ErrorCode {
    /// The command completed.
    pub const NONE: ErrorCode = ErrorCode(0);
    /// The source was rejected, either by the capability probe or by the engine's open call.
    pub const OPEN_FAILED: ErrorCode = ErrorCode(1);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    pub const fn is_ok(self) -> bool {
        self.0 == Self::NONE.0
    }

    /// Convert into a `Result` for callers that want to use `?`.
    pub fn into_result(self) -> Result<(), NativeError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(NativeError(self))
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => f.write_str("no error"),
            Self(raw) => write!(f, "error code {}", raw),
        }
    }
}

// ============================================================================
// Log Levels
// ============================================================================

/// Log severity forwarded to the native engine at init.
///
/// Ordered from most to least chatty; the engine decides what each level means.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Verbose = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warning = 3,
    Error = 4,
}

impl LogLevel {
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" | "trace" => Ok(Self::Verbose),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

// ============================================================================
// Media Types
// ============================================================================

/// Kind of media handed to `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// A file on local storage or inside the app bundle.
    #[default]
    Video,
    /// A network stream.
    Stream,
}

impl MediaType {
    /// Guess the media type from a URI: network schemes are streams, everything
    /// else (plain paths, `file://`) is treated as a local video.
    pub fn infer(uri: &str) -> Self {
        match url::Url::parse(uri) {
            Ok(parsed) => match parsed.scheme() {
                "http" | "https" | "rtsp" | "rtmp" | "srt" => Self::Stream,
                _ => Self::Video,
            },
            Err(_) => Self::Video,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
