//! Error types for the loader, configuration and `?`-style native results.

use std::path::PathBuf;
use thiserror::Error;

use crate::status::ErrorCode;

/// A non-success native result, for callers that prefer `Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("native engine returned {0}")]
pub struct NativeError(pub(crate) ErrorCode);

impl NativeError {
    pub fn code(&self) -> ErrorCode {
        self.0
    }
}

/// A command was issued after the player was released. Not a native result:
/// the engine was never called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("player released")]
pub struct Released;

/// The native engine library could not be brought up. Fatal for the host's
/// startup sequence; there is nothing the bridge can retry.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load engine library {path}: {source}")]
    Library {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("Engine library {path} is missing symbol {symbol}")]
    MissingSymbol {
        path: PathBuf,
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },
    #[error("No engine library found (tried: {tried:?})")]
    NotFound { tried: Vec<PathBuf> },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
