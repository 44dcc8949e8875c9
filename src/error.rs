// Error taxonomy for dataset generation
// Every variant aborts the run; nothing here is retried

use std::path::PathBuf;
use thiserror::Error;

use crate::audio::AudioError;
use crate::config::ConfigError;
use crate::pipeline::TraceError;
use crate::render::EffectError;

#[derive(Debug, Error)]
pub enum GtfxError {
    /// Unknown effect type, missing root path or bad environment value
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Guitar, string or fret outside the known domain
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("IO error at {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dry signal unreadable or wet signal unwritable
    #[error("Audio error at {}: {}", .path.display(), .source)]
    Audio {
        path: PathBuf,
        #[source]
        source: AudioError,
    },

    #[error("Label error at {}: {}", .path.display(), .source)]
    Label {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Effect application failed: {0}")]
    EffectApplication(#[from] EffectError),

    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),
}

pub type Result<T> = std::result::Result<T, GtfxError>;
