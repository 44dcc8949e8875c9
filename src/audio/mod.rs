// Audio processing module
// Handles dry signal decoding, wet signal encoding and loudness normalization

pub mod export;
pub mod ingest;
pub mod loudness;

pub use export::{calculate_sha256, write_audio, AudioFormat, WrittenAudio};
pub use ingest::{load_audio, AudioData, AudioError};
pub use loudness::{normalize, normalize_loudness, rms};
