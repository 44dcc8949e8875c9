// Audio export module
// Encodes wet signals to FLAC (16-bit PCM) or WAV (32-bit float)

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config::Encoder as EncoderConfig;
use flacenc::encode_with_fixed_block_size;
use flacenc::error::Verify;
use flacenc::source::MemSource;
use hound::{SampleFormat, WavSpec, WavWriter};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::ingest::{AudioData, AudioError};

/// Samples per FLAC frame
const FLAC_BLOCK_SIZE: usize = 4096;

/// Bit depth used for FLAC output
const FLAC_BITS_PER_SAMPLE: usize = 16;

/// Container chosen from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Flac,
    Wav,
}

impl AudioFormat {
    pub fn from_path(path: &Path) -> Result<Self, AudioError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("flac") => Ok(AudioFormat::Flac),
            Some("wav") => Ok(AudioFormat::Wav),
            other => Err(AudioError::UnsupportedFormat(format!(
                "cannot write audio with extension {:?}",
                other
            ))),
        }
    }
}

/// Summary of a file written by `write_audio`
#[derive(Debug, Clone)]
pub struct WrittenAudio {
    pub bytes: usize,
    pub sha256: String,
}

/// Encode audio and write it to `path`, creating parent directories as needed
/// The file appears under its final name only once fully written
pub fn write_audio(path: &Path, audio: &AudioData) -> Result<WrittenAudio, AudioError> {
    let data = match AudioFormat::from_path(path)? {
        AudioFormat::Flac => encode_flac(audio)?,
        AudioFormat::Wav => encode_wav(audio)?,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let partial = partial_path(path);
    if let Err(e) = fs::write(&partial, &data).and_then(|_| fs::rename(&partial, path)) {
        if partial.exists() {
            if let Err(remove_err) = fs::remove_file(&partial) {
                log::warn!("Failed to remove {}: {}", partial.display(), remove_err);
            }
        }
        return Err(e.into());
    }

    Ok(WrittenAudio {
        bytes: data.len(),
        sha256: calculate_sha256(&data),
    })
}

/// Sibling used while writing, e.g. `gtfx00000000.flac.partial`
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Encode audio to FLAC in memory
pub fn encode_flac(audio: &AudioData) -> Result<Vec<u8>, AudioError> {
    validate(audio)?;

    let int_samples: Vec<i32> = audio.samples.iter().map(|&s| float_to_i16_range(s)).collect();

    let encoder_config = EncoderConfig::default()
        .into_verified()
        .map_err(|e| AudioError::FlacEncodeError(format!("invalid FLAC config: {:?}", e)))?;

    let source = MemSource::from_samples(
        &int_samples,
        audio.channels as usize,
        FLAC_BITS_PER_SAMPLE,
        audio.sample_rate as usize,
    );

    let stream = encode_with_fixed_block_size(&encoder_config, source, FLAC_BLOCK_SIZE)
        .map_err(|e| AudioError::FlacEncodeError(format!("{:?}", e)))?;

    let mut sink = ByteSink::new();
    stream
        .write(&mut sink)
        .map_err(|e| AudioError::FlacEncodeError(format!("failed to write stream: {:?}", e)))?;

    Ok(sink.into_inner())
}

/// Encode audio to 32-bit float WAV in memory
pub fn encode_wav(audio: &AudioData) -> Result<Vec<u8>, AudioError> {
    validate(audio)?;

    let spec = WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in &audio.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// Calculate SHA256 hash of data
pub fn calculate_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn validate(audio: &AudioData) -> Result<(), AudioError> {
    if audio.channels == 0 {
        return Err(AudioError::InvalidData("zero channels".to_string()));
    }
    if audio.sample_rate == 0 {
        return Err(AudioError::InvalidData("zero sample rate".to_string()));
    }
    if audio.samples.len() % audio.channels as usize != 0 {
        return Err(AudioError::InvalidData(format!(
            "{} samples do not divide into {} channels",
            audio.samples.len(),
            audio.channels
        )));
    }
    Ok(())
}

/// Clip to [-1.0, 1.0] and scale to the signed 16-bit range, rounding to nearest
#[inline]
fn float_to_i16_range(sample: f32) -> i32 {
    let clamped = if sample.is_finite() {
        sample.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    (clamped * 32767.0).round() as i32
}
