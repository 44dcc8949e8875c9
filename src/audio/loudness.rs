// Loudness normalization
// Rescales a signal so its RMS matches a target level

use super::ingest::AudioData;

/// Target root-mean-square level for dry signals
pub const DEFAULT_TARGET_RMS: f32 = 0.1;

/// Floor for the measured RMS, keeps silence from blowing up the gain
pub const DEFAULT_EPS: f32 = 1.0e-8;

/// Root-mean-square over every sample (all channels together)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

/// Scale `samples` by `target_rms / max(rms, eps)`
pub fn normalize(samples: &[f32], target_rms: f32, eps: f32) -> Vec<f32> {
    let gain = target_rms / rms(samples).max(eps);
    samples.iter().map(|&s| s * gain).collect()
}

/// Normalize with the default target and floor
pub fn normalize_loudness(audio: &AudioData) -> AudioData {
    audio.with_samples(normalize(&audio.samples, DEFAULT_TARGET_RMS, DEFAULT_EPS))
}
