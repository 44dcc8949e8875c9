// Effect Processing
// Offline guitar effects applied to whole, already-normalized buffers

use thiserror::Error;

use super::params::EffectParams;
use crate::audio::AudioData;

#[derive(Debug, Error)]
pub enum EffectError {
    #[error("Unknown parameter '{name}' for {effect}")]
    UnknownParameter { effect: &'static str, name: String },

    #[error("Invalid value {value} for {effect} parameter '{name}'")]
    InvalidValue {
        effect: &'static str,
        name: String,
        value: f64,
    },

    #[error("{effect} cannot process {channels}-channel audio")]
    UnsupportedChannels { effect: &'static str, channels: u16 },
}

/// An audio transform built from one parameter mapping
pub trait Effect {
    fn name(&self) -> &'static str;

    /// Process a complete buffer; output has the same format and length
    fn process(&mut self, input: &AudioData) -> Result<AudioData, EffectError>;
}

fn check_known(
    effect: &'static str,
    params: &EffectParams,
    known: &[&str],
) -> Result<(), EffectError> {
    match params.names().find(|name| !known.contains(name)) {
        Some(name) => Err(EffectError::UnknownParameter {
            effect,
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}

fn param_in_range(
    effect: &'static str,
    params: &EffectParams,
    name: &str,
    default: f64,
    range: (f64, f64),
) -> Result<f32, EffectError> {
    let value = params.get(name).unwrap_or(default);
    if !value.is_finite() || value < range.0 || value > range.1 {
        return Err(EffectError::InvalidValue {
            effect,
            name: name.to_string(),
            value,
        });
    }
    Ok(value as f32)
}

/// Convert decibels to linear gain
pub fn db_to_gain(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

// ==================== DISTORTION ====================

/// Drive distortion: input gain followed by a tanh waveshaper
#[derive(Debug, Clone, PartialEq)]
pub struct Distortion {
    pub drive_db: f32,
}

impl Distortion {
    pub const NAME: &'static str = "distortion";
    pub const PARAMETERS: &'static [&'static str] = &["drive_db"];
    pub const DEFAULT_DRIVE_DB: f64 = 25.0;

    pub fn from_params(params: &EffectParams) -> Result<Self, EffectError> {
        check_known(Self::NAME, params, Self::PARAMETERS)?;
        let drive_db = param_in_range(
            Self::NAME,
            params,
            "drive_db",
            Self::DEFAULT_DRIVE_DB,
            (f64::MIN, f64::MAX),
        )?;
        Ok(Distortion { drive_db })
    }
}

impl Effect for Distortion {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn process(&mut self, input: &AudioData) -> Result<AudioData, EffectError> {
        let gain = db_to_gain(self.drive_db);
        let samples = input.samples.iter().map(|&s| (s * gain).tanh()).collect();
        Ok(input.with_samples(samples))
    }
}

// ==================== REVERB ====================

// Freeverb tunings at 44.1 kHz, scaled to the actual sample rate
const COMB_TUNINGS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNINGS: [usize; 4] = [556, 441, 341, 225];
const STEREO_SPREAD: usize = 23;

const FIXED_GAIN: f32 = 0.015;
const SCALE_WET: f32 = 3.0;
const SCALE_DRY: f32 = 2.0;
const SCALE_DAMP: f32 = 0.4;
const SCALE_ROOM: f32 = 0.28;
const OFFSET_ROOM: f32 = 0.7;
const ALLPASS_FEEDBACK: f32 = 0.5;

struct CombFilter {
    buffer: Vec<f32>,
    index: usize,
    last: f32,
}

impl CombFilter {
    fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            index: 0,
            last: 0.0,
        }
    }

    fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let output = self.buffer[self.index];
        // One-pole lowpass in the feedback path
        self.last = output * (1.0 - damp) + self.last * damp;
        self.buffer[self.index] = input + self.last * feedback;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

struct AllpassFilter {
    buffer: Vec<f32>,
    index: usize,
}

impl AllpassFilter {
    fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            index: 0,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let buffered = self.buffer[self.index];
        self.buffer[self.index] = input + buffered * ALLPASS_FEEDBACK;
        self.index = (self.index + 1) % self.buffer.len();
        buffered - input
    }
}

/// 8 parallel combs into 4 series allpasses, one per output channel
struct Tank {
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
}

impl Tank {
    fn new(sample_rate: u32, spread: usize) -> Self {
        let scale = |tuning: usize| (sample_rate as usize * (tuning + spread)) / 44100;
        Self {
            combs: COMB_TUNINGS.iter().map(|&t| CombFilter::new(scale(t))).collect(),
            allpasses: ALLPASS_TUNINGS
                .iter()
                .map(|&t| AllpassFilter::new(scale(t)))
                .collect(),
        }
    }

    fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let mut output = 0.0;
        for comb in &mut self.combs {
            output += comb.process(input, damp, feedback);
        }
        for allpass in &mut self.allpasses {
            output = allpass.process(output);
        }
        output
    }
}

/// Freeverb-style room reverb; output length equals input length
#[derive(Debug, Clone, PartialEq)]
pub struct Reverb {
    pub room_size: f32,
    pub damping: f32,
    pub wet_level: f32,
    pub dry_level: f32,
    pub width: f32,
}

impl Default for Reverb {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet_level: 0.33,
            dry_level: 0.4,
            width: 1.0,
        }
    }
}

impl Reverb {
    pub const NAME: &'static str = "reverb";
    pub const PARAMETERS: &'static [&'static str] =
        &["room_size", "damping", "wet_level", "dry_level", "width"];

    pub fn from_params(params: &EffectParams) -> Result<Self, EffectError> {
        check_known(Self::NAME, params, Self::PARAMETERS)?;
        let defaults = Reverb::default();
        let unit = (0.0, 1.0);
        Ok(Reverb {
            room_size: param_in_range(Self::NAME, params, "room_size", defaults.room_size as f64, unit)?,
            damping: param_in_range(Self::NAME, params, "damping", defaults.damping as f64, unit)?,
            wet_level: param_in_range(Self::NAME, params, "wet_level", defaults.wet_level as f64, unit)?,
            dry_level: param_in_range(Self::NAME, params, "dry_level", defaults.dry_level as f64, unit)?,
            width: param_in_range(Self::NAME, params, "width", defaults.width as f64, unit)?,
        })
    }
}

impl Effect for Reverb {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn process(&mut self, input: &AudioData) -> Result<AudioData, EffectError> {
        let feedback = self.room_size * SCALE_ROOM + OFFSET_ROOM;
        let damp = self.damping * SCALE_DAMP;
        let wet = self.wet_level * SCALE_WET;
        let dry = self.dry_level * SCALE_DRY;
        let wet1 = 0.5 * wet * (1.0 + self.width);
        let wet2 = 0.5 * wet * (1.0 - self.width);

        let mut output = Vec::with_capacity(input.samples.len());
        match input.channels {
            1 => {
                let mut tank = Tank::new(input.sample_rate, 0);
                for &s in &input.samples {
                    let out = tank.process(s * FIXED_GAIN, damp, feedback);
                    output.push(out * wet1 + s * dry);
                }
            }
            2 => {
                let mut left = Tank::new(input.sample_rate, 0);
                let mut right = Tank::new(input.sample_rate, STEREO_SPREAD);
                for frame in input.samples.chunks_exact(2) {
                    let (l, r) = (frame[0], frame[1]);
                    let mixed = (l + r) * FIXED_GAIN;
                    let out_l = left.process(mixed, damp, feedback);
                    let out_r = right.process(mixed, damp, feedback);
                    output.push(out_l * wet1 + out_r * wet2 + l * dry);
                    output.push(out_r * wet1 + out_l * wet2 + r * dry);
                }
            }
            channels => {
                return Err(EffectError::UnsupportedChannels {
                    effect: Self::NAME,
                    channels,
                })
            }
        }

        Ok(input.with_samples(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::rms;
    use approx::assert_relative_eq;

    fn impulse(channels: u16, frames: usize) -> AudioData {
        let mut samples = vec![0.0; frames * channels as usize];
        for ch in 0..channels as usize {
            samples[ch] = 1.0;
        }
        AudioData::new(samples, 44100, channels)
    }

    #[test]
    fn test_db_to_gain() {
        assert_relative_eq!(db_to_gain(0.0), 1.0);
        assert_relative_eq!(db_to_gain(20.0), 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_distortion_defaults_and_unknown_params() {
        let d = Distortion::from_params(&EffectParams::new()).unwrap();
        assert_eq!(d.drive_db, 25.0);

        let err = Distortion::from_params(&EffectParams::new().with("room_size", 0.5));
        assert!(matches!(err, Err(EffectError::UnknownParameter { .. })));
    }

    #[test]
    fn test_distortion_bounds_output() {
        let mut d = Distortion::from_params(&EffectParams::new().with("drive_db", 50.0)).unwrap();
        let input = AudioData::new(vec![0.1, -0.2, 0.05, 0.0], 44100, 1);
        let output = d.process(&input).unwrap();

        assert_eq!(output.samples.len(), 4);
        assert!(output.samples.iter().all(|s| s.abs() <= 1.0));
        // heavy drive saturates
        assert!(output.samples[0] > 0.99);
        assert!(output.samples[1] < -0.99);
        assert_eq!(output.samples[3], 0.0);
    }

    #[test]
    fn test_distortion_rejects_nan() {
        let err = Distortion::from_params(&EffectParams::new().with("drive_db", f64::NAN));
        assert!(matches!(err, Err(EffectError::InvalidValue { .. })));
    }

    #[test]
    fn test_reverb_rejects_out_of_range() {
        let err = Reverb::from_params(&EffectParams::new().with("room_size", 1.5));
        assert!(matches!(err, Err(EffectError::InvalidValue { .. })));
    }

    #[test]
    fn test_reverb_adds_tail() {
        let mut reverb = Reverb::from_params(&EffectParams::new().with("room_size", 0.9)).unwrap();
        let input = impulse(1, 44100);
        let output = reverb.process(&input).unwrap();

        assert_eq!(output.samples.len(), input.samples.len());
        assert!(output.samples.iter().all(|s| s.is_finite()));
        // energy long after the impulse
        assert!(rms(&output.samples[20000..]) > 0.0);
    }

    #[test]
    fn test_larger_room_decays_longer() {
        let input = impulse(1, 44100);
        let mut small = Reverb::from_params(&EffectParams::new().with("room_size", 0.1)).unwrap();
        let mut large = Reverb::from_params(&EffectParams::new().with("room_size", 1.0)).unwrap();

        let small_tail = rms(&small.process(&input).unwrap().samples[30000..]);
        let large_tail = rms(&large.process(&input).unwrap().samples[30000..]);

        assert!(large_tail > small_tail);
    }

    #[test]
    fn test_reverb_stereo_preserves_layout() {
        let mut reverb = Reverb::default();
        let input = impulse(2, 4096);
        let output = reverb.process(&input).unwrap();

        assert_eq!(output.channels, 2);
        assert_eq!(output.frame_count(), 4096);
    }

    #[test]
    fn test_reverb_rejects_surround() {
        let mut reverb = Reverb::default();
        let input = AudioData::new(vec![0.0; 12], 44100, 6);
        assert!(matches!(
            reverb.process(&input),
            Err(EffectError::UnsupportedChannels { channels: 6, .. })
        ));
    }
}
