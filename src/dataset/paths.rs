// File system layout for dry signals and generated dataset entries
use std::path::{Path, PathBuf};

use super::catalog::EffectType;
use super::models::{Guitar, GuitarPlay, FRET_COUNT, STRING_COUNT};

/// Digits in dry-signal indices and dataset serial numbers
pub const SERIAL_WIDTH: usize = 8;

/// Extension for dry and wet audio files
pub const AUDIO_EXTENSION: &str = "flac";

pub const LABEL_EXTENSION: &str = "json";

const DRY_PREFIX: &str = "gt";
const WET_PREFIX: &str = "gtfx";

/// Resolves every path the generator reads or writes
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetPaths {
    dry_root: PathBuf,
    dataset_root: PathBuf,
}

impl DatasetPaths {
    pub fn new(dry_root: impl Into<PathBuf>, dataset_root: impl Into<PathBuf>) -> Self {
        DatasetPaths {
            dry_root: dry_root.into(),
            dataset_root: dataset_root.into(),
        }
    }

    pub fn dry_root(&self) -> &Path {
        &self.dry_root
    }

    pub fn dataset_root(&self) -> &Path {
        &self.dataset_root
    }

    /// `<dry_root>/data/<guitar>/audio/gtNNNNNNNN.flac`
    pub fn dry_signal_path(&self, play: &GuitarPlay) -> PathBuf {
        self.dry_root
            .join(play.guitar().dry_subpath())
            .join(numbered_file(DRY_PREFIX, dry_index(play) as u64, AUDIO_EXTENSION))
    }

    /// `<dataset_root>/data/<guitar>/<effect>`
    pub fn partition_dir(&self, guitar: Guitar, effect_type: EffectType) -> PathBuf {
        self.dataset_root
            .join("data")
            .join(guitar.as_str())
            .join(effect_type.as_str())
    }

    pub fn wet_signal_path(&self, guitar: Guitar, effect_type: EffectType, serial: u64) -> PathBuf {
        self.partition_dir(guitar, effect_type)
            .join("audio")
            .join(numbered_file(WET_PREFIX, serial, AUDIO_EXTENSION))
    }

    pub fn label_path(&self, guitar: Guitar, effect_type: EffectType, serial: u64) -> PathBuf {
        self.partition_dir(guitar, effect_type)
            .join("label")
            .join(numbered_file(WET_PREFIX, serial, LABEL_EXTENSION))
    }

    /// Run trace, appended to by every run against this dataset
    pub fn trace_path(&self) -> PathBuf {
        self.dataset_root.join("trace.jsonl")
    }
}

/// Flat index of a recording: guitar group, then string, then fret
pub fn dry_index(play: &GuitarPlay) -> u32 {
    let per_guitar = STRING_COUNT as u32 * FRET_COUNT as u32;
    play.guitar().index() * per_guitar
        + (play.string() as u32 - 1) * FRET_COUNT as u32
        + play.fret() as u32
}

fn numbered_file(prefix: &str, number: u64, extension: &str) -> String {
    format!(
        "{}{:0width$}.{}",
        prefix,
        number,
        extension,
        width = SERIAL_WIDTH
    )
}
