// Dataset generation for one (play, effect) pair
// Loads the dry signal once and writes one audio/label pair per grid point

use std::fs;

use super::catalog::{EffectCatalog, EffectType};
use super::label::write_label;
use super::models::{DatasetEntry, EffectSpec, GuitarPlay};
use super::paths::DatasetPaths;
use crate::audio::{self, AudioData};
use crate::error::{GtfxError, Result};

pub struct DatasetGenerator<'a> {
    paths: &'a DatasetPaths,
    catalog: &'a EffectCatalog,
}

impl<'a> DatasetGenerator<'a> {
    pub fn new(paths: &'a DatasetPaths, catalog: &'a EffectCatalog) -> Self {
        DatasetGenerator { paths, catalog }
    }

    /// Generate every grid point for `effect_type`; returns the next unused serial
    pub fn generate(
        &self,
        play: &GuitarPlay,
        effect_type: EffectType,
        start_serial: u64,
    ) -> Result<u64> {
        let entries = self.generate_entries(play, effect_type, start_serial)?;
        Ok(start_serial + entries.len() as u64)
    }

    /// Same as `generate`, returning the written entries in serial order
    pub fn generate_entries(
        &self,
        play: &GuitarPlay,
        effect_type: EffectType,
        start_serial: u64,
    ) -> Result<Vec<DatasetEntry>> {
        let dry = self.load_dry_signal(play)?;
        let definition = self.catalog.definition(effect_type)?;
        let grid = definition.grid();

        let mut entries = Vec::with_capacity(grid.len());
        let mut serial = start_serial;
        for params in grid.iter() {
            let mut effect = definition.build(&params)?;
            let wet = effect.process(&dry)?;

            let fx = EffectSpec::new(effect_type).with_params(params);
            entries.push(self.write_entry(play, &fx, &wet, serial)?);
            serial += 1;
        }

        log::debug!(
            "{} {}: wrote serials {}..{}",
            play,
            effect_type,
            start_serial,
            serial
        );

        Ok(entries)
    }

    /// Dry recording for `play`, loudness-normalized
    pub fn load_dry_signal(&self, play: &GuitarPlay) -> Result<AudioData> {
        let path = self.paths.dry_signal_path(play);
        let dry = audio::load_audio(&path).map_err(|source| GtfxError::Audio {
            path: path.clone(),
            source,
        })?;
        Ok(audio::normalize_loudness(&dry))
    }

    /// Audio first, then label; a failed label removes the audio it would describe
    fn write_entry(
        &self,
        play: &GuitarPlay,
        fx: &EffectSpec,
        wet: &AudioData,
        serial: u64,
    ) -> Result<DatasetEntry> {
        let guitar = play.guitar();
        let audio_path = self.paths.wet_signal_path(guitar, fx.effect_type, serial);
        let label_path = self.paths.label_path(guitar, fx.effect_type, serial);

        let written = audio::write_audio(&audio_path, wet).map_err(|source| GtfxError::Audio {
            path: audio_path.clone(),
            source,
        })?;

        if let Err(e) = write_label(&label_path, play, fx) {
            if let Err(remove_err) = fs::remove_file(&audio_path) {
                log::warn!(
                    "Failed to remove {} after label error: {}",
                    audio_path.display(),
                    remove_err
                );
            }
            return Err(e);
        }

        Ok(DatasetEntry {
            serial,
            audio_path,
            label_path,
            audio_sha256: written.sha256,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{read_label, EffectDefinition, Guitar};
    use crate::render::EffectParams;
    use tempfile::TempDir;

    fn write_dry(paths: &DatasetPaths, play: &GuitarPlay) {
        let samples: Vec<f32> = (0..4410)
            .map(|i| 0.3 * (2.0 * std::f32::consts::PI * 110.0 * i as f32 / 44100.0).sin())
            .collect();
        audio::write_audio(&paths.dry_signal_path(play), &AudioData::new(samples, 44100, 1))
            .unwrap();
    }

    #[test]
    fn test_single_point_reverb() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DatasetPaths::new(temp_dir.path().join("dry"), temp_dir.path().join("out"));
        let catalog = EffectCatalog::from_definitions(vec![
            EffectDefinition::new(EffectType::Reverb).with_sweep("room_size", vec![0.5]),
        ]);
        let play = GuitarPlay::new(Guitar::Lp, 3, 5).unwrap();
        write_dry(&paths, &play);

        let generator = DatasetGenerator::new(&paths, &catalog);
        let next = generator.generate(&play, EffectType::Reverb, 7).unwrap();
        assert_eq!(next, 8);

        let audio_path = paths.wet_signal_path(Guitar::Lp, EffectType::Reverb, 7);
        assert!(audio_path.ends_with("data/lp/reverb/audio/gtfx00000007.flac"));
        assert!(audio_path.exists());

        let label = read_label(&paths.label_path(Guitar::Lp, EffectType::Reverb, 7)).unwrap();
        assert_eq!(label.fx.params, EffectParams::new().with("room_size", 0.5));
    }

    #[test]
    fn test_missing_dry_signal_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DatasetPaths::new(temp_dir.path().join("dry"), temp_dir.path().join("out"));
        let catalog = EffectCatalog::standard(1);
        let play = GuitarPlay::new(Guitar::Sc, 1, 0).unwrap();

        let generator = DatasetGenerator::new(&paths, &catalog);
        let result = generator.generate(&play, EffectType::Distortion, 0);

        assert!(matches!(result, Err(GtfxError::Audio { .. })));
        assert!(!paths.partition_dir(Guitar::Sc, EffectType::Distortion).exists());
    }

    #[test]
    fn test_invalid_parameter_aborts_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DatasetPaths::new(temp_dir.path().join("dry"), temp_dir.path().join("out"));
        let catalog = EffectCatalog::from_definitions(vec![
            EffectDefinition::new(EffectType::Reverb).with_sweep("room_size", vec![2.0]),
        ]);
        let play = GuitarPlay::new(Guitar::Tc, 2, 2).unwrap();
        write_dry(&paths, &play);

        let generator = DatasetGenerator::new(&paths, &catalog);
        let result = generator.generate(&play, EffectType::Reverb, 0);

        assert!(matches!(result, Err(GtfxError::EffectApplication(_))));
        assert!(!paths.partition_dir(Guitar::Tc, EffectType::Reverb).exists());
    }

    #[test]
    fn test_effect_missing_from_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DatasetPaths::new(temp_dir.path().join("dry"), temp_dir.path().join("out"));
        let catalog = EffectCatalog::from_definitions(vec![EffectDefinition::new(EffectType::Reverb)]);
        let play = GuitarPlay::new(Guitar::Tc, 1, 1).unwrap();
        write_dry(&paths, &play);

        let generator = DatasetGenerator::new(&paths, &catalog);
        let result = generator.generate(&play, EffectType::Distortion, 0);
        assert!(matches!(result, Err(GtfxError::Configuration(_))));
    }

    #[test]
    fn test_label_failure_removes_written_audio() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DatasetPaths::new(temp_dir.path().join("dry"), temp_dir.path().join("out"));
        let catalog = EffectCatalog::standard(1);
        let play = GuitarPlay::new(Guitar::Sc, 4, 9).unwrap();
        write_dry(&paths, &play);

        // a plain file where the label directory belongs
        let partition = paths.partition_dir(Guitar::Sc, EffectType::Distortion);
        fs::create_dir_all(&partition).unwrap();
        fs::write(partition.join("label"), b"").unwrap();

        let generator = DatasetGenerator::new(&paths, &catalog);
        let result = generator.generate(&play, EffectType::Distortion, 3);

        assert!(matches!(result, Err(GtfxError::Io { .. })));
        assert!(!paths.wet_signal_path(Guitar::Sc, EffectType::Distortion, 3).exists());
        assert_eq!(fs::read_dir(partition.join("audio")).unwrap().count(), 0);
    }

    #[test]
    fn test_wet_signal_keeps_dry_length() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DatasetPaths::new(temp_dir.path().join("dry"), temp_dir.path().join("out"));
        let catalog = EffectCatalog::standard(1);
        let play = GuitarPlay::new(Guitar::Lp, 1, 0).unwrap();
        write_dry(&paths, &play);

        let generator = DatasetGenerator::new(&paths, &catalog);
        let entries = generator
            .generate_entries(&play, EffectType::Reverb, 0)
            .unwrap();

        let wet = audio::load_audio(&entries[0].audio_path).unwrap();
        assert_eq!(wet.frame_count(), 4410);
    }
}
