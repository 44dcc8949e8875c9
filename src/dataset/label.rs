// Label files
// Pretty-printed JSON (2-space indent) with a trailing newline

use std::fs;
use std::path::Path;

use super::models::{EffectSpec, GuitarPlay, Label};
use crate::error::{GtfxError, Result};

/// Render a label exactly as it is stored on disk
pub fn label_json(play: &GuitarPlay, fx: &EffectSpec) -> serde_json::Result<String> {
    let json = serde_json::to_string_pretty(&Label::new(play, fx))?;
    Ok(format!("{}\n", json))
}

/// Write (or overwrite) the label for one dataset entry
pub fn write_label(path: &Path, play: &GuitarPlay, fx: &EffectSpec) -> Result<()> {
    let contents = label_json(play, fx).map_err(|source| GtfxError::Label {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| GtfxError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| GtfxError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_label(path: &Path) -> Result<Label> {
    let contents = fs::read_to_string(path).map_err(|source| GtfxError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| GtfxError::Label {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{EffectType, Guitar};
    use crate::render::EffectParams;
    use tempfile::TempDir;

    fn reverb_label() -> (GuitarPlay, EffectSpec) {
        let play = GuitarPlay::new(Guitar::Lp, 3, 5).unwrap();
        let fx = EffectSpec::new(EffectType::Reverb)
            .with_params(EffectParams::new().with("room_size", 0.5));
        (play, fx)
    }

    #[test]
    fn test_label_json_layout() {
        let (play, fx) = reverb_label();
        let json = label_json(&play, &fx).unwrap();

        let expected = "{\n  \"guitar\": \"lp\",\n  \"string\": 3,\n  \"fret\": 5,\n  \"fx\": {\n    \"type\": \"reverb\",\n    \"params\": {\n      \"room_size\": 0.5\n    }\n  }\n}\n";
        assert_eq!(json, expected);
    }

    #[test]
    fn test_write_creates_dirs_and_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data/lp/reverb/label/gtfx00000007.json");
        let (play, fx) = reverb_label();

        write_label(&path, &play, &fx).unwrap();
        let label = read_label(&path).unwrap();

        assert_eq!(label.guitar, Guitar::Lp);
        assert_eq!(label.string, 3);
        assert_eq!(label.fret, 5);
        assert_eq!(label.fx, fx);
        assert_eq!(label.play().unwrap(), play);
    }

    #[test]
    fn test_round_trip_value_types() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("label.json");
        let (play, fx) = reverb_label();
        write_label(&path, &play, &fx).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["guitar"].is_string());
        assert!(value["string"].is_u64());
        assert!(value["fret"].is_u64());
        assert!(value["fx"]["type"].is_string());
        assert!(value["fx"]["params"]["room_size"].is_number());
    }

    #[test]
    fn test_write_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("label.json");
        let (play, fx) = reverb_label();
        write_label(&path, &play, &fx).unwrap();

        let other = EffectSpec::new(EffectType::Distortion)
            .with_params(EffectParams::new().with("drive_db", 30.0));
        write_label(&path, &play, &other).unwrap();

        assert_eq!(read_label(&path).unwrap().fx, other);
    }

    #[test]
    fn test_read_missing_label() {
        let result = read_label(Path::new("/nonexistent/label.json"));
        assert!(matches!(result, Err(GtfxError::Io { .. })));
    }
}
