// Data models for the guitar effects dataset
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::catalog::EffectType;
use crate::error::{GtfxError, Result};
use crate::render::EffectParams;

/// Strings per guitar, numbered 1 (lowest) to 6
pub const STRING_COUNT: u8 = 6;

/// Frets recorded per string, numbered 0 (open) to 19
pub const FRET_COUNT: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Guitar {
    Sc,
    Tc,
    Lp,
}

impl Guitar {
    /// Enumeration order; also the order of the dry-signal index groups
    pub const ALL: [Guitar; 3] = [Guitar::Sc, Guitar::Tc, Guitar::Lp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Guitar::Sc => "sc",
            Guitar::Tc => "tc",
            Guitar::Lp => "lp",
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            Guitar::Sc => 0,
            Guitar::Tc => 1,
            Guitar::Lp => 2,
        }
    }

    /// Location of this guitar's recordings relative to the dry-signal root
    pub fn dry_subpath(&self) -> PathBuf {
        PathBuf::from("data").join(self.as_str()).join("audio")
    }
}

impl fmt::Display for Guitar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Guitar {
    type Err = GtfxError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sc" => Ok(Guitar::Sc),
            "tc" => Ok(Guitar::Tc),
            "lp" => Ok(Guitar::Lp),
            _ => Err(GtfxError::InvalidIdentity(format!("unknown guitar '{}'", s))),
        }
    }
}

/// One dry recording: a guitar, a string and a fret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuitarPlay {
    guitar: Guitar,
    string: u8,
    fret: u8,
}

impl GuitarPlay {
    pub fn new(guitar: Guitar, string: u8, fret: u8) -> Result<Self> {
        if !(1..=STRING_COUNT).contains(&string) {
            return Err(GtfxError::InvalidIdentity(format!(
                "string {} outside 1..={}",
                string, STRING_COUNT
            )));
        }
        if fret >= FRET_COUNT {
            return Err(GtfxError::InvalidIdentity(format!(
                "fret {} outside 0..{}",
                fret, FRET_COUNT
            )));
        }
        Ok(GuitarPlay {
            guitar,
            string,
            fret,
        })
    }

    pub fn guitar(&self) -> Guitar {
        self.guitar
    }

    pub fn string(&self) -> u8 {
        self.string
    }

    pub fn fret(&self) -> u8 {
        self.fret
    }
}

impl fmt::Display for GuitarPlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} string {} fret {}", self.guitar, self.string, self.fret)
    }
}

/// Effect type plus the parameter values of one realized grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(default)]
    pub params: EffectParams,
}

impl EffectSpec {
    pub fn new(effect_type: EffectType) -> Self {
        EffectSpec {
            effect_type,
            params: EffectParams::new(),
        }
    }

    pub fn with_params(mut self, params: EffectParams) -> Self {
        self.params = params;
        self
    }
}

/// Label file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub guitar: Guitar,
    pub string: u8,
    pub fret: u8,
    pub fx: EffectSpec,
}

impl Label {
    pub fn new(play: &GuitarPlay, fx: &EffectSpec) -> Self {
        Label {
            guitar: play.guitar(),
            string: play.string(),
            fret: play.fret(),
            fx: fx.clone(),
        }
    }

    /// Recover the play; fails if the label names an impossible string/fret
    pub fn play(&self) -> Result<GuitarPlay> {
        GuitarPlay::new(self.guitar, self.string, self.fret)
    }
}

/// One written audio/label pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub serial: u64,
    pub audio_path: PathBuf,
    pub label_path: PathBuf,
    pub audio_sha256: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guitar_round_trip_names() {
        for guitar in Guitar::ALL {
            assert_eq!(guitar.as_str().parse::<Guitar>().unwrap(), guitar);
        }
        assert!(matches!(
            "strat".parse::<Guitar>(),
            Err(GtfxError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_guitar_index_follows_enumeration_order() {
        let indices: Vec<u32> = Guitar::ALL.iter().map(|g| g.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_dry_subpath() {
        assert_eq!(Guitar::Tc.dry_subpath(), PathBuf::from("data/tc/audio"));
    }

    #[test]
    fn test_play_validates_domain() {
        assert!(GuitarPlay::new(Guitar::Lp, 1, 0).is_ok());
        assert!(GuitarPlay::new(Guitar::Lp, 6, 19).is_ok());
        assert!(matches!(
            GuitarPlay::new(Guitar::Lp, 0, 0),
            Err(GtfxError::InvalidIdentity(_))
        ));
        assert!(matches!(
            GuitarPlay::new(Guitar::Lp, 7, 0),
            Err(GtfxError::InvalidIdentity(_))
        ));
        assert!(matches!(
            GuitarPlay::new(Guitar::Lp, 3, 20),
            Err(GtfxError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_label_serializes_guitar_and_type_as_strings() {
        let play = GuitarPlay::new(Guitar::Sc, 2, 4).unwrap();
        let fx = EffectSpec::new(EffectType::Distortion)
            .with_params(EffectParams::new().with("drive_db", 10.0));
        let json = serde_json::to_string(&Label::new(&play, &fx)).unwrap();

        assert_eq!(
            json,
            r#"{"guitar":"sc","string":2,"fret":4,"fx":{"type":"distortion","params":{"drive_db":10.0}}}"#
        );
    }
}
