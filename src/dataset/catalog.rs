// Effect catalog
// Closed set of effect types and the parameter sweeps applied to each

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::grid::{linspace, ParameterGrid};
use crate::config::ConfigError;
use crate::error::{GtfxError, Result};
use crate::render::{Distortion, Effect, EffectError, EffectParams, Reverb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectType {
    Distortion,
    Reverb,
}

impl EffectType {
    pub const ALL: [EffectType; 2] = [EffectType::Distortion, EffectType::Reverb];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectType::Distortion => Distortion::NAME,
            EffectType::Reverb => Reverb::NAME,
        }
    }

    /// Every parameter name the transform accepts
    pub fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            EffectType::Distortion => Distortion::PARAMETERS,
            EffectType::Reverb => Reverb::PARAMETERS,
        }
    }

    /// Construct the transform for one parameter mapping
    pub fn build(&self, params: &EffectParams) -> std::result::Result<Box<dyn Effect>, EffectError> {
        Ok(match self {
            EffectType::Distortion => Box::new(Distortion::from_params(params)?),
            EffectType::Reverb => Box::new(Reverb::from_params(params)?),
        })
    }
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectType {
    type Err = GtfxError;

    fn from_str(s: &str) -> Result<Self> {
        EffectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownEffect(s.to_string()).into())
    }
}

/// An effect type with the ordered parameter sweeps to apply
#[derive(Debug, Clone, PartialEq)]
pub struct EffectDefinition {
    effect_type: EffectType,
    sweeps: Vec<(String, Vec<f64>)>,
}

impl EffectDefinition {
    /// No swept parameters: one entry with the effect's defaults
    pub fn new(effect_type: EffectType) -> Self {
        EffectDefinition {
            effect_type,
            sweeps: Vec::new(),
        }
    }

    pub fn with_sweep(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.sweeps.push((name.into(), values));
        self
    }

    /// Sweep used for the published dataset, `num_grid` points per parameter
    pub fn standard(effect_type: EffectType, num_grid: usize) -> Self {
        match effect_type {
            EffectType::Distortion => EffectDefinition::new(effect_type)
                .with_sweep("drive_db", linspace(10.0, 50.0, num_grid)),
            EffectType::Reverb => EffectDefinition::new(effect_type)
                .with_sweep("room_size", linspace(0.1, 1.0, num_grid)),
        }
    }

    pub fn effect_type(&self) -> EffectType {
        self.effect_type
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.sweeps.iter().map(|(name, _)| name.as_str())
    }

    pub fn grid(&self) -> ParameterGrid {
        ParameterGrid::new(self.sweeps.iter().cloned())
    }

    pub fn build(&self, params: &EffectParams) -> std::result::Result<Box<dyn Effect>, EffectError> {
        self.effect_type.build(params)
    }
}

/// Immutable registry of effect definitions, in enumeration order
#[derive(Debug, Clone, PartialEq)]
pub struct EffectCatalog {
    definitions: Vec<EffectDefinition>,
}

impl EffectCatalog {
    pub fn standard(num_grid: usize) -> Self {
        EffectCatalog {
            definitions: EffectType::ALL
                .iter()
                .map(|&t| EffectDefinition::standard(t, num_grid))
                .collect(),
        }
    }

    /// A later definition for the same type replaces the earlier one
    pub fn from_definitions(definitions: impl IntoIterator<Item = EffectDefinition>) -> Self {
        let mut catalog = EffectCatalog {
            definitions: Vec::new(),
        };
        for definition in definitions {
            match catalog
                .definitions
                .iter_mut()
                .find(|d| d.effect_type == definition.effect_type)
            {
                Some(existing) => *existing = definition,
                None => catalog.definitions.push(definition),
            }
        }
        catalog
    }

    pub fn definition(&self, effect_type: EffectType) -> Result<&EffectDefinition> {
        self.definitions
            .iter()
            .find(|d| d.effect_type == effect_type)
            .ok_or_else(|| ConfigError::MissingEffect(effect_type).into())
    }

    pub fn lookup(&self, name: &str) -> Result<&EffectDefinition> {
        self.definition(name.parse()?)
    }

    pub fn effect_types(&self) -> Vec<EffectType> {
        self.definitions.iter().map(|d| d.effect_type).collect()
    }
}
