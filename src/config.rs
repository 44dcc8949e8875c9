// Run configuration
// Resolved once at startup from the process environment and an optional `.env` file

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dataset::EffectType;
use crate::pipeline::SerialScope;

pub const PROJECT_PATH_VAR: &str = "PROJECT_PATH";
pub const DATASET_PATH_VAR: &str = "GTFX_DATASET_PATH";
pub const DRY_SIGNALS_PATH_VAR: &str = "GTFX_DRY_SIGNALS_PATH";
pub const NUM_GRID_VAR: &str = "GTFX_NUM_GRID";
pub const SERIAL_SCOPE_VAR: &str = "GTFX_SERIAL_SCOPE";
pub const START_SERIAL_VAR: &str = "GTFX_START_SERIAL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Environment variable {name} has invalid value '{value}': {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to read .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("Unknown effect type '{0}'")]
    UnknownEffect(String),

    #[error("Effect type '{0}' is not in the catalog")]
    MissingEffect(EffectType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Root of the audio effect estimation project
    pub project_path: PathBuf,

    /// Directory the dataset is written into
    pub dataset_path: PathBuf,

    /// Directory holding the dry guitar recordings
    pub dry_signals_path: PathBuf,

    /// Number of grid points per swept parameter
    pub num_grid: usize,

    pub serial_scope: SerialScope,

    pub start_serial: u64,
}

impl Config {
    /// Defaults derived from a project root
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        let project_path = project_path.into();
        Config {
            dataset_path: project_path.join("gtfx_dataset"),
            dry_signals_path: project_path.join("gt_dataset"),
            project_path,
            num_grid: 1,
            serial_scope: SerialScope::Global,
            start_serial: 0,
        }
    }

    /// Process environment first, then the nearest `.env` file
    pub fn from_env() -> Result<Self, ConfigError> {
        let file_vars = dotenv_vars()?;
        Self::from_lookup(|name| {
            std::env::var(name)
                .ok()
                .or_else(|| file_vars.get(name).cloned())
        })
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let project_path = get(PROJECT_PATH_VAR).ok_or(ConfigError::MissingVar(PROJECT_PATH_VAR))?;
        let mut config = Config::new(project_path);

        if let Some(path) = get(DATASET_PATH_VAR) {
            config.dataset_path = PathBuf::from(path);
        }
        if let Some(path) = get(DRY_SIGNALS_PATH_VAR) {
            config.dry_signals_path = PathBuf::from(path);
        }
        if let Some(value) = get(NUM_GRID_VAR) {
            config.num_grid = parse_var(NUM_GRID_VAR, &value)?;
            if config.num_grid == 0 {
                return Err(ConfigError::InvalidVar {
                    name: NUM_GRID_VAR,
                    value,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(value) = get(SERIAL_SCOPE_VAR) {
            config.serial_scope = value.parse().map_err(|reason| ConfigError::InvalidVar {
                name: SERIAL_SCOPE_VAR,
                value: value.clone(),
                reason,
            })?;
        }
        if let Some(value) = get(START_SERIAL_VAR) {
            config.start_serial = parse_var(START_SERIAL_VAR, &value)?;
        }

        Ok(config)
    }
}

/// Variables from the nearest `.env` (searching parent directories); none if absent
pub fn dotenv_vars() -> Result<HashMap<String, String>, ConfigError> {
    match dotenvy::dotenv_iter() {
        Ok(iter) => {
            let vars = iter.collect::<Result<HashMap<_, _>, _>>()?;
            log::debug!("Loaded {} variables from .env", vars.len());
            Ok(vars)
        }
        Err(e) if e.not_found() => Ok(HashMap::new()),
        Err(e) => Err(e.into()),
    }
}

/// Variables from a specific env file
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    Ok(dotenvy::from_path_iter(path)?.collect::<Result<HashMap<_, _>, _>>()?)
}

fn parse_var<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
