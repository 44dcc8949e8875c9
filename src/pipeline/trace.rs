// Generation run tracing
// Append-only JSONL log of run progress and of every entry written

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dataset::{DatasetEntry, EffectType, GuitarPlay};

/// Errors that can occur during trace operations
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStage {
    RunStarted,
    UnitCompleted,
    RunCompleted,
    RunFailed,
}

/// Entries written for one (play, effect) unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub guitar: String,
    pub string: u8,
    pub fret: u8,
    pub fx: EffectType,
    pub first_serial: u64,
    pub next_serial: u64,
    pub entries: Vec<DatasetEntry>,
}

impl UnitRecord {
    pub fn new(
        play: &GuitarPlay,
        fx: EffectType,
        first_serial: u64,
        entries: Vec<DatasetEntry>,
    ) -> Self {
        UnitRecord {
            guitar: play.guitar().to_string(),
            string: play.string(),
            fret: play.fret(),
            fx,
            first_serial,
            next_serial: first_serial + entries.len() as u64,
            entries,
        }
    }
}

/// A single line of the trace file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    /// RFC 3339 timestamp of when this entry was created
    pub timestamp: String,

    pub stage: TraceStage,

    /// Fraction of units completed [0.0, 1.0]
    pub progress: f32,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitRecord>,
}

impl TraceEntry {
    pub fn new(stage: TraceStage, progress: f32, message: impl Into<String>) -> Self {
        TraceEntry {
            timestamp: Utc::now().to_rfc3339(),
            stage,
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
            unit: None,
        }
    }

    pub fn unit_completed(progress: f32, unit: UnitRecord) -> Self {
        let message = format!(
            "{} string {} fret {} {}: serials {}..{}",
            unit.guitar, unit.string, unit.fret, unit.fx, unit.first_serial, unit.next_serial
        );
        TraceEntry {
            unit: Some(unit),
            ..TraceEntry::new(TraceStage::UnitCompleted, progress, message)
        }
    }

    /// Serialize to JSON line (with newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

/// Appends trace entries to a JSONL file
pub struct TraceWriter {
    file_path: PathBuf,
}

impl TraceWriter {
    pub fn new(file_path: PathBuf) -> Self {
        TraceWriter { file_path }
    }

    /// Append one entry, creating the file and its directory if needed
    pub fn write(&self, entry: &TraceEntry) -> Result<(), TraceError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        let json_line = entry.to_json_line()?;
        file.write_all(json_line.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Read trace entries from a JSONL file
pub fn read_trace_file(path: &Path) -> Result<Vec<TraceEntry>, TraceError> {
    let contents = fs::read_to_string(path)?;
    let mut entries = Vec::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let entry: TraceEntry = serde_json::from_str(line)?;
        entries.push(entry);
    }

    Ok(entries)
}
