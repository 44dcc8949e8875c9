// Serial numbering for dataset entries
// The driver owns the counter and threads it through each generation call

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::dataset::{EffectType, Guitar};

/// How far one serial sequence reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialScope {
    /// One sequence across every (guitar, effect) partition
    #[default]
    Global,
    /// An independent sequence per (guitar, effect) partition
    #[serde(rename = "partition")]
    PerPartition,
}

impl FromStr for SerialScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "global" => Ok(SerialScope::Global),
            "partition" | "per_partition" => Ok(SerialScope::PerPartition),
            other => Err(format!("expected 'global' or 'partition', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialCounter {
    scope: SerialScope,
    start: u64,
    global: u64,
    partitions: BTreeMap<(Guitar, EffectType), u64>,
}

impl SerialCounter {
    pub fn new(scope: SerialScope, start: u64) -> Self {
        SerialCounter {
            scope,
            start,
            global: start,
            partitions: BTreeMap::new(),
        }
    }

    pub fn scope(&self) -> SerialScope {
        self.scope
    }

    /// First serial to use for the next unit written into this partition
    pub fn next(&self, guitar: Guitar, effect_type: EffectType) -> u64 {
        match self.scope {
            SerialScope::Global => self.global,
            SerialScope::PerPartition => *self
                .partitions
                .get(&(guitar, effect_type))
                .unwrap_or(&self.start),
        }
    }

    /// Record the next unused serial returned by a generation call
    pub fn advance(&mut self, guitar: Guitar, effect_type: EffectType, next: u64) {
        match self.scope {
            SerialScope::Global => self.global = next,
            SerialScope::PerPartition => {
                self.partitions.insert((guitar, effect_type), next);
            }
        }
    }

    /// Highest next-unused serial across all sequences
    pub fn high_water_mark(&self) -> u64 {
        match self.scope {
            SerialScope::Global => self.global,
            SerialScope::PerPartition => self
                .partitions
                .values()
                .copied()
                .max()
                .unwrap_or(self.start),
        }
    }
}
