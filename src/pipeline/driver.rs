// Dataset driver
// Enumerates guitar -> string -> fret -> effect and threads the serial counter

use std::ops::{Range, RangeInclusive};

use super::serial::{SerialCounter, SerialScope};
use super::trace::{TraceEntry, TraceStage, TraceWriter, UnitRecord};
use crate::dataset::{DatasetGenerator, EffectType, Guitar, GuitarPlay, FRET_COUNT, STRING_COUNT};
use crate::error::Result;

/// The (guitar, string, fret, effect) space a run covers
#[derive(Debug, Clone, PartialEq)]
pub struct Enumeration {
    pub guitars: Vec<Guitar>,
    pub strings: RangeInclusive<u8>,
    pub frets: Range<u8>,
    pub effects: Vec<EffectType>,
}

impl Enumeration {
    /// Every recording with every given effect
    pub fn full(effects: Vec<EffectType>) -> Self {
        Enumeration {
            guitars: Guitar::ALL.to_vec(),
            strings: 1..=STRING_COUNT,
            frets: 0..FRET_COUNT,
            effects,
        }
    }

    /// Number of generation units (one per play and effect)
    pub fn unit_count(&self) -> usize {
        self.guitars.len() * self.strings.clone().count() * self.frets.len() * self.effects.len()
    }

    /// Units in run order: guitar outermost, effect innermost
    pub fn units(&self) -> Result<Vec<(GuitarPlay, EffectType)>> {
        let mut units = Vec::with_capacity(self.unit_count());
        for &guitar in &self.guitars {
            for string in self.strings.clone() {
                for fret in self.frets.clone() {
                    let play = GuitarPlay::new(guitar, string, fret)?;
                    for &effect_type in &self.effects {
                        units.push((play, effect_type));
                    }
                }
            }
        }
        Ok(units)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub units: usize,
    pub entries: usize,
    pub counter: SerialCounter,
}

pub struct Driver<'a> {
    generator: DatasetGenerator<'a>,
    enumeration: Enumeration,
    scope: SerialScope,
    trace: Option<TraceWriter>,
}

impl<'a> Driver<'a> {
    pub fn new(generator: DatasetGenerator<'a>, enumeration: Enumeration) -> Self {
        Driver {
            generator,
            enumeration,
            scope: SerialScope::Global,
            trace: None,
        }
    }

    pub fn with_scope(mut self, scope: SerialScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_trace(mut self, trace: TraceWriter) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Generate every unit in order, halting on the first error
    pub fn run(&self, start_serial: u64) -> Result<RunSummary> {
        let units = self.enumeration.units()?;
        let total = units.len();
        let mut counter = SerialCounter::new(self.scope, start_serial);
        let mut entries = 0;

        log::info!(
            "Generating dataset: {} units, serial scope {:?}, starting at {}",
            total,
            self.scope,
            start_serial
        );
        if let Some(trace) = &self.trace {
            log::info!("Recording run trace to {}", trace.path().display());
        }
        self.record(&TraceEntry::new(
            TraceStage::RunStarted,
            0.0,
            format!("{} units from serial {}", total, start_serial),
        ))?;

        for (done, (play, effect_type)) in units.iter().enumerate() {
            let guitar = play.guitar();
            let first = counter.next(guitar, *effect_type);

            let written = match self.generator.generate_entries(play, *effect_type, first) {
                Ok(written) => written,
                Err(e) => {
                    let progress = done as f32 / total as f32;
                    let failure = TraceEntry::new(
                        TraceStage::RunFailed,
                        progress,
                        format!("{} {}: {}", play, effect_type, e),
                    );
                    if let Err(trace_err) = self.record(&failure) {
                        log::warn!("Failed to record run failure: {}", trace_err);
                    }
                    return Err(e);
                }
            };

            entries += written.len();
            let unit = UnitRecord::new(play, *effect_type, first, written);
            counter.advance(guitar, *effect_type, unit.next_serial);

            let progress = (done + 1) as f32 / total as f32;
            log::info!(
                "[{}/{}] {} {}: serials {}..{}",
                done + 1,
                total,
                play,
                effect_type,
                unit.first_serial,
                unit.next_serial
            );
            self.record(&TraceEntry::unit_completed(progress, unit))?;
        }

        self.record(&TraceEntry::new(
            TraceStage::RunCompleted,
            1.0,
            format!("{} entries written", entries),
        ))?;
        log::info!("Dataset generation complete: {} entries", entries);

        Ok(RunSummary {
            units: total,
            entries,
            counter,
        })
    }

    fn record(&self, entry: &TraceEntry) -> Result<()> {
        if let Some(trace) = &self.trace {
            trace.write(entry)?;
        }
        Ok(())
    }
}
