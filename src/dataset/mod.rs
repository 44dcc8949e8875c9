// Dataset module
// Effect catalog, parameter grids, file layout, labels and per-play generation

pub mod catalog;
pub mod generator;
pub mod grid;
pub mod label;
pub mod models;
pub mod paths;

pub use catalog::{EffectCatalog, EffectDefinition, EffectType};
pub use generator::DatasetGenerator;
pub use grid::{linspace, GridIter, ParameterGrid};
pub use label::{label_json, read_label, write_label};
pub use models::{DatasetEntry, EffectSpec, Guitar, GuitarPlay, Label, FRET_COUNT, STRING_COUNT};
pub use paths::{dry_index, DatasetPaths, SERIAL_WIDTH};
