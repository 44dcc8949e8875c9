// Pipeline execution and monitoring module
// Drives the full dataset run and records its progress

pub mod driver;
pub mod serial;
pub mod trace;

pub use driver::{Driver, Enumeration, RunSummary};
pub use serial::{SerialCounter, SerialScope};
pub use trace::{read_trace_file, TraceEntry, TraceError, TraceStage, TraceWriter, UnitRecord};
