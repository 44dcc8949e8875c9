// gtfx - Guitar Effects Dataset Generator
// Module declarations

pub mod audio;
pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod render;

pub use config::Config;
pub use error::{GtfxError, Result};

use dataset::{DatasetGenerator, DatasetPaths, EffectCatalog};
use pipeline::{Driver, Enumeration, RunSummary, TraceWriter};
use tracing_subscriber::EnvFilter;

/// Route `log` records to stderr, filtered by `RUST_LOG` (default `info`)
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("Logging already initialized: {}", e);
    }
}

/// Generate the full dataset described by `config`
pub fn generate_dataset(config: &Config) -> Result<RunSummary> {
    let paths = DatasetPaths::new(&config.dry_signals_path, &config.dataset_path);
    let catalog = EffectCatalog::standard(config.num_grid);
    let enumeration = Enumeration::full(catalog.effect_types());

    log::info!(
        "Dry signals: {}, dataset: {}",
        paths.dry_root().display(),
        paths.dataset_root().display()
    );

    let trace = TraceWriter::new(paths.trace_path());
    let generator = DatasetGenerator::new(&paths, &catalog);
    Driver::new(generator, enumeration)
        .with_scope(config.serial_scope)
        .with_trace(trace)
        .run(config.start_serial)
}

/// Entry point for the `gtfx` binary
pub fn run() -> Result<RunSummary> {
    let config = Config::from_env()?;
    generate_dataset(&config)
}
