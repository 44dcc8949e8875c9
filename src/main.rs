use std::process::ExitCode;

fn main() -> ExitCode {
    gtfx_lib::init_logging();

    match gtfx_lib::run() {
        Ok(summary) => {
            log::info!(
                "Wrote {} entries over {} units",
                summary.entries,
                summary.units
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Dataset generation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
