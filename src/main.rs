/// Replays a recorded input trace through the viewer engine and prints every
/// transform change as a JSON line, followed by a summary line.
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    use clap::Parser;

    match cli::run(cli::Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lightbox-replay: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::io::Write;
    use std::path::PathBuf;

    use clap::Parser;
    use lightbox::{ConfigError, Trace, TraceError, ViewerConfig};
    use thiserror::Error;
    use web_time::Instant;

    #[derive(Error, Debug)]
    pub enum CliError {
        #[error(transparent)]
        Trace(#[from] TraceError),

        #[error("Config error: {0}")]
        Config(#[from] ConfigError),

        #[error("Failed to write output: {0}")]
        Output(#[from] std::io::Error),

        #[error("Failed to serialize output: {0}")]
        Serialize(#[from] serde_json::Error),
    }

    /// Replay a recorded input trace and print the transform changes.
    #[derive(Parser, Debug)]
    #[command(name = "lightbox-replay", version, about, long_about = None)]
    pub struct Args {
        /// Trace file to replay
        pub trace: PathBuf,

        /// Viewer config file; the per-user config is used when omitted
        #[arg(short, long)]
        pub config: Option<PathBuf>,
    }

    fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig, CliError> {
        match path {
            Some(path) => Ok(ViewerConfig::load(path)?),
            None => Ok(ViewerConfig::load_from_default_path().unwrap_or_default()),
        }
    }

    pub fn run(args: Args) -> Result<(), CliError> {
        let config = load_config(args.config.as_ref())?;

        // RUST_LOG overrides the configured level
        env_logger::Builder::new()
            .filter_level(config.log_level.to_level_filter())
            .parse_default_env()
            .init();

        let trace = Trace::load(&args.trace)?;
        log::info!(
            "Replaying {} events ({:?} viewport, {:?} content)",
            trace.events.len(),
            trace.viewport,
            trace.content
        );

        let started = Instant::now();
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let mut write_error = None;
        let summary = lightbox::replay(&trace, &config, |change| {
            if write_error.is_some() {
                return;
            }
            let line = serde_json::to_string(change).map_err(CliError::from);
            let written = line.and_then(|line| writeln!(out, "{}", line).map_err(CliError::from));
            if let Err(e) = written {
                write_error = Some(e);
            }
        });
        if let Some(e) = write_error {
            return Err(e);
        }

        writeln!(out, "{}", serde_json::json!({ "summary": summary }))?;
        log::info!(
            "Replay finished in {:.2} ms: {} frames, {} changes",
            started.elapsed().as_secs_f64() * 1000.0,
            summary.frames,
            summary.changes
        );
        Ok(())
    }

}

// The engine is used as a library on the web
#[cfg(target_arch = "wasm32")]
fn main() {}
