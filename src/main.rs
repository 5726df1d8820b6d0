//! svg-icon-components - React icon components from a folder of SVG files
//!
//! Main entry point for the CLI.
//!
//! # Execution Flow
//!
//! 1. Initialize logging (stderr, optional rotating log file)
//! 2. Load `react-svg-icon-components.json` from the working directory
//!    (or the file given with `--config`)
//! 3. Run the [`IconGenerator`] on a single-threaded tokio runtime
//! 4. Print the summary and map the outcome to an exit code
//!
//! # Exit Codes
//!
//! - `0`: components generated, or no SVG files found
//! - `1`: missing or invalid config, missing icons folder, name collision,
//!   transform or I/O failure

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::process::ExitCode;
use svg_icon_components::logging::setup_logging;
use svg_icon_components::services::{LiteralColorClassifier, NativeTransformer};
use svg_icon_components::{
    APP_NAME, ConfigError, ConfigManager, GenerationOutcome, IconGenerator, VERSION,
};

#[derive(Debug, Parser)]
#[command(name = "svg-icon-components", version, about)]
struct Cli {
    /// Config file to use instead of ./react-svg-icon-components.json
    #[arg(short, long, value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    /// Print debug diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Also write daily rotating JSON logs into this directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Guards must outlive the run so buffered log lines are flushed
    let _guards = match setup_logging(cli.verbose, cli.log_dir.as_deref()) {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Generation failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let manager = match cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::from_current_dir()?,
    };

    let config = match manager.load() {
        Ok(config) => config,
        Err(e @ ConfigError::NotFound(_)) => {
            eprintln!("{}\n", e);
            if let Some(help) = e.remediation() {
                eprintln!("{}", help);
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let generator = IconGenerator::new(&config, NativeTransformer::new(), LiteralColorClassifier);

    match generator.run().await? {
        GenerationOutcome::NoIcons { icons_path } => {
            println!(
                "No SVG files found in the specified: \"{}\" icons folder.",
                icons_path
            );
        }
        GenerationOutcome::Generated(summary) => {
            println!("\n{}", summary);
        }
    }

    Ok(ExitCode::SUCCESS)
}
