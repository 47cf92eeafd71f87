//! rewire - Entry Point
//!
//! Post-compilation pass: rewrites injection-point reads in every module file
//! below a directory.
//!
//! ```text
//! rewire target/modules
//! rewire --config rewire.toml --fail-fast --json target/modules
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use rewire::infrastructure::logging::init_logging;
use rewire::infrastructure::ConfigLoader;

/// Command line interface for rewire
#[derive(Parser, Debug)]
#[command(name = "rewire")]
#[command(about = "rewire - Rewrite injection points in compiled modules")]
#[command(version)]
pub struct Cli {
    /// Root directory containing the compiled modules
    pub root: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop at the first file that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let mut config = loader.load().context("Failed to load configuration")?;
    if cli.fail_fast {
        config.rewriter.fail_fast = true;
    }
    init_logging(&config.logging).context("Failed to initialize logging")?;

    let report = rewire::rewrite_directory(&cli.root, &config)
        .with_context(|| format!("Failed to rewrite {}", cli.root.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
