//! treecmp - Binomial lattice engine comparison
//!
//! Command-line entry point comparing the seven binomial tree
//! parametrizations, in their baseline and enhanced generations, against
//! the closed-form Black-Scholes-Merton benchmark.
//!
//! # Commands
//!
//! - `treecmp compare` - Compare every configured engine with the benchmark
//! - `treecmp price --method <name>` - Price with a single engine
//! - `treecmp check` - Validate the configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use pricer_lattice::tree::{Generation, TreeMethod};
use service_cli::commands;
use service_cli::config::{ScenarioConfig, DEFAULT_CONFIG_FILE};
use service_cli::report::OutputFormat;
use service_cli::CliError;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Binomial lattice engine comparison
#[derive(Parser)]
#[command(name = "treecmp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path [default: treecmp.toml, if present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Number of time steps (overrides the configuration)
    #[arg(short = 'n', long, global = true)]
    steps: Option<usize>,

    /// Output format (overrides the configuration)
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every configured engine with the Black-Scholes benchmark
    Compare {
        /// Evaluate engines in parallel
        #[arg(short, long)]
        parallel: bool,
    },

    /// Price with a single engine
    Price {
        /// Tree parametrization (e.g. crr, tian, leisen-reimer, joshi4)
        #[arg(short, long)]
        method: TreeMethod,

        /// Engine generation (baseline or enhanced)
        #[arg(short, long, default_value = "baseline")]
        generation: Generation,
    },

    /// Validate the configuration and print the resolved scenario
    Check,
}

fn load_config(cli: &Cli) -> Result<ScenarioConfig, CliError> {
    let config = match &cli.config {
        Some(path) if !path.exists() => {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    let mut config = config.with_env_override()?;
    if let Some(steps) = cli.steps {
        config.engine.steps = steps;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Commands::Compare { parallel: true } = cli.command {
        config.engine.parallel = true;
    }
    Ok(config)
}

fn init_tracing(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli).context("failed to load configuration")?;

    init_tracing(cli.verbose, &config.output.log_level);
    if cli.verbose {
        info!("Verbose mode enabled");
    }
    debug!(?config, "Resolved configuration");

    let output = cli.output.as_deref();
    match cli.command {
        Commands::Compare { .. } => commands::compare::run(&config, output)?,
        Commands::Price { method, generation } => {
            commands::price::run(&config, method, generation, output)?
        }
        Commands::Check => commands::check::run(&config)?,
    }
    Ok(())
}
