use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sss_recover::{BatchRunner, CaseProcessor, Config, FileSource, Strategy};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Reconstruct Shamir secrets from JSON test cases
#[derive(Parser, Debug)]
#[command(name = "sss-recover")]
#[command(version, about, long_about = None)]
struct Args {
    /// Test case files, processed in order (default: testcase1.json testcase2.json)
    files: Vec<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Division strategy for the Lagrange products
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Bit width of the accepted value range
    #[arg(long)]
    bits: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Exact,
    Eager,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Exact => Strategy::Exact,
            StrategyArg::Eager => Strategy::Eager,
        }
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => Config::default(),
    };

    if !args.files.is_empty() {
        config.inputs = args.files.clone();
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    if let Some(bits) = args.bits {
        config.bound_bits = bits;
    }
    config.check()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&args)?;
    info!(
        inputs = config.inputs.len(),
        strategy = ?config.strategy,
        bits = config.bound_bits,
        "starting reconstruction"
    );

    let runner = BatchRunner::new(CaseProcessor::from_config(&config));
    let ids: Vec<String> = config
        .inputs
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    let results = runner.run_sources(&FileSource::new(), &ids);
    println!("{}", results.join("\n"));
    Ok(())
}
