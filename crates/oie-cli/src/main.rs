//! OIE CLI - Command-line interface
//!
//! Usage:
//!   oie split <pattern>
//!   oie simplify <file>
//!   oie compare <a> <b>
//!   oie compress <file>
//!   oie generalise <file> --top-n 50

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use oie_core::{
    parse_observations, render_table, AppConfig, CompressionStrategy, LoggingConfig, Observation,
    PatternCount, SimplifyMode,
};
use oie_patterns::{compare_str, split_top_level, MergeOutcome, PatternPipeline};

#[derive(Parser)]
#[command(name = "oie")]
#[command(about = "Generalize and compress open information extraction patterns")]
#[command(version)]
struct Cli {
    /// TOML configuration file (environment variables take precedence)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print tables as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Write the resulting table to a file instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top-level elements of a pattern
    Split {
        /// Parenthesized pattern
        pattern: String,
    },
    /// Simplify observed patterns and sum their counts
    Simplify {
        /// Observation file (JSON or `count<TAB>pattern` lines)
        path: PathBuf,
        #[arg(long)]
        mode: Option<SimplifyMode>,
        /// Render predicate and builder roles as sorted `{..}` sets
        #[arg(long)]
        brace_roles: bool,
    },
    /// Merge two patterns if they differ only locally
    Compare { left: String, right: String },
    /// Compress a ranked pattern table
    Compress {
        /// Pattern table (JSON or `count<TAB>pattern` lines)
        path: PathBuf,
        #[arg(long)]
        strategy: Option<CompressionStrategy>,
    },
    /// Simplify, keep the most frequent patterns, and compress them
    Generalise {
        /// Observation file (JSON or `count<TAB>pattern` lines)
        path: PathBuf,
        #[arg(long)]
        top_n: Option<usize>,
        #[arg(long)]
        mode: Option<SimplifyMode>,
        #[arg(long)]
        brace_roles: bool,
        #[arg(long)]
        strategy: Option<CompressionStrategy>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn read_observations(path: &Path) -> anyhow::Result<Vec<Observation>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let observations = parse_observations(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded {} observations from {}", observations.len(), path.display());
    Ok(observations)
}

async fn emit(table: &[PatternCount], json: bool, output: Option<&Path>) -> anyhow::Result<()> {
    let rendered = if json {
        serde_json::to_string_pretty(table)? + "\n"
    } else {
        render_table(table)
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, rendered)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} patterns to {}", table.len(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    let output = cli.output.as_deref();

    match cli.command {
        Commands::Split { pattern } => {
            for token in split_top_level(&pattern) {
                println!("{token}");
            }
        }
        Commands::Simplify {
            path,
            mode,
            brace_roles,
        } => {
            if let Some(mode) = mode {
                config.simplify.mode = mode;
            }
            config.simplify.brace_roles |= brace_roles;

            let observations = read_observations(&path).await?;
            let (table, total) = PatternPipeline::new(&config).simplify(&observations)?;
            tracing::info!(
                "Simplified {} pattern occurrences into {} patterns",
                total,
                table.len()
            );
            emit(&table, cli.json, output).await?;
        }
        Commands::Compare { left, right } => match compare_str(&left, &right)? {
            MergeOutcome::Merged(node) => println!("{node}"),
            MergeOutcome::NoMerge(reason) => println!("no merge: {reason}"),
        },
        Commands::Compress { path, strategy } => {
            if let Some(strategy) = strategy {
                config.compress.strategy = strategy;
            }

            let patterns: Vec<PatternCount> = read_observations(&path)
                .await?
                .into_iter()
                .map(PatternCount::from)
                .collect();
            let table = PatternPipeline::new(&config).compress(&patterns)?;
            emit(&table, cli.json, output).await?;
        }
        Commands::Generalise {
            path,
            top_n,
            mode,
            brace_roles,
            strategy,
        } => {
            if let Some(mode) = mode {
                config.simplify.mode = mode;
            }
            config.simplify.brace_roles |= brace_roles;
            if let Some(strategy) = strategy {
                config.compress.strategy = strategy;
            }
            if top_n.is_some() {
                config.compress.top_n = top_n;
            }

            let observations = read_observations(&path).await?;
            let table = PatternPipeline::new(&config).generalise(&observations)?;
            emit(&table, cli.json, output).await?;
        }
    }

    Ok(())
}
