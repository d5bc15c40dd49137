//! CLI tool to transform a blog post CSV export.
//!
//! Usage:
//!   csv-remap [input.csv] [-o output.csv] [-c csv-remap.toml]
//!
//! Paths not given on the command line come from the config file, or from
//! the built-in defaults when there is none.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use csv_remap::{Config, UnknownCategoryPolicy};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Strip editor annotations and remap categories in a CSV of blog posts.
#[derive(Parser)]
#[command(name = "csv-remap", version)]
struct Cli {
    /// Input CSV file (overrides the config file)
    input: Option<PathBuf>,

    /// Write output to this file (overrides the config file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, default_value = "csv-remap.toml")]
    config: PathBuf,

    /// Keep only posts whose content embeds an image
    #[arg(long)]
    require_image: bool,

    /// Keep only the first N posts
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// How to treat category labels missing from the taxonomy
    #[arg(long, value_enum)]
    unknown_categories: Option<UnknownCategoryPolicy>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("csv_remap={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading configuration from '{}'", cli.config.display()))?;

    if let Some(input) = cli.input {
        config.input = input;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if cli.require_image {
        config.transforms.require_image = true;
    }
    if let Some(limit) = cli.limit {
        config.transforms.limit = Some(limit);
    }
    if let Some(policy) = cli.unknown_categories {
        config.transforms.unknown_categories = policy;
    }
    config.validate()?;

    info!("Input:  {}", config.input.display());
    info!("Output: {}", config.output.display());

    let summary = csv_remap::run(&config)
        .await
        .with_context(|| format!("transforming '{}'", config.input.display()))?;

    for stage in &summary.stages {
        info!(
            "{}: {} -> {} records",
            stage.name, stage.input_count, stage.output_count
        );
    }

    println!("The CSV file was written successfully!");
    println!(
        "Processed {} -> {} records, output: {}",
        summary.input_count,
        summary.output_count,
        config.output.display()
    );
    Ok(())
}
