//! Batch executor.
//!
//! Runs one job in three strictly ordered phases: load the whole input, push
//! the whole set through the pipeline, write the whole output. Nothing
//! overlaps and nothing survives the call.

use tracing::info;

use crate::config::Config;
use crate::error::RemapError;
use crate::loader::load_records;
use crate::pipeline::{Pipeline, StageReport};
use crate::writer::write_records;

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub input_count: usize,
    pub output_count: usize,
    pub stages: Vec<StageReport>,
}

/// Execute the job described by `config`.
///
/// The pipeline is built before any I/O so that a bad pattern or
/// delimiter fails without touching the filesystem.
pub async fn run(config: &Config) -> Result<RunSummary, RemapError> {
    let delimiter = config.delimiter_byte()?;
    let pipeline = Pipeline::from_config(&config.transforms, &config.taxonomy)?;

    let set = load_records(&config.input, delimiter).await?;
    let input_count = set.len();

    info!("Running transforms: {}", pipeline.names().join(", "));
    let (set, stages) = pipeline.run_traced(set)?;
    let output_count = set.len();

    write_records(&config.output, &set, &config.columns, config.quote).await?;

    Ok(RunSummary {
        input_count,
        output_count,
        stages,
    })
}
