//! Record writer.
//!
//! Serializes a [`RecordSet`] through an [`OutputSchema`]. The output is
//! rendered in memory, written to a hidden sibling file and renamed over the
//! destination, so a failed run never leaves a half-written file behind.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::error::RemapError;
use crate::record::RecordSet;
use crate::schema::OutputSchema;

/// When cells are wrapped in quotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum QuotePolicy {
    /// Quote every cell, header included.
    #[default]
    Always,
    /// Quote only cells containing delimiters, quotes or line breaks.
    Necessary,
}

impl From<QuotePolicy> for QuoteStyle {
    fn from(policy: QuotePolicy) -> Self {
        match policy {
            QuotePolicy::Always => QuoteStyle::Always,
            QuotePolicy::Necessary => QuoteStyle::Necessary,
        }
    }
}

/// Render `set` as CSV bytes: a header of schema titles, then one line per
/// record. Cells whose source column is absent are written empty.
pub fn render_records(
    set: &RecordSet,
    schema: &OutputSchema,
    quote: QuotePolicy,
) -> Result<Vec<u8>, RemapError> {
    let mut writer = WriterBuilder::new()
        .quote_style(quote.into())
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(schema.titles())?;
    for record in set.records() {
        writer.write_record(schema.sources().map(|s| record.get(s).unwrap_or("")))?;
    }

    writer
        .into_inner()
        .map_err(|e| RemapError::Csv(e.into_error().into()))
}

/// Write `set` to `path`.
///
/// Fails with [`RemapError::Write`] if the destination directory does not
/// exist or is not writable.
pub async fn write_records(
    path: &Path,
    set: &RecordSet,
    schema: &OutputSchema,
    quote: QuotePolicy,
) -> Result<(), RemapError> {
    info!("Writing {} records to {}", set.len(), path.display());

    for source in schema.sources() {
        if !set.columns().iter().any(|c| c == source) {
            warn!("Output column '{source}' not in input, written empty");
        }
    }

    let bytes = render_records(set, schema, quote)?;
    let staging = staging_path(path);
    let write_err = |source| RemapError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(&staging).await.map_err(write_err)?;
    let written: std::io::Result<()> = async {
        file.write_all(&bytes).await?;
        file.sync_all().await
    }
    .await;
    drop(file);

    if let Err(source) = written {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(write_err(source));
    }
    if let Err(source) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(write_err(source));
    }

    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// `dir/.name.tmp` next to `path`.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;

    fn set() -> RecordSet {
        RecordSet::from_rows(
            ["id", "Title", "Content"],
            [["1", "Hello", "<p>a, \"b\"</p>"], ["2", "World", "plain"]],
        )
    }

    #[test]
    fn test_render_always_quotes() {
        let schema = OutputSchema::new(vec![Column::same("id"), Column::same("Title")]);
        let out = render_records(&set(), &schema, QuotePolicy::Always).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"id\",\"Title\"\n\"1\",\"Hello\"\n\"2\",\"World\"\n"
        );
    }

    #[test]
    fn test_render_necessary_quotes() {
        let schema = OutputSchema::new(vec![Column::same("id"), Column::same("Content")]);
        let out = render_records(&set(), &schema, QuotePolicy::Necessary).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,Content\n1,\"<p>a, \"\"b\"\"</p>\"\n2,plain\n"
        );
    }

    #[test]
    fn test_render_schema_order_and_titles() {
        let schema = OutputSchema::new(vec![
            Column::new("Title", "heading"),
            Column::same("id"),
        ]);
        let out = render_records(&set(), &schema, QuotePolicy::Always).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"heading\",\"id\"\n\"Hello\",\"1\"\n\"World\",\"2\"\n"
        );
    }

    #[test]
    fn test_render_missing_source_is_empty() {
        let schema = OutputSchema::new(vec![Column::same("id"), Column::same("Date")]);
        let out = render_records(&set(), &schema, QuotePolicy::Always).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"id\",\"Date\"\n\"1\",\"\"\n\"2\",\"\"\n"
        );
    }

    #[test]
    fn test_render_empty_set_writes_header() {
        let empty = set().with_records(Vec::new());
        let out = render_records(&empty, &OutputSchema::default(), QuotePolicy::Always).unwrap();
        assert_eq!(out.iter().filter(|&&b| b == b'\n').count(), 1);
    }

    #[test]
    fn test_staging_path() {
        assert_eq!(
            staging_path(Path::new("out/posts.csv")),
            PathBuf::from("out/.posts.csv.tmp")
        );
    }

    #[tokio::test]
    async fn test_write_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.csv");
        std::fs::write(&path, "stale").unwrap();

        let schema = OutputSchema::new(vec![Column::same("id")]);
        write_records(&path, &set(), &schema, QuotePolicy::Always)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "\"id\"\n\"1\"\n\"2\"\n");
        assert!(!dir.path().join(".posts.csv.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("posts.csv");
        let err = write_records(&path, &set(), &OutputSchema::default(), QuotePolicy::Always)
            .await
            .unwrap_err();
        assert!(matches!(err, RemapError::Write { .. }));
        assert!(!path.exists());
    }
}
