//! Transform pipeline.
//!
//! A [`Pipeline`] is an ordered list of [`Transform`]s applied to a whole
//! [`RecordSet`], one transform at a time: every record goes through the first
//! transform before any record reaches the second.
//!
//! ```
//! use csv_remap::{Contains, Pipeline, RecordSet, RemapCategories, Taxonomy};
//!
//! let set = RecordSet::from_rows(
//!     ["Content", "Kategorien"],
//!     [["<img src=a>", "General|How to"], ["text only", "General"]],
//! );
//!
//! let out = Pipeline::new()
//!     .filter(Contains::image("Content"))
//!     .map(RemapCategories::new("Kategorien", Taxonomy::default()))
//!     .run(set)
//!     .unwrap();
//!
//! assert_eq!(out.len(), 1);
//! assert_eq!(out.records()[0].get("Kategorien"), Some("general;how-to"));
//! ```

use tracing::{debug, warn};

use crate::config::TransformConfig;
use crate::error::RemapError;
use crate::record::RecordSet;
use crate::taxonomy::Taxonomy;
use crate::transform::{
    Contains, FilterTransform, MapTransform, RemapCategories, StripMarkup, Transform,
};

/// Record counts around one transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub name: String,
    pub input_count: usize,
    pub output_count: usize,
}

/// An ordered, stateless list of transforms.
#[derive(Debug, Default)]
pub struct Pipeline {
    transforms: Vec<Transform>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the blog export pipeline described by `config`.
    ///
    /// Order: take, require-image, strip-markup, remap-categories. Disabled
    /// steps are left out.
    pub fn from_config(
        config: &TransformConfig,
        taxonomy: &Taxonomy,
    ) -> Result<Self, RemapError> {
        let mut pipeline = Pipeline::new();

        if let Some(n) = config.limit {
            pipeline = pipeline.take(n);
        }
        if config.require_image {
            pipeline = pipeline.filter(Contains::image(&config.content_field));
        }
        if config.strip_markup {
            let strip = StripMarkup::new(&config.content_field, &config.strip_pattern)?;
            pipeline = pipeline.map(strip);
        }
        if config.remap_categories {
            pipeline = pipeline.map(
                RemapCategories::new(&config.category_field, taxonomy.clone())
                    .policy(config.unknown_categories)
                    .separators(&config.category_separator, &config.output_separator),
            );
        }

        Ok(pipeline)
    }

    /// Append a map transform.
    pub fn map(mut self, transform: impl MapTransform + 'static) -> Self {
        self.transforms.push(Transform::Map(Box::new(transform)));
        self
    }

    /// Append a filter transform.
    pub fn filter(mut self, transform: impl FilterTransform + 'static) -> Self {
        self.transforms.push(Transform::Filter(Box::new(transform)));
        self
    }

    /// Append a truncation to the first `n` records.
    pub fn take(mut self, n: usize) -> Self {
        self.transforms.push(Transform::Take(n));
        self
    }

    pub fn push(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.transforms.iter().map(Transform::name).collect()
    }

    /// Apply every transform in order.
    pub fn run(&self, set: RecordSet) -> Result<RecordSet, RemapError> {
        self.run_traced(set).map(|(set, _)| set)
    }

    /// Apply every transform in order, reporting counts per transform.
    pub fn run_traced(&self, set: RecordSet) -> Result<(RecordSet, Vec<StageReport>), RemapError> {
        let mut current = set;
        let mut reports = Vec::with_capacity(self.transforms.len());

        for transform in &self.transforms {
            let input_count = current.len();
            current = apply_transform(current, transform)?;
            let report = StageReport {
                name: transform.name().to_string(),
                input_count,
                output_count: current.len(),
            };
            debug!(
                "{}: {} -> {} records",
                report.name, report.input_count, report.output_count
            );
            reports.push(report);
        }

        Ok((current, reports))
    }
}

/// Apply a single transform to a whole set.
fn apply_transform(set: RecordSet, transform: &Transform) -> Result<RecordSet, RemapError> {
    match transform {
        Transform::Map(t) => {
            if let Some(field) = t.target_field()
                && !set.columns().iter().any(|c| c == field)
            {
                warn!("{}: column '{field}' not in input, skipped", t.name());
                return Ok(set);
            }
            let records = set
                .records()
                .iter()
                .map(|r| t.map(r))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(set.with_records(records))
        }
        Transform::Filter(t) => {
            let records = set.records().iter().filter(|r| t.keep(r)).cloned().collect();
            Ok(set.with_records(records))
        }
        Transform::Take(n) => {
            let records = set.records().iter().take(*n).cloned().collect();
            Ok(set.with_records(records))
        }
    }
}
