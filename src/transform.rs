//! Row-level transforms.
//!
//! A transform is either a *map* (one record in, one new record out) or a
//! *filter* (a predicate deciding which records survive). Maps never mutate
//! their input: they return a fresh [`Record`] built with
//! [`Record::with_value`].
//!
//! Concrete transforms:
//! - [`StripMarkup`] - remove editor annotation comments from a body field
//! - [`RemapCategories`] - rewrite `|`-separated labels to `;`-separated slugs
//! - [`Contains`] - keep records whose field contains a substring (e.g. `<img`)
//! - [`MapFn`] / [`FilterFn`] - wrap closures as transforms

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RemapError;
use crate::record::Record;
use crate::taxonomy::Taxonomy;

/// Editor annotation comments: `<!--`, whitespace, anything up to a bare `>`.
pub const ANNOTATION_PATTERN: &str = r"<!--\s+[^>]+>";

/// Marker of an embedded image in rich-text content.
pub const IMAGE_MARKER: &str = "<img";

/// A record-to-record transform.
pub trait MapTransform: Send + Sync {
    /// Produce the transformed copy of `record`.
    fn map(&self, record: &Record) -> Result<Record, RemapError>;

    /// The display name of this transform.
    fn name(&self) -> &str;

    /// The column this transform rewrites, if it rewrites exactly one.
    ///
    /// The pipeline skips the transform for a set whose header lacks it.
    fn target_field(&self) -> Option<&str> {
        None
    }
}

/// A record predicate; records for which `keep` is false are dropped.
pub trait FilterTransform: Send + Sync {
    fn keep(&self, record: &Record) -> bool;

    fn name(&self) -> &str;
}

/// One entry in a pipeline's transform list.
pub enum Transform {
    Map(Box<dyn MapTransform>),
    Filter(Box<dyn FilterTransform>),
    /// Keep only the first `n` records.
    Take(usize),
}

impl Transform {
    pub fn name(&self) -> &str {
        match self {
            Transform::Map(t) => t.name(),
            Transform::Filter(t) => t.name(),
            Transform::Take(_) => "take",
        }
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transform::Map(t) => write!(f, "Map({})", t.name()),
            Transform::Filter(t) => write!(f, "Filter({})", t.name()),
            Transform::Take(n) => write!(f, "Take({n})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Markup stripping
// ---------------------------------------------------------------------------

/// Removes every non-overlapping match of a pattern from one field.
#[derive(Debug, Clone)]
pub struct StripMarkup {
    field: String,
    pattern: Regex,
}

impl StripMarkup {
    /// Strip [`ANNOTATION_PATTERN`] matches from `field`.
    pub fn annotations(field: impl Into<String>) -> Result<Self, RemapError> {
        Self::new(field, ANNOTATION_PATTERN)
    }

    pub fn new(field: impl Into<String>, pattern: &str) -> Result<Self, RemapError> {
        Ok(Self {
            field: field.into(),
            pattern: Regex::new(pattern)?,
        })
    }

    /// Strip matches from a single value.
    pub fn strip(&self, value: &str) -> String {
        self.pattern.replace_all(value, "").into_owned()
    }
}

impl MapTransform for StripMarkup {
    fn map(&self, record: &Record) -> Result<Record, RemapError> {
        match record.get(&self.field) {
            Some(value) => Ok(record.with_value(&self.field, self.strip(value))),
            None => {
                warn!(
                    row = record.row(),
                    field = %self.field,
                    "Field absent, markup not stripped"
                );
                Ok(record.clone())
            }
        }
    }

    fn name(&self) -> &str {
        "strip-markup"
    }

    fn target_field(&self) -> Option<&str> {
        Some(&self.field)
    }
}

// ---------------------------------------------------------------------------
// Category remapping
// ---------------------------------------------------------------------------

/// What to do with a category label missing from the taxonomy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownCategoryPolicy {
    /// Keep the original label in the output.
    #[default]
    PassThrough,
    /// Leave the label out of the output.
    Drop,
    /// Fail the run.
    Reject,
}

/// Splits a category field, maps each label through a [`Taxonomy`] and joins
/// the slugs.
#[derive(Debug, Clone)]
pub struct RemapCategories {
    field: String,
    taxonomy: Taxonomy,
    policy: UnknownCategoryPolicy,
    input_separator: String,
    output_separator: String,
}

impl RemapCategories {
    /// `|` in, `;` out, unknown labels passed through.
    pub fn new(field: impl Into<String>, taxonomy: Taxonomy) -> Self {
        Self {
            field: field.into(),
            taxonomy,
            policy: UnknownCategoryPolicy::default(),
            input_separator: "|".to_string(),
            output_separator: ";".to_string(),
        }
    }

    pub fn policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn separators(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input_separator = input.into();
        self.output_separator = output.into();
        self
    }

    /// Remap a single raw value. `row` is only used for diagnostics.
    pub fn remap(&self, raw: &str, row: usize) -> Result<String, RemapError> {
        if raw.is_empty() {
            return Ok(String::new());
        }

        let mut slugs = Vec::new();
        for label in raw.split(self.input_separator.as_str()) {
            if let Some(slug) = self.taxonomy.lookup(label) {
                slugs.push(slug);
                continue;
            }
            match self.policy {
                UnknownCategoryPolicy::PassThrough => {
                    warn!(row, label, "Unknown category kept as is");
                    slugs.push(label);
                }
                UnknownCategoryPolicy::Drop => {
                    warn!(row, label, "Unknown category dropped");
                }
                UnknownCategoryPolicy::Reject => {
                    return Err(RemapError::UnknownCategory {
                        label: label.to_string(),
                        row,
                    });
                }
            }
        }
        Ok(slugs.join(&self.output_separator))
    }
}

impl MapTransform for RemapCategories {
    fn map(&self, record: &Record) -> Result<Record, RemapError> {
        match record.get(&self.field) {
            Some(raw) => {
                let mapped = self.remap(raw, record.row())?;
                Ok(record.with_value(&self.field, mapped))
            }
            None => {
                warn!(
                    row = record.row(),
                    field = %self.field,
                    "Category field absent, record left unchanged"
                );
                Ok(record.clone())
            }
        }
    }

    fn name(&self) -> &str {
        "remap-categories"
    }

    fn target_field(&self) -> Option<&str> {
        Some(&self.field)
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Keeps records whose `field` contains `needle`. Absent cells never match.
#[derive(Debug, Clone)]
pub struct Contains {
    field: String,
    needle: String,
    name: String,
}

impl Contains {
    pub fn new(field: impl Into<String>, needle: impl Into<String>) -> Self {
        let field = field.into();
        let needle = needle.into();
        let name = format!("contains({field}, {needle})");
        Self {
            field,
            needle,
            name,
        }
    }

    /// Keep only records whose `field` embeds an image.
    pub fn image(field: impl Into<String>) -> Self {
        Self {
            name: "require-image".to_string(),
            ..Self::new(field, IMAGE_MARKER)
        }
    }
}

impl FilterTransform for Contains {
    fn keep(&self, record: &Record) -> bool {
        record
            .get(&self.field)
            .is_some_and(|v| v.contains(self.needle.as_str()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Closure adapters
// ---------------------------------------------------------------------------

/// A named closure used as a map transform.
pub struct MapFn<F> {
    name: String,
    f: F,
}

impl<F> MapFn<F>
where
    F: Fn(&Record) -> Record + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> MapTransform for MapFn<F>
where
    F: Fn(&Record) -> Record + Send + Sync,
{
    fn map(&self, record: &Record) -> Result<Record, RemapError> {
        Ok((self.f)(record))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A named closure used as a filter transform.
pub struct FilterFn<F> {
    name: String,
    f: F,
}

impl<F> FilterFn<F>
where
    F: Fn(&Record) -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> FilterTransform for FilterFn<F>
where
    F: Fn(&Record) -> bool + Send + Sync,
{
    fn keep(&self, record: &Record) -> bool {
        (self.f)(record)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Columns;

    fn columns() -> Columns {
        ["id", "Content", "Kategorien"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn post(content: &str, categories: &str) -> Record {
        Record::from_cells(1, columns(), ["1", content, categories])
    }

    // --- StripMarkup ---

    #[test]
    fn test_strip_block_annotations() {
        let strip = StripMarkup::annotations("Content").unwrap();
        let input = "<!-- wp:paragraph --><p>Hi</p><!-- /wp:paragraph -->";
        assert_eq!(strip.strip(input), "<p>Hi</p>");
    }

    #[test]
    fn test_strip_keeps_other_html() {
        let strip = StripMarkup::annotations("Content").unwrap();
        let input = "<p class=\"a\">x</p><img src=\"y.png\">";
        assert_eq!(strip.strip(input), input);
    }

    #[test]
    fn test_strip_requires_whitespace_after_opener() {
        let strip = StripMarkup::annotations("Content").unwrap();
        assert_eq!(strip.strip("<!--tight-->x"), "<!--tight-->x");
    }

    #[test]
    fn test_strip_stops_at_first_bare_gt() {
        let strip = StripMarkup::annotations("Content").unwrap();
        assert_eq!(
            strip.strip("<!-- wp:image {\"id\":5} -->\n<figure>"),
            "\n<figure>"
        );
        assert_eq!(strip.strip("<!-- a > b -->"), " b -->");
    }

    #[test]
    fn test_strip_multiline_annotation() {
        let strip = StripMarkup::annotations("Content").unwrap();
        assert_eq!(strip.strip("a<!--\n  wp:list\n-->b"), "ab");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let strip = StripMarkup::annotations("Content").unwrap();
        let input = "<!-- wp:heading --><h2>T</h2><!-- /wp:heading -->\n\
                     <!-- wp:paragraph --><p>Hello<img src=x></p><!-- /wp:paragraph -->";
        let once = strip.strip(input);
        assert_eq!(strip.strip(&once), once);
    }

    #[test]
    fn test_strip_map_returns_new_record() {
        let strip = StripMarkup::annotations("Content").unwrap();
        let r = post("<!-- wp:paragraph -->Hello", "General");
        let out = strip.map(&r).unwrap();
        assert_eq!(out.get("Content"), Some("Hello"));
        assert_eq!(r.get("Content"), Some("<!-- wp:paragraph -->Hello"));
        assert_eq!(out.get("Kategorien"), Some("General"));
    }

    #[test]
    fn test_strip_invalid_pattern() {
        let err = StripMarkup::new("Content", "(unclosed").unwrap_err();
        assert!(matches!(err, RemapError::Pattern(_)));
    }

    // --- RemapCategories ---

    #[test]
    fn test_remap_known_labels_in_order() {
        let remap = RemapCategories::new("Kategorien", Taxonomy::default());
        assert_eq!(
            remap.remap("How to|General|Userstory", 1).unwrap(),
            "how-to;general;userstory"
        );
    }

    #[test]
    fn test_remap_every_known_label() {
        let taxonomy = Taxonomy::default();
        let remap = RemapCategories::new("Kategorien", taxonomy.clone());
        for (label, slug) in taxonomy.iter() {
            assert_eq!(remap.remap(label, 1).unwrap(), slug);
        }
        let all: Vec<&str> = taxonomy.iter().map(|(l, _)| l).collect();
        let out = remap.remap(&all.join("|"), 1).unwrap();
        assert_eq!(out.split(';').count(), taxonomy.len());
    }

    #[test]
    fn test_remap_unknown_pass_through() {
        let remap = RemapCategories::new("Kategorien", Taxonomy::default());
        assert_eq!(remap.remap("General|Bogus", 1).unwrap(), "general;Bogus");
    }

    #[test]
    fn test_remap_unknown_drop() {
        let remap = RemapCategories::new("Kategorien", Taxonomy::default())
            .policy(UnknownCategoryPolicy::Drop);
        assert_eq!(remap.remap("General|Bogus", 1).unwrap(), "general");
    }

    #[test]
    fn test_remap_unknown_reject() {
        let remap = RemapCategories::new("Kategorien", Taxonomy::default())
            .policy(UnknownCategoryPolicy::Reject);
        let err = remap.remap("General|Bogus", 7).unwrap_err();
        match err {
            RemapError::UnknownCategory { label, row } => {
                assert_eq!(label, "Bogus");
                assert_eq!(row, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_remap_empty_value_stays_empty() {
        let remap = RemapCategories::new("Kategorien", Taxonomy::default())
            .policy(UnknownCategoryPolicy::Reject);
        assert_eq!(remap.remap("", 1).unwrap(), "");
    }

    #[test]
    fn test_remap_custom_separators() {
        let remap =
            RemapCategories::new("Kategorien", Taxonomy::default()).separators(",", " / ");
        assert_eq!(remap.remap("General,How to", 1).unwrap(), "general / how-to");
    }

    #[test]
    fn test_remap_absent_field_is_skipped() {
        let remap = RemapCategories::new("Kategorien", Taxonomy::default())
            .policy(UnknownCategoryPolicy::Reject);
        let r = Record::new(2, columns(), vec![Some("1".into()), Some("x".into())]);
        let out = remap.map(&r).unwrap();
        assert_eq!(out, r);
        assert_eq!(out.get("Kategorien"), None);
    }

    // --- Filters ---

    #[test]
    fn test_contains_image() {
        let f = Contains::image("Content");
        assert_eq!(f.name(), "require-image");
        assert!(f.keep(&post("Hello<img src=x>", "")));
        assert!(!f.keep(&post("Hello", "")));
        let short = Record::new(1, columns(), vec![Some("1".into())]);
        assert!(!f.keep(&short));
    }

    #[test]
    fn test_closure_adapters() {
        let upper = MapFn::new("upper", |r: &Record| {
            let v = r.get("Content").unwrap_or_default().to_uppercase();
            r.with_value("Content", v)
        });
        let out = upper.map(&post("abc", "")).unwrap();
        assert_eq!(out.get("Content"), Some("ABC"));

        let odd = FilterFn::new("odd", |r: &Record| r.row() % 2 == 1);
        assert!(odd.keep(&post("a", "")));
        assert_eq!(odd.name(), "odd");
    }

    #[test]
    fn test_transform_names() {
        let t = Transform::Filter(Box::new(Contains::image("Content")));
        assert_eq!(t.name(), "require-image");
        assert_eq!(Transform::Take(2).name(), "take");
        assert_eq!(format!("{:?}", Transform::Take(2)), "Take(2)");
    }
}
