//! Run configuration.
//!
//! Loaded from an optional TOML file; every key has a default, so an absent
//! file or a partial one is fine. The binary overrides individual values from
//! the command line.
//!
//! ```toml
//! input = "./input/production-posts-en.csv"
//! output = "./output/posts.csv"
//! quote = "always"
//!
//! [transforms]
//! require_image = true
//! unknown_categories = "reject"
//!
//! [taxonomy]
//! General = "general"
//! "How to" = "how-to"
//!
//! [[columns]]
//! source = "Kategorien"
//! title = "categories"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::RemapError;
use crate::schema::OutputSchema;
use crate::taxonomy::Taxonomy;
use crate::transform::{ANNOTATION_PATTERN, UnknownCategoryPolicy};
use crate::writer::QuotePolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub delimiter: char,
    pub quote: QuotePolicy,
    pub transforms: TransformConfig,
    pub taxonomy: Taxonomy,
    pub columns: OutputSchema,
}

/// Which transforms run, and on which fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    pub content_field: String,
    pub category_field: String,
    pub strip_markup: bool,
    pub strip_pattern: String,
    pub remap_categories: bool,
    pub category_separator: String,
    pub output_separator: String,
    pub unknown_categories: UnknownCategoryPolicy,
    pub require_image: bool,
    pub limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("./input/production-posts-en.csv"),
            output: PathBuf::from("./output/output-file-to-be-created.csv"),
            delimiter: ',',
            quote: QuotePolicy::Always,
            transforms: TransformConfig::default(),
            taxonomy: Taxonomy::default(),
            columns: OutputSchema::default(),
        }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            content_field: "Content".to_string(),
            category_field: "Kategorien".to_string(),
            strip_markup: true,
            strip_pattern: ANNOTATION_PATTERN.to_string(),
            remap_categories: true,
            category_separator: "|".to_string(),
            output_separator: ";".to_string(),
            unknown_categories: UnknownCategoryPolicy::default(),
            require_image: false,
            limit: None,
        }
    }
}

impl Config {
    /// Load `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, RemapError> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| RemapError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents, path)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text; `origin` is only used in error messages.
    pub fn parse(contents: &str, origin: &Path) -> Result<Self, RemapError> {
        let config: Self = toml::from_str(contents).map_err(|source| RemapError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), RemapError> {
        self.delimiter_byte()?;
        if self.columns.is_empty() {
            return Err(RemapError::Config("at least one output column is required".into()));
        }
        if self.transforms.category_separator.is_empty() {
            return Err(RemapError::Config("category_separator must not be empty".into()));
        }
        if self.transforms.limit == Some(0) {
            return Err(RemapError::Config("limit must be at least 1".into()));
        }
        Ok(())
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, RemapError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                RemapError::Config(format!("delimiter {:?} is not an ASCII character", self.delimiter))
            })
    }
}
