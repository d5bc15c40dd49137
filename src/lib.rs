//! # csv-remap
//!
//! Batch transforms for CSV exports of blog posts.
//!
//! A run loads a whole CSV file into memory, pushes every row through an
//! ordered list of row-level transforms and writes the result with a fixed
//! output schema.
//!
//! ## Overview
//!
//! - **Records**: header-keyed rows sharing one column list
//! - **Transforms**: pure maps (`Record -> Record`) and filters (`Record -> bool`)
//! - **Taxonomy**: exact-match category label to slug mapping
//! - **Output schema**: ordered `(source, title)` columns, quoted on output
//!
//! ## Example
//!
//! ```
//! use csv_remap::{Pipeline, RemapCategories, StripMarkup, Taxonomy, parse_records};
//!
//! let input = "id,Content,Kategorien\n\
//!              1,<!-- wp:paragraph -->Hello,General|How to\n";
//! let set = parse_records(input.as_bytes(), b',').unwrap();
//!
//! let out = Pipeline::new()
//!     .map(StripMarkup::annotations("Content").unwrap())
//!     .map(RemapCategories::new("Kategorien", Taxonomy::default()))
//!     .run(set)
//!     .unwrap();
//!
//! assert_eq!(out.records()[0].get("Content"), Some("Hello"));
//! assert_eq!(out.records()[0].get("Kategorien"), Some("general;how-to"));
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod loader;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod taxonomy;
pub mod transform;
pub mod writer;

pub use config::{Config, TransformConfig};
pub use error::RemapError;
pub use executor::{RunSummary, run};
pub use loader::{load_records, parse_records};
pub use pipeline::{Pipeline, StageReport};
pub use record::{Columns, Record, RecordSet};
pub use schema::{Column, OutputSchema};
pub use taxonomy::Taxonomy;
pub use transform::{
    ANNOTATION_PATTERN, Contains, FilterFn, FilterTransform, IMAGE_MARKER, MapFn, MapTransform,
    RemapCategories, StripMarkup, Transform, UnknownCategoryPolicy,
};
pub use writer::{QuotePolicy, render_records, write_records};
