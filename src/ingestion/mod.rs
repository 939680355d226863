//! Loading entrypoints and implementations.
//!
//! Most callers should use [`crate::dataset::DataSet::open`] or [`load_dataset`], which:
//!
//! - reads the schema from the metadata CSV header
//! - reads records from the JSON `data` array
//! - normalizes every record so each schema field is present
//! - optionally reports each [`LoadEvent`] (and alerts) to a [`LoadObserver`]
//!
//! Source-specific functions are also available under:
//! - [`metadata`]
//! - [`records`]

pub mod metadata;
pub mod observability;
pub mod pipeline;
pub mod records;

pub use metadata::{MetadataFile, MetadataRow, MetadataRows};
pub use observability::{
    CompositeObserver, FieldFill, JsonLinesObserver, LoadContext, LoadEvent, LoadObserver, LoadSeverity,
    LoadStats,
};
pub use pipeline::{load_dataset, KeyLookup, SummaryOptions};
