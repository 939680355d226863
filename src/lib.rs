//! `data-summary` loads a JSON record set into memory, aligns it against the schema described by a
//! CSV metadata file, and answers simple descriptive-statistics queries over it.
//!
//! The primary entrypoint is [`dataset::DataSet::open`] (or [`ingestion::load_dataset`] with
//! [`ingestion::SummaryOptions`]).
//!
//! ## Inputs
//!
//! - **Records** (JSON): a top-level object whose `data` key holds an array of flat objects.
//!   Values may be numbers, strings, booleans, or `null`.
//! - **Metadata** (CSV): the header row is the schema, i.e. the only feature names accepted by
//!   lookups and statistics. An optional row of `Categorical` / `Quantitative` tags classifies
//!   features; categorical features are rejected by `min`/`max`.
//!
//! After loading, every record carries every schema field. Fields a record lacked (or held as
//! `null`) become [`types::Cell::Empty`], which all statistics skip.
//!
//! ## Example
//!
//! ```no_run
//! use data_summary::dataset::DataSet;
//!
//! # fn main() -> Result<(), data_summary::SummaryError> {
//! let ds = DataSet::open("happiness.json", "happiness_metadata.csv")?;
//!
//! println!("records={}", ds.len());
//! println!("mean score={}", ds.mean("Happiness Score")?);
//! println!("regions={:?}", ds.unique("Region")?);
//! println!("most common class={:?}", ds.mode("Class")?);
//!
//! // Categorical features are rejected by min/max.
//! assert!(ds.min("Country").is_err());
//!
//! ds.to_csv("out.csv", "|")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`dataset`]: the loaded dataset, lookups and statistics methods
//! - [`ingestion`]: metadata/record loading, construction options and observers
//! - [`processing`]: statistics implementations (reduce, mode, unique)
//! - [`export`]: delimited flat-file export
//! - [`types`]: schema, record and value types
//! - [`error`]: the error type shared across the crate

pub mod dataset;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use dataset::{DataSet, Entry, Lookup};
pub use error::{SourceRole, SummaryError, SummaryResult};
