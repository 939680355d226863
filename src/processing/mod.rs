//! Descriptive statistics over a loaded [`crate::dataset::DataSet`].
//!
//! Every operation takes a feature name, fails with [`crate::SummaryError::KeyNotFound`] if it is
//! not a schema field, and skips records holding the empty marker for that feature.
//!
//! - [`reduce()`]: numeric reductions (sum/mean/min/max), plus [`reduce::count`] and
//!   [`reduce::empty`]
//! - [`mode()`] / [`unique()`]: frequency-based operations
//!
//! The same operations are available as methods on `DataSet` (`ds.mean("Score")`, ...).

pub mod frequency;
pub mod reduce;

pub use frequency::{mode, unique};
pub use reduce::{count, empty, reduce, ReduceOp};
