//! The loaded, normalized dataset and its lookup/statistics surface.
//!
//! A [`DataSet`] is only obtainable through construction ([`DataSet::open`]), which guarantees that
//! every record holds an entry for every schema field. Nothing after construction re-reads the JSON
//! source; keyed lookups in [`KeyLookup::MetadataRow`] mode re-open the metadata file.

use std::path::{Path, PathBuf};

use crate::error::{SummaryError, SummaryResult};
use crate::export;
use crate::ingestion::metadata::MetadataFile;
use crate::ingestion::pipeline::{load_dataset, KeyLookup, SummaryOptions};
use crate::processing::{frequency, reduce, ReduceOp};
use crate::types::{Cell, Record, Schema, Value};

/// Argument of [`DataSet::get`]: a record position or a schema field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Position in load order. Negative positions are out of range. Wide enough to carry any
    /// `usize` or `i64` argument unchanged.
    Index(i128),
    /// Schema field name.
    Key(String),
}

impl Lookup {
    /// Build a lookup from a dynamically-typed JSON argument.
    ///
    /// Integers become [`Lookup::Index`], strings become [`Lookup::Key`]; every other shape
    /// (float, bool, null, array, object) fails with [`SummaryError::Type`].
    pub fn from_json(arg: &serde_json::Value) -> SummaryResult<Self> {
        match arg {
            serde_json::Value::String(s) => Ok(Lookup::Key(s.clone())),
            serde_json::Value::Number(n) => match n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from))
            {
                Some(i) => Ok(Lookup::Index(i)),
                None => Err(SummaryError::Type {
                    message: format!("lookup index must be an integer, got {n}"),
                }),
            },
            other => Err(SummaryError::Type {
                message: format!("lookup argument must be an integer or a string, got {other}"),
            }),
        }
    }
}

impl From<usize> for Lookup {
    fn from(i: usize) -> Self {
        Lookup::Index(i as i128)
    }
}

impl From<i64> for Lookup {
    fn from(i: i64) -> Self {
        Lookup::Index(i128::from(i))
    }
}

impl From<i32> for Lookup {
    fn from(i: i32) -> Self {
        Lookup::Index(i128::from(i))
    }
}

impl From<&str> for Lookup {
    fn from(key: &str) -> Self {
        Lookup::Key(key.to_string())
    }
}

impl From<String> for Lookup {
    fn from(key: String) -> Self {
        Lookup::Key(key)
    }
}

/// Result of [`DataSet::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<'a> {
    /// A whole record (positional lookup).
    Record(&'a Record),
    /// A single value (keyed lookup).
    Value(Cell),
}

impl<'a> Entry<'a> {
    pub fn as_record(&self) -> Option<&'a Record> {
        match self {
            Entry::Record(r) => Some(*r),
            Entry::Value(_) => None,
        }
    }

    pub fn into_cell(self) -> Option<Cell> {
        match self {
            Entry::Value(c) => Some(c),
            Entry::Record(_) => None,
        }
    }
}

/// In-memory record set aligned against a metadata schema.
#[derive(Debug, Clone)]
pub struct DataSet {
    data_path: PathBuf,
    metadata: MetadataFile,
    records: Vec<Record>,
    key_lookup: KeyLookup,
}

impl DataSet {
    /// Load `data_path` (JSON) against the schema in `metadata_path` (CSV) with default options.
    ///
    /// Missing files are reported as [`SummaryError::NotFound`], data file first.
    pub fn open(data_path: impl AsRef<Path>, metadata_path: impl AsRef<Path>) -> SummaryResult<Self> {
        load_dataset(data_path, metadata_path, &SummaryOptions::default())
    }

    /// Like [`DataSet::open`], with explicit options.
    pub fn open_with_options(
        data_path: impl AsRef<Path>,
        metadata_path: impl AsRef<Path>,
        options: &SummaryOptions,
    ) -> SummaryResult<Self> {
        load_dataset(data_path, metadata_path, options)
    }

    /// Assemble a dataset from already-normalized records.
    pub(crate) fn from_parts(
        data_path: PathBuf,
        metadata: MetadataFile,
        records: Vec<Record>,
        key_lookup: KeyLookup,
    ) -> Self {
        Self {
            data_path,
            metadata,
            records,
            key_lookup,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn schema(&self) -> &Schema {
        self.metadata.schema()
    }

    /// Schema field names, in metadata header order.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.schema().field_names()
    }

    /// Records in load order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn metadata_path(&self) -> &Path {
        self.metadata.path()
    }

    pub fn key_lookup(&self) -> KeyLookup {
        self.key_lookup
    }

    /// Dispatch on the lookup shape: positions return a record, names return a value.
    ///
    /// ```no_run
    /// use data_summary::dataset::{DataSet, Entry};
    ///
    /// # fn main() -> Result<(), data_summary::SummaryError> {
    /// let ds = DataSet::open("happiness.json", "happiness_metadata.csv")?;
    /// if let Entry::Record(r) = ds.get(3usize)? {
    ///     println!("{r:?}");
    /// }
    /// let country = ds.get("Country")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, key: impl Into<Lookup>) -> SummaryResult<Entry<'_>> {
        match key.into() {
            Lookup::Index(i) => {
                let idx = usize::try_from(i).map_err(|_| SummaryError::IndexOutOfRange {
                    index: i,
                    len: self.len(),
                })?;
                self.record(idx).map(Entry::Record)
            }
            Lookup::Key(k) => self.lookup(&k).map(Entry::Value),
        }
    }

    /// The record at `index` in load order.
    pub fn record(&self, index: usize) -> SummaryResult<&Record> {
        self.records
            .get(index)
            .ok_or_else(|| SummaryError::IndexOutOfRange {
                index: index as i128,
                len: self.len(),
            })
    }

    /// Value of schema field `key` in the designated lookup row.
    ///
    /// With the default [`KeyLookup::MetadataRow`] the row is the metadata file's first data row,
    /// not a dataset record. A metadata file with no data rows yields [`Cell::Empty`].
    pub fn lookup(&self, key: &str) -> SummaryResult<Cell> {
        self.require_feature(key)?;

        match self.key_lookup {
            KeyLookup::MetadataRow => {
                let row = self.metadata.first_row()?;
                Ok(row
                    .as_ref()
                    .and_then(|r| r.get(key))
                    .map(|raw| Cell::Present(Value::Utf8(raw.to_string())))
                    .unwrap_or(Cell::Empty))
            }
            KeyLookup::FirstRecord => {
                let record = self.record(0)?;
                Ok(record.get(key).cloned().unwrap_or(Cell::Empty))
            }
        }
    }

    pub(crate) fn require_feature(&self, feature: &str) -> SummaryResult<()> {
        if self.schema().contains(feature) {
            Ok(())
        } else {
            Err(SummaryError::key_not_found(feature))
        }
    }

    /// Present values of `feature` with their record positions, skipping empty markers.
    pub fn present_values<'a>(
        &'a self,
        feature: &'a str,
    ) -> SummaryResult<impl Iterator<Item = (usize, &'a Value)> + 'a> {
        self.require_feature(feature)?;
        Ok(self
            .records
            .iter()
            .enumerate()
            .filter_map(move |(i, r)| r.get(feature).and_then(Cell::value).map(|v| (i, v))))
    }

    /// Arithmetic total of the numeric-coerced present values.
    pub fn sum(&self, feature: &str) -> SummaryResult<f64> {
        reduce::reduce(self, feature, ReduceOp::Sum)
    }

    /// Number of records where `feature` is present.
    pub fn count(&self, feature: &str) -> SummaryResult<usize> {
        reduce::count(self, feature)
    }

    /// `sum / count`; fails with [`SummaryError::Division`] when nothing is present.
    pub fn mean(&self, feature: &str) -> SummaryResult<f64> {
        reduce::reduce(self, feature, ReduceOp::Mean)
    }

    /// All most-frequent values, in first-occurrence order.
    pub fn mode(&self, feature: &str) -> SummaryResult<Vec<Value>> {
        frequency::mode(self, feature)
    }

    /// Sorted distinct present values.
    pub fn unique(&self, feature: &str) -> SummaryResult<Vec<Value>> {
        frequency::unique(self, feature)
    }

    pub fn min(&self, feature: &str) -> SummaryResult<f64> {
        reduce::reduce(self, feature, ReduceOp::Min)
    }

    pub fn max(&self, feature: &str) -> SummaryResult<f64> {
        reduce::reduce(self, feature, ReduceOp::Max)
    }

    /// Number of records holding the empty marker for `feature`.
    pub fn empty(&self, feature: &str) -> SummaryResult<usize> {
        reduce::empty(self, feature)
    }

    /// Write every record as one `delimiter`-joined line, empty markers as empty strings.
    ///
    /// Overwrites `path`. Records are not modified. Returns the number of lines written.
    pub fn export(&self, path: impl AsRef<Path>, delimiter: &str) -> SummaryResult<usize> {
        export::export_to_path(&self.records, path, delimiter)
    }

    /// Alias of [`DataSet::export`].
    pub fn to_csv(&self, path: impl AsRef<Path>, delimiter: &str) -> SummaryResult<usize> {
        self.export(path, delimiter)
    }
}
