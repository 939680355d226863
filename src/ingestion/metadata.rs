//! Metadata (schema) loading from a delimited tabular file.
//!
//! The header row is the schema: an ordered, duplicate-free list of field names. Data rows are
//! exposed through [`MetadataFile::rows`], which opens a fresh single-pass cursor on every call.
//!
//! A metadata file may also carry a classification row, i.e. the first data row whose non-empty
//! cells are all class tags (`Categorical` / `Quantitative`):
//!
//! ```text
//! Country,Region,Happiness Score
//! Categorical,Categorical,Quantitative
//! ```
//!
//! When present, its tags become [`Field::class`] on the matching schema fields.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{SourceRole, SummaryError, SummaryResult};
use crate::types::{Field, FieldClass, Schema};

/// A metadata file whose header has been read once into a [`Schema`].
#[derive(Debug, Clone)]
pub struct MetadataFile {
    path: PathBuf,
    schema: Schema,
}

impl MetadataFile {
    /// Open `path` and read its schema.
    ///
    /// Fails with [`SummaryError::NotFound`] before any parse attempt if `path` does not exist.
    pub fn open(path: impl AsRef<Path>) -> SummaryResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SummaryError::NotFound {
                role: SourceRole::Metadata,
                path: path.to_path_buf(),
            });
        }

        let schema = schema_from_reader(File::open(path)?)?;
        tracing::debug!(
            path = %path.display(),
            fields = schema.len(),
            "metadata schema loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            schema,
        })
    }

    #[cfg(test)]
    pub(crate) fn in_memory(schema: Schema) -> Self {
        Self {
            path: PathBuf::new(),
            schema,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Re-open the file and return a cursor over its data rows.
    ///
    /// The cursor is single-pass: once consumed, call `rows` again to read from the start.
    pub fn rows(&self) -> SummaryResult<MetadataRows<File>> {
        if !self.path.exists() {
            return Err(SummaryError::NotFound {
                role: SourceRole::Metadata,
                path: self.path.clone(),
            });
        }
        MetadataRows::from_reader(File::open(&self.path)?)
    }

    /// The first data row, or `None` if the file has only a header.
    pub fn first_row(&self) -> SummaryResult<Option<MetadataRow>> {
        self.rows()?.next().transpose()
    }
}

/// Read a schema (header plus optional classification row) from CSV text.
pub fn schema_from_reader<R: Read>(reader: R) -> SummaryResult<Schema> {
    let mut rows = MetadataRows::from_reader(reader)?;
    let headers: Vec<String> = rows.headers.iter().map(str::to_string).collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(SummaryError::format("metadata header row is empty"));
    }
    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) {
            return Err(SummaryError::format(format!(
                "duplicate field '{name}' in metadata header"
            )));
        }
    }

    let mut classes: Vec<Option<FieldClass>> = vec![None; headers.len()];
    for row in rows.by_ref() {
        if let Some(mut found) = classification_of(&row?) {
            found.resize(headers.len(), None);
            classes = found;
            break;
        }
    }

    let fields = headers
        .into_iter()
        .zip(classes)
        .map(|(name, class)| Field { name, class })
        .collect();
    Ok(Schema::new(fields))
}

/// Returns per-column classes if every non-empty cell of `row` is a class tag.
fn classification_of(row: &MetadataRow) -> Option<Vec<Option<FieldClass>>> {
    let mut any = false;
    let mut out = Vec::with_capacity(row.len());
    for (_, raw) in row.iter() {
        if raw.trim().is_empty() {
            out.push(None);
            continue;
        }
        out.push(Some(FieldClass::from_tag(raw)?));
        any = true;
    }
    any.then_some(out)
}

/// One metadata data row, as `(header, raw value)` pairs.
///
/// Rows shorter than the header simply lack the trailing fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataRow {
    cells: Vec<(String, String)>,
}

impl MetadataRow {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Single-pass cursor over metadata data rows.
pub struct MetadataRows<R> {
    headers: csv::StringRecord,
    records: csv::StringRecordsIntoIter<R>,
}

impl<R: Read> MetadataRows<R> {
    /// Read the header from `reader` and position the cursor at the first data row.
    pub fn from_reader(reader: R) -> SummaryResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();
        Ok(Self {
            headers,
            records: rdr.into_records(),
        })
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }
}

impl<R: Read> Iterator for MetadataRows<R> {
    type Item = SummaryResult<MetadataRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        let cells = self
            .headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        Some(Ok(MetadataRow { cells }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_preserves_header_order() {
        let schema = schema_from_reader("Country,Region,Score\nDenmark,Europe,7.5\n".as_bytes()).unwrap();
        assert_eq!(
            schema.field_names().collect::<Vec<_>>(),
            vec!["Country", "Region", "Score"]
        );
        assert!(schema.fields.iter().all(|f| f.class.is_none()));
    }

    #[test]
    fn classification_row_sets_field_classes() {
        let input = "Country,Region,Score\nCategorical,categorical,Quantitative\n";
        let schema = schema_from_reader(input.as_bytes()).unwrap();
        assert_eq!(
            schema.field("Country").unwrap().class,
            Some(FieldClass::Categorical)
        );
        assert_eq!(
            schema.field("Score").unwrap().class,
            Some(FieldClass::Quantitative)
        );
    }

    #[test]
    fn classification_row_may_follow_other_rows_and_leave_gaps() {
        let input = "Country,Note,Score\nDenmark,x,7.5\nCategorical,,Quantitative\n";
        let schema = schema_from_reader(input.as_bytes()).unwrap();
        assert_eq!(schema.field("Note").unwrap().class, None);
        assert_eq!(
            schema.field("Score").unwrap().class,
            Some(FieldClass::Quantitative)
        );
    }

    #[test]
    fn mixed_row_is_not_a_classification_row() {
        let input = "Country,Score\nCategorical,7.5\n";
        let schema = schema_from_reader(input.as_bytes()).unwrap();
        assert!(schema.fields.iter().all(|f| f.class.is_none()));
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let err = schema_from_reader("a,b,a\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SummaryError::Format { .. }));
        assert!(err.to_string().contains("duplicate field 'a'"));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = schema_from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, SummaryError::Format { .. }));
    }

    #[test]
    fn rows_cursor_is_single_pass() {
        let mut rows = MetadataRows::from_reader("a,b\n1,2\n3\n".as_bytes()).unwrap();
        let first = rows.next().unwrap().unwrap();
        assert_eq!(first.get("b"), Some("2"));
        let second = rows.next().unwrap().unwrap();
        assert_eq!(second.get("a"), Some("3"));
        assert_eq!(second.get("b"), None);
        assert!(rows.next().is_none());
        assert!(rows.next().is_none());
    }

    #[test]
    fn open_missing_file_is_not_found() {
        let err = MetadataFile::open("definitely/not/here.csv").unwrap_err();
        assert!(matches!(
            err,
            SummaryError::NotFound {
                role: SourceRole::Metadata,
                ..
            }
        ));
    }
}
