use std::fs;

use data_summary::dataset::{DataSet, Entry, Lookup};
use data_summary::ingestion::{KeyLookup, SummaryOptions};
use data_summary::types::{Cell, FieldClass, Value};
use data_summary::{SourceRole, SummaryError};

const DATA: &str = "tests/fixtures/happiness.json";
const META: &str = "tests/fixtures/happiness_metadata.csv";
const META_PLAIN: &str = "tests/fixtures/happiness_metadata_plain.csv";

fn utf8(s: &str) -> Cell {
    Cell::Present(Value::Utf8(s.to_string()))
}

#[test]
fn open_happy_path_loads_and_normalizes() {
    let ds = DataSet::open(DATA, META).unwrap();

    assert_eq!(ds.len(), 5);
    assert_eq!(
        ds.features().collect::<Vec<_>>(),
        vec!["Country", "Region", "Happiness Score", "Class"]
    );
    for record in ds.records() {
        for feature in ds.features() {
            assert!(record.contains_key(feature), "missing {feature}");
        }
    }

    let chad = ds.record(4).unwrap();
    assert_eq!(chad.get("Happiness Score"), Some(&Cell::Empty));
    assert_eq!(chad.get("Country"), Some(&utf8("Chad")));
}

#[test]
fn classification_row_is_read_from_metadata() {
    let ds = DataSet::open(DATA, META).unwrap();
    assert_eq!(
        ds.schema().field("Happiness Score").unwrap().class,
        Some(FieldClass::Quantitative)
    );
    assert_eq!(
        ds.schema().field("Country").unwrap().class,
        Some(FieldClass::Categorical)
    );

    let plain = DataSet::open(DATA, META_PLAIN).unwrap();
    assert!(plain.schema().fields.iter().all(|f| f.class.is_none()));
}

#[test]
fn missing_data_file_is_reported_before_missing_metadata() {
    let err = DataSet::open("tests/fixtures/nope.json", "tests/fixtures/nope.csv").unwrap_err();
    assert!(matches!(
        err,
        SummaryError::NotFound {
            role: SourceRole::Data,
            ..
        }
    ));
    assert!(err.to_string().contains("datafile not found"));
}

#[test]
fn missing_metadata_file_is_not_found() {
    let err = DataSet::open(DATA, "tests/fixtures/nope.csv").unwrap_err();
    assert!(matches!(
        err,
        SummaryError::NotFound {
            role: SourceRole::Metadata,
            ..
        }
    ));
}

#[test]
fn missing_data_key_is_format_error() {
    let err = DataSet::open("tests/fixtures/no_data_key.json", META).unwrap_err();
    assert!(matches!(err, SummaryError::Format { .. }));
}

#[test]
fn positional_get_returns_records_in_load_order() {
    let ds = DataSet::open(DATA, META).unwrap();
    let names = ["Denmark", "Switzerland", "Iceland", "Costa Rica", "Chad"];

    for (i, name) in names.iter().enumerate() {
        let record = ds.get(i).unwrap().as_record().unwrap();
        assert_eq!(record.get("Country"), Some(&utf8(name)));
        assert_eq!(ds.record(i).unwrap(), record);
    }
}

#[test]
fn positional_get_out_of_range_is_error() {
    let ds = DataSet::open(DATA, META).unwrap();

    let err = ds.get(ds.len()).unwrap_err();
    assert!(matches!(err, SummaryError::IndexOutOfRange { index: 5, len: 5 }));

    let err = ds.get(-1i64).unwrap_err();
    assert!(matches!(err, SummaryError::IndexOutOfRange { index: -1, .. }));
}

#[test]
fn out_of_range_error_reports_the_requested_index() {
    let ds = DataSet::open(DATA, META).unwrap();

    let err = ds.get(usize::MAX).unwrap_err();
    assert!(
        matches!(err, SummaryError::IndexOutOfRange { index, len: 5 } if index == usize::MAX as i128)
    );
    assert_eq!(
        err.to_string(),
        format!("index {} out of range for 5 records", usize::MAX)
    );

    let err = ds.record(usize::MAX).unwrap_err();
    assert!(matches!(err, SummaryError::IndexOutOfRange { index, .. } if index == usize::MAX as i128));

    let err = ds.get(i64::MIN).unwrap_err();
    assert!(matches!(err, SummaryError::IndexOutOfRange { index, .. } if index == i128::from(i64::MIN)));
}

#[test]
fn keyed_get_reads_first_metadata_row_not_dataset() {
    let ds = DataSet::open(DATA, META_PLAIN).unwrap();

    assert_eq!(ds.get("Country").unwrap(), Entry::Value(utf8("Norway")));
    assert_eq!(ds.lookup("Happiness Score").unwrap(), utf8("7.498"));
    // Re-reads from the start on every call.
    assert_eq!(ds.lookup("Country").unwrap(), utf8("Norway"));
    assert!(ds.records().all(|r| r.get("Country") != Some(&utf8("Norway"))));
}

#[test]
fn keyed_get_returns_classification_row_when_it_is_first() {
    let ds = DataSet::open(DATA, META).unwrap();
    assert_eq!(ds.lookup("Country").unwrap(), utf8("Categorical"));
}

#[test]
fn keyed_get_unknown_feature_is_key_not_found() {
    let ds = DataSet::open(DATA, META).unwrap();

    for key in ["GDP", "data", "country"] {
        let err = ds.get(key).unwrap_err();
        assert!(matches!(err, SummaryError::KeyNotFound { .. }), "{key}");
    }
}

#[test]
fn first_record_lookup_option_reads_dataset() {
    let opts = SummaryOptions {
        key_lookup: KeyLookup::FirstRecord,
        ..Default::default()
    };
    let ds = DataSet::open_with_options(DATA, META_PLAIN, &opts).unwrap();
    assert_eq!(ds.lookup("Country").unwrap(), utf8("Denmark"));
    assert!(matches!(
        ds.lookup("GDP").unwrap_err(),
        SummaryError::KeyNotFound { .. }
    ));
}

#[test]
fn lookup_from_json_rejects_other_shapes() {
    assert_eq!(
        Lookup::from_json(&serde_json::json!(3)).unwrap(),
        Lookup::Index(3)
    );
    assert_eq!(
        Lookup::from_json(&serde_json::json!(u64::MAX)).unwrap(),
        Lookup::Index(i128::from(u64::MAX))
    );
    assert_eq!(
        Lookup::from_json(&serde_json::json!("Region")).unwrap(),
        Lookup::Key("Region".to_string())
    );
    for bad in [
        serde_json::json!(1.5),
        serde_json::json!(true),
        serde_json::json!(null),
        serde_json::json!([1]),
        serde_json::json!({"k": 1}),
    ] {
        let err = Lookup::from_json(&bad).unwrap_err();
        assert!(matches!(err, SummaryError::Type { .. }), "{bad}");
    }
}

#[test]
fn null_values_and_extra_keys_are_handled() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = dir.path().join("data.json");
    let meta = dir.path().join("meta.csv");
    fs::write(
        &data,
        r#"{"data": [{"b": null, "extra": 1, "a": "x"}, {"a": "y"}]}"#,
    )
    .unwrap();
    fs::write(&meta, "a,b\n").unwrap();

    let ds = DataSet::open(&data, &meta).unwrap();
    let first = ds.record(0).unwrap();
    assert_eq!(first.keys().collect::<Vec<_>>(), vec!["b", "extra", "a"]);
    assert_eq!(first.get("b"), Some(&Cell::Empty));
    assert_eq!(ds.record(1).unwrap().keys().collect::<Vec<_>>(), vec!["a", "b"]);

    assert_eq!(ds.empty("b").unwrap(), 2);
    assert!(matches!(
        ds.count("extra").unwrap_err(),
        SummaryError::KeyNotFound { .. }
    ));
    // Header-only metadata: keyed lookups have no row to answer from.
    assert_eq!(ds.lookup("a").unwrap(), Cell::Empty);
}
