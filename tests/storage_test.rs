//! Parquet load/write tests for the session table

mod common;

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, Float64Array, Int32Array, Int64Array, RecordBatch, StringArray,
    TimestampMicrosecondArray,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit, TimestampNanosecondType};
use parquet::arrow::ArrowWriter;
use presocial_dash::storage::SessionTable;
use presocial_dash::Error;
use tempfile::TempDir;

#[test]
fn test_parquet_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("presocial_data.parquet");

    let table = common::sample_table();
    table.write_parquet(&path).unwrap();
    let loaded = SessionTable::load_parquet(&path).unwrap();

    assert_eq!(loaded.len(), 9);
    assert_eq!(loaded, table);
    assert_eq!(loaded.subjects(), common::SUBJECTS.to_vec());
}

#[test]
fn test_load_keeps_file_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sessions.parquet");

    let table = common::sample_table();
    table.write_parquet(&path).unwrap();
    let loaded = SessionTable::load_parquet(&path).unwrap();

    // Written newest day first
    assert_eq!(loaded.sessions()[0].enter, common::enter(2));
    let sorted = loaded.sorted_sessions();
    assert_eq!(sorted[0].subject, "BAA-1103045");
    assert_eq!(sorted[0].enter, common::enter(0));
}

#[test]
fn test_parquet_missing_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("weight_enter", DataType::Float64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec!["BAA-1103045"])) as ArrayRef,
            Arc::new(Float64Array::from(vec![Some(25.0)])) as ArrayRef,
        ],
    )
    .unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let err = SessionTable::load_parquet(&path).unwrap_err();
    assert!(matches!(err, Error::MissingColumn(_)), "got {err}");
}

#[test]
fn test_empty_table_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.parquet");

    SessionTable::default().write_parquet(&path).unwrap();
    let loaded = SessionTable::load_parquet(&path).unwrap();
    assert!(loaded.is_empty());
}

/// Sample table as a batch with one column swapped out.
fn batch_with(name: &str, array: ArrayRef) -> RecordBatch {
    let batch = common::sample_table().to_record_batch().unwrap();
    let schema = batch.schema();
    let idx = schema.index_of(name).unwrap();

    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    fields[idx] = Field::new(name, array.data_type().clone(), true);
    let mut columns = batch.columns().to_vec();
    columns[idx] = array;
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
}

fn recast(name: &str, to: &DataType) -> RecordBatch {
    let batch = common::sample_table().to_record_batch().unwrap();
    let column = batch.column_by_name(name).unwrap();
    batch_with(name, cast(column, to).unwrap())
}

#[test]
fn test_decode_nanosecond_timestamps_any_zone() {
    let expected = common::sample_table();
    let batch = expected.to_record_batch().unwrap();
    let ns = cast(
        batch.column_by_name("enter").unwrap(),
        &DataType::Timestamp(TimeUnit::Nanosecond, None),
    )
    .unwrap();
    // Same instants, zone attached as metadata the way pandas writes it
    for zone in [None, Some("UTC"), Some("Europe/London")] {
        let zoned = ns
            .as_primitive::<TimestampNanosecondType>()
            .clone()
            .with_timezone_opt(zone);
        let decoded =
            SessionTable::from_batches(&[batch_with("enter", Arc::new(zoned))]).unwrap();
        assert_eq!(decoded.sessions()[0].enter, expected.sessions()[0].enter, "{zone:?}");
        assert_eq!(decoded, expected);
    }
}

#[test]
fn test_decode_nanosecond_threshold_times() {
    let item = DataType::Timestamp(TimeUnit::Nanosecond, Some("UTC".into()));
    let list = DataType::List(Arc::new(Field::new("item", item, true)));
    let decoded = SessionTable::from_batches(&[recast("post_easy_pel_thresh_idx", &list)]).unwrap();
    assert_eq!(decoded, common::sample_table());
}

#[test]
fn test_decode_integer_numerics() {
    let rows = common::sample_table().len();
    let duration = Arc::new(Int32Array::from(vec![3600; rows])) as ArrayRef;
    let pellets = Arc::new(Int64Array::from(vec![Some(4); rows])) as ArrayRef;

    let decoded = SessionTable::from_batches(&[batch_with("duration", duration)]).unwrap();
    assert!(decoded.sessions().iter().all(|s| s.duration_secs == Some(3600.0)));

    let decoded = SessionTable::from_batches(&[batch_with("pre_easy_n_pel", pellets)]).unwrap();
    assert!(decoded.sessions().iter().all(|s| s.pellets.pre_easy == Some(4.0)));
}

#[test]
fn test_decode_large_string_and_list_columns() {
    let decoded = SessionTable::from_batches(&[recast("id", &DataType::LargeUtf8)]).unwrap();
    assert_eq!(decoded, common::sample_table());

    let large = DataType::LargeList(Arc::new(Field::new("item", DataType::Float64, true)));
    let decoded = SessionTable::from_batches(&[recast("easy_pref_epoch", &large)]).unwrap();
    assert_eq!(decoded, common::sample_table());
}

#[test]
fn test_decode_rejects_null_required_values() {
    let rows = common::sample_table().len();
    let mut ids: Vec<Option<&str>> = vec![Some("BAA-1103045"); rows];
    ids[0] = None;
    let mut enters: Vec<Option<i64>> = vec![Some(1_685_610_000_000_000); rows];
    enters[4] = None;
    let mut rates = vec![Some(0.01); rows];
    rates[2] = None;

    let cases = [
        ("id", Arc::new(StringArray::from(ids)) as ArrayRef, 0),
        ("enter", Arc::new(TimestampMicrosecondArray::from(enters)) as ArrayRef, 4),
        ("post_hard_rate", Arc::new(Float64Array::from(rates)) as ArrayRef, 2),
    ];
    for (name, array, null_row) in cases {
        assert_eq!(array.null_count(), 1);
        let err = SessionTable::from_batches(&[batch_with(name, array)]).unwrap_err();
        match err {
            Error::NullValue { column, row } => {
                assert_eq!(column, name);
                assert_eq!(row, null_row);
            }
            other => panic!("expected NullValue for {name}, got {other}"),
        }
    }
}

#[test]
fn test_decode_rejects_negative_index() {
    let rows = common::sample_table().len();
    let mut idx = vec![Some(1_i64); rows];
    idx[3] = Some(-1);
    let array = Arc::new(Int64Array::from(idx)) as ArrayRef;

    let err = SessionTable::from_batches(&[batch_with("epoch_thresh_change_idx", array)])
        .unwrap_err();
    assert!(matches!(err, Error::StorageError(_)), "got {err}");
    assert!(err.to_string().contains("Negative index -1"), "got {err}");
}

#[test]
fn test_decode_rejects_non_numeric_weight() {
    let rows = common::sample_table().len();
    let array = Arc::new(StringArray::from(vec!["25"; rows])) as ArrayRef;
    let err = SessionTable::from_batches(&[batch_with("weight_enter", array)]).unwrap_err();
    assert!(matches!(err, Error::ColumnType { .. }), "got {err}");
}

#[test]
fn test_decode_pairs_threshold_times_with_values() {
    let rows = common::sample_table().len();
    let item = DataType::Timestamp(TimeUnit::Microsecond, None);
    let base = common::enter(0).timestamp_micros();
    let mut builder = arrow::array::ListBuilder::new(TimestampMicrosecondArray::builder(rows))
        .with_field(Arc::new(Field::new("item", item, true)));
    for _ in 0..rows {
        builder.values().append_null();
        builder.values().append_value(base + 1_200_000_000);
        builder.append(true);
    }
    let array = Arc::new(builder.finish()) as ArrayRef;

    let decoded = SessionTable::from_batches(&[batch_with("post_easy_pel_thresh_idx", array)])
        .unwrap();
    let first = &decoded.sessions()[0].easy_thresholds;
    assert_eq!(first.values, vec![100.0]);
    assert_eq!(first.times, vec![common::enter(0) + chrono::Duration::minutes(20)]);
}
