//! Arrow → `SessionRecord` decoding
//!
//! Columns are located by name and cast to one canonical type each, so the
//! loader tolerates integer weights, nanosecond timestamps, `LargeUtf8`
//! ids and the like. Anything that cannot be cast losslessly is rejected
//! with the column name in the error.

use arrow::array::{Array, ArrayRef, AsArray, RecordBatch, StructArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, TimestampMicrosecondType};
use chrono::{DateTime, Utc};

use super::schema::{self, list_of, timestamp_type};
use crate::session::{
    ContinuousPreference, EpochPreference, LearnedWindow, PatchSplit, SessionRecord,
    ThresholdSeries,
};
use crate::{Error, Result};

/// Decode every row of a batch. `row_offset` is the index of the batch's
/// first row within the whole table (for error messages).
pub(crate) fn decode_batch(batch: &RecordBatch, row_offset: usize) -> Result<Vec<SessionRecord>> {
    let ids = required(
        string_values(column(batch, schema::ID)?, schema::ID)?,
        schema::ID,
        row_offset,
    )?;
    let enters = required(
        timestamp_values(column(batch, schema::ENTER)?, schema::ENTER)?,
        schema::ENTER,
        row_offset,
    )?;
    let exits = timestamp_values(column(batch, schema::EXIT)?, schema::EXIT)?;
    let weight_enter = numeric(batch, schema::WEIGHT_ENTER)?;
    let weight_exit = numeric(batch, schema::WEIGHT_EXIT)?;
    let duration = numeric(batch, schema::DURATION)?;
    let post_thresh = numeric(batch, schema::POST_THRESH_DUR)?;
    let pre_sampling = numeric(batch, schema::PRE_SAMPLING_BOTH_P_DUR)?;
    let hard_patch = string_values(column(batch, schema::HARD_PATCH)?, schema::HARD_PATCH)?;
    let easy_rates = required(
        numeric(batch, schema::POST_EASY_RATE)?,
        schema::POST_EASY_RATE,
        row_offset,
    )?;
    let hard_rates = required(
        numeric(batch, schema::POST_HARD_RATE)?,
        schema::POST_HARD_RATE,
        row_offset,
    )?;

    let wheel = patch_split_columns(batch, &schema::WHEEL_DIST)?;
    let wheel_pref = patch_split_columns(batch, &schema::WHEEL_PREF)?;
    let pellets = patch_split_columns(batch, &schema::PELLETS)?;

    let epoch = list_column(batch, schema::EASY_PREF_EPOCH)?;
    let epoch_cum = list_column(batch, schema::EASY_PREF_EPOCH_CUM)?;
    let epoch_change = index_values(
        column(batch, schema::EPOCH_THRESH_CHANGE_IDX)?,
        schema::EPOCH_THRESH_CHANGE_IDX,
        row_offset,
    )?;
    let easy_thresh = list_column(batch, schema::POST_EASY_PEL_THRESH)?;
    let hard_thresh = list_column(batch, schema::POST_HARD_PEL_THRESH)?;
    let easy_thresh_at = timestamp_lists(
        column(batch, schema::POST_EASY_PEL_THRESH_IDX)?,
        schema::POST_EASY_PEL_THRESH_IDX,
    )?;
    let hard_thresh_at = timestamp_lists(
        column(batch, schema::POST_HARD_PEL_THRESH_IDX)?,
        schema::POST_HARD_PEL_THRESH_IDX,
    )?;

    let preferences = preference_values(column(batch, schema::CONT_PATCH_PREF)?, row_offset)?;

    let mut epoch = epoch.into_iter();
    let mut epoch_cum = epoch_cum.into_iter();
    let mut easy_thresh = easy_thresh.into_iter().zip(easy_thresh_at);
    let mut hard_thresh = hard_thresh.into_iter().zip(hard_thresh_at);
    let mut preferences = preferences.into_iter();

    let mut records = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let (easy_values, easy_times) = easy_thresh.next().unwrap_or_default();
        let (hard_values, hard_times) = hard_thresh.next().unwrap_or_default();
        records.push(SessionRecord {
            subject: ids[row].clone(),
            enter: enters[row],
            exit: exits[row],
            weight_enter: weight_enter[row],
            weight_exit: weight_exit[row],
            duration_secs: duration[row],
            post_thresh_secs: post_thresh[row],
            pre_sampling_both_secs: pre_sampling[row],
            hard_patch: hard_patch[row].clone(),
            post_easy_rate: easy_rates[row],
            post_hard_rate: hard_rates[row],
            wheel: wheel[row],
            wheel_pref: wheel_pref[row],
            pellets: pellets[row],
            epochs: EpochPreference {
                per_epoch: epoch.next().unwrap_or_default(),
                cumulative: epoch_cum.next().unwrap_or_default(),
                thresh_change_idx: epoch_change[row],
            },
            easy_thresholds: threshold_series(easy_values, easy_times),
            hard_thresholds: threshold_series(hard_values, hard_times),
            preference: preferences.next().unwrap_or_default(),
        });
    }
    Ok(records)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| Error::MissingColumn(name.to_string()))
}

fn type_error(name: &str, expected: &str, found: &DataType) -> Error {
    Error::ColumnType {
        column: name.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

fn required<T>(values: Vec<Option<T>>, name: &str, row_offset: usize) -> Result<Vec<T>> {
    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| Error::NullValue {
                column: name.to_string(),
                row: row_offset + row,
            })
        })
        .collect()
}

fn numeric(batch: &RecordBatch, name: &str) -> Result<Vec<Option<f64>>> {
    f64_values(column(batch, name)?, name)
}

fn list_column(batch: &RecordBatch, name: &str) -> Result<Vec<Vec<f64>>> {
    f64_lists(column(batch, name)?, name)
}

fn f64_values(array: &ArrayRef, name: &str) -> Result<Vec<Option<f64>>> {
    if !array.data_type().is_numeric() {
        return Err(type_error(name, "numeric", array.data_type()));
    }
    let cast_array = cast(array, &DataType::Float64)?;
    Ok(cast_array.as_primitive::<Float64Type>().iter().collect())
}

fn string_values(array: &ArrayRef, name: &str) -> Result<Vec<Option<String>>> {
    if !matches!(array.data_type(), DataType::Utf8 | DataType::LargeUtf8) {
        return Err(type_error(name, "Utf8", array.data_type()));
    }
    let cast_array = cast(array, &DataType::Utf8)?;
    Ok(cast_array
        .as_string::<i32>()
        .iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

fn micros_to_datetime(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros)
}

fn timestamp_values(array: &ArrayRef, name: &str) -> Result<Vec<Option<DateTime<Utc>>>> {
    if !matches!(array.data_type(), DataType::Timestamp(_, _)) {
        return Err(type_error(name, "Timestamp", array.data_type()));
    }
    let cast_array = cast(array, &timestamp_type())?;
    Ok(cast_array
        .as_primitive::<TimestampMicrosecondType>()
        .iter()
        .map(|value| value.and_then(micros_to_datetime))
        .collect())
}

fn index_values(array: &ArrayRef, name: &str, row_offset: usize) -> Result<Vec<Option<usize>>> {
    if !array.data_type().is_integer() {
        return Err(type_error(name, "integer", array.data_type()));
    }
    let cast_array = cast(array, &DataType::Int64)?;
    cast_array
        .as_primitive::<Int64Type>()
        .iter()
        .enumerate()
        .map(|(row, value)| match value {
            None => Ok(None),
            Some(v) => usize::try_from(v).map(Some).map_err(|_| {
                Error::StorageError(format!(
                    "Negative index {v} in column {name} (row {})",
                    row_offset + row
                ))
            }),
        })
        .collect()
}

fn list_item_type<'a>(array: &'a ArrayRef, name: &str, expected: &str) -> Result<&'a DataType> {
    match array.data_type() {
        DataType::List(item) | DataType::LargeList(item) => Ok(item.data_type()),
        other => Err(type_error(name, expected, other)),
    }
}

/// Null lists decode as empty; null items decode as NaN so sample indices
/// stay aligned.
fn f64_lists(array: &ArrayRef, name: &str) -> Result<Vec<Vec<f64>>> {
    let item = list_item_type(array, name, "List<numeric>")?;
    if !item.is_numeric() {
        return Err(type_error(name, "List<numeric>", array.data_type()));
    }
    let cast_array = cast(array, &list_of(DataType::Float64))?;
    let lists = cast_array.as_list::<i32>();
    Ok((0..lists.len())
        .map(|row| {
            if lists.is_null(row) {
                return Vec::new();
            }
            lists
                .value(row)
                .as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect()
        })
        .collect())
}

/// Null items stay `None`; pairing with the value list happens in
/// [`threshold_series`].
fn timestamp_lists(array: &ArrayRef, name: &str) -> Result<Vec<Vec<Option<DateTime<Utc>>>>> {
    let item = list_item_type(array, name, "List<Timestamp>")?;
    if !matches!(item, DataType::Timestamp(_, _)) {
        return Err(type_error(name, "List<Timestamp>", array.data_type()));
    }
    let cast_array = cast(array, &list_of(timestamp_type()))?;
    let lists = cast_array.as_list::<i32>();
    Ok((0..lists.len())
        .map(|row| {
            if lists.is_null(row) {
                return Vec::new();
            }
            lists
                .value(row)
                .as_primitive::<TimestampMicrosecondType>()
                .iter()
                .map(|v| v.and_then(micros_to_datetime))
                .collect()
        })
        .collect())
}

/// Pair each threshold with its own time. A threshold without a time is
/// dropped together with it, as is any unpaired tail.
fn threshold_series(values: Vec<f64>, times: Vec<Option<DateTime<Utc>>>) -> ThresholdSeries {
    let (values, times) = values
        .into_iter()
        .zip(times)
        .filter_map(|(value, time)| time.map(|time| (value, time)))
        .unzip();
    ThresholdSeries { values, times }
}

fn patch_split_columns(batch: &RecordBatch, names: &[&str; 4]) -> Result<Vec<PatchSplit>> {
    let pre_easy = numeric(batch, names[0])?;
    let pre_hard = numeric(batch, names[1])?;
    let post_easy = numeric(batch, names[2])?;
    let post_hard = numeric(batch, names[3])?;
    Ok((0..batch.num_rows())
        .map(|row| PatchSplit {
            pre_easy: pre_easy[row],
            pre_hard: pre_hard[row],
            post_easy: post_easy[row],
            post_hard: post_hard[row],
        })
        .collect())
}

fn struct_field<'a>(parent: &'a StructArray, field: &str) -> Result<&'a ArrayRef> {
    parent
        .column_by_name(field)
        .ok_or_else(|| Error::MissingColumn(format!("{}.{field}", schema::CONT_PATCH_PREF)))
}

fn preference_values(array: &ArrayRef, row_offset: usize) -> Result<Vec<ContinuousPreference>> {
    let parent = array
        .as_struct_opt()
        .ok_or_else(|| type_error(schema::CONT_PATCH_PREF, "Struct", array.data_type()))?;
    let qualified = |field: &str| format!("{}.{field}", schema::CONT_PATCH_PREF);

    let series = |field: &str| f64_lists(struct_field(parent, field)?, &qualified(field));

    let cum_distance = series(schema::CUM_DISTANCE)?;
    let low_bound = series(schema::LOW_BOUND)?;
    let high_bound = series(schema::HIGH_BOUND)?;
    let easy_pref = series(schema::WEASY_PREF)?;
    let starts = index_values(
        struct_field(parent, schema::LEARNED_START_IDX)?,
        &qualified(schema::LEARNED_START_IDX),
        row_offset,
    )?;
    let ends = index_values(
        struct_field(parent, schema::LEARNED_END_IDX)?,
        &qualified(schema::LEARNED_END_IDX),
        row_offset,
    )?;
    let changes = index_values(
        struct_field(parent, schema::THRESH_CHANGE_IDX)?,
        &qualified(schema::THRESH_CHANGE_IDX),
        row_offset,
    )?;

    Ok(cum_distance
        .into_iter()
        .zip(low_bound)
        .zip(high_bound)
        .zip(easy_pref)
        .enumerate()
        .map(|(row, (((cum_distance, low_bound), high_bound), easy_pref))| {
            let missing = parent.is_null(row);
            ContinuousPreference {
                cum_distance,
                low_bound,
                high_bound,
                easy_pref,
                learned: if missing {
                    None
                } else {
                    starts[row].map(|start| LearnedWindow { start, end: ends[row] })
                },
                thresh_change_idx: if missing { None } else { changes[row] },
            }
        })
        .collect())
}
