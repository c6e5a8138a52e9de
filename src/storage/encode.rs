//! `SessionRecord` → Arrow encoding (canonical schema)

use std::sync::Arc;

use arrow::array::{
    ArrayRef, Float64Array, Int64Array, ListArray, RecordBatch, StringArray, StructArray,
    TimestampMicrosecondArray,
};
use arrow::datatypes::{Field, Float64Type, TimestampMicrosecondType};

use super::schema::{preference_fields, session_schema};
use crate::session::{PatchSplit, SessionRecord};
use crate::Result;

/// Encode sessions into one record batch with [`session_schema`].
///
/// # Errors
///
/// Returns error if Arrow rejects the assembled columns (should not happen
/// for records built through the public API).
pub fn encode_sessions(sessions: &[SessionRecord]) -> Result<RecordBatch> {
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            sessions.iter().map(|s| s.subject.as_str()),
        )),
        Arc::new(TimestampMicrosecondArray::from_iter_values(
            sessions.iter().map(|s| s.enter.timestamp_micros()),
        )),
        Arc::new(TimestampMicrosecondArray::from(
            sessions
                .iter()
                .map(|s| s.exit.map(|t| t.timestamp_micros()))
                .collect::<Vec<_>>(),
        )),
        float_column(sessions, |s| s.weight_enter),
        float_column(sessions, |s| s.weight_exit),
        float_column(sessions, |s| s.duration_secs),
        float_column(sessions, |s| s.post_thresh_secs),
        float_column(sessions, |s| s.pre_sampling_both_secs),
        Arc::new(StringArray::from(
            sessions
                .iter()
                .map(|s| s.hard_patch.as_deref())
                .collect::<Vec<_>>(),
        )),
        float_column(sessions, |s| Some(s.post_easy_rate)),
        float_column(sessions, |s| Some(s.post_hard_rate)),
    ];
    let splits: [fn(&SessionRecord) -> PatchSplit; 3] =
        [|s| s.wheel, |s| s.wheel_pref, |s| s.pellets];
    for split in splits {
        columns.extend(split_columns(sessions, split));
    }
    columns.extend([
        list_column(sessions.iter().map(|s| &s.epochs.per_epoch)),
        list_column(sessions.iter().map(|s| &s.epochs.cumulative)),
        index_column(sessions.iter().map(|s| s.epochs.thresh_change_idx)),
        list_column(sessions.iter().map(|s| &s.easy_thresholds.values)),
        list_column(sessions.iter().map(|s| &s.hard_thresholds.values)),
        time_list_column(sessions.iter().map(|s| &s.easy_thresholds.times)),
        time_list_column(sessions.iter().map(|s| &s.hard_thresholds.times)),
        preference_column(sessions),
    ]);

    Ok(RecordBatch::try_new(session_schema(), columns)?)
}

fn float_column(
    sessions: &[SessionRecord],
    value: impl Fn(&SessionRecord) -> Option<f64>,
) -> ArrayRef {
    Arc::new(Float64Array::from(
        sessions.iter().map(value).collect::<Vec<_>>(),
    ))
}

fn split_columns(
    sessions: &[SessionRecord],
    split: impl Fn(&SessionRecord) -> PatchSplit,
) -> [ArrayRef; 4] {
    [
        float_column(sessions, |s| split(s).pre_easy),
        float_column(sessions, |s| split(s).pre_hard),
        float_column(sessions, |s| split(s).post_easy),
        float_column(sessions, |s| split(s).post_hard),
    ]
}

fn list_column<'a>(lists: impl Iterator<Item = &'a Vec<f64>>) -> ArrayRef {
    Arc::new(ListArray::from_iter_primitive::<Float64Type, _, _>(
        lists.map(|values| Some(values.iter().copied().map(Some))),
    ))
}

fn time_list_column<'a>(
    lists: impl Iterator<Item = &'a Vec<chrono::DateTime<chrono::Utc>>>,
) -> ArrayRef {
    Arc::new(ListArray::from_iter_primitive::<TimestampMicrosecondType, _, _>(
        lists.map(|times| Some(times.iter().map(|t| Some(t.timestamp_micros())))),
    ))
}

fn index_column(indices: impl Iterator<Item = Option<usize>>) -> ArrayRef {
    Arc::new(Int64Array::from(
        indices
            .map(|idx| idx.map(|i| i64::try_from(i).unwrap_or(i64::MAX)))
            .collect::<Vec<_>>(),
    ))
}

fn preference_column(sessions: &[SessionRecord]) -> ArrayRef {
    let prefs = || sessions.iter().map(|s| &s.preference);
    let fields = preference_fields();
    let arrays: Vec<ArrayRef> = vec![
        list_column(prefs().map(|p| &p.cum_distance)),
        list_column(prefs().map(|p| &p.low_bound)),
        list_column(prefs().map(|p| &p.high_bound)),
        list_column(prefs().map(|p| &p.easy_pref)),
        index_column(prefs().map(|p| p.learned.map(|w| w.start))),
        index_column(prefs().map(|p| p.learned.and_then(|w| w.end))),
        index_column(prefs().map(|p| p.thresh_change_idx)),
    ];
    let pairs: Vec<(Arc<Field>, ArrayRef)> = fields.iter().cloned().zip(arrays).collect();
    Arc::new(StructArray::from(pairs))
}
