//! Canonical session table schema
//!
//! Column names follow the presocial analysis pipeline that produces the
//! table. The loader accepts wider numeric/timestamp types than the ones
//! listed here; the encoder always writes exactly this schema.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Fields, Schema, SchemaRef, TimeUnit};

/// Subject identifier
pub const ID: &str = "id";
/// Entry timestamp
pub const ENTER: &str = "enter";
/// Exit timestamp
pub const EXIT: &str = "exit";
/// Entry weight (g)
pub const WEIGHT_ENTER: &str = "weight_enter";
/// Exit weight (g)
pub const WEIGHT_EXIT: &str = "weight_exit";
/// Session duration (s)
pub const DURATION: &str = "duration";
/// Post-threshold duration (s)
pub const POST_THRESH_DUR: &str = "post_thresh_dur";
/// Duration before both patches were sampled (s)
pub const PRE_SAMPLING_BOTH_P_DUR: &str = "pre_sampling_both_p_dur";
/// Hard patch name
pub const HARD_PATCH: &str = "hard_patch";
/// Easy-patch rate after the threshold change
pub const POST_EASY_RATE: &str = "post_easy_rate";
/// Hard-patch rate after the threshold change
pub const POST_HARD_RATE: &str = "post_hard_rate";

/// Wheel distance columns, in `PatchSplit` field order
pub const WHEEL_DIST: [&str; 4] = [
    "pre_easy_wheel_dist",
    "pre_hard_wheel_dist",
    "post_easy_wheel_dist",
    "post_hard_wheel_dist",
];
/// Wheel preference columns, in `PatchSplit` field order
pub const WHEEL_PREF: [&str; 4] = [
    "pre_easy_pref",
    "pre_hard_pref",
    "post_easy_pref",
    "post_hard_pref",
];
/// Pellet count columns, in `PatchSplit` field order
pub const PELLETS: [&str; 4] = [
    "pre_easy_n_pel",
    "pre_hard_n_pel",
    "post_easy_n_pel",
    "post_hard_n_pel",
];

/// Preference per distance quantile
pub const EASY_PREF_EPOCH: &str = "easy_pref_epoch";
/// Cumulative preference per distance quantile
pub const EASY_PREF_EPOCH_CUM: &str = "easy_pref_epoch_cum";
/// Quantile of the threshold change
pub const EPOCH_THRESH_CHANGE_IDX: &str = "epoch_thresh_change_idx";
/// Easy-patch probabilistic thresholds
pub const POST_EASY_PEL_THRESH: &str = "post_easy_pel_thresh";
/// Hard-patch probabilistic thresholds
pub const POST_HARD_PEL_THRESH: &str = "post_hard_pel_thresh";
/// Times of the easy-patch thresholds
pub const POST_EASY_PEL_THRESH_IDX: &str = "post_easy_pel_thresh_idx";
/// Times of the hard-patch thresholds
pub const POST_HARD_PEL_THRESH_IDX: &str = "post_hard_pel_thresh_idx";

/// Nested continuous-preference struct column
pub const CONT_PATCH_PREF: &str = "cont_patch_pref";
/// `cont_patch_pref` field: cumulative wheel distance per sample
pub const CUM_DISTANCE: &str = "w_all_chnkd_cumsum";
/// `cont_patch_pref` field: lower chance bound
pub const LOW_BOUND: &str = "low_bound";
/// `cont_patch_pref` field: upper chance bound
pub const HIGH_BOUND: &str = "high_bound";
/// `cont_patch_pref` field: observed easy preference
pub const WEASY_PREF: &str = "weasy_pref";
/// `cont_patch_pref` field: learned window start
pub const LEARNED_START_IDX: &str = "learned_start_idx";
/// `cont_patch_pref` field: learned window end
pub const LEARNED_END_IDX: &str = "learned_end_idx";
/// `cont_patch_pref` field: threshold change sample
pub const THRESH_CHANGE_IDX: &str = "thresh_change_idx";

pub(crate) fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, None)
}

pub(crate) fn list_of(item: DataType) -> DataType {
    DataType::List(Arc::new(Field::new("item", item, true)))
}

/// Fields of the nested `cont_patch_pref` struct.
#[must_use]
pub fn preference_fields() -> Fields {
    Fields::from(vec![
        Field::new(CUM_DISTANCE, list_of(DataType::Float64), true),
        Field::new(LOW_BOUND, list_of(DataType::Float64), true),
        Field::new(HIGH_BOUND, list_of(DataType::Float64), true),
        Field::new(WEASY_PREF, list_of(DataType::Float64), true),
        Field::new(LEARNED_START_IDX, DataType::Int64, true),
        Field::new(LEARNED_END_IDX, DataType::Int64, true),
        Field::new(THRESH_CHANGE_IDX, DataType::Int64, true),
    ])
}

/// Canonical schema written by [`crate::storage::encode_sessions`].
#[must_use]
pub fn session_schema() -> SchemaRef {
    let mut fields = vec![
        Field::new(ID, DataType::Utf8, false),
        Field::new(ENTER, timestamp_type(), false),
        Field::new(EXIT, timestamp_type(), true),
        Field::new(WEIGHT_ENTER, DataType::Float64, true),
        Field::new(WEIGHT_EXIT, DataType::Float64, true),
        Field::new(DURATION, DataType::Float64, true),
        Field::new(POST_THRESH_DUR, DataType::Float64, true),
        Field::new(PRE_SAMPLING_BOTH_P_DUR, DataType::Float64, true),
        Field::new(HARD_PATCH, DataType::Utf8, true),
        Field::new(POST_EASY_RATE, DataType::Float64, false),
        Field::new(POST_HARD_RATE, DataType::Float64, false),
    ];
    for name in WHEEL_DIST.iter().chain(&WHEEL_PREF).chain(&PELLETS) {
        fields.push(Field::new(*name, DataType::Float64, true));
    }
    fields.extend([
        Field::new(EASY_PREF_EPOCH, list_of(DataType::Float64), true),
        Field::new(EASY_PREF_EPOCH_CUM, list_of(DataType::Float64), true),
        Field::new(EPOCH_THRESH_CHANGE_IDX, DataType::Int64, true),
        Field::new(POST_EASY_PEL_THRESH, list_of(DataType::Float64), true),
        Field::new(POST_HARD_PEL_THRESH, list_of(DataType::Float64), true),
        Field::new(POST_EASY_PEL_THRESH_IDX, list_of(timestamp_type()), true),
        Field::new(POST_HARD_PEL_THRESH_IDX, list_of(timestamp_type()), true),
        Field::new(
            CONT_PATCH_PREF,
            DataType::Struct(preference_fields()),
            false,
        ),
    ]);
    Arc::new(Schema::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_every_column_once() {
        let schema = session_schema();
        assert_eq!(schema.fields().len(), 11 + 12 + 8);
        assert!(schema.field_with_name(CONT_PATCH_PREF).is_ok());
        assert!(!schema.field_with_name(ID).unwrap().is_nullable());
    }
}
