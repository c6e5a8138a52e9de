//! Prettified data table
//!
//! Every input column except the nested continuous-preference record, one
//! row per session in load order. Cells are display strings: timestamps as
//! `%Y-%m-%d %H:%M:%S`, floats with at most four decimals, long lists cut
//! to their first few items, missing values empty.

use chrono::{DateTime, Utc};

use crate::figure::TIME_FORMAT;
use crate::session::{PatchSplit, SessionRecord};
use crate::storage::schema;

/// Items shown before a list is abbreviated.
const LIST_PREVIEW: usize = 3;

/// Display-ready session table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Build the table from sessions.
    pub fn from_sessions<'a>(sessions: impl IntoIterator<Item = &'a SessionRecord>) -> Self {
        Self {
            columns: column_names(),
            rows: sessions.into_iter().map(row).collect(),
        }
    }

    /// Column headers.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows of cell text, one per session.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

fn column_names() -> Vec<String> {
    let head = [
        schema::ID,
        schema::ENTER,
        schema::EXIT,
        schema::WEIGHT_ENTER,
        schema::WEIGHT_EXIT,
        schema::DURATION,
        schema::POST_THRESH_DUR,
        schema::PRE_SAMPLING_BOTH_P_DUR,
        schema::HARD_PATCH,
        schema::POST_EASY_RATE,
        schema::POST_HARD_RATE,
    ];
    let tail = [
        schema::EASY_PREF_EPOCH,
        schema::EASY_PREF_EPOCH_CUM,
        schema::EPOCH_THRESH_CHANGE_IDX,
        schema::POST_EASY_PEL_THRESH,
        schema::POST_HARD_PEL_THRESH,
        schema::POST_EASY_PEL_THRESH_IDX,
        schema::POST_HARD_PEL_THRESH_IDX,
    ];
    head.into_iter()
        .chain(schema::WHEEL_DIST)
        .chain(schema::WHEEL_PREF)
        .chain(schema::PELLETS)
        .chain(tail)
        .map(str::to_string)
        .collect()
}

fn row(s: &SessionRecord) -> Vec<String> {
    let mut cells = vec![
        s.subject.clone(),
        time(&s.enter),
        s.exit.as_ref().map(time).unwrap_or_default(),
        opt(s.weight_enter),
        opt(s.weight_exit),
        opt(s.duration_secs),
        opt(s.post_thresh_secs),
        opt(s.pre_sampling_both_secs),
        s.hard_patch.clone().unwrap_or_default(),
        prettify_float(s.post_easy_rate),
        prettify_float(s.post_hard_rate),
    ];
    for split in [&s.wheel, &s.wheel_pref, &s.pellets] {
        cells.extend(split_cells(split));
    }
    cells.extend([
        list(s.epochs.per_epoch.iter().map(|&v| prettify_float(v))),
        list(s.epochs.cumulative.iter().map(|&v| prettify_float(v))),
        s.epochs
            .thresh_change_idx
            .map(|i| i.to_string())
            .unwrap_or_default(),
        list(s.easy_thresholds.values.iter().map(|&v| prettify_float(v))),
        list(s.hard_thresholds.values.iter().map(|&v| prettify_float(v))),
        list(s.easy_thresholds.times.iter().map(time)),
        list(s.hard_thresholds.times.iter().map(time)),
    ]);
    cells
}

fn split_cells(split: &PatchSplit) -> [String; 4] {
    [
        opt(split.pre_easy),
        opt(split.pre_hard),
        opt(split.post_easy),
        opt(split.post_hard),
    ]
}

fn time(t: &DateTime<Utc>) -> String {
    t.format(TIME_FORMAT).to_string()
}

fn opt(v: Option<f64>) -> String {
    v.map(prettify_float).unwrap_or_default()
}

/// Float with at most four decimals and no trailing zeros; `NaN` is empty.
#[must_use]
pub fn prettify_float(v: f64) -> String {
    if !v.is_finite() {
        return String::new();
    }
    let text = format!("{v:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn list(items: impl ExactSizeIterator<Item = String>) -> String {
    let len = items.len();
    let shown: Vec<String> = items.take(LIST_PREVIEW).collect();
    if len > LIST_PREVIEW {
        format!("[{}, ... ({len} items)]", shown.join(", "))
    } else {
        format!("[{}]", shown.join(", "))
    }
}
