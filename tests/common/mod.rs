//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use presocial_dash::session::{
    ContinuousPreference, EpochPreference, LearnedWindow, PatchSplit, SessionRecord,
    ThresholdSeries,
};
use presocial_dash::storage::SessionTable;

pub const SUBJECTS: [&str; 3] = ["BAA-1103045", "BAA-1103047", "BAA-1103050"];

pub fn enter(day: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap() + Duration::days(day)
}

/// Session with every column populated.
///
/// `learned` is the learned-window start; the session spins 60 cm per sample.
pub fn full_session(subject: &str, day: i64, learned: Option<usize>) -> SessionRecord {
    let start = enter(day);
    let samples = 6;
    let cum_distance: Vec<f64> = (0..samples).map(|i| 60.0 * i as f64).collect();
    let thresholds = |base: f64| ThresholdSeries {
        values: vec![base, base + 25.0],
        times: vec![start + Duration::minutes(10), start + Duration::minutes(20)],
    };

    SessionRecord::builder(subject, start, 0.01, 0.0025)
        .exit(start + Duration::hours(1))
        .weights(25.0, 25.0 + day as f64 * 0.25)
        .durations(3600.0, 1800.0, 300.0)
        .hard_patch("Patch2")
        .wheel(PatchSplit::new(100.0, 50.0, 300.0, 150.0))
        .wheel_pref(PatchSplit::new(0.6, 0.4, 0.7, 0.3))
        .pellets(PatchSplit::new(3.0, 1.0, 6.0, 2.0))
        .epochs(EpochPreference {
            per_epoch: vec![0.4, 0.5, 0.6, 0.7],
            cumulative: vec![0.4, 0.45, 0.5, 0.55],
            thresh_change_idx: Some(1),
        })
        .thresholds(thresholds(75.0), thresholds(200.0))
        .preference(ContinuousPreference {
            cum_distance,
            low_bound: vec![0.3; samples],
            high_bound: vec![0.7; samples],
            easy_pref: vec![0.5, 0.55, 0.6, 0.72, 0.75, 0.8],
            learned: learned.map(|start| LearnedWindow {
                start,
                end: Some(samples - 1),
            }),
            thresh_change_idx: Some(2),
        })
        .build()
}

/// Three subjects, three sessions each, stored out of order.
pub fn sample_table() -> SessionTable {
    let mut sessions = Vec::new();
    for day in (0..3).rev() {
        for subject in SUBJECTS {
            let learned = (day == 1).then_some(2);
            sessions.push(full_session(subject, day, learned));
        }
    }
    SessionTable::new(sessions)
}
