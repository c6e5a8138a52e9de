//! Derivation benchmarks
//!
//! - Cohort grouping + criterion table
//! - Record batch decode
//! - Full dashboard build (all figures + page render)
//!
//! Run with: cargo bench --bench derivation

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use presocial_dash::charts::{SubjectPalette, Theme};
use presocial_dash::dashboard::Dashboard;
use presocial_dash::derive::{cohorts, CriterionTable};
use presocial_dash::session::{ContinuousPreference, LearnedWindow, PatchSplit, SessionRecord};
use presocial_dash::storage::SessionTable;

const SUBJECTS: [&str; 5] = [
    "BAA-1103045",
    "BAA-1103047",
    "BAA-1103048",
    "BAA-1103049",
    "BAA-1103050",
];

/// `days` sessions per subject, one hour of 1 Hz preference samples each
#[allow(clippy::cast_precision_loss)]
fn create_table(days: usize) -> SessionTable {
    let samples = 3600;
    let start = Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap();
    let mut sessions = Vec::with_capacity(days * SUBJECTS.len());

    for day in 0..days {
        for subject in SUBJECTS {
            let enter = start + Duration::days(day as i64);
            let learned = (day % 3 == 1).then_some(LearnedWindow {
                start: samples / 2,
                end: Some(samples - 1),
            });
            sessions.push(
                SessionRecord::builder(subject, enter, 0.01, 0.0025)
                    .weights(25.0, 25.5)
                    .durations(3600.0, 1800.0, 120.0)
                    .wheel(PatchSplit::new(100.0, 50.0, 300.0, 150.0))
                    .pellets(PatchSplit::new(3.0, 1.0, 6.0, 2.0))
                    .preference(ContinuousPreference {
                        cum_distance: (0..samples).map(|i| i as f64 * 0.5).collect(),
                        low_bound: vec![0.3; samples],
                        high_bound: vec![0.7; samples],
                        easy_pref: (0..samples).map(|i| i as f64 / samples as f64).collect(),
                        learned,
                        thresh_change_idx: Some(samples / 4),
                    })
                    .build(),
            );
        }
    }
    SessionTable::new(sessions)
}

fn bench_criterion(c: &mut Criterion) {
    let mut group = c.benchmark_group("criterion_table");

    for days in [5, 20] {
        let table = create_table(days);
        group.bench_with_input(BenchmarkId::from_parameter(days), &table, |b, table| {
            b.iter(|| {
                let sorted = table.sorted_sessions();
                CriterionTable::from_cohorts(&cohorts(black_box(&sorted))).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let batch = create_table(20).to_record_batch().unwrap();

    c.bench_function("decode_batch_100_sessions", |b| {
        b.iter(|| SessionTable::from_batches(black_box(std::slice::from_ref(&batch))).unwrap());
    });
}

fn bench_dashboard_build(c: &mut Criterion) {
    let table = create_table(5);
    let palette = SubjectPalette::default();

    c.bench_function("dashboard_build_25_sessions", |b| {
        b.iter(|| Dashboard::build(black_box(&table), &palette, Theme::default()).unwrap());
    });
}

criterion_group!(benches, bench_criterion, bench_decode, bench_dashboard_build);
criterion_main!(benches);
