//! Cohort grouping and criterion metrics through the public API

mod common;

use presocial_dash::derive::{cohorts, CriterionTable};
use presocial_dash::session::{ContinuousPreference, LearnedWindow, SessionRecord};
use presocial_dash::storage::SessionTable;

fn with_distance(subject: &str, day: i64, cum: Vec<f64>, learned: Option<usize>) -> SessionRecord {
    let samples = cum.len();
    SessionRecord::builder(subject, common::enter(day), 0.01, 0.0025)
        .preference(ContinuousPreference {
            cum_distance: cum,
            easy_pref: vec![0.5; samples],
            learned: learned.map(|start| LearnedWindow { start, end: None }),
            ..ContinuousPreference::default()
        })
        .build()
}

#[test]
fn test_single_learned_session_example() {
    // Only the middle session crosses, at 120 cm; the others cover no distance
    let table = SessionTable::new(vec![
        with_distance("BAA-1103045", 2, vec![], None),
        with_distance("BAA-1103045", 0, vec![], None),
        with_distance("BAA-1103045", 1, vec![0.0, 40.0, 120.0, 150.0], Some(2)),
    ]);
    let sorted = table.sorted_sessions();
    let criterion = CriterionTable::from_cohorts(&cohorts(&sorted)).unwrap();

    let metrics = criterion.get("BAA-1103045 0.01 0.0025").unwrap();
    assert_eq!(metrics.avg_distance, Some(120.0));
    assert_eq!(metrics.init_distance, Some(120.0));
    assert_eq!(metrics.avg_time, Some(2.0));
}

#[test]
fn test_table_sorted_and_grouped() {
    let table = common::sample_table();
    let sorted = table.sorted_sessions();
    let criterion = CriterionTable::from_cohorts(&cohorts(&sorted)).unwrap();

    assert_eq!(criterion.len(), 3);
    let labels: Vec<String> = criterion.rows().iter().map(|r| r.cohort.label()).collect();
    assert_eq!(
        labels,
        vec![
            "BAA-1103045 0.01 0.0025",
            "BAA-1103047 0.01 0.0025",
            "BAA-1103050 0.01 0.0025",
        ]
    );
    assert_eq!(criterion.groups(), vec!["0.01 0.0025".to_string()]);
    assert_eq!(criterion.group_rows("0.01 0.0025").count(), 3);
    assert_eq!(criterion.group_rows("0.01 0.0033").count(), 0);

    // Day 0 never learns (300 cm, 6 samples), day 1 learns at sample 2
    // (120 cm), day 2 never learns again (300 cm)
    let metrics = criterion.get("BAA-1103047 0.01 0.0025").unwrap();
    assert_eq!(metrics.init_distance, Some(420.0));
    assert_eq!(metrics.init_time, Some(8.0));
    assert_eq!(metrics.avg_distance, Some(720.0));
    assert_eq!(metrics.avg_time, Some(14.0));
}

#[test]
fn test_no_learning_leaves_metrics_missing() {
    let table = SessionTable::new(vec![
        with_distance("BAA-1103048", 0, vec![10.0, 20.0], None),
        with_distance("BAA-1103048", 1, vec![15.0], None),
    ]);
    let sorted = table.sorted_sessions();
    let criterion = CriterionTable::from_cohorts(&cohorts(&sorted)).unwrap();

    let metrics = criterion.get("BAA-1103048 0.01 0.0025").unwrap();
    assert!(metrics.avg_distance.is_none());
    assert!(metrics.init_distance.is_none());
    assert!(metrics.avg_time.is_none());
    assert!(metrics.init_time.is_none());
}
