//! Distance- and time-to-criterion per cohort
//!
//! For every cohort the sessions are walked in entry order. A session that
//! reaches its learned window contributes the cumulative distance and the
//! sample index at the window start; a session that never does contributes
//! its end-of-session distance and length. Sessions up to and including the
//! first learned one form the "initial" metric.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::session::{CohortKey, SessionRecord};
use crate::{Error, Result};

/// Sessions sharing one [`CohortKey`], in entry order.
#[derive(Debug, Clone)]
pub struct Cohort<'a> {
    key: CohortKey,
    sessions: Vec<&'a SessionRecord>,
}

impl<'a> Cohort<'a> {
    /// Cohort key.
    #[must_use]
    pub const fn key(&self) -> &CohortKey {
        &self.key
    }

    /// Sessions of this cohort.
    #[must_use]
    pub fn sessions(&self) -> &[&'a SessionRecord] {
        &self.sessions
    }
}

/// Group sessions into cohorts.
///
/// Expects sessions sorted by `(subject, enter)`; cohorts come out in order
/// of first appearance and keep the input order of their sessions.
#[must_use]
pub fn cohorts<'a>(sorted_sessions: &[&'a SessionRecord]) -> Vec<Cohort<'a>> {
    let mut index: FxHashMap<CohortKey, usize> = FxHashMap::default();
    let mut groups: Vec<Cohort<'a>> = Vec::new();

    for &session in sorted_sessions {
        let key = session.cohort_key();
        if let Some(&i) = index.get(&key) {
            groups[i].sessions.push(session);
        } else {
            index.insert(key.clone(), groups.len());
            groups.push(Cohort {
                key,
                sessions: vec![session],
            });
        }
    }

    groups
}

/// Criterion metrics of one cohort; all missing if no session learned.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CriterionMetrics {
    /// Mean cumulative distance at learned-window start (cm)
    pub avg_distance: Option<f64>,
    /// Distance accumulated up to the first learned session (cm)
    pub init_distance: Option<f64>,
    /// Mean sample index at learned-window start (s)
    pub avg_time: Option<f64>,
    /// Time accumulated up to the first learned session (s)
    pub init_time: Option<f64>,
}

impl CriterionMetrics {
    /// Compute metrics for one cohort.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSession` if a learned-window start lies past the end
    /// of the cumulative-distance series.
    pub fn of(cohort: &Cohort<'_>) -> Result<Self> {
        let mut total_distance = 0.0;
        let mut total_time = 0.0;
        let mut init_distance = 0.0;
        let mut init_time = 0.0;
        let mut learned_count = 0_usize;
        let mut learned = false;

        for session in &cohort.sessions {
            let (distance, time) = session_contribution(session)?;
            total_distance += distance;
            total_time += time;
            if !learned {
                init_distance += distance;
                init_time += time;
            }
            if session.preference.reached_criterion() {
                learned_count += 1;
                learned = true;
            }
        }

        let metrics = if learned {
            #[allow(clippy::cast_precision_loss)]
            let count = learned_count as f64;
            Self {
                avg_distance: Some(total_distance / count),
                init_distance: Some(init_distance),
                avg_time: Some(total_time / count),
                init_time: Some(init_time),
            }
        } else {
            Self::default()
        };

        debug!(
            cohort = %cohort.key,
            sessions = cohort.sessions.len(),
            learned = learned_count,
            "Computed criterion metrics"
        );
        Ok(metrics)
    }
}

/// Distance and time one session adds to its cohort totals.
#[allow(clippy::cast_precision_loss)]
fn session_contribution(session: &SessionRecord) -> Result<(f64, f64)> {
    let pref = &session.preference;
    match pref.learned {
        Some(window) => {
            let distance = pref.distance_at(window.start).ok_or_else(|| {
                malformed(
                    session,
                    format!(
                        "learned start {} past end of distance series ({} samples)",
                        window.start,
                        pref.cum_distance.len()
                    ),
                )
            })?;
            Ok((distance, window.start as f64))
        }
        None => Ok((pref.end_distance(), pref.len_samples() as f64)),
    }
}

pub(crate) fn malformed(session: &SessionRecord, detail: String) -> Error {
    Error::MalformedSession {
        subject: session.subject.clone(),
        enter: session.enter.to_rfc3339(),
        detail,
    }
}

/// One row of the criterion table.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionRow {
    /// Cohort the metrics belong to
    pub cohort: CohortKey,
    /// Metrics
    pub metrics: CriterionMetrics,
}

/// Criterion metrics for every cohort, sorted by cohort label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriterionTable {
    rows: Vec<CriterionRow>,
}

impl CriterionTable {
    /// Compute the table from grouped cohorts.
    ///
    /// # Errors
    ///
    /// Propagates `MalformedSession` from any cohort.
    pub fn from_cohorts(cohorts: &[Cohort<'_>]) -> Result<Self> {
        let mut rows = cohorts
            .iter()
            .map(|cohort| {
                Ok(CriterionRow {
                    cohort: cohort.key.clone(),
                    metrics: CriterionMetrics::of(cohort)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.sort_by_cached_key(|row| row.cohort.label());
        Ok(Self { rows })
    }

    /// Rows sorted by cohort label.
    #[must_use]
    pub fn rows(&self) -> &[CriterionRow] {
        &self.rows
    }

    /// Metrics for a cohort label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&CriterionMetrics> {
        self.rows
            .iter()
            .find(|row| row.cohort.label() == label)
            .map(|row| &row.metrics)
    }

    /// Unique threshold groups, in row order.
    #[must_use]
    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for row in &self.rows {
            let group = row.cohort.group_label();
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    /// Rows belonging to one threshold group.
    pub fn group_rows<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a CriterionRow> {
        self.rows
            .iter()
            .filter(move |row| row.cohort.group_label() == group)
    }

    /// Number of cohorts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no cohorts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ContinuousPreference, LearnedWindow};
    use chrono::{Duration, TimeZone, Utc};

    fn session(
        subject: &str,
        day: i64,
        rates: (f64, f64),
        cum: Vec<f64>,
        learned: Option<usize>,
    ) -> SessionRecord {
        let enter = Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap() + Duration::days(day);
        let samples = cum.len();
        SessionRecord::builder(subject, enter, rates.0, rates.1)
            .preference(ContinuousPreference {
                cum_distance: cum,
                easy_pref: vec![0.5; samples],
                learned: learned.map(|start| LearnedWindow { start, end: None }),
                ..ContinuousPreference::default()
            })
            .build()
    }

    #[test]
    fn test_cohorts_first_appearance_order() {
        let a = session("BAA-1103045", 0, (0.01, 0.0025), vec![], None);
        let b = session("BAA-1103045", 1, (0.01, 0.0033), vec![], None);
        let c = session("BAA-1103045", 2, (0.01, 0.0025), vec![], None);
        let sorted = vec![&a, &b, &c];

        let groups = cohorts(&sorted);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key().label(), "BAA-1103045 0.01 0.0025");
        assert_eq!(groups[0].sessions().len(), 2);
        assert_eq!(groups[1].key().label(), "BAA-1103045 0.01 0.0033");
    }

    #[test]
    fn test_single_crossing_average_and_initial() {
        let s1 = session("BAA-1103045", 0, (0.01, 0.0025), vec![], None);
        let s2 = session(
            "BAA-1103045",
            1,
            (0.01, 0.0025),
            vec![0.0, 60.0, 120.0, 180.0],
            Some(2),
        );
        let s3 = session("BAA-1103045", 2, (0.01, 0.0025), vec![], None);
        let sorted = vec![&s1, &s2, &s3];

        let groups = cohorts(&sorted);
        let metrics = CriterionMetrics::of(&groups[0]).unwrap();
        assert_eq!(metrics.avg_distance, Some(120.0));
        assert_eq!(metrics.init_distance, Some(120.0));
        assert_eq!(metrics.avg_time, Some(2.0));
        assert_eq!(metrics.init_time, Some(2.0));
    }

    #[test]
    fn test_non_learned_sessions_add_end_distance() {
        // First session never learns but spins 50 cm over 3 samples
        let s1 = session("BAA-1103047", 0, (0.01, 0.0025), vec![10.0, 30.0, 50.0], None);
        let s2 = session("BAA-1103047", 1, (0.01, 0.0025), vec![5.0, 25.0], Some(1));
        let s3 = session("BAA-1103047", 2, (0.01, 0.0025), vec![40.0, 70.0], Some(0));
        let sorted = vec![&s1, &s2, &s3];

        let metrics = CriterionMetrics::of(&cohorts(&sorted)[0]).unwrap();
        assert_eq!(metrics.init_distance, Some(75.0));
        assert_eq!(metrics.init_time, Some(4.0));
        assert_eq!(metrics.avg_distance, Some((50.0 + 25.0 + 40.0) / 2.0));
        assert_eq!(metrics.avg_time, Some((3.0 + 1.0 + 0.0) / 2.0));
    }

    #[test]
    fn test_never_learned_is_missing_not_zero() {
        let s1 = session("BAA-1103049", 0, (0.01, 0.0033), vec![1.0, 2.0], None);
        let sorted = vec![&s1];
        let metrics = CriterionMetrics::of(&cohorts(&sorted)[0]).unwrap();
        assert_eq!(metrics, CriterionMetrics::default());
        assert!(metrics.avg_distance.is_none());
    }

    #[test]
    fn test_learned_start_past_series_end() {
        let s1 = session("BAA-1103050", 0, (0.01, 0.0025), vec![1.0], Some(5));
        let sorted = vec![&s1];
        let err = CriterionMetrics::of(&cohorts(&sorted)[0]).unwrap_err();
        assert!(matches!(err, Error::MalformedSession { .. }));
        assert!(err.to_string().contains("learned start 5"));
    }

    #[test]
    fn test_table_sorted_by_label_with_groups() {
        let a = session("BAA-1103048", 0, (0.01, 0.0025), vec![], None);
        let b = session("BAA-1103045", 0, (0.01, 0.0033), vec![], None);
        let c = session("BAA-1103045", 1, (0.01, 0.0025), vec![], None);
        let sorted = vec![&b, &c, &a];

        let table = CriterionTable::from_cohorts(&cohorts(&sorted)).unwrap();
        let labels: Vec<String> = table.rows().iter().map(|r| r.cohort.label()).collect();
        assert_eq!(
            labels,
            vec![
                "BAA-1103045 0.01 0.0025",
                "BAA-1103045 0.01 0.0033",
                "BAA-1103048 0.01 0.0025",
            ]
        );
        assert_eq!(table.groups(), vec!["0.01 0.0025", "0.01 0.0033"]);
        assert_eq!(table.group_rows("0.01 0.0025").count(), 2);
        assert!(table.get("BAA-1103045 0.01 0.0033").is_some());
        assert!(table.get("BAA-1103046 0.01 0.0033").is_none());
    }
}
