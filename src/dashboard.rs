//! Built dashboard: every figure, the cohort callback tables and the page
//!
//! Everything is computed once by [`Dashboard::build`]; afterwards the
//! dashboard is read-only and safe to share behind an `Arc`.
//!
//! ```rust
//! use presocial_dash::charts::{SubjectPalette, Theme};
//! use presocial_dash::dashboard::Dashboard;
//! use presocial_dash::storage::SessionTable;
//!
//! let dashboard = Dashboard::build(
//!     &SessionTable::default(),
//!     &SubjectPalette::default(),
//!     Theme::default(),
//! )?;
//! assert!(dashboard.cohort_labels().is_empty());
//! assert!(dashboard.html().contains("Presocial Data Dashboard"));
//! # Ok::<(), presocial_dash::Error>(())
//! ```

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::charts::{
    cohort_figures, counter_session_figure, counter_subject_figure, criterion_figure,
    duration_figures, epoch_figure, hard_patch_session, hard_patch_subject, ids,
    prob_pels_session, prob_pels_subject, weight_figures, CounterChart, CriterionMeasure,
    DataTable, DurationKind, EpochSeries, SubjectPalette, Theme, WeightKind,
};
use crate::derive::{
    cohorts, CriterionTable, PelletMetric, PelletPreference, WheelMetric, WheelPreference,
};
use crate::figure::Figure;
use crate::page::{render_html, Callback, FigureSource, Page};
use crate::storage::SessionTable;
use crate::{Error, Result};

/// Cohort selected in both dropdowns when present
pub const DEFAULT_COHORT: &str = "BAA-1103045 0.01 0.0025";

const WHEEL_SESSION_ABS: CounterChart = CounterChart {
    title: "Wheel Distance Spun (Absolute) by Session",
    y_title: "Distance Spun (cm)",
    legend_title: "Wheel Distances",
};
const WHEEL_SESSION_NORM: CounterChart = CounterChart {
    title: "Wheel Distance Spun (Normalized) by Session",
    y_title: "Distance Spun (a.u. 0-1)",
    legend_title: "Wheel Distances",
};
const WHEEL_SUBJECT_ABS: CounterChart = CounterChart {
    title: "Wheel Distance Spun (Absolute) by Subject",
    y_title: "Distance Spun (cm)",
    legend_title: "Wheel Distances",
};
const WHEEL_SUBJECT_NORM: CounterChart = CounterChart {
    title: "Wheel Distance Spun (Normalized) by Subject",
    y_title: "Distance Spun (a.u. 0-1)",
    legend_title: "Wheel Distances",
};
const PELLET_SESSION_ABS: CounterChart = CounterChart {
    title: "Pellets by Session",
    y_title: "Count",
    legend_title: "Divisions",
};
const PELLET_SESSION_NORM: CounterChart = CounterChart {
    title: "Pellets (Normalized) by Session",
    y_title: "Pellets (a.u. 0-1)",
    legend_title: "Divisions",
};
const PELLET_SUBJECT_ABS: CounterChart = CounterChart {
    title: "Pellets by Subject",
    y_title: "Pellets",
    legend_title: "Divisions",
};
const PELLET_SUBJECT_NORM: CounterChart = CounterChart {
    title: "Pellets (Normalized) by Subject",
    y_title: "Pellets (a.u. 0-1)",
    legend_title: "Divisions",
};

const DURATION_IDS: [(&str, &str); 3] = [
    (ids::DURATION_SESSION, ids::DURATION_SUBJECT),
    (ids::POST_THRESH_DUR_SESSION, ids::POST_THRESH_DUR_SUBJECT),
    (ids::PRE_SAMPLING_BOTH_P_DUR_SESSION, ids::PRE_SAMPLING_BOTH_P_DUR_SUBJECT),
];

/// Themed static figures keyed by id.
struct Registry {
    theme: Theme,
    figures: FxHashMap<&'static str, Figure>,
}

impl Registry {
    fn insert(&mut self, id: &'static str, figure: Figure) {
        self.figures.insert(id, self.theme.themed(figure));
    }

    fn insert_pair(&mut self, ids: (&'static str, &'static str), figures: (Figure, Figure)) {
        self.insert(ids.0, figures.0);
        self.insert(ids.1, figures.1);
    }
}

/// The fully built dashboard.
#[derive(Debug)]
pub struct Dashboard {
    figures: FxHashMap<&'static str, Figure>,
    time_figures: FxHashMap<String, Figure>,
    dist_figures: FxHashMap<String, Figure>,
    cohort_labels: Vec<String>,
    criterion: CriterionTable,
    page: Page,
    theme: Theme,
    html: String,
    sessions: usize,
}

impl Dashboard {
    /// Derive every metric, build every figure and render the page.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSubject` if a subject has no palette colour, or
    /// `MalformedSession` if a session's indices do not fit its series.
    pub fn build(table: &SessionTable, palette: &SubjectPalette, theme: Theme) -> Result<Self> {
        palette.check(table.subjects())?;
        let sorted = table.sorted_sessions();
        let mut registry = Registry {
            theme: theme.clone(),
            figures: FxHashMap::default(),
        };

        registry.insert_pair(
            (ids::WEIGHT_ENTER_SESSION, ids::WEIGHT_ENTER_SUBJECT),
            weight_figures(&sorted, palette, WeightKind::Enter)?,
        );
        registry.insert_pair(
            (ids::WEIGHT_DIFF_SESSION, ids::WEIGHT_DIFF_SUBJECT),
            weight_figures(&sorted, palette, WeightKind::Diff)?,
        );
        for (kind, ids) in DurationKind::ALL.into_iter().zip(DURATION_IDS) {
            registry.insert_pair(ids, duration_figures(&sorted, palette, kind)?);
        }
        registry.insert(ids::HARD_PATCH_SESSION, hard_patch_session(&sorted, palette)?);
        registry.insert(ids::HARD_PATCH_SUBJECT, hard_patch_subject(&sorted, palette)?);

        let cohorts = cohorts(&sorted);
        let criterion = CriterionTable::from_cohorts(&cohorts)?;
        let mut cohort_labels = Vec::with_capacity(cohorts.len());
        let mut time_figures = FxHashMap::default();
        let mut dist_figures = FxHashMap::default();
        for cohort in &cohorts {
            let figures = cohort_figures(cohort, palette)?;
            debug!(
                cohort = %figures.label,
                sessions = cohort.sessions().len(),
                "Cohort figures built"
            );
            cohort_labels.push(figures.label.clone());
            time_figures.insert(figures.label.clone(), theme.themed(figures.time));
            dist_figures.insert(figures.label, theme.themed(figures.dist));
        }
        registry.insert(
            ids::PATCH_PREF_TIME_SUBJ,
            criterion_figure(&criterion, CriterionMeasure::Time),
        );
        registry.insert(
            ids::PATCH_PREF_DIST_SUBJ,
            criterion_figure(&criterion, CriterionMeasure::Distance),
        );

        registry.insert(
            ids::PATCH_PREF_EPOCH_SESSION,
            epoch_figure(&sorted, palette, EpochSeries::PerEpoch)?,
        );
        registry.insert(
            ids::CUM_PATCH_PREF_EPOCH_SESSION,
            epoch_figure(&sorted, palette, EpochSeries::Cumulative)?,
        );

        registry.insert(
            ids::WHEEL_SESSION_ABS,
            counter_session_figure::<WheelMetric>(&sorted, palette, WHEEL_SESSION_ABS)?,
        );
        registry.insert(
            ids::WHEEL_SESSION_NORM,
            counter_session_figure::<WheelPreference>(&sorted, palette, WHEEL_SESSION_NORM)?,
        );
        registry.insert(
            ids::WHEEL_SUBJECT_ABS,
            counter_subject_figure::<WheelMetric>(&sorted, palette, WHEEL_SUBJECT_ABS)?,
        );
        registry.insert(
            ids::WHEEL_SUBJECT_NORM,
            counter_subject_figure::<WheelPreference>(&sorted, palette, WHEEL_SUBJECT_NORM)?,
        );
        registry.insert(
            ids::PELLET_SESSION_ABS,
            counter_session_figure::<PelletMetric>(&sorted, palette, PELLET_SESSION_ABS)?,
        );
        registry.insert(
            ids::PELLET_SESSION_NORM,
            counter_session_figure::<PelletPreference>(&sorted, palette, PELLET_SESSION_NORM)?,
        );
        registry.insert(
            ids::PELLET_SUBJECT_ABS,
            counter_subject_figure::<PelletMetric>(&sorted, palette, PELLET_SUBJECT_ABS)?,
        );
        registry.insert(
            ids::PELLET_SUBJECT_NORM,
            counter_subject_figure::<PelletPreference>(&sorted, palette, PELLET_SUBJECT_NORM)?,
        );

        registry.insert(ids::PROB_PELS_SESSION, prob_pels_session(&sorted, palette)?);
        registry.insert(ids::PROB_PELS_SUBJECT, prob_pels_subject(&sorted, palette)?);

        let selected = default_cohort(&cohort_labels).unwrap_or_default().to_string();
        let page = Page::presocial(
            DataTable::from_sessions(table.sessions()),
            &cohort_labels,
            &selected,
        );

        let mut dashboard = Self {
            figures: registry.figures,
            time_figures,
            dist_figures,
            cohort_labels,
            criterion,
            page,
            theme,
            html: String::new(),
            sessions: table.len(),
        };
        dashboard.html = render_html(&dashboard.page, &dashboard.theme, &dashboard)?;

        info!(
            sessions = dashboard.sessions,
            cohorts = dashboard.cohort_labels.len(),
            figures = dashboard.figures.len(),
            "Dashboard built"
        );
        Ok(dashboard)
    }

    /// Preference-over-time grid of a cohort.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCohort` if no cohort has this label.
    pub fn patch_pref_time_figure(&self, label: &str) -> Result<&Figure> {
        self.time_figures
            .get(label)
            .ok_or_else(|| Error::UnknownCohort(label.to_string()))
    }

    /// Preference-over-distance grid of a cohort.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCohort` if no cohort has this label.
    pub fn patch_pref_dist_figure(&self, label: &str) -> Result<&Figure> {
        self.dist_figures
            .get(label)
            .ok_or_else(|| Error::UnknownCohort(label.to_string()))
    }

    /// Static figure by id.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFigure` if no figure has this id.
    pub fn figure(&self, id: &str) -> Result<&Figure> {
        self.figures
            .get(id)
            .ok_or_else(|| Error::UnknownFigure(id.to_string()))
    }

    /// Ids of the static figures, sorted.
    #[must_use]
    pub fn figure_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.figures.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Cohort labels offered by the dropdowns.
    #[must_use]
    pub fn cohort_labels(&self) -> &[String] {
        &self.cohort_labels
    }

    /// Initially selected cohort, if there are any cohorts.
    #[must_use]
    pub fn default_cohort(&self) -> Option<&str> {
        default_cohort(&self.cohort_labels)
    }

    /// Distance and time to criterion per cohort.
    #[must_use]
    pub const fn criterion(&self) -> &CriterionTable {
        &self.criterion
    }

    /// Page structure.
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Rendered page.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Number of sessions the dashboard was built from.
    #[must_use]
    pub const fn sessions(&self) -> usize {
        self.sessions
    }
}

impl FigureSource for Dashboard {
    fn figure(&self, id: &str) -> Result<&Figure> {
        Self::figure(self, id)
    }

    fn callback(&self, callback: Callback, value: &str) -> Result<&Figure> {
        match callback {
            Callback::PatchPrefTime => self.patch_pref_time_figure(value),
            Callback::PatchPrefDist => self.patch_pref_dist_figure(value),
        }
    }
}

fn default_cohort(labels: &[String]) -> Option<&str> {
    labels
        .iter()
        .find(|label| *label == DEFAULT_COHORT)
        .or_else(|| labels.first())
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::test_support::session;

    #[test]
    fn test_default_cohort_prefers_known_label() {
        let labels = vec![
            "BAA-1103045 0.002 0.01".to_string(),
            DEFAULT_COHORT.to_string(),
        ];
        assert_eq!(default_cohort(&labels), Some(DEFAULT_COHORT));

        let labels = vec!["BAA-1103047 0.01 0.0025".to_string()];
        assert_eq!(default_cohort(&labels), Some("BAA-1103047 0.01 0.0025"));
        assert_eq!(default_cohort(&[]), None);
    }

    #[test]
    fn test_build_registers_every_page_graph() {
        let table = SessionTable::new(vec![
            session("BAA-1103047", 1),
            session("BAA-1103045", 0),
            session("BAA-1103045", 2),
        ]);
        let dashboard =
            Dashboard::build(&table, &SubjectPalette::default(), Theme::default()).unwrap();

        assert_eq!(dashboard.figure_ids().len(), 26);
        assert_eq!(dashboard.sessions(), 3);
        assert_eq!(dashboard.cohort_labels().len(), 2);
        assert_eq!(dashboard.default_cohort(), Some(DEFAULT_COHORT));

        let figure = dashboard.figure(ids::WEIGHT_ENTER_SESSION).unwrap();
        assert_eq!(figure.layout.paper_bgcolor.as_deref(), Some("#050505"));
        assert!(dashboard.patch_pref_time_figure(DEFAULT_COHORT).is_ok());
        assert!(dashboard.html().contains("id=\"patch_pref_dist_graph\""));
    }

    #[test]
    fn test_unknown_keys() {
        let table = SessionTable::new(vec![session("BAA-1103045", 0)]);
        let dashboard =
            Dashboard::build(&table, &SubjectPalette::default(), Theme::default()).unwrap();

        let err = dashboard.patch_pref_dist_figure("BAA-1103045 1 1").unwrap_err();
        assert!(matches!(err, Error::UnknownCohort(_)));
        assert!(err.is_not_found());
        let err = dashboard.figure("nope").unwrap_err();
        assert!(matches!(err, Error::UnknownFigure(ref id) if id == "nope"));
    }

    #[test]
    fn test_unmapped_subject_fails_build() {
        let table = SessionTable::new(vec![session("BAA-0000000", 0)]);
        let err = Dashboard::build(&table, &SubjectPalette::default(), Theme::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownSubject(ref s) if s == "BAA-0000000"));
    }
}
