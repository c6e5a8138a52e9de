//! Chart builders
//!
//! Every builder is a pure function from sessions (sorted by subject, then
//! entry time) to a [`Figure`]. Colours come from the [`SubjectPalette`];
//! an unmapped subject fails the build. The dark [`Theme`] is applied by the
//! dashboard when the figure is registered.
//!
//! ## Chart groups
//!
//! ```text
//! weight        weight_enter/diff × session/subject
//! duration      duration, post_thresh_dur, pre_sampling_both_p_dur × session/subject
//! hard_patch    hard_patch × session/subject
//! preference    per-cohort time/distance grids, subject criterion bars+boxes
//! epoch         (cumulative) preference by distance quantile
//! counters      wheel/pellet × abs/norm × session/subject
//! probabilistic probabilistic thresholds × session/subject
//! table         prettified data table
//! ```

mod counters;
mod duration;
mod epoch;
mod hard_patch;
mod palette;
mod preference;
mod probabilistic;
mod table;
mod weight;

pub use counters::{counter_session_figure, counter_subject_figure, CounterChart};
pub use duration::{duration_figures, DurationKind};
pub use epoch::{epoch_figure, EpochSeries};
pub use hard_patch::{hard_patch_session, hard_patch_subject};
pub use palette::{marker_symbol, SubjectPalette, Theme, MARKERS, MARKER_SIZE};
pub use preference::{cohort_figures, criterion_figure, CohortFigures, CriterionMeasure};
pub use probabilistic::{prob_pels_session, prob_pels_subject};
pub use table::{prettify_float, DataTable};
pub use weight::{weight_figures, WeightKind};

use crate::figure::{Figure, Line, Marker, Mode, Trace, Values};
use crate::session::SessionRecord;
use crate::Result;

/// Identifiers of the static figures.
pub mod ids {
    /// Weight at entry by session
    pub const WEIGHT_ENTER_SESSION: &str = "weight_enter_session";
    /// Weight diff by session
    pub const WEIGHT_DIFF_SESSION: &str = "weight_diff_session";
    /// Weight at entry by subject
    pub const WEIGHT_ENTER_SUBJECT: &str = "weight_enter_subject";
    /// Weight diff by subject
    pub const WEIGHT_DIFF_SUBJECT: &str = "weight_diff_subject";
    /// Session duration by session
    pub const DURATION_SESSION: &str = "duration_session";
    /// Post-threshold duration by session
    pub const POST_THRESH_DUR_SESSION: &str = "post_thresh_dur_session";
    /// Pre-sampling-both duration by session
    pub const PRE_SAMPLING_BOTH_P_DUR_SESSION: &str = "pre_sampling_both_p_dur_session";
    /// Session duration by subject
    pub const DURATION_SUBJECT: &str = "duration_subject";
    /// Post-threshold duration by subject
    pub const POST_THRESH_DUR_SUBJECT: &str = "post_thresh_dur_subject";
    /// Pre-sampling-both duration by subject
    pub const PRE_SAMPLING_BOTH_P_DUR_SUBJECT: &str = "pre_sampling_both_p_dur_subject";
    /// Hard patch by session
    pub const HARD_PATCH_SESSION: &str = "hard_patch_session";
    /// Hard patch by subject
    pub const HARD_PATCH_SUBJECT: &str = "hard_patch_subject";
    /// Time-to-criterion per cohort
    pub const PATCH_PREF_TIME_SUBJ: &str = "patch_pref_time_subj_graph";
    /// Distance-to-criterion per cohort
    pub const PATCH_PREF_DIST_SUBJ: &str = "patch_pref_dist_subj_graph";
    /// Preference by distance quantile
    pub const PATCH_PREF_EPOCH_SESSION: &str = "patch_pref_epoch_session";
    /// Cumulative preference by distance quantile
    pub const CUM_PATCH_PREF_EPOCH_SESSION: &str = "cum_patch_pref_epoch_session";
    /// Wheel distance by session
    pub const WHEEL_SESSION_ABS: &str = "wheel_session_abs";
    /// Wheel preference by session
    pub const WHEEL_SESSION_NORM: &str = "wheel_session_norm";
    /// Wheel distance by subject
    pub const WHEEL_SUBJECT_ABS: &str = "wheel_subject_abs";
    /// Wheel preference by subject
    pub const WHEEL_SUBJECT_NORM: &str = "wheel_subject_norm";
    /// Pellets by session
    pub const PELLET_SESSION_ABS: &str = "pellet_session_abs";
    /// Pellet preference by session
    pub const PELLET_SESSION_NORM: &str = "pellet_session_norm";
    /// Pellets by subject
    pub const PELLET_SUBJECT_ABS: &str = "pellet_subject_abs";
    /// Pellet preference by subject
    pub const PELLET_SUBJECT_NORM: &str = "pellet_subject_norm";
    /// Probabilistic thresholds by session
    pub const PROB_PELS_SESSION: &str = "prob_pels_session";
    /// Probabilistic thresholds by subject
    pub const PROB_PELS_SUBJECT: &str = "prob_pels_subject";
}

/// Sessions grouped by subject, keeping input order for both.
pub(crate) fn by_subject<'a>(
    sessions: &[&'a SessionRecord],
) -> Vec<(&'a str, Vec<&'a SessionRecord>)> {
    let mut groups: Vec<(&'a str, Vec<&'a SessionRecord>)> = Vec::new();
    for &session in sessions {
        match groups.iter_mut().find(|(s, _)| *s == session.subject) {
            Some((_, group)) => group.push(session),
            None => groups.push((session.subject.as_str(), vec![session])),
        }
    }
    groups
}

/// How a per-subject series is drawn over entry time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SeriesStyle {
    LinesMarkers,
    Bars,
}

/// One trace per subject, x = entry time, y = `value`.
pub(crate) fn session_traces(
    sessions: &[&SessionRecord],
    palette: &SubjectPalette,
    style: SeriesStyle,
    value: impl Fn(&SessionRecord) -> Option<f64>,
) -> Result<Vec<Trace>> {
    by_subject(sessions)
        .into_iter()
        .map(|(subject, group)| {
            let color = palette.color(subject)?;
            let trace = match style {
                SeriesStyle::LinesMarkers => Trace::scatter(Mode::LinesMarkers)
                    .marker(Marker {
                        color: Some(color.to_string()),
                        size: Some(MARKER_SIZE),
                        symbol: None,
                    })
                    .line(Line::color(color)),
                SeriesStyle::Bars => Trace::bar().marker(Marker::color(color)),
            };
            Ok(trace
                .name(subject)
                .x(Values::times(group.iter().map(|s| &s.enter)))
                .y(Values::optional(group.iter().map(|&s| value(s)))))
        })
        .collect()
}

/// One histogram per subject of `value`.
pub(crate) fn subject_histograms(
    sessions: &[&SessionRecord],
    palette: &SubjectPalette,
    value: impl Fn(&SessionRecord) -> Option<f64>,
) -> Result<Vec<Trace>> {
    by_subject(sessions)
        .into_iter()
        .map(|(subject, group)| {
            Ok(Trace::histogram()
                .name(subject)
                .marker(Marker::color(palette.color(subject)?))
                .x(Values::optional(group.iter().map(|&s| value(s)))))
        })
        .collect()
}

/// Figure with traces, a title, and axis/legend titles.
pub(crate) fn titled_figure(
    title: &str,
    traces: Vec<Trace>,
    x_title: &str,
    y_title: &str,
    legend_title: &str,
) -> Figure {
    let mut figure = Figure::titled(title);
    figure.data = traces;
    figure.layout.set_x_title(x_title);
    figure.layout.set_y_title(y_title);
    figure.layout.set_legend_title(legend_title);
    figure
}


#[cfg(test)]
mod tests {
    use super::test_support::session;
    use super::*;

    #[test]
    fn test_by_subject_keeps_order() {
        let a = session("BAA-1103045", 0);
        let b = session("BAA-1103045", 1);
        let c = session("BAA-1103047", 0);
        let sessions = vec![&a, &b, &c];

        let groups = by_subject(&sessions);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "BAA-1103045");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "BAA-1103047");
    }

    #[test]
    fn test_session_traces_unknown_subject() {
        let a = session("BAA-0000000", 0);
        let sessions = vec![&a];
        let result = session_traces(
            &sessions,
            &SubjectPalette::default(),
            SeriesStyle::Bars,
            |s| s.weight_enter,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_input_gives_no_traces() {
        let traces = subject_histograms(&[], &SubjectPalette::default(), |s| s.weight_enter).unwrap();
        assert!(traces.is_empty());
    }
}
