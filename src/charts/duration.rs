//! Session duration charts (minutes)

use super::{
    session_traces, subject_histograms, titled_figure, SeriesStyle, SubjectPalette,
};
use crate::figure::Figure;
use crate::session::SessionRecord;
use crate::Result;

const AXIS_TITLE: &str = "duration (mins)";

/// Which duration a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationKind {
    /// Whole session
    Session,
    /// After the threshold change
    PostThreshold,
    /// Before both patches were sampled
    PreSamplingBoth,
}

impl DurationKind {
    /// All durations, in display order.
    pub const ALL: [Self; 3] = [Self::Session, Self::PostThreshold, Self::PreSamplingBoth];

    fn minutes(self, session: &SessionRecord) -> Option<f64> {
        match self {
            Self::Session => session.duration_mins(),
            Self::PostThreshold => session.post_thresh_mins(),
            Self::PreSamplingBoth => session.pre_sampling_both_mins(),
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Session => "Session Duration",
            Self::PostThreshold => "Post-Threshold Duration",
            Self::PreSamplingBoth => "Pre-Sampling Both Patches Duration",
        }
    }
}

/// Session (bars over entry time) and subject (histogram) figures.
///
/// # Errors
///
/// Returns `UnknownSubject` if a subject has no palette colour.
pub fn duration_figures(
    sessions: &[&SessionRecord],
    palette: &SubjectPalette,
    kind: DurationKind,
) -> Result<(Figure, Figure)> {
    let minutes = |s: &SessionRecord| kind.minutes(s);

    let traces = session_traces(sessions, palette, SeriesStyle::Bars, minutes)?;
    let mut session = titled_figure(
        &format!("{} by Session", kind.label()),
        traces,
        "enter",
        AXIS_TITLE,
        "id",
    );
    session.layout.barmode = Some("relative");

    let traces = subject_histograms(sessions, palette, minutes)?;
    let mut subject = titled_figure(
        &format!("{} by Subject", kind.label()),
        traces,
        AXIS_TITLE,
        "count",
        "id",
    );
    subject.layout.barmode = Some("relative");

    Ok((session, subject))
}
