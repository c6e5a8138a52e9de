//! Hard patch charts
//!
//! Sessions without a recorded hard patch are left out of both charts.

use super::{by_subject, titled_figure, SubjectPalette};
use crate::figure::{Figure, Marker, Trace, Values};
use crate::session::SessionRecord;
use crate::Result;

/// Bars per subject: x = entry time, y = hard patch (categorical).
///
/// # Errors
///
/// Returns `UnknownSubject` if a subject has no palette colour.
pub fn hard_patch_session(sessions: &[&SessionRecord], palette: &SubjectPalette) -> Result<Figure> {
    let traces = by_subject(sessions)
        .into_iter()
        .map(|(subject, group)| {
            let known: Vec<&SessionRecord> = group
                .into_iter()
                .filter(|s| s.hard_patch.is_some())
                .collect();
            Ok(Trace::bar()
                .name(subject)
                .marker(Marker::color(palette.color(subject)?))
                .x(Values::times(known.iter().map(|s| &s.enter)))
                .y(Values::labels(
                    known.iter().filter_map(|s| s.hard_patch.as_deref()),
                )))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut figure = titled_figure("Hard Patch by Session", traces, "enter", "hard_patch", "id");
    figure.layout.barmode = Some("relative");
    Ok(figure)
}

/// Count of sessions per hard patch, one histogram per subject.
///
/// # Errors
///
/// Returns `UnknownSubject` if a subject has no palette colour.
pub fn hard_patch_subject(sessions: &[&SessionRecord], palette: &SubjectPalette) -> Result<Figure> {
    let traces = by_subject(sessions)
        .into_iter()
        .map(|(subject, group)| {
            Ok(Trace::histogram()
                .name(subject)
                .marker(Marker::color(palette.color(subject)?))
                .x(Values::labels(
                    group.iter().filter_map(|s| s.hard_patch.as_deref()),
                )))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut figure = titled_figure("Hard Patch by Subject", traces, "hard_patch", "count", "id");
    figure.layout.barmode = Some("relative");
    Ok(figure)
}
