//! Preference by distance quantile within each session

use rustc_hash::FxHashMap;

use super::{titled_figure, SubjectPalette, MARKER_SIZE};
use crate::figure::{Figure, Line, Marker, Mode, Trace, Values};
use crate::session::SessionRecord;
use crate::Result;

/// Which epoch series to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochSeries {
    /// Preference within each quantile
    PerEpoch,
    /// Cumulative preference up to each quantile
    Cumulative,
}

impl EpochSeries {
    fn values(self, session: &SessionRecord) -> &[f64] {
        match self {
            Self::PerEpoch => &session.epochs.per_epoch,
            Self::Cumulative => &session.epochs.cumulative,
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::PerEpoch => "Patch Preference by Distance Quantile within Session",
            Self::Cumulative => "Cumulative Patch Preference by Distance Quantile within Session",
        }
    }
}

/// One line per session named `{subject}: {n}` (n counts that subject's
/// sessions from 1), each followed by a black two-point segment spanning the
/// threshold-change quantile and the next one.
///
/// # Errors
///
/// Returns `UnknownSubject` if a subject has no palette colour.
pub fn epoch_figure(
    sessions: &[&SessionRecord],
    palette: &SubjectPalette,
    series: EpochSeries,
) -> Result<Figure> {
    let mut counters: FxHashMap<&str, usize> = FxHashMap::default();
    let mut traces = Vec::with_capacity(sessions.len() * 2);

    for session in sessions {
        let subject = session.subject.as_str();
        let color = palette.color(subject)?;
        let n = counters.entry(subject).or_insert(0);
        *n += 1;
        let name = format!("{subject}: {n}");
        let y = series.values(session);

        traces.push(
            Trace::scatter(Mode::LinesMarkers)
                .name(name.as_str())
                .y(Values::numbers(y.iter().copied()))
                .marker(Marker::size(MARKER_SIZE))
                .line(Line::color(color)),
        );

        if let Some(z) = session.epochs.thresh_change_idx {
            let segment = y.get(z..y.len().min(z + 2)).unwrap_or_default();
            #[allow(clippy::cast_precision_loss)]
            let x = [z as f64, (z + 1) as f64];
            traces.push(
                Trace::scatter(Mode::LinesMarkers)
                    .name(format!("{name}: thresh change"))
                    .x(Values::numbers(x))
                    .y(Values::numbers(segment.iter().copied()))
                    .marker(Marker::size(MARKER_SIZE))
                    .line(Line::color("black")),
            );
        }
    }

    Ok(titled_figure(
        series.title(),
        traces,
        "Distance Quantile",
        "Easy Patch Preference",
        "Session",
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::session;
    use super::*;
    use crate::session::EpochPreference;

    fn with_epochs(mut s: SessionRecord, thresh: Option<usize>) -> SessionRecord {
        s.epochs = EpochPreference {
            per_epoch: vec![0.4, 0.5, 0.7, 0.8],
            cumulative: vec![0.4, 0.45, 0.53, 0.6],
            thresh_change_idx: thresh,
        };
        s
    }

    #[test]
    fn test_session_counter_and_thresh_segment() {
        let a = with_epochs(session("BAA-1103045", 0), Some(1));
        let b = with_epochs(session("BAA-1103045", 1), Some(3));
        let c = with_epochs(session("BAA-1103047", 0), None);
        let sessions = vec![&a, &b, &c];

        let figure = epoch_figure(&sessions, &SubjectPalette::default(), EpochSeries::PerEpoch)
            .unwrap();
        let names: Vec<&str> = figure
            .data
            .iter()
            .filter_map(|t| t.name.as_deref())
            .collect();
        assert_eq!(
            names,
            vec![
                "BAA-1103045: 1",
                "BAA-1103045: 1: thresh change",
                "BAA-1103045: 2",
                "BAA-1103045: 2: thresh change",
                "BAA-1103047: 1",
            ]
        );

        assert_eq!(figure.data[1].x, Some(Values::numbers([1.0, 2.0])));
        assert_eq!(figure.data[1].y, Some(Values::numbers([0.5, 0.7])));
        // Threshold change in the last quantile: segment has one point
        assert_eq!(figure.data[3].y, Some(Values::numbers([0.8])));
        assert_eq!(figure.data[1].line.as_ref().unwrap().color.as_deref(), Some("black"));
    }

    #[test]
    fn test_cumulative_title() {
        let figure = epoch_figure(&[], &SubjectPalette::default(), EpochSeries::Cumulative).unwrap();
        assert!(figure.data.is_empty());
        assert_eq!(
            figure.title(),
            Some("Cumulative Patch Preference by Distance Quantile within Session")
        );
    }
}
