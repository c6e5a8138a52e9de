//! Weight charts

use super::{
    session_traces, subject_histograms, titled_figure, SeriesStyle, SubjectPalette,
};
use crate::figure::Figure;
use crate::session::SessionRecord;
use crate::Result;

/// Which weight measure a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightKind {
    /// Weight at entry
    Enter,
    /// Exit weight minus entry weight
    Diff,
}

impl WeightKind {
    fn value(self, session: &SessionRecord) -> Option<f64> {
        match self {
            Self::Enter => session.weight_enter,
            Self::Diff => session.weight_diff(),
        }
    }

    const fn session_title(self) -> &'static str {
        match self {
            Self::Enter => "Weight at Entry by Session",
            Self::Diff => "Weight Diff by Session",
        }
    }

    const fn subject_title(self) -> &'static str {
        match self {
            Self::Enter => "Weight Enter by Subject",
            Self::Diff => "Weight Diff by Subject",
        }
    }
}

/// Session (line+markers over entry time) and subject (histogram) figures.
///
/// # Errors
///
/// Returns `UnknownSubject` if a subject has no palette colour.
pub fn weight_figures(
    sessions: &[&SessionRecord],
    palette: &SubjectPalette,
    kind: WeightKind,
) -> Result<(Figure, Figure)> {
    let value = |s: &SessionRecord| kind.value(s);

    let traces = session_traces(sessions, palette, SeriesStyle::LinesMarkers, value)?;
    let session = titled_figure(kind.session_title(), traces, "enter", "weight (g)", "id");

    let traces = subject_histograms(sessions, palette, value)?;
    let mut subject = titled_figure(kind.subject_title(), traces, "weight (g)", "count", "id");
    subject.layout.barmode = Some("relative");

    Ok((session, subject))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::session;
    use super::*;

    #[test]
    fn test_weight_diff_series() {
        let a = session("BAA-1103045", 0);
        let b = session("BAA-1103045", 2);
        let c = session("BAA-1103048", 1);
        let sessions = vec![&a, &b, &c];

        let (by_session, by_subject) =
            weight_figures(&sessions, &SubjectPalette::default(), WeightKind::Diff).unwrap();
        let json = by_session.to_value().unwrap();

        assert_eq!(json["data"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"][0]["name"], "BAA-1103045");
        assert_eq!(json["data"][0]["y"][1], 1.0);
        assert_eq!(json["data"][0]["x"][0], "2023-06-01 09:00:00");
        assert_eq!(json["data"][0]["marker"]["size"], 14);
        assert_eq!(json["layout"]["title"]["text"], "Weight Diff by Session");
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "weight (g)");

        assert_eq!(by_subject.data[1].name.as_deref(), Some("BAA-1103048"));
        assert_eq!(by_subject.title(), Some("Weight Diff by Subject"));
    }

    #[test]
    fn test_empty_input_gives_empty_charts() {
        let (a, b) = weight_figures(&[], &SubjectPalette::default(), WeightKind::Enter).unwrap();
        assert!(a.data.is_empty());
        assert!(b.data.is_empty());
    }
}
