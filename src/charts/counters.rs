//! Wheel and pellet counter charts
//!
//! Generic over [`SessionColumn`]: the same builders draw absolute and
//! normalised wheel/pellet columns.

use super::{by_subject, marker_symbol, SubjectPalette, MARKER_SIZE};
use crate::derive::SessionColumn;
use crate::figure::{Figure, Line, Marker, Mode, Trace, Values};
use crate::session::SessionRecord;
use crate::Result;

/// Titles of one counter chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterChart {
    /// Figure title
    pub title: &'static str,
    /// Y axis title
    pub y_title: &'static str,
    /// Legend title
    pub legend_title: &'static str,
}

/// One scatter per (column, subject) over entry time.
///
/// Each column gets its own marker symbol and legend group; only the first
/// subject's trace of a column shows in the legend.
///
/// # Errors
///
/// Returns `UnknownSubject` if a subject has no palette colour.
pub fn counter_session_figure<C: SessionColumn>(
    sessions: &[&SessionRecord],
    palette: &SubjectPalette,
    chart: CounterChart,
) -> Result<Figure> {
    let groups = sorted_groups(sessions);
    let mut figure = Figure::titled(chart.title);

    for (idx, column) in C::ALL.iter().enumerate() {
        for (j, (subject, group)) in groups.iter().enumerate() {
            figure.add_trace(
                Trace::scatter(Mode::LinesMarkers)
                    .name(column.name())
                    .x(Values::times(group.iter().map(|s| &s.enter)))
                    .y(Values::optional(group.iter().map(|&s| column.value(s))))
                    .marker(Marker::size(MARKER_SIZE).with_symbol(marker_symbol(idx)))
                    .legend_group(column.name())
                    .show_legend(j == 0)
                    .line(Line::color(palette.color(subject)?)),
            );
        }
    }

    figure.layout.set_x_title("Enter");
    figure.layout.set_y_title(chart.y_title);
    figure.layout.set_legend_title(chart.legend_title);
    Ok(figure)
}

/// One box per (subject, column) at `x = i + j·(ncols + 0.5)`, ticks
/// labelled `{subject} {column}`.
///
/// # Errors
///
/// Returns `UnknownSubject` if a subject has no palette colour.
#[allow(clippy::cast_precision_loss)]
pub fn counter_subject_figure<C: SessionColumn>(
    sessions: &[&SessionRecord],
    palette: &SubjectPalette,
    chart: CounterChart,
) -> Result<Figure> {
    let groups = sorted_groups(sessions);
    let stride = C::ALL.len() as f64 + 0.5;
    let mut figure = Figure::titled(chart.title);
    let mut tickvals = Vec::new();
    let mut ticktext = Vec::new();

    for (j, (subject, group)) in groups.iter().enumerate() {
        let color = palette.color(subject)?;
        for (i, column) in C::ALL.iter().enumerate() {
            let xpos = i as f64 + j as f64 * stride;
            tickvals.push(xpos);
            ticktext.push(format!("{subject} {}", column.name()));
            figure.add_trace(
                Trace::box_plot()
                    .name(column.name())
                    .x(Values::numbers(std::iter::repeat(xpos).take(group.len())))
                    .y(Values::optional(group.iter().map(|&s| column.value(s))))
                    .legend_group(column.name())
                    .show_legend(j == 0)
                    .point_spread(-1.5, 0.1)
                    .line(Line::color(color)),
            );
        }
    }

    let x_axis = figure.layout.axis_mut("xaxis");
    x_axis.tickmode = Some("array");
    x_axis.tickvals = Some(tickvals);
    x_axis.ticktext = Some(ticktext);
    figure.layout.set_y_title(chart.y_title);
    figure.layout.set_legend_title(chart.legend_title);
    Ok(figure)
}

/// Per-subject session groups, subjects sorted.
fn sorted_groups<'a>(sessions: &[&'a SessionRecord]) -> Vec<(&'a str, Vec<&'a SessionRecord>)> {
    let mut groups = by_subject(sessions);
    groups.sort_by_key(|(subject, _)| *subject);
    groups
}

#[cfg(test)]
mod tests {
    use super::super::test_support::session;
    use super::*;
    use crate::derive::{PelletPreference, WheelMetric};
    use crate::session::PatchSplit;

    const CHART: CounterChart = CounterChart {
        title: "Wheel Distance Spun (Absolute) by Session",
        y_title: "Distance Spun (cm)",
        legend_title: "Wheel Distances",
    };

    fn wheel_session(subject: &str, day: i64) -> SessionRecord {
        let mut s = session(subject, day);
        s.wheel = PatchSplit::new(100.0, 50.0, 300.0, 150.0);
        s.pellets = PatchSplit::new(3.0, 1.0, 2.0, 2.0);
        s
    }

    #[test]
    fn test_session_figure_traces_per_column_and_subject() {
        let a = wheel_session("BAA-1103048", 0);
        let b = wheel_session("BAA-1103045", 0);
        let c = wheel_session("BAA-1103045", 1);
        let sessions = vec![&b, &c, &a];

        let figure =
            counter_session_figure::<WheelMetric>(&sessions, &SubjectPalette::default(), CHART)
                .unwrap();
        assert_eq!(figure.data.len(), 9 * 2);

        let first = &figure.data[0];
        assert_eq!(first.name.as_deref(), Some("pre_easy_wheel_dist"));
        assert_eq!(first.showlegend, Some(true));
        assert_eq!(first.marker.as_ref().unwrap().symbol, Some("circle"));
        assert_eq!(figure.data[1].showlegend, Some(false));

        let total = &figure.data[16];
        assert_eq!(total.name.as_deref(), Some("tot_wheel"));
        assert_eq!(total.y, Some(Values::numbers([600.0, 600.0])));
        assert_eq!(total.marker.as_ref().unwrap().symbol, Some("triangle-down"));
    }

    #[test]
    fn test_subject_figure_positions_and_ticks() {
        let a = wheel_session("BAA-1103045", 0);
        let b = wheel_session("BAA-1103049", 0);
        let sessions = vec![&a, &b];
        let chart = CounterChart {
            title: "Pellets (Normalized) by Subject",
            y_title: "Pellets (a.u. 0-1)",
            legend_title: "Divisions",
        };

        let figure =
            counter_subject_figure::<PelletPreference>(&sessions, &SubjectPalette::default(), chart)
                .unwrap();
        assert_eq!(figure.data.len(), 16);

        let x_axis = &figure.layout.axes["xaxis"];
        let tickvals = x_axis.tickvals.as_ref().unwrap();
        assert_eq!(tickvals[0], 0.0);
        assert_eq!(tickvals[8], 8.5);
        let ticktext = x_axis.ticktext.as_ref().unwrap();
        assert_eq!(ticktext[0], "BAA-1103045 pre_easy_pel_pref");
        assert_eq!(ticktext[15], "BAA-1103049 easy_pel_pref");
        assert_eq!(figure.title(), Some("Pellets (Normalized) by Subject"));

        assert_eq!(figure.data[0].y, Some(Values::numbers([0.75])));
        assert_eq!(figure.data[0].boxpoints, Some("all"));
    }
}
