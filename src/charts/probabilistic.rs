//! Probabilistic pellet threshold charts
//!
//! Thresholds of every session of a subject are concatenated; a subject
//! with no thresholds for a patch gets no trace for it.

use super::{by_subject, marker_symbol, titled_figure, SubjectPalette, MARKER_SIZE};
use crate::figure::{Figure, Line, Marker, Mode, Trace, Values};
use crate::session::{SessionRecord, ThresholdSeries};
use crate::Result;

const PATCHES: [(&str, fn(&SessionRecord) -> &ThresholdSeries); 2] = [
    ("post_easy_pel_thresh", |s| &s.easy_thresholds),
    ("post_hard_pel_thresh", |s| &s.hard_thresholds),
];

/// Concatenated thresholds of one subject for one patch. Values and times
/// are paired per session before concatenation.
fn concatenated<'a>(
    group: &[&'a SessionRecord],
    series: fn(&SessionRecord) -> &ThresholdSeries,
) -> (Vec<f64>, Vec<&'a chrono::DateTime<chrono::Utc>>) {
    group
        .iter()
        .flat_map(|&s| {
            let thresholds = series(s);
            thresholds.values.iter().copied().zip(&thresholds.times)
        })
        .unzip()
}

/// Threshold values over time, one trace per (subject, patch).
///
/// # Errors
///
/// Returns `UnknownSubject` if a subject has no palette colour.
pub fn prob_pels_session(sessions: &[&SessionRecord], palette: &SubjectPalette) -> Result<Figure> {
    let mut groups = by_subject(sessions);
    groups.sort_by_key(|(subject, _)| *subject);
    let mut traces = Vec::new();

    for (subject, group) in &groups {
        let color = palette.color(subject)?;
        for (idx, (column, series)) in PATCHES.iter().enumerate() {
            let (values, times) = concatenated(group, *series);
            if values.is_empty() {
                continue;
            }
            traces.push(
                Trace::scatter(Mode::LinesMarkers)
                    .name(format!("{subject}: {column}"))
                    .x(Values::times(times))
                    .y(Values::numbers(values))
                    .marker(Marker::size(MARKER_SIZE).with_symbol(marker_symbol(idx)))
                    .line(Line::color(color)),
            );
        }
    }

    Ok(titled_figure(
        "Threshold Values During Probabilistic Period",
        traces,
        "Datetime",
        "Distance (cm)",
        "Divisions",
    ))
}

/// Threshold distributions, one box per (subject, patch).
///
/// # Errors
///
/// Returns `UnknownSubject` if a subject has no palette colour.
#[allow(clippy::cast_precision_loss)]
pub fn prob_pels_subject(sessions: &[&SessionRecord], palette: &SubjectPalette) -> Result<Figure> {
    let mut groups = by_subject(sessions);
    groups.sort_by_key(|(subject, _)| *subject);
    let stride = PATCHES.len() as f64 + 0.5;
    let mut figure = Figure::titled("Threshold Values Distributions During Probabilistic Period");
    let mut tickvals = Vec::new();
    let mut ticktext = Vec::new();

    for (j, (subject, group)) in groups.iter().enumerate() {
        let color = palette.color(subject)?;
        for (i, (column, series)) in PATCHES.iter().enumerate() {
            let (values, _) = concatenated(group, *series);
            if values.is_empty() {
                continue;
            }
            let xpos = i as f64 + j as f64 * stride;
            tickvals.push(xpos);
            ticktext.push(format!("{subject} {column}"));
            figure.add_trace(
                Trace::box_plot()
                    .name(format!("{subject} {column}"))
                    .x(Values::numbers(std::iter::repeat(xpos).take(values.len())))
                    .y(Values::numbers(values))
                    .point_spread(-1.5, 0.1)
                    .line(Line::color(color)),
            );
        }
    }

    let x_axis = figure.layout.axis_mut("xaxis");
    x_axis.tickmode = Some("array");
    x_axis.tickvals = Some(tickvals);
    x_axis.ticktext = Some(ticktext);
    figure.layout.set_y_title("Distance (cm)");
    figure.layout.set_legend_title("Divisions");
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::session;
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn with_thresholds(mut s: SessionRecord, easy: &[f64], hard: &[f64]) -> SessionRecord {
        let series = |values: &[f64]| ThresholdSeries {
            values: values.to_vec(),
            times: (0..values.len())
                .map(|i| s.enter + Duration::minutes(i as i64))
                .collect(),
        };
        let (easy, hard) = (series(easy), series(hard));
        s.easy_thresholds = easy;
        s.hard_thresholds = hard;
        s
    }

    #[test]
    fn test_thresholds_concatenated_per_subject() {
        let a = with_thresholds(session("BAA-1103045", 0), &[75.0, 80.0], &[200.0]);
        let b = with_thresholds(session("BAA-1103045", 1), &[90.0], &[]);
        let c = with_thresholds(session("BAA-1103047", 0), &[], &[]);
        let sessions = vec![&a, &b, &c];

        let figure = prob_pels_session(&sessions, &SubjectPalette::default()).unwrap();
        // BAA-1103047 has no thresholds at all
        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[0].name.as_deref(), Some("BAA-1103045: post_easy_pel_thresh"));
        assert_eq!(figure.data[0].y, Some(Values::numbers([75.0, 80.0, 90.0])));
        let second_day = Utc.with_ymd_and_hms(2023, 6, 2, 9, 0, 0).unwrap();
        assert_eq!(
            figure.data[0].x,
            Some(Values::labels([
                "2023-06-01 09:00:00".to_string(),
                "2023-06-01 09:01:00".to_string(),
                second_day.format("%Y-%m-%d %H:%M:%S").to_string(),
            ]))
        );
        assert_eq!(figure.data[1].marker.as_ref().unwrap().symbol, Some("square"));
    }

    #[test]
    fn test_unpaired_threshold_does_not_shift_later_sessions() {
        let mut a = with_thresholds(session("BAA-1103045", 0), &[75.0, 100.0], &[]);
        a.easy_thresholds.times.truncate(1);
        let b = with_thresholds(session("BAA-1103045", 1), &[80.0, 110.0], &[]);
        let sessions = vec![&a, &b];

        let figure = prob_pels_session(&sessions, &SubjectPalette::default()).unwrap();
        let trace = &figure.data[0];
        assert_eq!(trace.y, Some(Values::numbers([75.0, 80.0, 110.0])));
        assert_eq!(
            trace.x,
            Some(Values::labels([
                "2023-06-01 09:00:00".to_string(),
                "2023-06-02 09:00:00".to_string(),
                "2023-06-02 09:01:00".to_string(),
            ]))
        );
    }

    #[test]
    fn test_subject_boxes_skip_empty() {
        let a = with_thresholds(session("BAA-1103045", 0), &[75.0], &[]);
        let b = with_thresholds(session("BAA-1103050", 0), &[60.0], &[210.0, 220.0]);
        let sessions = vec![&a, &b];

        let figure = prob_pels_subject(&sessions, &SubjectPalette::default()).unwrap();
        assert_eq!(figure.data.len(), 3);
        let x_axis = &figure.layout.axes["xaxis"];
        assert_eq!(x_axis.tickvals, Some(vec![0.0, 2.5, 3.5]));
        assert_eq!(
            x_axis.ticktext.as_deref().unwrap()[2],
            "BAA-1103050 post_hard_pel_thresh"
        );
    }
}
