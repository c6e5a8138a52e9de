//! Patch preference charts
//!
//! Per cohort, two subplot grids (one cell per session): preference over
//! time and preference over cumulative wheel distance. Per threshold group,
//! bars and boxes of the criterion metrics.

use super::SubjectPalette;
use crate::derive::{malformed, Cohort, CriterionMetrics, CriterionTable};
use crate::figure::{AxisRef, Figure, Grid, Line, Marker, Mode, Shape, Title, Trace, Values};
use crate::session::SessionRecord;
use crate::Result;

/// Sessions per grid row.
const MAX_COLS: usize = 3;
/// Top of the vertical marker lines (preference axis runs 0-1).
const VLINE_TOP: f64 = 1.1;
const VLINE_WIDTH: f64 = 3.0;

/// The two session-grid figures of one cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortFigures {
    /// Cohort label (`{subject} {easy} {hard}`)
    pub label: String,
    /// Preference over time
    pub time: Figure,
    /// Preference over distance
    pub dist: Figure,
}

/// Build the time and distance grids for one cohort.
///
/// # Errors
///
/// Returns `UnknownSubject` if the subject has no colour, or
/// `MalformedSession` if a threshold-change or learned-window index lies
/// past the end of the distance series.
pub fn cohort_figures(cohort: &Cohort<'_>, palette: &SubjectPalette) -> Result<CohortFigures> {
    let key = cohort.key();
    let title = format!(
        "{}  easy_rate: {}  hard_rate: {}",
        key.subject(),
        key.easy_rate(),
        key.hard_rate()
    );
    let color = palette.color(key.subject())?;
    let grid = Grid::for_cells(cohort.sessions().len(), MAX_COLS);
    let mut time = grid.figure(title.as_str());
    let mut dist = grid.figure(title);

    for (i, session) in cohort.sessions().iter().enumerate() {
        let axes = grid.cell(i);
        let pref = &session.preference;

        time.add_trace(
            Trace::scatter(Mode::Lines)
                .name("high_bound")
                .y(Values::numbers(pref.high_bound.iter().copied()))
                .line(Line::dashed("darkslategray"))
                .on_axes(&axes),
        );
        dist.add_trace(
            Trace::scatter(Mode::Lines)
                .name("high_bound")
                .x(Values::numbers(pref.cum_distance.iter().copied()))
                .y(Values::numbers(pref.high_bound.iter().copied()))
                .line(Line::dashed("darkslategray"))
                .on_axes(&axes),
        );
        time.add_trace(
            Trace::scatter(Mode::Lines)
                .name("true")
                .y(Values::numbers(pref.easy_pref.iter().copied()))
                .line(Line::color(color))
                .on_axes(&axes),
        );
        dist.add_trace(
            Trace::scatter(Mode::Lines)
                .name("true")
                .x(Values::numbers(pref.cum_distance.iter().copied()))
                .y(Values::numbers(pref.easy_pref.iter().copied()))
                .line(Line::color(color))
                .on_axes(&axes),
        );

        if let Some(idx) = pref.thresh_change_idx {
            let line = Line::dashed("lightslategray").with_width(VLINE_WIDTH);
            time.add_shape(vline(&axes, index_x(idx), line.clone()).named("thresh_change"));
            let x = distance(session, idx, "threshold change")?;
            dist.add_shape(vline(&axes, x, line).named("thresh_change"));
        }

        if let Some(window) = pref.learned {
            let line = Line::dashed("deeppink").with_width(VLINE_WIDTH);
            let ends = std::iter::once(window.start).chain(window.end);
            for idx in ends {
                time.add_shape(vline(&axes, index_x(idx), line.clone()));
                let x = distance(session, idx, "learned window")?;
                dist.add_shape(vline(&axes, x, line.clone()));
            }
        }

        let date = session.enter.format("%Y-%m-%d").to_string();
        label_cell(&mut time, &axes, "Time (s)", &date);
        label_cell(&mut dist, &axes, "Distance (cm)", &date);
    }

    Ok(CohortFigures {
        label: key.label(),
        time,
        dist,
    })
}

fn vline(axes: &AxisRef, x: f64, line: Line) -> Shape {
    Shape::vline(axes, x, 0.0, VLINE_TOP, line)
}

#[allow(clippy::cast_precision_loss)]
fn index_x(idx: usize) -> f64 {
    idx as f64
}

fn distance(session: &SessionRecord, idx: usize, what: &str) -> Result<f64> {
    session.preference.distance_at(idx).ok_or_else(|| {
        malformed(
            session,
            format!(
                "{what} index {idx} past end of distance series ({} samples)",
                session.preference.cum_distance.len()
            ),
        )
    })
}

fn label_cell(figure: &mut Figure, axes: &AxisRef, x_title: &str, y_title: &str) {
    figure.layout.axis_mut(axes.x_layout_key()).title = Some(Title::new(x_title));
    figure.layout.axis_mut(axes.y_layout_key()).title = Some(Title::new(y_title));
}

/// Which criterion a subject-level figure compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionMeasure {
    /// Distance to criterion (cm)
    Distance,
    /// Time to criterion (s)
    Time,
}

impl CriterionMeasure {
    const fn title(self) -> &'static str {
        match self {
            Self::Distance => "Pre Easy Preference Distance",
            Self::Time => "Pre Easy Preference Time",
        }
    }

    const fn axis_title(self) -> &'static str {
        match self {
            Self::Distance => "Distance (cm)",
            Self::Time => "Time (s)",
        }
    }

    /// `(column name, box suffix, metric)` for the initial and average cells.
    fn columns(self) -> [(&'static str, &'static str, fn(&CriterionMetrics) -> Option<f64>); 2] {
        match self {
            Self::Distance => [
                ("pre_pref_init_dist", "init", |m| m.init_distance),
                ("pre_pref_avg_dist", "avg", |m| m.avg_distance),
            ],
            Self::Time => [
                ("pre_pref_init_time", "init", |m| m.init_time),
                ("pre_pref_avg_time", "avg", |m| m.avg_time),
            ],
        }
    }
}

/// 1×2 grid comparing initial (left) and average (right) criterion per
/// cohort: a light-gray bar per threshold group and a box per group.
#[must_use]
pub fn criterion_figure(table: &CriterionTable, measure: CriterionMeasure) -> Figure {
    let grid = Grid::new(1, 2);
    let mut figure = grid.figure(measure.title());
    figure.layout.showlegend = Some(true);
    let groups = table.groups();
    let columns = measure.columns();

    for (i, (column, _, metric)) in columns.iter().enumerate() {
        let axes = grid.cell(i);
        for group in &groups {
            let rows: Vec<_> = table.group_rows(group).collect();
            figure.add_trace(
                Trace::bar()
                    .name(format!("{column} {group}"))
                    .x(Values::labels(rows.iter().map(|r| r.cohort.label())))
                    .y(Values::optional(rows.iter().map(|r| metric(&r.metrics))))
                    .marker(Marker::color("lightgray"))
                    .on_axes(&axes),
            );
        }
        figure.layout.axis_mut(axes.x_layout_key()).title = Some(Title::new(*column));
    }
    figure.layout.set_y_title(measure.axis_title());

    for (i, (_, suffix, metric)) in columns.iter().enumerate() {
        let axes = grid.cell(i);
        for group in &groups {
            figure.add_trace(
                Trace::box_plot()
                    .name(format!("{group} {suffix} box"))
                    .y(Values::optional(
                        table.group_rows(group).map(|r| metric(&r.metrics)),
                    ))
                    .marker(Marker::color("lightslategray"))
                    .on_axes(&axes),
            );
        }
    }

    figure
}
