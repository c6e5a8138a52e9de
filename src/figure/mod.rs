//! Plotly figure model
//!
//! Figures are plain data: a list of traces plus a layout, serialised to
//! the JSON that `Plotly.newPlot` / `Plotly.react` accept.
//!
//! ```text
//! Figure
//!  ├── data: [Trace]          scatter | bar | histogram | box
//!  └── layout: Layout
//!        ├── xaxis, yaxis, xaxis2, ...   (Grid assigns domains)
//!        ├── shapes: [Shape]             vertical marker lines
//!        └── paper/plot bgcolor, font    (Theme)
//! ```

mod layout;
mod trace;

pub use layout::{Axis, Font, Layout, Legend, Shape, Title};
pub use trace::{AxisRef, Dash, Line, Marker, Mode, Trace, TraceKind, Values, TIME_FORMAT};

use serde::Serialize;

use crate::Result;

/// A complete Plotly figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    /// Traces, drawn in order
    pub data: Vec<Trace>,
    /// Layout
    pub layout: Layout,
}

impl Figure {
    /// Create an empty figure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty figure with a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        let mut figure = Self::new();
        figure.layout.title = Some(Title::new(title));
        figure
    }

    /// Append a trace.
    pub fn add_trace(&mut self, trace: Trace) {
        self.data.push(trace);
    }

    /// Append a shape.
    pub fn add_shape(&mut self, shape: Shape) {
        self.layout.shapes.push(shape);
    }

    /// Figure title text, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.layout.title.as_ref().map(|t| t.text.as_str())
    }

    /// Serialise to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if serde fails (not expected for figures).
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serialise to a compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if serde fails (not expected for figures).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Subplot grid, laid out like Plotly's `make_subplots`.
///
/// Cells are numbered row-major from the top-left; cell `n` (1-based) uses
/// axes `xn`/`yn`. Spacing is `0.2 / cols` horizontally and `0.3 / rows`
/// vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Grid with at least one row and one column.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Grid for `cells` cells with at most `max_cols` columns.
    #[must_use]
    pub fn for_cells(cells: usize, max_cols: usize) -> Self {
        let cols = cells.clamp(1, max_cols.max(1));
        Self::new(cells.div_ceil(cols), cols)
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Axes of the cell holding item `i` (0-based, row-major).
    #[must_use]
    pub fn cell(&self, i: usize) -> AxisRef {
        AxisRef::nth(i + 1)
    }

    /// Figure with every cell's axes placed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn figure(&self, title: impl Into<String>) -> Figure {
        let mut figure = Figure::titled(title);
        let (rows, cols) = (self.rows as f64, self.cols as f64);
        let h_space = 0.2 / cols;
        let v_space = 0.3 / rows;
        let width = (1.0 - h_space * (cols - 1.0)) / cols;
        let height = (1.0 - v_space * (rows - 1.0)) / rows;

        for r in 0..self.rows {
            for c in 0..self.cols {
                let axes = self.cell(r * self.cols + c);
                let x0 = c as f64 * (width + h_space);
                let y1 = 1.0 - r as f64 * (height + v_space);

                let x_axis = figure.layout.axis_mut(axes.x_layout_key());
                x_axis.domain = Some([round(x0), round(x0 + width)]);
                x_axis.anchor = Some(axes.y.clone());

                let y_axis = figure.layout.axis_mut(axes.y_layout_key());
                y_axis.domain = Some([round(y1 - height), round(y1)]);
                y_axis.anchor = Some(axes.x.clone());
            }
        }
        figure
    }
}

// Keep domains stable in JSON output (0.3 / 3 * 2 etc. otherwise drift).
fn round(v: f64) -> f64 {
    (v * 1e9).round() / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_for_cells() {
        assert_eq!(Grid::for_cells(1, 3), Grid::new(1, 1));
        assert_eq!(Grid::for_cells(2, 3), Grid::new(1, 2));
        assert_eq!(Grid::for_cells(3, 3), Grid::new(1, 3));
        assert_eq!(Grid::for_cells(7, 3), Grid::new(3, 3));
        // Empty cohort still gets one cell
        assert_eq!(Grid::for_cells(0, 3), Grid::new(1, 1));
    }

    #[test]
    fn test_grid_domains_1x2() {
        let figure = Grid::new(1, 2).figure("Pre Easy Preference Distance");
        let json = figure.to_value().unwrap();

        assert_eq!(json["layout"]["xaxis"]["domain"][0], 0.0);
        assert_eq!(json["layout"]["xaxis"]["domain"][1], 0.45);
        assert_eq!(json["layout"]["xaxis2"]["domain"][0], 0.55);
        assert_eq!(json["layout"]["xaxis2"]["domain"][1], 1.0);
        assert_eq!(json["layout"]["yaxis2"]["anchor"], "x2");
        assert_eq!(json["layout"]["yaxis"]["domain"][1], 1.0);
    }

    #[test]
    fn test_grid_rows_top_down() {
        let figure = Grid::new(2, 1).figure("t");
        let top = figure.layout.axes["yaxis"].domain.unwrap();
        let bottom = figure.layout.axes["yaxis2"].domain.unwrap();
        assert!(top[0] > bottom[1]);
        assert!((bottom[0] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_figure_json_shape() {
        let mut figure = Figure::titled("Weight at Entry by Session");
        figure.add_trace(Trace::bar().y(Values::numbers([1.0])));
        let json = figure.to_json().unwrap();
        assert!(json.starts_with("{\"data\":[{\"type\":\"bar\""));
        assert!(json.contains("\"title\":{\"text\":\"Weight at Entry by Session\"}"));
        assert_eq!(figure.title(), Some("Weight at Entry by Session"));
    }
}
