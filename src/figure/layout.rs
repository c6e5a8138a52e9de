//! Plotly layout: titles, axes, shapes and colours

use std::collections::BTreeMap;

use serde::Serialize;

use super::trace::{AxisRef, Line};

/// Title text wrapper (`{"text": ...}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Title {
    /// Title text
    pub text: String,
}

impl Title {
    /// Create a title.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Font settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Font {
    /// Text colour
    pub color: String,
}

/// Legend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    /// Legend title
    pub title: Title,
}

/// One x or y axis
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    /// Axis title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    /// Fraction of the plotting area covered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    /// Counterpart axis this one is anchored to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    /// Tick mode (`array` for explicit ticks)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickmode: Option<&'static str>,
    /// Explicit tick positions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<f64>>,
    /// Explicit tick labels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticktext: Option<Vec<String>>,
}

/// Layout shape (only lines are used)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    /// Shape type
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Start x
    pub x0: f64,
    /// End x
    pub x1: f64,
    /// Start y
    pub y0: f64,
    /// End y
    pub y1: f64,
    /// X axis the coordinates refer to
    pub xref: String,
    /// Y axis the coordinates refer to
    pub yref: String,
    /// Line style
    pub line: Line,
    /// Shape name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Shape {
    /// Vertical line at `x` from `y0` to `y1` on a subplot's axes.
    #[must_use]
    pub fn vline(axes: &AxisRef, x: f64, y0: f64, y1: f64, line: Line) -> Self {
        Self {
            kind: "line",
            x0: x,
            x1: x,
            y0,
            y1,
            xref: axes.x.clone(),
            yref: axes.y.clone(),
            line,
            name: None,
        }
    }

    /// Set the shape name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Figure layout
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    /// Figure title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    /// Axes keyed by layout name (`xaxis`, `yaxis2`, ...)
    #[serde(flatten)]
    pub axes: BTreeMap<String, Axis>,
    /// Legend settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    /// Show the legend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    /// How bars/histograms of different traces combine (`relative`, `group`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    /// Shapes drawn over the plot
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    /// Page background colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<String>,
    /// Plot area background colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    /// Global font
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Layout {
    /// Mutable access to an axis, created on first use.
    pub fn axis_mut(&mut self, key: impl Into<String>) -> &mut Axis {
        self.axes.entry(key.into()).or_default()
    }

    /// Title the first x axis.
    pub fn set_x_title(&mut self, text: impl Into<String>) {
        self.axis_mut("xaxis").title = Some(Title::new(text));
    }

    /// Title the first y axis.
    pub fn set_y_title(&mut self, text: impl Into<String>) {
        self.axis_mut("yaxis").title = Some(Title::new(text));
    }

    /// Title the legend.
    pub fn set_legend_title(&mut self, text: impl Into<String>) {
        self.legend = Some(Legend {
            title: Title::new(text),
        });
    }
}
