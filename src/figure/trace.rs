//! Plotly traces

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Timestamp format used for every date axis value.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trace type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    /// Lines and/or markers
    Scatter,
    /// Bars
    Bar,
    /// Histogram (binned client-side)
    Histogram,
    /// Box plot
    Box,
}

/// Scatter drawing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    /// Lines only
    #[serde(rename = "lines")]
    Lines,
    /// Markers only
    #[serde(rename = "markers")]
    Markers,
    /// Lines with markers
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

/// Line dash style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    /// Solid
    Solid,
    /// Dashed
    Dash,
}

/// Axis values: numbers (missing → `null`) or category/date labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Values {
    /// Numeric values; `None` and non-finite values serialise as `null`
    Numbers(Vec<Option<f64>>),
    /// Text values (categories, formatted timestamps)
    Labels(Vec<String>),
}

impl Values {
    /// Numeric values, all present.
    pub fn numbers(values: impl IntoIterator<Item = f64>) -> Self {
        Self::Numbers(values.into_iter().map(finite).collect())
    }

    /// Numeric values with gaps.
    pub fn optional(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::Numbers(values.into_iter().map(|v| v.and_then(finite)).collect())
    }

    /// Timestamps formatted with [`TIME_FORMAT`].
    pub fn times<'a>(times: impl IntoIterator<Item = &'a DateTime<Utc>>) -> Self {
        Self::Labels(
            times
                .into_iter()
                .map(|t| t.format(TIME_FORMAT).to_string())
                .collect(),
        )
    }

    /// Text labels.
    pub fn labels<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self::Labels(labels.into_iter().map(Into::into).collect())
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numbers(v) => v.len(),
            Self::Labels(v) => v.len(),
        }
    }

    /// Whether there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Marker style
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Marker {
    /// Colour (CSS)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Size (px)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Symbol name (`circle`, `square`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<&'static str>,
}

impl Marker {
    /// Marker with just a colour.
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Marker with just a size.
    #[must_use]
    pub fn size(size: u32) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Set the symbol.
    #[must_use]
    pub const fn with_symbol(mut self, symbol: &'static str) -> Self {
        self.symbol = Some(symbol);
        self
    }
}

/// Line style
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Line {
    /// Colour (CSS)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Dash style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<Dash>,
    /// Width (px)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

impl Line {
    /// Solid line in a colour.
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Dashed line in a colour.
    #[must_use]
    pub fn dashed(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            dash: Some(Dash::Dash),
            width: None,
        }
    }

    /// Set the width.
    #[must_use]
    pub const fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }
}

/// One Plotly trace.
///
/// Built with [`Trace::scatter`], [`Trace::bar`], [`Trace::histogram`] or
/// [`Trace::box_plot`] and the chained setters below.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    /// Trace type
    #[serde(rename = "type")]
    pub kind: TraceKind,
    /// Legend name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// X values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Values>,
    /// Y values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Values>,
    /// Scatter mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    /// Marker style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    /// Line style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    /// Legend group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legendgroup: Option<String>,
    /// Show in legend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    /// Box points (`all`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxpoints: Option<&'static str>,
    /// Box point offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointpos: Option<f64>,
    /// Box point jitter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jitter: Option<f64>,
    /// X axis reference (`x`, `x2`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<String>,
    /// Y axis reference (`y`, `y2`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
}

impl Trace {
    fn new(kind: TraceKind) -> Self {
        Self {
            kind,
            name: None,
            x: None,
            y: None,
            mode: None,
            marker: None,
            line: None,
            legendgroup: None,
            showlegend: None,
            boxpoints: None,
            pointpos: None,
            jitter: None,
            xaxis: None,
            yaxis: None,
        }
    }

    /// Scatter trace with the given mode.
    #[must_use]
    pub fn scatter(mode: Mode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::new(TraceKind::Scatter)
        }
    }

    /// Bar trace.
    #[must_use]
    pub fn bar() -> Self {
        Self::new(TraceKind::Bar)
    }

    /// Histogram trace.
    #[must_use]
    pub fn histogram() -> Self {
        Self::new(TraceKind::Histogram)
    }

    /// Box trace showing all points.
    #[must_use]
    pub fn box_plot() -> Self {
        Self {
            boxpoints: Some("all"),
            ..Self::new(TraceKind::Box)
        }
    }

    /// Set the legend name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set x values.
    #[must_use]
    pub fn x(mut self, x: Values) -> Self {
        self.x = Some(x);
        self
    }

    /// Set y values.
    #[must_use]
    pub fn y(mut self, y: Values) -> Self {
        self.y = Some(y);
        self
    }

    /// Set the marker.
    #[must_use]
    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Set the line.
    #[must_use]
    pub fn line(mut self, line: Line) -> Self {
        self.line = Some(line);
        self
    }

    /// Put the trace in a legend group.
    #[must_use]
    pub fn legend_group(mut self, group: impl Into<String>) -> Self {
        self.legendgroup = Some(group.into());
        self
    }

    /// Show or hide the legend entry.
    #[must_use]
    pub const fn show_legend(mut self, show: bool) -> Self {
        self.showlegend = Some(show);
        self
    }

    /// Offset and jitter of the points drawn beside a box.
    #[must_use]
    pub const fn point_spread(mut self, pointpos: f64, jitter: f64) -> Self {
        self.pointpos = Some(pointpos);
        self.jitter = Some(jitter);
        self
    }

    /// Bind the trace to a pair of axes.
    #[must_use]
    pub fn on_axes(mut self, axes: &AxisRef) -> Self {
        self.xaxis = Some(axes.x.clone());
        self.yaxis = Some(axes.y.clone());
        self
    }
}

/// References to the x/y axis pair of one subplot cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisRef {
    /// Trace-side x reference (`x`, `x2`, ...)
    pub x: String,
    /// Trace-side y reference (`y`, `y2`, ...)
    pub y: String,
}

impl AxisRef {
    /// Axis pair number `n` (1-based).
    #[must_use]
    pub fn nth(n: usize) -> Self {
        if n <= 1 {
            Self {
                x: "x".to_string(),
                y: "y".to_string(),
            }
        } else {
            Self {
                x: format!("x{n}"),
                y: format!("y{n}"),
            }
        }
    }

    /// Layout key of the x axis (`xaxis`, `xaxis2`, ...).
    #[must_use]
    pub fn x_layout_key(&self) -> String {
        format!("xaxis{}", &self.x[1..])
    }

    /// Layout key of the y axis (`yaxis`, `yaxis2`, ...).
    #[must_use]
    pub fn y_layout_key(&self) -> String {
        format!("yaxis{}", &self.y[1..])
    }
}
