//! Visual constants: dark theme, subject colours and marker symbols

use rustc_hash::FxHashMap;

use crate::figure::{Figure, Font};
use crate::{Error, Result};

/// Marker size for every scatter marker (px)
pub const MARKER_SIZE: u32 = 14;

/// Marker symbols, one per column of a multi-column chart
pub const MARKERS: [&str; 9] = [
    "circle",
    "square",
    "diamond",
    "cross",
    "star",
    "triangle-up",
    "triangle-left",
    "triangle-right",
    "triangle-down",
];

/// Marker symbol for the `i`-th column (wraps around).
#[must_use]
pub const fn marker_symbol(i: usize) -> &'static str {
    MARKERS[i % MARKERS.len()]
}

/// Dashboard colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Page and figure paper background
    pub background: String,
    /// Plot area background
    pub plot_background: String,
    /// Text colour
    pub text: String,
    /// Selected tab background
    pub tab_background: String,
    /// Selected tab text
    pub tab_text: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#050505".to_string(),
            plot_background: "#0d0d0d".to_string(),
            text: "#f2f2f2".to_string(),
            tab_background: "#003399".to_string(),
            tab_text: "#f2f2f2".to_string(),
        }
    }
}

impl Theme {
    /// Apply background and font colours to a figure.
    pub fn apply(&self, figure: &mut Figure) {
        figure.layout.paper_bgcolor = Some(self.background.clone());
        figure.layout.plot_bgcolor = Some(self.plot_background.clone());
        figure.layout.font = Some(Font {
            color: self.text.clone(),
        });
    }

    /// Return the figure with the theme applied.
    #[must_use]
    pub fn themed(&self, mut figure: Figure) -> Figure {
        self.apply(&mut figure);
        figure
    }
}

/// Fixed colour per subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPalette {
    colors: FxHashMap<String, String>,
}

impl Default for SubjectPalette {
    fn default() -> Self {
        Self::from_pairs([
            ("BAA-1103045", "rgb(31, 119, 180)"),
            ("BAA-1103047", "rgb(214, 39, 40)"),
            ("BAA-1103048", "rgb(44, 160, 44)"),
            ("BAA-1103049", "rgb(148, 103, 189)"),
            ("BAA-1103050", "rgb(255, 127, 14)"),
        ])
    }
}

impl SubjectPalette {
    /// Palette from `(subject, css colour)` pairs.
    pub fn from_pairs<S, C>(pairs: impl IntoIterator<Item = (S, C)>) -> Self
    where
        S: Into<String>,
        C: Into<String>,
    {
        Self {
            colors: pairs
                .into_iter()
                .map(|(s, c)| (s.into(), c.into()))
                .collect(),
        }
    }

    /// Colour of a subject.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSubject` if the subject has no colour.
    pub fn color(&self, subject: &str) -> Result<&str> {
        self.colors
            .get(subject)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownSubject(subject.to_string()))
    }

    /// Check that every subject has a colour.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSubject` for the first subject without one.
    pub fn check<'a>(&self, subjects: impl IntoIterator<Item = &'a str>) -> Result<()> {
        subjects
            .into_iter()
            .try_for_each(|s| self.color(s).map(|_| ()))
    }

    /// Number of subjects with a colour.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = SubjectPalette::default();
        assert_eq!(palette.len(), 5);
        assert_eq!(palette.color("BAA-1103047").unwrap(), "rgb(214, 39, 40)");
    }

    #[test]
    fn test_unknown_subject_fails() {
        let palette = SubjectPalette::default();
        let err = palette.color("BAA-9999999").unwrap_err();
        assert!(matches!(err, Error::UnknownSubject(ref s) if s == "BAA-9999999"));
        assert!(palette.check(["BAA-1103045", "BAA-9999999"]).is_err());
        assert!(palette.check(["BAA-1103045", "BAA-1103050"]).is_ok());
    }

    #[test]
    fn test_marker_symbols_wrap() {
        assert_eq!(marker_symbol(0), "circle");
        assert_eq!(marker_symbol(8), "triangle-down");
        assert_eq!(marker_symbol(9), "circle");
    }

    #[test]
    fn test_theme_applied() {
        let figure = Theme::default().themed(Figure::new());
        assert_eq!(figure.layout.paper_bgcolor.as_deref(), Some("#050505"));
        assert_eq!(figure.layout.plot_bgcolor.as_deref(), Some("#0d0d0d"));
        assert_eq!(figure.layout.font.unwrap().color, "#f2f2f2");
    }
}
