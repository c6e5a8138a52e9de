//! Continuous patch preference - per-sample preference evolution within a session

use serde::{Deserialize, Serialize};

/// Index range in which the subject is classified as having learned the
/// easy-patch preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedWindow {
    /// First sample inside the window
    pub start: usize,
    /// Last sample inside the window, if recorded
    pub end: Option<usize>,
}

/// Preference-over-time record for one session.
///
/// All series are indexed by sample (one sample per second). `easy_pref`
/// defines the session length; `cum_distance` maps a sample to the wheel
/// distance spun so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContinuousPreference {
    /// Cumulative wheel distance per sample (cm)
    pub cum_distance: Vec<f64>,
    /// Lower bound of the chance band
    pub low_bound: Vec<f64>,
    /// Upper bound of the chance band
    pub high_bound: Vec<f64>,
    /// Observed easy-patch preference
    pub easy_pref: Vec<f64>,
    /// Learned window, `None` if the session never reached criterion
    pub learned: Option<LearnedWindow>,
    /// Sample at which the patch thresholds changed
    pub thresh_change_idx: Option<usize>,
}

impl ContinuousPreference {
    /// Session length in samples (seconds).
    #[must_use]
    pub fn len_samples(&self) -> usize {
        self.easy_pref.len()
    }

    /// Distance spun by the end of the session; an empty series spun nothing.
    #[must_use]
    pub fn end_distance(&self) -> f64 {
        self.cum_distance.last().copied().unwrap_or(0.0)
    }

    /// Cumulative distance at a sample index.
    #[must_use]
    pub fn distance_at(&self, idx: usize) -> Option<f64> {
        self.cum_distance.get(idx).copied()
    }

    /// Whether the session entered its learned window.
    #[must_use]
    pub const fn reached_criterion(&self) -> bool {
        self.learned.is_some()
    }
}
