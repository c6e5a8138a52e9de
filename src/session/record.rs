//! Session Record - one row of the presocial session table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CohortKey, ContinuousPreference};

/// Values split by session phase (pre/post threshold change) and patch (easy/hard).
///
/// Used for wheel distances, pellet counts and the pre-computed wheel
/// preferences. A missing value propagates into every sum that uses it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchSplit {
    /// Pre-threshold, easy patch
    pub pre_easy: Option<f64>,
    /// Pre-threshold, hard patch
    pub pre_hard: Option<f64>,
    /// Post-threshold, easy patch
    pub post_easy: Option<f64>,
    /// Post-threshold, hard patch
    pub post_hard: Option<f64>,
}

impl PatchSplit {
    /// Create a split with all four values present.
    #[must_use]
    pub const fn new(pre_easy: f64, pre_hard: f64, post_easy: f64, post_hard: f64) -> Self {
        Self {
            pre_easy: Some(pre_easy),
            pre_hard: Some(pre_hard),
            post_easy: Some(post_easy),
            post_hard: Some(post_hard),
        }
    }
}

/// Threshold values drawn during the probabilistic period, with their times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSeries {
    /// Threshold distances (cm)
    pub values: Vec<f64>,
    /// When each threshold was set
    pub times: Vec<DateTime<Utc>>,
}

/// Easy-patch preference per distance quantile ("epoch") within a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpochPreference {
    /// Preference within each quantile
    pub per_epoch: Vec<f64>,
    /// Cumulative preference up to each quantile
    pub cumulative: Vec<f64>,
    /// Quantile in which the patch thresholds changed
    pub thresh_change_idx: Option<usize>,
}

/// Session Record represents one experimental session of one subject.
///
/// Records are immutable after load; everything the dashboard shows beyond
/// these fields is derived on demand (see [`crate::derive`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Subject identifier (e.g. `BAA-1103045`)
    pub subject: String,
    /// Entry timestamp
    pub enter: DateTime<Utc>,
    /// Exit timestamp
    pub exit: Option<DateTime<Utc>>,
    /// Weight at entry (g)
    pub weight_enter: Option<f64>,
    /// Weight at exit (g)
    pub weight_exit: Option<f64>,
    /// Session duration (s)
    pub duration_secs: Option<f64>,
    /// Time spent after the threshold change (s)
    pub post_thresh_secs: Option<f64>,
    /// Time before both patches were sampled (s)
    pub pre_sampling_both_secs: Option<f64>,
    /// Which patch was the hard one
    pub hard_patch: Option<String>,
    /// Easy-patch rate after the threshold change
    pub post_easy_rate: f64,
    /// Hard-patch rate after the threshold change
    pub post_hard_rate: f64,
    /// Wheel distance spun per phase/patch (cm)
    pub wheel: PatchSplit,
    /// Pre-computed wheel preference per phase/patch
    pub wheel_pref: PatchSplit,
    /// Pellets delivered per phase/patch
    pub pellets: PatchSplit,
    /// Preference by distance quantile
    pub epochs: EpochPreference,
    /// Probabilistic easy-patch thresholds
    pub easy_thresholds: ThresholdSeries,
    /// Probabilistic hard-patch thresholds
    pub hard_thresholds: ThresholdSeries,
    /// Continuous preference-over-time record
    pub preference: ContinuousPreference,
}

impl SessionRecord {
    /// Create a builder with the fields that identify a session's cohort.
    #[must_use]
    pub fn builder(
        subject: impl Into<String>,
        enter: DateTime<Utc>,
        post_easy_rate: f64,
        post_hard_rate: f64,
    ) -> SessionRecordBuilder {
        SessionRecordBuilder::new(subject, enter, post_easy_rate, post_hard_rate)
    }

    /// Cohort this session belongs to.
    #[must_use]
    pub fn cohort_key(&self) -> CohortKey {
        CohortKey::new(self.subject.clone(), self.post_easy_rate, self.post_hard_rate)
    }

    /// Exit weight minus entry weight.
    #[must_use]
    pub fn weight_diff(&self) -> Option<f64> {
        Some(self.weight_exit? - self.weight_enter?)
    }

    /// Session duration in minutes.
    #[must_use]
    pub fn duration_mins(&self) -> Option<f64> {
        self.duration_secs.map(secs_to_mins)
    }

    /// Post-threshold duration in minutes.
    #[must_use]
    pub fn post_thresh_mins(&self) -> Option<f64> {
        self.post_thresh_secs.map(secs_to_mins)
    }

    /// Pre-sampling-both-patches duration in minutes.
    #[must_use]
    pub fn pre_sampling_both_mins(&self) -> Option<f64> {
        self.pre_sampling_both_secs.map(secs_to_mins)
    }
}

fn secs_to_mins(secs: f64) -> f64 {
    secs / 60.0
}

/// Builder for `SessionRecord`.
#[derive(Debug)]
pub struct SessionRecordBuilder {
    record: SessionRecord,
}

impl SessionRecordBuilder {
    /// Create a new builder with required fields; everything else starts empty.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        enter: DateTime<Utc>,
        post_easy_rate: f64,
        post_hard_rate: f64,
    ) -> Self {
        Self {
            record: SessionRecord {
                subject: subject.into(),
                enter,
                exit: None,
                weight_enter: None,
                weight_exit: None,
                duration_secs: None,
                post_thresh_secs: None,
                pre_sampling_both_secs: None,
                hard_patch: None,
                post_easy_rate,
                post_hard_rate,
                wheel: PatchSplit::default(),
                wheel_pref: PatchSplit::default(),
                pellets: PatchSplit::default(),
                epochs: EpochPreference::default(),
                easy_thresholds: ThresholdSeries::default(),
                hard_thresholds: ThresholdSeries::default(),
                preference: ContinuousPreference::default(),
            },
        }
    }

    /// Set the exit timestamp.
    #[must_use]
    pub fn exit(mut self, exit: DateTime<Utc>) -> Self {
        self.record.exit = Some(exit);
        self
    }

    /// Set entry and exit weights (g).
    #[must_use]
    pub fn weights(mut self, enter: f64, exit: f64) -> Self {
        self.record.weight_enter = Some(enter);
        self.record.weight_exit = Some(exit);
        self
    }

    /// Set the three session durations (s).
    #[must_use]
    pub fn durations(mut self, total: f64, post_thresh: f64, pre_sampling_both: f64) -> Self {
        self.record.duration_secs = Some(total);
        self.record.post_thresh_secs = Some(post_thresh);
        self.record.pre_sampling_both_secs = Some(pre_sampling_both);
        self
    }

    /// Set which patch was hard.
    #[must_use]
    pub fn hard_patch(mut self, patch: impl Into<String>) -> Self {
        self.record.hard_patch = Some(patch.into());
        self
    }

    /// Set wheel distances (cm).
    #[must_use]
    pub fn wheel(mut self, wheel: PatchSplit) -> Self {
        self.record.wheel = wheel;
        self
    }

    /// Set the pre-computed wheel preferences.
    #[must_use]
    pub fn wheel_pref(mut self, pref: PatchSplit) -> Self {
        self.record.wheel_pref = pref;
        self
    }

    /// Set pellet counts.
    #[must_use]
    pub fn pellets(mut self, pellets: PatchSplit) -> Self {
        self.record.pellets = pellets;
        self
    }

    /// Set the per-quantile preference series.
    #[must_use]
    pub fn epochs(mut self, epochs: EpochPreference) -> Self {
        self.record.epochs = epochs;
        self
    }

    /// Set probabilistic thresholds for both patches.
    #[must_use]
    pub fn thresholds(mut self, easy: ThresholdSeries, hard: ThresholdSeries) -> Self {
        self.record.easy_thresholds = easy;
        self.record.hard_thresholds = hard;
        self
    }

    /// Set the continuous preference record.
    #[must_use]
    pub fn preference(mut self, preference: ContinuousPreference) -> Self {
        self.record.preference = preference;
        self
    }

    /// Build the `SessionRecord`.
    #[must_use]
    pub fn build(self) -> SessionRecord {
        self.record
    }
}
