//! Derived per-session columns (wheel and pellet counters)
//!
//! ```text
//! PatchSplit ──> SplitTotals ──> Counter ──> CounterColumn<Wheel | Pellets> (absolute)
//!                     │
//!                     └────────> WheelPreference / PelletPreference (0-1)
//! ```
//!
//! Sums propagate a missing operand; ratios with a zero denominator are
//! missing rather than `NaN` or infinite.

use std::marker::PhantomData;

use crate::session::{PatchSplit, SessionRecord};

/// A named column computed from one session.
pub trait SessionColumn: Copy + 'static {
    /// Every column of this kind, in display order
    const ALL: &'static [Self];

    /// Column name as shown in legends and tick labels
    fn name(self) -> &'static str;

    /// Column value for one session
    fn value(self, session: &SessionRecord) -> Option<f64>;
}

/// Phase and patch totals of a [`PatchSplit`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SplitTotals {
    /// `pre_hard + post_hard`
    pub tot_hard: Option<f64>,
    /// `pre_easy + post_easy`
    pub tot_easy: Option<f64>,
    /// `pre_hard + pre_easy`
    pub tot_pre: Option<f64>,
    /// `post_hard + post_easy`
    pub tot_post: Option<f64>,
    /// `tot_hard + tot_easy`
    pub total: Option<f64>,
}

impl SplitTotals {
    /// Compute all totals of a split.
    #[must_use]
    pub fn of(split: &PatchSplit) -> Self {
        let tot_hard = sum(split.pre_hard, split.post_hard);
        let tot_easy = sum(split.pre_easy, split.post_easy);
        Self {
            tot_hard,
            tot_easy,
            tot_pre: sum(split.pre_hard, split.pre_easy),
            tot_post: sum(split.post_hard, split.post_easy),
            total: sum(tot_hard, tot_easy),
        }
    }
}

fn sum(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? + b?)
}

/// `part / (part + rest)`, missing when either is missing or the sum is zero.
#[must_use]
pub fn share(part: Option<f64>, rest: Option<f64>) -> Option<f64> {
    let (part, rest) = (part?, rest?);
    let whole = part + rest;
    if whole == 0.0 {
        None
    } else {
        Some(part / whole)
    }
}

fn complement(pref: Option<f64>) -> Option<f64> {
    pref.map(|p| 1.0 - p)
}

/// Phase/patch counter shared by the wheel and pellet columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    /// Pre-threshold, easy patch
    PreEasy,
    /// Pre-threshold, hard patch
    PreHard,
    /// Post-threshold, easy patch
    PostEasy,
    /// Post-threshold, hard patch
    PostHard,
    /// Both phases, hard patch
    TotHard,
    /// Both phases, easy patch
    TotEasy,
    /// Both patches, pre-threshold
    TotPre,
    /// Both patches, post-threshold
    TotPost,
    /// Everything
    Total,
}

impl Counter {
    /// Value of this counter for one split.
    #[must_use]
    pub fn of(self, split: &PatchSplit) -> Option<f64> {
        let totals = SplitTotals::of(split);
        match self {
            Self::PreEasy => split.pre_easy,
            Self::PreHard => split.pre_hard,
            Self::PostEasy => split.post_easy,
            Self::PostHard => split.post_hard,
            Self::TotHard => totals.tot_hard,
            Self::TotEasy => totals.tot_easy,
            Self::TotPre => totals.tot_pre,
            Self::TotPost => totals.tot_post,
            Self::Total => totals.total,
        }
    }
}

/// Which split of a session a [`CounterColumn`] reads, and the column
/// names it goes by.
pub trait CounterSource: Copy + 'static {
    /// Column names, indexed by [`Counter`] discriminant
    const NAMES: [&'static str; 9];

    /// The raw split behind the counters
    fn split(session: &SessionRecord) -> &PatchSplit;
}

/// Wheel distance (cm).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wheel;

impl CounterSource for Wheel {
    const NAMES: [&'static str; 9] = [
        "pre_easy_wheel_dist",
        "pre_hard_wheel_dist",
        "post_easy_wheel_dist",
        "post_hard_wheel_dist",
        "tot_hard_wheel",
        "tot_easy_wheel",
        "tot_pre_wheel",
        "tot_post_wheel",
        "tot_wheel",
    ];

    fn split(session: &SessionRecord) -> &PatchSplit {
        &session.wheel
    }
}

/// Pellet counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pellets;

impl CounterSource for Pellets {
    const NAMES: [&'static str; 9] = [
        "pre_easy_n_pel",
        "pre_hard_n_pel",
        "post_easy_n_pel",
        "post_hard_n_pel",
        "tot_hard_n_pel",
        "tot_easy_n_pel",
        "tot_pre_n_pel",
        "tot_post_n_pel",
        "tot_n_pel",
    ];

    fn split(session: &SessionRecord) -> &PatchSplit {
        &session.pellets
    }
}

/// Absolute counter column over one [`CounterSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterColumn<S> {
    counter: Counter,
    source: PhantomData<S>,
}

impl<S> CounterColumn<S> {
    /// Column for one counter.
    #[must_use]
    pub const fn new(counter: Counter) -> Self {
        Self {
            counter,
            source: PhantomData,
        }
    }

    /// The counter this column reads.
    #[must_use]
    pub const fn counter(self) -> Counter {
        self.counter
    }
}

impl<S: CounterSource> SessionColumn for CounterColumn<S> {
    const ALL: &'static [Self] = &[
        Self::new(Counter::PreEasy),
        Self::new(Counter::PreHard),
        Self::new(Counter::PostEasy),
        Self::new(Counter::PostHard),
        Self::new(Counter::TotHard),
        Self::new(Counter::TotEasy),
        Self::new(Counter::TotPre),
        Self::new(Counter::TotPost),
        Self::new(Counter::Total),
    ];

    fn name(self) -> &'static str {
        S::NAMES[self.counter as usize]
    }

    fn value(self, session: &SessionRecord) -> Option<f64> {
        self.counter.of(S::split(session))
    }
}

/// Absolute wheel distance columns (cm).
pub type WheelMetric = CounterColumn<Wheel>;

/// Absolute pellet count columns.
pub type PelletMetric = CounterColumn<Pellets>;

/// Normalised wheel columns (0-1).
///
/// The four phase/patch preferences are read from the table; the rest are
/// shares of the wheel totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelPreference {
    /// Pre-threshold, easy patch
    PreEasy,
    /// Pre-threshold, hard patch
    PreHard,
    /// Post-threshold, easy patch
    PostEasy,
    /// Post-threshold, hard patch
    PostHard,
    /// Share spent pre-threshold
    Pre,
    /// Share spent post-threshold
    Post,
    /// Share on the hard patch
    Hard,
    /// Share on the easy patch
    Easy,
}

impl SessionColumn for WheelPreference {
    const ALL: &'static [Self] = &[
        Self::PreEasy,
        Self::PreHard,
        Self::PostEasy,
        Self::PostHard,
        Self::Pre,
        Self::Post,
        Self::Hard,
        Self::Easy,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::PreEasy => "pre_easy_pref",
            Self::PreHard => "pre_hard_pref",
            Self::PostEasy => "post_easy_pref",
            Self::PostHard => "post_hard_pref",
            Self::Pre => "pre_pref",
            Self::Post => "post_pref",
            Self::Hard => "hard_pref",
            Self::Easy => "easy_pref",
        }
    }

    fn value(self, session: &SessionRecord) -> Option<f64> {
        let pref = &session.wheel_pref;
        let totals = SplitTotals::of(&session.wheel);
        let pre = share(totals.tot_pre, totals.tot_post);
        let easy = share(totals.tot_easy, totals.tot_hard);
        match self {
            Self::PreEasy => pref.pre_easy,
            Self::PreHard => pref.pre_hard,
            Self::PostEasy => pref.post_easy,
            Self::PostHard => pref.post_hard,
            Self::Pre => pre,
            Self::Post => complement(pre),
            Self::Hard => complement(easy),
            Self::Easy => easy,
        }
    }
}

/// Normalised pellet columns (0-1), all derived from the pellet counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PelletPreference {
    /// Pre-threshold, easy patch
    PreEasy,
    /// Pre-threshold, hard patch
    PreHard,
    /// Post-threshold, easy patch
    PostEasy,
    /// Post-threshold, hard patch
    PostHard,
    /// Share spent pre-threshold
    Pre,
    /// Share spent post-threshold
    Post,
    /// Share on the hard patch
    Hard,
    /// Share on the easy patch
    Easy,
}

impl SessionColumn for PelletPreference {
    const ALL: &'static [Self] = &[
        Self::PreEasy,
        Self::PreHard,
        Self::PostEasy,
        Self::PostHard,
        Self::Pre,
        Self::Post,
        Self::Hard,
        Self::Easy,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::PreEasy => "pre_easy_pel_pref",
            Self::PreHard => "pre_hard_pel_pref",
            Self::PostEasy => "post_easy_pel_pref",
            Self::PostHard => "post_hard_pel_pref",
            Self::Pre => "pre_pel_pref",
            Self::Post => "post_pel_pref",
            Self::Hard => "hard_pel_pref",
            Self::Easy => "easy_pel_pref",
        }
    }

    fn value(self, session: &SessionRecord) -> Option<f64> {
        let pel = &session.pellets;
        let totals = SplitTotals::of(pel);
        let pre_easy = share(pel.pre_easy, pel.pre_hard);
        let post_easy = share(pel.post_easy, pel.post_hard);
        let pre = share(totals.tot_pre, totals.tot_post);
        let easy = share(totals.tot_easy, totals.tot_hard);
        match self {
            Self::PreEasy => pre_easy,
            Self::PreHard => complement(pre_easy),
            Self::PostEasy => post_easy,
            Self::PostHard => complement(post_easy),
            Self::Pre => pre,
            Self::Post => complement(pre),
            Self::Hard => complement(easy),
            Self::Easy => easy,
        }
    }
}
