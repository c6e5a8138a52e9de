//! Session data model
//!
//! ## Schema Overview
//!
//! ```text
//! CohortKey (subject, easy_rate, hard_rate) ──< SessionRecord (N)
//!                                                   │
//!                                                   └── ContinuousPreference
//!                                                         (per-sample series,
//!                                                          learned window)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use presocial_dash::session::{ContinuousPreference, LearnedWindow, SessionRecord};
//!
//! let enter = Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap();
//! let session = SessionRecord::builder("BAA-1103045", enter, 0.01, 0.0025)
//!     .weights(25.1, 25.9)
//!     .preference(ContinuousPreference {
//!         cum_distance: vec![0.0, 40.0, 120.0],
//!         easy_pref: vec![0.5, 0.6, 0.8],
//!         learned: Some(LearnedWindow { start: 2, end: None }),
//!         ..ContinuousPreference::default()
//!     })
//!     .build();
//!
//! assert_eq!(session.cohort_key().label(), "BAA-1103045 0.01 0.0025");
//! ```

mod cohort;
mod preference;
mod record;

pub use cohort::CohortKey;
pub use preference::{ContinuousPreference, LearnedWindow};
pub use record::{
    EpochPreference, PatchSplit, SessionRecord, SessionRecordBuilder, ThresholdSeries,
};
