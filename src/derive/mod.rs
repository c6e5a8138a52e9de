//! Derivation stage: per-session columns and per-cohort reductions
//!
//! ## Pipeline
//!
//! ```text
//! SessionTable::sorted_sessions()
//!        │
//!        ├──> cohorts() ──> CriterionTable (avg/init distance & time)
//!        │
//!        └──> SessionColumn::value() per session
//!               (WheelMetric, WheelPreference, PelletMetric, PelletPreference)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use presocial_dash::derive::{cohorts, Counter, CriterionTable, SessionColumn, WheelMetric};
//! use presocial_dash::session::{PatchSplit, SessionRecord};
//!
//! let enter = Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap();
//! let session = SessionRecord::builder("BAA-1103045", enter, 0.01, 0.0025)
//!     .wheel(PatchSplit::new(100.0, 50.0, 300.0, 150.0))
//!     .build();
//!
//! assert_eq!(WheelMetric::new(Counter::Total).value(&session), Some(600.0));
//!
//! let sorted = vec![&session];
//! let table = CriterionTable::from_cohorts(&cohorts(&sorted))?;
//! assert!(table.rows()[0].metrics.avg_distance.is_none());
//! # Ok::<(), presocial_dash::Error>(())
//! ```

mod columns;
mod criterion;

pub use columns::{
    share, Counter, CounterColumn, CounterSource, PelletMetric, PelletPreference, Pellets,
    SessionColumn, SplitTotals, Wheel, WheelMetric, WheelPreference,
};
pub use criterion::{cohorts, Cohort, CriterionMetrics, CriterionRow, CriterionTable};

pub(crate) use criterion::malformed;
