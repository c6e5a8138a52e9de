//! # Presocial Dashboard
//!
//! Interactive dashboard over one table of presocial foraging sessions:
//! weight, duration, hard-patch, wheel, pellet and probabilistic-threshold
//! charts per session and per subject, plus per-cohort patch-preference
//! grids and distance/time-to-criterion summaries.
//!
//! ## Pipeline
//!
//! ```text
//! Parquet ──> storage::SessionTable ──> derive (cohorts, criterion, ratios)
//!                                           │
//!                                           v
//!             server (axum) <── dashboard::Dashboard <── charts ──> figure
//!                  │                       │
//!                  └── GET / ─────────> page (HTML + Plotly JSON)
//! ```
//!
//! Everything is computed once at start-up; the server only looks up
//! pre-built figures.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use presocial_dash::charts::{SubjectPalette, Theme};
//! use presocial_dash::dashboard::Dashboard;
//! use presocial_dash::storage::SessionTable;
//!
//! let table = SessionTable::load_parquet("data/presocial_data.parquet")?;
//! let dashboard = Dashboard::build(&table, &SubjectPalette::default(), Theme::default())?;
//!
//! for label in dashboard.cohort_labels() {
//!     let figure = dashboard.patch_pref_time_figure(label)?;
//!     println!("{label}: {} traces", figure.data.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod figure;
pub mod page;
pub mod server;
pub mod session;
pub mod storage;

pub use error::{Error, Result};
