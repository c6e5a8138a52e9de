//! Error types for the presocial dashboard
//!
//! Every error here is fatal at start-up except `UnknownCohort` and
//! `UnknownFigure`, which the HTTP layer turns into 404 responses.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Dashboard error types
#[derive(Error, Debug)]
pub enum Error {
    /// Storage error (Parquet/Arrow)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A column the dashboard needs is absent from the session table
    #[error("Missing column: {0}\nRegenerate the session table with the full presocial schema.")]
    MissingColumn(String),

    /// A column exists but has an unusable Arrow type
    #[error("Column {column} has type {found}, expected {expected}")]
    ColumnType {
        /// Column name
        column: String,
        /// Expected type description
        expected: String,
        /// Actual Arrow data type
        found: String,
    },

    /// Null found in a column that must always be populated
    #[error("Null value in required column {column} (row {row})")]
    NullValue {
        /// Column name
        column: String,
        /// Row index within the table
        row: usize,
    },

    /// Session values are internally inconsistent (e.g. index past series end)
    #[error("Malformed session {subject} @ {enter}: {detail}")]
    MalformedSession {
        /// Subject identifier
        subject: String,
        /// Session entry time
        enter: String,
        /// What is wrong
        detail: String,
    },

    /// Subject has no colour in the palette (stale configuration)
    #[error("Unknown subject: {0}\nAdd it to the subject palette before rebuilding the dashboard.")]
    UnknownSubject(String),

    /// Callback received a cohort label with no pre-built figure
    #[error("Unknown cohort: {0}")]
    UnknownCohort(String),

    /// No static figure registered under this id
    #[error("Unknown figure: {0}")]
    UnknownFigure(String),

    /// Figure/JSON serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the dashboard page failed
    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),

    /// HTTP server failed to bind or serve
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl Error {
    /// Whether the error came from a bad lookup key rather than bad data
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownCohort(_) | Self::UnknownFigure(_))
    }
}
