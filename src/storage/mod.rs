//! Session table storage (Arrow/Parquet)
//!
//! The session table is produced once by the upstream analysis pipeline and
//! is read-only here: load it, decode it into [`SessionRecord`]s, never
//! write back. [`SessionTable::write_parquet`] exists for fixtures and for
//! re-exporting a table in the canonical schema.

mod decode;
mod encode;
pub mod schema;

use std::fs::File;
use std::path::Path;

use arrow::record_batch::RecordBatch;
use tracing::{debug, info};

use crate::session::SessionRecord;
use crate::{Error, Result};

pub use encode::encode_sessions;

/// In-memory session table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTable {
    sessions: Vec<SessionRecord>,
}

impl SessionTable {
    /// Create a table from already-decoded sessions
    ///
    /// Useful for testing and benchmarking
    #[must_use]
    pub fn new(sessions: Vec<SessionRecord>) -> Self {
        Self { sessions }
    }

    /// Load table from Parquet file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or if a column is
    /// missing, mistyped or null where a value is required
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::StorageError(format!(
                "Failed to open Parquet file {}: {e}",
                path.display()
            ))
        })?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| {
            Error::StorageError(format!("Failed to parse Parquet file: {e}"))
        })?;

        let reader = builder.build().map_err(|e| {
            Error::StorageError(format!("Failed to create Parquet reader: {e}"))
        })?;

        // Read all batches into memory
        let mut batches = Vec::new();
        for batch in reader {
            let batch = batch.map_err(|e| {
                Error::StorageError(format!("Failed to read record batch: {e}"))
            })?;
            batches.push(batch);
        }

        let table = Self::from_batches(&batches)?;
        info!(
            path = %path.display(),
            batches = batches.len(),
            sessions = table.len(),
            "Loaded session table"
        );
        Ok(table)
    }

    /// Decode in-memory record batches
    ///
    /// # Errors
    /// Returns error if a batch lacks a column or a column has the wrong type
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        let mut sessions = Vec::with_capacity(batches.iter().map(RecordBatch::num_rows).sum());
        for batch in batches {
            let decoded = decode::decode_batch(batch, sessions.len())?;
            debug!(rows = decoded.len(), "Decoded record batch");
            sessions.extend(decoded);
        }
        Ok(Self { sessions })
    }

    /// Encode the table as a single record batch in the canonical schema
    ///
    /// # Errors
    /// Returns error if Arrow rejects the assembled columns
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        encode_sessions(&self.sessions)
    }

    /// Write the table to a Parquet file in the canonical schema
    ///
    /// # Errors
    /// Returns error if the file cannot be created or written
    pub fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use parquet::arrow::ArrowWriter;

        let batch = self.to_record_batch()?;
        let file = File::create(path.as_ref())?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }

    /// Sessions in load order
    #[must_use]
    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    /// Sessions ordered by subject, then entry time (stable)
    #[must_use]
    pub fn sorted_sessions(&self) -> Vec<&SessionRecord> {
        let mut sorted: Vec<&SessionRecord> = self.sessions.iter().collect();
        sorted.sort_by(|a, b| a.subject.cmp(&b.subject).then(a.enter.cmp(&b.enter)));
        sorted
    }

    /// Unique subject ids, sorted
    #[must_use]
    pub fn subjects(&self) -> Vec<&str> {
        let mut subjects: Vec<&str> = self.sessions.iter().map(|s| s.subject.as_str()).collect();
        subjects.sort_unstable();
        subjects.dedup();
        subjects
    }

    /// Number of sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the table has no sessions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array, Int32Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn session(subject: &str, hour: u32) -> SessionRecord {
        SessionRecord::builder(
            subject,
            Utc.with_ymd_and_hms(2023, 6, 1, hour, 0, 0).unwrap(),
            0.01,
            0.0025,
        )
        .weights(25.0, 25.5)
        .build()
    }

    #[test]
    fn test_sorted_sessions_by_subject_then_enter() {
        let table = SessionTable::new(vec![
            session("BAA-1103047", 10),
            session("BAA-1103045", 12),
            session("BAA-1103045", 9),
        ]);

        let sorted = table.sorted_sessions();
        assert_eq!(sorted[0].subject, "BAA-1103045");
        assert!(sorted[0].enter < sorted[1].enter);
        assert_eq!(sorted[2].subject, "BAA-1103047");

        // Load order untouched
        assert_eq!(table.sessions()[0].subject, "BAA-1103047");
    }

    #[test]
    fn test_subjects_unique_sorted() {
        let table = SessionTable::new(vec![
            session("BAA-1103050", 10),
            session("BAA-1103045", 12),
            session("BAA-1103050", 9),
        ]);
        assert_eq!(table.subjects(), vec!["BAA-1103045", "BAA-1103050"]);
    }

    #[test]
    fn test_batch_round_trip() {
        let table = SessionTable::new(vec![session("BAA-1103045", 9), session("BAA-1103048", 11)]);
        let batch = table.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);

        let decoded = SessionTable::from_batches(&[batch]).unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let schema = Schema::new(vec![Field::new("weight_enter", DataType::Float64, true)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(Float64Array::from(vec![Some(25.0)])) as ArrayRef],
        )
        .unwrap();

        let result = SessionTable::from_batches(&[batch]);
        assert!(matches!(result, Err(Error::MissingColumn(ref c)) if c == "id"));
    }

    #[test]
    fn test_wrong_column_type_is_fatal() {
        let table = SessionTable::new(vec![session("BAA-1103045", 9)]);
        let batch = table.to_record_batch().unwrap();

        // Replace the id column with integers
        let mut columns = batch.columns().to_vec();
        columns[0] = Arc::new(Int32Array::from(vec![7]));
        let mut fields: Vec<Field> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.as_ref().clone())
            .collect();
        fields[0] = Field::new("id", DataType::Int32, false);
        let bad = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap();

        let err = SessionTable::from_batches(&[bad]).unwrap_err();
        assert!(err.to_string().contains("Column id has type Int32"));
    }

    #[test]
    fn test_load_parquet_missing_file() {
        let result = SessionTable::load_parquet("/nonexistent/presocial_data.parquet");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to open Parquet file"));
    }
}
