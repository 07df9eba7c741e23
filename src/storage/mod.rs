//! Storage layer for analysis record persistence.
//!
//! One record per subject, written as a full `(type, payload)` unit on every
//! accepted mutation. Absence of a record ("not started") is distinguishable
//! from a record with all-empty fields ("started but uninformative").

mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{AnalysisData, AnalysisType};
use crate::error::StorageResult;

/// A persisted root-cause analysis, keyed by the subject it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRecord {
    /// The subject (e.g., corrective action item) this analysis is attached to.
    pub subject_id: String,
    /// The typed payload.
    #[serde(flatten)]
    pub data: AnalysisData,
    /// When the analysis was first persisted.
    pub created_at: DateTime<Utc>,
    /// When the analysis was last replaced.
    pub updated_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Create a record stamped with the current time.
    pub fn new(subject_id: impl Into<String>, data: AnalysisData) -> Self {
        let now = Utc::now();
        Self {
            subject_id: subject_id.into(),
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// The analysis type of the stored payload.
    pub fn analysis_type(&self) -> AnalysisType {
        self.data.kind()
    }
}

/// Storage trait for analysis records.
///
/// `put` is a full replace and idempotent; there is no partial or diff
/// persistence. Concurrent writers for the same subject resolve as
/// last-write-wins at this boundary.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Get the analysis record for a subject, if one exists.
    async fn get(&self, subject_id: &str) -> StorageResult<Option<AnalysisRecord>>;
    /// Replace (or create) the subject's analysis with the given payload.
    async fn put(&self, subject_id: &str, data: &AnalysisData) -> StorageResult<()>;
    /// Delete the subject's analysis. Deleting an absent record is a no-op.
    async fn delete(&self, subject_id: &str) -> StorageResult<()>;
}
