use thiserror::Error;

use crate::analysis::AnalysisType;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading or validation failed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what was wrong with the configuration.
        message: String,
    },

    /// An error surfaced from the persistence layer.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// An error surfaced from an analysis engine.
    #[error("Analysis error: {0}")]
    Engine(#[from] EngineError),

    /// Catch-all for unexpected internal failures.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal failure.
        message: String,
    },
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Opening the database or creating its directory failed.
    #[error("Database connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// A query returned an unusable result.
    #[error("Query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },

    /// The stored payload could not be decoded into its analysis shape.
    #[error("Corrupt analysis payload for subject {subject_id}: {message}")]
    CorruptPayload {
        /// Subject whose record failed to decode.
        subject_id: String,
        /// Decoding error detail.
        message: String,
    },

    /// Schema migrations could not be applied.
    #[error("Migration failed: {message}")]
    Migration {
        /// Description of the migration failure.
        message: String,
    },

    /// SQLx error passthrough.
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Structural errors raised by the analysis engines.
///
/// These signal invalid references explicitly so programmatic callers can
/// detect misuse; a UI caller free to treat a stale reference as harmless
/// can ignore the `Err` and re-render from the unchanged snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The named Ishikawa category does not exist.
    #[error("Unknown category: {category_id}")]
    CategoryNotFound {
        /// The id that matched none of the six fixed categories.
        category_id: String,
    },

    /// A cause index fell outside the category's current list.
    #[error("Cause index {index} out of bounds for category {category_id} (len {len})")]
    CauseIndexOutOfBounds {
        /// Category whose cause list was indexed.
        category_id: String,
        /// The out-of-range index.
        index: usize,
        /// Current number of causes in the category.
        len: usize,
    },

    /// The referenced fault tree node does not exist.
    #[error("Unknown fault tree node: {node_id}")]
    NodeNotFound {
        /// The id that matched no node in the tree.
        node_id: String,
    },

    /// An operation targeted an engine that is not the active analysis type.
    #[error("Analysis type mismatch: expected {expected}, active is {active}")]
    AnalysisTypeMismatch {
        /// The type the operation belongs to.
        expected: AnalysisType,
        /// The type currently selected.
        active: AnalysisType,
    },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config {
            message: "missing key".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: missing key");

        let err = AppError::Internal {
            message: "unexpected".to_string(),
        };
        assert_eq!(err.to_string(), "Internal error: unexpected");
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Connection {
            message: "failed to connect".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Database connection failed: failed to connect"
        );

        let err = StorageError::CorruptPayload {
            subject_id: "action-1".to_string(),
            message: "unexpected end of input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Corrupt analysis payload for subject action-1: unexpected end of input"
        );

        let err = StorageError::Migration {
            message: "version mismatch".to_string(),
        };
        assert_eq!(err.to_string(), "Migration failed: version mismatch");
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::CategoryNotFound {
            category_id: "9".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown category: 9");

        let err = EngineError::CauseIndexOutOfBounds {
            category_id: "1".to_string(),
            index: 3,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "Cause index 3 out of bounds for category 1 (len 2)"
        );

        let err = EngineError::NodeNotFound {
            node_id: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown fault tree node: missing");

        let err = EngineError::AnalysisTypeMismatch {
            expected: AnalysisType::Ishikawa,
            active: AnalysisType::Fta,
        };
        assert_eq!(
            err.to_string(),
            "Analysis type mismatch: expected ishikawa, active is fta"
        );
    }

    #[test]
    fn test_engine_error_conversion_to_app_error() {
        let engine_err = EngineError::NodeNotFound {
            node_id: "n-1".to_string(),
        };
        let app_err: AppError = engine_err.into();
        assert!(matches!(app_err, AppError::Engine(_)));
        assert!(app_err.to_string().contains("Unknown fault tree node"));
    }

    #[test]
    fn test_storage_error_conversion_to_app_error() {
        let storage_err = StorageError::Query {
            message: "syntax error".to_string(),
        };
        let app_err: AppError = storage_err.into();
        assert!(matches!(app_err, AppError::Storage(_)));
    }
}
