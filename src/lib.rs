//! # RCA Core
//!
//! Root-cause analysis core for compliance and corrective-action management.
//! Each subject (typically a corrective action item) carries at most one
//! analysis at a time, in one of three interchangeable shapes:
//!
//! - **Five Whys**: a problem statement, five "why" answers, and a
//!   synthesized root cause
//! - **Ishikawa**: six fixed causal categories (the classic 6M fishbone),
//!   each holding an ordered list of free-text causes
//! - **Fault Tree Analysis (FTA)**: a variable-depth tree of events and
//!   AND/OR logic gates rooted at a single top event
//!
//! ## Architecture
//!
//! ```text
//! Caller → AnalysisService → AnalysisSelector → {FiveWhys, Ishikawa, FaultTree} engine
//!                ↓
//!          AnalysisStore (SQLite)
//! ```
//!
//! Engines are pure in-memory structures; every accepted mutation produces a
//! full `(type, data)` snapshot that the service persists as a unit through
//! the [`storage::AnalysisStore`] trait.
//!
//! ## Example
//!
//! ```ignore
//! use rca_core::analysis::{AnalysisType, FiveWhysField};
//! use rca_core::service::AnalysisService;
//! use rca_core::storage::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::new_in_memory().await?;
//!     let mut service = AnalysisService::new(store);
//!
//!     service.select("action-42", AnalysisType::FiveWhys).await?;
//!     let data = service
//!         .update_five_whys("action-42", FiveWhysField::Problem, "Late delivery")
//!         .await?;
//!     println!("{}", data.problem);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Analysis engines (Five Whys, Ishikawa, fault tree) and the type selector.
pub mod analysis;
/// Configuration management loaded from the environment.
pub mod config;
/// Error types and result aliases for the crate.
pub mod error;
/// Service layer tying selectors to the record store.
pub mod service;
/// Persistence layer for analysis records.
pub mod storage;

pub use analysis::{AnalysisData, AnalysisSelector, AnalysisType};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use service::AnalysisService;
pub use storage::{AnalysisRecord, AnalysisStore, SqliteStore};
