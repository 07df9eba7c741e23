//! Analysis engine implementations.
//!
//! This module provides the three root-cause analysis shapes:
//! - [`FiveWhysEngine`]: fixed-depth linear causal chain
//! - [`IshikawaEngine`]: six fixed causal categories (fishbone diagram)
//! - [`FaultTreeEngine`]: variable-depth tree of events and AND/OR gates
//!
//! The engines share no common operation set; [`AnalysisSelector`] dispatches
//! over them through the [`AnalysisData`] tagged union and guarantees that at
//! most one analysis type is active per subject at a time.

mod fault_tree;
mod five_whys;
mod ishikawa;
mod selector;

pub use fault_tree::*;
pub use five_whys::*;
pub use ishikawa::*;
pub use selector::*;

use serde::{Deserialize, Serialize};

/// Analysis types selectable for a subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// Fixed-depth linear causal chain.
    FiveWhys,
    /// Six fixed causal categories with free-text causes.
    Ishikawa,
    /// Fault tree of events and AND/OR logic gates.
    Fta,
    /// No analysis selected.
    #[default]
    None,
}

impl AnalysisType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::FiveWhys => "five_whys",
            AnalysisType::Ishikawa => "ishikawa",
            AnalysisType::Fta => "fta",
            AnalysisType::None => "none",
        }
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "five_whys" => Ok(AnalysisType::FiveWhys),
            "ishikawa" => Ok(AnalysisType::Ishikawa),
            "fta" => Ok(AnalysisType::Fta),
            "none" => Ok(AnalysisType::None),
            _ => Err(format!("Unknown analysis type: {}", s)),
        }
    }
}

/// The payload of one analysis, tagged by its type.
///
/// The three shapes are structurally unrelated, so they travel as a sum type
/// rather than behind a shared trait. Serialized form is adjacently tagged:
/// `{"type": "fta", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AnalysisData {
    /// Five Whys payload.
    FiveWhys(FiveWhysData),
    /// Ishikawa payload.
    Ishikawa(IshikawaData),
    /// Fault tree payload.
    Fta(FtaData),
}

impl AnalysisData {
    /// The analysis type this payload belongs to.
    pub fn kind(&self) -> AnalysisType {
        match self {
            AnalysisData::FiveWhys(_) => AnalysisType::FiveWhys,
            AnalysisData::Ishikawa(_) => AnalysisType::Ishikawa,
            AnalysisData::Fta(_) => AnalysisType::Fta,
        }
    }

    /// Serialize only the inner payload, without the type tag.
    pub fn payload_json(&self) -> serde_json::Result<String> {
        match self {
            AnalysisData::FiveWhys(data) => serde_json::to_string(data),
            AnalysisData::Ishikawa(data) => serde_json::to_string(data),
            AnalysisData::Fta(data) => serde_json::to_string(data),
        }
    }
}
