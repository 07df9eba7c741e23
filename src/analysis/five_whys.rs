//! Five Whys analysis - a fixed-depth linear causal chain.
//!
//! Despite the "ask why repeatedly" framing, the data model is a flat record
//! with five fixed slots, a problem statement, and a synthesized root cause.
//! Gaps are allowed: enforcing "why N+1 only after why N" is a presentation
//! concern, and downstream report consumers must tolerate partially completed
//! chains.

use serde::{Deserialize, Serialize};

/// Five Whys analysis payload. Empty string means "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiveWhysData {
    /// The problem statement being analyzed.
    #[serde(default)]
    pub problem: String,
    /// First why.
    #[serde(default)]
    pub why1: String,
    /// Second why.
    #[serde(default)]
    pub why2: String,
    /// Third why.
    #[serde(default)]
    pub why3: String,
    /// Fourth why.
    #[serde(default)]
    pub why4: String,
    /// Fifth why.
    #[serde(default)]
    pub why5: String,
    /// The synthesized root cause.
    #[serde(default)]
    pub root_cause: String,
}

/// Addressable fields of a Five Whys record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiveWhysField {
    /// The problem statement.
    Problem,
    /// First why.
    Why1,
    /// Second why.
    Why2,
    /// Third why.
    Why3,
    /// Fourth why.
    Why4,
    /// Fifth why.
    Why5,
    /// The synthesized root cause.
    RootCause,
}

impl FiveWhysField {
    /// Get the field name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FiveWhysField::Problem => "problem",
            FiveWhysField::Why1 => "why1",
            FiveWhysField::Why2 => "why2",
            FiveWhysField::Why3 => "why3",
            FiveWhysField::Why4 => "why4",
            FiveWhysField::Why5 => "why5",
            FiveWhysField::RootCause => "root_cause",
        }
    }
}

impl std::fmt::Display for FiveWhysField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FiveWhysField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "problem" => Ok(FiveWhysField::Problem),
            "why1" => Ok(FiveWhysField::Why1),
            "why2" => Ok(FiveWhysField::Why2),
            "why3" => Ok(FiveWhysField::Why3),
            "why4" => Ok(FiveWhysField::Why4),
            "why5" => Ok(FiveWhysField::Why5),
            "root_cause" => Ok(FiveWhysField::RootCause),
            _ => Err(format!("Unknown Five Whys field: {}", s)),
        }
    }
}

/// Five Whys engine - a pure value-replacement store over [`FiveWhysData`].
///
/// Accepts any string for any field, including empty; there are no error
/// conditions.
#[derive(Debug, Clone, Default)]
pub struct FiveWhysEngine {
    data: FiveWhysData,
}

impl FiveWhysEngine {
    /// Create an engine with all fields empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine seeded with existing data.
    pub fn from_data(data: FiveWhysData) -> Self {
        Self { data }
    }

    /// The current record.
    pub fn data(&self) -> &FiveWhysData {
        &self.data
    }

    /// Replace one field and return the full updated record.
    pub fn update(&mut self, field: FiveWhysField, value: impl Into<String>) -> &FiveWhysData {
        let value = value.into();
        match field {
            FiveWhysField::Problem => self.data.problem = value,
            FiveWhysField::Why1 => self.data.why1 = value,
            FiveWhysField::Why2 => self.data.why2 = value,
            FiveWhysField::Why3 => self.data.why3 = value,
            FiveWhysField::Why4 => self.data.why4 = value,
            FiveWhysField::Why5 => self.data.why5 = value,
            FiveWhysField::RootCause => self.data.root_cause = value,
        }
        &self.data
    }

    /// Reset all fields to empty.
    pub fn clear(&mut self) {
        self.data = FiveWhysData::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_engine_is_empty() {
        let engine = FiveWhysEngine::new();
        assert_eq!(engine.data(), &FiveWhysData::default());
        assert!(engine.data().problem.is_empty());
    }

    #[test]
    fn test_update_replaces_single_field() {
        let mut engine = FiveWhysEngine::new();
        let data = engine.update(FiveWhysField::Problem, "Machine stopped");
        assert_eq!(data.problem, "Machine stopped");
        assert!(data.why1.is_empty());
    }

    #[test]
    fn test_update_each_field() {
        let mut engine = FiveWhysEngine::new();
        engine.update(FiveWhysField::Problem, "p");
        engine.update(FiveWhysField::Why1, "w1");
        engine.update(FiveWhysField::Why2, "w2");
        engine.update(FiveWhysField::Why3, "w3");
        engine.update(FiveWhysField::Why4, "w4");
        engine.update(FiveWhysField::Why5, "w5");
        let data = engine.update(FiveWhysField::RootCause, "rc");

        assert_eq!(data.problem, "p");
        assert_eq!(data.why1, "w1");
        assert_eq!(data.why2, "w2");
        assert_eq!(data.why3, "w3");
        assert_eq!(data.why4, "w4");
        assert_eq!(data.why5, "w5");
        assert_eq!(data.root_cause, "rc");
    }

    #[test]
    fn test_update_allows_gaps() {
        // why3 can be filled while why1/why2 stay empty; ordering is a
        // presentation concern, not a data invariant.
        let mut engine = FiveWhysEngine::new();
        let data = engine.update(FiveWhysField::Why3, "skipped ahead");
        assert!(data.why1.is_empty());
        assert!(data.why2.is_empty());
        assert_eq!(data.why3, "skipped ahead");
    }

    #[test]
    fn test_update_accepts_empty_string() {
        let mut engine = FiveWhysEngine::new();
        engine.update(FiveWhysField::Why1, "something");
        let data = engine.update(FiveWhysField::Why1, "");
        assert!(data.why1.is_empty());
    }

    #[test]
    fn test_clear_resets_all_fields() {
        let mut engine = FiveWhysEngine::new();
        engine.update(FiveWhysField::Problem, "p");
        engine.update(FiveWhysField::Why5, "w5");
        engine.clear();
        assert_eq!(engine.data(), &FiveWhysData::default());
    }

    #[test]
    fn test_from_data_preserves_fields() {
        let data = FiveWhysData {
            problem: "p".to_string(),
            root_cause: "rc".to_string(),
            ..Default::default()
        };
        let engine = FiveWhysEngine::from_data(data.clone());
        assert_eq!(engine.data(), &data);
    }

    #[test]
    fn test_field_as_str() {
        assert_eq!(FiveWhysField::Problem.as_str(), "problem");
        assert_eq!(FiveWhysField::Why1.as_str(), "why1");
        assert_eq!(FiveWhysField::Why5.as_str(), "why5");
        assert_eq!(FiveWhysField::RootCause.as_str(), "root_cause");
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!(
            "problem".parse::<FiveWhysField>().unwrap(),
            FiveWhysField::Problem
        );
        assert_eq!("why4".parse::<FiveWhysField>().unwrap(), FiveWhysField::Why4);
        assert_eq!(
            "ROOT_CAUSE".parse::<FiveWhysField>().unwrap(),
            FiveWhysField::RootCause
        );
        assert!("why6".parse::<FiveWhysField>().is_err());
    }

    #[test]
    fn test_data_serde_defaults_missing_fields() {
        // Older records may omit fields; they deserialize as empty strings.
        let data: FiveWhysData = serde_json::from_str(r#"{"problem": "p"}"#).unwrap();
        assert_eq!(data.problem, "p");
        assert!(data.why1.is_empty());
        assert!(data.root_cause.is_empty());
    }
}
