//! Ishikawa (fishbone) analysis - six fixed causal categories.
//!
//! The six categories are the classic 6M set and are part of the data shape:
//! they are never added or removed, only their `causes` lists grow and
//! shrink. Cause order is insertion order and is display-relevant.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The six canonical categories as `(id, name)` pairs.
///
/// Ids are stable string keys; names are the English 6M labels.
pub const CANONICAL_CATEGORIES: [(&str, &str); 6] = [
    ("1", "Method"),
    ("2", "Machine"),
    ("3", "Material"),
    ("4", "Manpower"),
    ("5", "Environment"),
    ("6", "Measurement"),
];

/// One causal category and its ordered causes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IshikawaCategory {
    /// Stable category identifier.
    pub id: String,
    /// Display name of the category.
    pub name: String,
    /// Ordered free-text causes. Empty strings are placeholders pending
    /// user input.
    #[serde(default)]
    pub causes: Vec<String>,
}

/// Ishikawa analysis payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IshikawaData {
    /// The problem statement being analyzed.
    #[serde(default)]
    pub problem: String,
    /// The six fixed categories, in canonical order.
    pub categories: Vec<IshikawaCategory>,
    /// The synthesized root cause.
    #[serde(default)]
    pub root_cause: String,
}

impl Default for IshikawaData {
    fn default() -> Self {
        Self {
            problem: String::new(),
            categories: CANONICAL_CATEGORIES
                .iter()
                .map(|(id, name)| IshikawaCategory {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                    causes: Vec::new(),
                })
                .collect(),
            root_cause: String::new(),
        }
    }
}

/// Ishikawa engine over [`IshikawaData`].
///
/// Every mutation leaves the full snapshot observable through the returned
/// reference; nothing is reported incrementally.
#[derive(Debug, Clone, Default)]
pub struct IshikawaEngine {
    data: IshikawaData,
}

impl IshikawaEngine {
    /// Create an engine with the six categories initialized empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine seeded with existing data.
    pub fn from_data(data: IshikawaData) -> Self {
        Self { data }
    }

    /// The current record.
    pub fn data(&self) -> &IshikawaData {
        &self.data
    }

    /// Replace the problem statement.
    pub fn set_problem(&mut self, text: impl Into<String>) -> &IshikawaData {
        self.data.problem = text.into();
        &self.data
    }

    /// Replace the synthesized root cause.
    pub fn set_root_cause(&mut self, text: impl Into<String>) -> &IshikawaData {
        self.data.root_cause = text.into();
        &self.data
    }

    /// Append one empty cause slot to the named category.
    pub fn add_cause(&mut self, category_id: &str) -> EngineResult<&IshikawaData> {
        let category = self.category_mut(category_id)?;
        category.causes.push(String::new());
        Ok(&self.data)
    }

    /// Replace the cause at `index` in the named category.
    ///
    /// An out-of-range index is an error, not a silent extend.
    pub fn update_cause(
        &mut self,
        category_id: &str,
        index: usize,
        text: impl Into<String>,
    ) -> EngineResult<&IshikawaData> {
        let category = self.category_mut(category_id)?;
        let len = category.causes.len();
        match category.causes.get_mut(index) {
            Some(cause) => *cause = text.into(),
            None => {
                return Err(EngineError::CauseIndexOutOfBounds {
                    category_id: category_id.to_string(),
                    index,
                    len,
                })
            }
        }
        Ok(&self.data)
    }

    /// Remove the cause at `index`, shifting later causes down by one.
    pub fn remove_cause(&mut self, category_id: &str, index: usize) -> EngineResult<&IshikawaData> {
        let category = self.category_mut(category_id)?;
        if index >= category.causes.len() {
            return Err(EngineError::CauseIndexOutOfBounds {
                category_id: category_id.to_string(),
                index,
                len: category.causes.len(),
            });
        }
        category.causes.remove(index);
        Ok(&self.data)
    }

    /// Reset problem, root cause, and every category's causes, preserving
    /// the six category identities.
    pub fn clear(&mut self) {
        self.data = IshikawaData::default();
    }

    fn category_mut(&mut self, category_id: &str) -> EngineResult<&mut IshikawaCategory> {
        self.data
            .categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| EngineError::CategoryNotFound {
                category_id: category_id.to_string(),
            })
    }
}
