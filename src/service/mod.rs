//! Service layer tying per-subject selectors to the record store.
//!
//! Every operation mutates the subject's in-memory selector first and only
//! then hands the full snapshot to the store. A store failure therefore
//! surfaces to the caller while the local edit stays applied; the caller
//! decides whether to retry persistence or warn that the edit is unsaved.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::analysis::{
    AnalysisChange, AnalysisData, AnalysisSelector, AnalysisType, FiveWhysData, FiveWhysField,
    FtaData, FtaNodeUpdate, IshikawaData,
};
use crate::error::AppResult;
use crate::storage::{AnalysisRecord, AnalysisStore};

/// Coordinates analysis selectors and persistence for many subjects.
///
/// One selector per subject, loaded lazily from the store on first touch.
/// Each subject's mutations are synchronous against local state; only the
/// persistence hand-off is async.
pub struct AnalysisService<S: AnalysisStore> {
    store: S,
    selectors: HashMap<String, AnalysisSelector>,
}

impl<S: AnalysisStore> AnalysisService<S> {
    /// Create a service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            selectors: HashMap::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The subject's active analysis type.
    pub async fn active_type(&mut self, subject_id: &str) -> AppResult<AnalysisType> {
        Ok(self.selector_mut(subject_id).await?.active_type())
    }

    /// Full payload snapshot of the subject's active analysis.
    pub async fn snapshot(&mut self, subject_id: &str) -> AppResult<Option<AnalysisData>> {
        Ok(self.selector_mut(subject_id).await?.snapshot())
    }

    /// Read the subject's persisted record.
    pub async fn analysis(&self, subject_id: &str) -> AppResult<Option<AnalysisRecord>> {
        Ok(self.store.get(subject_id).await?)
    }

    /// Switch the subject to a new analysis type.
    ///
    /// The switch discards all in-memory data for the subject. The fresh
    /// empty payload is persisted immediately so "started but uninformative"
    /// is durably distinct from "not started"; switching to
    /// [`AnalysisType::None`] deletes the record instead.
    pub async fn select(
        &mut self,
        subject_id: &str,
        new_type: AnalysisType,
    ) -> AppResult<AnalysisChange> {
        let selector = self.selector_mut(subject_id).await?;
        let change = selector.select_type(new_type);
        let snapshot = selector.snapshot();

        match &snapshot {
            Some(data) => self.store.put(subject_id, data).await?,
            None => self.store.delete(subject_id).await?,
        }
        info!(subject_id, analysis_type = %new_type, "Analysis type selected");
        Ok(change)
    }

    /// Delete the subject's analysis and drop its in-memory state.
    pub async fn clear(&mut self, subject_id: &str) -> AppResult<()> {
        self.selectors.remove(subject_id);
        self.store.delete(subject_id).await?;
        info!(subject_id, "Analysis cleared");
        Ok(())
    }

    // ========================================================================
    // Five Whys operations
    // ========================================================================

    /// Replace one Five Whys field.
    pub async fn update_five_whys(
        &mut self,
        subject_id: &str,
        field: FiveWhysField,
        value: impl Into<String>,
    ) -> AppResult<FiveWhysData> {
        let selector = self.selector_mut(subject_id).await?;
        let data = selector.five_whys_mut()?.update(field, value).clone();
        self.persist(subject_id, AnalysisData::FiveWhys(data.clone()))
            .await?;
        Ok(data)
    }

    // ========================================================================
    // Ishikawa operations
    // ========================================================================

    /// Replace the Ishikawa problem statement.
    pub async fn set_ishikawa_problem(
        &mut self,
        subject_id: &str,
        text: impl Into<String>,
    ) -> AppResult<IshikawaData> {
        let selector = self.selector_mut(subject_id).await?;
        let data = selector.ishikawa_mut()?.set_problem(text).clone();
        self.persist(subject_id, AnalysisData::Ishikawa(data.clone()))
            .await?;
        Ok(data)
    }

    /// Replace the Ishikawa root cause.
    pub async fn set_ishikawa_root_cause(
        &mut self,
        subject_id: &str,
        text: impl Into<String>,
    ) -> AppResult<IshikawaData> {
        let selector = self.selector_mut(subject_id).await?;
        let data = selector.ishikawa_mut()?.set_root_cause(text).clone();
        self.persist(subject_id, AnalysisData::Ishikawa(data.clone()))
            .await?;
        Ok(data)
    }

    /// Append an empty cause slot to a category.
    pub async fn add_ishikawa_cause(
        &mut self,
        subject_id: &str,
        category_id: &str,
    ) -> AppResult<IshikawaData> {
        let selector = self.selector_mut(subject_id).await?;
        let data = selector.ishikawa_mut()?.add_cause(category_id)?.clone();
        self.persist(subject_id, AnalysisData::Ishikawa(data.clone()))
            .await?;
        Ok(data)
    }

    /// Replace the cause at `index` in a category.
    pub async fn update_ishikawa_cause(
        &mut self,
        subject_id: &str,
        category_id: &str,
        index: usize,
        text: impl Into<String>,
    ) -> AppResult<IshikawaData> {
        let selector = self.selector_mut(subject_id).await?;
        let data = selector
            .ishikawa_mut()?
            .update_cause(category_id, index, text)?
            .clone();
        self.persist(subject_id, AnalysisData::Ishikawa(data.clone()))
            .await?;
        Ok(data)
    }

    /// Remove the cause at `index` in a category.
    pub async fn remove_ishikawa_cause(
        &mut self,
        subject_id: &str,
        category_id: &str,
        index: usize,
    ) -> AppResult<IshikawaData> {
        let selector = self.selector_mut(subject_id).await?;
        let data = selector
            .ishikawa_mut()?
            .remove_cause(category_id, index)?
            .clone();
        self.persist(subject_id, AnalysisData::Ishikawa(data.clone()))
            .await?;
        Ok(data)
    }

    // ========================================================================
    // Fault tree operations
    // ========================================================================

    /// Replace the fault tree top event text.
    pub async fn set_fta_top_event(
        &mut self,
        subject_id: &str,
        text: impl Into<String>,
    ) -> AppResult<FtaData> {
        let selector = self.selector_mut(subject_id).await?;
        let data = selector.fault_tree_mut()?.set_top_event(text).clone();
        self.persist(subject_id, AnalysisData::Fta(data.clone()))
            .await?;
        Ok(data)
    }

    /// Replace the fault tree top event description.
    pub async fn set_fta_top_event_description(
        &mut self,
        subject_id: &str,
        text: impl Into<String>,
    ) -> AppResult<FtaData> {
        let selector = self.selector_mut(subject_id).await?;
        let data = selector
            .fault_tree_mut()?
            .set_top_event_description(text)
            .clone();
        self.persist(subject_id, AnalysisData::Fta(data.clone()))
            .await?;
        Ok(data)
    }

    /// Replace the fault tree root cause.
    pub async fn set_fta_root_cause(
        &mut self,
        subject_id: &str,
        text: impl Into<String>,
    ) -> AppResult<FtaData> {
        let selector = self.selector_mut(subject_id).await?;
        let data = selector.fault_tree_mut()?.set_root_cause(text).clone();
        self.persist(subject_id, AnalysisData::Fta(data.clone()))
            .await?;
        Ok(data)
    }

    /// Add a fresh fault tree node, returning its id with the new snapshot.
    pub async fn add_fta_node(
        &mut self,
        subject_id: &str,
        parent_id: Option<&str>,
    ) -> AppResult<(String, FtaData)> {
        let selector = self.selector_mut(subject_id).await?;
        let engine = selector.fault_tree_mut()?;
        let node_id = engine.add_node(parent_id)?;
        let data = engine.data().clone();
        self.persist(subject_id, AnalysisData::Fta(data.clone()))
            .await?;
        Ok((node_id, data))
    }

    /// Merge fields into an existing fault tree node.
    pub async fn update_fta_node(
        &mut self,
        subject_id: &str,
        node_id: &str,
        update: FtaNodeUpdate,
    ) -> AppResult<FtaData> {
        let selector = self.selector_mut(subject_id).await?;
        let data = selector
            .fault_tree_mut()?
            .update_node(node_id, update)?
            .clone();
        self.persist(subject_id, AnalysisData::Fta(data.clone()))
            .await?;
        Ok(data)
    }

    /// Remove a fault tree node and its subtree.
    pub async fn remove_fta_node(
        &mut self,
        subject_id: &str,
        node_id: &str,
    ) -> AppResult<FtaData> {
        let selector = self.selector_mut(subject_id).await?;
        let data = selector.fault_tree_mut()?.remove_node(node_id).clone();
        self.persist(subject_id, AnalysisData::Fta(data.clone()))
            .await?;
        Ok(data)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn persist(&self, subject_id: &str, data: AnalysisData) -> AppResult<()> {
        debug!(subject_id, analysis_type = %data.kind(), "Persisting analysis snapshot");
        self.store.put(subject_id, &data).await?;
        Ok(())
    }

    async fn selector_mut(&mut self, subject_id: &str) -> AppResult<&mut AnalysisSelector> {
        if !self.selectors.contains_key(subject_id) {
            let mut selector = AnalysisSelector::new();
            if let Some(record) = self.store.get(subject_id).await? {
                debug!(subject_id, analysis_type = %record.analysis_type(), "Loaded analysis from store");
                selector.load(record.data);
            }
            self.selectors.insert(subject_id.to_string(), selector);
        }
        Ok(self
            .selectors
            .entry(subject_id.to_string())
            .or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    async fn create_test_service() -> AnalysisService<SqliteStore> {
        let store = SqliteStore::new_in_memory()
            .await
            .expect("Failed to create in-memory store");
        AnalysisService::new(store)
    }

    #[tokio::test]
    async fn test_select_persists_fresh_empty_payload() {
        let mut service = create_test_service().await;

        let change = service
            .select("action-1", AnalysisType::Ishikawa)
            .await
            .unwrap();
        assert_eq!(change.analysis_type, AnalysisType::Ishikawa);
        assert!(change.data.is_none());

        let record = service.analysis("action-1").await.unwrap().unwrap();
        assert_eq!(record.analysis_type(), AnalysisType::Ishikawa);
    }

    #[tokio::test]
    async fn test_select_none_deletes_record() {
        let mut service = create_test_service().await;
        service
            .select("action-1", AnalysisType::FiveWhys)
            .await
            .unwrap();
        service.select("action-1", AnalysisType::None).await.unwrap();
        assert!(service.analysis("action-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mutation_against_inactive_engine_fails() {
        let mut service = create_test_service().await;
        service
            .select("action-1", AnalysisType::FiveWhys)
            .await
            .unwrap();

        let result = service.add_ishikawa_cause("action-1", "1").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_subjects_are_independent() {
        let mut service = create_test_service().await;
        service
            .select("action-1", AnalysisType::FiveWhys)
            .await
            .unwrap();
        service.select("action-2", AnalysisType::Fta).await.unwrap();

        assert_eq!(
            service.active_type("action-1").await.unwrap(),
            AnalysisType::FiveWhys
        );
        assert_eq!(
            service.active_type("action-2").await.unwrap(),
            AnalysisType::Fta
        );
    }
}
