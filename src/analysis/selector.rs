//! Analysis type selection and dispatch.
//!
//! [`AnalysisSelector`] owns the "which analysis type is active" state for
//! one subject and routes mutations to the matching engine. Switching type
//! is unconditional and destructive: the in-memory data of all engines is
//! reset, modeling a free choice from a dropdown rather than a constrained
//! state machine.

use serde::Serialize;
use tracing::debug;

use super::{
    AnalysisData, AnalysisType, FaultTreeEngine, FiveWhysEngine, IshikawaEngine,
};
use crate::error::{EngineError, EngineResult};

/// A uniform change event emitted after a selector transition or an engine
/// mutation: the active type plus the full payload snapshot (`None` right
/// after a switch, when no data exists yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisChange {
    /// The analysis type the change belongs to.
    pub analysis_type: AnalysisType,
    /// Full payload snapshot, absent immediately after a type switch.
    pub data: Option<AnalysisData>,
}

/// Dispatcher over the three analysis engines.
///
/// Guarantees at most one analysis type is active at a time; accessing an
/// engine that is not active fails with
/// [`EngineError::AnalysisTypeMismatch`].
#[derive(Debug, Clone, Default)]
pub struct AnalysisSelector {
    active: AnalysisType,
    five_whys: FiveWhysEngine,
    ishikawa: IshikawaEngine,
    fault_tree: FaultTreeEngine,
}

impl AnalysisSelector {
    /// Create a selector with no active analysis.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active analysis type.
    pub fn active_type(&self) -> AnalysisType {
        self.active
    }

    /// Switch to a new analysis type, discarding the in-memory data of all
    /// engines. Any type is reachable from any other type directly; the
    /// emitted change carries no data ("analysis switched, no data yet").
    pub fn select_type(&mut self, new_type: AnalysisType) -> AnalysisChange {
        debug!(from = %self.active, to = %new_type, "Analysis type switched");
        self.five_whys.clear();
        self.ishikawa.clear();
        self.fault_tree.clear();
        self.active = new_type;
        AnalysisChange {
            analysis_type: new_type,
            data: None,
        }
    }

    /// Restore a selector from a persisted payload, making its type active.
    pub fn load(&mut self, data: AnalysisData) {
        self.select_type(data.kind());
        match data {
            AnalysisData::FiveWhys(d) => self.five_whys = FiveWhysEngine::from_data(d),
            AnalysisData::Ishikawa(d) => self.ishikawa = IshikawaEngine::from_data(d),
            AnalysisData::Fta(d) => self.fault_tree = FaultTreeEngine::from_data(d),
        }
    }

    /// Full payload snapshot of the active engine, or `None` when no
    /// analysis is selected.
    pub fn snapshot(&self) -> Option<AnalysisData> {
        match self.active {
            AnalysisType::FiveWhys => {
                Some(AnalysisData::FiveWhys(self.five_whys.data().clone()))
            }
            AnalysisType::Ishikawa => Some(AnalysisData::Ishikawa(self.ishikawa.data().clone())),
            AnalysisType::Fta => Some(AnalysisData::Fta(self.fault_tree.data().clone())),
            AnalysisType::None => None,
        }
    }

    /// Change event for the current state of the active engine.
    pub fn change(&self) -> AnalysisChange {
        AnalysisChange {
            analysis_type: self.active,
            data: self.snapshot(),
        }
    }

    /// The Five Whys engine, if active.
    pub fn five_whys_mut(&mut self) -> EngineResult<&mut FiveWhysEngine> {
        self.guard(AnalysisType::FiveWhys)?;
        Ok(&mut self.five_whys)
    }

    /// The Ishikawa engine, if active.
    pub fn ishikawa_mut(&mut self) -> EngineResult<&mut IshikawaEngine> {
        self.guard(AnalysisType::Ishikawa)?;
        Ok(&mut self.ishikawa)
    }

    /// The fault tree engine, if active.
    pub fn fault_tree_mut(&mut self) -> EngineResult<&mut FaultTreeEngine> {
        self.guard(AnalysisType::Fta)?;
        Ok(&mut self.fault_tree)
    }

    fn guard(&self, expected: AnalysisType) -> EngineResult<()> {
        if self.active == expected {
            Ok(())
        } else {
            Err(EngineError::AnalysisTypeMismatch {
                expected,
                active: self.active,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FiveWhysField;

    #[test]
    fn test_initial_state_is_none() {
        let selector = AnalysisSelector::new();
        assert_eq!(selector.active_type(), AnalysisType::None);
        assert!(selector.snapshot().is_none());
    }

    #[test]
    fn test_select_type_emits_change_without_data() {
        let mut selector = AnalysisSelector::new();
        let change = selector.select_type(AnalysisType::Ishikawa);
        assert_eq!(change.analysis_type, AnalysisType::Ishikawa);
        assert!(change.data.is_none());
        assert_eq!(selector.active_type(), AnalysisType::Ishikawa);
    }

    #[test]
    fn test_snapshot_matches_active_type() {
        let mut selector = AnalysisSelector::new();

        selector.select_type(AnalysisType::FiveWhys);
        assert!(matches!(
            selector.snapshot(),
            Some(AnalysisData::FiveWhys(_))
        ));

        selector.select_type(AnalysisType::Fta);
        assert!(matches!(selector.snapshot(), Some(AnalysisData::Fta(_))));
    }

    #[test]
    fn test_switching_is_destructive() {
        let mut selector = AnalysisSelector::new();
        selector.select_type(AnalysisType::Ishikawa);
        selector
            .ishikawa_mut()
            .unwrap()
            .set_problem("Leaking seal");
        selector.ishikawa_mut().unwrap().add_cause("1").unwrap();

        selector.select_type(AnalysisType::FiveWhys);
        selector.select_type(AnalysisType::Ishikawa);

        // Fresh empty data, not the previously entered values.
        match selector.snapshot() {
            Some(AnalysisData::Ishikawa(data)) => {
                assert!(data.problem.is_empty());
                assert!(data.categories.iter().all(|c| c.causes.is_empty()));
            }
            other => panic!("unexpected snapshot: {:?}", other),
        }
    }

    #[test]
    fn test_any_type_reachable_from_any_other() {
        let mut selector = AnalysisSelector::new();
        let types = [
            AnalysisType::FiveWhys,
            AnalysisType::Fta,
            AnalysisType::None,
            AnalysisType::Ishikawa,
            AnalysisType::FiveWhys,
        ];
        for t in types {
            let change = selector.select_type(t);
            assert_eq!(change.analysis_type, t);
            assert_eq!(selector.active_type(), t);
        }
    }

    #[test]
    fn test_engine_access_guarded_by_active_type() {
        let mut selector = AnalysisSelector::new();
        selector.select_type(AnalysisType::FiveWhys);

        assert!(selector.five_whys_mut().is_ok());
        let err = selector.fault_tree_mut().unwrap_err();
        assert_eq!(
            err,
            EngineError::AnalysisTypeMismatch {
                expected: AnalysisType::Fta,
                active: AnalysisType::FiveWhys,
            }
        );
    }

    #[test]
    fn test_change_carries_full_snapshot_after_mutation() {
        let mut selector = AnalysisSelector::new();
        selector.select_type(AnalysisType::FiveWhys);
        selector
            .five_whys_mut()
            .unwrap()
            .update(FiveWhysField::Problem, "Order shipped late");

        let change = selector.change();
        assert_eq!(change.analysis_type, AnalysisType::FiveWhys);
        match change.data {
            Some(AnalysisData::FiveWhys(data)) => {
                assert_eq!(data.problem, "Order shipped late")
            }
            other => panic!("unexpected change data: {:?}", other),
        }
    }

    #[test]
    fn test_load_restores_persisted_payload() {
        let mut original = AnalysisSelector::new();
        original.select_type(AnalysisType::Fta);
        original.fault_tree_mut().unwrap().set_top_event("Crash");
        original.fault_tree_mut().unwrap().add_node(None).unwrap();
        let payload = original.snapshot().unwrap();

        let mut restored = AnalysisSelector::new();
        restored.load(payload.clone());
        assert_eq!(restored.active_type(), AnalysisType::Fta);
        assert_eq!(restored.snapshot(), Some(payload));
    }
}
