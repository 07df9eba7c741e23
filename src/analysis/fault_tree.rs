//! Fault Tree Analysis - a tree of events and logic gates over a flat arena.
//!
//! The tree is held as a keyed mapping from node id to node value, with
//! `children` as id references instead of nested owned sub-objects. That
//! keeps the shape serializable (no cycles, no nesting) and makes subtree
//! deletion a multi-key removal. Nodes are only ever created as fresh leaves
//! and attached once, so the structure is acyclic by construction and every
//! walk terminates.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Reserved id of the synthetic root node representing the top event.
pub const TOP_NODE_ID: &str = "TOP";

/// Derived classification of a fault tree node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FtaNodeType {
    /// A node with zero or one child.
    #[default]
    Event,
    /// A node with two or more children, combined via AND/OR logic.
    Gate,
}

impl std::fmt::Display for FtaNodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FtaNodeType::Event => write!(f, "event"),
            FtaNodeType::Gate => write!(f, "gate"),
        }
    }
}

impl std::str::FromStr for FtaNodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "event" => Ok(FtaNodeType::Event),
            "gate" => Ok(FtaNodeType::Gate),
            _ => Err(format!("Unknown node type: {}", s)),
        }
    }
}

/// Combination logic of a gate node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateType {
    /// All children are required for the parent event to occur.
    And,
    /// Any single child is sufficient.
    #[default]
    Or,
}

impl std::fmt::Display for GateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateType::And => write!(f, "and"),
            GateType::Or => write!(f, "or"),
        }
    }
}

impl std::str::FromStr for GateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" => Ok(GateType::And),
            "or" => Ok(GateType::Or),
            _ => Err(format!("Unknown gate type: {}", s)),
        }
    }
}

/// One node of the fault tree.
///
/// `node_type` and `gate_type` are caches of a pure function of
/// `children.len()` and are recomputed after every structural change;
/// `gate_type` is present if and only if the node is a gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FtaNode {
    /// Node identifier; `"TOP"` is reserved for the synthetic root.
    pub id: String,
    /// Short label shown in the tree rendering.
    #[serde(default)]
    pub label: String,
    /// Longer free-text description.
    #[serde(default)]
    pub description: String,
    /// Derived classification (event or gate).
    #[serde(default)]
    pub node_type: FtaNodeType,
    /// Gate logic, present only while the node is a gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate_type: Option<GateType>,
    /// Child node ids in left-to-right rendering order.
    #[serde(default)]
    pub children: Vec<String>,
}

impl FtaNode {
    /// Create a childless event node.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            node_type: FtaNodeType::Event,
            gate_type: None,
            children: Vec::new(),
        }
    }
}

/// Partial update merged into an existing node by
/// [`FaultTreeEngine::update_node`].
///
/// `children` is deliberately absent: structure mutates only through
/// [`FaultTreeEngine::add_node`] and [`FaultTreeEngine::remove_node`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FtaNodeUpdate {
    /// New label, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New description, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New gate logic, if given. Ignored unless the node derives to a gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate_type: Option<GateType>,
}

impl FtaNodeUpdate {
    /// Empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the gate logic.
    pub fn with_gate_type(mut self, gate_type: GateType) -> Self {
        self.gate_type = Some(gate_type);
        self
    }
}

/// Fault tree analysis payload.
///
/// `nodes` is a flat keyed collection; the tree shape lives entirely in the
/// `children` id lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FtaData {
    /// The undesired outcome being analyzed.
    #[serde(default)]
    pub top_event: String,
    /// Longer description of the top event.
    #[serde(default)]
    pub top_event_description: String,
    /// All nodes, keyed by id.
    #[serde(default)]
    pub nodes: BTreeMap<String, FtaNode>,
    /// The synthesized root cause.
    #[serde(default)]
    pub root_cause: String,
}

/// Fault tree engine over [`FtaData`].
#[derive(Debug, Clone, Default)]
pub struct FaultTreeEngine {
    data: FtaData,
}

impl FaultTreeEngine {
    /// Create an engine with no nodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine seeded with existing data.
    pub fn from_data(data: FtaData) -> Self {
        Self { data }
    }

    /// The current record.
    pub fn data(&self) -> &FtaData {
        &self.data
    }

    /// Replace the top event text, keeping the `TOP` node's label in sync
    /// when it already exists.
    pub fn set_top_event(&mut self, text: impl Into<String>) -> &FtaData {
        self.data.top_event = text.into();
        if let Some(top) = self.data.nodes.get_mut(TOP_NODE_ID) {
            top.label = self.data.top_event.clone();
        }
        &self.data
    }

    /// Replace the top event description.
    pub fn set_top_event_description(&mut self, text: impl Into<String>) -> &FtaData {
        self.data.top_event_description = text.into();
        &self.data
    }

    /// Replace the synthesized root cause.
    pub fn set_root_cause(&mut self, text: impl Into<String>) -> &FtaData {
        self.data.root_cause = text.into();
        &self.data
    }

    /// Add a fresh event node and return its id.
    ///
    /// With a parent id, the node is appended to that parent's children;
    /// without one, the `TOP` node is created lazily (label seeded from the
    /// top event text) and the node is attached under it. Existing nodes are
    /// never removed or reordered by this operation.
    pub fn add_node(&mut self, parent_id: Option<&str>) -> EngineResult<String> {
        let parent = match parent_id {
            Some(id) => {
                if !self.data.nodes.contains_key(id) {
                    return Err(EngineError::NodeNotFound {
                        node_id: id.to_string(),
                    });
                }
                id.to_string()
            }
            None => {
                self.ensure_top();
                TOP_NODE_ID.to_string()
            }
        };

        let node_id = Uuid::new_v4().to_string();
        self.data
            .nodes
            .insert(node_id.clone(), FtaNode::new(node_id.as_str(), ""));

        if let Some(parent_node) = self.data.nodes.get_mut(&parent) {
            parent_node.children.push(node_id.clone());
        }
        self.rederive(&parent);

        debug!(node_id = %node_id, parent_id = %parent, "Fault tree node added");
        Ok(node_id)
    }

    /// Merge the given fields into an existing node.
    ///
    /// Setting a `gate_type` on a node that derives to an event is accepted
    /// and immediately discarded by re-derivation.
    pub fn update_node(&mut self, node_id: &str, update: FtaNodeUpdate) -> EngineResult<&FtaData> {
        let node = self
            .data
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| EngineError::NodeNotFound {
                node_id: node_id.to_string(),
            })?;

        if let Some(label) = update.label {
            node.label = label;
        }
        if let Some(description) = update.description {
            node.description = description;
        }
        if let Some(gate_type) = update.gate_type {
            node.gate_type = Some(gate_type);
        }
        self.rederive(node_id);

        Ok(&self.data)
    }

    /// Remove a node and its entire subtree. Removing an absent id is a
    /// no-op, making the operation idempotent.
    ///
    /// The node is detached from its former parent first (re-deriving that
    /// parent's type), and only then is the subtree deleted, so the parent
    /// scan never visits a half-deleted mapping.
    pub fn remove_node(&mut self, node_id: &str) -> &FtaData {
        if !self.data.nodes.contains_key(node_id) {
            return &self.data;
        }

        // Detach from any parent that references the node.
        let mut detached_parents = Vec::new();
        for (id, node) in self.data.nodes.iter_mut() {
            if node.children.iter().any(|c| c == node_id) {
                node.children.retain(|c| c != node_id);
                detached_parents.push(id.clone());
            }
        }
        for parent_id in &detached_parents {
            self.rederive(parent_id);
        }

        // Delete the subtree.
        let mut removed = 0usize;
        let mut stack = vec![node_id.to_string()];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.data.nodes.remove(&id) {
                removed += 1;
                stack.extend(node.children);
            }
        }

        debug!(node_id = %node_id, removed, "Fault tree subtree removed");
        &self.data
    }

    /// Ids of nodes not referenced as a child anywhere, excluding `TOP`.
    ///
    /// Only meaningful while no `TOP` node exists (a transitional state);
    /// once `TOP` is present every node hangs off it.
    pub fn root_nodes(&self) -> Vec<String> {
        let referenced: HashSet<&String> = self
            .data
            .nodes
            .values()
            .flat_map(|n| n.children.iter())
            .collect();
        self.data
            .nodes
            .keys()
            .filter(|id| id.as_str() != TOP_NODE_ID && !referenced.contains(*id))
            .cloned()
            .collect()
    }

    /// Depth-first walk in stored child order, starting at `TOP` (or at each
    /// disconnected root while no `TOP` exists). Returns `(depth, node)`
    /// pairs in visit order.
    pub fn walk(&self) -> Vec<(usize, &FtaNode)> {
        let mut out = Vec::new();
        if self.data.nodes.contains_key(TOP_NODE_ID) {
            self.walk_from(TOP_NODE_ID, 0, &mut out);
        } else {
            for root in self.root_nodes() {
                self.walk_from(&root, 0, &mut out);
            }
        }
        out
    }

    /// Reset to an empty tree.
    pub fn clear(&mut self) {
        self.data = FtaData::default();
    }

    fn walk_from<'a>(&'a self, node_id: &str, depth: usize, out: &mut Vec<(usize, &'a FtaNode)>) {
        if let Some(node) = self.data.nodes.get(node_id) {
            out.push((depth, node));
            for child in &node.children {
                self.walk_from(child, depth + 1, out);
            }
        }
    }

    fn ensure_top(&mut self) {
        if !self.data.nodes.contains_key(TOP_NODE_ID) {
            let top = FtaNode::new(TOP_NODE_ID, self.data.top_event.clone());
            self.data.nodes.insert(TOP_NODE_ID.to_string(), top);
        }
    }

    /// Recompute the derived `node_type`/`gate_type` cache after a
    /// structural change. Two or more children make a gate (defaulting new
    /// gates to OR); one or zero children make an event with no gate logic.
    fn rederive(&mut self, node_id: &str) {
        if let Some(node) = self.data.nodes.get_mut(node_id) {
            if node.children.len() >= 2 {
                node.node_type = FtaNodeType::Gate;
                if node.gate_type.is_none() {
                    node.gate_type = Some(GateType::Or);
                }
            } else {
                node.node_type = FtaNodeType::Event;
                node.gate_type = None;
            }
        }
    }
}
