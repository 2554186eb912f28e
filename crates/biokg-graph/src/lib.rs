//! biokg-graph: typed biomedical knowledge graph store
//!
//! The retrieval core treats the graph as an external, read-only collaborator.
//! This crate defines that surface:
//!
//! - **Closed vocabularies**: [`NodeKind`] (Hetionet metanodes) and
//!   [`RelationCode`] (metaedges, both stored directions, plus `Unknown`)
//! - **Records**: [`Node`] and [`Edge`] with optional evidence metadata
//! - **Read surface**: the [`GraphStore`] trait (`get_node`, `neighbors`,
//!   `node_count`, `has_node`, stable `nodes()` iteration, `degree`)
//! - **In-memory store**: [`MemoryGraph`], immutable once shared
//!
//! ## Direction
//!
//! Edges are directed. A paired reverse code (`AeG` ↔ `GeA`) is a separate
//! stored edge; its absence is meaningful and is never synthesized.

pub mod kind;
pub mod memory;
pub mod relation;

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

pub use kind::NodeKind;
pub use memory::MemoryGraph;
pub use relation::RelationCode;

// ============================================================================
// Identifiers and Records
// ============================================================================

/// Opaque node identifier (e.g. `"Gene::7157"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node in the knowledge graph. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// A directed, typed edge with optional evidence metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: RelationCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unbiased: Option<bool>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Edge {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relation: RelationCode,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation,
            evidence_count: None,
            source_count: None,
            unbiased: None,
            weight: default_weight(),
        }
    }

    pub fn evidence_count(mut self, n: u32) -> Self {
        self.evidence_count = Some(n);
        self
    }

    pub fn source_count(mut self, n: u32) -> Self {
        self.source_count = Some(n);
        self
    }

    pub fn unbiased(mut self, unbiased: bool) -> Self {
        self.unbiased = Some(unbiased);
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// The same edge in the opposite direction under the paired code, if any.
    pub fn reversed(&self) -> Option<Edge> {
        let relation = self.relation.reverse()?;
        Some(Edge {
            source: self.target.clone(),
            target: self.source.clone(),
            relation,
            ..self.clone()
        })
    }
}

// ============================================================================
// Read Surface
// ============================================================================

/// Read-only access to a loaded graph.
///
/// Implementations must not mutate in place while shared: retrieval runs many
/// queries concurrently against one store without locking.
pub trait GraphStore: Send + Sync {
    fn get_node(&self, id: &str) -> Option<&Node>;

    /// Outgoing edges of `id` as `(target, edge)`, in a stable order.
    fn neighbors<'a>(&'a self, id: &str) -> Box<dyn Iterator<Item = (&'a NodeId, &'a Edge)> + 'a>;

    fn node_count(&self) -> usize;

    fn has_node(&self, id: &str) -> bool {
        self.get_node(id).is_some()
    }

    /// All nodes in a stable iteration order.
    fn nodes<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Node> + 'a>;

    /// Degree used for hub detection. Defaults to the out-degree.
    fn degree(&self, id: &str) -> usize {
        self.neighbors(id).count()
    }

    /// Nodes of one kind, in the same order as `nodes()`.
    fn nodes_of_kind<'a>(&'a self, kind: NodeKind) -> Box<dyn Iterator<Item = &'a Node> + 'a> {
        Box::new(self.nodes().filter(move |n| n.kind == kind))
    }
}
