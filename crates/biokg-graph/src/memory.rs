//! In-memory graph store.
//!
//! Layout mirrors a columnar edge-list store:
//! - nodes are kept in insertion order and addressed by a dense `u32` index
//! - `id -> index` lookup through a hash map
//! - forward adjacency per node index (insertion order preserved)
//! - in-degree column, so `degree` counts both directions without a backward index
//! - kind index: `kind -> bitmap of node indexes`

use ahash::AHashMap;
use anyhow::{anyhow, Result};
use roaring::RoaringBitmap;

use crate::{Edge, GraphStore, Node, NodeId, NodeKind, RelationCode};

/// Immutable-once-shared, insertion-ordered graph.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    nodes: Vec<Node>,
    index: AHashMap<NodeId, u32>,
    /// Forward adjacency: node index -> outgoing edges
    adjacency: Vec<Vec<Edge>>,
    /// In-degree column: node index -> incoming edge count
    in_degree: Vec<u32>,
    /// Kind index: kind -> bitmap of node indexes
    kind_index: AHashMap<NodeKind, RoaringBitmap>,
    /// Relation histogram: relation -> edge count
    relation_counts: AHashMap<RelationCode, usize>,
    edge_count: usize,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from node and edge lists.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self> {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node)?;
        }
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// Add a node; duplicate ids are rejected.
    pub fn add_node(&mut self, node: Node) -> Result<u32> {
        if self.index.contains_key(&node.id) {
            return Err(anyhow!("duplicate node id {}", node.id));
        }
        let idx = self.nodes.len() as u32;
        self.index.insert(node.id.clone(), idx);
        self.kind_index
            .entry(node.kind)
            .or_insert_with(RoaringBitmap::new)
            .insert(idx);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        self.in_degree.push(0);
        Ok(idx)
    }

    /// Add a directed edge. Both endpoints must already exist.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        let Some(&src) = self.index.get(edge.source.as_str()) else {
            return Err(anyhow!("edge source {} is not a known node", edge.source));
        };
        let Some(&dst) = self.index.get(edge.target.as_str()) else {
            return Err(anyhow!("edge target {} is not a known node", edge.target));
        };
        *self.relation_counts.entry(edge.relation).or_insert(0) += 1;
        self.in_degree[dst as usize] += 1;
        self.adjacency[src as usize].push(edge);
        self.edge_count += 1;
        Ok(())
    }

    /// Add an edge together with its paired reverse edge.
    ///
    /// This is the only way reverse edges enter the store: the caller asks
    /// for them explicitly. Fails for codes without a pair.
    pub fn add_edge_pair(&mut self, edge: Edge) -> Result<()> {
        let reversed = edge
            .reversed()
            .ok_or_else(|| anyhow!("relation {} has no paired reverse code", edge.relation))?;
        self.add_edge(edge)?;
        self.add_edge(reversed)
    }

    /// Number of stored edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of stored edges for a given relation code.
    pub fn relation_count(&self, relation: RelationCode) -> usize {
        self.relation_counts.get(&relation).copied().unwrap_or(0)
    }

    /// Number of nodes of a given kind.
    pub fn kind_count(&self, kind: NodeKind) -> usize {
        self.kind_index
            .get(&kind)
            .map(|b| b.len() as usize)
            .unwrap_or(0)
    }

    /// Check whether an edge exists: `source -[relation]-> target`.
    pub fn has_edge(&self, source: &str, relation: RelationCode, target: &str) -> bool {
        self.neighbors(source)
            .any(|(t, e)| e.relation == relation && t.as_str() == target)
    }

    fn idx(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|&i| i as usize)
    }
}

impl GraphStore for MemoryGraph {
    fn get_node(&self, id: &str) -> Option<&Node> {
        self.idx(id).and_then(|i| self.nodes.get(i))
    }

    fn neighbors<'a>(&'a self, id: &str) -> Box<dyn Iterator<Item = (&'a NodeId, &'a Edge)> + 'a> {
        match self.idx(id) {
            Some(i) => Box::new(self.adjacency[i].iter().map(|e| (&e.target, e))),
            None => Box::new(std::iter::empty()),
        }
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn has_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn nodes<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Node> + 'a> {
        Box::new(self.nodes.iter())
    }

    fn degree(&self, id: &str) -> usize {
        match self.idx(id) {
            Some(i) => self.adjacency[i].len() + self.in_degree[i] as usize,
            None => 0,
        }
    }

    fn nodes_of_kind<'a>(&'a self, kind: NodeKind) -> Box<dyn Iterator<Item = &'a Node> + 'a> {
        match self.kind_index.get(&kind) {
            // Bitmap iteration is ascending, which is insertion order.
            Some(bitmap) => Box::new(bitmap.iter().filter_map(|i| self.nodes.get(i as usize))),
            None => Box::new(std::iter::empty()),
        }
    }
}
