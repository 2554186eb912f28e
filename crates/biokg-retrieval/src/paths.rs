//! Constrained path enumeration.
//!
//! Depth-bounded traversal from each anchor using an explicit stack of
//! frames `(nodes so far, edges so far)`:
//!
//! - an edge is admissible iff the schema admits its relation
//! - a node already on the path is never revisited
//! - a path is recorded as soon as it has at least one edge and some
//!   target of the schema accepts it (hop limit, end kind, constraints);
//!   expansion continues past recorded paths up to the deepest hop limit
//! - a prefix no target could still accept is pruned
//! - frames pushed per depth per anchor are capped at `max_results_per_hop`
//! - results are deduplicated by node sequence and come out in discovery
//!   order, which is deterministic for a given graph
//!
//! A hop limit of zero yields the anchors themselves as zero-hop paths.

use ahash::AHashSet;
use biokg_graph::{Edge, GraphStore, Node, NodeId, NodeKind, RelationCode};
use tracing::{debug, warn};

use crate::schema::SchemaConfig;

/// A simple path through the graph with the edges traversed between nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePath {
    pub nodes: Vec<NodeId>,
    pub kinds: Vec<NodeKind>,
    pub edges: Vec<Edge>,
}

impl CandidatePath {
    pub fn hop_count(&self) -> usize {
        self.edges.len()
    }

    /// Relation codes in traversal order, parallel to `edges`.
    pub fn metaedges(&self) -> Vec<RelationCode> {
        self.edges.iter().map(|e| e.relation).collect()
    }

    pub fn start(&self) -> &NodeId {
        &self.nodes[0]
    }

    pub fn end(&self) -> &NodeId {
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn end_kind(&self) -> NodeKind {
        self.kinds[self.kinds.len() - 1]
    }

    /// No node appears twice.
    pub fn is_simple(&self) -> bool {
        let mut seen = AHashSet::new();
        self.nodes.iter().all(|n| seen.insert(n))
    }
}

/// One stack entry: a partial path ending at its last node.
struct Frame<'g> {
    nodes: Vec<&'g Node>,
    edges: Vec<&'g Edge>,
    relations: Vec<RelationCode>,
}

impl<'g> Frame<'g> {
    fn root(node: &'g Node) -> Self {
        Self {
            nodes: vec![node],
            edges: Vec::new(),
            relations: Vec::new(),
        }
    }

    fn tip(&self) -> &'g Node {
        self.nodes[self.nodes.len() - 1]
    }

    fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id.as_str() == id)
    }

    fn extend(&self, node: &'g Node, edge: &'g Edge) -> Self {
        let mut nodes = self.nodes.clone();
        nodes.push(node);
        let mut edges = self.edges.clone();
        edges.push(edge);
        let mut relations = self.relations.clone();
        relations.push(edge.relation);
        Self {
            nodes,
            edges,
            relations,
        }
    }

    fn kinds(&self) -> Vec<NodeKind> {
        self.nodes.iter().map(|n| n.kind).collect()
    }

    fn to_path(&self) -> CandidatePath {
        CandidatePath {
            nodes: self.nodes.iter().map(|n| n.id.clone()).collect(),
            kinds: self.kinds(),
            edges: self.edges.iter().map(|e| (*e).clone()).collect(),
        }
    }
}

pub struct PathFinder<'g, G: GraphStore + ?Sized> {
    graph: &'g G,
    max_results_per_hop: usize,
}

impl<'g, G: GraphStore + ?Sized> PathFinder<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            max_results_per_hop: 100,
        }
    }

    pub fn max_results_per_hop(mut self, n: usize) -> Self {
        self.max_results_per_hop = n;
        self
    }

    /// Enumerate admissible paths from every anchor, in anchor order.
    pub fn find(&self, anchors: &[NodeId], schema: &SchemaConfig) -> Vec<CandidatePath> {
        let mut seen: AHashSet<Vec<NodeId>> = AHashSet::new();
        let mut results = Vec::new();

        for anchor in anchors {
            let Some(start) = self.graph.get_node(anchor.as_str()) else {
                debug!(anchor = %anchor, "anchor not in graph; skipping");
                continue;
            };
            let before = results.len();
            self.search_from(start, schema, &mut seen, &mut results);
            debug!(
                anchor = %anchor,
                paths = results.len() - before,
                hop_limit = schema.hops(),
                "path search finished"
            );
        }

        results
    }

    fn search_from(
        &self,
        start: &'g Node,
        schema: &SchemaConfig,
        seen: &mut AHashSet<Vec<NodeId>>,
        results: &mut Vec<CandidatePath>,
    ) {
        let hop_limit = schema.hops();
        if hop_limit == 0 {
            if schema.accepts_path(&[], &[start.kind]) {
                record(&Frame::root(start), seen, results);
            }
            return;
        }

        let mut pushed_at_depth = vec![0usize; hop_limit + 1];
        let mut stack = vec![Frame::root(start)];

        while let Some(frame) = stack.pop() {
            let depth = frame.edges.len();
            if depth >= hop_limit {
                continue;
            }

            let tip = frame.tip();
            let mut children = Vec::new();
            for (target, edge) in self.graph.neighbors(tip.id.as_str()) {
                if pushed_at_depth[depth + 1] >= self.max_results_per_hop {
                    break;
                }
                if !schema.admits(edge.relation) || frame.contains(target.as_str()) {
                    continue;
                }
                let Some(next) = self.graph.get_node(target.as_str()) else {
                    continue;
                };
                if edge.relation == RelationCode::Unknown {
                    warn!(
                        source = %tip.id,
                        target = %target,
                        "traversing edge with unknown relation code"
                    );
                }

                let child = frame.extend(next, edge);
                if !schema.admits_prefix(&child.relations) {
                    continue;
                }
                pushed_at_depth[depth + 1] += 1;

                if schema.accepts_path(&child.relations, &child.kinds()) {
                    record(&child, seen, results);
                }
                children.push(child);
            }

            // Reverse so neighbors are expanded in adjacency order.
            stack.extend(children.into_iter().rev());
        }
    }
}

fn record(frame: &Frame<'_>, seen: &mut AHashSet<Vec<NodeId>>, results: &mut Vec<CandidatePath>) {
    let path = frame.to_path();
    if seen.insert(path.nodes.clone()) {
        results.push(path);
    }
}
