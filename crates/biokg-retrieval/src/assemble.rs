//! Result assembly: ranked paths to serializable records plus a summary.

use biokg_graph::{GraphStore, NodeId, NodeKind, RelationCode};
use serde::Serialize;

use crate::anchors::Anchor;
use crate::error::Result;
use crate::fallback::FallbackPlan;
use crate::ranking::{ScoreFactors, ScoredPath};
use crate::resolver::ResolvedEntities;
use crate::schema::{IntentTag, SchemaConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalOutcome {
    /// Paths found under the classified schema.
    Ok,
    /// No token could be linked to an anchor; nothing was searched.
    NoAnchors,
    /// Nothing found, including after any fallback.
    NoPaths,
    /// Paths found only under the fallback schema.
    Fallback,
}

/// Alternating node and edge references along a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathElement {
    Node {
        id: NodeId,
        name: String,
        kind: NodeKind,
    },
    Edge {
        relation: RelationCode,
        abbrev: &'static str,
        source: NodeId,
        target: NodeId,
        #[serde(skip_serializing_if = "Option::is_none")]
        evidence_count: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        source_count: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        unbiased: Option<bool>,
        weight: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPathRecord {
    /// 1-based.
    pub rank: usize,
    pub path: Vec<PathElement>,
    pub end_kind: String,
    pub hop_count: usize,
    /// Rounded to 4 decimals.
    pub score: f64,
    pub factors: ScoreFactors,
    pub notes: String,
}

impl RankedPathRecord {
    pub fn node_ids(&self) -> Vec<&str> {
        self.path
            .iter()
            .filter_map(|el| match el {
                PathElement::Node { id, .. } => Some(id.as_str()),
                PathElement::Edge { .. } => None,
            })
            .collect()
    }

    pub fn relations(&self) -> Vec<RelationCode> {
        self.path
            .iter()
            .filter_map(|el| match el {
                PathElement::Edge { relation, .. } => Some(*relation),
                PathElement::Node { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalResult {
    pub query: String,
    pub intent_tag: String,
    pub schema: SchemaConfig,
    pub outcome: RetrievalOutcome,
    pub fallback_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_intent: Option<IntentTag>,
    pub tokens: Vec<String>,
    pub resolved: ResolvedEntities,
    pub anchors: Vec<Anchor>,
    pub paths: Vec<RankedPathRecord>,
    pub summary: String,
}

impl RetrievalResult {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Turn ranked paths into records, resolving node names from the graph.
pub fn assemble_paths<G: GraphStore + ?Sized>(graph: &G, ranked: Vec<ScoredPath>) -> Vec<RankedPathRecord> {
    ranked
        .into_iter()
        .enumerate()
        .map(|(i, scored)| {
            let path = &scored.path;
            let mut elements = Vec::with_capacity(path.nodes.len() + path.edges.len());
            for (pos, (id, kind)) in path.nodes.iter().zip(&path.kinds).enumerate() {
                if pos > 0 {
                    let edge = &path.edges[pos - 1];
                    elements.push(PathElement::Edge {
                        relation: edge.relation,
                        abbrev: edge.relation.abbrev(),
                        source: edge.source.clone(),
                        target: edge.target.clone(),
                        evidence_count: edge.evidence_count,
                        source_count: edge.source_count,
                        unbiased: edge.unbiased,
                        weight: edge.weight,
                    });
                }
                let name = graph
                    .get_node(id.as_str())
                    .map(|n| n.name.clone())
                    .unwrap_or_else(|| id.to_string());
                elements.push(PathElement::Node {
                    id: id.clone(),
                    name,
                    kind: *kind,
                });
            }
            RankedPathRecord {
                rank: i + 1,
                path: elements,
                end_kind: path.end_kind().label().to_string(),
                hop_count: path.hop_count(),
                score: round4(scored.score),
                factors: scored.factors,
                notes: scored.notes.join("; "),
            }
        })
        .collect()
}

/// Plain-text account of the schema used and what happened.
pub fn summarize(
    schema: &SchemaConfig,
    outcome: RetrievalOutcome,
    fallback: Option<&FallbackPlan>,
    path_count: usize,
) -> String {
    let mut summary = format!(
        "intent={}; allowed=[{}]; hop_limit={}",
        schema.intent_tag(),
        schema.allowed_abbrevs(),
        schema.hops()
    );
    match (outcome, fallback) {
        (RetrievalOutcome::NoAnchors, _) => {
            summary.push_str("; no entity could be linked to the graph; paths=0");
        }
        (_, Some(plan)) => {
            summary.push_str(&format!(
                "; fallback=yes via {} (allowed=[{}]; hop_limit={}); paths={}",
                plan.proxy,
                plan.schema.allowed_abbrevs(),
                plan.schema.hops(),
                path_count
            ));
        }
        (_, None) => {
            summary.push_str(&format!("; fallback=no; paths={path_count}"));
        }
    }
    if outcome == RetrievalOutcome::NoPaths {
        summary.push_str("; no path satisfies the schema within the hop limit, consider relaxing it");
    }
    summary
}
