//! Core-entity selection ("core lock").
//!
//! Exact-tier resolutions of a preferred kind anchor the search. Only when
//! there are none do looser resolutions get a chance, and then only
//! non-Gene nodes whose full name literally appears in the query. Generic
//! kind-keyword hits never anchor.

use biokg_graph::{NodeId, NodeKind};
use serde::Serialize;

use crate::lexicon::with_translations;
use crate::resolver::{MatchTier, Resolution, ResolvedEntities};
use crate::schema::SchemaConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anchor {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub tier: MatchTier,
    pub token: String,
}

impl From<&Resolution> for Anchor {
    fn from(r: &Resolution) -> Self {
        Self {
            id: r.node.clone(),
            name: r.name.clone(),
            kind: r.kind,
            tier: r.tier,
            token: r.token.clone(),
        }
    }
}

/// Pick up to `max_anchors` anchors, in token order within each preference
/// class. May return an empty list.
pub fn select_anchors(
    resolved: &ResolvedEntities,
    schema: &SchemaConfig,
    query: &str,
    max_anchors: usize,
) -> Vec<Anchor> {
    let locked: Vec<&Resolution> = resolved
        .iter()
        .filter(|r| r.tier.is_exact() && schema.prefers_anchor(r.kind))
        .collect();
    if !locked.is_empty() {
        return dedup_truncate(locked, max_anchors);
    }

    let text = with_translations(query).to_lowercase();
    let loose: Vec<&Resolution> = resolved
        .iter()
        .filter(|r| match r.tier {
            MatchTier::Synonym | MatchTier::SymbolExact => true,
            MatchTier::Substring | MatchTier::Indexed => {
                r.kind != NodeKind::Gene && text.contains(&r.name.to_lowercase())
            }
            MatchTier::KindKeyword => false,
        })
        .collect();

    // Preferred kinds first; order within each group is token order.
    let (mut preferred, other): (Vec<&Resolution>, Vec<&Resolution>) =
        loose.into_iter().partition(|r| schema.prefers_anchor(r.kind));
    preferred.extend(other);
    dedup_truncate(preferred, max_anchors)
}

fn dedup_truncate(candidates: Vec<&Resolution>, max_anchors: usize) -> Vec<Anchor> {
    let mut anchors: Vec<Anchor> = Vec::new();
    for r in candidates {
        if anchors.len() >= max_anchors {
            break;
        }
        if anchors.iter().all(|a| a.id != r.node) {
            anchors.push(Anchor::from(r));
        }
    }
    anchors
}
