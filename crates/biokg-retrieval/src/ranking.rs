//! Multi-factor path scoring.
//!
//! `score = 0.35 match + 0.25 edge_strength + 0.20 schema_fit
//!        + 0.10 hop + 0.05 hub + diversity`
//!
//! Diversity is a one-time 0.05 bonus for the first path (in ranked order)
//! reaching a given end node. Sorting is stable, so ties keep the finder's
//! discovery order.

use ahash::AHashSet;
use biokg_graph::{Edge, NodeKind, RelationCode};
use serde::Serialize;

use crate::lexicon::{contains_cue, relation_cues};
use crate::paths::CandidatePath;
use crate::schema::SchemaConfig;

pub const MATCH_WEIGHT: f64 = 0.35;
pub const EDGE_STRENGTH_WEIGHT: f64 = 0.25;
pub const SCHEMA_FIT_WEIGHT: f64 = 0.20;
pub const HOP_WEIGHT: f64 = 0.10;
pub const HUB_WEIGHT: f64 = 0.05;
pub const DIVERSITY_BONUS: f64 = 0.05;

/// Per-relation prior strength. Exhaustive so new codes must be weighed.
pub fn base_weight(relation: RelationCode) -> f64 {
    use RelationCode::*;
    match relation {
        CompoundTreatsDisease | DiseaseTreatedByCompound => 0.9,
        CompoundBindsGene | GeneBindsCompound => 0.8,
        DiseaseAssociatesGene | GeneAssociatesDisease => 0.75,
        CompoundPalliatesDisease | DiseasePalliatedByCompound => 0.7,
        GeneInteractsGene => 0.7,
        GeneRegulatesGene => 0.65,
        GeneCovariesGene => 0.6,
        AnatomyExpressesGene | GeneExpressesInAnatomy => 0.6,
        DiseaseLocalizesAnatomy | AnatomyLocalizesDisease => 0.6,
        DiseasePresentsSymptom | SymptomPresentsInDisease => 0.6,
        GeneParticipatesPathway | PathwayInvolvesGene => 0.6,
        GeneParticipatesBiologicalProcess | BiologicalProcessInvolvesGene => 0.55,
        GeneParticipatesMolecularFunction | MolecularFunctionInvolvesGene => 0.55,
        GeneParticipatesCellularComponent | CellularComponentInvolvesGene => 0.5,
        CompoundUpregulatesGene
        | GeneUpregulatedByCompound
        | CompoundDownregulatesGene
        | GeneDownregulatedByCompound => 0.55,
        DiseaseUpregulatesGene
        | GeneUpregulatedInDisease
        | DiseaseDownregulatesGene
        | GeneDownregulatedInDisease => 0.55,
        AnatomyUpregulatesGene
        | GeneUpregulatedInAnatomy
        | AnatomyDownregulatesGene
        | GeneDownregulatedInAnatomy => 0.5,
        CompoundCausesSideEffect | SideEffectCausedByCompound => 0.5,
        PharmacologicClassIncludesCompound | CompoundInPharmacologicClass => 0.5,
        DiseaseResemblesDisease | CompoundResemblesCompound => 0.3,
        Unknown => 0.2,
    }
}

/// Strength of one edge in `[0, 1]`.
///
/// Evidence and source counts add a log-damped bonus; an unbiased flag adds
/// a fixed one. On covariance edges `weight` carries the covariance metric
/// and scales the result after clipping to `[0, 1]`; the default 1.0 is
/// neutral. Other edges ignore `weight`.
pub fn edge_strength(edge: &Edge) -> f64 {
    let mut strength = base_weight(edge.relation);
    if let Some(n) = edge.evidence_count {
        strength += 0.05 * (1.0 + n as f64).ln().min(2.0);
    }
    if let Some(n) = edge.source_count {
        strength += 0.025 * (1.0 + n as f64).ln().min(2.0);
    }
    if edge.unbiased == Some(true) {
        strength += 0.05;
    }
    let scale = if edge.relation.is_covariance() && edge.weight.is_finite() {
        edge.weight.abs().clamp(0.0, 1.0)
    } else {
        1.0
    };
    (strength * scale).min(1.0)
}

pub fn hop_factor(hops: usize) -> f64 {
    match hops {
        0 | 1 => 1.0,
        2 => 0.8,
        3 => 0.6,
        _ => 0.4,
    }
}

/// Individual factors before weighting, kept for explanation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreFactors {
    pub relation_match: f64,
    pub edge_strength: f64,
    pub schema_fit: f64,
    pub hop: f64,
    pub hub: f64,
    pub diversity: f64,
}

impl ScoreFactors {
    pub fn total(&self) -> f64 {
        MATCH_WEIGHT * self.relation_match
            + EDGE_STRENGTH_WEIGHT * self.edge_strength
            + SCHEMA_FIT_WEIGHT * self.schema_fit
            + HOP_WEIGHT * self.hop
            + HUB_WEIGHT * self.hub
            + self.diversity
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPath {
    pub path: CandidatePath,
    pub score: f64,
    pub factors: ScoreFactors,
    pub notes: Vec<String>,
}

pub struct PathRanker<D> {
    degree: D,
    top_k: usize,
}

impl<D: Fn(&str) -> usize> PathRanker<D> {
    /// `degree` supplies node degrees for hub detection.
    pub fn new(degree: D) -> Self {
        Self { degree, top_k: 10 }
    }

    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Score, order and truncate. `query` may be in any case.
    pub fn rank(
        &self,
        paths: Vec<CandidatePath>,
        query: &str,
        schema: &SchemaConfig,
    ) -> Vec<ScoredPath> {
        let query = query.to_lowercase();
        let mut scored: Vec<ScoredPath> = paths
            .into_iter()
            .map(|path| self.score(path, &query, schema))
            .collect();

        sort_desc(&mut scored);

        let mut seen_ends = AHashSet::new();
        for item in &mut scored {
            if seen_ends.insert((item.path.end_kind(), item.path.end().clone())) {
                item.factors.diversity = DIVERSITY_BONUS;
                item.score = item.factors.total();
            }
        }

        sort_desc(&mut scored);
        scored.truncate(self.top_k);
        scored
    }

    fn score(&self, path: CandidatePath, query: &str, schema: &SchemaConfig) -> ScoredPath {
        let relation_match = if path
            .edges
            .iter()
            .any(|e| relation_cues(e.relation).iter().any(|cue| contains_cue(query, cue)))
        {
            1.0
        } else {
            0.0
        };

        let edge_strength = if path.edges.is_empty() {
            0.0
        } else {
            path.edges.iter().map(edge_strength).sum::<f64>() / path.edges.len() as f64
        };

        let schema_fit = if path.edges.is_empty() || schema.allowed().is_empty() {
            1.0
        } else {
            let fitting = path
                .edges
                .iter()
                .filter(|e| schema.allowed().contains(&e.relation))
                .count();
            fitting as f64 / path.edges.len() as f64
        };

        let genes: Vec<f64> = path
            .nodes
            .iter()
            .zip(&path.kinds)
            .filter(|(_, kind)| **kind == NodeKind::Gene)
            .map(|(id, _)| {
                let degree = (self.degree)(id.as_str()) as f64;
                1.0 / (1.0 + (1.0 + degree).ln())
            })
            .collect();
        let hub = if genes.is_empty() {
            1.0
        } else {
            genes.iter().sum::<f64>() / genes.len() as f64
        };

        let factors = ScoreFactors {
            relation_match,
            edge_strength,
            schema_fit,
            hop: hop_factor(path.hop_count()),
            hub,
            diversity: 0.0,
        };

        let mut notes = Vec::new();
        if path.edges.iter().any(|e| e.relation == RelationCode::Unknown) {
            notes.push("contains edges with unknown relation codes".to_string());
        }

        ScoredPath {
            score: factors.total(),
            path,
            factors,
            notes,
        }
    }
}

fn sort_desc(scored: &mut [ScoredPath]) {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IntentTag;
    use approx::assert_relative_eq;
    use biokg_graph::NodeId;

    fn path(ids: &[(&str, NodeKind)], edges: Vec<Edge>) -> CandidatePath {
        CandidatePath {
            nodes: ids.iter().map(|(id, _)| NodeId::from(*id)).collect(),
            kinds: ids.iter().map(|(_, k)| *k).collect(),
            edges,
        }
    }

    fn one_hop(target: &str, relation: RelationCode) -> CandidatePath {
        path(
            &[("G:X", NodeKind::Gene), (target, NodeKind::Gene)],
            vec![Edge::new("G:X", target, relation)],
        )
    }

    #[test]
    fn hop_factor_table() {
        assert_eq!(hop_factor(1), 1.0);
        assert_eq!(hop_factor(2), 0.8);
        assert_eq!(hop_factor(3), 0.6);
        assert_eq!(hop_factor(7), 0.4);
    }

    #[test]
    fn neutral_metadata_leaves_base_weight() {
        let e = Edge::new("a", "b", RelationCode::CompoundTreatsDisease);
        assert_relative_eq!(edge_strength(&e), 0.9);
        let unknown = Edge::new("a", "b", RelationCode::Unknown);
        assert_relative_eq!(edge_strength(&unknown), 0.2);
    }

    #[test]
    fn evidence_raises_strength_and_covariance_scales_it() {
        let plain = Edge::new("a", "b", RelationCode::GeneCovariesGene);
        let backed = plain.clone().evidence_count(10).unbiased(true);
        assert!(edge_strength(&backed) > edge_strength(&plain));

        let weak = plain.clone().weight(0.25);
        assert_relative_eq!(edge_strength(&weak), 0.6 * 0.25);
        let negative = plain.clone().weight(-0.5);
        assert_relative_eq!(edge_strength(&negative), 0.3);
        assert!(edge_strength(&plain.weight(f64::NAN)).is_finite());

        let treats = Edge::new("a", "b", RelationCode::CompoundTreatsDisease).weight(0.1);
        assert_relative_eq!(edge_strength(&treats), 0.9);
    }

    #[test]
    fn strength_is_capped() {
        let e = Edge::new("a", "b", RelationCode::CompoundTreatsDisease)
            .evidence_count(1_000)
            .source_count(1_000)
            .unbiased(true);
        assert_relative_eq!(edge_strength(&e), 1.0);
    }

    #[test]
    fn query_cue_and_schema_fit_lift_score() {
        let schema = SchemaConfig::new(IntentTag::GeneCovariance)
            .allow([RelationCode::GeneCovariesGene]);
        let ranker = PathRanker::new(|_: &str| 0);
        let ranked = ranker.rank(
            vec![
                one_hop("G:Z", RelationCode::GeneInteractsGene),
                one_hop("G:Y", RelationCode::GeneCovariesGene),
            ],
            "What genes covary with X?",
            &schema,
        );
        assert_eq!(ranked[0].path.end().as_str(), "G:Y");
        assert_eq!(ranked[0].factors.relation_match, 1.0);
        assert_eq!(ranked[0].factors.schema_fit, 1.0);
        assert_eq!(ranked[1].factors.schema_fit, 0.0);
    }

    #[test]
    fn hub_genes_are_penalized() {
        let schema = SchemaConfig::new(IntentTag::General);
        let ranker = PathRanker::new(|id: &str| if id == "G:HUB" { 500 } else { 1 });
        let ranked = ranker.rank(
            vec![
                one_hop("G:HUB", RelationCode::GeneInteractsGene),
                one_hop("G:LEAF", RelationCode::GeneInteractsGene),
            ],
            "genes near x",
            &schema,
        );
        assert_eq!(ranked[0].path.end().as_str(), "G:LEAF");
        assert!(ranked[0].factors.hub > ranked[1].factors.hub);
    }

    #[test]
    fn diversity_bonus_once_per_end_node() {
        let schema = SchemaConfig::new(IntentTag::General);
        let ranker = PathRanker::new(|_: &str| 0);
        let direct = one_hop("G:Y", RelationCode::GeneInteractsGene);
        let detour = path(
            &[("G:X", NodeKind::Gene), ("G:W", NodeKind::Gene), ("G:Y", NodeKind::Gene)],
            vec![
                Edge::new("G:X", "G:W", RelationCode::GeneInteractsGene),
                Edge::new("G:W", "G:Y", RelationCode::GeneInteractsGene),
            ],
        );
        let ranked = ranker.rank(vec![detour, direct], "x", &schema);
        assert_eq!(ranked[0].path.hop_count(), 1);
        assert_eq!(ranked[0].factors.diversity, DIVERSITY_BONUS);
        assert_eq!(ranked[1].factors.diversity, 0.0);
    }

    #[test]
    fn ties_keep_input_order_and_top_k_truncates() {
        let schema = SchemaConfig::new(IntentTag::General);
        let ranker = PathRanker::new(|_: &str| 0).top_k(2);
        let ranked = ranker.rank(
            vec![
                one_hop("G:A", RelationCode::GeneInteractsGene),
                one_hop("G:B", RelationCode::GeneInteractsGene),
                one_hop("G:C", RelationCode::GeneInteractsGene),
            ],
            "x",
            &schema,
        );
        let ends: Vec<&str> = ranked.iter().map(|s| s.path.end().as_str()).collect();
        assert_eq!(ends, vec!["G:A", "G:B"]);
    }

    #[test]
    fn weights_sum_to_one() {
        assert_relative_eq!(
            MATCH_WEIGHT + EDGE_STRENGTH_WEIGHT + SCHEMA_FIT_WEIGHT + HOP_WEIGHT + HUB_WEIGHT,
            1.0
        );
    }
}
