//! Integration tests for the complete retrieval pipeline
//!
//! These tests drive `RetrievalEngine` end to end over small in-memory graphs:
//! - keywords → resolution → intent → anchors → paths → ranking → assembly
//! - fallback to a proxy schema when the primary one finds nothing
//! - determinism and concurrent use of one shared engine
//!
//! Run with: cargo test --test integration_tests

use biokg_graph::{Edge, MemoryGraph, Node, NodeKind, RelationCode};
use biokg_retrieval::*;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn engine(graph: MemoryGraph) -> RetrievalEngine<MemoryGraph> {
    init_tracing();
    RetrievalEngine::new(Arc::new(graph))
}

fn brca1_graph(edges: Vec<Edge>) -> MemoryGraph {
    MemoryGraph::from_parts(
        [
            Node::new("Gene::672", "BRCA1", NodeKind::Gene),
            Node::new("Gene::580", "BARD1", NodeKind::Gene),
            Node::new("Gene::79728", "PALB2", NodeKind::Gene),
        ],
        edges,
    )
    .expect("graph should build")
}

// ============================================================================
// Schema-constrained search
// ============================================================================

#[test]
fn test_covariance_query_only_follows_covariance_edges() {
    let e = engine(brca1_graph(vec![
        Edge::new("Gene::672", "Gene::580", RelationCode::GeneCovariesGene),
        Edge::new("Gene::672", "Gene::79728", RelationCode::GeneInteractsGene),
    ]));

    let result = e.retrieve("What genes covary with BRCA1?");

    assert_eq!(result.outcome, RetrievalOutcome::Ok);
    assert_eq!(result.intent_tag, "gene-covariance");
    assert!(!result.fallback_applied);
    assert_eq!(result.anchors.len(), 1);
    assert_eq!(result.anchors[0].id.as_str(), "Gene::672");
    assert_eq!(result.anchors[0].tier, MatchTier::Synonym);

    assert_eq!(result.paths.len(), 1);
    let path = &result.paths[0];
    assert_eq!(path.node_ids(), vec!["Gene::672", "Gene::580"]);
    assert_eq!(path.relations(), vec![RelationCode::GeneCovariesGene]);
    assert_eq!(path.rank, 1);
    assert_eq!(path.hop_count, 1);
    assert_eq!(path.end_kind, "Gene");
    assert!(result.summary.contains("intent=gene-covariance"));
    assert!(result.summary.contains("fallback=no; paths=1"));
}

#[test]
fn test_fallback_to_interaction_when_no_covariance_edges() {
    let e = engine(brca1_graph(vec![Edge::new(
        "Gene::672",
        "Gene::79728",
        RelationCode::GeneInteractsGene,
    )]));

    let result = e.retrieve("What genes covary with BRCA1?");

    assert_eq!(result.outcome, RetrievalOutcome::Fallback);
    assert!(result.fallback_applied);
    assert_eq!(result.fallback_intent, Some(IntentTag::GeneInteraction));
    // The reported schema stays the classified one.
    assert_eq!(result.schema.intent(), IntentTag::GeneCovariance);

    assert_eq!(result.paths.len(), 1);
    let path = &result.paths[0];
    assert_eq!(path.node_ids(), vec!["Gene::672", "Gene::79728"]);
    assert!(path.notes.contains("fallback"));
    assert!(path.notes.contains("gene-interaction"));
    assert!(result.summary.contains("fallback=yes via gene-interaction"));
}

#[test]
fn test_no_paths_after_fallback_suggests_relaxing() {
    let e = engine(brca1_graph(vec![]));

    let result = e.retrieve("What genes covary with BRCA1?");

    assert_eq!(result.outcome, RetrievalOutcome::NoPaths);
    assert!(result.fallback_applied);
    assert!(result.is_empty());
    assert_eq!(result.anchors.len(), 1);
    assert!(result.summary.contains("paths=0"));
    assert!(result.summary.contains("consider relaxing"));
}

// ============================================================================
// Anchor selection
// ============================================================================

#[test]
fn test_substring_disease_does_not_anchor_gene_question() {
    let graph = MemoryGraph::from_parts(
        [
            Node::new("Gene::351", "APP", NodeKind::Gene),
            Node::new("Disease::DOID:10652", "Alzheimer's disease", NodeKind::Disease),
        ],
        [Edge::new(
            "Disease::DOID:10652",
            "Gene::351",
            RelationCode::DiseaseAssociatesGene,
        )],
    )
    .unwrap();
    let e = engine(graph);

    let result = e.retrieve("Which genes covary in alzheimer?");

    let hit = result.resolved.get("alzheimer").expect("token should resolve");
    assert_eq!(hit.kind, NodeKind::Disease);
    assert_eq!(hit.tier, MatchTier::Substring);
    // Generic "genes" is dropped once something specific resolved.
    assert!(result.resolved.get("genes").is_none());

    assert!(result.anchors.is_empty());
    assert!(result.paths.is_empty());
    assert_eq!(result.outcome, RetrievalOutcome::NoAnchors);
    assert!(!result.fallback_applied);
    assert!(result.summary.contains("no entity could be linked"));
}

#[test]
fn test_literal_disease_name_anchors_when_nothing_exact() {
    let graph = MemoryGraph::from_parts(
        [
            Node::new("Gene::672", "BRCA1", NodeKind::Gene),
            Node::new("Disease::DOID:1612", "breast cancer", NodeKind::Disease),
        ],
        [Edge::new(
            "Disease::DOID:1612",
            "Gene::672",
            RelationCode::DiseaseAssociatesGene,
        )],
    )
    .unwrap();
    let e = engine(graph);

    let result = e.retrieve("Which genes are associated with breast cancer?");

    assert_eq!(result.anchors.len(), 1);
    assert_eq!(result.anchors[0].kind, NodeKind::Disease);
    assert_eq!(result.outcome, RetrievalOutcome::Ok);
    assert_eq!(result.paths[0].node_ids(), vec!["Disease::DOID:1612", "Gene::672"]);
}

#[test]
fn test_symbol_never_resolves_to_longer_symbol() {
    let without_tp53 = MemoryGraph::from_parts(
        [
            Node::new("Gene::112858", "TP53RK", NodeKind::Gene),
            Node::new("Gene::4193", "MDM2", NodeKind::Gene),
        ],
        [Edge::new("Gene::112858", "Gene::4193", RelationCode::GeneInteractsGene)],
    )
    .unwrap();
    let e = engine(without_tp53);
    let result = e.retrieve("What does TP53 interact with?");
    assert!(result.resolved.get("TP53").is_none());
    assert_eq!(result.outcome, RetrievalOutcome::NoAnchors);

    let with_tp53 = MemoryGraph::from_parts(
        [
            Node::new("Gene::112858", "TP53RK", NodeKind::Gene),
            Node::new("Gene::7157", "TP53", NodeKind::Gene),
            Node::new("Gene::4193", "MDM2", NodeKind::Gene),
        ],
        [
            Edge::new("Gene::112858", "Gene::4193", RelationCode::GeneInteractsGene),
            Edge::new("Gene::7157", "Gene::4193", RelationCode::GeneInteractsGene),
        ],
    )
    .unwrap();
    let e = engine(with_tp53);
    let result = e.retrieve("What does TP53 interact with?");
    assert_eq!(result.resolved.get("TP53").unwrap().node.as_str(), "Gene::7157");
    assert_eq!(result.paths.len(), 1);
    assert_eq!(result.paths[0].node_ids(), vec!["Gene::7157", "Gene::4193"]);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_hop_limit_zero_returns_anchor_only() {
    init_tracing();
    let graph = brca1_graph(vec![Edge::new(
        "Gene::672",
        "Gene::580",
        RelationCode::GeneCovariesGene,
    )]);
    let e = RetrievalEngine::with_config(
        Arc::new(graph),
        RetrievalConfig::default().hop_limit_override(Some(0)),
    )
    .unwrap();

    let result = e.retrieve("What genes covary with BRCA1?");

    assert_eq!(result.schema.hops(), 0);
    assert_eq!(result.outcome, RetrievalOutcome::Ok);
    assert_eq!(result.paths.len(), 1);
    assert_eq!(result.paths[0].hop_count, 0);
    assert_eq!(result.paths[0].node_ids(), vec!["Gene::672"]);
    assert!(result.paths[0].relations().is_empty());
}

#[test]
fn test_top_k_bounds_result_count() {
    init_tracing();
    let mut nodes = vec![Node::new("Gene::672", "BRCA1", NodeKind::Gene)];
    let mut edges = Vec::new();
    for i in 0..8 {
        let id = format!("Gene::p{i}");
        nodes.push(Node::new(id.as_str(), format!("PARTNER{i}"), NodeKind::Gene));
        edges.push(Edge::new("Gene::672", id.as_str(), RelationCode::GeneInteractsGene));
    }
    let graph = MemoryGraph::from_parts(nodes, edges).unwrap();
    let e = RetrievalEngine::with_config(Arc::new(graph), RetrievalConfig::default().top_k(3))
        .unwrap();

    let result = e.retrieve("Which genes interact with BRCA1?");

    assert_eq!(result.paths.len(), 3);
    let ranks: Vec<usize> = result.paths.iter().map(|p| p.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert!(result
        .paths
        .windows(2)
        .all(|w| w[0].score >= w[1].score));
}

// ============================================================================
// Determinism and Concurrency
// ============================================================================

fn mixed_graph() -> MemoryGraph {
    MemoryGraph::from_parts(
        [
            Node::new("Gene::672", "BRCA1", NodeKind::Gene),
            Node::new("Gene::580", "BARD1", NodeKind::Gene),
            Node::new("Gene::79728", "PALB2", NodeKind::Gene),
            Node::new("Disease::DOID:1612", "breast cancer", NodeKind::Disease),
            Node::new("Compound::DB00675", "Tamoxifen", NodeKind::Compound),
        ],
        [
            Edge::new("Gene::672", "Gene::580", RelationCode::GeneCovariesGene),
            Edge::new("Gene::672", "Gene::79728", RelationCode::GeneInteractsGene),
            Edge::new("Disease::DOID:1612", "Gene::672", RelationCode::DiseaseAssociatesGene)
                .evidence_count(5)
                .unbiased(true),
            Edge::new("Compound::DB00675", "Disease::DOID:1612", RelationCode::CompoundTreatsDisease)
                .source_count(2),
            Edge::new("Disease::DOID:1612", "Compound::DB00675", RelationCode::DiseaseTreatedByCompound),
        ],
    )
    .unwrap()
}

const QUERIES: &[&str] = &[
    "What genes covary with BRCA1?",
    "Which drugs treat breast cancer?",
    "Which genes are associated with breast cancer?",
    "Tell me about BRCA1",
    "Which genes covary in alzheimer?",
];

#[test]
fn test_retrieval_is_deterministic() {
    let e = engine(mixed_graph());
    for query in QUERIES {
        let first = e.retrieve(query);
        let second = e.retrieve(query);
        assert_eq!(first, second, "query {query:?} is not deterministic");
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }
}

#[test]
fn test_concurrent_queries_match_sequential() {
    let e = engine(mixed_graph());
    let expected: Vec<RetrievalResult> = QUERIES.iter().map(|q| e.retrieve(q)).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| QUERIES.iter().map(|q| e.retrieve(q)).collect::<Vec<_>>())
            })
            .collect();
        for handle in handles {
            let got = handle.join().expect("worker panicked");
            assert_eq!(got, expected);
        }
    });
}

// ============================================================================
// Output shape
// ============================================================================

#[test]
fn test_result_json_shape() {
    let e = engine(mixed_graph());
    let result = e.retrieve("Which drugs treat breast cancer?");
    assert_eq!(result.outcome, RetrievalOutcome::Ok);

    let json = result.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["outcome"], "ok");
    assert_eq!(value["intent_tag"], "disease-treated-by-compound");
    assert_eq!(value["fallback_applied"], false);
    assert!(value.get("fallback_intent").is_none());

    let first = &value["paths"][0];
    assert_eq!(first["rank"], 1);
    let elements = first["path"].as_array().unwrap();
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[0]["type"], "node");
    assert_eq!(elements[0]["name"], "breast cancer");
    assert_eq!(elements[1]["type"], "edge");
    assert_eq!(elements[1]["abbrev"], "DtC");
    assert_eq!(elements[2]["type"], "node");
    assert_eq!(elements[2]["id"], "Compound::DB00675");

    let score = first["score"].as_f64().unwrap();
    assert!(score > 0.0 && score <= 1.05);
}

#[test]
fn test_edge_metadata_reaches_records() {
    let e = engine(mixed_graph());
    let result = e.retrieve("Which genes are associated with breast cancer?");
    let edge = result.paths[0]
        .path
        .iter()
        .find_map(|el| match el {
            PathElement::Edge {
                evidence_count,
                unbiased,
                ..
            } => Some((*evidence_count, *unbiased)),
            PathElement::Node { .. } => None,
        })
        .unwrap();
    assert_eq!(edge, (Some(5), Some(true)));
}

// ============================================================================
// Cross-lingual and unknown relations
// ============================================================================

#[test]
fn test_persian_query_links_through_translation() {
    let graph = MemoryGraph::from_parts(
        [
            Node::new("Gene::3630", "INS", NodeKind::Gene),
            Node::new("Disease::DOID:9352", "diabetes", NodeKind::Disease),
        ],
        [Edge::new(
            "Disease::DOID:9352",
            "Gene::3630",
            RelationCode::DiseaseAssociatesGene,
        )],
    )
    .unwrap();
    let e = engine(graph);

    let result = e.retrieve("ژن مرتبط دیابت");

    assert_eq!(result.schema.intent(), IntentTag::DiseaseGeneAssociation);
    let hit = result.resolved.get("دیابت").expect("translated token should resolve");
    assert!(hit.translated);
    assert_eq!(hit.node.as_str(), "Disease::DOID:9352");
    assert_eq!(result.anchors.len(), 1);
    assert_eq!(result.outcome, RetrievalOutcome::Ok);
    assert_eq!(result.paths[0].node_ids(), vec!["Disease::DOID:9352", "Gene::3630"]);
}

#[test]
fn test_unknown_relation_is_traversed_and_flagged() {
    let e = engine(brca1_graph(vec![Edge::new(
        "Gene::672",
        "Gene::580",
        RelationCode::Unknown,
    )]));

    let result = e.retrieve("Tell me about BRCA1");

    assert_eq!(result.schema.intent(), IntentTag::General);
    assert_eq!(result.outcome, RetrievalOutcome::Ok);
    assert_eq!(result.paths.len(), 1);
    assert_eq!(result.paths[0].relations(), vec![RelationCode::Unknown]);
    assert!(result.paths[0].notes.contains("unknown relation"));
}

// ============================================================================
// Queries that fire more than one rule
// ============================================================================

fn migraine_graph() -> MemoryGraph {
    MemoryGraph::from_parts(
        [
            Node::new("Disease::DOID:6364", "migraine", NodeKind::Disease),
            Node::new("Compound::DB00669", "Sumatriptan", NodeKind::Compound),
            Node::new("Symptom::D006261", "Headache", NodeKind::Symptom),
            Node::new("SideEffect::C0027497", "Nausea", NodeKind::SideEffect),
        ],
        [
            Edge::new(
                "Disease::DOID:6364",
                "Compound::DB00669",
                RelationCode::DiseaseTreatedByCompound,
            ),
            Edge::new(
                "Disease::DOID:6364",
                "Symptom::D006261",
                RelationCode::DiseasePresentsSymptom,
            ),
            Edge::new(
                "Compound::DB00669",
                "SideEffect::C0027497",
                RelationCode::CompoundCausesSideEffect,
            ),
        ],
    )
    .unwrap()
}

#[test]
fn test_treats_and_symptom_query_returns_both_answers() {
    let e = engine(migraine_graph());

    let result = e.retrieve("Which drugs treat migraine and what symptoms does it present with?");

    assert_eq!(result.intent_tag, "disease-treated-by-compound+disease-symptom");
    assert_eq!(result.anchors.len(), 1);
    assert_eq!(result.anchors[0].id.as_str(), "Disease::DOID:6364");
    assert_eq!(result.outcome, RetrievalOutcome::Ok);
    assert!(!result.fallback_applied);

    let mut found: Vec<Vec<&str>> = result.paths.iter().map(|p| p.node_ids()).collect();
    found.sort();
    assert_eq!(
        found,
        vec![
            vec!["Disease::DOID:6364", "Compound::DB00669"],
            vec!["Disease::DOID:6364", "Symptom::D006261"],
        ]
    );
    assert!(result.summary.contains("fallback=no; paths=2"));
}

#[test]
fn test_side_effects_a_compound_causes() {
    let e = engine(migraine_graph());

    let result = e.retrieve("What side effects does sumatriptan cause?");

    assert_eq!(result.intent_tag, "compound-side-effect");
    assert_eq!(result.outcome, RetrievalOutcome::Ok);
    assert_eq!(result.paths.len(), 1);
    assert_eq!(
        result.paths[0].node_ids(),
        vec!["Compound::DB00669", "SideEffect::C0027497"]
    );
}

#[test]
fn test_side_effect_answer_survives_a_second_intent() {
    let e = engine(migraine_graph());

    let result = e.retrieve("What side effects and associated risks does sumatriptan have?");

    assert_eq!(result.intent_tag, "compound-side-effect+disease-gene-association");
    assert_eq!(result.outcome, RetrievalOutcome::Ok);
    assert_eq!(result.paths.len(), 1);
    assert_eq!(result.paths[0].relations(), vec![RelationCode::CompoundCausesSideEffect]);
    assert_eq!(result.paths[0].end_kind, "Side Effect");
}

#[test]
fn test_interaction_and_pathway_query_reaches_every_kind() {
    let graph = MemoryGraph::from_parts(
        [
            Node::new("Gene::7157", "TP53", NodeKind::Gene),
            Node::new("Gene::4193", "MDM2", NodeKind::Gene),
            Node::new("Pathway::R-HSA-109581", "Apoptosis", NodeKind::Pathway),
            Node::new("BiologicalProcess::GO:0006915", "apoptotic process", NodeKind::BiologicalProcess),
        ],
        [
            Edge::new("Gene::7157", "Gene::4193", RelationCode::GeneInteractsGene),
            Edge::new("Gene::7157", "Pathway::R-HSA-109581", RelationCode::GeneParticipatesPathway),
            Edge::new(
                "Gene::7157",
                "BiologicalProcess::GO:0006915",
                RelationCode::GeneParticipatesBiologicalProcess,
            ),
        ],
    )
    .unwrap();
    let e = engine(graph);

    let result = e.retrieve("Which genes interact with TP53 and what pathway signaling is involved in it?");

    assert_eq!(
        result.intent_tag,
        "gene-interaction+gene-pathway+biological-participation"
    );
    assert_eq!(result.outcome, RetrievalOutcome::Ok);
    let mut ends: Vec<&str> = result.paths.iter().map(|p| p.end_kind.as_str()).collect();
    ends.sort();
    assert_eq!(ends, vec!["Biological Process", "Gene", "Pathway"]);
}
