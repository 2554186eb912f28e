//! Rule-table audits and per-rule classification checks.

use biokg_graph::{NodeKind, RelationCode};
use biokg_retrieval::*;
use std::collections::HashSet;

// ============================================================================
// Table Audits
// ============================================================================

#[test]
fn tags_are_unique() {
    let rules = standard_rules();
    let mut seen = HashSet::new();
    for rule in &rules {
        assert!(seen.insert(rule.tag), "duplicate rule for {}", rule.tag);
    }
}

#[test]
fn fallbacks_point_at_existing_rules_and_never_to_self() {
    let classifier = IntentClassifier::default();
    for rule in classifier.rules() {
        if let Some(proxy) = rule.fallback {
            assert_ne!(proxy, rule.tag);
            assert!(classifier.rule(proxy).is_some(), "{} falls back to missing {}", rule.tag, proxy);
        }
    }
}

#[test]
fn allowed_relations_are_known_codes() {
    for rule in standard_rules() {
        for code in &rule.allow {
            assert_ne!(*code, RelationCode::Unknown, "{} allows Unknown", rule.tag);
        }
    }
}

#[test]
fn end_kinds_are_reachable_from_allowed_relations() {
    // Every declared end kind must be the target of some allowed relation,
    // otherwise the rule can never record a path.
    for rule in standard_rules() {
        let Some(end) = &rule.end_kind else { continue };
        let targets: HashSet<NodeKind> = rule
            .allow
            .iter()
            .filter_map(|c| c.endpoints())
            .map(|(_, target)| target)
            .collect();
        for kind in end.kinds() {
            assert!(
                targets.contains(kind) || rule.allow.is_empty(),
                "{} ends on {} but no allowed relation reaches it",
                rule.tag,
                kind
            );
        }
    }
}

#[test]
fn similarity_stays_denied_outside_similarity_intents() {
    let classifier = IntentClassifier::default();
    for rule in classifier.rules() {
        let schema = classifier.template(rule.tag);
        let lifts_similarity = matches!(
            rule.tag,
            IntentTag::DiseaseSimilarity | IntentTag::CompoundSimilarity | IntentTag::GeneralRelaxed
        );
        if !lifts_similarity {
            assert!(!schema.admits(RelationCode::DiseaseResemblesDisease), "{}", rule.tag);
            assert!(!schema.admits(RelationCode::CompoundResemblesCompound), "{}", rule.tag);
        }
    }
}

// ============================================================================
// Rule-by-rule Classification
// ============================================================================

fn primary(query: &str) -> IntentTag {
    IntentClassifier::default().classify(query).intent()
}

#[test]
fn each_rule_fires_on_a_representative_query() {
    let cases = [
        ("Which genes covary with TP53?", IntentTag::GeneCovariance),
        ("What does EGFR interact with?", IntentTag::GeneInteraction),
        ("Which genes does MYC regulate?", IntentTag::GeneRegulation),
        ("Which drugs treat asthma?", IntentTag::DiseaseTreatedByCompound),
        ("What palliates migraine?", IntentTag::DiseasePalliatedByCompoundOrClass),
        ("Which compounds downregulate EGFR?", IntentTag::CompoundGeneRegulation),
        ("Which compounds bind ESR1?", IntentTag::CompoundBindsGene),
        ("What are the side effects of aspirin?", IntentTag::CompoundSideEffect),
        ("Which pharmacologic class includes ibuprofen?", IntentTag::CompoundClass),
        ("Where is APOE found in the body?", IntentTag::GeneExpressionLocation),
        ("Which genes are expressed in the heart?", IntentTag::AnatomyExpression),
        ("Which pathway includes KRAS?", IntentTag::GenePathway),
        ("Which biological process involves BID?", IntentTag::BiologicalParticipation),
        ("Which genes are associated with asthma?", IntentTag::DiseaseGeneAssociation),
        ("Which genes are dysregulated in lupus?", IntentTag::DiseaseGeneRegulation),
        ("What are the symptoms of influenza?", IntentTag::DiseaseSymptom),
        ("Which tissue does psoriasis localize to?", IntentTag::DiseaseLocalization),
        ("Which diseases resemble asthma?", IntentTag::DiseaseSimilarity),
        ("Which drugs are similar to aspirin?", IntentTag::CompoundSimilarity),
        ("How does metformin treat diabetes through its target genes?", IntentTag::TreatmentMechanism),
        ("Which compounds downregulate genes expressed in the liver?", IntentTag::ExpressionRegulation),
        ("Tell me about BRCA1", IntentTag::General),
    ];
    for (query, expected) in cases {
        assert_eq!(primary(query), expected, "query: {query}");
    }
}

#[test]
fn combined_triggers_accumulate_relations() {
    let schema = IntentClassifier::default()
        .classify("Which drugs treat migraine and what symptoms does it present with?");
    assert_eq!(schema.intent(), IntentTag::DiseaseTreatedByCompound);
    assert!(schema.matched().contains(&IntentTag::DiseaseSymptom));
    assert!(schema.admits(RelationCode::CompoundTreatsDisease));
    assert!(schema.admits(RelationCode::DiseasePresentsSymptom));
    assert!(schema.accepts_end(NodeKind::Symptom));
    assert!(schema.accepts_end(NodeKind::Compound));
    assert!(!schema.accepts_end(NodeKind::Gene));

    // each rule keeps its own constraints
    let targets = schema.targets();
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].intent, IntentTag::DiseaseTreatedByCompound);
    assert_eq!(targets[0].constraints.len(), 1);
    assert_eq!(targets[1].intent, IntentTag::DiseaseSymptom);
    assert!(targets[1].constraints.is_empty());
    assert!(schema.accepts_path(
        &[RelationCode::DiseasePresentsSymptom],
        &[NodeKind::Disease, NodeKind::Symptom]
    ));
}

#[test]
fn causes_reads_as_a_side_effect_question() {
    let schema = IntentClassifier::default().classify("What side effects does sumatriptan cause?");
    assert_eq!(schema.intent(), IntentTag::CompoundSideEffect);
    assert_eq!(schema.matched(), vec![IntentTag::CompoundSideEffect]);
    assert_eq!(primary("Which adverse reactions can ibuprofen cause?"), IntentTag::CompoundSideEffect);
}
