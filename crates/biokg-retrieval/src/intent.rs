//! Intent classification.
//!
//! A query is matched against an ordered rule table. Every rule whose cues
//! fire contributes to the resulting [`SchemaConfig`]:
//!
//! - allowed relations and preferred anchor kinds accumulate across rules
//! - end kind, hop limit and constraints stay with the rule that declared
//!   them; a path answers the query when any matched rule accepts it
//! - the first matching rule is the primary intent
//! - multi-hop rules sit first and suppress the single-hop rules they refine
//!
//! With no match the general schema applies. Rules also name the rule used
//! as a proxy when their own schema finds nothing.

use biokg_graph::{NodeKind, RelationCode};

use crate::lexicon::{contains_cue, with_translations};
use crate::schema::{
    Constraint, EndKind, IntentTag, PathTarget, SchemaConfig, DEFAULT_DENY, DEFAULT_HOP_LIMIT,
};

// ============================================================================
// Rules
// ============================================================================

#[derive(Debug, Clone)]
pub struct IntentRule {
    pub tag: IntentTag,
    /// Any one of these fires the rule. Empty means fallback-only.
    pub cues: Vec<&'static str>,
    /// Additionally, one cue from each group must be present.
    pub requires: Vec<Vec<&'static str>>,
    pub allow: Vec<RelationCode>,
    pub undeny: Vec<RelationCode>,
    pub end_kind: Option<EndKind>,
    pub hop_limit: Option<usize>,
    pub constraints: Vec<Constraint>,
    pub anchor_kinds: Vec<NodeKind>,
    pub suppresses: Vec<IntentTag>,
    pub fallback: Option<IntentTag>,
}

impl IntentRule {
    pub fn new(tag: IntentTag) -> Self {
        Self {
            tag,
            cues: Vec::new(),
            requires: Vec::new(),
            allow: Vec::new(),
            undeny: Vec::new(),
            end_kind: None,
            hop_limit: None,
            constraints: Vec::new(),
            anchor_kinds: Vec::new(),
            suppresses: Vec::new(),
            fallback: None,
        }
    }

    pub fn cues(mut self, cues: &[&'static str]) -> Self {
        self.cues = cues.to_vec();
        self
    }

    pub fn requires(mut self, group: &[&'static str]) -> Self {
        self.requires.push(group.to_vec());
        self
    }

    pub fn allow(mut self, codes: &[RelationCode]) -> Self {
        self.allow = codes.to_vec();
        self
    }

    pub fn undeny(mut self, codes: &[RelationCode]) -> Self {
        self.undeny = codes.to_vec();
        self
    }

    pub fn end(mut self, kinds: &[NodeKind]) -> Self {
        self.end_kind = EndKind::any_of(kinds.iter().copied());
        self
    }

    pub fn hops(mut self, hops: usize) -> Self {
        self.hop_limit = Some(hops);
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn anchors(mut self, kinds: &[NodeKind]) -> Self {
        self.anchor_kinds = kinds.to_vec();
        self
    }

    pub fn suppresses(mut self, tags: &[IntentTag]) -> Self {
        self.suppresses = tags.to_vec();
        self
    }

    pub fn fallback(mut self, tag: IntentTag) -> Self {
        self.fallback = Some(tag);
        self
    }

    /// `text` must already be lowercase.
    pub fn matches(&self, text: &str) -> bool {
        !self.cues.is_empty()
            && self.cues.iter().any(|cue| contains_cue(text, cue))
            && self
                .requires
                .iter()
                .all(|group| group.iter().any(|cue| contains_cue(text, cue)))
    }

    /// What this rule accepts as an answer.
    pub fn target(&self) -> PathTarget {
        PathTarget {
            intent: self.tag,
            end_kind: self.end_kind.clone(),
            hop_limit: self.hop_limit.unwrap_or(DEFAULT_HOP_LIMIT),
            constraints: self.constraints.clone(),
        }
    }

    /// Fold this rule into `schema`.
    fn apply(&self, schema: SchemaConfig) -> SchemaConfig {
        schema
            .allow(self.allow.iter().copied())
            .undeny(self.undeny.iter().copied())
            .anchor_kinds(self.anchor_kinds.iter().copied())
            .target(self.target())
    }

    /// Schema for this rule alone.
    pub fn schema(&self) -> SchemaConfig {
        self.apply(SchemaConfig::new(self.tag))
    }
}

/// The built-in rule table, in priority order.
pub fn standard_rules() -> Vec<IntentRule> {
    use IntentTag as I;
    use NodeKind::*;
    use RelationCode::*;

    vec![
        // Multi-hop rules first: they refine single-hop ones.
        IntentRule::new(I::TreatmentMechanism)
            .cues(&["treat", "therap", "cure"])
            .requires(&["gene", "protein", "target", "mechanism"])
            .allow(&[
                CompoundTreatsDisease,
                DiseaseTreatedByCompound,
                DiseaseAssociatesGene,
                CompoundBindsGene,
                CompoundUpregulatesGene,
                CompoundDownregulatesGene,
            ])
            .end(&[Gene])
            .hops(2)
            .constraint(Constraint::RequiresRelation {
                any_of: vec![CompoundTreatsDisease, DiseaseTreatedByCompound],
                touching: Some(Disease),
            })
            .anchors(&[Disease, Compound])
            .suppresses(&[I::DiseaseTreatedByCompound])
            .fallback(I::DiseaseTreatedByCompound),
        IntentRule::new(I::ExpressionRegulation)
            .cues(&["upregulat", "downregulat", "regulat"])
            .requires(&["express"])
            .allow(&[
                CompoundUpregulatesGene,
                CompoundDownregulatesGene,
                GeneExpressesInAnatomy,
            ])
            .end(&[Anatomy])
            .hops(2)
            .constraint(Constraint::Pattern {
                sequences: vec![
                    vec![CompoundDownregulatesGene, GeneExpressesInAnatomy],
                    vec![CompoundUpregulatesGene, GeneExpressesInAnatomy],
                ],
            })
            .anchors(&[Compound])
            .suppresses(&[
                I::AnatomyExpression,
                I::CompoundGeneRegulation,
                I::DiseaseGeneRegulation,
                I::GeneRegulation,
            ])
            .fallback(I::CompoundGeneRegulation),
        // Gene-gene
        IntentRule::new(I::GeneCovariance)
            .cues(&["covar", "correlat", "coexpress", "co-express"])
            .allow(&[GeneCovariesGene])
            .end(&[Gene])
            .hops(1)
            .anchors(&[Gene])
            .fallback(I::GeneInteraction),
        IntentRule::new(I::GeneInteraction)
            .cues(&["interact", "partner"])
            .allow(&[GeneInteractsGene])
            .end(&[Gene])
            .hops(1)
            .anchors(&[Gene]),
        IntentRule::new(I::GeneRegulation)
            .cues(&["regulat", "controls"])
            .allow(&[GeneRegulatesGene])
            .end(&[Gene])
            .hops(1)
            .anchors(&[Gene])
            .fallback(I::GeneInteraction),
        // Therapeutics
        IntentRule::new(I::DiseaseTreatedByCompound)
            .cues(&["treat", "therap", "cure", "medication for", "drug for", "drugs for"])
            .allow(&[CompoundTreatsDisease, DiseaseTreatedByCompound])
            .end(&[Compound, Disease])
            .hops(1)
            .constraint(Constraint::RequiresRelation {
                any_of: vec![
                    CompoundTreatsDisease,
                    DiseaseTreatedByCompound,
                    CompoundPalliatesDisease,
                    DiseasePalliatedByCompound,
                ],
                touching: Some(Disease),
            })
            .anchors(&[Disease, Compound])
            .fallback(I::DiseasePalliatedByCompoundOrClass),
        IntentRule::new(I::DiseasePalliatedByCompoundOrClass)
            .cues(&["palliat", "relieve", "symptomatic relief"])
            .allow(&[
                CompoundPalliatesDisease,
                DiseasePalliatedByCompound,
                CompoundInPharmacologicClass,
                PharmacologicClassIncludesCompound,
            ])
            .end(&[Compound, PharmacologicClass, Disease])
            .hops(2)
            .constraint(Constraint::RequiresRelation {
                any_of: vec![CompoundPalliatesDisease, DiseasePalliatedByCompound],
                touching: Some(Disease),
            })
            .anchors(&[Disease, Compound]),
        IntentRule::new(I::CompoundGeneRegulation)
            .cues(&["upregulat", "downregulat", "inhibit", "activate"])
            .allow(&[
                CompoundUpregulatesGene,
                GeneUpregulatedByCompound,
                CompoundDownregulatesGene,
                GeneDownregulatedByCompound,
            ])
            .end(&[Gene, Compound])
            .hops(1)
            .anchors(&[Compound, Gene])
            .fallback(I::CompoundBindsGene),
        IntentRule::new(I::CompoundBindsGene)
            .cues(&["bind", "binding", "targets", "targeted by"])
            .allow(&[CompoundBindsGene, GeneBindsCompound])
            .end(&[Gene, Compound])
            .hops(1)
            .anchors(&[Compound, Gene])
            .fallback(I::CompoundGeneRegulation),
        IntentRule::new(I::CompoundSideEffect)
            .cues(&["side effect", "side-effect", "adverse", "toxicit", "cause"])
            .allow(&[CompoundCausesSideEffect, SideEffectCausedByCompound])
            .end(&[SideEffect, Compound])
            .hops(1)
            .anchors(&[Compound, SideEffect]),
        IntentRule::new(I::CompoundClass)
            .cues(&["pharmacologic", "drug class", "class of", "category"])
            .allow(&[PharmacologicClassIncludesCompound, CompoundInPharmacologicClass])
            .end(&[PharmacologicClass, Compound])
            .hops(1)
            .anchors(&[Compound, PharmacologicClass]),
        // Anatomy
        IntentRule::new(I::GeneExpressionLocation)
            .cues(&["where is", "where are", "where does", "located", "found in"])
            .allow(&[GeneExpressesInAnatomy])
            .end(&[Anatomy])
            .hops(1)
            .anchors(&[Gene])
            .fallback(I::AnatomyExpression),
        IntentRule::new(I::AnatomyExpression)
            .cues(&["express", "expression"])
            .allow(&[AnatomyExpressesGene, GeneExpressesInAnatomy])
            .end(&[Gene, Anatomy])
            .hops(1)
            .anchors(&[Anatomy, Gene])
            .fallback(I::AnatomyRegulation),
        IntentRule::new(I::AnatomyRegulation)
            .allow(&[
                AnatomyUpregulatesGene,
                GeneUpregulatedInAnatomy,
                AnatomyDownregulatesGene,
                GeneDownregulatedInAnatomy,
            ])
            .end(&[Gene, Anatomy])
            .hops(1)
            .anchors(&[Anatomy, Gene]),
        // Biology
        IntentRule::new(I::GenePathway)
            .cues(&["pathway", "signaling", "signalling", "cascade"])
            .allow(&[GeneParticipatesPathway, PathwayInvolvesGene])
            .hops(1)
            .anchors(&[Gene, Pathway])
            .fallback(I::BiologicalParticipation),
        IntentRule::new(I::BiologicalParticipation)
            .cues(&["participat", "involved in", "role in", "process", "function"])
            .allow(&[
                GeneParticipatesBiologicalProcess,
                BiologicalProcessInvolvesGene,
                GeneParticipatesMolecularFunction,
                MolecularFunctionInvolvesGene,
                GeneParticipatesCellularComponent,
                CellularComponentInvolvesGene,
            ])
            .hops(1)
            .anchors(&[
                Gene,
                BiologicalProcess,
                MolecularFunction,
                CellularComponent,
            ]),
        // Disease
        IntentRule::new(I::DiseaseGeneAssociation)
            .cues(&["associat", "linked to", "implicated", "risk"])
            .allow(&[DiseaseAssociatesGene, GeneAssociatesDisease])
            .end(&[Gene, Disease])
            .hops(1)
            .anchors(&[Disease, Gene])
            .fallback(I::DiseaseGeneRegulation),
        IntentRule::new(I::DiseaseGeneRegulation)
            .cues(&["upregulat", "downregulat", "overexpress", "dysregulat"])
            .allow(&[
                DiseaseUpregulatesGene,
                GeneUpregulatedInDisease,
                DiseaseDownregulatesGene,
                GeneDownregulatedInDisease,
            ])
            .end(&[Gene, Disease])
            .hops(1)
            .anchors(&[Disease, Gene])
            .fallback(I::DiseaseGeneAssociation),
        IntentRule::new(I::DiseaseSymptom)
            .cues(&["symptom", "manifestation", "presents with", "present with", "presentation"])
            .allow(&[DiseasePresentsSymptom, SymptomPresentsInDisease])
            .end(&[Symptom, Disease])
            .hops(1)
            .anchors(&[Disease, Symptom]),
        IntentRule::new(I::DiseaseLocalization)
            .cues(&["tissue", "localiz", "localis", "organ", "affects"])
            .allow(&[
                DiseaseLocalizesAnatomy,
                AnatomyLocalizesDisease,
                AnatomyExpressesGene,
            ])
            .hops(2)
            .constraint(Constraint::StartsWith {
                any_of: vec![DiseaseLocalizesAnatomy, AnatomyLocalizesDisease],
            })
            .anchors(&[Disease, Anatomy]),
        IntentRule::new(I::CompoundSimilarity)
            .cues(&["similar", "resembl", "alike", "analog"])
            .requires(&["drug", "compound", "medication"])
            .allow(&[CompoundResemblesCompound])
            .end(&[Compound])
            .hops(1)
            .anchors(&[Compound])
            .suppresses(&[I::DiseaseSimilarity]),
        IntentRule::new(I::DiseaseSimilarity)
            .cues(&["similar", "resembl", "alike"])
            .allow(&[DiseaseResemblesDisease])
            .end(&[Disease])
            .hops(1)
            .anchors(&[Disease])
            .fallback(I::DiseaseGeneAssociation),
        // Defaults
        IntentRule::new(I::General).fallback(I::GeneralRelaxed),
        IntentRule::new(I::GeneralRelaxed)
            .undeny(&DEFAULT_DENY)
            .hops(3),
    ]
}

// ============================================================================
// Classifier
// ============================================================================

pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(standard_rules())
    }
}

impl IntentClassifier {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn rule(&self, tag: IntentTag) -> Option<&IntentRule> {
        self.rules.iter().find(|r| r.tag == tag)
    }

    /// Schema for a single intent, as used by the fallback controller.
    pub fn template(&self, tag: IntentTag) -> SchemaConfig {
        match self.rule(tag) {
            Some(rule) => rule.schema(),
            None => SchemaConfig::new(tag),
        }
    }

    /// The proxy intent tried when `tag` finds no paths.
    pub fn fallback_for(&self, tag: IntentTag) -> Option<IntentTag> {
        self.rule(tag).and_then(|r| r.fallback)
    }

    /// Classify a free-text query. Never fails: unmatched queries get the
    /// general schema.
    pub fn classify(&self, query: &str) -> SchemaConfig {
        let text = with_translations(query).to_lowercase();

        let mut matched: Vec<&IntentRule> = Vec::new();
        let mut suppressed: Vec<IntentTag> = Vec::new();
        for rule in &self.rules {
            if suppressed.contains(&rule.tag) || !rule.matches(&text) {
                continue;
            }
            suppressed.extend(rule.suppresses.iter().copied());
            matched.push(rule);
        }

        let Some((primary, rest)) = matched.split_first() else {
            return self.template(IntentTag::General);
        };

        let mut schema = primary.schema();
        for rule in rest {
            schema = rule.apply(schema);
        }
        schema
    }
}
