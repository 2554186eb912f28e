//! Schema configuration: the constraint set a query is searched under.
//!
//! A [`SchemaConfig`] is produced once per query (by classification or by
//! the fallback controller) and never mutated afterwards; the builder
//! methods consume and return a new value.
//!
//! ## Invariants
//!
//! - `allow` and `deny` are disjoint (a later `allow`/`deny` call wins)
//! - an empty `allow` set means "any relation not denied"
//! - `end_kind`, when present, is never empty
//! - there is one [`PathTarget`] per contributing intent, the primary's
//!   first; a path is kept when any single target accepts it, so one
//!   intent's end kind or constraints never filter another intent's answers

use biokg_graph::{NodeKind, RelationCode};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Similarity codes stay out of searches unless a query asks for them.
pub const DEFAULT_DENY: [RelationCode; 2] = [
    RelationCode::DiseaseResemblesDisease,
    RelationCode::CompoundResemblesCompound,
];

pub const DEFAULT_HOP_LIMIT: usize = 2;

// ============================================================================
// Intent Tags
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentTag {
    General,
    GeneralRelaxed,
    GeneCovariance,
    GeneInteraction,
    GeneRegulation,
    AnatomyExpression,
    AnatomyRegulation,
    GeneExpressionLocation,
    BiologicalParticipation,
    GenePathway,
    DiseaseGeneAssociation,
    DiseaseGeneRegulation,
    DiseaseTreatedByCompound,
    DiseasePalliatedByCompoundOrClass,
    CompoundGeneRegulation,
    CompoundBindsGene,
    CompoundSideEffect,
    CompoundClass,
    DiseaseSymptom,
    DiseaseLocalization,
    DiseaseSimilarity,
    CompoundSimilarity,
    TreatmentMechanism,
    ExpressionRegulation,
}

impl IntentTag {
    pub fn as_str(self) -> &'static str {
        match self {
            IntentTag::General => "general",
            IntentTag::GeneralRelaxed => "general-relaxed",
            IntentTag::GeneCovariance => "gene-covariance",
            IntentTag::GeneInteraction => "gene-interaction",
            IntentTag::GeneRegulation => "gene-regulation",
            IntentTag::AnatomyExpression => "anatomy-expression",
            IntentTag::AnatomyRegulation => "anatomy-regulation",
            IntentTag::GeneExpressionLocation => "gene-expression-location",
            IntentTag::BiologicalParticipation => "biological-participation",
            IntentTag::GenePathway => "gene-pathway",
            IntentTag::DiseaseGeneAssociation => "disease-gene-association",
            IntentTag::DiseaseGeneRegulation => "disease-gene-regulation",
            IntentTag::DiseaseTreatedByCompound => "disease-treated-by-compound",
            IntentTag::DiseasePalliatedByCompoundOrClass => "disease-palliated-by-compound-or-class",
            IntentTag::CompoundGeneRegulation => "compound-gene-regulation",
            IntentTag::CompoundBindsGene => "compound-binds-gene",
            IntentTag::CompoundSideEffect => "compound-side-effect",
            IntentTag::CompoundClass => "compound-class",
            IntentTag::DiseaseSymptom => "disease-symptom",
            IntentTag::DiseaseLocalization => "disease-localization",
            IntentTag::DiseaseSimilarity => "disease-similarity",
            IntentTag::CompoundSimilarity => "compound-similarity",
            IntentTag::TreatmentMechanism => "treatment-mechanism",
            IntentTag::ExpressionRegulation => "expression-regulation",
        }
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// End Kind and Structural Constraints
// ============================================================================

/// Kinds a recorded path may end on (a single kind or an alternation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EndKind(Vec<NodeKind>);

impl EndKind {
    pub fn one(kind: NodeKind) -> Self {
        Self(vec![kind])
    }

    /// Alternation; `None` when `kinds` is empty.
    pub fn any_of(kinds: impl IntoIterator<Item = NodeKind>) -> Option<Self> {
        let mut kinds: Vec<NodeKind> = kinds.into_iter().collect();
        kinds.dedup();
        (!kinds.is_empty()).then_some(Self(kinds))
    }

    pub fn accepts(&self, kind: NodeKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn kinds(&self) -> &[NodeKind] {
        &self.0
    }
}

impl fmt::Display for EndKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(|k| k.label()).collect();
        f.write_str(&labels.join("|"))
    }
}

/// Structural requirement on a path's relation sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// Some edge uses one of `any_of`; with `touching`, that edge must have
    /// an endpoint of the given kind.
    RequiresRelation {
        any_of: Vec<RelationCode>,
        touching: Option<NodeKind>,
    },
    /// The first edge uses one of `any_of`.
    StartsWith { any_of: Vec<RelationCode> },
    /// The relation sequence equals one of `sequences` exactly.
    Pattern { sequences: Vec<Vec<RelationCode>> },
}

impl Constraint {
    /// Check a complete path. `kinds` has one entry per node, so
    /// `kinds.len() == relations.len() + 1`.
    pub fn holds(&self, relations: &[RelationCode], kinds: &[NodeKind]) -> bool {
        match self {
            Constraint::RequiresRelation { any_of, touching } => {
                relations.iter().enumerate().any(|(i, rel)| {
                    any_of.contains(rel)
                        && touching.map_or(true, |kind| {
                            kinds.get(i) == Some(&kind) || kinds.get(i + 1) == Some(&kind)
                        })
                })
            }
            Constraint::StartsWith { any_of } => {
                relations.first().is_some_and(|first| any_of.contains(first))
            }
            Constraint::Pattern { sequences } => {
                sequences.iter().any(|seq| seq.as_slice() == relations)
            }
        }
    }

    /// Whether a partial path can still be extended into one that holds.
    pub fn admits_prefix(&self, relations: &[RelationCode]) -> bool {
        match self {
            Constraint::RequiresRelation { .. } => true,
            Constraint::StartsWith { any_of } => {
                relations.first().map_or(true, |first| any_of.contains(first))
            }
            Constraint::Pattern { sequences } => sequences
                .iter()
                .any(|seq| seq.len() >= relations.len() && &seq[..relations.len()] == relations),
        }
    }
}

// ============================================================================
// Path Targets
// ============================================================================

/// What one contributing intent accepts as a finished path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathTarget {
    pub intent: IntentTag,
    pub end_kind: Option<EndKind>,
    pub hop_limit: usize,
    pub constraints: Vec<Constraint>,
}

impl PathTarget {
    /// Any end kind, default hop limit, no constraints.
    pub fn new(intent: IntentTag) -> Self {
        Self {
            intent,
            end_kind: None,
            hop_limit: DEFAULT_HOP_LIMIT,
            constraints: Vec::new(),
        }
    }

    pub fn accepts_end(&self, kind: NodeKind) -> bool {
        self.end_kind.as_ref().map_or(true, |end| end.accepts(kind))
    }

    /// Check a complete path against hop limit, end kind and constraints.
    pub fn accepts(&self, relations: &[RelationCode], kinds: &[NodeKind]) -> bool {
        relations.len() <= self.hop_limit
            && kinds.last().is_some_and(|&kind| self.accepts_end(kind))
            && self.constraints.iter().all(|c| c.holds(relations, kinds))
    }

    /// Whether a partial path can still become one this target accepts.
    pub fn admits_prefix(&self, relations: &[RelationCode]) -> bool {
        relations.len() <= self.hop_limit
            && self.constraints.iter().all(|c| c.admits_prefix(relations))
    }
}

// ============================================================================
// Schema Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaConfig {
    intent: IntentTag,
    #[serde(serialize_with = "serialize_abbrevs")]
    allow: BTreeSet<RelationCode>,
    #[serde(serialize_with = "serialize_abbrevs")]
    deny: BTreeSet<RelationCode>,
    /// One per contributing intent, primary first. Never empty.
    targets: Vec<PathTarget>,
    #[serde(skip)]
    anchor_kinds: BTreeSet<NodeKind>,
}

fn serialize_abbrevs<S: Serializer>(
    codes: &BTreeSet<RelationCode>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(codes.iter().map(|c| c.abbrev()))
}

impl SchemaConfig {
    /// The unconstrained default: any relation except similarity, two hops.
    pub fn new(intent: IntentTag) -> Self {
        Self {
            intent,
            allow: BTreeSet::new(),
            deny: DEFAULT_DENY.into_iter().collect(),
            targets: vec![PathTarget::new(intent)],
            anchor_kinds: BTreeSet::new(),
        }
    }

    pub fn allow(mut self, codes: impl IntoIterator<Item = RelationCode>) -> Self {
        for code in codes {
            self.deny.remove(&code);
            self.allow.insert(code);
        }
        self
    }

    pub fn deny(mut self, codes: impl IntoIterator<Item = RelationCode>) -> Self {
        for code in codes {
            self.allow.remove(&code);
            self.deny.insert(code);
        }
        self
    }

    /// Remove codes from `deny` without adding them to `allow`.
    pub fn undeny(mut self, codes: impl IntoIterator<Item = RelationCode>) -> Self {
        for code in codes {
            self.deny.remove(&code);
        }
        self
    }

    /// Add a contributing intent's target, replacing any earlier target for
    /// the same intent.
    pub fn target(mut self, target: PathTarget) -> Self {
        match self.targets.iter_mut().find(|t| t.intent == target.intent) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
        self
    }

    fn primary_mut(&mut self) -> &mut PathTarget {
        let intent = self.intent;
        let idx = self
            .targets
            .iter()
            .position(|t| t.intent == intent)
            .unwrap_or(0);
        &mut self.targets[idx]
    }

    /// Set the primary target's end kind.
    pub fn end_kind(mut self, end_kind: Option<EndKind>) -> Self {
        self.primary_mut().end_kind = end_kind;
        self
    }

    /// Override the hop limit of every target.
    pub fn hop_limit(mut self, hops: usize) -> Self {
        for target in &mut self.targets {
            target.hop_limit = hops;
        }
        self
    }

    /// Add a constraint to the primary target.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        let target = self.primary_mut();
        if !target.constraints.contains(&constraint) {
            target.constraints.push(constraint);
        }
        self
    }

    pub fn anchor_kinds(mut self, kinds: impl IntoIterator<Item = NodeKind>) -> Self {
        self.anchor_kinds.extend(kinds);
        self
    }

    pub fn intent(&self) -> IntentTag {
        self.intent
    }

    /// Every contributing intent, primary first.
    pub fn matched(&self) -> Vec<IntentTag> {
        self.targets.iter().map(|t| t.intent).collect()
    }

    /// Contributing intents joined with `+` ("treatment-mechanism+disease-symptom").
    pub fn intent_tag(&self) -> String {
        let tags: Vec<&str> = self.targets.iter().map(|t| t.intent.as_str()).collect();
        tags.join("+")
    }

    pub fn allowed(&self) -> &BTreeSet<RelationCode> {
        &self.allow
    }

    pub fn denied(&self) -> &BTreeSet<RelationCode> {
        &self.deny
    }

    pub fn targets(&self) -> &[PathTarget] {
        &self.targets
    }

    /// Search depth: the largest hop limit of any target.
    pub fn hops(&self) -> usize {
        self.targets.iter().map(|t| t.hop_limit).max().unwrap_or(0)
    }

    /// Preferred anchor kinds; empty means every kind is preferred.
    pub fn preferred_anchor_kinds(&self) -> &BTreeSet<NodeKind> {
        &self.anchor_kinds
    }

    pub fn prefers_anchor(&self, kind: NodeKind) -> bool {
        self.anchor_kinds.is_empty() || self.anchor_kinds.contains(&kind)
    }

    /// Edge admissibility: not denied, and allowed when `allow` is non-empty.
    pub fn admits(&self, relation: RelationCode) -> bool {
        !self.deny.contains(&relation) && (self.allow.is_empty() || self.allow.contains(&relation))
    }

    /// Some target would accept a path ending on `kind`.
    pub fn accepts_end(&self, kind: NodeKind) -> bool {
        self.targets.iter().any(|t| t.accepts_end(kind))
    }

    /// Some target accepts the complete path.
    pub fn accepts_path(&self, relations: &[RelationCode], kinds: &[NodeKind]) -> bool {
        self.targets.iter().any(|t| t.accepts(relations, kinds))
    }

    /// Some target could still accept an extension of this prefix.
    pub fn admits_prefix(&self, relations: &[RelationCode]) -> bool {
        self.targets.iter().any(|t| t.admits_prefix(relations))
    }

    /// Comma-separated abbreviations of the allowed set, or `"any"`.
    pub fn allowed_abbrevs(&self) -> String {
        if self.allow.is_empty() {
            return "any".to_string();
        }
        let codes: Vec<&str> = self.allow.iter().map(|c| c.abbrev()).collect();
        codes.join(",")
    }
}
