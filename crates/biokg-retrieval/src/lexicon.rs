//! Static lookup tables used by resolution, classification and ranking.
//!
//! All tables are plain arrays of structs so they can be audited and
//! extended without touching the algorithms that consume them.

use biokg_graph::{NodeKind, RelationCode};

// ============================================================================
// Gene Synonyms
// ============================================================================

/// A curated gene with its canonical symbol and known name variants.
pub struct GeneSynonym {
    /// Lowercase lookup key.
    pub key: &'static str,
    pub canonical: &'static str,
    pub variants: &'static [&'static str],
}

pub const GENE_SYNONYMS: &[GeneSynonym] = &[
    GeneSynonym {
        key: "tp53",
        canonical: "TP53",
        variants: &["P53", "Tumor Protein P53", "Tumor Suppressor P53"],
    },
    GeneSynonym {
        key: "p53",
        canonical: "TP53",
        variants: &["Tumor Protein P53", "Tumor Suppressor P53"],
    },
    GeneSynonym {
        key: "brca1",
        canonical: "BRCA1",
        variants: &["Breast Cancer 1", "BRCA1 DNA Repair Associated"],
    },
    GeneSynonym {
        key: "brca2",
        canonical: "BRCA2",
        variants: &["Breast Cancer 2", "BRCA2 DNA Repair Associated"],
    },
    GeneSynonym {
        key: "apoe",
        canonical: "APOE",
        variants: &["Apolipoprotein E"],
    },
    GeneSynonym {
        key: "cftr",
        canonical: "CFTR",
        variants: &["Cystic Fibrosis Transmembrane Conductance Regulator"],
    },
    GeneSynonym {
        key: "mmp9",
        canonical: "MMP9",
        variants: &["Matrix Metallopeptidase 9"],
    },
    GeneSynonym {
        key: "bid",
        canonical: "BID",
        variants: &["BH3 Interacting Domain Death Agonist"],
    },
    GeneSynonym {
        key: "kcnq2",
        canonical: "KCNQ2",
        variants: &["Potassium Voltage-Gated Channel Subfamily Q Member 2"],
    },
    GeneSynonym {
        key: "hmgb3",
        canonical: "HMGB3",
        variants: &["High Mobility Group Box 3"],
    },
    GeneSynonym {
        key: "her2",
        canonical: "ERBB2",
        variants: &["Erb-B2 Receptor Tyrosine Kinase 2"],
    },
    GeneSynonym {
        key: "vegf",
        canonical: "VEGFA",
        variants: &["Vascular Endothelial Growth Factor A"],
    },
];

pub fn gene_synonym(token: &str) -> Option<&'static GeneSynonym> {
    let key = token.to_lowercase();
    GENE_SYNONYMS.iter().find(|s| s.key == key)
}

// ============================================================================
// Kind Keywords
// ============================================================================

/// Generic words that name a node kind rather than a node.
pub const KIND_KEYWORDS: &[(&str, NodeKind)] = &[
    ("gene", NodeKind::Gene),
    ("genes", NodeKind::Gene),
    ("protein", NodeKind::Gene),
    ("proteins", NodeKind::Gene),
    ("dna", NodeKind::Gene),
    ("rna", NodeKind::Gene),
    ("mrna", NodeKind::Gene),
    ("genetic", NodeKind::Gene),
    ("anatomy", NodeKind::Anatomy),
    ("anatomical", NodeKind::Anatomy),
    ("organ", NodeKind::Anatomy),
    ("organs", NodeKind::Anatomy),
    ("tissue", NodeKind::Anatomy),
    ("tissues", NodeKind::Anatomy),
    ("body", NodeKind::Anatomy),
    ("disease", NodeKind::Disease),
    ("diseases", NodeKind::Disease),
    ("disorder", NodeKind::Disease),
    ("disorders", NodeKind::Disease),
    ("syndrome", NodeKind::Disease),
    ("syndromes", NodeKind::Disease),
    ("cancer", NodeKind::Disease),
    ("cancers", NodeKind::Disease),
    ("tumor", NodeKind::Disease),
    ("tumors", NodeKind::Disease),
    ("compound", NodeKind::Compound),
    ("compounds", NodeKind::Compound),
    ("drug", NodeKind::Compound),
    ("drugs", NodeKind::Compound),
    ("medication", NodeKind::Compound),
    ("medications", NodeKind::Compound),
    ("medicine", NodeKind::Compound),
    ("medicines", NodeKind::Compound),
    ("chemical", NodeKind::Compound),
    ("molecule", NodeKind::Compound),
    ("process", NodeKind::BiologicalProcess),
    ("processes", NodeKind::BiologicalProcess),
    ("biological", NodeKind::BiologicalProcess),
    ("mechanism", NodeKind::BiologicalProcess),
    ("pathway", NodeKind::Pathway),
    ("pathways", NodeKind::Pathway),
    ("signaling", NodeKind::Pathway),
    ("cascade", NodeKind::Pathway),
    ("symptom", NodeKind::Symptom),
    ("symptoms", NodeKind::Symptom),
    ("manifestation", NodeKind::Symptom),
    ("manifestations", NodeKind::Symptom),
    ("side effect", NodeKind::SideEffect),
    ("side effects", NodeKind::SideEffect),
    ("adverse", NodeKind::SideEffect),
    ("toxicity", NodeKind::SideEffect),
    ("function", NodeKind::MolecularFunction),
    ("functions", NodeKind::MolecularFunction),
    ("activity", NodeKind::MolecularFunction),
    ("molecular", NodeKind::MolecularFunction),
    ("enzyme", NodeKind::MolecularFunction),
    ("receptor", NodeKind::MolecularFunction),
    ("cellular", NodeKind::CellularComponent),
    ("component", NodeKind::CellularComponent),
    ("organelle", NodeKind::CellularComponent),
    ("membrane", NodeKind::CellularComponent),
    ("pharmacologic", NodeKind::PharmacologicClass),
    ("pharmacological", NodeKind::PharmacologicClass),
    ("class", NodeKind::PharmacologicClass),
    ("category", NodeKind::PharmacologicClass),
];

pub fn kind_keyword(token: &str) -> Option<NodeKind> {
    let key = token.to_lowercase();
    KIND_KEYWORDS
        .iter()
        .find(|(word, _)| *word == key)
        .map(|(_, kind)| *kind)
}

// ============================================================================
// Cross-lingual Terms
// ============================================================================

/// Persian domain terms and their English equivalents.
pub const TRANSLATIONS: &[(&str, &str)] = &[
    ("ژن", "gene"),
    ("ژنها", "genes"),
    ("پروتئین", "protein"),
    ("بیماری", "disease"),
    ("بیماریها", "diseases"),
    ("دارو", "drug"),
    ("داروها", "drugs"),
    ("درمان", "treats"),
    ("سرطان", "cancer"),
    ("دیابت", "diabetes"),
    ("آلزایمر", "alzheimer"),
    ("قلب", "heart"),
    ("قلبی", "heart"),
    ("مغز", "brain"),
    ("کبد", "liver"),
    ("ریه", "lung"),
    ("کلیه", "kidney"),
    ("معده", "stomach"),
    ("پستان", "breast"),
    ("بافت", "tissue"),
    ("اندام", "organ"),
    ("علائم", "symptoms"),
    ("علامت", "symptom"),
    ("تب", "fever"),
    ("سردرد", "headache"),
    ("تهوع", "nausea"),
    ("مسیر", "pathway"),
    ("آپوپتوز", "apoptosis"),
    ("آسپرین", "aspirin"),
    ("متفورمین", "metformin"),
    ("بیان", "expressed"),
    ("عملکرد", "function"),
    ("تعامل", "interacts"),
    ("مرتبط", "associated"),
    ("مشابه", "similar"),
    ("عوارض", "side effects"),
];

pub fn translate(token: &str) -> Option<&'static str> {
    let trimmed = token.trim();
    TRANSLATIONS
        .iter()
        .find(|(fa, _)| *fa == trimmed)
        .map(|(_, en)| *en)
}

/// Append English equivalents of any Persian terms found in `text`.
///
/// Used so intent cues match queries written in either language.
pub fn with_translations(text: &str) -> String {
    let mut out = text.to_string();
    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if let Some(en) = translate(word) {
            out.push(' ');
            out.push_str(en);
        }
    }
    out
}

// ============================================================================
// Relation Cues
// ============================================================================

/// Query phrases that indicate a relation is what the user asked about.
///
/// Exhaustive over [`RelationCode`], so adding a code forces a decision here.
pub fn relation_cues(relation: RelationCode) -> &'static [&'static str] {
    use RelationCode::*;
    match relation {
        AnatomyExpressesGene | GeneExpressesInAnatomy => &["express", "expression"],
        AnatomyUpregulatesGene | GeneUpregulatedInAnatomy => &["upregulat", "overexpress"],
        AnatomyDownregulatesGene | GeneDownregulatedInAnatomy => &["downregulat", "underexpress"],
        DiseaseAssociatesGene | GeneAssociatesDisease => &["associat", "linked", "implicated"],
        DiseaseUpregulatesGene | GeneUpregulatedInDisease => &["upregulat", "overexpress"],
        DiseaseDownregulatesGene | GeneDownregulatedInDisease => &["downregulat"],
        CompoundTreatsDisease | DiseaseTreatedByCompound => &["treat", "therap", "cure"],
        CompoundPalliatesDisease | DiseasePalliatedByCompound => &["palliat", "relieve", "treat"],
        CompoundUpregulatesGene | GeneUpregulatedByCompound => &["upregulat", "increase"],
        CompoundDownregulatesGene | GeneDownregulatedByCompound => &["downregulat", "inhibit"],
        CompoundBindsGene | GeneBindsCompound => &["bind", "target"],
        DiseaseLocalizesAnatomy | AnatomyLocalizesDisease => &["locali", "tissue", "organ", "affect"],
        DiseasePresentsSymptom | SymptomPresentsInDisease => &["symptom", "present", "manifest"],
        CompoundCausesSideEffect | SideEffectCausedByCompound => &["side effect", "adverse", "toxic"],
        GeneParticipatesBiologicalProcess | BiologicalProcessInvolvesGene => {
            &["process", "participat", "involved"]
        }
        GeneParticipatesMolecularFunction | MolecularFunctionInvolvesGene => {
            &["function", "activity"]
        }
        GeneParticipatesCellularComponent | CellularComponentInvolvesGene => {
            &["component", "locali", "compartment"]
        }
        GeneParticipatesPathway | PathwayInvolvesGene => &["pathway", "signal"],
        PharmacologicClassIncludesCompound | CompoundInPharmacologicClass => &["class", "category"],
        GeneInteractsGene => &["interact", "partner"],
        GeneCovariesGene => &["covar", "correlat", "coexpress", "co-express"],
        GeneRegulatesGene => &["regulat", "control"],
        DiseaseResemblesDisease | CompoundResemblesCompound => &["similar", "resembl"],
        Unknown => &[],
    }
}

// ============================================================================
// Cue Matching
// ============================================================================

/// True when `cue` occurs in `text` at the start of a word.
///
/// Both arguments are expected lowercase. Matching at word starts keeps
/// `"regulat"` from firing inside `"upregulates"`.
pub fn contains_cue(text: &str, cue: &str) -> bool {
    if cue.is_empty() {
        return false;
    }
    text.match_indices(cue).any(|(at, _)| {
        text[..at]
            .chars()
            .next_back()
            .map_or(true, |prev| !prev.is_alphanumeric())
    })
}
