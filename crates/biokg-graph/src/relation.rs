//! Relation codes (Hetionet metaedges).
//!
//! Every code is directed. Most codes have a semantically paired reverse code
//! (`AeG` / `GeA`, `CtD` / `DtC`, ...) that is stored as a separate edge; the
//! graph never infers one from the other.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::NodeKind;

/// Typed, directed relation between two node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RelationCode {
    AnatomyExpressesGene,
    GeneExpressesInAnatomy,
    AnatomyUpregulatesGene,
    GeneUpregulatedInAnatomy,
    AnatomyDownregulatesGene,
    GeneDownregulatedInAnatomy,
    DiseaseAssociatesGene,
    GeneAssociatesDisease,
    DiseaseUpregulatesGene,
    GeneUpregulatedInDisease,
    DiseaseDownregulatesGene,
    GeneDownregulatedInDisease,
    CompoundTreatsDisease,
    DiseaseTreatedByCompound,
    CompoundPalliatesDisease,
    DiseasePalliatedByCompound,
    CompoundUpregulatesGene,
    GeneUpregulatedByCompound,
    CompoundDownregulatesGene,
    GeneDownregulatedByCompound,
    CompoundBindsGene,
    GeneBindsCompound,
    DiseaseLocalizesAnatomy,
    AnatomyLocalizesDisease,
    DiseasePresentsSymptom,
    SymptomPresentsInDisease,
    CompoundCausesSideEffect,
    SideEffectCausedByCompound,
    GeneParticipatesBiologicalProcess,
    BiologicalProcessInvolvesGene,
    GeneParticipatesMolecularFunction,
    MolecularFunctionInvolvesGene,
    GeneParticipatesCellularComponent,
    CellularComponentInvolvesGene,
    GeneParticipatesPathway,
    PathwayInvolvesGene,
    PharmacologicClassIncludesCompound,
    CompoundInPharmacologicClass,
    GeneInteractsGene,
    GeneCovariesGene,
    GeneRegulatesGene,
    DiseaseResemblesDisease,
    CompoundResemblesCompound,
    /// Any relation string the loader did not recognize.
    Unknown,
}

/// Static description of one relation code.
#[derive(Debug, Clone, Copy)]
struct RelationInfo {
    abbrev: &'static str,
    label: &'static str,
    source: NodeKind,
    target: NodeKind,
}

const fn row(
    abbrev: &'static str,
    label: &'static str,
    source: NodeKind,
    target: NodeKind,
) -> RelationInfo {
    RelationInfo {
        abbrev,
        label,
        source,
        target,
    }
}

use NodeKind::{
    Anatomy as A, BiologicalProcess as BP, CellularComponent as CC, Compound as C,
    Disease as D, Gene as G, MolecularFunction as MF, Pathway as PW, PharmacologicClass as PC,
    SideEffect as SE, Symptom as S,
};

impl RelationCode {
    /// All known codes, excluding `Unknown`.
    pub const KNOWN: [RelationCode; 43] = [
        RelationCode::AnatomyExpressesGene,
        RelationCode::GeneExpressesInAnatomy,
        RelationCode::AnatomyUpregulatesGene,
        RelationCode::GeneUpregulatedInAnatomy,
        RelationCode::AnatomyDownregulatesGene,
        RelationCode::GeneDownregulatedInAnatomy,
        RelationCode::DiseaseAssociatesGene,
        RelationCode::GeneAssociatesDisease,
        RelationCode::DiseaseUpregulatesGene,
        RelationCode::GeneUpregulatedInDisease,
        RelationCode::DiseaseDownregulatesGene,
        RelationCode::GeneDownregulatedInDisease,
        RelationCode::CompoundTreatsDisease,
        RelationCode::DiseaseTreatedByCompound,
        RelationCode::CompoundPalliatesDisease,
        RelationCode::DiseasePalliatedByCompound,
        RelationCode::CompoundUpregulatesGene,
        RelationCode::GeneUpregulatedByCompound,
        RelationCode::CompoundDownregulatesGene,
        RelationCode::GeneDownregulatedByCompound,
        RelationCode::CompoundBindsGene,
        RelationCode::GeneBindsCompound,
        RelationCode::DiseaseLocalizesAnatomy,
        RelationCode::AnatomyLocalizesDisease,
        RelationCode::DiseasePresentsSymptom,
        RelationCode::SymptomPresentsInDisease,
        RelationCode::CompoundCausesSideEffect,
        RelationCode::SideEffectCausedByCompound,
        RelationCode::GeneParticipatesBiologicalProcess,
        RelationCode::BiologicalProcessInvolvesGene,
        RelationCode::GeneParticipatesMolecularFunction,
        RelationCode::MolecularFunctionInvolvesGene,
        RelationCode::GeneParticipatesCellularComponent,
        RelationCode::CellularComponentInvolvesGene,
        RelationCode::GeneParticipatesPathway,
        RelationCode::PathwayInvolvesGene,
        RelationCode::PharmacologicClassIncludesCompound,
        RelationCode::CompoundInPharmacologicClass,
        RelationCode::GeneInteractsGene,
        RelationCode::GeneCovariesGene,
        RelationCode::GeneRegulatesGene,
        RelationCode::DiseaseResemblesDisease,
        RelationCode::CompoundResemblesCompound,
    ];

    fn info(self) -> Option<RelationInfo> {
        use RelationCode::*;
        let s = match self {
            AnatomyExpressesGene => row("AeG", "Anatomy expresses Gene", A, G),
            GeneExpressesInAnatomy => row("GeA", "Gene expressed in Anatomy", G, A),
            AnatomyUpregulatesGene => row("AuG", "Anatomy upregulates Gene", A, G),
            GeneUpregulatedInAnatomy => row("GuA", "Gene upregulated in Anatomy", G, A),
            AnatomyDownregulatesGene => row("AdG", "Anatomy downregulates Gene", A, G),
            GeneDownregulatedInAnatomy => row("GdA", "Gene downregulated in Anatomy", G, A),
            DiseaseAssociatesGene => row("DaG", "Disease associates Gene", D, G),
            GeneAssociatesDisease => row("GaD", "Gene associates Disease", G, D),
            DiseaseUpregulatesGene => row("DuG", "Disease upregulates Gene", D, G),
            GeneUpregulatedInDisease => row("GuD", "Gene upregulated in Disease", G, D),
            DiseaseDownregulatesGene => row("DdG", "Disease downregulates Gene", D, G),
            GeneDownregulatedInDisease => row("GdD", "Gene downregulated in Disease", G, D),
            CompoundTreatsDisease => row("CtD", "Compound treats Disease", C, D),
            DiseaseTreatedByCompound => row("DtC", "Disease treated by Compound", D, C),
            CompoundPalliatesDisease => row("CpD", "Compound palliates Disease", C, D),
            DiseasePalliatedByCompound => row("DpC", "Disease palliated by Compound", D, C),
            CompoundUpregulatesGene => row("CuG", "Compound upregulates Gene", C, G),
            GeneUpregulatedByCompound => row("GuC", "Gene upregulated by Compound", G, C),
            CompoundDownregulatesGene => row("CdG", "Compound downregulates Gene", C, G),
            GeneDownregulatedByCompound => row("GdC", "Gene downregulated by Compound", G, C),
            CompoundBindsGene => row("CbG", "Compound binds Gene", C, G),
            GeneBindsCompound => row("GbC", "Gene binds Compound", G, C),
            DiseaseLocalizesAnatomy => row("DlA", "Disease localizes to Anatomy", D, A),
            AnatomyLocalizesDisease => row("AlD", "Anatomy localizes Disease", A, D),
            DiseasePresentsSymptom => row("DpS", "Disease presents Symptom", D, S),
            SymptomPresentsInDisease => row("SpD", "Symptom presents in Disease", S, D),
            CompoundCausesSideEffect => row("CcSE", "Compound causes Side Effect", C, SE),
            SideEffectCausedByCompound => row("SEcC", "Side Effect caused by Compound", SE, C),
            GeneParticipatesBiologicalProcess => {
                row("GpBP", "Gene participates in Biological Process", G, BP)
            }
            BiologicalProcessInvolvesGene => row("BPpG", "Biological Process involves Gene", BP, G),
            GeneParticipatesMolecularFunction => {
                row("GpMF", "Gene participates in Molecular Function", G, MF)
            }
            MolecularFunctionInvolvesGene => row("MFpG", "Molecular Function involves Gene", MF, G),
            GeneParticipatesCellularComponent => {
                row("GpCC", "Gene participates in Cellular Component", G, CC)
            }
            CellularComponentInvolvesGene => row("CCpG", "Cellular Component involves Gene", CC, G),
            GeneParticipatesPathway => row("GpPW", "Gene participates in Pathway", G, PW),
            PathwayInvolvesGene => row("PWpG", "Pathway involves Gene", PW, G),
            PharmacologicClassIncludesCompound => {
                row("PCiC", "Pharmacologic Class includes Compound", PC, C)
            }
            CompoundInPharmacologicClass => {
                row("CiPC", "Compound in Pharmacologic Class", C, PC)
            }
            GeneInteractsGene => row("GiG", "Gene interacts with Gene", G, G),
            GeneCovariesGene => row("GcG", "Gene covaries with Gene", G, G),
            GeneRegulatesGene => row("Gr>G", "Gene regulates Gene", G, G),
            DiseaseResemblesDisease => row("DrD", "Disease resembles Disease", D, D),
            CompoundResemblesCompound => row("CrC", "Compound resembles Compound", C, C),
            Unknown => return None,
        };
        Some(s)
    }

    /// Hetionet metaedge abbreviation (`"GiG"`, `"CtD"`, ...). `Unknown` is `"?"`.
    pub fn abbrev(self) -> &'static str {
        self.info().map(|s| s.abbrev).unwrap_or("?")
    }

    /// Human-readable label ("Compound treats Disease").
    pub fn label(self) -> &'static str {
        self.info().map(|s| s.label).unwrap_or("unknown relation")
    }

    /// Parse a metaedge abbreviation or a CamelCase variant name.
    ///
    /// Anything unrecognized becomes `Unknown` rather than an error: open-world
    /// edge data must still load.
    pub fn parse(s: &str) -> RelationCode {
        let s = s.trim();
        RelationCode::KNOWN
            .into_iter()
            .find(|code| code.abbrev() == s || format!("{code:?}") == s)
            .unwrap_or(RelationCode::Unknown)
    }

    /// `(source kind, target kind)` for known codes.
    pub fn endpoints(self) -> Option<(NodeKind, NodeKind)> {
        self.info().map(|s| (s.source, s.target))
    }

    /// The semantically paired code for the opposite direction.
    ///
    /// Symmetric gene-gene and similarity codes pair with themselves;
    /// `GeneRegulatesGene` is directional and has no pair.
    pub fn reverse(self) -> Option<RelationCode> {
        use RelationCode::*;
        let r = match self {
            AnatomyExpressesGene => GeneExpressesInAnatomy,
            GeneExpressesInAnatomy => AnatomyExpressesGene,
            AnatomyUpregulatesGene => GeneUpregulatedInAnatomy,
            GeneUpregulatedInAnatomy => AnatomyUpregulatesGene,
            AnatomyDownregulatesGene => GeneDownregulatedInAnatomy,
            GeneDownregulatedInAnatomy => AnatomyDownregulatesGene,
            DiseaseAssociatesGene => GeneAssociatesDisease,
            GeneAssociatesDisease => DiseaseAssociatesGene,
            DiseaseUpregulatesGene => GeneUpregulatedInDisease,
            GeneUpregulatedInDisease => DiseaseUpregulatesGene,
            DiseaseDownregulatesGene => GeneDownregulatedInDisease,
            GeneDownregulatedInDisease => DiseaseDownregulatesGene,
            CompoundTreatsDisease => DiseaseTreatedByCompound,
            DiseaseTreatedByCompound => CompoundTreatsDisease,
            CompoundPalliatesDisease => DiseasePalliatedByCompound,
            DiseasePalliatedByCompound => CompoundPalliatesDisease,
            CompoundUpregulatesGene => GeneUpregulatedByCompound,
            GeneUpregulatedByCompound => CompoundUpregulatesGene,
            CompoundDownregulatesGene => GeneDownregulatedByCompound,
            GeneDownregulatedByCompound => CompoundDownregulatesGene,
            CompoundBindsGene => GeneBindsCompound,
            GeneBindsCompound => CompoundBindsGene,
            DiseaseLocalizesAnatomy => AnatomyLocalizesDisease,
            AnatomyLocalizesDisease => DiseaseLocalizesAnatomy,
            DiseasePresentsSymptom => SymptomPresentsInDisease,
            SymptomPresentsInDisease => DiseasePresentsSymptom,
            CompoundCausesSideEffect => SideEffectCausedByCompound,
            SideEffectCausedByCompound => CompoundCausesSideEffect,
            GeneParticipatesBiologicalProcess => BiologicalProcessInvolvesGene,
            BiologicalProcessInvolvesGene => GeneParticipatesBiologicalProcess,
            GeneParticipatesMolecularFunction => MolecularFunctionInvolvesGene,
            MolecularFunctionInvolvesGene => GeneParticipatesMolecularFunction,
            GeneParticipatesCellularComponent => CellularComponentInvolvesGene,
            CellularComponentInvolvesGene => GeneParticipatesCellularComponent,
            GeneParticipatesPathway => PathwayInvolvesGene,
            PathwayInvolvesGene => GeneParticipatesPathway,
            PharmacologicClassIncludesCompound => CompoundInPharmacologicClass,
            CompoundInPharmacologicClass => PharmacologicClassIncludesCompound,
            GeneInteractsGene => GeneInteractsGene,
            GeneCovariesGene => GeneCovariesGene,
            DiseaseResemblesDisease => DiseaseResemblesDisease,
            CompoundResemblesCompound => CompoundResemblesCompound,
            GeneRegulatesGene | Unknown => return None,
        };
        Some(r)
    }

    /// Similarity edges; excluded from default searches.
    pub fn is_similarity(self) -> bool {
        matches!(
            self,
            RelationCode::DiseaseResemblesDisease | RelationCode::CompoundResemblesCompound
        )
    }

    /// Covariance-type edges whose `weight` carries a numeric covariance metric.
    pub fn is_covariance(self) -> bool {
        matches!(self, RelationCode::GeneCovariesGene)
    }
}

impl fmt::Display for RelationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

/// Accepts abbreviations and variant names. Anything else, including
/// non-string values, loads as [`RelationCode::Unknown`] so the edge is kept.
impl<'de> Deserialize<'de> for RelationCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RelationCodeVisitor)
    }
}

struct RelationCodeVisitor;

impl<'de> Visitor<'de> for RelationCodeVisitor {
    type Value = RelationCode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a relation code")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RelationCode, E> {
        Ok(RelationCode::parse(v))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<RelationCode, E> {
        Ok(RelationCode::Unknown)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<RelationCode, E> {
        Ok(RelationCode::Unknown)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<RelationCode, E> {
        Ok(RelationCode::Unknown)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<RelationCode, E> {
        Ok(RelationCode::Unknown)
    }

    fn visit_unit<E: de::Error>(self) -> Result<RelationCode, E> {
        Ok(RelationCode::Unknown)
    }
}
