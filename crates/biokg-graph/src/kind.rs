//! Node kinds (Hetionet metanodes).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of node kinds a biomedical graph may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    Gene,
    Anatomy,
    Disease,
    Compound,
    BiologicalProcess,
    Pathway,
    Symptom,
    SideEffect,
    MolecularFunction,
    CellularComponent,
    PharmacologicClass,
}

impl NodeKind {
    pub const ALL: [NodeKind; 11] = [
        NodeKind::Gene,
        NodeKind::Anatomy,
        NodeKind::Disease,
        NodeKind::Compound,
        NodeKind::BiologicalProcess,
        NodeKind::Pathway,
        NodeKind::Symptom,
        NodeKind::SideEffect,
        NodeKind::MolecularFunction,
        NodeKind::CellularComponent,
        NodeKind::PharmacologicClass,
    ];

    /// Display label as used by Hetionet node tables ("Biological Process").
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Gene => "Gene",
            NodeKind::Anatomy => "Anatomy",
            NodeKind::Disease => "Disease",
            NodeKind::Compound => "Compound",
            NodeKind::BiologicalProcess => "Biological Process",
            NodeKind::Pathway => "Pathway",
            NodeKind::Symptom => "Symptom",
            NodeKind::SideEffect => "Side Effect",
            NodeKind::MolecularFunction => "Molecular Function",
            NodeKind::CellularComponent => "Cellular Component",
            NodeKind::PharmacologicClass => "Pharmacologic Class",
        }
    }

    /// Parse a kind from its display label, CamelCase name, or a
    /// snake/kebab-case spelling. Matching ignores case and separators.
    pub fn parse(s: &str) -> Option<NodeKind> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        NodeKind::ALL.into_iter().find(|kind| {
            let label: String = kind
                .label()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect();
            label == folded
        })
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
