// src/ecfr/structure.rs
//! Parsing of eCFR structure trees into flat part/section summaries.

use serde::{Deserialize, Serialize};

use super::types::StructureNode;

/// Parsed summary of one title's structure snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TitleStructure {
    pub name: String,
    pub parts: Vec<PartSummary>,
    pub total_parts: u64,
    pub total_sections: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartSummary {
    pub number: Option<String>,
    pub name: Option<String>,
    pub sections: u64,
}

/// Parse a structure tree. Reserved parts and sections are excluded, and
/// `total_parts` counts only parts that still contain at least one section.
pub fn parse_structure(root: &StructureNode) -> TitleStructure {
    let name = root.label_description.clone().unwrap_or_default();
    let parts = collect_parts(root);
    let total_parts = parts.iter().filter(|p| p.sections > 0).count() as u64;
    let total_sections = parts.iter().map(|p| p.sections).sum();

    TitleStructure {
        name,
        parts,
        total_parts,
        total_sections,
    }
}

fn collect_parts(node: &StructureNode) -> Vec<PartSummary> {
    if node.kind == "part" && !node.reserved {
        return vec![PartSummary {
            number: node.identifier.clone(),
            name: node.label_description.clone(),
            sections: count_live_sections(node),
        }];
    }
    node.children.iter().flat_map(collect_parts).collect()
}

fn count_live_sections(node: &StructureNode) -> u64 {
    if node.kind == "section" {
        return if node.reserved { 0 } else { 1 };
    }
    node.children.iter().map(count_live_sections).sum()
}

/// Count every section node in a raw tree, reserved ones included. The
/// historical series uses these raw counters so a snapshot's totals match
/// the upstream tree verbatim.
pub fn count_sections(node: &StructureNode) -> u64 {
    let own = u64::from(node.kind == "section");
    own + node.children.iter().map(count_sections).sum::<u64>()
}

/// Raw part counter, symmetric with [`count_sections`].
pub fn count_parts(node: &StructureNode) -> u64 {
    let own = u64::from(node.kind == "part");
    own + node.children.iter().map(count_parts).sum::<u64>()
}
