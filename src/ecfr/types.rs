// src/ecfr/types.rs
//! Wire types for the public eCFR API. Unknown fields are ignored; every
//! field is defaulted so partial upstream payloads still deserialize.

use serde::{Deserialize, Serialize};

/// `GET /versioner/v1/titles.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitlesResponse {
    #[serde(default)]
    pub titles: Vec<TitleInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleInfo {
    pub number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latest_issue_date: Option<String>,
    // Large and internal to the analyzer; kept out of the public title list.
    #[serde(default, skip_serializing)]
    pub version_dates: Vec<String>,
}

/// One node of `GET /versioner/v1/structure/{date}/title-{n}.json`.
/// The tree nests chapters, subchapters, parts, and sections; only the
/// fields the analyzer reads are modeled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructureNode {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub label_description: Option<String>,
    #[serde(default)]
    pub reserved: bool,
    #[serde(default)]
    pub children: Vec<StructureNode>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// `GET /admin/v1/corrections/title/{n}.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorrectionsResponse {
    #[serde(default)]
    pub ecfr_corrections: Vec<RawCorrection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCorrection {
    #[serde(default)]
    pub error_corrected: Option<String>,
    #[serde(default)]
    pub error_occurred: Option<String>,
    #[serde(default)]
    pub fr_citation: Option<String>,
    #[serde(default)]
    pub corrective_action: Option<String>,
    #[serde(default)]
    pub cfr_references: Vec<CfrReference>,
}

/// CFR reference shape shared by corrections and agencies; each endpoint
/// fills a different subset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CfrReference {
    #[serde(default)]
    pub cfr_reference: Option<String>,
    #[serde(default)]
    pub title: Option<u32>,
}

/// `GET /admin/v1/agencies.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgenciesResponse {
    #[serde(default)]
    pub agencies: Vec<RawAgency>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAgency {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub cfr_references: Vec<CfrReference>,
    #[serde(default)]
    pub children: Vec<RawAgency>,
}
