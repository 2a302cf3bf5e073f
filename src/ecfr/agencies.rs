// src/ecfr/agencies.rs
//! Agency directory flattening and mention-based word attribution.
//!
//! Word counts per agency are estimated, not exact: each section's words
//! are distributed across the agencies mentioned in it, proportionally to
//! their mention counts.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::content::word_count;
use super::types::{AgenciesResponse, RawAgency};

static SECTION_MARK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"§\s*\d+\.").expect("section marker regex"));

/// One flattened agency: its display name, the name variations matched in
/// text, and the CFR titles it references.
#[derive(Debug, Clone, Default)]
pub struct AgencyProfile {
    pub display_name: String,
    pub variations: Vec<String>,
    pub titles: Vec<u32>,
}

/// Flatten the recursive agency tree into `short_name -> profile`.
/// Agencies without a short name key on their full name.
pub fn flatten_agencies(resp: &AgenciesResponse) -> HashMap<String, AgencyProfile> {
    let mut map = HashMap::new();
    for agency in &resp.agencies {
        insert_agency(agency, &mut map);
    }
    map
}

fn insert_agency(raw: &RawAgency, map: &mut HashMap<String, AgencyProfile>) {
    let key = raw
        .short_name
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| raw.name.clone());

    let mut variations = Vec::new();
    for candidate in [
        Some(raw.name.as_str()),
        raw.short_name.as_deref(),
        Some(raw.display_name.as_str()),
    ]
    .into_iter()
    .flatten()
    {
        if !candidate.is_empty() && !variations.iter().any(|v| v == candidate) {
            variations.push(candidate.to_string());
        }
    }

    let titles = raw.cfr_references.iter().filter_map(|r| r.title).collect();

    map.insert(
        key,
        AgencyProfile {
            display_name: raw.display_name.clone(),
            variations,
            titles,
        },
    );

    for child in &raw.children {
        insert_agency(child, map);
    }
}

/// Attribute the content's words to the agencies referencing `title_number`.
/// Returns `display_name -> rounded word count` for agencies mentioned at
/// least once.
pub fn attribute_word_counts(
    content: &str,
    agencies: &HashMap<String, AgencyProfile>,
    title_number: u32,
) -> HashMap<String, u64> {
    if content.is_empty() {
        return HashMap::new();
    }

    // Only agencies with a CFR reference to this title participate, each
    // with its variation matchers compiled once up front.
    let relevant: Vec<(&AgencyProfile, Vec<Regex>)> = agencies
        .values()
        .filter(|p| p.titles.contains(&title_number))
        .map(|p| (p, variation_matchers(p)))
        .collect();
    if relevant.is_empty() {
        return HashMap::new();
    }

    let mut mention_totals: HashMap<&str, u64> = HashMap::new();
    let mut word_totals: HashMap<&str, f64> = HashMap::new();

    for section in split_sections(content) {
        let section_words = word_count(section);
        if section_words == 0 {
            continue;
        }

        let mut section_mentions: Vec<(&str, u64)> = Vec::new();
        for (profile, matchers) in &relevant {
            let mentions: u64 = matchers
                .iter()
                .map(|re| re.find_iter(section).count() as u64)
                .sum();
            if mentions > 0 {
                section_mentions.push((profile.display_name.as_str(), mentions));
                *mention_totals.entry(profile.display_name.as_str()).or_default() += mentions;
            }
        }

        let total_mentions: u64 = section_mentions.iter().map(|(_, m)| m).sum();
        if total_mentions == 0 {
            continue;
        }
        for (name, mentions) in section_mentions {
            *word_totals.entry(name).or_default() +=
                mentions as f64 / total_mentions as f64 * section_words as f64;
        }
    }

    mention_totals
        .into_iter()
        .map(|(name, _)| {
            let words = word_totals.get(name).copied().unwrap_or(0.0);
            (name.to_string(), words.round() as u64)
        })
        .collect()
}

fn variation_matchers(profile: &AgencyProfile) -> Vec<Regex> {
    profile
        .variations
        .iter()
        .filter_map(|v| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(v))).ok())
        .collect()
}

/// Split content at `§ N.` markers. Content with no markers is one section.
fn split_sections(content: &str) -> Vec<&str> {
    let mut bounds = vec![0];
    for m in SECTION_MARK_RE.find_iter(content) {
        if m.start() != 0 {
            bounds.push(m.start());
        }
    }
    bounds.push(content.len());

    bounds
        .windows(2)
        .map(|w| &content[w[0]..w[1]])
        .filter(|s| !s.trim().is_empty())
        .collect()
}
