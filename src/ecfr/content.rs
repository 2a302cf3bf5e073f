// src/ecfr/content.rs
//! Flattening a structure tree into analyzable text, plus word metrics.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::StructureNode;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("word regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("punctuation regex"));

/// Join every label/description/text/content field of the tree into one
/// cleaned string: whitespace collapsed, punctuation stripped.
pub fn extract_text(root: &StructureNode) -> String {
    let mut fragments = Vec::new();
    collect_text(root, &mut fragments);
    let joined = fragments.join(" ");

    let collapsed = WHITESPACE_RE.replace_all(&joined, " ");
    let stripped = PUNCT_RE.replace_all(&collapsed, " ");
    stripped.trim().to_string()
}

fn collect_text<'a>(node: &'a StructureNode, out: &mut Vec<&'a str>) {
    for field in [
        node.label.as_deref(),
        node.label_description.as_deref(),
        node.text.as_deref(),
        node.content.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        if !field.is_empty() {
            out.push(field);
        }
    }
    for child in &node.children {
        collect_text(child, out);
    }
}

/// Number of words in a cleaned content string.
pub fn word_count(content: &str) -> u64 {
    WORD_RE.find_iter(content).count() as u64
}

/// Average words per section, rounded to two decimals. A title with zero
/// sections averages over one to keep the metric defined.
pub fn average_words_per_section(word_count: u64, total_sections: u64) -> f64 {
    let sections = total_sections.max(1);
    let avg = word_count as f64 / sections as f64;
    (avg * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(label: Option<&str>, text: Option<&str>, children: Vec<StructureNode>) -> StructureNode {
        StructureNode {
            label: label.map(str::to_string),
            text: text.map(str::to_string),
            children,
            ..StructureNode::default()
        }
    }

    #[test]
    fn extracts_and_cleans_nested_text() {
        let root = node(
            Some("Part 1 - General"),
            None,
            vec![
                node(Some("§ 1.1"), Some("Scope,  purpose; and\napplicability."), Vec::new()),
                node(None, Some("Definitions."), Vec::new()),
            ],
        );
        let text = extract_text(&root);
        assert_eq!(
            text,
            "Part 1   General   1 1 Scope  purpose  and applicability  Definitions"
        );
    }

    #[test]
    fn empty_tree_yields_empty_text() {
        assert_eq!(extract_text(&StructureNode::default()), "");
    }

    #[test]
    fn counts_words() {
        assert_eq!(word_count("one two three"), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  spaced   out  "), 2);
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        assert_eq!(average_words_per_section(100, 3), 33.33);
        assert_eq!(average_words_per_section(10, 4), 2.5);
    }

    #[test]
    fn average_over_zero_sections_uses_one() {
        assert_eq!(average_words_per_section(42, 0), 42.0);
    }
}
