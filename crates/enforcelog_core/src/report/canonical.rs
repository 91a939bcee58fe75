//! Category label canonicalization.
//!
//! Historical rows carry near-duplicate category labels (extra spaces,
//! stray punctuation, different capitalization). They are merged at read
//! time; stored rows are never rewritten.

use crate::model::taxonomy::Category;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Prefixes tested in order; first match wins.
const CANONICAL_PREFIXES: &[(&str, Category)] = &[
    ("I. Issuance of Citation Tickets", Category::CitationTickets),
    ("II. Surveillance", Category::Surveillance),
    ("III. Information, Education", Category::IecCampaign),
    ("IV. Other", Category::OtherTasks),
];

/// Collapses whitespace runs to one space and trims the ends.
pub fn collapse_whitespace(label: &str) -> String {
    WHITESPACE_RE.replace_all(label.trim(), " ").into_owned()
}

/// Resolves a free-text label to a known category, if any prefix matches.
///
/// Matching is ASCII case-insensitive after whitespace collapsing.
pub fn match_category(label: &str) -> Option<Category> {
    let collapsed = collapse_whitespace(label);
    CANONICAL_PREFIXES
        .iter()
        .find(|(prefix, _)| starts_with_ignore_ascii_case(&collapsed, prefix))
        .map(|(_, category)| *category)
}

/// Returns the canonical label for `label`, or the whitespace-collapsed
/// label unchanged when no canonical prefix matches.
pub fn canonicalize_category(label: &str) -> String {
    match match_category(label) {
        Some(category) => category.label().to_string(),
        None => collapse_whitespace(label),
    }
}

/// Short chart label for a canonical category; other labels map to themselves.
pub fn short_category_label(canonical: &str) -> String {
    Category::from_label(canonical)
        .map(|category| category.short_label().to_string())
        .unwrap_or_else(|| canonical.to_string())
}

fn starts_with_ignore_ascii_case(value: &str, prefix: &str) -> bool {
    value
        .as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}
