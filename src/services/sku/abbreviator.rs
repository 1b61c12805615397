//! Name normalization and abbreviation rules for SKU parts.

/// Names at or below this length are used verbatim after normalization.
const SHORT_NAME_LEN: usize = 3;

/// How a normalized name is shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbbreviationMode {
    /// First three characters of each whitespace-separated word; hyphens are dropped.
    #[default]
    Words,
    /// First character of each word, splitting on whitespace and hyphens.
    /// Used for sizes, e.g. "Extra Large" becomes "EL".
    Initials,
}

/// Uppercases the name and keeps only `A-Z`, `0-9`, `-` and spaces.
pub fn normalize(name: &str) -> String {
    name.trim()
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '-' || *c == ' ')
        .collect()
}

/// Abbreviates a human-entered name into a SKU part. Never fails; an input that
/// normalizes to nothing yields an empty part.
pub fn abbreviate(name: &str, mode: AbbreviationMode) -> String {
    let normalized = normalize(name);
    if normalized.len() <= SHORT_NAME_LEN {
        return normalized;
    }

    match mode {
        AbbreviationMode::Words => normalized
            .replace('-', "")
            .split_whitespace()
            .map(|word| &word[..word.len().min(SHORT_NAME_LEN)])
            .collect(),
        AbbreviationMode::Initials => normalized
            .split(|c: char| c == ' ' || c == '-')
            .filter(|word| !word.is_empty())
            .filter_map(|word| word.chars().next())
            .collect(),
    }
}
