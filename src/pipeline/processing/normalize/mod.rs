//! Company-name normalization.
//!
//! Every transform maps a raw name to a cleaned name and nothing else. The
//! lookup tables some of them need are passed in as values rather than read
//! from globals, so each transform can be exercised on its own.

pub mod registry;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub use registry::TransformRegistry;

static NON_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s&]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A single name rewrite used by one matching step
pub trait NameTransform: Send + Sync {
    fn apply(&self, name: &str) -> String;
}

impl<F> NameTransform for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn apply(&self, name: &str) -> String {
        self(name)
    }
}

/// One entry of the abbreviation lookup table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationRule {
    pub full: String,
    pub abbreviation: String,
}

impl AbbreviationRule {
    pub fn new(full: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            full: full.into(),
            abbreviation: abbreviation.into(),
        }
    }
}

/// Keep ASCII letters, digits, whitespace and `&`; collapse whitespace;
/// lowercase; trim.
pub fn preprocess_name(name: &str) -> String {
    let stripped = NON_NAME_CHARS.replace_all(name, "");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    collapsed.to_lowercase().trim().to_string()
}

/// Replace every full form with its abbreviation, in table order
pub fn standardize_abbreviations(name: &str, rules: &[AbbreviationRule]) -> String {
    rules.iter().fold(name.to_string(), |acc, rule| {
        acc.replace(&rule.full, &rule.abbreviation)
    })
}

/// Transliterate German spellings. The replacements run in a fixed order:
/// "ss" collapses before "ß" expands, so "ß" always ends up as "ss".
pub fn umlauts_to_english(name: &str) -> String {
    name.replace("ae", "a")
        .replace("oe", "o")
        .replace("ue", "u")
        .replace("ss", "s")
        .replace('&', "und")
        .replace('ä', "a")
        .replace('ö', "o")
        .replace('ü', "u")
        .replace('ß', "ss")
}

/// Strip the first listed suffix the name ends with. At most one suffix is
/// removed.
pub fn remove_suffixes<S: AsRef<str>>(name: &str, suffixes: &[S]) -> String {
    for suffix in suffixes {
        if let Some(stem) = name.strip_suffix(suffix.as_ref()) {
            return stem.trim_end().to_string();
        }
    }
    name.to_string()
}

/// Drop whitespace-separated tokens that are in `common_words`
pub fn remove_common_words(name: &str, common_words: &HashSet<String>) -> String {
    name.split_whitespace()
        .filter(|token| !common_words.contains(*token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Leaves names unchanged; used for the plain exact-match step
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl NameTransform for Identity {
    fn apply(&self, name: &str) -> String {
        name.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct AbbreviationStandardizer {
    rules: Vec<AbbreviationRule>,
}

impl AbbreviationStandardizer {
    pub fn new(rules: Vec<AbbreviationRule>) -> Self {
        Self { rules }
    }
}

impl NameTransform for AbbreviationStandardizer {
    fn apply(&self, name: &str) -> String {
        standardize_abbreviations(name, &self.rules)
    }
}

#[derive(Debug, Clone)]
pub struct SuffixStripper {
    suffixes: Vec<String>,
}

impl SuffixStripper {
    pub fn new(suffixes: Vec<String>) -> Self {
        Self { suffixes }
    }
}

impl NameTransform for SuffixStripper {
    fn apply(&self, name: &str) -> String {
        remove_suffixes(name, &self.suffixes)
    }
}

#[derive(Debug, Clone)]
pub struct CommonWordRemover {
    words: HashSet<String>,
}

impl CommonWordRemover {
    pub fn new(words: impl IntoIterator<Item = String>) -> Self {
        Self {
            words: words.into_iter().collect(),
        }
    }

    pub fn words(&self) -> &HashSet<String> {
        &self.words
    }
}

impl NameTransform for CommonWordRemover {
    fn apply(&self, name: &str) -> String {
        remove_common_words(name, &self.words)
    }
}

/// Applies transforms left to right
#[derive(Default)]
pub struct TransformChain {
    transforms: Vec<Arc<dyn NameTransform>>,
}

impl TransformChain {
    pub fn new(transforms: Vec<Arc<dyn NameTransform>>) -> Self {
        Self { transforms }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl NameTransform for TransformChain {
    fn apply(&self, name: &str) -> String {
        self.transforms
            .iter()
            .fold(name.to_string(), |acc, t| t.apply(&acc))
    }
}
