// src/keywords/classify.rs
//! Keyword classifier: decides per token whether it names a topic.
//!
//! Rule order (first match wins):
//! 1. reject empty, stopword, or purely numeric tokens
//! 2. acronym: original is all upper-case
//! 3. capitalized word after the first position (German nouns are capitalized)
//! 4. first word: never an opener; needs a noun suffix or a capital
//! 5. nominalized verb ending in `-ieren`
//!
//! Rules 2-4 also require three characters or a whitelisted acronym.
//! Accepted tokens are singularized before they enter the result set.

use std::collections::BTreeSet;

use super::lexicon::{
    has_noun_suffix, is_opener, is_stopword, is_whitelisted, ENDINGS_1, ENDINGS_2,
    FEMININE_PLURAL, MIN_STEM_LEN, VERBAL_NOUN_MIN_LEN, VERBAL_NOUN_SUFFIX,
};
use super::normalize::normalize;
use super::tokenize::{tokenize, Token};

/// Which rule accepted a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Acronym,
    Capitalized,
    TitleStart,
    VerbalNoun,
}

fn is_numeric(w: &str) -> bool {
    !w.is_empty() && w.chars().all(|c| c.is_ascii_digit())
}

fn is_acronym(original: &str) -> bool {
    original.chars().any(char::is_alphabetic) && !original.chars().any(char::is_lowercase)
}

fn starts_upper(original: &str) -> bool {
    original.chars().next().is_some_and(char::is_uppercase)
}

/// Find the accepting rule for a token, or `None` if it is not a keyword.
pub fn match_rule(tok: &Token) -> Option<Rule> {
    let norm = tok.normalized.as_str();
    if norm.is_empty() || is_stopword(norm) || is_numeric(norm) {
        return None;
    }

    let len = norm.chars().count();
    let long_enough = len >= 3 || is_whitelisted(norm);

    if long_enough && is_acronym(&tok.original) {
        return Some(Rule::Acronym);
    }
    if tok.position > 0 && long_enough && starts_upper(&tok.original) {
        return Some(Rule::Capitalized);
    }
    if tok.position == 0 {
        if is_opener(norm) {
            return None;
        }
        if long_enough && (has_noun_suffix(norm) || starts_upper(&tok.original)) {
            return Some(Rule::TitleStart);
        }
    }
    if len >= VERBAL_NOUN_MIN_LEN && norm.ends_with(VERBAL_NOUN_SUFFIX) {
        return Some(Rule::VerbalNoun);
    }
    None
}

/// Shallow plural stripping.
///
/// `-innen` goes first; otherwise one two-character ending for words of six or more
/// characters, else one single-character ending for words of five or more.
/// Never leaves fewer than four characters.
pub fn singularize(w: &str) -> String {
    if let Some(stem) = w.strip_suffix(FEMININE_PLURAL) {
        if stem.chars().count() >= MIN_STEM_LEN {
            return stem.to_string();
        }
    }

    let len = w.chars().count();
    if len >= MIN_STEM_LEN + 2 {
        if let Some(stem) = ENDINGS_2.iter().find_map(|e| w.strip_suffix(e)) {
            return stem.to_string();
        }
    }
    if len > MIN_STEM_LEN {
        if let Some(stem) = ENDINGS_1.iter().find_map(|e| w.strip_suffix(e)) {
            return stem.to_string();
        }
    }
    w.to_string()
}

/// Classify one token and return its keyword form.
pub fn classify(tok: &Token) -> Option<String> {
    match_rule(tok)?;
    let kw = singularize(&tok.normalized);
    // singularizing can land on a stopword ("dieses" → "dies") or digits ("1990s")
    if is_stopword(&kw) || is_numeric(&kw) {
        return None;
    }
    Some(kw)
}

/// Parse a comma-separated forced keyword list (`"Gaza, Rentner"`) into folded entries.
pub fn parse_forced_keywords(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(normalize)
        .collect()
}

/// All keywords of a title. A non-empty `forced` list restricts the result to its entries.
pub fn title_keywords(title: &str, forced: &BTreeSet<String>) -> BTreeSet<String> {
    let mut out: BTreeSet<String> = tokenize(title).iter().filter_map(classify).collect();
    if !forced.is_empty() {
        out.retain(|k| forced.contains(k));
    }
    out
}
