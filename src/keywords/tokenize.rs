// src/keywords/tokenize.rs
//! Title tokenizer: aligned (normalized, original) word pairs with hyphen expansion.

use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::normalize;

/// Separators in folded text: anything that is not `a-z`, `0-9` or `-`.
static RE_NORM_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\-]+").expect("normalized split regex"));

/// Separators in the original text: anything that is not a letter, a digit or `-`.
static RE_ORIG_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\-]+").expect("original split regex"));

/// One title word (or one part of a hyphenated word).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Folded form, used for every comparison.
    pub normalized: String,
    /// Original casing, used for the capitalization rules.
    pub original: String,
    /// 0-based word index within the title. Hyphen parts share their parent's position.
    pub position: usize,
    /// `Some(i)` for the i-th part of a hyphenated word, `None` for whole words.
    pub part: Option<usize>,
}

impl Token {
    fn whole(normalized: &str, original: &str, position: usize) -> Self {
        Self {
            normalized: normalized.to_string(),
            original: original.to_string(),
            position,
            part: None,
        }
    }
}

fn split_words<'a>(re: &Regex, s: &'a str) -> Vec<&'a str> {
    re.split(s).filter(|w| !w.is_empty()).collect()
}

/// Split a title into tokens.
///
/// The folded and the original text are split separately and aligned by index.
/// When the two sequences disagree (e.g. a letter that folding cannot map to `a-z`),
/// positions without an original counterpart reuse the folded word as their original.
///
/// A hyphenated word yields the whole word first, followed by each non-empty part.
pub fn tokenize(title: &str) -> Vec<Token> {
    let folded = normalize(title);
    let norm_words = split_words(&RE_NORM_SPLIT, &folded);
    let orig_words = split_words(&RE_ORIG_SPLIT, title);

    let mut out = Vec::with_capacity(norm_words.len() * 2);
    for (position, norm) in norm_words.iter().enumerate() {
        let orig = orig_words.get(position).copied().unwrap_or(norm);
        out.push(Token::whole(norm, orig, position));

        if !norm.contains('-') {
            continue;
        }
        let orig_parts: Vec<&str> = orig.split('-').filter(|p| !p.is_empty()).collect();
        for (part, norm_part) in norm.split('-').filter(|p| !p.is_empty()).enumerate() {
            out.push(Token {
                normalized: norm_part.to_string(),
                original: orig_parts.get(part).copied().unwrap_or(norm_part).to_string(),
                position,
                part: Some(part),
            });
        }
    }
    out
}
