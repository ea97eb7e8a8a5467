// src/keywords/lexicon.rs
//! Word lists for the headline heuristics, tuned for German titles.
//!
//! All entries are in folded form (see `normalize`): lowercase, no diacritics, `ß` → `ss`.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Function words and feed boilerplate that never make a topic.
pub static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // articles, pronouns
        "der", "die", "das", "den", "dem", "des", "ein", "eine", "einer", "eines", "einem",
        "einen", "kein", "keine", "keinen", "ich", "du", "er", "sie", "es", "wir", "ihr", "man",
        "sich", "uns", "euch", "ihm", "ihn", "ihnen", "sein", "seine", "seinen", "ihre", "ihren",
        "dies", "diese", "dieser", "dieses", "diesem", "diesen", "jene", "alle", "allen",
        // prepositions, conjunctions
        "und", "oder", "aber", "doch", "denn", "sondern", "im", "in", "am", "an", "auf", "mit",
        "von", "vom", "fur", "vor", "nach", "bei", "beim", "ohne", "als", "auch", "noch", "aus",
        "zum", "zur", "zu", "uber", "unter", "gegen", "bis", "seit", "wegen", "trotz", "durch",
        "um", "ab", "weil", "dass", "da", "wenn", "ob", "so", "wie", "nur", "schon", "jetzt",
        "nun", "mehr", "weniger", "sehr", "viel", "viele", "nicht", "nichts", "wieder",
        // auxiliaries, modals
        "ist", "sind", "war", "waren", "wird", "werden", "wurde", "wurden", "hat", "haben",
        "hatte", "hatten", "sei", "kann", "konnen", "konnte", "muss", "mussen", "soll", "sollen",
        "sollte", "sollten", "will", "wollen", "darf", "durfen", "gibt", "geht",
        // time-relative
        "heute", "gestern", "morgen", "immer", "neue", "neuer", "neues", "neuen",
        // english
        "the", "a", "an", "and", "or", "of", "to", "on", "for", "by", "with", "from", "at", "is",
        "are", "be", "was", "were", "this", "that", "it", "its", "into", "about", "over",
        "new", "today",
        // feed boilerplate
        "update", "live", "ticker", "liveticker", "video", "podcast", "kommentar", "analyse",
        "interview", "news",
    ]
    .into_iter()
    .collect()
});

/// Short acronyms accepted despite being under three characters (or borderline).
pub static ACRONYM_WHITELIST: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["eu", "us", "uk", "un", "uaw", "ice", "afd"].into_iter().collect());

/// Sentence openers that are never topics when they start a title.
pub static OPENERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "und", "aber", "oder", "doch", "denn", "wenn", "weil", "als", "ob", "nachdem",
        "obwohl", "trotzdem", "dennoch", "deshalb", "darum", "wie", "was", "warum", "wieso",
        "weshalb", "weswegen", "wer", "wen", "wem", "wessen", "wo", "woher", "wohin", "wann",
        "welche", "welcher", "welches", "wozu", "womit",
    ]
    .into_iter()
    .collect()
});

/// Endings that mark a (derived) noun in folded form.
pub const NOUN_SUFFIXES: &[&str] = &[
    "ung", "heit", "keit", "schaft", "tion", "sion", "tat", "ismus", "ment", "ling", "nis",
    "tur", "enz", "anz",
];

/// Infinitive-like ending of nominalized verbs ("Protestieren", "Regieren").
pub const VERBAL_NOUN_SUFFIX: &str = "ieren";
pub const VERBAL_NOUN_MIN_LEN: usize = 8;

/// Feminine plural stripped first by the singularizer ("Rentnerinnen" → "rentner").
pub const FEMININE_PLURAL: &str = "innen";
/// Two-character inflectional endings.
pub const ENDINGS_2: &[&str] = &["en", "es", "em"];
/// One-character inflectional endings.
pub const ENDINGS_1: &[&str] = &["n", "s", "e"];

/// Shortest stem the singularizer leaves behind.
pub const MIN_STEM_LEN: usize = 4;

pub fn is_stopword(w: &str) -> bool {
    STOPWORDS.contains(w)
}

pub fn is_whitelisted(w: &str) -> bool {
    ACRONYM_WHITELIST.contains(w)
}

pub fn is_opener(w: &str) -> bool {
    OPENERS.contains(w)
}

pub fn has_noun_suffix(w: &str) -> bool {
    NOUN_SUFFIXES.iter().any(|s| w.len() > s.len() && w.ends_with(s))
}
