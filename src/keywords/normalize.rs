// src/keywords/normalize.rs
//! Text folding shared by the tokenizer, the forced-keyword list and lookups.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Fold a string for keyword comparison.
///
/// Steps:
/// 1. Expand `ß` / `ẞ` to `ss` (before case folding, so `ẞ` never survives as `ß`).
/// 2. Lowercase.
/// 3. Canonical decomposition (NFD) and removal of combining marks (`ü` → `u`).
///
/// The result is a fixed point: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(s: &str) -> String {
    let expanded = s.replace(['ß', 'ẞ'], "ss");
    expanded
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_umlauts_and_case() {
        assert_eq!(normalize("Bündnis"), "bundnis");
        assert_eq!(normalize("ÖSTERREICH"), "osterreich");
        assert_eq!(normalize("Élysée"), "elysee");
    }

    #[test]
    fn expands_sharp_s_before_lowercasing() {
        assert_eq!(normalize("Straße"), "strasse");
        assert_eq!(normalize("GROẞ"), "gross");
    }

    #[test]
    fn keeps_digits_and_hyphens() {
        assert_eq!(normalize("G7-Gipfel 2025"), "g7-gipfel 2025");
    }

    #[test]
    fn idempotent_on_samples() {
        for s in [
            "Gaza-Krieg eskaliert",
            "Rentnerinnen fordern mehr Geld",
            "İstanbul: Ärger über Maßnahmen",
            "Ångström Øresund Łódź",
            "",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
