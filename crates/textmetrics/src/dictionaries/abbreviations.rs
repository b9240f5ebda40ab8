//! Abbreviations that do not end a sentence when followed by a period.
//!
//! Entries are lowercase and stored without their final period. Words that
//! are also ordinary sentence-final words ("sat", "in", "no") are left out:
//! a missed split costs less than a phantom one.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Abbreviations recognized in every locale (Latin and scholarly forms).
static COMMON: &[&str] = &[
    "etc", "e.g", "i.e", "cf", "viz", "ibid", "vs", "n.b", "p.s", "approx", "vol", "pp",
    "ca", "fig", "dr", "prof",
];

/// Per-language abbreviation sets, keyed by language subtag.
pub static ABBREVIATIONS: LazyLock<HashMap<&'static str, HashSet<&'static str>>> =
    LazyLock::new(|| {
        let mut map: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();

        map.entry("en").or_default().extend([
            // Titles and honorifics
            "mr", "mrs", "ms", "jr", "sr", "st", "rev", "hon", "esq", "capt", "lt", "maj", "sgt",
            "cpl", "gov", "sen", "messrs", "mmes", "msgr",
            // Degrees
            "ph.d", "m.d", "b.a", "b.s", "m.a", "m.s", "m.b.a", "j.d", "d.d.s",
            // Time, dates, places
            "a.m", "p.m", "b.c", "a.d", "jan", "feb", "apr", "jun", "jul", "aug", "sept", "oct",
            "nov", "dec", "ave", "blvd", "rd", "apt", "dept", "u.s", "u.k", "u.s.a", "e.u",
            // Organizations and units
            "inc", "corp", "ltd", "llc", "bros", "intl", "oz", "lb", "lbs", "ft", "mph",
        ]);

        map.entry("de").or_default().extend([
            "z.b", "u.a", "usw", "bzw", "evtl", "ggf", "inkl", "nr", "str", "hr", "fr", "d.h",
            "s.o", "s.u", "vgl", "z.t", "u.u", "sog",
        ]);

        map.entry("fr").or_default().extend([
            "m", "mm", "mme", "mlle", "me", "mgr", "av", "bd", "env", "p.ex", "c.-à-d", "qqch",
        ]);

        map.entry("es").or_default().extend([
            "sr", "sra", "srta", "ud", "uds", "dra", "pág", "núm", "av", "avda", "p.ej", "etc",
        ]);

        map.entry("it").or_default().extend([
            "sig", "sigg", "sig.ra", "dott", "ing", "avv", "pag", "ecc", "es",
        ]);

        map.entry("nl").or_default().extend([
            "dhr", "mevr", "mr", "bijv", "o.a", "d.w.z", "enz", "blz", "m.b.t",
        ]);

        map.entry("pl").or_default().extend([
            "np", "itd", "itp", "tzw", "tj", "ul", "godz", "mgr", "inż", "dr",
        ]);

        map.entry("ru").or_default().extend([
            "т.е", "т.д", "т.п", "др", "пр", "см", "г", "гг", "ул", "стр", "им",
        ]);

        map
    });

/// Words that commonly start a sentence. After a lone capital and a period
/// ("plan B. Then"), one of these marks a boundary rather than a name
/// following an initial ("J. Smith").
static SENTENCE_OPENERS: LazyLock<HashMap<&'static str, HashSet<&'static str>>> =
    LazyLock::new(|| {
        let mut map: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        map.entry("en").or_default().extend([
            "the", "then", "this", "that", "these", "those", "it", "its", "he", "she", "we",
            "they", "you", "there", "but", "and", "so", "after", "when", "my", "our", "his",
            "her", "their",
        ]);
        map.entry("de").or_default().extend([
            "der", "die", "das", "dann", "er", "sie", "es", "wir", "ich", "aber", "und",
        ]);
        map
    });

/// Check whether `word` commonly opens a sentence in `language`.
pub fn is_sentence_opener(language: &str, word: &str) -> bool {
    SENTENCE_OPENERS
        .get(language)
        .is_some_and(|set| set.contains(word.to_lowercase().as_str()))
}

/// Check whether `word` is a known abbreviation for `language`.
///
/// Case-insensitive; surrounding periods are ignored.
pub fn is_abbreviation(language: &str, word: &str) -> bool {
    let lower = word.to_lowercase();
    let trimmed = lower.trim_matches('.');
    if trimmed.is_empty() {
        return false;
    }
    COMMON.contains(&trimmed)
        || ABBREVIATIONS
            .get(language)
            .is_some_and(|set| set.contains(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_abbreviations_apply_everywhere() {
        for language in ["en", "de", "xx"] {
            assert!(is_abbreviation(language, "etc"));
            assert!(is_abbreviation(language, "e.g."));
            assert!(is_abbreviation(language, "Dr"));
        }
    }

    #[test]
    fn language_specific_sets() {
        assert!(is_abbreviation("en", "Mrs"));
        assert!(!is_abbreviation("de", "Mrs"));
        assert!(is_abbreviation("de", "z.B."));
        assert!(is_abbreviation("ru", "т.е."));
    }

    #[test]
    fn ordinary_words_are_not_abbreviations() {
        assert!(!is_abbreviation("en", "hello"));
        assert!(!is_abbreviation("en", "sat"));
        assert!(!is_abbreviation("en", "in"));
        assert!(!is_abbreviation("en", "no"));
        assert!(!is_abbreviation("en", "..."));
    }

    #[test]
    fn sentence_openers_by_language() {
        assert!(is_sentence_opener("en", "Then"));
        assert!(!is_sentence_opener("en", "Smith"));
        assert!(is_sentence_opener("de", "Dann"));
        assert!(!is_sentence_opener("xx", "Then"));
    }
}
