//! Lexical counters.
//!
//! Raw counts over a text under a locale. Every function returns 0 for empty
//! input; averages and ratios built on top of these live in
//! [`LocaleSession`](crate::engine::LocaleSession), where they are memoized.

use crate::locale::{LocaleContext, Segmentation};
use crate::syllables;
use crate::text;

/// Count characters. With `ignore_spaces`, all whitespace is excluded.
pub fn char_count(text: &str, ignore_spaces: bool) -> usize {
    if ignore_spaces {
        text.chars().filter(|c| !c.is_whitespace()).count()
    } else {
        text.chars().count()
    }
}

/// Count alphabetic characters (any script). Without `ignore_spaces`,
/// whitespace is counted too.
pub fn letter_count(text: &str, ignore_spaces: bool) -> usize {
    text.chars()
        .filter(|c| c.is_alphabetic() || (!ignore_spaces && c.is_whitespace()))
        .count()
}

/// Count words. With `remove_punctuation`, punctuation-only tokens are not
/// words.
pub fn lexicon_count(text: &str, remove_punctuation: bool, segmentation: Segmentation) -> usize {
    text::words(text, remove_punctuation, segmentation).len()
}

/// Count sentences.
///
/// Empty or blank text has 0 sentences; any other text has at least 1, even
/// without a terminator.
pub fn sentence_count(text: &str, ctx: &LocaleContext<'_>) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    text::split_sentences(text, &ctx.config.sentence_terminators, ctx.language)
        .len()
        .max(1)
}

/// Syllable count of every word, in order.
pub fn word_syllables(text: &str, ctx: &LocaleContext<'_>) -> Vec<usize> {
    text::words(text, true, ctx.config.segmentation)
        .iter()
        .map(|word| syllables::count(word, ctx))
        .collect()
}

/// Total syllables.
pub fn syllable_count(text: &str, ctx: &LocaleContext<'_>) -> usize {
    word_syllables(text, ctx).into_iter().sum()
}

/// Words with at least `min_syllables` syllables.
pub fn polysyllable_count(text: &str, ctx: &LocaleContext<'_>, min_syllables: usize) -> usize {
    word_syllables(text, ctx)
        .into_iter()
        .filter(|&n| n >= min_syllables)
        .count()
}

/// Words with exactly one syllable.
pub fn monosyllable_count(text: &str, ctx: &LocaleContext<'_>) -> usize {
    word_syllables(text, ctx)
        .into_iter()
        .filter(|&n| n == 1)
        .count()
}

/// Whitespace tokens longer than `longer_than` characters.
///
/// Tokens are taken as written, punctuation included.
pub fn long_word_count(text: &str, longer_than: usize, segmentation: Segmentation) -> usize {
    text::words(text, false, segmentation)
        .iter()
        .filter(|word| word.chars().count() > longer_than)
        .count()
}

/// Words of three characters or fewer.
pub fn miniword_count(text: &str, segmentation: Segmentation) -> usize {
    text::words(text, true, segmentation)
        .iter()
        .filter(|word| word.chars().count() <= 3)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocaleConfig;
    use crate::provider::BuiltinWordLists;

    const SHORT: &str = "Cool dogs wear da sunglasses.";

    fn with_english<R>(f: impl FnOnce(&LocaleContext<'_>) -> R) -> R {
        let config = LocaleConfig::default();
        f(&LocaleContext {
            config: &config,
            language: "en",
            words: &BuiltinWordLists,
        })
    }

    #[test]
    fn char_counts() {
        assert_eq!(char_count(SHORT, true), 25);
        assert_eq!(char_count(SHORT, false), 29);
        assert_eq!(char_count("a\tb\nc", true), 3);
        assert_eq!(char_count("", true), 0);
    }

    #[test]
    fn letter_counts() {
        assert_eq!(letter_count(SHORT, true), 24);
        assert_eq!(letter_count(SHORT, false), 28);
        assert_eq!(letter_count("R2-D2, 3 droids!", true), 8);
        assert_eq!(letter_count("Привет мир", true), 9);
    }

    #[test]
    fn ignoring_spaces_never_increases_counts() {
        for text in [SHORT, "", "  spaced   out  ", "tab\tand\nnewline"] {
            assert!(char_count(text, true) <= char_count(text, false));
            assert!(letter_count(text, true) <= letter_count(text, false));
        }
    }

    #[test]
    fn lexicon_counts() {
        let text = "Well - that's it... isn't it ?";
        assert_eq!(lexicon_count(text, true, Segmentation::Whitespace), 5);
        assert_eq!(lexicon_count(text, false, Segmentation::Whitespace), 7);
        assert_eq!(lexicon_count("", true, Segmentation::Whitespace), 0);
    }

    #[test]
    fn removing_punctuation_never_adds_words() {
        for text in [SHORT, "a - b -- c", "¿Qué? ¡Sí!", "ありがとう。"] {
            for segmentation in [Segmentation::Whitespace, Segmentation::Ideographic] {
                let stripped = lexicon_count(text, true, segmentation);
                assert!(stripped <= lexicon_count(text, false, segmentation));
            }
        }
    }

    #[test]
    fn ideographic_lexicon() {
        assert_eq!(lexicon_count("ありがとうございます", true, Segmentation::Whitespace), 1);
        assert_eq!(lexicon_count("ありがとうございます", true, Segmentation::Ideographic), 10);
    }

    #[test]
    fn sentence_counts() {
        with_english(|ctx| {
            assert_eq!(sentence_count("", ctx), 0);
            assert_eq!(sentence_count("   ", ctx), 0);
            assert_eq!(sentence_count("no punctuation here", ctx), 1);
            assert_eq!(sentence_count("...", ctx), 1);
            assert_eq!(sentence_count("One. Two! Three?", ctx), 3);
            assert_eq!(sentence_count("Wait!!! Really?!", ctx), 2);
        });
    }

    #[test]
    fn syllable_counts() {
        with_english(|ctx| {
            assert_eq!(word_syllables(SHORT, ctx), vec![1, 1, 1, 1, 3]);
            assert_eq!(syllable_count(SHORT, ctx), 7);
            assert_eq!(polysyllable_count(SHORT, ctx, 3), 1);
            assert_eq!(monosyllable_count(SHORT, ctx), 4);
            assert_eq!(syllable_count("", ctx), 0);
        });
    }

    #[test]
    fn word_length_counts() {
        assert_eq!(long_word_count(SHORT, 6, Segmentation::Whitespace), 1);
        // Punctuation counts toward token length
        assert_eq!(long_word_count("simple. simple", 6, Segmentation::Whitespace), 1);
        assert_eq!(miniword_count(SHORT, Segmentation::Whitespace), 1);
        assert_eq!(miniword_count("I am on it.", Segmentation::Whitespace), 4);
    }
}
