//! Difficult-word classification.
//!
//! A word is difficult when all of these hold:
//!
//! - it is not on the locale language's familiar-word list (skipped when no
//!   list is available or the caller opts out of the list),
//! - it has at least the threshold number of syllables,
//! - it contains no digits in any script, so numerals and codes such as
//!   `covid19` or `٢٠٢٤` are never difficult,
//! - it is not one of the locale's extra `familiar_words`.
//!
//! Dale-Chall and Spache use the locale's `difficult_word_syllables`
//! threshold; Gunning Fog reuses the classifier with its complex-word
//! threshold.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::locale::LocaleContext;
use crate::syllables;
use crate::text;

/// Word characters plus apostrophes, so contractions stay whole.
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w'‘’]+").expect("valid regex"));

/// A classified word. Recomputed per call, never cached on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    /// Lowercased surface form.
    pub surface: String,
    /// Syllable count under the locale.
    pub syllables: usize,
    /// Whether the classifier flagged the word.
    pub difficult: bool,
}

/// How strictly to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DifficultyRule {
    /// Minimum syllables for a difficult word.
    pub min_syllables: usize,
    /// Consult the familiar-word list. When `false`, syllables alone decide.
    pub use_word_list: bool,
}

impl DifficultyRule {
    /// The locale's default rule (Dale-Chall, Spache).
    pub const fn for_locale(ctx: &LocaleContext<'_>) -> Self {
        Self {
            min_syllables: ctx.config.difficult_word_syllables,
            use_word_list: true,
        }
    }
}

/// Classify every word of `text`, in order.
pub fn tokens(text: &str, ctx: &LocaleContext<'_>, rule: DifficultyRule) -> Vec<WordToken> {
    let lower = text.to_lowercase();
    let familiar: HashSet<String> = ctx
        .config
        .familiar_words
        .iter()
        .map(|w| w.to_lowercase())
        .collect();

    WORD_PATTERN
        .find_iter(&lower)
        .flat_map(|m| text::segment(m.as_str(), ctx.config.segmentation))
        .map(|word| {
            let surface = word.trim_matches(['\'', '‘', '’']).to_string();
            let syllables = syllables::count(&surface, ctx);
            let difficult = is_difficult(&surface, syllables, ctx, rule, &familiar);
            WordToken {
                surface,
                syllables,
                difficult,
            }
        })
        .filter(|token| !token.surface.is_empty())
        .collect()
}

fn is_difficult(
    word: &str,
    syllables: usize,
    ctx: &LocaleContext<'_>,
    rule: DifficultyRule,
    familiar: &HashSet<String>,
) -> bool {
    if syllables < rule.min_syllables || word.chars().any(char::is_numeric) {
        return false;
    }
    if familiar.contains(word) {
        return false;
    }
    let easy = rule.use_word_list && ctx.words.is_easy_word(ctx.language, word) == Some(true);
    !easy
}

/// Difficult words in first-occurrence order, without duplicates.
pub fn difficult_words_list(
    text: &str,
    ctx: &LocaleContext<'_>,
    rule: DifficultyRule,
) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens(text, ctx, rule)
        .into_iter()
        .filter(|token| token.difficult && seen.insert(token.surface.clone()))
        .map(|token| token.surface)
        .collect()
}

/// Number of distinct difficult words.
pub fn difficult_words(text: &str, ctx: &LocaleContext<'_>, rule: DifficultyRule) -> usize {
    difficult_words_list(text, ctx, rule).len()
}
