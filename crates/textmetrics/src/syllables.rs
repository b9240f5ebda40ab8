//! Syllable estimation.
//!
//! Vowel-group counting with per-locale vowel sets and optional English
//! suffix rules, plus one syllable per ideograph, kana, or Hangul block.
//! When the locale allows it, the word-list provider's dictionary is
//! consulted first.

use crate::locale::{LocaleContext, SyllableRules};
use crate::text::is_ideographic;

/// Small kana and the prolonged-sound mark attach to the preceding mora.
const fn is_small_kana(c: char) -> bool {
    matches!(
        c,
        'ぁ' | 'ぃ' | 'ぅ' | 'ぇ' | 'ぉ' | 'っ' | 'ゃ' | 'ゅ' | 'ょ' | 'ゎ' | 'ァ' | 'ィ' | 'ゥ'
            | 'ェ' | 'ォ' | 'ッ' | 'ャ' | 'ュ' | 'ョ' | 'ヮ' | 'ヵ' | 'ヶ' | 'ー'
    )
}

/// Estimate syllables in a single word from its spelling alone.
///
/// Returns at least 1 for any word containing a letter, 0 otherwise.
pub fn estimate(word: &str, rules: &SyllableRules) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if letters.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| rules.vowels.contains(c);
    let mut count = 0_usize;
    let mut prev_vowel = false;

    for &c in &letters {
        if is_ideographic(c) {
            if !is_small_kana(c) {
                count += 1;
            }
            prev_vowel = false;
            continue;
        }
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    let n = letters.len();
    if rules.english_suffixes
        && n > 3
        && letters[n - 2..] == ['e', 'd']
        && !matches!(letters[n - 3], 't' | 'd')
        && count > 1
    {
        // "played", "tired"; but "wanted", "needed" keep the syllable
        count -= 1;
    } else if rules.silent_final_e
        && n > 2
        && letters[n - 1] == 'e'
        && !is_vowel(letters[n - 2])
        && count > 1
    {
        // Consonant + "le" is voiced: "table", "people"
        let voiced_le =
            rules.english_suffixes && letters[n - 2] == 'l' && !is_vowel(letters[n - 3]);
        if !voiced_le {
            count -= 1;
        }
    }

    count.max(1)
}

/// Syllables in a single word under a locale.
///
/// Dictionary counts win when the locale enables them. Words with digits but
/// no letters ("1990") count as one syllable; words with neither count zero.
pub fn count(word: &str, ctx: &LocaleContext<'_>) -> usize {
    let lower = word.to_lowercase();
    let trimmed = lower.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        return 0;
    }

    if ctx.config.syllables.use_dictionary
        && let Some(known) = ctx.words.syllables(ctx.language, trimmed)
    {
        return known;
    }

    match estimate(trimmed, &ctx.config.syllables) {
        0 => 1,
        n => n,
    }
}
