//! Tokenization: punctuation stripping, word segmentation, and sentence
//! splitting.
//!
//! Everything here is locale-parameterized but locale-agnostic: callers pass
//! the terminator set, segmentation strategy, and language subtag taken from
//! the active [`LocaleConfig`](crate::locale::LocaleConfig).

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::dictionaries::abbreviations::{is_abbreviation, is_sentence_opener};
use crate::error::TextResult;
use crate::locale::Segmentation;

/// Punctuation and symbols, except apostrophes (kept so contractions stay whole).
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s'’]").expect("valid regex"));

/// Regex for initials (J.K., U.S.A., etc.).
static INITIALS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]\.(?:[A-Z]\.)*").expect("valid regex"));

/// Characters that may trail a terminator and still belong to its sentence.
const CLOSERS: &[char] = &['"', '\'', '”', '’', ')', ']', '»', '」', '』'];

/// Decode caller-supplied bytes as UTF-8.
pub fn decode(bytes: &[u8]) -> TextResult<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

/// Remove punctuation and symbols, keeping letters, digits, whitespace, and
/// apostrophes.
pub fn remove_punctuation(text: &str) -> Cow<'_, str> {
    PUNCTUATION.replace_all(text, "")
}

/// Scripts written without spaces between words: CJK ideographs, kana, and
/// Hangul syllables.
pub const fn is_ideographic(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'   // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{3400}'..='\u{4DBF}' // CJK Extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK Unified Ideographs
        | '\u{F900}'..='\u{FAFF}' // CJK Compatibility Ideographs
        | '\u{AC00}'..='\u{D7AF}' // Hangul Syllables
    )
}

/// Split one whitespace token into words under the given segmentation.
///
/// With [`Segmentation::Ideographic`] every ideograph or kana becomes its own
/// word and runs of other characters stay together.
pub fn segment(token: &str, segmentation: Segmentation) -> Vec<&str> {
    match segmentation {
        Segmentation::Whitespace => vec![token],
        Segmentation::Ideographic => {
            let mut parts = Vec::new();
            let mut run_start = None;
            for (idx, c) in token.char_indices() {
                if is_ideographic(c) {
                    if let Some(start) = run_start.take() {
                        parts.push(&token[start..idx]);
                    }
                    parts.push(&token[idx..idx + c.len_utf8()]);
                } else if run_start.is_none() {
                    run_start = Some(idx);
                }
            }
            if let Some(start) = run_start {
                parts.push(&token[start..]);
            }
            parts
        }
    }
}

/// Extract words.
///
/// With `strip_punctuation`, punctuation is removed first, so tokens made
/// only of punctuation (a lone dash, an ellipsis) disappear.
pub fn words(text: &str, strip_punctuation: bool, segmentation: Segmentation) -> Vec<String> {
    let cleaned = if strip_punctuation {
        remove_punctuation(text)
    } else {
        Cow::Borrowed(text)
    };
    cleaned
        .split_whitespace()
        .flat_map(|token| segment(token, segmentation))
        .map(str::to_string)
        .collect()
}

/// Split text into sentences with abbreviation, initial, decimal, and URL
/// awareness.
///
/// A run of terminators (`?!`, `...`) plus any closing quotes or brackets
/// ends a single sentence. Fragments without a letter or digit are dropped.
#[tracing::instrument(skip_all, fields(text_len = text.len(), language = %language))]
pub fn split_sentences(text: &str, terminators: &str, language: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let is_terminator = |c: char| terminators.contains(c);
    let mut sentences = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        current.push(ch);

        if is_terminator(ch) {
            let run_start = i;
            while i + 1 < chars.len()
                && (is_terminator(chars[i + 1]) || CLOSERS.contains(&chars[i + 1]))
            {
                i += 1;
                current.push(chars[i]);
            }

            let context = extract_context(&chars, run_start, i);
            if is_sentence_boundary(&context, language) {
                push_sentence(&mut sentences, &current);
                current.clear();
            }
        }

        i += 1;
    }

    push_sentence(&mut sentences, &current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = raw.trim();
    if sentence.chars().any(char::is_alphanumeric) {
        sentences.push(sentence.to_string());
    }
}

/// Context around a potential sentence boundary.
struct SentenceContext {
    /// The full terminator run (`"."`, `"?!"`, `"..."`).
    run: String,
    word_before: String,
    word_after: String,
    char_after: Option<char>,
    /// Whether whitespace separates the run from the next character.
    spaced: bool,
    is_end_of_text: bool,
}

fn extract_context(chars: &[char], run_start: usize, run_end: usize) -> SentenceContext {
    let mut after_start = run_end + 1;
    while after_start < chars.len() && chars[after_start].is_whitespace() {
        after_start += 1;
    }

    SentenceContext {
        run: chars[run_start..=run_end].iter().collect(),
        word_before: get_word_before(chars, run_start),
        word_after: chars[after_start..]
            .iter()
            .take_while(|c| c.is_alphanumeric())
            .collect(),
        char_after: chars.get(after_start).copied(),
        spaced: after_start > run_end + 1,
        is_end_of_text: after_start >= chars.len(),
    }
}

fn get_word_before(chars: &[char], pos: usize) -> String {
    let mut i = pos;

    // Skip back past periods and whitespace
    while i > 0 {
        i -= 1;
        if !chars[i].is_whitespace() && chars[i] != '.' {
            break;
        }
    }

    let mut word_chars = Vec::new();
    loop {
        if chars[i].is_alphanumeric() || chars[i] == '.' {
            word_chars.push(chars[i]);
        } else {
            break;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    word_chars.reverse();
    word_chars.iter().collect()
}

fn is_sentence_boundary(context: &SentenceContext, language: &str) -> bool {
    if context.is_end_of_text {
        return true;
    }

    // Closing quotes and brackets do not change what the terminator means
    let run = context.run.trim_end_matches(CLOSERS);
    if run != "." {
        // Ellipses trail off mid-sentence unless a capital follows
        if run.starts_with("..") || run.starts_with('…') {
            return context.char_after.is_some_and(char::is_uppercase);
        }
        return true;
    }

    // "3.14", "example.com", "e.g": a period glued to the next word
    if !context.spaced && context.char_after.is_some_and(char::is_alphanumeric) {
        return false;
    }

    if is_likely_abbreviation(&context.word_before, language) {
        return false;
    }

    // A lone capital is an initial unless a common sentence opener follows
    if is_single_capital(&context.word_before)
        && !is_sentence_opener(language, &context.word_after)
    {
        return false;
    }

    if is_likely_initial(&context.word_before) {
        return false;
    }

    // Lowercase continuation after a bare period is almost never a new sentence
    !context.char_after.is_some_and(char::is_lowercase)
}

fn is_likely_abbreviation(word: &str, language: &str) -> bool {
    !word.is_empty() && is_abbreviation(language, word.trim_end_matches('.'))
}

fn is_single_capital(word: &str) -> bool {
    let mut letters = word.trim_end_matches('.').chars();
    letters.next().is_some_and(char::is_uppercase) && letters.next().is_none()
}

fn is_likely_initial(word: &str) -> bool {
    !word.is_empty() && word.contains('.') && INITIALS_PATTERN.is_match(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        split_sentences(text, ".!?", "en")
    }

    #[test]
    fn basic_sentences() {
        let sentences = split("This is a sentence. This is another sentence.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "This is a sentence.");
        assert_eq!(sentences[1], "This is another sentence.");
    }

    #[test]
    fn abbreviations_not_split() {
        let sentences = split("Dr. Smith went to the store. He bought milk.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("Dr. Smith"));
    }

    #[test]
    fn initials_not_split() {
        let sentences = split("The U.S. Army arrived. J. Smith led it.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn decimals_and_urls_not_split() {
        let sentences = split("The price is 3.14 dollars. See example.com for more.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("3.14"));
        assert!(sentences[1].contains("example.com"));
    }

    #[test]
    fn sentence_ending_in_number_splits() {
        assert_eq!(split("The answer is 3.5. Next question.").len(), 2);
    }

    #[test]
    fn question_and_exclamation() {
        let sentences = split("Are you serious? I can't believe it! This is amazing.");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn terminator_runs_count_once() {
        let sentences = split("What?! No way!!! Really...");
        assert_eq!(sentences, vec!["What?!", "No way!!!", "Really..."]);
    }

    #[test]
    fn closing_quote_stays_with_sentence() {
        let sentences = split("She said \"stop.\" Then she left.");
        assert_eq!(sentences, vec!["She said \"stop.\"", "Then she left."]);
    }

    #[test]
    fn quoted_period_before_lowercase_continues() {
        assert_eq!(split("He said \"stop.\" then he left.").len(), 1);
        assert_eq!(split("He said \"stop.\" Then he left.").len(), 2);
        assert_eq!(split("See (Dr.) Smith. He knows.").len(), 2);
    }

    #[test]
    fn lone_capital_before_sentence_opener_splits() {
        assert_eq!(split("I saw plan B. Then I left.").len(), 2);
        assert_eq!(split("So did I. The end.").len(), 2);
        assert_eq!(split("Ask J. Smith about it.").len(), 1);
    }

    #[test]
    fn ellipsis_before_lowercase_continues() {
        assert_eq!(split("Well... maybe not. Fine.").len(), 2);
    }

    #[test]
    fn punctuation_only_fragments_dropped() {
        assert!(split("... !!! ???").is_empty());
        assert_eq!(split("No terminator at all"), vec!["No terminator at all"]);
    }

    #[test]
    fn ideographic_terminators() {
        let sentences = split_sentences("今日は晴れです。明日は雨です。", ".!?。！？", "ja");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn empty_input() {
        assert!(split("").is_empty());
        assert!(split("   ").is_empty());
    }

    #[test]
    fn remove_punctuation_keeps_apostrophes() {
        assert_eq!(remove_punctuation("Don't stop - now!"), "Don't stop  now");
        assert_eq!(remove_punctuation("«Привет», мир."), "Привет мир");
    }

    #[test]
    fn words_with_and_without_punctuation() {
        let text = "Hello, world - it's me.";
        assert_eq!(
            words(text, true, Segmentation::Whitespace),
            vec!["Hello", "world", "it's", "me"]
        );
        assert_eq!(words(text, false, Segmentation::Whitespace).len(), 5);
    }

    #[test]
    fn ideographic_segmentation_splits_per_character() {
        assert_eq!(
            segment("ありがとうabc", Segmentation::Ideographic),
            vec!["あ", "り", "が", "と", "う", "abc"]
        );
        assert_eq!(
            segment("ありがとう", Segmentation::Whitespace),
            vec!["ありがとう"]
        );
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        assert_eq!(decode(b"plain").unwrap(), "plain");
        assert!(decode(&[0xff, 0xfe]).is_err());
    }
}
