//! Word-list and syllable-dictionary providers.
//!
//! The engine treats familiar-word lists and syllable dictionaries as an
//! external collaborator behind [`WordListProvider`]. [`BuiltinWordLists`]
//! serves the bundled English data; [`CustomWordLists`] lets callers inject
//! their own per-language lists.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::dictionaries::{easy_words, syllable_dict};

/// Source of per-language familiar-word lists and syllable counts.
///
/// Both lookups receive a lowercase word and a lowercase language subtag.
pub trait WordListProvider: Send + Sync + fmt::Debug {
    /// Whether `word` is on `language`'s familiar ("easy") word list.
    ///
    /// `None` means the provider has no list for the language; the difficulty
    /// classifier then decides on syllable count alone.
    fn is_easy_word(&self, language: &str, word: &str) -> Option<bool>;

    /// Dictionary syllable count for `word`, if known.
    fn syllables(&self, language: &str, word: &str) -> Option<usize> {
        let _ = (language, word);
        None
    }
}

/// The bundled English familiar-word list and syllable dictionary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinWordLists;

impl WordListProvider for BuiltinWordLists {
    fn is_easy_word(&self, language: &str, word: &str) -> Option<bool> {
        (language == "en").then(|| easy_words::is_familiar(word))
    }

    fn syllables(&self, language: &str, word: &str) -> Option<usize> {
        if language == "en" {
            syllable_dict::lookup_syllables(word)
        } else {
            None
        }
    }
}

/// Caller-supplied word lists, optionally layered over the built-in data.
///
/// A language with a custom easy-word list uses only that list; languages
/// without one fall through to [`BuiltinWordLists`] unless built with
/// [`CustomWordLists::without_builtin`].
///
/// ```
/// use textmetrics::provider::{CustomWordLists, WordListProvider};
///
/// let lists = CustomWordLists::new().with_easy_words("de", ["haus", "katze"]);
/// assert_eq!(lists.is_easy_word("de", "haus"), Some(true));
/// assert_eq!(lists.is_easy_word("de", "bahnhof"), Some(false));
/// assert_eq!(lists.is_easy_word("en", "house"), Some(true));
/// ```
#[derive(Debug, Clone)]
pub struct CustomWordLists {
    easy: HashMap<String, HashSet<String>>,
    syllables: HashMap<String, HashMap<String, usize>>,
    builtin: bool,
}

impl Default for CustomWordLists {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomWordLists {
    /// Empty custom lists over the built-in data.
    pub fn new() -> Self {
        Self {
            easy: HashMap::new(),
            syllables: HashMap::new(),
            builtin: true,
        }
    }

    /// Empty custom lists with no built-in fallback.
    pub fn without_builtin() -> Self {
        Self {
            builtin: false,
            ..Self::new()
        }
    }

    /// Add familiar words for a language (extends any list already added).
    #[must_use]
    pub fn with_easy_words<I, S>(mut self, language: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.easy
            .entry(language.to_lowercase())
            .or_default()
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    /// Add known syllable counts for a language.
    #[must_use]
    pub fn with_syllables<I, S>(mut self, language: &str, counts: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        self.syllables
            .entry(language.to_lowercase())
            .or_default()
            .extend(
                counts
                    .into_iter()
                    .map(|(word, count)| (word.as_ref().to_lowercase(), count)),
            );
        self
    }
}

impl WordListProvider for CustomWordLists {
    fn is_easy_word(&self, language: &str, word: &str) -> Option<bool> {
        match self.easy.get(language) {
            Some(list) => Some(list.contains(word)),
            None if self.builtin => BuiltinWordLists.is_easy_word(language, word),
            None => None,
        }
    }

    fn syllables(&self, language: &str, word: &str) -> Option<usize> {
        self.syllables
            .get(language)
            .and_then(|dict| dict.get(word).copied())
            .or_else(|| {
                self.builtin
                    .then(|| BuiltinWordLists.syllables(language, word))
                    .flatten()
            })
    }
}
