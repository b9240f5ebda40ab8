//! Built-in word data.
//!
//! English familiar words and syllable counts back the default
//! [`WordListProvider`](crate::provider::WordListProvider); abbreviations feed
//! the sentence splitter for every built-in language.

pub mod abbreviations;
pub mod easy_words;
pub mod syllable_dict;
