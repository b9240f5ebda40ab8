//! English syllable dictionary.
//!
//! Known counts for common words and for words the vowel-group heuristic
//! gets wrong. Anything not listed is estimated by [`crate::syllables`].

use std::collections::HashMap;
use std::sync::LazyLock;

const ONE: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "it", "for", "not", "on", "with",
    "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we", "say", "her",
    "she", "or", "an", "will", "my", "one", "all", "would", "there", "their", "what", "so", "up",
    "out", "if", "who", "get", "which", "go", "me", "when", "make", "can", "like", "time", "no",
    "just", "him", "know", "take", "see", "use", "good", "think", "way", "could", "first", "than",
    "look", "find", "more", "day", "year", "work", "back", "call", "world", "still", "try",
    "last", "need", "feel", "ask", "want", "hand", "place", "part", "child", "eye", "life",
    "week", "case", "point", "fact", "thing", "man", "end", "give", "room", "games", "built",
    "come", "home", "game", "chess", "wind", "down", "bit", "some", "done", "gone", "once",
    "there's", "they're", "where", "here", "whole", "were", "fire", "hour", "our",
    "tired", "named", "played", "warmed", "smiled", "through", "though", "thought", "brought",
];

const TWO: &[&str] = &[
    "people", "into", "other", "because", "over", "after", "never", "under", "also", "only",
    "being", "before", "many", "even", "against", "woman", "little", "should", "problem",
    "number", "become", "during", "water", "often", "issue", "system", "program", "question",
    "really", "father", "mother", "future", "doctor", "major", "always", "public", "maybe",
    "follow", "moment", "between", "able", "table", "simple", "uncle", "handle", "sample",
    "battle", "couple", "double", "trouble", "purple", "circle", "about", "real", "poem", "poet",
    "going", "doing", "seeing", "skiing", "giant", "quiet", "diet", "science", "patient", "lion",
    "every", "evening", "police", "orange", "playing", "children", "adults", "husband",
    "someone", "something", "nothing", "chances", "choosing", "pressure", "deeply", "taking",
    "wanted", "needed", "started", "ended", "lately", "business", "believe", "structured",
    "researched",
];

const THREE: &[&str] = &[
    "together", "different", "however", "another", "important", "company", "example", "family",
    "already", "possible", "everything", "area", "beautiful", "policy", "difficult", "everyone",
    "physical", "continue", "general", "natural", "several", "remember", "interest", "national",
    "develop", "personal", "probably", "actually", "suddenly", "library", "yesterday",
    "chocolate", "camera", "banana", "potato", "tomato", "violet", "separate", "diamond",
    "radio", "video", "opponent", "wonderful", "sunglasses", "idea",
];

const FOUR: &[&str] = &[
    "necessary", "particular", "especially", "everybody", "individual", "available",
    "experience", "reality", "ability", "education", "technology", "community", "environment",
    "generation", "economy", "society", "information", "political", "relationship",
    "immediately", "apparently", "obviously", "definitely", "conversation", "relationships",
    "development", "activities", "enjoyable", "valuable",
];

const FIVE: &[&str] = &[
    "organization", "responsibility", "unfortunately", "possibility", "communication",
    "international", "necessarily", "administration", "personality", "university",
    "opportunity", "interpersonal",
];

/// Dictionary of English words with known syllable counts.
pub static SYLLABLE_DICT: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (count, words) in [(1, ONE), (2, TWO), (3, THREE), (4, FOUR), (5, FIVE)] {
        map.extend(words.iter().map(|&word| (word, count)));
    }
    map
});

/// Look up a word's syllable count (case-insensitive).
pub fn lookup_syllables(word: &str) -> Option<usize> {
    SYLLABLE_DICT.get(word.to_lowercase().as_str()).copied()
}
