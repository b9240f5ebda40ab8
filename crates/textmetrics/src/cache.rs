//! Memoization of metric results.
//!
//! A [`MetricCache`] holds one table per [`Metric`]. Each table maps the input
//! text plus any extra arguments to the computed value and keeps its own hit
//! and miss counters. Texts are interned: a paragraph scored by twenty
//! metrics is stored once, and lookups borrow the caller's `&str`. The cache is not partitioned by locale: a
//! [`LocaleSession`](crate::engine::LocaleSession) owns exactly one cache, and
//! switching locale replaces the session, cache and counters included.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::consensus::GradeBand;

/// Default per-metric capacity of the LRU policy.
pub const DEFAULT_CAPACITY: usize = 128;

macro_rules! metrics {
    ($($variant:ident => $name:literal,)+) => {
        /// Identity of a memoized operation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
        #[serde(rename_all = "snake_case")]
        #[allow(missing_docs)]
        pub enum Metric {
            $($variant,)+
        }

        impl Metric {
            /// Every metric, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Public operation name, e.g. `"flesch_reading_ease"`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

metrics! {
    CharCount => "char_count",
    LetterCount => "letter_count",
    LexiconCount => "lexicon_count",
    SentenceCount => "sentence_count",
    SyllableCount => "syllable_count",
    PolysyllableCount => "polysyllable_count",
    MonosyllableCount => "monosyllable_count",
    ComplexWordCount => "complex_word_count",
    LongWordCount => "long_word_count",
    MiniwordCount => "miniword_count",
    AvgSentenceLength => "avg_sentence_length",
    AvgSyllablesPerWord => "avg_syllables_per_word",
    AvgCharacterPerWord => "avg_character_per_word",
    AvgLetterPerWord => "avg_letter_per_word",
    AvgSentencePerWord => "avg_sentence_per_word",
    WordsPerSentence => "words_per_sentence",
    DifficultWords => "difficult_words",
    DifficultWordsList => "difficult_words_list",
    FleschReadingEase => "flesch_reading_ease",
    FleschKincaidGrade => "flesch_kincaid_grade",
    GunningFog => "gunning_fog",
    SmogIndex => "smog_index",
    ColemanLiauIndex => "coleman_liau_index",
    AutomatedReadabilityIndex => "automated_readability_index",
    LinsearWriteFormula => "linsear_write_formula",
    DaleChallReadabilityScore => "dale_chall_readability_score",
    DaleChallReadabilityScoreV2 => "dale_chall_readability_score_v2",
    SpacheReadability => "spache_readability",
    Lix => "lix",
    Rix => "rix",
    FernandezHuerta => "fernandez_huerta",
    SzigrisztPazos => "szigriszt_pazos",
    GutierrezPolini => "gutierrez_polini",
    Crawford => "crawford",
    GulpeaseIndex => "gulpease_index",
    WienerSachtextformel => "wiener_sachtextformel",
    McalpineEflaw => "mcalpine_eflaw",
    ConsensusGrade => "consensus_grade",
    TextStandard => "text_standard",
    ReadingTime => "reading_time",
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many entries each metric table may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Never evict; entries live until cleared.
    Unbounded,
    /// Keep at most `capacity` entries per metric, evicting the least
    /// recently used.
    Lru {
        /// Maximum entries per metric.
        capacity: NonZeroUsize,
    },
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self::Lru {
            capacity: NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl EvictionPolicy {
    /// Per-metric capacity, `None` when unbounded.
    pub const fn capacity(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Lru { capacity } => Some(capacity.get()),
        }
    }
}

/// Hit/miss statistics for one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CacheInfo {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
    /// Entries currently held.
    pub size: usize,
    /// Entry limit, `None` when unbounded.
    pub capacity: Option<usize>,
}

/// A memoized result.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    /// A counter.
    Count(usize),
    /// A score or average.
    Score(f64),
    /// A word list.
    Words(Arc<[String]>),
    /// A consensus band.
    Band(GradeBand),
    /// A formatted label.
    Label(Arc<str>),
}

/// Types that round-trip through [`CachedValue`].
pub trait Cacheable: Sized {
    /// Wrap for storage.
    fn into_cached(self) -> CachedValue;
    /// Unwrap a stored value, `None` on a variant mismatch.
    fn from_cached(value: &CachedValue) -> Option<Self>;
}

impl Cacheable for usize {
    fn into_cached(self) -> CachedValue {
        CachedValue::Count(self)
    }

    fn from_cached(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::Count(n) => Some(*n),
            _ => None,
        }
    }
}

impl Cacheable for f64 {
    fn into_cached(self) -> CachedValue {
        CachedValue::Score(self)
    }

    fn from_cached(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::Score(x) => Some(*x),
            _ => None,
        }
    }
}

impl Cacheable for Vec<String> {
    fn into_cached(self) -> CachedValue {
        CachedValue::Words(self.into())
    }

    fn from_cached(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::Words(words) => Some(words.to_vec()),
            _ => None,
        }
    }
}

impl Cacheable for GradeBand {
    fn into_cached(self) -> CachedValue {
        CachedValue::Band(self)
    }

    fn from_cached(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::Band(band) => Some(*band),
            _ => None,
        }
    }
}

impl Cacheable for String {
    fn into_cached(self) -> CachedValue {
        CachedValue::Label(self.into())
    }

    fn from_cached(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::Label(label) => Some(label.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Entry {
    value: CachedValue,
    last_used: u64,
}

/// One metric's table and counters.
///
/// Entries are keyed by text first, then by the non-text arguments, so a
/// lookup borrows the caller's `&str` instead of building an owned key.
#[derive(Debug, Default)]
struct FunctionCache {
    entries: HashMap<Arc<str>, HashMap<Box<str>, Entry>>,
    hits: u64,
    misses: u64,
}

impl FunctionCache {
    fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    fn contains(&self, text: &str, args: &str) -> bool {
        self.entries
            .get(text)
            .is_some_and(|by_args| by_args.contains_key(args))
    }

    /// Remove the least recently used entry and return its text.
    fn evict_oldest(&mut self) -> Option<Arc<str>> {
        let (text, args) = self
            .entries
            .iter()
            .flat_map(|(text, by_args)| {
                by_args
                    .iter()
                    .map(move |(args, entry)| (text, args, entry.last_used))
            })
            .min_by_key(|&(_, _, last_used)| last_used)
            .map(|(text, args, _)| (Arc::clone(text), args.clone()))?;

        if let Some(by_args) = self.entries.get_mut(&text) {
            by_args.remove(&args);
            if by_args.is_empty() {
                self.entries.remove(&text);
            }
        }
        Some(text)
    }
}

/// Per-metric memo tables with a shared eviction policy.
///
/// Each distinct text is stored once and shared by every table that holds
/// a result for it; it is released when the last such entry goes.
#[derive(Debug, Default)]
pub struct MetricCache {
    policy: EvictionPolicy,
    functions: HashMap<Metric, FunctionCache>,
    texts: HashSet<Arc<str>>,
    tick: u64,
}

impl MetricCache {
    /// An empty cache using `policy`.
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            policy,
            functions: HashMap::new(),
            texts: HashSet::new(),
            tick: 0,
        }
    }

    /// The eviction policy in force.
    pub const fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Number of distinct texts held across all tables.
    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    /// Look up a result, counting a hit or a miss.
    pub fn get(&mut self, metric: Metric, text: &str, args: &str) -> Option<CachedValue> {
        self.tick += 1;
        let tick = self.tick;
        let function = self.functions.entry(metric).or_default();
        match function
            .entries
            .get_mut(text)
            .and_then(|by_args| by_args.get_mut(args))
        {
            Some(entry) => {
                function.hits += 1;
                entry.last_used = tick;
                Some(entry.value.clone())
            }
            None => {
                function.misses += 1;
                tracing::trace!(%metric, args, text_len = text.len(), "cache miss");
                None
            }
        }
    }

    /// Store a result, evicting the least recently used entry when the
    /// metric's table is full.
    pub fn insert(&mut self, metric: Metric, text: &str, args: &str, value: CachedValue) {
        self.tick += 1;
        let tick = self.tick;
        let shared = self.intern(text);
        let function = self.functions.entry(metric).or_default();

        let mut evicted = None;
        if let Some(capacity) = self.policy.capacity()
            && !function.contains(text, args)
            && function.len() >= capacity
        {
            evicted = function.evict_oldest();
            tracing::debug!(%metric, capacity, "evicted least recently used entry");
        }

        function.entries.entry(shared).or_default().insert(
            args.into(),
            Entry {
                value,
                last_used: tick,
            },
        );

        if let Some(text) = evicted {
            self.release(text);
        }
    }

    /// The shared copy of `text`, stored on first use.
    fn intern(&mut self, text: &str) -> Arc<str> {
        if let Some(shared) = self.texts.get(text) {
            return Arc::clone(shared);
        }
        let shared: Arc<str> = Arc::from(text);
        self.texts.insert(Arc::clone(&shared));
        shared
    }

    /// Forget `text` once no table refers to it.
    fn release(&mut self, text: Arc<str>) {
        // One reference is ours, one is the interner's
        if Arc::strong_count(&text) <= 2 {
            self.texts.remove(&*text);
        }
    }

    /// Statistics for one metric.
    pub fn info(&self, metric: Metric) -> CacheInfo {
        let capacity = self.policy.capacity();
        self.functions.get(&metric).map_or(
            CacheInfo {
                capacity,
                ..CacheInfo::default()
            },
            |function| CacheInfo {
                hits: function.hits,
                misses: function.misses,
                size: function.len(),
                capacity,
            },
        )
    }

    /// Drop one metric's entries and reset its counters.
    pub fn clear(&mut self, metric: Metric) {
        if let Some(function) = self.functions.remove(&metric) {
            for text in function.entries.into_keys() {
                self.release(text);
            }
        }
    }

    /// Drop everything and reset all counters.
    pub fn clear_all(&mut self) {
        self.functions.clear();
        self.texts.clear();
        self.tick = 0;
    }

    /// Statistics for every metric that has been looked up, in
    /// declaration order.
    pub fn stats(&self) -> Vec<(Metric, CacheInfo)> {
        let mut stats: Vec<(Metric, CacheInfo)> = self
            .functions
            .keys()
            .map(|&metric| (metric, self.info(metric)))
            .collect();
        stats.sort_unstable_by_key(|(metric, _)| *metric);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lru(capacity: usize) -> EvictionPolicy {
        EvictionPolicy::Lru {
            capacity: NonZeroUsize::new(capacity).unwrap(),
        }
    }

    #[test]
    fn metric_names_are_unique() {
        let mut names: Vec<&str> = Metric::ALL.iter().map(|m| m.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Metric::ALL.len());
        assert_eq!(Metric::FleschReadingEase.to_string(), "flesch_reading_ease");
    }

    #[test]
    fn miss_then_hit() {
        let mut cache = MetricCache::default();
        assert_eq!(cache.get(Metric::LexiconCount, "a b", "true"), None);
        cache.insert(Metric::LexiconCount, "a b", "true", 2_usize.into_cached());
        assert_eq!(
            cache.get(Metric::LexiconCount, "a b", "true"),
            Some(CachedValue::Count(2))
        );

        let info = cache.info(Metric::LexiconCount);
        assert_eq!((info.hits, info.misses, info.size), (1, 1, 1));
        assert_eq!(info.capacity, Some(DEFAULT_CAPACITY));
    }

    #[test]
    fn arguments_are_part_of_the_key() {
        let mut cache = MetricCache::default();
        cache.insert(Metric::CharCount, "a b", "true", 2_usize.into_cached());
        assert_eq!(cache.get(Metric::CharCount, "a b", "false"), None);
        assert_eq!(cache.get(Metric::LetterCount, "a b", "true"), None);
        assert_eq!(cache.info(Metric::CharCount).misses, 1);
        assert_eq!(cache.info(Metric::LetterCount).misses, 1);
    }

    #[test]
    fn lru_evicts_least_recently_used() {
        let mut cache = MetricCache::new(lru(2));
        cache.insert(Metric::SyllableCount, "one", "", 1_usize.into_cached());
        cache.insert(Metric::SyllableCount, "two", "", 1_usize.into_cached());
        // Touch "one" so "two" becomes the oldest
        assert!(cache.get(Metric::SyllableCount, "one", "").is_some());
        cache.insert(Metric::SyllableCount, "three", "", 1_usize.into_cached());

        assert_eq!(cache.info(Metric::SyllableCount).size, 2);
        assert!(cache.get(Metric::SyllableCount, "one", "").is_some());
        assert!(cache.get(Metric::SyllableCount, "two", "").is_none());
        assert!(cache.get(Metric::SyllableCount, "three", "").is_some());
    }

    #[test]
    fn capacity_is_per_metric() {
        let mut cache = MetricCache::new(lru(1));
        cache.insert(Metric::CharCount, "x", "", 1_usize.into_cached());
        cache.insert(Metric::LetterCount, "x", "", 1_usize.into_cached());
        assert_eq!(cache.info(Metric::CharCount).size, 1);
        assert_eq!(cache.info(Metric::LetterCount).size, 1);
    }

    #[test]
    fn unbounded_keeps_everything() {
        let mut cache = MetricCache::new(EvictionPolicy::Unbounded);
        for i in 0..500_usize {
            cache.insert(Metric::CharCount, &i.to_string(), "", i.into_cached());
        }
        let info = cache.info(Metric::CharCount);
        assert_eq!(info.size, 500);
        assert_eq!(info.capacity, None);
    }

    #[test]
    fn clear_resets_one_metric() {
        let mut cache = MetricCache::default();
        cache.insert(Metric::CharCount, "x", "", 1_usize.into_cached());
        cache.insert(Metric::LetterCount, "x", "", 1_usize.into_cached());
        let _ = cache.get(Metric::CharCount, "x", "");
        cache.clear(Metric::CharCount);

        assert_eq!(cache.info(Metric::CharCount), CacheInfo {
            capacity: Some(DEFAULT_CAPACITY),
            ..CacheInfo::default()
        });
        assert_eq!(cache.info(Metric::LetterCount).size, 1);

        cache.clear_all();
        assert!(cache.stats().is_empty());
    }

    #[test]
    fn text_is_stored_once_across_metrics() {
        let mut cache = MetricCache::default();
        let text = "Cool dogs wear da sunglasses.";
        for &metric in Metric::ALL {
            cache.insert(metric, text, "", 1_usize.into_cached());
        }
        cache.insert(Metric::CharCount, text, "false", 2_usize.into_cached());
        assert_eq!(cache.text_count(), 1);
        assert_eq!(cache.info(Metric::CharCount).size, 2);
        assert_eq!(
            cache.get(Metric::CharCount, text, "false"),
            Some(CachedValue::Count(2))
        );
    }

    #[test]
    fn evicted_texts_are_released() {
        let mut cache = MetricCache::new(lru(1));
        cache.insert(Metric::CharCount, "first", "", 1_usize.into_cached());
        cache.insert(Metric::LetterCount, "first", "", 1_usize.into_cached());
        cache.insert(Metric::CharCount, "second", "", 2_usize.into_cached());
        // LetterCount still holds "first"
        assert_eq!(cache.text_count(), 2);

        cache.insert(Metric::LetterCount, "third", "", 3_usize.into_cached());
        assert_eq!(cache.text_count(), 2);
        assert_eq!(cache.get(Metric::CharCount, "first", ""), None);
    }

    #[test]
    fn clearing_releases_texts() {
        let mut cache = MetricCache::default();
        cache.insert(Metric::CharCount, "shared", "", 1_usize.into_cached());
        cache.insert(Metric::LetterCount, "shared", "", 1_usize.into_cached());
        cache.insert(Metric::LetterCount, "own", "", 1_usize.into_cached());

        cache.clear(Metric::CharCount);
        assert_eq!(cache.text_count(), 2);
        cache.clear(Metric::LetterCount);
        assert_eq!(cache.text_count(), 0);

        cache.insert(Metric::CharCount, "again", "", 1_usize.into_cached());
        cache.clear_all();
        assert_eq!(cache.text_count(), 0);
    }

    #[test]
    fn stats_are_in_declaration_order() {
        let mut cache = MetricCache::default();
        let _ = cache.get(Metric::ReadingTime, "x", "");
        let _ = cache.get(Metric::CharCount, "x", "");
        let metrics: Vec<Metric> = cache.stats().into_iter().map(|(m, _)| m).collect();
        assert_eq!(metrics, vec![Metric::CharCount, Metric::ReadingTime]);
    }

    #[test]
    fn cached_values_round_trip_by_type() {
        let words = vec!["sunglasses".to_string()];
        let stored = words.clone().into_cached();
        assert_eq!(Vec::<String>::from_cached(&stored), Some(words));
        assert_eq!(usize::from_cached(&stored), None);
        assert_eq!(f64::from_cached(&1.5_f64.into_cached()), Some(1.5));
        assert_eq!(
            String::from_cached(&"9th and 10th grade".to_string().into_cached()),
            Some("9th and 10th grade".to_string())
        );
    }

    #[test]
    fn policy_serde_shape() {
        let policy: EvictionPolicy = serde_json::from_str(r#"{"lru":{"capacity":8}}"#).unwrap();
        assert_eq!(policy.capacity(), Some(8));
        let policy: EvictionPolicy = serde_json::from_str(r#""unbounded""#).unwrap();
        assert_eq!(policy, EvictionPolicy::Unbounded);
        assert!(serde_json::from_str::<EvictionPolicy>(r#"{"lru":{"capacity":0}}"#).is_err());
    }
}
