//! The memoized metric surface.
//!
//! [`ReadabilityEngine`] holds the active locale. Every call takes a snapshot
//! of the current [`LocaleSession`], which pairs one resolved locale with its
//! own [`MetricCache`]. [`ReadabilityEngine::set_locale`] builds a fresh
//! session and swaps it in under a write lock, so a caller sees either the
//! old locale with the old cache or the new locale with an empty one, never
//! a mix. Metrics nest through the cache: `flesch_reading_ease` looks up
//! `avg_sentence_length`, which looks up `lexicon_count` and
//! `sentence_count`, and each lookup is counted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheInfo, Cacheable, EvictionPolicy, Metric, MetricCache};
use crate::config::Config;
use crate::consensus::{self, GradeBand};
use crate::counters;
use crate::difficulty::{self, DifficultyRule};
use crate::error::TextResult;
use crate::formulas::{self, SachtextInputs, legacy_round, per};
use crate::locale::{
    DEFAULT_LOCALE, Fallback, LocaleConfig, LocaleContext, LocaleRegistry, ResolvedLocale,
};
use crate::provider::{BuiltinWordLists, WordListProvider};
use crate::syllables;
use crate::text;

/// Reading speed used when none is configured, in milliseconds per character.
pub const DEFAULT_MS_PER_CHAR: f64 = 14.69;

/// One resolved locale and the results computed under it.
#[derive(Debug)]
pub struct LocaleSession {
    locale: ResolvedLocale,
    provider: Arc<dyn WordListProvider>,
    cache: Mutex<MetricCache>,
}

impl LocaleSession {
    /// A session with an empty cache.
    pub fn new(
        locale: ResolvedLocale,
        provider: Arc<dyn WordListProvider>,
        policy: EvictionPolicy,
    ) -> Self {
        Self {
            locale,
            provider,
            cache: Mutex::new(MetricCache::new(policy)),
        }
    }

    /// The locale this session computes under.
    pub const fn locale(&self) -> &ResolvedLocale {
        &self.locale
    }

    /// The locale's coefficient table.
    pub fn config(&self) -> &LocaleConfig {
        &self.locale.config
    }

    fn context(&self) -> LocaleContext<'_> {
        LocaleContext {
            config: &self.locale.config,
            language: self.locale.language(),
            words: self.provider.as_ref(),
        }
    }

    fn cache(&self) -> MutexGuard<'_, MetricCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached result for `(metric, text, args)` or compute and
    /// store it. The lock is released while computing, so nested lookups
    /// can take it again.
    fn memo<T, F>(&self, metric: Metric, text: &str, args: &str, compute: F) -> T
    where
        T: Cacheable + Clone,
        F: FnOnce() -> T,
    {
        let cached = self.cache().get(metric, text, args);
        if let Some(value) = cached.as_ref().and_then(T::from_cached) {
            return value;
        }
        let value = compute();
        self.cache()
            .insert(metric, text, args, value.clone().into_cached());
        value
    }

    /// Cache statistics for one metric.
    pub fn cache_info(&self, metric: Metric) -> CacheInfo {
        self.cache().info(metric)
    }

    /// Drop one metric's entries and reset its counters.
    pub fn cache_clear(&self, metric: Metric) {
        self.cache().clear(metric);
    }

    /// Drop every entry and reset every counter.
    pub fn clear_cache(&self) {
        self.cache().clear_all();
    }

    /// Statistics for every metric looked up so far.
    pub fn cache_stats(&self) -> Vec<(Metric, CacheInfo)> {
        self.cache().stats()
    }

    /// Distinct texts currently held by the cache.
    pub fn cached_texts(&self) -> usize {
        self.cache().text_count()
    }

    // Counters

    /// Characters, optionally excluding whitespace.
    pub fn char_count(&self, text: &str, ignore_spaces: bool) -> usize {
        self.memo(Metric::CharCount, text, bool_arg(ignore_spaces), || {
            counters::char_count(text, ignore_spaces)
        })
    }

    /// Alphabetic characters, optionally excluding whitespace.
    pub fn letter_count(&self, text: &str, ignore_spaces: bool) -> usize {
        self.memo(Metric::LetterCount, text, bool_arg(ignore_spaces), || {
            counters::letter_count(text, ignore_spaces)
        })
    }

    /// Words, optionally ignoring punctuation-only tokens.
    pub fn lexicon_count(&self, text: &str, remove_punctuation: bool) -> usize {
        self.memo(
            Metric::LexiconCount,
            text,
            bool_arg(remove_punctuation),
            || counters::lexicon_count(text, remove_punctuation, self.config().segmentation),
        )
    }

    /// Sentences; 0 for blank text, otherwise at least 1.
    pub fn sentence_count(&self, text: &str) -> usize {
        self.memo(Metric::SentenceCount, text, "", || {
            counters::sentence_count(text, &self.context())
        })
    }

    /// Total syllables.
    pub fn syllable_count(&self, text: &str) -> usize {
        self.memo(Metric::SyllableCount, text, "", || {
            counters::syllable_count(text, &self.context())
        })
    }

    /// Words with at least the locale's SMOG polysyllable threshold.
    pub fn polysyllable_count(&self, text: &str) -> usize {
        self.memo(Metric::PolysyllableCount, text, "", || {
            counters::polysyllable_count(
                text,
                &self.context(),
                self.config().smog.polysyllable_syllables,
            )
        })
    }

    /// Words with exactly one syllable.
    pub fn monosyllable_count(&self, text: &str) -> usize {
        self.memo(Metric::MonosyllableCount, text, "", || {
            counters::monosyllable_count(text, &self.context())
        })
    }

    /// Distinct unfamiliar words at or above the Gunning Fog threshold.
    pub fn complex_word_count(&self, text: &str) -> usize {
        self.memo(Metric::ComplexWordCount, text, "", || {
            let ctx = self.context();
            let rule = DifficultyRule {
                min_syllables: ctx.config.gunning_fog.complex_word_syllables,
                use_word_list: true,
            };
            difficulty::difficult_words(text, &ctx, rule)
        })
    }

    /// Tokens longer than the locale's long-word length.
    pub fn long_word_count(&self, text: &str) -> usize {
        self.memo(Metric::LongWordCount, text, "", || {
            let config = self.config();
            counters::long_word_count(text, config.long_word_length, config.segmentation)
        })
    }

    /// Words of three characters or fewer.
    pub fn miniword_count(&self, text: &str) -> usize {
        self.memo(Metric::MiniwordCount, text, "", || {
            counters::miniword_count(text, self.config().segmentation)
        })
    }

    // Averages

    /// Words per sentence, one decimal.
    pub fn avg_sentence_length(&self, text: &str) -> f64 {
        self.memo(Metric::AvgSentenceLength, text, "", || {
            legacy_round(
                per(self.lexicon_count(text, true), self.sentence_count(text)),
                1,
            )
        })
    }

    /// Syllables per word, one decimal.
    pub fn avg_syllables_per_word(&self, text: &str) -> f64 {
        self.avg_syllables_per_interval(text, 1.0)
    }

    /// Syllables per `interval` words, one decimal.
    pub fn avg_syllables_per_interval(&self, text: &str, interval: f64) -> f64 {
        self.memo(
            Metric::AvgSyllablesPerWord,
            text,
            &interval.to_string(),
            || {
                let syllables = self.syllable_count(text) as f64 * interval;
                legacy_round(
                    formulas::ratio(syllables, self.lexicon_count(text, true) as f64),
                    1,
                )
            },
        )
    }

    /// Non-whitespace characters per word, two decimals.
    pub fn avg_character_per_word(&self, text: &str) -> f64 {
        self.memo(Metric::AvgCharacterPerWord, text, "", || {
            legacy_round(
                per(self.char_count(text, true), self.lexicon_count(text, true)),
                2,
            )
        })
    }

    /// Letters per word, two decimals.
    pub fn avg_letter_per_word(&self, text: &str) -> f64 {
        self.memo(Metric::AvgLetterPerWord, text, "", || {
            legacy_round(
                per(self.letter_count(text, true), self.lexicon_count(text, true)),
                2,
            )
        })
    }

    /// Sentences per word, two decimals.
    pub fn avg_sentence_per_word(&self, text: &str) -> f64 {
        self.memo(Metric::AvgSentencePerWord, text, "", || {
            legacy_round(
                per(self.sentence_count(text), self.lexicon_count(text, true)),
                2,
            )
        })
    }

    /// Words per sentence, unrounded.
    pub fn words_per_sentence(&self, text: &str) -> f64 {
        self.memo(Metric::WordsPerSentence, text, "", || {
            per(self.lexicon_count(text, true), self.sentence_count(text))
        })
    }

    // Difficult words

    fn difficult_words_with(&self, text: &str, rule: DifficultyRule) -> usize {
        let args = format!("{}:{}", rule.min_syllables, rule.use_word_list);
        self.memo(Metric::DifficultWords, text, &args, || {
            difficulty::difficult_words(text, &self.context(), rule)
        })
    }

    fn default_rule(&self) -> DifficultyRule {
        DifficultyRule::for_locale(&self.context())
    }

    /// Number of distinct difficult words.
    pub fn difficult_words(&self, text: &str) -> usize {
        self.difficult_words_with(text, self.default_rule())
    }

    /// Distinct difficult words in first-occurrence order.
    pub fn difficult_words_list(&self, text: &str) -> Vec<String> {
        self.memo(Metric::DifficultWordsList, text, "", || {
            difficulty::difficult_words_list(text, &self.context(), self.default_rule())
        })
    }

    fn percent_difficult(&self, text: &str, rule: DifficultyRule) -> f64 {
        100.0 * per(
            self.difficult_words_with(text, rule),
            self.lexicon_count(text, true),
        )
    }

    // Formulas

    /// Flesch Reading Ease.
    pub fn flesch_reading_ease(&self, text: &str) -> f64 {
        self.memo(Metric::FleschReadingEase, text, "", || {
            let c = &self.config().flesch;
            let asw = c.syllable_interval.map_or_else(
                || self.avg_syllables_per_word(text),
                |interval| self.avg_syllables_per_interval(text, interval),
            );
            formulas::flesch_reading_ease(self.avg_sentence_length(text), asw, c)
        })
    }

    /// Flesch-Kincaid grade level.
    pub fn flesch_kincaid_grade(&self, text: &str) -> f64 {
        self.memo(Metric::FleschKincaidGrade, text, "", || {
            formulas::flesch_kincaid_grade(
                self.avg_sentence_length(text),
                self.avg_syllables_per_word(text),
                &self.config().flesch_kincaid,
            )
        })
    }

    /// Gunning Fog index.
    pub fn gunning_fog(&self, text: &str) -> f64 {
        self.memo(Metric::GunningFog, text, "", || {
            formulas::gunning_fog(
                self.avg_sentence_length(text),
                self.complex_word_count(text),
                self.lexicon_count(text, true),
                &self.config().gunning_fog,
            )
        })
    }

    /// SMOG grade.
    pub fn smog_index(&self, text: &str) -> f64 {
        self.memo(Metric::SmogIndex, text, "", || {
            formulas::smog_index(
                self.polysyllable_count(text),
                self.sentence_count(text),
                &self.config().smog,
            )
        })
    }

    /// Coleman-Liau index.
    pub fn coleman_liau_index(&self, text: &str) -> f64 {
        self.memo(Metric::ColemanLiauIndex, text, "", || {
            formulas::coleman_liau_index(
                self.avg_letter_per_word(text),
                self.avg_sentence_per_word(text),
                &self.config().coleman_liau,
            )
        })
    }

    /// Automated Readability Index.
    pub fn automated_readability_index(&self, text: &str) -> f64 {
        self.memo(Metric::AutomatedReadabilityIndex, text, "", || {
            formulas::automated_readability_index(
                self.avg_character_per_word(text),
                legacy_round(self.words_per_sentence(text), 2),
                &self.config().ari,
            )
        })
    }

    /// Linsear Write over the leading word sample.
    pub fn linsear_write_formula(&self, text: &str) -> f64 {
        self.memo(Metric::LinsearWriteFormula, text, "", || {
            let ctx = self.context();
            let c = &ctx.config.linsear;
            let sample: Vec<String> = text::words(text, false, ctx.config.segmentation)
                .into_iter()
                .take(c.sample_words)
                .collect();
            let hard = sample
                .iter()
                .filter(|word| syllables::count(word, &ctx) >= c.hard_word_syllables)
                .count();
            let sentences = counters::sentence_count(&sample.join(" "), &ctx);
            formulas::linsear_write(sample.len() - hard, hard, sentences, c)
        })
    }

    /// Dale-Chall readability score.
    pub fn dale_chall_readability_score(&self, text: &str) -> f64 {
        self.memo(Metric::DaleChallReadabilityScore, text, "", || {
            formulas::dale_chall(
                self.percent_difficult(text, self.default_rule()),
                self.avg_sentence_length(text),
                &self.config().dale_chall,
            )
        })
    }

    /// Dale-Chall, second variant.
    pub fn dale_chall_readability_score_v2(&self, text: &str) -> f64 {
        self.memo(Metric::DaleChallReadabilityScoreV2, text, "", || {
            formulas::dale_chall_v2(
                self.percent_difficult(text, self.default_rule()),
                self.words_per_sentence(text),
                &self.config().dale_chall,
            )
        })
    }

    /// Spache score, from unrounded words per sentence. Without the
    /// dictionary, syllables alone decide which words are unfamiliar.
    pub fn spache_readability(&self, text: &str, use_dictionary: bool) -> f64 {
        self.memo(
            Metric::SpacheReadability,
            text,
            bool_arg(use_dictionary),
            || {
                let rule = DifficultyRule {
                    use_word_list: use_dictionary,
                    ..self.default_rule()
                };
                formulas::spache(
                    self.words_per_sentence(text),
                    self.percent_difficult(text, rule),
                    &self.config().spache,
                )
            },
        )
    }

    /// Läsbarhetsindex.
    pub fn lix(&self, text: &str) -> f64 {
        self.memo(Metric::Lix, text, "", || {
            formulas::lix(
                self.avg_sentence_length(text),
                self.long_word_count(text),
                self.lexicon_count(text, false),
            )
        })
    }

    /// Rate Index.
    pub fn rix(&self, text: &str) -> f64 {
        self.memo(Metric::Rix, text, "", || {
            formulas::rix(self.long_word_count(text), self.sentence_count(text))
        })
    }

    /// Fernández Huerta.
    pub fn fernandez_huerta(&self, text: &str) -> f64 {
        self.memo(Metric::FernandezHuerta, text, "", || {
            formulas::fernandez_huerta(
                self.avg_syllables_per_word(text),
                self.avg_sentence_length(text),
            )
        })
    }

    /// Szigriszt-Pazos.
    pub fn szigriszt_pazos(&self, text: &str) -> f64 {
        self.memo(Metric::SzigrisztPazos, text, "", || {
            formulas::szigriszt_pazos(
                self.syllable_count(text),
                self.lexicon_count(text, true),
                self.sentence_count(text),
            )
        })
    }

    /// Gutiérrez de Polini.
    pub fn gutierrez_polini(&self, text: &str) -> f64 {
        self.memo(Metric::GutierrezPolini, text, "", || {
            formulas::gutierrez_polini(
                self.letter_count(text, true),
                self.lexicon_count(text, true),
                self.sentence_count(text),
            )
        })
    }

    /// Crawford.
    pub fn crawford(&self, text: &str) -> f64 {
        self.memo(Metric::Crawford, text, "", || {
            formulas::crawford(
                self.sentence_count(text),
                self.lexicon_count(text, true),
                self.syllable_count(text),
            )
        })
    }

    /// Gulpease index.
    pub fn gulpease_index(&self, text: &str) -> f64 {
        self.memo(Metric::GulpeaseIndex, text, "", || {
            formulas::gulpease_index(
                self.sentence_count(text),
                self.lexicon_count(text, true),
                self.char_count(text, true),
            )
        })
    }

    /// Wiener Sachtextformel, variants 1 through 4.
    pub fn wiener_sachtextformel(&self, text: &str, variant: u8) -> f64 {
        self.memo(
            Metric::WienerSachtextformel,
            text,
            &variant.to_string(),
            || {
                let words = self.lexicon_count(text, true);
                let percent = |count| 100.0 * per(count, words);
                let inputs = SachtextInputs {
                    ms: percent(self.polysyllable_count(text)),
                    sl: self.words_per_sentence(text),
                    iw: percent(self.long_word_count(text)),
                    es: percent(self.monosyllable_count(text)),
                };
                formulas::wiener_sachtextformel(variant, inputs)
            },
        )
    }

    /// McAlpine EFLAW.
    pub fn mcalpine_eflaw(&self, text: &str) -> f64 {
        self.memo(Metric::McalpineEflaw, text, "", || {
            formulas::mcalpine_eflaw(
                self.lexicon_count(text, true),
                self.miniword_count(text),
                self.sentence_count(text),
            )
        })
    }

    // Consensus

    /// Scores of the consensus panel, in voting order.
    pub fn grade_panel(&self, text: &str) -> [f64; 8] {
        [
            self.flesch_kincaid_grade(text),
            self.gunning_fog(text),
            self.smog_index(text),
            self.coleman_liau_index(text),
            self.automated_readability_index(text),
            self.linsear_write_formula(text),
            self.dale_chall_readability_score(text),
            self.spache_readability(text, true),
        ]
    }

    /// Consensus grade band.
    pub fn consensus_grade(&self, text: &str) -> GradeBand {
        self.memo(Metric::ConsensusGrade, text, "", || {
            consensus::consensus(&self.grade_panel(text))
        })
    }

    /// Consensus grade band as text, e.g. `"9th and 10th grade"`.
    pub fn text_standard(&self, text: &str) -> String {
        self.memo(Metric::TextStandard, text, "", || {
            self.consensus_grade(text).to_string()
        })
    }

    /// Seconds to read the text at `ms_per_char`.
    pub fn reading_time(&self, text: &str, ms_per_char: f64) -> f64 {
        self.memo(Metric::ReadingTime, text, &ms_per_char.to_string(), || {
            formulas::reading_time(self.char_count(text, true), ms_per_char)
        })
    }
}

const fn bool_arg(flag: bool) -> &'static str {
    if flag { "true" } else { "false" }
}

/// Every count and score for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReadabilityReport {
    /// Locale tag the caller asked for.
    pub requested_locale: String,
    /// Locale table actually used.
    pub locale: String,
    /// How the table was found.
    pub fallback: Fallback,
    /// Non-whitespace characters.
    pub char_count: usize,
    /// Letters.
    pub letter_count: usize,
    /// Words.
    pub lexicon_count: usize,
    /// Sentences.
    pub sentence_count: usize,
    /// Syllables.
    pub syllable_count: usize,
    /// Words at or above the polysyllable threshold.
    pub polysyllable_count: usize,
    /// Distinct difficult words.
    pub difficult_words: usize,
    /// Words per sentence, one decimal.
    pub avg_sentence_length: f64,
    /// Syllables per word, one decimal.
    pub avg_syllables_per_word: f64,
    /// Flesch Reading Ease.
    pub flesch_reading_ease: f64,
    /// Flesch-Kincaid grade level.
    pub flesch_kincaid_grade: f64,
    /// Gunning Fog.
    pub gunning_fog: f64,
    /// SMOG.
    pub smog_index: f64,
    /// Coleman-Liau.
    pub coleman_liau_index: f64,
    /// Automated Readability Index.
    pub automated_readability_index: f64,
    /// Linsear Write.
    pub linsear_write_formula: f64,
    /// Dale-Chall.
    pub dale_chall_readability_score: f64,
    /// Dale-Chall, second variant.
    pub dale_chall_readability_score_v2: f64,
    /// Spache, with the familiar-word list.
    pub spache_readability: f64,
    /// Läsbarhetsindex.
    pub lix: f64,
    /// Rate Index.
    pub rix: f64,
    /// McAlpine EFLAW.
    pub mcalpine_eflaw: f64,
    /// Consensus band.
    pub consensus: GradeBand,
    /// Consensus band as text.
    pub text_standard: String,
    /// Seconds to read.
    pub reading_time: f64,
}

/// Readability metrics under a switchable locale.
///
/// ```
/// use textmetrics::ReadabilityEngine;
///
/// let engine = ReadabilityEngine::new();
/// let text = "Cool dogs wear da sunglasses.";
/// assert_eq!(engine.difficult_words_list(text), vec!["sunglasses"]);
/// assert_eq!(engine.text_standard(text), "2nd and 3rd grade");
/// ```
#[derive(Debug)]
pub struct ReadabilityEngine {
    registry: LocaleRegistry,
    provider: Arc<dyn WordListProvider>,
    policy: EvictionPolicy,
    ms_per_char: f64,
    session: RwLock<Arc<LocaleSession>>,
}

impl Default for ReadabilityEngine {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! delegate {
    ($($(#[$meta:meta])* fn $name:ident(text $(, $arg:ident: $ty:ty)*) -> $ret:ty;)+) => {
        $(
            $(#[$meta])*
            pub fn $name(&self, text: &str $(, $arg: $ty)*) -> $ret {
                self.session().$name(text $(, $arg)*)
            }
        )+
    };
}

impl ReadabilityEngine {
    /// Built-in locales and word lists, default cache policy, `en_US`.
    pub fn new() -> Self {
        let registry = LocaleRegistry::builtin();
        let provider: Arc<dyn WordListProvider> = Arc::new(BuiltinWordLists);
        let policy = EvictionPolicy::default();
        let session = LocaleSession::new(
            registry.resolve(DEFAULT_LOCALE),
            Arc::clone(&provider),
            policy,
        );
        Self {
            registry,
            provider,
            policy,
            ms_per_char: DEFAULT_MS_PER_CHAR,
            session: RwLock::new(Arc::new(session)),
        }
    }

    /// An engine set up from loaded configuration.
    ///
    /// Locale tables from the configuration are added to the built-in ones,
    /// replacing any with the same tag.
    pub fn from_config(config: &Config) -> Self {
        let registry = config
            .locales
            .iter()
            .fold(LocaleRegistry::builtin(), |registry, (tag, table)| {
                registry.with_locale(tag, table.clone())
            });
        let engine = Self::new()
            .with_registry(registry)
            .with_eviction_policy(config.cache.policy)
            .with_ms_per_char(config.ms_per_char.unwrap_or(DEFAULT_MS_PER_CHAR));
        if let Some(tag) = &config.locale {
            engine.set_locale(tag);
        }
        engine
    }

    /// Replace the locale registry. The active tag is resolved again.
    #[must_use]
    pub fn with_registry(mut self, registry: LocaleRegistry) -> Self {
        self.registry = registry;
        self.rebuild_session();
        self
    }

    /// Replace the word-list provider.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn WordListProvider>) -> Self {
        self.provider = provider;
        self.rebuild_session();
        self
    }

    /// Replace the cache eviction policy. Cached results are dropped.
    #[must_use]
    pub fn with_eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self.rebuild_session();
        self
    }

    /// Set the reading speed used by [`report`](Self::report).
    #[must_use]
    pub fn with_ms_per_char(mut self, ms_per_char: f64) -> Self {
        self.ms_per_char = ms_per_char;
        self
    }

    /// Set the initial locale.
    #[must_use]
    pub fn with_locale(self, tag: &str) -> Self {
        self.set_locale(tag);
        self
    }

    fn rebuild_session(&mut self) {
        let requested = self.session().locale().requested.clone();
        let locale = self.registry.resolve(&requested);
        let session = LocaleSession::new(locale, Arc::clone(&self.provider), self.policy);
        *self
            .session
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(session);
    }

    /// Snapshot of the active session.
    pub fn session(&self) -> Arc<LocaleSession> {
        Arc::clone(&self.session.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Switch locale and drop every cached result.
    ///
    /// Unknown or malformed tags fall back to [`DEFAULT_LOCALE`] with a
    /// warning; this never fails.
    #[tracing::instrument(skip(self))]
    pub fn set_locale(&self, tag: &str) -> ResolvedLocale {
        let locale = self.registry.resolve(tag);
        match locale.fallback {
            Fallback::Default if !tag.eq_ignore_ascii_case(DEFAULT_LOCALE) => {
                tracing::warn!(requested = tag, using = %locale.key, "unknown locale, using default");
            }
            _ => tracing::info!(requested = tag, using = %locale.key, fallback = ?locale.fallback, "locale set"),
        }
        let session = LocaleSession::new(locale.clone(), Arc::clone(&self.provider), self.policy);
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(session);
        locale
    }

    /// The active locale.
    pub fn locale(&self) -> ResolvedLocale {
        self.session().locale().clone()
    }

    /// Coefficient table of the active locale.
    pub fn get_config(&self) -> Arc<LocaleConfig> {
        Arc::clone(&self.session().locale().config)
    }

    /// The locale registry.
    pub const fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Configured reading speed.
    pub const fn ms_per_char(&self) -> f64 {
        self.ms_per_char
    }

    /// Cache statistics for one metric under the active locale.
    pub fn cache_info(&self, metric: Metric) -> CacheInfo {
        self.session().cache_info(metric)
    }

    /// Drop one metric's cached results and reset its counters.
    pub fn cache_clear(&self, metric: Metric) {
        self.session().cache_clear(metric);
    }

    /// Drop every cached result and reset every counter.
    pub fn clear_cache(&self) {
        self.session().clear_cache();
    }

    /// Statistics for every metric looked up under the active locale.
    pub fn cache_stats(&self) -> Vec<(Metric, CacheInfo)> {
        self.session().cache_stats()
    }

    /// Distinct texts held by the active locale's cache.
    pub fn cached_texts(&self) -> usize {
        self.session().cached_texts()
    }

    delegate! {
        /// Characters, optionally excluding whitespace.
        fn char_count(text, ignore_spaces: bool) -> usize;
        /// Alphabetic characters, optionally excluding whitespace.
        fn letter_count(text, ignore_spaces: bool) -> usize;
        /// Words, optionally ignoring punctuation-only tokens.
        fn lexicon_count(text, remove_punctuation: bool) -> usize;
        /// Sentences; 0 for blank text, otherwise at least 1.
        fn sentence_count(text) -> usize;
        /// Total syllables.
        fn syllable_count(text) -> usize;
        /// Words at or above the SMOG polysyllable threshold.
        fn polysyllable_count(text) -> usize;
        /// Words with one syllable.
        fn monosyllable_count(text) -> usize;
        /// Distinct unfamiliar words at or above the Gunning Fog threshold.
        fn complex_word_count(text) -> usize;
        /// Tokens longer than the locale's long-word length.
        fn long_word_count(text) -> usize;
        /// Words of three characters or fewer.
        fn miniword_count(text) -> usize;
        /// Words per sentence, one decimal.
        fn avg_sentence_length(text) -> f64;
        /// Syllables per word, one decimal.
        fn avg_syllables_per_word(text) -> f64;
        /// Non-whitespace characters per word, two decimals.
        fn avg_character_per_word(text) -> f64;
        /// Letters per word, two decimals.
        fn avg_letter_per_word(text) -> f64;
        /// Sentences per word, two decimals.
        fn avg_sentence_per_word(text) -> f64;
        /// Words per sentence, unrounded.
        fn words_per_sentence(text) -> f64;
        /// Number of distinct difficult words.
        fn difficult_words(text) -> usize;
        /// Distinct difficult words in first-occurrence order.
        fn difficult_words_list(text) -> Vec<String>;
        /// Flesch Reading Ease.
        fn flesch_reading_ease(text) -> f64;
        /// Flesch-Kincaid grade level.
        fn flesch_kincaid_grade(text) -> f64;
        /// Gunning Fog index.
        fn gunning_fog(text) -> f64;
        /// SMOG grade.
        fn smog_index(text) -> f64;
        /// Coleman-Liau index.
        fn coleman_liau_index(text) -> f64;
        /// Automated Readability Index.
        fn automated_readability_index(text) -> f64;
        /// Linsear Write.
        fn linsear_write_formula(text) -> f64;
        /// Dale-Chall readability score.
        fn dale_chall_readability_score(text) -> f64;
        /// Dale-Chall, second variant.
        fn dale_chall_readability_score_v2(text) -> f64;
        /// Spache score, with or without the familiar-word list.
        fn spache_readability(text, use_dictionary: bool) -> f64;
        /// Läsbarhetsindex.
        fn lix(text) -> f64;
        /// Rate Index.
        fn rix(text) -> f64;
        /// Fernández Huerta.
        fn fernandez_huerta(text) -> f64;
        /// Szigriszt-Pazos.
        fn szigriszt_pazos(text) -> f64;
        /// Gutiérrez de Polini.
        fn gutierrez_polini(text) -> f64;
        /// Crawford.
        fn crawford(text) -> f64;
        /// Gulpease index.
        fn gulpease_index(text) -> f64;
        /// Wiener Sachtextformel, variants 1 through 4.
        fn wiener_sachtextformel(text, variant: u8) -> f64;
        /// McAlpine EFLAW.
        fn mcalpine_eflaw(text) -> f64;
        /// Consensus grade band.
        fn consensus_grade(text) -> GradeBand;
        /// Consensus grade band as text.
        fn text_standard(text) -> String;
        /// Seconds to read the text at `ms_per_char`.
        fn reading_time(text, ms_per_char: f64) -> f64;
    }

    /// Every count and score for `text`, computed under one session.
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn report(&self, text: &str) -> ReadabilityReport {
        let session = self.session();
        let locale = session.locale();
        ReadabilityReport {
            requested_locale: locale.requested.clone(),
            locale: locale.key.clone(),
            fallback: locale.fallback,
            char_count: session.char_count(text, true),
            letter_count: session.letter_count(text, true),
            lexicon_count: session.lexicon_count(text, true),
            sentence_count: session.sentence_count(text),
            syllable_count: session.syllable_count(text),
            polysyllable_count: session.polysyllable_count(text),
            difficult_words: session.difficult_words(text),
            avg_sentence_length: session.avg_sentence_length(text),
            avg_syllables_per_word: session.avg_syllables_per_word(text),
            flesch_reading_ease: session.flesch_reading_ease(text),
            flesch_kincaid_grade: session.flesch_kincaid_grade(text),
            gunning_fog: session.gunning_fog(text),
            smog_index: session.smog_index(text),
            coleman_liau_index: session.coleman_liau_index(text),
            automated_readability_index: session.automated_readability_index(text),
            linsear_write_formula: session.linsear_write_formula(text),
            dale_chall_readability_score: session.dale_chall_readability_score(text),
            dale_chall_readability_score_v2: session.dale_chall_readability_score_v2(text),
            spache_readability: session.spache_readability(text, true),
            lix: session.lix(text),
            rix: session.rix(text),
            mcalpine_eflaw: session.mcalpine_eflaw(text),
            consensus: session.consensus_grade(text),
            text_standard: session.text_standard(text),
            reading_time: session.reading_time(text, self.ms_per_char),
        }
    }

    /// [`report`](Self::report) for raw bytes, which must be UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Encoding`](crate::error::TextError::Encoding) for
    /// invalid UTF-8.
    pub fn report_bytes(&self, bytes: &[u8]) -> TextResult<ReadabilityReport> {
        let text = text::decode(bytes)?;
        Ok(self.report(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: &str = "Cool dogs wear da sunglasses.";

    #[test]
    fn short_sentence_counts() {
        let engine = ReadabilityEngine::new();
        assert_eq!(engine.lexicon_count(SHORT, true), 5);
        assert_eq!(engine.sentence_count(SHORT), 1);
        assert_eq!(engine.syllable_count(SHORT), 7);
        assert_eq!(engine.letter_count(SHORT, true), 24);
        assert_eq!(engine.char_count(SHORT, true), 25);
        assert_eq!(engine.avg_sentence_length(SHORT), 5.0);
        assert_eq!(engine.avg_syllables_per_word(SHORT), 1.4);
    }

    #[test]
    fn short_sentence_panel() {
        let engine = ReadabilityEngine::new();
        let session = engine.session();
        assert_eq!(
            session.grade_panel(SHORT),
            [2.9, 10.0, 8.8, 6.12, 4.6, 2.5, 7.04, 3.26]
        );
        assert_eq!(engine.text_standard(SHORT), "2nd and 3rd grade");
        assert_eq!(
            engine.consensus_grade(SHORT),
            GradeBand { lower: 2, upper: 3 }
        );
    }

    #[test]
    fn nested_lookups_share_the_cache() {
        let engine = ReadabilityEngine::new();
        engine.flesch_reading_ease(SHORT);
        // avg_sentence_length asked for the sentence count once
        assert_eq!(engine.cache_info(Metric::SentenceCount).misses, 1);

        engine.sentence_count(SHORT);
        let info = engine.cache_info(Metric::SentenceCount);
        assert_eq!((info.hits, info.misses), (1, 1));
    }

    #[test]
    fn repeated_calls_only_hit() {
        let engine = ReadabilityEngine::new();
        let first = engine.flesch_reading_ease(SHORT);
        let second = engine.flesch_reading_ease(SHORT);
        assert_eq!(first, second);
        let info = engine.cache_info(Metric::FleschReadingEase);
        assert_eq!((info.hits, info.misses, info.size), (1, 1, 1));
    }

    #[test]
    fn arguments_are_cached_separately() {
        let engine = ReadabilityEngine::new();
        assert_eq!(engine.char_count(SHORT, true), 25);
        assert_eq!(engine.char_count(SHORT, false), 29);
        let info = engine.cache_info(Metric::CharCount);
        assert_eq!((info.misses, info.size), (2, 2));
    }

    #[test]
    fn spache_dictionary_toggle() {
        let engine = ReadabilityEngine::new();
        assert_eq!(engine.spache_readability(SHORT, true), 3.26);
        // Only "sunglasses" has two or more syllables either way
        assert_eq!(engine.spache_readability(SHORT, false), 3.26);
        let text = "The yellow water is cold.";
        assert!(engine.spache_readability(text, false) > engine.spache_readability(text, true));
    }

    #[test]
    fn spache_uses_unrounded_sentence_length() {
        let engine = ReadabilityEngine::new();
        let text = "The cat sat. It was hot. We all went home.";
        assert_eq!(engine.avg_sentence_length(text), 3.3);
        // 0.141 * 10 / 3 + 0.839 with no unfamiliar words; 3.3 would give 1.3
        assert_eq!(engine.spache_readability(text, true), 1.31);
    }

    #[test]
    fn empty_text_scores_zero() {
        let engine = ReadabilityEngine::new();
        let report = engine.report("");
        assert_eq!(report.sentence_count, 0);
        assert_eq!(report.lexicon_count, 0);
        assert_eq!(report.flesch_reading_ease, 0.0);
        assert_eq!(report.smog_index, 0.0);
        assert_eq!(report.reading_time, 0.0);
        assert_eq!(report.text_standard, "0th and 1st grade");
    }

    #[test]
    fn reading_time_uses_non_space_characters() {
        let engine = ReadabilityEngine::new();
        assert_eq!(engine.reading_time(SHORT, 1000.0), 25.0);
        assert_eq!(engine.reading_time(SHORT, DEFAULT_MS_PER_CHAR), 0.37);
    }

    #[test]
    fn builder_methods() {
        let engine = ReadabilityEngine::new()
            .with_eviction_policy(EvictionPolicy::Unbounded)
            .with_ms_per_char(1000.0)
            .with_locale("de_DE");
        assert_eq!(engine.locale().key, "de_DE");
        assert_eq!(engine.report(SHORT).reading_time, 25.0);
        assert_eq!(engine.cache_info(Metric::CharCount).capacity, None);
    }

    #[test]
    fn report_bytes_rejects_bad_utf8() {
        let engine = ReadabilityEngine::new();
        assert!(engine.report_bytes(&[0xff, 0xfe]).is_err());
        let report = engine.report_bytes(SHORT.as_bytes()).unwrap();
        assert_eq!(report.difficult_words, 1);
    }
}
