//! Locale tags, per-locale coefficient tables, and fallback resolution.
//!
//! A [`LocaleConfig`] bundles everything that varies by language: the
//! syllable heuristic, word segmentation, sentence terminators, word-class
//! thresholds, and one coefficient tuple per formula. Tables are plain data
//! (`serde`-deserializable), so configuration files can add or replace them.
//!
//! Resolution is an explicit ordered chain, see [`LocaleRegistry::resolve`]:
//!
//! 1. exact tag (`de_AT` → `de_AT`)
//! 2. language-only (`en_GB` → the primary `en` entry, `en_US`)
//! 3. [`DEFAULT_LOCALE`]
//!
//! Unknown or malformed tags never fail; they land on step 3.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{LocaleError, LocaleResult};
use crate::provider::WordListProvider;

/// Locale active when nothing else is configured.
pub const DEFAULT_LOCALE: &str = "en_US";

/// A normalized `language[_REGION]` tag.
///
/// Parsing is case-insensitive, accepts `_` or `-` separators, skips script
/// subtags (`zh-Hant-TW`), and ignores POSIX encoding/modifier suffixes
/// (`en_US.UTF-8`, `de_DE@euro`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocaleTag {
    language: String,
    region: Option<String>,
}

impl LocaleTag {
    /// Parse and normalize a locale tag.
    pub fn parse(tag: &str) -> LocaleResult<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(LocaleError::Empty);
        }
        let malformed = || LocaleError::Malformed {
            tag: tag.to_string(),
        };

        let core = trimmed
            .split(['.', '@'])
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(malformed)?;

        let mut subtags = core.split(['_', '-']);
        let language = subtags
            .next()
            .filter(|l| (2..=3).contains(&l.len()) && l.chars().all(|c| c.is_ascii_alphabetic()))
            .ok_or_else(malformed)?
            .to_ascii_lowercase();

        let mut region = None;
        for subtag in subtags {
            let is_script = subtag.len() == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic());
            let is_region = (subtag.len() == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
                || (subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit()));
            if is_script {
                continue;
            }
            if is_region {
                region = Some(subtag.to_ascii_uppercase());
                break;
            }
            return Err(malformed());
        }

        Ok(Self { language, region })
    }

    /// The lowercase language subtag (`"en"`).
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The uppercase region subtag, if any (`"US"`).
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{region}", self.language),
            None => f.write_str(&self.language),
        }
    }
}

/// How text is cut into words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segmentation {
    /// Words are whitespace-separated tokens.
    #[default]
    Whitespace,
    /// Whitespace tokens, with every CJK ideograph or kana also counted as
    /// its own word (scripts written without spaces).
    Ideographic,
}

/// Vowel-group syllable heuristic settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyllableRules {
    /// Lowercase characters treated as vowels.
    pub vowels: String,
    /// A word-final `e` after a consonant is silent.
    pub silent_final_e: bool,
    /// English suffix adjustments: consonant + `le` is voiced, `-ed` after
    /// anything but `t`/`d` is silent.
    pub english_suffixes: bool,
    /// Ask the word-list provider for a dictionary count before estimating.
    pub use_dictionary: bool,
}

impl Default for SyllableRules {
    fn default() -> Self {
        Self {
            vowels: "aeiouy".to_string(),
            silent_final_e: true,
            english_suffixes: true,
            use_dictionary: true,
        }
    }
}

impl SyllableRules {
    fn vowel_groups(vowels: &str) -> Self {
        Self {
            vowels: vowels.to_string(),
            silent_final_e: false,
            english_suffixes: false,
            use_dictionary: false,
        }
    }
}

/// Flesch Reading Ease: `base - sentence_length * ASL - syllables_per_word * ASW`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleschCoefficients {
    /// Constant term.
    pub base: f64,
    /// Weight of the average sentence length.
    pub sentence_length: f64,
    /// Weight of the average syllables per word.
    pub syllables_per_word: f64,
    /// Express ASW per this many words (100 for Fernández-Huerta style tables).
    pub syllable_interval: Option<f64>,
}

impl Default for FleschCoefficients {
    fn default() -> Self {
        Self {
            base: 206.835,
            sentence_length: 1.015,
            syllables_per_word: 84.6,
            syllable_interval: None,
        }
    }
}

/// Flesch-Kincaid grade: `sentence_length * ASL + syllables_per_word * ASW - offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleschKincaidCoefficients {
    /// Weight of the average sentence length.
    pub sentence_length: f64,
    /// Weight of the average syllables per word.
    pub syllables_per_word: f64,
    /// Subtracted constant.
    pub offset: f64,
}

impl Default for FleschKincaidCoefficients {
    fn default() -> Self {
        Self {
            sentence_length: 0.39,
            syllables_per_word: 11.8,
            offset: 15.59,
        }
    }
}

/// Gunning Fog: `weight * (ASL + 100 * complex / words)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogCoefficients {
    /// Outer multiplier.
    pub weight: f64,
    /// Minimum syllables for a non-familiar word to count as complex.
    pub complex_word_syllables: usize,
}

impl Default for FogCoefficients {
    fn default() -> Self {
        Self {
            weight: 0.4,
            complex_word_syllables: 3,
        }
    }
}

/// SMOG: `base + weight * sqrt(polysyllables * sample_sentences / sentences)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmogCoefficients {
    /// Constant term.
    pub base: f64,
    /// Weight of the square-root term.
    pub weight: f64,
    /// Sentence sample size the formula was calibrated on.
    pub sample_sentences: f64,
    /// Syllables at which a word is a polysyllable.
    pub polysyllable_syllables: usize,
}

impl Default for SmogCoefficients {
    fn default() -> Self {
        Self {
            base: 3.1291,
            weight: 1.043,
            sample_sentences: 30.0,
            polysyllable_syllables: 3,
        }
    }
}

/// Coleman-Liau: `letters * L - sentences * S - offset` (L, S per 100 words).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColemanLiauCoefficients {
    /// Weight of letters per 100 words.
    pub letters: f64,
    /// Weight of sentences per 100 words.
    pub sentences: f64,
    /// Subtracted constant.
    pub offset: f64,
}

impl Default for ColemanLiauCoefficients {
    fn default() -> Self {
        Self {
            letters: 0.058,
            sentences: 0.296,
            offset: 15.8,
        }
    }
}

/// Automated Readability Index: `characters * c/w + words * w/s - offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AriCoefficients {
    /// Weight of characters per word.
    pub characters: f64,
    /// Weight of words per sentence.
    pub words: f64,
    /// Subtracted constant.
    pub offset: f64,
}

impl Default for AriCoefficients {
    fn default() -> Self {
        Self {
            characters: 4.71,
            words: 0.5,
            offset: 21.43,
        }
    }
}

/// Linsear Write over a leading word sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinsearCoefficients {
    /// Number of leading words sampled.
    pub sample_words: usize,
    /// Syllables at which a word is "hard" (weighted 3).
    pub hard_word_syllables: usize,
    /// Raw scores above this are halved; the rest are reduced first.
    pub threshold: f64,
    /// Subtracted from raw scores at or below the threshold before halving.
    pub adjustment: f64,
}

impl Default for LinsearCoefficients {
    fn default() -> Self {
        Self {
            sample_words: 100,
            hard_word_syllables: 3,
            threshold: 20.0,
            adjustment: 2.0,
        }
    }
}

/// Dale-Chall: `difficult * PDW + sentence_length * ASL (+ adjustment)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaleChallCoefficients {
    /// Weight of the difficult-word percentage.
    pub difficult: f64,
    /// Weight of the average sentence length.
    pub sentence_length: f64,
    /// Added when the threshold is exceeded.
    pub adjustment: f64,
    /// Difficult-word percentage above which the adjustment applies.
    pub threshold: f64,
    /// Difficult-word fraction (not percentage) above which the v2 variant
    /// applies the adjustment.
    pub v2_threshold: f64,
}

impl Default for DaleChallCoefficients {
    fn default() -> Self {
        Self {
            difficult: 0.1579,
            sentence_length: 0.0496,
            adjustment: 3.6365,
            threshold: 5.0,
            v2_threshold: 0.05,
        }
    }
}

/// Spache: `sentence_length * ASL + unfamiliar * PUW + offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacheCoefficients {
    /// Weight of the average sentence length.
    pub sentence_length: f64,
    /// Weight of the unfamiliar-word percentage.
    pub unfamiliar: f64,
    /// Added constant.
    pub offset: f64,
}

impl Default for SpacheCoefficients {
    fn default() -> Self {
        Self {
            sentence_length: 0.141,
            unfamiliar: 0.086,
            offset: 0.839,
        }
    }
}

/// Everything that varies by locale.
///
/// Omitted fields deserialize to the English (`en_US`) values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Syllable heuristic.
    pub syllables: SyllableRules,
    /// Word segmentation strategy.
    pub segmentation: Segmentation,
    /// Characters that may end a sentence.
    pub sentence_terminators: String,
    /// Minimum syllables for an unlisted word to count as difficult.
    pub difficult_word_syllables: usize,
    /// Words longer than this many characters are "long" (LIX, RIX).
    pub long_word_length: usize,
    /// Extra words never classified as difficult (names, domain terms).
    pub familiar_words: Vec<String>,
    /// Flesch Reading Ease.
    pub flesch: FleschCoefficients,
    /// Flesch-Kincaid grade.
    pub flesch_kincaid: FleschKincaidCoefficients,
    /// Gunning Fog.
    pub gunning_fog: FogCoefficients,
    /// SMOG.
    pub smog: SmogCoefficients,
    /// Coleman-Liau.
    pub coleman_liau: ColemanLiauCoefficients,
    /// Automated Readability Index.
    pub ari: AriCoefficients,
    /// Linsear Write.
    pub linsear: LinsearCoefficients,
    /// Dale-Chall (both variants).
    pub dale_chall: DaleChallCoefficients,
    /// Spache.
    pub spache: SpacheCoefficients,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            syllables: SyllableRules::default(),
            segmentation: Segmentation::Whitespace,
            sentence_terminators: ".!?".to_string(),
            difficult_word_syllables: 2,
            long_word_length: 6,
            familiar_words: Vec::new(),
            flesch: FleschCoefficients::default(),
            flesch_kincaid: FleschKincaidCoefficients::default(),
            gunning_fog: FogCoefficients::default(),
            smog: SmogCoefficients::default(),
            coleman_liau: ColemanLiauCoefficients::default(),
            ari: AriCoefficients::default(),
            linsear: LinsearCoefficients::default(),
            dale_chall: DaleChallCoefficients::default(),
            spache: SpacheCoefficients::default(),
        }
    }
}

impl LocaleConfig {
    fn with_flesch(mut self, base: f64, sentence_length: f64, syllables_per_word: f64) -> Self {
        self.flesch = FleschCoefficients {
            base,
            sentence_length,
            syllables_per_word,
            syllable_interval: None,
        };
        self
    }

    fn per_hundred_words(mut self) -> Self {
        self.flesch.syllable_interval = Some(100.0);
        self
    }

    pub(crate) fn with_vowels(mut self, vowels: &str) -> Self {
        self.syllables = SyllableRules::vowel_groups(vowels);
        self
    }

    fn ideographic(mut self) -> Self {
        self.segmentation = Segmentation::Ideographic;
        self.sentence_terminators = ".!?。！？".to_string();
        self
    }
}

/// Built-in locale tables, in registration order.
///
/// The first entry per language becomes that language's fallback.
fn builtin_locales() -> Vec<(&'static str, LocaleConfig)> {
    let base = LocaleConfig::default;
    vec![
        ("en_US", base()),
        // Toni Amstad
        (
            "de_DE",
            base()
                .with_flesch(180.0, 1.0, 58.5)
                .with_vowels("aeiouyäöü"),
        ),
        // Fernández Huerta
        (
            "es_ES",
            base()
                .with_flesch(206.84, 1.02, 0.6)
                .per_hundred_words()
                .with_vowels("aeiouáéíóúü"),
        ),
        ("fr_FR", {
            let mut fr = base()
                .with_flesch(207.0, 1.015, 73.6)
                .with_vowels("aeiouyàâéèêëîïôûùüÿœæ");
            fr.syllables.silent_final_e = true;
            fr
        }),
        // Flesch-Vacca
        (
            "it_IT",
            base()
                .with_flesch(217.0, 1.3, 0.6)
                .per_hundred_words()
                .with_vowels("aeiouàèéìíòóùú"),
        ),
        // Flesch-Douma
        (
            "nl_NL",
            base()
                .with_flesch(206.835, 0.93, 77.0)
                .with_vowels("aeiouyàáèéëïóöü"),
        ),
        ("pl_PL", {
            let mut pl = base().with_vowels("aąeęioóuy");
            pl.gunning_fog.complex_word_syllables = 4;
            pl
        }),
        (
            "ru_RU",
            base()
                .with_flesch(206.835, 1.3, 60.1)
                .with_vowels("аеёиоуыэюя"),
        ),
        ("ja_JP", base().ideographic()),
        ("zh_CN", base().ideographic()),
    ]
}

/// Which step of the resolution chain produced a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// The tag matched a table exactly.
    Exact,
    /// The language matched; the region did not.
    Language,
    /// Nothing matched; the default locale is used.
    Default,
}

/// The outcome of resolving a caller-supplied locale tag.
#[derive(Debug, Clone)]
pub struct ResolvedLocale {
    /// The tag as the caller wrote it.
    pub requested: String,
    /// Registry key of the table in use (e.g. `"en_US"` for `"en-gb"`).
    pub key: String,
    /// Resolution step that matched.
    pub fallback: Fallback,
    /// The coefficient table.
    pub config: Arc<LocaleConfig>,
}

impl ResolvedLocale {
    /// The language subtag of the table in use.
    pub fn language(&self) -> &str {
        self.key.split('_').next().unwrap_or(&self.key)
    }
}

/// A locale table together with the word lists it consults.
///
/// Borrowed view handed to the counters, syllable estimator, and difficulty
/// classifier.
#[derive(Debug, Clone, Copy)]
pub struct LocaleContext<'a> {
    /// Coefficients and heuristics.
    pub config: &'a LocaleConfig,
    /// Language subtag used for word-list lookups.
    pub language: &'a str,
    /// Familiar-word lists and syllable dictionaries.
    pub words: &'a dyn WordListProvider,
}

/// Ordered resolution steps for a tag: the exact tag, then its language.
///
/// The default locale is the implicit last step.
pub fn resolution_candidates(tag: &LocaleTag) -> Vec<(String, Fallback)> {
    vec![
        (tag.to_string(), Fallback::Exact),
        (tag.language().to_string(), Fallback::Language),
    ]
}

/// Registry of locale tables keyed by normalized tag.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    entries: HashMap<String, Arc<LocaleConfig>>,
    /// Language subtag → tag of its first-registered table.
    primary: HashMap<String, String>,
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LocaleRegistry {
    /// An empty registry. Resolution against it always yields a default
    /// English table.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            primary: HashMap::new(),
        }
    }

    /// Registry pre-loaded with the built-in tables.
    pub fn builtin() -> Self {
        builtin_locales()
            .into_iter()
            .fold(Self::empty(), |registry, (tag, config)| {
                registry.with_locale(tag, config)
            })
    }

    /// Add or replace a table. Malformed tags are ignored with a warning.
    #[must_use]
    pub fn with_locale(mut self, tag: &str, config: LocaleConfig) -> Self {
        match LocaleTag::parse(tag) {
            Ok(parsed) => {
                let key = parsed.to_string();
                self.primary
                    .entry(parsed.language().to_string())
                    .or_insert_with(|| key.clone());
                self.entries.insert(key, Arc::new(config));
            }
            Err(err) => tracing::warn!(error = %err, "ignoring locale table"),
        }
        self
    }

    /// Look up a table by exact normalized key.
    pub fn get(&self, key: &str) -> Option<&Arc<LocaleConfig>> {
        self.entries.get(key)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Resolve a tag: exact → language-only → [`DEFAULT_LOCALE`].
    pub fn resolve(&self, requested: &str) -> ResolvedLocale {
        let matched = LocaleTag::parse(requested).ok().and_then(|tag| {
            resolution_candidates(&tag)
                .into_iter()
                .find_map(|(candidate, fallback)| {
                    let key = match fallback {
                        Fallback::Language => self.primary.get(&candidate)?.clone(),
                        _ => candidate,
                    };
                    let config = self.entries.get(&key)?;
                    Some((key, fallback, Arc::clone(config)))
                })
        });

        let (key, fallback, config) = matched.unwrap_or_else(|| {
            let config = self
                .entries
                .get(DEFAULT_LOCALE)
                .cloned()
                .unwrap_or_default();
            (DEFAULT_LOCALE.to_string(), Fallback::Default, config)
        });

        ResolvedLocale {
            requested: requested.to_string(),
            key,
            fallback,
            config,
        }
    }
}
