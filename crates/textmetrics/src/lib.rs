//! Readability metrics with per-locale coefficients and memoized results.
//!
//! The crate counts characters, letters, words, syllables, and sentences,
//! classifies difficult words, and combines those counts into the classic
//! readability formulas (Flesch, Gunning Fog, SMOG, Dale-Chall, and more).
//! Coefficients and syllable heuristics come from a per-locale table, and
//! every result is memoized until the locale changes.
//!
//! # Modules
//!
//! - [`engine`] - [`ReadabilityEngine`], the memoized entry point
//! - [`locale`] - Locale tags, coefficient tables, fallback resolution
//! - [`counters`] - Raw lexical counts
//! - [`difficulty`] - Difficult-word classification
//! - [`formulas`] - Pure readability formulas over counts
//! - [`consensus`] - Grade voting across formulas
//! - [`cache`] - Per-metric memo tables and statistics
//! - [`provider`] - Word-list and syllable-dictionary sources
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use textmetrics::ReadabilityEngine;
//!
//! let engine = ReadabilityEngine::new();
//! let text = "The cat sat on the mat. It was happy there.";
//! let ease = engine.flesch_reading_ease(text);
//! assert!(ease > 90.0);
//!
//! engine.set_locale("de_DE");
//! assert_eq!(engine.locale().key, "de_DE");
//! ```
#![deny(unsafe_code)]

pub mod cache;
pub mod config;
pub mod consensus;
pub mod counters;
pub mod dictionaries;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod formulas;
pub mod locale;
pub mod provider;
pub mod syllables;
pub mod text;

pub use cache::{CacheInfo, EvictionPolicy, Metric};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use consensus::GradeBand;
pub use engine::{DEFAULT_MS_PER_CHAR, LocaleSession, ReadabilityEngine, ReadabilityReport};
pub use error::{ConfigError, ConfigResult, LocaleError, LocaleResult, TextError, TextResult};
pub use locale::{Fallback, LocaleConfig, LocaleRegistry, ResolvedLocale};
pub use provider::{BuiltinWordLists, CustomWordLists, WordListProvider};
