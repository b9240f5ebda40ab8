//! Error types for textmetrics.
//!
//! Degenerate input (empty text, zero words, zero sentences) is deliberately
//! absent here: counters and formulas return `0` for it instead of failing.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors produced by the strict locale tag parser.
///
/// [`ReadabilityEngine::set_locale`](crate::ReadabilityEngine::set_locale)
/// never surfaces these; it falls back to the default locale instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// The tag was empty or whitespace.
    #[error("empty locale tag")]
    Empty,

    /// The tag does not look like `language[_-]REGION`.
    #[error("malformed locale tag: {tag:?}")]
    Malformed {
        /// The tag as given by the caller.
        tag: String,
    },
}

/// Result type alias using [`LocaleError`].
pub type LocaleResult<T> = Result<T, LocaleError>;

/// Errors raised while turning caller input into text.
#[derive(Error, Debug)]
pub enum TextError {
    /// The input bytes are not valid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Result type alias using [`TextError`].
pub type TextResult<T> = Result<T, TextError>;
