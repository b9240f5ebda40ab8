//! Engine configuration: discovery, merging, and extraction.
//!
//! Settings come from up to four layers, lowest precedence first:
//!
//! 1. built-in defaults,
//! 2. the user file `config.<ext>` in the platform config directory
//!    (`~/.config/textmetrics/` on Linux),
//! 3. project files found by walking up from a search root,
//! 4. files named explicitly with [`ConfigLoader::with_file`].
//!
//! `TEXTMETRICS_*` environment variables override all of them; a double
//! underscore separates nested keys (`TEXTMETRICS_CACHE__POLICY=unbounded`).
//!
//! The project walk stops at the first directory holding any
//! `.textmetrics.<ext>` or `textmetrics.<ext>` file, or at the boundary
//! marker (`.git` by default). Every match in that directory is merged:
//! dotfiles before regular files, and `toml < yaml < yml < json` within each.
//!
//! ```no_run
//! use camino::Utf8PathBuf;
//! use textmetrics::{ConfigLoader, ReadabilityEngine};
//!
//! let cwd = Utf8PathBuf::try_from(std::env::current_dir()?)?;
//! let (config, sources) = ConfigLoader::new().with_project_search(&cwd).load()?;
//! if let Some(file) = sources.primary_file() {
//!     println!("using {file}");
//! }
//! let engine = ReadabilityEngine::from_config(&config);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::cache::EvictionPolicy;
use crate::error::{ConfigError, ConfigResult};
use crate::locale::LocaleConfig;

/// Memoization settings.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Eviction policy applied to every metric's table.
    pub policy: EvictionPolicy,
}

/// Everything a [`ReadabilityEngine`](crate::ReadabilityEngine) can be set
/// up with.
///
/// Every field is optional in files; missing ones keep their defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Verbosity the host application should log at.
    pub log_level: LogLevel,
    /// Initial locale tag; `en_US` when unset.
    pub locale: Option<String>,
    /// Result caching.
    pub cache: CacheConfig,
    /// Reading speed in milliseconds per character; 14.69 when unset.
    pub ms_per_char: Option<f64>,
    /// Extra or replacement locale tables, keyed by tag.
    ///
    /// Fields left out of a table take the English defaults, so a table
    /// can override just the coefficients that differ.
    pub locales: HashMap<String, LocaleConfig>,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Cache misses, evictions, and config discovery.
    Debug,
    /// Locale changes (default).
    #[default]
    Info,
    /// Unknown locales and ignored tables.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Lowercase name, as accepted by `tracing` filter directives.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// The files a [`ConfigLoader`] found and merged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project files from the closest matching directory, lowest
    /// precedence first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// The user-level file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Files named with [`ConfigLoader::with_file`], in the order given.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The file with the final say: the last explicit file, else the last
    /// project file, else the user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .or_else(|| self.project_files.last())
            .map(Utf8PathBuf::as_path)
            .or(self.user_file.as_deref())
    }

    /// Whether no file was found at all.
    pub fn is_empty(&self) -> bool {
        self.project_files.is_empty() && self.user_file.is_none() && self.explicit_files.is_empty()
    }

    /// Every file in merge order.
    fn in_merge_order(&self) -> impl Iterator<Item = &Utf8Path> {
        self.user_file
            .iter()
            .chain(&self.project_files)
            .chain(&self.explicit_files)
            .map(Utf8PathBuf::as_path)
    }
}

/// Recognized extensions, in merge order.
const EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// File stem of project files and name of the user config directory.
const APP_NAME: &str = "textmetrics";

/// Prefix of configuration environment variables.
const ENV_PREFIX: &str = "TEXTMETRICS_";

/// Serialization format of a config file, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    /// Unknown extensions are read as TOML.
    fn of(path: &Utf8Path) -> Self {
        match path.extension() {
            Some("yaml" | "yml") => Self::Yaml,
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }

    fn merge_into(self, figment: Figment, path: &Utf8Path) -> Figment {
        match self {
            Self::Toml => figment.merge(Toml::file_exact(path.as_str())),
            Self::Yaml => figment.merge(Yaml::file_exact(path.as_str())),
            Self::Json => figment.merge(Json::file_exact(path.as_str())),
        }
    }
}

/// Project config files that may live in `dir`, lowest precedence first.
fn project_candidates(dir: &Utf8Path) -> impl Iterator<Item = Utf8PathBuf> + '_ {
    let dotfiles = EXTENSIONS
        .iter()
        .map(move |ext| dir.join(format!(".{APP_NAME}.{ext}")));
    let regular = EXTENSIONS
        .iter()
        .map(move |ext| dir.join(format!("{APP_NAME}.{ext}")));
    dotfiles.chain(regular)
}

/// Builder that discovers and merges configuration.
#[derive(Debug)]
pub struct ConfigLoader {
    search_root: Option<Utf8PathBuf>,
    user_config: bool,
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader that reads the user file and stops project search at `.git`.
    /// No project search happens until a root is set.
    pub fn new() -> Self {
        Self {
            search_root: None,
            user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Walk up from `path` looking for project files.
    #[must_use]
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Whether to read the user-level file.
    #[must_use]
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.user_config = include;
        self
    }

    /// Stop the project walk above a directory containing `marker`.
    ///
    /// Files in the marker's own directory are still found.
    #[must_use]
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Walk all the way to the filesystem root.
    #[must_use]
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Merge `path` after everything discovered. Later calls win.
    #[must_use]
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Find the files this loader would merge, without reading them.
    pub fn discover(&self) -> ConfigSources {
        ConfigSources {
            project_files: self
                .search_root
                .as_deref()
                .map(|root| self.find_project_files(root))
                .unwrap_or_default(),
            user_file: if self.user_config {
                find_user_file()
            } else {
                None
            },
            explicit_files: self.explicit_files.clone(),
        }
    }

    /// Merge defaults, discovered files, and the environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Deserialize`] when a file cannot be read or a value
    /// has the wrong shape.
    #[tracing::instrument(skip(self), fields(search_root = ?self.search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = self.discover();
        Self::extract(sources)
    }

    /// Like [`load`](Self::load), but fails when no file was found.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] when discovery finds nothing, otherwise as
    /// [`load`](Self::load).
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = self.discover();
        if sources.is_empty() {
            return Err(ConfigError::NotFound);
        }
        Self::extract(sources)
    }

    fn extract(sources: ConfigSources) -> ConfigResult<(Config, ConfigSources)> {
        let figment = sources.in_merge_order().fold(
            Figment::new().merge(Serialized::defaults(Config::default())),
            |figment, path| {
                tracing::debug!(%path, "merging config file");
                FileFormat::of(path).merge_into(figment, path)
            },
        );
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true))
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;

        tracing::debug!(
            locale = config.locale.as_deref(),
            ms_per_char = config.ms_per_char,
            locale_tables = config.locales.len(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    fn find_project_files(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        for dir in start.ancestors() {
            let found: Vec<Utf8PathBuf> = project_candidates(dir).filter(|p| p.is_file()).collect();
            if !found.is_empty() {
                return found;
            }
            // The marker's own directory was searched above
            if dir != start
                && let Some(marker) = &self.boundary_marker
                && dir.join(marker).exists()
            {
                break;
            }
        }
        Vec::new()
    }
}

fn find_user_file() -> Option<Utf8PathBuf> {
    let dir = user_config_dir()?;
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

/// Platform config directory for textmetrics, if the home directory is known.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::num::NonZeroUsize;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Tests that read or write `TEXTMETRICS_*` variables hold this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path).unwrap()
    }

    fn project_loader(root: &Utf8Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(root)
    }

    fn load_file(name: &str, contents: &str) -> Config {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        let path = utf8(tmp.path().join(name));
        fs::write(&path, contents).unwrap();
        ConfigLoader::new()
            .with_user_config(false)
            .with_file(&path)
            .load()
            .unwrap()
            .0
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.locale.is_none());
        assert!(config.ms_per_char.is_none());
        assert!(config.locales.is_empty());
        assert_eq!(config.cache.policy.capacity(), Some(128));
    }

    #[test]
    fn nothing_found_still_loads() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load()
            .unwrap();
        assert!(config.locale.is_none());
        assert!(sources.is_empty());
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn engine_settings_from_toml() {
        let config = load_file(
            "settings.toml",
            "log_level = \"debug\"\nlocale = \"de_DE\"\nms_per_char = 20.5\n",
        );
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.locale.as_deref(), Some("de_DE"));
        assert_eq!(config.ms_per_char, Some(20.5));
    }

    #[test]
    fn later_explicit_file_wins() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        let base = utf8(tmp.path().join("base.toml"));
        let local = utf8(tmp.path().join("local.toml"));
        fs::write(&base, "locale = \"fr_FR\"\nms_per_char = 12.0\n").unwrap();
        fs::write(&local, "locale = \"it_IT\"\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&base)
            .with_file(&local)
            .load()
            .unwrap();

        assert_eq!(config.locale.as_deref(), Some("it_IT"));
        assert_eq!(config.ms_per_char, Some(12.0));
        assert_eq!(sources.primary_file(), Some(local.as_path()));
    }

    #[test]
    fn project_file_found_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("essay");
        let chapters = project.join("chapters").join("draft");
        fs::create_dir_all(&chapters).unwrap();
        fs::write(project.join(".textmetrics.toml"), "ms_per_char = 30.0\n").unwrap();

        let loader = project_loader(&utf8(chapters));
        let sources = loader.discover();
        assert_eq!(sources.project_files.len(), 1);
        assert!(sources.project_files[0].ends_with(".textmetrics.toml"));
    }

    #[test]
    fn boundary_marker_hides_outer_files() {
        let tmp = TempDir::new().unwrap();
        let outer = tmp.path().join("outer");
        let repo = outer.join("repo");
        let docs = repo.join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::create_dir(repo.join(".git")).unwrap();
        fs::write(outer.join(".textmetrics.toml"), "locale = \"ru_RU\"\n").unwrap();

        let sources = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(utf8(docs))
            .discover();
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn file_beside_boundary_marker_is_found() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::write(repo.join("textmetrics.yaml"), "locale: nl_NL\n").unwrap();

        let sources = ConfigLoader::new()
            .with_user_config(false)
            .with_project_search(utf8(repo))
            .discover();
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn regular_file_overrides_dotfile() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".textmetrics.toml"), "locale = \"es_ES\"\n").unwrap();
        fs::write(tmp.path().join("textmetrics.yaml"), "locale: pl_PL\n").unwrap();

        let (config, sources) = project_loader(&utf8(tmp.path().to_path_buf()))
            .load()
            .unwrap();
        assert_eq!(config.locale.as_deref(), Some("pl_PL"));
        assert_eq!(sources.project_files.len(), 2);
    }

    #[test]
    fn only_closest_directory_contributes() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        fs::create_dir_all(&child).unwrap();
        fs::write(parent.join(".textmetrics.toml"), "locale = \"ru_RU\"\n").unwrap();
        fs::write(child.join("textmetrics.json"), r#"{"ms_per_char": 9.5}"#).unwrap();

        let (config, sources) = project_loader(&utf8(child)).load().unwrap();
        assert_eq!(config.ms_per_char, Some(9.5));
        assert!(config.locale.is_none());
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn explicit_file_overrides_project_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".textmetrics.toml"), "locale = \"fr_FR\"\n").unwrap();
        let explicit = utf8(tmp.path().join("override.json"));
        fs::write(&explicit, r#"{"locale": "de_DE"}"#).unwrap();

        let (config, sources) = project_loader(&utf8(tmp.path().to_path_buf()))
            .with_file(&explicit)
            .load()
            .unwrap();
        assert_eq!(config.locale.as_deref(), Some("de_DE"));
        assert_eq!(sources.primary_file(), Some(explicit.as_path()));
    }

    #[test]
    fn load_or_error_needs_a_file() {
        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load_or_error();
        assert!(matches!(result, Err(ConfigError::NotFound)));

        let tmp = TempDir::new().unwrap();
        let path = utf8(tmp.path().join("config.toml"));
        fs::write(&path, "locale = \"ja_JP\"\n").unwrap();
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let (config, _) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&path)
            .load_or_error()
            .unwrap();
        assert_eq!(config.locale.as_deref(), Some("ja_JP"));
    }

    #[test]
    fn wrong_shape_is_a_deserialize_error() {
        let tmp = TempDir::new().unwrap();
        let path = utf8(tmp.path().join("config.toml"));
        fs::write(&path, "ms_per_char = \"fast\"\n").unwrap();

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&path)
            .load();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(FileFormat::of(Utf8Path::new("a.yml")), FileFormat::Yaml);
        assert_eq!(FileFormat::of(Utf8Path::new("a.json")), FileFormat::Json);
        assert_eq!(FileFormat::of(Utf8Path::new("a.conf")), FileFormat::Toml);
    }

    #[test]
    fn user_config_dir_is_app_specific() {
        if let Some(path) = user_config_dir() {
            assert!(path.as_str().contains("textmetrics"));
        }
    }

    #[test]
    fn cache_policy_from_toml() {
        let config = load_file("config.toml", "[cache.policy.lru]\ncapacity = 16\n");
        assert_eq!(
            config.cache.policy,
            EvictionPolicy::Lru {
                capacity: NonZeroUsize::new(16).unwrap()
            }
        );

        let config = load_file("config.toml", "[cache]\npolicy = \"unbounded\"\n");
        assert_eq!(config.cache.policy, EvictionPolicy::Unbounded);
    }

    #[test]
    fn partial_locale_table_keeps_english_defaults() {
        let yaml = r#"
locales:
  en_GB:
    flesch:
      base: 200.0
    familiar_words: [colour, favourite]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let table = config.locales.get("en_GB").expect("en_GB table");
        assert_eq!(table.flesch.base, 200.0);
        assert_eq!(table.flesch.sentence_length, 1.015);
        assert_eq!(table.familiar_words, vec!["colour", "favourite"]);
        assert_eq!(table.difficult_word_syllables, 2);
    }

    #[test]
    fn locale_tables_from_json_file() {
        let config = load_file(
            "config.json",
            r#"{"locales": {"xx_YY": {"long_word_length": 8, "segmentation": "ideographic"}}}"#,
        );
        let table = &config.locales["xx_YY"];
        assert_eq!(table.long_word_length, 8);
        assert_eq!(table.segmentation, crate::locale::Segmentation::Ideographic);
    }

    #[test]
    #[allow(unsafe_code)]
    fn environment_overrides_files() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        let path = utf8(tmp.path().join("config.toml"));
        fs::write(&path, "locale = \"en_US\"\n").unwrap();

        // SAFETY: ENV_LOCK serializes every test that touches these variables.
        unsafe {
            std::env::set_var("TEXTMETRICS_LOCALE", "nl_NL");
            std::env::set_var("TEXTMETRICS_CACHE__POLICY", "unbounded");
        }
        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&path)
            .load();
        // SAFETY: as above.
        unsafe {
            std::env::remove_var("TEXTMETRICS_LOCALE");
            std::env::remove_var("TEXTMETRICS_CACHE__POLICY");
        }

        let (config, _) = result.unwrap();
        assert_eq!(config.locale.as_deref(), Some("nl_NL"));
        assert_eq!(config.cache.policy, EvictionPolicy::Unbounded);
    }
}
