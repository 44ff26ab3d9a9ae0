//! Configuration primitives and loader for the defaults-table generator.
//!
//! The loader resolves configuration using a fixed precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Parsed settings are normalised into typed structures so downstream crates
//! can operate without touching raw TOML.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const CONFIG_FILE_NAME: &str = ".defaults-table.toml";

/// Reference target used for every option link unless overridden.
pub const DEFAULT_BASE_URL: &str = "https://www.typescriptlang.org/tsconfig/";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub links: LinkSettings,
    pub table: TableSettings,
    pub sync: SyncSettings,
    pub sources: ConfigSources,
}

/// Settings controlling how option names become reference links.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkSettings {
    pub base_url: String,
    pub label_prefix: String,
}

impl LinkSettings {
    /// Build the canonical link target for an option name.
    pub fn target_for(&self, name: &str) -> String {
        format!("{}#{}", self.base_url, name)
    }
}

/// Column titles for the generated table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableSettings {
    pub option_title: String,
    pub default_title: String,
}

/// Marker lines delimiting the generated block inside a host document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyncSettings {
    pub start_marker: String,
    pub end_marker: String,
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
}

impl ConfigSource {
    fn builtin() -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        ConfigSource {
            kind,
            path: Some(path),
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::builtin();
        let mut merged = defaults_layer(&default_source);
        let mut source_layers = vec![default_source];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, &source)?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, &source)?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, &source)?);
            source_layers.push(source);
        }

        let resolved = merged.finalize().map_err(ConfigError::Validation)?;
        debug!(layers = source_layers.len(), "configuration resolved");

        Ok(Config {
            links: resolved.links,
            table: resolved.table,
            sync: resolved.sync,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }

    /// Built-in settings without touching the filesystem.
    pub fn builtin() -> Self {
        let source = ConfigSource::builtin();
        let resolved = defaults_layer(&source)
            .finalize()
            .unwrap_or_else(|err| panic!("built-in defaults failed validation:\n{err}"));
        Config {
            links: resolved.links,
            table: resolved.table,
            sync: resolved.sync,
            sources: ConfigSources {
                working_directory: PathBuf::from("."),
                layers: vec![source],
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::builtin()
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: &ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    debug!(source = %source.describe(), "applying config layer");
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: &ConfigSource) -> PartialConfig {
    let located = |value: &str| Some(Located::new(value.to_owned(), source.clone()));
    PartialConfig {
        base_url: located(DEFAULT_BASE_URL),
        label_prefix: located("d"),
        option_title: located("Option"),
        default_title: located("Default"),
        start_marker: located("<!-- defaults-table -->"),
        end_marker: located("<!-- defaults-table-end -->"),
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

/// Every field is a single string, so layers merge field by field.
#[derive(Clone, Debug, Default)]
struct PartialConfig {
    base_url: Option<Located<String>>,
    label_prefix: Option<Located<String>>,
    option_title: Option<Located<String>>,
    default_title: Option<Located<String>>,
    start_marker: Option<Located<String>>,
    end_marker: Option<Located<String>>,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        fn take(slot: &mut Option<Located<String>>, value: Option<Located<String>>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.base_url, other.base_url);
        take(&mut self.label_prefix, other.label_prefix);
        take(&mut self.option_title, other.option_title);
        take(&mut self.default_title, other.default_title);
        take(&mut self.start_marker, other.start_marker);
        take(&mut self.end_marker, other.end_marker);
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let base_url = require(self.base_url, "links.base_url", &mut errors);
        if let Some(url) = &base_url {
            if url.value.contains('#') {
                errors.push(
                    ConfigValidationError::new(
                        Some(url.source.clone()),
                        "must not contain '#'".into(),
                    )
                    .with_context("links.base_url"),
                );
            }
        }

        let label_prefix = require(self.label_prefix, "links.label_prefix", &mut errors);
        if let Some(prefix) = &label_prefix {
            if !prefix.value.chars().all(|ch| ch.is_ascii_alphanumeric()) {
                errors.push(
                    ConfigValidationError::new(
                        Some(prefix.source.clone()),
                        format!("'{}' must be ASCII alphanumeric", prefix.value),
                    )
                    .with_context("links.label_prefix"),
                );
            }
        }

        let option_title = require(self.option_title, "table.option_title", &mut errors);
        let default_title = require(self.default_title, "table.default_title", &mut errors);
        for (title, key) in [
            (&option_title, "table.option_title"),
            (&default_title, "table.default_title"),
        ] {
            if let Some(title) = title {
                if title.value.contains('|') {
                    errors.push(
                        ConfigValidationError::new(
                            Some(title.source.clone()),
                            "must not contain '|'".into(),
                        )
                        .with_context(key),
                    );
                }
            }
        }

        let start_marker = require(self.start_marker, "sync.start_marker", &mut errors);
        let end_marker = require(self.end_marker, "sync.end_marker", &mut errors);
        if let (Some(start), Some(end)) = (&start_marker, &end_marker) {
            if start.value.trim() == end.value.trim() {
                errors.push(
                    ConfigValidationError::new(
                        Some(end.source.clone()),
                        "start and end markers must differ".into(),
                    )
                    .with_context("sync.end_marker"),
                );
            }
        }

        let (
            Some(base_url),
            Some(label_prefix),
            Some(option_title),
            Some(default_title),
            Some(start_marker),
            Some(end_marker),
        ) = (
            base_url,
            label_prefix,
            option_title,
            default_title,
            start_marker,
            end_marker,
        )
        else {
            return Err(ConfigValidationErrors(errors));
        };

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            links: LinkSettings {
                base_url: base_url.value,
                label_prefix: label_prefix.value,
            },
            table: TableSettings {
                option_title: option_title.value,
                default_title: default_title.value,
            },
            sync: SyncSettings {
                start_marker: start_marker.value.trim().to_owned(),
                end_marker: end_marker.value.trim().to_owned(),
            },
        })
    }
}

fn require(
    value: Option<Located<String>>,
    key: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Option<Located<String>> {
    match value {
        Some(located) if located.value.trim().is_empty() => {
            errors.push(
                ConfigValidationError::new(Some(located.source), "must not be empty".into())
                    .with_context(key),
            );
            None
        }
        Some(located) => Some(located),
        None => {
            errors.push(ConfigValidationError::new(None, "missing value".into()).with_context(key));
            None
        }
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

#[derive(Clone, Debug)]
struct ResolvedConfig {
    links: LinkSettings,
    table: TableSettings,
    sync: SyncSettings,
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    links: Option<RawLinks>,
    #[serde(default)]
    table: Option<RawTable>,
    #[serde(default)]
    sync: Option<RawSync>,
}

impl RawConfig {
    fn into_partial(self, source: &ConfigSource) -> PartialConfig {
        let located = |value: Option<String>| value.map(|v| Located::new(v, source.clone()));
        let links = self.links.unwrap_or_default();
        let table = self.table.unwrap_or_default();
        let sync = self.sync.unwrap_or_default();

        PartialConfig {
            base_url: located(links.base_url),
            label_prefix: located(links.label_prefix),
            option_title: located(table.option_title),
            default_title: located(table.default_title),
            start_marker: located(sync.start_marker),
            end_marker: located(sync.end_marker),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLinks {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    label_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    #[serde(default)]
    option_title: Option<String>,
    #[serde(default)]
    default_title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSync {
    #[serde(default)]
    start_marker: Option<String>,
    #[serde(default)]
    end_marker: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_defaults_match_tsconfig_reference() {
        let config = Config::builtin();
        assert_eq!(config.links.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.links.label_prefix, "d");
        assert_eq!(config.table.option_title, "Option");
        assert_eq!(config.table.default_title, "Default");
    }

    #[test]
    fn target_for_appends_anchor() {
        let links = Config::builtin().links;
        assert_eq!(
            links.target_for("strict"),
            "https://www.typescriptlang.org/tsconfig/#strict"
        );
    }

    #[test]
    fn later_layers_override_individual_fields() {
        let source = ConfigSource::builtin();
        let mut merged = defaults_layer(&source);
        let overlay = RawConfig {
            links: Some(RawLinks {
                base_url: None,
                label_prefix: Some("ref".into()),
            }),
            table: None,
            sync: None,
        };
        merged.merge(overlay.into_partial(&ConfigSource::for_file(
            ConfigSourceKind::Local,
            PathBuf::from("x.toml"),
        )));

        let resolved = merged.finalize().expect("valid config");
        assert_eq!(resolved.links.label_prefix, "ref");
        assert_eq!(resolved.links.base_url, DEFAULT_BASE_URL);
    }
}
