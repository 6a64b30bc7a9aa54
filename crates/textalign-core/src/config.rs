//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Nested keys in env vars are separated by `__` (`APP_ALIGN__WORKERS=8`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// `[align]` section: how each fragment is searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignSettings {
    pub metric: String,
    pub granularity: String,
    pub workers: usize,
    pub sequenced: bool,
    pub scan_timeout_ms: Option<u64>,
}

impl Default for AlignSettings {
    fn default() -> Self {
        Self {
            metric: "hamming".to_string(),
            granularity: "word".to_string(),
            workers: 4,
            sequenced: false,
            scan_timeout_ms: None,
        }
    }
}

/// `[data]` section: where transcripts and books live and where rows go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub transcripts_dir: String,
    pub books_dir: String,
    pub language: String,
    pub output_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            transcripts_dir: "./transcripts".to_string(),
            books_dir: "./books".to_string(),
            language: "pt".to_string(),
            output_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct Defaults {
    align: AlignSettings,
    data: DataSettings,
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Defaults::default())).merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn align(&self) -> anyhow::Result<AlignSettings> { self.get("align") }

    pub fn data(&self) -> anyhow::Result<DataSettings> { self.get("data") }

    fn validate(&self) -> anyhow::Result<()> {
        let align = self.align()?;
        if align.workers == 0 {
            return Err(Error::InvalidConfig("align.workers must be at least 1".to_string()).into());
        }
        if align.scan_timeout_ms == Some(0) {
            return Err(Error::InvalidConfig("align.scan_timeout_ms must be positive when set".to_string()).into());
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
