//! Configuration loading for belrich.
//! Reads belrich.toml from an explicit path, the BELRICH_CONFIG env var, or the
//! current directory. INDRA credentials are resolved in order: environment,
//! belrich.toml `[indra]` table, then INDRA's own `~/.config/indra/config.ini`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::error::{BelrichError, Result};

pub const DEFAULT_INDRA_URL: &str = "https://db.indra.bio";

const ENV_CONFIG_PATH: &str = "BELRICH_CONFIG";
const ENV_INDRA_URL: &str = "INDRA_DB_REST_URL";
const ENV_INDRA_API_KEY: &str = "INDRA_DB_REST_API_KEY";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub indra: IndraConfig,
    #[serde(default)]
    pub curation: CurationConfig,
}

/// Connection settings for the INDRA database REST service.
#[derive(Debug, Deserialize)]
pub struct IndraConfig {
    #[serde(default)]
    url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    /// Maximum evidences returned per statement.
    #[serde(default = "default_ev_limit")]
    pub ev_limit: u32,
    #[serde(default = "bool_true")]
    pub best_first: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for IndraConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            ev_limit: default_ev_limit(),
            best_first: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_ev_limit() -> u32 { 10 }
fn default_timeout_secs() -> u64 { 120 }
fn bool_true() -> bool { true }

/// Defaults for the curation sheet generators; CLI flags override these.
#[derive(Debug, Clone, Deserialize)]
pub struct CurationConfig {
    #[serde(default = "default_information_cutoff")]
    pub information_cutoff: f64,
    #[serde(default = "default_minimum_belief")]
    pub minimum_belief: f64,
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            information_cutoff: default_information_cutoff(),
            minimum_belief: default_minimum_belief(),
            separator: default_separator(),
        }
    }
}

fn default_information_cutoff() -> f64 { 0.5 }
fn default_minimum_belief()     -> f64 { 0.3 }
fn default_separator()          -> String { "\t".to_string() }

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(SecretString::from))
}

impl IndraConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Base URL of the service without a trailing slash.
    pub fn url(&self) -> &str {
        self.url
            .as_deref()
            .unwrap_or(DEFAULT_INDRA_URL)
            .trim_end_matches('/')
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_INDRA_URL) {
            if !url.trim().is_empty() {
                self.url = Some(url);
            }
        }
        if let Ok(key) = std::env::var(ENV_INDRA_API_KEY) {
            if !key.trim().is_empty() {
                self.api_key = Some(SecretString::from(key));
            }
        }
    }

    /// Fill settings still unset from INDRA's `config.ini` contents. Keys are
    /// matched case-insensitively, in any section.
    fn apply_ini(&mut self, contents: &str) -> Result<()> {
        let ini = ::config::Config::builder()
            .add_source(::config::File::from_str(contents, ::config::FileFormat::Ini))
            .build()
            .and_then(|c| c.try_deserialize::<HashMap<String, ::config::Value>>())
            .map_err(|e| BelrichError::Config(format!("config.ini: {e}")))?;

        let mut entries = Vec::new();
        for (key, value) in ini {
            match value.clone().into_table() {
                Ok(section) => entries.extend(section),
                Err(_) => entries.push((key, value)),
            }
        }

        for (key, value) in entries {
            let Ok(value) = value.into_string() else { continue };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if key.eq_ignore_ascii_case(ENV_INDRA_URL) && self.url.is_none() {
                self.url = Some(value.to_string());
            } else if key.eq_ignore_ascii_case(ENV_INDRA_API_KEY) && self.api_key.is_none() {
                self.api_key = Some(SecretString::from(value.to_string()));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration. A missing file is only an error when the path
    /// was given explicitly.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // A missing .env is the normal case.
        let _ = dotenvy::dotenv();

        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from));

        let mut config = match &explicit {
            Some(p) if !p.exists() => {
                return Err(BelrichError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            Some(p) => Self::from_file(p)?,
            None => {
                let local = Path::new("belrich.toml");
                if local.exists() {
                    Self::from_file(local)?
                } else {
                    debug!("No belrich.toml found, using defaults");
                    Self::default()
                }
            }
        };

        if let Some(ini) = indra_ini_path() {
            if let Ok(contents) = std::fs::read_to_string(&ini) {
                debug!(path = %ini.display(), "Reading INDRA config.ini");
                if let Err(e) = config.indra.apply_ini(&contents) {
                    warn!(error = %e, "Ignoring unreadable INDRA config.ini");
                }
            }
        }
        config.indra.apply_env();

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| BelrichError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| BelrichError::Config(e.to_string()))
    }
}

fn indra_ini_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("indra").join("config.ini"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.indra.url(), DEFAULT_INDRA_URL);
        assert!(config.indra.api_key.is_none());
        assert_eq!(config.curation.separator, "\t");
        assert!((config.curation.minimum_belief - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_toml_overrides() {
        let config = Config::from_toml(
            r#"
            [indra]
            url = "http://localhost:5000/"
            api_key = "s3cret"
            ev_limit = 3

            [curation]
            information_cutoff = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(config.indra.url(), "http://localhost:5000");
        assert_eq!(config.indra.api_key.as_ref().unwrap().expose_secret(), "s3cret");
        assert_eq!(config.indra.ev_limit, 3);
        assert!(config.indra.best_first);
        assert!((config.curation.information_cutoff - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let config = Config::from_toml("[indra]\napi_key = \"  \"\n").unwrap();
        assert!(config.indra.api_key.is_none());
    }

    #[test]
    fn test_ini_fills_only_missing_values() {
        let mut indra = IndraConfig::with_url("http://explicit");
        indra
            .apply_ini(
                "[indra]\n# comment\nINDRA_DB_REST_URL = http://from-ini\nINDRA_DB_REST_API_KEY = abc\n",
            )
            .unwrap();
        assert_eq!(indra.url(), "http://explicit");
        assert_eq!(indra.api_key.unwrap().expose_secret(), "abc");
    }

    #[test]
    fn test_ini_keys_outside_sections_and_blank_values() {
        let mut indra = IndraConfig::default();
        indra
            .apply_ini("INDRA_DB_REST_URL = http://from-ini\n\n[other]\nINDRA_DB_REST_API_KEY =\n")
            .unwrap();
        assert_eq!(indra.url(), "http://from-ini");
        assert!(indra.api_key.is_none());
    }

    #[test]
    fn test_env_then_toml_then_ini_precedence() {
        let mut config = Config::from_toml("[indra]\nurl = \"http://from-toml\"\n").unwrap();
        config
            .indra
            .apply_ini("[indra]\nINDRA_DB_REST_URL = http://from-ini\nINDRA_DB_REST_API_KEY = ini-key\n")
            .unwrap();
        assert_eq!(config.indra.url(), "http://from-toml");
        assert_eq!(config.indra.api_key.as_ref().unwrap().expose_secret(), "ini-key");

        // environment is applied last and wins
        std::env::set_var(ENV_INDRA_API_KEY, "env-key");
        config.indra.apply_env();
        std::env::remove_var(ENV_INDRA_API_KEY);
        assert_eq!(config.indra.api_key.unwrap().expose_secret(), "env-key");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, BelrichError::Config(_)));
    }
}
