//! Configuration loading for the evaluation engine
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable naming the config file location
pub const CONFIG_ENV_VAR: &str = "GAITEVAL_CONFIG";

/// Resolved engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Address the HTTP surface binds to
    pub bind_addr: String,
    /// Base URL of the session listing collaborator
    pub session_api_base: String,
    /// Base URL of the result-set storage collaborator
    pub storage_base: String,
    /// Maximum in-flight result-set fetches in the history aggregator
    pub fetch_concurrency: usize,
    /// Catalogue size (distinct metrics x sides) used as the display
    /// denominator for "slots not yet filled". `None` means "use the
    /// registry's own slot count".
    pub catalogue_slots: Option<usize>,
    /// Default page size for history/trend pagination
    pub default_page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5641".to_string(),
            session_api_base: "http://127.0.0.1:5640/api".to_string(),
            storage_base: "http://127.0.0.1:5639/store".to_string(),
            fetch_concurrency: 6,
            catalogue_slots: None,
            default_page_size: 10,
        }
    }
}

/// Partial configuration as read from a TOML file; every field optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    bind_addr: Option<String>,
    session_api_base: Option<String>,
    storage_base: Option<String>,
    fetch_concurrency: Option<usize>,
    catalogue_slots: Option<usize>,
    default_page_size: Option<usize>,
}

impl EngineConfig {
    /// Load configuration following the priority order above.
    ///
    /// `cli_config` is an explicit config file path from the command
    /// line; when absent the `GAITEVAL_CONFIG` environment variable and
    /// then the platform config directory are consulted.
    pub fn load(cli_config: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = resolve_config_path(cli_config) {
            config.apply_file(&path)?;
        }
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("invalid config file {}: {e}", path.display())))?;

        if let Some(v) = file.bind_addr {
            self.bind_addr = v;
        }
        if let Some(v) = file.session_api_base {
            self.session_api_base = v;
        }
        if let Some(v) = file.storage_base {
            self.storage_base = v;
        }
        if let Some(v) = file.fetch_concurrency {
            self.fetch_concurrency = v;
        }
        if file.catalogue_slots.is_some() {
            self.catalogue_slots = file.catalogue_slots;
        }
        if let Some(v) = file.default_page_size {
            self.default_page_size = v;
        }
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("GAITEVAL_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Ok(v) = std::env::var("GAITEVAL_SESSION_API_BASE") {
            self.session_api_base = v;
        }
        if let Ok(v) = std::env::var("GAITEVAL_STORAGE_BASE") {
            self.storage_base = v;
        }
        if let Ok(v) = std::env::var("GAITEVAL_FETCH_CONCURRENCY") {
            if let Ok(n) = v.parse() {
                self.fetch_concurrency = n;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.fetch_concurrency == 0 {
            return Err(Error::Config(
                "fetch_concurrency must be at least 1".to_string(),
            ));
        }
        if self.default_page_size == 0 {
            return Err(Error::Config(
                "default_page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Locate the config file: CLI path, then `GAITEVAL_CONFIG`, then the
/// platform config directory. Returns `None` when no file exists, which
/// leaves the compiled defaults in effect.
fn resolve_config_path(cli_config: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_config {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    let default = dirs::config_dir().map(|d| d.join("gaiteval").join("config.toml"))?;
    if default.exists() {
        Some(default)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fetch_concurrency, 6);
        assert!(config.catalogue_slots.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "fetch_concurrency = 3").unwrap();
        writeln!(f, "catalogue_slots = 13").unwrap();
        writeln!(f, "session_api_base = \"http://sessions.test/api\"").unwrap();
        drop(f);

        let mut config = EngineConfig::default();
        config.apply_file(&path).unwrap();
        assert_eq!(config.fetch_concurrency, 3);
        assert_eq!(config.catalogue_slots, Some(13));
        assert_eq!(config.session_api_base, "http://sessions.test/api");
        // untouched fields keep their defaults
        assert_eq!(config.default_page_size, 10);
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "fetch_concurrency = \"many\"").unwrap();

        let mut config = EngineConfig::default();
        let err = config.apply_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn zero_concurrency_rejected() {
        let config = EngineConfig {
            fetch_concurrency: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
