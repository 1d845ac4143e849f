use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";
const DEFAULT_PAUSE_MS: u64 = 200;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Page that hands out the session cookie needed for company info
    #[serde(default = "default_cookie_url")]
    pub cookie_url: String,
}

impl Default for YahooProviderConfig {
    fn default() -> Self {
        YahooProviderConfig {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            cookie_url: default_cookie_url(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub yahoo: YahooProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// IANA zone name used for timestamps, e.g. `America/New_York`
    pub timezone: Option<String>,
    /// Pause after each lookup, in milliseconds
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            timezone: None,
            pause_ms: DEFAULT_PAUSE_MS,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_YAHOO_BASE_URL.to_string()
}

fn default_cookie_url() -> String {
    DEFAULT_YAHOO_COOKIE_URL.to_string()
}

// Yahoo throttles requests that do not look like they come from a browser.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_pause_ms() -> u64 {
    DEFAULT_PAUSE_MS
}

impl AppConfig {
    /// Loads the config from the default location, or defaults if no file exists.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "squote")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        // An empty file deserializes to null, which means all defaults.
        if config_str.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  yahoo:
    base_url: "http://example.com/yahoo"
    user_agent: "test-agent"
    cookie_url: "http://example.com/cookie"
timezone: "Europe/Berlin"
pause_ms: 0
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.providers.yahoo.base_url, "http://example.com/yahoo");
        assert_eq!(config.providers.yahoo.user_agent, "test-agent");
        assert_eq!(config.providers.yahoo.cookie_url, "http://example.com/cookie");
        assert_eq!(config.timezone.as_deref(), Some("Europe/Berlin"));
        assert_eq!(config.pause(), Duration::ZERO);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml_str = r#"
providers:
  yahoo:
    base_url: "http://localhost:1234"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.providers.yahoo.base_url, "http://localhost:1234");
        assert_eq!(config.providers.yahoo.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.providers.yahoo.cookie_url, DEFAULT_YAHOO_COOKIE_URL);
        assert!(config.timezone.is_none());
        assert_eq!(config.pause_ms, 200);
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(file.path(), "timezone: UTC\n")?;

        let config = AppConfig::load_from_path(file.path())?;
        assert_eq!(config.timezone.as_deref(), Some("UTC"));
        assert_eq!(config.providers.yahoo.base_url, DEFAULT_YAHOO_BASE_URL);
        Ok(())
    }

    #[test]
    fn test_load_empty_file_gives_defaults() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        let config = AppConfig::load_from_path(file.path())?;
        assert_eq!(config.pause_ms, 200);
        Ok(())
    }

    #[test]
    fn test_load_missing_or_malformed_file_fails() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let missing = dir.path().join("missing.yaml");
        let err = AppConfig::load_from_path(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));

        let malformed = dir.path().join("bad.yaml");
        fs::write(&malformed, "pause_ms: [not, a, number]\n")?;
        let err = AppConfig::load_from_path(&malformed).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }
}
