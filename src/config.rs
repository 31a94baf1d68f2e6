use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use tracing::info;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Aggregator root, e.g. `https://news.google.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent on every feed request; the aggregator rejects library defaults
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Number of feed items shown per page
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Number of grid columns
    #[serde(default = "default_columns")]
    pub columns: usize,
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_base_url() -> String {
    "https://news.google.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_items() -> usize {
    9
}

fn default_columns() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_items: default_max_items(),
            columns: default_columns(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise run on built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("invalid base_url '{}': {}", self.base_url, e))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("base_url must be http or https, got '{}'", base.scheme());
        }
        if self.user_agent.trim().is_empty() {
            anyhow::bail!("user_agent must not be empty");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        if self.columns == 0 {
            anyhow::bail!("columns must be greater than zero");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
