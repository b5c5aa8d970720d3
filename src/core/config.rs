use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CBR_URL: &str = "https://www.cbr.ru";
pub const DEFAULT_NBU_URL: &str = "https://bank.gov.ua";
pub const DEFAULT_BINANCE_URL: &str = "https://api.binance.com";

fn default_ttl_seconds() -> u64 {
    600
}

fn default_timeout_seconds() -> u64 {
    20
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RatesConfig {
    /// How long a resolved pair stays fresh.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Per-request transport timeout for upstream feeds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        RatesConfig {
            ttl_seconds: default_ttl_seconds(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl RatesConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub cbr: Option<ProviderConfig>,
    pub nbu: Option<ProviderConfig>,
    pub binance: Option<ProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            cbr: Some(ProviderConfig {
                base_url: DEFAULT_CBR_URL.to_string(),
            }),
            nbu: Some(ProviderConfig {
                base_url: DEFAULT_NBU_URL.to_string(),
            }),
            binance: Some(ProviderConfig {
                base_url: DEFAULT_BINANCE_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn cbr_url(&self) -> &str {
        self.cbr.as_ref().map_or(DEFAULT_CBR_URL, |p| &p.base_url)
    }

    pub fn nbu_url(&self) -> &str {
        self.nbu.as_ref().map_or(DEFAULT_NBU_URL, |p| &p.base_url)
    }

    pub fn binance_url(&self) -> &str {
        self.binance
            .as_ref()
            .map_or(DEFAULT_BINANCE_URL, |p| &p.base_url)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub rates: RatesConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Loads the config from the default location, or defaults if there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "xrate", "xrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rates.ttl_seconds == 0 {
            bail!("rates.ttl_seconds must be a positive integer");
        }
        if self.rates.timeout_seconds == 0 {
            bail!("rates.timeout_seconds must be a positive integer");
        }
        Ok(())
    }
}
