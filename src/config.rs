use std::path::{Path, PathBuf};

use bento_client::{
    client::config::timeout_from_secs,
    BentoError, ClientConfig, Result,
};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

/// Contents of `bento.toml`
#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BentoConfig {
    /// Publishable key, used as the basic auth username
    pub publishable_key: String,
    /// Secret key, used as the basic auth password
    pub secret_key: String,
    /// Site identifier sent with every request
    pub site_uuid: String,
    /// Alternate API root
    pub base_url: Option<String>,
    /// Request timeout in seconds; 0 selects the default
    pub timeout_secs: Option<i64>,
    /// Log level for the CLI; "off" disables file logging
    pub log_level: Option<String>,
}

impl BentoConfig {
    /// Override file values with `BENTO_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = var("BENTO_PUBLISHABLE_KEY") {
            self.publishable_key = key;
        }
        if let Some(key) = var("BENTO_SECRET_KEY") {
            self.secret_key = key;
        }
        if let Some(site) = var("BENTO_SITE_UUID") {
            self.site_uuid = site;
        }
        if let Some(url) = var("BENTO_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(value) = var("BENTO_TIMEOUT_SECS") {
            let secs: i64 = value.trim().parse().map_err(|_| {
                BentoError::config("timeout", format!("not a number: {value}"))
            })?;
            timeout_from_secs(secs)?;
            self.timeout_secs = Some(secs);
        }

        Ok(())
    }
}

impl TryFrom<&BentoConfig> for ClientConfig {
    type Error = BentoError;

    fn try_from(config: &BentoConfig) -> Result<Self> {
        let mut builder = ClientConfig::builder()
            .publishable_key(config.publishable_key.as_str())
            .secret_key(config.secret_key.as_str())
            .site_uuid(config.site_uuid.as_str());

        if let Some(url) = &config.base_url {
            builder = builder.base_url(url.as_str());
        }

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(timeout_from_secs(secs)?);
        }

        builder.build()
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("bento.toml")
    } else {
        PathBuf::from("bento.toml")
    }
}

/// Read the config file, falling back to an empty config when it does not exist
pub fn load_config(config_file: &Path) -> Result<BentoConfig> {
    if !config_file.exists() {
        return Ok(BentoConfig::default());
    }

    confy::load_path(config_file).map_err(|e| BentoError::config("config_file", e.to_string()))
}

pub fn save_config(config_file: &Path, config: &BentoConfig) -> Result<()> {
    confy::store_path(config_file, config)
        .map_err(|e| BentoError::config("config_file", e.to_string()))?;

    Ok(())
}
