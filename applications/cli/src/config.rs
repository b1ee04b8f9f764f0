/// CLI configuration
use crate::error::{CliError, Result};
use disco_catalog::CatalogConfig;
use disco_core::types::UserId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "disco.toml";

/// Environment variables read as the catalog key when none is configured
const API_KEY_FALLBACKS: [&str; 2] = ["LASTFM_API_KEY", "LAST_FM_API_KEY"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscoConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_user")]
    pub user: UserSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserSettings {
    /// Owner the CLI acts for
    #[serde(default = "default_user_id")]
    pub id: UserId,
}

impl DiscoConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `disco.toml` in the working
    /// directory is used if present. `DISCO_*` variables override both, with
    /// `__` between section and key (`DISCO_STORAGE__DATABASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables (prefixed with DISCO_)
        settings = settings.add_source(
            config::Environment::with_prefix("DISCO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = settings.build()?.try_deserialize()?;

        if config.catalog.api_key.is_none() {
            config.catalog.api_key = API_KEY_FALLBACKS
                .iter()
                .find_map(|name| std::env::var(name).ok())
                .filter(|key| !key.trim().is_empty());
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(CliError::Config(
                "database URL is required (set DISCO_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        if self.catalog.timeout_secs == 0 {
            return Err(CliError::Config(
                "catalog timeout must be at least one second".to_string(),
            ));
        }

        if self.user.id <= 0 {
            return Err(CliError::Config(format!(
                "user id must be positive, got {}",
                self.user.id
            )));
        }

        Ok(())
    }

    /// Settings for the catalog client
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            api_key: self.catalog.api_key.clone(),
            base_url: self.catalog.base_url.clone(),
            timeout_secs: self.catalog.timeout_secs,
        }
    }

    /// File behind a `sqlite://` URL, if it names one
    pub fn database_path(&self) -> Option<PathBuf> {
        let rest = self.storage.database_url.strip_prefix("sqlite://")?;
        let file = rest.split('?').next().unwrap_or(rest);
        if file.is_empty() || file == ":memory:" {
            return None;
        }
        Some(PathBuf::from(file))
    }

    /// Effective configuration as TOML, with the API key masked
    pub fn to_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.catalog.api_key.is_some() {
            shown.catalog.api_key = Some("********".to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| CliError::Config(e.to_string()))
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/disco.db".to_string()
}

fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        api_key: None,
        base_url: default_base_url(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_base_url() -> String {
    CatalogConfig::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    CatalogConfig::DEFAULT_TIMEOUT_SECS
}

fn default_user() -> UserSettings {
    UserSettings {
        id: default_user_id(),
    }
}

fn default_user_id() -> UserId {
    1
}

impl Default for DiscoConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            catalog: default_catalog(),
            user: default_user(),
        }
    }
}
