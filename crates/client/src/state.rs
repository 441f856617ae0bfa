use std::time::Duration;
use std::{fs, path::PathBuf};

use common::crypto::{KeyError, SymmetricKey, BUILTIN_KEY_HEX};
use serde::{Deserialize, Serialize};
use url::Url;

pub const APP_NAME: &str = "drop";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_REMOTE: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the file-drop server
    #[serde(default = "default_remote")]
    pub remote: Url,
    /// Pre-shared AES-256 key as 64 hex digits
    #[serde(default = "default_key_hex")]
    pub key_hex: String,
    /// Where downloads are saved (defaults to the working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
    /// Deadline for a single transfer, in seconds (0 disables it)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long a finished upload stays "complete" before going idle
    #[serde(default = "default_idle_grace_ms")]
    pub idle_grace_ms: u64,
}

fn default_remote() -> Url {
    Url::parse(DEFAULT_REMOTE).expect("hardcoded URL must parse")
}

fn default_key_hex() -> String {
    BUILTIN_KEY_HEX.to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_idle_grace_ms() -> u64 {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            key_hex: default_key_hex(),
            download_dir: None,
            timeout_secs: default_timeout_secs(),
            idle_grace_ms: default_idle_grace_ms(),
        }
    }
}

impl AppConfig {
    pub fn key(&self) -> Result<SymmetricKey, StateError> {
        Ok(SymmetricKey::from_hex(&self.key_hex)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn idle_grace(&self) -> Duration {
        Duration::from_millis(self.idle_grace_ms)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the config directory (~/.drop)
    pub drop_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the config directory path (custom or default ~/.drop)
    pub fn drop_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Write a fresh config directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let drop_dir = Self::drop_dir(custom_path)?;
        let config_path = drop_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        let config = config.unwrap_or_default();
        // catch a bad key now rather than on the first download
        config.key()?;

        fs::create_dir_all(&drop_dir)?;
        fs::write(&config_path, toml::to_string_pretty(&config)?)?;

        Ok(Self {
            drop_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the config directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let drop_dir = Self::drop_dir(custom_path)?;
        let config_path = drop_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            drop_dir,
            config_path,
            config,
        })
    }

    /// Load the config if one was written, otherwise fall back to defaults
    pub fn load_or_default(custom_path: Option<PathBuf>) -> Result<AppConfig, StateError> {
        match Self::load(custom_path) {
            Ok(state) => Ok(state.config),
            Err(StateError::NotInitialized) | Err(StateError::NoHomeDirectory) => {
                Ok(AppConfig::default())
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("drop directory not initialized. Run 'drop init' first")]
    NotInitialized,

    #[error("drop directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
