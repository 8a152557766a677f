//! Layered configuration.
//!
//! ```rust,no_run
//! use deepagent::config::SettingsLoader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SettingsLoader::new()
//!     .file("deepagent.json")
//!     .env()
//!     .load()
//!     .await?;
//! println!("model: {}", settings.model);
//! # Ok(())
//! # }
//! ```

pub mod env;
pub mod file;
pub mod memory;
pub mod provider;
pub mod settings;

pub use env::EnvConfigProvider;
pub use file::FileConfigProvider;
pub use memory::MemoryConfigProvider;
pub use provider::{ConfigProvider, ConfigProviderExt};
pub use settings::{DEFAULT_MAX_STEPS, DEFAULT_PYTHON, Settings, SettingsLoader};

use thiserror::Error;

/// Failure to read or validate settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Malformed config: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
