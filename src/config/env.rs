//! Environment variable configuration provider.
//!
//! Dotted keys become upper snake case behind a prefix:
//! `repl.max_code_rounds` is read from `DEEPAGENT_REPL_MAX_CODE_ROUNDS`.

use super::provider::ConfigProvider;
use super::{ConfigError, ConfigResult};

pub const DEFAULT_ENV_PREFIX: &str = "DEEPAGENT_";

#[derive(Debug, Clone)]
pub struct EnvConfigProvider {
    prefix: String,
}

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self::prefixed(DEFAULT_ENV_PREFIX)
    }

    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn variable_for(&self, key: &str) -> String {
        let suffix: String = key
            .chars()
            .map(|c| match c {
                '.' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        format!("{}{}", self.prefix, suffix)
    }
}

impl Default for EnvConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ConfigProvider for EnvConfigProvider {
    fn name(&self) -> &str {
        "env"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        let variable = self.variable_for(key);
        match std::env::var(&variable) {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(ConfigError::Env(e)),
        }
    }
}
