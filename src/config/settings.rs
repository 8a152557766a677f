//! Runtime settings resolved from layered providers.

use std::path::Path;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::provider::{ConfigProvider, ConfigProviderExt};
use super::{ConfigError, ConfigResult, EnvConfigProvider, FileConfigProvider};
use crate::client::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::repl::{DEFAULT_FENCE_TAG, tag_problem};
use crate::sandbox::DEFAULT_SANDBOX_TIMEOUT;

pub const DEFAULT_MAX_STEPS: usize = 25;
pub const DEFAULT_PYTHON: &str = "python3";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct Settings {
    /// `model.name`
    pub model: String,
    /// `model.max_tokens`
    pub max_tokens: u32,
    /// `model.base_url`
    pub base_url: String,
    /// `model.api_key`; falls back to `ANTHROPIC_API_KEY` when absent
    pub api_key: Option<SecretString>,
    /// `model.timeout_secs`
    pub request_timeout: Duration,
    /// `repl.fence`
    pub fence_tag: String,
    /// `repl.max_code_rounds`; unset means the REPL loops until the model stops writing code
    pub max_code_rounds: Option<usize>,
    /// `sandbox.python`
    pub python: String,
    /// `sandbox.timeout_secs`
    pub sandbox_timeout: Duration,
    /// `agent.max_steps`
    pub max_steps: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            fence_tag: DEFAULT_FENCE_TAG.into(),
            max_code_rounds: None,
            python: DEFAULT_PYTHON.into(),
            sandbox_timeout: DEFAULT_SANDBOX_TIMEOUT,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl PartialEq for Settings {
    fn eq(&self, other: &Self) -> bool {
        let same_key = match (&self.api_key, &other.api_key) {
            (Some(a), Some(b)) => a.expose_secret() == b.expose_secret(),
            (None, None) => true,
            _ => false,
        };
        same_key
            && self.model == other.model
            && self.max_tokens == other.max_tokens
            && self.base_url == other.base_url
            && self.request_timeout == other.request_timeout
            && self.fence_tag == other.fence_tag
            && self.max_code_rounds == other.max_code_rounds
            && self.python == other.python
            && self.sandbox_timeout == other.sandbox_timeout
            && self.max_steps == other.max_steps
    }
}

impl Settings {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("model.name", "must not be empty"));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("model.max_tokens", "must be positive"));
        }
        if let Some(problem) = tag_problem(&self.fence_tag) {
            return Err(ConfigError::invalid("repl.fence", problem));
        }
        if self.max_code_rounds == Some(0) {
            return Err(ConfigError::invalid("repl.max_code_rounds", "must be positive"));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::invalid("agent.max_steps", "must be positive"));
        }
        if self.request_timeout.is_zero() || self.sandbox_timeout.is_zero() {
            return Err(ConfigError::invalid("timeout_secs", "must be positive"));
        }
        Ok(())
    }
}

/// Resolves [`Settings`] from providers. Providers added later take precedence.
#[derive(Default)]
pub struct SettingsLoader {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON file, then `DEEPAGENT_*` environment variables.
    pub fn standard(path: impl AsRef<Path>) -> Self {
        Self::new().file(path).env()
    }

    pub fn env(self) -> Self {
        self.provider(Box::new(EnvConfigProvider::new()))
    }

    pub fn file(self, path: impl AsRef<Path>) -> Self {
        self.provider(Box::new(FileConfigProvider::new(path.as_ref())))
    }

    pub fn provider(mut self, provider: Box<dyn ConfigProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    async fn lookup<T: DeserializeOwned + Send>(&self, key: &str) -> ConfigResult<Option<T>> {
        for provider in self.providers.iter().rev() {
            if let Some(value) = provider.get::<T>(key).await? {
                debug!(key, provider = provider.name(), "Resolved setting");
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    pub async fn load(&self) -> ConfigResult<Settings> {
        let mut settings = Settings::default();

        if let Some(v) = self.lookup("model.name").await? {
            settings.model = v;
        }
        if let Some(v) = self.lookup("model.max_tokens").await? {
            settings.max_tokens = v;
        }
        if let Some(v) = self.lookup::<String>("model.base_url").await? {
            settings.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = self.lookup::<String>("model.api_key").await? {
            settings.api_key = Some(SecretString::from(v));
        }
        if let Some(secs) = self.lookup::<u64>("model.timeout_secs").await? {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = self.lookup("repl.fence").await? {
            settings.fence_tag = v;
        }
        if let Some(v) = self.lookup("repl.max_code_rounds").await? {
            settings.max_code_rounds = Some(v);
        }
        if let Some(v) = self.lookup("sandbox.python").await? {
            settings.python = v;
        }
        if let Some(secs) = self.lookup::<u64>("sandbox.timeout_secs").await? {
            settings.sandbox_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = self.lookup("agent.max_steps").await? {
            settings.max_steps = v;
        }

        settings.validate()?;
        Ok(settings)
    }
}
