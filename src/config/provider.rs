//! Configuration Provider Trait

use serde::de::DeserializeOwned;

use super::{ConfigError, ConfigResult};

/// A read-only source of configuration values addressed by dotted keys
/// such as `repl.max_code_rounds`.
#[async_trait::async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Get a raw configuration value
    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>>;
}

/// Extension methods for typed configuration access
pub trait ConfigProviderExt: ConfigProvider {
    /// Get a typed configuration value.
    ///
    /// Raw values are decoded as JSON; a value that is not valid JSON is
    /// taken as a bare string, so `DEEPAGENT_MODEL_NAME=claude-x` works
    /// without quoting.
    fn get<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = ConfigResult<Option<T>>> + Send
    where
        Self: Sync,
    {
        async move {
            match self.get_raw(key).await? {
                Some(raw) => decode(key, raw).map(Some),
                None => Ok(None),
            }
        }
    }
}

impl<P: ConfigProvider + ?Sized> ConfigProviderExt for P {}

pub(crate) fn decode<T: DeserializeOwned>(key: &str, raw: String) -> ConfigResult<T> {
    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_json::from_value(serde_json::Value::String(raw))
            .map_err(|_| ConfigError::invalid(key, json_err.to_string())),
    }
}
