//! JSON file configuration provider.
//!
//! Dotted keys walk nested objects: `repl.fence` reads
//! `{"repl": {"fence": "..."}}`. A flat `{"repl.fence": "..."}` entry is
//! also accepted. A missing file is an empty configuration.

use std::path::PathBuf;

use tokio::sync::OnceCell;

use super::ConfigResult;
use super::provider::ConfigProvider;

pub struct FileConfigProvider {
    path: PathBuf,
    data: OnceCell<serde_json::Value>,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn load(&self) -> ConfigResult<serde_json::Value> {
        if !tokio::fs::try_exists(&self.path).await? {
            tracing::debug!(path = %self.path.display(), "Config file not found, using defaults");
            return Ok(serde_json::Value::Object(Default::default()));
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    fn lookup<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if let Some(flat) = root.get(key) {
            return Some(flat);
        }
        key.split('.').try_fold(root, |node, part| node.get(part))
    }
}

#[async_trait::async_trait]
impl ConfigProvider for FileConfigProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        let root = self.data.get_or_try_init(|| self.load()).await?;
        Ok(match Self::lookup(root, key) {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        })
    }
}
