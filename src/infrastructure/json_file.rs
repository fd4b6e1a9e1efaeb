use crate::domain::ports::RuleConfigStore;
use crate::domain::rule::RuleConfig;
use crate::error::{PricingError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Loads a rule configuration from a JSON file on every call.
#[derive(Debug, Clone)]
pub struct JsonFileRuleConfigStore {
    path: PathBuf,
}

impl JsonFileRuleConfigStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl RuleConfigStore for JsonFileRuleConfigStore {
    async fn load(&self) -> Result<RuleConfig> {
        let bytes = tokio::fs::read(&self.path).await?;
        let config: RuleConfig = serde_json::from_slice(&bytes).map_err(|e| {
            PricingError::ConfigError(format!("{}: {e}", self.path.display()))
        })?;
        tracing::info!(
            path = %self.path.display(),
            rules = config.nodes().count(),
            actions = config.actions.len(),
            "rule configuration loaded"
        );
        Ok(config)
    }
}
