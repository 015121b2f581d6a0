//! Infrastructure implementation of the `ConfigStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{ProvisionConfig, validate_config};

/// Loads the plan from an optional YAML file.
///
/// Without a path the built-in defaults are used. A path that was given
/// explicitly must exist.
#[derive(Debug, Default, Clone)]
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ProvisionConfig> {
        let config: ProvisionConfig = match &self.path {
            None => ProvisionConfig::default(),
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                serde_yaml::from_str(&content)
                    .with_context(|| format!("cannot parse {}", path.display()))?
            }
        };
        validate_config(&config)?;
        tracing::debug!(?config, "loaded provisioning plan");
        Ok(config)
    }
}
