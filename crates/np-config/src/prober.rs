//! Top-level prober configuration file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::module::Module;
use crate::siteacc::SiteAccountsConfig;
use crate::validate::ValidationError;

/// Contents of `prober.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProberConfig {
    #[serde(default)]
    pub modules: BTreeMap<String, Module>,

    #[serde(default)]
    pub site_accounts: Option<SiteAccountsConfig>,
}

impl ProberConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ValidationError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| ValidationError::ParseError(format!("Invalid YAML: {}", e)))
    }

    /// Look up a module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Module names in sorted order.
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }
}
