//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

impl ConnectionConfig {
    /// Build a connection URL for the external diff tool.
    pub fn connection_string(&self) -> String {
        format!(
            "snowflake://{}:{}@{}/{}/{}?warehouse={}&role={}",
            self.user,
            self.password,
            self.account,
            self.database,
            self.schema,
            self.warehouse,
            self.role
        )
    }

    /// Schema-qualified name for a table in this environment.
    pub fn qualified_table(&self, table: &str) -> String {
        format!("{}.{}", self.schema, table)
    }
}
