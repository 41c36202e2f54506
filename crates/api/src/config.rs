//! Server configuration

use anyhow::Result;
use serde::Deserialize;

/// Server configuration, layered from `BERRY_*` environment variables over
/// the defaults below.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Model artifact to serve
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,

    /// Optional JSON file overriding the built-in recommendation text
    #[serde(default)]
    pub recommendations_path: Option<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_artifact_path() -> String {
    "models/berry_forest.json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            artifact_path: default_artifact_path(),
            recommendations_path: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("BERRY"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}
