//! Settings file management
//!
//! A JSON file holding any subset of the deploy parameters. Values found in
//! the file are applied before command-line flags, so flags win.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::app::options::ClientOptions;
use crate::config::DeployConfig;
use crate::errors::DeployerError;
use crate::logs::LogLevel;

/// Deployer settings
///
/// Holds credentials in clear text, hence no `Debug` implementation.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: Option<LogLevel>,

    /// Log as JSON lines
    #[serde(default)]
    pub log_json: Option<bool>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Retry once on transport failures
    #[serde(default)]
    pub retry: Option<bool>,

    #[serde(default)]
    pub deploy_key: Option<String>,

    #[serde(default)]
    pub service: Option<String>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub repo: Option<String>,

    #[serde(default)]
    pub extra_vars: Option<String>,

    /// Container registry credentials
    #[serde(default)]
    pub registry: Option<RegistrySettings>,
}

/// Registry block of the settings file
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistrySettings {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub login: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub email: String,
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: &Path) -> Result<Self, DeployerError> {
        debug!("Reading settings from {}", path.display());
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            DeployerError::Config(format!("unable to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
            .map_err(|e| DeployerError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse settings from JSON text
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Copy every value present in the file onto `config`
    pub fn apply(&self, config: &mut DeployConfig) {
        if let Some(value) = &self.deploy_key {
            config.set_deploy_key(value.as_str());
        }
        if let Some(value) = &self.service {
            config.set_service(value.as_str());
        }
        if let Some(value) = &self.image {
            config.set_image(value.as_str());
        }
        if let Some(value) = &self.host {
            config.set_host(value.as_str());
        }
        if let Some(value) = &self.token {
            config.set_token(value.as_str());
        }
        if let Some(value) = &self.repo {
            config.set_repo(value.as_str());
        }
        if let Some(value) = &self.extra_vars {
            config.set_extra_vars(value.as_str());
        }
        if let Some(registry) = &self.registry {
            config.set_registry(
                registry.host.as_str(),
                registry.login.as_str(),
                registry.password.as_str(),
                registry.email.as_str(),
            );
        }
    }

    /// Copy client tuning values onto `options`
    pub fn apply_options(&self, options: &mut ClientOptions) {
        if let Some(secs) = self.timeout_secs {
            options.timeout = std::time::Duration::from_secs(secs);
        }
        if let Some(retry) = self.retry {
            options.retry.enabled = retry;
        }
    }
}
