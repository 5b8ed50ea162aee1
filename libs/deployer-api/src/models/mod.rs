//! API models

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder printed in place of credential values
pub const REDACTED: &str = "[REDACTED]";

/// Deploy request sent to `POST /deploy`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub git_url: String,
    pub deploy_key: String,
    pub registry: String,
    pub registry_login: String,
    pub registry_password: String,
    pub registry_email: String,
    pub image_name: String,
    pub image_version: String,
    pub webhook_token: String,
    pub extra_vars: String,
}

fn redact(value: &str) -> &str {
    if value.is_empty() {
        value
    } else {
        REDACTED
    }
}

// Credentials must never reach logs, so Debug is written by hand.
impl fmt::Debug for DeployRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployRequest")
            .field("git_url", &self.git_url)
            .field("deploy_key", &redact(&self.deploy_key))
            .field("registry", &self.registry)
            .field("registry_login", &self.registry_login)
            .field("registry_password", &redact(&self.registry_password))
            .field("registry_email", &self.registry_email)
            .field("image_name", &self.image_name)
            .field("image_version", &self.image_version)
            .field("webhook_token", &redact(&self.webhook_token))
            .field("extra_vars", &self.extra_vars)
            .finish()
    }
}

/// Deploy response returned by the service
///
/// A missing or `null` output reads as empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployResponse {
    /// Free-form text produced by the deployment run
    #[serde(default, alias = "Output", deserialize_with = "null_as_empty")]
    pub output: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
