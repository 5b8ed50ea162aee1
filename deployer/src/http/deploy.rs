//! Deploy webhook API

use async_trait::async_trait;
use deployer_api::models::DeployRequest;
use http::StatusCode;

use crate::errors::DeployerError;
use crate::http::client::HttpClient;

/// Raw answer of the deployment service
#[derive(Debug, Clone)]
pub struct ServiceReply {
    pub status: StatusCode,
    pub body: String,
}

/// Something that can deliver a deploy request
///
/// [`HttpClient`] is the real implementation; tests substitute their own.
#[async_trait]
pub trait DeployService: Send + Sync {
    /// Where requests go, for diagnostics
    fn endpoint(&self) -> String;

    /// Deliver one request and return the raw reply
    async fn send(&self, payload: &DeployRequest) -> Result<ServiceReply, DeployerError>;
}

#[async_trait]
impl DeployService for HttpClient {
    fn endpoint(&self) -> String {
        self.deploy_url().to_string()
    }

    async fn send(&self, payload: &DeployRequest) -> Result<ServiceReply, DeployerError> {
        self.post_deploy(payload).await
    }
}
