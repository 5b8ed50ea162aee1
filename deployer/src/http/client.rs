//! HTTP client implementation

use deployer_api::models::DeployRequest;
use reqwest::{header, Client};
use tracing::debug;
use url::Url;

use crate::app::options::ClientOptions;
use crate::errors::DeployerError;
use crate::http::deploy::ServiceReply;
use crate::utils::user_agent;

/// Path of the deploy webhook on the service
pub const DEPLOY_PATH: &str = "/deploy";

/// HTTP client for the deployment service
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    deploy_url: Url,
}

impl HttpClient {
    /// Create a client for `https://<host>`
    pub fn for_host(host: &str, options: &ClientOptions) -> Result<Self, DeployerError> {
        if host.trim().is_empty() {
            return Err(DeployerError::InvalidUrl {
                url: format!("https://{}{}", host, DEPLOY_PATH),
                reason: "empty host".to_string(),
            });
        }
        Self::new(&format!("https://{}", host), options)
    }

    /// Create a client for an explicit base URL
    pub fn new(base_url: &str, options: &ClientOptions) -> Result<Self, DeployerError> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), DEPLOY_PATH);
        let deploy_url = Url::parse(&raw).map_err(|e| DeployerError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if deploy_url.host_str().map_or(true, str::is_empty) {
            return Err(DeployerError::InvalidUrl {
                url: raw,
                reason: "empty host".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(user_agent())
            .build()
            .map_err(|e| DeployerError::RequestBuild(e.to_string()))?;

        Ok(Self { client, deploy_url })
    }

    /// Full URL of the deploy webhook
    pub fn deploy_url(&self) -> &Url {
        &self.deploy_url
    }

    /// POST the payload to the deploy webhook
    ///
    /// Returns whatever the service answered; interpreting the status and
    /// body is left to the caller. The body is read exactly once here.
    pub async fn post_deploy(&self, payload: &DeployRequest) -> Result<ServiceReply, DeployerError> {
        debug!("POST {}", self.deploy_url);

        let body =
            serde_json::to_vec(payload).map_err(|e| DeployerError::RequestBuild(e.to_string()))?;

        let response = self
            .client
            .post(self.deploy_url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeployerError::ResponseParse(format!("unable to read body: {}", e)))?;
        debug!("Service answered {} with {} bytes", status, body.len());

        Ok(ServiceReply { status, body })
    }
}
