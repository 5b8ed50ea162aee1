//! Drives one deploy run from configuration to verdict

use std::future::Future;

use deployer_api::models::DeployRequest;
use tracing::{debug, info, warn};

use crate::app::options::{ClientOptions, RetryOptions};
use crate::config::DeployConfig;
use crate::deploy::fsm::{DeployEvent, DeployFsm};
use crate::deploy::response;
use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::http::deploy::{DeployService, ServiceReply};
use crate::utils::calc_exp_backoff;

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    /// HTTP status returned by the service
    pub status: u16,

    /// Output text of the deployment, verbatim
    pub output: String,
}

/// Trigger a deployment on `https://<host>/deploy`
///
/// `cancel` aborts the run when it resolves first.
pub async fn deploy<C>(
    config: &DeployConfig,
    options: &ClientOptions,
    cancel: C,
) -> Result<DeployOutcome, DeployerError>
where
    C: Future<Output = ()>,
{
    let client = HttpClient::for_host(config.host(), options)?;
    deploy_with(&client, config, options, cancel).await
}

/// Same as [`deploy`] against any [`DeployService`]
pub async fn deploy_with<S, C>(
    service: &S,
    config: &DeployConfig,
    options: &ClientOptions,
    cancel: C,
) -> Result<DeployOutcome, DeployerError>
where
    S: DeployService + ?Sized,
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = cancel => {
            warn!("Deployment cancelled before the service answered");
            Err(DeployerError::Cancelled)
        }
        result = run(service, config, &options.retry) => result,
    }
}

async fn run<S>(
    service: &S,
    config: &DeployConfig,
    retry: &RetryOptions,
) -> Result<DeployOutcome, DeployerError>
where
    S: DeployService + ?Sized,
{
    let mut fsm = DeployFsm::new();

    match drive(service, config, retry, &mut fsm).await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            if let Err(transition) = fsm.process(DeployEvent::Fail(e.to_string())) {
                warn!("{}", transition);
            }
            debug!("Deploy run ended in {:?} after {} attempt(s)", fsm.state(), fsm.attempts());
            Err(e)
        }
    }
}

async fn drive<S>(
    service: &S,
    config: &DeployConfig,
    retry: &RetryOptions,
    fsm: &mut DeployFsm,
) -> Result<DeployOutcome, DeployerError>
where
    S: DeployService + ?Sized,
{
    info!("Host: {} {}", config.service(), config.host());

    let payload = config.to_payload();
    fsm.process(DeployEvent::BuildPayload)?;

    info!("Calling service: {}", service.endpoint());
    info!("With payload: {:?}", payload);

    let reply = send_with_retry(service, &payload, retry, fsm).await?;

    let status = reply.status.as_u16();
    response::check_status(status)?;
    let parsed = response::parse_reply(&reply.body)?;
    fsm.process(DeployEvent::ValidateResponse)?;

    response::check_output(&parsed)?;
    fsm.process(DeployEvent::Complete)?;

    info!("Deployment accepted with status {}", status);
    Ok(DeployOutcome {
        status,
        output: parsed.output,
    })
}

async fn send_with_retry<S>(
    service: &S,
    payload: &DeployRequest,
    retry: &RetryOptions,
    fsm: &mut DeployFsm,
) -> Result<ServiceReply, DeployerError>
where
    S: DeployService + ?Sized,
{
    let allowed = retry.allowed_retries();
    let mut attempt = 0;

    loop {
        fsm.process(DeployEvent::SendRequest)?;
        match service.send(payload).await {
            Ok(reply) => return Ok(reply),
            Err(e) if e.is_retryable() && attempt < allowed => {
                let delay = calc_exp_backoff(&retry.cooldown, attempt);
                warn!("Attempt {} failed: {}. Retrying in {:?}", attempt + 1, e, delay);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
