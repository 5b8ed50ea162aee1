//! Interpretation of the service reply

use std::ops::RangeInclusive;

use deployer_api::models::DeployResponse;

use crate::errors::DeployerError;

/// Status codes treated as a delivered request.
///
/// 400 is inside the range on purpose; the service has always been called
/// with this boundary.
pub const ACCEPTED_STATUS: RangeInclusive<u16> = 200..=400;

/// Marker the service puts in `output` when the deployment itself failed
pub const ERROR_SENTINEL: &str = "Error:";

/// Reject status codes outside [`ACCEPTED_STATUS`]
pub fn check_status(status: u16) -> Result<(), DeployerError> {
    if ACCEPTED_STATUS.contains(&status) {
        Ok(())
    } else {
        Err(DeployerError::Status(status))
    }
}

/// Parse the reply body
///
/// Only the first JSON value is read; anything after it is ignored. A bare
/// `null` reads as an empty output. An empty body is an error.
pub fn parse_reply(body: &str) -> Result<DeployResponse, DeployerError> {
    let mut values =
        serde_json::Deserializer::from_str(body).into_iter::<Option<DeployResponse>>();
    match values.next() {
        Some(value) => Ok(value?.unwrap_or_default()),
        None => Err(DeployerError::ResponseParse("empty body".to_string())),
    }
}

/// Fail when the service signals a failed deployment in its output
pub fn check_output(response: &DeployResponse) -> Result<(), DeployerError> {
    if response.output.contains(ERROR_SENTINEL) {
        return Err(DeployerError::ServiceReported {
            output: response.output.clone(),
        });
    }
    Ok(())
}
