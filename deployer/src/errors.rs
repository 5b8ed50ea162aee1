//! Error types for the deployer helper

use thiserror::Error;

/// Main error type for the deployer helper
///
/// One variant per failure class of a deploy run. Each class maps to its own
/// process exit code through [`DeployerError::exit_code`].
#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid service URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Error creating request: {0}")]
    RequestBuild(String),

    #[error("Error calling service: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Status {0}: NOT OK")]
    Status(u16),

    #[error("Unable to parse JSON response from service: {0}")]
    ResponseParse(String),

    #[error("Service reported a failed deployment")]
    ServiceReported { output: String },

    #[error("Deployment cancelled")]
    Cancelled,

    #[error("Invalid transition: {0}")]
    Transition(String),
}

impl DeployerError {
    /// Process exit code for this failure class
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployerError::Config(_) => 1,
            DeployerError::InvalidUrl { .. } => 2,
            DeployerError::RequestBuild(_) => 3,
            DeployerError::Transport(_) => 4,
            DeployerError::Status(_) => 5,
            DeployerError::ResponseParse(_) => 6,
            DeployerError::ServiceReported { .. } => 7,
            DeployerError::Transition(_) => 70,
            DeployerError::Cancelled => 130,
        }
    }

    /// Output text returned by the service, if the call got that far
    pub fn service_output(&self) -> Option<&str> {
        match self {
            DeployerError::ServiceReported { output } => Some(output),
            _ => None,
        }
    }

    /// Whether a new attempt could succeed where this one failed
    pub fn is_retryable(&self) -> bool {
        matches!(self, DeployerError::Transport(_))
    }
}

impl From<reqwest::Error> for DeployerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            DeployerError::RequestBuild(err.to_string())
        } else {
            DeployerError::Transport(err)
        }
    }
}

impl From<serde_json::Error> for DeployerError {
    fn from(err: serde_json::Error) -> Self {
        DeployerError::ResponseParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            DeployerError::Config("x".to_string()),
            DeployerError::InvalidUrl {
                url: "https:///deploy".to_string(),
                reason: "empty host".to_string(),
            },
            DeployerError::RequestBuild("x".to_string()),
            DeployerError::Status(500),
            DeployerError::ResponseParse("x".to_string()),
            DeployerError::ServiceReported {
                output: "Error: boom".to_string(),
            },
            DeployerError::Cancelled,
        ];

        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|code| *code != 0));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_service_output_only_for_reported_failures() {
        let reported = DeployerError::ServiceReported {
            output: "Error: image not found".to_string(),
        };
        assert_eq!(reported.service_output(), Some("Error: image not found"));
        assert_eq!(DeployerError::Status(502).service_output(), None);
    }

    #[test]
    fn test_status_message() {
        assert_eq!(DeployerError::Status(401).to_string(), "Status 401: NOT OK");
    }
}
