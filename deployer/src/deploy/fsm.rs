//! Finite State Machine for a deploy run

use serde::{Deserialize, Serialize};

use crate::errors::DeployerError;

/// Deploy run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployState {
    /// Nothing done yet
    Idle,

    /// Request payload assembled from the configuration
    PayloadBuilt,

    /// Request handed to the transport
    RequestSent,

    /// Status accepted and body parsed
    ResponseValidated,

    /// Service reported a successful deployment
    Success,

    /// Run failed
    Fatal,
}

impl DeployState {
    /// Terminal states accept no further events
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeployState::Success | DeployState::Fatal)
    }
}

/// Deploy run event
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// Payload built
    BuildPayload,

    /// Request (re)sent
    SendRequest,

    /// Reply passed status and parse checks
    ValidateResponse,

    /// Output carried no error sentinel
    Complete,

    /// Any failure
    Fail(String),
}

/// Deploy run FSM
#[derive(Debug, Clone)]
pub struct DeployFsm {
    state: DeployState,
    error: Option<String>,
    attempts: u32,
}

impl DeployFsm {
    /// Create a new FSM in idle state
    pub fn new() -> Self {
        Self {
            state: DeployState::Idle,
            error: None,
            attempts: 0,
        }
    }

    /// Get current state
    pub fn state(&self) -> DeployState {
        self.state
    }

    /// Get error message if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of times the request was sent
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: DeployEvent) -> Result<(), DeployerError> {
        let new_state = match (self.state, &event) {
            (DeployState::Idle, DeployEvent::BuildPayload) => DeployState::PayloadBuilt,

            (DeployState::PayloadBuilt, DeployEvent::SendRequest)
            | (DeployState::RequestSent, DeployEvent::SendRequest) => {
                self.attempts += 1;
                DeployState::RequestSent
            }

            (DeployState::RequestSent, DeployEvent::ValidateResponse) => {
                DeployState::ResponseValidated
            }

            (DeployState::ResponseValidated, DeployEvent::Complete) => DeployState::Success,

            (state, DeployEvent::Fail(err)) if !state.is_terminal() => {
                self.error = Some(err.clone());
                DeployState::Fatal
            }

            (state, event) => {
                return Err(DeployerError::Transition(format!(
                    "{:?} -> {:?}",
                    state, event
                )));
            }
        };

        self.state = new_state;
        Ok(())
    }
}

impl Default for DeployFsm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fsm_transitions() {
        let mut fsm = DeployFsm::new();
        assert_eq!(fsm.state(), DeployState::Idle);

        fsm.process(DeployEvent::BuildPayload).unwrap();
        assert_eq!(fsm.state(), DeployState::PayloadBuilt);

        fsm.process(DeployEvent::SendRequest).unwrap();
        assert_eq!(fsm.state(), DeployState::RequestSent);

        fsm.process(DeployEvent::ValidateResponse).unwrap();
        assert_eq!(fsm.state(), DeployState::ResponseValidated);

        fsm.process(DeployEvent::Complete).unwrap();
        assert_eq!(fsm.state(), DeployState::Success);
        assert_eq!(fsm.attempts(), 1);
    }

    #[test]
    fn test_fsm_error_handling() {
        let mut fsm = DeployFsm::new();

        fsm.process(DeployEvent::BuildPayload).unwrap();
        fsm.process(DeployEvent::SendRequest).unwrap();
        fsm.process(DeployEvent::Fail("Status 500: NOT OK".to_string()))
            .unwrap();

        assert_eq!(fsm.state(), DeployState::Fatal);
        assert_eq!(fsm.error(), Some("Status 500: NOT OK"));
    }
}
