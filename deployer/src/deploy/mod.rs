//! Deploy run: state machine, orchestration and reply handling

pub mod fsm;
pub mod orchestrator;
pub mod response;

pub use orchestrator::{deploy, deploy_with, DeployOutcome};
