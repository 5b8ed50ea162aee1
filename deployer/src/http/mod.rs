//! Client side of the deployment service API

pub mod client;
pub mod deploy;
