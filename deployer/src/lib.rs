//! Deployer Helper Library
//!
//! Builds a deploy request from a [`config::DeployConfig`], posts it to the
//! deployment service and interprets the reply.

pub mod app;
pub mod cli;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod http;
pub mod logs;
pub mod storage;
pub mod utils;
