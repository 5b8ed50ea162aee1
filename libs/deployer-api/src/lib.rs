//! Wire models exchanged with the deployment service.

pub mod models;
