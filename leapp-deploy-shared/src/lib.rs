//! Leapp deploy shared code
//!
//! Error taxonomy and constants used by both the deployment library and the
//! operator CLI.

pub mod constants;
pub mod errors;

pub use errors::{DeployError, DeployResult};
