//! CLI commands
//!
//! Command implementations for the `lander` binary.

mod auth;
mod progress;
mod publish;
mod status;
mod style;

pub use auth::{run_auth_setup, run_auth_test};
pub use publish::{PublishRequest, run_publish};
pub use status::run_status;
