//! pr-lander - land transformed snapshots as pull-request branches
//!
//! Takes a snapshot of transformed source plus the origin revision that
//! produced it, commits it to a branch of a GitHub repository and makes sure
//! exactly one pull request tracks that branch. Repeated invocations resume,
//! append to or restart the publication using the identity label trailer
//! embedded in every published commit.

pub mod auth;
pub mod branch;
pub mod config;
pub mod error;
pub mod glob;
pub mod label;
pub mod platform;
pub mod publish;
pub mod repo;
pub mod types;
