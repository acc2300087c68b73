//! Progress callback trait for interface-agnostic updates
//!
//! This trait allows different interfaces (CLI, services embedding the
//! library) to receive progress updates while a snapshot is published.

use crate::types::PullRequest;
use async_trait::async_trait;
use std::fmt;

/// Publish phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fetching the base and PR branches
    Preparing,
    /// Replaying the warm chain onto a moved base
    Rebasing,
    /// Building the commit
    Committing,
    /// Pushing the branch
    Pushing,
    /// Finding or creating the pull request
    ReconcilingPr,
    /// Publish complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preparing => "Preparing",
            Self::Rebasing => "Rebasing",
            Self::Committing => "Committing",
            Self::Pushing => "Pushing",
            Self::ReconcilingPr => "Reconciling pull request",
            Self::Complete => "Done",
        };
        f.write_str(name)
    }
}

/// Push operation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Push started
    Started,
    /// Fast-forward push succeeded
    Success,
    /// History was rewritten and force-pushed
    Forced,
    /// Dry run, nothing pushed
    Skipped,
    /// Push failed with error message
    Failed(String),
}

impl fmt::Display for PushStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("pushing"),
            Self::Success => f.write_str("pushed"),
            Self::Forced => f.write_str("force-pushed"),
            Self::Skipped => f.write_str("skipped (dry run)"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates while publishing.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called when the branch is being pushed
    async fn on_push(&self, branch: &str, status: PushStatus);

    /// Called when a PR is created
    async fn on_pr_created(&self, branch: &str, pr: &PullRequest, url: &str);

    /// Called when an open PR already tracks the branch
    async fn on_pr_found(&self, branch: &str, pr: &PullRequest, url: &str);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_push(&self, _branch: &str, _status: PushStatus) {}
    async fn on_pr_created(&self, _branch: &str, _pr: &PullRequest, _url: &str) {}
    async fn on_pr_found(&self, _branch: &str, _pr: &PullRequest, _url: &str) {}
    async fn on_message(&self, _message: &str) {}
}
