//! Hosting platform services
//!
//! Provides the pull-request operations the publisher needs from GitHub.

mod detection;
mod factory;
mod github;

pub use detection::parse_repo_info;
pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{CreatePullRequest, PullRequest};
use async_trait::async_trait;

/// Platform service trait for PR operations
///
/// Abstracts the hosting API so the writer can be driven against a mock.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Find an open PR with the given head and base branches
    async fn find_existing_pr(&self, head: &str, base: &str) -> Result<Option<PullRequest>>;

    /// Create a new PR
    async fn create_pr(&self, request: &CreatePullRequest) -> Result<PullRequest>;

    /// Project (`owner/repo`) this service talks to
    fn project(&self) -> &str;
}
