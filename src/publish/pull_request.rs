//! Pull request find-or-create

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{CreatePullRequest, PullRequest};
use tracing::{debug, info};

/// Result of PR reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrOutcome {
    /// An open PR already tracked the branch
    Existing(PullRequest),
    /// A new PR was created
    Created(PullRequest),
}

impl PrOutcome {
    /// The PR either way
    pub const fn pull_request(&self) -> &PullRequest {
        match self {
            Self::Existing(pr) | Self::Created(pr) => pr,
        }
    }
}

/// Default PR title: first non-blank line of the change summary
pub fn pr_title(summary: &str) -> String {
    summary
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Default PR body: the change summary without leading blank lines
pub fn pr_body(summary: &str) -> String {
    let mut rest = summary;
    while let Some((line, tail)) = rest.split_once('\n') {
        if !line.trim().is_empty() {
            break;
        }
        rest = tail;
    }
    rest.to_string()
}

/// Web URL of a PR
pub fn pr_url(web_url: &str, number: u64) -> String {
    format!("{web_url}/pull/{number}")
}

/// Find an open PR for `head` into `base`, or create one
///
/// Existence is always checked first so repeated publishes never open a
/// second PR for the same branch.
pub async fn find_or_create(
    platform: &dyn PlatformService,
    head: &str,
    base: &str,
    title: &str,
    body: &str,
) -> Result<PrOutcome> {
    if let Some(pr) = platform.find_existing_pr(head, base).await? {
        debug!("Found open PR #{} for '{head}'", pr.number);
        return Ok(PrOutcome::Existing(pr));
    }

    let request = CreatePullRequest {
        base: base.to_string(),
        body: body.to_string(),
        head: head.to_string(),
        title: title.to_string(),
    };
    let pr = platform.create_pr(&request).await?;
    info!("Created PR #{} in {} for '{head}'", pr.number, platform.project());
    Ok(PrOutcome::Created(pr))
}
