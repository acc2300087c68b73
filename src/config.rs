//! Destination configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Default GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Label carrying integrate references in origin change messages
pub const DEFAULT_INTEGRATE_LABEL: &str = "COPYBARA_INTEGRATE_REVIEW";

/// Parameters of a pull-request destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DestinationConfig {
    /// Hosting URL of the destination repository
    pub url: String,
    /// Base branch the PR targets (`master` when absent)
    pub destination_ref: Option<String>,
    /// Explicit PR branch, bypassing context-reference derivation
    pub pr_branch: Option<String>,
    /// Fixed PR title
    pub title: Option<String>,
    /// Fixed PR body
    pub body: Option<String>,
    /// Whether to look up / create a pull request after pushing
    pub create_pull_request: bool,
    /// Integration directives
    pub integrates: Vec<Integrate>,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            destination_ref: None,
            pr_branch: None,
            title: None,
            body: None,
            create_pull_request: true,
            integrates: Integrate::defaults(),
        }
    }
}

impl DestinationConfig {
    /// Config with only the URL set
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// How an integrate directive incorporates the referenced change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrateStrategy {
    /// Record a merge commit but keep the destination files
    FakeMerge,
    /// Record a merge commit and include files outside the destination glob
    FakeMergeAndIncludeFiles,
    /// Real merge including files
    IncludeFiles,
}

/// Directive to integrate a change referenced by a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integrate {
    /// Label whose value references the change to integrate
    pub label: String,
    /// Integration strategy
    pub strategy: IntegrateStrategy,
    /// Keep going if the integration fails
    pub ignore_errors: bool,
}

impl Integrate {
    /// System-wide default directive set
    pub fn defaults() -> Vec<Self> {
        vec![Self {
            label: DEFAULT_INTEGRATE_LABEL.to_string(),
            strategy: IntegrateStrategy::FakeMergeAndIncludeFiles,
            ignore_errors: true,
        }]
    }
}

/// Options for the local git plumbing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOptions {
    /// Committer name for published commits
    pub committer_name: String,
    /// Committer email for published commits
    pub committer_email: String,
    /// Fetch from and push to this URL instead of the hosting URL
    pub remote_url: Option<String>,
    /// Allow publishing when the base branch does not exist yet
    pub first_commit: bool,
}

impl Default for GitOptions {
    fn default() -> Self {
        Self {
            committer_name: "pr-lander".to_string(),
            committer_email: "pr-lander@localhost".to_string(),
            remote_url: None,
            first_commit: false,
        }
    }
}

/// Options for the GitHub REST client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubOptions {
    /// REST API base URL
    pub api_url: String,
    /// API token; looked up from the environment when absent
    pub token: Option<String>,
}

impl Default for GitHubOptions {
    fn default() -> Self {
        Self {
            api_url: env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token: None,
        }
    }
}
