//! Validated pull-request destination

use crate::branch::{branch_from_context_reference, resolve_base, resolve_branch};
use crate::config::{DestinationConfig, GitOptions, Integrate};
use crate::error::{Error, Result};
use crate::platform::{PlatformService, parse_repo_info};
use crate::publish::writer::{PrWriter, WriterSetup};
use crate::publish::state::{Continuity, WriterContext};
use crate::repo::{GitBackend, RemoteRepo};
use crate::types::{PlatformConfig, Revision};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Summary of a destination for display and logging
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DestinationDescription {
    /// Destination kind
    #[serde(rename = "type")]
    pub kind: String,
    /// Normalized web URL
    pub url: String,
    /// Base branch
    pub destination_ref: String,
    /// Explicit PR branch, if configured
    pub pr_branch: Option<String>,
    /// Labels of the integrate directives
    pub integrates: Vec<String>,
}

/// A GitHub pull-request destination
///
/// Construction validates the configuration; no remote is touched until a
/// writer publishes.
#[derive(Debug, Clone)]
pub struct PrDestination {
    config: DestinationConfig,
    git_options: GitOptions,
    platform: PlatformConfig,
}

impl PrDestination {
    /// Validate a configuration
    pub fn new(config: DestinationConfig, git_options: GitOptions) -> Result<Self> {
        let platform = parse_repo_info(&config.url)?;
        Ok(Self {
            config,
            git_options,
            platform,
        })
    }

    /// Project name (`owner/repo`)
    pub fn project_name(&self) -> &str {
        &self.platform.project
    }

    /// Host and project
    pub const fn platform_config(&self) -> &PlatformConfig {
        &self.platform
    }

    /// Destination configuration
    pub const fn config(&self) -> &DestinationConfig {
        &self.config
    }

    /// Integrate directives
    pub fn integrates(&self) -> &[Integrate] {
        &self.config.integrates
    }

    /// Normalized `https://` URL of the project
    pub fn web_url(&self) -> String {
        self.platform.web_url()
    }

    /// URL the branch is fetched from and pushed to
    pub fn fetch_url(&self) -> String {
        self.git_options
            .remote_url
            .clone()
            .unwrap_or_else(|| self.web_url())
    }

    /// Base branch PRs target
    pub fn base_branch(&self) -> String {
        resolve_base(self.config.destination_ref.as_deref())
    }

    /// Branch a revision's context reference maps to
    pub fn branch_from_context_reference(
        &self,
        revision: &dyn Revision,
        workflow_name: &str,
        workflow_identity_user: &str,
    ) -> Result<String> {
        let reference = revision.context_reference().ok_or_else(|| {
            Error::Validation(format!(
                "revision '{}' has no context reference",
                revision.id()
            ))
        })?;
        Ok(branch_from_context_reference(
            reference,
            workflow_name,
            workflow_identity_user,
        ))
    }

    /// Describe the destination
    pub fn describe(&self) -> DestinationDescription {
        DestinationDescription {
            kind: "github_pr_destination".to_string(),
            url: self.web_url(),
            destination_ref: self.base_branch(),
            pr_branch: self.config.pr_branch.clone(),
            integrates: self
                .config
                .integrates
                .iter()
                .map(|i| i.label.clone())
                .collect(),
        }
    }

    /// Create a writer for one publish run
    ///
    /// Branch resolution happens first, so a missing context reference fails
    /// before a worktree is created.
    pub async fn new_writer(
        &self,
        context: WriterContext,
        platform: Arc<dyn PlatformService>,
        backend: Arc<dyn GitBackend>,
    ) -> Result<PrWriter> {
        let branch = resolve_branch(
            self.config.pr_branch.as_deref(),
            context.origin_revision.as_ref(),
            &context.workflow_name,
            &context.workflow_identity_user,
        )?;
        let base = self.base_branch();

        let state = match context.continuity {
            Continuity::Warm(state) if state.branch == branch => Some(state),
            Continuity::Warm(state) => {
                warn!(
                    "Previous writer used branch '{}', not '{branch}'; starting fresh",
                    state.branch
                );
                None
            }
            Continuity::Cold => None,
        };

        debug!(
            "Writer for {} on '{branch}' (base '{base}', {})",
            self.project_name(),
            if state.is_some() { "warm" } else { "cold" }
        );

        let repo = RemoteRepo::open(backend, self.fetch_url()).await?;

        Ok(PrWriter::new(WriterSetup {
            repo,
            platform,
            config: self.config.clone(),
            first_commit: self.git_options.first_commit,
            web_url: self.web_url(),
            branch,
            base,
            destination_files: context.destination_files,
            dry_run: context.dry_run,
            state,
        }))
    }
}
