//! Writer state and per-call context

use crate::glob::Glob;
use crate::types::{PullRequest, Revision};
use std::sync::Arc;

/// What a writer remembers between writes of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterState {
    /// Branch the chain lives on
    pub branch: String,
    /// Base tip the chain was built on (`None` for a root history)
    pub base_tip: Option<String>,
    /// Commits written in this run on top of `base_tip`, oldest first
    pub commits: Vec<String>,
    /// Tip last pushed to the remote branch
    pub last_pushed: Option<String>,
    /// PR tracking the branch, once found or created
    pub pull_request: Option<PullRequest>,
}

/// Whether a writer continues a predecessor from the same run
#[derive(Debug, Clone, Default)]
pub enum Continuity {
    /// Append on top of the predecessor's last pushed commit
    Warm(WriterState),
    /// Rediscover state from the remote and rebuild the branch
    #[default]
    Cold,
}

/// Input for creating a writer
#[derive(Debug, Clone)]
pub struct WriterContext {
    /// Name of the migration workflow
    pub workflow_name: String,
    /// User identity the workflow runs for
    pub workflow_identity_user: String,
    /// Destination files owned by the snapshot
    pub destination_files: Glob,
    /// Build commits locally but do not push or touch PRs
    pub dry_run: bool,
    /// Revision that triggered the run
    pub origin_revision: Arc<dyn Revision>,
    /// Warm/cold selection
    pub continuity: Continuity,
}

impl WriterContext {
    /// Cold, non-dry-run context over all files
    pub fn new(
        workflow_name: impl Into<String>,
        workflow_identity_user: impl Into<String>,
        origin_revision: Arc<dyn Revision>,
    ) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            workflow_identity_user: workflow_identity_user.into(),
            destination_files: Glob::all_files(),
            dry_run: false,
            origin_revision,
            continuity: Continuity::Cold,
        }
    }

    /// Restrict the files the snapshot owns
    #[must_use]
    pub fn with_destination_files(mut self, glob: Glob) -> Self {
        self.destination_files = glob;
        self
    }

    /// Toggle dry-run mode
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Continue from a predecessor's state
    #[must_use]
    pub fn continuing(mut self, state: WriterState) -> Self {
        self.continuity = Continuity::Warm(state);
        self
    }
}
