//! Publishing a snapshot to the PR branch
//!
//! One [`PrWriter::write`] call:
//! 1. Fetch the base branch (and, for warm writers, the PR branch)
//! 2. Decide the parent: the previous pushed commit (warm) or the base tip (cold)
//! 3. Commit the snapshot with the identity label trailer
//! 4. Push, forcing when history was rewritten
//! 5. Find or create the pull request

use crate::config::DestinationConfig;
use crate::error::{Error, Result};
use crate::glob::Glob;
use crate::label::{embed_label, extract_baseline};
use crate::platform::PlatformService;
use crate::publish::progress::{Phase, ProgressCallback, PushStatus};
use crate::publish::pull_request::{PrOutcome, find_or_create, pr_body, pr_title, pr_url};
use crate::publish::state::WriterState;
use crate::repo::RemoteRepo;
use crate::types::{DestinationStatus, PullRequest, TransformResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of one write
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// Branch written to
    pub branch: String,
    /// New branch tip
    pub commit: String,
    /// Whether the commit was pushed (false on dry runs)
    pub pushed: bool,
    /// Whether the push rewrote history
    pub forced: bool,
    /// PR tracking the branch, when PR creation is enabled
    pub pull_request: Option<PullRequest>,
    /// Whether this write created the PR
    pub created_pr: bool,
}

/// Everything a writer is built from
pub(crate) struct WriterSetup {
    pub repo: RemoteRepo,
    pub platform: Arc<dyn PlatformService>,
    pub config: DestinationConfig,
    pub first_commit: bool,
    pub web_url: String,
    pub branch: String,
    pub base: String,
    pub destination_files: Glob,
    pub dry_run: bool,
    pub state: Option<WriterState>,
}

/// Parent chain a new commit goes on top of
struct Prepared {
    base_tip: Option<String>,
    commits: Vec<String>,
    force: bool,
}

/// Writes snapshots to one PR branch
///
/// Writes are sequential; each call blocks until the branch is pushed and
/// the PR reconciled.
pub struct PrWriter {
    repo: RemoteRepo,
    platform: Arc<dyn PlatformService>,
    config: DestinationConfig,
    first_commit: bool,
    web_url: String,
    branch: String,
    base: String,
    destination_files: Glob,
    dry_run: bool,
    state: Option<WriterState>,
}

impl PrWriter {
    pub(crate) fn new(setup: WriterSetup) -> Self {
        Self {
            repo: setup.repo,
            platform: setup.platform,
            config: setup.config,
            first_commit: setup.first_commit,
            web_url: setup.web_url,
            branch: setup.branch,
            base: setup.base,
            destination_files: setup.destination_files,
            dry_run: setup.dry_run,
            state: setup.state,
        }
    }

    /// PR branch
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Base branch
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether the next write continues an existing chain
    pub const fn is_warm(&self) -> bool {
        self.state.is_some()
    }

    /// State to hand to a successor writer in the same run
    pub const fn state(&self) -> Option<&WriterState> {
        self.state.as_ref()
    }

    /// Publish one snapshot
    #[allow(clippy::too_many_lines)]
    pub async fn write(
        &mut self,
        result: &TransformResult,
        progress: &dyn ProgressCallback,
    ) -> Result<WriteResult> {
        progress.on_phase(Phase::Preparing).await;

        let base_tip = self.repo.fetch_branch(&self.base).await?;
        if base_tip.is_none() && !self.first_commit {
            return Err(Error::Validation(format!(
                "'{}' doesn't exist in '{}'. Use --first-commit if you want to push anyway",
                self.base,
                self.repo.url()
            )));
        }

        let mut prepared = match self.state.clone() {
            Some(state) if state.last_pushed.is_some() => {
                self.prepare_warm(&state, base_tip, progress).await?
            }
            _ => self.prepare_cold(base_tip, &result.rev_id_label).await?,
        };

        progress.on_phase(Phase::Committing).await;
        let message = embed_label(&result.summary, &result.rev_id_label, result.revision.id());
        let commit = self
            .repo
            .commit_snapshot(
                prepared.commits.last().or(prepared.base_tip.as_ref()).map(String::as_str),
                &result.path,
                &self.destination_files,
                &message,
            )
            .await?;
        prepared.commits.push(commit.clone());

        let previous = self.state.as_ref();
        let mut state = WriterState {
            branch: self.branch.clone(),
            base_tip: prepared.base_tip,
            commits: prepared.commits,
            last_pushed: previous.and_then(|s| s.last_pushed.clone()),
            pull_request: previous.and_then(|s| s.pull_request.clone()),
        };

        if self.dry_run {
            progress.on_push(&self.branch, PushStatus::Skipped).await;
            progress
                .on_message(&format!(
                    "Dry run: would push {commit} to '{}' and skip pull request reconciliation",
                    self.branch
                ))
                .await;
            self.state = Some(state);
            progress.on_phase(Phase::Complete).await;
            return Ok(WriteResult {
                branch: self.branch.clone(),
                commit,
                pushed: false,
                forced: false,
                pull_request: None,
                created_pr: false,
            });
        }

        progress.on_phase(Phase::Pushing).await;
        progress.on_push(&self.branch, PushStatus::Started).await;
        if let Err(e) = self
            .repo
            .push_branch(&self.branch, &commit, prepared.force)
            .await
        {
            progress
                .on_push(&self.branch, PushStatus::Failed(e.to_string()))
                .await;
            return Err(e);
        }
        let status = if prepared.force {
            PushStatus::Forced
        } else {
            PushStatus::Success
        };
        progress.on_push(&self.branch, status).await;
        state.last_pushed = Some(commit.clone());

        // Recorded before PR reconciliation: the branch is updated even if the API fails
        self.state = Some(state);

        let (pull_request, created_pr) = if self.config.create_pull_request {
            progress.on_phase(Phase::ReconcilingPr).await;
            let (pr, created) = self.reconcile_pull_request(result, progress).await?;
            if let Some(state) = self.state.as_mut() {
                state.pull_request = Some(pr.clone());
            }
            (Some(pr), created)
        } else {
            (None, false)
        };

        progress.on_phase(Phase::Complete).await;

        Ok(WriteResult {
            branch: self.branch.clone(),
            commit,
            pushed: true,
            forced: prepared.force,
            pull_request,
            created_pr,
        })
    }

    /// Report what the destination already contains
    ///
    /// Reads the base branch, not the PR branch. Pending changes are never
    /// reported since every publish may rewrite the PR branch.
    pub async fn destination_status(&self, label: &str) -> Result<DestinationStatus> {
        let history = self.repo.branch_history(&self.base).await?;
        let baseline = extract_baseline(&history, label);
        debug!("Baseline on '{}': {:?}", self.base, baseline);
        Ok(DestinationStatus {
            baseline,
            pending_changes: Vec::new(),
        })
    }

    async fn prepare_warm(
        &self,
        state: &WriterState,
        base_tip: Option<String>,
        progress: &dyn ProgressCallback,
    ) -> Result<Prepared> {
        // Our previous push must still be the tip; anything else is a foreign update
        let remote_tip = self.repo.fetch_branch(&self.branch).await?;
        if remote_tip != state.last_pushed {
            return Err(Error::RemoteConflict {
                branch: self.branch.clone(),
                expected: state.last_pushed.clone().unwrap_or_default(),
                actual: remote_tip,
            });
        }

        if base_tip == state.base_tip {
            return Ok(Prepared {
                base_tip,
                commits: state.commits.clone(),
                force: false,
            });
        }

        let Some(new_base) = base_tip else {
            return Err(Error::Repo(format!(
                "base branch '{}' disappeared from {}",
                self.base,
                self.repo.url()
            )));
        };

        progress.on_phase(Phase::Rebasing).await;
        info!(
            "'{}' moved to {new_base}; replaying {} commit(s) of '{}'",
            self.base,
            state.commits.len(),
            self.branch
        );
        let commits = self.repo.rebase_onto(&state.commits, &new_base).await?;

        Ok(Prepared {
            base_tip: Some(new_base),
            commits,
            force: true,
        })
    }

    async fn prepare_cold(&self, base_tip: Option<String>, label: &str) -> Result<Prepared> {
        let history = self.repo.branch_history(&self.branch).await?;
        if !history.is_empty() {
            let baseline = extract_baseline(&history, label);
            info!(
                "Rebuilding '{}' from '{}' (previously published revision: {})",
                self.branch,
                self.base,
                baseline.as_deref().unwrap_or("unknown")
            );
        }

        Ok(Prepared {
            base_tip,
            commits: Vec::new(),
            force: true,
        })
    }

    async fn reconcile_pull_request(
        &self,
        result: &TransformResult,
        progress: &dyn ProgressCallback,
    ) -> Result<(PullRequest, bool)> {
        if let Some(pr) = self.state.as_ref().and_then(|s| s.pull_request.clone()) {
            debug!("Reusing PR #{} from this run", pr.number);
            return Ok((pr, false));
        }

        let title = self
            .config
            .title
            .clone()
            .unwrap_or_else(|| pr_title(&result.summary));
        let body = self
            .config
            .body
            .clone()
            .unwrap_or_else(|| pr_body(&result.summary));

        let outcome = find_or_create(
            self.platform.as_ref(),
            &self.branch,
            &self.base,
            &title,
            &body,
        )
        .await?;

        let url = pr_url(&self.web_url, outcome.pull_request().number);
        match outcome {
            PrOutcome::Existing(pr) => {
                progress.on_pr_found(&self.branch, &pr, &url).await;
                Ok((pr, false))
            }
            PrOutcome::Created(pr) => {
                let line = format!(
                    "Pull Request {url} created using branch '{}'.",
                    self.branch
                );
                info!("{line}");
                progress.on_pr_created(&self.branch, &pr, &url).await;
                progress.on_message(&line).await;
                Ok((pr, true))
            }
        }
    }
}
