//! Remote repository adapter

use crate::error::{Error, Result};
use crate::glob::Glob;
use crate::repo::{GitBackend, replace_matching};
use crate::types::LogEntry;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::debug;

/// A local worktree bound to one destination remote
///
/// Owned by a single writer. The worktree directory is removed when the
/// adapter is dropped, whatever the outcome of the publish.
pub struct RemoteRepo {
    backend: Arc<dyn GitBackend>,
    url: String,
    worktree: TempDir,
}

impl RemoteRepo {
    /// Prepare a fresh worktree for `url`
    pub async fn open(backend: Arc<dyn GitBackend>, url: impl Into<String>) -> Result<Self> {
        let worktree = tempfile::Builder::new()
            .prefix("lander-worktree-")
            .tempdir()?;
        backend.init(worktree.path()).await?;

        let url = url.into();
        debug!("Opened worktree {} for {}", worktree.path().display(), url);

        Ok(Self {
            backend,
            url,
            worktree,
        })
    }

    /// Remote URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Local worktree path
    pub fn worktree(&self) -> &Path {
        self.worktree.path()
    }

    /// Fetch a branch; returns its tip, `None` when the branch does not exist
    pub async fn fetch_branch(&self, name: &str) -> Result<Option<String>> {
        self.backend
            .fetch(self.worktree(), &self.url, name)
            .await
            .map_err(|e| Error::Repo(format!("cannot fetch '{name}' from {}: {e}", self.url)))
    }

    /// History of a remote branch, newest first; empty if the branch is missing
    pub async fn branch_history(&self, name: &str) -> Result<Vec<LogEntry>> {
        match self.fetch_branch(name).await? {
            Some(tip) => self.backend.log(self.worktree(), &tip).await,
            None => Ok(Vec::new()),
        }
    }

    /// Commit `snapshot` on top of `parent` (or as a root commit)
    ///
    /// Files selected by `glob` come from the snapshot, the rest from `parent`.
    pub async fn commit_snapshot(
        &self,
        parent: Option<&str>,
        snapshot: &Path,
        glob: &Glob,
        message: &str,
    ) -> Result<String> {
        self.backend.checkout(self.worktree(), parent).await?;
        replace_matching(self.worktree(), snapshot, glob)?;
        let commit = self.backend.commit_all(self.worktree(), message).await?;
        debug!("Committed {commit} on top of {}", parent.unwrap_or("nothing"));
        Ok(commit)
    }

    /// Replay `commits` (oldest first) on top of `new_base`
    ///
    /// Returns the replayed commits in the same order.
    pub async fn rebase_onto(&self, commits: &[String], new_base: &str) -> Result<Vec<String>> {
        self.backend
            .checkout(self.worktree(), Some(new_base))
            .await?;

        let mut rebased = Vec::with_capacity(commits.len());
        for commit in commits {
            rebased.push(self.backend.cherry_pick(self.worktree(), commit).await?);
        }

        debug!("Rebased {} commit(s) onto {new_base}", rebased.len());
        Ok(rebased)
    }

    /// Point the remote branch at `commit`
    pub async fn push_branch(&self, name: &str, commit: &str, force: bool) -> Result<()> {
        self.backend
            .push(self.worktree(), &self.url, commit, name, force)
            .await
            .map_err(|e| Error::Repo(format!("cannot push '{name}' to {}: {e}", self.url)))
    }
}
