//! Destination repository access
//!
//! [`GitBackend`] is the low-level plumbing (init, fetch, commit, push).
//! [`RemoteRepo`] owns a disposable worktree bound to one remote and builds
//! the publishing operations on top of the backend.

mod cli;
mod remote;
mod worktree;

pub use cli::CliGit;
pub use remote::RemoteRepo;
pub use worktree::{list_files, replace_matching};

use crate::error::Result;
use crate::types::LogEntry;
use async_trait::async_trait;
use std::path::Path;

/// Git plumbing used by [`RemoteRepo`]
///
/// Every operation acts on a worktree previously prepared with
/// [`GitBackend::init`]. Implementations must not share state between
/// worktrees other than what they fetch from or push to remotes.
#[async_trait]
pub trait GitBackend: Send + Sync {
    /// Create an empty repository in `worktree`
    async fn init(&self, worktree: &Path) -> Result<()>;

    /// Fetch `branch` from `url`; returns its tip, or `None` if it does not exist
    async fn fetch(&self, worktree: &Path, url: &str, branch: &str) -> Result<Option<String>>;

    /// Check out `commit` detached, replacing worktree files; `None` starts an
    /// empty unborn history
    async fn checkout(&self, worktree: &Path, commit: Option<&str>) -> Result<()>;

    /// Commit all worktree content on top of the checked out commit
    async fn commit_all(&self, worktree: &Path, message: &str) -> Result<String>;

    /// Replay `commit` on top of the checked out commit, keeping its message
    async fn cherry_pick(&self, worktree: &Path, commit: &str) -> Result<String>;

    /// History reachable from `commit` following first parents, newest first
    async fn log(&self, worktree: &Path, commit: &str) -> Result<Vec<LogEntry>>;

    /// Point `branch` on `url` at `commit`
    async fn push(
        &self,
        worktree: &Path,
        url: &str,
        commit: &str,
        branch: &str,
        force: bool,
    ) -> Result<()>;
}
