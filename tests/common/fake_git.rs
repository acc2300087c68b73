//! In-memory git backend for testing
//!
//! Commits and remote refs live in memory; worktrees are real directories so
//! the snapshot copying in `RemoteRepo` runs unchanged.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use pr_lander::error::{Error, Result};
use pr_lander::repo::{GitBackend, list_files};
use pr_lander::types::LogEntry;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File tree of a commit, relative path to content
pub type Tree = BTreeMap<String, String>;

/// A commit stored by [`FakeGit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCommit {
    pub id: String,
    pub parents: Vec<String>,
    pub message: String,
    pub tree: Tree,
}

/// Call record for `push`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCall {
    pub url: String,
    pub branch: String,
    pub commit: String,
    pub force: bool,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    commits: HashMap<String, FakeCommit>,
    remotes: HashMap<String, HashMap<String, String>>,
    heads: HashMap<PathBuf, Option<String>>,
    push_calls: Vec<PushCall>,
    error_on_push: Option<String>,
    error_on_fetch: Option<String>,
}

/// In-memory git backend
///
/// Features:
/// - Remote branches per URL, seeded with [`FakeGit::add_files`]
/// - Fast-forward checks on non-forced pushes
/// - Call tracking for pushes
/// - Error injection for push and fetch
#[derive(Default)]
pub struct FakeGit {
    inner: Mutex<Inner>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    // === Remote seeding ===

    /// Commit `files` on top of a remote branch
    ///
    /// `None` means `master`. A branch that does not exist yet starts from the
    /// `master` tip, or as a root commit when `master` is missing too.
    pub fn add_files(&self, url: &str, branch: Option<&str>, message: &str, files: &[(&str, &str)]) -> String {
        let branch = branch.unwrap_or("master");
        let mut inner = self.inner.lock().unwrap();
        let refs = inner.remotes.entry(url.to_string()).or_default();
        let parent = refs.get(branch).or_else(|| refs.get("master")).cloned();

        let mut tree = parent
            .as_ref()
            .map(|p| inner.commits[p].tree.clone())
            .unwrap_or_default();
        for (path, content) in files {
            tree.insert((*path).to_string(), (*content).to_string());
        }

        let id = inner.store(parent.into_iter().collect(), message, tree);
        inner
            .remotes
            .entry(url.to_string())
            .or_default()
            .insert(branch.to_string(), id.clone());
        id
    }

    /// Point a remote branch at an existing commit, as a foreign push would
    pub fn set_remote_tip(&self, url: &str, branch: &str, commit: &str) {
        self.inner
            .lock()
            .unwrap()
            .remotes
            .entry(url.to_string())
            .or_default()
            .insert(branch.to_string(), commit.to_string());
    }

    // === Error injection methods ===

    /// Make `push` return an error
    pub fn fail_push(&self, msg: &str) {
        self.inner.lock().unwrap().error_on_push = Some(msg.to_string());
    }

    /// Make `fetch` return an error
    pub fn fail_fetch(&self, msg: &str) {
        self.inner.lock().unwrap().error_on_fetch = Some(msg.to_string());
    }

    // === Inspection methods ===

    /// Tip of a remote branch
    pub fn remote_tip(&self, url: &str, branch: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .remotes
            .get(url)
            .and_then(|refs| refs.get(branch).cloned())
    }

    /// A stored commit
    pub fn commit(&self, id: &str) -> FakeCommit {
        self.inner.lock().unwrap().commits[id].clone()
    }

    /// First-parent history of a remote branch, newest first
    pub fn history(&self, url: &str, branch: &str) -> Vec<FakeCommit> {
        let Some(tip) = self.remote_tip(url, branch) else {
            return Vec::new();
        };
        let inner = self.inner.lock().unwrap();
        let mut history = Vec::new();
        let mut next = Some(tip);
        while let Some(id) = next {
            let commit = inner.commits[&id].clone();
            next = commit.parents.first().cloned();
            history.push(commit);
        }
        history
    }

    /// Files at the tip of a remote branch
    pub fn files_at(&self, url: &str, branch: &str) -> Tree {
        self.remote_tip(url, branch)
            .map(|tip| self.commit(&tip).tree)
            .unwrap_or_default()
    }

    /// All `push` calls
    pub fn get_push_calls(&self) -> Vec<PushCall> {
        self.inner.lock().unwrap().push_calls.clone()
    }
}

impl Inner {
    fn store(&mut self, parents: Vec<String>, message: &str, tree: Tree) -> String {
        self.next_id += 1;
        let id = format!("{:040x}", self.next_id);
        self.commits.insert(
            id.clone(),
            FakeCommit {
                id: id.clone(),
                parents,
                message: message.to_string(),
                tree,
            },
        );
        id
    }

    fn is_ancestor(&self, ancestor: &str, commit: &str) -> bool {
        let mut next = Some(commit.to_string());
        while let Some(id) = next {
            if id == ancestor {
                return true;
            }
            next = self.commits.get(&id).and_then(|c| c.parents.first().cloned());
        }
        false
    }

    fn head(&self, worktree: &Path) -> Result<Option<String>> {
        self.heads
            .get(worktree)
            .cloned()
            .ok_or_else(|| git_error("rev-parse", "not a git repository"))
    }
}

fn git_error(command: &str, stderr: &str) -> Error {
    Error::Git {
        command: command.to_string(),
        stderr: stderr.to_string(),
    }
}

fn read_tree(worktree: &Path) -> Result<Tree> {
    let mut tree = Tree::new();
    for path in list_files(worktree)? {
        let content = fs::read_to_string(worktree.join(&path))?;
        tree.insert(path, content);
    }
    Ok(tree)
}

fn write_tree(worktree: &Path, tree: &Tree) -> Result<()> {
    for entry in fs::read_dir(worktree)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    for (path, content) in tree {
        let target = worktree.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, content)?;
    }
    Ok(())
}

#[async_trait]
impl GitBackend for FakeGit {
    async fn init(&self, worktree: &Path) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .heads
            .insert(worktree.to_path_buf(), None);
        Ok(())
    }

    async fn fetch(&self, _worktree: &Path, url: &str, branch: &str) -> Result<Option<String>> {
        let inner = self.inner.lock().unwrap();
        if let Some(msg) = &inner.error_on_fetch {
            return Err(git_error("fetch", msg));
        }
        Ok(inner
            .remotes
            .get(url)
            .and_then(|refs| refs.get(branch).cloned()))
    }

    async fn checkout(&self, worktree: &Path, commit: Option<&str>) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let tree = match commit {
            Some(id) => inner
                .commits
                .get(id)
                .map(|c| c.tree.clone())
                .ok_or_else(|| git_error("checkout", &format!("unknown commit {id}")))?,
            None => Tree::new(),
        };
        write_tree(worktree, &tree)?;
        inner
            .heads
            .insert(worktree.to_path_buf(), commit.map(ToString::to_string));
        Ok(())
    }

    async fn commit_all(&self, worktree: &Path, message: &str) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        let parent = inner.head(worktree)?;
        let tree = read_tree(worktree)?;
        let id = inner.store(parent.into_iter().collect(), message, tree);
        inner
            .heads
            .insert(worktree.to_path_buf(), Some(id.clone()));
        Ok(id)
    }

    async fn cherry_pick(&self, worktree: &Path, commit: &str) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        let picked = inner
            .commits
            .get(commit)
            .cloned()
            .ok_or_else(|| git_error("cherry-pick", &format!("unknown commit {commit}")))?;
        let before = picked
            .parents
            .first()
            .map(|p| inner.commits[p].tree.clone())
            .unwrap_or_default();

        let mut tree = read_tree(worktree)?;
        for path in before.keys() {
            if !picked.tree.contains_key(path) {
                tree.remove(path);
            }
        }
        for (path, content) in &picked.tree {
            if before.get(path) != Some(content) {
                tree.insert(path.clone(), content.clone());
            }
        }
        write_tree(worktree, &tree)?;

        let parent = inner.head(worktree)?;
        let id = inner.store(parent.into_iter().collect(), &picked.message, tree);
        inner
            .heads
            .insert(worktree.to_path_buf(), Some(id.clone()));
        Ok(id)
    }

    async fn log(&self, _worktree: &Path, commit: &str) -> Result<Vec<LogEntry>> {
        let inner = self.inner.lock().unwrap();
        let epoch = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut entries = Vec::new();
        let mut next = Some(commit.to_string());
        while let Some(id) = next {
            let c = inner
                .commits
                .get(&id)
                .ok_or_else(|| git_error("log", &format!("unknown commit {id}")))?;
            let seq = i64::from_str_radix(&c.id, 16).unwrap_or_default();
            entries.push(LogEntry {
                commit_id: c.id.clone(),
                parents: c.parents.clone(),
                body: c.message.clone(),
                committed_at: epoch + Duration::seconds(seq),
            });
            next = c.parents.first().cloned();
        }
        Ok(entries)
    }

    async fn push(
        &self,
        _worktree: &Path,
        url: &str,
        commit: &str,
        branch: &str,
        force: bool,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.push_calls.push(PushCall {
            url: url.to_string(),
            branch: branch.to_string(),
            commit: commit.to_string(),
            force,
        });
        if let Some(msg) = &inner.error_on_push {
            return Err(git_error("push", msg));
        }

        let current = inner
            .remotes
            .get(url)
            .and_then(|refs| refs.get(branch).cloned());
        let fast_forward = current
            .as_deref()
            .is_none_or(|current| inner.is_ancestor(current, commit));
        if !force && !fast_forward {
            return Err(git_error(
                "push",
                &format!("! [rejected] {branch} (non-fast-forward)"),
            ));
        }

        inner
            .remotes
            .entry(url.to_string())
            .or_default()
            .insert(branch.to_string(), commit.to_string());
        Ok(())
    }
}
