//! Git plumbing backed by the `git` executable

use crate::config::GitOptions;
use crate::error::{Error, Result};
use crate::repo::GitBackend;
use crate::types::LogEntry;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Ref used as HEAD while building a history from scratch
const ROOT_REF: &str = "refs/heads/lander-root";

const FIELD_SEP: char = '\x1f';
const RECORD_SEP: char = '\x1e';

/// [`GitBackend`] running `git` subprocesses
#[derive(Debug, Clone)]
pub struct CliGit {
    committer_name: String,
    committer_email: String,
}

impl CliGit {
    /// Create a backend committing as the configured committer
    pub fn new(options: &GitOptions) -> Self {
        Self {
            committer_name: options.committer_name.clone(),
            committer_email: options.committer_email.clone(),
        }
    }

    async fn run(&self, worktree: &Path, args: &[&str]) -> Result<String> {
        debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .arg("-C")
            .arg(worktree)
            .args(["-c", "commit.gpgsign=false", "-c", "core.autocrlf=false"])
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_AUTHOR_NAME", &self.committer_name)
            .env("GIT_AUTHOR_EMAIL", &self.committer_email)
            .env("GIT_COMMITTER_NAME", &self.committer_name)
            .env("GIT_COMMITTER_EMAIL", &self.committer_email)
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::Git {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn head(&self, worktree: &Path) -> Result<String> {
        Ok(self.run(worktree, &["rev-parse", "HEAD"]).await?.trim().to_string())
    }
}

#[async_trait]
impl GitBackend for CliGit {
    async fn init(&self, worktree: &Path) -> Result<()> {
        self.run(worktree, &["init", "--quiet"]).await?;
        Ok(())
    }

    async fn fetch(&self, worktree: &Path, url: &str, branch: &str) -> Result<Option<String>> {
        let refname = format!("refs/heads/{branch}");
        let listing = self.run(worktree, &["ls-remote", url, &refname]).await?;

        let Some(tip) = parse_ls_remote(&listing, &refname) else {
            return Ok(None);
        };

        self.run(worktree, &["fetch", "--quiet", "--no-tags", url, &refname])
            .await?;
        Ok(Some(tip))
    }

    async fn checkout(&self, worktree: &Path, commit: Option<&str>) -> Result<()> {
        match commit {
            Some(commit) => {
                self.run(worktree, &["checkout", "--quiet", "--force", "--detach", commit])
                    .await?;
            }
            None => {
                // Absent on the first root commit of a worktree
                if let Err(e) = self.run(worktree, &["update-ref", "-d", ROOT_REF]).await {
                    debug!("no previous root ref: {e}");
                }
                self.run(worktree, &["symbolic-ref", "HEAD", ROOT_REF]).await?;
                self.run(worktree, &["read-tree", "--empty"]).await?;
            }
        }
        self.run(worktree, &["clean", "-fdxq"]).await?;
        Ok(())
    }

    async fn commit_all(&self, worktree: &Path, message: &str) -> Result<String> {
        self.run(worktree, &["add", "--all"]).await?;
        self.run(
            worktree,
            &[
                "commit",
                "--quiet",
                "--allow-empty",
                "--cleanup=whitespace",
                "-m",
                message,
            ],
        )
        .await?;
        self.head(worktree).await
    }

    async fn cherry_pick(&self, worktree: &Path, commit: &str) -> Result<String> {
        let picked = self
            .run(
                worktree,
                &["cherry-pick", "--allow-empty", "--keep-redundant-commits", commit],
            )
            .await;

        if let Err(e) = picked {
            // Leave the worktree usable for the next attempt
            let _ = self.run(worktree, &["cherry-pick", "--abort"]).await;
            return Err(Error::Repo(format!("cannot replay {commit}: {e}")));
        }

        self.head(worktree).await
    }

    async fn log(&self, worktree: &Path, commit: &str) -> Result<Vec<LogEntry>> {
        let format = format!("--format=%H{FIELD_SEP}%P{FIELD_SEP}%cI{FIELD_SEP}%B{RECORD_SEP}");
        let raw = self
            .run(worktree, &["log", "--first-parent", &format, commit])
            .await?;
        parse_log(&raw)
    }

    async fn push(
        &self,
        worktree: &Path,
        url: &str,
        commit: &str,
        branch: &str,
        force: bool,
    ) -> Result<()> {
        let refspec = format!("{commit}:refs/heads/{branch}");
        let mut args = vec!["push", "--quiet"];
        if force {
            args.push("--force");
        }
        args.extend([url, refspec.as_str()]);
        self.run(worktree, &args).await?;
        Ok(())
    }
}

fn parse_ls_remote(listing: &str, refname: &str) -> Option<String> {
    listing.lines().find_map(|line| {
        let (sha, name) = line.split_once('\t')?;
        (name.trim() == refname).then(|| sha.trim().to_string())
    })
}

fn parse_log(raw: &str) -> Result<Vec<LogEntry>> {
    raw.split(RECORD_SEP)
        .map(|record| record.trim_start_matches('\n'))
        .filter(|record| !record.trim().is_empty())
        .map(|record| {
            let mut fields = record.splitn(4, FIELD_SEP);
            let (Some(id), Some(parents), Some(date), Some(body)) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                return Err(Error::Repo(format!("unexpected git log record: {record:?}")));
            };

            let committed_at = DateTime::parse_from_rfc3339(date.trim())
                .map_err(|e| Error::Repo(format!("bad commit date '{date}': {e}")))?
                .with_timezone(&Utc);

            Ok(LogEntry {
                commit_id: id.trim().to_string(),
                parents: parents.split_whitespace().map(ToString::to_string).collect(),
                body: body.to_string(),
                committed_at,
            })
        })
        .collect()
}
