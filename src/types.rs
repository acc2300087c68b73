//! Core types for pr-lander

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// What the engine needs from an origin revision
///
/// Any origin model can be published as long as it can name the revision and,
/// optionally, the logical change it belongs to.
pub trait Revision: fmt::Debug + Send + Sync {
    /// Opaque identifier recorded in the identity label trailer
    fn id(&self) -> &str;

    /// Stable reference for the logical change (e.g. a review id), used to
    /// derive the destination branch name
    fn context_reference(&self) -> Option<&str> {
        None
    }
}

/// A plain origin revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginRevision {
    /// Revision identifier
    pub id: String,
    /// Optional context reference
    pub context_reference: Option<String>,
}

impl OriginRevision {
    /// Revision without a context reference
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context_reference: None,
        }
    }

    /// Attach a context reference
    #[must_use]
    pub fn with_context_reference(mut self, reference: impl Into<String>) -> Self {
        self.context_reference = Some(reference.into());
        self
    }
}

impl Revision for OriginRevision {
    fn id(&self) -> &str {
        &self.id
    }

    fn context_reference(&self) -> Option<&str> {
        self.context_reference.as_deref()
    }
}

/// Output of the transform pipeline: one snapshot to publish
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Directory holding the transformed file tree
    pub path: PathBuf,
    /// Origin revision that produced the snapshot
    pub revision: Arc<dyn Revision>,
    /// Label name used for the identity trailer (e.g. `GitOrigin-RevId`)
    pub rev_id_label: String,
    /// Human readable change summary
    pub summary: String,
}

impl TransformResult {
    /// Create a transform result
    pub fn new(
        path: impl Into<PathBuf>,
        revision: Arc<dyn Revision>,
        rev_id_label: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            revision,
            rev_id_label: rev_id_label.into(),
            summary: summary.into(),
        }
    }
}

/// A commit entry from the destination history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    /// Git commit ID (hex)
    pub commit_id: String,
    /// Parent commit IDs
    pub parents: Vec<String>,
    /// Full commit message
    pub body: String,
    /// When the commit was committed
    pub committed_at: DateTime<Utc>,
}

/// A pull request as reported by the hosting API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR state (`open`, `closed`)
    pub state: String,
    /// PR title
    pub title: String,
    /// PR body
    pub body: String,
    /// Head branch name, when the API reported it
    pub head_ref: Option<String>,
    /// Base branch name, when the API reported it
    pub base_ref: Option<String>,
}

/// Payload for `POST /repos/{project}/pulls`
///
/// Field order is the wire order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreatePullRequest {
    /// Base branch
    pub base: String,
    /// PR body
    pub body: String,
    /// Head branch
    pub head: String,
    /// PR title
    pub title: String,
}

/// What the destination already contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationStatus {
    /// Origin revision recovered from the newest identity label, if any
    pub baseline: Option<String>,
    /// Always empty: every publish may rewrite the branch
    pub pending_changes: Vec<String>,
}

/// Where a GitHub project lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Web host (`github.com` or an enterprise host)
    pub host: String,
    /// Project name, `owner/repo` or a bare owner
    pub project: String,
}

impl PlatformConfig {
    /// Normalized web URL for the project
    pub fn web_url(&self) -> String {
        format!("https://{}/{}", self.host, self.project)
    }
}
