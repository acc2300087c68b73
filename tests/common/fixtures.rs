//! Test data factories for pr-lander types
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_lander::config::{DestinationConfig, GitOptions};
use pr_lander::publish::{Phase, PrDestination, PrWriter, ProgressCallback, PushStatus, WriterContext};
use pr_lander::types::{PullRequest, Revision, TransformResult};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use super::{FakeGit, MockPlatformService};

/// Label used by the dummy origin
pub const DUMMY_LABEL: &str = "DummyOrigin-RevId";

/// Remote URL the fake backend serves
pub const REMOTE_URL: &str = "file:///fake/hub/foo";

/// Origin revision with a settable context reference
#[derive(Debug, Clone)]
pub struct DummyRevision {
    pub id: String,
    pub context_reference: Option<String>,
}

impl DummyRevision {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            context_reference: None,
        }
    }

    pub fn with_context_reference(mut self, reference: &str) -> Self {
        self.context_reference = Some(reference.to_string());
        self
    }
}

impl Revision for DummyRevision {
    fn id(&self) -> &str {
        &self.id
    }

    fn context_reference(&self) -> Option<&str> {
        self.context_reference.as_deref()
    }
}

/// Snapshot directory holding `files`
pub fn make_snapshot(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let target = dir.path().join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(target, content).unwrap();
    }
    dir
}

/// Transform result for a snapshot directory
pub fn make_transform(snapshot: &Path, revision: &DummyRevision, summary: &str) -> TransformResult {
    TransformResult::new(snapshot, Arc::new(revision.clone()), DUMMY_LABEL, summary)
}

/// Destination config pointing at `https://github.com/foo`
pub fn make_config() -> DestinationConfig {
    DestinationConfig::with_url("https://github.com/foo")
}

/// Destination whose git traffic goes to [`REMOTE_URL`]
pub fn make_destination(config: DestinationConfig) -> PrDestination {
    PrDestination::new(
        config,
        GitOptions {
            remote_url: Some(REMOTE_URL.to_string()),
            ..GitOptions::default()
        },
    )
    .unwrap()
}

/// Writer over the fake backend and mock platform
pub async fn make_writer(
    destination: &PrDestination,
    context: WriterContext,
    git: &Arc<FakeGit>,
    platform: &Arc<MockPlatformService>,
) -> PrWriter {
    destination
        .new_writer(context, platform.clone(), git.clone())
        .await
        .unwrap()
}

/// Everything a progress callback was told
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Phase(Phase),
    Push(String, PushStatus),
    PrCreated(String, u64, String),
    PrFound(String, u64, String),
    Message(String),
}

/// Progress callback that records events for assertions
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_phase(&self, phase: Phase) {
        self.record(ProgressEvent::Phase(phase));
    }

    async fn on_push(&self, branch: &str, status: PushStatus) {
        self.record(ProgressEvent::Push(branch.to_string(), status));
    }

    async fn on_pr_created(&self, branch: &str, pr: &PullRequest, url: &str) {
        self.record(ProgressEvent::PrCreated(
            branch.to_string(),
            pr.number,
            url.to_string(),
        ));
    }

    async fn on_pr_found(&self, branch: &str, pr: &PullRequest, url: &str) {
        self.record(ProgressEvent::PrFound(
            branch.to_string(),
            pr.number,
            url.to_string(),
        ));
    }

    async fn on_message(&self, message: &str) {
        self.record(ProgressEvent::Message(message.to_string()));
    }
}
