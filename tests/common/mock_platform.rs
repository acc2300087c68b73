//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_lander::error::{Error, Result};
use pr_lander::platform::PlatformService;
use pr_lander::types::{CreatePullRequest, PullRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `find_existing_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindPrCall {
    pub head: String,
    pub base: String,
}

/// Simple mock platform service for testing
///
/// Manually implements `PlatformService` rather than using mockall.
///
/// Features:
/// - Auto-incrementing PR numbers
/// - Created PRs are reported as open by later lookups
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    project: String,
    next_pr_number: AtomicU64,
    open_prs: Mutex<HashMap<(String, String), PullRequest>>,
    // Call tracking
    find_pr_calls: Mutex<Vec<FindPrCall>>,
    create_pr_calls: Mutex<Vec<CreatePullRequest>>,
    // Error injection
    error_on_find_pr: Mutex<Option<(u16, String)>>,
    error_on_create_pr: Mutex<Option<(u16, String)>>,
}

impl MockPlatformService {
    /// Create a new mock for a project
    pub fn new(project: &str) -> Self {
        Self {
            project: project.to_string(),
            next_pr_number: AtomicU64::new(1),
            open_prs: Mutex::new(HashMap::new()),
            find_pr_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            error_on_find_pr: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make `find_existing_pr` return an API error
    pub fn fail_find_pr(&self, status: u16, msg: &str) {
        *self.error_on_find_pr.lock().unwrap() = Some((status, msg.to_string()));
    }

    /// Make `create_pr` return an API error
    pub fn fail_create_pr(&self, status: u16, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some((status, msg.to_string()));
    }

    /// Clear injected errors
    pub fn heal(&self) {
        *self.error_on_find_pr.lock().unwrap() = None;
        *self.error_on_create_pr.lock().unwrap() = None;
    }

    /// Register an open PR for a head/base pair
    pub fn add_open_pr(&self, head: &str, base: &str, number: u64) -> PullRequest {
        let pr = PullRequest {
            number,
            state: "open".to_string(),
            title: format!("Existing PR for {head}"),
            body: String::new(),
            head_ref: Some(head.to_string()),
            base_ref: Some(base.to_string()),
        };
        self.open_prs
            .lock()
            .unwrap()
            .insert((head.to_string(), base.to_string()), pr.clone());
        pr
    }

    // === Call verification methods ===

    /// Get all `find_existing_pr` calls
    pub fn get_find_pr_calls(&self) -> Vec<FindPrCall> {
        self.find_pr_calls.lock().unwrap().clone()
    }

    /// Get all `create_pr` calls
    pub fn get_create_pr_calls(&self) -> Vec<CreatePullRequest> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pr({head}, {base}) but got: {calls:?}"
        );
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn find_existing_pr(&self, head: &str, base: &str) -> Result<Option<PullRequest>> {
        self.find_pr_calls.lock().unwrap().push(FindPrCall {
            head: head.to_string(),
            base: base.to_string(),
        });

        if let Some((status, msg)) = self.error_on_find_pr.lock().unwrap().clone() {
            return Err(Error::GitHubApi {
                status,
                message: msg,
            });
        }

        let prs = self.open_prs.lock().unwrap();
        Ok(prs.get(&(head.to_string(), base.to_string())).cloned())
    }

    async fn create_pr(&self, request: &CreatePullRequest) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(request.clone());

        if let Some((status, msg)) = self.error_on_create_pr.lock().unwrap().clone() {
            return Err(Error::GitHubApi {
                status,
                message: msg,
            });
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = PullRequest {
            number,
            state: "open".to_string(),
            title: request.title.clone(),
            body: request.body.clone(),
            head_ref: Some(request.head.clone()),
            base_ref: Some(request.base.clone()),
        };
        self.open_prs
            .lock()
            .unwrap()
            .insert((request.head.clone(), request.base.clone()), pr.clone());
        Ok(pr)
    }

    fn project(&self) -> &str {
        &self.project
    }
}
