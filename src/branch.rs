//! Destination and base branch resolution

use crate::error::{Error, Result};
use crate::types::Revision;
use sha2::{Digest, Sha256};

/// Base branch used when no destination ref is configured
///
/// The remote's real default branch is not detected.
pub const DEFAULT_BASE_BRANCH: &str = "master";

const BRANCH_PREFIX: &str = "lander/sync_";

/// Flag users can pass to pin the PR branch
pub const PR_BRANCH_FLAG: &str = "--pr-branch";

/// Derive a branch name from a context reference
///
/// Deterministic in the context reference, workflow name and workflow
/// identity user, so reruns of the same migration land on the same branch.
pub fn branch_from_context_reference(
    context_reference: &str,
    workflow_name: &str,
    workflow_identity_user: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(workflow_identity_user.as_bytes());
    hasher.update(b":");
    hasher.update(workflow_name.as_bytes());
    hasher.update(b":");
    hasher.update(context_reference.as_bytes());
    let digest = hasher.finalize();
    format!("{BRANCH_PREFIX}{}", hex::encode(&digest[..16]))
}

/// Resolve the PR branch for a revision
///
/// An explicit override is returned verbatim. Otherwise the revision must
/// carry a context reference.
pub fn resolve_branch(
    branch_override: Option<&str>,
    revision: &dyn Revision,
    workflow_name: &str,
    workflow_identity_user: &str,
) -> Result<String> {
    if let Some(branch) = branch_override {
        return Ok(branch.to_string());
    }

    let context_reference = revision.context_reference().ok_or_else(|| {
        Error::Validation(format!(
            "github_pr_destination is incompatible with the current origin. Origin has to be \
             able to provide the contextReference or use '{PR_BRANCH_FLAG}' flag"
        ))
    })?;

    Ok(branch_from_context_reference(
        context_reference,
        workflow_name,
        workflow_identity_user,
    ))
}

/// Resolve the base branch: the configured destination ref or `master`
pub fn resolve_base(destination_ref: Option<&str>) -> String {
    destination_ref
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_BASE_BRANCH)
        .to_string()
}
