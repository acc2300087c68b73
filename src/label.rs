//! Identity labels embedded in published commit messages
//!
//! Every commit this engine creates ends with a trailer binding it to the
//! origin revision that produced it:
//!
//! ```text
//! <summary>
//!
//! <LabelName>: <revision id>
//! ```
//!
//! The trailer is the only state persisted across runs, so scanning the
//! destination history for it recovers the baseline after a restart.

use crate::types::LogEntry;

/// Append the identity trailer to a commit message
///
/// Callers must embed at most once per commit.
pub fn embed_label(message: &str, label: &str, revision_id: &str) -> String {
    let body = message.trim_end();
    if body.is_empty() {
        return format!("{label}: {revision_id}\n");
    }
    format!("{body}\n\n{label}: {revision_id}\n")
}

/// Find the value of `label` in a commit message
///
/// The last occurrence wins, matching how trailers are appended.
pub fn find_label<'a>(message: &'a str, label: &str) -> Option<&'a str> {
    message.lines().rev().find_map(|line| {
        let value = line.trim_end().strip_prefix(label)?.strip_prefix(':')?;
        let value = value.trim();
        (!value.is_empty()).then_some(value)
    })
}

/// Recover the baseline revision from a history ordered newest first
///
/// Returns the label value of the first commit carrying it. An empty history
/// (missing branch) is a normal first-run state and yields `None`.
pub fn extract_baseline(history: &[LogEntry], label: &str) -> Option<String> {
    history
        .iter()
        .find_map(|entry| find_label(&entry.body, label))
        .map(ToString::to_string)
}
