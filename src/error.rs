//! Error types for pr-lander

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while publishing a snapshot
#[derive(Debug, Error)]
pub enum Error {
    /// Misconfiguration detected before any remote mutation
    #[error("{0}")]
    Validation(String),

    /// Repository I/O failure (fetch, log, push)
    #[error("repository error: {0}")]
    Repo(String),

    /// The remote branch moved under us (another actor pushed to it)
    #[error(
        "branch '{branch}' was updated by someone else: expected {expected}, found {}. \
         Retry the migration to rebuild the branch",
        actual.as_deref().unwrap_or("no branch")
    )]
    RemoteConflict {
        /// Branch that diverged
        branch: String,
        /// Commit this writer pushed last
        expected: String,
        /// Commit found on the remote, if the branch still exists
        actual: Option<String>,
    },

    /// Unexpected response from the hosting API
    #[error("GitHub API error ({status}): {message}")]
    GitHubApi {
        /// HTTP status code
        status: u16,
        /// Response body or decoding failure
        message: String,
    },

    /// A git plumbing command failed
    #[error("git {command} failed: {stderr}")]
    Git {
        /// Subcommand that failed
        command: String,
        /// Captured stderr
        stderr: String,
    },

    /// Authentication failure
    #[error("authentication error: {0}")]
    Auth(String),

    /// Filesystem error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL could not be built
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Whether the caller may retry the whole publish operation
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RemoteConflict { .. })
    }

    /// Whether the error was raised by pre-flight validation
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether the error belongs to the repository class (git or hosting API)
    pub const fn is_repo(&self) -> bool {
        matches!(
            self,
            Self::Repo(_)
                | Self::RemoteConflict { .. }
                | Self::GitHubApi { .. }
                | Self::Git { .. }
                | Self::Http(_)
        )
    }
}
