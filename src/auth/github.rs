//! GitHub authentication

use crate::auth::AuthSource;
use crate::config::GitHubOptions;
use crate::error::{Error, Result};
use crate::platform::GitHubService;
use std::env;
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in priority order
const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// GitHub authentication configuration
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Get GitHub authentication
///
/// Priority:
/// 1. `GITHUB_TOKEN` environment variable
/// 2. `GH_TOKEN` environment variable
/// 3. gh CLI (`gh auth token`)
///
/// Explicit environment wins so that CI can pin a bot token even when a
/// developer login is present.
pub async fn get_github_auth() -> Result<GitHubAuthConfig> {
    if let Some(token) = token_from_env(|name| env::var(name).ok()) {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
        });
    }

    if let Some(token) = get_gh_cli_token().await {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "No GitHub authentication found. Run `gh auth login` or set GITHUB_TOKEN".to_string(),
    ))
}

fn token_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}

async fn get_gh_cli_token() -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        debug!("gh auth token failed: {}", String::from_utf8_lossy(&output.stderr).trim());
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}

/// Test GitHub authentication
///
/// Returns the login of the user owning the token.
pub async fn test_github_auth(config: &GitHubAuthConfig, api_url: &str) -> Result<String> {
    let options = GitHubOptions {
        api_url: api_url.to_string(),
        token: Some(config.token.clone()),
    };
    GitHubService::new(&options, "")?
        .current_user()
        .await
        .map_err(|e| Error::Auth(format!("Invalid token: {e}")))
}
