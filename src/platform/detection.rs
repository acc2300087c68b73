//! Project detection from hosting URLs

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use std::env;
use url::Url;

const GITHUB_HOST: &str = "github.com";

/// `github.com` always is a GitHub host; `GH_HOST` adds an enterprise host
fn host_matches(hostname: &str, extra_host: Option<&str>) -> bool {
    hostname == GITHUB_HOST || extra_host.is_some_and(|h| hostname == h)
}

/// Parse the project (`owner` or `owner/repo`) from a GitHub URL
///
/// Accepts `https://`, `http://`, `git+https://`, scp-like `git@host:path`
/// and scheme-less `git@host/path` forms. A trailing `.git` or `/` is dropped.
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    let gh_host = env::var("GH_HOST").ok();
    parse_with_host(url, gh_host.as_deref())
}

fn parse_with_host(url: &str, extra_host: Option<&str>) -> Result<PlatformConfig> {
    if url.trim().is_empty() {
        return Err(Error::Validation("Empty GitHub url".to_string()));
    }

    // SSH format: git@host:owner/repo.git
    for host in std::iter::once(GITHUB_HOST).chain(extra_host) {
        if let Some(path) = url.strip_prefix(&format!("git@{host}:")) {
            return project_config(url, host, path);
        }
    }

    let parsed = Url::parse(url)
        .ok()
        .filter(|u| u.host_str().is_some())
        .or_else(|| Url::parse(&format!("notimportant://{url}")).ok())
        .ok_or_else(|| Error::Validation(format!("Cannot find project name from url {url}")))?;

    let host = parsed.host_str().unwrap_or_default();
    if !host_matches(host, extra_host) {
        return Err(Error::Validation(format!("Not a GitHub url: {url}")));
    }

    project_config(url, host, parsed.path())
}

fn project_config(url: &str, host: &str, path: &str) -> Result<PlatformConfig> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let project = path
        .strip_suffix(".git")
        .or_else(|| path.strip_suffix('/'))
        .unwrap_or(path);

    if project.is_empty() {
        return Err(Error::Validation(format!(
            "'{url}' is not a valid GitHub url"
        )));
    }

    Ok(PlatformConfig {
        host: host.to_string(),
        project: project.to_string(),
    })
}
