//! Platform service factory
//!
//! Creates platform services based on configuration.

use crate::auth::get_github_auth;
use crate::config::GitHubOptions;
use crate::error::Result;
use crate::platform::{GitHubService, PlatformService};
use crate::types::PlatformConfig;
use std::sync::Arc;

/// Create a platform service for a project
///
/// Resolves a token from the environment when the options carry none.
pub async fn create_platform_service(
    config: &PlatformConfig,
    options: &GitHubOptions,
) -> Result<Arc<dyn PlatformService>> {
    let mut options = options.clone();
    if options.token.is_none() {
        options.token = Some(get_github_auth().await?.token);
    }
    Ok(Arc::new(GitHubService::new(&options, config.project.clone())?))
}
