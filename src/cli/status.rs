//! Status command - show the baseline recorded on the base branch

use crate::DestinationArgs;
use crate::cli::style::Stylize;
use anstream::println;
use pr_lander::config::{DestinationConfig, GitHubOptions, GitOptions};
use pr_lander::error::Result;
use pr_lander::platform::GitHubService;
use pr_lander::publish::{PrDestination, WriterContext};
use pr_lander::repo::CliGit;
use pr_lander::types::OriginRevision;
use std::sync::Arc;

/// Run the status command
pub async fn run_status(args: &DestinationArgs, label: &str) -> Result<()> {
    let config = DestinationConfig {
        url: args.url.clone(),
        destination_ref: args.destination_ref.clone(),
        // The status query never derives a PR branch
        pr_branch: Some("status".to_string()),
        create_pull_request: false,
        ..DestinationConfig::default()
    };
    let git_options = GitOptions {
        remote_url: args.remote_url.clone(),
        ..GitOptions::default()
    };
    let github_options = GitHubOptions {
        api_url: args.api_url.clone(),
        token: None,
    };

    let destination = PrDestination::new(config, git_options.clone())?;
    let platform = Arc::new(GitHubService::new(
        &github_options,
        destination.project_name(),
    )?);
    let context = WriterContext::new("status", "lander", Arc::new(OriginRevision::new("status")));
    let writer = destination
        .new_writer(context, platform, Arc::new(CliGit::new(&git_options)))
        .await?;

    let status = writer.destination_status(label).await?;
    match status.baseline {
        Some(baseline) => println!(
            "Baseline on {}: {}",
            writer.base().accent(),
            baseline.emphasis()
        ),
        None => println!(
            "No {} label found on {}",
            label.accent(),
            writer.base().accent()
        ),
    }

    Ok(())
}
