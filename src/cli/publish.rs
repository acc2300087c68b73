//! Publish command - land one snapshot on the PR branch

use crate::DestinationArgs;
use crate::cli::progress::CliProgress;
use crate::cli::style::Stylize;
use anstream::println;
use pr_lander::config::{DestinationConfig, GitHubOptions, GitOptions};
use pr_lander::error::{Error, Result};
use pr_lander::glob::Glob;
use pr_lander::platform::{GitHubService, PlatformService, create_platform_service};
use pr_lander::publish::{PrDestination, WriterContext};
use pr_lander::repo::{CliGit, GitBackend};
use pr_lander::types::{OriginRevision, TransformResult};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Arguments of `lander publish`
pub struct PublishRequest {
    pub destination: DestinationArgs,
    pub snapshot: PathBuf,
    pub revision: String,
    pub context_reference: Option<String>,
    pub label: String,
    pub summary: String,
    pub workflow: String,
    pub identity_user: String,
    pub pr_branch: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub create_pull_request: bool,
    pub files: Vec<String>,
    pub first_commit: bool,
    pub committer_name: String,
    pub committer_email: String,
    pub dry_run: bool,
}

/// Run the publish command
pub async fn run_publish(request: PublishRequest) -> Result<()> {
    if !request.snapshot.is_dir() {
        return Err(Error::Validation(format!(
            "snapshot directory '{}' does not exist",
            request.snapshot.display()
        )));
    }

    let config = DestinationConfig {
        url: request.destination.url.clone(),
        destination_ref: request.destination.destination_ref.clone(),
        pr_branch: request.pr_branch,
        title: request.title,
        body: request.body,
        create_pull_request: request.create_pull_request,
        ..DestinationConfig::default()
    };
    let git_options = GitOptions {
        committer_name: request.committer_name,
        committer_email: request.committer_email,
        remote_url: request.destination.remote_url.clone(),
        first_commit: request.first_commit,
    };
    let github_options = GitHubOptions {
        api_url: request.destination.api_url.clone(),
        token: None,
    };

    let destination = PrDestination::new(config, git_options.clone())?;
    debug!("Destination: {:?}", destination.describe());

    // Only resolve credentials when the API will actually be called
    let platform: Arc<dyn PlatformService> =
        if destination.config().create_pull_request && !request.dry_run {
            create_platform_service(destination.platform_config(), &github_options).await?
        } else {
            Arc::new(GitHubService::new(
                &github_options,
                destination.project_name(),
            )?)
        };
    let backend: Arc<dyn GitBackend> = Arc::new(CliGit::new(&git_options));

    let mut revision = OriginRevision::new(request.revision);
    if let Some(reference) = request.context_reference {
        revision = revision.with_context_reference(reference);
    }
    let revision = Arc::new(revision);

    let context = WriterContext::new(request.workflow, request.identity_user, revision.clone())
        .with_destination_files(Glob::new(request.files, Vec::<String>::new())?)
        .with_dry_run(request.dry_run);

    let mut writer = destination.new_writer(context, platform, backend).await?;

    println!(
        "Publishing {} to {} (base: {})",
        revision.id.accent(),
        writer.branch().accent(),
        writer.base().accent()
    );
    println!();

    let snapshot = TransformResult::new(request.snapshot, revision, request.label, request.summary);
    let result = writer.write(&snapshot, &CliProgress).await?;

    println!();
    if result.pushed {
        println!("Pushed {} to {}", result.commit.accent(), result.branch.accent());
    } else {
        println!("Built {} (not pushed)", result.commit.accent());
    }
    if let Some(pr) = result.pull_request {
        let verb = if result.created_pr { "Created" } else { "Existing" };
        println!("{verb} PR #{}: {}", pr.number, pr.title.muted());
    }

    Ok(())
}
