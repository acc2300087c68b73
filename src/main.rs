//! lander - publish transformed snapshots as GitHub pull requests
//!
//! CLI binary for the pr-lander publishing engine.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "lander")]
#[command(about = "Land transformed snapshots as GitHub pull requests")]
#[command(version)]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Destination flags shared by publish and status
#[derive(Args, Clone)]
pub struct DestinationArgs {
    /// GitHub URL of the destination repository
    #[arg(long)]
    url: String,

    /// Base branch the pull request targets
    #[arg(long = "destination-ref")]
    destination_ref: Option<String>,

    /// Fetch from and push to this URL instead of the GitHub URL
    #[arg(long)]
    remote_url: Option<String>,

    /// GitHub REST API URL
    #[arg(long, env = "GITHUB_API_URL", default_value = pr_lander::config::DEFAULT_API_URL)]
    api_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a snapshot directory to the PR branch
    Publish {
        #[command(flatten)]
        destination: DestinationArgs,

        /// Directory holding the transformed snapshot
        #[arg(long)]
        snapshot: PathBuf,

        /// Origin revision identifier
        #[arg(long)]
        revision: String,

        /// Origin context reference used to derive the branch name
        #[arg(long)]
        context_reference: Option<String>,

        /// Label name of the identity trailer
        #[arg(long, default_value = "GitOrigin-RevId")]
        label: String,

        /// Change summary used as commit message
        #[arg(long)]
        summary: String,

        /// Workflow name
        #[arg(long, default_value = "default")]
        workflow: String,

        /// Workflow identity user
        #[arg(long, env = "USER", default_value = "lander")]
        identity_user: String,

        /// Explicit PR branch name
        #[arg(long)]
        pr_branch: Option<String>,

        /// Fixed PR title
        #[arg(long)]
        title: Option<String>,

        /// Fixed PR body
        #[arg(long)]
        body: Option<String>,

        /// Push the branch without creating a pull request
        #[arg(long)]
        no_pull_request: bool,

        /// Glob of destination files owned by the snapshot
        #[arg(long = "files", default_value = "**")]
        files: Vec<String>,

        /// Allow pushing when the base branch does not exist
        #[arg(long)]
        first_commit: bool,

        /// Committer name
        #[arg(long, default_value = "pr-lander")]
        committer_name: String,

        /// Committer email
        #[arg(long, default_value = "pr-lander@localhost")]
        committer_email: String,

        /// Dry run - build the commit without pushing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the baseline recorded on the base branch
    Status {
        #[command(flatten)]
        destination: DestinationArgs,

        /// Label name of the identity trailer
        #[arg(long, default_value = "GitOrigin-RevId")]
        label: String,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication
    Test {
        /// GitHub REST API URL
        #[arg(long, env = "GITHUB_API_URL", default_value = pr_lander::config::DEFAULT_API_URL)]
        api_url: String,
    },
    /// Show authentication setup instructions
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Publish {
            destination,
            snapshot,
            revision,
            context_reference,
            label,
            summary,
            workflow,
            identity_user,
            pr_branch,
            title,
            body,
            no_pull_request,
            files,
            first_commit,
            committer_name,
            committer_email,
            dry_run,
        } => {
            let request = cli::PublishRequest {
                destination,
                snapshot,
                revision,
                context_reference,
                label,
                summary,
                workflow,
                identity_user,
                pr_branch,
                title,
                body,
                create_pull_request: !no_pull_request,
                files,
                first_commit,
                committer_name,
                committer_email,
                dry_run,
            };
            cli::run_publish(request).await?;
        }
        Commands::Status { destination, label } => {
            cli::run_status(&destination, &label).await?;
        }
        Commands::Auth { action } => match action {
            AuthAction::Test { api_url } => cli::run_auth_test(&api_url).await?,
            AuthAction::Setup => cli::run_auth_setup(),
        },
    }

    Ok(())
}
