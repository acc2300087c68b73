//! CLI progress callback with styled output

use crate::cli::style::{Stream, Stylize, check, cross, hyperlink_url};
use anstream::{eprintln, println};
use async_trait::async_trait;
use pr_lander::publish::{Phase, ProgressCallback, PushStatus};
use pr_lander::types::PullRequest;

/// CLI progress callback that prints to stdout
pub struct CliProgress;

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::Complete => println!("{}", phase.to_string().success()),
            _ => println!("{}...", phase.to_string().emphasis()),
        }
    }

    async fn on_push(&self, branch: &str, status: PushStatus) {
        match &status {
            PushStatus::Started => println!("  Pushing {}...", branch.accent()),
            PushStatus::Success | PushStatus::Forced => {
                println!("  {} {} {}", check(), branch.emphasis(), status.to_string().muted());
            }
            PushStatus::Skipped => {
                println!("  {} {} {}", "-".muted(), branch.accent(), status.to_string().muted());
            }
            PushStatus::Failed(_) => {
                eprintln!(
                    "  {} {}: {}",
                    cross(),
                    branch.accent().for_stderr(),
                    status.to_string().error()
                );
            }
        }
    }

    async fn on_pr_created(&self, _branch: &str, pr: &PullRequest, url: &str) {
        let pr_num = format!("#{}", pr.number);
        println!(
            "  {} Created PR {} {}",
            check(),
            pr_num.accent(),
            hyperlink_url(Stream::Stdout, url)
        );
    }

    async fn on_pr_found(&self, branch: &str, pr: &PullRequest, url: &str) {
        let pr_num = format!("#{}", pr.number);
        println!(
            "  {} PR {} already tracks {} ({})",
            "-".muted(),
            pr_num.accent(),
            branch.accent(),
            hyperlink_url(Stream::Stdout, url)
        );
    }

    async fn on_message(&self, message: &str) {
        println!("  {}", message.muted());
    }
}
