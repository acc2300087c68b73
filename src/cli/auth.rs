//! Auth command - test and explain authentication

use anstream::println;
use pr_lander::auth::{get_github_auth, test_github_auth};
use pr_lander::error::Result;

use crate::cli::style::{Stylize, check};

/// Run the auth test command
pub async fn run_auth_test(api_url: &str) -> Result<()> {
    println!("Testing GitHub authentication...");
    let config = get_github_auth().await?;
    let username = test_github_auth(&config, api_url).await?;
    println!("{} Authenticated as: {}", check(), username.accent());
    println!("  Token source: {}", format!("{:?}", config.source).muted());
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup() {
    println!("{}", "GitHub Authentication Setup".emphasis());
    println!();
    println!("Option 1: Environment variable");
    println!("  Set GITHUB_TOKEN or GH_TOKEN");
    println!();
    println!("Option 2: GitHub CLI");
    println!("  Install: https://cli.github.com/");
    println!("  Run: gh auth login");
    println!();
    println!("For GitHub Enterprise:");
    println!("  Set GH_HOST to your instance hostname and GITHUB_API_URL to its API");
}
