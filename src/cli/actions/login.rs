use crate::cli::globals::GlobalArgs;
use crate::flow::{LoginProvider, Stage};
use anyhow::{Context, Result};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// Print one authorization link per provider.
///
/// # Errors
/// Returns an error if the configured origin or API base is invalid.
pub fn execute(args: &Args) -> Result<()> {
    let config = args.globals.client_config()?;

    println!("Login");
    for provider in LoginProvider::ALL {
        let url = provider
            .authorization_url(&config)
            .with_context(|| format!("cannot build {provider} authorization URL"))?;
        println!("  {:<22} {url}", provider.label());
    }
    println!();
    println!(
        "After login the backend redirects to {} or {}; pass that URL to `reviewhub open`.",
        Stage::LoginSuccess.path(),
        Stage::Onboarding.path()
    );

    Ok(())
}
