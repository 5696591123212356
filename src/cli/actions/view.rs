use crate::cli::globals::GlobalArgs;
use crate::flow::{SessionFlow, Stage, ViewState};
use anyhow::{anyhow, bail, Result};
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub stage: Stage,
}

/// Enter a read-only stage and print what it loaded.
///
/// # Errors
/// Returns an error if the transport cannot be built or the stage fails.
pub async fn execute(args: Args) -> Result<()> {
    if !matches!(args.stage, Stage::LoginSuccess | Stage::Me) {
        bail!("{} is not a read-only stage", args.stage);
    }
    let transport = Arc::new(args.globals.transport()?);
    let (flow, _intents) = SessionFlow::new(transport);

    flow.navigate(args.stage).await;

    let state = if args.stage == Stage::Me {
        flow.profile().state()
    } else {
        flow.login_success().state()
    };

    println!("{}", render(args.stage, &state)?);
    Ok(())
}

/// Text for a settled view, or the stage's error.
pub(crate) fn render(stage: Stage, state: &ViewState) -> Result<String> {
    match state {
        ViewState::Loaded(data) => Ok(data.to_string()),
        ViewState::Failed(err) => Err(anyhow!("{stage}: {err}")),
        ViewState::Idle | ViewState::Loading => Err(anyhow!("{stage}: nothing loaded")),
    }
}
