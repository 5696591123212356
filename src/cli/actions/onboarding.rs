use super::view;
use crate::cli::globals::GlobalArgs;
use crate::flow::{OnboardingForm, OnboardingState, SessionFlow, Stage};
use anyhow::{anyhow, Context, Result};
use std::{sync::Arc, time::Duration};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub nickname: Option<String>,
    pub redirect_delay: Duration,
}

/// Show the pending registration; with a nickname, confirm it and follow the
/// flow on to the profile.
///
/// # Errors
/// Returns an error if the transport cannot be built, the pending lookup fails,
/// or the submission is rejected.
pub async fn execute(args: Args) -> Result<()> {
    let transport = Arc::new(args.globals.transport()?);
    let (flow, mut intents) = SessionFlow::with_redirect_delay(transport, args.redirect_delay);

    flow.navigate(Stage::Onboarding).await;
    let state = flow.onboarding().state();
    let form = match &state {
        OnboardingState::Ready(form) => form,
        OnboardingState::Failed(err) => return Err(anyhow!("onboarding: {err}")),
        other => return Err(anyhow!("onboarding: unexpected state {other:?}")),
    };
    print!("{}", render_form(form));

    let Some(nickname) = args.nickname else {
        return Ok(());
    };

    let result = flow
        .onboarding()
        .submit_nickname(&nickname)
        .await
        .context("onboarding submit failed")?;
    println!("{result}");

    if let Some(next) = intents.next().await {
        debug!(to = %next, "following navigation intent");
        flow.navigate(next).await;
        println!("{}", view::render(next, &flow.profile().state())?);
    }

    Ok(())
}

pub(crate) fn render_form(form: &OnboardingForm) -> String {
    let mut out = String::new();
    if form.no_pending() {
        out.push_str("No pending registration in this session.\n");
    }
    out.push_str(&format!(
        "User name: {}\nNickname:  {}\n",
        form.user_nm.as_deref().unwrap_or("-"),
        form.nickname
    ));
    out
}
