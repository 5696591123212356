//! Map validated CLI matches to the action for the chosen stage.

use crate::cli::actions::{login, onboarding, view, Action};
use crate::cli::commands::{ARG_NICKNAME, ARG_REDIRECT_DELAY_MS, ARG_TARGET};
use crate::cli::globals::GlobalArgs;
use crate::flow::{Stage, DEFAULT_REDIRECT_DELAY};
use anyhow::{anyhow, Result};
use std::time::Duration;
use url::Url;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if no known subcommand was given.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let (name, sub_m) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing subcommand"))?;
    let globals = GlobalArgs::from_matches(sub_m);

    match name {
        "login" => Ok(Action::Login(login::Args { globals })),
        "login-success" => Ok(Action::View(view::Args {
            globals,
            stage: Stage::LoginSuccess,
        })),
        "onboarding" => {
            let redirect_delay = sub_m
                .get_one::<u64>(ARG_REDIRECT_DELAY_MS)
                .map_or(DEFAULT_REDIRECT_DELAY, |ms| Duration::from_millis(*ms));

            Ok(Action::Onboarding(onboarding::Args {
                globals,
                nickname: sub_m.get_one::<String>(ARG_NICKNAME).cloned(),
                redirect_delay,
            }))
        }
        "me" => Ok(Action::View(view::Args {
            globals,
            stage: Stage::Me,
        })),
        "open" => {
            let target = sub_m
                .get_one::<String>(ARG_TARGET)
                .ok_or_else(|| anyhow!("missing route to open"))?;
            Ok(stage_action(resolve_stage(target)?, globals))
        }
        other => Err(anyhow!("unknown subcommand: {other}")),
    }
}

/// Accepts a stage id (`me`), a route (`/login/success`) or a full redirect URL.
fn resolve_stage(target: &str) -> Result<Stage> {
    if let Ok(stage) = target.parse::<Stage>() {
        return Ok(stage);
    }
    let path = Url::parse(target.trim())
        .map_or_else(|_| target.to_string(), |url| url.path().to_string());
    Stage::from_path(&path).ok_or_else(|| anyhow!("no stage serves {target}"))
}

fn stage_action(stage: Stage, globals: GlobalArgs) -> Action {
    match stage {
        Stage::Landing => Action::Login(login::Args { globals }),
        Stage::Onboarding => Action::Onboarding(onboarding::Args {
            globals,
            nickname: None,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }),
        Stage::LoginSuccess | Stage::Me => Action::View(view::Args { globals, stage }),
    }
}
