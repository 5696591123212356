use super::{login, onboarding, view, Action};
use anyhow::Result;

pub(super) async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => login::execute(&args),
        Action::View(args) => view::execute(args).await,
        Action::Onboarding(args) => onboarding::execute(args).await,
    }
}
