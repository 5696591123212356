pub mod login;
pub mod onboarding;
pub mod view;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    View(view::Args),
    Onboarding(onboarding::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails or its stage ends in a failure state.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
