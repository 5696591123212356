//! Stage controllers for the post-login flow.
//!
//! ## Stages
//!
//! | id | path | on entry |
//! |---|---|---|
//! | `landing` | `/` | nothing; shows the provider login links |
//! | `login-success` | `/login/success` | `GET /login/success` |
//! | `onboarding` | `/onboarding` | `GET /onboarding`; submit posts the nickname |
//! | `me` | `/me` | `GET /me` |
//!
//! Stages share nothing but the server session. Each one keeps its own state
//! behind a generation token: entering or leaving a stage advances it, and a
//! request that settles under an older generation is dropped instead of being
//! applied. `Loading` and `Submitting` double as guards so a stage never has
//! two requests of the same activation in flight.

pub mod generation;
pub mod login;
pub mod nickname;
pub mod onboarding;
pub mod session;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use generation::{Generation, Outcome};
pub use login::LoginProvider;
pub use nickname::{NicknameError, OnboardingSubmission, MAX_NICKNAME_CHARS};
pub use onboarding::{
    OnboardingForm, OnboardingResult, OnboardingStage, OnboardingState, PendingProfile,
    PendingRecord, SubmitError, DEFAULT_REDIRECT_DELAY,
};
pub use session::{NavigationIntents, SessionFlow};
pub use view::{AuthResult, OpaqueJson, Profile, ViewStage, ViewState};

use std::{fmt, str::FromStr};
use thiserror::Error;

/// Navigation identifiers the presentation layer moves between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Landing,
    LoginSuccess,
    Onboarding,
    Me,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stage: {0}")]
pub struct UnknownStage(String);

impl Stage {
    pub const ALL: [Self; 4] = [Self::Landing, Self::LoginSuccess, Self::Onboarding, Self::Me];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::LoginSuccess => "login-success",
            Self::Onboarding => "onboarding",
            Self::Me => "me",
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::LoginSuccess => view::LOGIN_SUCCESS_PATH,
            Self::Onboarding => onboarding::ONBOARDING_PATH,
            Self::Me => view::PROFILE_PATH,
        }
    }

    /// Match a client route such as `/login/success` to its stage.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        Self::ALL.into_iter().find(|stage| stage.path() == path)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.id())
    }
}

impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.id() == value.trim())
            .ok_or_else(|| UnknownStage(value.to_string()))
    }
}
