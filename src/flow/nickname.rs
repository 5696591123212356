use serde_json::{json, Value};
use thiserror::Error;

/// Longest nickname the onboarding form accepts, in characters.
pub const MAX_NICKNAME_CHARS: usize = 30;

/// A nickname rejected before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NicknameError {
    #[error("nickname is required")]
    Empty,
    #[error("nickname must be at most {max} characters (got {length})")]
    TooLong { length: usize, max: usize },
}

/// Body of `POST /onboarding`: a trimmed nickname of 1..=30 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingSubmission {
    nickname: String,
}

impl OnboardingSubmission {
    /// Validate what the user typed.
    ///
    /// # Errors
    /// Returns `NicknameError` if the trimmed input is empty or too long.
    pub fn parse(raw: &str) -> Result<Self, NicknameError> {
        let nickname = raw.trim();
        let length = nickname.chars().count();

        if length == 0 {
            return Err(NicknameError::Empty);
        }
        if length > MAX_NICKNAME_CHARS {
            return Err(NicknameError::TooLong {
                length,
                max: MAX_NICKNAME_CHARS,
            });
        }

        Ok(Self {
            nickname: nickname.to_string(),
        })
    }

    #[must_use]
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({ "nickname": self.nickname })
    }
}
