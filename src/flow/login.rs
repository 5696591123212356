//! Social login entry points. Following one of these links hands the user to
//! the identity provider; the backend redirects back to `/login/success` or
//! `/onboarding` once the provider is done. Nothing here holds state.

use crate::client::ClientConfig;
use std::{fmt, str::FromStr};
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginProvider {
    Kakao,
    Naver,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown login provider: {0}")]
pub struct UnknownProvider(String);

impl LoginProvider {
    pub const ALL: [Self; 2] = [Self::Kakao, Self::Naver];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Kakao => "kakao",
            Self::Naver => "naver",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Kakao => "Continue with Kakao",
            Self::Naver => "Continue with Naver",
        }
    }

    #[must_use]
    pub fn authorization_path(self) -> String {
        format!("/oauth2/authorization/{}", self.id())
    }

    /// Where the browser goes to start login with this provider.
    ///
    /// # Errors
    /// Returns an error if the configured base cannot be combined with the path.
    pub fn authorization_url(self, config: &ClientConfig) -> Result<Url, url::ParseError> {
        config.endpoint_url(&self.authorization_path())
    }
}

impl fmt::Display for LoginProvider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.id())
    }
}

impl FromStr for LoginProvider {
    type Err = UnknownProvider;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.id().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownProvider(value.to_string()))
    }
}
