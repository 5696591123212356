use crate::cli::commands::client::{ARG_API_BASE, ARG_ORIGIN, ARG_SESSION_COOKIE};
use crate::client::{ClientConfig, HttpTransport, DEFAULT_ORIGIN};
use anyhow::Result;
use secrecy::SecretString;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Options every subcommand shares.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub origin: String,
    pub api_base: Option<String>,
    pub session_cookie: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(origin: String) -> Self {
        Self {
            origin,
            api_base: None,
            session_cookie: None,
        }
    }

    #[must_use]
    pub fn from_matches(matches: &clap::ArgMatches) -> Self {
        let origin = matches
            .get_one::<String>(ARG_ORIGIN)
            .cloned()
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        Self {
            origin,
            api_base: matches.get_one::<String>(ARG_API_BASE).cloned(),
            session_cookie: matches
                .get_one::<String>(ARG_SESSION_COOKIE)
                .map(|cookie| SecretString::from(cookie.clone())),
        }
    }

    pub fn set_session_cookie(&mut self, cookie: SecretString) {
        self.session_cookie = Some(cookie);
    }

    /// # Errors
    /// Returns an error if the origin or API base is not a usable URL.
    pub fn client_config(&self) -> Result<ClientConfig> {
        ClientConfig::new(&self.origin, self.api_base.as_deref())
    }

    /// # Errors
    /// Returns an error if the config is invalid or the HTTP client cannot be built.
    pub fn transport(&self) -> Result<HttpTransport> {
        HttpTransport::new(
            USER_AGENT,
            self.client_config()?,
            self.session_cookie.as_ref(),
        )
    }
}
