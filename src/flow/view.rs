//! Read-only stages: fetch one document on entry and show it.
//!
//! Used for the login-success view (`GET /login/success`) and the profile view
//! (`GET /me`). Neither interprets the payload.

use super::generation::{lock, Generation, Outcome, StageSlot};
use crate::client::{FlowError, Transport};
use serde_json::Value;
use std::{fmt, sync::Arc, sync::Mutex};
use tracing::{debug, warn};

pub const LOGIN_SUCCESS_PATH: &str = "/login/success";
pub const PROFILE_PATH: &str = "/me";

/// JSON the client displays but never inspects.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueJson(Value);

impl OpaqueJson {
    #[must_use]
    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for OpaqueJson {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Pretty-printed with two-space indentation.
impl fmt::Display for OpaqueJson {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string_pretty(&self.0).map_err(|_| fmt::Error)?;
        formatter.write_str(&rendered)
    }
}

/// Response of `GET /login/success`.
pub type AuthResult = OpaqueJson;
/// Response of `GET /me`.
pub type Profile = OpaqueJson;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Loaded(OpaqueJson),
    Failed(FlowError),
}

impl ViewState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn loaded(&self) -> Option<&OpaqueJson> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&FlowError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

pub struct ViewStage<T> {
    transport: Arc<T>,
    name: &'static str,
    path: &'static str,
    slot: Mutex<StageSlot<ViewState>>,
}

impl<T: Transport> ViewStage<T> {
    #[must_use]
    pub fn new(transport: Arc<T>, name: &'static str, path: &'static str) -> Self {
        Self {
            transport,
            name,
            path,
            slot: Mutex::new(StageSlot::new(ViewState::Idle)),
        }
    }

    /// Data about the login that just completed.
    #[must_use]
    pub fn login_success(transport: Arc<T>) -> Self {
        Self::new(transport, "login-success", LOGIN_SUCCESS_PATH)
    }

    /// The authenticated user's profile.
    #[must_use]
    pub fn profile(transport: Arc<T>) -> Self {
        Self::new(transport, "me", PROFILE_PATH)
    }

    #[must_use]
    pub fn state(&self) -> ViewState {
        lock(&self.slot).state().clone()
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        lock(&self.slot).generation()
    }

    /// Enter the stage and fetch its document.
    ///
    /// Issues exactly one `GET` per activation. If the current activation is
    /// still loading, returns [`Outcome::InFlight`] without sending anything.
    pub async fn enter(&self) -> Outcome {
        let token = {
            let mut slot = lock(&self.slot);
            if slot.state().is_loading() {
                debug!(stage = self.name, "fetch already in flight");
                return Outcome::InFlight;
            }
            slot.begin(ViewState::Loading)
        };
        debug!(stage = self.name, generation = token.value(), "stage entered");

        let next = match self.transport.get_json(self.path).await {
            Ok(value) => ViewState::Loaded(OpaqueJson::from(value)),
            Err(err) => {
                debug!(stage = self.name, error = %err, "fetch failed");
                ViewState::Failed(err)
            }
        };

        let outcome = lock(&self.slot).settle(token, next);
        if outcome == Outcome::Discarded {
            warn!(
                stage = self.name,
                generation = token.value(),
                "discarding result from a previous activation"
            );
        }
        outcome
    }

    /// Leave the stage. Anything still in flight will be discarded.
    pub fn exit(&self) {
        lock(&self.slot).reset(ViewState::Idle);
        debug!(stage = self.name, "stage exited");
    }
}
