//! Onboarding stage: turn the pending registration held in the server session
//! into a durable profile by confirming a nickname.
//!
//! Entry loads `GET /onboarding`, which is either `{"status": "NO_PENDING"}` or
//! a pending record whose `suggestedNickname` seeds the editable field and whose
//! `userNm` is shown read-only. Submitting posts `{"nickname": ...}` once per
//! user action and, on success, asks the presentation layer to move on to the
//! profile stage after a short delay.

use super::{
    generation::{lock, Generation, Outcome, StageSlot},
    nickname::{NicknameError, OnboardingSubmission},
    view::OpaqueJson,
    Stage,
};
use crate::client::{FlowError, Transport};
use serde_json::{Map, Value};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

pub const ONBOARDING_PATH: &str = "/onboarding";
/// Status value the backend uses when the session holds no pending registration.
pub const NO_PENDING_STATUS: &str = "NO_PENDING";
/// Pause between a confirmed submission and the move to the profile stage.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(400);

const SUGGESTED_NICKNAME_KEY: &str = "suggestedNickname";
const USER_NAME_KEY: &str = "userNm";

/// Response of `POST /onboarding`.
pub type OnboardingResult = OpaqueJson;

/// Registration data waiting in the session for a nickname.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PendingRecord {
    pub suggested_nickname: Option<String>,
    pub user_nm: Option<String>,
    /// Everything else the backend sent, untouched.
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PendingProfile {
    NoPending,
    Pending(PendingRecord),
}

impl PendingProfile {
    /// Classify a `GET /onboarding` body by field presence.
    ///
    /// Non-object bodies carry nothing usable and become an empty record.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::Pending(PendingRecord::default());
        };

        if fields.get("status").and_then(Value::as_str) == Some(NO_PENDING_STATUS) {
            return Self::NoPending;
        }

        let suggested_nickname = take_string(&mut fields, SUGGESTED_NICKNAME_KEY);
        let user_nm = take_string(&mut fields, USER_NAME_KEY);

        Self::Pending(PendingRecord {
            suggested_nickname,
            user_nm,
            extra: fields,
        })
    }

    #[must_use]
    pub fn is_no_pending(&self) -> bool {
        matches!(self, Self::NoPending)
    }
}

// Non-string values are left in place as opaque data.
fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(_)) => match fields.remove(key) {
            Some(Value::String(value)) => Some(value),
            _ => None,
        },
        _ => None,
    }
}

/// What the onboarding form shows.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingForm {
    /// Editable; seeded from `suggestedNickname`, then whatever was last submitted.
    pub nickname: String,
    /// Read-only; never sent back.
    pub user_nm: Option<String>,
    pub pending: PendingProfile,
}

impl OnboardingForm {
    #[must_use]
    pub fn from_pending(pending: PendingProfile) -> Self {
        let (nickname, user_nm) = match &pending {
            PendingProfile::NoPending => (String::new(), None),
            PendingProfile::Pending(record) => (
                record.suggested_nickname.clone().unwrap_or_default(),
                record.user_nm.clone(),
            ),
        };
        Self {
            nickname,
            user_nm,
            pending,
        }
    }

    /// Informational: the session had nothing waiting for confirmation.
    #[must_use]
    pub fn no_pending(&self) -> bool {
        self.pending.is_no_pending()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingState {
    Idle,
    Loading,
    Ready(OnboardingForm),
    Failed(FlowError),
    Submitting(OnboardingForm),
    Submitted {
        form: OnboardingForm,
        result: OnboardingResult,
    },
    SubmitFailed {
        form: OnboardingForm,
        error: FlowError,
    },
}

impl OnboardingState {
    #[must_use]
    pub fn form(&self) -> Option<&OnboardingForm> {
        match self {
            Self::Ready(form)
            | Self::Submitting(form)
            | Self::Submitted { form, .. }
            | Self::SubmitFailed { form, .. } => Some(form),
            Self::Idle | Self::Loading | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&FlowError> {
        match self {
            Self::Failed(error) | Self::SubmitFailed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// A request for this activation has not settled yet.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::Submitting(_))
    }
}

/// Why `submit_nickname` did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] NicknameError),
    #[error("a nickname submission is already in flight")]
    Busy,
    #[error("onboarding form is not ready")]
    NotReady,
    #[error("onboarding was left before the submission settled")]
    Discarded,
    #[error(transparent)]
    Failed(FlowError),
}

pub struct OnboardingStage<T> {
    transport: Arc<T>,
    slot: Arc<Mutex<StageSlot<OnboardingState>>>,
    navigation: UnboundedSender<Stage>,
    redirect_delay: Duration,
}

impl<T: Transport> OnboardingStage<T> {
    /// `navigation` receives the move to [`Stage::Me`] after a confirmed submit.
    #[must_use]
    pub fn new(
        transport: Arc<T>,
        navigation: UnboundedSender<Stage>,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            transport,
            slot: Arc::new(Mutex::new(StageSlot::new(OnboardingState::Idle))),
            navigation,
            redirect_delay,
        }
    }

    #[must_use]
    pub fn state(&self) -> OnboardingState {
        lock(&self.slot).state().clone()
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        lock(&self.slot).generation()
    }

    /// Enter the stage and load the pending registration.
    ///
    /// Returns [`Outcome::InFlight`] without sending anything while a load or a
    /// submission of the current activation is still pending.
    pub async fn enter(&self) -> Outcome {
        let token = {
            let mut slot = lock(&self.slot);
            if slot.state().is_busy() {
                debug!(stage = "onboarding", "request already in flight");
                return Outcome::InFlight;
            }
            slot.begin(OnboardingState::Loading)
        };
        debug!(
            stage = "onboarding",
            generation = token.value(),
            "stage entered"
        );

        let next = match self.transport.get_json(ONBOARDING_PATH).await {
            Ok(value) => {
                let form = OnboardingForm::from_pending(PendingProfile::from_json(value));
                if form.no_pending() {
                    info!("no pending registration in session");
                }
                OnboardingState::Ready(form)
            }
            Err(err) => {
                debug!(stage = "onboarding", error = %err, "pending lookup failed");
                OnboardingState::Failed(err)
            }
        };

        let outcome = lock(&self.slot).settle(token, next);
        if outcome == Outcome::Discarded {
            warn!(
                stage = "onboarding",
                generation = token.value(),
                "discarding pending lookup from a previous activation"
            );
        }
        outcome
    }

    /// Confirm the pending registration with `raw` as the nickname.
    ///
    /// Validation happens first and never reaches the network. Then the form
    /// must be `Ready` or `SubmitFailed`; a call while a submission is in flight
    /// is rejected as `Busy`.
    ///
    /// # Errors
    /// Returns `SubmitError` if the nickname is invalid, the form is busy or not
    /// ready, the stage was left mid-request, or the backend rejected the request.
    pub async fn submit_nickname(&self, raw: &str) -> Result<OnboardingResult, SubmitError> {
        let submission = OnboardingSubmission::parse(raw)?;

        let (token, form) = {
            let mut slot = lock(&self.slot);
            let form = match slot.state() {
                OnboardingState::Ready(form) | OnboardingState::SubmitFailed { form, .. } => {
                    OnboardingForm {
                        nickname: raw.to_string(),
                        ..form.clone()
                    }
                }
                OnboardingState::Submitting(_) => return Err(SubmitError::Busy),
                _ => return Err(SubmitError::NotReady),
            };
            let token = slot.transition(OnboardingState::Submitting(form.clone()));
            (token, form)
        };
        debug!(
            stage = "onboarding",
            generation = token.value(),
            "submitting nickname"
        );

        let response = self
            .transport
            .post_json(ONBOARDING_PATH, &submission.to_json())
            .await;

        match response {
            Ok(value) => {
                let result = OnboardingResult::from(value);
                let next = OnboardingState::Submitted {
                    form,
                    result: result.clone(),
                };
                if lock(&self.slot).settle(token, next) == Outcome::Discarded {
                    warn!(stage = "onboarding", "discarding submission result");
                    return Err(SubmitError::Discarded);
                }
                info!("onboarding confirmed");
                self.schedule_navigation(token);
                Ok(result)
            }
            Err(err) => {
                let next = OnboardingState::SubmitFailed {
                    form,
                    error: err.clone(),
                };
                if lock(&self.slot).settle(token, next) == Outcome::Discarded {
                    warn!(stage = "onboarding", "discarding submission failure");
                    return Err(SubmitError::Discarded);
                }
                Err(SubmitError::Failed(err))
            }
        }
    }

    /// Leave the stage. Anything still in flight will be discarded.
    pub fn exit(&self) {
        lock(&self.slot).reset(OnboardingState::Idle);
        debug!(stage = "onboarding", "stage exited");
    }

    /// The intent is dropped if the stage was left before the delay ran out.
    fn schedule_navigation(&self, token: Generation) {
        let navigation = self.navigation.clone();
        let delay = self.redirect_delay;

        if delay.is_zero() {
            send_navigation(&navigation);
        } else {
            let slot = Arc::clone(&self.slot);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let current = lock(&slot).is_current(token);
                if current {
                    send_navigation(&navigation);
                } else {
                    debug!(
                        stage = "onboarding",
                        generation = token.value(),
                        "stage left before redirect; dropping navigation"
                    );
                }
            });
        }
    }
}

fn send_navigation(navigation: &UnboundedSender<Stage>) {
    if navigation.send(Stage::Me).is_err() {
        debug!("navigation receiver dropped; staying on onboarding");
    }
}
