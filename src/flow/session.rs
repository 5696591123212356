//! Owns the stages and moves between them.

use super::{
    generation::{lock, Outcome},
    onboarding::{OnboardingStage, DEFAULT_REDIRECT_DELAY},
    view::ViewStage,
    Stage,
};
use crate::client::Transport;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};
use tracing::debug;

/// Navigation requests raised by the stages themselves (a confirmed onboarding
/// asks for [`Stage::Me`]). The presentation layer owns this and acts on it.
#[derive(Debug)]
pub struct NavigationIntents(UnboundedReceiver<Stage>);

impl NavigationIntents {
    /// Wait for the next intent. `None` once the flow is dropped.
    pub async fn next(&mut self) -> Option<Stage> {
        self.0.recv().await
    }

    /// The next intent if one is already queued.
    pub fn try_next(&mut self) -> Option<Stage> {
        match self.0.try_recv() {
            Ok(stage) => Some(stage),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

pub struct SessionFlow<T> {
    login_success: ViewStage<T>,
    onboarding: OnboardingStage<T>,
    profile: ViewStage<T>,
    current: Mutex<Stage>,
}

impl<T: Transport> SessionFlow<T> {
    /// Build a flow positioned on [`Stage::Landing`] with the default redirect delay.
    #[must_use]
    pub fn new(transport: Arc<T>) -> (Self, NavigationIntents) {
        Self::with_redirect_delay(transport, DEFAULT_REDIRECT_DELAY)
    }

    #[must_use]
    pub fn with_redirect_delay(
        transport: Arc<T>,
        redirect_delay: Duration,
    ) -> (Self, NavigationIntents) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let flow = Self {
            login_success: ViewStage::login_success(Arc::clone(&transport)),
            onboarding: OnboardingStage::new(Arc::clone(&transport), sender, redirect_delay),
            profile: ViewStage::profile(transport),
            current: Mutex::new(Stage::Landing),
        };
        (flow, NavigationIntents(receiver))
    }

    #[must_use]
    pub fn current(&self) -> Stage {
        *lock(&self.current)
    }

    #[must_use]
    pub fn login_success(&self) -> &ViewStage<T> {
        &self.login_success
    }

    #[must_use]
    pub fn onboarding(&self) -> &OnboardingStage<T> {
        &self.onboarding
    }

    #[must_use]
    pub fn profile(&self) -> &ViewStage<T> {
        &self.profile
    }

    /// Move to `to`, leaving the current stage first when it differs.
    ///
    /// Leaving a stage invalidates whatever it still has in flight. Entering
    /// re-issues the target's fetch from scratch unless the same activation is
    /// already loading.
    pub async fn navigate(&self, to: Stage) -> Outcome {
        let from = std::mem::replace(&mut *lock(&self.current), to);
        if from != to {
            self.leave(from);
        }
        debug!(from = %from, to = %to, "navigating");

        match to {
            Stage::Landing => Outcome::Applied,
            Stage::LoginSuccess => self.login_success.enter().await,
            Stage::Onboarding => self.onboarding.enter().await,
            Stage::Me => self.profile.enter().await,
        }
    }

    fn leave(&self, stage: Stage) {
        match stage {
            Stage::Landing => {}
            Stage::LoginSuccess => self.login_success.exit(),
            Stage::Onboarding => self.onboarding.exit(),
            Stage::Me => self.profile.exit(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::SessionFlow;
    use crate::client::FlowError;
    use crate::flow::{
        testing::{wait_for_calls, ScriptedTransport},
        OnboardingState, Outcome, Stage, ViewState,
    };
    use serde_json::json;
    use std::{sync::Arc, time::Duration};

    #[tokio::test]
    async fn starts_on_landing_without_requests() {
        let transport = ScriptedTransport::new();
        let (flow, mut intents) = SessionFlow::new(Arc::clone(&transport));

        assert_eq!(flow.current(), Stage::Landing);
        assert_eq!(flow.navigate(Stage::Landing).await, Outcome::Applied);
        assert_eq!(transport.calls(), 0);
        assert_eq!(intents.try_next(), None);
    }

    #[tokio::test]
    async fn onboarding_submit_leads_to_profile() {
        let transport = ScriptedTransport::new();
        transport.reply(Ok(json!({"suggestedNickname": "abc", "userNm": "u1"})));
        transport.reply(Ok(json!({"ok": true})));
        transport.reply(Ok(json!({"nickname": "abc"})));
        let (flow, mut intents) =
            SessionFlow::with_redirect_delay(Arc::clone(&transport), Duration::ZERO);

        flow.navigate(Stage::Onboarding).await;
        flow.onboarding().submit_nickname("abc").await.unwrap();

        let next = intents.next().await.unwrap();
        assert_eq!(next, Stage::Me);
        assert_eq!(intents.try_next(), None);

        flow.navigate(next).await;
        assert_eq!(flow.current(), Stage::Me);
        assert_eq!(flow.onboarding().state(), OnboardingState::Idle);
        assert_eq!(
            flow.profile().state().loaded().map(|data| data.as_json().clone()),
            Some(json!({"nickname": "abc"}))
        );
    }

    #[tokio::test]
    async fn failure_in_one_stage_leaves_others_alone() {
        let transport = ScriptedTransport::new();
        transport.reply(Ok(json!({"provider": "kakao"})));
        transport.reply(Err(FlowError::Http {
            status: 401,
            status_text: "Unauthorized".to_string(),
        }));
        let (flow, _intents) = SessionFlow::new(Arc::clone(&transport));

        flow.navigate(Stage::LoginSuccess).await;
        let before_leaving = flow.login_success().state();
        flow.navigate(Stage::Me).await;

        assert_eq!(
            flow.profile().state().error().and_then(FlowError::status),
            Some(401)
        );
        // Leaving resets the stage; it keeps nothing across activations.
        assert_eq!(flow.login_success().state(), ViewState::Idle);
        assert!(before_leaving.loaded().is_some());
    }

    #[tokio::test]
    async fn navigating_away_discards_in_flight_fetch() {
        let transport = ScriptedTransport::new();
        let release = transport.gate();
        let (flow, _intents) = SessionFlow::new(Arc::clone(&transport));
        let flow = Arc::new(flow);

        let pending = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.navigate(Stage::Me).await }
        });
        wait_for_calls(&transport, 1).await;

        assert_eq!(flow.navigate(Stage::Landing).await, Outcome::Applied);
        release.send(Ok(json!({"late": true}))).unwrap();

        assert_eq!(pending.await.unwrap(), Outcome::Discarded);
        assert_eq!(flow.profile().state(), ViewState::Idle);
        assert_eq!(flow.current(), Stage::Landing);
    }

    #[tokio::test]
    async fn renavigating_while_loading_does_not_refetch() {
        let transport = ScriptedTransport::new();
        let release = transport.gate();
        let (flow, _intents) = SessionFlow::new(Arc::clone(&transport));
        let flow = Arc::new(flow);

        let first = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.navigate(Stage::LoginSuccess).await }
        });
        wait_for_calls(&transport, 1).await;

        assert_eq!(flow.navigate(Stage::LoginSuccess).await, Outcome::InFlight);
        release.send(Ok(json!({}))).unwrap();
        assert_eq!(first.await.unwrap(), Outcome::Applied);
        assert_eq!(transport.calls(), 1);
    }
}
