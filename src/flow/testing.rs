//! In-memory transport for flow tests. Replies are queued in call order and can
//! be held back until the test releases them.

use crate::client::{FlowError, Method, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::oneshot;

type Reply = Result<Value, FlowError>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a reply that resolves immediately.
    pub(crate) fn reply(&self, reply: Reply) {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(reply);
        self.replies.lock().unwrap().push_back(receiver);
    }

    /// Queue a reply that resolves when the returned sender fires.
    pub(crate) fn gate(&self) -> oneshot::Sender<Reply> {
        let (sender, receiver) = oneshot::channel();
        self.replies.lock().unwrap().push_back(receiver);
        sender
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, FlowError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        let receiver = self.replies.lock().unwrap().pop_front();

        match receiver {
            Some(receiver) => receiver.await.unwrap_or_else(|_| {
                Err(FlowError::Network {
                    cause: "scripted reply dropped".to_string(),
                })
            }),
            None => Err(FlowError::Network {
                cause: format!("no scripted reply for {path}"),
            }),
        }
    }
}

/// Yield until `transport` has seen `count` requests.
pub(crate) async fn wait_for_calls(transport: &ScriptedTransport, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while transport.calls() < count {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
}
