//! In-memory [`Transport`] answering from a script.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use storedesk_client::{ApiError, Method, Transport};
use storedesk_models::Envelope;
use tokio::sync::oneshot;

type Reply = Result<Envelope, ApiError>;

enum Scripted {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// A request the transport received.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    /// Verb used.
    pub method: Method,
    /// Path relative to the API base.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<Value>,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Scripted>,
    calls: Vec<RecordedCall>,
}

/// Transport that replays queued replies in call order and records requests.
///
/// An exhausted script answers with a network error so tests fail loudly
/// instead of hanging.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
}

impl ScriptedTransport {
    /// Empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an arbitrary reply.
    pub fn reply(&self, reply: Result<Envelope, ApiError>) {
        self.script().replies.push_back(Scripted::Ready(reply));
    }

    /// Queue `{ success: true, data }`.
    pub fn reply_ok(&self, data: Value) {
        self.reply(Ok(Envelope::ok(data)));
    }

    /// Queue `{ success: true }` without data.
    pub fn reply_empty(&self) {
        self.reply(Ok(Envelope::empty()));
    }

    /// Queue `{ success: false, message }`.
    pub fn reply_rejected(&self, message: &str) {
        self.reply(Ok(Envelope::rejected(message)));
    }

    /// Queue a transport-level failure.
    pub fn reply_error(&self, err: ApiError) {
        self.reply(Err(err));
    }

    /// Queue a reply the test resolves later through the returned sender.
    #[must_use]
    pub fn defer(&self) -> oneshot::Sender<Reply> {
        let (sender, receiver) = oneshot::channel();
        self.script().replies.push_back(Scripted::Deferred(receiver));
        sender
    }

    /// Requests received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.script().calls.clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.script().calls.len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Envelope, ApiError> {
        let next = {
            let mut script = self.script();
            script.calls.push(RecordedCall {
                method,
                path: path.to_string(),
                body: body.cloned(),
            });
            script.replies.pop_front()
        };

        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Deferred(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("deferred reply dropped".into()))),
            None => Err(ApiError::Network(format!(
                "no scripted reply for {method} {path}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replays_in_order_and_records_calls() {
        let transport = ScriptedTransport::new();
        transport.reply_ok(json!([1, 2]));
        transport.reply_rejected("nope");

        let first = transport.request(Method::Get, "/faqs", None).await;
        let body = json!({"question": "?"});
        let second = transport.request(Method::Post, "/faqs", Some(&body)).await;
        let third = transport.request(Method::Get, "/faqs", None).await;

        assert_eq!(first, Ok(Envelope::ok(json!([1, 2]))));
        assert_eq!(second, Ok(Envelope::rejected("nope")));
        assert!(matches!(third, Err(ApiError::Network(_))));
        assert_eq!(transport.call_count(), 3);
        assert_eq!(transport.calls()[1].body, Some(body));
    }

    #[tokio::test]
    async fn deferred_reply_waits_for_sender() {
        let transport = ScriptedTransport::new();
        let sender = transport.defer();
        let (reply, ()) = tokio::join!(transport.request(Method::Get, "/tickets", None), async {
            sender.send(Ok(Envelope::empty())).expect("receiver alive");
        });
        assert_eq!(reply, Ok(Envelope::empty()));
    }
}
