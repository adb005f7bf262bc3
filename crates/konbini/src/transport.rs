//! Transport abstraction for credential renewal.
//!
//! The session never speaks HTTP itself. An implementation sends
//! `PATCH {service}/auth/refresh` with the refresh token as bearer and maps
//! the reply with [`crate::api::read_refresh_response`].

use async_trait::async_trait;
use konbini_auth::RefreshError;

/// Exchanges a refresh token for a new access token.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait AuthTransport: Send + Sync {
    /// Return the new access token, or say whether the refresh token was
    /// refused ([`RefreshError::Rejected`]) or the call just failed
    /// ([`RefreshError::Transient`]).
    async fn refresh(&self, refresh_token: &str) -> Result<String, RefreshError>;
}

/// A scripted transport for testing.
pub mod memory {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::sync::Mutex;

    /// Replays queued replies in order and counts calls.
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<String, RefreshError>>>,
        seen: Mutex<Vec<String>>,
        calls: AtomicUsize,
        latency: Option<Duration>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Sleep this long inside every call.
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        /// Queue the outcome of the next unanswered call.
        pub fn reply(mut self, reply: Result<String, RefreshError>) -> Self {
            self.replies.get_mut().push_back(reply);
            self
        }

        /// Number of refresh calls made so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Refresh tokens received, in call order.
        pub async fn seen(&self) -> Vec<String> {
            self.seen.lock().await.clone()
        }
    }

    #[async_trait]
    impl AuthTransport for ScriptedTransport {
        async fn refresh(&self, refresh_token: &str) -> Result<String, RefreshError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().await.push(refresh_token.to_string());

            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }

            self.replies
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Err(RefreshError::Transient("no scripted reply".into())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::ScriptedTransport;
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let transport = ScriptedTransport::new()
            .reply(Ok("first".into()))
            .reply(Err(RefreshError::Rejected("401".into())));

        assert_eq!(transport.refresh("r1").await, Ok("first".to_string()));
        assert!(matches!(transport.refresh("r2").await, Err(RefreshError::Rejected(_))));
        assert!(matches!(transport.refresh("r3").await, Err(RefreshError::Transient(_))));

        assert_eq!(transport.calls(), 3);
        assert_eq!(transport.seen().await, vec!["r1", "r2", "r3"]);
    }
}
