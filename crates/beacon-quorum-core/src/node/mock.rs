use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{NodeError, TransportError};
use crate::types::NodeIdentity;

use super::types::ApiRequest;
use super::BeaconNode;

#[derive(Clone)]
enum MockReply {
    Body(String),
    Status(u16, String),
}

/// A mock beacon node for testing. Returns canned bodies keyed by request
/// path, populated via the builder pattern. Every reply is delayed by the
/// configured latency so tests can control arrival order.
pub struct MockNode {
    identity: NodeIdentity,
    replies: HashMap<String, MockReply>,
    fallback: Option<MockReply>,
    latency: Duration,
    calls: AtomicUsize,
}

impl MockNode {
    pub fn builder(label: &str) -> MockNodeBuilder {
        MockNodeBuilder {
            identity: NodeIdentity::new(label, &format!("mock://{label}")),
            replies: HashMap::new(),
            fallback: None,
            latency: Duration::ZERO,
        }
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub struct MockNodeBuilder {
    identity: NodeIdentity,
    replies: HashMap<String, MockReply>,
    fallback: Option<MockReply>,
    latency: Duration,
}

impl MockNodeBuilder {
    pub fn with_body(mut self, path: &str, body: impl Into<String>) -> Self {
        self.replies
            .insert(path.to_owned(), MockReply::Body(body.into()));
        self
    }

    pub fn with_status(mut self, path: &str, status: u16, message: &str) -> Self {
        self.replies
            .insert(path.to_owned(), MockReply::Status(status, message.to_owned()));
        self
    }

    /// Answer every path without a specific reply with this error status.
    pub fn failing(mut self, status: u16, message: &str) -> Self {
        self.fallback = Some(MockReply::Status(status, message.to_owned()));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn build(self) -> MockNode {
        MockNode {
            identity: self.identity,
            replies: self.replies,
            fallback: self.fallback,
            latency: self.latency,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BeaconNode for MockNode {
    fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    async fn call(&self, request: &ApiRequest, deadline: Duration) -> Result<String, NodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.latency > deadline {
            tokio::time::sleep(deadline).await;
            return Err(NodeError::Timeout(deadline));
        }
        tokio::time::sleep(self.latency).await;

        let reply = self
            .replies
            .get(&request.path)
            .or(self.fallback.as_ref())
            .cloned()
            .unwrap_or_else(|| MockReply::Status(404, format!("no route for {}", request.path)));
        match reply {
            MockReply::Body(body) => Ok(body),
            MockReply::Status(status, message) => {
                Err(TransportError::Api { status, message }.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_canned_body_for_path() {
        let node = MockNode::builder("a")
            .with_body("/eth/v1/config/deposit_contract", "{}")
            .build();
        let body = node
            .call(
                &ApiRequest::get("/eth/v1/config/deposit_contract"),
                Duration::from_secs(1),
            )
            .await
            .expect("canned body");
        assert_eq!(body, "{}");
        assert_eq!(node.calls(), 1);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let node = MockNode::builder("a").build();
        let err = node
            .call(&ApiRequest::get("/missing"), Duration::from_secs(1))
            .await
            .expect_err("no route");
        assert!(matches!(
            err,
            NodeError::Transport(TransportError::Api { status: 404, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_beyond_deadline_times_out() {
        let node = MockNode::builder("slow")
            .with_body("/x", "{}")
            .with_latency(Duration::from_secs(60))
            .build();
        let err = node
            .call(&ApiRequest::get("/x"), Duration::from_secs(2))
            .await
            .expect_err("too slow");
        assert!(err.is_timeout());
    }
}
