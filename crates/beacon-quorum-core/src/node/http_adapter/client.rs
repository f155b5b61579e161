use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::header;
use tracing::{debug, trace};

use crate::error::{CoreError, NodeError, TransportError};
use crate::types::NodeIdentity;

use super::super::types::{ApiRequest, HttpMethod};
use super::super::BeaconNode;
use super::connection::{parse_connection, resolve_auth};
use super::protocol::parse_api_error;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Beacon node REST client over HTTP(S).
pub struct HttpBeaconNode {
    identity: NodeIdentity,
    client: reqwest::Client,
    url: String,
    auth: Option<(String, String)>,
    limiter: Option<DirectRateLimiter>,
    /// Monotonic counter used only to correlate request/response log lines.
    next_id: AtomicU64,
}

impl HttpBeaconNode {
    /// Create a client for one beacon node.
    ///
    /// `connection` must be an `http://` or `https://` URL and may carry a
    /// path prefix (hosted providers often put an API key there) or
    /// `user:pass@` credentials. Explicit `user` + `pass` take precedence
    /// over URL credentials.
    ///
    /// If `requests_per_second` is set, outbound HTTP requests to this node
    /// are rate-limited.
    pub fn new(
        connection: &str,
        user: Option<&str>,
        pass: Option<&str>,
        requests_per_second: Option<u32>,
    ) -> Result<Self, CoreError> {
        let parsed = parse_connection(connection)?;
        let auth = resolve_auth(user, pass, parsed.url_auth)?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(32)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| CoreError::InvalidConfig(format!("build HTTP client: {e}")))?;

        let limiter = match requests_per_second {
            None => None,
            Some(limit) => {
                let limit = NonZeroU32::new(limit).ok_or_else(|| {
                    CoreError::InvalidConfig("requests_per_second must be at least 1".to_owned())
                })?;
                Some(RateLimiter::direct(Quota::per_second(limit)))
            }
        };

        Ok(Self {
            identity: NodeIdentity::new(&parsed.label, &parsed.url),
            client,
            url: parsed.url,
            auth,
            limiter,
            next_id: AtomicU64::new(1),
        })
    }

    /// Replace the default `host:port` label used in logs and results.
    pub fn with_label(mut self, label: &str) -> Self {
        self.identity = NodeIdentity::new(label, &self.url);
        self
    }

    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[async_trait]
impl BeaconNode for HttpBeaconNode {
    fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    async fn call(&self, request: &ApiRequest, deadline: Duration) -> Result<String, NodeError> {
        self.wait_for_rate_limit().await;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(
            node = %self.identity,
            req.id = id,
            req.method = ?request.method,
            req.path = %request.path,
            "beacon api call"
        );

        let url = format!("{}{}", self.url, request.path);
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        }
        .header(header::ACCEPT, "application/json")
        .timeout(deadline);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user, Some(pass));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, deadline))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, deadline))?;
        debug!(node = %self.identity, req.id = id, %status, body_len = body.len(), "beacon api response");
        trace!(node = %self.identity, req.id = id, body = %body, "beacon api response body");

        if !status.is_success() {
            return Err(parse_api_error(status.as_u16(), &body).into());
        }
        Ok(body)
    }
}

fn map_reqwest_error(err: reqwest::Error, deadline: Duration) -> NodeError {
    if err.is_timeout() {
        NodeError::Timeout(deadline)
    } else {
        NodeError::Transport(TransportError::Http(err))
    }
}
