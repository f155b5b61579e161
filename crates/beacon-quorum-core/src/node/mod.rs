//! Beacon node abstraction layer.
//!
//! Defines the [`BeaconNode`] trait and provides an HTTP implementation
//! ([`HttpBeaconNode`]) plus a test mock (`mock::MockNode`).

mod http_adapter;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use http_adapter::HttpBeaconNode;
pub use types::{ApiRequest, HttpMethod};

use std::time::Duration;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::types::NodeIdentity;

/// One backing beacon node that can execute raw API requests.
///
/// Implementations own their transport (connection pooling, auth, rate
/// limiting) and must give up once `deadline` has elapsed, reporting
/// [`NodeError::Timeout`] so callers can tell a slow node from a broken one.
#[async_trait]
pub trait BeaconNode: Send + Sync {
    fn identity(&self) -> &NodeIdentity;

    /// Issue `request` and return the raw response body on a 2xx status.
    async fn call(&self, request: &ApiRequest, deadline: Duration) -> Result<String, NodeError>;
}
