//! Beacon API client over HTTP.
//!
//! Implements [`super::BeaconNode`] using `reqwest`, with support for
//! per-request deadlines, optional request rate limiting, basic auth, and
//! structured decoding of beacon API error bodies.

mod client;
mod connection;
mod protocol;

pub use client::HttpBeaconNode;
