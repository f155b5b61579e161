use std::fmt::Write as _;
use std::time::Duration;

use crate::types::NodeIdentity;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

// ==============================================================================
// Codec Errors
// ==============================================================================

/// A wire value that could not be turned into its typed form.
///
/// Every variant names the field it came from so that a failed record
/// decode can be traced to exactly one JSON key.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("{field} missing")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: `{raw}` {cause}")]
    InvalidInteger {
        field: &'static str,
        raw: String,
        cause: String,
    },

    #[error("invalid value for {field}: {cause}")]
    InvalidHex { field: &'static str, cause: String },

    #[error("invalid value for {field}: expected a string, got `{found}`")]
    UnexpectedType { field: &'static str, found: String },

    #[error("incorrect length for {field}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown value for {field}: `{raw}`")]
    UnknownVariant { field: &'static str, raw: String },

    #[error("{field} overflows u64")]
    Overflow { field: &'static str },

    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

// ==============================================================================
// Per-Node Errors
// ==============================================================================

/// Failures raised while talking to the beacon node itself, before any
/// payload decoding happens.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("beacon API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

/// Everything that can go wrong for a single node during one operation.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("undecodable response: {0}")]
    Decode(#[from] CodecError),

    #[error("inconsistent response: {0}")]
    Inconsistent(String),

    #[error("node task aborted: {0}")]
    Aborted(String),
}

impl NodeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// A node paired with the reason it produced no usable answer.
#[derive(Debug)]
pub struct NodeFailure {
    pub node: NodeIdentity,
    pub error: NodeError,
}

impl std::fmt::Display for NodeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.node, self.error)
    }
}

// ==============================================================================
// Dispatch Errors
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no beacon nodes configured")]
    NoNodes,

    #[error("all {} nodes failed: {}", .failures.len(), join_failures(.failures))]
    AllNodesFailed { failures: Vec<NodeFailure> },

    /// Nodes answered but no single value was returned by a strict majority
    /// of them. `groups` lists the agreeing node sets, largest first.
    #[error(
        "no consensus among {} responding nodes: {}",
        .groups.iter().map(Vec::len).sum::<usize>(),
        join_groups(.groups)
    )]
    NoConsensus {
        groups: Vec<Vec<NodeIdentity>>,
        failures: Vec<NodeFailure>,
    },

    #[error("dispatch cancelled")]
    Cancelled,
}

fn join_failures(failures: &[NodeFailure]) -> String {
    let mut out = String::new();
    for (i, failure) in failures.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        let _ = write!(out, "{failure}");
    }
    out
}

fn join_groups(groups: &[Vec<NodeIdentity>]) -> String {
    groups
        .iter()
        .map(|group| {
            let names: Vec<String> = group.iter().map(ToString::to_string).collect();
            format!("[{}]", names.join(", "))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
