//! Logical beacon API operations.
//!
//! An [`Operation`] is a pure description of one query. The dispatcher
//! runs the same operation against every configured node, so `execute`
//! must depend only on `self` and the node it is given.

mod config;
mod peers;
mod rewards;

pub use config::{DepositContractRequest, ForkScheduleRequest};
pub use peers::NodePeersRequest;
pub use rewards::AttestationRewardsRequest;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::codec::WireRecord;
use crate::error::{CodecError, NodeError};
use crate::node::BeaconNode;

#[async_trait]
pub trait Operation: Send + Sync + 'static {
    /// Decoded result. Compared with `==` when reconciling by consensus.
    type Output: PartialEq + Send + 'static;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Run the query against one node, decoding through the strict codec.
    async fn execute(
        &self,
        node: &dyn BeaconNode,
        deadline: Duration,
    ) -> Result<Self::Output, NodeError>;
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
}

/// Unwrap the beacon API `{"data": ...}` envelope. Absent or `null` data
/// is reported as a missing field.
pub(crate) fn decode_data<T: DeserializeOwned>(body: &str) -> Result<T, CodecError> {
    let envelope: DataEnvelope<T> =
        serde_json::from_str(body).map_err(|e| CodecError::InvalidJson(e.to_string()))?;
    envelope.data.ok_or(CodecError::MissingField { field: "data" })
}

pub(crate) fn decode_list<R: WireRecord>(wires: Vec<R::Wire>) -> Result<Vec<R>, CodecError> {
    wires.into_iter().map(R::from_wire).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_data_requires_data() {
        assert_eq!(
            decode_data::<Vec<String>>(r#"{"meta":{}}"#),
            Err(CodecError::MissingField { field: "data" })
        );
        assert_eq!(
            decode_data::<Vec<String>>(r#"{"data":null}"#),
            Err(CodecError::MissingField { field: "data" })
        );
        assert_eq!(
            decode_data::<Vec<String>>(r#"{"data":["a"]}"#),
            Ok(vec!["a".to_owned()])
        );
    }

    #[test]
    fn decode_data_rejects_non_json() {
        assert!(matches!(
            decode_data::<Vec<String>>("<html>"),
            Err(CodecError::InvalidJson(_))
        ));
    }
}
