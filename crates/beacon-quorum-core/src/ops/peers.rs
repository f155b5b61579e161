use std::time::Duration;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::node::{ApiRequest, BeaconNode};
use crate::records::peers::PeerJson;
use crate::records::{Peer, PeerDirection, PeerState};

use super::{decode_data, decode_list, Operation};

const NODE_PEERS_PATH: &str = "/eth/v1/node/peers";

/// Peers of the node, optionally filtered by state and direction.
/// Empty filters mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePeersRequest {
    pub states: Vec<PeerState>,
    pub directions: Vec<PeerDirection>,
}

impl NodePeersRequest {
    fn request(&self) -> ApiRequest {
        let mut request = ApiRequest::get(NODE_PEERS_PATH);
        for state in &self.states {
            request = request.with_query("state", state.as_str());
        }
        for direction in &self.directions {
            request = request.with_query("direction", direction.as_str());
        }
        request
    }
}

#[async_trait]
impl Operation for NodePeersRequest {
    type Output = Vec<Peer>;

    fn name(&self) -> &'static str {
        "node_peers"
    }

    async fn execute(
        &self,
        node: &dyn BeaconNode,
        deadline: Duration,
    ) -> Result<Self::Output, NodeError> {
        let body = node.call(&self.request(), deadline).await?;
        let wires: Vec<PeerJson> = decode_data(&body)?;
        Ok(decode_list::<Peer>(wires)?)
    }
}
