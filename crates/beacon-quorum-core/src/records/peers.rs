use serde::{Deserialize, Serialize};

use crate::codec::{optional_text, require, text_field, RawField, WireRecord};
use crate::error::CodecError;

/// Connection state of a peer as reported by `/eth/v1/node/peers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerState {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl PeerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
        }
    }

    fn parse(field: &'static str, raw: &str) -> Result<Self, CodecError> {
        match raw {
            "disconnected" => Ok(Self::Disconnected),
            "connecting" => Ok(Self::Connecting),
            "connected" => Ok(Self::Connected),
            "disconnecting" => Ok(Self::Disconnecting),
            other => Err(CodecError::UnknownVariant {
                field,
                raw: other.to_owned(),
            }),
        }
    }
}

impl std::str::FromStr for PeerState {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse("state", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerDirection {
    Inbound,
    Outbound,
}

impl PeerDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn parse(field: &'static str, raw: &str) -> Result<Self, CodecError> {
        match raw {
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            other => Err(CodecError::UnknownVariant {
                field,
                raw: other.to_owned(),
            }),
        }
    }
}

impl std::str::FromStr for PeerDirection {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse("direction", s)
    }
}

/// A libp2p peer known to the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PeerJson", into = "PeerJson")]
pub struct Peer {
    pub peer_id: String,
    /// Not every client publishes the peer's ENR.
    pub enr: Option<String>,
    pub last_seen_p2p_address: String,
    pub state: PeerState,
    pub direction: PeerDirection,
}

/// Wire form of [`Peer`]. An `enr` that is `null`, empty or absent on
/// input is omitted on output.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PeerJson {
    pub peer_id: RawField,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enr: RawField,
    pub last_seen_p2p_address: RawField,
    pub state: RawField,
    pub direction: RawField,
}

impl WireRecord for Peer {
    type Wire = PeerJson;

    fn from_wire(wire: Self::Wire) -> Result<Self, CodecError> {
        let peer_id = require("peer_id", wire.peer_id.as_ref())?.to_owned();
        let enr = optional_text("enr", wire.enr.as_ref())?.map(str::to_owned);
        let last_seen_p2p_address =
            require("last_seen_p2p_address", wire.last_seen_p2p_address.as_ref())?.to_owned();
        let state = PeerState::parse("state", require("state", wire.state.as_ref())?)?;
        let direction =
            PeerDirection::parse("direction", require("direction", wire.direction.as_ref())?)?;
        Ok(Self {
            peer_id,
            enr,
            last_seen_p2p_address,
            state,
            direction,
        })
    }

    fn to_wire(&self) -> Self::Wire {
        PeerJson {
            peer_id: text_field(&self.peer_id),
            enr: self.enr.as_deref().and_then(text_field),
            last_seen_p2p_address: text_field(&self.last_seen_p2p_address),
            state: text_field(self.state.as_str()),
            direction: text_field(self.direction.as_str()),
        }
    }
}

wire_serde!(Peer, PeerJson);
