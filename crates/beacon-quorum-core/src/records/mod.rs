//! Typed beacon API records.
//!
//! Each record pairs a strict domain struct with a `*Json` wire struct.
//! Serde on the domain struct goes through the wire struct, so
//! `serde_json::to_string(&record)` and `serde_json::from_str` apply the
//! same codec rules as [`crate::codec::decode`] / [`crate::codec::encode`].

/// Implements `TryFrom<Wire>`, `From<Record>` and a canonical-JSON
/// `Display` for a [`crate::codec::WireRecord`].
macro_rules! wire_serde {
    ($record:ty, $wire:ty) => {
        impl TryFrom<$wire> for $record {
            type Error = $crate::error::CodecError;

            fn try_from(wire: $wire) -> Result<Self, Self::Error> {
                <$record as $crate::codec::WireRecord>::from_wire(wire)
            }
        }

        impl From<$record> for $wire {
            fn from(record: $record) -> Self {
                $crate::codec::WireRecord::to_wire(&record)
            }
        }

        impl std::fmt::Display for $record {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match $crate::codec::encode(self) {
                    Ok(json) => f.write_str(&json),
                    Err(e) => write!(f, "ERR: {e}"),
                }
            }
        }
    };
}

pub mod config;
pub mod peers;
pub mod rewards;

pub use config::{DepositContract, Fork};
pub use peers::{Peer, PeerDirection, PeerState};
pub use rewards::{AttestationRewards, TotalReward, ValidatorKey};
