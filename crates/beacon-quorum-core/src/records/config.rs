use serde::{Deserialize, Serialize};

use crate::codec::{bytes_field, decode_bytes, decode_int, int_field, RawField, WireRecord};
use crate::error::CodecError;
use crate::types::{Epoch, ExecutionAddress, Version};

// ==============================================================================
// Deposit Contract
// ==============================================================================

/// Execution-layer deposit contract the chain was configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DepositContractJson", into = "DepositContractJson")]
pub struct DepositContract {
    pub chain_id: u64,
    pub address: ExecutionAddress,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DepositContractJson {
    pub chain_id: RawField,
    pub address: RawField,
}

impl WireRecord for DepositContract {
    type Wire = DepositContractJson;

    fn from_wire(wire: Self::Wire) -> Result<Self, CodecError> {
        let chain_id = decode_int("chain_id", wire.chain_id.as_ref())?;
        let address = decode_bytes("address", wire.address.as_ref())?;
        Ok(Self { chain_id, address })
    }

    fn to_wire(&self) -> Self::Wire {
        DepositContractJson {
            chain_id: int_field(self.chain_id),
            address: bytes_field(&self.address),
        }
    }
}

wire_serde!(DepositContract, DepositContractJson);

// ==============================================================================
// Fork
// ==============================================================================

/// One entry of the fork schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ForkJson", into = "ForkJson")]
pub struct Fork {
    pub previous_version: Version,
    pub current_version: Version,
    pub epoch: Epoch,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ForkJson {
    pub previous_version: RawField,
    pub current_version: RawField,
    pub epoch: RawField,
}

impl WireRecord for Fork {
    type Wire = ForkJson;

    fn from_wire(wire: Self::Wire) -> Result<Self, CodecError> {
        let previous_version = decode_bytes("previous_version", wire.previous_version.as_ref())?;
        let current_version = decode_bytes("current_version", wire.current_version.as_ref())?;
        let epoch = decode_int("epoch", wire.epoch.as_ref())?;
        Ok(Self {
            previous_version,
            current_version,
            epoch,
        })
    }

    fn to_wire(&self) -> Self::Wire {
        ForkJson {
            previous_version: bytes_field(&self.previous_version),
            current_version: bytes_field(&self.current_version),
            epoch: int_field(self.epoch),
        }
    }
}

wire_serde!(Fork, ForkJson);
