use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::codec::{
    bytes_field, checked_sum, decode_bytes, decode_int, encode_bytes, int_field, RawField,
    WireRecord,
};
use crate::error::CodecError;
use crate::types::{BlsPubKey, Epoch, Gwei, ValidatorIndex};

// ==============================================================================
// Attestation Rewards
// ==============================================================================

/// Attestation reward breakdown for one validator in one epoch.
///
/// Fields are decoded in declaration order: `index`, `pubkey`, `epoch`,
/// `head`, `target`, `source`, `inactivity`, `total`. That order decides
/// which error is reported when several fields are bad at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AttestationRewardsJson", into = "AttestationRewardsJson")]
pub struct AttestationRewards {
    pub index: ValidatorIndex,
    pub pubkey: BlsPubKey,
    pub epoch: Epoch,
    pub head: Gwei,
    pub target: Gwei,
    pub source: Gwei,
    pub inactivity: Gwei,
    pub total: Gwei,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AttestationRewardsJson {
    pub index: RawField,
    pub pubkey: RawField,
    pub epoch: RawField,
    pub head: RawField,
    pub target: RawField,
    pub source: RawField,
    pub inactivity: RawField,
    pub total: RawField,
}

impl AttestationRewards {
    /// Assemble a record from a node's per-validator totals, the requested
    /// epoch and the validator's key. `total` is the checked sum of the
    /// four components.
    pub fn from_parts(
        epoch: Epoch,
        reward: &TotalReward,
        pubkey: BlsPubKey,
    ) -> Result<Self, CodecError> {
        let total = checked_sum(
            "total",
            &[
                reward.head.0,
                reward.target.0,
                reward.source.0,
                reward.inactivity.0,
            ],
        )?;
        Ok(Self {
            index: reward.validator_index,
            pubkey,
            epoch,
            head: reward.head,
            target: reward.target,
            source: reward.source,
            inactivity: reward.inactivity,
            total: Gwei(total),
        })
    }
}

impl WireRecord for AttestationRewards {
    type Wire = AttestationRewardsJson;

    fn from_wire(wire: Self::Wire) -> Result<Self, CodecError> {
        let index = decode_int("index", wire.index.as_ref())?;
        let pubkey = decode_bytes("pubkey", wire.pubkey.as_ref())?;
        let epoch = decode_int("epoch", wire.epoch.as_ref())?;
        let head = decode_int("head", wire.head.as_ref())?;
        let target = decode_int("target", wire.target.as_ref())?;
        let source = decode_int("source", wire.source.as_ref())?;
        let inactivity = decode_int("inactivity", wire.inactivity.as_ref())?;
        let total = decode_int("total", wire.total.as_ref())?;
        Ok(Self {
            index,
            pubkey,
            epoch,
            head,
            target,
            source,
            inactivity,
            total,
        })
    }

    fn to_wire(&self) -> Self::Wire {
        AttestationRewardsJson {
            index: int_field(self.index),
            pubkey: bytes_field(&self.pubkey),
            epoch: int_field(self.epoch),
            head: int_field(self.head),
            target: int_field(self.target),
            source: int_field(self.source),
            inactivity: int_field(self.inactivity),
            total: int_field(self.total),
        }
    }
}

wire_serde!(AttestationRewards, AttestationRewardsJson);

// ==============================================================================
// Node Response Items
// ==============================================================================

/// One entry of `total_rewards` in the node's attestation rewards response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TotalRewardJson", into = "TotalRewardJson")]
pub struct TotalReward {
    pub validator_index: ValidatorIndex,
    pub head: Gwei,
    pub target: Gwei,
    pub source: Gwei,
    pub inactivity: Gwei,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TotalRewardJson {
    pub validator_index: RawField,
    pub head: RawField,
    pub target: RawField,
    pub source: RawField,
    pub inactivity: RawField,
}

impl WireRecord for TotalReward {
    type Wire = TotalRewardJson;

    fn from_wire(wire: Self::Wire) -> Result<Self, CodecError> {
        Ok(Self {
            validator_index: decode_int("validator_index", wire.validator_index.as_ref())?,
            head: decode_int("head", wire.head.as_ref())?,
            target: decode_int("target", wire.target.as_ref())?,
            source: decode_int("source", wire.source.as_ref())?,
            inactivity: decode_int("inactivity", wire.inactivity.as_ref())?,
        })
    }

    fn to_wire(&self) -> Self::Wire {
        TotalRewardJson {
            validator_index: int_field(self.validator_index),
            head: int_field(self.head),
            target: int_field(self.target),
            source: int_field(self.source),
            inactivity: int_field(self.inactivity),
        }
    }
}

wire_serde!(TotalReward, TotalRewardJson);

/// The index and public key of one entry in a validators response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ValidatorKeyJson", into = "ValidatorKeyJson")]
pub struct ValidatorKey {
    pub index: ValidatorIndex,
    pub pubkey: BlsPubKey,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ValidatorKeyJson {
    pub index: RawField,
    /// Only `validator.pubkey` is read; the rest of the object is ignored.
    pub validator: Option<Value>,
}

impl WireRecord for ValidatorKey {
    type Wire = ValidatorKeyJson;

    fn from_wire(wire: Self::Wire) -> Result<Self, CodecError> {
        let index = decode_int("index", wire.index.as_ref())?;
        let pubkey = decode_bytes(
            "validator.pubkey",
            wire.validator.as_ref().and_then(|v| v.get("pubkey")),
        )?;
        Ok(Self { index, pubkey })
    }

    fn to_wire(&self) -> Self::Wire {
        ValidatorKeyJson {
            index: int_field(self.index),
            validator: Some(json!({ "pubkey": encode_bytes(&self.pubkey) })),
        }
    }
}

wire_serde!(ValidatorKey, ValidatorKeyJson);
