//! Shared test helpers for `beacon-quorum-core` unit tests.
//!
//! Builders for canned beacon API response bodies and pre-wired mock
//! nodes, so tests across modules share one source of dummy data.

use proptest::prelude::*;

use crate::node::mock::MockNode;
use crate::types::{BlsPubKey, Epoch, FixedBytes};

pub const EPOCH: Epoch = Epoch(238_572);
pub const VALIDATORS_PATH: &str = "/eth/v1/beacon/states/head/validators";
pub const DEPOSIT_CONTRACT_PATH: &str = "/eth/v1/config/deposit_contract";

// ==============================================================================
// Response Bodies
// ==============================================================================

pub fn rewards_path(epoch: Epoch) -> String {
    format!("/eth/v1/beacon/rewards/attestations/{epoch}")
}

/// A deterministic public key whose first byte is the validator index.
pub fn pubkey_for(index: u64) -> BlsPubKey {
    let mut bytes = [0u8; 48];
    bytes[0] = index as u8;
    bytes[47] = 0xaa;
    BlsPubKey::from(bytes)
}

/// Rewards body for `(validator_index, head)` pairs. `target` is twice
/// `head`, `source` three times `head`, and `inactivity` is zero.
pub fn rewards_body(entries: &[(u64, u64)]) -> String {
    let totals: Vec<serde_json::Value> = entries
        .iter()
        .map(|(index, head)| {
            serde_json::json!({
                "validator_index": index.to_string(),
                "head": head.to_string(),
                "target": (head * 2).to_string(),
                "source": (head * 3).to_string(),
                "inactivity": "0",
            })
        })
        .collect();
    serde_json::json!({
        "execution_optimistic": false,
        "finalized": true,
        "data": { "ideal_rewards": [], "total_rewards": totals },
    })
    .to_string()
}

pub fn validators_body(indices: &[u64]) -> String {
    let entries: Vec<serde_json::Value> = indices
        .iter()
        .map(|index| {
            serde_json::json!({
                "index": index.to_string(),
                "balance": "32000000000",
                "status": "active_ongoing",
                "validator": {
                    "pubkey": pubkey_for(*index).to_string(),
                    "effective_balance": "32000000000",
                    "slashed": false,
                },
            })
        })
        .collect();
    serde_json::json!({ "data": entries }).to_string()
}

pub fn deposit_contract_body(chain_id: u64) -> String {
    serde_json::json!({
        "data": {
            "chain_id": chain_id.to_string(),
            "address": "0x00000000219ab540356cbb839cbe05303d7705fa",
        }
    })
    .to_string()
}

// ==============================================================================
// Mock Nodes
// ==============================================================================

/// A node that answers the rewards and validators calls for `EPOCH`.
pub fn rewards_node(label: &str, entries: &[(u64, u64)]) -> MockNode {
    let indices: Vec<u64> = entries.iter().map(|(index, _)| *index).collect();
    MockNode::builder(label)
        .with_body(&rewards_path(EPOCH), rewards_body(entries))
        .with_body(VALIDATORS_PATH, validators_body(&indices))
        .build()
}

// ==============================================================================
// Property Strategies
// ==============================================================================

/// Any `N`-byte array.
pub fn fixed_bytes<const N: usize>() -> impl Strategy<Value = FixedBytes<N>> {
    prop::collection::vec(any::<u8>(), N).prop_map(|bytes| {
        let mut array = [0u8; N];
        array.copy_from_slice(&bytes);
        FixedBytes(array)
    })
}

/// `0x`-prefixed hex for any byte count other than `N`, including zero.
pub fn wrong_length_hex<const N: usize>() -> impl Strategy<Value = (usize, String)> {
    prop::collection::vec(any::<u8>(), 0..=2 * N + 4)
        .prop_filter("byte count must differ from N", |bytes| bytes.len() != N)
        .prop_map(|bytes| (bytes.len(), format!("0x{}", hex::encode(&bytes))))
}
