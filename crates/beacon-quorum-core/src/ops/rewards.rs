use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join;
use serde::Deserialize;

use crate::codec::encode_int;
use crate::error::{CodecError, CoreError, NodeError};
use crate::node::{ApiRequest, BeaconNode};
use crate::records::rewards::{TotalRewardJson, ValidatorKeyJson};
use crate::records::{AttestationRewards, TotalReward, ValidatorKey};
use crate::types::{BlsPubKey, Epoch, ValidatorIndex};

use super::{decode_data, decode_list, Operation};

/// Attestation rewards for a set of validators in one epoch.
///
/// Each node answers with two calls issued concurrently: the rewards
/// endpoint and a validators lookup that supplies public keys. Both come
/// from the same node, so a record never mixes state from two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationRewardsRequest {
    epoch: Epoch,
    validators: Vec<ValidatorIndex>,
}

impl AttestationRewardsRequest {
    /// `validators` must name at least one index; duplicates are dropped.
    pub fn new(epoch: Epoch, validators: &[ValidatorIndex]) -> Result<Self, CoreError> {
        if validators.is_empty() {
            return Err(CoreError::InvalidRequest(
                "attestation rewards need at least one validator index".to_owned(),
            ));
        }
        let validators: BTreeSet<ValidatorIndex> = validators.iter().copied().collect();
        Ok(Self {
            epoch,
            validators: validators.into_iter().collect(),
        })
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn validators(&self) -> &[ValidatorIndex] {
        &self.validators
    }

    fn ids(&self) -> Vec<String> {
        self.validators.iter().map(|v| encode_int(*v)).collect()
    }

    fn rewards_request(&self) -> ApiRequest {
        ApiRequest::post(
            format!("/eth/v1/beacon/rewards/attestations/{}", self.epoch),
            serde_json::json!(self.ids()),
        )
    }

    fn keys_request(&self) -> ApiRequest {
        ApiRequest::post(
            "/eth/v1/beacon/states/head/validators",
            serde_json::json!({ "ids": self.ids() }),
        )
    }

    fn decode(
        &self,
        rewards_body: &str,
        keys_body: &str,
    ) -> Result<BTreeMap<ValidatorIndex, AttestationRewards>, NodeError> {
        #[derive(Deserialize)]
        struct RewardsData {
            total_rewards: Option<Vec<TotalRewardJson>>,
        }

        let data: RewardsData = decode_data(rewards_body)?;
        let totals = data.total_rewards.ok_or(CodecError::MissingField {
            field: "total_rewards",
        })?;
        let totals: Vec<TotalReward> = decode_list(totals)?;

        let keys: Vec<ValidatorKey> = decode_list(decode_data::<Vec<ValidatorKeyJson>>(keys_body)?)?;
        let pubkeys: HashMap<ValidatorIndex, BlsPubKey> =
            keys.into_iter().map(|k| (k.index, k.pubkey)).collect();

        let mut records = BTreeMap::new();
        for reward in &totals {
            let pubkey = pubkeys
                .get(&reward.validator_index)
                .copied()
                .ok_or_else(|| {
                    NodeError::Inconsistent(format!(
                        "validator {} has rewards but no public key",
                        reward.validator_index
                    ))
                })?;
            let record = AttestationRewards::from_parts(self.epoch, reward, pubkey)?;
            records.insert(reward.validator_index, record);
        }
        Ok(records)
    }
}

#[async_trait]
impl Operation for AttestationRewardsRequest {
    type Output = BTreeMap<ValidatorIndex, AttestationRewards>;

    fn name(&self) -> &'static str {
        "attestation_rewards"
    }

    async fn execute(
        &self,
        node: &dyn BeaconNode,
        deadline: Duration,
    ) -> Result<Self::Output, NodeError> {
        let rewards_request = self.rewards_request();
        let keys_request = self.keys_request();
        let (rewards_body, keys_body) = try_join(
            node.call(&rewards_request, deadline),
            node.call(&keys_request, deadline),
        )
        .await?;
        self.decode(&rewards_body, &keys_body)
    }
}
