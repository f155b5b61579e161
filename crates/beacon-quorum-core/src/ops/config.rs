use std::time::Duration;

use async_trait::async_trait;

use crate::codec::WireRecord;
use crate::error::NodeError;
use crate::node::{ApiRequest, BeaconNode};
use crate::records::config::{DepositContractJson, ForkJson};
use crate::records::{DepositContract, Fork};

use super::{decode_data, decode_list, Operation};

const DEPOSIT_CONTRACT_PATH: &str = "/eth/v1/config/deposit_contract";
const FORK_SCHEDULE_PATH: &str = "/eth/v1/config/fork_schedule";

/// The chain's deposit contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepositContractRequest;

#[async_trait]
impl Operation for DepositContractRequest {
    type Output = DepositContract;

    fn name(&self) -> &'static str {
        "deposit_contract"
    }

    async fn execute(
        &self,
        node: &dyn BeaconNode,
        deadline: Duration,
    ) -> Result<Self::Output, NodeError> {
        let body = node
            .call(&ApiRequest::get(DEPOSIT_CONTRACT_PATH), deadline)
            .await?;
        let wire: DepositContractJson = decode_data(&body)?;
        Ok(DepositContract::from_wire(wire)?)
    }
}

/// Past and scheduled fork versions, in the order the node lists them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForkScheduleRequest;

#[async_trait]
impl Operation for ForkScheduleRequest {
    type Output = Vec<Fork>;

    fn name(&self) -> &'static str {
        "fork_schedule"
    }

    async fn execute(
        &self,
        node: &dyn BeaconNode,
        deadline: Duration,
    ) -> Result<Self::Output, NodeError> {
        let body = node
            .call(&ApiRequest::get(FORK_SCHEDULE_PATH), deadline)
            .await?;
        let wires: Vec<ForkJson> = decode_data(&body)?;
        Ok(decode_list::<Fork>(wires)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::node::mock::MockNode;
    use crate::types::Epoch;

    #[tokio::test]
    async fn fork_schedule_decodes_every_entry() {
        let node = MockNode::builder("a")
            .with_body(
                FORK_SCHEDULE_PATH,
                r#"{"data":[
                    {"previous_version":"0x00000000","current_version":"0x00000000","epoch":"0"},
                    {"previous_version":"0x00000000","current_version":"0x01000000","epoch":"74240"}
                ]}"#,
            )
            .build();
        let forks = ForkScheduleRequest
            .execute(&node, Duration::from_secs(1))
            .await
            .expect("valid schedule");
        assert_eq!(forks.len(), 2);
        assert_eq!(forks[1].epoch, Epoch(74_240));
        assert_eq!(forks[1].current_version.to_string(), "0x01000000");
    }

    #[tokio::test]
    async fn one_bad_fork_fails_the_schedule() {
        let node = MockNode::builder("a")
            .with_body(
                FORK_SCHEDULE_PATH,
                r#"{"data":[
                    {"previous_version":"0x00000000","current_version":"0x00000000","epoch":"0"},
                    {"previous_version":"0x00000000","current_version":"0x01000000"}
                ]}"#,
            )
            .build();
        let err = ForkScheduleRequest
            .execute(&node, Duration::from_secs(1))
            .await
            .expect_err("second entry lacks epoch");
        assert!(matches!(
            err,
            NodeError::Decode(CodecError::MissingField { field: "epoch" })
        ));
    }

    #[tokio::test]
    async fn deposit_contract_decodes() {
        let node = MockNode::builder("a")
            .with_body(
                DEPOSIT_CONTRACT_PATH,
                r#"{"data":{"chain_id":"17000","address":"0x4242424242424242424242424242424242424242"}}"#,
            )
            .build();
        let contract = DepositContractRequest
            .execute(&node, Duration::from_secs(1))
            .await
            .expect("valid contract");
        assert_eq!(contract.chain_id, 17_000);
    }
}
