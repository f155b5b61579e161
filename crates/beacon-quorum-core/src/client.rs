//! Typed entry point: one method per beacon API query, each answered by
//! the dispatcher across every configured node.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::dispatch::{DispatchConfig, Dispatcher, ReconcilePolicy};
use crate::envelope::Envelope;
use crate::error::CoreError;
use crate::node::{BeaconNode, HttpBeaconNode};
use crate::ops::{
    AttestationRewardsRequest, DepositContractRequest, ForkScheduleRequest, NodePeersRequest,
    Operation,
};
use crate::records::{AttestationRewards, DepositContract, Fork, Peer};
use crate::types::{Epoch, NodeIdentity, ValidatorIndex};

/// Transport settings shared by every HTTP node built by
/// [`MultiNodeClient::connect`].
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    pub user: Option<String>,
    pub pass: Option<String>,
    pub requests_per_second: Option<u32>,
}

pub struct MultiNodeClient {
    dispatcher: Dispatcher,
    shutdown: CancellationToken,
}

impl MultiNodeClient {
    pub fn new(
        nodes: Vec<Arc<dyn BeaconNode>>,
        config: DispatchConfig,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            dispatcher: Dispatcher::new(nodes, config),
            shutdown: CancellationToken::new(),
        })
    }

    /// Build one [`HttpBeaconNode`] per URL. Fails on the first URL that
    /// does not parse, naming it.
    pub fn connect<S: AsRef<str>>(
        urls: &[S],
        options: &HttpOptions,
        config: DispatchConfig,
    ) -> Result<Self, CoreError> {
        let mut nodes: Vec<Arc<dyn BeaconNode>> = Vec::with_capacity(urls.len());
        for url in urls {
            let node = HttpBeaconNode::new(
                url.as_ref(),
                options.user.as_deref(),
                options.pass.as_deref(),
                options.requests_per_second,
            )?;
            nodes.push(Arc::new(node));
        }
        Self::new(nodes, config)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeIdentity> {
        self.dispatcher.nodes()
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.dispatcher.config().policy
    }

    /// Cancel every dispatch in flight and every later one.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Token cancelled by [`Self::shutdown`]; hand it to signal handlers.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    async fn run<O: Operation>(&self, op: O) -> Result<Envelope<O::Output>, CoreError> {
        let cancel = self.shutdown.child_token();
        Ok(self.dispatcher.dispatch(op, &cancel).await?)
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// Attestation rewards for `validators` in `epoch`, keyed by validator
    /// index. All records come from a single node's answer.
    pub async fn attestation_rewards(
        &self,
        epoch: Epoch,
        validators: &[ValidatorIndex],
    ) -> Result<Envelope<BTreeMap<ValidatorIndex, AttestationRewards>>, CoreError> {
        let request = AttestationRewardsRequest::new(epoch, validators)?;
        self.run(request).await
    }

    pub async fn deposit_contract(&self) -> Result<Envelope<DepositContract>, CoreError> {
        self.run(DepositContractRequest).await
    }

    pub async fn fork_schedule(&self) -> Result<Envelope<Vec<Fork>>, CoreError> {
        self.run(ForkScheduleRequest).await
    }

    pub async fn node_peers(
        &self,
        request: NodePeersRequest,
    ) -> Result<Envelope<Vec<Peer>>, CoreError> {
        self.run(request).await
    }
}
