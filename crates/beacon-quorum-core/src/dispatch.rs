//! Fan one operation out to every configured node and reconcile the answers.
//!
//! Each dispatch spawns one task per node into a [`JoinSet`] and is the
//! only reader of that set, so outcomes are recorded by a single writer in
//! arrival order. Returning early (first success, cancellation, overall
//! deadline) drops the set, which aborts every task still in flight.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::envelope::Envelope;
use crate::error::{CoreError, DispatchError, NodeError, NodeFailure};
use crate::node::BeaconNode;
use crate::ops::Operation;
use crate::types::NodeIdentity;

pub const DEFAULT_NODE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_OVERALL_TIMEOUT: Duration = Duration::from_secs(30);

// ==============================================================================
// Configuration
// ==============================================================================

/// How per-node answers are turned into one result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcilePolicy {
    /// Return the first well-formed answer to arrive.
    #[default]
    FirstSuccess,
    /// Wait for every node, then require a strict majority of the nodes
    /// that answered successfully to agree on an equal value.
    ///
    /// Failed and timed-out nodes are left out of the count entirely, so
    /// when only one node answers its value is accepted on its own.
    Consensus,
}

impl ReconcilePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstSuccess => "first-success",
            Self::Consensus => "consensus",
        }
    }
}

impl std::fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReconcilePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-success" => Ok(Self::FirstSuccess),
            "consensus" => Ok(Self::Consensus),
            other => Err(CoreError::InvalidConfig(format!(
                "unknown reconcile policy `{other}` (expected first-success or consensus)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    pub policy: ReconcilePolicy,
    /// Deadline handed to every single-node call.
    pub node_timeout: Duration,
    /// Deadline for the whole dispatch. Nodes still pending when it fires
    /// are recorded as timed out and the policy decides on what arrived.
    pub overall_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            policy: ReconcilePolicy::default(),
            node_timeout: DEFAULT_NODE_TIMEOUT,
            overall_timeout: DEFAULT_OVERALL_TIMEOUT,
        }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.node_timeout.is_zero() {
            return Err(CoreError::InvalidConfig(
                "node timeout must be greater than zero".to_owned(),
            ));
        }
        if self.overall_timeout.is_zero() {
            return Err(CoreError::InvalidConfig(
                "overall timeout must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

// ==============================================================================
// Dispatcher
// ==============================================================================

pub struct Dispatcher {
    nodes: Vec<Arc<dyn BeaconNode>>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(nodes: Vec<Arc<dyn BeaconNode>>, config: DispatchConfig) -> Self {
        Self { nodes, config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeIdentity> {
        self.nodes.iter().map(|node| node.identity())
    }

    /// Run `op` against every node under the configured policy.
    pub async fn dispatch<O: Operation>(
        &self,
        op: O,
        cancel: &CancellationToken,
    ) -> Result<Envelope<O::Output>, DispatchError> {
        self.dispatch_with(op, self.config.policy, cancel).await
    }

    /// Run `op` under `policy` instead of the configured one, for callers
    /// that need a stricter (or looser) answer for a single query.
    pub async fn dispatch_with<O: Operation>(
        &self,
        op: O,
        policy: ReconcilePolicy,
        cancel: &CancellationToken,
    ) -> Result<Envelope<O::Output>, DispatchError> {
        if self.nodes.is_empty() {
            return Err(DispatchError::NoNodes);
        }
        if cancel.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        let op = Arc::new(op);
        let node_timeout = self.config.node_timeout;
        let mut tasks = JoinSet::new();
        for (index, node) in self.nodes.iter().enumerate() {
            let node = Arc::clone(node);
            let op = Arc::clone(&op);
            tasks.spawn(async move {
                let call = op.execute(node.as_ref(), node_timeout);
                let result = match tokio::time::timeout(node_timeout, call).await {
                    Ok(result) => result,
                    Err(_) => Err(NodeError::Timeout(node_timeout)),
                };
                (index, result)
            });
        }

        let mut collector = Collector::new(self.nodes.iter().map(|n| n.identity().clone()));
        let overall = tokio::time::sleep(self.config.overall_timeout);
        tokio::pin!(overall);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!(op = op.name(), "dispatch cancelled");
                    return Err(DispatchError::Cancelled);
                }
                _ = &mut overall => {
                    warn!(
                        op = op.name(),
                        timeout = ?self.config.overall_timeout,
                        pending = tasks.len(),
                        "overall deadline reached"
                    );
                    collector.expire(self.config.overall_timeout);
                    break;
                }
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok((index, Ok(value)))) => {
                        let node = collector.node(index).clone();
                        debug!(op = op.name(), node = %node, "node answered");
                        if policy == ReconcilePolicy::FirstSuccess {
                            info!(op = op.name(), node = %node, "resolved by first success");
                            return Ok(Envelope::single(value, node));
                        }
                        collector.succeed(index, value);
                    }
                    Some(Ok((index, Err(error)))) => {
                        warn!(op = op.name(), node = %collector.node(index), %error, "node failed");
                        collector.fail(index, error);
                    }
                    Some(Err(e)) => {
                        warn!(op = op.name(), error = %e, "node task did not complete");
                    }
                }
            }
        }

        let outcome = collector.reconcile(policy);
        match &outcome {
            Ok(envelope) => info!(
                op = op.name(),
                node = %envelope.responded_by(),
                agreeing = envelope.agreement().len(),
                "dispatch resolved"
            ),
            Err(e) => warn!(op = op.name(), error = %e, "dispatch failed"),
        }
        outcome
    }
}

// ==============================================================================
// Outcome Collection
// ==============================================================================

/// Per-dispatch outcome set. Successes keep arrival order, failures are
/// indexed by node so error reports list nodes in configuration order.
struct Collector<T> {
    nodes: Vec<NodeIdentity>,
    successes: Vec<(usize, T)>,
    failures: Vec<Option<NodeError>>,
    settled: Vec<bool>,
}

impl<T: PartialEq> Collector<T> {
    fn new(nodes: impl Iterator<Item = NodeIdentity>) -> Self {
        let nodes: Vec<NodeIdentity> = nodes.collect();
        let count = nodes.len();
        Self {
            nodes,
            successes: Vec::with_capacity(count),
            failures: (0..count).map(|_| None).collect(),
            settled: vec![false; count],
        }
    }

    fn node(&self, index: usize) -> &NodeIdentity {
        &self.nodes[index]
    }

    fn succeed(&mut self, index: usize, value: T) {
        self.settled[index] = true;
        self.successes.push((index, value));
    }

    fn fail(&mut self, index: usize, error: NodeError) {
        self.settled[index] = true;
        self.failures[index] = Some(error);
    }

    /// Mark every node that has not answered as timed out.
    fn expire(&mut self, after: Duration) {
        for index in 0..self.nodes.len() {
            if !self.settled[index] {
                self.fail(index, NodeError::Timeout(after));
            }
        }
    }

    fn reconcile(mut self, policy: ReconcilePolicy) -> Result<Envelope<T>, DispatchError> {
        // A slot still open here belongs to a task that panicked.
        for index in 0..self.nodes.len() {
            if !self.settled[index] {
                self.fail(
                    index,
                    NodeError::Aborted("task ended without an outcome".to_owned()),
                );
            }
        }

        let failures: Vec<NodeFailure> = self
            .failures
            .into_iter()
            .zip(&self.nodes)
            .filter_map(|(error, node)| {
                error.map(|error| NodeFailure {
                    node: node.clone(),
                    error,
                })
            })
            .collect();

        if self.successes.is_empty() {
            return Err(DispatchError::AllNodesFailed { failures });
        }

        let responding = self.successes.len();
        let mut groups: Vec<(T, Vec<usize>)> = Vec::new();
        for (index, value) in self.successes {
            match groups.iter_mut().find(|(seen, _)| *seen == value) {
                Some((_, members)) => members.push(index),
                None => groups.push((value, vec![index])),
            }
        }

        if policy == ReconcilePolicy::FirstSuccess {
            if let Some((value, members)) = groups.into_iter().next() {
                return Ok(Envelope::single(value, self.nodes[members[0]].clone()));
            }
            return Err(DispatchError::AllNodesFailed { failures });
        }

        if let Some(pos) = groups
            .iter()
            .position(|(_, members)| members.len() * 2 > responding)
        {
            let (value, members) = groups.swap_remove(pos);
            let agreement: BTreeSet<NodeIdentity> =
                members.iter().map(|&i| self.nodes[i].clone()).collect();
            return Ok(Envelope::new(
                value,
                self.nodes[members[0]].clone(),
                agreement,
            ));
        }

        // Stable sort keeps arrival order among equally sized groups.
        groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        let groups = groups
            .into_iter()
            .map(|(_, members)| members.iter().map(|&i| self.nodes[i].clone()).collect())
            .collect();
        Err(DispatchError::NoConsensus { groups, failures })
    }
}
