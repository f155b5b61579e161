use clap::{Parser, Subcommand};

use beacon_quorum_core::records::{PeerDirection, PeerState};
use beacon_quorum_core::ReconcilePolicy;

/// beacon-quorum: ask several beacon nodes the same question and reconcile
/// their answers.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Beacon node REST URL (repeatable).
    #[arg(
        long = "node",
        required = true,
        env = "BEACON_QUORUM_NODES",
        value_delimiter = ','
    )]
    pub nodes: Vec<String>,

    /// How answers are reconciled: `first-success` or `consensus`.
    #[arg(long, default_value = "first-success", env = "BEACON_QUORUM_POLICY")]
    pub policy: ReconcilePolicy,

    /// Deadline for each node's answer, in milliseconds.
    #[arg(long, default_value = "10000")]
    pub node_timeout_ms: u64,

    /// Deadline for the whole query across all nodes, in milliseconds.
    #[arg(long, default_value = "30000")]
    pub overall_timeout_ms: u64,

    /// Per-node HTTP request rate limit.
    #[arg(long)]
    pub requests_per_second: Option<u32>,

    /// Basic-auth username, applied to every node.
    #[arg(long, env = "BEACON_QUORUM_USER")]
    pub user: Option<String>,

    /// Basic-auth password, applied to every node.
    #[arg(long, env = "BEACON_QUORUM_PASS")]
    pub pass: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Attestation rewards for a set of validators in one epoch.
    Rewards {
        #[arg(long)]
        epoch: u64,

        /// Validator index (repeatable or comma-separated).
        #[arg(long = "validator", required = true, value_delimiter = ',')]
        validators: Vec<u64>,
    },

    /// The chain's deposit contract.
    DepositContract,

    /// Past and scheduled forks.
    ForkSchedule,

    /// Peers of each node, optionally filtered.
    Peers {
        /// `disconnected`, `connecting`, `connected` or `disconnecting`.
        #[arg(long = "state", value_delimiter = ',')]
        states: Vec<PeerState>,

        /// `inbound` or `outbound`.
        #[arg(long = "direction", value_delimiter = ',')]
        directions: Vec<PeerDirection>,
    },
}
