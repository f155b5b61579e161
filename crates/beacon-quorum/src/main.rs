mod cli;

use std::time::Duration;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde::Serialize;

use beacon_quorum_core::error::{DispatchError, NodeError, TransportError};
use beacon_quorum_core::ops::NodePeersRequest;
use beacon_quorum_core::types::{Epoch, NodeIdentity, ValidatorIndex};
use beacon_quorum_core::{CoreError, DispatchConfig, Envelope, HttpOptions, MultiNodeClient};

use cli::Command;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = DispatchConfig {
        policy: args.policy,
        node_timeout: Duration::from_millis(args.node_timeout_ms),
        overall_timeout: Duration::from_millis(args.overall_timeout_ms),
    };
    let options = HttpOptions {
        user: args.user.clone(),
        pass: args.pass.clone(),
        requests_per_second: args.requests_per_second,
    };
    let client = MultiNodeClient::connect(&args.nodes, &options, config)
        .wrap_err("configure beacon nodes")?;

    let labels: Vec<&str> = client.nodes().map(NodeIdentity::label).collect();
    tracing::info!(nodes = ?labels, policy = %client.policy(), "querying beacon nodes");

    // Ctrl-C cancels whatever dispatch is in flight.
    let shutdown = client.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted; cancelling in-flight queries");
            shutdown.cancel();
        }
    });

    let output = match args.command {
        Command::Rewards { epoch, validators } => {
            let validators: Vec<ValidatorIndex> =
                validators.into_iter().map(ValidatorIndex).collect();
            let envelope = client
                .attestation_rewards(Epoch(epoch), &validators)
                .await
                .map_err(report)
                .wrap_err("fetch attestation rewards")?;
            render(envelope.map(|records| records.into_values().collect::<Vec<_>>()))?
        }
        Command::DepositContract => {
            let envelope = client
                .deposit_contract()
                .await
                .map_err(report)
                .wrap_err("fetch deposit contract")?;
            render(envelope)?
        }
        Command::ForkSchedule => {
            let envelope = client
                .fork_schedule()
                .await
                .map_err(report)
                .wrap_err("fetch fork schedule")?;
            render(envelope)?
        }
        Command::Peers { states, directions } => {
            let envelope = client
                .node_peers(NodePeersRequest { states, directions })
                .await
                .map_err(report)
                .wrap_err("fetch node peers")?;
            render(envelope)?
        }
    };

    println!("{output}");
    Ok(())
}

/// Log provenance and encode the value as canonical JSON.
fn render<T: Serialize>(envelope: Envelope<T>) -> eyre::Result<String> {
    let agreement: Vec<&str> = envelope
        .agreement()
        .iter()
        .map(NodeIdentity::label)
        .collect();
    tracing::info!(
        responded_by = %envelope.responded_by(),
        agreement = ?agreement,
        "answer reconciled"
    );
    serde_json::to_string(envelope.value()).wrap_err("encode result")
}

/// Turn a library error into a report, adding a hint when the failure
/// pattern points at a likely cause.
fn report(err: CoreError) -> eyre::Report {
    let mut lines = vec![err.to_string()];
    if let Some(hint) = failure_hint(&err) {
        lines.push(format!("hint: {hint}"));
    }
    eyre!(lines.join("\n"))
}

fn failure_hint(err: &CoreError) -> Option<&'static str> {
    match err {
        CoreError::Dispatch(DispatchError::AllNodesFailed { failures }) => {
            if failures.iter().all(|f| f.error.is_timeout()) {
                Some("every node timed out; raise --node-timeout-ms or check node reachability")
            } else if failures.iter().any(|f| is_status(&f.error, &[401, 403])) {
                Some("authentication failed; verify --user/--pass or credentials in the node URL")
            } else if failures.iter().any(|f| is_status(&f.error, &[404])) {
                Some("a node does not serve this endpoint or epoch; verify the URL and that the epoch is not pruned")
            } else {
                None
            }
        }
        CoreError::Dispatch(DispatchError::NoConsensus { .. }) => {
            Some("nodes disagree; they may be on different heads or still syncing")
        }
        CoreError::Dispatch(DispatchError::Cancelled) => Some("query was interrupted"),
        _ => None,
    }
}

fn is_status(err: &NodeError, statuses: &[u16]) -> bool {
    matches!(err, NodeError::Transport(TransportError::Api { status, .. }) if statuses.contains(status))
}
