use std::env;
use std::sync::Once;
use std::time::Duration;

use beacon_quorum_core::types::{Epoch, ValidatorIndex};
use beacon_quorum_core::{DispatchConfig, HttpOptions, MultiNodeClient, ReconcilePolicy};

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("beacon_quorum_core=debug")),
            )
            .with_target(true)
            .try_init();
    });
}

/// `BEACON_QUORUM_TEST_NODES` is a comma-separated list of beacon node URLs.
fn live_client(policy: ReconcilePolicy) -> MultiNodeClient {
    let nodes = env::var("BEACON_QUORUM_TEST_NODES").expect("BEACON_QUORUM_TEST_NODES must be set");
    let urls: Vec<&str> = nodes.split(',').map(str::trim).filter(|u| !u.is_empty()).collect();
    assert!(!urls.is_empty(), "at least one node URL is required");

    MultiNodeClient::connect(
        &urls,
        &HttpOptions {
            user: env::var("BEACON_QUORUM_TEST_USER").ok(),
            pass: env::var("BEACON_QUORUM_TEST_PASS").ok(),
            requests_per_second: Some(5),
        },
        DispatchConfig {
            policy,
            node_timeout: Duration::from_secs(15),
            overall_timeout: Duration::from_secs(45),
        },
    )
    .expect("client must construct")
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires reachable beacon nodes; set BEACON_QUORUM_TEST_NODES"]
async fn live_nodes_agree_on_chain_config() {
    init_tracing();
    let client = live_client(ReconcilePolicy::Consensus);

    eprintln!("[itest] checking deposit_contract consensus");
    let contract = client
        .deposit_contract()
        .await
        .expect("nodes must agree on the deposit contract");
    assert!(contract.value().chain_id > 0);

    eprintln!("[itest] checking fork_schedule consensus");
    let forks = client
        .fork_schedule()
        .await
        .expect("nodes must agree on the fork schedule");
    assert!(!forks.value().is_empty(), "fork schedule must list genesis");
    assert!(
        forks.value().windows(2).all(|w| w[0].epoch <= w[1].epoch),
        "forks must be listed in epoch order"
    );
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires reachable beacon nodes; set BEACON_QUORUM_TEST_NODES and BEACON_QUORUM_TEST_EPOCH"]
async fn live_attestation_rewards_decode() {
    init_tracing();
    let client = live_client(ReconcilePolicy::FirstSuccess);

    let epoch: u64 = env::var("BEACON_QUORUM_TEST_EPOCH")
        .expect("BEACON_QUORUM_TEST_EPOCH must be set")
        .parse()
        .expect("epoch must be a decimal integer");
    let validators = [ValidatorIndex(0), ValidatorIndex(1), ValidatorIndex(2)];

    eprintln!("[itest] fetching attestation rewards for epoch {epoch}");
    let rewards = client
        .attestation_rewards(Epoch(epoch), &validators)
        .await
        .expect("a node must return attestation rewards");
    eprintln!("[itest] answered by {}", rewards.responded_by());

    for (index, record) in rewards.value() {
        assert_eq!(record.index, *index);
        assert_eq!(record.epoch, Epoch(epoch));
        assert_eq!(
            record.total.0,
            record.head.0 + record.target.0 + record.source.0 + record.inactivity.0
        );
    }
}
