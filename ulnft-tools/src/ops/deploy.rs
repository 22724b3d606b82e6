// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Contract deployment.

use crate::{
    core::{
        client::archwayd::ArchwaydClient,
        config::DeployConfig,
        deployment::{events::EventBus, DeploymentError, DeploymentFailure, Orchestrator},
        graph::{ulnft, DependencyGraph},
        ledger::Ledger,
    },
    utils::color::Color,
};

/// Deploys the UL-NFT contracts, resuming from whatever the ledger already records.
///
/// Configuration is validated before the chain is touched. On failure, the contracts
/// deployed so far are printed along with how to resume.
pub async fn deploy(
    config: &DeployConfig,
    events: &EventBus,
) -> Result<Ledger, DeploymentFailure> {
    let fail = |error| DeploymentFailure {
        ledger: None,
        error,
    };
    config.validate().map_err(fail)?;
    let graph = ulnft::graph(&config.graph_config())
        .map_err(|err| fail(DeploymentError::InvalidGraph(err)))?;

    let archwayd = config.archwayd_config();
    let key = archwayd.key.clone();
    let client = ArchwaydClient::connect(archwayd)
        .await
        .map_err(|source| fail(DeploymentError::Signer { key, source }))?;

    let store = config.ledger_store();
    let result = Orchestrator::builder()
        .store(&store)
        .graph(&graph)
        .client(&client)
        .config(config.deployment_config())
        .events(events)
        .build()
        .run(config.network)
        .await;

    match &result {
        Ok(ledger) => {
            mintln!("Deployed to {}", config.network);
            print_addresses(&graph, ledger);
        }
        Err(failure) => {
            if let Some(ledger) = &failure.ledger {
                greyln!("Deployed before the failure:");
                print_addresses(&graph, ledger);
            }
            if failure.error.is_resumable() {
                greyln!(
                    "Progress is saved in {}, run the same command again to resume",
                    store.path(config.network).display().yellow()
                );
            }
        }
    }
    result
}

/// Print the address of every instantiated contract, in graph order.
pub fn print_addresses(graph: &DependencyGraph, ledger: &Ledger) {
    let mut any = false;
    for node in graph.nodes() {
        if let Some(address) = ledger.address(node.name()) {
            greyln!("  {}: {}", node.name(), address.lavender());
            any = true;
        }
    }
    if !any {
        greyln!("  (none)");
    }
}
