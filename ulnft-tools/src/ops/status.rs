// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use crate::{
    core::{config::DeployConfig, graph::ulnft, ledger::Ledger},
    utils::color::Color,
};

/// Prints what the ledger records for every contract, without contacting the chain.
pub fn status(config: &DeployConfig) -> crate::Result<Ledger> {
    let graph = ulnft::graph(&config.graph_config())?;
    let store = config.ledger_store();
    let ledger = store.load(config.network, graph.names())?;

    let params = config.network.config();
    greyln!(
        "Network: {} ({})",
        config.network.lavender(),
        params.chain_id
    );
    greyln!("Ledger: {}", store.path(config.network).display());
    for node in graph.nodes() {
        let name = node.name();
        match (ledger.code_id(name), ledger.address(name)) {
            (Some(code_id), Some(address)) => greyln!(
                "{name}: code id {}, address {}",
                code_id.mint(),
                address.mint()
            ),
            (Some(code_id), None) => greyln!(
                "{name}: code id {}, {}",
                code_id.mint(),
                "instantiation pending".yellow()
            ),
            _ => greyln!("{name}: {}", "pending".yellow()),
        }
    }
    for (name, _) in ledger.records().filter(|(name, _)| graph.get(name).is_none()) {
        greyln!("{name}: {}", "not in the dependency graph".grey());
    }

    if graph.is_complete(&ledger) {
        mintln!("All contracts deployed");
    }
    Ok(ledger)
}
