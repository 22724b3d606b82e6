// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Export of deployed code ids and addresses as `KEY=value` lines for the front-end.

use std::path::Path;

use crate::{
    core::{
        config::DeployConfig,
        graph::{ulnft, DependencyGraph},
        ledger::Ledger,
        network::Network,
    },
    utils::write_atomic,
};

/// Render the env file for `ledger`. Contracts which are not fully deployed are left out.
pub fn env_file(graph: &DependencyGraph, ledger: &Ledger, network: Network, rpc: &str) -> String {
    let params = network.config();
    let mut lines = vec![
        format!("# UL-NFT deployment on {network} ({})", params.chain_id),
        format!("NEXT_PUBLIC_ARCHWAY_RPC={rpc}"),
        format!("NEXT_PUBLIC_ARCHWAY_REST={}", params.rest),
    ];
    for node in graph.nodes() {
        let (Some(code_id), Some(address)) =
            (ledger.code_id(node.name()), ledger.address(node.name()))
        else {
            continue;
        };
        let key = node.env_key();
        lines.push(format!("{key}_CODE_ID={code_id}"));
        lines.push(format!("{key}_ADDRESS={address}"));
        lines.push(format!("NEXT_PUBLIC_{key}_ADDRESS={address}"));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Write the env file for the configured network to `output`, replacing it atomically.
pub fn export_env(config: &DeployConfig, output: impl AsRef<Path>) -> crate::Result<Ledger> {
    let output = output.as_ref();
    let graph = ulnft::graph(&config.graph_config())?;
    let ledger = config
        .ledger_store()
        .read(config.network, graph.names())?;

    for node in graph.nodes() {
        if !ledger.is_instantiated(node.name()) {
            warn!(@yellow, "{} is not deployed yet, leaving it out", node.name());
        }
    }
    let rpc = config
        .node
        .as_deref()
        .unwrap_or(config.network.config().rpc);
    write_atomic(output, env_file(&graph, &ledger, config.network, rpc).as_bytes())?;
    mintln!("Wrote {}", output.display());
    Ok(ledger)
}
