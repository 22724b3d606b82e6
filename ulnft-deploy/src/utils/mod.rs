// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::fmt::Display;

use ulnft_tools::core::deployment::events::DeploymentEvent;

use style::{BOLD, DIM, ERROR, SUCCESS};

mod style;

pub fn print_error(err: impl Display) {
    eprintln!("{ERROR}error{ERROR:#}{BOLD}:{BOLD:#} {err}");
}

/// Operator facing progress line for a deployment event.
pub fn print_progress(event: &DeploymentEvent) {
    match event {
        DeploymentEvent::Started { network, contracts } => {
            println!("{BOLD}Deploying {contracts} contracts to {network}{BOLD:#}");
        }
        DeploymentEvent::Skipped { name, step } => {
            println!("  {name}: {DIM}{step} already done{DIM:#}");
        }
        DeploymentEvent::Uploading {
            name,
            bytecode_path,
            size,
        } => {
            println!(
                "  {name}: uploading {} ({size} bytes)",
                bytecode_path.display()
            );
        }
        DeploymentEvent::Uploaded {
            name,
            code_id,
            tx_hash,
        } => {
            println!("  {name}: {SUCCESS}code id {code_id}{SUCCESS:#} {DIM}(tx {tx_hash}){DIM:#}");
        }
        DeploymentEvent::Instantiating { name, code_id } => {
            println!("  {name}: instantiating code id {code_id}");
        }
        DeploymentEvent::Instantiated {
            name,
            address,
            tx_hash,
        } => {
            println!("  {name}: {SUCCESS}{address}{SUCCESS:#} {DIM}(tx {tx_hash}){DIM:#}");
        }
        DeploymentEvent::Failed { name, step, .. } => {
            eprintln!("  {name}: {ERROR}{step} failed{ERROR:#}");
        }
        DeploymentEvent::Finished { .. } => {}
    }
}
