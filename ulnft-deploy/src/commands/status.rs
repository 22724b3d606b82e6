// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use ulnft_tools::ops;

use crate::{common_args::NetworkArgs, error::UlnftDeployResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[command(flatten)]
    network: NetworkArgs,
}

pub fn exec(args: Args) -> UlnftDeployResult {
    let config = args.network.config()?;
    ops::status(&config)?;
    Ok(())
}
