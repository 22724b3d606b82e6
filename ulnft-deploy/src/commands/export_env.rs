// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::path::PathBuf;

use ulnft_tools::ops;

use crate::{common_args::NetworkArgs, constants::DEFAULT_ENV_FILE, error::UlnftDeployResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[command(flatten)]
    network: NetworkArgs,
    /// File to write, replaced if it exists
    #[arg(long, short, default_value = DEFAULT_ENV_FILE)]
    output: PathBuf,
}

pub fn exec(args: Args) -> UlnftDeployResult {
    let config = args.network.config()?;
    ops::export_env(&config, &args.output)?;
    Ok(())
}
