// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use ulnft_tools::{core::deployment::events::EventBus, ops};

use crate::{
    common_args::{AdminArgs, AuthArgs, EuclidArgs, FeeArgs, NetworkArgs},
    error::UlnftDeployResult,
    utils::print_progress,
};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[command(flatten)]
    network: NetworkArgs,
    /// Signing key source.
    #[command(flatten)]
    auth: AuthArgs,
    #[command(flatten)]
    euclid: EuclidArgs,
    #[command(flatten)]
    fee: FeeArgs,
    #[command(flatten)]
    admin: AdminArgs,
}

pub async fn exec(args: Args) -> UlnftDeployResult {
    let mut config = args.network.config()?;
    args.auth.apply(&mut config);
    args.euclid.apply(&mut config);
    config.fee = args.fee.fee_mode();
    config.admin = args.admin.admin();

    let events = EventBus::new();
    events.subscribe(print_progress);
    ops::deploy(&config, &events).await?;
    Ok(())
}
