// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use crate::error::UlnftDeployResult;

mod deploy;
mod export_env;
mod status;

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Upload and instantiate every contract not yet recorded in the ledger
    #[clap(visible_alias = "d")]
    Deploy(deploy::Args),
    /// Show what the ledger records, without contacting the chain
    #[clap(visible_alias = "s")]
    Status(status::Args),
    /// Write deployed code ids and addresses to an env file for the front-end
    ExportEnv(export_env::Args),
}

pub async fn exec(cmd: Command) -> UlnftDeployResult {
    match cmd {
        Command::Deploy(args) => deploy::exec(args).await,
        Command::Status(args) => status::exec(args),
        Command::ExportEnv(args) => export_env::exec(args),
    }
}
