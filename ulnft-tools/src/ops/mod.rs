// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

pub use deploy::{deploy, print_addresses};
pub use export_env::{env_file, export_env};
pub use status::status;

mod deploy;
mod export_env;
mod status;
