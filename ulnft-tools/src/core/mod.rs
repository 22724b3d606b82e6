// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

pub mod client;
pub mod config;
pub mod deployment;
pub mod graph;
pub mod ledger;
pub mod manifest;
pub mod network;
