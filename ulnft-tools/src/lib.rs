// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Tools for deploying the UL-NFT contract suite.
//!
//! Deployment is modelled as a sequence of idempotent upserts against a per-network
//! [`Ledger`](core::ledger::Ledger): every contract in the
//! [`DependencyGraph`](core::graph::DependencyGraph) is uploaded and instantiated at most
//! once, and the ledger is persisted after every step so an interrupted run can resume.

#[macro_use]
mod macros;

pub mod core;
pub(crate) mod error;
pub mod ops;
pub mod utils;

pub use error::{Error, Result};
