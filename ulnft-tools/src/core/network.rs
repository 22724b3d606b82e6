// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bech32 human readable prefix shared by every Archway network.
pub const ARCHWAY_PREFIX: &str = "archway";

/// Target chain environment for a deployment.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Local,
}

/// Static parameters of a [`Network`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_id: &'static str,
    pub rpc: &'static str,
    pub rest: &'static str,
    pub prefix: &'static str,
    pub gas_price: &'static str,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Local => "local",
        }
    }

    pub fn config(&self) -> NetworkConfig {
        match self {
            Network::Mainnet => NetworkConfig {
                chain_id: "archway-1",
                rpc: "https://rpc.mainnet.archway.io",
                rest: "https://api.mainnet.archway.io",
                prefix: ARCHWAY_PREFIX,
                gas_price: "140000000000aarch",
            },
            Network::Testnet => NetworkConfig {
                chain_id: "constantine-3",
                rpc: "https://rpc.constantine.archway.io",
                rest: "https://api.constantine.archway.io",
                prefix: ARCHWAY_PREFIX,
                gas_price: "140000000000aconst",
            },
            Network::Local => NetworkConfig {
                chain_id: "localnet",
                rpc: "http://localhost:26657",
                rest: "http://localhost:1317",
                prefix: ARCHWAY_PREFIX,
                gas_price: "140000000000aarch",
            },
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
