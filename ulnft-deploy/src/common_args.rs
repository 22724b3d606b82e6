// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::path::PathBuf;

use ulnft_tools::core::{
    client::{archwayd::DEFAULT_BINARY, FeeMode},
    config::{DeployConfig, DEFAULT_KEYRING_BACKEND},
    deployment::Admin,
    manifest::{self, DeployManifest, ManifestError},
    network::Network,
};

use crate::error::UlnftDeployError;

#[derive(Debug, clap::Args)]
pub struct NetworkArgs {
    /// Network to deploy to
    #[arg(long, value_enum, env = "NETWORK", default_value_t = Network::Testnet)]
    pub network: Network,
    /// Deployment manifest, defaults are used if it does not exist
    #[arg(long, default_value = manifest::FILENAME)]
    manifest: PathBuf,
    /// Directory holding the per-network ledger files [default: config]
    #[arg(long)]
    ledger_dir: Option<PathBuf>,
    /// RPC endpoint to use instead of the network default
    #[arg(long)]
    node: Option<String>,
}

impl NetworkArgs {
    /// Defaults, overlaid with the manifest, overlaid with these flags.
    pub fn config(&self) -> Result<DeployConfig, UlnftDeployError> {
        let mut config = DeployConfig::new(self.network);
        match manifest::load::<DeployManifest>(&self.manifest) {
            Ok(manifest) => config.apply_manifest(&manifest),
            Err(ManifestError::Missing) => {
                log::debug!("no {} found, using defaults", self.manifest.display());
            }
            Err(err) => return Err(err.into()),
        }
        if let Some(dir) = &self.ledger_dir {
            config.ledger_dir = dir.clone();
        }
        if let Some(node) = &self.node {
            config.node = Some(node.clone());
        }
        Ok(config)
    }
}

#[derive(Debug, clap::Args)]
pub struct AuthArgs {
    /// Name of the keyring entry signing the transactions
    #[arg(long, env = "DEPLOYER_KEY")]
    key: Option<String>,
    /// Keyring backend holding the key
    #[arg(long, env = "DEPLOYER_KEYRING_BACKEND", default_value = DEFAULT_KEYRING_BACKEND)]
    keyring_backend: String,
    /// Path to the archwayd binary
    #[arg(long, env = "ARCHWAYD_BIN", default_value = DEFAULT_BINARY)]
    archwayd: PathBuf,
}

impl AuthArgs {
    pub fn apply(&self, config: &mut DeployConfig) {
        if self.key.is_some() {
            config.key = self.key.clone();
        }
        config.keyring_backend = self.keyring_backend.clone();
        config.archwayd = self.archwayd.clone();
    }
}

#[derive(Debug, clap::Args)]
pub struct FeeArgs {
    /// Multiplier applied to the simulated gas
    #[arg(long, default_value = "1.4")]
    gas_adjustment: f64,
    /// Fixed gas limit, skipping simulation
    #[arg(long, requires = "fees")]
    gas: Option<u64>,
    /// Fixed fee paid with --gas, e.g. 700000000000000000aconst
    #[arg(long, requires = "gas")]
    fees: Option<String>,
}

impl FeeArgs {
    pub fn fee_mode(&self) -> FeeMode {
        match (self.gas, &self.fees) {
            (Some(gas), Some(fees)) => FeeMode::Fixed {
                gas,
                fees: fees.clone(),
            },
            _ => FeeMode::Auto {
                gas_adjustment: self.gas_adjustment,
            },
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct AdminArgs {
    /// Admin of the instantiated contracts [default: the deploying account]
    #[arg(long, conflicts_with = "no_admin")]
    admin: Option<String>,
    /// Instantiate the contracts without an admin, making them immutable
    #[arg(long)]
    no_admin: bool,
}

impl AdminArgs {
    pub fn admin(&self) -> Admin {
        match (&self.admin, self.no_admin) {
            (_, true) => Admin::None,
            (Some(address), false) => Admin::Address(address.clone()),
            (None, false) => Admin::Sender,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct EuclidArgs {
    /// Euclid router contract address
    #[arg(long, env = "EUCLID_ROUTER_ADDRESS")]
    euclid_router: Option<String>,
    /// Euclid factory contract address
    #[arg(long, env = "EUCLID_FACTORY_ADDRESS")]
    euclid_factory: Option<String>,
}

impl EuclidArgs {
    pub fn apply(&self, config: &mut DeployConfig) {
        if let Some(router) = &self.euclid_router {
            config.euclid_router = Some(router.clone());
        }
        if let Some(factory) = &self.euclid_factory {
            config.euclid_factory = Some(factory.clone());
        }
    }
}
