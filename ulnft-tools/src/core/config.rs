// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Inputs of a deployment, gathered from the manifest and the command line.

use std::path::PathBuf;

use super::{
    client::{archwayd::ArchwaydConfig, FeeMode},
    deployment::{Admin, DeploymentConfig, DeploymentError},
    graph::{
        messages::{validate_address, validate_fee},
        ulnft::{GraphConfig, NodeConfig, LIQUIDITY_WRAPPER, MARKETPLACE, UL_NFT},
    },
    ledger::{LedgerStore, DEFAULT_LEDGER_DIR},
    manifest::DeployManifest,
    network::Network,
};

pub const DEFAULT_NFT_NAME: &str = "Unified Liquidity NFT";
pub const DEFAULT_NFT_SYMBOL: &str = "ULNFT";
/// 2.5%
pub const DEFAULT_FEE_PERCENTAGE: u64 = 250;
pub const DEFAULT_KEYRING_BACKEND: &str = "test";

#[derive(Debug, Clone, PartialEq)]
pub struct DeployConfig {
    pub network: Network,
    pub ledger_dir: PathBuf,
    /// Keyring entry used to sign.
    pub key: Option<String>,
    pub keyring_backend: String,
    pub archwayd: PathBuf,
    /// RPC endpoint replacing the network default.
    pub node: Option<String>,
    pub fee: FeeMode,
    pub admin: Admin,
    pub ul_nft: NodeConfig,
    pub marketplace: NodeConfig,
    pub liquidity_wrapper: NodeConfig,
    pub nft_name: String,
    pub nft_symbol: String,
    pub fee_percentage: u64,
    pub euclid_router: Option<String>,
    pub euclid_factory: Option<String>,
}

impl DeployConfig {
    pub fn new(network: Network) -> Self {
        let node = |file: &str, label: &str| NodeConfig {
            bytecode: PathBuf::from("artifacts").join(file),
            label: label.to_owned(),
        };
        Self {
            network,
            ledger_dir: DEFAULT_LEDGER_DIR.into(),
            key: None,
            keyring_backend: DEFAULT_KEYRING_BACKEND.to_owned(),
            archwayd: super::client::archwayd::DEFAULT_BINARY.into(),
            node: None,
            fee: FeeMode::default(),
            admin: Admin::default(),
            ul_nft: node("ul_nft_core.wasm", "UL-NFT Core v1"),
            marketplace: node("marketplace.wasm", "UL-NFT Marketplace v1"),
            liquidity_wrapper: node("liquidity_wrapper.wasm", "Liquidity Wrapper v1"),
            nft_name: DEFAULT_NFT_NAME.to_owned(),
            nft_symbol: DEFAULT_NFT_SYMBOL.to_owned(),
            fee_percentage: DEFAULT_FEE_PERCENTAGE,
            euclid_router: None,
            euclid_factory: None,
        }
    }

    /// Overlay the values set in a `Deploy.toml`.
    pub fn apply_manifest(&mut self, manifest: &DeployManifest) {
        if let Some(dir) = &manifest.deployment.ledger_dir {
            self.ledger_dir = dir.clone();
        }
        for (name, contract) in &manifest.contracts {
            let Some(node) = self.node_mut(name) else {
                warn!(@yellow, "ignoring unknown contract {name:?} in manifest");
                continue;
            };
            if let Some(bytecode) = &contract.bytecode {
                node.bytecode = bytecode.clone();
            }
            if let Some(label) = &contract.label {
                node.label = label.clone();
            }
        }
        if let Some(name) = &manifest.nft.name {
            self.nft_name = name.clone();
        }
        if let Some(symbol) = &manifest.nft.symbol {
            self.nft_symbol = symbol.clone();
        }
        if let Some(fee) = manifest.marketplace.fee_percentage {
            self.fee_percentage = fee;
        }
        if let Some(router) = &manifest.euclid.router {
            self.euclid_router = Some(router.clone());
        }
        if let Some(factory) = &manifest.euclid.factory {
            self.euclid_factory = Some(factory.clone());
        }
    }

    fn node_mut(&mut self, name: &str) -> Option<&mut NodeConfig> {
        match name {
            UL_NFT => Some(&mut self.ul_nft),
            MARKETPLACE => Some(&mut self.marketplace),
            LIQUIDITY_WRAPPER => Some(&mut self.liquidity_wrapper),
            _ => None,
        }
    }

    /// Check every input a deployment needs, reporting all problems at once.
    pub fn validate(&self) -> Result<(), DeploymentError> {
        let prefix = self.network.config().prefix;
        let mut problems = Vec::new();

        if self.key.as_deref().map_or(true, |key| key.trim().is_empty()) {
            problems.push("signing key (--key or DEPLOYER_KEY)".to_owned());
        }
        let addresses = [
            (
                "euclid router",
                "--euclid-router or EUCLID_ROUTER_ADDRESS",
                &self.euclid_router,
            ),
            (
                "euclid factory",
                "--euclid-factory or EUCLID_FACTORY_ADDRESS",
                &self.euclid_factory,
            ),
        ];
        for (field, source, address) in addresses {
            match address {
                None => problems.push(format!("{field} address ({source})")),
                Some(address) => {
                    if let Err(reason) = validate_address(field, address, prefix) {
                        problems.push(reason);
                    }
                }
            }
        }
        if let Admin::Address(admin) = &self.admin {
            if let Err(reason) = validate_address("admin", admin, prefix) {
                problems.push(reason);
            }
        }
        if let Err(reason) = validate_fee(self.fee_percentage) {
            problems.push(reason);
        }

        if !problems.is_empty() {
            return Err(DeploymentError::ConfigurationMissing(problems));
        }
        Ok(())
    }

    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            prefix: self.network.config().prefix.to_owned(),
            ul_nft: self.ul_nft.clone(),
            marketplace: self.marketplace.clone(),
            liquidity_wrapper: self.liquidity_wrapper.clone(),
            nft_name: self.nft_name.clone(),
            nft_symbol: self.nft_symbol.clone(),
            fee_percentage: self.fee_percentage,
            euclid_router: self.euclid_router.clone().unwrap_or_default(),
            euclid_factory: self.euclid_factory.clone().unwrap_or_default(),
        }
    }

    pub fn archwayd_config(&self) -> ArchwaydConfig {
        let mut config = ArchwaydConfig::new(self.network, self.key.clone().unwrap_or_default());
        config.binary = self.archwayd.clone();
        config.keyring_backend = self.keyring_backend.clone();
        if let Some(node) = &self.node {
            config.node = node.clone();
        }
        config
    }

    pub fn deployment_config(&self) -> DeploymentConfig {
        DeploymentConfig {
            fee: self.fee.clone(),
            admin: self.admin.clone(),
        }
    }

    pub fn ledger_store(&self) -> LedgerStore {
        LedgerStore::new(&self.ledger_dir)
    }
}
