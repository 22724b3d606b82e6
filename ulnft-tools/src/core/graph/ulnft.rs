// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Deployment order of the UL-NFT suite: the NFT core, then the marketplace and the
//! liquidity wrapper, both of which embed the core's address.

use std::path::PathBuf;

use serde_json::Value;

use super::{
    messages::{
        InstantiateMessage, LiquidityWrapperInstantiateMsg, MarketplaceInstantiateMsg,
        UlNftInstantiateMsg,
    },
    resolve_dependency, DependencyGraph, GraphError, GraphNode, InitMessageBuilder,
};
use crate::core::ledger::Ledger;

pub const UL_NFT: &str = "ulNft";
pub const MARKETPLACE: &str = "marketplace";
pub const LIQUIDITY_WRAPPER: &str = "liquidityWrapper";

/// Static inputs of the UL-NFT graph, resolved before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Bech32 prefix every address in an init message must carry.
    pub prefix: String,
    pub ul_nft: NodeConfig,
    pub marketplace: NodeConfig,
    pub liquidity_wrapper: NodeConfig,
    pub nft_name: String,
    pub nft_symbol: String,
    pub fee_percentage: u64,
    pub euclid_router: String,
    pub euclid_factory: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub bytecode: PathBuf,
    pub label: String,
}

pub fn graph(config: &GraphConfig) -> Result<DependencyGraph, GraphError> {
    DependencyGraph::new(vec![
        GraphNode::new(
            UL_NFT,
            &config.ul_nft.bytecode,
            &config.ul_nft.label,
            UlNftBuilder {
                prefix: config.prefix.clone(),
                name: config.nft_name.clone(),
                symbol: config.nft_symbol.clone(),
                euclid_router: config.euclid_router.clone(),
            },
        ),
        GraphNode::new(
            MARKETPLACE,
            &config.marketplace.bytecode,
            &config.marketplace.label,
            MarketplaceBuilder {
                prefix: config.prefix.clone(),
                fee_percentage: config.fee_percentage,
            },
        ),
        GraphNode::new(
            LIQUIDITY_WRAPPER,
            &config.liquidity_wrapper.bytecode,
            &config.liquidity_wrapper.label,
            LiquidityWrapperBuilder {
                prefix: config.prefix.clone(),
                euclid_router: config.euclid_router.clone(),
                euclid_factory: config.euclid_factory.clone(),
            },
        ),
    ])
}

fn finish(node: &str, prefix: &str, msg: impl InstantiateMessage) -> Result<Value, GraphError> {
    msg.validate(prefix)
        .map_err(|reason| GraphError::InvalidMessage {
            node: node.to_owned(),
            reason,
        })?;
    serde_json::to_value(msg).map_err(|source| GraphError::Encode {
        node: node.to_owned(),
        source,
    })
}

struct UlNftBuilder {
    prefix: String,
    name: String,
    symbol: String,
    euclid_router: String,
}

impl InitMessageBuilder for UlNftBuilder {
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    fn build(&self, _ledger: &Ledger) -> Result<Value, GraphError> {
        let msg = UlNftInstantiateMsg {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            euclid_router: self.euclid_router.clone(),
        };
        finish(UL_NFT, &self.prefix, msg)
    }
}

struct MarketplaceBuilder {
    prefix: String,
    fee_percentage: u64,
}

impl InitMessageBuilder for MarketplaceBuilder {
    fn dependencies(&self) -> Vec<String> {
        vec![UL_NFT.to_owned()]
    }

    fn build(&self, ledger: &Ledger) -> Result<Value, GraphError> {
        let msg = MarketplaceInstantiateMsg {
            ul_nft_contract: resolve_dependency(ledger, MARKETPLACE, UL_NFT)?,
            fee_percentage: self.fee_percentage,
        };
        finish(MARKETPLACE, &self.prefix, msg)
    }
}

struct LiquidityWrapperBuilder {
    prefix: String,
    euclid_router: String,
    euclid_factory: String,
}

impl InitMessageBuilder for LiquidityWrapperBuilder {
    fn dependencies(&self) -> Vec<String> {
        vec![UL_NFT.to_owned()]
    }

    fn build(&self, ledger: &Ledger) -> Result<Value, GraphError> {
        let msg = LiquidityWrapperInstantiateMsg {
            ul_nft_contract: resolve_dependency(ledger, LIQUIDITY_WRAPPER, UL_NFT)?,
            euclid_router: self.euclid_router.clone(),
            euclid_factory: self.euclid_factory.clone(),
        };
        finish(LIQUIDITY_WRAPPER, &self.prefix, msg)
    }
}
