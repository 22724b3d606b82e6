// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Typed instantiation messages of the UL-NFT contracts.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Upper bound of a fee expressed in basis points (100%).
pub const MAX_FEE_BASIS_POINTS: u64 = 10_000;

/// An instantiation message checked against its contract's expectations before sending.
pub trait InstantiateMessage: Serialize {
    fn validate(&self, prefix: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UlNftInstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub euclid_router: String,
}

impl InstantiateMessage for UlNftInstantiateMsg {
    fn validate(&self, prefix: &str) -> Result<(), String> {
        require_non_empty("name", &self.name)?;
        require_non_empty("symbol", &self.symbol)?;
        validate_address("euclid_router", &self.euclid_router, prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketplaceInstantiateMsg {
    pub ul_nft_contract: String,
    /// Basis points, 250 is 2.5%.
    pub fee_percentage: u64,
}

impl InstantiateMessage for MarketplaceInstantiateMsg {
    fn validate(&self, prefix: &str) -> Result<(), String> {
        validate_address("ul_nft_contract", &self.ul_nft_contract, prefix)?;
        validate_fee(self.fee_percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiquidityWrapperInstantiateMsg {
    pub ul_nft_contract: String,
    pub euclid_router: String,
    pub euclid_factory: String,
}

impl InstantiateMessage for LiquidityWrapperInstantiateMsg {
    fn validate(&self, prefix: &str) -> Result<(), String> {
        validate_address("ul_nft_contract", &self.ul_nft_contract, prefix)?;
        validate_address("euclid_router", &self.euclid_router, prefix)?;
        validate_address("euclid_factory", &self.euclid_factory, prefix)
    }
}

pub fn validate_fee(fee_percentage: u64) -> Result<(), String> {
    if fee_percentage > MAX_FEE_BASIS_POINTS {
        return Err(format!(
            "fee_percentage {fee_percentage} exceeds {MAX_FEE_BASIS_POINTS} basis points"
        ));
    }
    Ok(())
}

/// Check that `address` is a bech32 account or contract address with the given prefix.
pub fn validate_address(field: &str, address: &str, prefix: &str) -> Result<(), String> {
    static BECH32_DATA: OnceLock<Regex> = OnceLock::new();
    // data part of the bech32 charset, 20 or 32 byte payloads plus checksum
    let data = BECH32_DATA.get_or_init(|| {
        Regex::new(r"^[02-9ac-hj-np-z]{38,58}$").expect("bech32 pattern is valid")
    });

    require_non_empty(field, address)?;
    let Some(rest) = address
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('1'))
    else {
        return Err(format!("{field} {address:?} does not start with {prefix}1"));
    };
    if !data.is_match(rest) {
        return Err(format!("{field} {address:?} is not a valid bech32 address"));
    }
    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}
