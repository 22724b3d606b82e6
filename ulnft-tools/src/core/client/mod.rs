// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Chain access needed by the deployment: uploading bytecode and instantiating contracts.

use serde_json::Value;

pub mod archwayd;
#[cfg(test)]
pub(crate) mod mock;

/// How fees are paid for a transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum FeeMode {
    /// Simulate to estimate gas, scale by `gas_adjustment`, pay at the network gas price.
    Auto { gas_adjustment: f64 },
    /// Fixed gas limit and fee amount, e.g. `"500000aarch"`.
    Fixed { gas: u64, fees: String },
}

impl Default for FeeMode {
    fn default() -> Self {
        FeeMode::Auto {
            gas_adjustment: 1.4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstantiateOptions {
    /// Account allowed to migrate the contract, none makes it immutable.
    pub admin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub code_id: u64,
    pub tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantiateResult {
    pub contract_address: String,
    pub tx_hash: String,
}

/// Network operations the orchestrator depends on.
///
/// Both operations are network round trips which may fail or time out. Any retry policy
/// lives in the implementation.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Address of the signing account.
    fn sender(&self) -> &str;

    async fn upload(
        &self,
        sender: &str,
        bytecode: &[u8],
        fee: &FeeMode,
    ) -> Result<UploadResult, ClientError>;

    async fn instantiate(
        &self,
        sender: &str,
        code_id: u64,
        msg: &Value,
        label: &str,
        fee: &FeeMode,
        options: &InstantiateOptions,
    ) -> Result<InstantiateResult, ClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{command} failed (exit code: {code:?}): {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("transaction {tx_hash} rejected with code {code}: {raw_log}")]
    Rejected {
        tx_hash: String,
        code: u32,
        raw_log: String,
    },
    #[error("transaction {tx_hash} not found after {attempts} attempts")]
    TxNotFound { tx_hash: String, attempts: u32 },
    #[error("transaction {tx_hash} has no {event}.{attribute} attribute")]
    MissingAttribute {
        tx_hash: String,
        event: String,
        attribute: String,
    },
    #[error("unexpected output from {command}: {source}")]
    MalformedOutput {
        command: String,
        source: serde_json::Error,
    },
    #[error("invalid code id {0:?}")]
    InvalidCodeId(String),
}
