// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Manifest(#[from] crate::core::manifest::ManifestError),
    #[error("{0}")]
    Ledger(#[from] crate::core::ledger::LedgerError),
    #[error("{0}")]
    Graph(#[from] crate::core::graph::GraphError),
    #[error("{0}")]
    Client(#[from] crate::core::client::ClientError),
    #[error("{0}")]
    Deployment(#[from] crate::core::deployment::DeploymentError),
}
