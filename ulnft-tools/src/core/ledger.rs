// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Persisted record of deployment progress for one network.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::network::Network;
use crate::utils::write_atomic;

/// Directory ledgers are written to unless configured otherwise.
pub const DEFAULT_LEDGER_DIR: &str = "config";

/// What has been uploaded and instantiated so far, keyed by logical contract name.
///
/// Fields this version does not know about are carried through a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    network: Network,
    #[serde(default)]
    contracts: BTreeMap<String, ContractRecord>,
    #[serde(flatten)]
    extra: Map<String, Value>,
    /// Names the current dependency graph declares.
    #[serde(skip)]
    declared: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContractRecord {
    pub fn is_uploaded(&self) -> bool {
        self.code_id.is_some()
    }

    pub fn is_instantiated(&self) -> bool {
        self.address.as_deref().is_some_and(|addr| !addr.is_empty())
    }
}

impl Ledger {
    /// An empty ledger accepting records for the `declared` contract names.
    pub fn new<I, S>(network: Network, declared: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            network,
            contracts: BTreeMap::new(),
            extra: Map::new(),
            declared: declared.into_iter().map(Into::into).collect(),
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn record(&self, name: &str) -> Option<&ContractRecord> {
        self.contracts.get(name)
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &ContractRecord)> {
        self.contracts
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    pub fn is_uploaded(&self, name: &str) -> bool {
        self.record(name).is_some_and(ContractRecord::is_uploaded)
    }

    pub fn is_instantiated(&self, name: &str) -> bool {
        self.record(name).is_some_and(ContractRecord::is_instantiated)
    }

    pub fn code_id(&self, name: &str) -> Option<u64> {
        self.record(name).and_then(|record| record.code_id)
    }

    /// Address of an instantiated contract.
    pub fn address(&self, name: &str) -> Option<&str> {
        self.record(name)
            .filter(|record| record.is_instantiated())
            .and_then(|record| record.address.as_deref())
    }

    /// Name to address of every instantiated contract.
    pub fn addresses(&self) -> BTreeMap<&str, &str> {
        self.records()
            .filter_map(|(name, _)| Some((name, self.address(name)?)))
            .collect()
    }

    pub fn record_upload(&mut self, name: &str, code_id: u64) -> Result<(), LedgerError> {
        if !self.declared.contains(name) {
            return Err(LedgerError::UnknownContract(name.to_owned()));
        }
        self.contracts.entry(name.to_owned()).or_default().code_id = Some(code_id);
        Ok(())
    }

    pub fn record_instantiate(
        &mut self,
        name: &str,
        address: impl Into<String>,
    ) -> Result<(), LedgerError> {
        if !self.is_uploaded(name) {
            return Err(LedgerError::NotUploaded(name.to_owned()));
        }
        if !self.declared.contains(name) {
            return Err(LedgerError::UnknownContract(name.to_owned()));
        }
        let address = address.into();
        if address.trim().is_empty() {
            return Err(LedgerError::EmptyAddress(name.to_owned()));
        }
        if let Some(record) = self.contracts.get_mut(name) {
            record.address = Some(address);
        }
        Ok(())
    }

    fn check_consistency(&self) -> Result<(), LedgerError> {
        match self
            .records()
            .find(|(_, record)| record.is_instantiated() && !record.is_uploaded())
        {
            Some((name, _)) => Err(LedgerError::Inconsistent(name.to_owned())),
            None => Ok(()),
        }
    }
}

/// Durable storage for ledgers, one JSON file per network.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    dir: PathBuf,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_DIR)
    }
}

impl LedgerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, network: Network) -> PathBuf {
        self.dir.join(format!("deployment.{network}.json"))
    }

    /// Read the persisted ledger, failing with [`LedgerError::NotFound`] if there is none.
    pub fn read<I, S>(&self, network: Network, declared: I) -> Result<Ledger, LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = self.path(network);
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(LedgerError::NotFound(path))
            }
            Err(source) => return Err(LedgerError::Io { path, source }),
        };

        let mut ledger: Ledger = serde_json::from_slice(&contents)
            .map_err(|source| LedgerError::Corrupt {
                path: path.clone(),
                source,
            })?;
        if ledger.network != network {
            return Err(LedgerError::NetworkMismatch {
                path,
                expected: network,
                found: ledger.network,
            });
        }
        ledger.check_consistency()?;
        ledger.declared = declared.into_iter().map(Into::into).collect();
        Ok(ledger)
    }

    /// Read the persisted ledger, starting from an empty one if none exists yet.
    ///
    /// Any other failure, including an unparsable file, is returned as an error.
    pub fn load<I, S>(&self, network: Network, declared: I) -> Result<Ledger, LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let declared: Vec<String> = declared.into_iter().map(Into::into).collect();
        match self.read(network, declared.iter().cloned()) {
            Ok(ledger) => {
                debug!(@grey, "loaded ledger from {}", self.path(network).display());
                Ok(ledger)
            }
            Err(LedgerError::NotFound(path)) => {
                info!(@grey, "no ledger at {}, starting a new one", path.display());
                Ok(Ledger::new(network, declared))
            }
            Err(err) => Err(err),
        }
    }

    /// Overwrite the persisted ledger atomically.
    pub fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        let path = self.path(ledger.network);
        let mut contents = serde_json::to_vec_pretty(ledger).map_err(LedgerError::Encode)?;
        contents.push(b'\n');
        write_atomic(&path, &contents).map_err(|source| LedgerError::Io { path, source })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("no ledger found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("ledger io error at {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("ledger at {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode ledger: {0}")]
    Encode(serde_json::Error),
    #[error("ledger at {} belongs to {found}, expected {expected}", .path.display())]
    NetworkMismatch {
        path: PathBuf,
        expected: Network,
        found: Network,
    },
    #[error("ledger record {0:?} has an address but no code id")]
    Inconsistent(String),
    #[error("unknown contract {0:?}: not declared in the dependency graph")]
    UnknownContract(String),
    #[error("contract {0:?} has not been uploaded")]
    NotUploaded(String),
    #[error("refusing to record an empty address for {0:?}")]
    EmptyAddress(String),
}
