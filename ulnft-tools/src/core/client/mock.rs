// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Recording [`ChainClient`] for tests.

use std::{collections::HashSet, sync::Mutex};

use serde_json::Value;

use super::{
    ChainClient, ClientError, FeeMode, InstantiateOptions, InstantiateResult, UploadResult,
};
use crate::core::graph::messages::tests::ACCOUNT;

const BECH32_CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload {
        bytecode: Vec<u8>,
    },
    Instantiate {
        code_id: u64,
        msg: Value,
        label: String,
        admin: Option<String>,
    },
}

/// Hands out sequential code ids and addresses derived from them, recording every call.
#[derive(Debug)]
pub struct MockClient {
    next_code_id: Mutex<u64>,
    calls: Mutex<Vec<Call>>,
    failing_uploads: Mutex<HashSet<Vec<u8>>>,
    failing_labels: Mutex<HashSet<String>>,
    blank_labels: Mutex<HashSet<String>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client whose first upload is assigned `code_id`.
    pub fn starting_at(code_id: u64) -> Self {
        Self {
            next_code_id: Mutex::new(code_id),
            calls: Mutex::default(),
            failing_uploads: Mutex::default(),
            failing_labels: Mutex::default(),
            blank_labels: Mutex::default(),
        }
    }

    /// Reject every upload of `bytecode`.
    pub fn fail_upload_of(&self, bytecode: &[u8]) {
        self.failing_uploads.lock().unwrap().insert(bytecode.to_vec());
    }

    /// Reject every instantiation labelled `label`.
    pub fn fail_instantiate_of(&self, label: &str) {
        self.failing_labels.lock().unwrap().insert(label.to_owned());
    }

    /// Report instantiations labelled `label` as successful, but without an address.
    pub fn blank_address_for(&self, label: &str) {
        self.blank_labels.lock().unwrap().insert(label.to_owned());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn rejected(reason: &str) -> ClientError {
        ClientError::Rejected {
            tx_hash: "MOCK".to_owned(),
            code: 5,
            raw_log: reason.to_owned(),
        }
    }
}

/// Well-formed contract address that is unique per code id.
pub fn contract_address(code_id: u64) -> String {
    let mut data = vec![b'q'; 58];
    let mut rest = code_id;
    for byte in data.iter_mut().rev() {
        if rest == 0 {
            break;
        }
        *byte = BECH32_CHARSET[(rest % 32) as usize];
        rest /= 32;
    }
    format!("archway1{}", String::from_utf8_lossy(&data))
}

impl ChainClient for MockClient {
    fn sender(&self) -> &str {
        ACCOUNT
    }

    async fn upload(
        &self,
        _sender: &str,
        bytecode: &[u8],
        _fee: &FeeMode,
    ) -> Result<UploadResult, ClientError> {
        self.calls.lock().unwrap().push(Call::Upload {
            bytecode: bytecode.to_vec(),
        });
        if self.failing_uploads.lock().unwrap().contains(bytecode) {
            return Err(Self::rejected("out of gas"));
        }
        let mut next = self.next_code_id.lock().unwrap();
        let code_id = *next;
        *next += 1;
        Ok(UploadResult {
            code_id,
            tx_hash: format!("STORE{code_id}"),
        })
    }

    async fn instantiate(
        &self,
        _sender: &str,
        code_id: u64,
        msg: &Value,
        label: &str,
        _fee: &FeeMode,
        options: &InstantiateOptions,
    ) -> Result<InstantiateResult, ClientError> {
        self.calls.lock().unwrap().push(Call::Instantiate {
            code_id,
            msg: msg.clone(),
            label: label.to_owned(),
            admin: options.admin.clone(),
        });
        if self.failing_labels.lock().unwrap().contains(label) {
            return Err(Self::rejected("instantiate wasm contract failed"));
        }
        let contract_address = if self.blank_labels.lock().unwrap().contains(label) {
            String::new()
        } else {
            contract_address(code_id)
        };
        Ok(InstantiateResult {
            contract_address,
            tx_hash: format!("INIT{code_id}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::messages::validate_address;

    #[test]
    fn contract_addresses_are_valid_and_distinct() {
        let a = contract_address(1);
        let b = contract_address(33);
        assert_ne!(a, b);
        for addr in [&a, &b, &contract_address(0)] {
            validate_address("contract", addr, "archway").unwrap();
        }
    }
}
