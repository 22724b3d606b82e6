// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! [`ChainClient`] backed by the `archwayd` node CLI.
//!
//! Transactions are broadcast in sync mode and then polled for with `query tx`, so a
//! result is only reported once the transaction is part of a block.

use std::{io::Write, path::PathBuf, time::Duration};

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tokio::process::Command;

use super::{
    ChainClient, ClientError, FeeMode, InstantiateOptions, InstantiateResult, UploadResult,
};
use crate::core::network::Network;

pub const DEFAULT_BINARY: &str = "archwayd";

#[derive(Debug, Clone, PartialEq)]
pub struct ArchwaydConfig {
    pub binary: PathBuf,
    pub node: String,
    pub chain_id: String,
    /// Keyring entry that signs every transaction.
    pub key: String,
    pub keyring_backend: String,
    pub gas_prices: String,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
}

impl ArchwaydConfig {
    pub fn new(network: Network, key: impl Into<String>) -> Self {
        let params = network.config();
        Self {
            binary: DEFAULT_BINARY.into(),
            node: params.rpc.to_owned(),
            chain_id: params.chain_id.to_owned(),
            key: key.into(),
            keyring_backend: "test".to_owned(),
            gas_prices: params.gas_price.to_owned(),
            poll_attempts: 30,
            poll_interval: Duration::from_secs(2),
        }
    }
}

#[derive(Debug)]
pub struct ArchwaydClient {
    config: ArchwaydConfig,
    sender: String,
}

impl ArchwaydClient {
    /// Resolve the signing account from the keyring.
    pub async fn connect(config: ArchwaydConfig) -> Result<Self, ClientError> {
        let args = [
            "keys",
            "show",
            config.key.as_str(),
            "-a",
            "--keyring-backend",
            config.keyring_backend.as_str(),
        ];
        let sender = run(&config.binary, args.iter().copied()).await?.trim().to_owned();
        debug!(@grey, "signing as {}", sender.lavender());
        Ok(Self { config, sender })
    }

    fn tx_flags(&self, sender: &str, fee: &FeeMode) -> Vec<String> {
        let mut flags: Vec<String> = [
            "--from",
            sender,
            "--keyring-backend",
            self.config.keyring_backend.as_str(),
            "--chain-id",
            self.config.chain_id.as_str(),
            "--node",
            self.config.node.as_str(),
            "--broadcast-mode",
            "sync",
            "--output",
            "json",
            "--yes",
        ]
        .iter()
        .map(|flag| flag.to_string())
        .collect();
        match fee {
            FeeMode::Auto { gas_adjustment } => flags.extend([
                "--gas".to_owned(),
                "auto".to_owned(),
                "--gas-adjustment".to_owned(),
                gas_adjustment.to_string(),
                "--gas-prices".to_owned(),
                self.config.gas_prices.clone(),
            ]),
            FeeMode::Fixed { gas, fees } => flags.extend([
                "--gas".to_owned(),
                gas.to_string(),
                "--fees".to_owned(),
                fees.clone(),
            ]),
        }
        flags
    }

    /// Broadcast a transaction and wait for it to be included.
    async fn execute(&self, args: Vec<String>) -> Result<TxResponse, ClientError> {
        let out = run(&self.config.binary, args).await?;
        let broadcast: BroadcastResponse = parse("tx broadcast", &out)?;
        if broadcast.code != 0 {
            return Err(ClientError::Rejected {
                tx_hash: broadcast.txhash,
                code: broadcast.code,
                raw_log: broadcast.raw_log,
            });
        }
        debug!(@grey, "sent tx: {}", broadcast.txhash.lavender());
        self.wait_for_tx(&broadcast.txhash).await
    }

    async fn wait_for_tx(&self, tx_hash: &str) -> Result<TxResponse, ClientError> {
        let args = [
            "query",
            "tx",
            tx_hash,
            "--node",
            self.config.node.as_str(),
            "--output",
            "json",
        ];
        for attempt in 1..=self.config.poll_attempts {
            match run(&self.config.binary, args.iter().copied()).await {
                Ok(out) => {
                    let tx: TxResponse = parse("query tx", &out)?;
                    if tx.code != 0 {
                        return Err(ClientError::Rejected {
                            tx_hash: tx_hash.to_owned(),
                            code: tx.code,
                            raw_log: tx.raw_log,
                        });
                    }
                    return Ok(tx);
                }
                Err(ClientError::CommandFailed { stderr, .. }) if stderr.contains("not found") => {
                    debug!(@grey, "tx {tx_hash} not yet included (attempt {attempt})");
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                Err(err) => return Err(err),
            }
        }
        Err(ClientError::TxNotFound {
            tx_hash: tx_hash.to_owned(),
            attempts: self.config.poll_attempts,
        })
    }
}

impl ChainClient for ArchwaydClient {
    fn sender(&self) -> &str {
        &self.sender
    }

    async fn upload(
        &self,
        sender: &str,
        bytecode: &[u8],
        fee: &FeeMode,
    ) -> Result<UploadResult, ClientError> {
        // archwayd only stores code from a file
        let mut wasm = tempfile::Builder::new().suffix(".wasm").tempfile()?;
        wasm.write_all(bytecode)?;
        wasm.flush()?;

        let mut args: Vec<String> = vec![
            "tx".into(),
            "wasm".into(),
            "store".into(),
            wasm.path().display().to_string(),
        ];
        args.extend(self.tx_flags(sender, fee));

        let tx = self.execute(args).await?;
        let code_id = tx.require_attribute("store_code", "code_id")?;
        let code_id = code_id
            .parse::<u64>()
            .map_err(|_| ClientError::InvalidCodeId(code_id.to_owned()))?;
        Ok(UploadResult {
            code_id,
            tx_hash: tx.txhash,
        })
    }

    async fn instantiate(
        &self,
        sender: &str,
        code_id: u64,
        msg: &Value,
        label: &str,
        fee: &FeeMode,
        options: &InstantiateOptions,
    ) -> Result<InstantiateResult, ClientError> {
        let mut args: Vec<String> = vec![
            "tx".into(),
            "wasm".into(),
            "instantiate".into(),
            code_id.to_string(),
            msg.to_string(),
            "--label".into(),
            label.into(),
        ];
        match &options.admin {
            Some(admin) => args.extend(["--admin".to_owned(), admin.clone()]),
            None => args.push("--no-admin".to_owned()),
        }
        args.extend(self.tx_flags(sender, fee));

        let tx = self.execute(args).await?;
        let contract_address = tx
            .require_attribute("instantiate", "_contract_address")?
            .to_owned();
        Ok(InstantiateResult {
            contract_address,
            tx_hash: tx.txhash,
        })
    }
}

async fn run<I, S>(binary: &PathBuf, args: I) -> Result<String, ClientError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let output = Command::new(binary)
        .args(&args)
        .output()
        .await
        .map_err(|source| ClientError::Spawn {
            program: binary.display().to_string(),
            source,
        })?;
    if !output.status.success() {
        let command = args
            .iter()
            .take(2)
            .map(|arg| AsRef::<std::ffi::OsStr>::as_ref(arg).to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        return Err(ClientError::CommandFailed {
            command: format!("{} {command}", binary.display()),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn parse<T: DeserializeOwned>(command: &str, out: &str) -> Result<T, ClientError> {
    serde_json::from_str(out).map_err(|source| ClientError::MalformedOutput {
        command: command.to_owned(),
        source,
    })
}

#[derive(Debug, Deserialize)]
struct BroadcastResponse {
    txhash: String,
    #[serde(default)]
    code: u32,
    #[serde(default)]
    raw_log: String,
}

#[derive(Debug, Default, Deserialize)]
struct TxResponse {
    #[serde(default)]
    txhash: String,
    #[serde(default)]
    code: u32,
    #[serde(default)]
    raw_log: String,
    #[serde(default)]
    events: Vec<TxEvent>,
    /// Pre-0.50 SDKs only report events per message log.
    #[serde(default)]
    logs: Vec<TxLog>,
}

#[derive(Debug, Deserialize)]
struct TxLog {
    #[serde(default)]
    events: Vec<TxEvent>,
}

#[derive(Debug, Deserialize)]
struct TxEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    attributes: Vec<TxAttribute>,
}

#[derive(Debug, Deserialize)]
struct TxAttribute {
    key: String,
    #[serde(default)]
    value: String,
}

impl TxResponse {
    fn attribute(&self, event: &str, key: &str) -> Option<&str> {
        self.events
            .iter()
            .chain(self.logs.iter().flat_map(|log| log.events.iter()))
            .filter(|ev| ev.kind == event)
            .flat_map(|ev| ev.attributes.iter())
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }

    fn require_attribute(&self, event: &str, key: &str) -> Result<&str, ClientError> {
        self.attribute(event, key)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ClientError::MissingAttribute {
                tx_hash: self.txhash.clone(),
                event: event.to_owned(),
                attribute: key.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;
    use crate::core::{client::mock::contract_address, graph::messages::tests::ACCOUNT};

    /// Stands in for `archwayd`: every tx is reported missing on its first query.
    const FAKE_ARCHWAYD: &str = r#"#!/bin/sh
dir=$(dirname "$0")
case "$1" in
keys)
    echo "SENDER"
    ;;
tx)
    if [ "$3" = store ]; then hash=STORE; else hash=INIT; fi
    echo "$*" > "$dir/$hash.args"
    echo "{\"txhash\":\"$hash\",\"code\":0,\"raw_log\":\"\"}"
    ;;
query)
    if [ ! -e "$dir/$3.seen" ]; then
        touch "$dir/$3.seen"
        echo "rpc error: tx ($3) not found" >&2
        exit 1
    fi
    case "$3" in
    STORE) echo '{"txhash":"STORE","code":0,"events":[{"type":"store_code","attributes":[{"key":"code_id","value":"12"}]}]}' ;;
    INIT) echo '{"txhash":"INIT","code":0,"logs":[{"events":[{"type":"instantiate","attributes":[{"key":"_contract_address","value":"CONTRACT"}]}]}]}' ;;
    esac
    ;;
esac
"#;

    #[cfg(unix)]
    fn fake_archwayd(dir: &std::path::Path) -> ArchwaydConfig {
        use std::os::unix::fs::PermissionsExt;

        let binary = dir.join("archwayd");
        let script = FAKE_ARCHWAYD
            .replace("SENDER", ACCOUNT)
            .replace("CONTRACT", &contract_address(12));
        fs::write(&binary, script).unwrap();
        fs::set_permissions(&binary, fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = ArchwaydConfig::new(Network::Local, "deployer");
        config.binary = binary;
        config.poll_interval = Duration::from_millis(10);
        config
    }

    #[test]
    fn reads_attributes_from_top_level_events() {
        let out = r#"{
            "height": "4242",
            "txhash": "AB12",
            "code": 0,
            "raw_log": "",
            "events": [
                { "type": "message", "attributes": [{ "key": "module", "value": "wasm" }] },
                { "type": "store_code", "attributes": [
                    { "key": "code_checksum", "value": "beef" },
                    { "key": "code_id", "value": "417" }
                ] }
            ]
        }"#;
        let tx: TxResponse = parse("query tx", out).unwrap();
        assert_eq!(tx.attribute("store_code", "code_id"), Some("417"));
        assert_eq!(tx.attribute("instantiate", "_contract_address"), None);
    }

    #[test]
    fn reads_attributes_from_legacy_logs() {
        let out = r#"{
            "txhash": "CD34",
            "code": 0,
            "logs": [{ "msg_index": 0, "events": [
                { "type": "instantiate", "attributes": [
                    { "key": "_contract_address", "value": "archway1contract" },
                    { "key": "code_id", "value": "417" }
                ] }
            ] }]
        }"#;
        let tx: TxResponse = parse("query tx", out).unwrap();
        assert_eq!(
            tx.require_attribute("instantiate", "_contract_address").unwrap(),
            "archway1contract"
        );
        let err = tx.require_attribute("store_code", "code_id").unwrap_err();
        assert!(matches!(err, ClientError::MissingAttribute { tx_hash, .. } if tx_hash == "CD34"));
    }

    #[test]
    fn blank_attributes_count_as_missing() {
        let out = r#"{
            "txhash": "EF56",
            "code": 0,
            "events": [
                { "type": "instantiate", "attributes": [
                    { "key": "_contract_address" },
                    { "key": "code_id", "value": "417" }
                ] },
                { "type": "store_code", "attributes": [{ "key": "code_id", "value": "" }] }
            ]
        }"#;
        let tx: TxResponse = parse("query tx", out).unwrap();
        for (event, key) in [("instantiate", "_contract_address"), ("store_code", "code_id")] {
            let err = tx.require_attribute(event, key).unwrap_err();
            assert!(
                matches!(&err, ClientError::MissingAttribute { attribute, .. } if attribute == key),
                "{err}"
            );
        }
    }

    #[test]
    fn reports_malformed_output() {
        let err = parse::<BroadcastResponse>("tx broadcast", "gas estimate: 12345").unwrap_err();
        assert!(matches!(err, ClientError::MalformedOutput { command, .. } if command == "tx broadcast"));
    }

    #[test]
    fn tx_flags_follow_fee_mode() {
        let client = ArchwaydClient {
            config: ArchwaydConfig::new(Network::Testnet, "deployer"),
            sender: "archway1sender".to_owned(),
        };

        let auto = client.tx_flags("archway1sender", &FeeMode::default());
        let tail: Vec<&str> = auto.iter().rev().take(6).rev().map(String::as_str).collect();
        assert_eq!(
            tail,
            ["--gas", "auto", "--gas-adjustment", "1.4", "--gas-prices", "140000000000aconst"]
        );
        assert!(auto.windows(2).any(|w| w == ["--chain-id", "constantine-3"]));
        assert!(auto.windows(2).any(|w| w == ["--from", "archway1sender"]));

        let fixed = client.tx_flags(
            "archway1sender",
            &FeeMode::Fixed {
                gas: 5_000_000,
                fees: "700000000000000000aconst".to_owned(),
            },
        );
        assert!(fixed.windows(2).any(|w| w == ["--gas", "5000000"]));
        assert!(fixed.windows(2).any(|w| w == ["--fees", "700000000000000000aconst"]));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let mut config = ArchwaydConfig::new(Network::Local, "deployer");
        config.binary = "/nonexistent/archwayd".into();

        let err = ArchwaydClient::connect(config).await.unwrap_err();
        assert!(matches!(err, ClientError::Spawn { program, .. } if program == "/nonexistent/archwayd"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stores_and_instantiates_through_the_cli() {
        let dir = tempfile::tempdir().unwrap();
        let client = ArchwaydClient::connect(fake_archwayd(dir.path())).await.unwrap();
        assert_eq!(client.sender(), ACCOUNT);

        let upload = client
            .upload(ACCOUNT, b"\0asm", &FeeMode::default())
            .await
            .unwrap();
        assert_eq!(
            upload,
            UploadResult {
                code_id: 12,
                tx_hash: "STORE".to_owned(),
            }
        );

        let instantiated = client
            .instantiate(
                ACCOUNT,
                12,
                &json!({ "name": "Unified Liquidity NFT" }),
                "UL-NFT Core v1",
                &FeeMode::default(),
                &InstantiateOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(
            instantiated.contract_address,
            contract_address(12)
        );

        let args = fs::read_to_string(dir.path().join("INIT.args")).unwrap();
        assert!(args.starts_with("tx wasm instantiate 12 "), "{args}");
        assert!(args.contains("--label UL-NFT Core v1"), "{args}");
        assert!(args.contains("--no-admin"), "{args}");
        assert!(args.contains("--broadcast-mode sync"), "{args}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn gives_up_after_the_configured_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fake_archwayd(dir.path());
        config.poll_attempts = 1;
        let client = ArchwaydClient::connect(config).await.unwrap();

        let err = client
            .upload(ACCOUNT, b"\0asm", &FeeMode::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::TxNotFound { tx_hash, attempts: 1 } if tx_hash == "STORE"
        ));
    }
}
