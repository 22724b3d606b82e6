// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Drives a [`DependencyGraph`] onto a chain, one idempotent step at a time.
//!
//! Each node is uploaded and then instantiated, unless the [`Ledger`] already records
//! that step. The ledger is saved after every successful step, so the run can be
//! interrupted or fail at any point and a later run picks up where it stopped.

use std::{fmt, fs, io, path::PathBuf};

use typed_builder::TypedBuilder;

use crate::{
    core::{
        client::{ChainClient, ClientError, FeeMode, InstantiateOptions},
        graph::{DependencyGraph, GraphError, GraphNode},
        ledger::{Ledger, LedgerError, LedgerStore},
        network::Network,
    },
    utils::color::Color,
};
use events::{DeploymentEvent, EventBus};

pub mod events;

/// The two steps performed for every contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Upload,
    Instantiate,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Upload => "upload",
            Step::Instantiate => "instantiate",
        })
    }
}

/// Account allowed to migrate the instantiated contracts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Admin {
    /// The deploying account.
    #[default]
    Sender,
    Address(String),
    /// Contracts are immutable.
    None,
}

impl Admin {
    pub fn resolve(&self, sender: &str) -> Option<String> {
        match self {
            Admin::Sender => Some(sender.to_owned()),
            Admin::Address(address) => Some(address.clone()),
            Admin::None => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentConfig {
    pub fee: FeeMode,
    pub admin: Admin,
}

#[derive(TypedBuilder)]
pub struct Orchestrator<'a, C> {
    store: &'a LedgerStore,
    graph: &'a DependencyGraph,
    client: &'a C,
    #[builder(default)]
    config: DeploymentConfig,
    #[builder(default, setter(strip_option))]
    events: Option<&'a EventBus>,
}

impl<C: ChainClient> Orchestrator<'_, C> {
    /// Bring every contract of the graph to the instantiated state on `network`.
    ///
    /// On failure the ledger is returned as it stands, alongside the error.
    pub async fn run(&self, network: Network) -> Result<Ledger, DeploymentFailure> {
        let mut ledger = self
            .store
            .load(network, self.graph.names())
            .map_err(|err| DeploymentFailure {
                ledger: None,
                error: err.into(),
            })?;

        match self.drive(&mut ledger).await {
            Ok(()) => {
                self.publish(DeploymentEvent::Finished { network });
                info!(@grey, "all {} contracts deployed to {network}", self.graph.nodes().len());
                Ok(ledger)
            }
            Err(error) => Err(DeploymentFailure {
                ledger: Some(ledger),
                error,
            }),
        }
    }

    async fn drive(&self, ledger: &mut Ledger) -> Result<(), DeploymentError> {
        self.publish(DeploymentEvent::Started {
            network: ledger.network(),
            contracts: self.graph.nodes().len(),
        });
        self.preflight(ledger)?;

        for node in self.graph.nodes() {
            self.upload(node, ledger)
                .await
                .map_err(|err| self.failed(node, Step::Upload, err))?;
            self.instantiate(node, ledger)
                .await
                .map_err(|err| self.failed(node, Step::Instantiate, err))?;
        }
        Ok(())
    }

    /// Check that all bytecode still to be uploaded is present before touching the chain.
    fn preflight(&self, ledger: &Ledger) -> Result<(), DeploymentError> {
        let missing: Vec<String> = self
            .graph
            .nodes()
            .iter()
            .filter(|node| !ledger.is_uploaded(node.name()))
            .filter(|node| !node.bytecode_path().is_file())
            .map(|node| {
                format!(
                    "bytecode for {} ({})",
                    node.name(),
                    node.bytecode_path().display()
                )
            })
            .collect();
        if !missing.is_empty() {
            return Err(DeploymentError::ConfigurationMissing(missing));
        }
        Ok(())
    }

    async fn upload(&self, node: &GraphNode, ledger: &mut Ledger) -> Result<(), DeploymentError> {
        let name = node.name();
        if let Some(code_id) = ledger.code_id(name) {
            debug!(@grey, "{name}: already uploaded with code id {code_id}");
            self.publish(DeploymentEvent::Skipped {
                name: name.to_owned(),
                step: Step::Upload,
            });
            return Ok(());
        }

        let path = node.bytecode_path();
        let bytecode = fs::read(path).map_err(|source| DeploymentError::ReadBytecode {
            name: name.to_owned(),
            path: path.to_owned(),
            source,
        })?;
        debug!(@grey, "{name}: uploading {} ({} bytes)", path.display(), bytecode.len());
        self.publish(DeploymentEvent::Uploading {
            name: name.to_owned(),
            bytecode_path: path.to_owned(),
            size: bytecode.len(),
        });

        let result = self
            .client
            .upload(self.client.sender(), &bytecode, &self.config.fee)
            .await
            .map_err(|source| DeploymentError::UploadFailed {
                name: name.to_owned(),
                source,
            })?;
        ledger.record_upload(name, result.code_id)?;
        self.persist(ledger, name, Step::Upload, format!("code id {}", result.code_id))?;

        debug!(@grey, "{name}: uploaded with code id {}", result.code_id.mint());
        self.publish(DeploymentEvent::Uploaded {
            name: name.to_owned(),
            code_id: result.code_id,
            tx_hash: result.tx_hash,
        });
        Ok(())
    }

    async fn instantiate(
        &self,
        node: &GraphNode,
        ledger: &mut Ledger,
    ) -> Result<(), DeploymentError> {
        let name = node.name();
        if let Some(address) = ledger.address(name) {
            debug!(@grey, "{name}: already instantiated at {address}");
            self.publish(DeploymentEvent::Skipped {
                name: name.to_owned(),
                step: Step::Instantiate,
            });
            return Ok(());
        }

        let code_id = ledger
            .code_id(name)
            .ok_or_else(|| LedgerError::NotUploaded(name.to_owned()))?;
        let msg = node.build_init_message(ledger).map_err(|err| match err {
            GraphError::MissingDependency { node, dependency } => {
                DeploymentError::GraphOrdering { node, dependency }
            }
            err => DeploymentError::InvalidMessage(err),
        })?;
        debug!(@grey, "{name}: init message {msg}");
        self.publish(DeploymentEvent::Instantiating {
            name: name.to_owned(),
            code_id,
        });

        let sender = self.client.sender();
        let options = InstantiateOptions {
            admin: self.config.admin.resolve(sender),
        };
        let result = self
            .client
            .instantiate(sender, code_id, &msg, node.label(), &self.config.fee, &options)
            .await
            .map_err(|source| DeploymentError::InstantiateFailed {
                name: name.to_owned(),
                source,
            })?;
        ledger.record_instantiate(name, result.contract_address.as_str())?;
        self.persist(
            ledger,
            name,
            Step::Instantiate,
            format!("address {}", result.contract_address),
        )?;

        debug!(@grey, "{name}: instantiated at {}", result.contract_address.mint());
        self.publish(DeploymentEvent::Instantiated {
            name: name.to_owned(),
            address: result.contract_address,
            tx_hash: result.tx_hash,
        });
        Ok(())
    }

    fn persist(
        &self,
        ledger: &Ledger,
        name: &str,
        step: Step,
        outcome: String,
    ) -> Result<(), DeploymentError> {
        self.store
            .save(ledger)
            .map_err(|source| DeploymentError::PersistFailed {
                name: name.to_owned(),
                step,
                outcome,
                source,
            })
    }

    fn failed(&self, node: &GraphNode, step: Step, err: DeploymentError) -> DeploymentError {
        self.publish(DeploymentEvent::Failed {
            name: node.name().to_owned(),
            step,
            reason: err.to_string(),
        });
        err
    }

    fn publish(&self, event: DeploymentEvent) {
        if let Some(events) = self.events {
            events.publish(&event);
        }
    }
}

/// A run that stopped before every contract was instantiated.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct DeploymentFailure {
    /// Ledger as persisted when the run stopped, absent if it could not be loaded.
    pub ledger: Option<Ledger>,
    pub error: DeploymentError,
}

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("missing configuration: {}", .0.join(", "))]
    ConfigurationMissing(Vec<String>),
    #[error("invalid dependency graph: {0}")]
    InvalidGraph(GraphError),
    #[error("failed to resolve signing key {key:?}: {source}")]
    Signer { key: String, source: ClientError },
    #[error("{0}")]
    Ledger(#[from] LedgerError),
    #[error("failed to upload {}: {source}", .name.red())]
    UploadFailed { name: String, source: ClientError },
    #[error("failed to instantiate {}: {source}", .name.red())]
    InstantiateFailed { name: String, source: ClientError },
    #[error(
        "{node} needs the address of {dependency}, which is not instantiated yet: \
         the dependency graph is declared out of order"
    )]
    GraphOrdering { node: String, dependency: String },
    #[error("{0}")]
    InvalidMessage(GraphError),
    #[error("failed to read bytecode of {name} at {}: {source}", .path.display())]
    ReadBytecode {
        name: String,
        path: PathBuf,
        source: io::Error,
    },
    #[error("{step} of {name} succeeded ({outcome}) but the ledger was not saved: {source}")]
    PersistFailed {
        name: String,
        step: Step,
        outcome: String,
        source: LedgerError,
    },
}

impl DeploymentError {
    /// Whether re-running the deployment may succeed without changing anything.
    pub fn is_resumable(&self) -> bool {
        matches!(
            self,
            DeploymentError::UploadFailed { .. } | DeploymentError::InstantiateFailed { .. }
        )
    }

    /// Contract the failed step belongs to.
    pub fn contract(&self) -> Option<&str> {
        match self {
            DeploymentError::UploadFailed { name, .. }
            | DeploymentError::InstantiateFailed { name, .. }
            | DeploymentError::ReadBytecode { name, .. }
            | DeploymentError::PersistFailed { name, .. } => Some(name),
            DeploymentError::GraphOrdering { node, .. } => Some(node),
            DeploymentError::InvalidMessage(GraphError::InvalidMessage { node, .. }) => Some(node),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, path::Path, rc::Rc};

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::*;
    use crate::core::{
        client::mock::{contract_address, Call, MockClient},
        graph::{messages::tests::ACCOUNT, resolve_dependency, FnBuilder},
    };

    const V: &str = "static-config-value";

    struct Fixture {
        dir: TempDir,
        store: LedgerStore,
        graph: DependencyGraph,
    }

    impl Fixture {
        /// Graph A <- B, A <- C with C also embedding the static value `V`.
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let bytecode = |name: &str| {
                let path = dir.path().join(format!("{name}.wasm"));
                fs::write(&path, name).unwrap();
                path
            };
            let graph = DependencyGraph::new(vec![
                GraphNode::new(
                    "A",
                    bytecode("A"),
                    "A v1",
                    FnBuilder::new(Vec::<String>::new(), |_: &Ledger| Ok(json!({}))),
                ),
                GraphNode::new(
                    "B",
                    bytecode("B"),
                    "B v1",
                    FnBuilder::new(["A"], |ledger: &Ledger| {
                        Ok(json!({ "a": resolve_dependency(ledger, "B", "A")? }))
                    }),
                ),
                GraphNode::new(
                    "C",
                    bytecode("C"),
                    "C v1",
                    FnBuilder::new(["A"], |ledger: &Ledger| {
                        Ok(json!({ "a": resolve_dependency(ledger, "C", "A")?, "v": V }))
                    }),
                ),
            ])
            .unwrap();
            let store = LedgerStore::new(dir.path().join("config"));
            Self { dir, store, graph }
        }

        fn path(&self) -> PathBuf {
            self.store.path(Network::Local)
        }

        async fn run(&self, client: &MockClient) -> Result<Ledger, DeploymentFailure> {
            Orchestrator::builder()
                .store(&self.store)
                .graph(&self.graph)
                .client(client)
                .build()
                .run(Network::Local)
                .await
        }
    }

    fn upload(bytecode: &str) -> Call {
        Call::Upload {
            bytecode: bytecode.as_bytes().to_vec(),
        }
    }

    fn instantiate(code_id: u64, msg: Value, label: &str) -> Call {
        Call::Instantiate {
            code_id,
            msg,
            label: label.to_owned(),
            admin: Some(ACCOUNT.to_owned()),
        }
    }

    fn record_json(ledger_path: &Path, name: &str) -> Value {
        let doc: Value = serde_json::from_slice(&fs::read(ledger_path).unwrap()).unwrap();
        doc["contracts"][name].clone()
    }

    #[tokio::test]
    async fn fresh_run_deploys_in_dependency_order() {
        let fixture = Fixture::new();
        let client = MockClient::new();

        let ledger = fixture.run(&client).await.unwrap();

        let a = contract_address(1);
        assert_eq!(
            client.calls(),
            [
                upload("A"),
                instantiate(1, json!({}), "A v1"),
                upload("B"),
                instantiate(2, json!({ "a": a }), "B v1"),
                upload("C"),
                instantiate(3, json!({ "a": a, "v": V }), "C v1"),
            ]
        );
        for (code_id, name) in [(1, "A"), (2, "B"), (3, "C")] {
            assert_eq!(ledger.code_id(name), Some(code_id));
            assert_eq!(ledger.address(name), Some(contract_address(code_id).as_str()));
        }
        assert!(fixture.graph.is_complete(&ledger));

        let persisted = fixture.store.read(Network::Local, fixture.graph.names()).unwrap();
        assert_eq!(persisted, ledger);
    }

    #[tokio::test]
    async fn second_run_makes_no_calls() {
        let fixture = Fixture::new();
        let first = fixture.run(&MockClient::new()).await.unwrap();
        let before = fs::read(fixture.path()).unwrap();

        let client = MockClient::new();
        let second = fixture.run(&client).await.unwrap();

        assert!(client.calls().is_empty());
        assert_eq!(second, first);
        assert_eq!(second.addresses(), first.addresses());
        assert_eq!(fs::read(fixture.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn upload_failure_leaves_a_resumable_ledger() {
        let fixture = Fixture::new();
        let client = MockClient::new();
        client.fail_upload_of(b"B");

        let failure = fixture.run(&client).await.unwrap_err();
        assert!(
            matches!(&failure.error, DeploymentError::UploadFailed { name, .. } if name == "B"),
            "{failure}"
        );
        assert!(failure.error.is_resumable());
        assert_eq!(failure.error.contract(), Some("B"));

        let ledger = failure.ledger.unwrap();
        assert!(ledger.is_instantiated("A"));
        assert!(ledger.record("B").is_none());
        assert!(ledger.record("C").is_none());
        let persisted = fixture.store.read(Network::Local, fixture.graph.names()).unwrap();
        assert_eq!(persisted, ledger);
        let a_before = record_json(&fixture.path(), "A");

        let client = MockClient::starting_at(10);
        let ledger = fixture.run(&client).await.unwrap();

        let a = contract_address(1);
        assert_eq!(
            client.calls(),
            [
                upload("B"),
                instantiate(10, json!({ "a": a }), "B v1"),
                upload("C"),
                instantiate(11, json!({ "a": a, "v": V }), "C v1"),
            ]
        );
        assert_eq!(record_json(&fixture.path(), "A"), a_before);
        assert_eq!(ledger.code_id("A"), Some(1));
        assert!(fixture.graph.is_complete(&ledger));
    }

    #[tokio::test]
    async fn instantiate_failure_keeps_the_uploaded_code() {
        let fixture = Fixture::new();
        let client = MockClient::new();
        client.fail_instantiate_of("B v1");

        let failure = fixture.run(&client).await.unwrap_err();
        assert!(matches!(
            &failure.error,
            DeploymentError::InstantiateFailed { name, source: ClientError::Rejected { .. } }
                if name == "B"
        ));
        let ledger = failure.ledger.unwrap();
        assert_eq!(ledger.code_id("B"), Some(2));
        assert!(!ledger.is_instantiated("B"));

        let client = MockClient::starting_at(10);
        fixture.run(&client).await.unwrap();
        let a = contract_address(1);
        assert_eq!(
            client.calls(),
            [
                instantiate(2, json!({ "a": a }), "B v1"),
                upload("C"),
                instantiate(10, json!({ "a": a, "v": V }), "C v1"),
            ]
        );
    }

    #[tokio::test]
    async fn instantiation_without_an_address_is_not_success() {
        let fixture = Fixture::new();
        let client = MockClient::new();
        client.blank_address_for("A v1");

        let failure = fixture.run(&client).await.unwrap_err();
        assert!(matches!(
            &failure.error,
            DeploymentError::Ledger(LedgerError::EmptyAddress(name)) if name == "A"
        ));
        assert!(!failure.error.is_resumable());
        assert_eq!(client.calls(), [upload("A"), instantiate(1, json!({}), "A v1")]);

        let ledger = failure.ledger.unwrap();
        assert_eq!(ledger.code_id("A"), Some(1));
        assert!(!ledger.is_instantiated("A"));
        assert!(!fixture.graph.is_complete(&ledger));
        assert_eq!(record_json(&fixture.path(), "A"), json!({ "codeId": 1 }));
    }

    #[tokio::test]
    async fn missing_bytecode_fails_before_any_call() {
        let fixture = Fixture::new();
        fs::remove_file(fixture.dir.path().join("C.wasm")).unwrap();
        let client = MockClient::new();

        let failure = fixture.run(&client).await.unwrap_err();
        match &failure.error {
            DeploymentError::ConfigurationMissing(missing) => {
                assert_eq!(missing.len(), 1);
                assert!(missing[0].contains("C.wasm"), "{missing:?}");
            }
            err => panic!("unexpected error: {err}"),
        }
        assert!(!failure.error.is_resumable());
        assert!(client.calls().is_empty());
        assert!(!fixture.path().exists());
    }

    #[tokio::test]
    async fn uploaded_code_does_not_need_bytecode() {
        let fixture = Fixture::new();
        let mut ledger = Ledger::new(Network::Local, fixture.graph.names());
        ledger.record_upload("C", 42).unwrap();
        fixture.store.save(&ledger).unwrap();
        fs::remove_file(fixture.dir.path().join("C.wasm")).unwrap();

        let client = MockClient::new();
        let ledger = fixture.run(&client).await.unwrap();
        assert_eq!(ledger.code_id("C"), Some(42));
        assert!(!client.calls().contains(&upload("C")));
    }

    #[tokio::test]
    async fn unresolved_dependency_is_a_graph_ordering_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.wasm"), "X").unwrap();
        fs::write(dir.path().join("y.wasm"), "Y").unwrap();
        // X reads Y's address without declaring the dependency
        let graph = DependencyGraph::new(vec![
            GraphNode::new(
                "X",
                dir.path().join("x.wasm"),
                "X v1",
                FnBuilder::new(Vec::<String>::new(), |ledger: &Ledger| {
                    Ok(json!({ "y": resolve_dependency(ledger, "X", "Y")? }))
                }),
            ),
            GraphNode::new(
                "Y",
                dir.path().join("y.wasm"),
                "Y v1",
                FnBuilder::new(Vec::<String>::new(), |_: &Ledger| Ok(json!({}))),
            ),
        ])
        .unwrap();
        let store = LedgerStore::new(dir.path());
        let client = MockClient::new();

        let failure = Orchestrator::builder()
            .store(&store)
            .graph(&graph)
            .client(&client)
            .build()
            .run(Network::Local)
            .await
            .unwrap_err();

        assert!(matches!(
            &failure.error,
            DeploymentError::GraphOrdering { node, dependency } if node == "X" && dependency == "Y"
        ));
        assert!(!failure.error.is_resumable());
        assert_eq!(client.calls(), [upload("X")]);
        assert_eq!(failure.ledger.unwrap().code_id("X"), Some(1));
    }

    #[tokio::test]
    async fn corrupt_ledger_is_not_treated_as_fresh() {
        let fixture = Fixture::new();
        fs::create_dir_all(fixture.store.dir()).unwrap();
        fs::write(fixture.path(), "{ not json").unwrap();
        let client = MockClient::new();

        let failure = fixture.run(&client).await.unwrap_err();
        assert!(failure.ledger.is_none());
        assert!(matches!(
            failure.error,
            DeploymentError::Ledger(LedgerError::Corrupt { .. })
        ));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn admin_policy_and_events() {
        let fixture = Fixture::new();
        let client = MockClient::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let bus = EventBus::new();
        let recorder = seen.clone();
        bus.subscribe(move |event: &DeploymentEvent| recorder.borrow_mut().push(event.clone()));

        let mut ledger = Ledger::new(Network::Local, fixture.graph.names());
        ledger.record_upload("A", 7).unwrap();
        ledger.record_instantiate("A", contract_address(7)).unwrap();
        fixture.store.save(&ledger).unwrap();

        Orchestrator::builder()
            .store(&fixture.store)
            .graph(&fixture.graph)
            .client(&client)
            .config(DeploymentConfig {
                fee: FeeMode::Fixed {
                    gas: 5_000_000,
                    fees: "700000000000000000aarch".to_owned(),
                },
                admin: Admin::None,
            })
            .events(&bus)
            .build()
            .run(Network::Local)
            .await
            .unwrap();

        for call in client.calls() {
            if let Call::Instantiate { admin, .. } = call {
                assert_eq!(admin, None);
            }
        }

        let seen = seen.borrow();
        assert_eq!(
            seen[..3],
            [
                DeploymentEvent::Started {
                    network: Network::Local,
                    contracts: 3,
                },
                DeploymentEvent::Skipped {
                    name: "A".to_owned(),
                    step: Step::Upload,
                },
                DeploymentEvent::Skipped {
                    name: "A".to_owned(),
                    step: Step::Instantiate,
                },
            ]
        );
        assert_eq!(
            seen.last(),
            Some(&DeploymentEvent::Finished {
                network: Network::Local
            })
        );
        let instantiated = seen
            .iter()
            .filter(|event| matches!(event, DeploymentEvent::Instantiated { .. }))
            .count();
        assert_eq!(instantiated, 2);
    }

    #[test]
    fn admin_resolution() {
        assert_eq!(Admin::Sender.resolve(ACCOUNT).as_deref(), Some(ACCOUNT));
        assert_eq!(
            Admin::Address("archway1other".to_owned()).resolve(ACCOUNT),
            Some("archway1other".to_owned())
        );
        assert_eq!(Admin::None.resolve(ACCOUNT), None);
    }
}
