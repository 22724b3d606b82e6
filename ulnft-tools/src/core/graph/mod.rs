// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Fixed, hand-declared order in which contracts are deployed.

use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
};

use convert_case::{Case, Casing};
use serde_json::Value;

use super::ledger::Ledger;

pub mod messages;
pub mod ulnft;

/// Computes the instantiation payload of a node from the current ledger.
///
/// Implementations must be pure: everything they need comes from the ledger or from
/// configuration captured when the graph was built.
pub trait InitMessageBuilder {
    /// Names of the nodes whose addresses the message embeds.
    fn dependencies(&self) -> Vec<String>;

    fn build(&self, ledger: &Ledger) -> Result<Value, GraphError>;
}

/// Builder backed by a closure, for graphs assembled at runtime.
pub struct FnBuilder<F> {
    dependencies: Vec<String>,
    build: F,
}

impl<F> FnBuilder<F>
where
    F: Fn(&Ledger) -> Result<Value, GraphError>,
{
    pub fn new<I, S>(dependencies: I, build: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            build,
        }
    }
}

impl<F> InitMessageBuilder for FnBuilder<F>
where
    F: Fn(&Ledger) -> Result<Value, GraphError>,
{
    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    fn build(&self, ledger: &Ledger) -> Result<Value, GraphError> {
        (self.build)(ledger)
    }
}

/// Look up the address of a dependency, failing if it has not been instantiated yet.
pub fn resolve_dependency(ledger: &Ledger, node: &str, dependency: &str) -> Result<String, GraphError> {
    ledger
        .address(dependency)
        .map(ToOwned::to_owned)
        .ok_or_else(|| GraphError::MissingDependency {
            node: node.to_owned(),
            dependency: dependency.to_owned(),
        })
}

/// One contract in the deployment order.
pub struct GraphNode {
    name: String,
    bytecode_path: PathBuf,
    label: String,
    builder: Box<dyn InitMessageBuilder>,
}

impl GraphNode {
    pub fn new(
        name: impl Into<String>,
        bytecode_path: impl Into<PathBuf>,
        label: impl Into<String>,
        builder: impl InitMessageBuilder + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            bytecode_path: bytecode_path.into(),
            label: label.into(),
            builder: Box::new(builder),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytecode_path(&self) -> &Path {
        &self.bytecode_path
    }

    /// Human readable label attached to the contract instance on chain.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Prefix used when exporting this node's code id and address as environment variables.
    pub fn env_key(&self) -> String {
        self.name.to_case(Case::UpperSnake)
    }

    pub fn dependencies(&self) -> Vec<String> {
        self.builder.dependencies()
    }

    pub fn build_init_message(&self, ledger: &Ledger) -> Result<Value, GraphError> {
        self.builder.build(ledger)
    }
}

impl fmt::Debug for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphNode")
            .field("name", &self.name)
            .field("bytecode_path", &self.bytecode_path)
            .field("label", &self.label)
            .field("dependencies", &self.dependencies())
            .finish()
    }
}

/// Ordered sequence of nodes where every dependency precedes its dependents.
#[derive(Debug)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
}

impl DependencyGraph {
    pub fn new(nodes: Vec<GraphNode>) -> Result<Self, GraphError> {
        let mut seen = HashSet::new();
        for node in &nodes {
            for dependency in node.dependencies() {
                if seen.contains(dependency.as_str()) {
                    continue;
                }
                return Err(if nodes.iter().any(|n| n.name == dependency) {
                    GraphError::ForwardDependency {
                        node: node.name.clone(),
                        dependency,
                    }
                } else {
                    GraphError::UndeclaredDependency {
                        node: node.name.clone(),
                        dependency,
                    }
                });
            }
            if !seen.insert(node.name.as_str()) {
                return Err(GraphError::DuplicateNode(node.name.clone()));
            }
        }
        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(GraphNode::name)
    }

    pub fn get(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Whether every node is both uploaded and instantiated in `ledger`.
    pub fn is_complete(&self, ledger: &Ledger) -> bool {
        self.names().all(|name| ledger.is_instantiated(name))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("contract {0:?} is declared more than once")]
    DuplicateNode(String),
    #[error("contract {node:?} depends on {dependency:?}, which is not declared")]
    UndeclaredDependency { node: String, dependency: String },
    #[error("contract {node:?} depends on {dependency:?}, which is declared after it")]
    ForwardDependency { node: String, dependency: String },
    #[error("contract {node:?} needs the address of {dependency:?}, which is not instantiated")]
    MissingDependency { node: String, dependency: String },
    #[error("invalid init message for {node:?}: {reason}")]
    InvalidMessage { node: String, reason: String },
    #[error("failed to encode init message for {node:?}: {source}")]
    Encode {
        node: String,
        source: serde_json::Error,
    },
}
