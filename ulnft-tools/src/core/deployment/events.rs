// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Progress notifications of a deployment run.
//!
//! The [`EventBus`] is owned by whoever drives the deployment and lent to the
//! [`Orchestrator`](super::Orchestrator). Observers stay registered until unsubscribed
//! or until the bus is dropped.

use std::{cell::RefCell, fmt, path::PathBuf};

use super::Step;
use crate::core::network::Network;

#[derive(Debug, Clone, PartialEq)]
pub enum DeploymentEvent {
    Started {
        network: Network,
        contracts: usize,
    },
    /// The step is already recorded in the ledger.
    Skipped {
        name: String,
        step: Step,
    },
    Uploading {
        name: String,
        bytecode_path: PathBuf,
        size: usize,
    },
    Uploaded {
        name: String,
        code_id: u64,
        tx_hash: String,
    },
    Instantiating {
        name: String,
        code_id: u64,
    },
    Instantiated {
        name: String,
        address: String,
        tx_hash: String,
    },
    Failed {
        name: String,
        step: Step,
        reason: String,
    },
    Finished {
        network: Network,
    },
}

pub trait DeploymentObserver {
    fn notify(&self, event: &DeploymentEvent);
}

impl<F: Fn(&DeploymentEvent)> DeploymentObserver for F {
    fn notify(&self, event: &DeploymentEvent) {
        self(event)
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    next_id: RefCell<u64>,
    observers: RefCell<Vec<(SubscriptionId, Box<dyn DeploymentObserver>)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: impl DeploymentObserver + 'static) -> SubscriptionId {
        let mut next_id = self.next_id.borrow_mut();
        let id = SubscriptionId(*next_id);
        *next_id += 1;
        self.observers.borrow_mut().push((id, Box::new(observer)));
        id
    }

    /// Remove an observer, returning whether it was still subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(subscription, _)| *subscription != id);
        observers.len() != before
    }

    pub fn publish(&self, event: &DeploymentEvent) {
        // observers must not subscribe or unsubscribe from within a notification
        for (_, observer) in self.observers.borrow().iter() {
            observer.notify(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.len())
            .finish()
    }
}
