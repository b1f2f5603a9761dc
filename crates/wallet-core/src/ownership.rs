//! Which addresses belong to the wallet, and where they sit in the
//! receive (external) and change (internal) derivation chains.
//!
//! The index is built by the derivation layer whenever account state
//! changes and is only ever read here.

use std::collections::HashMap;

use chain_ada::Address;
use serde::{Deserialize, Serialize};

/// Where an address sits relative to this wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DerivationLabel {
    Receive(u32),
    Change(u32),
    NotMine,
}

impl DerivationLabel {
    pub fn is_mine(&self) -> bool {
        !matches!(self, DerivationLabel::NotMine)
    }

    pub fn is_change(&self) -> bool {
        matches!(self, DerivationLabel::Change(_))
    }
}

/// Read-only snapshot of the wallet's receive and change addresses.
///
/// An address must not appear in both chains. If the builder gets that
/// wrong, lookups treat the address as a receive address and the entry is
/// reported by [`OwnershipIndex::anomalies`].
#[derive(Debug, Clone, Default)]
pub struct OwnershipIndex {
    receive: HashMap<Address, u32>,
    change: HashMap<Address, u32>,
}

impl OwnershipIndex {
    pub fn new(receive: HashMap<Address, u32>, change: HashMap<Address, u32>) -> Self {
        let index = Self { receive, change };
        for address in index.anomalies() {
            tracing::warn!(%address, "address present in both receive and change chains");
        }
        index
    }

    /// Build from derived address ranges; an address's index is its
    /// position in its range. A repeated address keeps its first index.
    pub fn from_ranges<R, C>(receive: R, change: C) -> Self
    where
        R: IntoIterator<Item = Address>,
        C: IntoIterator<Item = Address>,
    {
        Self::new(index_range(receive), index_range(change))
    }

    pub fn classify(&self, address: &Address) -> DerivationLabel {
        if let Some(&index) = self.receive.get(address) {
            DerivationLabel::Receive(index)
        } else if let Some(&index) = self.change.get(address) {
            DerivationLabel::Change(index)
        } else {
            DerivationLabel::NotMine
        }
    }

    pub fn is_mine(&self, address: &Address) -> bool {
        self.classify(address).is_mine()
    }

    /// True when the address is in both chains.
    pub fn is_anomalous(&self, address: &Address) -> bool {
        self.receive.contains_key(address) && self.change.contains_key(address)
    }

    /// Addresses present in both chains.
    pub fn anomalies(&self) -> Vec<&Address> {
        self.receive
            .keys()
            .filter(|address| self.change.contains_key(*address))
            .collect()
    }

    pub fn receive_count(&self) -> usize {
        self.receive.len()
    }

    pub fn change_count(&self) -> usize {
        self.change.len()
    }
}

fn index_range(addresses: impl IntoIterator<Item = Address>) -> HashMap<Address, u32> {
    let mut map = HashMap::new();
    for (index, address) in (0u32..).zip(addresses) {
        map.entry(address).or_insert(index);
    }
    map
}
