//! Resource catalog and broker registry — identity lookups for the flow engine.
//!
//! The catalog answers "is this a resource the simulation knows about" during
//! process validation. The broker registry hands out deduplicated transaction
//! identities so that every recipe a converter emits can be attributed to the
//! same broker across reloads and across vessels.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The set of resource identifiers known to the simulation.
///
/// Populated by the host from its resource definitions; the engine only
/// ever asks membership questions.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    names: HashSet<String>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of resource names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn register(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Stable handle to a registered broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrokerId(pub u32);

/// Broad classification of what kind of entity moves resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrokerCategory {
    /// A configured converter (process).
    Converter,
    /// Per-crew consumption and production (rules).
    Crew,
    /// Anything else.
    Unknown,
}

/// A registered broker: the auditable identity behind resource transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broker {
    pub name: String,
    pub category: BrokerCategory,
    /// Display label; falls back to the name when configuration gives none.
    pub title: String,
}

/// Registry of brokers, deduplicated by (name, category).
///
/// Two processes loaded with the same name share one broker identity, so
/// their ledger entries aggregate under a single line in any audit view.
#[derive(Debug, Clone, Default)]
pub struct BrokerRegistry {
    brokers: Vec<Broker>,
}

impl BrokerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a broker by name and category, registering it on first use.
    pub fn get_or_create(&mut self, name: &str, category: BrokerCategory, title: &str) -> BrokerId {
        if let Some(i) = self
            .brokers
            .iter()
            .position(|b| b.name == name && b.category == category)
        {
            return BrokerId(i as u32);
        }
        let title = if title.is_empty() { name } else { title };
        self.brokers.push(Broker {
            name: name.to_string(),
            category,
            title: title.to_string(),
        });
        BrokerId((self.brokers.len() - 1) as u32)
    }

    pub fn get(&self, id: BrokerId) -> Option<&Broker> {
        self.brokers.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.brokers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brokers.is_empty()
    }
}
