//! Recipes and the resource pool seam.
//!
//! A recipe is one execution step's aggregated signed resource deltas,
//! attributed to a single broker. It is created fresh each step, handed to
//! the pool for settlement, and discarded — it has no persisted identity.
//!
//! Settlement semantics (clamping to availability, proportional shortfall
//! distribution) belong to the host's ledger. [`StockPool`] is a deliberately
//! naive in-memory pool so the engine can be driven headless in tests and in
//! the simtest harness.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::resources::BrokerId;

/// A debit of one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeInput {
    pub resource: String,
    pub quantity: f64,
}

/// A credit of one resource, with the dump decision already taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeOutput {
    pub resource: String,
    pub quantity: f64,
    /// When true the excess is vented overboard instead of stored.
    pub dump: bool,
}

/// A cure effect applied to a named condition rather than a stored resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCure {
    pub condition: String,
    pub quantity: f64,
    /// The modifier token the cure is gated by, when the owning process has
    /// any modifiers at all.
    pub gate: Option<String>,
}

/// One step's worth of signed deltas from a single broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub broker: BrokerId,
    pub inputs: Vec<RecipeInput>,
    pub outputs: Vec<RecipeOutput>,
    pub cures: Vec<RecipeCure>,
}

impl Recipe {
    pub fn new(broker: BrokerId) -> Self {
        Self {
            broker,
            inputs: Vec::new(),
            outputs: Vec::new(),
            cures: Vec::new(),
        }
    }

    pub fn add_input(&mut self, resource: &str, quantity: f64) {
        self.inputs.push(RecipeInput {
            resource: resource.to_string(),
            quantity,
        });
    }

    pub fn add_output(&mut self, resource: &str, quantity: f64, dump: bool) {
        self.outputs.push(RecipeOutput {
            resource: resource.to_string(),
            quantity,
            dump,
        });
    }

    pub fn add_cure(&mut self, condition: &str, quantity: f64, gate: Option<String>) {
        self.cures.push(RecipeCure {
            condition: condition.to_string(),
            quantity,
            gate,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty() && self.cures.is_empty()
    }
}

/// The ledger the engine settles against.
pub trait ResourcePool {
    /// Currently available amount of a resource (0.0 when unknown).
    fn amount(&self, resource: &str) -> f64;

    /// Hand over one recipe for settlement.
    fn add_recipe(&mut self, recipe: Recipe);
}

/// Naive in-memory pool: debits clamp at zero, dumped credits vanish.
///
/// Good enough to drive the engine headless; not a model of the host
/// ledger's shortfall distribution.
#[derive(Debug, Clone, Default)]
pub struct StockPool {
    stocks: HashMap<String, f64>,
}

impl StockPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_amount(&mut self, resource: &str, amount: f64) {
        self.stocks.insert(resource.to_string(), amount);
    }

    /// Iterate over all stocked resources and their amounts.
    pub fn amounts(&self) -> impl Iterator<Item = (&str, f64)> {
        self.stocks.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl ResourcePool for StockPool {
    fn amount(&self, resource: &str) -> f64 {
        self.stocks.get(resource).copied().unwrap_or(0.0)
    }

    fn add_recipe(&mut self, recipe: Recipe) {
        for input in &recipe.inputs {
            let entry = self.stocks.entry(input.resource.clone()).or_insert(0.0);
            *entry = (*entry - input.quantity).max(0.0);
        }
        for output in &recipe.outputs {
            if output.dump {
                continue;
            }
            let entry = self.stocks.entry(output.resource.clone()).or_insert(0.0);
            *entry += output.quantity;
        }
        // Cures target vessel conditions, not stocks; nothing to settle here.
    }
}
