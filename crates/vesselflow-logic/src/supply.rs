//! Supply watches — per-resource level classification and warnings.
//!
//! Supplies run first each step so that warning levels reflect the state
//! the crew wakes up to, before rules and processes move anything. A watch
//! classifies the pool's current amount into a level; transitions are
//! logged once and the current level is recorded on the vessel.

use serde::{Deserialize, Serialize};

use crate::config::SupplyConfig;
use crate::recipe::ResourcePool;
use crate::resources::ResourceCatalog;
use crate::vessel::VesselState;

/// Why a supply record was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum SupplyError {
    EmptyResource,
    UnknownResource(String),
    /// Threshold must lie in (0, 1).
    BadThreshold(f64),
    /// Full amount must be a positive, finite number.
    BadFullAmount(f64),
}

/// Classified availability of one watched resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplyLevel {
    Normal,
    Low,
    Empty,
}

/// A validated supply watch.
#[derive(Debug, Clone, PartialEq)]
pub struct Supply {
    pub resource: String,
    pub full_amount: f64,
    pub low_threshold: f64,
    pub low_message: String,
    pub empty_message: String,
}

impl Supply {
    pub fn parse(config: &SupplyConfig, catalog: &ResourceCatalog) -> Result<Supply, SupplyError> {
        let resource = config.resource.trim().to_string();
        if resource.is_empty() {
            return Err(SupplyError::EmptyResource);
        }
        if !catalog.contains(&resource) {
            return Err(SupplyError::UnknownResource(resource));
        }
        if !config.full_amount.is_finite() || config.full_amount <= 0.0 {
            return Err(SupplyError::BadFullAmount(config.full_amount));
        }
        if !(0.0..1.0).contains(&config.low_threshold) || config.low_threshold == 0.0 {
            return Err(SupplyError::BadThreshold(config.low_threshold));
        }

        Ok(Supply {
            resource,
            full_amount: config.full_amount,
            low_threshold: config.low_threshold,
            low_message: config.low_message.clone(),
            empty_message: config.empty_message.clone(),
        })
    }

    /// Classify the pool's current amount of the watched resource.
    pub fn level(&self, pool: &dyn ResourcePool) -> SupplyLevel {
        let amount = pool.amount(&self.resource);
        if amount <= 0.0 {
            SupplyLevel::Empty
        } else if amount < self.full_amount * self.low_threshold {
            SupplyLevel::Low
        } else {
            SupplyLevel::Normal
        }
    }

    /// Run one step: record the level and log its transition, if any.
    pub fn execute(&self, vessel: &mut VesselState, pool: &dyn ResourcePool) {
        let level = self.level(pool);
        let previous = vessel.supply_level(&self.resource);
        if previous == Some(level) {
            return;
        }
        match level {
            SupplyLevel::Empty if !self.empty_message.is_empty() => {
                log::warn!("{}", self.empty_message);
            }
            SupplyLevel::Low if !self.low_message.is_empty() => {
                log::warn!("{}", self.low_message);
            }
            _ => {}
        }
        vessel.set_supply_level(&self.resource, level);
    }
}
