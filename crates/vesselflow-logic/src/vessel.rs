//! Per-vessel mutable simulation state.
//!
//! Everything here survives a profile reload: valve overrides are keyed by
//! process name rather than by any in-memory identity, condition levels by
//! rule name, and supply levels by resource identifier. The flow engine
//! reads the overrides during execution and never writes them; only
//! explicit user action (outside this crate) changes a valve selection.

use std::collections::HashMap;

use crate::dump::ActiveValve;
use crate::supply::SupplyLevel;

#[derive(Debug, Clone, Default)]
pub struct VesselState {
    valve_overrides: HashMap<String, ActiveValve>,
    conditions: HashMap<String, f64>,
    supply_levels: HashMap<String, SupplyLevel>,
}

impl VesselState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the dump valve for one process on this vessel.
    pub fn set_valve(&mut self, process_name: &str, valve: ActiveValve) {
        self.valve_overrides.insert(process_name.to_string(), valve);
    }

    /// Drop an override, reverting the process to its default valve.
    pub fn clear_valve(&mut self, process_name: &str) {
        self.valve_overrides.remove(process_name);
    }

    pub fn valve_override(&self, process_name: &str) -> Option<ActiveValve> {
        self.valve_overrides.get(process_name).copied()
    }

    /// Current level of a named condition (0.0 when never touched).
    pub fn condition(&self, name: &str) -> f64 {
        self.conditions.get(name).copied().unwrap_or(0.0)
    }

    pub fn accumulate_condition(&mut self, name: &str, delta: f64) {
        let entry = self.conditions.entry(name.to_string()).or_insert(0.0);
        *entry += delta;
    }

    /// Reduce a condition toward zero, never below.
    pub fn decay_condition(&mut self, name: &str, delta: f64) {
        if let Some(entry) = self.conditions.get_mut(name) {
            *entry = (*entry - delta).max(0.0);
        }
    }

    pub fn supply_level(&self, resource: &str) -> Option<SupplyLevel> {
        self.supply_levels.get(resource).copied()
    }

    pub fn set_supply_level(&mut self, resource: &str, level: SupplyLevel) {
        self.supply_levels.insert(resource.to_string(), level);
    }
}
