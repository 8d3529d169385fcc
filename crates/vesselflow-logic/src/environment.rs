//! Environment readings — one capability trait, two state sources.
//!
//! The modifier evaluator is written once against [`EnvReading`]. A live
//! vessel supplies readings through [`VesselSnapshot`]; the vehicle editor
//! supplies them through [`PlannerSnapshot`], which synthesizes the values a
//! not-yet-existing vessel would have. Keeping the token semantics out of
//! the adapters is what guarantees the two contexts stay behaviorally
//! identical.
//!
//! Resource amounts are captured into the snapshot at the start of a step,
//! so every modifier evaluation within that step sees the same availability
//! regardless of settlement order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::recipe::ResourcePool;
use crate::resources::ResourceCatalog;

/// Tuning constants shared by both state sources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnvSettings {
    /// Atmospheres above which a habitat counts as pressurized.
    pub pressure_threshold: f64,
    /// Multiplier applied by the `pressure` modifier when not pressurized.
    pub pressure_factor: f64,
    /// CO2 fraction above which the crew counts as poisoned.
    pub poisoning_threshold: f64,
    /// Multiplier applied by the `poisoning` modifier when poisoned.
    pub poisoning_factor: f64,
    /// Radiation floor used by the planner (rad/s); deep space is never
    /// entirely quiet.
    pub nominal_radiation: f64,
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self {
            pressure_threshold: 0.9,
            pressure_factor: 0.1,
            poisoning_threshold: 0.02,
            poisoning_factor: 0.05,
            nominal_radiation: 0.00000087,
        }
    }
}

/// The readings the modifier language consumes.
///
/// Every method is a plain observation; no token semantics live here.
pub trait EnvReading {
    fn weightless(&self) -> bool;
    fn landed(&self) -> bool;
    fn breathable(&self) -> bool;
    /// Magnitude of the difference between habitat and survivable temperature.
    fn temperature_delta(&self) -> f64;
    fn radiation(&self) -> f64;
    /// Fraction of incoming radiation stopped by shielding, in [0, 1].
    fn shielding(&self) -> f64;
    fn volume(&self) -> f64;
    fn surface(&self) -> f64;
    fn living_space(&self) -> f64;
    fn comfort(&self) -> f64;
    fn pressurized(&self) -> bool;
    fn pressure_factor(&self) -> f64;
    fn poisoned(&self) -> bool;
    fn poisoning_factor(&self) -> f64;
    fn crew_count(&self) -> u32;
    /// Currently available amount of a resource (0.0 when unknown).
    fn resource_amount(&self, resource: &str) -> f64;
}

/// Live-vessel state source: a snapshot of the vessel's current environment
/// and resource availability.
#[derive(Debug, Clone)]
pub struct VesselSnapshot {
    pub weightless: bool,
    pub landed: bool,
    pub breathable: bool,
    pub temperature_delta: f64,
    /// Accumulated habitat radiation (rad/s).
    pub habitat_radiation: f64,
    pub shielding: f64,
    pub volume: f64,
    pub surface: f64,
    pub living_space: f64,
    pub comfort: f64,
    /// Habitat pressure in atmospheres.
    pub pressure: f64,
    /// CO2 fraction in the habitat atmosphere.
    pub poisoning: f64,
    pub crew: u32,
    pub resources: HashMap<String, f64>,
    pub settings: EnvSettings,
}

impl Default for VesselSnapshot {
    fn default() -> Self {
        Self {
            weightless: true,
            landed: false,
            breathable: false,
            temperature_delta: 0.0,
            habitat_radiation: 0.0,
            shielding: 0.0,
            volume: 20.0,
            surface: 30.0,
            living_space: 1.0,
            comfort: 1.0,
            pressure: 1.0,
            poisoning: 0.0,
            crew: 0,
            resources: HashMap::new(),
            settings: EnvSettings::default(),
        }
    }
}

impl VesselSnapshot {
    /// Capture current availability of every cataloged resource from a pool.
    pub fn capture_resources(&mut self, pool: &dyn ResourcePool, catalog: &ResourceCatalog) {
        self.resources = snapshot_amounts(pool, catalog);
    }
}

impl EnvReading for VesselSnapshot {
    fn weightless(&self) -> bool {
        self.weightless
    }

    fn landed(&self) -> bool {
        self.landed
    }

    fn breathable(&self) -> bool {
        self.breathable
    }

    fn temperature_delta(&self) -> f64 {
        self.temperature_delta
    }

    fn radiation(&self) -> f64 {
        self.habitat_radiation
    }

    fn shielding(&self) -> f64 {
        self.shielding
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn surface(&self) -> f64 {
        self.surface
    }

    fn living_space(&self) -> f64 {
        self.living_space
    }

    fn comfort(&self) -> f64 {
        self.comfort
    }

    fn pressurized(&self) -> bool {
        self.pressure >= self.settings.pressure_threshold
    }

    fn pressure_factor(&self) -> f64 {
        self.settings.pressure_factor
    }

    fn poisoned(&self) -> bool {
        self.poisoning >= self.settings.poisoning_threshold
    }

    fn poisoning_factor(&self) -> f64 {
        self.settings.poisoning_factor
    }

    fn crew_count(&self) -> u32 {
        self.crew
    }

    fn resource_amount(&self, resource: &str) -> f64 {
        self.resources.get(resource).copied().unwrap_or(0.0)
    }
}

/// Design-time state source: synthesized readings for a vehicle that exists
/// only in the editor.
#[derive(Debug, Clone)]
pub struct PlannerSnapshot {
    pub weightless: bool,
    pub landed: bool,
    pub breathable: bool,
    pub temperature_delta: f64,
    /// Ambient radiation of the chosen target environment (rad/s).
    pub ambient_radiation: f64,
    /// Radiation emitted by parts of the design itself (rad/s).
    pub emitted_radiation: f64,
    pub shielding: f64,
    pub volume: f64,
    pub surface: f64,
    pub living_space: f64,
    pub comfort: f64,
    pub pressurized: bool,
    /// The editor's what-if toggle for a failed scrubber.
    pub scrubber_failure: bool,
    pub crew: u32,
    pub resources: HashMap<String, f64>,
    pub settings: EnvSettings,
}

impl Default for PlannerSnapshot {
    fn default() -> Self {
        Self {
            weightless: true,
            landed: false,
            breathable: false,
            temperature_delta: 0.0,
            ambient_radiation: 0.0,
            emitted_radiation: 0.0,
            shielding: 0.0,
            volume: 20.0,
            surface: 30.0,
            living_space: 1.0,
            comfort: 1.0,
            pressurized: true,
            scrubber_failure: false,
            crew: 0,
            resources: HashMap::new(),
            settings: EnvSettings::default(),
        }
    }
}

impl PlannerSnapshot {
    /// Capture availability from the design-time resource simulator.
    pub fn capture_resources(&mut self, pool: &dyn ResourcePool, catalog: &ResourceCatalog) {
        self.resources = snapshot_amounts(pool, catalog);
    }
}

impl EnvReading for PlannerSnapshot {
    fn weightless(&self) -> bool {
        self.weightless
    }

    fn landed(&self) -> bool {
        self.landed
    }

    fn breathable(&self) -> bool {
        self.breathable
    }

    fn temperature_delta(&self) -> f64 {
        self.temperature_delta
    }

    fn radiation(&self) -> f64 {
        (self.ambient_radiation + self.emitted_radiation).max(self.settings.nominal_radiation)
    }

    fn shielding(&self) -> f64 {
        self.shielding
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn surface(&self) -> f64 {
        self.surface
    }

    fn living_space(&self) -> f64 {
        self.living_space
    }

    fn comfort(&self) -> f64 {
        self.comfort
    }

    fn pressurized(&self) -> bool {
        self.pressurized
    }

    fn pressure_factor(&self) -> f64 {
        self.settings.pressure_factor
    }

    fn poisoned(&self) -> bool {
        self.scrubber_failure
    }

    fn poisoning_factor(&self) -> f64 {
        self.settings.poisoning_factor
    }

    fn crew_count(&self) -> u32 {
        self.crew
    }

    fn resource_amount(&self, resource: &str) -> f64 {
        self.resources.get(resource).copied().unwrap_or(0.0)
    }
}

fn snapshot_amounts(pool: &dyn ResourcePool, catalog: &ResourceCatalog) -> HashMap<String, f64> {
    // Only cataloged resources can appear in modifier fallbacks that were
    // resolved against the same catalog.
    let mut amounts = HashMap::new();
    for name in catalog.names() {
        amounts.insert(name.to_string(), pool.amount(name));
    }
    amounts
}
