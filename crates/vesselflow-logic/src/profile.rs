//! Profile — the full configured set of supplies, rules and processes.
//!
//! A profile is an explicitly constructed value: loading parses everything
//! up front and reloading replaces the whole value atomically, so a tick
//! can never observe a half-loaded mix of old and new entries.
//!
//! Loading is forgiving by design: an invalid entry is logged and skipped,
//! a missing base profile is logged and leaves the profile empty, and
//! duplicate identities keep the first-seen definition. Nothing in here
//! aborts the simulation.

use std::collections::HashSet;

use crate::config::ProfileConfig;
use crate::environment::EnvReading;
use crate::process::Process;
use crate::recipe::ResourcePool;
use crate::resources::{BrokerRegistry, ResourceCatalog};
use crate::rule::Rule;
use crate::supply::Supply;
use crate::vessel::VesselState;

#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub name: String,
    pub supplies: Vec<Supply>,
    pub rules: Vec<Rule>,
    pub processes: Vec<Process>,
}

impl Profile {
    /// A profile with no entries; what a vessel runs when configuration
    /// names a profile that does not exist.
    pub fn empty(name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            ..Profile::default()
        }
    }

    /// Load the profile named `selected` from the available configurations.
    ///
    /// The base profile is parsed first, then every configuration flagged
    /// `support`, in order. Identity collisions (name for rules and
    /// processes, resource for supplies) keep the first-seen entry, which
    /// gives the base profile precedence over support overlays.
    pub fn parse(
        selected: &str,
        configs: &[ProfileConfig],
        catalog: &ResourceCatalog,
        brokers: &mut BrokerRegistry,
    ) -> Profile {
        let base = configs.iter().find(|c| !c.support && c.name == selected);
        if base.is_none() {
            log::warn!("profile '{selected}' not found; simulation runs with no flow entries");
        }
        let sources: Vec<&ProfileConfig> = base
            .into_iter()
            .chain(configs.iter().filter(|c| c.support))
            .collect();

        let mut profile = Profile::empty(selected);
        let mut seen_supplies = HashSet::new();
        let mut seen_rules = HashSet::new();
        let mut seen_processes = HashSet::new();

        for source in sources {
            for config in &source.supplies {
                match Supply::parse(config, catalog) {
                    Ok(supply) => {
                        if seen_supplies.insert(supply.resource.clone()) {
                            profile.supplies.push(supply);
                        }
                    }
                    Err(e) => log::warn!("skipping supply '{}': {:?}", config.resource, e),
                }
            }
            for config in &source.rules {
                match Rule::parse(config, catalog, brokers) {
                    Ok(rule) => {
                        if seen_rules.insert(rule.name.clone()) {
                            profile.rules.push(rule);
                        }
                    }
                    Err(e) => log::warn!("skipping rule '{}': {:?}", config.name, e),
                }
            }
            for config in &source.processes {
                match Process::parse(config, catalog, brokers) {
                    Ok(process) => {
                        if seen_processes.insert(process.name.clone()) {
                            profile.processes.push(process);
                        }
                    }
                    Err(e) => log::warn!("skipping process '{}': {:?}", config.name, e),
                }
            }
        }

        log::info!(
            "profile '{}' loaded: {} supplies, {} rules, {} processes",
            profile.name,
            profile.supplies.len(),
            profile.rules.len(),
            profile.processes.len()
        );
        profile
    }

    /// Run one full simulation step for one vessel.
    ///
    /// Fixed order: supplies establish warning levels first, then rules
    /// consume, then processes convert. Within each collection, entries run
    /// in load order. Synchronous and deterministic throughout.
    pub fn execute(
        &self,
        vessel: &mut VesselState,
        env: &dyn EnvReading,
        pool: &mut dyn ResourcePool,
        elapsed: f64,
    ) {
        for supply in &self.supplies {
            supply.execute(vessel, pool);
        }
        for rule in &self.rules {
            rule.execute(vessel, env, pool, elapsed);
        }
        for process in &self.processes {
            process.execute(vessel, env, pool, elapsed);
        }
    }

    pub fn find_process(&self, name: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.name == name)
    }
}
