//! Process — a configured resource converter.
//!
//! A process turns inputs into outputs at nominal per-second rates, scaled
//! each step by the product of its modifier list. Parsed once at profile
//! load and immutable afterwards; a reload discards every instance and
//! parses from scratch.

use crate::config::ProcessConfig;
use crate::dump::{ActiveValve, DumpSpec};
use crate::environment::EnvReading;
use crate::modifier::{self, Modifier};
use crate::recipe::{Recipe, ResourcePool};
use crate::resources::{BrokerCategory, BrokerId, BrokerRegistry, ResourceCatalog};
use crate::vessel::VesselState;

/// Why a process record was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessError {
    /// `name` missing or empty.
    EmptyName,
    /// An `input`/`output`/`cures` entry is not exactly `resource@rate`.
    MalformedEntry(String),
    /// Entry has an empty resource identifier.
    EmptyResource(String),
    /// Entry rate failed to parse as a float.
    BadRate(String),
    /// Resource key appears twice within one list.
    DuplicateResource(String),
    /// Input/output resource not present in the catalog.
    UnknownResource(String),
}

/// A validated converter definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub name: String,
    pub title: String,
    /// Ordered; the first token also gates every cure.
    pub modifiers: Vec<Modifier>,
    /// Nominal rates per second, unique resource keys.
    pub inputs: Vec<(String, f64)>,
    pub outputs: Vec<(String, f64)>,
    /// Condition identifiers, not catalog-checked.
    pub cures: Vec<(String, f64)>,
    pub dump: DumpSpec,
    pub broker: BrokerId,
}

impl Process {
    /// Parse and validate one configuration record.
    ///
    /// Registers the process's broker identity as a side effect. Catalog
    /// validation of inputs/outputs can be bypassed per record with
    /// `skip_resources_validity_check`; cures name arbitrary conditions and
    /// are never catalog-checked.
    pub fn parse(
        config: &ProcessConfig,
        catalog: &ResourceCatalog,
        brokers: &mut BrokerRegistry,
    ) -> Result<Process, ProcessError> {
        if config.name.trim().is_empty() {
            return Err(ProcessError::EmptyName);
        }
        let name = config.name.trim().to_string();
        let title = if config.title.trim().is_empty() {
            name.clone()
        } else {
            config.title.trim().to_string()
        };

        let check_catalog = !config.skip_resources_validity_check;
        let inputs = parse_rate_entries(&config.input, catalog, check_catalog)?;
        let outputs = parse_rate_entries(&config.output, catalog, check_catalog)?;
        let cures = parse_rate_entries(&config.cures, catalog, false)?;

        let modifiers = modifier::parse_modifier_list(&config.modifier);
        if !cures.is_empty() && modifiers.is_empty() {
            // The cure gate is the first modifier token; without one the
            // cures run ungated.
            log::warn!("process '{name}' defines cures but no modifiers; cures are ungated");
        }

        let dump = DumpSpec::parse(&config.dump, &config.dump_valve);
        let broker = brokers.get_or_create(&name, BrokerCategory::Converter, &title);

        Ok(Process {
            name,
            title,
            modifiers,
            inputs,
            outputs,
            cures,
            dump,
            broker,
        })
    }

    /// The valve a vessel uses when it carries no override.
    pub fn default_valve(&self) -> ActiveValve {
        self.dump.default_valve()
    }

    /// Run one simulation step of this converter.
    ///
    /// Evaluates the modifier product, scales nominal rates by elapsed
    /// simulated seconds, and submits a single recipe. A near-zero product
    /// skips everything: no recipe, no side effects.
    pub fn execute(
        &self,
        vessel: &VesselState,
        env: &dyn EnvReading,
        pool: &mut dyn ResourcePool,
        elapsed: f64,
    ) {
        let k = modifier::evaluate(env, &self.modifiers);
        if k.abs() < f64::EPSILON {
            return;
        }

        let valve = vessel
            .valve_override(&self.name)
            .unwrap_or_else(|| self.default_valve());

        let gate = self.modifiers.first().map(|m| m.token().to_string());

        let mut recipe = Recipe::new(self.broker);
        for (resource, rate) in &self.inputs {
            recipe.add_input(resource, rate * k * elapsed);
        }
        for (resource, rate) in &self.outputs {
            recipe.add_output(resource, rate * k * elapsed, self.dump.check(valve, resource));
        }
        for (condition, rate) in &self.cures {
            recipe.add_cure(condition, rate * k * elapsed, gate.clone());
        }
        pool.add_recipe(recipe);
    }
}

/// Parse a list of `"<resource>@<rate>"` entries with unique resource keys.
fn parse_rate_entries(
    entries: &[String],
    catalog: &ResourceCatalog,
    check_catalog: bool,
) -> Result<Vec<(String, f64)>, ProcessError> {
    let mut parsed: Vec<(String, f64)> = Vec::with_capacity(entries.len());
    for entry in entries {
        let tokens: Vec<&str> = entry.split('@').collect();
        if tokens.len() != 2 {
            return Err(ProcessError::MalformedEntry(entry.clone()));
        }
        let resource = tokens[0].trim();
        if resource.is_empty() {
            return Err(ProcessError::EmptyResource(entry.clone()));
        }
        let rate: f64 = tokens[1]
            .trim()
            .parse()
            .map_err(|_| ProcessError::BadRate(entry.clone()))?;
        if parsed.iter().any(|(r, _)| r == resource) {
            return Err(ProcessError::DuplicateResource(resource.to_string()));
        }
        if check_catalog && !catalog.contains(resource) {
            return Err(ProcessError::UnknownResource(resource.to_string()));
        }
        parsed.push((resource.to_string(), rate));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::VesselSnapshot;
    use crate::recipe::StockPool;

    fn catalog() -> ResourceCatalog {
        ResourceCatalog::from_names(["water", "oxygen", "hydrogen", "co2", "food"])
    }

    fn electrolyzer_config() -> ProcessConfig {
        ProcessConfig {
            name: "electrolyzer".to_string(),
            input: vec!["water@2.0".to_string()],
            output: vec!["oxygen@1.0".to_string(), "hydrogen@1.0".to_string()],
            dump_valve: "oxygen,hydrogen".to_string(),
            ..ProcessConfig::default()
        }
    }

    /// Test pool that records recipes instead of settling them.
    #[derive(Default)]
    struct CapturePool {
        recipes: Vec<Recipe>,
    }

    impl ResourcePool for CapturePool {
        fn amount(&self, _resource: &str) -> f64 {
            0.0
        }

        fn add_recipe(&mut self, recipe: Recipe) {
            self.recipes.push(recipe);
        }
    }

    #[test]
    fn test_parse_valid_process() {
        let mut brokers = BrokerRegistry::new();
        let process = Process::parse(&electrolyzer_config(), &catalog(), &mut brokers).unwrap();
        assert_eq!(process.name, "electrolyzer");
        assert_eq!(process.title, "electrolyzer", "title defaults to name");
        assert_eq!(process.inputs, vec![("water".to_string(), 2.0)]);
        assert_eq!(process.outputs.len(), 2);
        assert_eq!(brokers.len(), 1);
    }

    #[test]
    fn test_parse_empty_name_fails() {
        let mut brokers = BrokerRegistry::new();
        let config = ProcessConfig {
            name: "  ".to_string(),
            ..ProcessConfig::default()
        };
        assert_eq!(
            Process::parse(&config, &catalog(), &mut brokers),
            Err(ProcessError::EmptyName)
        );
    }

    #[test]
    fn test_parse_malformed_entry_fails() {
        let mut brokers = BrokerRegistry::new();
        let mut config = electrolyzer_config();
        config.input = vec!["water".to_string()];
        assert!(matches!(
            Process::parse(&config, &catalog(), &mut brokers),
            Err(ProcessError::MalformedEntry(_))
        ));

        config.input = vec!["water@2.0@extra".to_string()];
        assert!(matches!(
            Process::parse(&config, &catalog(), &mut brokers),
            Err(ProcessError::MalformedEntry(_))
        ));
    }

    #[test]
    fn test_parse_empty_resource_fails() {
        let mut brokers = BrokerRegistry::new();
        let mut config = electrolyzer_config();
        config.input = vec!["@2.0".to_string()];
        assert!(matches!(
            Process::parse(&config, &catalog(), &mut brokers),
            Err(ProcessError::EmptyResource(_))
        ));
    }

    #[test]
    fn test_parse_bad_rate_fails() {
        let mut brokers = BrokerRegistry::new();
        let mut config = electrolyzer_config();
        config.input = vec!["water@plenty".to_string()];
        assert!(matches!(
            Process::parse(&config, &catalog(), &mut brokers),
            Err(ProcessError::BadRate(_))
        ));
    }

    #[test]
    fn test_parse_duplicate_resource_fails() {
        let mut brokers = BrokerRegistry::new();
        let mut config = electrolyzer_config();
        config.input = vec!["water@1.0".to_string(), "water@2.0".to_string()];
        assert_eq!(
            Process::parse(&config, &catalog(), &mut brokers),
            Err(ProcessError::DuplicateResource("water".to_string()))
        );
    }

    #[test]
    fn test_parse_unknown_resource_fails() {
        let mut brokers = BrokerRegistry::new();
        let mut config = electrolyzer_config();
        config.input = vec!["unobtainium@1.0".to_string()];
        assert_eq!(
            Process::parse(&config, &catalog(), &mut brokers),
            Err(ProcessError::UnknownResource("unobtainium".to_string()))
        );
    }

    #[test]
    fn test_skip_validity_check_allows_unknown() {
        let mut brokers = BrokerRegistry::new();
        let mut config = electrolyzer_config();
        config.input = vec!["unobtainium@1.0".to_string()];
        config.skip_resources_validity_check = true;
        assert!(Process::parse(&config, &catalog(), &mut brokers).is_ok());
    }

    #[test]
    fn test_cures_not_catalog_checked() {
        let mut brokers = BrokerRegistry::new();
        let mut config = electrolyzer_config();
        config.modifier = "radiation".to_string();
        config.cures = vec!["radiation_sickness@0.001".to_string()];
        let process = Process::parse(&config, &catalog(), &mut brokers).unwrap();
        assert_eq!(process.cures.len(), 1);
    }

    #[test]
    fn test_modifier_round_trip() {
        let mut brokers = BrokerRegistry::new();
        let mut config = electrolyzer_config();
        config.modifier = "per_capita,breathable,food".to_string();
        let process = Process::parse(&config, &catalog(), &mut brokers).unwrap();
        let tokens: Vec<&str> = process.modifiers.iter().map(Modifier::token).collect();
        assert_eq!(tokens, vec!["per_capita", "breathable", "food"]);
    }

    #[test]
    fn test_execute_exact_scaling() {
        let mut brokers = BrokerRegistry::new();
        let process = Process::parse(&electrolyzer_config(), &catalog(), &mut brokers).unwrap();

        let vessel = VesselState::new();
        let env = VesselSnapshot::default();
        let mut pool = CapturePool::default();
        process.execute(&vessel, &env, &mut pool, 10.0);

        assert_eq!(pool.recipes.len(), 1);
        let recipe = &pool.recipes[0];
        assert_eq!(recipe.inputs[0].resource, "water");
        assert!((recipe.inputs[0].quantity - 20.0).abs() < 1e-9);
        assert!((recipe.outputs[0].quantity - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_execute_epsilon_skip_emits_nothing() {
        let mut brokers = BrokerRegistry::new();
        let mut config = electrolyzer_config();
        // Gate on a resource with zero availability.
        config.modifier = "food".to_string();
        let process = Process::parse(&config, &catalog(), &mut brokers).unwrap();

        let vessel = VesselState::new();
        let env = VesselSnapshot::default();
        let mut pool = CapturePool::default();
        process.execute(&vessel, &env, &mut pool, 10.0);

        assert!(pool.recipes.is_empty(), "zero multiplier must skip entirely");
    }

    #[test]
    fn test_execute_tags_dump_from_default_valve() {
        let mut brokers = BrokerRegistry::new();
        let mut config = electrolyzer_config();
        config.dump = "hydrogen".to_string();
        let process = Process::parse(&config, &catalog(), &mut brokers).unwrap();

        let vessel = VesselState::new();
        let env = VesselSnapshot::default();
        let mut pool = CapturePool::default();
        process.execute(&vessel, &env, &mut pool, 1.0);

        let recipe = &pool.recipes[0];
        let oxygen = recipe.outputs.iter().find(|o| o.resource == "oxygen").unwrap();
        let hydrogen = recipe
            .outputs
            .iter()
            .find(|o| o.resource == "hydrogen")
            .unwrap();
        assert!(!oxygen.dump);
        assert!(hydrogen.dump);
    }

    #[test]
    fn test_execute_vessel_override_wins_over_default() {
        let mut brokers = BrokerRegistry::new();
        let process = Process::parse(&electrolyzer_config(), &catalog(), &mut brokers).unwrap();
        // Default valve is option 0 (oxygen); the vessel selects hydrogen.
        let mut vessel = VesselState::new();
        vessel.set_valve("electrolyzer", ActiveValve { index: 1 });

        let env = VesselSnapshot::default();
        let mut pool = CapturePool::default();
        process.execute(&vessel, &env, &mut pool, 1.0);

        let recipe = &pool.recipes[0];
        let hydrogen = recipe
            .outputs
            .iter()
            .find(|o| o.resource == "hydrogen")
            .unwrap();
        assert!(hydrogen.dump, "override valve must drive the dump tag");
    }

    #[test]
    fn test_execute_cure_gated_by_first_modifier() {
        let mut brokers = BrokerRegistry::new();
        let mut config = electrolyzer_config();
        config.modifier = "radiation,volume".to_string();
        config.cures = vec!["radiation_sickness@0.5".to_string()];
        let process = Process::parse(&config, &catalog(), &mut brokers).unwrap();

        let vessel = VesselState::new();
        let env = VesselSnapshot {
            habitat_radiation: 2.0,
            ..VesselSnapshot::default()
        };
        let mut pool = CapturePool::default();
        process.execute(&vessel, &env, &mut pool, 1.0);

        let cure = &pool.recipes[0].cures[0];
        assert_eq!(cure.condition, "radiation_sickness");
        assert_eq!(cure.gate.as_deref(), Some("radiation"));
        // k = radiation(2.0) * volume(20.0) = 40
        assert!((cure.quantity - 20.0).abs() < 1e-9);
    }
}
