//! Rules — per-crew-member resource consumption with shortage degeneration.
//!
//! A rule is a converter whose rates are inherently per capita: breathing,
//! eating, drinking. Its modifier list uses the same language as processes.
//! While the input resource is exhausted the rule accumulates a condition
//! on the vessel (named after the rule); once supply resumes the condition
//! decays back toward zero at the same pace.

use crate::config::RuleConfig;
use crate::environment::EnvReading;
use crate::modifier::{self, Modifier};
use crate::recipe::{Recipe, ResourcePool};
use crate::resources::{BrokerCategory, BrokerId, BrokerRegistry, ResourceCatalog};
use crate::vessel::VesselState;

/// Why a rule record was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleError {
    EmptyName,
    EmptyInput,
    UnknownResource(String),
    /// Rate must be a finite, non-negative number.
    BadRate(f64),
}

/// A validated per-crew rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: String,
    pub title: String,
    pub input: String,
    pub output: Option<String>,
    /// Per second, per crew member.
    pub rate: f64,
    /// Condition buildup per second per crew member during shortage.
    pub degeneration: f64,
    pub modifiers: Vec<Modifier>,
    pub broker: BrokerId,
}

impl Rule {
    pub fn parse(
        config: &RuleConfig,
        catalog: &ResourceCatalog,
        brokers: &mut BrokerRegistry,
    ) -> Result<Rule, RuleError> {
        if config.name.trim().is_empty() {
            return Err(RuleError::EmptyName);
        }
        let name = config.name.trim().to_string();
        let title = if config.title.trim().is_empty() {
            name.clone()
        } else {
            config.title.trim().to_string()
        };

        let input = config.input.trim().to_string();
        if input.is_empty() {
            return Err(RuleError::EmptyInput);
        }
        if !catalog.contains(&input) {
            return Err(RuleError::UnknownResource(input));
        }

        let output = match config.output.trim() {
            "" => None,
            out if !catalog.contains(out) => {
                return Err(RuleError::UnknownResource(out.to_string()))
            }
            out => Some(out.to_string()),
        };

        if !config.rate.is_finite() || config.rate < 0.0 {
            return Err(RuleError::BadRate(config.rate));
        }

        let modifiers = modifier::parse_modifier_list(&config.modifier);
        let broker = brokers.get_or_create(&name, BrokerCategory::Crew, &title);

        Ok(Rule {
            name,
            title,
            input,
            output,
            rate: config.rate,
            degeneration: config.degeneration,
            modifiers,
            broker,
        })
    }

    /// Run one simulation step of this rule for the whole crew.
    pub fn execute(
        &self,
        vessel: &mut VesselState,
        env: &dyn EnvReading,
        pool: &mut dyn ResourcePool,
        elapsed: f64,
    ) {
        let crew = f64::from(env.crew_count());
        let k = modifier::evaluate(env, &self.modifiers) * crew;
        if k.abs() < f64::EPSILON {
            return;
        }

        // Shortage is judged on availability at the start of the step; the
        // pool's settlement outcome is not visible from here.
        if self.degeneration > 0.0 {
            let delta = self.degeneration * crew * elapsed;
            if pool.amount(&self.input) <= 0.0 {
                vessel.accumulate_condition(&self.name, delta);
            } else {
                vessel.decay_condition(&self.name, delta);
            }
        }

        let quantity = self.rate * k * elapsed;
        let mut recipe = Recipe::new(self.broker);
        recipe.add_input(&self.input, quantity);
        if let Some(output) = &self.output {
            recipe.add_output(output, quantity, false);
        }
        pool.add_recipe(recipe);
    }
}
