//! Modifier language — named scalars that scale a converter's nominal rates.
//!
//! A modifier list is an ordered sequence of tokens, reduced left to right
//! into a single multiplier. Reserved tokens read the environment; any other
//! token names a resource and multiplies by its current availability, which
//! makes the language open-ended: a process whose rate should scale with an
//! available catalyst just lists the catalyst's name.
//!
//! Tokens are resolved once at parse time into [`Modifier`] variants, so
//! evaluation never dispatches on strings. The evaluator is written a single
//! time against [`EnvReading`]; live and planner contexts differ only in the
//! readings their adapters supply.
//!
//! `living_space` and `comfort` divide without a zero guard, matching the
//! configured expectation that both factors are strictly positive; a zero
//! factor propagates a non-finite multiplier. `per_capita` floors the crew
//! count at one.

use serde::{Deserialize, Serialize};

use crate::environment::EnvReading;

/// One token of the modifier language, resolved at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    ZeroG,
    Landed,
    Breathable,
    NonBreathable,
    Temperature,
    Radiation,
    Shielding,
    Volume,
    Surface,
    LivingSpace,
    Comfort,
    Pressure,
    Poisoning,
    PerCapita,
    /// Fallback: scale by the named resource's availability.
    Resource(String),
}

impl Modifier {
    /// Resolve one token. Unreserved tokens become resource references;
    /// parsing never fails.
    pub fn parse(token: &str) -> Modifier {
        match token {
            "zerog" => Modifier::ZeroG,
            "landed" => Modifier::Landed,
            "breathable" => Modifier::Breathable,
            "non_breathable" => Modifier::NonBreathable,
            "temperature" => Modifier::Temperature,
            "radiation" => Modifier::Radiation,
            "shielding" => Modifier::Shielding,
            "volume" => Modifier::Volume,
            "surface" => Modifier::Surface,
            "living_space" => Modifier::LivingSpace,
            "comfort" => Modifier::Comfort,
            "pressure" => Modifier::Pressure,
            "poisoning" => Modifier::Poisoning,
            "per_capita" => Modifier::PerCapita,
            other => Modifier::Resource(other.to_string()),
        }
    }

    /// The token this modifier was parsed from.
    pub fn token(&self) -> &str {
        match self {
            Modifier::ZeroG => "zerog",
            Modifier::Landed => "landed",
            Modifier::Breathable => "breathable",
            Modifier::NonBreathable => "non_breathable",
            Modifier::Temperature => "temperature",
            Modifier::Radiation => "radiation",
            Modifier::Shielding => "shielding",
            Modifier::Volume => "volume",
            Modifier::Surface => "surface",
            Modifier::LivingSpace => "living_space",
            Modifier::Comfort => "comfort",
            Modifier::Pressure => "pressure",
            Modifier::Poisoning => "poisoning",
            Modifier::PerCapita => "per_capita",
            Modifier::Resource(name) => name,
        }
    }
}

/// Parse a comma-separated modifier list, preserving order.
///
/// Order matters twice over: multiplication by zero short-circuits nothing
/// (the product is just zero), but cure effects are attributed to the first
/// token of the list.
pub fn parse_modifier_list(spec: &str) -> Vec<Modifier> {
    spec.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Modifier::parse)
        .collect()
}

/// Reduce a modifier list to a single scalar against one state source.
///
/// An empty list is the identity: 1.0.
pub fn evaluate(ctx: &dyn EnvReading, modifiers: &[Modifier]) -> f64 {
    let mut k = 1.0;
    for modifier in modifiers {
        match modifier {
            Modifier::ZeroG => k *= bool_factor(ctx.weightless()),
            Modifier::Landed => k *= bool_factor(ctx.landed()),
            Modifier::Breathable => k *= bool_factor(ctx.breathable()),
            Modifier::NonBreathable => k *= bool_factor(!ctx.breathable()),
            Modifier::Temperature => k *= ctx.temperature_delta(),
            Modifier::Radiation => k *= ctx.radiation(),
            Modifier::Shielding => k *= 1.0 - ctx.shielding(),
            Modifier::Volume => k *= ctx.volume(),
            Modifier::Surface => k *= ctx.surface(),
            Modifier::LivingSpace => k /= ctx.living_space(),
            Modifier::Comfort => k /= ctx.comfort(),
            Modifier::Pressure => {
                if !ctx.pressurized() {
                    k *= ctx.pressure_factor();
                }
            }
            Modifier::Poisoning => {
                if ctx.poisoned() {
                    k *= ctx.poisoning_factor();
                }
            }
            Modifier::PerCapita => k /= f64::from(ctx.crew_count().max(1)),
            Modifier::Resource(name) => k *= ctx.resource_amount(name),
        }
    }
    k
}

fn bool_factor(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
