//! Raw configuration records — the shapes the profile loader consumes.
//!
//! These are plain deserialization targets; all validation happens in the
//! typed parsers (`Process::parse`, `Rule::parse`, `Supply::parse`). Every
//! field defaults so that sparse configuration stays sparse.

use serde::{Deserialize, Serialize};

/// One converter record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub name: String,
    /// Display label; empty means "use the name".
    pub title: String,
    /// Comma-separated modifier token list, order-significant.
    pub modifier: String,
    /// Repeatable `"<resource>@<rate>"` entries.
    pub input: Vec<String>,
    pub output: Vec<String>,
    pub cures: Vec<String>,
    pub skip_resources_validity_check: bool,
    pub dump: String,
    pub dump_valve: String,
}

/// One per-crew metabolic rule record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub name: String,
    pub title: String,
    pub input: String,
    /// Optional byproduct resource; empty means none.
    pub output: String,
    /// Nominal rate per second per crew member.
    pub rate: f64,
    /// Condition buildup per second per crew member while the input is
    /// exhausted.
    pub degeneration: f64,
    pub modifier: String,
}

/// One supply-watch record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplyConfig {
    pub resource: String,
    /// Amount considered "full" for level classification.
    pub full_amount: f64,
    /// Fraction of `full_amount` below which the supply counts as low.
    pub low_threshold: f64,
    pub low_message: String,
    pub empty_message: String,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            resource: String::new(),
            full_amount: 0.0,
            low_threshold: 0.2,
            low_message: String::new(),
            empty_message: String::new(),
        }
    }
}

/// One complete profile: the unit of configuration selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub name: String,
    /// Support profiles overlay the selected base profile; their entries
    /// lose every name collision because the base is parsed first.
    pub support: bool,
    pub supplies: Vec<SupplyConfig>,
    pub rules: Vec<RuleConfig>,
    pub processes: Vec<ProcessConfig>,
}
