//! Dump policy — which excess outputs get vented instead of stored.
//!
//! Two configuration strings drive the policy. `dump` fixes the baseline:
//! `"true"` dumps every output, `"false"` (or nothing) dumps none, and a
//! comma list dumps exactly the named resources. `dump_valve` enumerates the
//! user-selectable options: a comma list of choices, where one choice can
//! tie several resources together with `&` so they vent as a set.
//!
//! The default valve selection is derived from `dump`: the first option
//! whose every resource already appears in the dump list, or the first
//! option when none matches.

use serde::{Deserialize, Serialize};

/// Per-vessel, per-process selection among the configurable dump options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveValve {
    pub index: usize,
}

/// Parsed dump policy for one process.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DumpSpec {
    /// `dump = true`: every output is vented regardless of valves.
    dump_all: bool,
    /// Resources that always vent.
    always: Vec<String>,
    /// User-selectable options; the active valve picks one.
    valves: Vec<Vec<String>>,
    default_valve_index: usize,
}

impl DumpSpec {
    /// Parse the `dump` and `dump_valve` configuration strings.
    pub fn parse(dump: &str, dump_valve: &str) -> DumpSpec {
        let dump = dump.trim();
        let (dump_all, listed) = match dump.to_ascii_lowercase().as_str() {
            "" | "false" => (false, Vec::new()),
            "true" => (true, Vec::new()),
            _ => (false, split_list(dump, ',')),
        };

        let valve_spec = dump_valve.trim();
        let valves: Vec<Vec<String>> = match valve_spec.to_ascii_lowercase().as_str() {
            "" | "false" => Vec::new(),
            _ => split_list(valve_spec, ',')
                .iter()
                .map(|option| split_list(option, '&'))
                .filter(|option| !option.is_empty())
                .collect(),
        };

        let default_valve_index = valves
            .iter()
            .position(|option| {
                !listed.is_empty() && option.iter().all(|r| listed.contains(r))
            })
            .unwrap_or(0);

        // A dump-listed resource that is valve-selectable only seeds the
        // default selection; it must still follow a vessel's override.
        let always: Vec<String> = listed
            .into_iter()
            .filter(|r| !valves.iter().flatten().any(|v| v == r))
            .collect();

        DumpSpec {
            dump_all,
            always,
            valves,
            default_valve_index,
        }
    }

    /// The valve a vessel starts with when it has no override.
    pub fn default_valve(&self) -> ActiveValve {
        ActiveValve {
            index: self.default_valve_index,
        }
    }

    /// Number of user-selectable options.
    pub fn valve_count(&self) -> usize {
        self.valves.len()
    }

    /// Whether excess of `resource` should be vented under `valve`.
    pub fn check(&self, valve: ActiveValve, resource: &str) -> bool {
        if self.dump_all {
            return true;
        }
        if self.always.iter().any(|r| r == resource) {
            return true;
        }
        if self.valves.is_empty() {
            return false;
        }
        self.valves[valve.index % self.valves.len()]
            .iter()
            .any(|r| r == resource)
    }
}

fn split_list(spec: &str, separator: char) -> Vec<String> {
    spec.split(separator)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
