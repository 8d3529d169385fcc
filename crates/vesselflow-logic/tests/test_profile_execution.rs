//! Integration tests for the full profile pipeline.
//!
//! Exercises: JSON configuration → ProfileConfig → Profile::parse
//! → Profile::execute against both the live and the planner state source.
//!
//! All tests are pure logic — no host game, no rendering.

use vesselflow_logic::config::ProfileConfig;
use vesselflow_logic::dump::ActiveValve;
use vesselflow_logic::environment::{PlannerSnapshot, VesselSnapshot};
use vesselflow_logic::modifier;
use vesselflow_logic::profile::Profile;
use vesselflow_logic::recipe::{ResourcePool, StockPool};
use vesselflow_logic::resources::{BrokerRegistry, ResourceCatalog};
use vesselflow_logic::vessel::VesselState;

// ── Helpers ────────────────────────────────────────────────────────────

const PROFILE_JSON: &str = r#"
[
  {
    "name": "default",
    "supplies": [
      { "resource": "water", "full_amount": 100.0, "low_threshold": 0.2,
        "low_message": "water low", "empty_message": "water depleted" }
    ],
    "rules": [
      { "name": "breathing", "input": "oxygen", "output": "co2",
        "rate": 0.001, "degeneration": 0.005 }
    ],
    "processes": [
      { "name": "electrolyzer",
        "input": ["water@2.0"],
        "output": ["oxygen@1.0", "hydrogen@1.0"],
        "dump_valve": "oxygen,hydrogen" },
      { "name": "scrubber",
        "title": "CO2 Scrubber",
        "modifier": "per_capita,co2",
        "input": ["co2@0.5"],
        "output": ["oxygen@0.25"] }
    ]
  },
  {
    "name": "reef_pack",
    "support": true,
    "processes": [
      { "name": "electrolyzer",
        "input": ["water@99.0"],
        "output": ["oxygen@99.0"] },
      { "name": "sabatier",
        "input": ["co2@1.0", "hydrogen@4.0"],
        "output": ["water@0.5"] }
    ]
  }
]
"#;

fn catalog() -> ResourceCatalog {
    ResourceCatalog::from_names(["water", "oxygen", "hydrogen", "co2"])
}

fn load_profile(selected: &str) -> Profile {
    let configs: Vec<ProfileConfig> = serde_json::from_str(PROFILE_JSON).unwrap();
    let mut brokers = BrokerRegistry::new();
    Profile::parse(selected, &configs, &catalog(), &mut brokers)
}

fn stocked_pool() -> StockPool {
    let mut pool = StockPool::new();
    pool.set_amount("water", 1000.0);
    pool.set_amount("oxygen", 50.0);
    pool.set_amount("co2", 10.0);
    pool
}

// ── Loading ────────────────────────────────────────────────────────────

#[test]
fn profile_loads_base_and_support() {
    let profile = load_profile("default");
    assert_eq!(profile.supplies.len(), 1);
    assert_eq!(profile.rules.len(), 1);
    // electrolyzer + scrubber from base, sabatier from the support overlay;
    // the overlay's electrolyzer collides and is dropped.
    assert_eq!(profile.processes.len(), 3);
    let electrolyzer = profile.find_process("electrolyzer").unwrap();
    assert_eq!(electrolyzer.inputs[0].1, 2.0, "base definition wins");
}

#[test]
fn missing_profile_runs_empty() {
    let profile = load_profile("no_such_profile");
    assert!(profile.processes.is_empty());
    assert!(profile.rules.is_empty());
    assert!(profile.supplies.is_empty());

    // Executing an empty profile is a harmless no-op.
    let mut vessel = VesselState::new();
    let env = VesselSnapshot::default();
    let mut pool = stocked_pool();
    profile.execute(&mut vessel, &env, &mut pool, 60.0);
    assert_eq!(pool.amount("water"), 1000.0);
}

#[test]
fn modifier_order_survives_load() {
    let profile = load_profile("default");
    let scrubber = profile.find_process("scrubber").unwrap();
    let tokens: Vec<&str> = scrubber.modifiers.iter().map(|m| m.token()).collect();
    assert_eq!(tokens, vec!["per_capita", "co2"]);
}

// ── Execution ──────────────────────────────────────────────────────────

#[test]
fn one_step_moves_exact_quantities() {
    let profile = load_profile("default");
    let mut vessel = VesselState::new();
    let mut env = VesselSnapshot {
        crew: 0,
        ..VesselSnapshot::default()
    };
    let mut pool = stocked_pool();
    env.capture_resources(&pool, &catalog());

    profile.execute(&mut vessel, &env, &mut pool, 10.0);

    // No crew, so the breathing rule skips. In load order:
    // electrolyzer: water -20, oxygen +10 vented (default valve), hydrogen +10
    // scrubber: k = per_capita(1) * co2(10); co2 -50 clamps to 0, oxygen +25
    // sabatier: co2 -10 (already 0), hydrogen -40 clamps to 0, water +5
    assert!((pool.amount("water") - 985.0).abs() < 1e-9);
    assert!((pool.amount("oxygen") - 75.0).abs() < 1e-9);
    assert_eq!(pool.amount("hydrogen"), 0.0);
    assert_eq!(pool.amount("co2"), 0.0);
}

#[test]
fn execution_is_deterministic() {
    let profile = load_profile("default");
    let env = VesselSnapshot {
        crew: 3,
        ..VesselSnapshot::default()
    };

    let run = || {
        let mut vessel = VesselState::new();
        let mut pool = stocked_pool();
        for _ in 0..5 {
            let mut env = env.clone();
            env.capture_resources(&pool, &catalog());
            profile.execute(&mut vessel, &env, &mut pool, 30.0);
        }
        (
            pool.amount("water"),
            pool.amount("oxygen"),
            pool.amount("co2"),
            pool.amount("hydrogen"),
        )
    };

    assert_eq!(run(), run());
}

#[test]
fn vessel_valve_override_routes_dump() {
    let profile = load_profile("default");
    let electrolyzer = profile.find_process("electrolyzer").unwrap();
    assert_eq!(electrolyzer.dump.valve_count(), 2);

    let env = VesselSnapshot::default();

    // Default valve: option 0 (oxygen) dumps, hydrogen is stored.
    let mut vessel = VesselState::new();
    let mut pool = StockPool::new();
    pool.set_amount("water", 100.0);
    electrolyzer.execute(&vessel, &env, &mut pool, 10.0);
    assert_eq!(pool.amount("oxygen"), 0.0);
    assert!((pool.amount("hydrogen") - 10.0).abs() < 1e-9);

    // Override: dump hydrogen instead, for every subsequent execution.
    vessel.set_valve("electrolyzer", ActiveValve { index: 1 });
    let mut pool = StockPool::new();
    pool.set_amount("water", 100.0);
    electrolyzer.execute(&vessel, &env, &mut pool, 10.0);
    electrolyzer.execute(&vessel, &env, &mut pool, 10.0);
    assert!((pool.amount("oxygen") - 20.0).abs() < 1e-9);
    assert_eq!(pool.amount("hydrogen"), 0.0);
}

#[test]
fn degeneration_builds_during_oxygen_outage() {
    let profile = load_profile("default");
    let mut vessel = VesselState::new();
    let env = VesselSnapshot {
        crew: 4,
        ..VesselSnapshot::default()
    };

    let mut pool = StockPool::new(); // nothing stocked: oxygen outage
    profile.execute(&mut vessel, &env, &mut pool, 100.0);
    let built = vessel.condition("breathing");
    assert!(built > 0.0, "outage must build the breathing condition");

    pool.set_amount("oxygen", 1000.0);
    profile.execute(&mut vessel, &env, &mut pool, 50.0);
    assert!(
        vessel.condition("breathing") < built,
        "restored supply must decay the condition"
    );
}

// ── Cross-context consistency ──────────────────────────────────────────

#[test]
fn live_and_planner_preview_agree() {
    let profile = load_profile("default");
    let modifiers = &profile.find_process("scrubber").unwrap().modifiers;

    let mut live = VesselSnapshot {
        crew: 3,
        ..VesselSnapshot::default()
    };
    live.resources.insert("co2".to_string(), 6.0);

    let mut planner = PlannerSnapshot {
        crew: 3,
        ..PlannerSnapshot::default()
    };
    planner.resources.insert("co2".to_string(), 6.0);

    let k_live = modifier::evaluate(&live, modifiers);
    let k_planner = modifier::evaluate(&planner, modifiers);
    assert!((k_live - k_planner).abs() < 1e-12);
    assert!((k_live - 2.0).abs() < 1e-12, "6.0 co2 across 3 crew");
}
