//! Vesselflow Headless Simulation Harness
//!
//! Validates profile data and flow logic without a host game.
//! Runs entirely in-process — no rendering, no networking.
//!
//! Usage:
//!   cargo run -p vesselflow-simtest
//!   cargo run -p vesselflow-simtest -- --verbose

use vesselflow_logic::config::ProfileConfig;
use vesselflow_logic::dump::ActiveValve;
use vesselflow_logic::environment::{PlannerSnapshot, VesselSnapshot};
use vesselflow_logic::modifier::{self, parse_modifier_list};
use vesselflow_logic::profile::Profile;
use vesselflow_logic::recipe::{ResourcePool, StockPool};
use vesselflow_logic::resources::{BrokerRegistry, ResourceCatalog};
use vesselflow_logic::supply::SupplyLevel;
use vesselflow_logic::vessel::VesselState;

// ── Profile data (same JSON a host would ship) ──────────────────────────
const PROFILE_JSON: &str = include_str!("../../../data/default_profile.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Vesselflow Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Profile loading and dedup
    results.extend(validate_profile_load(verbose));

    // 2. Live vs planner modifier consistency
    results.extend(validate_modifier_consistency(verbose));

    // 3. Process execution math
    results.extend(validate_process_execution(verbose));

    // 4. Dump valve routing
    results.extend(validate_dump_routing(verbose));

    // 5. Rule degeneration loop
    results.extend(validate_rule_degeneration(verbose));

    // 6. Supply warning levels
    results.extend(validate_supply_levels(verbose));

    // 7. Long multi-step run
    results.extend(validate_long_run(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Shared fixtures ─────────────────────────────────────────────────────

fn catalog() -> ResourceCatalog {
    ResourceCatalog::from_names([
        "oxygen",
        "water",
        "food",
        "co2",
        "hydrogen",
        "waste",
        "waste_water",
        "scrubber_capacity",
        "recycler_capacity",
    ])
}

fn load_default_profile() -> Profile {
    let configs: Vec<ProfileConfig> =
        serde_json::from_str(PROFILE_JSON).expect("profile JSON must parse");
    let mut brokers = BrokerRegistry::new();
    Profile::parse("default", &configs, &catalog(), &mut brokers)
}

/// A vessel with three crew, all converter capacity installed, and stocked
/// reserves matching the supply watches' full amounts.
fn stocked_pool() -> StockPool {
    let mut pool = StockPool::new();
    pool.set_amount("oxygen", 500.0);
    pool.set_amount("water", 300.0);
    pool.set_amount("food", 400.0);
    pool.set_amount("co2", 5.0);
    pool.set_amount("scrubber_capacity", 1.0);
    pool.set_amount("recycler_capacity", 1.0);
    pool
}

fn crewed_snapshot(pool: &StockPool) -> VesselSnapshot {
    let mut snap = VesselSnapshot {
        crew: 3,
        ..VesselSnapshot::default()
    };
    snap.capture_resources(pool, &catalog());
    snap
}

// ── 1. Profile loading ──────────────────────────────────────────────────

fn validate_profile_load(verbose: bool) -> Vec<TestResult> {
    println!("--- Profile Loading ---");
    let mut results = Vec::new();

    let configs: Vec<ProfileConfig> = match serde_json::from_str(PROFILE_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "profile_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let mut brokers = BrokerRegistry::new();
    let profile = Profile::parse("default", &configs, &catalog(), &mut brokers);

    results.push(TestResult {
        name: "profile_counts".into(),
        passed: profile.supplies.len() == 3 && profile.rules.len() == 3
            && profile.processes.len() == 5,
        detail: format!(
            "{} supplies, {} rules, {} processes",
            profile.supplies.len(),
            profile.rules.len(),
            profile.processes.len()
        ),
    });

    // The support pack's scrubber collides with the base one and must lose.
    let scrubber = profile.find_process("scrubber");
    let base_scrubber_kept = scrubber
        .map(|p| (p.inputs[0].1 - 0.002).abs() < 1e-12 && p.title == "CO2 Scrubber")
        .unwrap_or(false);
    results.push(TestResult {
        name: "dedup_base_wins".into(),
        passed: base_scrubber_kept,
        detail: "base scrubber definition survives the support overlay".into(),
    });

    // The support pack's novel process is appended after base entries.
    let greenhouse_last = profile
        .processes
        .last()
        .map(|p| p.name == "greenhouse")
        .unwrap_or(false);
    results.push(TestResult {
        name: "support_appended".into(),
        passed: greenhouse_last,
        detail: "support-pack greenhouse loads after base processes".into(),
    });

    // Modifier order round-trips through parsing.
    let recycler_tokens: Vec<&str> = profile
        .find_process("water_recycler")
        .map(|p| p.modifiers.iter().map(|m| m.token()).collect())
        .unwrap_or_default();
    results.push(TestResult {
        name: "modifier_round_trip".into(),
        passed: recycler_tokens == vec!["recycler_capacity"],
        detail: format!("tokens: {:?}", recycler_tokens),
    });

    // A profile name with no configuration yields an empty profile.
    let mut brokers = BrokerRegistry::new();
    let missing = Profile::parse("nonexistent", &configs, &catalog(), &mut brokers);
    results.push(TestResult {
        name: "missing_profile_empty".into(),
        passed: missing.processes.is_empty() && missing.rules.is_empty(),
        detail: "unknown profile name degrades to an empty profile".into(),
    });

    if verbose {
        for p in &profile.processes {
            println!(
                "    process '{}': {} in, {} out, {} valve options",
                p.name,
                p.inputs.len(),
                p.outputs.len(),
                p.dump.valve_count()
            );
        }
    }

    results
}

// ── 2. Modifier consistency ─────────────────────────────────────────────

fn validate_modifier_consistency(verbose: bool) -> Vec<TestResult> {
    println!("--- Modifier Consistency ---");
    let mut results = Vec::new();

    // Every token both state sources share, across a few environments.
    let shared = parse_modifier_list(
        "zerog,landed,breathable,non_breathable,temperature,shielding,volume,\
         surface,living_space,comfort,pressure,per_capita",
    );

    let scenarios: [(bool, bool, bool, f64, u32); 4] = [
        (true, false, false, 0.0, 1),
        (false, true, true, 5.0, 3),
        (false, false, false, 40.0, 6),
        (true, false, true, 12.5, 2),
    ];

    let mut worst: f64 = 0.0;
    for (weightless, landed, breathable, temp, crew) in scenarios {
        let live = VesselSnapshot {
            weightless,
            landed,
            breathable,
            temperature_delta: temp,
            shielding: 0.4,
            volume: 35.0,
            surface: 50.0,
            living_space: 1.2,
            comfort: 0.9,
            crew,
            ..VesselSnapshot::default()
        };
        let planner = PlannerSnapshot {
            weightless,
            landed,
            breathable,
            temperature_delta: temp,
            shielding: 0.4,
            volume: 35.0,
            surface: 50.0,
            living_space: 1.2,
            comfort: 0.9,
            crew,
            ..PlannerSnapshot::default()
        };
        let k_live = modifier::evaluate(&live, &shared);
        let k_planner = modifier::evaluate(&planner, &shared);
        worst = worst.max((k_live - k_planner).abs());
        if verbose {
            println!("    scenario crew={} temp={}: live={:e} planner={:e}", crew, temp, k_live, k_planner);
        }
    }
    results.push(TestResult {
        name: "cross_context_agreement".into(),
        passed: worst < 1e-12,
        detail: format!("largest live/planner divergence: {:e}", worst),
    });

    // Identity on the empty list.
    let empty_k = modifier::evaluate(&VesselSnapshot::default(), &[]);
    results.push(TestResult {
        name: "empty_list_identity".into(),
        passed: empty_k == 1.0,
        detail: format!("k = {}", empty_k),
    });

    // Depleted fallback resource forces k to exactly zero.
    let snap = VesselSnapshot::default();
    let k = modifier::evaluate(&snap, &parse_modifier_list("missing_catalyst,volume"));
    results.push(TestResult {
        name: "depleted_fallback_zeroes".into(),
        passed: k == 0.0,
        detail: format!("k = {}", k),
    });

    results
}

// ── 3. Process execution math ───────────────────────────────────────────

fn validate_process_execution(_verbose: bool) -> Vec<TestResult> {
    println!("--- Process Execution ---");
    let mut results = Vec::new();
    let profile = load_default_profile();

    // Exact scaling: recycler at capacity 1.0 for 100 s.
    let recycler = profile.find_process("water_recycler").unwrap();
    let mut pool = StockPool::new();
    pool.set_amount("waste_water", 10.0);
    pool.set_amount("recycler_capacity", 1.0);
    let env = crewed_snapshot(&pool);
    let vessel = VesselState::new();
    recycler.execute(&vessel, &env, &mut pool, 100.0);

    let water_ok = (pool.amount("water") - 0.09).abs() < 1e-9;
    let ww_ok = (pool.amount("waste_water") - 9.9).abs() < 1e-9;
    let waste_ok = pool.amount("waste") == 0.0; // always-dumped byproduct
    results.push(TestResult {
        name: "exact_rate_scaling".into(),
        passed: water_ok && ww_ok && waste_ok,
        detail: format!(
            "water={:.4} waste_water={:.4} waste={:.4}",
            pool.amount("water"),
            pool.amount("waste_water"),
            pool.amount("waste")
        ),
    });

    // Capacity zero disables the converter entirely.
    let mut pool = StockPool::new();
    pool.set_amount("waste_water", 10.0);
    let env = crewed_snapshot(&pool);
    recycler.execute(&vessel, &env, &mut pool, 100.0);
    results.push(TestResult {
        name: "zero_capacity_skips".into(),
        passed: pool.amount("waste_water") == 10.0 && pool.amount("water") == 0.0,
        detail: "no recipe when the capacity modifier is zero".into(),
    });

    results
}

// ── 4. Dump valve routing ───────────────────────────────────────────────

fn validate_dump_routing(_verbose: bool) -> Vec<TestResult> {
    println!("--- Dump Valves ---");
    let mut results = Vec::new();
    let profile = load_default_profile();
    let electrolyzer = profile.find_process("electrolyzer").unwrap();

    // `dump = hydrogen` selects the hydrogen option as the default valve.
    let default_dumps_hydrogen = electrolyzer
        .dump
        .check(electrolyzer.default_valve(), "hydrogen");
    let default_keeps_oxygen = !electrolyzer
        .dump
        .check(electrolyzer.default_valve(), "oxygen");
    results.push(TestResult {
        name: "default_valve_from_dump_list".into(),
        passed: default_dumps_hydrogen && default_keeps_oxygen,
        detail: format!(
            "default valve index {}",
            electrolyzer.default_valve().index
        ),
    });

    // A vessel override redirects the vent for every execution.
    let mut vessel = VesselState::new();
    vessel.set_valve("electrolyzer", ActiveValve { index: 0 });
    let mut pool = StockPool::new();
    pool.set_amount("water", 100.0);
    let env = crewed_snapshot(&pool);
    electrolyzer.execute(&vessel, &env, &mut pool, 1000.0);

    let oxygen_vented = pool.amount("oxygen") == 0.0;
    let hydrogen_kept = (pool.amount("hydrogen") - 0.1).abs() < 1e-9;
    results.push(TestResult {
        name: "override_redirects_vent".into(),
        passed: oxygen_vented && hydrogen_kept,
        detail: format!(
            "oxygen={:.4} hydrogen={:.4}",
            pool.amount("oxygen"),
            pool.amount("hydrogen")
        ),
    });

    results
}

// ── 5. Rule degeneration ────────────────────────────────────────────────

fn validate_rule_degeneration(_verbose: bool) -> Vec<TestResult> {
    println!("--- Rule Degeneration ---");
    let mut results = Vec::new();
    let profile = load_default_profile();

    let mut vessel = VesselState::new();
    let mut pool = stocked_pool();
    pool.set_amount("oxygen", 0.0);

    // One starved hour: the breathing condition builds.
    let env = crewed_snapshot(&pool);
    profile.execute(&mut vessel, &env, &mut pool, 3600.0);
    let starved = vessel.condition("breathing");

    // Resupply and run another hour: it decays.
    pool.set_amount("oxygen", 500.0);
    let env = crewed_snapshot(&pool);
    profile.execute(&mut vessel, &env, &mut pool, 3600.0);
    let recovered = vessel.condition("breathing");

    results.push(TestResult {
        name: "degeneration_builds_and_decays".into(),
        passed: starved > 0.0 && recovered < starved,
        detail: format!("starved={:.4} recovered={:.4}", starved, recovered),
    });

    results
}

// ── 6. Supply levels ────────────────────────────────────────────────────

fn validate_supply_levels(_verbose: bool) -> Vec<TestResult> {
    println!("--- Supply Levels ---");
    let mut results = Vec::new();
    let profile = load_default_profile();

    let mut vessel = VesselState::new();
    let mut pool = stocked_pool();
    let env = crewed_snapshot(&pool);
    profile.execute(&mut vessel, &env, &mut pool, 1.0);
    let normal = vessel.supply_level("oxygen") == Some(SupplyLevel::Normal);

    pool.set_amount("oxygen", 10.0);
    let env = crewed_snapshot(&pool);
    profile.execute(&mut vessel, &env, &mut pool, 1.0);
    let low = vessel.supply_level("oxygen") == Some(SupplyLevel::Low);

    pool.set_amount("oxygen", 0.0);
    let env = crewed_snapshot(&pool);
    profile.execute(&mut vessel, &env, &mut pool, 1.0);
    let empty = vessel.supply_level("oxygen") == Some(SupplyLevel::Empty);

    results.push(TestResult {
        name: "supply_level_transitions".into(),
        passed: normal && low && empty,
        detail: format!("normal={} low={} empty={}", normal, low, empty),
    });

    results
}

// ── 7. Long run ─────────────────────────────────────────────────────────

fn validate_long_run(verbose: bool) -> Vec<TestResult> {
    println!("--- Long Run ---");
    let mut results = Vec::new();
    let profile = load_default_profile();

    let mut vessel = VesselState::new();
    let mut pool = stocked_pool();

    // A week of one-minute steps for a three-person crew.
    let steps = 7 * 24 * 60;
    for _ in 0..steps {
        let env = crewed_snapshot(&pool);
        profile.execute(&mut vessel, &env, &mut pool, 60.0);
    }

    let all_finite = pool.amounts().all(|(_, v)| v.is_finite());
    let none_negative = pool.amounts().all(|(_, v)| v >= 0.0);
    results.push(TestResult {
        name: "long_run_stability".into(),
        passed: all_finite && none_negative,
        detail: format!("{} steps, finite={} non_negative={}", steps, all_finite, none_negative),
    });

    // The crew breathes oxygen down; the watch must have noticed something.
    let watched = vessel.supply_level("oxygen").is_some()
        && vessel.supply_level("water").is_some()
        && vessel.supply_level("food").is_some();
    results.push(TestResult {
        name: "long_run_watches_recorded".into(),
        passed: watched,
        detail: "all supply watches recorded a level".into(),
    });

    if verbose {
        let mut amounts: Vec<(String, f64)> = pool
            .amounts()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        amounts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (name, amount) in amounts {
            println!("    {:>18}: {:.3}", name, amount);
        }
    }

    results
}
