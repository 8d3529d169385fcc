//! Vessel resource-flow simulation engine.
//!
//! Declaratively configured converters ("processes") consume and produce
//! abstract resources at per-second rates, scaled each step by an ordered
//! list of environment-driven modifiers. The same engine runs a live,
//! loaded vessel and a design-time planner vehicle: both contexts feed the
//! one modifier evaluator through the [`environment::EnvReading`] trait, so
//! their semantics cannot drift apart.
//!
//! This crate holds pure simulation logic: no database, no engine, no
//! rendering. The host owns vessel environment computation and the real
//! resource ledger; both are reached through narrow seams
//! ([`environment::EnvReading`], [`recipe::ResourcePool`]).
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Raw configuration records consumed by the typed parsers |
//! | [`dump`] | Dump/vent policy: which excess outputs go overboard |
//! | [`environment`] | Capability trait plus live and planner state sources |
//! | [`modifier`] | Modifier token language and its single evaluator |
//! | [`process`] | Converter definitions: parse, validate, execute |
//! | [`profile`] | Profile loading, dedup, overlays, per-step driving |
//! | [`recipe`] | Per-step recipes and the resource-pool seam |
//! | [`resources`] | Resource catalog and broker registry |
//! | [`rule`] | Per-crew rules with shortage degeneration |
//! | [`supply`] | Supply watches: level classification and warnings |
//! | [`vessel`] | Per-vessel mutable state (valves, conditions, levels) |

pub mod config;
pub mod dump;
pub mod environment;
pub mod modifier;
pub mod process;
pub mod profile;
pub mod recipe;
pub mod resources;
pub mod rule;
pub mod supply;
pub mod vessel;
