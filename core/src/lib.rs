//! lifepath-core: the simulation engine for a turn-based life sim.
//!
//! A `LifeSession` owns one subject and drives it year by year through
//! story nodes, optional activities, and the per-year `YearEngine`.
//! All randomness flows through a single injected `LifeRng`.

pub mod attributes;
pub mod command;
pub mod config;
pub mod content;
pub mod effect;
pub mod engine;
pub mod error;
pub mod event;
pub mod family;
pub mod family_generator;
pub mod rng;
pub mod selection;
pub mod session;
pub mod snapshot;
pub mod subject;
pub mod subsystem;
pub mod types;

// ── Year steps (registered in engine.rs) ──────────────────────────────────
pub mod career_subsystem;
pub mod drift_subsystem;
pub mod economy_subsystem;
pub mod household_subsystem;
pub mod milestone_subsystem;
pub mod mortality_subsystem;
pub mod random_event_subsystem;
pub mod relationship_subsystem;
