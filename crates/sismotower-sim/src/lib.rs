//! Simulation engine for Sismotower.
//!
//! Holds the building and health models, the damage engine, run drawing,
//! the phase state machine, and scoring. Deterministic under a seed and free
//! of any UI or timer runtime.

pub mod building;
pub mod damage;
pub mod engine;
pub mod health;
pub mod persistence;
pub mod run;
pub mod scoring;
pub mod snapshot;

pub use engine::{SimConfig, SimulationEngine};
pub use sismotower_core as core;
