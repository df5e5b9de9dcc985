//! Core types and definitions for the Sismotower simulation.
//!
//! This crate defines the vocabulary shared by the engine and any frontend:
//! component and disaster enums, the material catalog, rules configuration,
//! commands, events, state snapshots, and errors.
//! It has no dependency on randomness, timers, or any runtime framework.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
