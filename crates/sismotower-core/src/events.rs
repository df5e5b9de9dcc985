//! Events emitted by the simulation for audio, animation, and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Discrete simulation events, drained into each snapshot.
///
/// Consumers (sound, animation) react to these; the engine never depends on
/// how they are presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A material slot changed (single change or paste).
    MaterialChanged { cost_delta: f64 },
    /// A run was drawn and the first wave entered.
    SimulationStarted { disasters: Vec<DisasterKind> },
    /// A wave phase was entered; damage lands after the resolution delay.
    WaveStarted {
        wave: u8,
        disaster: DisasterKind,
        intensity: f64,
    },
    /// A wave's damage was committed.
    WaveResolved {
        wave: u8,
        disaster: DisasterKind,
        total_damage: f64,
        aggregate_health: f64,
    },
    /// Aggregate health fell below the collapse threshold.
    StructureCollapsed { aggregate_health: f64 },
    /// A slot was restored to full health.
    SlotRepaired {
        component: ComponentKind,
        floor: usize,
        cost: f64,
    },
    /// The results phase was entered.
    ResultsReady {
        outcome: Outcome,
        aggregate_health: f64,
    },
    /// A score record was saved.
    ScoreSaved { player_name: String },
    /// The engine returned to its initial state.
    Reset,
}

/// Alert for the UI alert queue (user-facing errors).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub elapsed_ms: u64,
}
