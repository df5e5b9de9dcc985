//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Construction (idle only) ---
    /// Replace the material of one slot.
    ChangeMaterial {
        component: ComponentKind,
        tier: MaterialTier,
        floor: usize,
    },
    /// Change the floor area; the value is clamped into the allowed range.
    ChangeFloorArea { area: f64 },
    /// Copy the per-floor component tiers of a level into the clipboard.
    CopyFloor { level: Level },
    /// Apply the clipboard to a level.
    PasteFloor { level: Level },

    // --- Simulation ---
    /// Draw a run and enter the first wave.
    StartSimulation,
    /// Leave a repair phase for the next wave.
    NextWave,
    /// Restore one damaged slot to full health.
    RepairSlot {
        component: ComponentKind,
        floor: usize,
    },
    /// Record the finished run under a player name.
    SaveScore { player_name: String },
    /// Return to the initial idle state.
    Reset,
}
