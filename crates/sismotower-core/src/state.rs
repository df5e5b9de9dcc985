//! Game state snapshot, the complete visible state handed to the frontend after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, SimEvent};
use crate::types::{BuildingLayout, FloorClipboard, HealthState};

/// Complete game state produced by the engine after each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    /// Milliseconds of simulated time since the engine was created.
    pub elapsed_ms: u64,
    pub phase: Phase,
    /// Disaster of the current (or last shown) wave.
    pub active_disaster: Option<DisasterKind>,
    /// The drawn run; empty while idle.
    pub waves: Vec<WaveView>,
    pub layout: BuildingLayout,
    pub health: HealthState,
    pub aggregate_health: f64,
    pub health_band: HealthBand,
    pub floor_area: f64,
    pub cost: CostView,
    pub collapsed: bool,
    pub outcome: Option<Outcome>,
    pub result_message: Option<String>,
    pub clipboard: Option<FloorClipboard>,
    /// Damaged slots grouped by component, for the repair screen.
    pub damaged_groups: Vec<DamagedGroup>,
    /// Remaining time on the pending one-shot timer, if any.
    pub pending_ms: Option<u64>,
    pub score_saved: bool,
    /// Saved scores, newest first.
    pub scores: Vec<ScoreRecord>,
    pub events: Vec<SimEvent>,
    pub alerts: Vec<Alert>,
}

/// One wave of the drawn run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveView {
    pub wave: u8,
    pub disaster: DisasterKind,
    pub label: String,
    pub intensity: f64,
    /// Whether this wave's damage has been committed.
    pub resolved: bool,
}

/// Running cost totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostView {
    /// Construction cost of the current layout at the current floor area.
    pub build: f64,
    /// Accumulated repair spend of the current run.
    pub repair: f64,
    /// `build + repair`.
    pub total: f64,
}

/// Damaged slots of one component, weakest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamagedGroup {
    pub component: ComponentKind,
    pub label: String,
    pub items: Vec<DamagedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamagedItem {
    pub component: ComponentKind,
    pub floor: usize,
    pub health: f64,
    pub repair_cost: f64,
    pub level_label: String,
}

/// A saved score. Field names match the persisted layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub player_name: String,
    /// Aggregate health at the end of the run.
    pub integrity: f64,
    pub cost: f64,
    pub disasters: Vec<DisasterKind>,
    /// Epoch milliseconds.
    pub timestamp: u64,
}
