//! Snapshot building: turns engine state into a `GameStateSnapshot`.
//!
//! Read-only with respect to game state; it only consumes the drained event
//! and alert buffers it is handed.

use sismotower_core::catalog::Catalog;
use sismotower_core::enums::*;
use sismotower_core::events::{Alert, SimEvent};
use sismotower_core::state::*;
use sismotower_core::types::HealthState;

use crate::building::Building;
use crate::health;
use crate::run::SimulationRun;

/// Borrowed engine state needed for one snapshot.
pub struct SnapshotSource<'a> {
    pub elapsed_ms: u64,
    pub phase: Phase,
    pub active_disaster: Option<DisasterKind>,
    pub run: Option<&'a SimulationRun>,
    pub resolved_waves: u8,
    pub catalog: &'a Catalog,
    pub building: &'a Building,
    pub health: &'a HealthState,
    pub repair_spend: f64,
    pub collapsed: bool,
    pub outcome: Option<Outcome>,
    pub result_message: Option<String>,
    pub pending_ms: Option<u64>,
    pub score_saved: bool,
    pub scores: &'a [ScoreRecord],
    pub events: Vec<SimEvent>,
    pub alerts: Vec<Alert>,
}

pub fn build_snapshot(source: SnapshotSource<'_>) -> GameStateSnapshot {
    let aggregate_health = source.health.aggregate();
    let layout = source.building.layout();
    let floor_area = source.building.floor_area();
    let build = source.building.cost();

    GameStateSnapshot {
        elapsed_ms: source.elapsed_ms,
        phase: source.phase,
        active_disaster: source.active_disaster,
        waves: build_waves(source.catalog, source.run, source.resolved_waves),
        layout: layout.clone(),
        health: source.health.clone(),
        aggregate_health,
        health_band: HealthBand::from_health(aggregate_health),
        floor_area,
        cost: CostView {
            build,
            repair: source.repair_spend,
            total: build + source.repair_spend,
        },
        collapsed: source.collapsed,
        outcome: source.outcome,
        result_message: source.result_message,
        clipboard: source.building.clipboard().cloned(),
        damaged_groups: health::damaged_groups(source.catalog, layout, source.health, floor_area),
        pending_ms: source.pending_ms,
        score_saved: source.score_saved,
        scores: source.scores.to_vec(),
        events: source.events,
        alerts: source.alerts,
    }
}

fn build_waves(catalog: &Catalog, run: Option<&SimulationRun>, resolved: u8) -> Vec<WaveView> {
    let Some(run) = run else {
        return Vec::new();
    };
    run.waves()
        .iter()
        .zip(1u8..)
        .map(|(wave, number)| WaveView {
            wave: number,
            disaster: wave.disaster,
            label: catalog.disaster(wave.disaster).label.clone(),
            intensity: wave.intensity,
            resolved: number <= resolved,
        })
        .collect()
}
