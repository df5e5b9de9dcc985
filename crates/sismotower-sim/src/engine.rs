//! Simulation engine: the phase state machine of the game.
//!
//! `SimulationEngine` owns the building, the health state, the drawn run and
//! the score board. It processes player commands, drives the damage engine
//! when a wave's resolution timer fires, and produces `GameStateSnapshot`s.
//! Completely headless: time only advances through `tick`.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sismotower_core::catalog::Catalog;
use sismotower_core::commands::PlayerCommand;
use sismotower_core::config::GameRules;
use sismotower_core::constants::MAX_HEALTH;
use sismotower_core::enums::*;
use sismotower_core::error::SimError;
use sismotower_core::events::{Alert, SimEvent};
use sismotower_core::state::{GameStateSnapshot, ScoreRecord};
use sismotower_core::types::HealthState;

use crate::building::Building;
use crate::damage;
use crate::health;
use crate::persistence::{self, MemoryStore, ScoreStore};
use crate::run::SimulationRun;
use crate::scoring::{self, ScoreBoard, ScoreCandidate, WaveTransition};
use crate::snapshot::{self, SnapshotSource};

/// Configuration for a new engine.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same disaster runs.
    pub seed: u64,
    pub rules: GameRules,
    pub catalog: Catalog,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rules: GameRules::default(),
            catalog: Catalog::builtin(),
        }
    }
}

/// The single deferred action the engine can wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    /// Commit the damage of wave N.
    ResolveWave(u8),
    /// Leave a collapsed wave for the results phase.
    ShowCollapseResults,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    remaining_ms: u64,
    action: PendingAction,
}

/// The simulation engine. Owns all game state.
pub struct SimulationEngine {
    rules: GameRules,
    catalog: Catalog,
    rng: ChaCha8Rng,
    elapsed_ms: u64,
    phase: Phase,
    building: Building,
    health: HealthState,
    repair_spend: f64,
    run: Option<SimulationRun>,
    resolved_waves: u8,
    active_disaster: Option<DisasterKind>,
    collapsed: bool,
    outcome: Option<Outcome>,
    result_message: Option<String>,
    candidate: Option<ScoreCandidate>,
    score_saved: bool,
    pending: Option<PendingTimer>,
    scores: ScoreBoard,
    store: Box<dyn ScoreStore>,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<SimEvent>,
    alerts: Vec<Alert>,
}

impl SimulationEngine {
    /// Create an engine with a session-only score store.
    pub fn new(config: SimConfig) -> Self {
        Self::with_store(config, Box::new(MemoryStore::default()))
    }

    /// Create an engine backed by the given score store. Stored scores are
    /// loaded once; an unreadable store starts empty.
    pub fn with_store(config: SimConfig, store: Box<dyn ScoreStore>) -> Self {
        let SimConfig {
            seed,
            rules,
            catalog,
        } = config;
        let building = Building::new(&catalog, rules.floors, rules.default_floor_area);
        let scores = ScoreBoard::from_records(persistence::load_or_empty(store.as_ref()));
        Self {
            health: HealthState::full(rules.floors),
            rng: ChaCha8Rng::seed_from_u64(seed),
            elapsed_ms: 0,
            phase: Phase::default(),
            building,
            repair_spend: 0.0,
            run: None,
            resolved_waves: 0,
            active_disaster: None,
            collapsed: false,
            outcome: None,
            result_message: None,
            candidate: None,
            score_saved: false,
            pending: None,
            scores,
            store,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            alerts: Vec::new(),
            rules,
            catalog,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Process queued commands, advance the pending timer by `elapsed_ms`,
    /// and return the resulting snapshot. Chained timers fire within the same
    /// tick when the elapsed time covers them.
    pub fn tick(&mut self, elapsed_ms: u64) -> GameStateSnapshot {
        self.process_commands();

        self.elapsed_ms += elapsed_ms;
        let mut budget = elapsed_ms;
        while let Some(timer) = self.pending {
            if timer.remaining_ms > budget {
                self.pending = Some(PendingTimer {
                    remaining_ms: timer.remaining_ms - budget,
                    ..timer
                });
                break;
            }
            budget -= timer.remaining_ms;
            self.pending = None;
            self.fire(timer.action);
        }

        self.build_snapshot()
    }

    /// Fire every pending timer now, advancing the clock by the time they had left.
    pub fn flush_pending(&mut self) {
        while let Some(timer) = self.pending.take() {
            self.elapsed_ms += timer.remaining_ms;
            self.fire(timer.action);
        }
    }

    // --- Accessors ---

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }

    pub fn aggregate_health(&self) -> f64 {
        self.health.aggregate()
    }

    /// Build cost plus repair spend of the current run.
    pub fn total_cost(&self) -> f64 {
        self.building.cost() + self.repair_spend
    }

    pub fn run(&self) -> Option<&SimulationRun> {
        self.run.as_ref()
    }

    pub fn active_disaster(&self) -> Option<DisasterKind> {
        self.active_disaster
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn result_message(&self) -> Option<&str> {
        self.result_message.as_deref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scores(&self) -> &[ScoreRecord] {
        self.scores.records()
    }

    /// Take the events emitted since the last snapshot or drain.
    ///
    /// `tick` drains these into its snapshot; callers driving the engine
    /// only through direct methods and `flush_pending` must drain here.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take the alerts raised since the last snapshot or drain.
    pub fn drain_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }

    /// Overwrite the health state (for tests that need a precise aggregate).
    #[cfg(test)]
    pub(crate) fn set_health(&mut self, health: HealthState) {
        self.health = health;
    }

    // --- Construction ---

    pub fn change_material(
        &mut self,
        component: ComponentKind,
        tier: MaterialTier,
        floor: usize,
    ) -> Result<f64, SimError> {
        self.require_phase(Phase::Idle)?;
        let delta = self
            .building
            .set_material(&self.catalog, component, floor, tier)?;
        self.events.push(SimEvent::MaterialChanged { cost_delta: delta });
        Ok(delta)
    }

    /// Set the floor area (clamped) and return the value actually applied.
    pub fn change_floor_area(&mut self, area: f64) -> Result<f64, SimError> {
        self.require_phase(Phase::Idle)?;
        let area = self.rules.clamp_floor_area(area);
        self.building.set_floor_area(&self.catalog, area);
        Ok(area)
    }

    pub fn copy_floor(&mut self, level: Level) -> Result<(), SimError> {
        self.require_phase(Phase::Idle)?;
        self.building.copy_floor(level)?;
        Ok(())
    }

    pub fn paste_floor(&mut self, level: Level) -> Result<f64, SimError> {
        self.require_phase(Phase::Idle)?;
        let delta = self.building.paste_floor(&self.catalog, level)?;
        if delta != 0.0 {
            self.events.push(SimEvent::MaterialChanged { cost_delta: delta });
        }
        Ok(delta)
    }

    // --- Simulation ---

    /// Draw a run and enter the first wave.
    pub fn start_simulation(&mut self) -> Result<(), SimError> {
        self.require_no_pending()?;
        self.require_phase(Phase::Idle)?;
        if self.building.layout().is_structure_empty() {
            return Err(SimError::InvalidStart);
        }

        let run = SimulationRun::draw(&mut self.rng, self.rules.wave_intensities);
        log::info!(
            "simulation started: {:?}",
            run.waves()
                .iter()
                .map(|w| (w.disaster.as_str(), w.intensity))
                .collect::<Vec<_>>()
        );
        self.events.push(SimEvent::SimulationStarted {
            disasters: run.disasters(),
        });
        self.run = Some(run);
        self.resolved_waves = 0;
        self.enter_wave(1);
        Ok(())
    }

    /// Leave `repair_N` for `wave_{N+1}`.
    pub fn next_wave(&mut self) -> Result<(), SimError> {
        self.require_no_pending()?;
        if !self.phase.is_repair() {
            return Err(SimError::NotInPhase(self.phase));
        }
        let next = self.phase.wave_number().unwrap_or(0) + 1;
        self.enter_wave(next);
        Ok(())
    }

    /// Restore one slot to full health, charging the repair cost.
    pub fn repair_slot(&mut self, component: ComponentKind, floor: usize) -> Result<f64, SimError> {
        if !self.phase.is_repair() {
            return Err(SimError::NotInPhase(self.phase));
        }
        let current = self
            .health
            .health(component, floor)
            .ok_or(SimError::SlotOutOfRange {
                component,
                index: floor,
            })?;
        if current >= MAX_HEALTH {
            return Err(SimError::AlreadyRepaired);
        }
        let cost = health::repair(
            &self.catalog,
            self.building.layout(),
            &mut self.health,
            component,
            floor,
            self.building.floor_area(),
        )?;
        self.repair_spend += cost;
        self.events.push(SimEvent::SlotRepaired {
            component,
            floor,
            cost,
        });
        Ok(cost)
    }

    /// Save the finished run under `player_name`, stamped with the wall clock.
    pub fn save_score(&mut self, player_name: &str) -> Result<(), SimError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.save_score_at(player_name, timestamp)
    }

    /// Save the finished run with an explicit epoch-millisecond timestamp.
    pub fn save_score_at(&mut self, player_name: &str, timestamp: u64) -> Result<(), SimError> {
        if self.phase != Phase::Results {
            return Err(SimError::NoResults);
        }
        if self.score_saved {
            return Err(SimError::ScoreAlreadySaved);
        }
        let name = scoring::normalize_player_name(player_name)?;
        let candidate = self.candidate.clone().ok_or(SimError::NoResults)?;
        self.scores.push(candidate.into_record(name.clone(), timestamp));
        persistence::save_or_log(self.store.as_mut(), self.scores.records());
        self.score_saved = true;
        log::info!("score saved for {name}");
        self.events.push(SimEvent::ScoreSaved { player_name: name });
        Ok(())
    }

    /// Return to the initial idle state. Saved scores are kept.
    pub fn reset(&mut self) -> Result<(), SimError> {
        self.require_no_pending()?;
        self.building
            .reset(&self.catalog, self.rules.default_floor_area);
        self.health = HealthState::full(self.rules.floors);
        self.phase = Phase::Idle;
        self.repair_spend = 0.0;
        self.run = None;
        self.resolved_waves = 0;
        self.active_disaster = None;
        self.collapsed = false;
        self.outcome = None;
        self.result_message = None;
        self.candidate = None;
        self.score_saved = false;
        self.events.push(SimEvent::Reset);
        Ok(())
    }

    // --- Internals ---

    fn require_phase(&self, phase: Phase) -> Result<(), SimError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(SimError::NotInPhase(self.phase))
        }
    }

    fn require_no_pending(&self) -> Result<(), SimError> {
        if self.pending.is_some() {
            Err(SimError::ResolutionPending)
        } else {
            Ok(())
        }
    }

    fn schedule(&mut self, delay_ms: u64, action: PendingAction) {
        log::debug!("scheduled {action:?} in {delay_ms} ms");
        self.pending = Some(PendingTimer {
            remaining_ms: delay_ms,
            action,
        });
    }

    fn enter_wave(&mut self, number: u8) {
        let (Some(phase), Some(wave)) = (
            Phase::wave(number),
            self.run.as_ref().and_then(|r| r.wave(number)).copied(),
        ) else {
            log::debug!("no wave {number} in the current run");
            return;
        };
        self.phase = phase;
        self.active_disaster = Some(wave.disaster);
        self.events.push(SimEvent::WaveStarted {
            wave: number,
            disaster: wave.disaster,
            intensity: wave.intensity,
        });
        self.schedule(
            self.rules.wave_resolution_delay_ms,
            PendingAction::ResolveWave(number),
        );
    }

    fn fire(&mut self, action: PendingAction) {
        match action {
            PendingAction::ResolveWave(number) => self.resolve_wave(number),
            PendingAction::ShowCollapseResults => self.enter_results(Outcome::Collapsed),
        }
    }

    fn resolve_wave(&mut self, number: u8) {
        let Some(wave) = self.run.as_ref().and_then(|r| r.wave(number)).copied() else {
            return;
        };
        let next = damage::apply_disaster(
            &self.catalog,
            self.building.layout(),
            &self.health,
            wave.disaster,
            wave.intensity,
        );
        let total_damage = damage::total_damage(&damage::damage_dealt(&self.health, &next));
        self.health = next;
        self.resolved_waves = number;

        let aggregate = self.health.aggregate();
        log::info!(
            "wave {number} ({}) resolved: damage {total_damage:.1}, integrity {aggregate:.1}",
            wave.disaster.as_str()
        );
        self.events.push(SimEvent::WaveResolved {
            wave: number,
            disaster: wave.disaster,
            total_damage,
            aggregate_health: aggregate,
        });

        match WaveTransition::decide(aggregate, number, &self.rules) {
            WaveTransition::Collapse => {
                self.collapsed = true;
                self.events.push(SimEvent::StructureCollapsed {
                    aggregate_health: aggregate,
                });
                self.alerts.push(Alert {
                    level: AlertLevel::Critical,
                    message: format!("Structure collapsed at {aggregate:.1}% integrity"),
                    elapsed_ms: self.elapsed_ms,
                });
                self.schedule(
                    self.rules.collapse_results_delay_ms,
                    PendingAction::ShowCollapseResults,
                );
            }
            WaveTransition::Final(outcome) => self.enter_results(outcome),
            WaveTransition::Repair => {
                if let Some(phase) = Phase::repair(number) {
                    self.phase = phase;
                }
            }
        }
    }

    fn enter_results(&mut self, outcome: Outcome) {
        let aggregate = self.health.aggregate();
        self.phase = Phase::Results;
        self.outcome = Some(outcome);
        self.result_message = Some(scoring::outcome_message(outcome, aggregate));
        self.candidate = Some(ScoreCandidate {
            integrity: aggregate,
            cost: self.total_cost(),
            disasters: self.run.as_ref().map(|r| r.disasters()).unwrap_or_default(),
        });
        self.score_saved = false;
        log::info!("results: {outcome:?} at {aggregate:.1}%");
        self.events.push(SimEvent::ResultsReady {
            outcome,
            aggregate_health: aggregate,
        });
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command. User-facing errors become alerts;
    /// everything else is an ignored mutation.
    fn handle_command(&mut self, command: PlayerCommand) {
        let result = match command {
            PlayerCommand::ChangeMaterial {
                component,
                tier,
                floor,
            } => self.change_material(component, tier, floor).map(|_| ()),
            PlayerCommand::ChangeFloorArea { area } => self.change_floor_area(area).map(|_| ()),
            PlayerCommand::CopyFloor { level } => self.copy_floor(level),
            PlayerCommand::PasteFloor { level } => self.paste_floor(level).map(|_| ()),
            PlayerCommand::StartSimulation => self.start_simulation(),
            PlayerCommand::NextWave => self.next_wave(),
            PlayerCommand::RepairSlot { component, floor } => {
                self.repair_slot(component, floor).map(|_| ())
            }
            PlayerCommand::SaveScore { player_name } => self.save_score(&player_name),
            PlayerCommand::Reset => self.reset(),
        };

        if let Err(e) = result {
            if e.is_user_facing() {
                log::info!("rejected: {e}");
                self.alerts.push(Alert {
                    level: AlertLevel::Warning,
                    message: e.to_string(),
                    elapsed_ms: self.elapsed_ms,
                });
            } else {
                log::debug!("ignored command in {}: {e}", self.phase.as_str());
            }
        }
    }

    fn build_snapshot(&mut self) -> GameStateSnapshot {
        snapshot::build_snapshot(SnapshotSource {
            elapsed_ms: self.elapsed_ms,
            phase: self.phase,
            active_disaster: self.active_disaster,
            run: self.run.as_ref(),
            resolved_waves: self.resolved_waves,
            catalog: &self.catalog,
            building: &self.building,
            health: &self.health,
            repair_spend: self.repair_spend,
            collapsed: self.collapsed,
            outcome: self.outcome,
            result_message: self.result_message.clone(),
            pending_ms: self.pending.map(|t| t.remaining_ms),
            score_saved: self.score_saved,
            scores: self.scores.records(),
            events: std::mem::take(&mut self.events),
            alerts: std::mem::take(&mut self.alerts),
        })
    }
}
