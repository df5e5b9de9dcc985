//! tower-playtest: scripts a full Sismotower game headlessly.
//!
//! Builds a preset layout, plays all three waves (optionally repairing every
//! damaged slot in between), optionally saves a score, and prints the final
//! snapshot as JSON.
//!
//! Usage:
//!   tower-playtest --seed 7 --preset mixed --repair --player ada --scores scores.json

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use sismotower_core::catalog::Catalog;
use sismotower_core::commands::PlayerCommand;
use sismotower_core::config::GameRules;
use sismotower_core::enums::{AlertLevel, ComponentKind, MaterialTier, Phase};
use sismotower_core::state::GameStateSnapshot;
use sismotower_core::types::BuildingLayout;
use sismotower_sim::persistence::{JsonFileStore, MemoryStore, ScoreStore};
use sismotower_sim::{SimConfig, SimulationEngine};

/// Upper bound on timer flushes; a run needs at most four.
const MAX_STEPS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    Weak,
    Medium,
    Strong,
    /// Strong lower half, medium upper half.
    Mixed,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RNG seed for the disaster draw.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = Preset::Medium)]
    preset: Preset,

    /// Floor area in square meters (clamped to the rules' range).
    #[arg(long, value_name = "M2")]
    floor_area: Option<f64>,

    /// Repair every damaged slot between waves.
    #[arg(long)]
    repair: bool,

    /// Save a score under this name once results are in.
    #[arg(long, value_name = "NAME")]
    player: Option<String>,

    /// JSON score file (session-only scores when omitted).
    #[arg(long, value_name = "PATH")]
    scores: Option<PathBuf>,

    /// JSON rules overriding the defaults.
    #[arg(long, value_name = "PATH")]
    rules: Option<PathBuf>,

    /// JSON catalog replacing the built-in one.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => GameRules::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };
    let store: Box<dyn ScoreStore> = match &args.scores {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::default()),
    };

    let mut engine = SimulationEngine::with_store(
        SimConfig {
            seed: args.seed,
            rules,
            catalog,
        },
        store,
    );

    if let Some(area) = args.floor_area {
        engine.queue_command(PlayerCommand::ChangeFloorArea { area });
    }
    let commands = preset_commands(engine.building().layout(), args.preset);
    engine.queue_commands(commands);
    engine.queue_command(PlayerCommand::StartSimulation);

    let mut snapshot = engine.tick(0);
    if snapshot.phase != Phase::Wave1 {
        let reasons: Vec<&str> = snapshot.alerts.iter().map(|a| a.message.as_str()).collect();
        bail!("simulation did not start: {}", reasons.join("; "));
    }
    log::info!(
        "run: {}",
        snapshot
            .waves
            .iter()
            .map(|w| format!("{} x{}", w.label, w.intensity))
            .collect::<Vec<_>>()
            .join(", ")
    );

    snapshot = play_waves(&mut engine, args.repair)?;

    if let Some(player_name) = args.player {
        engine.queue_command(PlayerCommand::SaveScore { player_name });
        snapshot = engine.tick(0);
        if let Some(alert) = snapshot
            .alerts
            .iter()
            .find(|a| a.level == AlertLevel::Warning)
        {
            log::warn!("score not saved: {}", alert.message);
        }
    }

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn load_rules(path: &Path) -> Result<GameRules> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading rules {}", path.display()))?;
    GameRules::from_json_str(&json).with_context(|| format!("parsing rules {}", path.display()))
}

/// Flush wave timers until the results screen, repairing between waves when asked.
fn play_waves(engine: &mut SimulationEngine, repair: bool) -> Result<GameStateSnapshot> {
    for _ in 0..MAX_STEPS {
        engine.flush_pending();
        let snapshot = engine.tick(0);
        log::info!(
            "{}: integrity {:.1}%, total cost {:.0}",
            snapshot.phase.as_str(),
            snapshot.aggregate_health,
            snapshot.cost.total
        );
        if snapshot.phase == Phase::Results {
            return Ok(snapshot);
        }
        if snapshot.phase.is_repair() {
            if repair {
                let repairs: Vec<PlayerCommand> = snapshot
                    .damaged_groups
                    .iter()
                    .flat_map(|group| group.items.iter())
                    .map(|item| PlayerCommand::RepairSlot {
                        component: item.component,
                        floor: item.floor,
                    })
                    .collect();
                log::info!("repairing {} slots", repairs.len());
                engine.queue_commands(repairs);
            }
            engine.queue_command(PlayerCommand::NextWave);
        }
    }
    bail!("run did not reach results after {MAX_STEPS} steps")
}

fn preset_commands(layout: &BuildingLayout, preset: Preset) -> Vec<PlayerCommand> {
    let floors = layout.slot_count(ComponentKind::Walls);
    layout
        .iter()
        .map(|(component, floor, _)| PlayerCommand::ChangeMaterial {
            component,
            tier: preset_tier(preset, component, floor, floors),
            floor,
        })
        .collect()
}

fn preset_tier(preset: Preset, component: ComponentKind, floor: usize, floors: usize) -> MaterialTier {
    match preset {
        Preset::Weak => MaterialTier::Weak,
        Preset::Medium => MaterialTier::Medium,
        Preset::Strong => MaterialTier::Strong,
        Preset::Mixed => match component {
            ComponentKind::Foundations => MaterialTier::Strong,
            c if c.is_per_floor() && floor < floors / 2 => MaterialTier::Strong,
            _ => MaterialTier::Medium,
        },
    }
}
