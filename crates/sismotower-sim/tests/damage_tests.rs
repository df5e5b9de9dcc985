use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use sismotower_core::catalog::Catalog;
use sismotower_core::constants::MAX_HEALTH;
use sismotower_core::enums::*;
use sismotower_core::types::{BuildingLayout, HealthState};
use sismotower_sim::building::{total_cost, Building};
use sismotower_sim::damage::{apply_disaster, damage_dealt, total_damage};
use sismotower_sim::health;
use sismotower_sim::run::SimulationRun;

const EPS: f64 = 1e-9;

fn assert_health(health: &HealthState, component: ComponentKind, index: usize, expected: f64) {
    let actual = health.health(component, index).unwrap();
    assert!(
        (actual - expected).abs() < EPS,
        "{component:?}[{index}]: expected {expected}, got {actual}"
    );
}

fn random_layout(rng: &mut ChaCha8Rng, floors: usize) -> BuildingLayout {
    let mut layout = BuildingLayout::initial(floors);
    let slots: Vec<(ComponentKind, usize)> = layout.iter().map(|(c, i, _)| (c, i)).collect();
    for (component, index) in slots {
        let tier = if component.is_defense() {
            MaterialTier::ALL[rng.gen_range(1..4)]
        } else {
            MaterialTier::ALL[rng.gen_range(0..4)]
        };
        layout.replace(component, index, tier);
    }
    layout
}

// ---- Worked examples ----

#[test]
fn test_earthquake_on_strong_building() {
    let catalog = Catalog::builtin();
    let layout = BuildingLayout::uniform(7, MaterialTier::Strong);
    let before = HealthState::full(7);
    let after = apply_disaster(&catalog, &layout, &before, DisasterKind::Earthquake, 1.0);

    // 135 - 55 = 80 effective.
    let multipliers = [0.6, 0.9, 1.2, 1.5, 1.2, 0.9, 0.6];
    for (floor, m) in multipliers.iter().enumerate() {
        assert_health(&after, ComponentKind::Walls, floor, 100.0 - 5.0 * m);
        assert_health(&after, ComponentKind::Floor, floor, 100.0 - 20.0 * m);
        assert_health(&after, ComponentKind::Glass, floor, 100.0 - 20.0 * m);
        assert_health(&after, ComponentKind::Pillars, floor, 100.0);
        assert_health(&after, ComponentKind::Beams, floor, 100.0);
    }
    assert_health(&after, ComponentKind::Roof, 0, 90.0);
    assert_health(&after, ComponentKind::Foundations, 0, 100.0);
    for defense in ComponentKind::DEFENSES {
        assert_health(&after, defense, 0, 100.0);
    }
}

#[test]
fn test_lightning_on_strong_rod() {
    let catalog = Catalog::builtin();
    let layout = BuildingLayout::uniform(7, MaterialTier::Strong);
    let before = HealthState::full(7);
    let after = apply_disaster(&catalog, &layout, &before, DisasterKind::LightningStorm, 0.6);

    // 120 * 0.6 = 72 against a rod of 45: 27 effective.
    assert_health(&after, ComponentKind::LightningRod, 0, 46.0);
    assert_health(&after, ComponentKind::Roof, 0, 100.0 - 32.4);

    assert_health(&after, ComponentKind::Beams, 6, 100.0 - 21.6);
    assert_health(&after, ComponentKind::Walls, 6, 100.0 - 18.0);
    assert_health(&after, ComponentKind::Glass, 6, 100.0 - 13.5);
    assert_health(&after, ComponentKind::Pillars, 6, 100.0 - 22.5);
    assert_health(&after, ComponentKind::Floor, 6, 100.0 - 15.0);

    assert_health(&after, ComponentKind::Beams, 5, 100.0 - 8.64);
    assert_health(&after, ComponentKind::Walls, 5, 100.0 - 7.2);
    assert_health(&after, ComponentKind::Glass, 5, 100.0 - 5.4);
    assert_health(&after, ComponentKind::Pillars, 5, 100.0 - 9.0);
    assert_health(&after, ComponentKind::Floor, 5, 100.0 - 6.0);

    for floor in 0..5 {
        for component in ComponentKind::FLOOR_SET {
            assert_health(&after, component, floor, 100.0);
        }
    }
    assert_health(&after, ComponentKind::Foundations, 0, 100.0);
    assert_health(&after, ComponentKind::WindDampers, 0, 100.0);
}

// ---- Properties ----

#[test]
fn test_health_stays_in_bounds() {
    let catalog = Catalog::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..50 {
        let layout = random_layout(&mut rng, 7);
        let mut state = HealthState::full(7);
        for _ in 0..12 {
            if rng.gen_bool(0.7) {
                let disaster = DisasterKind::ALL[rng.gen_range(0..4)];
                let intensity = rng.gen_range(0.0..3.0);
                state = apply_disaster(&catalog, &layout, &state, disaster, intensity);
            } else {
                let component = ComponentKind::ALL[rng.gen_range(0..ComponentKind::ALL.len())];
                let index = rng.gen_range(0..state.slot_count(component));
                health::repair(&catalog, &layout, &mut state, component, index, 100.0).unwrap();
            }
            for (component, index, &h) in state.iter() {
                assert!(
                    (0.0..=MAX_HEALTH).contains(&h),
                    "{component:?}[{index}] out of bounds: {h}"
                );
            }
        }
    }
}

#[test]
fn test_damage_monotonic_in_intensity() {
    let catalog = Catalog::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let start = HealthState::full(7);
    for _ in 0..20 {
        let layout = random_layout(&mut rng, 7);
        for disaster in DisasterKind::ALL {
            let mut previous: Option<HealthState> = None;
            for step in 0..=20 {
                let intensity = step as f64 * 0.1;
                let after = apply_disaster(&catalog, &layout, &start, disaster, intensity);
                let dealt = damage_dealt(&start, &after);
                if let Some(prev) = &previous {
                    for (component, index, &d) in dealt.iter() {
                        let p = prev.health(component, index).unwrap();
                        assert!(
                            d + EPS >= p,
                            "{disaster:?} {component:?}[{index}] fell from {p} to {d} at {intensity}"
                        );
                    }
                }
                previous = Some(dealt);
            }
        }
    }
}

#[test]
fn test_resistance_saturation() {
    let catalog = Catalog::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let start = HealthState::full(7);
    for _ in 0..20 {
        let layout = random_layout(&mut rng, 7);
        for disaster in [
            DisasterKind::Earthquake,
            DisasterKind::Hurricane,
            DisasterKind::Tsunami,
        ] {
            let intensity = rng.gen_range(0.5..1.5);
            let defense = disaster.defense();
            let defense_tier = layout.tier(defense, 0).unwrap();
            let effective = (catalog.disaster_power(disaster) * intensity
                - catalog.resistance(defense, defense_tier))
            .max(0.0);

            let after = apply_disaster(&catalog, &layout, &start, disaster, intensity);
            for (component, index, &tier) in layout.iter() {
                if catalog.resistance(component, tier) >= effective {
                    assert_eq!(
                        after.health(component, index),
                        Some(100.0),
                        "{disaster:?} {component:?}[{index}]"
                    );
                }
            }
        }
    }
}

#[test]
fn test_no_damage_when_power_is_zero() {
    let catalog = Catalog::builtin();
    let layout = BuildingLayout::initial(7);
    let start = HealthState::full(7);
    for disaster in DisasterKind::ALL {
        let after = apply_disaster(&catalog, &layout, &start, disaster, 0.0);
        assert_eq!(total_damage(&damage_dealt(&start, &after)), 0.0);
    }
}

#[test]
fn test_repair_is_idempotent() {
    let catalog = Catalog::builtin();
    let layout = BuildingLayout::uniform(7, MaterialTier::Medium);
    let mut state = apply_disaster(
        &catalog,
        &layout,
        &HealthState::full(7),
        DisasterKind::LightningStorm,
        1.0,
    );
    let first = health::repair(&catalog, &layout, &mut state, ComponentKind::Roof, 0, 120.0).unwrap();
    assert!(first > 0.0);
    let after_first = state.clone();
    let second = health::repair(&catalog, &layout, &mut state, ComponentKind::Roof, 0, 120.0).unwrap();
    assert_eq!(second, 0.0);
    assert_eq!(state, after_first);
}

#[test]
fn test_incremental_cost_matches_full_recompute() {
    let catalog = Catalog::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(31337);
    let mut building = Building::new(&catalog, 7, 100.0);
    for step in 0..500 {
        if step % 50 == 49 {
            building.set_floor_area(&catalog, rng.gen_range(50.0..=200.0));
        }
        let component = ComponentKind::ALL[rng.gen_range(0..ComponentKind::ALL.len())];
        let index = rng.gen_range(0..building.layout().slot_count(component));
        let tier = MaterialTier::ALL[rng.gen_range(0..4)];
        let _ = building.set_material(&catalog, component, index, tier);

        let full = total_cost(&catalog, building.layout(), building.floor_area());
        assert!(
            (building.cost() - full).abs() <= 1e-6 * full.max(1.0),
            "step {step}: incremental {} vs full {full}",
            building.cost()
        );
    }
}

#[test]
fn test_run_invariants() {
    for seed in 0..200u64 {
        let run = SimulationRun::draw(&mut ChaCha8Rng::seed_from_u64(seed), [0.6, 0.8, 1.0]);
        assert_eq!(run.waves().len(), 3);

        let mut disasters = run.disasters();
        disasters.sort();
        disasters.dedup();
        assert_eq!(disasters.len(), 3, "seed {seed}: repeated disaster");

        let mut intensities: Vec<f64> = run.waves().iter().map(|w| w.intensity).collect();
        intensities.sort_by(f64::total_cmp);
        assert_eq!(intensities, vec![0.6, 0.8, 1.0], "seed {seed}");
    }
}
