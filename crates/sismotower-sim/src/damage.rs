//! Damage engine: resolves one disaster against a building.
//!
//! `apply_disaster` is a pure function of the layout, the current health, the
//! disaster kind, and its intensity. The single-slot defense matching the
//! disaster absorbs power first; what remains hits every non-defense slot
//! scaled by a position multiplier. Lightning is special-cased: it only
//! reaches the roof and the top two floors and ignores component resistance.

use sismotower_core::catalog::Catalog;
use sismotower_core::constants::*;
use sismotower_core::enums::{ComponentKind, DisasterKind, MaterialTier};
use sismotower_core::types::{BuildingLayout, HealthState};

/// Resolve one wave and return the resulting health.
pub fn apply_disaster(
    catalog: &Catalog,
    layout: &BuildingLayout,
    health: &HealthState,
    disaster: DisasterKind,
    intensity: f64,
) -> HealthState {
    let power = catalog.disaster_power(disaster) * intensity;
    let defense = disaster.defense();
    let defense_resistance = resistance_at(catalog, layout, defense, 0);
    let effective = (power - defense_resistance).max(0.0);

    let mut next = health.clone();
    match disaster {
        DisasterKind::LightningStorm => {
            if defense_resistance < power {
                strike_lightning(&mut next, effective, power - defense_resistance);
            }
        }
        DisasterKind::Earthquake | DisasterKind::Hurricane | DisasterKind::Tsunami => {
            for (component, index, &current) in health.iter() {
                if component.is_defense() {
                    continue;
                }
                let base = (effective - resistance_at(catalog, layout, component, index)).max(0.0);
                let count = health.slot_count(component);
                let damage = base * position_multiplier(disaster, component, index, count);
                if let Some(slot) = next.slot_mut(component, index) {
                    *slot = subtract(current, damage);
                }
            }
        }
    }
    next
}

/// Damage multiplier for a slot at `index` of a component with `count` slots.
/// Never negative.
pub fn position_multiplier(
    disaster: DisasterKind,
    component: ComponentKind,
    index: usize,
    count: usize,
) -> f64 {
    let multiplier = match disaster {
        DisasterKind::Tsunami => {
            if component == ComponentKind::Foundations {
                TSUNAMI_FOUNDATIONS_FACTOR
            } else if index < TSUNAMI_LOW_FLOOR_LIMIT {
                TSUNAMI_LOW_FLOOR_FACTOR
            } else {
                TSUNAMI_HIGH_FLOOR_FACTOR
            }
        }
        DisasterKind::Earthquake => {
            let mut m = 1.0;
            if count > 1 {
                let middle = (count - 1) / 2;
                m = EARTHQUAKE_PEAK_FACTOR
                    - EARTHQUAKE_FALLOFF_PER_FLOOR * index.abs_diff(middle) as f64;
            }
            if component == ComponentKind::Foundations {
                m *= EARTHQUAKE_FOUNDATIONS_FACTOR;
            }
            m
        }
        DisasterKind::Hurricane => {
            if component == ComponentKind::Roof {
                HURRICANE_ROOF_FACTOR
            } else if count > 1 {
                HURRICANE_BASE_FACTOR + index as f64 / (count - 1) as f64
            } else {
                1.0
            }
        }
        DisasterKind::LightningStorm => 1.0,
    };
    multiplier.max(0.0)
}

/// Lightning divisor for the per-floor components it reaches.
fn lightning_divisor(component: ComponentKind) -> Option<f64> {
    match component {
        ComponentKind::Beams => Some(LIGHTNING_DIVISOR_BEAMS),
        ComponentKind::Walls => Some(LIGHTNING_DIVISOR_WALLS),
        ComponentKind::Glass => Some(LIGHTNING_DIVISOR_GLASS),
        ComponentKind::Pillars => Some(LIGHTNING_DIVISOR_PILLARS),
        ComponentKind::Floor => Some(LIGHTNING_DIVISOR_FLOOR),
        _ => None,
    }
}

fn strike_lightning(health: &mut HealthState, effective: f64, overload: f64) {
    damage_slot(
        health,
        ComponentKind::LightningRod,
        0,
        LIGHTNING_ROD_DAMAGE_FACTOR * overload,
    );
    damage_slot(health, ComponentKind::Roof, 0, effective * LIGHTNING_ROOF_FACTOR);

    for distance in 0..LIGHTNING_FLOOR_SPAN {
        let falloff = 1.0 / (distance as f64 * LIGHTNING_FLOOR_FALLOFF + 1.0);
        for component in ComponentKind::FLOOR_SET {
            let Some(divisor) = lightning_divisor(component) else {
                continue;
            };
            // Components shorter than the span skip the missing floors.
            let Some(index) = health
                .slot_count(component)
                .checked_sub(1 + distance)
            else {
                continue;
            };
            damage_slot(health, component, index, effective * falloff / divisor);
        }
    }
}

fn damage_slot(health: &mut HealthState, component: ComponentKind, index: usize, damage: f64) {
    if let Some(slot) = health.slot_mut(component, index) {
        *slot = subtract(*slot, damage);
    }
}

fn subtract(current: f64, damage: f64) -> f64 {
    (current - damage.max(0.0)).clamp(0.0, MAX_HEALTH)
}

fn resistance_at(
    catalog: &Catalog,
    layout: &BuildingLayout,
    component: ComponentKind,
    index: usize,
) -> f64 {
    let tier = layout.tier(component, index).unwrap_or(MaterialTier::Empty);
    catalog.resistance(component, tier)
}

/// Per-slot damage between two health states, never negative.
pub fn damage_dealt(before: &HealthState, after: &HealthState) -> HealthState {
    let mut dealt = before.clone();
    for (component, index, &b) in before.iter() {
        let a = after.health(component, index).unwrap_or(b);
        if let Some(slot) = dealt.slot_mut(component, index) {
            *slot = (b - a).max(0.0);
        }
    }
    dealt
}

/// Sum of all per-slot values of a damage map.
pub fn total_damage(dealt: &HealthState) -> f64 {
    dealt.iter().map(|(_, _, &d)| d).sum()
}
