//! Health model: repair pricing, repair, and damaged-slot grouping.

use sismotower_core::catalog::Catalog;
use sismotower_core::constants::{MAX_HEALTH, REPAIR_COST_DIVISOR};
use sismotower_core::enums::ComponentKind;
use sismotower_core::error::SimError;
use sismotower_core::state::{DamagedGroup, DamagedItem};
use sismotower_core::types::{BuildingLayout, HealthState};

/// Price multiplier for repairing a slot. Defense repairs are never scaled.
pub fn repair_multiplier(component: ComponentKind, floor_area: f64) -> f64 {
    if component.repair_scales_with_area() {
        floor_area
    } else {
        1.0
    }
}

/// Cost of restoring one slot to full health; zero when already full.
pub fn repair_cost(
    catalog: &Catalog,
    layout: &BuildingLayout,
    health: &HealthState,
    component: ComponentKind,
    index: usize,
    floor_area: f64,
) -> Result<f64, SimError> {
    let out_of_range = || SimError::SlotOutOfRange { component, index };
    let current = health.health(component, index).ok_or_else(out_of_range)?;
    let tier = layout.tier(component, index).ok_or_else(out_of_range)?;
    if current >= MAX_HEALTH {
        return Ok(0.0);
    }
    Ok((MAX_HEALTH - current) * (catalog.unit_cost(component, tier) / REPAIR_COST_DIVISOR)
        * repair_multiplier(component, floor_area))
}

/// Restore one slot to exactly 100 and return what it cost. A full slot is
/// left untouched at zero cost.
pub fn repair(
    catalog: &Catalog,
    layout: &BuildingLayout,
    health: &mut HealthState,
    component: ComponentKind,
    index: usize,
    floor_area: f64,
) -> Result<f64, SimError> {
    let cost = repair_cost(catalog, layout, health, component, index, floor_area)?;
    if let Some(slot) = health.slot_mut(component, index) {
        if *slot < MAX_HEALTH {
            *slot = MAX_HEALTH;
        }
    }
    Ok(cost)
}

/// Display name of the level a slot sits on.
pub fn level_label(component: ComponentKind, index: usize) -> String {
    match component {
        ComponentKind::Roof => "Roof".to_string(),
        ComponentKind::Foundations => "Foundation".to_string(),
        c if c.is_defense() => "Defense system".to_string(),
        _ if index == 0 => "Ground floor".to_string(),
        _ => format!("Floor {index}"),
    }
}

/// Every slot below full health, grouped by component in catalog order,
/// weakest slot first within each group.
pub fn damaged_groups(
    catalog: &Catalog,
    layout: &BuildingLayout,
    health: &HealthState,
    floor_area: f64,
) -> Vec<DamagedGroup> {
    ComponentKind::ALL
        .iter()
        .filter_map(|&component| {
            let mut items: Vec<DamagedItem> = health
                .get(component)
                .iter()
                .enumerate()
                .filter(|(_, &h)| h < MAX_HEALTH)
                .map(|(floor, &h)| DamagedItem {
                    component,
                    floor,
                    health: h,
                    repair_cost: repair_cost(catalog, layout, health, component, floor, floor_area)
                        .unwrap_or(0.0),
                    level_label: level_label(component, floor),
                })
                .collect();
            if items.is_empty() {
                return None;
            }
            items.sort_by(|a, b| a.health.total_cmp(&b.health));
            Some(DamagedGroup {
                component,
                label: catalog.component_label(component).to_string(),
                items,
            })
        })
        .collect()
}
