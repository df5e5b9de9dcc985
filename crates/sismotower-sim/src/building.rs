//! Building model: the material layout, floor area, and running build cost.
//!
//! The build cost is maintained incrementally on every slot change and only
//! recomputed from scratch when the floor area changes.

use sismotower_core::catalog::Catalog;
use sismotower_core::enums::{ComponentKind, Level, MaterialTier};
use sismotower_core::error::SimError;
use sismotower_core::types::{BuildingLayout, FloorClipboard};

/// Price multiplier for changing the material of a slot.
pub fn cost_multiplier(component: ComponentKind, floor_area: f64) -> f64 {
    if component.scales_with_area() {
        floor_area
    } else {
        1.0
    }
}

/// Full build cost of a layout at a given floor area.
pub fn total_cost(catalog: &Catalog, layout: &BuildingLayout, floor_area: f64) -> f64 {
    layout
        .iter()
        .map(|(component, _, &tier)| {
            catalog.unit_cost(component, tier) * cost_multiplier(component, floor_area)
        })
        .sum()
}

/// The player's building.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    layout: BuildingLayout,
    floor_area: f64,
    cost: f64,
    clipboard: Option<FloorClipboard>,
}

impl Building {
    /// Fresh building: empty structure, weak defenses.
    pub fn new(catalog: &Catalog, floors: usize, floor_area: f64) -> Self {
        Self::from_layout(catalog, BuildingLayout::initial(floors), floor_area)
    }

    pub fn from_layout(catalog: &Catalog, layout: BuildingLayout, floor_area: f64) -> Self {
        let cost = total_cost(catalog, &layout, floor_area);
        Self {
            layout,
            floor_area,
            cost,
            clipboard: None,
        }
    }

    pub fn layout(&self) -> &BuildingLayout {
        &self.layout
    }

    pub fn floor_area(&self) -> f64 {
        self.floor_area
    }

    /// Incrementally maintained build cost.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn clipboard(&self) -> Option<&FloorClipboard> {
        self.clipboard.as_ref()
    }

    /// Replace the tier of one slot and return the cost delta.
    pub fn set_material(
        &mut self,
        catalog: &Catalog,
        component: ComponentKind,
        index: usize,
        tier: MaterialTier,
    ) -> Result<f64, SimError> {
        if component.is_defense() && tier == MaterialTier::Empty {
            return Err(SimError::EmptyDefense(component));
        }
        let current = self
            .layout
            .tier(component, index)
            .ok_or(SimError::SlotOutOfRange { component, index })?;
        if current == tier {
            return Err(SimError::UnchangedMaterial);
        }
        self.layout.replace(component, index, tier);
        let delta = (catalog.unit_cost(component, tier) - catalog.unit_cost(component, current))
            * cost_multiplier(component, self.floor_area);
        self.cost += delta;
        Ok(delta)
    }

    /// Set the floor area and recompute the build cost from scratch.
    /// Callers clamp the area beforehand.
    pub fn set_floor_area(&mut self, catalog: &Catalog, floor_area: f64) -> f64 {
        self.floor_area = floor_area;
        self.cost = total_cost(catalog, &self.layout, floor_area);
        self.cost
    }

    /// Capture the per-floor component tiers of a floor.
    pub fn copy_floor(&mut self, level: Level) -> Result<&FloorClipboard, SimError> {
        let floor = level.floor_index().ok_or(SimError::NotAFloor)?;
        let mut tiers = std::collections::BTreeMap::new();
        for component in ComponentKind::FLOOR_SET {
            let tier = self.layout.tier(component, floor).ok_or(SimError::SlotOutOfRange {
                component,
                index: floor,
            })?;
            tiers.insert(component, tier);
        }
        Ok(&*self.clipboard.insert(FloorClipboard {
            source_floor: floor,
            tiers,
        }))
    }

    /// Apply the clipboard to a floor. Slots already at the copied tier are
    /// left alone. Returns the summed cost delta.
    pub fn paste_floor(&mut self, catalog: &Catalog, level: Level) -> Result<f64, SimError> {
        let floor = level.floor_index().ok_or(SimError::NotAFloor)?;
        let clipboard = self.clipboard.clone().ok_or(SimError::NoClipboard)?;
        if let Some(&component) = ComponentKind::FLOOR_SET
            .iter()
            .find(|&&c| self.layout.tier(c, floor).is_none())
        {
            return Err(SimError::SlotOutOfRange {
                component,
                index: floor,
            });
        }

        let mut delta = 0.0;
        for (&component, &tier) in &clipboard.tiers {
            match self.set_material(catalog, component, floor, tier) {
                Ok(d) => delta += d,
                Err(SimError::UnchangedMaterial) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(delta)
    }

    /// Restore the initial layout and floor area, clearing the clipboard.
    pub fn reset(&mut self, catalog: &Catalog, floor_area: f64) {
        let floors = self.layout.slot_count(ComponentKind::Walls);
        *self = Self::new(catalog, floors, floor_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn building() -> (Catalog, Building) {
        let catalog = Catalog::builtin();
        let building = Building::new(&catalog, 7, 100.0);
        (catalog, building)
    }

    #[test]
    fn test_initial_cost_is_free() {
        let (catalog, b) = building();
        // Empty structure and "no protection" defenses cost nothing.
        assert_eq!(b.cost(), 0.0);
        assert_eq!(total_cost(&catalog, b.layout(), 100.0), 0.0);
    }

    #[test]
    fn test_medium_defenses_scale_except_lightning_rod() {
        let (catalog, mut b) = building();
        for defense in ComponentKind::DEFENSES {
            b.set_material(&catalog, defense, 0, MaterialTier::Medium)
                .unwrap();
        }
        let expected = 30000.0 + (200.0 + 650.0 + 900.0) * 100.0;
        assert!((b.cost() - expected).abs() < 1e-9);

        b.set_floor_area(&catalog, 50.0);
        let expected = 30000.0 + (200.0 + 650.0 + 900.0) * 50.0;
        assert!((b.cost() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_set_material_delta_and_noop() {
        let (catalog, mut b) = building();
        let before = b.cost();
        let delta = b
            .set_material(&catalog, ComponentKind::Walls, 2, MaterialTier::Strong)
            .unwrap();
        assert!((delta - 350.0 * 100.0).abs() < 1e-9);
        assert!((b.cost() - before - delta).abs() < 1e-9);

        let err = b
            .set_material(&catalog, ComponentKind::Walls, 2, MaterialTier::Strong)
            .unwrap_err();
        assert_eq!(err, SimError::UnchangedMaterial);
    }

    #[test]
    fn test_lightning_rod_change_is_unscaled() {
        let (catalog, mut b) = building();
        let delta = b
            .set_material(&catalog, ComponentKind::LightningRod, 0, MaterialTier::Strong)
            .unwrap();
        assert_eq!(delta, 55000.0);
    }

    #[test]
    fn test_defense_cannot_be_emptied() {
        let (catalog, mut b) = building();
        let err = b
            .set_material(&catalog, ComponentKind::SeismicDampers, 0, MaterialTier::Empty)
            .unwrap_err();
        assert_eq!(err, SimError::EmptyDefense(ComponentKind::SeismicDampers));
    }

    #[test]
    fn test_out_of_range_slot() {
        let (catalog, mut b) = building();
        let err = b
            .set_material(&catalog, ComponentKind::Roof, 1, MaterialTier::Weak)
            .unwrap_err();
        assert_eq!(
            err,
            SimError::SlotOutOfRange {
                component: ComponentKind::Roof,
                index: 1
            }
        );
    }

    #[test]
    fn test_copy_paste_floor() {
        let (catalog, mut b) = building();
        b.set_material(&catalog, ComponentKind::Walls, 0, MaterialTier::Strong)
            .unwrap();
        b.set_material(&catalog, ComponentKind::Glass, 0, MaterialTier::Medium)
            .unwrap();
        let clip = b.copy_floor(Level::Floor(0)).unwrap();
        assert_eq!(clip.source_floor, 0);
        assert_eq!(clip.tiers.len(), 5);

        let before = b.cost();
        let delta = b.paste_floor(&catalog, Level::Floor(4)).unwrap();
        assert!((delta - (350.0 + 115.0) * 100.0).abs() < 1e-9);
        assert!((b.cost() - before - delta).abs() < 1e-9);
        assert_eq!(
            b.layout().tier(ComponentKind::Walls, 4),
            Some(MaterialTier::Strong)
        );

        // Pasting again changes nothing.
        assert_eq!(b.paste_floor(&catalog, Level::Floor(4)).unwrap(), 0.0);
    }

    #[test]
    fn test_copy_paste_pseudo_levels_rejected() {
        let (catalog, mut b) = building();
        assert_eq!(b.copy_floor(Level::Roof).unwrap_err(), SimError::NotAFloor);
        assert_eq!(
            b.paste_floor(&catalog, Level::Floor(1)).unwrap_err(),
            SimError::NoClipboard
        );
        b.copy_floor(Level::Floor(1)).unwrap();
        assert_eq!(
            b.paste_floor(&catalog, Level::Foundation).unwrap_err(),
            SimError::NotAFloor
        );
    }

    #[test]
    fn test_floor_area_recompute_matches_incremental() {
        let (catalog, mut b) = building();
        b.set_material(&catalog, ComponentKind::Beams, 3, MaterialTier::Medium)
            .unwrap();
        b.set_material(&catalog, ComponentKind::Roof, 0, MaterialTier::Weak)
            .unwrap();
        let recomputed = b.set_floor_area(&catalog, 150.0);
        assert!((recomputed - total_cost(&catalog, b.layout(), 150.0)).abs() < 1e-9);
    }

    #[test]
    fn test_reset_restores_initial() {
        let (catalog, mut b) = building();
        b.set_material(&catalog, ComponentKind::Floor, 6, MaterialTier::Weak)
            .unwrap();
        b.copy_floor(Level::Floor(6)).unwrap();
        b.set_floor_area(&catalog, 60.0);
        b.reset(&catalog, 100.0);
        assert_eq!(b, Building::new(&catalog, 7, 100.0));
    }
}
