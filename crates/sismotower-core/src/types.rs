//! Per-slot building data: material layout and health.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_HEALTH;
use crate::enums::{ComponentKind, MaterialTier};

/// One value per slot of every component.
///
/// Every component key is present and each slot vector keeps the length it
/// was created with; only individual slots are ever replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentMap<T> {
    slots: BTreeMap<ComponentKind, Vec<T>>,
}

/// Material tier per slot.
pub type BuildingLayout = ComponentMap<MaterialTier>;

/// Structural integrity per slot, always within `0.0..=100.0`.
pub type HealthState = ComponentMap<f64>;

impl<T: Clone> ComponentMap<T> {
    /// Build a map with `floors` slots for per-floor components and one slot
    /// for the rest, each filled by `value(component)`.
    pub fn filled_with(floors: usize, mut value: impl FnMut(ComponentKind) -> T) -> Self {
        let slots = ComponentKind::ALL
            .iter()
            .map(|&component| {
                (
                    component,
                    vec![value(component); component.slot_count(floors)],
                )
            })
            .collect();
        Self { slots }
    }
}

impl<T> ComponentMap<T> {
    /// Slots of one component (empty only for a malformed deserialized map).
    pub fn get(&self, component: ComponentKind) -> &[T] {
        self.slots
            .get(&component)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn slot(&self, component: ComponentKind, index: usize) -> Option<&T> {
        self.get(component).get(index)
    }

    pub fn slot_mut(&mut self, component: ComponentKind, index: usize) -> Option<&mut T> {
        self.slots
            .get_mut(&component)
            .and_then(|values| values.get_mut(index))
    }

    /// Replace one slot, returning the previous value. `None` if out of range.
    pub fn replace(&mut self, component: ComponentKind, index: usize, value: T) -> Option<T> {
        self.slot_mut(component, index)
            .map(|slot| std::mem::replace(slot, value))
    }

    pub fn slot_count(&self, component: ComponentKind) -> usize {
        self.get(component).len()
    }

    /// Total number of slots across all components.
    pub fn total_slots(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Iterate `(component, index, value)` in canonical component order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentKind, usize, &T)> {
        self.slots.iter().flat_map(|(&component, values)| {
            values
                .iter()
                .enumerate()
                .map(move |(index, value)| (component, index, value))
        })
    }

    /// Whether another map has the same components with the same slot counts.
    pub fn same_shape<U>(&self, other: &ComponentMap<U>) -> bool {
        ComponentKind::ALL
            .iter()
            .all(|&c| self.slot_count(c) == other.slot_count(c))
    }
}

impl BuildingLayout {
    /// Fresh layout: empty structure, defenses at `Weak` (no protection).
    pub fn initial(floors: usize) -> Self {
        Self::filled_with(floors, |component| {
            if component.is_defense() {
                MaterialTier::Weak
            } else {
                MaterialTier::Empty
            }
        })
    }

    /// A layout with every slot at `tier`. Defenses never go below `Weak`.
    pub fn uniform(floors: usize, tier: MaterialTier) -> Self {
        Self::filled_with(floors, |component| {
            if component.is_defense() && tier == MaterialTier::Empty {
                MaterialTier::Weak
            } else {
                tier
            }
        })
    }

    pub fn tier(&self, component: ComponentKind, index: usize) -> Option<MaterialTier> {
        self.slot(component, index).copied()
    }

    /// True when every structural component is `Empty` in every slot.
    pub fn is_structure_empty(&self) -> bool {
        ComponentKind::STRUCTURAL.iter().all(|&component| {
            self.get(component)
                .iter()
                .all(|&tier| tier == MaterialTier::Empty)
        })
    }
}

impl HealthState {
    /// Every slot at full health.
    pub fn full(floors: usize) -> Self {
        Self::filled_with(floors, |_| MAX_HEALTH)
    }

    pub fn health(&self, component: ComponentKind, index: usize) -> Option<f64> {
        self.slot(component, index).copied()
    }

    /// Mean of every slot value; 100 for a map without slots.
    pub fn aggregate(&self) -> f64 {
        let count = self.total_slots();
        if count == 0 {
            return MAX_HEALTH;
        }
        let sum: f64 = self.iter().map(|(_, _, &health)| health).sum();
        sum / count as f64
    }
}

/// Tiers of the per-floor component set captured from one floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorClipboard {
    pub source_floor: usize,
    pub tiers: BTreeMap<ComponentKind, MaterialTier>,
}
