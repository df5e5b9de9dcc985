//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Structural or defense component of the building.
///
/// Declaration order is the canonical iteration order (catalog order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Roof,
    Walls,
    Pillars,
    Beams,
    Floor,
    Glass,
    Foundations,
    LightningRod,
    WindDampers,
    TsunamiBarriers,
    SeismicDampers,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 11] = [
        ComponentKind::Roof,
        ComponentKind::Walls,
        ComponentKind::Pillars,
        ComponentKind::Beams,
        ComponentKind::Floor,
        ComponentKind::Glass,
        ComponentKind::Foundations,
        ComponentKind::LightningRod,
        ComponentKind::WindDampers,
        ComponentKind::TsunamiBarriers,
        ComponentKind::SeismicDampers,
    ];

    /// Components whose emptiness blocks a simulation start.
    pub const STRUCTURAL: [ComponentKind; 6] = [
        ComponentKind::Roof,
        ComponentKind::Walls,
        ComponentKind::Pillars,
        ComponentKind::Beams,
        ComponentKind::Floor,
        ComponentKind::Foundations,
    ];

    /// Per-floor components handled by copy/paste.
    pub const FLOOR_SET: [ComponentKind; 5] = [
        ComponentKind::Walls,
        ComponentKind::Pillars,
        ComponentKind::Beams,
        ComponentKind::Floor,
        ComponentKind::Glass,
    ];

    pub const DEFENSES: [ComponentKind; 4] = [
        ComponentKind::LightningRod,
        ComponentKind::WindDampers,
        ComponentKind::TsunamiBarriers,
        ComponentKind::SeismicDampers,
    ];

    /// Stable index into fixed-size per-component tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_defense(self) -> bool {
        Self::DEFENSES.contains(&self)
    }

    /// Whether this component has one slot per floor.
    pub fn is_per_floor(self) -> bool {
        Self::FLOOR_SET.contains(&self)
    }

    /// Number of slots this component occupies in a building with `floors` floors.
    pub fn slot_count(self, floors: usize) -> usize {
        if self.is_per_floor() {
            floors
        } else {
            1
        }
    }

    /// Whether material changes to this component are priced per unit of floor area.
    pub fn scales_with_area(self) -> bool {
        self != ComponentKind::LightningRod
    }

    /// Whether repairs to this component are priced per unit of floor area.
    pub fn repair_scales_with_area(self) -> bool {
        !self.is_defense()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Roof => "roof",
            ComponentKind::Walls => "walls",
            ComponentKind::Pillars => "pillars",
            ComponentKind::Beams => "beams",
            ComponentKind::Floor => "floor",
            ComponentKind::Glass => "glass",
            ComponentKind::Foundations => "foundations",
            ComponentKind::LightningRod => "lightningRod",
            ComponentKind::WindDampers => "windDampers",
            ComponentKind::TsunamiBarriers => "tsunamiBarriers",
            ComponentKind::SeismicDampers => "seismicDampers",
        }
    }
}

/// Material quality tier. Only `Empty` carries a guaranteed meaning
/// (zero resistance, zero cost).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaterialTier {
    #[default]
    Empty,
    Weak,
    Medium,
    Strong,
}

impl MaterialTier {
    pub const ALL: [MaterialTier; 4] = [
        MaterialTier::Empty,
        MaterialTier::Weak,
        MaterialTier::Medium,
        MaterialTier::Strong,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MaterialTier::Empty => "empty",
            MaterialTier::Weak => "weak",
            MaterialTier::Medium => "medium",
            MaterialTier::Strong => "strong",
        }
    }
}

/// Natural disaster kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisasterKind {
    Earthquake,
    Hurricane,
    Tsunami,
    LightningStorm,
}

impl DisasterKind {
    pub const ALL: [DisasterKind; 4] = [
        DisasterKind::Earthquake,
        DisasterKind::Hurricane,
        DisasterKind::Tsunami,
        DisasterKind::LightningStorm,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The single-slot defense component that absorbs this disaster's power.
    pub fn defense(self) -> ComponentKind {
        match self {
            DisasterKind::Earthquake => ComponentKind::SeismicDampers,
            DisasterKind::Hurricane => ComponentKind::WindDampers,
            DisasterKind::Tsunami => ComponentKind::TsunamiBarriers,
            DisasterKind::LightningStorm => ComponentKind::LightningRod,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisasterKind::Earthquake => "earthquake",
            DisasterKind::Hurricane => "hurricane",
            DisasterKind::Tsunami => "tsunami",
            DisasterKind::LightningStorm => "lightningStorm",
        }
    }
}

/// Simulation phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "wave_1")]
    Wave1,
    #[serde(rename = "repair_1")]
    Repair1,
    #[serde(rename = "wave_2")]
    Wave2,
    #[serde(rename = "repair_2")]
    Repair2,
    #[serde(rename = "wave_3")]
    Wave3,
    #[serde(rename = "results")]
    Results,
}

impl Phase {
    /// The wave phase for a 1-based wave number.
    pub fn wave(number: u8) -> Option<Phase> {
        match number {
            1 => Some(Phase::Wave1),
            2 => Some(Phase::Wave2),
            3 => Some(Phase::Wave3),
            _ => None,
        }
    }

    /// The repair phase following a 1-based wave number. There is no repair after the last wave.
    pub fn repair(number: u8) -> Option<Phase> {
        match number {
            1 => Some(Phase::Repair1),
            2 => Some(Phase::Repair2),
            _ => None,
        }
    }

    /// Wave number carried by a `wave_N` or `repair_N` phase.
    pub fn wave_number(self) -> Option<u8> {
        match self {
            Phase::Wave1 | Phase::Repair1 => Some(1),
            Phase::Wave2 | Phase::Repair2 => Some(2),
            Phase::Wave3 => Some(3),
            Phase::Idle | Phase::Results => None,
        }
    }

    pub fn is_wave(self) -> bool {
        matches!(self, Phase::Wave1 | Phase::Wave2 | Phase::Wave3)
    }

    pub fn is_repair(self) -> bool {
        matches!(self, Phase::Repair1 | Phase::Repair2)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Wave1 => "wave_1",
            Phase::Repair1 => "repair_1",
            Phase::Wave2 => "wave_2",
            Phase::Repair2 => "repair_2",
            Phase::Wave3 => "wave_3",
            Phase::Results => "results",
        }
    }
}

/// A selectable level of the building in the construction view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "camelCase")]
pub enum Level {
    Roof,
    Floor(usize),
    Foundation,
}

impl Level {
    /// Concrete floor index, if this level is a real floor.
    pub fn floor_index(self) -> Option<usize> {
        match self {
            Level::Floor(index) => Some(index),
            Level::Roof | Level::Foundation => None,
        }
    }
}

/// Final outcome classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Aggregate health fell below the collapse threshold.
    Collapsed,
    /// Survived all waves with aggregate above 75.
    Minimal,
    /// Survived all waves with aggregate above 50.
    Significant,
    /// Survived all waves but at or below 50.
    Severe,
}

/// Display band for a health value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    Good,
    Fair,
    Critical,
}

impl HealthBand {
    pub fn from_health(health: f64) -> Self {
        if health > 70.0 {
            Self::Good
        } else if health > 30.0 {
            Self::Fair
        } else {
            Self::Critical
        }
    }
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    /// A rejected player action.
    Warning,
    /// The structure collapsed.
    Critical,
}
