//! Simulation constants and damage-model tuning parameters.
//!
//! Values that a deployment may want to change (floor count, area range,
//! intensities, delays) live in [`crate::config::GameRules`] instead.

/// Health of an undamaged slot.
pub const MAX_HEALTH: f64 = 100.0;

/// Number of waves in a run. Fixed by the `Phase` enum.
pub const WAVE_COUNT: u8 = 3;

/// Repair cost per health point is `unit_cost / REPAIR_COST_DIVISOR`
/// (a full 100-point repair costs half the material's price).
pub const REPAIR_COST_DIVISOR: f64 = 200.0;

/// Maximum number of persisted score records.
pub const SCORE_BOARD_CAPACITY: usize = 5;

// --- Outcome thresholds ---

/// Aggregate above which the final outcome is "minimal damage".
pub const OUTCOME_MINIMAL_ABOVE: f64 = 75.0;

/// Aggregate above which the final outcome is "significant damage".
pub const OUTCOME_SIGNIFICANT_ABOVE: f64 = 50.0;

// --- Lightning storm ---

/// The lightning rod takes this multiple of the power it failed to absorb.
pub const LIGHTNING_ROD_DAMAGE_FACTOR: f64 = 2.0;

/// Roof damage multiplier applied to the effective lightning power.
pub const LIGHTNING_ROOF_FACTOR: f64 = 1.2;

/// Number of floors, counted from the top, reached by a strike.
pub const LIGHTNING_FLOOR_SPAN: usize = 2;

/// Per-floor falloff: multiplier is `1 / (distance_from_top * FALLOFF + 1)`.
pub const LIGHTNING_FLOOR_FALLOFF: f64 = 1.5;

/// Per-component divisors for lightning damage on the top floors.
pub const LIGHTNING_DIVISOR_BEAMS: f64 = 1.25;
pub const LIGHTNING_DIVISOR_WALLS: f64 = 1.5;
pub const LIGHTNING_DIVISOR_GLASS: f64 = 2.0;
pub const LIGHTNING_DIVISOR_PILLARS: f64 = 1.2;
pub const LIGHTNING_DIVISOR_FLOOR: f64 = 1.8;

// --- Tsunami ---

pub const TSUNAMI_FOUNDATIONS_FACTOR: f64 = 2.0;

/// Slots with an index below this are flooded.
pub const TSUNAMI_LOW_FLOOR_LIMIT: usize = 3;

pub const TSUNAMI_LOW_FLOOR_FACTOR: f64 = 1.8;
pub const TSUNAMI_HIGH_FLOOR_FACTOR: f64 = 0.3;

// --- Earthquake ---

/// Multiplier at the middle floor.
pub const EARTHQUAKE_PEAK_FACTOR: f64 = 1.5;

/// Multiplier lost per floor of distance from the middle.
pub const EARTHQUAKE_FALLOFF_PER_FLOOR: f64 = 0.3;

pub const EARTHQUAKE_FOUNDATIONS_FACTOR: f64 = 1.4;

// --- Hurricane ---

pub const HURRICANE_ROOF_FACTOR: f64 = 1.6;

/// Multiplier at the ground floor; rises linearly by 1.0 up to the top floor.
pub const HURRICANE_BASE_FACTOR: f64 = 0.5;
