//! Outcome classification and the top-five score board.

use sismotower_core::config::GameRules;
use sismotower_core::constants::{
    OUTCOME_MINIMAL_ABOVE, OUTCOME_SIGNIFICANT_ABOVE, SCORE_BOARD_CAPACITY, WAVE_COUNT,
};
use sismotower_core::enums::{DisasterKind, Outcome};
use sismotower_core::error::SimError;
use sismotower_core::state::ScoreRecord;

/// Outcome of a building that stood through every wave.
pub fn classify_survivor(aggregate: f64) -> Outcome {
    if aggregate > OUTCOME_MINIMAL_ABOVE {
        Outcome::Minimal
    } else if aggregate > OUTCOME_SIGNIFICANT_ABOVE {
        Outcome::Significant
    } else {
        Outcome::Severe
    }
}

/// Result line shown on the results screen.
pub fn outcome_message(outcome: Outcome, aggregate: f64) -> String {
    let text = match outcome {
        Outcome::Collapsed => "Total collapse! The structure did not withstand the disaster.",
        Outcome::Minimal => "The building resisted bravely with minimal damage!",
        Outcome::Significant => {
            "The building suffered significant damage but remained standing."
        }
        Outcome::Severe => "The structure was severely compromised! Risk of collapse.",
    };
    format!("{text} (Integrity: {}%)", aggregate.round() as i64)
}

/// What follows a resolved wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveTransition {
    /// Aggregate fell below the collapse threshold; results follow after a delay.
    Collapse,
    /// The last wave resolved with the building standing.
    Final(Outcome),
    /// Enter the repair phase after this wave.
    Repair,
}

impl WaveTransition {
    /// Collapse takes precedence over the final-wave check.
    pub fn decide(aggregate: f64, wave: u8, rules: &GameRules) -> Self {
        if aggregate < rules.collapse_threshold {
            WaveTransition::Collapse
        } else if wave >= WAVE_COUNT {
            WaveTransition::Final(classify_survivor(aggregate))
        } else {
            WaveTransition::Repair
        }
    }
}

/// A finished run waiting for a player name.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCandidate {
    pub integrity: f64,
    pub cost: f64,
    pub disasters: Vec<DisasterKind>,
}

impl ScoreCandidate {
    pub fn into_record(self, player_name: String, timestamp: u64) -> ScoreRecord {
        ScoreRecord {
            player_name,
            integrity: self.integrity,
            cost: self.cost,
            disasters: self.disasters,
            timestamp,
        }
    }
}

/// Trim and upper-case a player name. Empty names are rejected.
pub fn normalize_player_name(name: &str) -> Result<String, SimError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SimError::InvalidPlayerName);
    }
    Ok(trimmed.to_uppercase())
}

/// Saved scores, newest first, capped at five.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBoard {
    records: Vec<ScoreRecord>,
}

impl ScoreBoard {
    /// Board from previously stored records; anything past capacity is dropped.
    pub fn from_records(mut records: Vec<ScoreRecord>) -> Self {
        records.truncate(SCORE_BOARD_CAPACITY);
        Self { records }
    }

    pub fn push(&mut self, record: ScoreRecord) {
        self.records.insert(0, record);
        self.records.truncate(SCORE_BOARD_CAPACITY);
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, timestamp: u64) -> ScoreRecord {
        ScoreCandidate {
            integrity: 50.0,
            cost: 1000.0,
            disasters: vec![DisasterKind::Hurricane],
        }
        .into_record(name.to_string(), timestamp)
    }

    #[test]
    fn test_classify_thresholds_are_strict() {
        assert_eq!(classify_survivor(75.1), Outcome::Minimal);
        assert_eq!(classify_survivor(75.0), Outcome::Significant);
        assert_eq!(classify_survivor(50.0), Outcome::Severe);
    }

    #[test]
    fn test_messages_embed_rounded_integrity() {
        assert_eq!(
            outcome_message(Outcome::Collapsed, 19.9),
            "Total collapse! The structure did not withstand the disaster. (Integrity: 20%)"
        );
        assert_eq!(
            outcome_message(Outcome::Significant, 62.4),
            "The building suffered significant damage but remained standing. (Integrity: 62%)"
        );
    }

    #[test]
    fn test_transition_collapse_wins_over_final() {
        let rules = GameRules::default();
        assert_eq!(WaveTransition::decide(19.9, 3, &rules), WaveTransition::Collapse);
        assert_eq!(WaveTransition::decide(19.9, 1, &rules), WaveTransition::Collapse);
        assert_eq!(WaveTransition::decide(20.0, 1, &rules), WaveTransition::Repair);
        assert_eq!(
            WaveTransition::decide(90.0, 3, &rules),
            WaveTransition::Final(Outcome::Minimal)
        );
    }

    #[test]
    fn test_player_name_normalized() {
        assert_eq!(normalize_player_name("  ada l. ").unwrap(), "ADA L.");
        assert_eq!(
            normalize_player_name("   ").unwrap_err(),
            SimError::InvalidPlayerName
        );
    }

    #[test]
    fn test_board_newest_first_capped() {
        let mut board = ScoreBoard::default();
        for i in 0..6 {
            board.push(record(&format!("P{i}"), i));
        }
        assert_eq!(board.len(), 5);
        let names: Vec<&str> = board
            .records()
            .iter()
            .map(|r| r.player_name.as_str())
            .collect();
        assert_eq!(names, vec!["P5", "P4", "P3", "P2", "P1"]);
    }

    #[test]
    fn test_board_from_oversized_store() {
        let records = (0..8).map(|i| record("X", i)).collect();
        assert_eq!(ScoreBoard::from_records(records).len(), 5);
    }
}
