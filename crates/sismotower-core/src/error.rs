//! Errors returned by simulation operations.
//!
//! Only a few are meant for the player (see [`SimError::is_user_facing`]);
//! the rest describe mutations the engine ignores.

use thiserror::Error;

use crate::enums::{ComponentKind, Phase};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimError {
    #[error("cannot start the simulation with an empty structure; add materials to the building first")]
    InvalidStart,
    #[error("operation not allowed during phase {0:?}")]
    NotInPhase(Phase),
    #[error("a wave resolution is still pending")]
    ResolutionPending,
    #[error("{component:?} has no slot {index}")]
    SlotOutOfRange {
        component: ComponentKind,
        index: usize,
    },
    #[error("material is unchanged")]
    UnchangedMaterial,
    #[error("defense component {0:?} cannot be left without material")]
    EmptyDefense(ComponentKind),
    #[error("clipboard is empty")]
    NoClipboard,
    #[error("selected level is not a floor")]
    NotAFloor,
    #[error("slot is already at full health")]
    AlreadyRepaired,
    #[error("player name must not be empty")]
    InvalidPlayerName,
    #[error("score for this run was already saved")]
    ScoreAlreadySaved,
    #[error("no finished run to score")]
    NoResults,
}

impl SimError {
    /// Whether this error should be reported to the player rather than
    /// silently ignored.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, SimError::InvalidStart | SimError::InvalidPlayerName)
    }
}
