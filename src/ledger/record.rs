//! The persisted record of one finished match.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::core::Seat;
use crate::score::{MatchOutcome, MatchResult};

/// Opaque unique id for a persisted record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Draw a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One finished match, as stored in the history ledger.
///
/// The winner is stored outright. Display labels derive from it via
/// [`GameScore::result_for`], so the history list always agrees with
/// what the end screen announced, including tie-breaker finishes where
/// raw scores alone would mislead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScore {
    /// Unique record id.
    pub id: RecordId,
    /// When the match finished, unix milliseconds.
    pub played_at_ms: u64,
    /// Target the match was played to.
    pub target: u32,
    /// The user's final score.
    pub user_score: u32,
    /// The computer's final score.
    pub computer_score: u32,
    /// The seat that took the match.
    pub winner: Seat,
}

impl GameScore {
    /// Build a record for a finished match, stamped with a fresh id
    /// and the current time.
    #[must_use]
    pub fn new(target: u32, user_score: u32, computer_score: u32, winner: Seat) -> Self {
        Self {
            id: RecordId::new(),
            played_at_ms: now_ms(),
            target,
            user_score,
            computer_score,
            winner,
        }
    }

    /// Build a record from a settled outcome.
    #[must_use]
    pub fn from_outcome(outcome: &MatchOutcome) -> Self {
        Self::new(
            outcome.target,
            outcome.user_score,
            outcome.computer_score,
            outcome.winner,
        )
    }

    /// This record's result from one seat's point of view.
    #[must_use]
    pub fn result_for(&self, seat: Seat) -> MatchResult {
        if self.winner == seat {
            MatchResult::Win
        } else {
            MatchResult::Lose
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
