//! Settled outcomes and their display labels.

use serde::{Deserialize, Serialize};

use crate::core::Seat;

/// The settled result of a finished match.
///
/// Built exactly once, at the moment a winner is decided. Everything a
/// host shows on an end screen is here; the persisted record keeps the
/// same winner so labels never disagree with what was announced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// The seat that took the match.
    pub winner: Seat,
    /// Target the match was played to.
    pub target: u32,
    /// The user's final score.
    pub user_score: u32,
    /// The computer's final score.
    pub computer_score: u32,
    /// Whether sudden-death rounds were needed to separate the seats.
    pub via_tie_breaker: bool,
}

impl MatchOutcome {
    /// The winning seat's final score.
    #[must_use]
    pub const fn winning_score(&self) -> u32 {
        match self.winner {
            Seat::User => self.user_score,
            Seat::Computer => self.computer_score,
        }
    }

    /// This outcome from one seat's point of view.
    #[must_use]
    pub fn result_for(&self, seat: Seat) -> MatchResult {
        if self.winner == seat {
            MatchResult::Win
        } else {
            MatchResult::Lose
        }
    }
}

/// A match result from one seat's point of view.
///
/// Derived from the stored winner, never recomputed from raw scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Lose,
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Win => write!(f, "Win"),
            MatchResult::Lose => write!(f, "Lose"),
        }
    }
}
