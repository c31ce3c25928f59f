//! Match state: everything observable about a duel in progress.
//!
//! ## TurnState
//!
//! The single authoritative phase of the match. Exactly one variant is
//! active at any instant; every command and automated step is legal in
//! some states and rejected in all others.
//!
//! ## SideState
//!
//! Per-seat data: banked score, last thrown dice, reroll budget,
//! round counter.
//!
//! ## MatchState
//!
//! The live mutable state. Cheap to clone, so [`Snapshot`] is just a
//! captured copy plus the event cursor at capture time.

use serde::{Deserialize, Serialize};

use super::dice::DiceSet;
use super::seat::{Seat, SeatMap};
use crate::score::MatchOutcome;

/// The phase of a duel.
///
/// Transitions are owned by the turn controller; nothing else writes
/// this value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    /// Waiting for the user to throw the full pool.
    UserTurnIdle,
    /// The user's full-pool throw is in flight.
    UserRolling,
    /// The user has thrown and may reroll single dice or bank.
    UserDeciding,
    /// The computer's scripted turn is running.
    ComputerTurnRunning,
    /// Both seats have finished the round; scores are being judged.
    RoundEvaluation,
    /// Scores were level at the target. Sudden-death rounds, user first.
    TieBreakerActive,
    /// A winner has been decided. Only reset or a new match leave this.
    GameOver,
}

impl TurnState {
    /// Whether the match has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, TurnState::GameOver)
    }
}

/// One seat's data within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideState {
    /// Total banked so far.
    pub score: u32,
    /// Faces from this seat's most recent throw.
    pub dice: DiceSet,
    /// Rerolls left in the current round.
    pub rerolls_remaining: u8,
    /// Whether this seat has thrown the pool this round.
    pub has_thrown: bool,
    /// Rounds this seat has banked.
    pub rounds_completed: u32,
}

impl SideState {
    /// A seat before its first throw.
    #[must_use]
    pub fn new(rerolls: u8) -> Self {
        Self {
            score: 0,
            dice: DiceSet::new(),
            rerolls_remaining: rerolls,
            has_thrown: false,
            rounds_completed: 0,
        }
    }

    /// Restore the round-scoped fields for the next round.
    ///
    /// Score, dice faces and the round counter persist between rounds;
    /// only the throw flag and reroll budget reset.
    pub fn begin_round(&mut self, rerolls: u8) {
        self.has_thrown = false;
        self.rerolls_remaining = rerolls;
    }
}

/// The live state of a duel.
///
/// ## Invariants
///
/// - `rolling` is true only while a user throw or reroll is in flight
///   (`UserRolling`, or a pending single-die reroll in `UserDeciding`).
///   The computer's throws land atomically when their step runs, so
///   they never set it.
/// - `outcome` is `Some` exactly when `turn` is [`TurnState::GameOver`].
/// - Round counters never differ by more than one, user leading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    // === Configuration ===
    rerolls_per_round: u8,

    /// Score a seat must reach before evaluation can end the match.
    pub target: u32,

    // === Progression ===
    /// Current phase.
    pub turn: TurnState,

    /// Seat whose turn it is.
    pub active: Seat,

    /// A throw or reroll is in flight.
    pub rolling: bool,

    /// Sudden-death mode entered after a level finish at the target.
    pub tie_breaker: bool,

    // === Seats ===
    /// Per-seat data.
    pub sides: SeatMap<SideState>,

    /// Final outcome, set once when the match ends.
    pub outcome: Option<MatchOutcome>,
}

impl MatchState {
    /// Create a fresh match at the given target.
    ///
    /// ## Defaults
    ///
    /// - `turn`: [`TurnState::UserTurnIdle`] (user throws first)
    /// - `active`: [`Seat::User`]
    /// - all dice resting on 1, full reroll budgets
    ///
    /// Panics if `target` is zero.
    #[must_use]
    pub fn new(target: u32, rerolls_per_round: u8) -> Self {
        assert!(target >= 1, "Target score must be at least 1");
        Self {
            rerolls_per_round,
            target,
            turn: TurnState::UserTurnIdle,
            active: Seat::User,
            rolling: false,
            tie_breaker: false,
            sides: SeatMap::new(|_| SideState::new(rerolls_per_round)),
            outcome: None,
        }
    }

    /// Rerolls granted to each seat per round.
    #[must_use]
    pub const fn rerolls_per_round(&self) -> u8 {
        self.rerolls_per_round
    }

    /// One seat's data.
    #[must_use]
    pub fn side(&self, seat: Seat) -> &SideState {
        &self.sides[seat]
    }

    /// One seat's data, mutably.
    pub fn side_mut(&mut self, seat: Seat) -> &mut SideState {
        &mut self.sides[seat]
    }

    /// Bank the active pool for a seat.
    ///
    /// Adds the dice sum to the seat's score, closes its round and
    /// restores the round-scoped fields. Returns the banked amount.
    pub fn bank(&mut self, seat: Seat) -> u32 {
        let rerolls = self.rerolls_per_round;
        let side = &mut self.sides[seat];
        let banked = side.dice.sum();
        side.score += banked;
        side.rounds_completed += 1;
        side.begin_round(rerolls);
        banked
    }

    /// Whether both seats have banked the same number of rounds.
    ///
    /// Evaluation only runs on level rounds; the user leads by one in
    /// between.
    #[must_use]
    pub fn rounds_level(&self) -> bool {
        self.sides[Seat::User].rounds_completed == self.sides[Seat::Computer].rounds_completed
    }

    /// The idle state a new user round starts from.
    #[must_use]
    pub const fn idle_turn(&self) -> TurnState {
        if self.tie_breaker {
            TurnState::TieBreakerActive
        } else {
            TurnState::UserTurnIdle
        }
    }

    /// Whether the match is still being played.
    #[must_use]
    pub const fn in_progress(&self) -> bool {
        !self.turn.is_terminal()
    }

    /// Wipe everything back to a fresh match at the given target.
    pub fn reset(&mut self, target: u32) {
        *self = Self::new(target, self.rerolls_per_round);
    }
}

/// A point-in-time copy of the match for observers.
///
/// Captured by the engine on demand. `next_event_seq` is the sequence
/// number the next emitted event will carry, so an observer can fetch
/// exactly the events that happened after this snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// The match state at capture time.
    pub state: MatchState,
    /// Sequence number the next event will carry.
    pub next_event_seq: u64,
}

impl Snapshot {
    /// Capture the given state.
    #[must_use]
    pub fn capture(state: &MatchState, next_event_seq: u64) -> Self {
        Self {
            state: state.clone(),
            next_event_seq,
        }
    }
}
