//! # dice-duel
//!
//! A turn-based dice duel engine: one human seat against a scripted
//! computer opponent, six dice a round, first to a configurable target
//! score. Ends level at the target go to sudden-death tie-breaker
//! rounds.
//!
//! ## Design Principles
//!
//! 1. **Engine Only**: No rendering, input handling, or timers. Hosts
//!    issue commands, pump timed steps, and re-render from snapshots
//!    and the event feed.
//!
//! 2. **Pacing Is Data**: Every pause a host would animate (dice
//!    settling, the computer "thinking") is a queued step with a
//!    suggested delay. Draining the queue at zero delay plays the
//!    identical match, which is how the tests run it.
//!
//! 3. **Deterministic**: All randomness flows through one seeded
//!    ChaCha8 RNG. Same seed and commands, same match.
//!
//! ## Architecture
//!
//! - **Commands vs steps**: user intent is validated synchronously and
//!   either applied or refused with a [`core::Rejection`]; automated
//!   progress (throw landings, the computer's whole turn) runs through
//!   the step queue in `turn`.
//!
//! - **Persistent Data Structures**: snapshots, the event feed and the
//!   history view clone in O(1) via `im-rs`.
//!
//! - **Memory-Authoritative History**: finished matches append to an
//!   in-memory ledger mirrored to storage; a failing disk degrades
//!   persistence, never match state.
//!
//! ## Modules
//!
//! - `core`: seats, dice, RNG, match state, commands, configuration
//! - `ai`: the computer opponent's reroll policy
//! - `turn`: timed step sequencer, cancellation, turn controller
//! - `score`: round judgement, tie-breaker protocol, final outcome
//! - `ledger`: persisted match history and its storage backends
//! - `engine`: the composed engine facade and its event feed

pub mod core;
pub mod ai;
pub mod turn;
pub mod score;
pub mod ledger;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{
    Seat, SeatMap,
    DiceRng, DiceRngState,
    DiceIndices, DiceSet, Face, DICE_COUNT,
    MatchConfig, Pacing, PolicyConfig, DEFAULT_REROLLS, DEFAULT_TARGET, SUGGESTED_TARGETS,
    Command, Rejection,
    MatchState, SideState, Snapshot, TurnState,
};

pub use crate::ai::RerollPolicy;

pub use crate::turn::{
    CancelToken, Sequencer, Step, StepOutcome, TimedStep, TurnController,
};

pub use crate::score::{evaluate, MatchOutcome, MatchResult, Verdict};

pub use crate::ledger::{
    FileStore, GameScore, HistoryStore, HistorySummary, MatchLedger, MemoryStore, RecordId,
    StoreError, WinLoss, HISTORY_FILE,
};

pub use crate::engine::{EngineEvent, EventLog, EventRecord, GameEngine};
