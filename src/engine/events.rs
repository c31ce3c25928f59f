//! Engine events: the append-only feed observers subscribe to.
//!
//! Every state change of interest is appended here with a dense
//! sequence number. Hosts that poll snapshots can ignore this feed
//! entirely; event-driven hosts fetch everything after the last
//! sequence number they saw and animate from that. The feed lives for
//! the lifetime of the engine, so sequence numbers stay monotonic
//! across restarts and new matches within a session.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{DiceSet, Face, Seat};
use crate::score::MatchOutcome;

/// Something observable that happened inside the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A fresh match began at the given target.
    MatchStarted { target: u32 },
    /// A throw or reroll went in flight for a seat.
    RollStarted { seat: Seat },
    /// A full-pool throw landed.
    DiceRolled { seat: Seat, dice: DiceSet },
    /// The user's single-die reroll landed.
    DieRerolled { seat: Seat, index: usize, face: Face },
    /// The computer's multi-die reroll landed.
    DiceRerolled {
        seat: Seat,
        count: usize,
        dice: DiceSet,
    },
    /// A seat banked its pool.
    RoundBanked { seat: Seat, banked: u32, total: u32 },
    /// Scores finished level at the target; sudden death begins.
    TieBreakerStarted,
    /// The match was decided.
    MatchEnded { outcome: MatchOutcome },
    /// The match was abandoned without a result.
    MatchQuit,
    /// The match was wiped back to a fresh start.
    MatchReset,
    /// All persisted records were erased.
    HistoryCleared,
    /// A history write failed; records remain in memory.
    HistoryPersistFailed,
}

/// An event plus its position in the feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Dense sequence number, starting at 0.
    pub seq: u64,
    /// The event.
    pub event: EngineEvent,
}

/// Append-only event feed.
///
/// Backed by `im::Vector`, so observers get O(1) clones of any suffix
/// instead of copying the feed.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    records: Vector<EventRecord>,
    next_seq: u64,
}

impl EventLog {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, assigning it the next sequence number.
    pub fn emit(&mut self, event: EngineEvent) -> u64 {
        let seq = self.next_seq;
        debug!(seq, ?event, "engine event");
        self.records.push_back(EventRecord { seq, event });
        self.next_seq += 1;
        seq
    }

    /// Sequence number the next event will carry.
    #[must_use]
    pub const fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Everything at or after the given sequence number.
    ///
    /// `since(0)` is the whole feed. A cursor at `next_seq()` yields
    /// nothing until more events land.
    #[must_use]
    pub fn since(&self, seq: u64) -> Vector<EventRecord> {
        // Dense numbering makes the seq its own index.
        let start = (seq.min(self.next_seq)) as usize;
        self.records.clone().split_off(start)
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
