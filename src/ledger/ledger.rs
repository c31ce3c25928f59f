//! In-memory match history mirrored to a storage backend.

use im::Vector;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::core::Seat;

use super::record::GameScore;
use super::store::{HistoryStore, StoreError};

/// Win/loss tally from the user's point of view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

/// Aggregate view over the whole history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistorySummary {
    /// Total matches recorded.
    pub played: usize,
    /// Matches the user took.
    pub user_wins: usize,
    /// Matches the computer took.
    pub computer_wins: usize,
    /// User-perspective tallies keyed by target score.
    pub by_target: FxHashMap<u32, WinLoss>,
}

/// The match history ledger.
///
/// The in-memory record list is authoritative. Every mutation updates
/// memory first and then mirrors the full list to the backing store;
/// a store failure is reported to the caller but never rolls the
/// in-memory change back, so the session keeps a complete history even
/// when the disk does not.
pub struct MatchLedger {
    store: Box<dyn HistoryStore>,
    scores: Vector<GameScore>,
}

impl MatchLedger {
    /// Open the ledger over `store`, loading whatever it holds.
    ///
    /// A store that fails to load starts the ledger empty rather than
    /// failing construction. The next save overwrites whatever was
    /// unreadable.
    #[must_use]
    pub fn open(store: Box<dyn HistoryStore>) -> Self {
        let scores = match store.load() {
            Ok(scores) => scores.into_iter().collect(),
            Err(err) => {
                warn!(error = %err, "could not load match history, starting empty");
                Vector::new()
            }
        };
        Self { store, scores }
    }

    /// Append a finished match and mirror the history to the store.
    ///
    /// On a store failure the record is still retained in memory and
    /// the error is returned for the caller to surface.
    pub fn append(&mut self, score: GameScore) -> Result<(), StoreError> {
        self.scores.push_back(score);
        self.persist()
    }

    /// Drop every record, in memory and in the store.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.scores.clear();
        self.store.clear()
    }

    /// Cheap snapshot of all records, oldest first.
    #[must_use]
    pub fn records(&self) -> Vector<GameScore> {
        self.scores.clone()
    }

    /// Iterate records oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &GameScore> {
        self.scores.iter()
    }

    /// The most recently finished match.
    #[must_use]
    pub fn latest(&self) -> Option<&GameScore> {
        self.scores.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Tally the history into an aggregate summary.
    #[must_use]
    pub fn summary(&self) -> HistorySummary {
        let mut summary = HistorySummary {
            played: self.scores.len(),
            ..HistorySummary::default()
        };
        for score in &self.scores {
            let tally = summary.by_target.entry(score.target).or_default();
            match score.winner {
                Seat::User => {
                    summary.user_wins += 1;
                    tally.wins += 1;
                }
                Seat::Computer => {
                    summary.computer_wins += 1;
                    tally.losses += 1;
                }
            }
        }
        summary
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let scores: Vec<GameScore> = self.scores.iter().copied().collect();
        self.store.save(&scores)
    }
}

impl std::fmt::Debug for MatchLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchLedger")
            .field("records", &self.scores.len())
            .finish()
    }
}
