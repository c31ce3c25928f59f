//! Match history: records, storage backends, and the ledger that
//! keeps them consistent.
//!
//! ## Architecture
//!
//! [`MatchLedger`] owns an in-memory record list and mirrors it to a
//! [`HistoryStore`] after every change. Memory is authoritative: a
//! failing store degrades persistence, never the session's view of its
//! own history.

mod ledger;
mod record;
mod store;

pub use ledger::{HistorySummary, MatchLedger, WinLoss};
pub use record::{GameScore, RecordId};
pub use store::{FileStore, HistoryStore, MemoryStore, StoreError, HISTORY_FILE};
