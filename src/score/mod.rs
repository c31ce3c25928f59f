//! End-of-match judgement and outcome types.
//!
//! `evaluate` judges the scores after each level round; `outcome` holds
//! what a decided match looks like to observers and the history ledger.

pub mod evaluate;
pub mod outcome;

pub use evaluate::{evaluate, Verdict};
pub use outcome::{MatchOutcome, MatchResult};
