//! Core engine types: seats, dice, state, commands, RNG, configuration.
//!
//! This module contains the fundamental building blocks of a duel.
//! Everything here is data and small mutators; turn orchestration lives
//! in `turn` and composition in `engine`.

pub mod seat;
pub mod rng;
pub mod dice;
pub mod config;
pub mod command;
pub mod state;

pub use seat::{Seat, SeatMap};
pub use rng::{DiceRng, DiceRngState};
pub use dice::{DiceIndices, DiceSet, Face, DICE_COUNT};
pub use config::{
    MatchConfig, Pacing, PolicyConfig, DEFAULT_REROLLS, DEFAULT_TARGET, SUGGESTED_TARGETS,
};
pub use command::{Command, Rejection};
pub use state::{MatchState, SideState, Snapshot, TurnState};
