//! Host commands and the reasons they get refused.
//!
//! Commands are the only way a host mutates a match on the user's
//! behalf. Each one is validated against the current [`TurnState`] and
//! either applied or answered with a [`Rejection`]. Nothing is silently
//! ignored, so a host can surface every refusal to the player.
//!
//! The computer seat never issues commands. Its turn runs as automated
//! steps inside the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::TurnState;

/// A command issued by the host on behalf of the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Begin a fresh match at the given target score.
    StartMatch { target: u32 },
    /// Throw the full six-die pool.
    RollDice,
    /// Re-throw a single die by pool index.
    RerollDie { index: usize },
    /// Bank the current pool sum and end the user's round.
    BankRound,
    /// Abandon the match without recording a result.
    QuitMatch,
    /// Wipe the match back to a fresh start at the same target.
    ResetMatch,
    /// Erase all persisted match records.
    ClearHistory,
}

/// Why a command was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Rejection {
    /// The computer is playing; user commands wait.
    #[error("not the user's turn")]
    NotYourTurn,

    /// The command is not legal in the current phase.
    #[error("command not legal in state {0:?}")]
    WrongState(TurnState),

    /// A throw or reroll is still in flight.
    #[error("a throw is already in flight")]
    RollInProgress,

    /// The round's reroll budget is spent.
    #[error("no rerolls left this round")]
    NoRerollsLeft,

    /// The die index does not exist in the pool.
    #[error("die index {index} is out of range")]
    DieOutOfRange { index: usize },

    /// Matches cannot start with a zero target.
    #[error("target score must be at least 1, got {target}")]
    InvalidTarget { target: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(Rejection::NotYourTurn.to_string(), "not the user's turn");
        assert_eq!(
            Rejection::WrongState(TurnState::GameOver).to_string(),
            "command not legal in state GameOver"
        );
        assert_eq!(
            Rejection::DieOutOfRange { index: 9 }.to_string(),
            "die index 9 is out of range"
        );
        assert_eq!(
            Rejection::InvalidTarget { target: 0 }.to_string(),
            "target score must be at least 1, got 0"
        );
    }

    #[test]
    fn test_command_equality() {
        assert_eq!(Command::RollDice, Command::RollDice);
        assert_ne!(
            Command::RerollDie { index: 0 },
            Command::RerollDie { index: 1 }
        );
        assert_ne!(
            Command::StartMatch { target: 100 },
            Command::StartMatch { target: 150 }
        );
    }

    #[test]
    fn test_command_serialization() {
        let cmd = Command::RerollDie { index: 3 };
        let json = serde_json::to_string(&cmd).unwrap();
        let decoded: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, decoded);
    }
}
