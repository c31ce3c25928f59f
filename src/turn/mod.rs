//! Turn flow: the step queue and the controller that drives it.

pub mod controller;
pub mod sequencer;

pub use controller::{StepOutcome, TurnController};
pub use sequencer::{CancelToken, Sequencer, Step, TimedStep};
