//! The timed step queue that automated play runs on.
//!
//! The engine never sleeps. Anything that would animate or pause in a
//! host (dice settling, the computer "thinking") is queued here as a
//! [`TimedStep`]: a step plus the gap a host should leave before
//! running it. A host drives the match by asking for the next gap,
//! waiting that long if it cares about presentation, and pumping the
//! step. Headless drivers pass on the waiting and pump in a tight
//! loop; the match plays out identically.
//!
//! ## Cancellation
//!
//! A [`CancelToken`] can be handed to another thread (a UI, a timer).
//! Once cancelled, the queue drains instead of yielding steps and the
//! engine abandons the match on its next pump.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::core::DiceIndices;

/// One automated unit of progress in a match.
///
/// Steps mutate nothing themselves; the turn controller interprets
/// them when pumped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Land the user's full-pool throw.
    FinishUserRoll,
    /// Land the user's pending single-die reroll.
    FinishUserReroll { index: usize },
    /// The computer throws its full pool.
    ComputerRoll,
    /// The computer picks which dice to reroll, or stands pat.
    ComputerDecide,
    /// The computer rerolls the picked dice.
    ComputerReroll { indices: DiceIndices },
    /// The computer banks its pool and ends its round.
    ComputerBank,
}

/// A step plus the gap a host should leave before running it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedStep {
    /// Gap to leave before the step runs.
    pub pause: Duration,
    /// The step itself.
    pub step: Step,
}

/// Shared abort flag for a running match.
///
/// Clones observe the same flag. Cancelling is sticky until the engine
/// re-arms the queue for a new match.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, un-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the match be abandoned.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn rearm(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// FIFO queue of timed steps.
///
/// At most a handful of steps are ever queued; each applied step
/// schedules its successor, so the queue stays shallow.
#[derive(Debug, Default)]
pub struct Sequencer {
    queue: VecDeque<TimedStep>,
    cancel: CancelToken,
}

impl Sequencer {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a step to run after the given gap.
    pub fn schedule(&mut self, pause: Duration, step: Step) {
        self.queue.push_back(TimedStep { pause, step });
    }

    /// The gap before the next step, if one is queued.
    ///
    /// Reports the gap even after cancellation; the host should pump
    /// once more so the engine can observe the abort.
    #[must_use]
    pub fn next_pause(&self) -> Option<Duration> {
        self.queue.front().map(|timed| timed.pause)
    }

    /// Pop the next step to run.
    ///
    /// Returns `None` once the queue is empty, or drains everything and
    /// returns `None` if the match was cancelled.
    pub fn take_next(&mut self) -> Option<TimedStep> {
        if self.cancel.is_cancelled() {
            self.queue.clear();
            return None;
        }
        self.queue.pop_front()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of queued steps.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Drop every queued step without running it.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// A token other threads can use to abandon the match.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Whether the current match was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Clear the queue and un-cancel for a new match.
    ///
    /// Previously handed-out tokens stay connected; a token press from
    /// a finished match no longer aborts the new one.
    pub fn rearm(&mut self) {
        self.queue.clear();
        self.cancel.rearm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_come_back_in_order() {
        let mut seq = Sequencer::new();
        seq.schedule(Duration::from_millis(10), Step::ComputerRoll);
        seq.schedule(Duration::from_millis(20), Step::ComputerDecide);

        assert_eq!(seq.pending_count(), 2);
        assert_eq!(seq.next_pause(), Some(Duration::from_millis(10)));

        let first = seq.take_next().unwrap();
        assert_eq!(first.step, Step::ComputerRoll);

        let second = seq.take_next().unwrap();
        assert_eq!(second.step, Step::ComputerDecide);
        assert_eq!(second.pause, Duration::from_millis(20));

        assert!(seq.take_next().is_none());
        assert!(seq.is_idle());
    }

    #[test]
    fn test_empty_queue_has_no_pause() {
        let seq = Sequencer::new();
        assert_eq!(seq.next_pause(), None);
        assert!(seq.is_idle());
    }

    #[test]
    fn test_cancel_drains_queue() {
        let mut seq = Sequencer::new();
        seq.schedule(Duration::ZERO, Step::ComputerRoll);
        seq.schedule(Duration::ZERO, Step::ComputerDecide);

        let token = seq.cancel_token();
        token.cancel();

        assert!(seq.is_cancelled());
        assert!(seq.take_next().is_none());
        assert!(seq.is_idle());
    }

    #[test]
    fn test_token_clones_share_the_flag() {
        let seq = Sequencer::new();
        let a = seq.cancel_token();
        let b = seq.cancel_token();

        a.cancel();
        assert!(b.is_cancelled());
        assert!(seq.is_cancelled());
    }

    #[test]
    fn test_rearm_clears_cancellation_and_queue() {
        let mut seq = Sequencer::new();
        seq.schedule(Duration::ZERO, Step::ComputerRoll);

        let token = seq.cancel_token();
        token.cancel();
        seq.rearm();

        assert!(!seq.is_cancelled());
        assert!(seq.is_idle());

        // The old token still reaches the re-armed queue
        seq.schedule(Duration::ZERO, Step::ComputerBank);
        token.cancel();
        assert!(seq.take_next().is_none());
    }

    #[test]
    fn test_clear_keeps_cancel_state() {
        let mut seq = Sequencer::new();
        seq.schedule(Duration::ZERO, Step::ComputerRoll);
        seq.clear();

        assert!(seq.is_idle());
        assert!(!seq.is_cancelled());
    }

    #[test]
    fn test_step_serialization() {
        let step = TimedStep {
            pause: Duration::from_millis(350),
            step: Step::ComputerReroll {
                indices: DiceIndices::from_slice(&[0, 2, 5]),
            },
        };

        let json = serde_json::to_string(&step).unwrap();
        let decoded: TimedStep = serde_json::from_str(&json).unwrap();
        assert_eq!(step, decoded);
    }
}
