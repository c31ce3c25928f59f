//! The engine facade: one object that owns a duel end to end.
//!
//! Presentation issues commands, pumps timed steps, and re-renders
//! from snapshots and the event feed. Nothing else mutates match
//! state.
//!
//! ## Driving a match
//!
//! ```
//! use dice_duel::core::{MatchConfig, Pacing, TurnState};
//! use dice_duel::engine::GameEngine;
//!
//! let config = MatchConfig::new(100).with_seed(7).with_pacing(Pacing::instant());
//! let mut engine = GameEngine::in_memory(config);
//!
//! engine.roll_dice().unwrap();
//! engine.run_pending();
//! assert_eq!(engine.state().turn, TurnState::UserDeciding);
//!
//! engine.bank_round().unwrap();
//! engine.run_pending();
//! // The computer has answered with its own round by now.
//! assert!(engine.state().side(dice_duel::core::Seat::Computer).score > 0);
//! ```
//!
//! A paced host sleeps [`GameEngine::next_delay`] between
//! [`GameEngine::step`] calls instead of draining the queue; the match
//! plays out identically.

use std::time::Duration;

use im::Vector;
use tracing::{debug, info, warn};

use crate::ai::RerollPolicy;
use crate::core::{
    Command, DiceRng, MatchConfig, MatchState, Rejection, Seat, Snapshot, TurnState,
};
use crate::ledger::{GameScore, HistoryStore, MatchLedger, MemoryStore};
use crate::score::{evaluate, MatchOutcome, Verdict};
use crate::turn::{CancelToken, Sequencer, StepOutcome, TurnController};

use super::events::{EngineEvent, EventLog, EventRecord};

/// A two-player dice duel: user versus scripted computer opponent.
///
/// Owns the match state, the dice RNG, the step queue and the history
/// ledger. Constructed once per session; matches start and end within
/// it without rebuilding.
pub struct GameEngine {
    config: MatchConfig,
    state: MatchState,
    rng: DiceRng,
    controller: TurnController,
    sequencer: Sequencer,
    ledger: MatchLedger,
    events: EventLog,
}

impl GameEngine {
    /// Create an engine with the given configuration and history
    /// backend.
    ///
    /// The ledger loads here, once. The engine starts idle at
    /// `config.target`, ready for the user's first throw; `start_match`
    /// is only needed to switch targets or wipe a match.
    #[must_use]
    pub fn new(config: MatchConfig, store: impl HistoryStore + 'static) -> Self {
        let rng = match config.seed {
            Some(seed) => DiceRng::new(seed),
            None => DiceRng::from_entropy(),
        };
        let controller = TurnController::new(config.pacing, RerollPolicy::new(config.policy));
        let state = MatchState::new(config.target, config.rerolls_per_round);
        let ledger = MatchLedger::open(Box::new(store));
        info!(
            target = config.target,
            seed = rng.seed(),
            history = ledger.len(),
            "engine ready"
        );
        Self {
            config,
            state,
            rng,
            controller,
            sequencer: Sequencer::new(),
            ledger,
            events: EventLog::new(),
        }
    }

    /// Engine with no durable history, for tests and throwaway play.
    #[must_use]
    pub fn in_memory(config: MatchConfig) -> Self {
        Self::new(config, MemoryStore::new())
    }

    // === Commands ===

    /// Dispatch a single command.
    pub fn apply(&mut self, command: Command) -> Result<(), Rejection> {
        match command {
            Command::StartMatch { target } => self.start_match(target),
            Command::RollDice => self.roll_dice(),
            Command::RerollDie { index } => self.reroll_die(index),
            Command::BankRound => self.bank_round(),
            Command::QuitMatch => {
                self.quit_match();
                Ok(())
            }
            Command::ResetMatch => {
                self.reset_match();
                Ok(())
            }
            Command::ClearHistory => {
                self.clear_history();
                Ok(())
            }
        }
    }

    /// Begin a fresh match at the given target score.
    ///
    /// Legal from any state; an in-flight match is discarded, pending
    /// steps and all. Targets below 1 are rejected.
    pub fn start_match(&mut self, target: u32) -> Result<(), Rejection> {
        if target < 1 {
            return Err(Rejection::InvalidTarget { target });
        }
        self.sequencer.rearm();
        self.config.target = target;
        self.state.reset(target);
        info!(target, "match started");
        self.events.emit(EngineEvent::MatchStarted { target });
        Ok(())
    }

    /// Throw the user's full pool.
    pub fn roll_dice(&mut self) -> Result<(), Rejection> {
        self.controller
            .roll_dice(&mut self.state, &mut self.sequencer, &mut self.events)
    }

    /// Re-throw one of the user's dice.
    pub fn reroll_die(&mut self, index: usize) -> Result<(), Rejection> {
        self.controller
            .reroll_die(&mut self.state, &mut self.sequencer, &mut self.events, index)
    }

    /// Bank the user's pool, closing the user's round.
    ///
    /// The computer's turn (or end-of-match evaluation) follows through
    /// the step queue.
    pub fn bank_round(&mut self) -> Result<(), Rejection> {
        self.controller.bank_round(&mut self.state, &mut self.events)?;
        self.resolve_round();
        Ok(())
    }

    /// Abandon the current match without a result.
    ///
    /// Pending steps are dropped unapplied and nothing is persisted.
    /// The engine returns to idle at the current target.
    pub fn quit_match(&mut self) {
        debug!("match abandoned");
        self.sequencer.rearm();
        self.state.reset(self.state.target);
        self.events.emit(EngineEvent::MatchQuit);
    }

    /// Wipe the match back to a fresh start at the current target.
    ///
    /// History is untouched. Pending steps are dropped.
    pub fn reset_match(&mut self) {
        debug!("match reset");
        self.sequencer.rearm();
        self.state.reset(self.state.target);
        self.events.emit(EngineEvent::MatchReset);
    }

    /// Erase the persisted match history.
    ///
    /// The in-memory history always empties. A store failure is
    /// reported through the event feed, not an error return.
    pub fn clear_history(&mut self) {
        match self.ledger.clear() {
            Ok(()) => {
                debug!("history cleared");
                self.events.emit(EngineEvent::HistoryCleared);
            }
            Err(err) => {
                warn!(error = %err, "failed to clear persisted history");
                self.events.emit(EngineEvent::HistoryPersistFailed);
            }
        }
    }

    // === Step pump ===

    /// Gap a paced host should leave before the next [`step`] call.
    ///
    /// `None` when nothing is pending. The gaps carry no game-state
    /// semantics; ignoring them changes nothing but presentation.
    ///
    /// [`step`]: GameEngine::step
    #[must_use]
    pub fn next_delay(&self) -> Option<Duration> {
        self.sequencer.next_pause()
    }

    /// Run one queued step, if any. Returns whether progress was made.
    ///
    /// A cancelled match is abandoned here, with every pending step
    /// discarded unapplied. The flag is read after the pop, not before:
    /// a cancel landing mid-pump drains the queue, and the abort has to
    /// resolve in the same call because a drained queue reports no
    /// delay and a paced host stops pumping.
    pub fn step(&mut self) -> bool {
        let next = self.sequencer.take_next();
        if self.sequencer.is_cancelled() {
            debug!("cancellation observed");
            self.quit_match();
            return true;
        }
        let Some(timed) = next else {
            return false;
        };
        let outcome = self.controller.execute(
            &mut self.state,
            &mut self.rng,
            &mut self.sequencer,
            &mut self.events,
            timed.step,
        );
        if let StepOutcome::Banked(_) = outcome {
            self.resolve_round();
        }
        true
    }

    /// Drain the step queue at zero delay.
    pub fn run_pending(&mut self) {
        while self.step() {}
    }

    // === Observation ===

    /// The live match state, read-only.
    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// A point-in-time copy of the match plus the event cursor.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.events.next_seq())
    }

    /// All recorded matches, oldest first. O(1) to take.
    #[must_use]
    pub fn history(&self) -> Vector<GameScore> {
        self.ledger.records()
    }

    /// The history ledger itself, for summaries and lookups.
    #[must_use]
    pub fn ledger(&self) -> &MatchLedger {
        &self.ledger
    }

    /// Events at or after the given sequence number.
    #[must_use]
    pub fn events_since(&self, seq: u64) -> Vector<EventRecord> {
        self.events.since(seq)
    }

    /// Token that lets another thread abandon the match between steps.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.sequencer.cancel_token()
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Seed the dice RNG runs on. Replay a match by building an engine
    /// with the same seed and command sequence.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    // === Round resolution ===

    /// Judge the scores after a banked round and steer the match.
    fn resolve_round(&mut self) {
        debug_assert_eq!(self.state.turn, TurnState::RoundEvaluation);
        let verdict = evaluate(&self.state);
        debug!(?verdict, "round judged");
        match verdict {
            Verdict::NotYet => {
                // The user banked first; the computer still owes its round.
                debug_assert_eq!(self.state.active, Seat::Computer);
                self.controller
                    .begin_computer_turn(&mut self.state, &mut self.sequencer);
            }
            Verdict::Continue | Verdict::StillTied => {
                self.state.turn = self.state.idle_turn();
            }
            Verdict::TieBreaker => {
                // Level at the target. Sudden death: counters restart,
                // scores keep accumulating.
                self.state.tie_breaker = true;
                self.state.side_mut(Seat::User).rounds_completed = 0;
                self.state.side_mut(Seat::Computer).rounds_completed = 0;
                self.state.turn = TurnState::TieBreakerActive;
                info!("scores level at the target, tie-breaker begins");
                self.events.emit(EngineEvent::TieBreakerStarted);
            }
            Verdict::Decided(winner) => self.finalize(winner),
        }
    }

    /// Settle the match: fix the outcome, record it, go terminal.
    fn finalize(&mut self, winner: Seat) {
        let outcome = MatchOutcome {
            winner,
            target: self.state.target,
            user_score: self.state.side(Seat::User).score,
            computer_score: self.state.side(Seat::Computer).score,
            via_tie_breaker: self.state.tie_breaker,
        };
        info!(
            winner = %winner,
            user = outcome.user_score,
            computer = outcome.computer_score,
            tie_breaker = outcome.via_tie_breaker,
            "match decided"
        );
        self.state.outcome = Some(outcome);
        self.state.tie_breaker = false;
        self.state.turn = TurnState::GameOver;

        if let Err(err) = self.ledger.append(GameScore::from_outcome(&outcome)) {
            warn!(error = %err, "failed to persist match record");
            self.events.emit(EngineEvent::HistoryPersistFailed);
        }
        self.events.emit(EngineEvent::MatchEnded { outcome });
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("turn", &self.state.turn)
            .field("target", &self.state.target)
            .field("seed", &self.rng.seed())
            .finish()
    }
}
