//! Turn orchestration: command legality, transitions, and the
//! computer's scripted turn.
//!
//! ## Commands vs steps
//!
//! User intent arrives as commands (`roll_dice`, `reroll_die`,
//! `bank_round`). A command is validated against the current
//! [`TurnState`] and either refused with a [`Rejection`] or applied.
//! Applying a throw does not land dice. It marks the throw in flight
//! and queues the landing as a [`Step`], so a host can animate the gap.
//!
//! The computer's whole turn is steps: throw, decide, reroll, repeat,
//! bank. Each executed step queues its successor, which is how one
//! shallow queue plays out a full turn.
//!
//! ## State machine
//!
//! ```text
//! UserTurnIdle ──roll──▶ UserRolling ──lands──▶ UserDeciding
//!      ▲                                      reroll │ │ bank
//!      │                                             ▼ ▼
//!      │◀── judged: continue ── RoundEvaluation ◀── ComputerTurnRunning
//!      │                              │ ▲                    ▲
//! TieBreakerActive ◀── judged: tied ──┤ └── user banked ─────┘
//!      │                              ▼
//!      └──roll──▶ (as UserTurnIdle)  GameOver
//! ```
//!
//! Round judgement itself lives in [`crate::score`]; the engine runs
//! it whenever a step reports a banked round.

use tracing::debug;

use crate::ai::RerollPolicy;
use crate::core::{
    DiceRng, MatchState, Pacing, Rejection, Seat, TurnState, DICE_COUNT,
};
use crate::engine::events::{EngineEvent, EventLog};

use super::sequencer::{Sequencer, Step};

/// What an executed step means for the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The turn moved along; nothing to judge yet.
    Progressed,
    /// A seat banked its round. The scores need judging.
    Banked(Seat),
}

/// Validates commands, applies transitions and runs the computer's
/// turn script.
///
/// The controller holds no match data. It borrows [`MatchState`] and
/// friends per call, which keeps it trivially shareable between tests
/// and the engine.
#[derive(Clone, Debug)]
pub struct TurnController {
    pacing: Pacing,
    policy: RerollPolicy,
}

impl TurnController {
    /// Create a controller with the given pacing and opponent policy.
    #[must_use]
    pub const fn new(pacing: Pacing, policy: RerollPolicy) -> Self {
        Self { pacing, policy }
    }

    /// The pause schedule in use.
    #[must_use]
    pub const fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    // === User commands ===

    /// Throw the full pool for the user.
    ///
    /// Legal from [`TurnState::UserTurnIdle`] or
    /// [`TurnState::TieBreakerActive`]. The throw lands when the queued
    /// [`Step::FinishUserRoll`] is pumped.
    pub fn roll_dice(
        &self,
        state: &mut MatchState,
        seq: &mut Sequencer,
        events: &mut EventLog,
    ) -> Result<(), Rejection> {
        self.ensure_user_may_act(state)?;
        if !matches!(
            state.turn,
            TurnState::UserTurnIdle | TurnState::TieBreakerActive
        ) {
            return Err(Rejection::WrongState(state.turn));
        }

        state.turn = TurnState::UserRolling;
        state.rolling = true;
        events.emit(EngineEvent::RollStarted { seat: Seat::User });
        seq.schedule(self.pacing.user_roll, Step::FinishUserRoll);
        Ok(())
    }

    /// Re-throw a single die for the user.
    ///
    /// Legal in [`TurnState::UserDeciding`] while rerolls remain. The
    /// budget is spent when the queued [`Step::FinishUserReroll`]
    /// lands, but a second reroll cannot start while one is in flight.
    pub fn reroll_die(
        &self,
        state: &mut MatchState,
        seq: &mut Sequencer,
        events: &mut EventLog,
        index: usize,
    ) -> Result<(), Rejection> {
        self.ensure_user_may_act(state)?;
        if state.turn != TurnState::UserDeciding {
            return Err(Rejection::WrongState(state.turn));
        }
        if state.side(Seat::User).rerolls_remaining == 0 {
            return Err(Rejection::NoRerollsLeft);
        }
        if index >= DICE_COUNT {
            return Err(Rejection::DieOutOfRange { index });
        }

        state.rolling = true;
        events.emit(EngineEvent::RollStarted { seat: Seat::User });
        seq.schedule(self.pacing.user_reroll, Step::FinishUserReroll { index });
        Ok(())
    }

    /// Bank the user's pool and close the round.
    ///
    /// Legal in [`TurnState::UserDeciding`] once the throw has settled.
    /// Hands the turn to the computer and leaves the match in
    /// [`TurnState::RoundEvaluation`] for the engine to judge.
    pub fn bank_round(
        &self,
        state: &mut MatchState,
        events: &mut EventLog,
    ) -> Result<(), Rejection> {
        self.ensure_user_may_act(state)?;
        if state.turn != TurnState::UserDeciding {
            return Err(Rejection::WrongState(state.turn));
        }

        let banked = state.bank(Seat::User);
        let total = state.side(Seat::User).score;
        debug!(banked, total, "user banked round");
        events.emit(EngineEvent::RoundBanked {
            seat: Seat::User,
            banked,
            total,
        });
        state.active = Seat::Computer;
        state.turn = TurnState::RoundEvaluation;
        Ok(())
    }

    /// Start the computer's scripted turn.
    ///
    /// Called by the engine once judgement says the round continues
    /// with the computer to play.
    pub fn begin_computer_turn(&self, state: &mut MatchState, seq: &mut Sequencer) {
        debug_assert_eq!(state.active, Seat::Computer);
        state.turn = TurnState::ComputerTurnRunning;
        seq.schedule(self.pacing.turn_handoff, Step::ComputerRoll);
    }

    // === Step execution ===

    /// Execute one queued step.
    ///
    /// Steps assume the state they were scheduled against; quit and
    /// reset clear the queue, so stale steps never run.
    pub fn execute(
        &self,
        state: &mut MatchState,
        rng: &mut DiceRng,
        seq: &mut Sequencer,
        events: &mut EventLog,
        step: Step,
    ) -> StepOutcome {
        match step {
            Step::FinishUserRoll => {
                debug_assert_eq!(state.turn, TurnState::UserRolling);
                let side = state.side_mut(Seat::User);
                side.dice.roll_all(rng);
                side.has_thrown = true;
                let dice = side.dice;
                state.rolling = false;
                state.turn = TurnState::UserDeciding;
                events.emit(EngineEvent::DiceRolled {
                    seat: Seat::User,
                    dice,
                });
                StepOutcome::Progressed
            }

            Step::FinishUserReroll { index } => {
                debug_assert_eq!(state.turn, TurnState::UserDeciding);
                debug_assert!(state.rolling);
                let side = state.side_mut(Seat::User);
                let face = side.dice.roll_one(index, rng);
                side.rerolls_remaining -= 1;
                state.rolling = false;
                events.emit(EngineEvent::DieRerolled {
                    seat: Seat::User,
                    index,
                    face,
                });
                StepOutcome::Progressed
            }

            Step::ComputerRoll => {
                debug_assert_eq!(state.turn, TurnState::ComputerTurnRunning);
                events.emit(EngineEvent::RollStarted {
                    seat: Seat::Computer,
                });
                let side = state.side_mut(Seat::Computer);
                side.dice.roll_all(rng);
                side.has_thrown = true;
                let dice = side.dice;
                events.emit(EngineEvent::DiceRolled {
                    seat: Seat::Computer,
                    dice,
                });
                seq.schedule(
                    self.pacing.computer_settle + self.pacing.computer_think,
                    Step::ComputerDecide,
                );
                StepOutcome::Progressed
            }

            Step::ComputerDecide => {
                debug_assert_eq!(state.turn, TurnState::ComputerTurnRunning);
                let side = state.side(Seat::Computer);
                let indices = self.policy.reroll_indices(&side.dice);
                if side.rerolls_remaining == 0 || indices.is_empty() {
                    // Budget spent or nothing worth rerolling; the hand stands.
                    seq.schedule(self.pacing.computer_bank, Step::ComputerBank);
                } else {
                    debug!(count = indices.len(), "computer rerolls weak dice");
                    seq.schedule(self.pacing.computer_reroll, Step::ComputerReroll { indices });
                }
                StepOutcome::Progressed
            }

            Step::ComputerReroll { indices } => {
                debug_assert_eq!(state.turn, TurnState::ComputerTurnRunning);
                let side = state.side_mut(Seat::Computer);
                for &index in &indices {
                    side.dice.roll_one(index, rng);
                }
                side.rerolls_remaining -= 1;
                let dice = side.dice;
                let rerolls_left = side.rerolls_remaining;
                events.emit(EngineEvent::DiceRerolled {
                    seat: Seat::Computer,
                    count: indices.len(),
                    dice,
                });

                if self.policy.should_bank(&dice) || rerolls_left == 0 {
                    seq.schedule(self.pacing.computer_bank, Step::ComputerBank);
                } else {
                    seq.schedule(
                        self.pacing.computer_perceive + self.pacing.computer_think,
                        Step::ComputerDecide,
                    );
                }
                StepOutcome::Progressed
            }

            Step::ComputerBank => {
                debug_assert_eq!(state.turn, TurnState::ComputerTurnRunning);
                let banked = state.bank(Seat::Computer);
                let total = state.side(Seat::Computer).score;
                debug!(banked, total, "computer banked round");
                events.emit(EngineEvent::RoundBanked {
                    seat: Seat::Computer,
                    banked,
                    total,
                });
                state.active = Seat::User;
                state.turn = TurnState::RoundEvaluation;
                StepOutcome::Banked(Seat::Computer)
            }
        }
    }

    fn ensure_user_may_act(&self, state: &MatchState) -> Result<(), Rejection> {
        if state.turn.is_terminal() {
            return Err(Rejection::WrongState(state.turn));
        }
        if state.active != Seat::User {
            return Err(Rejection::NotYourTurn);
        }
        if state.rolling {
            return Err(Rejection::RollInProgress);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MatchConfig, Pacing, PolicyConfig};

    struct Rig {
        controller: TurnController,
        state: MatchState,
        rng: DiceRng,
        seq: Sequencer,
        events: EventLog,
    }

    impl Rig {
        fn new() -> Self {
            Self::with_policy(PolicyConfig::default())
        }

        fn with_policy(policy: PolicyConfig) -> Self {
            let config = MatchConfig::new(100)
                .with_pacing(Pacing::instant())
                .with_policy(policy);
            Self {
                controller: TurnController::new(config.pacing, RerollPolicy::new(policy)),
                state: MatchState::new(config.target, config.rerolls_per_round),
                rng: DiceRng::new(42),
                seq: Sequencer::new(),
                events: EventLog::new(),
            }
        }

        /// Pump queued steps until the queue drains or a bank happens.
        fn pump(&mut self) -> Option<Seat> {
            while let Some(timed) = self.seq.take_next() {
                let outcome = self.controller.execute(
                    &mut self.state,
                    &mut self.rng,
                    &mut self.seq,
                    &mut self.events,
                    timed.step,
                );
                if let StepOutcome::Banked(seat) = outcome {
                    return Some(seat);
                }
            }
            None
        }

        fn roll_and_land(&mut self) {
            self.controller
                .roll_dice(&mut self.state, &mut self.seq, &mut self.events)
                .unwrap();
            self.pump();
        }
    }

    #[test]
    fn test_roll_moves_through_rolling_to_deciding() {
        let mut rig = Rig::new();

        rig.controller
            .roll_dice(&mut rig.state, &mut rig.seq, &mut rig.events)
            .unwrap();
        assert_eq!(rig.state.turn, TurnState::UserRolling);
        assert!(rig.state.rolling);
        assert!(!rig.state.side(Seat::User).has_thrown);

        rig.pump();
        assert_eq!(rig.state.turn, TurnState::UserDeciding);
        assert!(!rig.state.rolling);
        assert!(rig.state.side(Seat::User).has_thrown);
    }

    #[test]
    fn test_roll_rejected_while_in_flight() {
        let mut rig = Rig::new();
        rig.controller
            .roll_dice(&mut rig.state, &mut rig.seq, &mut rig.events)
            .unwrap();

        let err = rig
            .controller
            .roll_dice(&mut rig.state, &mut rig.seq, &mut rig.events)
            .unwrap_err();
        assert_eq!(err, Rejection::RollInProgress);
    }

    #[test]
    fn test_roll_rejected_after_throw() {
        let mut rig = Rig::new();
        rig.roll_and_land();

        let err = rig
            .controller
            .roll_dice(&mut rig.state, &mut rig.seq, &mut rig.events)
            .unwrap_err();
        assert_eq!(err, Rejection::WrongState(TurnState::UserDeciding));
    }

    #[test]
    fn test_roll_rejected_on_computer_turn() {
        let mut rig = Rig::new();
        rig.state.active = Seat::Computer;
        rig.state.turn = TurnState::ComputerTurnRunning;

        let err = rig
            .controller
            .roll_dice(&mut rig.state, &mut rig.seq, &mut rig.events)
            .unwrap_err();
        assert_eq!(err, Rejection::NotYourTurn);
    }

    #[test]
    fn test_roll_rejected_after_game_over() {
        let mut rig = Rig::new();
        rig.state.turn = TurnState::GameOver;

        let err = rig
            .controller
            .roll_dice(&mut rig.state, &mut rig.seq, &mut rig.events)
            .unwrap_err();
        assert_eq!(err, Rejection::WrongState(TurnState::GameOver));
    }

    #[test]
    fn test_reroll_spends_budget_on_landing() {
        let mut rig = Rig::new();
        rig.roll_and_land();
        assert_eq!(rig.state.side(Seat::User).rerolls_remaining, 3);

        rig.controller
            .reroll_die(&mut rig.state, &mut rig.seq, &mut rig.events, 2)
            .unwrap();
        // Still unspent while the die is in the air
        assert_eq!(rig.state.side(Seat::User).rerolls_remaining, 3);
        assert!(rig.state.rolling);

        rig.pump();
        assert_eq!(rig.state.side(Seat::User).rerolls_remaining, 2);
        assert!(!rig.state.rolling);
        assert_eq!(rig.state.turn, TurnState::UserDeciding);
    }

    #[test]
    fn test_reroll_rejected_while_one_is_in_flight() {
        let mut rig = Rig::new();
        rig.roll_and_land();

        rig.controller
            .reroll_die(&mut rig.state, &mut rig.seq, &mut rig.events, 0)
            .unwrap();
        let err = rig
            .controller
            .reroll_die(&mut rig.state, &mut rig.seq, &mut rig.events, 1)
            .unwrap_err();
        assert_eq!(err, Rejection::RollInProgress);
    }

    #[test]
    fn test_reroll_budget_exhausts() {
        let mut rig = Rig::new();
        rig.roll_and_land();

        for index in 0..3 {
            rig.controller
                .reroll_die(&mut rig.state, &mut rig.seq, &mut rig.events, index)
                .unwrap();
            rig.pump();
        }
        assert_eq!(rig.state.side(Seat::User).rerolls_remaining, 0);

        let err = rig
            .controller
            .reroll_die(&mut rig.state, &mut rig.seq, &mut rig.events, 0)
            .unwrap_err();
        assert_eq!(err, Rejection::NoRerollsLeft);
    }

    #[test]
    fn test_reroll_rejected_before_throw() {
        let mut rig = Rig::new();

        let err = rig
            .controller
            .reroll_die(&mut rig.state, &mut rig.seq, &mut rig.events, 0)
            .unwrap_err();
        assert_eq!(err, Rejection::WrongState(TurnState::UserTurnIdle));
    }

    #[test]
    fn test_reroll_index_out_of_range() {
        let mut rig = Rig::new();
        rig.roll_and_land();

        let err = rig
            .controller
            .reroll_die(&mut rig.state, &mut rig.seq, &mut rig.events, DICE_COUNT)
            .unwrap_err();
        assert_eq!(err, Rejection::DieOutOfRange { index: DICE_COUNT });
    }

    #[test]
    fn test_bank_closes_round_and_hands_over() {
        let mut rig = Rig::new();
        rig.roll_and_land();
        let sum = rig.state.side(Seat::User).dice.sum();

        rig.controller
            .bank_round(&mut rig.state, &mut rig.events)
            .unwrap();

        let side = rig.state.side(Seat::User);
        assert_eq!(side.score, sum);
        assert_eq!(side.rounds_completed, 1);
        assert!(!side.has_thrown);
        assert_eq!(side.rerolls_remaining, 3);
        assert_eq!(rig.state.active, Seat::Computer);
        assert_eq!(rig.state.turn, TurnState::RoundEvaluation);
    }

    #[test]
    fn test_bank_rejected_before_throw() {
        let mut rig = Rig::new();

        let err = rig
            .controller
            .bank_round(&mut rig.state, &mut rig.events)
            .unwrap_err();
        assert_eq!(err, Rejection::WrongState(TurnState::UserTurnIdle));
    }

    #[test]
    fn test_bank_rejected_while_rolling() {
        let mut rig = Rig::new();
        rig.roll_and_land();
        rig.controller
            .reroll_die(&mut rig.state, &mut rig.seq, &mut rig.events, 0)
            .unwrap();

        let err = rig
            .controller
            .bank_round(&mut rig.state, &mut rig.events)
            .unwrap_err();
        assert_eq!(err, Rejection::RollInProgress);
    }

    #[test]
    fn test_roll_legal_from_tie_breaker() {
        let mut rig = Rig::new();
        rig.state.tie_breaker = true;
        rig.state.turn = TurnState::TieBreakerActive;

        rig.controller
            .roll_dice(&mut rig.state, &mut rig.seq, &mut rig.events)
            .unwrap();
        assert_eq!(rig.state.turn, TurnState::UserRolling);
    }

    #[test]
    fn test_computer_turn_stands_pat_and_banks() {
        // A policy that never rerolls gives the script a fixed shape:
        // roll, one decision, bank.
        let mut rig = Rig::with_policy(PolicyConfig {
            reroll_below: 1,
            bank_at: 24,
        });
        rig.state.active = Seat::Computer;
        rig.controller
            .begin_computer_turn(&mut rig.state, &mut rig.seq);
        assert_eq!(rig.state.turn, TurnState::ComputerTurnRunning);

        let banked_by = rig.pump();

        assert_eq!(banked_by, Some(Seat::Computer));
        let side = rig.state.side(Seat::Computer);
        assert_eq!(side.rounds_completed, 1);
        assert_eq!(side.rerolls_remaining, 3);
        assert!(side.score >= 6 && side.score <= 36);
        assert_eq!(rig.state.active, Seat::User);
        assert_eq!(rig.state.turn, TurnState::RoundEvaluation);
    }

    #[test]
    fn test_computer_banks_early_once_satisfied() {
        // Reroll everything, bank at any sum: the first reroll always
        // satisfies the policy, so two rerolls stay unspent.
        let mut rig = Rig::with_policy(PolicyConfig {
            reroll_below: 7,
            bank_at: 6,
        });
        rig.state.active = Seat::Computer;
        rig.controller
            .begin_computer_turn(&mut rig.state, &mut rig.seq);

        let mut rerolls_seen = 0;
        while let Some(timed) = rig.seq.take_next() {
            if matches!(timed.step, Step::ComputerReroll { .. }) {
                rerolls_seen += 1;
            }
            rig.controller.execute(
                &mut rig.state,
                &mut rig.rng,
                &mut rig.seq,
                &mut rig.events,
                timed.step,
            );
        }

        assert_eq!(rerolls_seen, 1);
        assert_eq!(rig.state.side(Seat::Computer).rounds_completed, 1);
    }

    #[test]
    fn test_computer_spends_full_budget_when_never_satisfied() {
        // Reroll everything, never bank early: exactly three rerolls.
        let mut rig = Rig::with_policy(PolicyConfig {
            reroll_below: 7,
            bank_at: 37,
        });
        rig.state.active = Seat::Computer;
        rig.controller
            .begin_computer_turn(&mut rig.state, &mut rig.seq);

        let mut rerolls_seen = 0;
        loop {
            let Some(timed) = rig.seq.take_next() else {
                break;
            };
            if matches!(timed.step, Step::ComputerReroll { .. }) {
                rerolls_seen += 1;
            }
            let outcome = rig.controller.execute(
                &mut rig.state,
                &mut rig.rng,
                &mut rig.seq,
                &mut rig.events,
                timed.step,
            );
            if outcome != StepOutcome::Progressed {
                break;
            }
        }

        assert_eq!(rerolls_seen, 3);
        assert_eq!(rig.state.side(Seat::Computer).rounds_completed, 1);
    }

    #[test]
    fn test_computer_banks_immediately_without_budget() {
        // With no rerolls to spend, the decision can only stand pat,
        // whatever the policy would prefer.
        let mut rig = Rig::with_policy(PolicyConfig {
            reroll_below: 7,
            bank_at: 37,
        });
        rig.state.active = Seat::Computer;
        rig.state.side_mut(Seat::Computer).rerolls_remaining = 0;
        rig.controller
            .begin_computer_turn(&mut rig.state, &mut rig.seq);

        let mut rerolls_seen = 0;
        while let Some(timed) = rig.seq.take_next() {
            if matches!(timed.step, Step::ComputerReroll { .. }) {
                rerolls_seen += 1;
            }
            rig.controller.execute(
                &mut rig.state,
                &mut rig.rng,
                &mut rig.seq,
                &mut rig.events,
                timed.step,
            );
        }

        assert_eq!(rerolls_seen, 0);
        let side = rig.state.side(Seat::Computer);
        assert_eq!(side.rounds_completed, 1);
        assert!(side.score >= 6);
        assert_eq!(rig.state.turn, TurnState::RoundEvaluation);
    }

    #[test]
    fn test_computer_events_tell_the_turn_story() {
        let mut rig = Rig::with_policy(PolicyConfig {
            reroll_below: 1,
            bank_at: 24,
        });
        rig.state.active = Seat::Computer;
        rig.controller
            .begin_computer_turn(&mut rig.state, &mut rig.seq);
        rig.pump();

        let kinds: Vec<_> = rig
            .events
            .since(0)
            .iter()
            .map(|r| match &r.event {
                EngineEvent::RollStarted { .. } => "start",
                EngineEvent::DiceRolled { .. } => "rolled",
                EngineEvent::RoundBanked { .. } => "banked",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["start", "rolled", "banked"]);
    }
}
