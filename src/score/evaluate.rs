//! End-of-round judgement.
//!
//! Runs after every banked round, once both seats are level. The rules:
//!
//! - Rounds uneven: the round is still being played, judge nothing.
//! - Nobody at the target: play another round.
//! - Exactly one seat at or above the target: that seat wins.
//! - Both at or above with different scores: the higher score wins.
//! - Both at or above with level scores: sudden-death tie-breaker.
//! - During a tie-breaker, any score gap decides the match outright;
//!   level scores mean another sudden-death round.
//!
//! The judgement is a pure function of [`MatchState`], which keeps it
//! trivially property-testable.

use crate::core::{MatchState, Seat};

/// What the scores say at the end of a level round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Rounds are uneven; the computer still has to play out the round.
    NotYet,
    /// Round complete, nobody at the target. Next round.
    Continue,
    /// Both seats finished at or above the target on level scores.
    /// Sudden-death rounds begin.
    TieBreaker,
    /// A sudden-death round finished level again. Play another.
    StillTied,
    /// The match is decided.
    Decided(Seat),
}

/// Judge the match after a banked round.
///
/// Never called while a throw is in flight; dice sums are only read
/// once they have settled.
#[must_use]
pub fn evaluate(state: &MatchState) -> Verdict {
    debug_assert!(!state.rolling, "evaluate with a throw in flight");

    if !state.rounds_level() {
        return Verdict::NotYet;
    }

    let user = state.side(Seat::User).score;
    let computer = state.side(Seat::Computer).score;

    if state.tie_breaker {
        // Both seats are already past the target; any gap settles it.
        return match user.cmp(&computer) {
            std::cmp::Ordering::Equal => Verdict::StillTied,
            std::cmp::Ordering::Greater => Verdict::Decided(Seat::User),
            std::cmp::Ordering::Less => Verdict::Decided(Seat::Computer),
        };
    }

    let user_reached = user >= state.target;
    let computer_reached = computer >= state.target;

    if !user_reached && !computer_reached {
        return Verdict::Continue;
    }

    if user_reached && computer_reached && user == computer {
        return Verdict::TieBreaker;
    }

    // One seat short of the target is necessarily behind, so a plain
    // score comparison picks the winner in every decided case.
    if user > computer {
        Verdict::Decided(Seat::User)
    } else {
        Verdict::Decided(Seat::Computer)
    }
}
