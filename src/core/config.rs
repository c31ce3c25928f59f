//! Match configuration types.
//!
//! A duel is configured at startup by providing:
//! - `MatchConfig`: target score, reroll budget, seed, pacing, opponent policy
//! - `Pacing`: the pause schedule that spaces out automated steps
//! - `PolicyConfig`: thresholds for the computer's reroll heuristic
//!
//! The engine never hardcodes a target or a rhythm. Hosts that want an
//! instant, animation-free match set `Pacing::instant()` and drive the
//! step queue to completion in a tight loop.

use std::time::Duration;

/// Default target score when none is chosen.
pub const DEFAULT_TARGET: u32 = 100;

/// Preset target scores for hosts that offer a pick list. Any
/// positive target is accepted; these are just the common choices.
pub const SUGGESTED_TARGETS: [u32; 6] = [100, 150, 175, 300, 350, 500];

/// Rerolls granted to each seat at the start of every round.
pub const DEFAULT_REROLLS: u8 = 3;

/// Pause schedule for automated steps.
///
/// Each field is the gap a host would leave for one beat of the match:
/// dice settling after a throw, the computer "thinking" before it picks
/// dice to reroll, and so on. The engine itself never sleeps. It only
/// reports these gaps through the step queue, so a headless driver can
/// run the same match at zero delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Full-pool throw by the user: command to faces landing.
    pub user_roll: Duration,
    /// Single-die reroll by the user: command to the face landing.
    pub user_reroll: Duration,
    /// Hand-off gap before the computer's opening throw.
    pub turn_handoff: Duration,
    /// Gap after the computer's throw lands, before it starts deciding.
    pub computer_settle: Duration,
    /// Gap spent "thinking" before each reroll decision.
    pub computer_think: Duration,
    /// Computer's reroll: decision to the new faces landing.
    pub computer_reroll: Duration,
    /// Gap after a reroll lands so the change can be perceived.
    pub computer_perceive: Duration,
    /// Gap before the computer banks its final sum.
    pub computer_bank: Duration,
}

impl Pacing {
    /// Zero everywhere. Steps become runnable immediately.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            user_roll: Duration::ZERO,
            user_reroll: Duration::ZERO,
            turn_handoff: Duration::ZERO,
            computer_settle: Duration::ZERO,
            computer_think: Duration::ZERO,
            computer_reroll: Duration::ZERO,
            computer_perceive: Duration::ZERO,
            computer_bank: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    /// The rhythm of a watchable match.
    fn default() -> Self {
        Self {
            user_roll: Duration::from_millis(250),
            user_reroll: Duration::from_millis(150),
            turn_handoff: Duration::from_millis(350),
            computer_settle: Duration::from_millis(700),
            computer_think: Duration::from_millis(300),
            computer_reroll: Duration::from_millis(150),
            computer_perceive: Duration::from_millis(600),
            computer_bank: Duration::from_millis(400),
        }
    }
}

/// Thresholds for the computer's reroll heuristic.
///
/// The computer rerolls every die showing a face below `reroll_below`
/// and stops its turn early once the pool sums to `bank_at` or more.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Faces strictly below this value get rerolled.
    pub reroll_below: u8,
    /// Bank early once the pool sum reaches this value.
    pub bank_at: u32,
}

impl Default for PolicyConfig {
    /// Reroll anything under 4, bank at 24 or more.
    fn default() -> Self {
        Self {
            reroll_below: 4,
            bank_at: 24,
        }
    }
}

/// Complete configuration for one engine instance.
///
/// ## Example
///
/// ```
/// use dice_duel::core::{MatchConfig, Pacing};
///
/// let config = MatchConfig::new(150)
///     .with_seed(42)
///     .with_pacing(Pacing::instant());
///
/// assert_eq!(config.target, 150);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Score a seat must reach for end-of-match evaluation to trigger.
    pub target: u32,

    /// Rerolls granted to each seat per round.
    pub rerolls_per_round: u8,

    /// RNG seed. `None` draws one from OS entropy.
    pub seed: Option<u64>,

    /// Pause schedule for automated steps.
    pub pacing: Pacing,

    /// Computer opponent thresholds.
    pub policy: PolicyConfig,
}

impl MatchConfig {
    /// Create a configuration for the given target score.
    ///
    /// Panics if `target` is zero.
    #[must_use]
    pub fn new(target: u32) -> Self {
        assert!(target >= 1, "Target score must be at least 1");
        Self {
            target,
            rerolls_per_round: DEFAULT_REROLLS,
            seed: None,
            pacing: Pacing::default(),
            policy: PolicyConfig::default(),
        }
    }

    /// Fix the RNG seed for a replayable match.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the pause schedule.
    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Override the computer opponent thresholds.
    #[must_use]
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Override the per-round reroll budget.
    ///
    /// Panics if `rerolls` is outside `1..=3`.
    #[must_use]
    pub fn with_rerolls(mut self, rerolls: u8) -> Self {
        assert!(
            (1..=3).contains(&rerolls),
            "Reroll budget must be in 1..=3"
        );
        self.rerolls_per_round = rerolls;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}
