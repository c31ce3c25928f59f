//! The computer opponent's reroll heuristic.
//!
//! The computer plays a greedy sum-maximizing strategy:
//!
//! 1. Throw the full pool.
//! 2. While rerolls remain, pick every die showing a face below the
//!    reroll threshold. No such dice means the hand is good enough;
//!    bank immediately.
//! 3. After a reroll, bank early once the pool sum reaches the banking
//!    threshold.
//!
//! Both thresholds come from [`PolicyConfig`], so hosts can field a
//! bolder or more timid opponent. The policy only picks dice; the turn
//! script in `turn` owns budgets and sequencing.

use crate::core::{DiceIndices, DiceSet, PolicyConfig};

/// Greedy threshold-based reroll picker.
#[derive(Clone, Copy, Debug)]
pub struct RerollPolicy {
    config: PolicyConfig,
}

impl RerollPolicy {
    /// Create a policy with the given thresholds.
    #[must_use]
    pub const fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// Indices of dice worth rerolling, in pool order.
    ///
    /// Empty means the pool has no weak dice and the computer should
    /// stand pat.
    #[must_use]
    pub fn reroll_indices(&self, dice: &DiceSet) -> DiceIndices {
        dice.faces()
            .iter()
            .enumerate()
            .filter(|(_, face)| face.value() < self.config.reroll_below)
            .map(|(index, _)| index)
            .collect()
    }

    /// Whether the pool is already worth banking.
    #[must_use]
    pub fn should_bank(&self, dice: &DiceSet) -> bool {
        dice.sum() >= self.config.bank_at
    }
}

impl Default for RerollPolicy {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}
