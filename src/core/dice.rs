//! The six-die pool a seat throws.
//!
//! ## Face
//!
//! A single die face, guaranteed to be in `1..=6` by construction.
//!
//! ## DiceSet
//!
//! A fixed pool of [`DICE_COUNT`] dice. Each seat owns its own set,
//! stored on its side of the match state. Rolling mutates in place and
//! draws every face from the caller's [`DiceRng`], which is what keeps
//! seeded matches replayable.

use crate::core::rng::DiceRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::Index;

/// Number of dice thrown per roll.
pub const DICE_COUNT: usize = 6;

/// A subset of pool indices, inline-allocated for the full pool.
pub type DiceIndices = SmallVec<[usize; DICE_COUNT]>;

/// A single die face in `1..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Face(u8);

impl Face {
    /// Create a face from a raw value.
    ///
    /// Panics if `value` is outside `1..=6`.
    #[must_use]
    pub fn new(value: u8) -> Self {
        assert!((1..=6).contains(&value), "Die face must be in 1..=6");
        Self(value)
    }

    /// The raw face value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Face {
    /// Dice rest face-up on 1 before the first throw.
    fn default() -> Self {
        Self(1)
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pool of [`DICE_COUNT`] dice.
///
/// ## Example
///
/// ```
/// use dice_duel::core::{DiceRng, DiceSet};
///
/// let mut rng = DiceRng::new(42);
/// let mut dice = DiceSet::new();
/// assert_eq!(dice.sum(), 6); // all ones before the first throw
///
/// dice.roll_all(&mut rng);
/// assert!((6..=36).contains(&dice.sum()));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceSet {
    faces: [Face; DICE_COUNT],
}

impl DiceSet {
    /// Create a fresh pool with every die resting on 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            faces: [Face::default(); DICE_COUNT],
        }
    }

    /// Create a pool with the given raw face values.
    ///
    /// Panics if any value is outside `1..=6`.
    #[must_use]
    pub fn from_values(values: [u8; DICE_COUNT]) -> Self {
        Self {
            faces: values.map(Face::new),
        }
    }

    /// Re-throw every die in the pool.
    pub fn roll_all(&mut self, rng: &mut DiceRng) {
        for face in &mut self.faces {
            *face = Face::new(rng.die());
        }
    }

    /// Re-throw a single die, leaving the rest untouched.
    ///
    /// Returns the new face. Panics if `index` is out of range.
    pub fn roll_one(&mut self, index: usize, rng: &mut DiceRng) -> Face {
        assert!(index < DICE_COUNT, "Die index out of range");
        let face = Face::new(rng.die());
        self.faces[index] = face;
        face
    }

    /// The face shown by one die.
    #[must_use]
    pub fn face(&self, index: usize) -> Face {
        self.faces[index]
    }

    /// All faces in pool order.
    #[must_use]
    pub const fn faces(&self) -> &[Face; DICE_COUNT] {
        &self.faces
    }

    /// Sum of all faces.
    #[must_use]
    pub fn sum(&self) -> u32 {
        self.faces.iter().map(|f| u32::from(f.value())).sum()
    }
}

impl Default for DiceSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for DiceSet {
    type Output = Face;

    fn index(&self, index: usize) -> &Self::Output {
        &self.faces[index]
    }
}

impl std::fmt::Display for DiceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, face) in self.faces.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{face}")?;
        }
        write!(f, "]")
    }
}
