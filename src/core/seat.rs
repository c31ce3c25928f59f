//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! A duel always has exactly two seats: the human player and the
//! computer opponent. `Seat` is a closed enum rather than a free-form
//! string so turn ownership can never hold an unexpected value.
//!
//! ## SeatMap
//!
//! Fixed two-entry storage indexed by `Seat`. Supports iteration and
//! indexing without any heap allocation.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two participants in a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    /// The human player. Always takes the first turn of a round.
    User,
    /// The scripted computer opponent.
    Computer,
}

impl Seat {
    /// The other seat.
    ///
    /// ```
    /// use dice_duel::core::Seat;
    ///
    /// assert_eq!(Seat::User.opponent(), Seat::Computer);
    /// assert_eq!(Seat::Computer.opponent(), Seat::User);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Seat::User => Seat::Computer,
            Seat::Computer => Seat::User,
        }
    }

    /// Whether this seat is the human player.
    #[must_use]
    pub const fn is_user(self) -> bool {
        matches!(self, Seat::User)
    }

    /// Storage index for this seat (user first).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Seat::User => 0,
            Seat::Computer => 1,
        }
    }

    /// Iterate over both seats in turn order.
    pub fn all() -> impl Iterator<Item = Seat> {
        [Seat::User, Seat::Computer].into_iter()
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::User => write!(f, "user"),
            Seat::Computer => write!(f, "computer"),
        }
    }
}

/// Per-seat data storage with O(1) access.
///
/// Backed by a fixed `[T; 2]` with one entry per seat.
///
/// ## Example
///
/// ```
/// use dice_duel::core::{Seat, SeatMap};
///
/// let mut scores: SeatMap<u32> = SeatMap::with_value(0);
///
/// scores[Seat::User] += 17;
/// assert_eq!(scores[Seat::User], 17);
/// assert_eq!(scores[Seat::Computer], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: [T; 2],
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    ///
    /// The factory receives the `Seat` for each entry.
    pub fn new(factory: impl Fn(Seat) -> T) -> Self {
        Self {
            data: [factory(Seat::User), factory(Seat::Computer)],
        }
    }

    /// Create a new SeatMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new SeatMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (Seat, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        Seat::all().zip(self.data.iter())
    }

    /// Iterate over (Seat, &mut T) pairs in turn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Seat, &mut T)> {
        Seat::all().zip(self.data.iter_mut())
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}
