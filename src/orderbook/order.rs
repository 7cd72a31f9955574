//! Order accessor traits and the plain sample order type.
//!
//! The book imposes no layout on the caller's order record. It reads and
//! writes orders exclusively through the five accessors of [`BookOrder`];
//! any value-semantic struct qualifies.

use super::tick::TickValue;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Requirements on an order identifier: hashable, comparable, cheap to copy.
pub trait OrderKey: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> OrderKey for T {}

/// An integral resting-volume type.
///
/// Level arithmetic is written subtract-then-add so unsigned widths never
/// underflow on the delta path.
pub trait VolumeValue:
    Copy
    + Default
    + Debug
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + AddAssign
    + SubAssign
{
    /// The additive identity.
    const ZERO: Self;

    /// Whether this volume contributes nothing to a level.
    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

macro_rules! impl_volume_value {
    ($($t:ty),* $(,)?) => {$(
        impl VolumeValue for $t {
            const ZERO: Self = 0;
        }
    )*};
}

impl_volume_value!(i16, i32, i64, i128, isize, u16, u32, u64, u128, usize);

/// The capability set the book requires of a caller's order type.
///
/// `Clone` and `Default` back the query surface: level queries return
/// synthetic default orders and `get_order` returns copies.
pub trait BookOrder: Clone + Default {
    /// Hash key identifying the order in the index.
    type Id: OrderKey;
    /// Resting volume type.
    type Volume: VolumeValue;
    /// Price coordinate type.
    type Tick: TickValue;

    /// The order's identifier.
    fn id(&self) -> Self::Id;
    /// The order's resting volume.
    fn volume(&self) -> Self::Volume;
    /// Overwrite the resting volume.
    fn set_volume(&mut self, volume: Self::Volume);
    /// The order's price tick.
    fn tick(&self) -> Self::Tick;
    /// Overwrite the price tick.
    fn set_tick(&mut self, tick: Self::Tick);
}

/// A minimal value-semantic order.
///
/// Suitable when the caller has no richer record of its own; the crate's
/// tests and benchmarks run on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainOrder {
    /// Order identifier
    pub id: u64,
    /// Resting volume
    pub volume: i64,
    /// Price tick
    pub tick: i64,
}

impl BookOrder for PlainOrder {
    type Id = u64;
    type Volume = i64;
    type Tick = i64;

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    fn volume(&self) -> i64 {
        self.volume
    }

    #[inline]
    fn set_volume(&mut self, volume: i64) {
        self.volume = volume;
    }

    #[inline]
    fn tick(&self) -> i64 {
        self.tick
    }

    #[inline]
    fn set_tick(&mut self, tick: i64) {
        self.tick = tick;
    }
}
