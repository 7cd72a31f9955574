//! Tick coordinates and the strong tick wrapper backing the best-price
//! caches.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// An integer price coordinate convertible to and from window offsets.
///
/// The book only ever does three things with a tick: compare it, measure the
/// distance between two ticks, and move it by a number of steps. `MIN` and
/// `MAX` double as the empty-side sentinels returned by
/// [`best_bid`](crate::OrderBook::best_bid) and
/// [`best_ask`](crate::OrderBook::best_ask).
pub trait TickValue: Copy + Ord + fmt::Debug + fmt::Display {
    /// Smallest representable tick; the empty-book bid sentinel.
    const MIN: Self;
    /// Largest representable tick; the empty-book ask sentinel.
    const MAX: Self;

    /// Number of single-tick steps from `low` up to `high`.
    ///
    /// Requires `high >= low`.
    fn steps_between(low: Self, high: Self) -> usize;

    /// The tick `steps` above `self`. The result must stay representable.
    fn advance(self, steps: usize) -> Self;

    /// The tick `steps` below `self`, saturating at [`TickValue::MIN`].
    fn retreat_saturating(self, steps: usize) -> Self;
}

macro_rules! impl_tick_value {
    ($($t:ty),* $(,)?) => {$(
        impl TickValue for $t {
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn steps_between(low: Self, high: Self) -> usize {
                debug_assert!(high >= low);
                (high as i128 - low as i128) as usize
            }

            #[inline]
            fn advance(self, steps: usize) -> Self {
                let raw = self as i128 + steps as i128;
                debug_assert!(raw <= <$t>::MAX as i128);
                raw as $t
            }

            #[inline]
            fn retreat_saturating(self, steps: usize) -> Self {
                let raw = self as i128 - steps as i128;
                if raw < <$t>::MIN as i128 {
                    <$t>::MIN
                } else {
                    raw as $t
                }
            }
        }
    )*};
}

impl_tick_value!(i16, i32, i64, isize, u16, u32, u64, usize);

/// A tick paired with a has-value flag.
///
/// The total order places no-value strictly greater than every valued tick,
/// so `min` over ask candidates accepts an initial no-value naturally. The
/// bid side updates through an explicit comparison instead; a plain `max`
/// would keep no-value forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StrongTick<T> {
    tick: Option<T>,
}

impl<T> StrongTick<T> {
    /// Wrap a valid tick.
    #[inline]
    pub fn new(tick: T) -> Self {
        Self { tick: Some(tick) }
    }

    /// The no-value sentinel.
    #[inline]
    pub fn no_value() -> Self {
        Self { tick: None }
    }

    /// Whether a valid tick is present.
    #[inline]
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.tick.is_some()
    }
}

impl<T: Copy> StrongTick<T> {
    /// The wrapped tick, or `None` for the no-value sentinel.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.tick
    }
}

impl<T> Default for StrongTick<T> {
    fn default() -> Self {
        Self::no_value()
    }
}

impl<T> From<T> for StrongTick<T> {
    fn from(tick: T) -> Self {
        Self::new(tick)
    }
}

impl<T> From<Option<T>> for StrongTick<T> {
    fn from(tick: Option<T>) -> Self {
        Self { tick }
    }
}

impl<T: Ord> Ord for StrongTick<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.tick, &other.tick) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl<T: Ord> PartialOrd for StrongTick<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_no_value() {
        let tick: StrongTick<i32> = StrongTick::default();
        assert!(!tick.has_value());
        assert_eq!(tick, StrongTick::no_value());
    }

    #[test]
    fn valid_tick_exposes_value() {
        let tick = StrongTick::new(100);
        assert!(tick.has_value());
        assert_eq!(tick.value(), Some(100));
    }

    #[test]
    fn valid_ticks_order_naturally() {
        let a = StrongTick::new(100);
        let b = StrongTick::new(200);
        assert!(a < b);
        assert!(b > a);
        assert_ne!(a, b);
    }

    #[test]
    fn no_value_is_never_less() {
        let valid = StrongTick::new(100);
        let invalid: StrongTick<i32> = StrongTick::no_value();
        assert!(!(invalid < valid));
        assert!(!(invalid < invalid));
        assert!(valid < invalid);
    }

    #[test]
    fn no_value_equals_only_no_value() {
        let valid = StrongTick::new(100);
        let invalid: StrongTick<i32> = StrongTick::no_value();
        assert_ne!(invalid, valid);
        assert_eq!(invalid, StrongTick::no_value());
    }

    #[test]
    fn min_over_asks_accepts_initial_no_value() {
        let best: StrongTick<i32> = StrongTick::no_value();
        let incoming = StrongTick::new(115);
        assert_eq!(best.min(incoming), incoming);
    }

    #[test]
    fn steps_and_advance_round_trip() {
        assert_eq!(<i64 as TickValue>::steps_between(90, 130), 40);
        assert_eq!(90i64.advance(40), 130);
        assert_eq!(130i64.retreat_saturating(40), 90);
        assert_eq!(<u32 as TickValue>::steps_between(5, 5), 0);
        assert_eq!(3u32.retreat_saturating(10), 0);
    }
}
