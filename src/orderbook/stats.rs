//! Market statistics and the derived price window.

use super::error::BookError;
use super::tick::TickValue;
use serde::{Deserialize, Serialize};

/// Basis points per whole unit of fractional range.
const BPS_SCALE: f64 = 10_000.0;

/// Daily market statistics an order book is sized from.
///
/// The expected range is a fractional widening expressed in basis points:
/// 2000 means the book reserves 20% more price slots than yesterday's
/// high-to-low span.
///
/// # Examples
///
/// ```
/// use tickbook::MarketStats;
///
/// let stats = MarketStats::new(130i64, 90, 110, 2000).unwrap();
/// assert_eq!(stats.daily_high(), 130);
/// assert_eq!(stats.expected_range(), 0.2);
/// assert_eq!(stats.window().len(), 48);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStats<T> {
    daily_high: T,
    daily_low: T,
    daily_close: T,
    expected_range_bps: u32,
}

impl<T: TickValue> MarketStats<T> {
    /// Validate and bundle the statistics.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::InvalidMarketStats`] when `daily_high` is not
    /// strictly above `daily_low`, or when the widened window would not fit
    /// an addressable level array.
    pub fn new(
        daily_high: T,
        daily_low: T,
        daily_close: T,
        expected_range_bps: u32,
    ) -> Result<Self, BookError> {
        if daily_high <= daily_low {
            return Err(BookError::InvalidMarketStats {
                message: format!("daily high {daily_high} must exceed daily low {daily_low}"),
            });
        }
        let span = T::steps_between(daily_low, daily_high);
        let widened = span as f64 * (1.0 + f64::from(expected_range_bps) / BPS_SCALE);
        if !widened.is_finite() || widened >= usize::MAX as f64 {
            return Err(BookError::InvalidMarketStats {
                message: format!("widened range {widened} exceeds addressable levels"),
            });
        }
        Ok(Self {
            daily_high,
            daily_low,
            daily_close,
            expected_range_bps,
        })
    }

    /// Yesterday's highest trade price.
    #[inline]
    #[must_use]
    pub fn daily_high(&self) -> T {
        self.daily_high
    }

    /// Yesterday's lowest trade price.
    #[inline]
    #[must_use]
    pub fn daily_low(&self) -> T {
        self.daily_low
    }

    /// Yesterday's closing price.
    #[inline]
    #[must_use]
    pub fn daily_close(&self) -> T {
        self.daily_close
    }

    /// The fractional widening as a plain ratio.
    #[inline]
    #[must_use]
    pub fn expected_range(&self) -> f64 {
        f64::from(self.expected_range_bps) / BPS_SCALE
    }

    /// Derive the inclusive price window the book allocates.
    ///
    /// The length is `trunc(span * (1 + range))`, bumped to `span + 1` when
    /// truncation lands below it, so the daily range itself always fits and
    /// the rounding is deterministic across platforms. The window is
    /// centered on the close, then shifted until `[daily_low, daily_high]`
    /// is fully inside.
    #[must_use]
    pub fn window(&self) -> PriceWindow<T> {
        let span = T::steps_between(self.daily_low, self.daily_high);
        let mut len = (span as f64 * (1.0 + self.expected_range())) as usize;
        if len < span + 1 {
            len = span + 1;
        }

        let mut low = self.daily_close.retreat_saturating(len / 2);
        if low > self.daily_low {
            low = self.daily_low;
        }
        let mut high = low.advance(len - 1);
        if high < self.daily_high {
            low = self.daily_high.retreat_saturating(len - 1);
            high = low.advance(len - 1);
        }
        PriceWindow { low, high, len }
    }
}

/// The inclusive tick range `[low, high]` a book addresses, of fixed length
/// `len`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PriceWindow<T> {
    low: T,
    high: T,
    len: usize,
}

impl<T: TickValue> PriceWindow<T> {
    /// Lowest addressable tick.
    #[inline]
    #[must_use]
    pub fn low(&self) -> T {
        self.low
    }

    /// Highest addressable tick.
    #[inline]
    #[must_use]
    pub fn high(&self) -> T {
        self.high
    }

    /// Number of addressable price slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the window holds no slots. Never true for validated stats.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot index of `tick`. Requires `tick` inside the window.
    #[inline]
    pub(crate) fn index_of(&self, tick: T) -> usize {
        debug_assert!(tick >= self.low && tick <= self.high);
        T::steps_between(self.low, tick)
    }

    /// Tick stored at slot `index`.
    #[inline]
    pub(crate) fn tick_at(&self, index: usize) -> T {
        debug_assert!(index < self.len);
        self.low.advance(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_range() {
        assert!(MarketStats::new(90i64, 130, 110, 2000).is_err());
        assert!(MarketStats::new(100i64, 100, 100, 0).is_err());
    }

    #[test]
    fn window_length_truncates() {
        // 20 * 1.05 = 21
        let stats = MarketStats::new(110i32, 90, 100, 500).unwrap();
        assert_eq!(stats.window().len(), 21);

        // 150 * 1.30 = 195
        let stats = MarketStats::new(200i32, 50, 125, 3000).unwrap();
        assert_eq!(stats.window().len(), 195);
    }

    #[test]
    fn window_length_bumps_to_cover_daily_range() {
        // 20 * 1.0 = 20 slots cannot hold 21 distinct ticks
        let stats = MarketStats::new(110i32, 90, 100, 0).unwrap();
        assert_eq!(stats.window().len(), 21);

        // 40 * 1.01 truncates to 40, still one short
        let stats = MarketStats::new(130i32, 90, 110, 100).unwrap();
        assert_eq!(stats.window().len(), 41);
    }

    #[test]
    fn window_contains_daily_range() {
        let stats = MarketStats::new(130i64, 90, 110, 2000).unwrap();
        let window = stats.window();
        assert_eq!(window.len(), 48);
        assert!(window.low() <= 90);
        assert!(window.high() >= 130);
        assert_eq!(
            <i64 as TickValue>::steps_between(window.low(), window.high()) + 1,
            window.len()
        );
    }

    #[test]
    fn window_centers_on_close() {
        let stats = MarketStats::new(130i64, 90, 110, 2000).unwrap();
        let window = stats.window();
        // close - len/2 stays below daily_low, so no shift applies
        assert_eq!(window.low(), 86);
        assert_eq!(window.high(), 133);
    }

    #[test]
    fn window_shifts_when_close_hugs_an_edge() {
        // Close at the high: centering alone would lose the top of the range
        let stats = MarketStats::new(130i64, 90, 130, 2000).unwrap();
        let window = stats.window();
        assert!(window.low() <= 90);
        assert!(window.high() >= 130);

        // Close at the low
        let stats = MarketStats::new(130i64, 90, 90, 2000).unwrap();
        let window = stats.window();
        assert!(window.low() <= 90);
        assert!(window.high() >= 130);
    }

    #[test]
    fn unsigned_ticks_saturate_at_zero() {
        let stats = MarketStats::new(30u32, 10, 12, 5000).unwrap();
        let window = stats.window();
        assert!(window.low() <= 10);
        assert!(window.high() >= 30);
        assert_eq!(
            <u32 as TickValue>::steps_between(window.low(), window.high()) + 1,
            window.len()
        );
    }

    #[test]
    fn index_round_trips() {
        let stats = MarketStats::new(130i64, 90, 110, 2000).unwrap();
        let window = stats.window();
        for tick in 90..=130 {
            let index = window.index_of(tick);
            assert!(index < window.len());
            assert_eq!(window.tick_at(index), tick);
        }
    }
}
