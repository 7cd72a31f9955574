//! Core order book: tick-addressed price levels, occupancy bitmaps, the
//! order index, and the best-price caches.

use super::bitmap::LevelBitmap;
use super::error::BookError;
use super::fifo::{FifoNode, NodeLookup};
use super::order::{BookOrder, VolumeValue};
use super::policy::{BoundsPolicy, DiscardBounds, ZeroAsValid, ZeroVolumePolicy};
use super::stats::{MarketStats, PriceWindow};
use super::storage::{Aggregate, Fifo, LevelQueue, StoragePolicy};
use super::tick::{StrongTick, TickValue};
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::collections::hash_map::Entry;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Sizing factor for the order index so steady-state mutation stays clear of
/// rehashing.
const INDEX_CAPACITY_FACTOR: usize = 10;

/// One price slot on one side of the book.
#[derive(Clone, Debug, Default)]
struct Level<Q, V> {
    volume: V,
    queue: Q,
}

/// A resting order plus the queue links threaded through it.
struct OrderEntry<O: BookOrder> {
    order: O,
    node: FifoNode<O::Id>,
}

type OrderIndex<O> = FxHashMap<<O as BookOrder>::Id, OrderEntry<O>>;

impl<O: BookOrder> NodeLookup<O::Id> for OrderIndex<O> {
    fn node(&self, id: O::Id) -> &FifoNode<O::Id> {
        &self.get(&id).expect("queued order missing from index").node
    }

    fn node_mut(&mut self, id: O::Id) -> &mut FifoNode<O::Id> {
        &mut self
            .get_mut(&id)
            .expect("queued order missing from index")
            .node
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Whether `candidate` is a strictly better price than `incumbent` for
    /// this side.
    #[inline]
    fn better<T: TickValue>(self, candidate: T, incumbent: T) -> bool {
        match self {
            Side::Bid => candidate > incumbent,
            Side::Ask => candidate < incumbent,
        }
    }
}

/// Occupied-level record used by the serialized book view.
#[derive(Serialize)]
struct LevelView<T, V> {
    tick: T,
    volume: V,
}

/// An in-memory limit order book for one instrument, keyed by price tick.
///
/// Levels are preallocated over a window derived from [`MarketStats`], so
/// every mutation addresses its level by subtraction instead of a tree or
/// hash walk. A per-side occupancy bitmap answers best-price and
/// ordinal-level queries; an order index keyed by the caller's order ID
/// holds the authoritative tick and volume of every resting order.
///
/// Three orthogonal type-level selections configure a book:
///
/// - storage: [`Aggregate`] volume sums or [`Fifo`] per-order queues,
/// - bounds: [`DiscardBounds`] silently drops out-of-range ticks,
///   [`AssertBounds`](super::policy::AssertBounds) treats them as fatal,
/// - zero volume: [`ZeroAsValid`] keeps zero-volume orders resting,
///   [`ZeroAsDelete`](super::policy::ZeroAsDelete) erases them on update.
///
/// The book is single-threaded by contract: no operation blocks, suspends,
/// or synchronizes, and every mutation runs to completion on the caller's
/// thread.
///
/// # Examples
///
/// ```
/// use tickbook::{MarketStats, OrderBook, PlainOrder};
///
/// let stats = MarketStats::new(130, 90, 110, 2000).unwrap();
/// let mut book: OrderBook<PlainOrder> = OrderBook::new(stats);
///
/// book.insert_bid(100, PlainOrder { id: 1, volume: 10, tick: 0 });
/// book.insert_ask(115, PlainOrder { id: 2, volume: 20, tick: 0 });
///
/// assert_eq!(book.best_bid(), 100);
/// assert_eq!(book.best_ask(), 115);
/// assert_eq!(book.bid_volume_at_tick(100), 10);
/// ```
pub struct OrderBook<
    O: BookOrder,
    S: StoragePolicy = Aggregate,
    B: BoundsPolicy = DiscardBounds,
    Z: ZeroVolumePolicy = ZeroAsValid,
> {
    stats: MarketStats<O::Tick>,
    window: PriceWindow<O::Tick>,
    bids: Vec<Level<S::Level<O::Id>, O::Volume>>,
    asks: Vec<Level<S::Level<O::Id>, O::Volume>>,
    bid_bitmap: LevelBitmap,
    ask_bitmap: LevelBitmap,
    orders: OrderIndex<O>,
    best_bid: StrongTick<O::Tick>,
    best_ask: StrongTick<O::Tick>,
    _policies: PhantomData<(B, Z)>,
}

impl<O, S, B, Z> OrderBook<O, S, B, Z>
where
    O: BookOrder,
    S: StoragePolicy,
    B: BoundsPolicy,
    Z: ZeroVolumePolicy,
{
    /// Create an empty book sized from validated market statistics.
    ///
    /// Both sides and both bitmaps are allocated up front; the order index
    /// reserves enough capacity that steady-state mutation does not rehash.
    #[must_use]
    pub fn new(stats: MarketStats<O::Tick>) -> Self {
        let window = stats.window();
        let len = window.len();
        debug!(low = %window.low(), high = %window.high(), len, "allocating book window");
        let mut bids = Vec::new();
        bids.resize_with(len, Level::default);
        let mut asks = Vec::new();
        asks.resize_with(len, Level::default);
        Self {
            stats,
            window,
            bids,
            asks,
            bid_bitmap: LevelBitmap::new(len),
            ask_bitmap: LevelBitmap::new(len),
            orders: FxHashMap::with_capacity_and_hasher(
                len.saturating_mul(INDEX_CAPACITY_FACTOR),
                FxBuildHasher,
            ),
            best_bid: StrongTick::no_value(),
            best_ask: StrongTick::no_value(),
            _policies: PhantomData,
        }
    }

    /// Rest a new buy order at `tick`.
    ///
    /// The order's tick field is overwritten with `tick` before storage, so
    /// the stored record stays authoritative for later updates and removes.
    ///
    /// # Panics
    ///
    /// Panics when an order with the same ID is already resting, or when
    /// `tick` is outside the daily range under
    /// [`AssertBounds`](super::policy::AssertBounds).
    pub fn insert_bid(&mut self, tick: O::Tick, order: O) {
        self.insert(Side::Bid, tick, order);
    }

    /// Rest a new sell order at `tick`. See [`insert_bid`](Self::insert_bid).
    pub fn insert_ask(&mut self, tick: O::Tick, order: O) {
        self.insert(Side::Ask, tick, order);
    }

    /// Re-price and/or re-size the resting buy order carrying `order`'s ID.
    ///
    /// With an unchanged tick the volume delta is applied in place; growing
    /// an order demotes it to the back of its level queue, shrinking keeps
    /// its position. A changed tick moves the order to the back of the queue
    /// at the new level. Under
    /// [`ZeroAsDelete`](super::policy::ZeroAsDelete) an update to volume
    /// zero removes the order entirely.
    ///
    /// # Panics
    ///
    /// Panics when no order with that ID is resting, or when `tick` is
    /// out of range under [`AssertBounds`](super::policy::AssertBounds).
    pub fn update_bid(&mut self, tick: O::Tick, order: O) {
        self.update(Side::Bid, tick, order);
    }

    /// Re-price and/or re-size the resting sell order carrying `order`'s ID.
    /// See [`update_bid`](Self::update_bid).
    pub fn update_ask(&mut self, tick: O::Tick, order: O) {
        self.update(Side::Ask, tick, order);
    }

    /// Remove the resting buy order carrying `order`'s ID.
    ///
    /// The stored tick is authoritative for level bookkeeping; the `tick`
    /// argument is only checked against the bounds policy. Under
    /// [`DiscardBounds`] an out-of-range tick with an unknown ID is silently
    /// ignored.
    ///
    /// # Panics
    ///
    /// Panics when no order with that ID is resting (in-range requests), or
    /// when `tick` is out of range under
    /// [`AssertBounds`](super::policy::AssertBounds).
    pub fn remove_bid(&mut self, tick: O::Tick, order: O) {
        self.remove(Side::Bid, tick, order);
    }

    /// Remove the resting sell order carrying `order`'s ID.
    /// See [`remove_bid`](Self::remove_bid).
    pub fn remove_ask(&mut self, tick: O::Tick, order: O) {
        self.remove(Side::Ask, tick, order);
    }

    /// Highest occupied bid tick, or the minimum tick when no bids rest.
    ///
    /// # Examples
    ///
    /// ```
    /// use tickbook::{MarketStats, OrderBook, PlainOrder};
    ///
    /// let stats = MarketStats::new(130, 90, 110, 2000).unwrap();
    /// let book: OrderBook<PlainOrder> = OrderBook::new(stats);
    /// assert_eq!(book.best_bid(), i64::MIN);
    /// ```
    #[inline]
    #[must_use]
    pub fn best_bid(&self) -> O::Tick {
        self.best_bid.value().unwrap_or(O::Tick::MIN)
    }

    /// Lowest occupied ask tick, or the maximum tick when no asks rest.
    #[inline]
    #[must_use]
    pub fn best_ask(&self) -> O::Tick {
        self.best_ask.value().unwrap_or(O::Tick::MAX)
    }

    /// Total resting bid volume at `tick`.
    ///
    /// Under [`DiscardBounds`] an out-of-range tick reports zero volume.
    #[must_use]
    pub fn bid_volume_at_tick(&self, tick: O::Tick) -> O::Volume {
        self.volume_at_tick(Side::Bid, tick)
    }

    /// Total resting ask volume at `tick`.
    #[must_use]
    pub fn ask_volume_at_tick(&self, tick: O::Tick) -> O::Volume {
        self.volume_at_tick(Side::Ask, tick)
    }

    /// Synthetic order describing the `level`-th best bid level.
    ///
    /// Level 0 is the highest occupied bid, level 1 the next highest, and so
    /// on. The returned order carries the level's aggregate volume and tick;
    /// past the occupied count it is the zero/default order.
    #[must_use]
    pub fn bid_at_level(&self, level: usize) -> O {
        match self.bid_bitmap.select_from_high(level) {
            Some(index) => {
                self.synthetic_order(self.bids[index].volume, Some(self.window.tick_at(index)))
            }
            None => self.synthetic_order(O::Volume::ZERO, None),
        }
    }

    /// Synthetic order describing the `level`-th best ask level.
    ///
    /// Level 0 is the lowest occupied ask. See
    /// [`bid_at_level`](Self::bid_at_level).
    #[must_use]
    pub fn ask_at_level(&self, level: usize) -> O {
        match self.ask_bitmap.select_from_low(level) {
            Some(index) => {
                self.synthetic_order(self.asks[index].volume, Some(self.window.tick_at(index)))
            }
            None => self.synthetic_order(O::Volume::ZERO, None),
        }
    }

    /// Copy of the resting order with `id`.
    ///
    /// # Panics
    ///
    /// Panics when no order with that ID is resting.
    #[must_use]
    pub fn get_order(&self, id: O::Id) -> O {
        match self.orders.get(&id) {
            Some(entry) => entry.order.clone(),
            None => panic!("{}", BookError::OrderNotFound(format!("{id:?}"))),
        }
    }

    /// Whether an order with `id` is resting in the book.
    #[inline]
    #[must_use]
    pub fn contains_order(&self, id: O::Id) -> bool {
        self.orders.contains_key(&id)
    }

    /// Number of resting orders across both sides.
    #[inline]
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Number of addressable price slots per side.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.window.len()
    }

    /// Lowest addressable tick of the window.
    #[inline]
    #[must_use]
    pub fn low(&self) -> O::Tick {
        self.window.low()
    }

    /// Highest addressable tick of the window.
    #[inline]
    #[must_use]
    pub fn high(&self) -> O::Tick {
        self.window.high()
    }

    /// The market statistics this book was sized from.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> &MarketStats<O::Tick> {
        &self.stats
    }

    /// Bid-side occupancy bitmap.
    #[inline]
    #[must_use]
    pub fn bid_bitmap(&self) -> &LevelBitmap {
        &self.bid_bitmap
    }

    /// Ask-side occupancy bitmap.
    #[inline]
    #[must_use]
    pub fn ask_bitmap(&self) -> &LevelBitmap {
        &self.ask_bitmap
    }

    /// Return the book to its freshly constructed state.
    ///
    /// Every level is reset, both bitmaps cleared, the order index emptied
    /// and both best caches set back to no-value. Queue links die with the
    /// index.
    pub fn clear(&mut self) {
        for level in &mut self.bids {
            *level = Level::default();
        }
        for level in &mut self.asks {
            *level = Level::default();
        }
        self.bid_bitmap.clear();
        self.ask_bitmap.clear();
        self.orders.clear();
        self.best_bid = StrongTick::no_value();
        self.best_ask = StrongTick::no_value();
        trace!("cleared book");
    }

    fn insert(&mut self, side: Side, tick: O::Tick, mut order: O) {
        if !self.admit(tick, "insert") {
            return;
        }
        let id = order.id();
        let volume = order.volume();
        order.set_tick(tick);

        let window = self.window;
        let index = window.index_of(tick);
        let (levels, bitmap, best, orders) = self.parts_mut(side);

        match orders.entry(id) {
            Entry::Occupied(_) => panic!("{}", BookError::DuplicateOrder(format!("{id:?}"))),
            Entry::Vacant(slot) => {
                slot.insert(OrderEntry {
                    order,
                    node: FifoNode::default(),
                });
            }
        }

        let level = &mut levels[index];
        level.volume += volume;
        if !(Z::DELETE_ON_ZERO && volume.is_zero()) {
            level.queue.attach(id, orders);
        }
        let occupied = !level.volume.is_zero();
        Self::settle_level(side, &window, bitmap, best, index, occupied);
        trace!(side = ?side, id = ?id, tick = %tick, volume = ?volume, "inserted order");
    }

    fn update(&mut self, side: Side, tick: O::Tick, order: O) {
        let id = order.id();
        let volume = order.volume();

        if !self.in_daily_range(tick) {
            if !B::DISCARD {
                panic!("{}", self.out_of_range_error(tick));
            }
            // Only the in-range half of the move can be honored: lift the
            // order off its current level and drop the rest.
            if self.orders.contains_key(&id) {
                trace!(side = ?side, id = ?id, tick = %tick, "out-of-range update degrades to remove");
                self.remove_by_id(side, id);
            } else {
                trace!(side = ?side, id = ?id, tick = %tick, "discarding out-of-range update");
            }
            return;
        }

        let (tick0, volume0) = match self.orders.get(&id) {
            Some(entry) => (entry.order.tick(), entry.order.volume()),
            None => panic!("{}", BookError::OrderNotFound(format!("{id:?}"))),
        };

        if Z::DELETE_ON_ZERO && volume.is_zero() {
            self.remove_by_id(side, id);
            return;
        }

        let window = self.window;
        let (levels, bitmap, best, orders) = self.parts_mut(side);

        match orders.get_mut(&id) {
            Some(entry) => {
                entry.order.set_volume(volume);
                entry.order.set_tick(tick);
            }
            None => panic!("{}", BookError::OrderNotFound(format!("{id:?}"))),
        }

        if tick == tick0 {
            let index = window.index_of(tick);
            let level = &mut levels[index];
            level.volume -= volume0;
            level.volume += volume;
            let was_queued = orders.node(id).in_queue();
            if !was_queued {
                if !volume.is_zero() {
                    level.queue.attach(id, orders);
                }
            } else if volume > volume0 {
                level.queue.demote(id, orders);
            }
            let occupied = !level.volume.is_zero();
            Self::settle_level(side, &window, bitmap, best, index, occupied);
        } else {
            let old_index = window.index_of(tick0);
            let new_index = window.index_of(tick);
            {
                let old_level = &mut levels[old_index];
                old_level.volume -= volume0;
                if orders.node(id).in_queue() {
                    old_level.queue.detach(id, orders);
                }
            }
            {
                let new_level = &mut levels[new_index];
                new_level.volume += volume;
                new_level.queue.attach(id, orders);
            }
            let new_occupied = !levels[new_index].volume.is_zero();
            let old_occupied = !levels[old_index].volume.is_zero();
            // New level first: a rescan for the vacated best must already
            // see the destination bit.
            Self::settle_level(side, &window, bitmap, best, new_index, new_occupied);
            Self::settle_level(side, &window, bitmap, best, old_index, old_occupied);
        }
        trace!(side = ?side, id = ?id, tick = %tick, volume = ?volume, "updated order");
    }

    fn remove(&mut self, side: Side, tick: O::Tick, order: O) {
        let id = order.id();
        if !self.in_daily_range(tick) {
            if !B::DISCARD {
                panic!("{}", self.out_of_range_error(tick));
            }
            if !self.orders.contains_key(&id) {
                trace!(side = ?side, id = ?id, tick = %tick, "discarding out-of-range remove");
                return;
            }
            // Known order with a stray tick argument: the stored tick wins.
        }
        self.remove_by_id(side, id);
    }

    fn remove_by_id(&mut self, side: Side, id: O::Id) {
        let (tick0, volume0) = match self.orders.get(&id) {
            Some(entry) => (entry.order.tick(), entry.order.volume()),
            None => panic!("{}", BookError::OrderNotFound(format!("{id:?}"))),
        };
        let window = self.window;
        let index = window.index_of(tick0);
        let (levels, bitmap, best, orders) = self.parts_mut(side);

        if orders.node(id).in_queue() {
            levels[index].queue.detach(id, orders);
        }
        orders.remove(&id);

        let level = &mut levels[index];
        level.volume -= volume0;
        let occupied = !level.volume.is_zero();
        Self::settle_level(side, &window, bitmap, best, index, occupied);
        trace!(side = ?side, id = ?id, tick = %tick0, "removed order");
    }

    /// Refresh occupancy and the best-price cache for one level after a
    /// mutation. Promotion and rescan both flow through here so the cache
    /// invariants cannot drift between call sites.
    fn settle_level(
        side: Side,
        window: &PriceWindow<O::Tick>,
        bitmap: &mut LevelBitmap,
        best: &mut StrongTick<O::Tick>,
        index: usize,
        occupied: bool,
    ) {
        let tick = window.tick_at(index);
        bitmap.set(index, occupied);
        if occupied {
            if best.value().is_none_or(|incumbent| side.better(tick, incumbent)) {
                *best = StrongTick::new(tick);
            }
        } else if best.value() == Some(tick) {
            let next = match side {
                Side::Bid => bitmap.find_highest(),
                Side::Ask => bitmap.find_lowest(),
            };
            *best = next.map(|i| window.tick_at(i)).into();
        }
    }

    fn volume_at_tick(&self, side: Side, tick: O::Tick) -> O::Volume {
        if !self.in_daily_range(tick) {
            if B::DISCARD {
                return O::Volume::ZERO;
            }
            panic!("{}", self.out_of_range_error(tick));
        }
        let index = self.window.index_of(tick);
        match side {
            Side::Bid => self.bids[index].volume,
            Side::Ask => self.asks[index].volume,
        }
    }

    fn synthetic_order(&self, volume: O::Volume, tick: Option<O::Tick>) -> O {
        let mut order = O::default();
        order.set_volume(volume);
        if let Some(tick) = tick {
            order.set_tick(tick);
        }
        order
    }

    /// Bounds gate for mutations. Returns `false` when the request should be
    /// silently dropped; panics under the assert policy.
    fn admit(&self, tick: O::Tick, operation: &'static str) -> bool {
        if self.in_daily_range(tick) {
            return true;
        }
        if B::DISCARD {
            trace!(operation, tick = %tick, "discarding out-of-range request");
            return false;
        }
        panic!("{}", self.out_of_range_error(tick));
    }

    #[inline]
    fn in_daily_range(&self, tick: O::Tick) -> bool {
        tick >= self.stats.daily_low() && tick <= self.stats.daily_high()
    }

    fn out_of_range_error(&self, tick: O::Tick) -> BookError {
        BookError::TickOutOfRange {
            tick: tick.to_string(),
            low: self.stats.daily_low().to_string(),
            high: self.stats.daily_high().to_string(),
        }
    }

    #[allow(clippy::type_complexity)]
    fn parts_mut(
        &mut self,
        side: Side,
    ) -> (
        &mut [Level<S::Level<O::Id>, O::Volume>],
        &mut LevelBitmap,
        &mut StrongTick<O::Tick>,
        &mut OrderIndex<O>,
    ) {
        match side {
            Side::Bid => (
                &mut self.bids,
                &mut self.bid_bitmap,
                &mut self.best_bid,
                &mut self.orders,
            ),
            Side::Ask => (
                &mut self.asks,
                &mut self.ask_bitmap,
                &mut self.best_ask,
                &mut self.orders,
            ),
        }
    }

    fn occupied_levels(&self, side: Side) -> Vec<LevelView<O::Tick, O::Volume>> {
        let (bitmap, levels) = match side {
            Side::Bid => (&self.bid_bitmap, &self.bids),
            Side::Ask => (&self.ask_bitmap, &self.asks),
        };
        (0..bitmap.count())
            .filter_map(|rank| bitmap.select_from_low(rank))
            .map(|index| LevelView {
                tick: self.window.tick_at(index),
                volume: levels[index].volume,
            })
            .collect()
    }
}

impl<O, B, Z> OrderBook<O, Fifo, B, Z>
where
    O: BookOrder,
    B: BoundsPolicy,
    Z: ZeroVolumePolicy,
{
    /// Copy of the order at the head of the `level`-th best bid level.
    ///
    /// # Panics
    ///
    /// Panics when `level` is at or beyond the occupied count, or when the
    /// selected level has no queued orders.
    ///
    /// # Examples
    ///
    /// ```
    /// use tickbook::{Fifo, MarketStats, OrderBook, PlainOrder};
    ///
    /// let stats = MarketStats::new(130, 90, 110, 2000).unwrap();
    /// let mut book: OrderBook<PlainOrder, Fifo> = OrderBook::new(stats);
    /// book.insert_bid(100, PlainOrder { id: 1, volume: 10, tick: 0 });
    /// book.insert_bid(100, PlainOrder { id: 2, volume: 20, tick: 0 });
    ///
    /// assert_eq!(book.front_order_at_bid_level(0).id, 1);
    /// ```
    #[must_use]
    pub fn front_order_at_bid_level(&self, level: usize) -> O {
        self.front_order(Side::Bid, level)
    }

    /// Copy of the order at the head of the `level`-th best ask level.
    /// See [`front_order_at_bid_level`](Self::front_order_at_bid_level).
    #[must_use]
    pub fn front_order_at_ask_level(&self, level: usize) -> O {
        self.front_order(Side::Ask, level)
    }

    fn front_order(&self, side: Side, level: usize) -> O {
        let (bitmap, levels) = match side {
            Side::Bid => (&self.bid_bitmap, &self.bids),
            Side::Ask => (&self.ask_bitmap, &self.asks),
        };
        let index = match side {
            Side::Bid => bitmap.select_from_high(level),
            Side::Ask => bitmap.select_from_low(level),
        }
        .unwrap_or_else(|| {
            panic!(
                "{}",
                BookError::LevelOutOfRange {
                    rank: level,
                    count: bitmap.count(),
                }
            )
        });
        let head = levels[index]
            .queue
            .front()
            .unwrap_or_else(|| panic!("{}", BookError::EmptyLevel { rank: level }));
        self.get_order(head)
    }
}

impl<O, S, B, Z> Serialize for OrderBook<O, S, B, Z>
where
    O: BookOrder,
    O::Tick: Serialize,
    O::Volume: Serialize,
    S: StoragePolicy,
    B: BoundsPolicy,
    Z: ZeroVolumePolicy,
{
    /// Serializes an observability view of the book: the sizing statistics,
    /// the occupied levels of each side in price order, and both best
    /// caches. Resting orders themselves are not part of the view.
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("OrderBook", 5)?;
        state.serialize_field("stats", &self.stats)?;
        state.serialize_field("bids", &self.occupied_levels(Side::Bid))?;
        state.serialize_field("asks", &self.occupied_levels(Side::Ask))?;
        state.serialize_field("best_bid", &self.best_bid)?;
        state.serialize_field("best_ask", &self.best_ask)?;
        state.end()
    }
}
