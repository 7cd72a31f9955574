//! # Price-Indexed Limit Order Book Core
//!
//! An in-memory limit order book for a single instrument, keyed by discrete
//! price ticks. The book preallocates a dense array of price levels over a
//! window derived from daily market statistics, so inserts, updates, removes
//! and top-of-book queries all run in effectively constant time: a tick maps
//! to its level by one subtraction, and a hierarchical occupancy bitmap
//! answers best-price and ordinal-level questions with hardware bit scans.
//!
//! ## Key Features
//!
//! - **Tick-addressed levels**: no tree walk and no hashing on the level
//!   path; the expected daily range bounds the allocation once, up front.
//! - **Rank/select occupancy bitmaps**: `find_lowest`/`find_highest` for the
//!   best prices and `select_from_low(k)`/`select_from_high(k)` for the
//!   ordinal-k-th occupied level, with a PDEP fast path where the CPU has
//!   BMI2 and a byte-table fallback everywhere else.
//! - **Optional FIFO priority**: per-level intrusive queues preserve
//!   same-price arrival order; growing an order demotes it to the back,
//!   shrinking keeps its place.
//! - **Caller-defined orders**: the book reads and writes orders through
//!   five accessors ([`BookOrder`]); any value-semantic struct qualifies.
//! - **Monomorphized policies**: storage ([`Aggregate`] / [`Fifo`]), bounds
//!   handling ([`AssertBounds`] / [`DiscardBounds`]) and zero-volume
//!   handling ([`ZeroAsValid`] / [`ZeroAsDelete`]) are type parameters, so
//!   the hot path carries no runtime dispatch.
//!
//! ## What this crate is not
//!
//! There is no matching: insertions never cross the book and no trades are
//! emitted. The book is single-threaded by contract, does not persist
//! state, and tracks exactly one instrument per instance.
//!
//! ## Quick start
//!
//! ```
//! use tickbook::{MarketStats, OrderBook, PlainOrder};
//!
//! let stats = MarketStats::new(130, 90, 110, 2000).unwrap();
//! let mut book: OrderBook<PlainOrder> = OrderBook::new(stats);
//!
//! book.insert_bid(100, PlainOrder { id: 1, volume: 10, tick: 0 });
//! book.insert_bid(101, PlainOrder { id: 2, volume: 5, tick: 0 });
//! book.insert_ask(115, PlainOrder { id: 3, volume: 20, tick: 0 });
//!
//! assert_eq!(book.best_bid(), 101);
//! assert_eq!(book.best_ask(), 115);
//! assert_eq!(book.bid_at_level(1).volume, 10);
//! ```
//!
//! FIFO storage additionally exposes the head of each level's queue:
//!
//! ```
//! use tickbook::{Fifo, MarketStats, OrderBook, PlainOrder};
//!
//! let stats = MarketStats::new(130, 90, 110, 2000).unwrap();
//! let mut book: OrderBook<PlainOrder, Fifo> = OrderBook::new(stats);
//!
//! book.insert_bid(100, PlainOrder { id: 1, volume: 10, tick: 0 });
//! book.insert_bid(100, PlainOrder { id: 2, volume: 20, tick: 0 });
//!
//! assert_eq!(book.front_order_at_bid_level(0).id, 1);
//! ```

pub mod orderbook;
pub mod prelude;

pub use orderbook::bitmap::LevelBitmap;
pub use orderbook::book::OrderBook;
pub use orderbook::error::BookError;
pub use orderbook::fifo::{FifoNode, FifoQueue, NodeLookup};
pub use orderbook::order::{BookOrder, OrderKey, PlainOrder, VolumeValue};
pub use orderbook::policy::{
    AssertBounds, BoundsPolicy, DiscardBounds, ZeroAsDelete, ZeroAsValid, ZeroVolumePolicy,
};
pub use orderbook::select::select_nth_set_bit;
pub use orderbook::stats::{MarketStats, PriceWindow};
pub use orderbook::storage::{Aggregate, Fifo, LevelQueue, StoragePolicy};
pub use orderbook::tick::{StrongTick, TickValue};

/// Aggregate-storage book over the built-in [`PlainOrder`] type.
///
/// The recommended starting point when the caller has no order record of
/// its own.
pub type DefaultOrderBook = OrderBook<PlainOrder>;

/// FIFO-storage book over the built-in [`PlainOrder`] type.
pub type DefaultFifoOrderBook = OrderBook<PlainOrder, Fifo>;
