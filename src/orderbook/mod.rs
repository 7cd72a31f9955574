//! Order book implementation: tick-addressed levels, occupancy bitmaps, and
//! the per-level storage, bounds, and zero-volume policies.

/// Occupancy bitmap with rank/select over price levels.
pub mod bitmap;
pub mod book;
pub mod error;
/// Intrusive FIFO queue threaded through order records.
pub mod fifo;
/// Order accessor traits and the plain sample order type.
pub mod order;
/// Bounds and zero-volume policy selections.
pub mod policy;
/// Select-the-n-th-set-bit word primitive.
pub mod select;
/// Market statistics and the derived price window.
pub mod stats;
/// Per-level storage policy: aggregate-only or FIFO.
pub mod storage;
/// Tick traits and the strong tick wrapper.
pub mod tick;

mod tests;

pub use bitmap::LevelBitmap;
pub use book::OrderBook;
pub use error::BookError;
pub use fifo::{FifoNode, FifoQueue, NodeLookup};
pub use order::{BookOrder, OrderKey, PlainOrder, VolumeValue};
pub use policy::{AssertBounds, BoundsPolicy, DiscardBounds, ZeroAsDelete, ZeroAsValid, ZeroVolumePolicy};
pub use select::select_nth_set_bit;
pub use stats::{MarketStats, PriceWindow};
pub use storage::{Aggregate, Fifo, LevelQueue, StoragePolicy};
pub use tick::{StrongTick, TickValue};
