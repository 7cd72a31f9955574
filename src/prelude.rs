//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, bring the whole working set
//! in at once:
//!
//! ```rust
//! use tickbook::prelude::*;
//! ```

// Core book and configuration
pub use crate::orderbook::book::OrderBook;
pub use crate::orderbook::error::BookError;
pub use crate::orderbook::stats::{MarketStats, PriceWindow};

// Policy selections
pub use crate::orderbook::policy::{
    AssertBounds, BoundsPolicy, DiscardBounds, ZeroAsDelete, ZeroAsValid, ZeroVolumePolicy,
};
pub use crate::orderbook::storage::{Aggregate, Fifo, LevelQueue, StoragePolicy};

// Order capability traits and the sample order
pub use crate::orderbook::order::{BookOrder, OrderKey, PlainOrder, VolumeValue};
pub use crate::orderbook::tick::{StrongTick, TickValue};

// Substructures useful on their own
pub use crate::orderbook::bitmap::LevelBitmap;
pub use crate::orderbook::fifo::{FifoNode, FifoQueue, NodeLookup};
pub use crate::orderbook::select::select_nth_set_bit;

// Type aliases for common configurations
pub use crate::{DefaultFifoOrderBook, DefaultOrderBook};
