//! Order book error types

use std::fmt;

/// Errors raised by the order book and its construction paths.
///
/// Contract violations on the mutation path (duplicate insert, unknown
/// update/remove, out-of-range tick under the assert policy) are fatal by
/// design; the book panics with the corresponding variant's message rather
/// than returning it. Construction returns these as values.
#[derive(Debug)]
#[non_exhaustive]
pub enum BookError {
    /// Market statistics rejected at construction
    InvalidMarketStats {
        /// Description of the failed precondition
        message: String,
    },

    /// An insert carried an order ID that is already resting in the book
    DuplicateOrder(String),

    /// Update or remove referenced an ID with no resting order
    OrderNotFound(String),

    /// Tick outside the instrument's daily range
    TickOutOfRange {
        /// The offending tick
        tick: String,
        /// Inclusive lower bound of the daily range
        low: String,
        /// Inclusive upper bound of the daily range
        high: String,
    },

    /// Level query referenced an ordinal at or beyond the occupied count
    LevelOutOfRange {
        /// The requested ordinal
        rank: usize,
        /// Number of occupied levels on that side
        count: usize,
    },

    /// FIFO head requested for a level with no queued orders
    EmptyLevel {
        /// The requested ordinal
        rank: usize,
    },
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::InvalidMarketStats { message } => {
                write!(f, "invalid market statistics: {message}")
            }
            BookError::DuplicateOrder(id) => write!(f, "duplicate order id: {id}"),
            BookError::OrderNotFound(id) => write!(f, "order not found: {id}"),
            BookError::TickOutOfRange { tick, low, high } => {
                write!(f, "tick {tick} outside daily range [{low}, {high}]")
            }
            BookError::LevelOutOfRange { rank, count } => {
                write!(
                    f,
                    "level {rank} out of range: only {count} occupied levels"
                )
            }
            BookError::EmptyLevel { rank } => {
                write!(f, "no queued orders at occupied level {rank}")
            }
        }
    }
}

impl std::error::Error for BookError {}
