//! Bounds and zero-volume policy selections.
//!
//! Both policies are chosen as type parameters so the hot path is
//! monomorphized; there is no runtime dispatch on either decision.

/// How the book treats ticks outside `[daily_low, daily_high]`.
pub trait BoundsPolicy {
    /// `true` silently drops out-of-range requests, `false` treats them as
    /// fatal contract violations.
    const DISCARD: bool;
}

/// Out-of-range ticks are a hard precondition violation; the book panics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssertBounds;

impl BoundsPolicy for AssertBounds {
    const DISCARD: bool = false;
}

/// Out-of-range mutations are silently ignored and out-of-range volume
/// queries return zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiscardBounds;

impl BoundsPolicy for DiscardBounds {
    const DISCARD: bool = true;
}

/// How the book treats an update that drops an order's volume to zero.
pub trait ZeroVolumePolicy {
    /// `true` erases the order entirely on a zero-volume update.
    const DELETE_ON_ZERO: bool;
}

/// A zero-volume order is a valid resting order; `remove` is still required
/// to free it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZeroAsValid;

impl ZeroVolumePolicy for ZeroAsValid {
    const DELETE_ON_ZERO: bool = false;
}

/// An update to volume zero implicitly removes the order from the queue and
/// the index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZeroAsDelete;

impl ZeroVolumePolicy for ZeroAsDelete {
    const DELETE_ON_ZERO: bool = true;
}
