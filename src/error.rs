//! Error taxonomy for the shadow-stack runtime.
//!
//! None of these are recoverable in any meaningful sense: they indicate
//! a bug in the instrumenter or the continuation host that called into
//! us. We still return `Result` rather than panicking directly, so the
//! owning computation decides how loudly to fail.

use thiserror::Error;

/// Errors raised by [`crate::Stack`]'s operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    /// `Stack::new` was called with a non-positive initial capacity.
    #[error("initial capacity must be positive, got {requested}")]
    NonPositiveCapacity { requested: isize },

    /// `pushMethod`/`popMethod` invoked on an empty stack.
    #[error("{op} called on an empty stack")]
    EmptyStack { op: &'static str },

    /// `popSegmentAbove` was given a marker that is above the current
    /// stack pointer (i.e. the marker's frame no longer exists).
    #[error("marker is above the current stack pointer")]
    MarkerAboveStackPointer,

    /// `pushMethod`'s `entry` argument did not fit in 14 bits.
    #[error("entry label {value} exceeds the 14-bit limit of {}", crate::bits::ENTRY_LIMIT - 1)]
    EntryOutOfRange { value: u32 },

    /// `pushMethod`'s `numSlots` argument did not fit in 16 bits.
    #[error("slot count {value} exceeds the 16-bit limit of {}", crate::bits::NUM_SLOTS_LIMIT - 1)]
    SlotCountOutOfRange { value: u32 },
}
