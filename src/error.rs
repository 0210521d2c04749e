use thiserror::Error;

/// A caller broke the contract of one of the heap or selection operations.
/// These are programming errors at the call site, never transient failures,
/// so nothing in this crate retries or repairs the input.
/// Validation (`is_mm_heap`) reports a plain `bool` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// Tried to pop from a heap with no elements.
    #[error("cannot pop from an empty min-max heap")]
    EmptyHeap,

    /// A rank target does not address an element of the slice.
    #[error("rank {rank} is out of range for a slice of length {len}")]
    RankOutOfRange { rank: usize, len: usize },

    /// Rank targets must be given in ascending order.
    #[error("rank targets are not ascending at index {index}")]
    RanksNotAscending { index: usize },

    /// The same rank target was given twice.
    #[error("rank {rank} was requested more than once")]
    DuplicateRank { rank: usize },
}
