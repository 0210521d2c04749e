//! In-place algorithms over the implicit binary tree formed by a slice:
//! - `mmheap`: min-max heaps, a double-ended priority queue with O(1) access to the
//!   minimum and maximum and O(log(n)) push / pop of either end
//! - `select`: rearranging a slice so several rank positions at once (eg median and
//!   quartiles) hold the values they would hold if the slice were sorted
//!
//! Nothing here allocates storage for elements; all work is done by swapping
//! within the caller's slice.

pub mod error;
pub mod mmheap;
pub mod select;

pub use error::ContractError;
pub use mmheap::MmHeap;
pub use select::Pivot;
