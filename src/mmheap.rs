use std::{cmp::Ordering, mem};

use log::debug;

use crate::error::ContractError;

// Nodes with index i are in layer n where 2^n is the maximal power of 2 <= i + 1,
// so we can check if n is odd/even by checking if the number of leading zeros in (i + 1)
// is odd/even (usize always has an even width).  In even layers nodes are <= their descendants,
// and in odd layers >=.  The result is the ordering cmp(node, descendant) is allowed to produce
// when the two differ.
fn layer_ord(i: usize) -> Ordering {
    match (i + 1).leading_zeros()&1
        { 1 => Ordering::Less, _ => Ordering::Greater }
}

fn sift_up_by<T>(buf: &mut [T], mut i: usize, cmp: &impl Fn(&T, &T) -> Ordering) {
    if i == 0 || i >= buf.len()
        { return }
    let mut ord = layer_ord(i);
    let mut i1 = (i - 1) >> 1;
    // The parent is on a layer of the opposite kind, so if i beats it in i's own direction
    // they trade places and i continues up through the parent's kind of layer
    if cmp(&buf[i1], &buf[i]) == ord {
        buf.swap(i, i1);
        i = i1;
        ord = ord.reverse()
    }
    while i > 2 {
        i1 = (i - 3) >> 2;
        if cmp(&buf[i], &buf[i1]) == ord {
            buf.swap(i, i1);
            i = i1
        } else { break }
    }
}

fn sift_down_by<T>(buf: &mut [T], mut i: usize, cmp: &impl Fn(&T, &T) -> Ordering) {
    let ord = layer_ord(i);
    while 2*i + 1 < buf.len() {
        // Find m, the index of the extremal element among the children and grandchildren
        // of the element at index i. For min layers, extremal means
        // minimal, and for max layers it means maximal
        let mut m = 2*i + 1;
        for ii in [2*i + 2, 4*i + 3, 4*i + 4, 4*i + 5, 4*i + 6].into_iter().take_while(|&j|j < buf.len()) {
            if cmp(&buf[ii], &buf[m]) == ord
                { m = ii }
        }
        // If m is a grandchild of i (as should be the case most of the time)
        // we may have to sift down farther after fixing up here
        if m > 2*i + 2 {
            if cmp(&buf[m], &buf[i]) == ord {
                buf.swap(m, i);
                let p = (m - 1) >> 1;
                if cmp(&buf[p], &buf[m]) == ord
                    { buf.swap(m, p) }
                i = m;
            } else { break }
        } else {// otherwise m is a direct child so it must be a leaf or its invariant would be wrong
            if cmp(&buf[m], &buf[i]) == ord
                { buf.swap(m, i) }
            break
        }
    }
}

/// Check if `buf` satisfies the min-max heap invariant under `cmp`:
/// every element on an even layer (the root is layer 0) is <= everything below it,
/// and every element on an odd layer is >= everything below it.
/// Comparing each element to its parent and grandparent is enough, since same-kind
/// layers are exactly two apart and the ordering is transitive.
/// Runs in O(n) and never modifies `buf`; empty and single element slices are heaps.
pub fn is_mm_heap_by<T>(buf: &[T], cmp: &impl Fn(&T, &T) -> Ordering) -> bool {
    (1..buf.len()).all(|i|{
        let ord = layer_ord(i);
        if cmp(&buf[i], &buf[(i - 1) >> 1]) == ord.reverse()
            { return false }
        i < 3 || cmp(&buf[i], &buf[(i - 3) >> 2]) != ord
    })
}

/// `is_mm_heap_by` using the natural order of `T`
pub fn is_mm_heap<T: Ord>(buf: &[T]) -> bool {
    is_mm_heap_by(buf, &T::cmp)
}

/// Reorder `buf` in place so it is a min-max heap under `cmp`, in O(n).
/// Any slice is accepted, including empty ones.
pub fn make_mm_heap_by<T>(buf: &mut [T], cmp: &impl Fn(&T, &T) -> Ordering) {
    debug!("building min-max heap of {} elements", buf.len());
    for i in (0..buf.len()/2).rev()
        { sift_down_by(buf, i, cmp) }
}

/// `make_mm_heap_by` using the natural order of `T`
pub fn make_mm_heap<T: Ord>(buf: &mut [T]) {
    make_mm_heap_by(buf, &T::cmp)
}

/// Restore the heap invariant after appending one element.
/// `buf[..len - 1]` must already be a min-max heap under `cmp`, and the last element of `buf`
/// is the one being inserted.  Calling this on an empty slice does nothing.
/// O(log(n)).  The precondition is only verified in debug builds.
pub fn push_mm_heap_by<T>(buf: &mut [T], cmp: &impl Fn(&T, &T) -> Ordering) {
    let Some(last) = buf.len().checked_sub(1) else { return };
    debug_assert!(is_mm_heap_by(&buf[..last], cmp), "push_mm_heap: existing elements are not a min-max heap");
    sift_up_by(buf, last, cmp)
}

/// `push_mm_heap_by` using the natural order of `T`
pub fn push_mm_heap<T: Ord>(buf: &mut [T]) {
    push_mm_heap_by(buf, &T::cmp)
}

/// Get the index of the maximal element of a min-max heap.
/// This is 0 for a single element heap and otherwise whichever of 1 and 2 holds the larger element.
pub fn mm_heap_max_index_by<T>(buf: &[T], cmp: &impl Fn(&T, &T) -> Ordering) -> Option<usize> {
    match buf.len() {
        0 => None,
        1 => Some(0),
        2 => Some(1),
        _ => Some(if cmp(&buf[2], &buf[1]) == Ordering::Greater { 2 } else { 1 })
    }
}

fn pop_idx_by<T>(buf: &mut [T], i: usize, cmp: &impl Fn(&T, &T) -> Ordering) -> Result<(), ContractError> {
    let Some(last) = buf.len().checked_sub(1) else { return Err(ContractError::EmptyHeap) };
    debug_assert!(is_mm_heap_by(buf, cmp), "pop_mm_heap: elements are not a min-max heap");
    buf.swap(i, last);
    sift_down_by(&mut buf[..last], i, cmp);
    Ok(())
}

/// Move the minimal element of a min-max heap to the end of `buf` and restore the invariant
/// for `buf[..len - 1]`, which is the heap with the minimum removed.
/// Nothing is dropped; the caller shrinks its logical range by one.  O(log(n)).
/// Fails with `ContractError::EmptyHeap` if `buf` is empty.
pub fn pop_mm_heap_min_by<T>(buf: &mut [T], cmp: &impl Fn(&T, &T) -> Ordering) -> Result<(), ContractError> {
    pop_idx_by(buf, 0, cmp)
}

/// `pop_mm_heap_min_by` using the natural order of `T`
pub fn pop_mm_heap_min<T: Ord>(buf: &mut [T]) -> Result<(), ContractError> {
    pop_mm_heap_min_by(buf, &T::cmp)
}

/// Move the maximal element of a min-max heap to the end of `buf` and restore the invariant
/// for `buf[..len - 1]`.  The mirror image of `pop_mm_heap_min_by`.
pub fn pop_mm_heap_max_by<T>(buf: &mut [T], cmp: &impl Fn(&T, &T) -> Ordering) -> Result<(), ContractError> {
    let i = mm_heap_max_index_by(buf, cmp).ok_or(ContractError::EmptyHeap)?;
    pop_idx_by(buf, i, cmp)
}

/// `pop_mm_heap_max_by` using the natural order of `T`
pub fn pop_mm_heap_max<T: Ord>(buf: &mut [T]) -> Result<(), ContractError> {
    pop_mm_heap_max_by(buf, &T::cmp)
}

/// An owned double-ended priority queue: a `Vec` kept in min-max heap order by the slice
/// functions above.
/// - Peek min: O(1), peek max: one comparison
/// - Push, pop min, pop max: O(log(n))
/// - Building from a `Vec`: O(n)
/// The heap does not store its comparator, so every call that inspects order takes one.
/// Passing a different comparator than the one the heap was ordered by requires `ify_by` first.
pub struct MmHeap<T> {
    buf: Vec<T>
}

impl<T> Default for MmHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MmHeap<T> {
	/// An empty heap, no allocation until the first push
    pub fn new() -> Self {
        Self{buf: Vec::new()}
    }

	/// Take ownership of `buf` and arrange it into min-max heap order under `cmp` in O(n)
    pub fn make(buf: Vec<T>, cmp: &impl Fn(&T, &T) -> Ordering) -> Self {
        let mut res = Self{buf};
        res.ify_by(cmp);
        res
    }

	/// Rebuild the heap order under `cmp`.  Only needed when switching comparators,
	/// since every other method keeps the order for the comparator it is given.
    pub fn ify_by(&mut self, cmp: &impl Fn(&T, &T) -> Ordering) {
        make_mm_heap_by(&mut self.buf, cmp)
    }

	/// Number of queued elements
	pub fn len(&self) -> usize {
		self.buf.len()
	}

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View the heap's buffer in its internal (heap) order
    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

	/// The root, which is the smallest element
    pub fn peek_min(&self) -> Option<&T> {
        self.buf.first()
    }

	/// The larger of the root's children (or the root itself for a single element)
    pub fn peek_max_by(&self, cmp: &impl Fn(&T, &T) -> Ordering) -> Option<&T> {
        mm_heap_max_index_by(&self.buf, cmp).map(|i|&self.buf[i])
    }

	/// Append `e` and sift it up.  Ties with existing elements are popped in no particular order
    pub fn push_by(&mut self, e: T, cmp: &impl Fn(&T, &T) -> Ordering) {
        self.buf.push(e);
        push_mm_heap_by(&mut self.buf, cmp)
    }

	/// Remove and return the smallest element, or None when empty
    pub fn pop_min_by(&mut self, cmp: &impl Fn(&T, &T) -> Ordering) -> Option<T> {
        pop_mm_heap_min_by(&mut self.buf, cmp).ok()?;
        self.buf.pop()
    }

	/// Remove and return the largest element, or None when empty
    pub fn pop_max_by(&mut self, cmp: &impl Fn(&T, &T) -> Ordering) -> Option<T> {
        pop_mm_heap_max_by(&mut self.buf, cmp).ok()?;
        self.buf.pop()
    }

	/// Same result as `push_by` then `pop_min_by`.  If `e` would come straight back out it is
	/// returned untouched, otherwise it overwrites the root and is sifted down once.
    pub fn pushpop_min_by(&mut self, e: T, cmp: &impl Fn(&T, &T) -> Ordering) -> T {
        let Some(min) = self.buf.first_mut() else { return e };
        if cmp(&e, min) != Ordering::Greater
            { return e }
        let res = mem::replace(min, e);
        sift_down_by(&mut self.buf, 0, cmp);
        res
    }

	/// Same result as `push_by` then `pop_max_by`, with a single sift from the max position
    pub fn pushpop_max_by(&mut self, e: T, cmp: &impl Fn(&T, &T) -> Ordering) -> T {
        let Some(m) = mm_heap_max_index_by(&self.buf, cmp) else { return e };
        if cmp(&e, &self.buf[m]) != Ordering::Less
            { return e }
        let res = mem::replace(&mut self.buf[m], e);
        // the new element may be smaller than the root, in which case they trade places
        // and the old root gets sifted down from the max layer instead
        if cmp(&self.buf[m], &self.buf[0]) == Ordering::Less
            { self.buf.swap(0, m) }
        sift_down_by(&mut self.buf, m, cmp);
        res
    }

    pub fn extend_by<U: IntoIterator<Item=T>>(&mut self, iter: U, cmp: &impl Fn(&T, &T) -> Ordering) {
        for x in iter {
            self.push_by(x, cmp)
        }
    }
}

impl<'a, T> IntoIterator for &'a MmHeap<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}

impl<T> From<MmHeap<T>> for Vec<T> {
    fn from(heap: MmHeap<T>) -> Self {
        heap.buf
    }
}
