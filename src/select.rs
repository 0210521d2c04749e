use std::cmp::Ordering;

use log::{debug, trace};
use rand::Rng;

use crate::error::ContractError;

/// How a pivot is picked for each range the selector partitions.
/// Every policy gives the same result; they only differ in running time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pivot {
    /// The first element of the range.  Quadratic on already sorted input
    First,
    /// The middle element of the range
    Middle,
    /// The median of the first, middle and last elements of the range
    MedianOfThree,
    /// A uniformly random element of the range, which makes the selection expected linear
    /// time no matter how the input is arranged
    #[default]
    Random
}

impl Pivot {
    fn choose<T>(self, buf: &[T], cmp: &impl Fn(&T, &T) -> Ordering) -> usize {
        let n = buf.len();
        match self {
            Pivot::First => 0,
            Pivot::Middle => n/2,
            Pivot::MedianOfThree => median_of_three_by(buf, 0, n/2, n - 1, cmp),
            Pivot::Random => rand::thread_rng().gen_range(0..n)
        }
    }
}

fn median_of_three_by<T>(buf: &[T], a: usize, b: usize, c: usize, cmp: &impl Fn(&T, &T) -> Ordering) -> usize {
    let lt = |i: usize, j: usize|cmp(&buf[i], &buf[j]) == Ordering::Less;
    if lt(a, b) {
        if lt(b, c) { b } else if lt(a, c) { c } else { a }
    } else if lt(a, c) { a } else if lt(b, c) { c } else { b }
}

/// Three way ("dutch national flag") partition of `buf` around the element at index `pivot`.
/// Returns `(lt, gt)` such that afterwards everything in `buf[..lt]` is less than the pivot,
/// everything in `buf[lt..gt]` compares equal to it, and everything in `buf[gt..]` is greater.
/// The pivot itself ends up at `lt`, so `lt < gt` always.
/// Panics if `pivot >= buf.len()`.
pub fn partition3_by<T>(buf: &mut [T], pivot: usize, cmp: &impl Fn(&T, &T) -> Ordering) -> (usize, usize) {
    buf.swap(0, pivot);
    let (head, rest) = buf.split_at_mut(1);
    let p = &head[0];
    let (mut lt, mut i, mut gt) = (0, 0, rest.len());
    while i < gt {
        match cmp(&rest[i], p) {
            Ordering::Less => {
                rest.swap(lt, i);
                lt += 1;
                i += 1
            }
            Ordering::Greater => {
                gt -= 1;
                rest.swap(i, gt)
            }
            Ordering::Equal => i += 1
        }
    }
    // rest is offset by one, so buf[lt] is the last element less than the pivot (or the pivot itself)
    buf.swap(0, lt);
    (lt, gt + 1)
}

/// Check that `ranks` can be used to select from a slice of length `len`:
/// every rank must be `< len`, and the ranks must be strictly ascending.
pub fn check_ranks(len: usize, ranks: &[usize]) -> Result<(), ContractError> {
    for (i, w) in ranks.windows(2).enumerate() {
        match w[0].cmp(&w[1]) {
            Ordering::Less => (),
            Ordering::Equal => return Err(ContractError::DuplicateRank{rank: w[0]}),
            Ordering::Greater => return Err(ContractError::RanksNotAscending{index: i + 1})
        }
    }
    match ranks.last() {
        Some(&rank) if rank >= len => Err(ContractError::RankOutOfRange{rank, len}),
        _ => Ok(())
    }
}

/// Reorder `buf` so that for every `r` in `ranks`, `buf[r]` is the element that would be there
/// if `buf` were sorted by `cmp`.  Everything before `buf[r]` is then <= it and everything after is >=.
///
/// This is a quickselect that carries all the ranks along at once: each range is partitioned
/// three ways around a pivot, ranks landing in the block equal to the pivot are done, and the
/// less / greater blocks are processed with just the ranks that fall inside them.
/// Expected O(n log(m)) for m ranks with `Pivot::Random`, and the ranges that still need work
/// are kept on an explicit stack so adversarial inputs can't overflow the call stack.
///
/// Fails without touching `buf` if `ranks` are out of range, not ascending, or repeated.
pub fn try_select_many_by<T>(buf: &mut [T], ranks: &[usize], pivot: Pivot, cmp: &impl Fn(&T, &T) -> Ordering) -> Result<(), ContractError> {
    check_ranks(buf.len(), ranks)?;
    debug!("selecting {} ranks among {} elements ({:?} pivot)", ranks.len(), buf.len(), pivot);
    // ranks stay absolute offsets into buf
    let mut todo = vec![(0, buf.len(), ranks)];
    while let Some((a, b, rs)) = todo.pop() {
        if rs.is_empty() || b - a <= 1
            { continue }
        let p = pivot.choose(&buf[a..b], cmp);
        let (lt, gt) = partition3_by(&mut buf[a..b], p, cmp);
        let (lt, gt) = (a + lt, a + gt);
        let lo = rs.partition_point(|&r|r < lt);
        let hi = rs.partition_point(|&r|r < gt);
        trace!("partitioned [{}, {}) with pivot block [{}, {}), settled {} ranks", a, b, lt, gt, hi - lo);
        todo.push((gt, b, &rs[hi..]));
        todo.push((a, lt, &rs[..lo]));
    }
    Ok(())
}

/// `try_select_many_by` with the default pivot policy.
///
/// # Panics
///
/// Panics if any rank is `>= buf.len()`, or if `ranks` is not sorted or has duplicates.
pub fn select_many_by<T>(buf: &mut [T], ranks: &[usize], cmp: &impl Fn(&T, &T) -> Ordering) {
    if let Err(e) = try_select_many_by(buf, ranks, Pivot::default(), cmp) {
        panic!("select_many: {}", e)
    }
}

/// `select_many_by` using the natural order of `T`
pub fn select_many<T: Ord>(buf: &mut [T], ranks: &[usize]) {
    select_many_by(buf, ranks, &T::cmp)
}

/// Move the median into `buf[buf.len()/2]` and return it, or None if `buf` is empty.
/// For even lengths this is the upper of the two middle elements.
pub fn median_by<'a, T>(buf: &'a mut [T], cmp: &impl Fn(&T, &T) -> Ordering) -> Option<&'a T> {
    let mid = buf.len()/2;
    try_select_many_by(buf, &[mid], Pivot::default(), cmp).ok()?;
    buf.get(mid)
}

pub fn median<T: Ord>(buf: &mut [T]) -> Option<&T> {
    median_by(buf, &T::cmp)
}

/// The positions of the first quartile, median and third quartile in a sorted slice of length `len`
pub fn quartile_ranks(len: usize) -> [usize; 3] {
    // floor(3*len/4) without the intermediate 3*len, which overflows for large len
    [len/4, len/2, len/4*3 + len%4*3/4]
}

/// Select the quartiles of `buf` in one pass, putting each at its `quartile_ranks` position.
/// Returns None if `buf` is empty.  Short slices may have repeated quartile positions.
pub fn quartiles_by<'a, T>(buf: &'a mut [T], cmp: &impl Fn(&T, &T) -> Ordering) -> Option<[&'a T; 3]> {
    let ranks = quartile_ranks(buf.len());
    // ranks is ascending, so repeats are adjacent
    let mut distinct = [0; 3];
    let mut n = 0;
    for r in ranks {
        if n == 0 || distinct[n - 1] != r {
            distinct[n] = r;
            n += 1
        }
    }
    try_select_many_by(buf, &distinct[..n], Pivot::default(), cmp).ok()?;
    let buf: &'a [T] = buf;
    Some(ranks.map(|r|&buf[r]))
}

pub fn quartiles<T: Ord>(buf: &mut [T]) -> Option<[&T; 3]> {
    quartiles_by(buf, &T::cmp)
}
