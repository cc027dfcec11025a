//! The open list of a best-first search.
//!
//! A d-ary min-heap of [`FrontierEntry`]s. Entries are only ever pushed and
//! popped from the top; stale entries for a node are left in place and
//! dropped by the search when they surface.
//!
//! ```text
//!                                0
//!          1               2               3               4
//!    5  6  7  8      9 10 11 12     13 14 15 16     17 18 19 20
//! ```
//!
//! With arity `A`, the parent of `i` is `(i-1)/A` and its children are
//! `A*i+1 ..= A*(i+1)`.

use std::cmp::min;

use crate::cost::Cost;
use crate::graph::NodeId;
use crate::search_tree::SearchTreeIndex;

const HEAP_ARITY: usize = 4usize;

/// The parent slot.
///
/// ```
/// use route_search::frontier::index_parent;
/// assert_eq!(index_parent::<4>(1), 0);
/// assert_eq!(index_parent::<4>(4), 0);
/// assert_eq!(index_parent::<4>(5), 1);
/// assert_eq!(index_parent::<4>(20), 4);
/// assert_eq!(index_parent::<2>(6), 2);
/// ```
#[inline(always)]
#[must_use]
pub fn index_parent<const A: usize>(i: usize) -> usize {
    (i - 1) / A
}

/// The first child slot.
///
/// ```
/// use route_search::frontier::index_first_child;
/// assert_eq!(index_first_child::<4>(0), 1);
/// assert_eq!(index_first_child::<4>(1), 5);
/// assert_eq!(index_first_child::<2>(3), 7);
/// ```
#[inline(always)]
#[must_use]
pub fn index_first_child<const A: usize>(i: usize) -> usize {
    (A * i) + 1
}

#[inline(always)]
#[must_use]
fn up(i: usize) -> usize {
    index_parent::<HEAP_ARITY>(i)
}
#[inline(always)]
#[must_use]
fn down_first(i: usize) -> usize {
    index_first_child::<HEAP_ARITY>(i)
}

/// Position of the smallest element, the first one on ties.
#[inline(always)]
#[must_use]
fn min_index<T: Ord>(xs: &[T]) -> usize {
    debug_assert!(!xs.is_empty());
    let mut best = 0;
    for (i, x) in xs.iter().enumerate().skip(1) {
        if *x < xs[best] {
            best = i;
        }
    }
    best
}

/// The ranking tuple of the frontier.
///
/// We prefer lower f-values, and tie break by insertion order so the same
/// input always expands nodes in the same order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrontierRank<C: Cost> {
    f: C,
    sequence: u64,
}

impl<C: Cost> FrontierRank<C> {
    pub fn f(&self) -> C {
        self.f
    }
}

/// A discovered, not yet finalized, search state.
#[derive(Debug)]
pub struct FrontierEntry<C: Cost> {
    pub rank: FrontierRank<C>,
    /// Cost accumulated from the start.
    pub g: C,
    pub node: NodeId,
    /// The expansion that generated this entry, `None` for the start.
    pub parent: Option<SearchTreeIndex>,
}

impl<C: Cost> PartialEq for FrontierEntry<C> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank.eq(&other.rank)
    }
}
impl<C: Cost> Eq for FrontierEntry<C> {}

impl<C: Cost> PartialOrd for FrontierEntry<C> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<C: Cost> Ord for FrontierEntry<C> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

#[derive(Debug)]
pub struct Frontier<C: Cost> {
    heap: Vec<FrontierEntry<C>>,
    /// Number of pushes so far. Feeds `FrontierRank::sequence`.
    pushes: u64,
    /// Largest size reached.
    peak_len: usize,
}

impl<C: Cost> Default for Frontier<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Cost> Frontier<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: Vec::with_capacity(64),
            pushes: 0,
            peak_len: 0,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    pub fn pushes(&self) -> u64 {
        self.pushes
    }
    pub fn peak_len(&self) -> usize {
        self.peak_len
    }

    /// Adds an entry ranked by `f`. Existing entries for the same node are
    /// left untouched.
    pub fn push(&mut self, f: C, g: C, node: NodeId, parent: Option<SearchTreeIndex>) {
        self.verify_heap();

        let rank = FrontierRank {
            f,
            sequence: self.pushes,
        };
        self.pushes += 1;

        let index = self.heap.len();
        self.heap.push(FrontierEntry {
            rank,
            g,
            node,
            parent,
        });
        self.sift_up(index);
        self.peak_len = self.peak_len.max(self.heap.len());

        self.verify_heap();
    }

    /// Removes the entry with the lowest f-value, the oldest one on ties.
    #[must_use]
    pub fn pop(&mut self) -> Option<FrontierEntry<C>> {
        match self.heap.len() {
            0 | 1 => self.heap.pop(),
            _ => {
                self.verify_heap();
                let top = self.heap.swap_remove(0);
                self.sift_down(0);
                self.verify_heap();
                Some(top)
            }
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn peek(&self) -> Option<&FrontierEntry<C>> {
        self.heap.first()
    }

    /// Raises an entry. Returns its new index.
    #[inline(always)]
    fn sift_up(&mut self, mut index: usize) -> usize {
        debug_assert!(index < self.heap.len());

        while index > 0 {
            let parent = up(index);
            if self.heap[parent] <= self.heap[index] {
                break;
            }
            self.heap.swap(parent, index);
            index = parent;
        }
        index
    }

    /// Lowers an entry. Returns its new index.
    #[inline(always)]
    fn sift_down(&mut self, mut index: usize) -> usize {
        let len = self.heap.len();
        debug_assert!(index < len || len == 0);

        loop {
            let first = down_first(index);
            if first >= len {
                break;
            }
            let child = first + min_index(&self.heap[first..min(first + HEAP_ARITY, len)]);
            if self.heap[index] <= self.heap[child] {
                break;
            }
            self.heap.swap(index, child);
            index = child;
        }
        index
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap(&self) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap(&self) {
        for i in 1..self.heap.len() {
            let p = up(i);
            assert!(
                self.heap[p] <= self.heap[i],
                "Entry[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={}",
                self.heap[p],
                self.heap[i],
                self.heap.len(),
            );
        }
    }
}
