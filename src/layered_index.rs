//! The skiplist container.

use std::{cmp::Ordering, fmt, iter, num::NonZeroUsize};

use tracing::{debug, trace};

use crate::{
    config::{Builder, SearchStrategy},
    error::Error,
    node::{Arena, NodeId, Slot, TowerNode},
    promotion::{CoinFlip, Promotion},
};

// ////////////////////////////////////////////////////////////////////////////
// LayeredIndex
// ////////////////////////////////////////////////////////////////////////////

/// An ordered set of unique `i32` keys stored as a skiplist.
///
/// The index is made of `depth` rows. Each row is a doubly linked list
/// bounded by a head guard and a tail guard, which sort before and after
/// every key respectively. Row 0 holds every key; each key is then promoted
/// to the rows above it, one row at a time, for as long as its
/// [`Promotion`] policy agrees. The copies of one key form a _tower_ linked
/// vertically from row 0 up to its highest row.
///
/// After every operation the following hold:
///
/// - within a row, keys strictly increase from the head guard to the tail
///   guard;
/// - the keys of row `i + 1` are a subset of those of row `i`;
/// - a key present at row `i` is present, and vertically linked, at every row
///   below `i`;
/// - a key appears at most once per row, and the set of keys is exactly the
///   set of row 0.
///
/// # Examples
///
/// ```
/// use layered_index::LayeredIndex;
///
/// let mut index = LayeredIndex::new(5)?;
/// assert!(index.insert(4));
/// assert!(index.insert(6));
/// assert!(!index.insert(4));
/// assert!(index.insert(5));
/// assert_eq!(index.row(0), Some(vec![4, 5, 6]));
///
/// assert!(index.contains(6));
/// assert!(index.remove(6));
/// assert!(!index.contains(6));
/// assert!(!index.remove(6));
/// # Ok::<(), layered_index::Error>(())
/// ```
#[derive(Clone)]
pub struct LayeredIndex<P = CoinFlip> {
    arena: Arena,
    /// Head guard of each row, indexed by row.
    heads: Vec<NodeId>,
    /// Tail guard of each row, indexed by row.
    tails: Vec<NodeId>,
    len: usize,
    search: SearchStrategy,
    promotion: P,
}

// ///////////////////////////////////////////////
// Constructors
// ///////////////////////////////////////////////

impl LayeredIndex<CoinFlip> {
    /// Create an empty index with `depth` rows, promoting keys with a fair
    /// coin and searching by descent.
    ///
    /// # Errors
    ///
    /// [`Error::ZeroDepth`] if `depth` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_index::{Error, LayeredIndex};
    ///
    /// assert_eq!(LayeredIndex::new(4)?.depth(), 4);
    /// assert_eq!(LayeredIndex::new(0).err(), Some(Error::ZeroDepth));
    /// # Ok::<(), layered_index::Error>(())
    /// ```
    #[inline]
    pub fn new(depth: usize) -> Result<Self, Error> {
        Builder::new().depth(depth).build()
    }

    /// Start configuring an index.
    #[inline]
    #[must_use]
    pub fn builder() -> Builder {
        Builder::new()
    }
}

impl Default for LayeredIndex<CoinFlip> {
    /// A single-row index, behaving as a sorted doubly linked list.
    #[inline]
    fn default() -> Self {
        Self::assemble(NonZeroUsize::MIN, SearchStrategy::default(), CoinFlip::default())
    }
}

impl<P> LayeredIndex<P> {
    pub(crate) fn assemble(depth: NonZeroUsize, search: SearchStrategy, promotion: P) -> Self {
        let (arena, heads, tails) = Self::guards(depth.get());
        debug!(depth = depth.get(), ?search, "created layered index");
        LayeredIndex {
            arena,
            heads,
            tails,
            len: 0,
            search,
            promotion,
        }
    }

    /// Allocate an empty row for each level, with the guards of consecutive
    /// rows linked vertically.
    fn guards(depth: usize) -> (Arena, Vec<NodeId>, Vec<NodeId>) {
        let mut arena = Arena::with_capacity(2 * depth);
        let mut heads: Vec<NodeId> = Vec::with_capacity(depth);
        let mut tails: Vec<NodeId> = Vec::with_capacity(depth);

        for _ in 0..depth {
            let head = arena.alloc(TowerNode::new(Slot::Min));
            let tail = arena.alloc(TowerNode::new(Slot::Max));
            arena[head].next = Some(tail);
            arena[tail].prev = Some(head);

            if let (Some(&below_head), Some(&below_tail)) = (heads.last(), tails.last()) {
                arena[head].down = Some(below_head);
                arena[below_head].up = Some(head);
                arena[tail].down = Some(below_tail);
                arena[below_tail].up = Some(tail);
            }

            heads.push(head);
            tails.push(tail);
        }

        (arena, heads, tails)
    }
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<P> LayeredIndex<P> {
    /// The number of rows.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.heads.len()
    }

    /// The number of keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_index::LayeredIndex;
    ///
    /// let mut index = LayeredIndex::new(3)?;
    /// index.extend([3, 1, 3, 2]);
    /// assert_eq!(index.len(), 3);
    /// # Ok::<(), layered_index::Error>(())
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the index holds no keys.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// How lookups walk the rows.
    #[inline]
    #[must_use]
    pub fn search_strategy(&self) -> SearchStrategy {
        self.search
    }

    /// The promotion policy.
    #[inline]
    #[must_use]
    pub fn promotion(&self) -> &P {
        &self.promotion
    }

    /// The promotion policy, mutably.
    #[inline]
    pub fn promotion_mut(&mut self) -> &mut P {
        &mut self.promotion
    }

    /// Returns `true` if `key` is in the index.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_index::LayeredIndex;
    ///
    /// let mut index = LayeredIndex::new(3)?;
    /// index.insert(2);
    /// assert!(index.contains(2));
    /// assert!(!index.contains(3));
    /// # Ok::<(), layered_index::Error>(())
    /// ```
    #[inline]
    #[must_use]
    pub fn contains(&self, key: i32) -> bool {
        self.find(key).is_some()
    }

    /// Remove `key` from every row it occupies.
    ///
    /// Returns `false`, leaving the index untouched, if `key` is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_index::LayeredIndex;
    ///
    /// let mut index = LayeredIndex::new(3)?;
    /// index.insert(2);
    /// assert!(index.remove(2));
    /// assert!(!index.remove(2));
    /// assert!(index.is_empty());
    /// # Ok::<(), layered_index::Error>(())
    /// ```
    pub fn remove(&mut self, key: i32) -> bool {
        let Some(top) = self.find(key) else {
            return false;
        };
        debug_assert!(
            self.arena[top].up.is_none(),
            "search must stop at the top of a tower"
        );

        // Collapse the tower from its top row down to row 0.
        let mut collapsed = 0_usize;
        let mut current = Some(top);
        while let Some(id) = current {
            let node = self.arena.release(id);
            current = node.down;
            let (Some(prev), Some(next)) = (node.prev, node.next) else {
                panic!("key {key} is not bounded by guards");
            };
            self.arena[prev].next = Some(next);
            self.arena[next].prev = Some(prev);
            collapsed += 1;
        }

        self.len -= 1;
        trace!(key, collapsed, "removed key");
        true
    }

    /// Remove every key, keeping the depth and promotion policy.
    #[inline]
    pub fn clear(&mut self) {
        let (arena, heads, tails) = Self::guards(self.depth());
        self.arena = arena;
        self.heads = heads;
        self.tails = tails;
        self.len = 0;
    }

    /// The number of rows spanned by the tower of `key`, or `None` if `key`
    /// is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_index::{LayeredIndex, Scripted};
    ///
    /// let mut index = LayeredIndex::builder()
    ///     .depth(3)
    ///     .build_with(Scripted::new([true, false]))?;
    /// index.insert(1);
    /// assert_eq!(index.height(1), Some(2));
    /// assert_eq!(index.height(2), None);
    /// # Ok::<(), layered_index::Error>(())
    /// ```
    #[must_use]
    pub fn height(&self, key: i32) -> Option<usize> {
        let base = self.seek(self.head(0), key).ok()?;
        Some(iter::successors(Some(base), |&id| self.arena[id].up).count())
    }

    /// The keys of row `level` in ascending order, or `None` if there is no
    /// such row.
    #[must_use]
    pub fn row(&self, level: usize) -> Option<Vec<i32>> {
        let head = *self.heads.get(level)?;
        Some(
            self.walk(head)
                .filter_map(|id| self.arena[id].slot.key())
                .collect(),
        )
    }

    /// Iterate over the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_index::LayeredIndex;
    ///
    /// let mut index = LayeredIndex::new(4)?;
    /// index.extend([5, 3, 9]);
    /// assert!(index.iter().eq([3, 5, 9]));
    /// # Ok::<(), layered_index::Error>(())
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            arena: &self.arena,
            next: self.arena[self.head(0)].next,
            remaining: self.len,
        }
    }

    /// Render every row, top row first; see the [`Display`][fmt::Display]
    /// implementation.
    #[inline]
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    // /////////////////////////////
    // Internal methods
    // /////////////////////////////

    /// Every node of the row starting at `start`, `start` included.
    fn walk(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(Some(start), |&id| self.arena[id].next)
    }

    /// Scan the row from `start`, which must sort below `key`.
    ///
    /// Returns `Ok` with the node holding `key`, or `Err` with the first node
    /// sorting above it.
    fn seek(&self, start: NodeId, key: i32) -> Result<NodeId, NodeId> {
        let target = Slot::Key(key);
        for id in self.walk(start) {
            match self.arena[id].slot.cmp(&target) {
                Ordering::Less => {}
                Ordering::Equal => return Ok(id),
                Ordering::Greater => return Err(id),
            }
        }
        unreachable!("every row ends with a tail guard")
    }

    /// The topmost node holding `key`.
    fn find(&self, key: i32) -> Option<NodeId> {
        match self.search {
            SearchStrategy::Linear => self.find_linear(key),
            SearchStrategy::Descent => self.find_descent(key),
        }
    }

    fn find_linear(&self, key: i32) -> Option<NodeId> {
        let target = Slot::Key(key);
        self.heads
            .iter()
            .rev()
            .find_map(|&head| self.walk(head).find(|&id| self.arena[id].slot == target))
    }

    fn find_descent(&self, key: i32) -> Option<NodeId> {
        let target = Slot::Key(key);
        let mut current = self.top();
        loop {
            while let Some(next) = self.arena[current].next {
                match self.arena[next].slot.cmp(&target) {
                    Ordering::Less => current = next,
                    Ordering::Equal => return Some(next),
                    Ordering::Greater => break,
                }
            }
            current = self.arena[current].down?;
        }
    }

    /// The head guard of row `level`.
    ///
    /// # Panics
    ///
    /// If there is no such row.
    #[expect(clippy::indexing_slicing, reason = "Callers stay below the depth")]
    fn head(&self, level: usize) -> NodeId {
        self.heads[level]
    }

    /// The head guard of the top row.
    fn top(&self) -> NodeId {
        self.head(self.depth() - 1)
    }

    /// The last node below `key` in every row, indexed by row, found by
    /// descending from the top row.
    fn descent_path(&self, key: i32) -> Vec<NodeId> {
        let target = Slot::Key(key);
        let mut path = Vec::with_capacity(self.depth());
        let mut current = self.top();
        loop {
            while let Some(next) = self.arena[current].next {
                if self.arena[next].slot < target {
                    current = next;
                } else {
                    break;
                }
            }
            path.push(current);
            match self.arena[current].down {
                Some(down) => current = down,
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// The node of row `level` from which to scan for an insertion point:
    /// the row's head guard, or the descent `path` entry when there is one.
    fn scan_start(&self, path: Option<&[NodeId]>, level: usize) -> NodeId {
        path.and_then(|path| path.get(level).copied())
            .unwrap_or_else(|| self.head(level))
    }

    /// Splice the unlinked `node` into a row just before `successor`.
    ///
    /// # Panics
    ///
    /// If the row would no longer be strictly increasing; the caller has
    /// located the wrong insertion point.
    fn link_before(&mut self, node: NodeId, successor: NodeId) {
        let slot = self.arena[node].slot;
        assert!(
            slot < self.arena[successor].slot,
            "{slot} must sort before {}",
            self.arena[successor].slot
        );
        let Some(prev) = self.arena[successor].prev else {
            panic!("cannot link {slot} before an unlinked node");
        };

        self.arena[node].prev = Some(prev);
        self.arena[node].next = Some(successor);
        self.arena[prev].next = Some(node);
        self.arena[successor].prev = Some(node);

        assert!(
            self.arena[prev].slot < slot,
            "{slot} must sort after {}",
            self.arena[prev].slot
        );
    }
}

impl<P> LayeredIndex<P>
where
    P: Promotion,
{
    /// Insert `key`, returning `false` and leaving the index untouched if it
    /// is already present.
    ///
    /// The key always enters row 0, and then climbs one row at a time until
    /// the promotion policy refuses or the top row is reached.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_index::LayeredIndex;
    ///
    /// let mut index = LayeredIndex::new(3)?;
    /// assert!(index.insert(4));
    /// assert!(!index.insert(4));
    /// # Ok::<(), layered_index::Error>(())
    /// ```
    pub fn insert(&mut self, key: i32) -> bool {
        let path = match self.search {
            SearchStrategy::Linear => None,
            SearchStrategy::Descent => Some(self.descent_path(key)),
        };
        let successor = match self.seek(self.scan_start(path.as_deref(), 0), key) {
            Ok(_) => {
                trace!(key, "rejected duplicate key");
                return false;
            }
            Err(successor) => successor,
        };

        let mut below = self.arena.alloc(TowerNode::new(Slot::Key(key)));
        self.link_before(below, successor);

        let mut height = 1_usize;
        for level in 1..self.depth() {
            if !self.promotion.promote() {
                break;
            }
            let node = self.arena.alloc(TowerNode {
                down: Some(below),
                ..TowerNode::new(Slot::Key(key))
            });
            self.arena[below].up = Some(node);
            let start = self.scan_start(path.as_deref(), level);
            let Err(successor) = self.seek(start, key) else {
                panic!("key {key} already present above row 0");
            };
            self.link_before(node, successor);
            below = node;
            height += 1;
        }

        self.len += 1;
        trace!(key, height, "inserted key");
        true
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<P> Extend<i32> for LayeredIndex<P>
where
    P: Promotion,
{
    #[inline]
    fn extend<I: IntoIterator<Item = i32>>(&mut self, iterable: I) {
        for key in iterable {
            self.insert(key);
        }
    }
}

impl<'a, P> IntoIterator for &'a LayeredIndex<P> {
    type Item = i32;
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<P> fmt::Debug for LayeredIndex<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;

        for (i, key) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key:?}")?;
        }
        write!(f, "]")
    }
}

impl<P> fmt::Display for LayeredIndex<P> {
    /// One line per row, top row first, listing the guards and keys in order:
    ///
    /// ```text
    /// Level: 1 -- -2147483648, 4, 2147483647,
    /// Level: 0 -- -2147483648, 4, 6, 2147483647,
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (level, &head) in self.heads.iter().enumerate().rev() {
            write!(f, "Level: {level} -- ")?;
            for (i, id) in self.walk(head).enumerate() {
                if i != 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.arena[id].slot)?;
            }
            writeln!(f, ",")?;
        }
        Ok(())
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Iterator
// ////////////////////////////////////////////////////////////////////////////

/// Ascending iterator over the keys of a [`LayeredIndex`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    arena: &'a Arena,
    next: Option<NodeId>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = i32;

    #[inline]
    fn next(&mut self) -> Option<i32> {
        let arena = self.arena;
        let node = &arena[self.next?];
        let key = node.slot.key()?;
        self.next = node.next;
        self.remaining -= 1;
        Some(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

// ////////////////////////////////////////////////////////////////////////////
// Invariant checks
// ////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
impl<P> LayeredIndex<P> {
    /// Panic unless every structural invariant holds.
    pub(crate) fn check(&self) {
        let depth = self.depth();
        assert_eq!(self.tails.len(), depth);

        let mut nodes = 0;
        let mut previous_row: Option<Vec<i32>> = None;
        for level in 0..depth {
            let head = self.heads[level];
            let tail = self.tails[level];

            // Guards.
            assert_eq!(self.arena[head].slot, Slot::Min);
            assert_eq!(self.arena[tail].slot, Slot::Max);
            assert_eq!(self.arena[head].prev, None);
            assert_eq!(self.arena[tail].next, None);
            let below = level.checked_sub(1);
            assert_eq!(self.arena[head].down, below.map(|l| self.heads[l]));
            assert_eq!(self.arena[tail].down, below.map(|l| self.tails[l]));
            assert_eq!(self.arena[head].up, self.heads.get(level + 1).copied());
            assert_eq!(self.arena[tail].up, self.tails.get(level + 1).copied());

            // Horizontal links and ordering.
            let ids: Vec<NodeId> = self.walk(head).collect();
            assert_eq!(ids.last(), Some(&tail), "row {level} must end at its tail guard");
            for pair in ids.windows(2) {
                assert!(self.arena[pair[0]].slot < self.arena[pair[1]].slot);
                assert_eq!(self.arena[pair[1]].prev, Some(pair[0]));
            }
            nodes += ids.len();

            // Vertical links.
            for &id in &ids[1..ids.len() - 1] {
                let node = &self.arena[id];
                match node.down {
                    None => assert_eq!(level, 0, "{} has no copy below row {level}", node.slot),
                    Some(down) => {
                        assert!(level > 0);
                        assert_eq!(self.arena[down].slot, node.slot);
                        assert_eq!(self.arena[down].up, Some(id));
                    }
                }
                if let Some(up) = node.up {
                    assert!(level + 1 < depth);
                    assert_eq!(self.arena[up].slot, node.slot);
                    assert_eq!(self.arena[up].down, Some(id));
                }
            }

            // Subset of the row below.
            let keys = self.row(level).unwrap_or_default();
            if let Some(previous) = &previous_row {
                assert!(keys.iter().all(|key| previous.binary_search(key).is_ok()));
            } else {
                assert_eq!(keys.len(), self.len);
            }
            previous_row = Some(keys);
        }
        assert_eq!(self.arena.live(), nodes);
    }
}
