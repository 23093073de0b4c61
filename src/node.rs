//! Storage for the nodes making up the rows and towers of a
//! [`LayeredIndex`][crate::LayeredIndex].
//!
//! Nodes live in an [`Arena`] and refer to each other through [`NodeId`]s
//! rather than pointers. The arena owns every node, guards included, so
//! collapsing a tower only has to rewire the neighbours' indices before
//! handing the slots back.

use std::fmt;

// ////////////////////////////////////////////////////////////////////////////
// Slot
// ////////////////////////////////////////////////////////////////////////////

/// What a node holds: a real key, or one of the two guards bounding a row.
///
/// The derived ordering places [`Slot::Min`] before every key and
/// [`Slot::Max`] after every key, so guards never compare equal to a key,
/// even `i32::MIN` or `i32::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Slot {
    /// The guard at the head of a row.
    Min,
    Key(i32),
    /// The guard at the tail of a row.
    Max,
}

impl Slot {
    pub(crate) fn key(self) -> Option<i32> {
        match self {
            Slot::Key(key) => Some(key),
            Slot::Min | Slot::Max => None,
        }
    }
}

impl fmt::Display for Slot {
    /// Guards are written as the extreme values of the key type.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Min => write!(f, "{}", i32::MIN),
            Slot::Key(key) => write!(f, "{key}"),
            Slot::Max => write!(f, "{}", i32::MAX),
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// TowerNode
// ////////////////////////////////////////////////////////////////////////////

/// Index of a node within its [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// One (key, row) pair.
///
/// `next`/`prev` link the node to its ordered neighbours within the row;
/// `up`/`down` link it to the copy of the same slot one row above or below.
/// All four are plain indices: ownership rests with the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TowerNode {
    pub slot: Slot,
    pub next: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub up: Option<NodeId>,
    pub down: Option<NodeId>,
}

impl TowerNode {
    /// Create an unlinked node.
    pub fn new(slot: Slot) -> Self {
        TowerNode {
            slot,
            next: None,
            prev: None,
            up: None,
            down: None,
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Arena
// ////////////////////////////////////////////////////////////////////////////

/// Owner of every node, recycling the slots of released nodes.
#[derive(Clone, Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<Option<TowerNode>>,
    free: Vec<usize>,
}

impl Arena {
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Take ownership of `node`, returning its handle.
    #[expect(clippy::indexing_slicing, reason = "Free slots are in bounds")]
    pub fn alloc(&mut self, node: TowerNode) -> NodeId {
        if let Some(index) = self.free.pop() {
            self.nodes[index] = Some(node);
            NodeId(index)
        } else {
            self.nodes.push(Some(node));
            NodeId(self.nodes.len() - 1)
        }
    }

    /// Drop the node behind `id`, returning it. The handle must not be used
    /// afterwards.
    ///
    /// # Panics
    ///
    /// If `id` was already released.
    #[expect(clippy::indexing_slicing, reason = "Dangling handles are bugs")]
    pub fn release(&mut self, id: NodeId) -> TowerNode {
        let node = self.nodes[id.0]
            .take()
            .unwrap_or_else(|| panic!("node {id:?} released twice"));
        self.free.push(id.0);
        node
    }

    /// Number of live nodes.
    #[cfg(test)]
    pub fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// # Panics
    ///
    /// If `id` is dangling; this means the linkage is already broken.
    #[expect(clippy::indexing_slicing, reason = "Dangling handles are bugs")]
    pub fn get(&self, id: NodeId) -> &TowerNode {
        self.nodes[id.0]
            .as_ref()
            .unwrap_or_else(|| panic!("dangling node {id:?}"))
    }

    /// # Panics
    ///
    /// If `id` is dangling; this means the linkage is already broken.
    #[expect(clippy::indexing_slicing, reason = "Dangling handles are bugs")]
    pub fn get_mut(&mut self, id: NodeId) -> &mut TowerNode {
        self.nodes[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("dangling node {id:?}"))
    }
}

impl std::ops::Index<NodeId> for Arena {
    type Output = TowerNode;

    #[inline]
    fn index(&self, id: NodeId) -> &TowerNode {
        self.get(id)
    }
}

impl std::ops::IndexMut<NodeId> for Arena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut TowerNode {
        self.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Arena, Slot, TowerNode};

    #[test]
    fn slot_order() {
        assert!(Slot::Min < Slot::Key(i32::MIN));
        assert!(Slot::Key(i32::MIN) < Slot::Key(0));
        assert!(Slot::Key(i32::MAX) < Slot::Max);
        assert_eq!(Slot::Min.key(), None);
        assert_eq!(Slot::Key(3).key(), Some(3));
    }

    #[test]
    fn slot_display() {
        assert_eq!(Slot::Min.to_string(), "-2147483648");
        assert_eq!(Slot::Key(-4).to_string(), "-4");
        assert_eq!(Slot::Max.to_string(), "2147483647");
    }

    #[test]
    fn alloc_reuses_released() {
        let mut arena = Arena::with_capacity(2);
        let a = arena.alloc(TowerNode::new(Slot::Key(1)));
        let b = arena.alloc(TowerNode::new(Slot::Key(2)));
        assert_eq!(arena.live(), 2);

        assert_eq!(arena.release(a).slot, Slot::Key(1));
        assert_eq!(arena.live(), 1);

        let c = arena.alloc(TowerNode::new(Slot::Key(3)));
        assert_eq!(c, a);
        assert_eq!(arena[c].slot, Slot::Key(3));
        assert_eq!(arena[b].slot, Slot::Key(2));
    }

    #[test]
    fn links() {
        let mut arena = Arena::default();
        let a = arena.alloc(TowerNode::new(Slot::Min));
        let b = arena.alloc(TowerNode::new(Slot::Max));
        arena[a].next = Some(b);
        arena[b].prev = Some(a);
        assert_eq!(arena[a].next, Some(b));
        assert_eq!(arena[b].prev, Some(a));
        assert_eq!(arena[a].up, None);
    }

    #[test]
    #[should_panic(expected = "dangling node")]
    fn dangling() {
        let mut arena = Arena::default();
        let a = arena.alloc(TowerNode::new(Slot::Key(1)));
        let _ = arena.release(a);
        let _ = &arena[a];
    }

    #[test]
    #[should_panic(expected = "released twice")]
    fn double_release() {
        let mut arena = Arena::default();
        let a = arena.alloc(TowerNode::new(Slot::Key(1)));
        let _ = arena.release(a);
        let _ = arena.release(a);
    }
}
