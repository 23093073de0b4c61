//! Replay a fixed sequence of promotion decisions.

use std::collections::VecDeque;

use crate::promotion::Promotion;

/// A promotion policy which replays a predetermined list of decisions, and
/// refuses every promotion once the list is exhausted.
///
/// This makes tower heights fully predictable:
///
/// ```
/// use layered_index::{LayeredIndex, Scripted};
///
/// // Key 7 is promoted twice, key 9 not at all.
/// let script = Scripted::new([true, true, false, false]);
/// let mut index = LayeredIndex::builder().depth(4).build_with(script)?;
/// index.insert(7);
/// index.insert(9);
/// assert_eq!(index.height(7), Some(3));
/// assert_eq!(index.height(9), Some(1));
/// # Ok::<(), layered_index::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scripted {
    decisions: VecDeque<bool>,
}

impl Scripted {
    /// Create a policy replaying `decisions` in order.
    #[inline]
    pub fn new(decisions: impl IntoIterator<Item = bool>) -> Self {
        Scripted {
            decisions: decisions.into_iter().collect(),
        }
    }

    /// Decisions that have not been consumed yet.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.decisions.len()
    }

    /// Queue more decisions after the ones already scripted.
    #[inline]
    pub fn push(&mut self, decisions: impl IntoIterator<Item = bool>) {
        self.decisions.extend(decisions);
    }
}

impl Promotion for Scripted {
    #[inline]
    fn promote(&mut self) -> bool {
        self.decisions.pop_front().unwrap_or(false)
    }
}
