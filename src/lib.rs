//! A skiplist is a way of storing elements such that they can be efficiently
//! looked up, inserted and removed, all in `O(log(n))` on average.
//!
//! This crate stores a set of unique `i32` keys as a stack of rows. Each row
//! is a doubly linked list bounded by two guards, and each key has a _tower_:
//! a copy of itself in row 0 and in every row it was promoted to, linked
//! vertically.
//!
//! ```text
//! Level: 2 -- <min> ----------------> [4] ---------------------------> <max>
//! Level: 1 -- <min> ----------------> [4] --> [5] -------------------> <max>
//! Level: 0 -- <min> --> [1] --> [3] --> [4] --> [5] --> [6] --> [9] --> <max>
//! ```
//!
//! Promotion is decided one row at a time by a [`Promotion`] policy, a fair
//! [`CoinFlip`] by default. A deterministic [`Scripted`] policy, or any
//! closure returning `bool`, can be injected through the [`Builder`].
//!
//! ```
//! use layered_index::LayeredIndex;
//!
//! let mut index = LayeredIndex::new(5)?;
//! index.extend([4, 6, 5]);
//! assert!(index.contains(6));
//! assert!(index.remove(6));
//! assert!(index.iter().eq([4, 5]));
//! # Ok::<(), layered_index::Error>(())
//! ```
//!
//! The index is not synchronised; share it between threads behind a lock.

mod config;
mod error;
mod layered_index;
mod node;
pub mod promotion;

pub use config::{Builder, DEFAULT_DEPTH, SearchStrategy};
pub use error::Error;
pub use layered_index::{Iter, LayeredIndex};
pub use promotion::{CoinFlip, Promotion, Scripted};
