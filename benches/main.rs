//! Benchmarks comparing the layered index against the standard library.

use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    crate::layered_index::insert,
    crate::layered_index::contains,
    crate::layered_index::remove,
    crate::btreeset::insert,
    crate::btreeset::contains,
    crate::btreeset::remove,
);
criterion_main!(benches);
