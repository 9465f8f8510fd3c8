//! Benchmark fixtures for the compact-rc pointer.
//!
//! - [`fan_out`]: one payload shared by many owners
//! - [`distinct`]: many payloads with one owner each, for ordering and
//!   hashing benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use compact_rc::CompactRc;

/// Payload sized like a small record, large enough that copies are never
/// confused with copying the value itself.
pub type Payload = [u64; 4];

/// `owners` copies of a single payload.
pub fn fan_out(owners: usize) -> Vec<CompactRc<Payload>> {
    let root = CompactRc::new([7; 4]);
    let mut out = Vec::with_capacity(owners);
    out.extend((1..owners).map(|_| root.clone()));
    out.push(root);
    out
}

/// `count` independent payloads, in allocation order.
pub fn distinct(count: usize) -> Vec<CompactRc<Payload>> {
    (0..count as u64).map(|i| CompactRc::new([i; 4])).collect()
}
