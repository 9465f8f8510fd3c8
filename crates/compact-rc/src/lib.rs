//! Single-word reference-counted pointer.
//!
//! A conventional shared pointer carries two words: the payload address
//! and a pointer to a separate control block. [`CompactRc`] carries one.
//! User-space heap addresses never use the full 64 bits, so the spare
//! high bits of the packed [`Handle`] word hold the owner count next to
//! the address.
//!
//! # Architecture
//!
//! ```text
//! CompactRc<T> ×N (one word each)
//! └── Cell<Handle> (one per allocation, shared by all N; in the same
//!     │             allocation as T when built with `CompactRc::new`)
//!     ├── address (low 48 bits) → T on the heap
//!     └── count   (high 16 bits) = N
//! ```
//!
//! - **[`config`]:** the bit budget ([`PackingConfig`]).
//! - **[`handle`]:** packing, unpacking and checked count arithmetic.
//! - **[`rc`]:** ownership, copy, move, release and comparison.
//!
//! # Quick start
//!
//! ```
//! use compact_rc::CompactRc;
//!
//! let a = CompactRc::new(String::from("shared"));
//! let b = a.clone();
//! assert_eq!(a.use_count(), 2);
//! assert_eq!(*b, "shared");
//! drop(a);
//! assert_eq!(b.use_count(), 1);
//! ```
//!
//! # Limits
//!
//! - Single-threaded only; the count is not atomic.
//! - The layout is fixed at [`PackingConfig::DEFAULT`]: 48 address bits and
//!   a 16-bit count. Other layouts, including the narrower 42-bit one
//!   (22-bit count), can be described and validated with
//!   [`PackingConfig::new`], but [`CompactRc`] does not run with them.
//! - At most [`MAX_COUNT`] owners per allocation. Going past it, or
//!   adopting an address wider than [`ADDRESS_BITS`], fails fast with a
//!   [`CompactRcError`] or a panic; nothing wraps silently.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

#[cfg(not(target_pointer_width = "64"))]
compile_error!("compact-rc packs addresses into a 64-bit word and needs a 64-bit target");

pub mod config;
pub mod error;
pub mod handle;
pub mod rc;

pub use config::PackingConfig;
pub use error::CompactRcError;
pub use handle::{Handle, ADDRESS_BITS, MAX_COUNT};
pub use rc::CompactRc;
