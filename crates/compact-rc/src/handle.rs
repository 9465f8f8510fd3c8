//! The packed handle word.
//!
//! A [`Handle`] stores a payload address in its low bits and the number of
//! owners in its high bits. All masking and shifting for that layout lives
//! in this module; nothing else in the crate touches the raw bits.
//!
//! ```text
//!  63            48 47                                        0
//! ┌────────────────┬───────────────────────────────────────────┐
//! │ count (16 bits)│             address (48 bits)             │
//! └────────────────┴───────────────────────────────────────────┘
//! ```

use std::fmt;

use crate::config::PackingConfig;
use crate::error::CompactRcError;

const LAYOUT: PackingConfig = PackingConfig::DEFAULT;

/// Number of low bits holding the address.
pub const ADDRESS_BITS: u32 = LAYOUT.address_bits;

/// Mask selecting the address field.
pub const ADDRESS_MASK: u64 = LAYOUT.address_mask();

/// Largest representable owner count (`2^16 - 1`).
pub const MAX_COUNT: u32 = LAYOUT.max_count();

/// Numeric value of a payload address.
///
/// Paired with [`pointer_from`]; both directions of the address/integer
/// conversion go through these two functions and nothing else.
pub(crate) fn address_of<T>(ptr: *const T) -> u64 {
    ptr.expose_provenance() as u64
}

/// Pointer for an address previously produced by [`address_of`].
pub(crate) fn pointer_from<T>(address: u64) -> *mut T {
    std::ptr::with_exposed_provenance_mut(address as usize)
}

/// A 64-bit word packing a payload address and an owner count.
///
/// The all-zero word is the null handle: no address, no owners. A handle
/// with a non-zero address always carries a count of at least one while
/// any owner is alive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
#[must_use]
pub struct Handle(u64);

impl Handle {
    /// The handle of an instance that owns nothing.
    pub const NULL: Self = Self(0);

    /// Pack `address` and `count` into one word.
    ///
    /// A zero address yields [`Handle::NULL`] whatever the count.
    /// Fails if the address needs more than [`ADDRESS_BITS`] bits or the
    /// count exceeds [`MAX_COUNT`].
    pub fn pack(address: u64, count: u32) -> Result<Self, CompactRcError> {
        if address == 0 {
            return Ok(Self::NULL);
        }
        if !LAYOUT.fits_address(address) {
            return Err(CompactRcError::AddressOutOfRange {
                address,
                address_bits: ADDRESS_BITS,
            });
        }
        if count > MAX_COUNT {
            return Err(CompactRcError::CountOverflow {
                address,
                max: MAX_COUNT,
            });
        }
        Ok(Self(address | (u64::from(count) << ADDRESS_BITS)))
    }

    /// Reinterpret a raw word as a handle. No validation is performed.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// The raw word.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// The address field.
    pub const fn address(self) -> u64 {
        self.0 & ADDRESS_MASK
    }

    /// The count field.
    pub const fn count(self) -> u32 {
        (self.0 >> ADDRESS_BITS) as u32
    }

    /// Whether the address field is zero.
    pub const fn is_null(self) -> bool {
        self.address() == 0
    }

    /// The address field as a pointer to `T`; null for a null handle.
    pub fn as_ptr<T>(self) -> *mut T {
        pointer_from(self.address())
    }

    /// Same address, new count.
    pub fn with_count(self, count: u32) -> Result<Self, CompactRcError> {
        if count > MAX_COUNT {
            return Err(CompactRcError::CountOverflow {
                address: self.address(),
                max: MAX_COUNT,
            });
        }
        Ok(Self(self.address() | (u64::from(count) << ADDRESS_BITS)))
    }

    /// One more owner.
    pub fn increment(self) -> Result<Self, CompactRcError> {
        match self.count().checked_add(1) {
            Some(count) => self.with_count(count),
            None => Err(CompactRcError::CountOverflow {
                address: self.address(),
                max: MAX_COUNT,
            }),
        }
    }

    /// One fewer owner. The address is kept even when the count reaches
    /// zero so the caller can still free it.
    pub fn decrement(self) -> Result<Self, CompactRcError> {
        match self.count().checked_sub(1) {
            Some(count) => self.with_count(count),
            None => Err(CompactRcError::CountUnderflow {
                address: self.address(),
            }),
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("address", &format_args!("{:#x}", self.address()))
            .field("count", &self.count())
            .finish()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handle(addr={:#x}, count={})",
            self.address(),
            self.count()
        )
    }
}
