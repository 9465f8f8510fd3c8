//! Bit-budget configuration for the packed handle word.

use crate::error::CompactRcError;

/// Describes how a 64-bit handle word is split between address and count.
///
/// The low `address_bits` hold the payload address; the remaining high bits
/// hold the reference count. Validated before use; the layout the pointer
/// actually runs with is [`PackingConfig::DEFAULT`], checked at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackingConfig {
    /// Number of low bits reserved for the payload address.
    ///
    /// Default: 48. Assumes the allocator never returns an address with
    /// more than 48 significant bits, which holds for user-space heaps on
    /// x86-64 (47-bit) and aarch64 (48-bit) with four-level page tables.
    pub address_bits: u32,
}

impl PackingConfig {
    /// Total width of the handle word.
    pub const WORD_BITS: u32 = 64;

    /// Default number of address bits.
    pub const DEFAULT_ADDRESS_BITS: u32 = 48;

    /// Widest count field that still reports through a `u32` use count.
    pub const MAX_COUNT_BITS: u32 = 32;

    /// The layout used by [`CompactRc`](crate::CompactRc).
    pub const DEFAULT: Self = Self::new(Self::DEFAULT_ADDRESS_BITS);

    /// Create a config reserving `address_bits` for the address.
    pub const fn new(address_bits: u32) -> Self {
        Self { address_bits }
    }

    /// Number of high bits left over for the reference count.
    pub const fn count_bits(&self) -> u32 {
        Self::WORD_BITS.saturating_sub(self.address_bits)
    }

    /// Mask selecting the address field.
    pub const fn address_mask(&self) -> u64 {
        if self.address_bits >= Self::WORD_BITS {
            u64::MAX
        } else {
            (1u64 << self.address_bits) - 1
        }
    }

    /// Largest count the layout can represent.
    pub const fn max_count(&self) -> u32 {
        let bits = self.count_bits();
        if bits >= Self::MAX_COUNT_BITS {
            u32::MAX
        } else {
            (1u32 << bits) - 1
        }
    }

    /// Whether `address` fits in the address field without touching the
    /// count bits.
    pub const fn fits_address(&self, address: u64) -> bool {
        address & !self.address_mask() == 0
    }

    /// Const-evaluable form of [`validate`](Self::validate).
    pub const fn is_valid(&self) -> bool {
        let bits = self.count_bits();
        self.address_bits > 0 && bits > 0 && bits <= Self::MAX_COUNT_BITS
    }

    /// Check that the layout leaves room for both fields.
    ///
    /// Rejects layouts with no count bits, with a count field wider than
    /// 32 bits, or with no address bits at all.
    pub fn validate(&self) -> Result<(), CompactRcError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(CompactRcError::InvalidLayout {
                address_bits: self.address_bits,
            })
        }
    }
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const _: () = assert!(PackingConfig::DEFAULT.is_valid());
