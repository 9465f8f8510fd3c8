//! Pointer-specific error types.

use std::error::Error;
use std::fmt;

/// Precondition violations detected while packing or updating a handle.
///
/// Every variant is a programmer or environment error. Fallible
/// constructors return it; the infallible trait paths (`Clone`, `Drop`)
/// panic with its message rather than let the count wrap into the
/// address bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompactRcError {
    /// The payload address needs more bits than the layout reserves.
    AddressOutOfRange {
        /// The rejected address.
        address: u64,
        /// Address bits available in the layout.
        address_bits: u32,
    },
    /// Another owner would push the count past the representable maximum.
    CountOverflow {
        /// Address of the shared payload.
        address: u64,
        /// Largest representable count.
        max: u32,
    },
    /// A release was attempted on a handle whose count is already zero.
    CountUnderflow {
        /// Address of the shared payload.
        address: u64,
    },
    /// A [`PackingConfig`](crate::PackingConfig) that leaves no usable room
    /// for one of the two fields.
    InvalidLayout {
        /// The rejected address width.
        address_bits: u32,
    },
}

impl fmt::Display for CompactRcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressOutOfRange {
                address,
                address_bits,
            } => {
                write!(
                    f,
                    "address {address:#x} does not fit in {address_bits} address bits"
                )
            }
            Self::CountOverflow { address, max } => {
                write!(
                    f,
                    "reference count overflow at {address:#x}: already {max} owners"
                )
            }
            Self::CountUnderflow { address } => {
                write!(f, "reference count underflow at {address:#x}")
            }
            Self::InvalidLayout { address_bits } => {
                write!(f, "invalid packing layout: {address_bits} address bits")
            }
        }
    }
}

impl Error for CompactRcError {}
