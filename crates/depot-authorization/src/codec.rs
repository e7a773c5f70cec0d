//! 2-bit pair codec for packed permission fields
//!
//! A permission field is a single unsigned integer packing up to 32
//! independent operation slots of two bits each. The codec is pure
//! mask-and-shift arithmetic; its central correctness property is that
//! writing one slot never disturbs any other.
//!
//! # Invariants
//!
//! - Offsets are even and leave room for a full pair inside the field
//!   width (`offset <= width - 2`)
//! - Written values fit in two bits (`0..=3`)
//! - `read_bit_pair(write_bit_pair(d, o, v), o) == v`
//! - `write_bit_pair` leaves every other pair in the field untouched

use depot_core::{DepotError, DepotResult};
use serde::{Deserialize, Serialize};

/// Declared width of a permission field.
///
/// Bounds how many 2-bit operation slots the field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitWidth {
    /// 16 bits, 8 operation slots
    W16,
    /// 32 bits, 16 operation slots
    W32,
    /// 64 bits, 32 operation slots
    W64,
}

impl BitWidth {
    /// Width in bits.
    pub fn bits(self) -> u8 {
        match self {
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    /// Number of 2-bit operation slots the field can hold.
    pub fn slots(self) -> u8 {
        self.bits() / 2
    }

    /// Largest raw value representable at this width.
    pub fn max_raw(self) -> u64 {
        match self {
            Self::W16 => u64::from(u16::MAX),
            Self::W32 => u64::from(u32::MAX),
            Self::W64 => u64::MAX,
        }
    }
}

fn check_offset(offset: u8, width: BitWidth) -> DepotResult<()> {
    if offset % 2 != 0 {
        return Err(DepotError::invalid_offset(format!(
            "offset {offset} is odd; pairs start on even bits"
        )));
    }
    // `offset + 2` would wrap u8 at offset 254; widths are >= 16.
    if offset > width.bits() - 2 {
        return Err(DepotError::invalid_offset(format!(
            "offset {offset} does not fit a pair in a {}-bit field",
            width.bits()
        )));
    }
    Ok(())
}

/// Read the 2-bit pair at `offset` from a packed field.
///
/// # Errors
///
/// `InvalidOffset` when `offset` is odd or outside the field width.
pub fn read_bit_pair(data: u64, offset: u8, width: BitWidth) -> DepotResult<u8> {
    check_offset(offset, width)?;
    Ok(((data >> offset) & 0b11) as u8)
}

/// Write the 2-bit pair at `offset`, returning the updated field.
///
/// All other pairs in the field are left untouched.
///
/// # Errors
///
/// `InvalidOffset` for a bad offset; `Invalid` when `value` does not fit
/// in two bits.
pub fn write_bit_pair(data: u64, offset: u8, value: u8, width: BitWidth) -> DepotResult<u64> {
    check_offset(offset, width)?;
    if value > 0b11 {
        return Err(DepotError::invalid(format!(
            "bit-pair value {value} does not fit in two bits"
        )));
    }
    let mask = 0b11u64 << offset;
    Ok((data & !mask) | (u64::from(value) << offset))
}
