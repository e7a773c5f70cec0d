//! Permission registers: packed tri-state permissions per principal
//!
//! A register is one raw integer per [`PermissionField`], each packing
//! 2-bit tri-state codes. A fresh register is all zeroes, meaning every
//! operation inherits.

use crate::codec;
use crate::operations::{Operation, PermissionField};
use depot_core::{DepotError, DepotResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One permission slot's decoded state.
///
/// `Allow` and `Disallow` are terminal for resolution; `Inherit` defers
/// to the next principal in the chain. On the wire `00` and the reserved
/// `11` both decode to `Inherit`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionValue {
    /// Defer to the owning group chain (wire `00`, and reserved `11`)
    #[default]
    Inherit,
    /// Explicitly granted (wire `01`)
    Allow,
    /// Explicitly denied (wire `10`)
    Disallow,
}

impl PermissionValue {
    /// Decode a 2-bit wire code.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b01 => Self::Allow,
            0b10 => Self::Disallow,
            _ => Self::Inherit,
        }
    }

    /// Encode to the 2-bit wire code.
    pub fn to_bits(self) -> u8 {
        match self {
            Self::Inherit => 0b00,
            Self::Allow => 0b01,
            Self::Disallow => 0b10,
        }
    }

}

impl fmt::Display for PermissionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A principal's full permission record: one packed raw value per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRegister {
    fields: [u64; PermissionField::COUNT],
}

impl PermissionRegister {
    /// A register where every operation inherits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the tri-state value of one operation.
    ///
    /// # Errors
    ///
    /// `InvalidOffset` cannot occur for slots from the fixed table; the
    /// `Result` mirrors the codec contract.
    pub fn value(&self, op: Operation) -> DepotResult<PermissionValue> {
        let (field, offset) = op.slot();
        let raw = self.fields[field.index()];
        let bits = codec::read_bit_pair(raw, offset, field.width())?;
        Ok(PermissionValue::from_bits(bits))
    }

    /// Encode a tri-state value into one operation's slot.
    ///
    /// All other slots in the field are untouched.
    ///
    /// # Errors
    ///
    /// See [`PermissionRegister::value`].
    pub fn set_value(&mut self, op: Operation, value: PermissionValue) -> DepotResult<()> {
        let (field, offset) = op.slot();
        let raw = self.fields[field.index()];
        self.fields[field.index()] =
            codec::write_bit_pair(raw, offset, value.to_bits(), field.width())?;
        Ok(())
    }

    /// Raw packed value of a field, for the store boundary.
    pub fn raw_field(&self, field: PermissionField) -> u64 {
        self.fields[field.index()]
    }

    /// Replace a field's raw packed value, for the store boundary.
    ///
    /// # Errors
    ///
    /// `Invalid` when the raw value does not fit the field's declared
    /// width.
    pub fn set_raw_field(&mut self, field: PermissionField, raw: u64) -> DepotResult<()> {
        if raw > field.width().max_raw() {
            return Err(DepotError::invalid(format!(
                "raw value {raw:#x} does not fit {field} ({} bits)",
                field.width().bits()
            )));
        }
        self.fields[field.index()] = raw;
        Ok(())
    }

    /// Set every operation of a field to the same value.
    ///
    /// Administrative bulk edit; slots with no assigned operation stay
    /// zero.
    ///
    /// # Errors
    ///
    /// See [`PermissionRegister::value`].
    pub fn set_all(&mut self, field: PermissionField, value: PermissionValue) -> DepotResult<()> {
        for op in Operation::ALL {
            if op.slot().0 == field {
                self.set_value(*op, value)?;
            }
        }
        Ok(())
    }

    /// Whether every slot in the register inherits.
    pub fn is_all_inherit(&self) -> bool {
        // Reserved `11` codes also decode to Inherit, but a register we
        // wrote never contains them.
        self.fields.iter().all(|raw| *raw == 0)
    }
}
