#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parameter update travelling from the control thread to the render
/// thread.
///
/// Each effect defines one small enum with a variant per field. `field()`
/// names the slot a message occupies: a newer message for the same slot
/// supersedes an older one that has not been delivered yet.
pub trait ParameterMessage: Copy + Send + 'static {
    /// Number of distinct fields (slots) this message type can carry.
    const FIELDS: usize;

    /// Slot index in `0..FIELDS`.
    fn field(&self) -> usize;

    /// Payload packed into 32 bits, for values parked while the queue is
    /// full. Booleans are 0 or 1, numbers are `f32::to_bits`.
    fn to_bits(&self) -> u32;

    /// Rebuild the message for slot `field` from `to_bits` output.
    fn from_bits(field: usize, bits: u32) -> Self;
}

/// Value returned by typed parameter getters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Number(f32),
}

impl ParamValue {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            ParamValue::Bool(value) => Some(value),
            ParamValue::Number(_) => None,
        }
    }

    pub fn as_number(self) -> Option<f32> {
        match self {
            ParamValue::Number(value) => Some(value),
            ParamValue::Bool(_) => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Number(value)
    }
}
