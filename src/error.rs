//! Error types for the matrix instruction calculator.
//!
//! This module defines all error kinds surfaced to callers, each carrying
//! the offending parameter and its legal range so the message alone is
//! enough to correct the query.

use crate::types::{Architecture, Matrix};
use thiserror::Error;

/// Primary error type for the matrix instruction calculator.
#[derive(Debug, Error)]
pub enum CalcError {
    /// Unrecognized architecture name.
    #[error("unknown architecture '{name}': expected a generation name (CDNA1-3, RDNA3-4), a gfx identifier, or a chip name such as MI300X")]
    InvalidArch { name: String },

    /// Instruction not present in the chosen architecture.
    #[error("instruction '{mnemonic}' is not part of the {arch} instruction set (use --list-instructions to see it)")]
    UnknownInstruction { arch: Architecture, mnemonic: String },

    /// Missing, conflicting, or nonsensical arguments.
    #[error("{message}")]
    BadUsage { message: String },

    /// Modifier set to a non-default value on an instruction that does not support it.
    #[error("{mnemonic} does not support the {modifier} modifier")]
    UnsupportedModifier {
        modifier: &'static str,
        mnemonic: String,
    },

    /// Supported modifier outside its instruction-specific legal set.
    #[error("{modifier}={value} is out of range for {mnemonic}: legal values are {legal}")]
    ModifierOutOfRange {
        modifier: &'static str,
        value: u32,
        legal: String,
        mnemonic: String,
    },

    /// Coordinate, register, or lane exceeds descriptor bounds.
    #[error("{axis}={value} is out of range for the {matrix} matrix: legal range is [0, {max}]")]
    OutOfRangeCoordinate {
        axis: &'static str,
        value: u32,
        matrix: Matrix,
        max: u32,
    },

    /// Internal: the construction-time forward/inverse self-check failed.
    #[error("catalog self-check failed for {mnemonic}, {matrix} matrix: {message}")]
    CatalogInconsistency {
        mnemonic: String,
        matrix: Matrix,
        message: String,
    },
}

impl CalcError {
    /// Shorthand for a [`CalcError::BadUsage`] with a formatted message.
    pub fn usage(message: impl Into<String>) -> Self {
        CalcError::BadUsage {
            message: message.into(),
        }
    }
}

/// Result type alias for calculator operations.
pub type Result<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_values() {
        let err = CalcError::OutOfRangeCoordinate {
            axis: "I",
            value: 19,
            matrix: Matrix::A,
            max: 15,
        };
        let msg = err.to_string();
        assert!(msg.contains("I=19"));
        assert!(msg.contains("[0, 15]"));
    }

    #[test]
    fn test_modifier_out_of_range_display() {
        let err = CalcError::ModifierOutOfRange {
            modifier: "CBSZ",
            value: 5,
            legal: "[0, 2]".to_string(),
            mnemonic: "V_MFMA_F32_16X16X1F32".to_string(),
        };
        assert!(err.to_string().contains("CBSZ=5"));
        assert!(err.to_string().contains("[0, 2]"));
    }

    #[test]
    fn test_usage_shorthand() {
        let err = CalcError::usage("exactly one query operation is required");
        assert!(matches!(err, CalcError::BadUsage { .. }));
    }
}
