//! Matrix Calculator - AMD Matrix Instruction Register Mapping
//!
//! This library is a reference calculator for the matrix
//! multiply-accumulate instructions of the AMD CDNA (MFMA/SMFMAC) and
//! RDNA (WMMA/SWMMAC) instruction sets. For a chosen (architecture,
//! instruction) pair it answers how the logical matrices A, B, C, D -
//! and, for sparse variants, the compression index K - map onto vector
//! registers and SIMD lanes.
//!
//! # Features
//!
//! - **Five generations**: CDNA1-3 (gfx908, gfx90a, gfx940-942) and
//!   RDNA3-4 (gfx11xx, gfx12xx), resolved from generation names, gfx
//!   identifiers, codenames, or chip marketing names
//! - **Instruction facts**: opcodes, dimensions, timing, GPR counts,
//!   operand types, register-file permissions, modifier support
//! - **Bidirectional mapping**: coordinate to (register, lane, bits)
//!   and back, verified against each other when the catalog is built
//! - **Modifier semantics**: CBSZ/ABID broadcast and sparse slot
//!   select, BLGP lane swizzles and the FP64 negate mask, OPSEL half
//!   and index-set selection, NEG/NEG_HI sign masks
//! - **Layout tables**: whole-matrix and whole-register-file tables as
//!   records any formatter can render
//!
//! # Quick Start
//!
//! ```rust
//! use matrix_calculator::{arch, query, Matrix, Modifiers};
//!
//! fn main() -> matrix_calculator::Result<()> {
//!     let cdna2 = arch::resolve("MI250X")?;
//!     let result = query::get_register(
//!         cdna2,
//!         "V_MFMA_F32_4X4X4F16",
//!         Matrix::A,
//!         1,
//!         0,
//!         2,
//!         4,
//!         &Modifiers::default(),
//!         false,
//!     )?;
//!     assert_eq!(result.to_string(), "A[1][2].B4 = v1{17}.[15:0]");
//!     Ok(())
//! }
//! ```
//!
//! # Consistency guarantee
//!
//! Every instruction descriptor carries closed-form forward and inverse
//! mapping rules. Building the catalog enumerates each matrix's full
//! coordinate space, round-trips it through both directions, and checks
//! coverage and disjointness; a mismatch aborts initialization rather
//! than returning wrong mappings.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]

pub mod arch;
pub mod catalog;
pub mod error;
pub mod formatter;
pub mod mapping;
pub mod modifiers;
pub mod query;
pub mod types;

pub use catalog::{Catalog, InstructionDescriptor};
pub use error::{CalcError, Result};
pub use formatter::{
    AsciiDocFormatter, AsciiFormatter, CsvFormatter, MarkdownFormatter, TableFormatter,
};
pub use query::{
    detail, get_register, list_instructions, matrix_entry, matrix_layout, register_layout,
    GetRegisterResult, LayoutResult, MatrixEntryResult, OutputCalc,
};
pub use types::{
    Architecture, Coordinate, DataType, Encoding, LayoutTable, Matrix, Modifiers, RegisterLocation,
    Sign,
};

/// Get version information for this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_quick_start_flow() {
        let cdna2 = arch::resolve("cdna2").unwrap();
        let mnems = list_instructions(cdna2);
        assert!(mnems.contains(&"V_MFMA_F32_32X32X8F16"));
        let text = detail(cdna2, "V_MFMA_F32_32X32X8F16").unwrap();
        assert!(text.contains("M=32, N=32, K=8"));
    }

    #[test]
    fn test_round_trip_everywhere() {
        // Library-level statement of the forward/inverse law: for every
        // instruction and matrix, locate and lookup agree. The catalog
        // has already proven this at build time; this pins the API.
        let catalog = Catalog::global();
        for &a in arch::ALL {
            for desc in catalog.instructions(a) {
                for matrix in desc.legal_matrices() {
                    let (rows, cols) = desc.matrix_dims(matrix);
                    let coord = mapping::coord_from_row_col(matrix, rows - 1, cols - 1, 0);
                    let loc = mapping::locate(desc, coord).unwrap();
                    let found = mapping::lookup(desc, matrix, loc.gpr, loc.lane)
                        .unwrap()
                        .into_iter()
                        .any(|e| e.coord == coord);
                    assert!(found, "{} {}", desc.mnemonic, matrix);
                }
            }
        }
    }
}
