//! Core types for the matrix instruction calculator.
//!
//! This module defines all fundamental value types: architecture
//! generations, matrix selectors, element data types, modifier fields,
//! coordinates, register locations, and the layout-table records the
//! formatting sinks consume.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Architecture generations covered by the calculator.
///
/// Three datacenter CDNA generations (wave64, MFMA/SMFMAC encodings) and
/// two client RDNA generations (wave32, WMMA/SWMMAC encodings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// CDNA generation 1 (gfx908, Arcturus / MI100).
    Cdna1,
    /// CDNA generation 2 (gfx90a, Aldebaran / MI200 series).
    Cdna2,
    /// CDNA generation 3 (gfx940-942, Aqua Vanjaram / MI300 series).
    Cdna3,
    /// RDNA generation 3 (gfx11xx).
    Rdna3,
    /// RDNA generation 4 (gfx12xx).
    Rdna4,
}

impl Architecture {
    /// Canonical generation name.
    pub fn name(&self) -> &'static str {
        match self {
            Architecture::Cdna1 => "CDNA1",
            Architecture::Cdna2 => "CDNA2",
            Architecture::Cdna3 => "CDNA3",
            Architecture::Rdna3 => "RDNA3",
            Architecture::Rdna4 => "RDNA4",
        }
    }

    /// Primary gfx identifier for display.
    pub fn gfx_name(&self) -> &'static str {
        match self {
            Architecture::Cdna1 => "gfx908",
            Architecture::Cdna2 => "gfx90a",
            Architecture::Cdna3 => "gfx940",
            Architecture::Rdna3 => "gfx1100",
            Architecture::Rdna4 => "gfx1200",
        }
    }

    /// SIMD lanes per wave.
    pub fn wave_size(&self) -> u32 {
        match self {
            Architecture::Cdna1 | Architecture::Cdna2 | Architecture::Cdna3 => 64,
            Architecture::Rdna3 | Architecture::Rdna4 => 32,
        }
    }

    /// SIMD units per compute unit, used by the throughput figure.
    pub fn simds_per_cu(&self) -> u32 {
        if self.is_cdna() {
            4
        } else {
            2
        }
    }

    /// Whether this is a datacenter (CDNA) generation.
    pub fn is_cdna(&self) -> bool {
        matches!(
            self,
            Architecture::Cdna1 | Architecture::Cdna2 | Architecture::Cdna3
        )
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Matrix selector for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Matrix {
    /// Left input operand (Src0).
    A,
    /// Right input operand (Src1).
    B,
    /// Accumulator input operand (Src2, dense instructions only).
    C,
    /// Destination matrix (Vdst).
    D,
    /// Compression-index matrix (Src2 on sparse instructions).
    K,
}

impl Matrix {
    /// Instruction field the matrix travels in.
    pub fn src_field(&self) -> &'static str {
        match self {
            Matrix::A => "Src0",
            Matrix::B => "Src1",
            Matrix::C | Matrix::K => "Src2",
            Matrix::D => "Vdst",
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Matrix::A => "A",
            Matrix::B => "B",
            Matrix::C => "C",
            Matrix::D => "D",
            Matrix::K => "K",
        };
        write!(f, "{}", c)
    }
}

/// Element data types appearing in matrix instruction operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// IEEE double precision.
    Fp64,
    /// IEEE single precision.
    Fp32,
    /// TF32-style truncated single precision, stored as 32 bits.
    Xf32,
    /// IEEE half precision.
    Fp16,
    /// Brain float 16.
    Bf16,
    /// 8-bit integer.
    Int8,
    /// 4-bit integer.
    Int4,
    /// 32-bit integer accumulator.
    Int32,
    /// 8-bit float, 4 exponent / 3 mantissa bits.
    Fp8,
    /// 8-bit float, 5 exponent / 2 mantissa bits.
    Bf8,
    /// Packed 2-bit sparse compression indices.
    SparseIdx,
}

impl DataType {
    /// Storage bits per element.
    ///
    /// Sparse indices are nominally 2 bits but always reported at the
    /// 4-bit group granularity they are packed in.
    pub fn bits(&self) -> u32 {
        match self {
            DataType::Fp64 => 64,
            DataType::Fp32 | DataType::Xf32 | DataType::Int32 => 32,
            DataType::Fp16 | DataType::Bf16 => 16,
            DataType::Int8 | DataType::Fp8 | DataType::Bf8 => 8,
            DataType::Int4 => 4,
            DataType::SparseIdx => 2,
        }
    }

    /// Whether this is a floating-point type (NEG/NEG_HI sign semantics).
    pub fn is_float(&self) -> bool {
        !matches!(
            self,
            DataType::Int8 | DataType::Int4 | DataType::Int32 | DataType::SparseIdx
        )
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Fp64 => "FP64",
            DataType::Fp32 => "FP32",
            DataType::Xf32 => "XF32",
            DataType::Fp16 => "FP16",
            DataType::Bf16 => "BF16",
            DataType::Int8 => "INT8",
            DataType::Int4 => "INT4",
            DataType::Int32 => "INT32",
            DataType::Fp8 => "FP8 (E4M3)",
            DataType::Bf8 => "BF8 (E5M2)",
            DataType::SparseIdx => "compression index",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Instruction encoding family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// Matrix-accelerated VOP3P sub-encoding (CDNA).
    Vop3pMai,
    /// Plain VOP3P encoding (RDNA).
    Vop3p,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Vop3pMai => write!(f, "VOP3P-MAI"),
            Encoding::Vop3p => write!(f, "VOP3P"),
        }
    }
}

bitflags! {
    /// Vector register files an operand may be sourced from.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RegFileSet: u8 {
        /// Architected VGPRs.
        const ARCH = 1 << 0;
        /// Accumulation VGPRs.
        const ACC = 1 << 1;
    }
}

bitflags! {
    /// Modifier fields an instruction accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModifierSet: u8 {
        /// A-matrix broadcast size / sparse set size.
        const CBSZ = 1 << 0;
        /// A-matrix broadcast id / sparse slot select.
        const ABID = 1 << 1;
        /// B-matrix lane pattern / FP64 negate mask.
        const BLGP = 1 << 2;
        /// 16-bit half select / sparse set select.
        const OPSEL = 1 << 3;
        /// Negate mask (low halves; C negate).
        const NEG = 1 << 4;
        /// Negate mask (high halves; C absolute value).
        const NEG_HI = 1 << 5;
    }
}

/// User-supplied modifier values for a query.
///
/// All fields default to zero, the hardware reset value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// A-matrix broadcast size (dense) or sparse set size field.
    pub cbsz: u32,
    /// A-matrix broadcast block id (dense) or sparse K slot select.
    pub abid: u32,
    /// B-matrix lane pattern, or FP64 negate mask on CDNA3 FP64.
    pub blgp: u32,
    /// 16-bit half select (RDNA3 C/D) or sparse K set select (RDNA4).
    pub opsel: u32,
    /// Per-operand negate mask (low halves; C negate).
    pub neg: u32,
    /// Per-operand negate mask (high halves; C absolute value).
    pub neg_hi: u32,
}

impl Modifiers {
    /// True when every field is at its hardware default.
    pub fn is_default(&self) -> bool {
        *self == Modifiers::default()
    }
}

/// Sign annotation attached to a register location by modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    /// Value used as stored.
    #[default]
    Positive,
    /// Value negated.
    Negated,
    /// Absolute value taken.
    Absolute,
    /// Absolute value taken, then negated.
    NegatedAbsolute,
}

impl Sign {
    /// Wrap a rendered register string in this sign's notation.
    pub fn wrap(&self, inner: &str) -> String {
        match self {
            Sign::Positive => inner.to_string(),
            Sign::Negated => format!("-{}", inner),
            Sign::Absolute => format!("|{}|", inner),
            Sign::NegatedAbsolute => format!("-|{}|", inner),
        }
    }
}

/// A matrix element position.
///
/// The `i` coordinate is ignored by B, `j` by A and K, and `k` by C and D.
/// K follows A's row/column schema over the uncompressed K dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Matrix the element belongs to.
    pub matrix: Matrix,
    /// Row index.
    pub i: u32,
    /// Column index.
    pub j: u32,
    /// Depth index.
    pub k: u32,
    /// Block index for multi-block instructions.
    pub block: u32,
}

impl Coordinate {
    /// Build a coordinate, keeping only the axes the matrix uses.
    pub fn new(matrix: Matrix, i: u32, j: u32, k: u32, block: u32) -> Self {
        let (i, j, k) = match matrix {
            Matrix::A => (i, 0, k),
            Matrix::B => (0, j, k),
            Matrix::C | Matrix::D => (i, j, 0),
            Matrix::K => (i, 0, k),
        };
        Coordinate {
            matrix,
            i,
            j,
            k,
            block,
        }
    }

    /// The (row, column) pair actually addressed by this matrix.
    pub fn row_col(&self) -> (u32, u32) {
        match self.matrix {
            Matrix::A | Matrix::K => (self.i, self.k),
            Matrix::B => (self.k, self.j),
            Matrix::C | Matrix::D => (self.i, self.j),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, col) = self.row_col();
        if self.matrix == Matrix::K {
            // The compression index matrix is never blocked.
            write!(f, "K[{}][{}]", row, col)
        } else {
            write!(f, "{}[{}][{}].B{}", self.matrix, row, col, self.block)
        }
    }
}

/// A physical register location: GPR offset, lane, sub-register bit
/// range, and sign annotation.
///
/// GPR offsets are relative to the instruction's Src0/Src1/Src2/Vdst
/// field base. 64-bit elements occupy the register pair `[gpr+1:gpr]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterLocation {
    /// GPR offset within the operand's register group.
    pub gpr: u32,
    /// Whether the location is a 64-bit register pair.
    pub pair: bool,
    /// SIMD lane holding the element.
    pub lane: u32,
    /// Highest bit of the element, inclusive.
    pub bit_hi: u8,
    /// Lowest bit of the element, inclusive.
    pub bit_lo: u8,
    /// Sign annotation applied by modifiers.
    pub sign: Sign,
}

impl RegisterLocation {
    /// A full 32-bit location with no sign annotation.
    pub fn dword(gpr: u32, lane: u32) -> Self {
        RegisterLocation {
            gpr,
            pair: false,
            lane,
            bit_hi: 31,
            bit_lo: 0,
            sign: Sign::Positive,
        }
    }

    /// A sub-register location with no sign annotation.
    pub fn sub(gpr: u32, lane: u32, bit_hi: u8, bit_lo: u8) -> Self {
        RegisterLocation {
            gpr,
            pair: false,
            lane,
            bit_hi,
            bit_lo,
            sign: Sign::Positive,
        }
    }

    /// A 64-bit register-pair location with no sign annotation.
    pub fn dword_pair(gpr: u32, lane: u32) -> Self {
        RegisterLocation {
            gpr,
            pair: true,
            lane,
            bit_hi: 63,
            bit_lo: 0,
            sign: Sign::Positive,
        }
    }

    /// True when the bit range spans the whole register (or pair).
    pub fn full_width(&self) -> bool {
        let full_hi = if self.pair { 63 } else { 31 };
        self.bit_lo == 0 && self.bit_hi == full_hi
    }

    /// Render without the sign annotation.
    pub fn unsigned_string(&self) -> String {
        let mut s = if self.pair {
            format!("v[{}:{}]{{{}}}", self.gpr + 1, self.gpr, self.lane)
        } else {
            format!("v{}{{{}}}", self.gpr, self.lane)
        };
        if !self.full_width() {
            s.push_str(&format!(".[{}:{}]", self.bit_hi, self.bit_lo));
        }
        s
    }
}

impl fmt::Display for RegisterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign.wrap(&self.unsigned_string()))
    }
}

/// A two-dimensional table of cell strings plus axis labels.
///
/// This is the record format the formatting sinks consume; the core only
/// produces the strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTable {
    /// Table caption, e.g. `Block 0` or `Blocks 0, 1, 2, 3`.
    pub caption: String,
    /// Top-left header cell, names the axes.
    pub corner: String,
    /// Column header labels.
    pub col_labels: Vec<String>,
    /// Row header labels.
    pub row_labels: Vec<String>,
    /// Cell strings, indexed `[row][col]`.
    pub cells: Vec<Vec<String>>,
}

impl LayoutTable {
    /// Swap rows and columns.
    pub fn transposed(&self) -> LayoutTable {
        let mut cells = vec![vec![String::new(); self.row_labels.len()]; self.col_labels.len()];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                cells[c][r] = cell.clone();
            }
        }
        LayoutTable {
            caption: self.caption.clone(),
            corner: self.corner.clone(),
            col_labels: self.row_labels.clone(),
            row_labels: self.col_labels.clone(),
            cells,
        }
    }
}
