//! Instruction descriptor catalog.
//!
//! A read-only, process-initialized table of per-instruction facts keyed
//! by (architecture, mnemonic): dimensions, opcodes, timing, GPR counts,
//! operand data types, register-file permissions, and modifier support.
//! One module per generation holds the literal instruction data, built
//! through the family constructors below so that layout rules stay a
//! closed set of patterns rather than per-instruction code.
//!
//! Building the catalog runs a forward/inverse round-trip self-check
//! over every descriptor's full coordinate space; a mismatch is fatal.

pub mod cdna1;
pub mod cdna2;
pub mod cdna3;
pub mod rdna3;
pub mod rdna4;

use crate::error::{CalcError, Result};
use crate::mapping::{self, LayoutKind};
use crate::types::{Architecture, DataType, Encoding, Matrix, ModifierSet, RegFileSet};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Encoding-specific opcode numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcodes {
    /// Opcode within the VOP3P space.
    pub vop3p: u16,
    /// Opcode within the VOP3P-MAI sub-encoding (CDNA only).
    pub mai: Option<u16>,
}

/// Register-file permissions per operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegFilePerms {
    /// Files the A matrix may come from.
    pub a: RegFileSet,
    /// Files the B matrix may come from.
    pub b: RegFileSet,
    /// Files the C and D matrices may use.
    pub cd: RegFileSet,
}

/// Interpretation of the BLGP field for instructions that accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlgpMode {
    /// B-matrix lane swizzle patterns 0-7.
    Swizzle,
    /// 3-bit A/B/C negate mask (CDNA3 FP64).
    F64Negate,
}

/// Interpretation of the CBSZ/ABID pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbidMode {
    /// Dense A-matrix block broadcast.
    Broadcast,
    /// Sparse compression-index slot select.
    SparseSlot,
}

/// Modifier fields an instruction accepts, with their sub-modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierSupport {
    /// Accepted modifier fields.
    pub set: ModifierSet,
    /// BLGP interpretation when BLGP is accepted.
    pub blgp_mode: Option<BlgpMode>,
    /// CBSZ/ABID interpretation when they are accepted.
    pub abid_mode: Option<AbidMode>,
}

/// The invariant per-instruction record.
#[derive(Debug, Clone)]
pub struct InstructionDescriptor {
    /// Generation the instruction belongs to.
    pub arch: Architecture,
    /// Normalized uppercase mnemonic.
    pub mnemonic: &'static str,
    /// Encoding family.
    pub encoding: Encoding,
    /// Encoding-specific opcodes.
    pub opcodes: Opcodes,
    /// Output rows.
    pub m: u32,
    /// Output columns.
    pub n: u32,
    /// Depth of the multiply (uncompressed for sparse variants).
    pub k: u32,
    /// Number of sub-matrix blocks; always a power of two.
    pub blocks: u32,
    /// Issue-to-issue execution cycles.
    pub cycles: u32,
    /// Whether VALU instructions may co-execute.
    pub coexec: bool,
    /// Cycles during which VALU co-execution is possible.
    pub coexec_cycles: u32,
    /// A-operand element type.
    pub a_type: DataType,
    /// B-operand element type.
    pub b_type: DataType,
    /// C/D element type.
    pub cd_type: DataType,
    /// GPRs used by A.
    pub gprs_a: u32,
    /// GPRs used by B.
    pub gprs_b: u32,
    /// GPRs used by C and by D (always equal).
    pub gprs_cd: u32,
    /// GPRs used by the compression index, zero when dense.
    pub gprs_k: u32,
    /// Register alignment requirement in bytes.
    pub align_bytes: u32,
    /// Register-file permissions.
    pub reg_files: RegFilePerms,
    /// Modifier support.
    pub modifiers: ModifierSupport,
    /// Whether this is a sparse (SMFMAC/SWMMAC) variant.
    pub sparse: bool,
}

impl InstructionDescriptor {
    /// SIMD lanes per wave for this instruction.
    pub fn wave_size(&self) -> u32 {
        self.arch.wave_size()
    }

    /// Total multiply-accumulate FLOPs (or integer ops) per instruction.
    pub fn flops(&self) -> u64 {
        2 * u64::from(self.m) * u64::from(self.n) * u64::from(self.k) * u64::from(self.blocks)
    }

    /// Peak throughput in FLOPs per compute unit per cycle.
    pub fn flops_per_cu_cycle(&self) -> u64 {
        self.flops() * u64::from(self.arch.simds_per_cu()) / u64::from(self.cycles)
    }

    /// Element type stored by a matrix.
    pub fn element_type(&self, matrix: Matrix) -> DataType {
        match matrix {
            Matrix::A => self.a_type,
            Matrix::B => self.b_type,
            Matrix::C | Matrix::D => self.cd_type,
            Matrix::K => DataType::SparseIdx,
        }
    }

    /// (rows, columns) of a matrix's coordinate space.
    ///
    /// Sparse A is addressed by its compressed storage (K/2 columns);
    /// the K matrix covers the uncompressed depth.
    pub fn matrix_dims(&self, matrix: Matrix) -> (u32, u32) {
        match matrix {
            Matrix::A => {
                let kdim = if self.sparse { self.k / 2 } else { self.k };
                (self.m, kdim)
            }
            Matrix::B => (self.k, self.n),
            Matrix::C | Matrix::D => (self.m, self.n),
            Matrix::K => (self.m, self.k),
        }
    }

    /// GPR count of a matrix operand.
    pub fn gpr_count(&self, matrix: Matrix) -> u32 {
        match matrix {
            Matrix::A => self.gprs_a,
            Matrix::B => self.gprs_b,
            Matrix::C | Matrix::D => self.gprs_cd,
            Matrix::K => self.gprs_k,
        }
    }

    /// Whether a matrix stores 64-bit elements in register pairs.
    pub fn is_pair(&self, matrix: Matrix) -> bool {
        self.element_type(matrix).bits() == 64
    }

    /// Mapping pattern of a matrix.
    pub fn layout_kind(&self, matrix: Matrix) -> LayoutKind {
        match (self.arch, matrix) {
            (a, Matrix::K) if a.is_cdna() => LayoutKind::SmfmacIndex,
            (_, Matrix::K) => LayoutKind::SwmmacIndex,
            (a, Matrix::A | Matrix::B) if a.is_cdna() => LayoutKind::MfmaInput,
            (a, Matrix::C | Matrix::D) if a.is_cdna() => LayoutKind::MfmaAcc,
            (Architecture::Rdna3, Matrix::A | Matrix::B) => LayoutKind::WmmaInputDup,
            (Architecture::Rdna3, _) => LayoutKind::WmmaAccRdna3,
            (_, Matrix::A | Matrix::B) => LayoutKind::WmmaInputRdna4,
            (_, _) => LayoutKind::WmmaAccRdna4,
        }
    }

    /// Matrices a query may legally select.
    pub fn legal_matrices(&self) -> Vec<Matrix> {
        if self.sparse {
            vec![Matrix::A, Matrix::B, Matrix::D, Matrix::K]
        } else {
            vec![Matrix::A, Matrix::B, Matrix::C, Matrix::D]
        }
    }

    /// Whether a modifier field is accepted.
    pub fn supports(&self, flag: ModifierSet) -> bool {
        self.modifiers.set.contains(flag)
    }
}

// Family constructors. Everything derivable from the family and the
// dimensions is computed here; the per-generation modules stay literal
// tables of (mnemonic, opcode, shape, cycles, types).

const CDNA_WAVE_BITS: u32 = 64 * 32;

fn cdna_regfiles(arch: Architecture) -> RegFilePerms {
    if arch == Architecture::Cdna1 {
        RegFilePerms {
            a: RegFileSet::ARCH,
            b: RegFileSet::ARCH,
            cd: RegFileSet::ACC,
        }
    } else {
        let both = RegFileSet::ARCH | RegFileSet::ACC;
        RegFilePerms {
            a: both,
            b: both,
            cd: both,
        }
    }
}

fn cdna_blgp(arch: Architecture, a_type: DataType) -> Option<BlgpMode> {
    match (arch, a_type) {
        (Architecture::Cdna3, DataType::Fp64) => Some(BlgpMode::F64Negate),
        (_, DataType::Fp64) => None,
        (Architecture::Cdna3, t) if t.bits() == 16 || t == DataType::Int8 => {
            Some(BlgpMode::Swizzle)
        }
        (Architecture::Cdna3, _) => None,
        _ => Some(BlgpMode::Swizzle),
    }
}

/// Dense MFMA constructor (all CDNA generations).
#[allow(clippy::too_many_arguments)]
pub(crate) fn cdna_dense(
    arch: Architecture,
    mnemonic: &'static str,
    mai: u16,
    m: u32,
    n: u32,
    k: u32,
    blocks: u32,
    cycles: u32,
    a_type: DataType,
    b_type: DataType,
    cd_type: DataType,
) -> InstructionDescriptor {
    let mut set = ModifierSet::empty();
    let mut abid_mode = None;
    if blocks > 1 {
        set |= ModifierSet::CBSZ | ModifierSet::ABID;
        abid_mode = Some(AbidMode::Broadcast);
    }
    let blgp_mode = cdna_blgp(arch, a_type);
    if blgp_mode.is_some() {
        set |= ModifierSet::BLGP;
    }
    let coexec = arch != Architecture::Cdna1 && a_type != DataType::Fp64;
    InstructionDescriptor {
        arch,
        mnemonic,
        encoding: Encoding::Vop3pMai,
        opcodes: Opcodes {
            vop3p: 0x40 + mai,
            mai: Some(mai),
        },
        m,
        n,
        k,
        blocks,
        cycles,
        coexec,
        coexec_cycles: if coexec { cycles / 2 } else { 0 },
        a_type,
        b_type,
        cd_type,
        gprs_a: m * k * blocks * a_type.bits() / CDNA_WAVE_BITS,
        gprs_b: k * n * blocks * b_type.bits() / CDNA_WAVE_BITS,
        gprs_cd: m * n * blocks * cd_type.bits() / CDNA_WAVE_BITS,
        gprs_k: 0,
        align_bytes: if arch == Architecture::Cdna1 { 4 } else { 8 },
        reg_files: cdna_regfiles(arch),
        modifiers: ModifierSupport {
            set,
            blgp_mode,
            abid_mode,
        },
        sparse: false,
    }
}

/// Sparse SMFMAC constructor (CDNA3).
#[allow(clippy::too_many_arguments)]
pub(crate) fn cdna_smfmac(
    mnemonic: &'static str,
    mai: u16,
    m: u32,
    n: u32,
    k: u32,
    cycles: u32,
    a_type: DataType,
    b_type: DataType,
    cd_type: DataType,
) -> InstructionDescriptor {
    let arch = Architecture::Cdna3;
    InstructionDescriptor {
        arch,
        mnemonic,
        encoding: Encoding::Vop3pMai,
        opcodes: Opcodes {
            vop3p: 0x40 + mai,
            mai: Some(mai),
        },
        m,
        n,
        k,
        blocks: 1,
        cycles,
        coexec: true,
        coexec_cycles: cycles / 2,
        a_type,
        b_type,
        cd_type,
        gprs_a: m * (k / 2) * a_type.bits() / CDNA_WAVE_BITS,
        gprs_b: k * n * b_type.bits() / CDNA_WAVE_BITS,
        gprs_cd: m * n * cd_type.bits() / CDNA_WAVE_BITS,
        gprs_k: 1,
        align_bytes: 8,
        reg_files: cdna_regfiles(arch),
        modifiers: ModifierSupport {
            set: ModifierSet::CBSZ | ModifierSet::ABID,
            blgp_mode: None,
            abid_mode: Some(AbidMode::SparseSlot),
        },
        sparse: true,
    }
}

fn rdna_neg_set(a_type: DataType) -> ModifierSet {
    match a_type {
        // 8-bit float operands take no sign modifiers at all.
        DataType::Fp8 | DataType::Bf8 => ModifierSet::empty(),
        // Integer operands reuse NEG bits 0-1 as signedness selects.
        DataType::Int8 | DataType::Int4 => ModifierSet::NEG,
        _ => ModifierSet::NEG | ModifierSet::NEG_HI,
    }
}

/// Dense WMMA constructor (RDNA3, 16x16x16 shapes, duplicated inputs).
pub(crate) fn rdna3_wmma(
    mnemonic: &'static str,
    op: u16,
    a_type: DataType,
    b_type: DataType,
    cd_type: DataType,
) -> InstructionDescriptor {
    let k = 16;
    let mut set = rdna_neg_set(a_type);
    if cd_type.bits() == 16 {
        set |= ModifierSet::OPSEL;
    }
    InstructionDescriptor {
        arch: Architecture::Rdna3,
        mnemonic,
        encoding: Encoding::Vop3p,
        opcodes: Opcodes {
            vop3p: op,
            mai: None,
        },
        m: 16,
        n: 16,
        k,
        blocks: 1,
        cycles: 16,
        coexec: false,
        coexec_cycles: 0,
        a_type,
        b_type,
        cd_type,
        // Each half-wave holds a full copy of A and of B.
        gprs_a: k * a_type.bits() / 32,
        gprs_b: k * b_type.bits() / 32,
        gprs_cd: 8,
        gprs_k: 0,
        align_bytes: 4,
        reg_files: RegFilePerms {
            a: RegFileSet::ARCH,
            b: RegFileSet::ARCH,
            cd: RegFileSet::ARCH,
        },
        modifiers: ModifierSupport {
            set,
            blgp_mode: None,
            abid_mode: None,
        },
        sparse: false,
    }
}

const RDNA4_WAVE_BITS: u32 = 32 * 32;

/// Dense WMMA constructor (RDNA4, 16x16 shapes, no duplication).
pub(crate) fn rdna4_wmma(
    mnemonic: &'static str,
    op: u16,
    k: u32,
    a_type: DataType,
    b_type: DataType,
    cd_type: DataType,
) -> InstructionDescriptor {
    InstructionDescriptor {
        arch: Architecture::Rdna4,
        mnemonic,
        encoding: Encoding::Vop3p,
        opcodes: Opcodes {
            vop3p: op,
            mai: None,
        },
        m: 16,
        n: 16,
        k,
        blocks: 1,
        cycles: 16,
        coexec: false,
        coexec_cycles: 0,
        a_type,
        b_type,
        cd_type,
        gprs_a: 16 * k * a_type.bits() / RDNA4_WAVE_BITS,
        gprs_b: 16 * k * b_type.bits() / RDNA4_WAVE_BITS,
        gprs_cd: 16 * 16 * cd_type.bits().max(16) / RDNA4_WAVE_BITS,
        gprs_k: 0,
        align_bytes: 4,
        reg_files: RegFilePerms {
            a: RegFileSet::ARCH,
            b: RegFileSet::ARCH,
            cd: RegFileSet::ARCH,
        },
        modifiers: ModifierSupport {
            set: rdna_neg_set(a_type),
            blgp_mode: None,
            abid_mode: None,
        },
        sparse: false,
    }
}

/// Sparse SWMMAC constructor (RDNA4).
pub(crate) fn rdna4_swmmac(
    mnemonic: &'static str,
    op: u16,
    k: u32,
    a_type: DataType,
    b_type: DataType,
    cd_type: DataType,
) -> InstructionDescriptor {
    let mut set = rdna_neg_set(a_type);
    // A 32-deep index set fills half a register; OPSEL picks the half.
    if k == 32 {
        set |= ModifierSet::OPSEL;
    }
    InstructionDescriptor {
        arch: Architecture::Rdna4,
        mnemonic,
        encoding: Encoding::Vop3p,
        opcodes: Opcodes {
            vop3p: op,
            mai: None,
        },
        m: 16,
        n: 16,
        k,
        blocks: 1,
        cycles: 16,
        coexec: false,
        coexec_cycles: 0,
        a_type,
        b_type,
        cd_type,
        gprs_a: 16 * (k / 2) * a_type.bits() / RDNA4_WAVE_BITS,
        gprs_b: 16 * k * b_type.bits() / RDNA4_WAVE_BITS,
        gprs_cd: 16 * 16 * cd_type.bits().max(16) / RDNA4_WAVE_BITS,
        gprs_k: 1,
        align_bytes: 4,
        reg_files: RegFilePerms {
            a: RegFileSet::ARCH,
            b: RegFileSet::ARCH,
            cd: RegFileSet::ARCH,
        },
        modifiers: ModifierSupport {
            set,
            blgp_mode: None,
            abid_mode: None,
        },
        sparse: true,
    }
}

/// The process-wide descriptor catalog.
#[derive(Debug)]
pub struct Catalog {
    per_arch: Vec<Vec<InstructionDescriptor>>,
    index: HashMap<(Architecture, String), (usize, usize)>,
}

fn arch_slot(arch: Architecture) -> usize {
    match arch {
        Architecture::Cdna1 => 0,
        Architecture::Cdna2 => 1,
        Architecture::Cdna3 => 2,
        Architecture::Rdna3 => 3,
        Architecture::Rdna4 => 4,
    }
}

impl Catalog {
    /// Build the catalog and run the forward/inverse self-check over
    /// every descriptor. A mismatch yields [`CalcError::CatalogInconsistency`].
    pub fn build() -> Result<Catalog> {
        let per_arch = vec![
            cdna1::instructions(),
            cdna2::instructions(),
            cdna3::instructions(),
            rdna3::instructions(),
            rdna4::instructions(),
        ];

        let mut index = HashMap::new();
        for (slot, descs) in per_arch.iter().enumerate() {
            for (pos, desc) in descs.iter().enumerate() {
                self_check(desc)?;
                index.insert((desc.arch, desc.mnemonic.to_string()), (slot, pos));
            }
        }

        Ok(Catalog { per_arch, index })
    }

    /// The shared catalog instance.
    ///
    /// The self-check is an initialization invariant: a failure here is
    /// a defect in the descriptor tables, not a caller error, so it
    /// aborts rather than returning.
    pub fn global() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(|| match Catalog::build() {
            Ok(c) => c,
            Err(e) => panic!("{}", e),
        })
    }

    /// Look up an instruction by mnemonic, case-insensitively.
    pub fn get(&self, arch: Architecture, mnemonic: &str) -> Result<&InstructionDescriptor> {
        let key = (arch, mnemonic.trim().to_ascii_uppercase());
        match self.index.get(&key) {
            Some(&(slot, pos)) => Ok(&self.per_arch[slot][pos]),
            None => Err(CalcError::UnknownInstruction {
                arch,
                mnemonic: mnemonic.to_string(),
            }),
        }
    }

    /// Iterate an architecture's instructions in catalog order.
    pub fn instructions(&self, arch: Architecture) -> impl Iterator<Item = &InstructionDescriptor> {
        self.per_arch[arch_slot(arch)].iter()
    }
}

fn inconsistency(
    desc: &InstructionDescriptor,
    matrix: Matrix,
    message: impl Into<String>,
) -> CalcError {
    CalcError::CatalogInconsistency {
        mnemonic: desc.mnemonic.to_string(),
        matrix,
        message: message.into(),
    }
}

/// Round-trip, disjointness, coverage, and dimensional checks for one
/// descriptor.
fn self_check(desc: &InstructionDescriptor) -> Result<()> {
    for matrix in desc.legal_matrices() {
        let (rows, cols) = desc.matrix_dims(matrix);
        let blocks = if matrix == Matrix::K { 1 } else { desc.blocks };
        let pair = desc.is_pair(matrix);
        let gpr_step = if pair { 2 } else { 1 };
        let gprs = desc.gpr_count(matrix);
        let wave = desc.wave_size();
        let dup_inputs = desc.layout_kind(matrix) == LayoutKind::WmmaInputDup;

        if gprs == 0 {
            return Err(inconsistency(desc, matrix, "zero GPRs"));
        }

        // Forward map over the full coordinate space, inverted back.
        let mut seen: HashMap<(u32, u32, u8), crate::types::Coordinate> = HashMap::new();
        for block in 0..blocks {
            for r in 0..rows {
                for c in 0..cols {
                    let coord = mapping::coord_from_row_col(matrix, r, c, block);
                    let loc = mapping::locate(desc, coord)?;
                    if loc.gpr + u32::from(pair) >= gprs {
                        return Err(inconsistency(
                            desc,
                            matrix,
                            format!("{} maps to out-of-range GPR {}", coord, loc.gpr),
                        ));
                    }
                    if loc.lane >= wave {
                        return Err(inconsistency(
                            desc,
                            matrix,
                            format!("{} maps to out-of-range lane {}", coord, loc.lane),
                        ));
                    }
                    let elems = mapping::lookup(desc, matrix, loc.gpr, loc.lane)?;
                    let found = elems
                        .iter()
                        .any(|e| e.coord == coord && e.bit_lo == loc.bit_lo);
                    if !found {
                        return Err(inconsistency(
                            desc,
                            matrix,
                            format!("inverse of v{}{{{}}} does not yield {}", loc.gpr, loc.lane, coord),
                        ));
                    }
                    // Compression indices share their group nibble.
                    if matrix != Matrix::K {
                        if let Some(prev) = seen.insert((loc.gpr, loc.lane, loc.bit_lo), coord) {
                            return Err(inconsistency(
                                desc,
                                matrix,
                                format!("{} and {} collide at {}", prev, coord, loc),
                            ));
                        }
                    }
                }
            }
        }

        // Inverse map over the full register space, re-located forward.
        let mut max_gpr = None;
        let mut max_lane = None;
        for gpr in (0..gprs).step_by(gpr_step) {
            for lane in 0..wave {
                let elems = mapping::lookup(desc, matrix, gpr, lane)?;
                if elems.is_empty() {
                    return Err(inconsistency(
                        desc,
                        matrix,
                        format!("no element stored at v{}{{{}}}", gpr, lane),
                    ));
                }
                max_gpr = max_gpr.max(Some(gpr));
                max_lane = max_lane.max(Some(lane));
                for e in &elems {
                    let loc = mapping::locate(desc, e.coord)?;
                    let lane_ok = loc.lane == lane || (dup_inputs && loc.lane + 16 == lane);
                    if loc.gpr != gpr || !lane_ok {
                        return Err(inconsistency(
                            desc,
                            matrix,
                            format!("{} re-locates to {} instead of v{}{{{}}}", e.coord, loc, gpr, lane),
                        ));
                    }
                }
            }
        }
        if max_gpr != Some(gprs - gpr_step as u32) {
            return Err(inconsistency(desc, matrix, "top GPR never reported"));
        }
        if max_lane != Some(wave - 1) {
            return Err(inconsistency(desc, matrix, "top lane never reported"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_builds_and_self_checks() {
        // Runs the full forward/inverse round trip for every descriptor.
        let catalog = Catalog::build().expect("catalog self-check");
        for &arch in crate::arch::ALL {
            assert!(catalog.instructions(arch).count() > 0);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = Catalog::global();
        let d = catalog
            .get(Architecture::Cdna2, "v_mfma_f32_4x4x1f32")
            .unwrap();
        assert_eq!(d.mnemonic, "V_MFMA_F32_4X4X1F32");
    }

    #[test]
    fn test_unknown_instruction() {
        let err = Catalog::global()
            .get(Architecture::Rdna3, "V_MFMA_F32_4X4X1F32")
            .unwrap_err();
        assert!(matches!(err, CalcError::UnknownInstruction { .. }));
    }

    #[test]
    fn test_4x4x1f32_descriptor_facts() {
        // Reference data for V_MFMA_F32_4X4X1F32 on CDNA2.
        let d = Catalog::global()
            .get(Architecture::Cdna2, "V_MFMA_F32_4X4X1F32")
            .unwrap();
        assert_eq!(d.opcodes.vop3p, 0x42);
        assert_eq!(d.opcodes.mai, Some(0x2));
        assert_eq!((d.m, d.n, d.k, d.blocks), (4, 4, 1, 16));
        assert_eq!(d.flops(), 512);
        assert_eq!(d.cycles, 8);
        assert_eq!((d.gprs_a, d.gprs_b, d.gprs_cd), (1, 1, 4));
        assert_eq!(d.align_bytes, 8);
    }

    #[test]
    fn test_sparse_descriptors_reserve_k() {
        let d = Catalog::global()
            .get(Architecture::Cdna3, "V_SMFMAC_F32_16X16X32_F16")
            .unwrap();
        assert!(d.sparse);
        assert_eq!(d.gprs_k, 1);
        assert!(d.legal_matrices().contains(&Matrix::K));
        assert!(!d.legal_matrices().contains(&Matrix::C));
        assert_eq!(d.matrix_dims(Matrix::A), (16, 16));
        assert_eq!(d.matrix_dims(Matrix::K), (16, 32));
    }

    #[test]
    fn test_blocked_descriptors_support_broadcast() {
        let d = Catalog::global()
            .get(Architecture::Cdna1, "V_MFMA_F32_16X16X1F32")
            .unwrap();
        assert!(d.supports(ModifierSet::CBSZ));
        assert!(d.supports(ModifierSet::ABID));
        let single = Catalog::global()
            .get(Architecture::Cdna1, "V_MFMA_F32_16X16X4F32")
            .unwrap();
        assert!(!single.supports(ModifierSet::CBSZ));
    }

    #[test]
    fn test_cdna3_f64_uses_negate_blgp() {
        let d = Catalog::global()
            .get(Architecture::Cdna3, "V_MFMA_F64_16X16X4_F64")
            .unwrap();
        assert_eq!(d.modifiers.blgp_mode, Some(BlgpMode::F64Negate));
        let d2 = Catalog::global()
            .get(Architecture::Cdna2, "V_MFMA_F64_16X16X4F64")
            .unwrap();
        assert!(!d2.supports(ModifierSet::BLGP));
    }

    #[test]
    fn test_gpr_invariant_holds() {
        // A.gprs * wave * 32 >= M * K * element_bits * blocks, and
        // symmetrically for B and D.
        let catalog = Catalog::global();
        for &arch in crate::arch::ALL {
            for d in catalog.instructions(arch) {
                let wave_bits = u64::from(d.wave_size()) * 32;
                let (am, ak) = d.matrix_dims(Matrix::A);
                assert!(
                    u64::from(d.gprs_a) * wave_bits
                        >= u64::from(am * ak * d.a_type.bits() * d.blocks),
                    "{} A gprs too small",
                    d.mnemonic
                );
                assert!(
                    u64::from(d.gprs_cd) * wave_bits
                        >= u64::from(d.m * d.n * d.blocks * d.cd_type.bits().min(32)),
                    "{} D gprs too small",
                    d.mnemonic
                );
            }
        }
    }
}
