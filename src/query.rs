//! Query facade.
//!
//! The five user-facing operations: instruction listing, instruction
//! detail, coordinate-to-register, register-to-coordinates, and the two
//! full-layout tables. All are pure functions over the catalog; results
//! are records (with stable `Display` text) plus non-fatal warnings the
//! caller may surface.

use crate::catalog::{AbidMode, BlgpMode, Catalog, InstructionDescriptor};
use crate::error::{CalcError, Result};
use crate::mapping;
use crate::modifiers;
use crate::types::{
    Architecture, Coordinate, LayoutTable, Matrix, Modifiers, ModifierSet, RegisterLocation,
};
use std::fmt;

/// Ordered instruction mnemonics of an architecture.
pub fn list_instructions(arch: Architecture) -> Vec<&'static str> {
    Catalog::global()
        .instructions(arch)
        .map(|d| d.mnemonic)
        .collect()
}

/// Fetch a descriptor, resolving the mnemonic case-insensitively.
pub fn descriptor(arch: Architecture, mnemonic: &str) -> Result<&'static InstructionDescriptor> {
    Catalog::global().get(arch, mnemonic)
}

/// One sum-of-products expansion of a D element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCalc {
    /// Vdst location of the D element.
    pub d: RegisterLocation,
    /// (Src0, Src1) locations, one term per depth step.
    pub terms: Vec<(RegisterLocation, RegisterLocation)>,
    /// Src2 location of the accumulator input (dense only).
    pub c: Option<RegisterLocation>,
}

impl fmt::Display for OutputCalc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vdst_{} = ", self.d)?;
        for (idx, (a, b)) in self.terms.iter().enumerate() {
            if idx > 0 {
                write!(f, " + ")?;
            }
            write!(f, "Src0_{}\u{b7}Src1_{}", a, b)?;
        }
        if let Some(c) = &self.c {
            write!(f, " + Src2_{}", c)?;
        }
        Ok(())
    }
}

/// Result of a coordinate-to-register query.
#[derive(Debug, Clone)]
pub struct GetRegisterResult {
    /// The requested coordinate.
    pub coord: Coordinate,
    /// Where it lives.
    pub location: RegisterLocation,
    /// Optional D-matrix calculation expansion.
    pub calc: Option<OutputCalc>,
    /// Accepted-but-ineffective modifier notes.
    pub warnings: Vec<String>,
}

impl fmt::Display for GetRegisterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.calc {
            Some(calc) => write!(f, "{} = {}", self.coord, calc),
            None => write!(f, "{} = {}", self.coord, self.location),
        }
    }
}

/// One element reported by a register-to-coordinates query.
#[derive(Debug, Clone)]
pub struct EntryLine {
    /// The element's register location (source lane under swizzles).
    pub location: RegisterLocation,
    /// The coordinate stored there.
    pub coord: Coordinate,
    /// Optional D-matrix calculation expansion.
    pub calc: Option<OutputCalc>,
}

impl fmt::Display for EntryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.location, self.coord)?;
        if let Some(calc) = &self.calc {
            write!(f, " = {}", calc)?;
        }
        Ok(())
    }
}

/// Result of a register-to-coordinates query.
#[derive(Debug, Clone)]
pub struct MatrixEntryResult {
    /// Matrix queried.
    pub matrix: Matrix,
    /// All elements at the location, ascending bit order.
    pub entries: Vec<EntryLine>,
    /// Accepted-but-ineffective modifier notes.
    pub warnings: Vec<String>,
}

impl fmt::Display for MatrixEntryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "no {} element is stored at this location", self.matrix);
        }
        for (idx, line) in self.entries.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Result of a layout query: one table per (collapsed) block group.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    /// The tables, in block order.
    pub tables: Vec<LayoutTable>,
    /// Accepted-but-ineffective modifier notes.
    pub warnings: Vec<String>,
}

fn check_matrix_legal(desc: &InstructionDescriptor, matrix: Matrix) -> Result<()> {
    if desc.legal_matrices().contains(&matrix) {
        return Ok(());
    }
    let message = match matrix {
        Matrix::K => format!(
            "{} is dense: the compression index matrix only exists on sparse instructions",
            desc.mnemonic
        ),
        Matrix::C => format!(
            "{} is sparse: Src2 holds the compression index, there is no C input",
            desc.mnemonic
        ),
        _ => format!("{} cannot address the {} matrix", desc.mnemonic, matrix),
    };
    Err(CalcError::usage(message))
}

fn check_output_calc(desc: &InstructionDescriptor, matrix: Matrix, output_calc: bool) -> Result<()> {
    if !output_calc {
        return Ok(());
    }
    if matrix != Matrix::D {
        return Err(CalcError::usage(
            "the output calculation is only available for D-matrix queries",
        ));
    }
    if desc.sparse {
        return Err(CalcError::usage(
            "the output calculation is not available for sparse instructions: the B row feeding each compressed A slot depends on runtime index values",
        ));
    }
    Ok(())
}

/// Locate a coordinate with all modifier rewrites applied.
fn locate_with_mods(
    desc: &InstructionDescriptor,
    mods: &Modifiers,
    coord: Coordinate,
) -> Result<RegisterLocation> {
    // Bounds-check the caller's block before the broadcast remap so the
    // error cites the requested value.
    let block_limit = if coord.matrix == Matrix::K {
        1
    } else {
        desc.blocks
    };
    if coord.block >= block_limit {
        return Err(CalcError::OutOfRangeCoordinate {
            axis: "block",
            value: coord.block,
            matrix: coord.matrix,
            max: block_limit - 1,
        });
    }
    let effective = Coordinate {
        block: modifiers::effective_block(desc, mods, coord.matrix, coord.block),
        ..coord
    };
    let mut loc = mapping::locate(desc, effective)?;
    if modifiers::blgp_swizzles(desc, mods, coord.matrix) {
        loc.lane = modifiers::blgp_source_lane(desc.wave_size(), mods.blgp, loc.lane);
    }
    let sign = modifiers::sign_for(desc, mods, coord.matrix, loc.bit_lo);
    modifiers::rewrite_bits(desc, mods, coord.matrix, &mut loc);
    loc.sign = sign;
    Ok(loc)
}

fn build_output_calc(
    desc: &InstructionDescriptor,
    mods: &Modifiers,
    i: u32,
    j: u32,
    block: u32,
) -> Result<OutputCalc> {
    let d = locate_with_mods(desc, mods, Coordinate::new(Matrix::D, i, j, 0, block))?;
    let mut terms = Vec::with_capacity(desc.k as usize);
    for kk in 0..desc.k {
        let a = locate_with_mods(desc, mods, Coordinate::new(Matrix::A, i, 0, kk, block))?;
        let b = locate_with_mods(desc, mods, Coordinate::new(Matrix::B, 0, j, kk, block))?;
        terms.push((a, b));
    }
    let c = locate_with_mods(desc, mods, Coordinate::new(Matrix::C, i, j, 0, block))?;
    Ok(OutputCalc {
        d,
        terms,
        c: Some(c),
    })
}

/// Coordinate-to-register query.
#[allow(clippy::too_many_arguments)]
pub fn get_register(
    arch: Architecture,
    mnemonic: &str,
    matrix: Matrix,
    i: u32,
    j: u32,
    k: u32,
    block: u32,
    mods: &Modifiers,
    output_calc: bool,
) -> Result<GetRegisterResult> {
    let desc = descriptor(arch, mnemonic)?;
    check_matrix_legal(desc, matrix)?;
    check_output_calc(desc, matrix, output_calc)?;
    modifiers::validate(desc, mods)?;
    let coord = Coordinate::new(matrix, i, j, k, block);
    let location = locate_with_mods(desc, mods, coord)?;
    let calc = if output_calc {
        Some(build_output_calc(desc, mods, i, j, block)?)
    } else {
        None
    };
    Ok(GetRegisterResult {
        coord,
        location,
        calc,
        warnings: modifiers::no_effect_warnings(desc, mods, matrix),
    })
}

/// Register-to-coordinates query.
#[allow(clippy::too_many_arguments)]
pub fn matrix_entry(
    arch: Architecture,
    mnemonic: &str,
    matrix: Matrix,
    gpr: u32,
    lane: u32,
    mods: &Modifiers,
    output_calc: bool,
) -> Result<MatrixEntryResult> {
    let desc = descriptor(arch, mnemonic)?;
    check_matrix_legal(desc, matrix)?;
    check_output_calc(desc, matrix, output_calc)?;
    modifiers::validate(desc, mods)?;

    // Under a lane swizzle the queried lane consumes another lane's
    // register data; resolve to the source lane first.
    let src_lane = if modifiers::blgp_swizzles(desc, mods, matrix) {
        modifiers::blgp_source_lane(desc.wave_size(), mods.blgp, lane)
    } else {
        lane
    };
    if lane >= desc.wave_size() {
        return Err(CalcError::OutOfRangeCoordinate {
            axis: "lane",
            value: lane,
            matrix,
            max: desc.wave_size() - 1,
        });
    }

    let mut entries = Vec::new();
    for elem in mapping::lookup(desc, matrix, gpr, src_lane)? {
        let mut location = RegisterLocation {
            gpr: if desc.is_pair(matrix) { gpr & !1 } else { gpr },
            pair: desc.is_pair(matrix),
            lane: src_lane,
            bit_hi: elem.bit_hi,
            bit_lo: elem.bit_lo,
            sign: modifiers::sign_for(desc, mods, matrix, elem.bit_lo),
        };
        let sign = location.sign;
        modifiers::rewrite_bits(desc, mods, matrix, &mut location);
        location.sign = sign;
        let calc = if output_calc {
            Some(build_output_calc(
                desc,
                mods,
                elem.coord.i,
                elem.coord.j,
                elem.coord.block,
            )?)
        } else {
            None
        };
        entries.push(EntryLine {
            location,
            coord: elem.coord,
            calc,
        });
    }

    Ok(MatrixEntryResult {
        matrix,
        entries,
        warnings: modifiers::no_effect_warnings(desc, mods, matrix),
    })
}

/// Axis letters for a matrix's (row, col) addressing.
fn axis_letters(matrix: Matrix) -> (&'static str, &'static str) {
    match matrix {
        Matrix::A | Matrix::K => ("i", "k"),
        Matrix::B => ("k", "j"),
        Matrix::C | Matrix::D => ("i", "j"),
    }
}

/// Group blocks that CBSZ collapses onto the same source block.
///
/// Returns (caption, representative block) pairs in ascending order of
/// the representative.
fn block_groups(desc: &InstructionDescriptor, mods: &Modifiers, matrix: Matrix) -> Vec<(String, u32)> {
    let blocks = if matrix == Matrix::K { 1 } else { desc.blocks };
    let mut groups: Vec<(u32, Vec<u32>)> = Vec::new();
    for block in 0..blocks {
        let eff = modifiers::effective_block(desc, mods, matrix, block);
        match groups.iter_mut().find(|(e, _)| *e == eff) {
            Some((_, members)) => members.push(block),
            None => groups.push((eff, vec![block])),
        }
    }
    groups
        .into_iter()
        .map(|(eff, members)| {
            let caption = if members.len() == 1 {
                format!("Block {}", members[0])
            } else {
                let list: Vec<String> = members.iter().map(u32::to_string).collect();
                format!("Blocks {}", list.join(", "))
            };
            (caption, eff)
        })
        .collect()
}

/// Full matrix-to-register table: rows and columns are matrix indices,
/// cells are register locations.
pub fn matrix_layout(
    arch: Architecture,
    mnemonic: &str,
    matrix: Matrix,
    mods: &Modifiers,
) -> Result<LayoutResult> {
    let desc = descriptor(arch, mnemonic)?;
    check_matrix_legal(desc, matrix)?;
    modifiers::validate(desc, mods)?;

    let (rows, cols) = desc.matrix_dims(matrix);
    let (row_axis, col_axis) = axis_letters(matrix);
    let mut tables = Vec::new();
    for (caption, block) in block_groups(desc, mods, matrix) {
        let mut cells = Vec::with_capacity(rows as usize);
        for r in 0..rows {
            let mut row = Vec::with_capacity(cols as usize);
            for c in 0..cols {
                let coord = mapping::coord_from_row_col(matrix, r, c, block);
                let loc = locate_with_mods(desc, mods, coord)?;
                row.push(loc.to_string());
            }
            cells.push(row);
        }
        tables.push(LayoutTable {
            caption,
            corner: format!("{}[{}][{}]", matrix, row_axis, col_axis),
            col_labels: (0..cols).map(|c| format!("{}={}", col_axis, c)).collect(),
            row_labels: (0..rows).map(|r| format!("{}={}", row_axis, r)).collect(),
            cells,
        });
    }

    Ok(LayoutResult {
        tables,
        warnings: modifiers::no_effect_warnings(desc, mods, matrix),
    })
}

/// Full register-to-matrix table: rows are GPR bit-field slots, columns
/// are lanes, cells are the coordinates stored there.
pub fn register_layout(
    arch: Architecture,
    mnemonic: &str,
    matrix: Matrix,
    mods: &Modifiers,
) -> Result<LayoutResult> {
    let desc = descriptor(arch, mnemonic)?;
    check_matrix_legal(desc, matrix)?;
    modifiers::validate(desc, mods)?;

    let wave = desc.wave_size();
    let gprs = desc.gpr_count(matrix);
    let pair = desc.is_pair(matrix);
    let gpr_step = if pair { 2usize } else { 1 };
    let swizzle = modifiers::blgp_swizzles(desc, mods, matrix);

    // Collect every stored element once per (gpr, lane); slots are the
    // distinct bit ranges observed, in ascending order per GPR.
    let mut slots: Vec<(u32, u8, u8)> = Vec::new();
    let mut grid: std::collections::HashMap<(u32, u8, u32), Vec<(Coordinate, crate::types::Sign)>> =
        std::collections::HashMap::new();
    for gpr in (0..gprs).step_by(gpr_step) {
        for lane in 0..wave {
            let src_lane = if swizzle {
                modifiers::blgp_source_lane(wave, mods.blgp, lane)
            } else {
                lane
            };
            for elem in mapping::lookup(desc, matrix, gpr, src_lane)? {
                let mut loc = RegisterLocation {
                    gpr,
                    pair,
                    lane,
                    bit_hi: elem.bit_hi,
                    bit_lo: elem.bit_lo,
                    sign: crate::types::Sign::Positive,
                };
                let sign = modifiers::sign_for(desc, mods, matrix, elem.bit_lo);
                modifiers::rewrite_bits(desc, mods, matrix, &mut loc);
                if !slots.contains(&(gpr, loc.bit_lo, loc.bit_hi)) {
                    slots.push((gpr, loc.bit_lo, loc.bit_hi));
                }
                grid.entry((gpr, loc.bit_lo, lane))
                    .or_default()
                    .push((elem.coord, sign));
            }
        }
    }
    slots.sort_unstable();

    let slot_label = |&(gpr, lo, hi): &(u32, u8, u8)| -> String {
        if pair {
            format!("v[{}:{}]", gpr + 1, gpr)
        } else if lo == 0 && hi == 31 {
            format!("v{}", gpr)
        } else {
            format!("v{}.[{}:{}]", gpr, hi, lo)
        }
    };

    let (row_axis, col_axis) = axis_letters(matrix);
    let mut tables = Vec::new();
    for (caption, block) in block_groups(desc, mods, matrix) {
        let mut cells = Vec::with_capacity(slots.len());
        for slot in &slots {
            let mut row = Vec::with_capacity(wave as usize);
            for lane in 0..wave {
                let cell = grid
                    .get(&(slot.0, slot.1, lane))
                    .map(|elems| {
                        elems
                            .iter()
                            .filter(|(coord, _)| coord.block == block)
                            .map(|(coord, sign)| {
                                let (r, c) = coord.row_col();
                                sign.wrap(&format!("{}[{}][{}]", matrix, r, c))
                            })
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                row.push(cell);
            }
            cells.push(row);
        }
        tables.push(LayoutTable {
            caption,
            corner: format!("{} GPR \\ lane ({}/{})", matrix, row_axis, col_axis),
            col_labels: (0..wave).map(|l| l.to_string()).collect(),
            row_labels: slots.iter().map(slot_label).collect(),
            cells,
        });
    }

    Ok(LayoutResult {
        tables,
        warnings: modifiers::no_effect_warnings(desc, mods, matrix),
    })
}

fn yes_no(v: bool) -> &'static str {
    if v {
        "yes"
    } else {
        "no"
    }
}

fn regfile_line(set: crate::types::RegFileSet) -> String {
    format!(
        "ArchVGPRs: {}, AccVGPRs: {}",
        yes_no(set.contains(crate::types::RegFileSet::ARCH)),
        yes_no(set.contains(crate::types::RegFileSet::ACC))
    )
}

/// Render the full detail record of an instruction, including the
/// zero-modifier mapping formulas.
pub fn detail(arch: Architecture, mnemonic: &str) -> Result<String> {
    let desc = descriptor(arch, mnemonic)?;
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(format!("Architecture: {} ({})", desc.arch, desc.arch.gfx_name()));
    line(format!("Instruction: {}", desc.mnemonic));
    line(format!("    Encoding: {}", desc.encoding));
    line(format!("    VOP3P opcode: {:#x}", desc.opcodes.vop3p));
    if let Some(mai) = desc.opcodes.mai {
        line(format!("    VOP3P-MAI opcode: {:#x}", mai));
    }
    line(format!(
        "    Matrix dimensions: M={}, N={}, K={}, blocks={}",
        desc.m, desc.n, desc.k, desc.blocks
    ));
    line("    Execution statistics:".to_string());
    line(format!("        FLOPs: {}", desc.flops()));
    line(format!("        Execution cycles: {}", desc.cycles));
    line(format!(
        "        FLOPs/CU/cycle: {}",
        desc.flops_per_cu_cycle()
    ));
    line(format!(
        "        Can co-execute with VALU: {}",
        yes_no(desc.coexec)
    ));
    line(format!(
        "        VALU co-execution cycles possible: {}",
        desc.coexec_cycles
    ));
    line("    Register usage:".to_string());
    line(format!("        GPRs required for A: {}", desc.gprs_a));
    line(format!("        GPRs required for B: {}", desc.gprs_b));
    if desc.sparse {
        line(format!(
            "        GPRs required for the compression index: {}",
            desc.gprs_k
        ));
    } else {
        line(format!("        GPRs required for C: {}", desc.gprs_cd));
    }
    line(format!("        GPRs required for D: {}", desc.gprs_cd));
    line(format!(
        "        GPR alignment requirement: {} bytes",
        desc.align_bytes
    ));
    line("    Register data types:".to_string());
    line(format!("        Src0 (A): {}", desc.a_type));
    line(format!("        Src1 (B): {}", desc.b_type));
    if desc.sparse {
        line(format!("        Src2 (K): {}", crate::types::DataType::SparseIdx));
    } else {
        line(format!("        Src2 (C): {}", desc.cd_type));
    }
    line(format!("        Vdst (D): {}", desc.cd_type));
    line("    Register capabilities:".to_string());
    line(format!("        A matrix: {}", regfile_line(desc.reg_files.a)));
    line(format!("        B matrix: {}", regfile_line(desc.reg_files.b)));
    line(format!(
        "        C and D matrices: {}",
        regfile_line(desc.reg_files.cd)
    ));
    line("    Register modifiers:".to_string());
    let cbsz_note = match desc.modifiers.abid_mode {
        Some(AbidMode::Broadcast) => "yes (A-matrix block broadcast)".to_string(),
        Some(AbidMode::SparseSlot) => "yes (compression index slot select)".to_string(),
        None => "no".to_string(),
    };
    line(format!("        CBSZ and ABID bits supported: {}", cbsz_note));
    let blgp_note = match desc.modifiers.blgp_mode {
        Some(BlgpMode::Swizzle) => "yes (B-matrix lane swizzle)".to_string(),
        Some(BlgpMode::F64Negate) => "yes (A/B/C negate mask)".to_string(),
        None => "no".to_string(),
    };
    line(format!("        BLGP bits supported: {}", blgp_note));
    line(format!(
        "        OPSEL bits supported: {}",
        yes_no(desc.supports(ModifierSet::OPSEL))
    ));
    if desc.supports(ModifierSet::NEG) && !desc.a_type.is_float() {
        line("        NEG bits supported: yes (signed/unsigned operand select)".to_string());
    } else {
        line(format!(
            "        NEG bits supported: {}",
            yes_no(desc.supports(ModifierSet::NEG))
        ));
    }
    line(format!(
        "        NEG_HI bits supported: {}",
        yes_no(desc.supports(ModifierSet::NEG_HI))
    ));

    line("    Matrix element to register mapping with no modifiers:".to_string());
    for matrix in desc.legal_matrices() {
        let (rows, cols) = desc.matrix_dims(matrix);
        let (ra, ca) = axis_letters(matrix);
        line(format!(
            "        {}[{}][{}] ({}x{}):",
            matrix, ra, ca, rows, cols
        ));
        for formula in mapping::forward_formulas(desc, matrix) {
            line(format!("            {}", formula));
        }
    }
    line("    Register to matrix element mapping with no modifiers:".to_string());
    for matrix in desc.legal_matrices() {
        line(format!("        {} matrix:", matrix));
        for formula in mapping::inverse_formulas(desc, matrix) {
            line(format!("            {}", formula));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DEF: Modifiers = Modifiers {
        cbsz: 0,
        abid: 0,
        blgp: 0,
        opsel: 0,
        neg: 0,
        neg_hi: 0,
    };

    #[test]
    fn test_get_register_f16_input() {
        // A[1][2] of block 4: v1{17}, low half.
        let r = get_register(
            Architecture::Cdna2,
            "V_MFMA_F32_4X4X4F16",
            Matrix::A,
            1,
            0,
            2,
            4,
            &DEF,
            false,
        )
        .unwrap();
        assert_eq!(r.to_string(), "A[1][2].B4 = v1{17}.[15:0]");
    }

    #[test]
    fn test_matrix_entry_f16_input() {
        // v1{17} holds both halves of the packed pair.
        let r = matrix_entry(
            Architecture::Cdna2,
            "V_MFMA_F32_4X4X4F16",
            Matrix::A,
            1,
            17,
            &DEF,
            false,
        )
        .unwrap();
        let lines: Vec<String> = r.entries.iter().map(EntryLine::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "v1{17}.[15:0] = A[1][2].B4".to_string(),
                "v1{17}.[31:16] = A[1][3].B4".to_string(),
            ]
        );
    }

    #[test]
    fn test_output_calculation_expansion() {
        let r = get_register(
            Architecture::Cdna2,
            "V_MFMA_F32_4X4X4F16",
            Matrix::D,
            3,
            2,
            0,
            1,
            &DEF,
            true,
        )
        .unwrap();
        assert_eq!(
            r.to_string(),
            "D[3][2].B1 = Vdst_v3{6} = \
             Src0_v0{7}.[15:0]\u{b7}Src1_v0{6}.[15:0] + \
             Src0_v0{7}.[31:16]\u{b7}Src1_v0{6}.[31:16] + \
             Src0_v1{7}.[15:0]\u{b7}Src1_v1{6}.[15:0] + \
             Src0_v1{7}.[31:16]\u{b7}Src1_v1{6}.[31:16] + \
             Src2_v3{6}"
        );
    }

    #[test]
    fn test_register_layout_cbsz_collapse() {
        // CBSZ=2/ABID=2 collapses all four blocks onto block 2's lanes
        // (32-47) of GPR 0.
        let mods = Modifiers {
            cbsz: 2,
            abid: 2,
            ..DEF
        };
        let r = register_layout(
            Architecture::Cdna2,
            "V_MFMA_F32_16X16X2BF16",
            Matrix::A,
            &mods,
        )
        .unwrap();
        assert_eq!(r.tables.len(), 1);
        let table = &r.tables[0];
        assert_eq!(table.caption, "Blocks 0, 1, 2, 3");
        for (row, cells) in table.cells.iter().enumerate() {
            for (lane, cell) in cells.iter().enumerate() {
                let populated = (32..48).contains(&lane);
                assert_eq!(!cell.is_empty(), populated, "row {} lane {}", row, lane);
            }
        }
    }

    #[test]
    fn test_matrix_layout_f64_negate() {
        // BLGP=6 on CDNA3 FP64 negates every B cell, lanes unchanged.
        let mods = Modifiers { blgp: 6, ..DEF };
        let with = matrix_layout(
            Architecture::Cdna3,
            "V_MFMA_F64_16X16X4_F64",
            Matrix::B,
            &mods,
        )
        .unwrap();
        let without = matrix_layout(
            Architecture::Cdna3,
            "V_MFMA_F64_16X16X4_F64",
            Matrix::B,
            &DEF,
        )
        .unwrap();
        for (rw, rn) in with.tables[0].cells.iter().zip(&without.tables[0].cells) {
            for (cw, cn) in rw.iter().zip(rn) {
                assert_eq!(cw, &format!("-{}", cn));
            }
        }
    }

    #[test]
    fn test_sparse_index_with_opsel() {
        let mods = Modifiers { opsel: 1, ..DEF };
        let r = get_register(
            Architecture::Rdna4,
            "V_SWMMAC_F32_16X16X32_F16",
            Matrix::K,
            2,
            0,
            31,
            0,
            &mods,
            false,
        )
        .unwrap();
        assert_eq!(r.to_string(), "K[2][31] = v0{18}.[31:28]");
    }

    #[test]
    fn test_blgp_broadcast_lookup_law() {
        // BLGP=1 lookup on an upper lane equals the BLGP=0 lookup on
        // the mirrored lower lane.
        let mods = Modifiers { blgp: 1, ..DEF };
        let swizzled = matrix_entry(
            Architecture::Cdna2,
            "V_MFMA_F32_16X16X4F32",
            Matrix::B,
            0,
            40,
            &mods,
            false,
        )
        .unwrap();
        let base = matrix_entry(
            Architecture::Cdna2,
            "V_MFMA_F32_16X16X4F32",
            Matrix::B,
            0,
            8,
            &DEF,
            false,
        )
        .unwrap();
        let coords_a: Vec<_> = swizzled.entries.iter().map(|e| e.coord).collect();
        let coords_b: Vec<_> = base.entries.iter().map(|e| e.coord).collect();
        assert_eq!(coords_a, coords_b);
    }

    #[test]
    fn test_bad_usage_rejections() {
        // K on a dense instruction.
        let err = get_register(
            Architecture::Cdna2,
            "V_MFMA_F32_4X4X1F32",
            Matrix::K,
            0,
            0,
            0,
            0,
            &DEF,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CalcError::BadUsage { .. }));
        // C on a sparse instruction.
        let err = matrix_layout(
            Architecture::Cdna3,
            "V_SMFMAC_F32_16X16X32_F16",
            Matrix::C,
            &DEF,
        )
        .unwrap_err();
        assert!(matches!(err, CalcError::BadUsage { .. }));
        // Output calculation without D.
        let err = get_register(
            Architecture::Cdna2,
            "V_MFMA_F32_4X4X1F32",
            Matrix::A,
            0,
            0,
            0,
            0,
            &DEF,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, CalcError::BadUsage { .. }));
        // Output calculation on a sparse instruction.
        let err = get_register(
            Architecture::Rdna4,
            "V_SWMMAC_F32_16X16X32_F16",
            Matrix::D,
            0,
            0,
            0,
            0,
            &DEF,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, CalcError::BadUsage { .. }));
    }

    #[test]
    fn test_detail_contents() {
        let text = detail(Architecture::Cdna2, "V_MFMA_F32_4X4X1F32").unwrap();
        assert!(text.contains("VOP3P opcode: 0x42"));
        assert!(text.contains("VOP3P-MAI opcode: 0x2"));
        assert!(text.contains("M=4, N=4, K=1, blocks=16"));
        assert!(text.contains("FLOPs: 512"));
        assert!(text.contains("Execution cycles: 8"));
        assert!(text.contains("GPR alignment requirement: 8 bytes"));
        assert!(text.contains("mapping with no modifiers"));
    }

    #[test]
    fn test_warnings_surface() {
        let mods = Modifiers { cbsz: 1, abid: 1, ..DEF };
        let r = get_register(
            Architecture::Cdna2,
            "V_MFMA_F32_16X16X2BF16",
            Matrix::B,
            0,
            0,
            0,
            0,
            &mods,
            false,
        )
        .unwrap();
        assert!(!r.warnings.is_empty());
    }

    #[test]
    fn test_matrix_layout_shape() {
        let r = matrix_layout(
            Architecture::Rdna3,
            "V_WMMA_F32_16X16X16_F16",
            Matrix::D,
            &DEF,
        )
        .unwrap();
        assert_eq!(r.tables.len(), 1);
        assert_eq!(r.tables[0].row_labels.len(), 16);
        assert_eq!(r.tables[0].col_labels.len(), 16);
        assert_eq!(r.tables[0].cells[9][3], "v4{19}");
    }
}
