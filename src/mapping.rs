//! Coordinate-to-register mapping engine.
//!
//! For every (instruction, matrix) pair the mapping is a pair of total
//! functions: [`locate`] takes a matrix coordinate to a register
//! location, [`lookup`] takes a (GPR, lane) pair back to the matrix
//! coordinates stored there. The closed forms are selected by a small
//! set of [`LayoutKind`] patterns and parameterized entirely by
//! descriptor integers (dimensions, block count, element width), so the
//! forward and inverse directions share their coefficients and cannot
//! drift apart. The catalog verifies the round trip at build time.
//!
//! Everything here is the zero-modifier base mapping; modifier rewrites
//! live in [`crate::modifiers`].

use crate::catalog::InstructionDescriptor;
use crate::error::{CalcError, Result};
use crate::types::{Coordinate, Matrix, RegisterLocation};

/// Mapping pattern identifiers.
///
/// Each pattern is a family of closed-form layouts shared by many
/// instructions; the descriptor's dimensions select the family member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// CDNA A/B operand: blocks partition the wave into contiguous
    /// lane groups; the depth dimension packs sub-registers first,
    /// then spare lanes, then further GPRs.
    MfmaInput,
    /// CDNA C/D accumulator: rows split into a GPR-minor digit and a
    /// lane-group digit (the multi-row-per-lane 16x16/32x32 shapes),
    /// register pairs for FP64.
    MfmaAcc,
    /// RDNA3 A/B operand: each half-wave holds a full operand copy;
    /// lanes 16-31 mirror lanes 0-15.
    WmmaInputDup,
    /// RDNA3 C/D accumulator: two row groups split across half-waves,
    /// one element per GPR (16-bit results use a half-register).
    WmmaAccRdna3,
    /// RDNA4 A/B operand: depth split across half-waves, no mirroring.
    WmmaInputRdna4,
    /// RDNA4 C/D accumulator: eight rows per half-wave, 16-bit results
    /// packed two rows per GPR.
    WmmaAccRdna4,
    /// CDNA3 sparse compression index: one ABID-selected 8/16-bit slot
    /// per lane, 4-bit group nibbles inside the slot.
    SmfmacIndex,
    /// RDNA4 sparse compression index: one OPSEL-selected half-wave of
    /// 4-bit group nibbles.
    SwmmacIndex,
}

/// One matrix element found at a (GPR, lane) location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// The element's coordinate.
    pub coord: Coordinate,
    /// Highest bit of the element, inclusive.
    pub bit_hi: u8,
    /// Lowest bit of the element, inclusive.
    pub bit_lo: u8,
}

/// Build a coordinate from a matrix's (row, column) addressing.
pub fn coord_from_row_col(matrix: Matrix, row: u32, col: u32, block: u32) -> Coordinate {
    match matrix {
        Matrix::A | Matrix::K => Coordinate::new(matrix, row, 0, col, block),
        Matrix::B => Coordinate::new(matrix, 0, col, row, block),
        Matrix::C | Matrix::D => Coordinate::new(matrix, row, col, 0, block),
    }
}

/// Axis names used in range errors for a matrix's (row, col) pair.
fn axis_names(matrix: Matrix) -> (&'static str, &'static str) {
    match matrix {
        Matrix::A | Matrix::K => ("I", "K"),
        Matrix::B => ("K", "J"),
        Matrix::C | Matrix::D => ("I", "J"),
    }
}

fn check_range(
    axis: &'static str,
    value: u32,
    limit: u32,
    matrix: Matrix,
) -> Result<()> {
    if value >= limit {
        return Err(CalcError::OutOfRangeCoordinate {
            axis,
            value,
            matrix,
            max: limit - 1,
        });
    }
    Ok(())
}

/// Map a coordinate to its base register location (no modifiers).
pub fn locate(desc: &InstructionDescriptor, coord: Coordinate) -> Result<RegisterLocation> {
    let matrix = coord.matrix;
    let (rows, cols) = desc.matrix_dims(matrix);
    let (row, col) = coord.row_col();
    let (row_axis, col_axis) = axis_names(matrix);
    check_range(row_axis, row, rows, matrix)?;
    check_range(col_axis, col, cols, matrix)?;
    let block_limit = if matrix == Matrix::K { 1 } else { desc.blocks };
    check_range("block", coord.block, block_limit, matrix)?;

    Ok(match desc.layout_kind(matrix) {
        LayoutKind::MfmaInput => mfma_input(desc, matrix, row, col, coord.block),
        LayoutKind::MfmaAcc => mfma_acc(desc, row, col, coord.block),
        LayoutKind::WmmaInputDup => wmma_input_dup(desc, matrix, row, col),
        LayoutKind::WmmaAccRdna3 => wmma_acc_rdna3(desc, row, col),
        LayoutKind::WmmaInputRdna4 => wmma_input_rdna4(desc, matrix, row, col),
        LayoutKind::WmmaAccRdna4 => wmma_acc_rdna4(desc, row, col),
        LayoutKind::SmfmacIndex => smfmac_index(desc, row, col),
        LayoutKind::SwmmacIndex => swmmac_index(desc, row, col),
    })
}

/// Map a (GPR, lane) pair to every matrix element stored there
/// (no modifiers).
///
/// Packed sub-register elements are returned in ascending bit order.
/// For 64-bit matrices either register of a pair addresses the pair.
/// An empty result means the location holds no element of this matrix.
pub fn lookup(
    desc: &InstructionDescriptor,
    matrix: Matrix,
    gpr: u32,
    lane: u32,
) -> Result<Vec<Element>> {
    let gprs = desc.gpr_count(matrix);
    if gpr >= gprs {
        return Err(CalcError::OutOfRangeCoordinate {
            axis: "register",
            value: gpr,
            matrix,
            max: gprs - 1,
        });
    }
    if lane >= desc.wave_size() {
        return Err(CalcError::OutOfRangeCoordinate {
            axis: "lane",
            value: lane,
            matrix,
            max: desc.wave_size() - 1,
        });
    }
    let gpr = if desc.is_pair(matrix) { gpr & !1 } else { gpr };

    Ok(match desc.layout_kind(matrix) {
        LayoutKind::MfmaInput => mfma_input_inv(desc, matrix, gpr, lane),
        LayoutKind::MfmaAcc => mfma_acc_inv(desc, matrix, gpr, lane),
        LayoutKind::WmmaInputDup => wmma_input_dup_inv(desc, matrix, gpr, lane),
        LayoutKind::WmmaAccRdna3 => wmma_acc_rdna3_inv(desc, matrix, gpr, lane),
        LayoutKind::WmmaInputRdna4 => wmma_input_rdna4_inv(desc, matrix, gpr, lane),
        LayoutKind::WmmaAccRdna4 => wmma_acc_rdna4_inv(desc, matrix, gpr, lane),
        LayoutKind::SmfmacIndex => smfmac_index_inv(desc, lane),
        LayoutKind::SwmmacIndex => swmmac_index_inv(desc, lane),
    })
}

fn sub_location(gpr: u32, lane: u32, ebits: u32, sub: u32) -> RegisterLocation {
    if ebits == 32 {
        RegisterLocation::dword(gpr, lane)
    } else {
        let lo = (ebits * sub) as u8;
        RegisterLocation::sub(gpr, lane, lo + ebits as u8 - 1, lo)
    }
}

fn sub_bits(ebits: u32, sub: u32) -> (u8, u8) {
    let lo = (ebits * sub) as u8;
    (lo + ebits as u8 - 1, lo)
}

// CDNA input operands. The lane-carried index is the row for A and the
// column for B; the depth index fills sub-registers, spare lane groups,
// then GPRs.

struct MfmaInputParams {
    lane_dim: u32,
    kdim: u32,
    ebits: u32,
    lpb: u32,
    groups: u32,
}

fn mfma_input_params(desc: &InstructionDescriptor, matrix: Matrix) -> MfmaInputParams {
    let (rows, cols) = desc.matrix_dims(matrix);
    let (lane_dim, kdim) = if matrix == Matrix::A {
        (rows, cols)
    } else {
        (cols, rows)
    };
    let lpb = desc.wave_size() / desc.blocks;
    MfmaInputParams {
        lane_dim,
        kdim,
        ebits: desc.element_type(matrix).bits(),
        lpb,
        groups: (lpb / lane_dim).max(1),
    }
}

fn mfma_input(
    desc: &InstructionDescriptor,
    matrix: Matrix,
    row: u32,
    col: u32,
    block: u32,
) -> RegisterLocation {
    let p = mfma_input_params(desc, matrix);
    let (lane_i, kk) = if matrix == Matrix::A {
        (row, col)
    } else {
        (col, row)
    };
    if p.ebits == 64 {
        let lane = block * p.lpb + lane_i + p.lane_dim * (kk % p.groups);
        RegisterLocation::dword_pair(2 * (kk / p.groups), lane)
    } else {
        let epg = 32 / p.ebits;
        let (kp, sub) = (kk / epg, kk % epg);
        let lane = block * p.lpb + lane_i + p.lane_dim * (kp % p.groups);
        sub_location(kp / p.groups, lane, p.ebits, sub)
    }
}

fn mfma_input_inv(
    desc: &InstructionDescriptor,
    matrix: Matrix,
    gpr: u32,
    lane: u32,
) -> Vec<Element> {
    let p = mfma_input_params(desc, matrix);
    let block = lane / p.lpb;
    let within = lane % p.lpb;
    let lane_i = within % p.lane_dim;
    let kg = within / p.lane_dim;
    if kg >= p.groups {
        return Vec::new();
    }
    let mut out = Vec::new();
    if p.ebits == 64 {
        let kk = (gpr / 2) * p.groups + kg;
        if kk < p.kdim {
            out.push(Element {
                coord: input_coord(matrix, lane_i, kk, block),
                bit_hi: 63,
                bit_lo: 0,
            });
        }
    } else {
        let epg = 32 / p.ebits;
        let kp = gpr * p.groups + kg;
        for sub in 0..epg {
            let kk = kp * epg + sub;
            if kk < p.kdim {
                let (hi, lo) = sub_bits(p.ebits, sub);
                out.push(Element {
                    coord: input_coord(matrix, lane_i, kk, block),
                    bit_hi: hi,
                    bit_lo: lo,
                });
            }
        }
    }
    out
}

fn input_coord(matrix: Matrix, lane_i: u32, kk: u32, block: u32) -> Coordinate {
    if matrix == Matrix::A {
        Coordinate::new(Matrix::A, lane_i, 0, kk, block)
    } else {
        Coordinate::new(Matrix::B, 0, lane_i, kk, block)
    }
}

// CDNA accumulators. Rows decompose into a GPR-minor digit (up to four
// consecutive rows per lane) and a lane-group digit.

struct MfmaAccParams {
    lpb: u32,
    row_group: u32,
    groups: u32,
    pair: bool,
}

fn mfma_acc_params(desc: &InstructionDescriptor) -> MfmaAccParams {
    let lpb = desc.wave_size() / desc.blocks;
    let units_per_block = desc.m * desc.n / lpb;
    MfmaAccParams {
        lpb,
        row_group: units_per_block.min(4),
        groups: (lpb / desc.n).max(1),
        pair: desc.cd_type.bits() == 64,
    }
}

fn mfma_acc(desc: &InstructionDescriptor, i: u32, j: u32, block: u32) -> RegisterLocation {
    let p = mfma_acc_params(desc);
    let (i_lo, i_hi) = (i % p.row_group, i / p.row_group);
    let lane = block * p.lpb + j + desc.n * (i_hi % p.groups);
    let unit = i_lo + p.row_group * (i_hi / p.groups);
    if p.pair {
        RegisterLocation::dword_pair(2 * unit, lane)
    } else {
        RegisterLocation::dword(unit, lane)
    }
}

fn mfma_acc_inv(
    desc: &InstructionDescriptor,
    matrix: Matrix,
    gpr: u32,
    lane: u32,
) -> Vec<Element> {
    let p = mfma_acc_params(desc);
    let block = lane / p.lpb;
    let within = lane % p.lpb;
    let j = within % desc.n;
    let lane_group = within / desc.n;
    if lane_group >= p.groups {
        return Vec::new();
    }
    let unit = if p.pair { gpr / 2 } else { gpr };
    let i_lo = unit % p.row_group;
    let i_hi = (unit / p.row_group) * p.groups + lane_group;
    let i = i_hi * p.row_group + i_lo;
    if i >= desc.m {
        return Vec::new();
    }
    let (bit_hi, bit_lo) = if p.pair { (63, 0) } else { (31, 0) };
    vec![Element {
        coord: Coordinate::new(matrix, i, j, 0, block),
        bit_hi,
        bit_lo,
    }]
}

// RDNA3 inputs: a full operand copy per half-wave. The canonical
// location is the low half; lanes 16-31 resolve to the same elements.

fn wmma_input_dup(
    desc: &InstructionDescriptor,
    matrix: Matrix,
    row: u32,
    col: u32,
) -> RegisterLocation {
    let (lane_i, kk) = if matrix == Matrix::A {
        (row, col)
    } else {
        (col, row)
    };
    let ebits = desc.element_type(matrix).bits();
    let epg = 32 / ebits;
    sub_location(kk / epg, lane_i, ebits, kk % epg)
}

fn wmma_input_dup_inv(
    desc: &InstructionDescriptor,
    matrix: Matrix,
    gpr: u32,
    lane: u32,
) -> Vec<Element> {
    let (kdim, lane_i) = if matrix == Matrix::A {
        (desc.matrix_dims(Matrix::A).1, lane % 16)
    } else {
        (desc.k, lane % 16)
    };
    let ebits = desc.element_type(matrix).bits();
    let epg = 32 / ebits;
    let mut out = Vec::new();
    for sub in 0..epg {
        let kk = gpr * epg + sub;
        if kk < kdim {
            let (hi, lo) = sub_bits(ebits, sub);
            out.push(Element {
                coord: input_coord(matrix, lane_i, kk, 0),
                bit_hi: hi,
                bit_lo: lo,
            });
        }
    }
    out
}

// RDNA3 accumulators: row pairs split across half-waves; one element
// per GPR, half-register wide for 16-bit results (high half selected
// by OPSEL as a post-map rewrite).

fn wmma_acc_rdna3(desc: &InstructionDescriptor, i: u32, j: u32) -> RegisterLocation {
    let lane = j + 16 * (i % 2);
    let gpr = i / 2;
    if desc.cd_type.bits() == 16 {
        RegisterLocation::sub(gpr, lane, 15, 0)
    } else {
        RegisterLocation::dword(gpr, lane)
    }
}

fn wmma_acc_rdna3_inv(
    desc: &InstructionDescriptor,
    matrix: Matrix,
    gpr: u32,
    lane: u32,
) -> Vec<Element> {
    let j = lane % 16;
    let i = 2 * gpr + lane / 16;
    let bit_hi = if desc.cd_type.bits() == 16 { 15 } else { 31 };
    vec![Element {
        coord: Coordinate::new(matrix, i, j, 0, 0),
        bit_hi,
        bit_lo: 0,
    }]
}

// RDNA4 inputs: the depth dimension splits across half-waves.

fn wmma_input_rdna4(
    desc: &InstructionDescriptor,
    matrix: Matrix,
    row: u32,
    col: u32,
) -> RegisterLocation {
    let (lane_i, kk, kdim) = if matrix == Matrix::A {
        (row, col, desc.matrix_dims(Matrix::A).1)
    } else {
        (col, row, desc.k)
    };
    let half = kdim / 2;
    let ebits = desc.element_type(matrix).bits();
    let epg = 32 / ebits;
    let kkh = kk % half;
    sub_location(kkh / epg, lane_i + 16 * (kk / half), ebits, kkh % epg)
}

fn wmma_input_rdna4_inv(
    desc: &InstructionDescriptor,
    matrix: Matrix,
    gpr: u32,
    lane: u32,
) -> Vec<Element> {
    let kdim = if matrix == Matrix::A {
        desc.matrix_dims(Matrix::A).1
    } else {
        desc.k
    };
    let half = kdim / 2;
    let lane_i = lane % 16;
    let hl = lane / 16;
    let ebits = desc.element_type(matrix).bits();
    let epg = 32 / ebits;
    let mut out = Vec::new();
    for sub in 0..epg {
        let kkh = gpr * epg + sub;
        if kkh < half {
            let (hi, lo) = sub_bits(ebits, sub);
            out.push(Element {
                coord: input_coord(matrix, lane_i, hl * half + kkh, 0),
                bit_hi: hi,
                bit_lo: lo,
            });
        }
    }
    out
}

// RDNA4 accumulators: eight rows per half-wave; 16-bit results pack
// two rows per GPR.

fn wmma_acc_rdna4(desc: &InstructionDescriptor, i: u32, j: u32) -> RegisterLocation {
    let lane = j + 16 * (i / 8);
    let unit = i % 8;
    if desc.cd_type.bits() == 16 {
        let (hi, lo) = sub_bits(16, unit % 2);
        RegisterLocation::sub(unit / 2, lane, hi, lo)
    } else {
        RegisterLocation::dword(unit, lane)
    }
}

fn wmma_acc_rdna4_inv(
    desc: &InstructionDescriptor,
    matrix: Matrix,
    gpr: u32,
    lane: u32,
) -> Vec<Element> {
    let j = lane % 16;
    let row_base = 8 * (lane / 16);
    if desc.cd_type.bits() == 16 {
        (0..2)
            .map(|sub| {
                let (hi, lo) = sub_bits(16, sub);
                Element {
                    coord: Coordinate::new(matrix, row_base + 2 * gpr + sub, j, 0, 0),
                    bit_hi: hi,
                    bit_lo: lo,
                }
            })
            .collect()
    } else {
        vec![Element {
            coord: Coordinate::new(matrix, row_base + gpr, j, 0, 0),
            bit_hi: 31,
            bit_lo: 0,
        }]
    }
}

// Sparse compression indices. Two bits per retained element, packed as
// one 4-bit nibble per group of four source columns; reported at nibble
// granularity.

/// Bits of the per-lane index slot on CDNA3 (selected by ABID).
pub fn smfmac_slot_bits(desc: &InstructionDescriptor) -> u32 {
    if desc.a_type.bits() == 16 {
        8
    } else {
        16
    }
}

fn smfmac_index(desc: &InstructionDescriptor, i: u32, k: u32) -> RegisterLocation {
    let rpl = smfmac_slot_bits(desc);
    let lane = i + desc.m * (k / rpl);
    let nib = (k % rpl) / 4;
    RegisterLocation::sub(0, lane, (4 * nib + 3) as u8, (4 * nib) as u8)
}

fn smfmac_index_inv(desc: &InstructionDescriptor, lane: u32) -> Vec<Element> {
    let rpl = smfmac_slot_bits(desc);
    let i = lane % desc.m;
    let base_k = (lane / desc.m) * rpl;
    let mut out = Vec::new();
    for nib in 0..rpl / 4 {
        for r in 0..4 {
            let kk = base_k + 4 * nib + r;
            if kk < desc.k {
                out.push(Element {
                    coord: Coordinate::new(Matrix::K, i, 0, kk, 0),
                    bit_hi: (4 * nib + 3) as u8,
                    bit_lo: (4 * nib) as u8,
                });
            }
        }
    }
    out
}

/// Raw source columns whose index nibbles share one lane on RDNA4.
///
/// Each row splits its index across two lanes; a 32-deep instruction
/// uses 16 bits per lane (OPSEL selects the 16-bit slot), a 64-deep one
/// fills the whole register.
pub fn swmmac_cols_per_lane(desc: &InstructionDescriptor) -> u32 {
    desc.k / 2
}

fn swmmac_index(desc: &InstructionDescriptor, i: u32, k: u32) -> RegisterLocation {
    let cpl = swmmac_cols_per_lane(desc);
    let lane = i + 16 * (k / cpl);
    let nib = (k % cpl) / 4;
    RegisterLocation::sub(0, lane, (4 * nib + 3) as u8, (4 * nib) as u8)
}

fn swmmac_index_inv(desc: &InstructionDescriptor, lane: u32) -> Vec<Element> {
    let cpl = swmmac_cols_per_lane(desc);
    let i = lane % 16;
    let base_k = (lane / 16) * cpl;
    let mut out = Vec::new();
    for nib in 0..cpl / 4 {
        for r in 0..4 {
            let kk = base_k + 4 * nib + r;
            if kk < desc.k {
                out.push(Element {
                    coord: Coordinate::new(Matrix::K, i, 0, kk, 0),
                    bit_hi: (4 * nib + 3) as u8,
                    bit_lo: (4 * nib) as u8,
                });
            }
        }
    }
    out
}

// Formula rendering for instruction detail output. The strings are
// built from the same parameters the mapping functions use.

fn floor_div(expr: &str, d: u32) -> String {
    if d == 1 {
        expr.to_string()
    } else {
        format!("floor({} / {})", expr, d)
    }
}

fn modulo(expr: &str, m: u32) -> String {
    format!("({} % {})", expr, m)
}

/// Human-readable forward mapping formulas for a matrix, zero modifiers.
pub fn forward_formulas(desc: &InstructionDescriptor, matrix: Matrix) -> Vec<String> {
    let ebits = desc.element_type(matrix).bits();
    match desc.layout_kind(matrix) {
        LayoutKind::MfmaInput => {
            let p = mfma_input_params(desc, matrix);
            let kvar = "k";
            let lvar = if matrix == Matrix::A { "i" } else { "j" };
            let epg = if p.ebits == 64 { 1 } else { 32 / p.ebits };
            let gpr = if p.ebits == 64 {
                format!("GPR pair: [2 * {q} + 1 : 2 * {q}]", q = floor_div(kvar, p.groups))
            } else {
                format!("GPR: {}", floor_div(kvar, epg * p.groups))
            };
            let mut lane = String::from("Lane: ");
            if desc.blocks > 1 {
                lane.push_str(&format!("{} * block + ", p.lpb));
            }
            lane.push_str(lvar);
            if p.groups > 1 {
                lane.push_str(&format!(
                    " + {} * {}",
                    p.lane_dim,
                    modulo(&floor_div(kvar, epg), p.groups)
                ));
            }
            let mut out = vec![gpr, lane];
            if epg > 1 {
                out.push(format!(
                    "Bits: [{e} * (k % {epg}) + {hi} : {e} * (k % {epg})]",
                    e = ebits,
                    epg = epg,
                    hi = ebits - 1
                ));
            }
            out
        }
        LayoutKind::MfmaAcc => {
            let p = mfma_acc_params(desc);
            let unit = if p.groups == 1 && p.row_group == 4 {
                // i_hi goes entirely to the GPR digit.
                "i".to_string()
            } else {
                format!(
                    "({} + {} * {})",
                    modulo("i", p.row_group),
                    p.row_group,
                    floor_div(&floor_div("i", p.row_group), p.groups)
                )
            };
            let gpr = if p.pair {
                format!("GPR pair: [2 * {u} + 1 : 2 * {u}]", u = unit)
            } else {
                format!("GPR: {}", unit)
            };
            let mut lane = String::from("Lane: ");
            if desc.blocks > 1 {
                lane.push_str(&format!("{} * block + ", p.lpb));
            }
            lane.push_str("j");
            if p.groups > 1 {
                lane.push_str(&format!(
                    " + {} * {}",
                    desc.n,
                    modulo(&floor_div("i", p.row_group), p.groups)
                ));
            }
            vec![gpr, lane]
        }
        LayoutKind::WmmaInputDup => {
            let lvar = if matrix == Matrix::A { "i" } else { "j" };
            let epg = 32 / ebits;
            let mut out = vec![
                format!("GPR: {}", floor_div("k", epg)),
                format!("Lane: {lv} and {lv} + 16 (half-waves mirror)", lv = lvar),
            ];
            if epg > 1 {
                out.push(format!(
                    "Bits: [{e} * (k % {epg}) + {hi} : {e} * (k % {epg})]",
                    e = ebits,
                    epg = epg,
                    hi = ebits - 1
                ));
            }
            out
        }
        LayoutKind::WmmaAccRdna3 => {
            let mut out = vec![
                "GPR: floor(i / 2)".to_string(),
                "Lane: j + 16 * (i % 2)".to_string(),
            ];
            if ebits == 16 {
                out.push("Bits: [15:0] (OPSEL=4 selects [31:16])".to_string());
            }
            out
        }
        LayoutKind::WmmaInputRdna4 => {
            let (_, kdim) = if matrix == Matrix::A {
                desc.matrix_dims(Matrix::A)
            } else {
                (0, desc.k)
            };
            let half = kdim / 2;
            let lvar = if matrix == Matrix::A { "i" } else { "j" };
            let epg = 32 / ebits;
            let mut out = vec![
                format!("GPR: {}", floor_div(&modulo("k", half), epg)),
                format!("Lane: {} + 16 * {}", lvar, floor_div("k", half)),
            ];
            if epg > 1 {
                out.push(format!(
                    "Bits: [{e} * ((k % {half}) % {epg}) + {hi} : {e} * ((k % {half}) % {epg})]",
                    e = ebits,
                    half = half,
                    epg = epg,
                    hi = ebits - 1
                ));
            }
            out
        }
        LayoutKind::WmmaAccRdna4 => {
            if ebits == 16 {
                vec![
                    "GPR: floor((i % 8) / 2)".to_string(),
                    "Lane: j + 16 * floor(i / 8)".to_string(),
                    "Bits: [16 * (i % 2) + 15 : 16 * (i % 2)]".to_string(),
                ]
            } else {
                vec![
                    "GPR: i % 8".to_string(),
                    "Lane: j + 16 * floor(i / 8)".to_string(),
                ]
            }
        }
        LayoutKind::SmfmacIndex => {
            let rpl = smfmac_slot_bits(desc);
            vec![
                "GPR: 0".to_string(),
                format!("Lane: i + {} * {}", desc.m, floor_div("k", rpl)),
                format!(
                    "Bits: [4 * floor((k % {rpl}) / 4) + 3 : 4 * floor((k % {rpl}) / 4)] within the ABID-selected {rpl}-bit slot",
                    rpl = rpl
                ),
            ]
        }
        LayoutKind::SwmmacIndex => {
            let cpl = swmmac_cols_per_lane(desc);
            let mut out = vec![
                "GPR: 0".to_string(),
                format!("Lane: i + 16 * floor(k / {})", cpl),
            ];
            if cpl == 16 {
                out.push(format!(
                    "Bits: [4 * floor((k % {cpl}) / 4) + 3 : 4 * floor((k % {cpl}) / 4)] within the OPSEL-selected 16-bit slot",
                    cpl = cpl
                ));
            } else {
                out.push(format!(
                    "Bits: [4 * floor((k % {cpl}) / 4) + 3 : 4 * floor((k % {cpl}) / 4)]",
                    cpl = cpl
                ));
            }
            out
        }
    }
}

/// Human-readable inverse mapping formulas for a matrix, zero modifiers.
pub fn inverse_formulas(desc: &InstructionDescriptor, matrix: Matrix) -> Vec<String> {
    match desc.layout_kind(matrix) {
        LayoutKind::MfmaInput => {
            let p = mfma_input_params(desc, matrix);
            let lvar = if matrix == Matrix::A { "i" } else { "j" };
            let epg = if p.ebits == 64 { 1 } else { 32 / p.ebits };
            let mut out = Vec::new();
            if desc.blocks > 1 {
                out.push(format!("block: floor(lane / {})", p.lpb));
            }
            out.push(format!("{}: (lane % {}) % {}", lvar, p.lpb, p.lane_dim));
            let mut k = format!("{} * GPR", epg * p.groups);
            if p.groups > 1 {
                k.push_str(&format!(
                    " + {} * floor((lane % {}) / {})",
                    epg, p.lpb, p.lane_dim
                ));
            }
            if epg > 1 {
                k.push_str(" + sub-field");
            }
            out.push(format!("k: {}", k));
            out
        }
        LayoutKind::MfmaAcc => {
            let p = mfma_acc_params(desc);
            let mut out = Vec::new();
            if desc.blocks > 1 {
                out.push(format!("block: floor(lane / {})", p.lpb));
            }
            out.push(format!("j: (lane % {}) % {}", p.lpb, desc.n));
            let unit = if p.pair { "floor(GPR / 2)" } else { "GPR" };
            if p.groups == 1 && p.row_group == 4 {
                out.push(format!("i: {}", unit));
            } else {
                out.push(format!(
                    "i: {rg} * ({g} * floor({u} / {rg}) + floor((lane % {lpb}) / {n})) + {u} % {rg}",
                    rg = p.row_group,
                    g = p.groups,
                    u = unit,
                    lpb = p.lpb,
                    n = desc.n
                ));
            }
            out
        }
        LayoutKind::WmmaInputDup => {
            let lvar = if matrix == Matrix::A { "i" } else { "j" };
            let epg = 32 / desc.element_type(matrix).bits();
            let mut k = format!("{} * GPR", epg);
            if epg > 1 {
                k.push_str(" + sub-field");
            }
            vec![format!("{}: lane % 16", lvar), format!("k: {}", k)]
        }
        LayoutKind::WmmaAccRdna3 => vec![
            "j: lane % 16".to_string(),
            "i: 2 * GPR + floor(lane / 16)".to_string(),
        ],
        LayoutKind::WmmaInputRdna4 => {
            let kdim = if matrix == Matrix::A {
                desc.matrix_dims(Matrix::A).1
            } else {
                desc.k
            };
            let lvar = if matrix == Matrix::A { "i" } else { "j" };
            let epg = 32 / desc.element_type(matrix).bits();
            let mut k = format!("{} * floor(lane / 16) + {} * GPR", kdim / 2, epg);
            if epg > 1 {
                k.push_str(" + sub-field");
            }
            vec![format!("{}: lane % 16", lvar), format!("k: {}", k)]
        }
        LayoutKind::WmmaAccRdna4 => {
            if desc.cd_type.bits() == 16 {
                vec![
                    "j: lane % 16".to_string(),
                    "i: 8 * floor(lane / 16) + 2 * GPR + half-index".to_string(),
                ]
            } else {
                vec![
                    "j: lane % 16".to_string(),
                    "i: 8 * floor(lane / 16) + GPR".to_string(),
                ]
            }
        }
        LayoutKind::SmfmacIndex => {
            let rpl = smfmac_slot_bits(desc);
            vec![
                format!("i: lane % {}", desc.m),
                format!(
                    "k: {} * floor(lane / {}) + 4 * nibble + entry (entry in 0..4)",
                    rpl, desc.m
                ),
            ]
        }
        LayoutKind::SwmmacIndex => {
            let cpl = swmmac_cols_per_lane(desc);
            vec![
                "i: lane % 16".to_string(),
                format!(
                    "k: {} * floor(lane / 16) + 4 * nibble + entry (entry in 0..4)",
                    cpl
                ),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::Architecture;
    use pretty_assertions::assert_eq;

    fn desc(arch: Architecture, mnem: &str) -> &'static InstructionDescriptor {
        Catalog::global().get(arch, mnem).unwrap()
    }

    #[test]
    fn test_4x4x4f16_a_forward() {
        // A[1][2] of block 4 lives in v1{17}, low half.
        let d = desc(Architecture::Cdna2, "V_MFMA_F32_4X4X4F16");
        let loc = locate(d, Coordinate::new(Matrix::A, 1, 0, 2, 4)).unwrap();
        assert_eq!(loc, RegisterLocation::sub(1, 17, 15, 0));
    }

    #[test]
    fn test_4x4x4f16_a_inverse_orders_subfields() {
        // v1{17} holds A[1][2].B4 in [15:0] and A[1][3].B4 in [31:16].
        let d = desc(Architecture::Cdna2, "V_MFMA_F32_4X4X4F16");
        let elems = lookup(d, Matrix::A, 1, 17).unwrap();
        assert_eq!(elems.len(), 2);
        assert_eq!(elems[0].coord, Coordinate::new(Matrix::A, 1, 0, 2, 4));
        assert_eq!((elems[0].bit_hi, elems[0].bit_lo), (15, 0));
        assert_eq!(elems[1].coord, Coordinate::new(Matrix::A, 1, 0, 3, 4));
        assert_eq!((elems[1].bit_hi, elems[1].bit_lo), (31, 16));
    }

    #[test]
    fn test_4x4x4f16_d_location() {
        let d = desc(Architecture::Cdna2, "V_MFMA_F32_4X4X4F16");
        let loc = locate(d, Coordinate::new(Matrix::D, 3, 2, 0, 1)).unwrap();
        assert_eq!(loc, RegisterLocation::dword(3, 6));
    }

    #[test]
    fn test_16x16x4f32_input_spreads_k_over_lanes() {
        let d = desc(Architecture::Cdna2, "V_MFMA_F32_16X16X4F32");
        let loc = locate(d, Coordinate::new(Matrix::A, 5, 0, 3, 0)).unwrap();
        assert_eq!(loc, RegisterLocation::dword(0, 5 + 16 * 3));
        let loc = locate(d, Coordinate::new(Matrix::B, 0, 7, 2, 0)).unwrap();
        assert_eq!(loc, RegisterLocation::dword(0, 7 + 16 * 2));
    }

    #[test]
    fn test_32x32x8f16_acc_row_decomposition() {
        let d = desc(Architecture::Cdna2, "V_MFMA_F32_32X32X8F16");
        // i = 15 decomposes to GPR 3 + 4, lane group 1.
        let loc = locate(d, Coordinate::new(Matrix::D, 15, 8, 0, 0)).unwrap();
        assert_eq!(loc, RegisterLocation::dword(7, 40));
    }

    #[test]
    fn test_f64_pair_registers() {
        let d = desc(Architecture::Cdna2, "V_MFMA_F64_16X16X4F64");
        let loc = locate(d, Coordinate::new(Matrix::A, 3, 0, 2, 0)).unwrap();
        assert_eq!(loc, RegisterLocation::dword_pair(0, 3 + 16 * 2));
        let loc = locate(d, Coordinate::new(Matrix::D, 6, 1, 0, 0)).unwrap();
        assert_eq!(loc, RegisterLocation::dword_pair(4, 1 + 16));
        // Either register of the pair addresses the pair.
        let a = lookup(d, Matrix::D, 4, 17).unwrap();
        let b = lookup(d, Matrix::D, 5, 17).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_f64_4x4_blocks_fill_lane_groups() {
        let d = desc(Architecture::Cdna2, "V_MFMA_F64_4X4X4F64");
        // Blocks own contiguous 16-lane groups; k strides by 4 inside.
        let loc = locate(d, Coordinate::new(Matrix::A, 1, 0, 2, 3)).unwrap();
        assert_eq!(loc, RegisterLocation::dword_pair(0, 3 * 16 + 1 + 4 * 2));
        let loc = locate(d, Coordinate::new(Matrix::D, 2, 1, 0, 1)).unwrap();
        assert_eq!(loc, RegisterLocation::dword_pair(0, 16 + 1 + 4 * 2));
    }

    #[test]
    fn test_rdna3_input_duplication() {
        let d = desc(Architecture::Rdna3, "V_WMMA_F32_16X16X16_F16");
        let loc = locate(d, Coordinate::new(Matrix::A, 5, 0, 9, 0)).unwrap();
        assert_eq!(loc, RegisterLocation::sub(4, 5, 31, 16));
        // The mirrored half-wave resolves to the same element.
        let low = lookup(d, Matrix::A, 4, 5).unwrap();
        let high = lookup(d, Matrix::A, 4, 21).unwrap();
        assert_eq!(low, high);
    }

    #[test]
    fn test_rdna3_acc_half_wave_split() {
        let d = desc(Architecture::Rdna3, "V_WMMA_F32_16X16X16_F16");
        let loc = locate(d, Coordinate::new(Matrix::D, 9, 3, 0, 0)).unwrap();
        assert_eq!(loc, RegisterLocation::dword(4, 19));
    }

    #[test]
    fn test_rdna4_input_halves() {
        let d = desc(Architecture::Rdna4, "V_WMMA_F32_16X16X16_F16");
        let loc = locate(d, Coordinate::new(Matrix::A, 2, 0, 11, 0)).unwrap();
        // k=11: high half, k%8=3 -> GPR 1, bits [31:16].
        assert_eq!(loc, RegisterLocation::sub(1, 18, 31, 16));
    }

    #[test]
    fn test_rdna4_f16_acc_packs_two_rows() {
        let d = desc(Architecture::Rdna4, "V_WMMA_F16_16X16X16_F16");
        assert_eq!(d.gprs_cd, 4);
        let lo = locate(d, Coordinate::new(Matrix::D, 8, 0, 0, 0)).unwrap();
        let hi = locate(d, Coordinate::new(Matrix::D, 9, 0, 0, 0)).unwrap();
        assert_eq!(lo, RegisterLocation::sub(0, 16, 15, 0));
        assert_eq!(hi, RegisterLocation::sub(0, 16, 31, 16));
    }

    #[test]
    fn test_swmmac_index_nibbles() {
        // Row 2 splits its index across lanes 2 and 18; k=31 is the top
        // nibble of the second lane's 16-bit slot.
        let d = desc(Architecture::Rdna4, "V_SWMMAC_F32_16X16X32_F16");
        let loc = locate(d, Coordinate::new(Matrix::K, 2, 0, 31, 0)).unwrap();
        assert_eq!(loc, RegisterLocation::sub(0, 18, 15, 12));
        // All four source columns of the group share the nibble.
        let elems = lookup(d, Matrix::K, 0, 18).unwrap();
        let group7: Vec<_> = elems.iter().filter(|e| e.bit_lo == 12).collect();
        assert_eq!(group7.len(), 4);
        assert!(group7.iter().any(|e| e.coord.k == 31));
        // A 64-deep index fills the whole register instead.
        let d64 = desc(Architecture::Rdna4, "V_SWMMAC_I32_16X16X64_IU4");
        let loc = locate(d64, Coordinate::new(Matrix::K, 0, 0, 63, 0)).unwrap();
        assert_eq!(loc, RegisterLocation::sub(0, 16, 31, 28));
    }

    #[test]
    fn test_smfmac_index_slots() {
        let d = desc(Architecture::Cdna3, "V_SMFMAC_F32_16X16X32_F16");
        assert_eq!(smfmac_slot_bits(d), 8);
        let loc = locate(d, Coordinate::new(Matrix::K, 3, 0, 13, 0)).unwrap();
        // k=13: lane group 1, nibble (13%8)/4 = 1.
        assert_eq!(loc, RegisterLocation::sub(0, 3 + 16, 7, 4));
        let d8 = desc(Architecture::Cdna3, "V_SMFMAC_I32_16X16X64_I8");
        assert_eq!(smfmac_slot_bits(d8), 16);
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let d = desc(Architecture::Cdna2, "V_MFMA_F32_4X4X1F32");
        let err = locate(d, Coordinate::new(Matrix::A, 4, 0, 0, 0)).unwrap_err();
        assert!(matches!(
            err,
            CalcError::OutOfRangeCoordinate { axis: "I", .. }
        ));
        let err = locate(d, Coordinate::new(Matrix::A, 0, 0, 0, 16)).unwrap_err();
        assert!(matches!(
            err,
            CalcError::OutOfRangeCoordinate { axis: "block", .. }
        ));
        let err = lookup(d, Matrix::D, 4, 0).unwrap_err();
        assert!(matches!(
            err,
            CalcError::OutOfRangeCoordinate {
                axis: "register",
                ..
            }
        ));
        let err = lookup(d, Matrix::D, 0, 64).unwrap_err();
        assert!(matches!(
            err,
            CalcError::OutOfRangeCoordinate { axis: "lane", .. }
        ));
    }

    #[test]
    fn test_formula_text_mentions_real_coefficients() {
        let d = desc(Architecture::Cdna2, "V_MFMA_F32_4X4X4F16");
        let fwd = forward_formulas(d, Matrix::A).join("\n");
        assert!(fwd.contains("floor(k / 2)"));
        assert!(fwd.contains("4 * block + i"));
        let inv = inverse_formulas(d, Matrix::A).join("\n");
        assert!(inv.contains("lane % 4"));
    }
}
