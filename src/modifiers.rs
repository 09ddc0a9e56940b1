//! Modifier engine.
//!
//! Every modifier composes with the base mapping as either a pre-map
//! rewrite of the caller's (block, lane) or a post-map annotation on
//! the result (sign, bit range); modifier logic never touches the base
//! mapping arithmetic. Validation runs structural legality (is the
//! field accepted at all) before range legality (is the value inside
//! the instruction-specific set).

use crate::catalog::{AbidMode, BlgpMode, InstructionDescriptor};
use crate::error::{CalcError, Result};
use crate::mapping;
use crate::types::{Matrix, ModifierSet, Modifiers, RegisterLocation, Sign};

fn out_of_range(
    desc: &InstructionDescriptor,
    modifier: &'static str,
    value: u32,
    legal: impl Into<String>,
) -> CalcError {
    CalcError::ModifierOutOfRange {
        modifier,
        value,
        legal: legal.into(),
        mnemonic: desc.mnemonic.to_string(),
    }
}

/// Validate a modifier set against an instruction.
pub fn validate(desc: &InstructionDescriptor, mods: &Modifiers) -> Result<()> {
    let fields: [(&'static str, u32, ModifierSet); 6] = [
        ("CBSZ", mods.cbsz, ModifierSet::CBSZ),
        ("ABID", mods.abid, ModifierSet::ABID),
        ("BLGP", mods.blgp, ModifierSet::BLGP),
        ("OPSEL", mods.opsel, ModifierSet::OPSEL),
        ("NEG", mods.neg, ModifierSet::NEG),
        ("NEG_HI", mods.neg_hi, ModifierSet::NEG_HI),
    ];
    // Structural legality first: a non-default value on an unsupported
    // field is rejected before any range reasoning.
    for (name, value, flag) in fields {
        if value != 0 && !desc.supports(flag) {
            return Err(CalcError::UnsupportedModifier {
                modifier: name,
                mnemonic: desc.mnemonic.to_string(),
            });
        }
    }

    match desc.modifiers.abid_mode {
        Some(AbidMode::Broadcast) => {
            let max_cbsz = desc.blocks.trailing_zeros();
            if mods.cbsz > max_cbsz {
                return Err(out_of_range(
                    desc,
                    "CBSZ",
                    mods.cbsz,
                    format!("[0, {}]", max_cbsz),
                ));
            }
            let max_abid = (1 << mods.cbsz) - 1;
            if mods.abid > max_abid {
                return Err(out_of_range(
                    desc,
                    "ABID",
                    mods.abid,
                    format!("[0, {}] with CBSZ={}", max_abid, mods.cbsz),
                ));
            }
        }
        Some(AbidMode::SparseSlot) => {
            if mods.cbsz > 3 {
                return Err(out_of_range(desc, "CBSZ", mods.cbsz, "[0, 3]"));
            }
            let max_abid = 32 / mapping::smfmac_slot_bits(desc) - 1;
            if mods.abid > max_abid {
                return Err(out_of_range(
                    desc,
                    "ABID",
                    mods.abid,
                    format!("[0, {}]", max_abid),
                ));
            }
        }
        None => {}
    }

    if desc.supports(ModifierSet::BLGP) && mods.blgp > 7 {
        return Err(out_of_range(desc, "BLGP", mods.blgp, "[0, 7]"));
    }

    if desc.supports(ModifierSet::OPSEL) {
        let sparse_select = desc.sparse;
        if sparse_select {
            if mods.opsel > 1 {
                return Err(out_of_range(desc, "OPSEL", mods.opsel, "[0, 1]"));
            }
        } else if mods.opsel != 0 && mods.opsel != 4 {
            return Err(out_of_range(desc, "OPSEL", mods.opsel, "{0, 4}"));
        }
    }

    if desc.supports(ModifierSet::NEG) && mods.neg > 7 {
        return Err(out_of_range(desc, "NEG", mods.neg, "[0, 7]"));
    }
    if desc.supports(ModifierSet::NEG_HI) && mods.neg_hi > 7 {
        return Err(out_of_range(desc, "NEG_HI", mods.neg_hi, "[0, 7]"));
    }

    Ok(())
}

/// Dense CBSZ/ABID block remap for the A matrix.
///
/// The broadcast substitutes the low CBSZ bits of the requested block
/// with ABID, so several blocks read the same source block.
pub fn effective_block(desc: &InstructionDescriptor, mods: &Modifiers, matrix: Matrix, block: u32) -> u32 {
    if matrix == Matrix::A
        && desc.modifiers.abid_mode == Some(AbidMode::Broadcast)
        && mods.cbsz > 0
    {
        let mask = (1 << mods.cbsz) - 1;
        (block & !mask) | (mods.abid & mask)
    } else {
        block
    }
}

/// Register lane feeding a given matrix-side lane under a BLGP swizzle.
///
/// BLGP describes the lane permutation `output = P(input)`; this is the
/// inverse direction, total even for the broadcast patterns.
pub fn blgp_source_lane(wave: u32, blgp: u32, lane: u32) -> u32 {
    let half = wave / 2;
    let quarter = wave / 4;
    match blgp {
        0 => lane,
        // Lanes [0, W/2) broadcast over the upper half.
        1 => lane % half,
        // Lanes [W/2, W) broadcast over the lower half.
        2 => half + lane % half,
        // Rotation: output_lane = (input_lane + W/4) mod W.
        3 => (lane + wave - quarter) % wave,
        // One quarter-group broadcast everywhere.
        q => (q - 4) * quarter + lane % quarter,
    }
}

/// Whether a BLGP swizzle applies to this query.
pub fn blgp_swizzles(desc: &InstructionDescriptor, mods: &Modifiers, matrix: Matrix) -> bool {
    matrix == Matrix::B
        && mods.blgp != 0
        && desc.modifiers.blgp_mode == Some(BlgpMode::Swizzle)
}

/// Sign annotation for a located element.
///
/// `bit_lo` distinguishes the low and high 16-bit halves for the RDNA
/// NEG/NEG_HI masks.
pub fn sign_for(
    desc: &InstructionDescriptor,
    mods: &Modifiers,
    matrix: Matrix,
    bit_lo: u8,
) -> Sign {
    if desc.modifiers.blgp_mode == Some(BlgpMode::F64Negate) && mods.blgp != 0 {
        let bit = match matrix {
            Matrix::A => 0,
            Matrix::B => 1,
            Matrix::C => 2,
            _ => return Sign::Positive,
        };
        return if (mods.blgp >> bit) & 1 == 1 {
            Sign::Negated
        } else {
            Sign::Positive
        };
    }

    // RDNA sign masks; on integer instructions NEG selects signedness
    // and never rewrites the value.
    if !desc.supports(ModifierSet::NEG) || !desc.a_type.is_float() {
        return Sign::Positive;
    }
    match matrix {
        Matrix::A | Matrix::B => {
            let op_bit = if matrix == Matrix::A { 0 } else { 1 };
            let mask = if bit_lo >= 16 { mods.neg_hi } else { mods.neg };
            if (mask >> op_bit) & 1 == 1 {
                Sign::Negated
            } else {
                Sign::Positive
            }
        }
        Matrix::C => {
            let negate = (mods.neg >> 2) & 1 == 1;
            let absolute = (mods.neg_hi >> 2) & 1 == 1;
            match (negate, absolute) {
                (false, false) => Sign::Positive,
                (true, false) => Sign::Negated,
                (false, true) => Sign::Absolute,
                // Absolute value first, then negation.
                (true, true) => Sign::NegatedAbsolute,
            }
        }
        _ => Sign::Positive,
    }
}

/// Post-map bit-range rewrites: RDNA3 OPSEL half select and sparse
/// index slot selection.
pub fn rewrite_bits(
    desc: &InstructionDescriptor,
    mods: &Modifiers,
    matrix: Matrix,
    loc: &mut RegisterLocation,
) {
    match matrix {
        Matrix::C | Matrix::D => {
            // RDNA3 16-bit results live in the OPSEL-selected half.
            if !desc.sparse && desc.supports(ModifierSet::OPSEL) && mods.opsel == 4 {
                loc.bit_lo += 16;
                loc.bit_hi += 16;
            }
        }
        Matrix::K => {
            let shift = index_slot_shift(desc, mods);
            loc.bit_lo += shift;
            loc.bit_hi += shift;
        }
        _ => {}
    }
}

/// Bit offset of the selected compression-index slot.
pub fn index_slot_shift(desc: &InstructionDescriptor, mods: &Modifiers) -> u8 {
    if desc.modifiers.abid_mode == Some(AbidMode::SparseSlot) {
        // CBSZ != 0 forces slot 0 and ignores ABID.
        let slot = if mods.cbsz != 0 { 0 } else { mods.abid };
        (mapping::smfmac_slot_bits(desc) * slot) as u8
    } else if desc.supports(ModifierSet::OPSEL) {
        (16 * mods.opsel) as u8
    } else {
        0
    }
}

/// Non-fatal notes for modifiers that are accepted but cannot affect
/// the queried matrix.
pub fn no_effect_warnings(
    desc: &InstructionDescriptor,
    mods: &Modifiers,
    matrix: Matrix,
) -> Vec<String> {
    let mut warnings = Vec::new();
    let broadcast_target = if desc.sparse { Matrix::K } else { Matrix::A };
    if (mods.cbsz != 0 || mods.abid != 0)
        && desc.modifiers.abid_mode.is_some()
        && matrix != broadcast_target
    {
        warnings.push(format!(
            "CBSZ/ABID only affect the {} matrix; ignored for {}",
            broadcast_target, matrix
        ));
    }
    if mods.blgp != 0 {
        match desc.modifiers.blgp_mode {
            Some(BlgpMode::Swizzle) if matrix != Matrix::B => {
                warnings.push(format!(
                    "BLGP only affects the B matrix; ignored for {}",
                    matrix
                ));
            }
            Some(BlgpMode::F64Negate) if matrix == Matrix::D => {
                warnings.push("BLGP negates A, B, and C; ignored for D".to_string());
            }
            _ => {}
        }
    }
    if mods.opsel != 0 && desc.supports(ModifierSet::OPSEL) {
        let affected = if desc.sparse {
            matrix == Matrix::K
        } else {
            matrix == Matrix::C || matrix == Matrix::D
        };
        if !affected {
            warnings.push(format!("OPSEL has no effect on the {} matrix", matrix));
        }
    }
    if (mods.neg != 0 || mods.neg_hi != 0) && desc.supports(ModifierSet::NEG) {
        if !desc.a_type.is_float() {
            warnings.push(
                "NEG selects signed/unsigned operands on integer instructions; the mapping is unchanged"
                    .to_string(),
            );
        } else if matrix == Matrix::D || matrix == Matrix::K {
            warnings.push(format!("NEG/NEG_HI have no effect on the {} matrix", matrix));
        }
    }
    warnings
}
