//! RDNA generation 4 (gfx12xx) instruction table.
//!
//! Wave32 WMMA without input replication, FP8/BF8 source types, a
//! 32-deep INT4 shape, and the SWMMAC 4:2-structured-sparse family
//! whose index set is selected with OPSEL.

use super::{rdna4_swmmac, rdna4_wmma, InstructionDescriptor};
use crate::types::DataType::{Bf16, Bf8, Fp16, Fp32, Fp8, Int32, Int4, Int8};

/// Instructions in catalog order.
pub fn instructions() -> Vec<InstructionDescriptor> {
    vec![
        rdna4_wmma("V_WMMA_F32_16X16X16_F16", 0x40, 16, Fp16, Fp16, Fp32),
        rdna4_wmma("V_WMMA_F32_16X16X16_BF16", 0x41, 16, Bf16, Bf16, Fp32),
        rdna4_wmma("V_WMMA_F16_16X16X16_F16", 0x42, 16, Fp16, Fp16, Fp16),
        rdna4_wmma("V_WMMA_BF16_16X16X16_BF16", 0x43, 16, Bf16, Bf16, Bf16),
        rdna4_wmma("V_WMMA_I32_16X16X16_IU8", 0x44, 16, Int8, Int8, Int32),
        rdna4_wmma("V_WMMA_I32_16X16X16_IU4", 0x45, 16, Int4, Int4, Int32),
        rdna4_wmma("V_WMMA_F32_16X16X16_FP8_FP8", 0x46, 16, Fp8, Fp8, Fp32),
        rdna4_wmma("V_WMMA_F32_16X16X16_FP8_BF8", 0x47, 16, Fp8, Bf8, Fp32),
        rdna4_wmma("V_WMMA_F32_16X16X16_BF8_FP8", 0x48, 16, Bf8, Fp8, Fp32),
        rdna4_wmma("V_WMMA_F32_16X16X16_BF8_BF8", 0x49, 16, Bf8, Bf8, Fp32),
        rdna4_wmma("V_WMMA_I32_16X16X32_IU4", 0x4A, 32, Int4, Int4, Int32),
        rdna4_swmmac("V_SWMMAC_F32_16X16X32_F16", 0x50, 32, Fp16, Fp16, Fp32),
        rdna4_swmmac("V_SWMMAC_F32_16X16X32_BF16", 0x51, 32, Bf16, Bf16, Fp32),
        rdna4_swmmac("V_SWMMAC_F16_16X16X32_F16", 0x52, 32, Fp16, Fp16, Fp16),
        rdna4_swmmac("V_SWMMAC_BF16_16X16X32_BF16", 0x53, 32, Bf16, Bf16, Bf16),
        rdna4_swmmac("V_SWMMAC_I32_16X16X32_IU8", 0x54, 32, Int8, Int8, Int32),
        rdna4_swmmac("V_SWMMAC_I32_16X16X64_IU4", 0x55, 64, Int4, Int4, Int32),
        rdna4_swmmac("V_SWMMAC_F32_16X16X32_FP8_FP8", 0x56, 32, Fp8, Fp8, Fp32),
        rdna4_swmmac("V_SWMMAC_F32_16X16X32_FP8_BF8", 0x57, 32, Fp8, Bf8, Fp32),
        rdna4_swmmac("V_SWMMAC_F32_16X16X32_BF8_FP8", 0x58, 32, Bf8, Fp8, Fp32),
        rdna4_swmmac("V_SWMMAC_F32_16X16X32_BF8_BF8", 0x59, 32, Bf8, Bf8, Fp32),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModifierSet;

    #[test]
    fn test_dense_has_no_opsel() {
        for d in instructions().iter().filter(|d| !d.sparse) {
            assert!(!d.supports(ModifierSet::OPSEL), "{}", d.mnemonic);
        }
    }

    #[test]
    fn test_sparse_opsel_needs_half_filled_index() {
        let table = instructions();
        let f16 = table
            .iter()
            .find(|d| d.mnemonic == "V_SWMMAC_F32_16X16X32_F16")
            .unwrap();
        assert!(f16.supports(ModifierSet::OPSEL));
        let iu4 = table
            .iter()
            .find(|d| d.mnemonic == "V_SWMMAC_I32_16X16X64_IU4")
            .unwrap();
        assert!(!iu4.supports(ModifierSet::OPSEL));
    }

    #[test]
    fn test_fp8_takes_no_sign_modifiers() {
        let table = instructions();
        let fp8 = table
            .iter()
            .find(|d| d.mnemonic == "V_WMMA_F32_16X16X16_FP8_FP8")
            .unwrap();
        assert!(!fp8.supports(ModifierSet::NEG));
        assert!(!fp8.supports(ModifierSet::NEG_HI));
    }

    #[test]
    fn test_packed_16bit_outputs() {
        let table = instructions();
        let f16out = table
            .iter()
            .find(|d| d.mnemonic == "V_WMMA_F16_16X16X16_F16")
            .unwrap();
        assert_eq!(f16out.gprs_cd, 4);
    }
}
