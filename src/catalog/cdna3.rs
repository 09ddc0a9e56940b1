//! CDNA generation 3 (gfx940-942) instruction table.
//!
//! Renames the blocked shapes with _2B/_4B/_16B suffixes, doubles the
//! 16-bit and 8-bit dense rates, and adds XF32, FP8/BF8, and the
//! 4:2-structured-sparse SMFMAC family. FP64 reinterprets BLGP as a
//! 3-bit negate mask.

use super::{cdna_dense, cdna_smfmac, InstructionDescriptor};
use crate::types::Architecture::Cdna3;
use crate::types::DataType::{Bf16, Bf8, Fp16, Fp32, Fp64, Fp8, Int32, Int8, Xf32};

/// Instructions in catalog order.
pub fn instructions() -> Vec<InstructionDescriptor> {
    vec![
        cdna_dense(Cdna3, "V_MFMA_F32_32X32X1_2B_F32", 0x00, 32, 32, 1, 2, 64, Fp32, Fp32, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_16X16X1_4B_F32", 0x01, 16, 16, 1, 4, 32, Fp32, Fp32, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_4X4X1_16B_F32", 0x02, 4, 4, 1, 16, 8, Fp32, Fp32, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_32X32X2_F32", 0x04, 32, 32, 2, 1, 64, Fp32, Fp32, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_16X16X4_F32", 0x05, 16, 16, 4, 1, 32, Fp32, Fp32, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_32X32X4_2B_F16", 0x08, 32, 32, 4, 2, 32, Fp16, Fp16, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_16X16X4_4B_F16", 0x09, 16, 16, 4, 4, 16, Fp16, Fp16, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_4X4X4_16B_F16", 0x0A, 4, 4, 4, 16, 8, Fp16, Fp16, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_32X32X8_F16", 0x0C, 32, 32, 8, 1, 32, Fp16, Fp16, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_16X16X16_F16", 0x0D, 16, 16, 16, 1, 16, Fp16, Fp16, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_32X32X4_2B_BF16", 0x10, 32, 32, 4, 2, 32, Bf16, Bf16, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_16X16X4_4B_BF16", 0x11, 16, 16, 4, 4, 16, Bf16, Bf16, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_4X4X4_16B_BF16", 0x12, 4, 4, 4, 16, 8, Bf16, Bf16, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_32X32X8_BF16", 0x14, 32, 32, 8, 1, 32, Bf16, Bf16, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_16X16X16_BF16", 0x15, 16, 16, 16, 1, 16, Bf16, Bf16, Fp32),
        cdna_dense(Cdna3, "V_MFMA_I32_32X32X4_2B_I8", 0x16, 32, 32, 4, 2, 32, Int8, Int8, Int32),
        cdna_dense(Cdna3, "V_MFMA_I32_16X16X4_4B_I8", 0x17, 16, 16, 4, 4, 16, Int8, Int8, Int32),
        cdna_dense(Cdna3, "V_MFMA_I32_4X4X4_16B_I8", 0x18, 4, 4, 4, 16, 8, Int8, Int8, Int32),
        cdna_dense(Cdna3, "V_MFMA_I32_32X32X16_I8", 0x1A, 32, 32, 16, 1, 32, Int8, Int8, Int32),
        cdna_dense(Cdna3, "V_MFMA_I32_16X16X32_I8", 0x1B, 16, 16, 32, 1, 16, Int8, Int8, Int32),
        cdna_dense(Cdna3, "V_MFMA_F32_16X16X32_BF8_BF8", 0x1C, 16, 16, 32, 1, 16, Bf8, Bf8, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_16X16X32_BF8_FP8", 0x1D, 16, 16, 32, 1, 16, Bf8, Fp8, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_16X16X32_FP8_BF8", 0x1E, 16, 16, 32, 1, 16, Fp8, Bf8, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_16X16X32_FP8_FP8", 0x1F, 16, 16, 32, 1, 16, Fp8, Fp8, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_32X32X16_BF8_BF8", 0x20, 32, 32, 16, 1, 32, Bf8, Bf8, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_32X32X16_BF8_FP8", 0x21, 32, 32, 16, 1, 32, Bf8, Fp8, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_32X32X16_FP8_BF8", 0x22, 32, 32, 16, 1, 32, Fp8, Bf8, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_32X32X16_FP8_FP8", 0x23, 32, 32, 16, 1, 32, Fp8, Fp8, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_16X16X8_XF32", 0x26, 16, 16, 8, 1, 16, Xf32, Xf32, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F32_32X32X4_XF32", 0x27, 32, 32, 4, 1, 32, Xf32, Xf32, Fp32),
        cdna_dense(Cdna3, "V_MFMA_F64_16X16X4_F64", 0x2E, 16, 16, 4, 1, 32, Fp64, Fp64, Fp64),
        cdna_dense(Cdna3, "V_MFMA_F64_4X4X4_4B_F64", 0x2F, 4, 4, 4, 4, 16, Fp64, Fp64, Fp64),
        cdna_smfmac("V_SMFMAC_F32_16X16X32_F16", 0x30, 16, 16, 32, 16, Fp16, Fp16, Fp32),
        cdna_smfmac("V_SMFMAC_F32_32X32X16_F16", 0x31, 32, 32, 16, 32, Fp16, Fp16, Fp32),
        cdna_smfmac("V_SMFMAC_F32_16X16X32_BF16", 0x32, 16, 16, 32, 16, Bf16, Bf16, Fp32),
        cdna_smfmac("V_SMFMAC_F32_32X32X16_BF16", 0x33, 32, 32, 16, 32, Bf16, Bf16, Fp32),
        cdna_smfmac("V_SMFMAC_I32_16X16X64_I8", 0x34, 16, 16, 64, 16, Int8, Int8, Int32),
        cdna_smfmac("V_SMFMAC_I32_32X32X32_I8", 0x35, 32, 32, 32, 32, Int8, Int8, Int32),
        cdna_smfmac("V_SMFMAC_F32_16X16X64_BF8_BF8", 0x36, 16, 16, 64, 16, Bf8, Bf8, Fp32),
        cdna_smfmac("V_SMFMAC_F32_16X16X64_BF8_FP8", 0x37, 16, 16, 64, 16, Bf8, Fp8, Fp32),
        cdna_smfmac("V_SMFMAC_F32_16X16X64_FP8_BF8", 0x38, 16, 16, 64, 16, Fp8, Bf8, Fp32),
        cdna_smfmac("V_SMFMAC_F32_16X16X64_FP8_FP8", 0x39, 16, 16, 64, 16, Fp8, Fp8, Fp32),
        cdna_smfmac("V_SMFMAC_F32_32X32X32_BF8_BF8", 0x3A, 32, 32, 32, 32, Bf8, Bf8, Fp32),
        cdna_smfmac("V_SMFMAC_F32_32X32X32_BF8_FP8", 0x3B, 32, 32, 32, 32, Bf8, Fp8, Fp32),
        cdna_smfmac("V_SMFMAC_F32_32X32X32_FP8_BF8", 0x3C, 32, 32, 32, 32, Fp8, Bf8, Fp32),
        cdna_smfmac("V_SMFMAC_F32_32X32X32_FP8_FP8", 0x3D, 32, 32, 32, 32, Fp8, Fp8, Fp32),
    ]
}

#[cfg(test)]
mod tests {
    use super::super::BlgpMode;
    use super::*;
    use crate::types::ModifierSet;

    #[test]
    fn test_sparse_family_present() {
        let sparse = instructions().iter().filter(|d| d.sparse).count();
        assert_eq!(sparse, 14);
    }

    #[test]
    fn test_blgp_modes_by_type() {
        let table = instructions();
        let by_name = |n: &str| table.iter().find(|d| d.mnemonic == n).unwrap().clone();
        assert_eq!(
            by_name("V_MFMA_F64_16X16X4_F64").modifiers.blgp_mode,
            Some(BlgpMode::F64Negate)
        );
        assert_eq!(
            by_name("V_MFMA_F32_16X16X16_F16").modifiers.blgp_mode,
            Some(BlgpMode::Swizzle)
        );
        // FP32, XF32, and FP8 inputs take no BLGP at all.
        assert!(!by_name("V_MFMA_F32_16X16X4_F32").supports(ModifierSet::BLGP));
        assert!(!by_name("V_MFMA_F32_16X16X32_FP8_FP8").supports(ModifierSet::BLGP));
    }

    #[test]
    fn test_doubled_rates() {
        let table = instructions();
        let f16 = table
            .iter()
            .find(|d| d.mnemonic == "V_MFMA_F32_16X16X16_F16")
            .unwrap();
        assert_eq!(f16.cycles, 16);
        assert_eq!(f16.flops_per_cu_cycle(), 2048);
    }
}
