//! CDNA generation 1 (gfx908) instruction table.
//!
//! The first MFMA-capable generation: FP32, FP16, BF16, and INT8 dense
//! instructions only. A and B must live in ArchVGPRs, C and D in
//! AccVGPRs.

use super::{cdna_dense, InstructionDescriptor};
use crate::types::Architecture::Cdna1;
use crate::types::DataType::{Bf16, Fp16, Fp32, Int32, Int8};

/// Instructions in catalog order.
pub fn instructions() -> Vec<InstructionDescriptor> {
    vec![
        cdna_dense(Cdna1, "V_MFMA_F32_32X32X1F32", 0x00, 32, 32, 1, 2, 64, Fp32, Fp32, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_16X16X1F32", 0x01, 16, 16, 1, 4, 32, Fp32, Fp32, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_4X4X1F32", 0x02, 4, 4, 1, 16, 8, Fp32, Fp32, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_32X32X2F32", 0x04, 32, 32, 2, 1, 64, Fp32, Fp32, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_16X16X4F32", 0x05, 16, 16, 4, 1, 32, Fp32, Fp32, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_32X32X4F16", 0x08, 32, 32, 4, 2, 64, Fp16, Fp16, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_16X16X4F16", 0x09, 16, 16, 4, 4, 32, Fp16, Fp16, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_4X4X4F16", 0x0A, 4, 4, 4, 16, 8, Fp16, Fp16, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_32X32X8F16", 0x0C, 32, 32, 8, 1, 64, Fp16, Fp16, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_16X16X16F16", 0x0D, 16, 16, 16, 1, 32, Fp16, Fp16, Fp32),
        cdna_dense(Cdna1, "V_MFMA_I32_32X32X4I8", 0x10, 32, 32, 4, 2, 64, Int8, Int8, Int32),
        cdna_dense(Cdna1, "V_MFMA_I32_16X16X4I8", 0x11, 16, 16, 4, 4, 32, Int8, Int8, Int32),
        cdna_dense(Cdna1, "V_MFMA_I32_4X4X4I8", 0x12, 4, 4, 4, 16, 8, Int8, Int8, Int32),
        cdna_dense(Cdna1, "V_MFMA_I32_32X32X8I8", 0x14, 32, 32, 8, 1, 64, Int8, Int8, Int32),
        cdna_dense(Cdna1, "V_MFMA_I32_16X16X16I8", 0x15, 16, 16, 16, 1, 32, Int8, Int8, Int32),
        cdna_dense(Cdna1, "V_MFMA_F32_32X32X2BF16", 0x28, 32, 32, 2, 2, 64, Bf16, Bf16, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_16X16X2BF16", 0x29, 16, 16, 2, 4, 32, Bf16, Bf16, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_4X4X2BF16", 0x2A, 4, 4, 2, 16, 8, Bf16, Bf16, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_32X32X4BF16", 0x2C, 32, 32, 4, 1, 64, Bf16, Bf16, Fp32),
        cdna_dense(Cdna1, "V_MFMA_F32_16X16X8BF16", 0x2D, 16, 16, 8, 1, 32, Bf16, Bf16, Fp32),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_order() {
        let table = instructions();
        assert_eq!(table.len(), 20);
        assert_eq!(table[0].mnemonic, "V_MFMA_F32_32X32X1F32");
    }

    #[test]
    fn test_gfx908_register_files() {
        use crate::types::RegFileSet;
        for d in instructions() {
            assert_eq!(d.reg_files.a, RegFileSet::ARCH);
            assert_eq!(d.reg_files.cd, RegFileSet::ACC);
            assert_eq!(d.align_bytes, 4);
            assert!(!d.coexec);
        }
    }
}
