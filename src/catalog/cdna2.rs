//! CDNA generation 2 (gfx90a) instruction table.
//!
//! Extends gfx908 with the full-rate BF16 "1K" variants and FP64 MFMA,
//! lifts the AccVGPR-only restriction on C/D, and tightens operand
//! alignment to 64 bits.

use super::{cdna_dense, InstructionDescriptor};
use crate::types::Architecture::Cdna2;
use crate::types::DataType::{Bf16, Fp16, Fp32, Fp64, Int32, Int8};

/// Instructions in catalog order.
pub fn instructions() -> Vec<InstructionDescriptor> {
    vec![
        cdna_dense(Cdna2, "V_MFMA_F32_32X32X1F32", 0x00, 32, 32, 1, 2, 64, Fp32, Fp32, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_16X16X1F32", 0x01, 16, 16, 1, 4, 32, Fp32, Fp32, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_4X4X1F32", 0x02, 4, 4, 1, 16, 8, Fp32, Fp32, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_32X32X2F32", 0x04, 32, 32, 2, 1, 64, Fp32, Fp32, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_16X16X4F32", 0x05, 16, 16, 4, 1, 32, Fp32, Fp32, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_32X32X4F16", 0x08, 32, 32, 4, 2, 64, Fp16, Fp16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_16X16X4F16", 0x09, 16, 16, 4, 4, 32, Fp16, Fp16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_4X4X4F16", 0x0A, 4, 4, 4, 16, 8, Fp16, Fp16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_32X32X8F16", 0x0C, 32, 32, 8, 1, 64, Fp16, Fp16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_16X16X16F16", 0x0D, 16, 16, 16, 1, 32, Fp16, Fp16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_I32_32X32X4I8", 0x10, 32, 32, 4, 2, 64, Int8, Int8, Int32),
        cdna_dense(Cdna2, "V_MFMA_I32_16X16X4I8", 0x11, 16, 16, 4, 4, 32, Int8, Int8, Int32),
        cdna_dense(Cdna2, "V_MFMA_I32_4X4X4I8", 0x12, 4, 4, 4, 16, 8, Int8, Int8, Int32),
        cdna_dense(Cdna2, "V_MFMA_I32_32X32X8I8", 0x14, 32, 32, 8, 1, 64, Int8, Int8, Int32),
        cdna_dense(Cdna2, "V_MFMA_I32_16X16X16I8", 0x15, 16, 16, 16, 1, 32, Int8, Int8, Int32),
        cdna_dense(Cdna2, "V_MFMA_F32_32X32X4BF16_1K", 0x23, 32, 32, 4, 2, 64, Bf16, Bf16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_16X16X4BF16_1K", 0x24, 16, 16, 4, 4, 32, Bf16, Bf16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_4X4X4BF16_1K", 0x25, 4, 4, 4, 16, 8, Bf16, Bf16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_32X32X8BF16_1K", 0x26, 32, 32, 8, 1, 64, Bf16, Bf16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_16X16X16BF16_1K", 0x27, 16, 16, 16, 1, 32, Bf16, Bf16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_32X32X2BF16", 0x28, 32, 32, 2, 2, 64, Bf16, Bf16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_16X16X2BF16", 0x29, 16, 16, 2, 4, 32, Bf16, Bf16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_4X4X2BF16", 0x2A, 4, 4, 2, 16, 8, Bf16, Bf16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_32X32X4BF16", 0x2C, 32, 32, 4, 1, 64, Bf16, Bf16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F32_16X16X8BF16", 0x2D, 16, 16, 8, 1, 32, Bf16, Bf16, Fp32),
        cdna_dense(Cdna2, "V_MFMA_F64_16X16X4F64", 0x2E, 16, 16, 4, 1, 32, Fp64, Fp64, Fp64),
        cdna_dense(Cdna2, "V_MFMA_F64_4X4X4F64", 0x2F, 4, 4, 4, 4, 16, Fp64, Fp64, Fp64),
    ]
}
