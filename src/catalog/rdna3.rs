//! RDNA generation 3 (gfx11xx) instruction table.
//!
//! Wave32 WMMA: 16x16x16 shapes only, inputs replicated across the two
//! half-waves, 16-bit results half-register wide with OPSEL selecting
//! the half.

use super::{rdna3_wmma, InstructionDescriptor};
use crate::types::DataType::{Bf16, Fp16, Fp32, Int32, Int4, Int8};

/// Instructions in catalog order.
pub fn instructions() -> Vec<InstructionDescriptor> {
    vec![
        rdna3_wmma("V_WMMA_F32_16X16X16_F16", 0x40, Fp16, Fp16, Fp32),
        rdna3_wmma("V_WMMA_F32_16X16X16_BF16", 0x41, Bf16, Bf16, Fp32),
        rdna3_wmma("V_WMMA_F16_16X16X16_F16", 0x42, Fp16, Fp16, Fp16),
        rdna3_wmma("V_WMMA_BF16_16X16X16_BF16", 0x43, Bf16, Bf16, Bf16),
        rdna3_wmma("V_WMMA_I32_16X16X16_IU8", 0x44, Int8, Int8, Int32),
        rdna3_wmma("V_WMMA_I32_16X16X16_IU4", 0x45, Int4, Int4, Int32),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModifierSet;

    #[test]
    fn test_opsel_only_on_16bit_outputs() {
        for d in instructions() {
            assert_eq!(d.supports(ModifierSet::OPSEL), d.cd_type.bits() == 16);
        }
    }

    #[test]
    fn test_duplicated_input_gprs() {
        let table = instructions();
        assert_eq!(table[0].gprs_a, 8);
        let iu4 = table.last().unwrap();
        assert_eq!(iu4.gprs_a, 2);
        assert_eq!(iu4.gprs_cd, 8);
    }

    #[test]
    fn test_integer_neg_is_signedness_only() {
        let iu8 = &instructions()[4];
        assert!(iu8.supports(ModifierSet::NEG));
        assert!(!iu8.supports(ModifierSet::NEG_HI));
    }
}
