//! Bit-level narrowing of `f32` values to half-width formats.
//!
//! Both functions return an `f32` holding exactly the value the narrower
//! type would store, so the result can be compared against the original.

use crate::models::Precision;

const F32_EXPONENT_BIAS: i32 = 127;
const F16_EXPONENT_BIAS: i32 = 15;
/// Mantissa bits dropped going from 23 to 10
const F16_MANTISSA_SHIFT: u32 = 13;

/// Narrow to IEEE binary16 by truncating the mantissa.
///
/// Values whose exponent does not fit a normal half (subnormals, overflow,
/// infinities, NaN and zero) come back as `0.0`.
pub fn simulate_fp16(value: f32) -> f32 {
    let bits = value.to_bits();
    let sign = bits >> 31;
    let exponent = ((bits >> 23) & 0xFF) as i32;
    let mantissa = bits & 0x7F_FFFF;

    let half_exponent = exponent - F32_EXPONENT_BIAS + F16_EXPONENT_BIAS;
    if half_exponent <= 0 || half_exponent >= 31 {
        return 0.0;
    }

    let half_mantissa = mantissa >> F16_MANTISSA_SHIFT;
    let expanded_exponent = (half_exponent - F16_EXPONENT_BIAS + F32_EXPONENT_BIAS) as u32;
    let expanded = (sign << 31) | (expanded_exponent << 23) | (half_mantissa << F16_MANTISSA_SHIFT);
    f32::from_bits(expanded)
}

/// Narrow to bfloat16 by dropping the low 16 bits.
pub fn simulate_bf16(value: f32) -> f32 {
    f32::from_bits(value.to_bits() & 0xFFFF_0000)
}

/// Narrow `value` to `precision`.
pub fn narrow(value: f32, precision: Precision) -> f32 {
    match precision {
        Precision::Fp16 => simulate_fp16(value),
        Precision::Bf16 => simulate_bf16(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bf16_truncates_low_bits() {
        assert_eq!(simulate_bf16(3.1415926), 3.140625);
        assert_eq!(simulate_bf16(2.7182818), 2.703125);
        assert_eq!(simulate_bf16(1.4142135), 1.4140625);
        assert_eq!(simulate_bf16(1.0), 1.0);
        assert_eq!(simulate_bf16(-1.5), -1.5);
        assert_eq!(simulate_bf16(3.1415926).to_bits() & 0xFFFF, 0);
    }

    #[test]
    fn test_fp16_keeps_ten_mantissa_bits() {
        assert_eq!(simulate_fp16(3.1415926), 3.140625);
        assert_eq!(simulate_fp16(1.0), 1.0);
        assert_eq!(simulate_fp16(0.5), 0.5);
        assert_eq!(simulate_fp16(-2.0), -2.0);
        assert_eq!(simulate_fp16(65504.0), 65504.0);
        assert_eq!(simulate_fp16(3.1415926).to_bits() & 0x1FFF, 0);
    }

    #[test]
    fn test_fp16_out_of_range_becomes_zero() {
        assert_eq!(simulate_fp16(70000.0), 0.0);
        assert_eq!(simulate_fp16(1.0e-5), 0.0);
        assert_eq!(simulate_fp16(-1.0e-6), 0.0);
        assert_eq!(simulate_fp16(f32::INFINITY), 0.0);
        assert_eq!(simulate_fp16(0.0), 0.0);
    }

    #[test]
    fn test_narrow_dispatches_on_precision() {
        assert_eq!(narrow(2.7182818, Precision::Bf16), 2.703125);
        assert_eq!(narrow(2.7182818, Precision::Fp16), 2.716796875);
    }
}
