use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, Zero};
use tracing::warn;

use crate::error::{DecodeError, RangeError};

pub const DEFAULT_BOUND_BITS: u32 = 256;
pub const MIN_RADIX: u32 = 2;
pub const MAX_RADIX: u32 = 36;

/// Accepts integers in `(0, 2^bits - 1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeValidator {
    bits: u32,
    max: BigInt,
}

impl RangeValidator {
    pub fn new(bits: u32) -> Self {
        let max = (BigInt::one() << bits) - BigInt::one();
        RangeValidator { bits, max }
    }

    pub fn max(&self) -> &BigInt {
        &self.max
    }

    pub fn validate(&self, value: &BigInt) -> Result<(), RangeError> {
        if !value.is_positive() {
            return Err(RangeError::NonPositive(value.clone()));
        }
        if value > &self.max {
            return Err(RangeError::ExceedsBound { bits: self.bits });
        }
        Ok(())
    }
}

impl Default for RangeValidator {
    fn default() -> Self {
        RangeValidator::new(DEFAULT_BOUND_BITS)
    }
}

/// Decodes base-encoded share values into range-checked big integers.
#[derive(Clone, Debug, Default)]
pub struct ValueDecoder {
    validator: RangeValidator,
}

impl ValueDecoder {
    pub fn new(validator: RangeValidator) -> Self {
        ValueDecoder { validator }
    }

    pub fn decode(&self, base: u32, value: &str) -> Result<BigInt, DecodeError> {
        let decoded = parse_leading_digits(base, value)?;
        self.validator
            .validate(&decoded)
            .map_err(|reason| DecodeError::OutOfRange {
                base,
                value: value.to_string(),
                reason,
            })?;
        Ok(decoded)
    }
}

/// Parses the leading run of radix digits in `value`, after optional
/// whitespace and sign. Anything following the run is dropped.
pub fn parse_leading_digits(base: u32, value: &str) -> Result<BigInt, DecodeError> {
    if !(MIN_RADIX..=MAX_RADIX).contains(&base) {
        return Err(DecodeError::UnsupportedBase {
            base,
            value: value.to_string(),
        });
    }

    let trimmed = value.trim_start();
    let (sign, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (Sign::Minus, &trimmed[1..]),
        Some(b'+') => (Sign::Plus, &trimmed[1..]),
        _ => (Sign::Plus, trimmed),
    };

    let run = unsigned
        .char_indices()
        .find(|(_, c)| !c.is_digit(base))
        .map_or(unsigned.len(), |(idx, _)| idx);
    if run == 0 {
        return Err(DecodeError::NoDigits {
            base,
            value: value.to_string(),
        });
    }

    let rest = unsigned[run..].trim_end();
    if !rest.is_empty() {
        warn!(base, value, ignored = rest, "ignoring trailing characters after digits");
    }

    let magnitude = BigInt::parse_bytes(unsigned[..run].as_bytes(), base).ok_or_else(|| {
        DecodeError::NoDigits {
            base,
            value: value.to_string(),
        }
    })?;
    if magnitude.is_zero() {
        return Ok(magnitude);
    }
    Ok(match sign {
        Sign::Minus => -magnitude,
        _ => magnitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_256() -> BigInt {
        BigInt::parse_bytes("F".repeat(64).as_bytes(), 16).unwrap()
    }

    #[test]
    fn test_decode_common_bases() {
        let decoder = ValueDecoder::default();
        assert_eq!(decoder.decode(10, "4").unwrap(), BigInt::from(4));
        assert_eq!(decoder.decode(2, "111").unwrap(), BigInt::from(7));
        assert_eq!(decoder.decode(16, "c").unwrap(), BigInt::from(12));
        assert_eq!(decoder.decode(16, "C").unwrap(), BigInt::from(12));
        assert_eq!(decoder.decode(36, "zz").unwrap(), BigInt::from(1295));
        assert_eq!(decoder.decode(4, "213").unwrap(), BigInt::from(39));
    }

    #[test]
    fn test_decode_keeps_full_precision() {
        let decoder = ValueDecoder::default();
        let value = "123456789012345678901234567890";
        assert_eq!(
            decoder.decode(10, value).unwrap(),
            BigInt::parse_bytes(value.as_bytes(), 10).unwrap()
        );
    }

    #[test]
    fn test_decode_stops_at_first_invalid_digit() {
        let decoder = ValueDecoder::default();
        assert_eq!(decoder.decode(10, "12ab").unwrap(), BigInt::from(12));
        assert_eq!(decoder.decode(2, " 1012").unwrap(), BigInt::from(5));
    }

    #[test]
    fn test_decode_rejects_bad_base_and_empty_digits() {
        let decoder = ValueDecoder::default();
        assert!(matches!(
            decoder.decode(1, "1"),
            Err(DecodeError::UnsupportedBase { base: 1, .. })
        ));
        assert!(matches!(
            decoder.decode(37, "1"),
            Err(DecodeError::UnsupportedBase { base: 37, .. })
        ));
        assert!(matches!(
            decoder.decode(10, "xyz"),
            Err(DecodeError::NoDigits { .. })
        ));
        assert!(matches!(decoder.decode(10, ""), Err(DecodeError::NoDigits { .. })));
        assert!(matches!(decoder.decode(10, "-"), Err(DecodeError::NoDigits { .. })));
    }

    #[test]
    fn test_decode_rejects_zero_and_negative() {
        let decoder = ValueDecoder::default();
        let err = decoder.decode(10, "0").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OutOfRange {
                reason: RangeError::NonPositive(_),
                ..
            }
        ));
        let err = decoder.decode(16, "-a").unwrap_err();
        assert_eq!(
            err,
            DecodeError::OutOfRange {
                base: 16,
                value: "-a".to_string(),
                reason: RangeError::NonPositive(BigInt::from(-10)),
            }
        );
    }

    #[test]
    fn test_upper_bound_is_inclusive() {
        let decoder = ValueDecoder::default();
        let all_f = "F".repeat(64);
        assert_eq!(decoder.decode(16, &all_f).unwrap(), max_256());

        let two_pow_256 = format!("1{}", "0".repeat(64));
        let err = decoder.decode(16, &two_pow_256).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OutOfRange {
                reason: RangeError::ExceedsBound { bits: 256 },
                ..
            }
        ));
    }

    #[test]
    fn test_validator_bounds() {
        let validator = RangeValidator::default();
        assert_eq!(validator.max(), &max_256());
        assert!(validator.validate(&BigInt::one()).is_ok());
        assert!(validator.validate(&max_256()).is_ok());
        assert!(validator.validate(&(max_256() + 1)).is_err());
        assert!(validator.validate(&BigInt::zero()).is_err());

        let narrow = RangeValidator::new(8);
        assert!(narrow.validate(&BigInt::from(255)).is_ok());
        assert_eq!(
            narrow.validate(&BigInt::from(256)),
            Err(RangeError::ExceedsBound { bits: 8 })
        );
    }

    #[test]
    fn test_error_message_names_base_and_value() {
        let decoder = ValueDecoder::default();
        let message = decoder.decode(10, "0").unwrap_err().to_string();
        assert!(message.contains("\"0\""));
        assert!(message.contains("base 10"));
        assert!(message.contains("positive"));
    }
}
