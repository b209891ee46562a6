//! Fixed-point decimal scalar with exact wire round-tripping.
//!
//! Decimal field values travel on the wire as canonical numeral strings
//! (`"1.10"`, `"-0.5"`). To round-trip those exactly, the value is held as an
//! integer mantissa plus a decimal scale rather than as a binary float, so
//! `"1.10"` keeps its trailing zero and re-serializes unchanged.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A decimal number as `mantissa * 10^(-scale)`.
///
/// Comparison and equality are numeric (`1.10 == 1.1`), while the string form
/// preserves the scale the value was created with.
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    mantissa: i128,
    scale: u8,
}

/// Error returned when a string is not a canonical decimal numeral.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid decimal numeral: {0:?}")]
pub struct ParseDecimalError(pub String);

impl Decimal {
    /// Creates a decimal from a mantissa and scale: `Decimal::new(110, 2)` is `1.10`.
    pub fn new(mantissa: i128, scale: u8) -> Decimal {
        Decimal { mantissa, scale }
    }

    /// The integer mantissa.
    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    /// The number of digits after the decimal point.
    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Rescales the mantissa to the given larger scale, if it fits in an `i128`.
    fn rescaled(&self, scale: u8) -> Option<i128> {
        let mut mantissa = self.mantissa;
        for _ in self.scale..scale {
            mantissa = mantissa.checked_mul(10)?;
        }
        Some(mantissa)
    }

    /// An approximate `f64` rendering, used only as a comparison fallback when
    /// rescaling to a common scale would overflow.
    fn approx(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(text: &str) -> Result<Decimal, ParseDecimalError> {
        let error = || ParseDecimalError(text.to_string());
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(error());
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(error());
        }
        let scale = u8::try_from(frac_part.len()).map_err(|_| error())?;
        let mut mantissa: i128 = 0;
        for digit in int_part.chars().chain(frac_part.chars()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add((digit as u8 - b'0') as i128))
                .ok_or_else(error)?;
        }
        if negative {
            mantissa = -mantissa;
        }
        Ok(Decimal::new(mantissa, scale))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{sign}{int_part}.{frac_part}")
        } else {
            write!(f, "{sign}0.{digits:0>scale$}")
        }
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Decimal {
        Decimal::new(value as i128, 0)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        match (self.rescaled(scale), other.rescaled(scale)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => self.approx().total_cmp(&other.approx()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_preserves_scale() {
        let value: Decimal = "1.10".parse().unwrap();
        assert_eq!(value.mantissa(), 110);
        assert_eq!(value.scale(), 2);
        assert_eq!(value.to_string(), "1.10");
    }

    #[test]
    fn fractional_only_pads_zero() {
        let value: Decimal = "-.5".parse().unwrap();
        assert_eq!(value.to_string(), "-0.5");
        assert_eq!("0.25".parse::<Decimal>().unwrap().to_string(), "0.25");
    }

    #[test]
    fn equality_is_numeric() {
        let a: Decimal = "1.10".parse().unwrap();
        let b: Decimal = "1.1".parse().unwrap();
        assert_eq!(a, b);
        assert!(a < "1.2".parse().unwrap());
    }

    #[test]
    fn rejects_non_numerals() {
        assert!("".parse::<Decimal>().is_err());
        assert!(".".parse::<Decimal>().is_err());
        assert!("1.2.3".parse::<Decimal>().is_err());
        assert!("12a".parse::<Decimal>().is_err());
    }
}
