use std::str::FromStr;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use thiserror::Error;

pub const BYTES_PER_MEBIBYTE: f64 = 1024.0 * 1024.0;

/* ============================= ERRORS ============================= */

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,

    #[error("invalid number in quantity '{0}'")]
    InvalidNumber(String),

    #[error("unknown suffix '{suffix}' in quantity '{input}'")]
    UnknownSuffix { input: String, suffix: String },

    #[error("quantity '{0}' is out of range")]
    Overflow(String),
}

/* ============================= PARSED QUANTITY ============================= */

/// A Kubernetes resource quantity held exactly.
///
/// The value is `mantissa * 10^exponent * 1024^binary`. Keeping the decimal
/// digits as an integer means `0.1` CPU is exactly 100 millicores instead of
/// whatever a float multiplication happens to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedQuantity {
    mantissa: i128,
    exponent: i32,
    binary: u32,
}

impl ParsedQuantity {
    /// Parse the string form carried by a `k8s_openapi` quantity.
    pub fn from_quantity(q: &Quantity) -> Result<Self, QuantityError> {
        q.0.parse()
    }

    /// Value in thousandths of a unit, rounded up.
    ///
    /// Matches the way the cluster reports CPU: `1` is `1000`, `250m` is
    /// `250`, and `1n` rounds up to `1`.
    pub fn milli_value(&self) -> Result<i64, QuantityError> {
        if self.mantissa == 0 {
            return Ok(0);
        }
        let overflow = || QuantityError::Overflow(self.to_string());

        let scale = 1024i128.checked_pow(self.binary).ok_or_else(overflow)?;
        let n = self.mantissa.checked_mul(scale).ok_or_else(overflow)?;

        let e = self.exponent.saturating_add(3);
        let milli = if e >= 0 {
            let factor = 10i128.checked_pow(e as u32).ok_or_else(overflow)?;
            n.checked_mul(factor).ok_or_else(overflow)?
        } else {
            match 10i128.checked_pow(e.unsigned_abs()) {
                Some(divisor) => {
                    let q = n / divisor;
                    if n % divisor > 0 { q + 1 } else { q }
                }
                // Smaller than any representable divisor: only the sign survives.
                None => i128::from(n > 0),
            }
        };

        i64::try_from(milli).map_err(|_| overflow())
    }

    /// Value as a float. Precision beyond `f64` is not preserved; values
    /// beyond its range are an error.
    pub fn as_f64(&self) -> Result<f64, QuantityError> {
        if self.mantissa == 0 {
            return Ok(0.0);
        }
        let decimal = if self.exponent >= 0 {
            self.mantissa as f64 * 10f64.powi(self.exponent)
        } else {
            self.mantissa as f64 / 10f64.powi(self.exponent.saturating_neg())
        };
        let value = decimal * 1024f64.powi(self.binary as i32);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(QuantityError::Overflow(self.to_string()))
        }
    }
}

impl FromStr for ParsedQuantity {
    type Err = QuantityError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let s = input.trim();
        if s.is_empty() {
            return Err(QuantityError::Empty);
        }

        let (negative, body) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };

        let number_len = body
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(body.len());
        let (number, suffix) = body.split_at(number_len);

        let invalid = || QuantityError::InvalidNumber(input.to_string());
        let overflow = || QuantityError::Overflow(input.to_string());

        let (whole, fraction) = match number.split_once('.') {
            Some((w, f)) => (w, f),
            None => (number, ""),
        };
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(invalid());
        }

        // Digits past i128 precision are dropped; whole-part ones still scale the value.
        let push = |m: i128, digit: u8| m.checked_mul(10)?.checked_add(i128::from(digit - b'0'));
        let mut mantissa: i128 = 0;
        let mut shift: i32 = 0;
        let mut saturated = false;
        for digit in whole.bytes() {
            match push(mantissa, digit) {
                Some(m) if !saturated => mantissa = m,
                _ => {
                    saturated = true;
                    shift = shift.checked_add(1).ok_or_else(overflow)?;
                }
            }
        }
        for digit in fraction.bytes() {
            match push(mantissa, digit) {
                Some(m) if !saturated => {
                    mantissa = m;
                    shift -= 1;
                }
                _ => break,
            }
        }
        if negative {
            mantissa = -mantissa;
        }

        let (suffix_exponent, binary) = parse_suffix(suffix).ok_or_else(|| {
            QuantityError::UnknownSuffix {
                input: input.to_string(),
                suffix: suffix.to_string(),
            }
        })?;

        let exponent = suffix_exponent.checked_add(shift).ok_or_else(overflow)?;

        Ok(Self { mantissa, exponent, binary })
    }
}

impl std::fmt::Display for ParsedQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}e{}", self.mantissa, self.exponent)?;
        if self.binary > 0 {
            write!(f, "*1024^{}", self.binary)?;
        }
        Ok(())
    }
}

/// Returns `(decimal exponent, binary exponent)` for a quantity suffix.
fn parse_suffix(suffix: &str) -> Option<(i32, u32)> {
    let parsed = match suffix {
        "" => (0, 0),
        "Ki" => (0, 1),
        "Mi" => (0, 2),
        "Gi" => (0, 3),
        "Ti" => (0, 4),
        "Pi" => (0, 5),
        "Ei" => (0, 6),
        "n" => (-9, 0),
        "u" => (-6, 0),
        "m" => (-3, 0),
        "k" => (3, 0),
        "M" => (6, 0),
        "G" => (9, 0),
        "T" => (12, 0),
        "P" => (15, 0),
        "E" => (18, 0),
        other => {
            let rest = other.strip_prefix(['e', 'E'])?;
            (rest.parse::<i32>().ok()?, 0)
        }
    };
    Some(parsed)
}

/* ============================= FORMATTING ============================= */

pub fn format_milli_cpu(milli: i64) -> String {
    format!("{milli}m")
}

/// Render a byte count as mebibytes with at most two fractional digits.
pub fn format_mebibytes(bytes: f64) -> String {
    let mut value = format!("{:.2}", bytes / BYTES_PER_MEBIBYTE);
    if value.contains('.') {
        let trimmed = value.trim_end_matches('0').trim_end_matches('.').len();
        value.truncate(trimmed);
    }
    if value == "-0" {
        value = "0".to_string();
    }
    format!("{value}Mi")
}
