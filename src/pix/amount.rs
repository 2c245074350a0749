use std::fmt;
use std::str::FromStr;

use super::error::{PixError, Result};

/// Transaction amount already rendered with exactly two decimals.
///
/// Rounding is half away from zero and happens on the decimal text, so
/// `"1.005"` becomes `"1.01"` regardless of how the value would be stored as
/// a float.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amount(String);

impl Amount {
    /// Accepts `12`, `12.5`, `12,50`, `.5` and `5.` style input. The first
    /// comma is read as the decimal separator.
    pub fn parse(valor: &str) -> Result<Self> {
        let normalized = valor.trim().replacen(',', ".", 1);
        let (int_part, frac_part) = normalized
            .split_once('.')
            .unwrap_or((normalized.as_str(), ""));

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(PixError::InvalidAmount(valor.to_string()));
        }

        Ok(Self(round_two_places(int_part, frac_part)))
    }

    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(PixError::InvalidAmount(value.to_string()));
        }
        // -0.0 would otherwise print with a sign
        let value = if value == 0.0 { 0.0 } else { value };
        Self::parse(&value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn round_two_places(int_part: &str, frac_part: &str) -> String {
    let frac = frac_part.as_bytes();
    let mut digits: Vec<u8> = int_part.bytes().collect();
    digits.push(frac.first().copied().unwrap_or(b'0'));
    digits.push(frac.get(1).copied().unwrap_or(b'0'));

    if frac.get(2).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - 2;
    let int_digits = &digits[..split];
    let first_significant = int_digits
        .iter()
        .position(|&d| d != b'0')
        .unwrap_or(int_digits.len());
    let int_digits = &int_digits[first_significant..];

    let mut out = String::with_capacity(int_digits.len() + 3);
    if int_digits.is_empty() {
        out.push('0');
    } else {
        out.extend(int_digits.iter().map(|&d| char::from(d)));
    }
    out.push('.');
    out.extend(digits[split..].iter().map(|&d| char::from(d)));
    out
}

impl FromStr for Amount {
    type Err = PixError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
