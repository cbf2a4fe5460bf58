use crate::types::errors::MilliunitsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DECIMAL_PLACES: usize = 3;
const SCALE: i64 = 10i64.pow(DECIMAL_PLACES as u32);

/// A currency amount in thousandths of a major unit.
///
/// Positive values are inflows to the target account, negative values are outflows.
/// On the wire this is a plain integer, which is how the ledger API represents amounts.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milliunits(i64);

impl Milliunits {
    pub const fn new(value: i64) -> Self {
        Milliunits(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Display for Milliunits {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = SCALE as u64;
        write!(formatter, "{}{}.{:0width$}", sign, abs / scale, abs % scale, width = DECIMAL_PLACES)
    }
}

impl FromStr for Milliunits {
    type Err = MilliunitsError;

    /// Parses a decimal amount such as `-12.5` or `1000,25`.
    ///
    /// Either `.` or `,` is accepted as the decimal separator, bank exports are not consistent about it.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(MilliunitsError::InvalidFormat("Value is an empty string".to_string()));
        }

        let (is_negative, unsigned) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value.strip_prefix('+').unwrap_or(value))
        };

        let parts: Vec<&str> = unsigned.split(['.', ',']).collect();

        if parts.len() > 2 {
            return Err(MilliunitsError::InvalidFormat("Value has more than one decimal separator".to_string()));
        }

        if parts[0].is_empty() || !parts[0].bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(MilliunitsError::InvalidFormat(format!("Value has an invalid integer part: {value}")));
        }

        let integer: i64 = parts[0].parse()?;

        let fraction: i64 = match parts.get(1) {
            Some(digits) => {
                if digits.len() > DECIMAL_PLACES {
                    return Err(MilliunitsError::InvalidFormat("Value has too many decimal places".to_string()));
                }

                if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
                    return Err(MilliunitsError::InvalidFormat(format!("Value has an invalid fraction part: {value}")));
                }

                format!("{:0<width$}", digits, width = DECIMAL_PLACES).parse()?
            }
            None => 0
        };

        let magnitude = integer.checked_mul(SCALE)
            .and_then(|v| v.checked_add(fraction))
            .ok_or(MilliunitsError::Overflow)?;

        Ok(Milliunits::new(if is_negative { -magnitude } else { magnitude }))
    }
}
