//! Chilean national identifier (RUT).
//!
//! Every employee, extra-hours entry and paycheck is keyed by a [`Rut`].
//! Parsing validates the modulo-11 check digit and normalises the value
//! so that `12.345.678-5` and `12345678-5` compare equal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Longest numeric body accepted (nine digits covers every issued RUT).
const MAX_BODY_DIGITS: usize = 9;

/// A validated, canonical RUT (`<body>-<check digit>`, no dots, uppercase `K`).
///
/// # Example
///
/// ```
/// use payroll_engine::models::Rut;
///
/// let rut = Rut::parse("12.345.678-5").unwrap();
/// assert_eq!(rut.as_str(), "12345678-5");
/// assert_eq!(rut.formatted(), "12.345.678-5");
///
/// assert!(Rut::parse("12.345.678-4").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rut(String);

impl Rut {
    /// Parses and validates a RUT in any of the common written forms.
    pub fn parse(value: &str) -> EngineResult<Self> {
        let invalid = |message: &str| EngineError::InvalidRut {
            value: value.to_string(),
            message: message.to_string(),
        };

        let cleaned: String = value
            .trim()
            .chars()
            .filter(|c| *c != '.')
            .collect::<String>()
            .to_uppercase();

        let (body, check) = cleaned
            .rsplit_once('-')
            .ok_or_else(|| invalid("missing '-' before the check digit"))?;

        if body.is_empty() || body.len() > MAX_BODY_DIGITS {
            return Err(invalid("body must have between 1 and 9 digits"));
        }
        if !body.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("body must be numeric"));
        }

        let mut check_chars = check.chars();
        let given = match (check_chars.next(), check_chars.next()) {
            (Some(c), None) if c.is_ascii_digit() || c == 'K' => c,
            _ => return Err(invalid("check digit must be a single digit or 'K'")),
        };

        let number: u64 = body
            .parse()
            .map_err(|_| invalid("body must be numeric"))?;
        if number == 0 {
            return Err(invalid("body must be greater than zero"));
        }

        let expected = check_digit(number);
        if given != expected {
            return Err(invalid(&format!("check digit should be {}", expected)));
        }

        Ok(Self(format!("{}-{}", number, given)))
    }

    /// Canonical form, e.g. `12345678-5`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form with thousands dots, e.g. `12.345.678-5`.
    pub fn formatted(&self) -> String {
        let (body, check) = self.0.split_once('-').unwrap_or((self.0.as_str(), ""));
        let mut grouped = String::with_capacity(body.len() + body.len() / 3);
        for (i, c) in body.chars().enumerate() {
            if i > 0 && (body.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        format!("{}-{}", grouped, check)
    }
}

/// Computes the modulo-11 check digit for a RUT body.
fn check_digit(mut body: u64) -> char {
    let mut sum = 0;
    let mut factor = 2;
    while body > 0 {
        sum += (body % 10) * factor;
        body /= 10;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }
    match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => (b'0' + d as u8) as char,
    }
}

impl FromStr for Rut {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rut {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rut> for String {
    fn from(rut: Rut) -> Self {
        rut.0
    }
}

impl fmt::Display for Rut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
