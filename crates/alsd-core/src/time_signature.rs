use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const NUMERATOR_RANGE: u64 = 99;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeSignature {
    pub numerator: u64,
    pub denominator_exponent: u64,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeSignatureError {
    #[error("time signature event at {time} is not an integer: {value:?}")]
    NotAnInteger { time: i64, value: Option<String> },
    #[error("time signature event at {time} has negative encoding {encoded}")]
    Negative { time: i64, encoded: i64 },
}

impl TimeSignature {
    #[must_use]
    pub fn decode(encoded: u64) -> Self {
        Self {
            numerator: encoded % NUMERATOR_RANGE + 1,
            denominator_exponent: encoded / NUMERATOR_RANGE,
        }
    }

    /// `None` when the denominator does not fit in a `u64`.
    #[must_use]
    pub fn denominator(&self) -> Option<u64> {
        u32::try_from(self.denominator_exponent)
            .ok()
            .and_then(|exponent| 1_u64.checked_shl(exponent))
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.denominator() {
            Some(denominator) => write!(f, "{}/{denominator}", self.numerator),
            None => write!(f, "{}/2^{}", self.numerator, self.denominator_exponent),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSignatureChange {
    pub time: i64,
    pub signature: TimeSignature,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(encoded: u64) -> (u64, Option<u64>) {
        let signature = TimeSignature::decode(encoded);
        (signature.numerator, signature.denominator())
    }

    #[test]
    fn decodes_packed_meters() {
        assert_eq!(decoded(0), (1, Some(1)));
        assert_eq!(decoded(98), (99, Some(1)));
        assert_eq!(decoded(99), (1, Some(2)));
        assert_eq!(decoded(198), (1, Some(4)));
        assert_eq!(decoded(201), (4, Some(4)));
        assert_eq!(decoded(302), (6, Some(8)));
    }

    #[test]
    fn large_encodings_keep_their_exponent() {
        assert_eq!(decoded(3200), (33, Some(1 << 32)));
        assert_eq!(decoded(99 * 63), (1, Some(1 << 63)));
        let huge = TimeSignature::decode(99 * 64);
        assert_eq!(huge.denominator(), None);
        assert_eq!(huge.denominator_exponent, 64);
        assert_eq!(huge.to_string(), "1/2^64");
    }

    #[test]
    fn displays_as_fraction() {
        assert_eq!(TimeSignature::decode(201).to_string(), "4/4");
    }
}
