use serde::{Deserialize, Serialize};
use std::fmt;

/// How a per-day or pro-rata share is rounded to whole minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties go toward positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
    #[default]
    HalfUp,
    /// Ties go to the even neighbour (`2.5 -> 2`, `3.5 -> 4`).
    HalfEven,
}

impl RoundingMode {
    /// Divide `numerator` by a positive `denominator`, rounding to the nearest
    /// integer. Exact integer arithmetic.
    pub fn divide(self, numerator: i128, denominator: i128) -> i64 {
        debug_assert!(denominator > 0);
        let quotient = numerator.div_euclid(denominator);
        let twice_remainder = numerator.rem_euclid(denominator) * 2;

        let rounded = if twice_remainder > denominator {
            quotient + 1
        } else if twice_remainder < denominator {
            quotient
        } else {
            match self {
                RoundingMode::HalfUp => quotient + 1,
                RoundingMode::HalfEven if quotient % 2 == 0 => quotient,
                RoundingMode::HalfEven => quotient + 1,
            }
        };

        rounded as i64
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoundingMode::HalfUp => "half_up",
            RoundingMode::HalfEven => "half_even",
        }
    }
}

/// What to do with an invoice whose dates cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidDatePolicy {
    /// Log and leave the invoice out of the result.
    #[default]
    Skip,
    /// Fail the whole calculation.
    Reject,
}

impl InvalidDatePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            InvalidDatePolicy::Skip => "skip",
            InvalidDatePolicy::Reject => "reject",
        }
    }
}

/// What to do with an invoice whose total is below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeAmountPolicy {
    /// Credit notes flow through as negative recognized/deferred amounts.
    #[default]
    PassThrough,
    Skip,
    Reject,
}

impl NegativeAmountPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            NegativeAmountPolicy::PassThrough => "pass_through",
            NegativeAmountPolicy::Skip => "skip",
            NegativeAmountPolicy::Reject => "reject",
        }
    }
}

/// Knobs for the recognition engine. Read from the `[recognition]` table of
/// `config.toml`; every field falls back to its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionPolicy {
    pub rounding: RoundingMode,
    pub invalid_dates: InvalidDatePolicy,
    pub negative_amounts: NegativeAmountPolicy,
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InvalidDatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NegativeAmountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
