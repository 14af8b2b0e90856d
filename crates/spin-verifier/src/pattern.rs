// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! What the compiled method is expected to contain.

use std::fmt;

use a64_insn::{SpinKind, check_delay};

use crate::error::VerifyError;

/// Selects the counter-delay idiom instead of a repeated hint instruction.
pub const COUNTER_KIND: &str = "counter";

/// Count used when none is given, matching `-XX:OnSpinWaitInstCount`'s default.
pub const DEFAULT_INSTRUCTION_COUNT: usize = 1;

/// The verification target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedPattern {
    /// `count` consecutive `kind` instructions ending at the call site.
    Repeated { kind: SpinKind, count: usize },
    /// The six-instruction timer loop with the given delay immediate.
    FixedIdiom { delay: u32 },
}

impl ExpectedPattern {
    pub fn repeated(kind: SpinKind, count: usize) -> Self {
        ExpectedPattern::Repeated { kind, count }
    }

    /// Fails with `InvalidDelay` unless `0 <= delay <= 4096`.
    pub fn fixed_idiom(delay: i64) -> Result<Self, VerifyError> {
        Ok(ExpectedPattern::FixedIdiom {
            delay: check_delay(delay)?,
        })
    }

    /// Build a pattern from the two launcher parameters, e.g. `("isb", Some("3"))`
    /// or `("counter", Some("14"))`.
    pub fn from_args(kind: &str, value: Option<&str>) -> Result<Self, VerifyError> {
        if kind == COUNTER_KIND {
            let value = value.ok_or_else(|| {
                VerifyError::InvalidArgument("counter requires a delay value".to_string())
            })?;
            let delay = value.parse::<i64>().map_err(|_| {
                VerifyError::InvalidArgument(format!("delay '{value}' is not an integer"))
            })?;
            return Self::fixed_idiom(delay);
        }

        let kind = kind.parse::<SpinKind>()?;
        let count = match value {
            Some(value) => value.parse::<usize>().map_err(|_| {
                VerifyError::InvalidArgument(format!(
                    "instruction count '{value}' is not a non-negative integer"
                ))
            })?,
            None => DEFAULT_INSTRUCTION_COUNT,
        };
        Ok(Self::repeated(kind, count))
    }
}

impl fmt::Display for ExpectedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedPattern::Repeated { kind, count } => write!(f, "{count} x {kind}"),
            ExpectedPattern::FixedIdiom { delay } => write!(f, "counter delay {delay}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use a64_insn::{CodecError, SpinKind};

    use super::ExpectedPattern;
    use crate::error::VerifyError;

    #[test]
    fn test_repeated_from_args() {
        assert_eq!(
            ExpectedPattern::from_args("nop", Some("7")).unwrap(),
            ExpectedPattern::repeated(SpinKind::Nop, 7)
        );
        assert_eq!(
            ExpectedPattern::from_args("isb", Some("3")).unwrap(),
            ExpectedPattern::repeated(SpinKind::Isb, 3)
        );
    }

    #[test]
    fn test_count_defaults_to_one() {
        assert_eq!(
            ExpectedPattern::from_args("yield", None).unwrap(),
            ExpectedPattern::repeated(SpinKind::Yield, 1)
        );
    }

    #[test]
    fn test_counter_from_args() {
        assert_eq!(
            ExpectedPattern::from_args("counter", Some("54")).unwrap(),
            ExpectedPattern::FixedIdiom { delay: 54 }
        );
    }

    #[test]
    fn test_counter_requires_value() {
        assert!(matches!(
            ExpectedPattern::from_args("counter", None),
            Err(VerifyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_counter_delay_out_of_range() {
        assert!(matches!(
            ExpectedPattern::from_args("counter", Some("4097")),
            Err(VerifyError::Codec(CodecError::InvalidDelay { delay: 4097, .. }))
        ));
        assert!(matches!(
            ExpectedPattern::fixed_idiom(-1),
            Err(VerifyError::Codec(CodecError::InvalidDelay { .. }))
        ));
        assert!(ExpectedPattern::fixed_idiom(4096).is_ok());
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(
            ExpectedPattern::from_args("wfe", Some("1")),
            Err(VerifyError::Codec(CodecError::UnknownInstruction(
                "wfe".to_string()
            )))
        );
    }

    #[test]
    fn test_bad_count() {
        assert!(matches!(
            ExpectedPattern::from_args("nop", Some("-2")),
            Err(VerifyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(ExpectedPattern::repeated(SpinKind::Isb, 3).to_string(), "3 x isb");
        assert_eq!(
            ExpectedPattern::FixedIdiom { delay: 14 }.to_string(),
            "counter delay 14"
        );
    }
}
