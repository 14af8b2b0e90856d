// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Matching the compiled method body against an [`ExpectedPattern`].
//!
//! # Repeated instructions
//!
//! Tokens are collected from the method header up to the `onSpinWait`
//! call-site comment, plus the instruction the comment belongs to. The list is
//! walked backwards: the last occurrence of the hint and every identical token
//! directly before it form the run. Hints earlier in the method (padding in
//! the prologue, for instance) are not part of the intrinsic and are ignored.
//!
//! # Counter-delay idiom
//!
//! Tokens from the whole method are flattened into one list, since the idiom
//! may straddle dump lines, and the six instructions are matched in order
//! from the first `mrs x8, cntvct_el0`.

use std::fmt;

use a64_insn::{
    KnownInstruction, SpinKind, add_immediate_mnemonic, check_delay, decode_add_token,
    idiom::{BRANCH_LESS_THAN, COMPARE_X9_X8, READ_TIMER_X8, READ_TIMER_X9, SPIN_HINT},
    parse_add_mnemonic,
};
use tracing::debug;

use crate::{
    error::VerifyError,
    log::OutputLog,
    markers::{Marker, Markers},
    pattern::ExpectedPattern,
    scanner::{ensure_unique, require_marker},
    tokenizer::{InstructionToken, LogFormat, detect_format, tokenize},
};

/// Placeholder for a token past the end of the method body.
const END_OF_BODY: &str = "<end of method body>";

/// Placeholder for a line past the end of the log.
const END_OF_LOG: &str = "<end of log>";

/// Position in the counter-delay idiom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdiomSlot {
    ReadTimer,
    AddDelay,
    SpinHint,
    ReadTimerAgain,
    Compare,
    BranchLessThan,
}

impl IdiomSlot {
    pub const ALL: [IdiomSlot; 6] = [
        IdiomSlot::ReadTimer,
        IdiomSlot::AddDelay,
        IdiomSlot::SpinHint,
        IdiomSlot::ReadTimerAgain,
        IdiomSlot::Compare,
        IdiomSlot::BranchLessThan,
    ];

    /// Zero-based position in the idiom.
    pub fn index(self) -> usize {
        self as usize
    }

    fn known(self) -> Option<KnownInstruction> {
        match self {
            IdiomSlot::ReadTimer => Some(READ_TIMER_X8),
            IdiomSlot::AddDelay => None,
            IdiomSlot::SpinHint => Some(SPIN_HINT),
            IdiomSlot::ReadTimerAgain => Some(READ_TIMER_X9),
            IdiomSlot::Compare => Some(COMPARE_X9_X8),
            IdiomSlot::BranchLessThan => Some(BRANCH_LESS_THAN),
        }
    }

    /// Text shown as the expectation in a mismatch.
    fn expected(self, format: LogFormat, delay: u32) -> String {
        match (self.known(), format) {
            (None, _) => add_immediate_mnemonic(delay),
            (Some(known), LogFormat::Hex) => known.hex.to_string(),
            (Some(known), LogFormat::Mnemonic) => known.mnemonic.to_string(),
        }
    }

    fn matches(self, token: &str, format: LogFormat, delay: u32) -> bool {
        match (self, format) {
            // The immediate is compared as a number, never as text.
            (IdiomSlot::AddDelay, LogFormat::Hex) => decode_add_token(token) == Ok(Some(delay)),
            (IdiomSlot::AddDelay, LogFormat::Mnemonic) => parse_add_mnemonic(token) == Some(delay),
            // The disassembler prints the absolute branch target, which moves
            // between runs. The hex encoding is PC-relative and fixed.
            (IdiomSlot::BranchLessThan, LogFormat::Mnemonic) => {
                token.starts_with(BRANCH_LESS_THAN.mnemonic)
            }
            (slot, LogFormat::Hex) => slot.known().is_some_and(|known| token == known.hex),
            (slot, LogFormat::Mnemonic) => {
                slot.known().is_some_and(|known| token == known.mnemonic)
            }
        }
    }

    fn mismatch(self, format: LogFormat, delay: u32, actual: &str) -> VerifyError {
        VerifyError::IdiomMismatch {
            slot: self,
            expected: self.expected(format, delay),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for IdiomSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdiomSlot::ReadTimer => "read timer",
            IdiomSlot::AddDelay => "add delay",
            IdiomSlot::SpinHint => "spin hint",
            IdiomSlot::ReadTimerAgain => "read timer again",
            IdiomSlot::Compare => "compare",
            IdiomSlot::BranchLessThan => "branch if less than",
        };
        write!(f, "slot {} ({name})", self.index())
    }
}

/// Length of the run of `target` ending at its last occurrence.
pub fn count_trailing_run(tokens: &[InstructionToken], target: &str) -> usize {
    let Some(last) = tokens.iter().rposition(|token| token == target) else {
        return 0;
    };
    tokens[..=last]
        .iter()
        .rev()
        .take_while(|token| *token == target)
        .count()
}

/// Match the six-instruction idiom, starting at the first `mrs x8, cntvct_el0`.
pub fn match_idiom(
    tokens: &[InstructionToken],
    format: LogFormat,
    delay: u32,
) -> Result<(), VerifyError> {
    let first = IdiomSlot::ReadTimer;
    let start = tokens
        .iter()
        .position(|token| first.matches(token, format, delay))
        .ok_or_else(|| first.mismatch(format, delay, END_OF_BODY))?;

    let mut rest = tokens[start + 1..].iter();
    for slot in &IdiomSlot::ALL[1..] {
        let actual = rest.next().map_or(END_OF_BODY, String::as_str);
        if !slot.matches(actual, format, delay) {
            return Err(slot.mismatch(format, delay, actual));
        }
    }
    Ok(())
}

/// Verifier for one captured `PrintAssembly` log.
pub struct Verifier<'a> {
    log: &'a OutputLog,
    markers: Markers,
}

impl<'a> Verifier<'a> {
    /// Create a verifier using the default `onSpinWait` launcher markers.
    pub fn new(log: &'a OutputLog) -> Self {
        Self::with_markers(log, Markers::default())
    }

    pub fn with_markers(log: &'a OutputLog, markers: Markers) -> Self {
        Self { log, markers }
    }

    /// Check the log against `pattern`.
    pub fn verify(&self, pattern: &ExpectedPattern) -> Result<(), VerifyError> {
        match *pattern {
            ExpectedPattern::Repeated { kind, count } => self.verify_repeated(kind, count),
            ExpectedPattern::FixedIdiom { delay } => self.verify_idiom(delay),
        }
    }

    /// Index of the first body terminator at or after `start`, or the log length.
    fn body_end(&self, start: usize) -> usize {
        self.log
            .lines()
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, line)| self.markers.is_body_terminator(line))
            .map_or(self.log.len(), |(index, _)| index)
    }

    /// The single call-site marker at or after `start`.
    fn require_call_site(&self, start: usize) -> Result<(usize, &'a str), VerifyError> {
        let needle = &self.markers.call_site;
        let found = require_marker(self.log, start, Marker::CallSite, needle)?;
        ensure_unique(self.log, found.0, self.log.len(), Marker::CallSite, needle)?;
        Ok(found)
    }

    fn verify_repeated(&self, kind: SpinKind, count: usize) -> Result<(), VerifyError> {
        let log = self.log;
        let markers = &self.markers;

        let (header, _) = require_marker(log, 0, Marker::MethodHeader, &markers.method_header)?;
        ensure_unique(
            log,
            header,
            log.len(),
            Marker::MethodHeader,
            &markers.method_header,
        )?;

        let (call_site, call_line) = self.require_call_site(header + 1)?;

        let body = &log.lines()[header + 1..call_site];
        let trailing = call_site + 2;
        let format = detect_format(
            body.iter()
                .map(String::as_str)
                .chain(log.get(trailing)),
        );

        let mut tokens: Vec<InstructionToken> = body
            .iter()
            .filter(|line| line.contains("0x"))
            .flat_map(|line| tokenize(line, format))
            .collect();

        let continuation = &markers.call_site_continuation;
        if !log
            .get(call_site + 1)
            .is_some_and(|line| line.contains(continuation.as_str()))
        {
            return Err(VerifyError::MarkerNotFound {
                marker: Marker::CallSiteContinuation,
                text: continuation.clone(),
            });
        }

        let target = match format {
            // With hsdis the call-site comment trails the intrinsic's last instruction.
            LogFormat::Mnemonic => {
                tokens.extend(tokenize(call_line, LogFormat::Mnemonic));
                kind.mnemonic()
            }
            // Without it the comment is on its own line and the dump resumes
            // after the scope line.
            LogFormat::Hex => {
                let line = log
                    .get(trailing)
                    .filter(|line| line.contains("0x") && !line.contains(';'))
                    .ok_or_else(|| VerifyError::MissingInstructionLine {
                        line: trailing + 1,
                        found: log.get(trailing).unwrap_or(END_OF_LOG).to_string(),
                    })?;
                tokens.extend(tokenize(line, LogFormat::Hex));
                kind.hex_token()
            }
        };

        let found = count_trailing_run(&tokens, target);
        debug!(
            ?format,
            tokens = tokens.len(),
            target,
            found,
            expected = count,
            "counted spin-wait instructions"
        );

        if found != count {
            return Err(VerifyError::InstructionCountMismatch {
                instruction: target.to_string(),
                found,
                expected: count,
            });
        }
        Ok(())
    }

    fn verify_idiom(&self, delay: u32) -> Result<(), VerifyError> {
        check_delay(i64::from(delay))?;

        let log = self.log;
        let (start, _) = require_marker(log, 0, Marker::MethodName, &self.markers.method_name)?;
        self.require_call_site(start + 1)?;
        let end = self.body_end(start + 1);
        let region = &log.lines()[start + 1..end];

        let format = detect_format(region);
        let tokens: Vec<InstructionToken> = region
            .iter()
            .flat_map(|line| tokenize(line, format))
            .collect();
        debug!(
            ?format,
            tokens = tokens.len(),
            lines = region.len(),
            delay,
            "collected method body"
        );

        match_idiom(&tokens, format, delay)
    }
}

/// Verify `log` against `pattern` with the default markers.
pub fn verify(log: &OutputLog, pattern: &ExpectedPattern) -> Result<(), VerifyError> {
    Verifier::new(log).verify(pattern)
}
