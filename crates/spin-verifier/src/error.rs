// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for spin-wait verification

use a64_insn::{CodecError, describe_token};
use thiserror::Error;

use crate::{markers::Marker, matcher::IdiomSlot};

/// Reasons a captured log fails verification.
///
/// Structural errors (`MarkerNotFound`, `DuplicateMarker`,
/// `MissingInstructionLine`) mean the log does not contain the expected
/// compiled method at all. Mismatch errors mean it does, but the code is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("missing compiler output: {marker} marker '{text}' not found")]
    MarkerNotFound { marker: Marker, text: String },

    #[error("{marker} marker '{text}' occurs more than once (lines {first} and {second})")]
    DuplicateMarker {
        marker: Marker,
        text: String,
        first: usize,
        second: usize,
    },

    #[error("expected hex instructions on line {line}, found '{found}'")]
    MissingInstructionLine { line: usize, found: String },

    #[error("wrong instruction {instruction} count {found}, expecting {expected}")]
    InstructionCountMismatch {
        instruction: String,
        found: usize,
        expected: usize,
    },

    #[error(
        "idiom mismatch at {slot}: expected '{expected}', found {}",
        describe_token(.actual)
    )]
    IdiomMismatch {
        slot: IdiomSlot,
        expected: String,
        actual: String,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl VerifyError {
    /// True for errors caused by the log lacking the expected structure.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            VerifyError::MarkerNotFound { .. }
                | VerifyError::DuplicateMarker { .. }
                | VerifyError::MissingInstructionLine { .. }
        )
    }
}
