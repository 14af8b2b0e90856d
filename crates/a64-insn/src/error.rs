// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for instruction encoding and decoding.

use thiserror::Error;

/// Errors raised while converting between instruction words and their text forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A token expected to be `xxxx xxxx` hex did not parse.
    #[error("malformed hex instruction '{token}': {reason}")]
    MalformedHex { token: String, reason: &'static str },

    /// Counter delay outside the range the add-immediate template can hold.
    #[error("invalid spin-wait delay {delay}: must be within 0..={max}")]
    InvalidDelay { delay: i64, max: u32 },

    /// Spin-wait instruction kind not in the table.
    #[error("unknown spin wait instruction: {0}")]
    UnknownInstruction(String),
}
