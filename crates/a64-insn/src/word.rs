// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Hex instruction tokens.
//!
//! HotSpot prints raw code without a disassembler as groups of two 16-bit
//! hex quantities, e.g. `1f20 03d5`. The bytes appear in memory order, so
//! the token is the little-endian encoding of the 32-bit word `0xd503201f`.

use crate::error::CodecError;

/// A 32-bit Arm64 instruction word.
pub type InstructionWord = u32;

/// Length of a hex token: eight digits and the separating space.
const TOKEN_LEN: usize = 9;

/// Decode a `xxxx xxxx` token into its instruction word.
pub fn decode_word(token: &str) -> Result<InstructionWord, CodecError> {
    let malformed = |reason| CodecError::MalformedHex {
        token: token.to_string(),
        reason,
    };

    let token = token.trim();
    if token.len() != TOKEN_LEN {
        return Err(malformed("expected two groups of four hex digits"));
    }

    let (high, low) = token
        .split_once(' ')
        .ok_or_else(|| malformed("missing group separator"))?;
    if high.len() != 4 || low.len() != 4 {
        return Err(malformed("expected two groups of four hex digits"));
    }
    if !high.chars().chain(low.chars()).all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed("non-hex character"));
    }

    let as_written = u32::from_str_radix(&format!("{high}{low}"), 16)
        .map_err(|_| malformed("non-hex character"))?;
    Ok(reverse_bytes(as_written))
}

/// Render an instruction word in the `xxxx xxxx` form used by the log.
pub fn encode_word(word: InstructionWord) -> String {
    let [b0, b1, b2, b3] = word.to_le_bytes();
    format!("{b0:02x}{b1:02x} {b2:02x}{b3:02x}")
}

/// Swap the byte order of a word.
#[inline]
pub fn reverse_bytes(word: InstructionWord) -> InstructionWord {
    word.swap_bytes()
}

/// Check whether a token has the shape of a hex instruction.
pub fn is_hex_token(token: &str) -> bool {
    decode_word(token).is_ok()
}
