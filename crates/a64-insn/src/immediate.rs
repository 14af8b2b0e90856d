// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The `add x8, x8, #delay` template of the counter-delay spin idiom.
//!
//! The delay is placed in the 12-bit immediate field starting at bit 10.
//! A delay of exactly 4096 carries into bit 22, so the field is read back
//! as 13 bits to keep encode and decode inverse over `0..=MAX_DELAY`.

use crate::{
    error::CodecError,
    word::{InstructionWord, decode_word},
};

/// `add x8, x8, #0`
pub const ADD_X8_BASE: InstructionWord = 0x9100_0108;

/// Largest delay accepted by the template.
pub const MAX_DELAY: u32 = 1 << 12;

const IMM_SHIFT: u32 = 10;
const IMM_MASK: u32 = 0x1fff;

const MNEMONIC_PREFIX: &str = "add x8, x8, #";
const LSL_12: &str = ", lsl #12";

/// Validate a caller-supplied delay.
pub fn check_delay(delay: i64) -> Result<u32, CodecError> {
    u32::try_from(delay)
        .ok()
        .filter(|d| *d <= MAX_DELAY)
        .ok_or(CodecError::InvalidDelay {
            delay,
            max: MAX_DELAY,
        })
}

/// Build the `add x8, x8, #delay` instruction word.
pub fn encode_add_immediate(delay: u32) -> Result<InstructionWord, CodecError> {
    let delay = check_delay(i64::from(delay))?;
    Ok(ADD_X8_BASE | (delay << IMM_SHIFT))
}

/// Extract the delay from an instruction word, if it is the add template.
pub fn decode_add_immediate(word: InstructionWord) -> Option<u32> {
    if word & !(IMM_MASK << IMM_SHIFT) != ADD_X8_BASE {
        return None;
    }
    Some((word >> IMM_SHIFT) & IMM_MASK)
}

/// Extract the delay from a `xxxx xxxx` token.
///
/// Returns `Ok(None)` when the token is valid hex but not the add template.
pub fn decode_add_token(token: &str) -> Result<Option<u32>, CodecError> {
    decode_word(token).map(decode_add_immediate)
}

/// Render the template as a disassembler would print it, e.g. `add x8, x8, #0xe`.
pub fn add_immediate_mnemonic(delay: u32) -> String {
    format!("{MNEMONIC_PREFIX}{delay:#x}")
}

/// Parse the delay from normalized disassembly text.
///
/// Accepts hex (`#0xe`) and decimal (`#14`) immediates and an optional
/// `, lsl #12` shift.
pub fn parse_add_mnemonic(text: &str) -> Option<u32> {
    let rest = text.trim().strip_prefix(MNEMONIC_PREFIX)?;
    let (digits, shift) = match rest.strip_suffix(LSL_12) {
        Some(digits) => (digits, 12),
        None => (rest, 0),
    };

    let digits = digits.trim();
    let value = match digits.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    value.checked_shl(shift).filter(|v| v >> shift == value)
}

#[cfg(test)]
mod tests {
    use super::{
        ADD_X8_BASE, MAX_DELAY, add_immediate_mnemonic, check_delay, decode_add_immediate,
        decode_add_token, encode_add_immediate, parse_add_mnemonic,
    };
    use crate::{error::CodecError, word::encode_word};

    #[test]
    fn test_encode_delay_14() {
        let word = encode_add_immediate(14).unwrap();
        assert_eq!(word, 0x9100_3908);
        assert_eq!(encode_word(word), "0839 0091");
    }

    #[test]
    fn test_encode_delay_54() {
        assert_eq!(encode_add_immediate(54).unwrap(), 0x9100_d908);
    }

    #[test]
    fn test_encode_zero_is_base() {
        assert_eq!(encode_add_immediate(0).unwrap(), ADD_X8_BASE);
    }

    #[test]
    fn test_encode_max_delay_round_trips() {
        let word = encode_add_immediate(MAX_DELAY).unwrap();
        assert_eq!(decode_add_immediate(word), Some(MAX_DELAY));
    }

    #[test]
    fn test_encode_out_of_range() {
        assert_eq!(
            encode_add_immediate(MAX_DELAY + 1),
            Err(CodecError::InvalidDelay {
                delay: 4097,
                max: MAX_DELAY
            })
        );
    }

    #[test]
    fn test_check_delay_negative() {
        assert!(matches!(
            check_delay(-1),
            Err(CodecError::InvalidDelay { delay: -1, .. })
        ));
        assert_eq!(check_delay(4096), Ok(4096));
    }

    #[test]
    fn test_decode_rejects_other_instruction() {
        // yield
        assert_eq!(decode_add_immediate(0xd503_203f), None);
        // add x9, x8, #14
        assert_eq!(decode_add_immediate(0x9100_3909), None);
    }

    #[test]
    fn test_decode_token() {
        assert_eq!(decode_add_token("0839 0091"), Ok(Some(14)));
        assert_eq!(decode_add_token("3f20 03d5"), Ok(None));
        assert!(decode_add_token("zz39 0091").is_err());
    }

    #[test]
    fn test_mnemonic_render() {
        assert_eq!(add_immediate_mnemonic(14), "add x8, x8, #0xe");
        assert_eq!(add_immediate_mnemonic(0), "add x8, x8, #0x0");
    }

    #[test]
    fn test_parse_mnemonic() {
        assert_eq!(parse_add_mnemonic("add x8, x8, #0xe"), Some(14));
        assert_eq!(parse_add_mnemonic("add x8, x8, #54"), Some(54));
        assert_eq!(parse_add_mnemonic("add x8, x8, #0x1, lsl #12"), Some(4096));
        assert_eq!(parse_add_mnemonic("add x9, x8, #0xe"), None);
        assert_eq!(parse_add_mnemonic("add x8, x8, #bogus"), None);
        assert_eq!(parse_add_mnemonic("yield"), None);
    }
}
