// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Disassembly of hex tokens for diagnostics.
//!
//! Uses the `yaxpeax-arm` decoder so that mismatch messages for hex logs can
//! show what the compiler actually emitted.

use yaxpeax_arch::{Decoder, U8Reader};
use yaxpeax_arm::armv8::a64::InstDecoder;

use crate::word::{InstructionWord, decode_word};

/// Disassemble a single instruction word.
pub fn disassemble(word: InstructionWord) -> Option<String> {
    let bytes = word.to_le_bytes();
    let mut reader = U8Reader::new(&bytes);
    InstDecoder::default()
        .decode(&mut reader)
        .ok()
        .map(|instruction| instruction.to_string())
}

/// Describe a token for an error message.
///
/// Hex tokens get their disassembly appended; anything else is returned as is.
pub fn describe_token(token: &str) -> String {
    match decode_word(token).ok().and_then(disassemble) {
        Some(text) => format!("{token} ({text})"),
        None => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{describe_token, disassemble};
    use crate::spin::SpinKind;

    #[test]
    fn test_disassemble_spin_hints() {
        for kind in SpinKind::ALL {
            let text = disassemble(kind.word()).expect("hint should decode");
            assert!(text.contains(kind.mnemonic()), "{text}");
        }
    }

    #[test]
    fn test_describe_hex_token() {
        let text = describe_token("1f20 03d5");
        assert!(text.starts_with("1f20 03d5 ("));
        assert!(text.contains("nop"));
    }

    #[test]
    fn test_describe_mnemonic_passthrough() {
        assert_eq!(describe_token("cmp x9, x8"), "cmp x9, x8");
    }
}
