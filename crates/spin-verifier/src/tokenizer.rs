// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Splitting disassembly lines into instruction tokens.
//!
//! HotSpot prints compiled code in one of two styles:
//!
//! ```text
//! 0x0000ffff9d557680: 1f20 03d5 | e953 40d1 | 3f01 00f9      (no hsdis)
//! 0x0000ffffa409da84:   sub sp, sp, #0x20                    (hsdis)
//! ```
//!
//! The style is fixed for a whole run, so it is detected once and every line
//! is tokenized the same way. Tokens are normalized: lowercase, single
//! spaces, no address prefix, no trailing `;` comment.

use a64_insn::is_hex_token;
use tracing::trace;

/// A single normalized instruction, e.g. `1f20 03d5` or `mrs x8, cntvct_el0`.
pub type InstructionToken = String;

/// How instructions are rendered in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Raw words, `|`-separated.
    Hex,
    /// Disassembled mnemonics, one per line.
    Mnemonic,
}

/// Hex if any of the given lines has a `|` separator or holds a single hex word.
pub fn detect_format<I, S>(lines: I) -> LogFormat
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let is_hex_line = |line: &str| {
        line.contains('|') || instruction_text(line).is_some_and(|text| is_hex_token(&text))
    };
    if lines.into_iter().any(|line| is_hex_line(line.as_ref())) {
        LogFormat::Hex
    } else {
        LogFormat::Mnemonic
    }
}

/// Collapse whitespace runs (including tabs) to single spaces, trim and lowercase.
pub fn normalize(line: &str) -> String {
    line.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Remove a leading `0x<hex>:` address.
///
/// Expects normalized (lowercase) text.
pub fn strip_address(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("0x") else {
        return text;
    };
    let digits = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b))
        .count();
    if digits == 0 {
        return text;
    }
    match rest[digits..].strip_prefix(':') {
        Some(after) => after.trim_start(),
        None => text,
    }
}

/// Remove a trailing `;` comment.
fn strip_comment(text: &str) -> &str {
    match text.find(';') {
        Some(pos) => &text[..pos],
        None => text,
    }
}

/// Normalized instruction text of a line, or `None` for blank, address-only
/// and comment-only lines.
pub fn instruction_text(line: &str) -> Option<String> {
    let normalized = normalize(line);
    let text = strip_comment(strip_address(&normalized)).trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Split a line into instruction tokens, preserving left-to-right order.
pub fn tokenize(line: &str, format: LogFormat) -> Vec<InstructionToken> {
    let Some(text) = instruction_text(line) else {
        return Vec::new();
    };

    let tokens: Vec<InstructionToken> = match format {
        LogFormat::Hex => text
            .split('|')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(String::from)
            .collect(),
        LogFormat::Mnemonic => vec![text],
    };
    trace!(?format, count = tokens.len(), line, "tokenized");
    tokens
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::{LogFormat, detect_format, instruction_text, normalize, strip_address, tokenize};

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("\tMRS     x8,\tCNTVCT_EL0  "), "mrs x8, cntvct_el0");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_strip_address() {
        assert_eq!(strip_address("0x0000ffffa409da84: sub sp, sp, #0x20"), "sub sp, sp, #0x20");
        assert_eq!(strip_address("0x0000ffff9d5576ac:"), "");
        assert_eq!(strip_address("nop"), "nop");
    }

    #[test]
    fn test_strip_address_requires_colon() {
        assert_eq!(strip_address("0x1f20 03d5"), "0x1f20 03d5");
        assert_eq!(strip_address("0x: nop"), "0x: nop");
    }

    #[test]
    fn test_detect_format() {
        let hex = indoc! {"
            # {method} {0x0000ffff6ac00370} 'test' '()V'
            0x0000ffff9d557680: 1f20 03d5 | e953 40d1 | 3f01 00f9
        "};
        assert_eq!(detect_format(hex.lines()), LogFormat::Hex);

        let mnemonic = indoc! {"
            0x0000ffffa409da80:   nop
            0x0000ffffa409da84:   sub sp, sp, #0x20
        "};
        assert_eq!(detect_format(mnemonic.lines()), LogFormat::Mnemonic);
        assert_eq!(detect_format(Vec::<String>::new()), LogFormat::Mnemonic);
    }

    #[test]
    fn test_detect_single_word_dump() {
        let hex = indoc! {"
            0x0000ffff9d5576ac: ;*invokestatic onSpinWait
            0x0000ffff9d5576ac: DF3F 03D5
        "};
        assert_eq!(detect_format(hex.lines()), LogFormat::Hex);
        assert_eq!(detect_format(["0x0000ffffa409da80:   yield"]), LogFormat::Mnemonic);
    }

    #[test]
    fn test_tokenize_hex_line() {
        let tokens = tokenize(
            "0x0000ffff9d557680: 1f20 03d5 | e953 40d1 | 3f01 00f9 | ",
            LogFormat::Hex,
        );
        assert_eq!(tokens, vec!["1f20 03d5", "e953 40d1", "3f01 00f9"]);
    }

    #[test]
    fn test_tokenize_hex_single_word() {
        assert_eq!(
            tokenize("0x0000ffff9d557680: ABFF FF54", LogFormat::Hex),
            vec!["abff ff54"]
        );
    }

    #[test]
    fn test_tokenize_mnemonic_line() {
        assert_eq!(
            tokenize("0x0000ffff78e31bf0:   mrs     x8, cntvct_el0", LogFormat::Mnemonic),
            vec!["mrs x8, cntvct_el0"]
        );
    }

    #[test]
    fn test_tokenize_mnemonic_drops_comment() {
        let line = "0x0000ffff78e31c04:   b.lt    0x0000ffff78e31bf8          ;*invokestatic onSpinWait {reexecute=0 rethrow=0 return_oop=0}";
        assert_eq!(
            tokenize(line, LogFormat::Mnemonic),
            vec!["b.lt 0x0000ffff78e31bf8"]
        );
    }

    #[test]
    fn test_comment_and_blank_lines_have_no_tokens() {
        for format in [LogFormat::Hex, LogFormat::Mnemonic] {
            assert!(tokenize("", format).is_empty());
            assert!(tokenize("0x0000ffff9d5576ac: ;*invokestatic onSpinWait", format).is_empty());
            assert!(
                tokenize(
                    "                    ; - compiler.onSpinWait.TestOnSpinWaitAArch64$Launcher::test@0 (line 161)",
                    format
                )
                .is_empty()
            );
            assert!(tokenize("0x0000ffff9d5576ac:", format).is_empty());
        }
    }

    #[test]
    fn test_instruction_text() {
        assert_eq!(instruction_text("0x10: yield ; hint").as_deref(), Some("yield"));
        assert_eq!(instruction_text("; only a comment"), None);
    }
}
