// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fixed instructions of the counter-delay spin idiom.
//!
//! ```asm
//! mrs  x8, cntvct_el0
//! add  x8, x8, #delay
//! yield
//! mrs  x9, cntvct_el0
//! cmp  x9, x8
//! b.lt <yield>
//! ```

use crate::{spin::SpinKind, word::InstructionWord};

/// An instruction in both of its log renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownInstruction {
    pub word: InstructionWord,
    pub hex: &'static str,
    pub mnemonic: &'static str,
}

/// `mrs x8, cntvct_el0`
pub const READ_TIMER_X8: KnownInstruction = KnownInstruction {
    word: 0xd53b_e048,
    hex: "48e0 3bd5",
    mnemonic: "mrs x8, cntvct_el0",
};

/// `yield`
pub const SPIN_HINT: KnownInstruction = KnownInstruction {
    word: SpinKind::Yield.word(),
    hex: SpinKind::Yield.hex_token(),
    mnemonic: SpinKind::Yield.mnemonic(),
};

/// `mrs x9, cntvct_el0`
pub const READ_TIMER_X9: KnownInstruction = KnownInstruction {
    word: 0xd53b_e049,
    hex: "49e0 3bd5",
    mnemonic: "mrs x9, cntvct_el0",
};

/// `cmp x9, x8`
pub const COMPARE_X9_X8: KnownInstruction = KnownInstruction {
    word: 0xeb08_013f,
    hex: "3f01 08eb",
    mnemonic: "cmp x9, x8",
};

/// `b.lt` back to the spin hint, three instructions up.
///
/// The mnemonic only carries the condition because the disassembler prints
/// an absolute target address.
pub const BRANCH_LESS_THAN: KnownInstruction = KnownInstruction {
    word: 0x54ff_ffab,
    hex: "abff ff54",
    mnemonic: "b.lt",
};

#[cfg(test)]
mod tests {
    use super::{BRANCH_LESS_THAN, COMPARE_X9_X8, READ_TIMER_X8, READ_TIMER_X9, SPIN_HINT};
    use crate::word::{decode_word, encode_word};

    #[test]
    fn test_hex_matches_word() {
        for insn in [
            READ_TIMER_X8,
            SPIN_HINT,
            READ_TIMER_X9,
            COMPARE_X9_X8,
            BRANCH_LESS_THAN,
        ] {
            assert_eq!(encode_word(insn.word), insn.hex, "{}", insn.mnemonic);
            assert_eq!(decode_word(insn.hex).unwrap(), insn.word);
        }
    }

    #[test]
    fn test_branch_offset_is_minus_three_instructions() {
        let imm19 = (BRANCH_LESS_THAN.word >> 5) & 0x7ffff;
        let offset = ((imm19 << 13) as i32) >> 13;
        assert_eq!(offset, -3);
        // Condition LT
        assert_eq!(BRANCH_LESS_THAN.word & 0xf, 0xb);
    }
}
