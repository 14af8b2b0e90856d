// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spin-wait hint instructions.

use std::{fmt, str::FromStr};

use crate::{error::CodecError, word::InstructionWord};

/// A hint instruction the JIT may emit for `Thread.onSpinWait()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpinKind {
    Nop,
    Isb,
    Yield,
}

impl SpinKind {
    pub const ALL: [SpinKind; 3] = [SpinKind::Nop, SpinKind::Isb, SpinKind::Yield];

    /// The instruction word.
    pub const fn word(self) -> InstructionWord {
        match self {
            SpinKind::Nop => 0xd503_201f,
            SpinKind::Isb => 0xd503_3fdf,
            SpinKind::Yield => 0xd503_203f,
        }
    }

    /// The word as it appears in a hex dump.
    pub const fn hex_token(self) -> &'static str {
        match self {
            SpinKind::Nop => "1f20 03d5",
            SpinKind::Isb => "df3f 03d5",
            SpinKind::Yield => "3f20 03d5",
        }
    }

    /// The disassembler mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            SpinKind::Nop => "nop",
            SpinKind::Isb => "isb",
            SpinKind::Yield => "yield",
        }
    }
}

impl fmt::Display for SpinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for SpinKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpinKind::ALL
            .into_iter()
            .find(|kind| kind.mnemonic() == s)
            .ok_or_else(|| CodecError::UnknownInstruction(s.to_string()))
    }
}

/// Map a spin instruction name to its hex token.
pub fn mnemonic_for_spin(kind: &str) -> Result<&'static str, CodecError> {
    kind.parse::<SpinKind>().map(SpinKind::hex_token)
}
