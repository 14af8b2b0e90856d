// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Arm64 instruction words as they appear in HotSpot `PrintAssembly` output
//!
//! Without the `hsdis` disassembler plugin, HotSpot dumps compiled code as
//! groups of hex digits (`1f20 03d5 | e953 40d1 | ...`). With it, the same
//! code is printed as mnemonics. This crate knows the handful of encodings
//! needed to recognise `Thread.onSpinWait()` intrinsics in either form.
//!
//! # Modules
//!
//! - [`word`]: `xxxx xxxx` tokens and byte-order reversal
//! - [`immediate`]: the `add x8, x8, #delay` template
//! - [`spin`]: spin hint instructions (`nop`, `isb`, `yield`)
//! - [`idiom`]: fixed instructions of the counter-delay idiom
//! - [`disasm`]: rendering hex tokens for diagnostics

pub mod disasm;
pub mod error;
pub mod idiom;
pub mod immediate;
pub mod spin;
pub mod word;

pub use disasm::{describe_token, disassemble};
pub use error::CodecError;
pub use idiom::KnownInstruction;
pub use immediate::{
    MAX_DELAY, add_immediate_mnemonic, check_delay, decode_add_immediate, decode_add_token,
    encode_add_immediate, parse_add_mnemonic,
};
pub use spin::{SpinKind, mnemonic_for_spin};
pub use word::{InstructionWord, decode_word, encode_word, is_hex_token, reverse_bytes};
