// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Verifier for `Thread.onSpinWait()` intrinsics in HotSpot `PrintAssembly` logs
//!
//! The JIT can expand `onSpinWait` on Arm64 into a run of hint instructions
//! (`-XX:OnSpinWaitInst=nop|isb|yield` with `-XX:OnSpinWaitInstCount=N`) or
//! into a timer loop (`-XX:OnSpinWaitInst=counter` with
//! `-XX:OnSpinWaitCounterDelay=D`). This crate checks a captured log for the
//! expected code.
//!
//! # Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Scan | [`scanner`] | Locate the method header and call-site markers |
//! | Tokenize | [`tokenizer`] | Detect hex or mnemonic output, split lines into instructions |
//! | Match | [`matcher`] | Count the trailing run, or step through the timer idiom |
//!
//! The log is captured by the caller. Launching the JVM is out of scope.
//!
//! # Example
//!
//! ```
//! use spin_verifier::{ExpectedPattern, OutputLog, verify};
//!
//! let log = OutputLog::parse(
//!     "# {method} 'test' '()V' in 'compiler/onSpinWait/TestOnSpinWaitAArch64$Launcher'\n\
//!      0x0000ffffa409da8c:   yield ;*invokestatic onSpinWait\n\
//!      ; - compiler.onSpinWait.TestOnSpinWaitAArch64$Launcher::test@0 (line 187)\n",
//! );
//! let pattern = ExpectedPattern::from_args("yield", None).unwrap();
//! assert!(verify(&log, &pattern).is_ok());
//! ```

pub mod error;
pub mod log;
pub mod markers;
pub mod matcher;
pub mod pattern;
pub mod scanner;
pub mod tokenizer;

pub use a64_insn::SpinKind;
pub use error::VerifyError;
pub use log::{LogLine, OutputLog};
pub use markers::{Marker, Markers};
pub use matcher::{IdiomSlot, Verifier, count_trailing_run, match_idiom, verify};
pub use pattern::ExpectedPattern;
pub use scanner::{find_first_containing, find_first_containing_from};
pub use tokenizer::{InstructionToken, LogFormat, detect_format, tokenize};
