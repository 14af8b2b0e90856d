// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Marker lines delimiting the compiled method in `PrintAssembly` output.
//!
//! Defaults match the launcher used by the HotSpot `onSpinWait` tests, which
//! compiles `TestOnSpinWaitAArch64$Launcher::test()` and nothing else.

use std::fmt;

/// `# {method} {0x...} 'test' '()V' in '...$Launcher'`
pub const DEFAULT_METHOD_HEADER: &str =
    "'test' '()V' in 'compiler/onSpinWait/TestOnSpinWaitAArch64$Launcher'";

/// Qualified class name, present in the header in any output style.
pub const DEFAULT_METHOD_NAME: &str = "compiler/onSpinWait/TestOnSpinWaitAArch64$Launcher";

/// Debug-info comment attached to the intrinsic's last instruction.
pub const DEFAULT_CALL_SITE: &str = "*invokestatic onSpinWait";

/// Scope line printed directly under the call-site comment.
pub const DEFAULT_CALL_SITE_CONTINUATION: &str =
    "- compiler.onSpinWait.TestOnSpinWaitAArch64$Launcher::test@0";

/// Sections that follow the method body.
pub const DEFAULT_BODY_TERMINATORS: [&str; 2] = ["[Exception Handler]", "[/Disassembly]"];

/// Identifies which structural marker a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Full method signature; starts the body in repeated-instruction mode.
    MethodHeader,
    /// Qualified class name; starts the body in idiom mode.
    MethodName,
    /// The `onSpinWait` call-site comment.
    CallSite,
    /// The scope line under the call-site comment.
    CallSiteContinuation,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::MethodHeader => write!(f, "method header"),
            Marker::MethodName => write!(f, "method name"),
            Marker::CallSite => write!(f, "call site"),
            Marker::CallSiteContinuation => write!(f, "call-site continuation"),
        }
    }
}

/// Literal marker strings searched for in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub method_header: String,
    pub method_name: String,
    pub call_site: String,
    pub call_site_continuation: String,
    /// Matched case-insensitively.
    pub body_terminators: Vec<String>,
}

impl Markers {
    /// The text for a given marker.
    pub fn text(&self, marker: Marker) -> &str {
        match marker {
            Marker::MethodHeader => &self.method_header,
            Marker::MethodName => &self.method_name,
            Marker::CallSite => &self.call_site,
            Marker::CallSiteContinuation => &self.call_site_continuation,
        }
    }

    /// Whether a line ends the method body.
    pub fn is_body_terminator(&self, line: &str) -> bool {
        let line = line.to_lowercase();
        self.body_terminators
            .iter()
            .any(|terminator| line.contains(&terminator.to_lowercase()))
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            method_header: DEFAULT_METHOD_HEADER.to_string(),
            method_name: DEFAULT_METHOD_NAME.to_string(),
            call_site: DEFAULT_CALL_SITE.to_string(),
            call_site_continuation: DEFAULT_CALL_SITE_CONTINUATION.to_string(),
            body_terminators: DEFAULT_BODY_TERMINATORS.map(String::from).to_vec(),
        }
    }
}
