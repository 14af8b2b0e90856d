// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Captured process output.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

/// One line of captured output.
pub type LogLine = String;

/// The full standard output of one JVM run, split into lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLog {
    lines: Vec<LogLine>,
}

impl OutputLog {
    pub fn from_lines(lines: Vec<LogLine>) -> Self {
        Self { lines }
    }

    /// Split captured text into lines.
    pub fn parse(text: &str) -> Self {
        text.lines().map(String::from).collect()
    }

    /// Read a log from any buffered reader.
    ///
    /// JVM output may contain bytes that are not UTF-8; those are replaced
    /// rather than failing the whole read.
    pub fn read(reader: impl BufRead) -> io::Result<Self> {
        reader
            .split(b'\n')
            .map(|line| line.map(|bytes| decode_line(&bytes)))
            .collect::<io::Result<Vec<_>>>()
            .map(Self::from_lines)
    }

    /// Read a log from a file.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::read(BufReader::new(File::open(path)?))
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn decode_line(bytes: &[u8]) -> LogLine {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

impl FromIterator<LogLine> for OutputLog {
    fn from_iter<I: IntoIterator<Item = LogLine>>(iter: I) -> Self {
        Self::from_lines(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for OutputLog {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(String::from).collect()
    }
}
