// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Forward scans for marker lines.
//!
//! Every scan takes an explicit start index and returns the index of the
//! matching line, so callers resume from a known position instead of sharing
//! an iterator.

use tracing::debug;

use crate::{error::VerifyError, log::OutputLog, markers::Marker};

/// First line containing `needle` as a literal substring.
pub fn find_first_containing<'a>(log: &'a OutputLog, needle: &str) -> Option<(usize, &'a str)> {
    find_first_containing_from(log, 0, needle)
}

/// First line at or after `start` containing `needle`.
///
/// Never wraps around; a `start` past the end finds nothing.
pub fn find_first_containing_from<'a>(
    log: &'a OutputLog,
    start: usize,
    needle: &str,
) -> Option<(usize, &'a str)> {
    log.lines()
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, line)| line.contains(needle))
        .map(|(index, line)| (index, line.as_str()))
}

/// Like [`find_first_containing_from`], but a missing marker is an error.
pub(crate) fn require_marker<'a>(
    log: &'a OutputLog,
    start: usize,
    marker: Marker,
    needle: &str,
) -> Result<(usize, &'a str), VerifyError> {
    let found = find_first_containing_from(log, start, needle).ok_or_else(|| {
        VerifyError::MarkerNotFound {
            marker,
            text: needle.to_string(),
        }
    })?;
    debug!(%marker, line = found.0 + 1, "found marker");
    Ok(found)
}

/// Fail if `needle` occurs again in `start..end`.
///
/// `first` is the index of the occurrence already found.
pub(crate) fn ensure_unique(
    log: &OutputLog,
    first: usize,
    end: usize,
    marker: Marker,
    needle: &str,
) -> Result<(), VerifyError> {
    match find_first_containing_from(log, first + 1, needle) {
        Some((second, _)) if second < end => Err(VerifyError::DuplicateMarker {
            marker,
            text: needle.to_string(),
            first: first + 1,
            second: second + 1,
        }),
        _ => Ok(()),
    }
}
