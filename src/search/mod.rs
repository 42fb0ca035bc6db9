// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Line filtering for the JSON buffer, plus fuzzy ranking for the screen picker.
//!
//! The filter is a derived view: the unfiltered buffer stays the source of truth, and
//! edits made against the filtered view are routed back to their original lines through a
//! positional index map.

/// A filtered slice of the buffer. `line_indices[i]` is the original line index of
/// filtered line `i`; `None` means no filter is active and the display is the whole
/// buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView {
    pub display: String,
    pub line_indices: Option<Vec<usize>>,
}

/// Case-insensitive per-line substring filter.
pub fn filter_lines(raw: &str, term: &str) -> FilteredView {
    if term.is_empty() {
        return FilteredView {
            display: raw.to_owned(),
            line_indices: None,
        };
    }

    let needle = term.to_lowercase();
    let mut matched_lines = Vec::new();
    let mut matched_indices = Vec::new();
    for (index, line) in raw.split('\n').enumerate() {
        if line.to_lowercase().contains(&needle) {
            matched_indices.push(index);
            matched_lines.push(line);
        }
    }

    FilteredView {
        display: matched_lines.join("\n"),
        line_indices: Some(matched_indices),
    }
}

/// Writes an edited filtered view back onto the unfiltered buffer.
///
/// Each edited line replaces the original line its filtered position maps to. This is a
/// positional merge, not a diff: inserting or deleting lines inside the filtered view
/// shifts the mapping, so extra edited lines beyond the mapped range are dropped and
/// unmapped originals stay as they were. Without an active filter (`line_indices` of
/// `None`) the edited text replaces the buffer wholesale.
pub fn apply_filtered_edit(edited: &str, raw: &str, line_indices: Option<&[usize]>) -> String {
    let Some(line_indices) = line_indices else {
        return edited.to_owned();
    };

    let mut original_lines: Vec<String> = raw.split('\n').map(str::to_owned).collect();
    for (filtered_index, edited_line) in edited.split('\n').enumerate() {
        let Some(&original_index) = line_indices.get(filtered_index) else {
            continue;
        };
        if original_index < original_lines.len() {
            original_lines[original_index] = edited_line.to_owned();
        }
    }
    original_lines.join("\n")
}

/// Match quality of `needle` against `haystack` for picker filtering; `None` means "hide
/// this option". Substring hits rank above everything; fuzzy similarity fills in typos.
pub fn match_score(needle: &str, haystack: &str) -> Option<i64> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return Some(0);
    }
    let haystack = haystack.to_lowercase();

    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let ratio_score = (ratio * 10.0).round() as i64;
    if haystack.contains(&needle) {
        Some(2000 + ratio_score)
    } else if ratio >= 60.0 {
        Some(ratio_score)
    } else {
        None
    }
}

/// Indices of `candidates` matching `needle`, best match first. Ties keep input order.
pub fn rank_matches<T>(needle: &str, candidates: &[T], text: impl Fn(&T) -> &str) -> Vec<usize> {
    let mut scored: Vec<(usize, i64)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            match_score(needle, text(candidate)).map(|score| (index, score))
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(index, _)| index).collect()
}
