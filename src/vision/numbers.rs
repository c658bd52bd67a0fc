// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Numeric token extraction from recognized text

use regex::Regex;
use std::sync::OnceLock;

/// Tokens with this many characters or fewer are dropped
pub const MIN_TOKEN_EXCLUSIVE_LEN: usize = 3;

fn digit_runs() -> &'static Regex {
    static DIGIT_RUNS: OnceLock<Regex> = OnceLock::new();
    DIGIT_RUNS.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"))
}

/// Extract maximal digit runs longer than three characters, in order of
/// appearance.
///
/// Separators are not interpreted: `"12-34"` is two runs, `"12"` and `"34"`.
/// Length is counted in characters, so non-ASCII digits count once each.
pub fn extract_numbers(text: &str) -> Vec<String> {
    digit_runs()
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|run| run.chars().count() > MIN_TOKEN_EXCLUSIVE_LEN)
        .map(str::to_string)
        .collect()
}

/// Join recognized fragments the way the scan pipeline feeds the extractor
pub fn join_fragments(fragments: &[String]) -> String {
    fragments.join(" ")
}
