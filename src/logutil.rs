//! Log helpers for player-supplied text.
//!
//! Commands and item names come straight from the player or world files, so
//! they are escaped and length-capped before they reach a log record.

use std::fmt::Write;

use crate::game::commands::CommandResult;

const MAX_PREVIEW: usize = 200;

/// Escape control characters so the text stays on one line, and cut it at
/// `MAX_PREVIEW` characters with a trailing ellipsis.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 4);
    let mut chars = s.chars();
    for ch in chars.by_ref().take(MAX_PREVIEW) {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    if chars.next().is_some() {
        out.push('…');
    }
    out
}

/// One-line summary of a command result for debug logs.
pub fn summarize_result(result: &CommandResult) -> String {
    format!(
        "{} score{:+} move={} msg=\"{}\"",
        if result.success { "ok" } else { "fail" },
        result.score_change,
        result.counts_as_move,
        escape_log(&result.message)
    )
}
