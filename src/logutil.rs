//! Log hygiene for player-supplied text (names, command arguments, persisted keys).
//! Chat input can carry control characters and arbitrary length; log lines should not.

use std::fmt::Write;

/// Longest preview of user text written to a log line.
pub const MAX_LOG_PREVIEW: usize = 120;

/// Render `s` as a single log-safe line.
///
/// Newlines, carriage returns and tabs become `\n`, `\r`, `\t`; backslashes are doubled;
/// other control characters become `\xNN`. Output past [`MAX_LOG_PREVIEW`] characters is
/// cut with an ellipsis.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_LOG_PREVIEW) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_LOG_PREVIEW {
            out.push('…');
            break;
        }
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
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(escape_log("redeem\nCrops\t5"), "redeem\\nCrops\\t5");
        assert_eq!(escape_log("a\u{7}b"), "a\\x07b");
    }

    #[test]
    fn long_input_is_truncated() {
        let long = "x".repeat(MAX_LOG_PREVIEW + 50);
        let out = escape_log(&long);
        assert_eq!(out.chars().count(), MAX_LOG_PREVIEW + 1);
        assert!(out.ends_with('…'));
    }
}
