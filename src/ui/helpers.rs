//! Shared rendering utilities.
//!
//! Components render into a `String` frame buffer rather than straight to
//! stdout; the runtime writes the finished frame in one go.
//!
//! # Example
//!
//! ```
//! use bulkbar::ui::helpers::{position_cursor, truncate};
//!
//! let mut frame = String::new();
//! position_cursor(&mut frame, 5, 1);
//! assert_eq!(frame, "\u{1b}[5;1H");
//! assert_eq!(truncate("Grace Hopper", 8), "Grace...");
//! ```

use crate::ui::theme::Theme;
use std::fmt::Write;

/// Moves the cursor to a 1-indexed row and column.
pub fn position_cursor(out: &mut String, row: usize, col: usize) {
    let _ = write!(out, "\u{1b}[{row};{col}H");
}

/// Shortens `text` to at most `max` characters, ending in `...` when cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let kept: String = text.chars().take(max - 3).collect();
    format!("{kept}...")
}

/// Writes `text` padded with spaces to `width` characters.
pub fn write_padded(out: &mut String, text: &str, width: usize) {
    out.push_str(text);
    out.push_str(&" ".repeat(width.saturating_sub(text.chars().count())));
}

/// Writes text with highlighted character ranges for filter matches.
///
/// Ranges are `(start, end)` character indices with an exclusive end. On the
/// cursor row highlighting is skipped so it does not fight the row colors.
pub fn render_highlighted_text(
    out: &mut String,
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_cursor: bool,
) {
    if ranges.is_empty() || is_cursor {
        out.push_str(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        out.extend(&chars[current_pos..start]);
        out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
        out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(Theme::reset());
        out.push_str(&Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
}
