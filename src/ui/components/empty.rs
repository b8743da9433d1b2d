//! Empty state component renderer.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders a centered two-line message at `row` and `row + 1`.
///
/// The message uses `empty_state_fg`, the subtitle `text_dim` with dim
/// styling.
///
/// # Returns
///
/// The next available row position (row + 2)
pub fn render_empty_state(out: &mut String, row: usize, empty: &EmptyState, theme: &Theme, cols: usize) -> usize {
    let msg_len = empty.message.chars().count();
    let msg_padding = (cols.saturating_sub(msg_len)) / 2;

    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(&theme.colors.empty_state_fg));
    out.push_str(&" ".repeat(msg_padding));
    out.push_str(&empty.message);
    out.push_str(&" ".repeat(cols.saturating_sub(msg_padding + msg_len)));
    out.push_str(Theme::reset());

    let sub_len = empty.subtitle.chars().count();
    let sub_padding = (cols.saturating_sub(sub_len)) / 2;

    position_cursor(out, row + 1, 1);
    out.push_str(Theme::dim());
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    out.push_str(&" ".repeat(sub_padding));
    out.push_str(&empty.subtitle);
    out.push_str(&" ".repeat(cols.saturating_sub(sub_padding + sub_len)));
    out.push_str(Theme::reset());

    row + 2
}
