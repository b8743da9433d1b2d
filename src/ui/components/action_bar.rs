//! Bulk-action bar renderer.
//!
//! One full-width line: the selection summary followed by the actions of the
//! active context with their number keys. Busy actions are dimmed and marked
//! with an ellipsis.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ActionBarInfo;

/// Renders the action bar on `row`.
///
/// ```text
///  2 orders selected │ 1 Process  2 Ship…  3 Cancel
/// ```
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_action_bar(out: &mut String, row: usize, bar: &ActionBarInfo, theme: &Theme, cols: usize) -> usize {
    let background = Theme::bg(&theme.colors.action_bar_bg);
    let normal = Theme::fg(&theme.colors.action_bar_fg);

    position_cursor(out, row, 1);
    out.push_str(&background);
    out.push_str(&normal);
    out.push_str(Theme::bold());

    let summary = truncate(&format!(" {} │", bar.summary), cols);
    let mut line_len = summary.chars().count();
    out.push_str(&summary);
    out.push_str(Theme::reset());
    out.push_str(&background);

    for action in &bar.actions {
        let entry = if action.busy {
            format!(" {} {}… ", action.key, action.label)
        } else {
            format!(" {} {} ", action.key, action.label)
        };
        let entry_len = entry.chars().count();
        if line_len + entry_len > cols {
            break;
        }

        if action.busy {
            out.push_str(&Theme::fg(&theme.colors.action_busy_fg));
        } else {
            out.push_str(&normal);
        }
        out.push_str(&entry);
        line_len += entry_len;
    }

    out.push_str(&" ".repeat(cols.saturating_sub(line_len)));
    out.push_str(Theme::reset());
    row + 1
}
