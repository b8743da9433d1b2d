//! Footer component renderer.
//!
//! Shows the keybinding hints for the current mode, or the hint explaining
//! why the last command did nothing.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer centered on `row`, truncated to the terminal width.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_footer(out: &mut String, row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let (text, color) = footer.hint.as_ref().map_or_else(
        || (truncate(&footer.keybindings, cols), &theme.colors.text_dim),
        |hint| (truncate(hint, cols), &theme.colors.text_normal),
    );

    let text_len = text.chars().count();
    let padding = (cols.saturating_sub(text_len)) / 2;

    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&" ".repeat(padding));
    out.push_str(&text);
    out.push_str(&" ".repeat(cols.saturating_sub(padding + text_len)));
    out.push_str(Theme::reset());
    row + 1
}
