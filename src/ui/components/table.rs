//! Table component renderer.
//!
//! Renders the column headers and the windowed rows. In multi-select mode
//! both carry a leading checkbox; the header checkbox shows the aggregate
//! state of the visible rows (`[ ]`, `[-]` or `[x]`).

use crate::ui::helpers::{self, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{CheckState, ColumnInfo, RowItem};

/// Width of the checkbox column, including its trailing space.
const CHECKBOX_WIDTH: usize = 4;

/// Renders the column headers on `row`.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_table_headers(
    out: &mut String,
    row: usize,
    columns: &[ColumnInfo],
    select_all: Option<CheckState>,
    theme: &Theme,
) -> usize {
    position_cursor(out, row, 1);
    out.push_str(Theme::bold());

    if let Some(state) = select_all {
        render_checkbox(out, state, theme);
        out.push_str(Theme::bold());
    }

    out.push_str(&Theme::fg(&theme.colors.header_fg));
    for column in columns {
        helpers::write_padded(out, &column.title.to_uppercase(), column.width);
    }
    out.push_str(Theme::reset());
    row + 1
}

/// Renders all rows starting at `row`.
///
/// # Returns
///
/// The next available row position (row + number of rows)
pub fn render_table_rows(
    out: &mut String,
    row: usize,
    items: &[RowItem],
    columns: &[ColumnInfo],
    theme: &Theme,
    cols: usize,
) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_table_row(out, current_row, item, columns, theme, cols);
    }
    current_row
}

/// Renders one row, padded to the full width so the cursor background spans
/// the line.
fn render_table_row(
    out: &mut String,
    row: usize,
    item: &RowItem,
    columns: &[ColumnInfo],
    theme: &Theme,
    cols: usize,
) -> usize {
    position_cursor(out, row, 1);

    let mut line_len = 0;
    if let Some(state) = item.checkbox {
        if item.is_cursor {
            out.push_str(&Theme::bg(&theme.colors.selection_bg));
        }
        render_checkbox(out, state, theme);
        line_len += CHECKBOX_WIDTH;
    }

    apply_row_colors(out, item.is_cursor, theme);

    for (cell, column) in item.cells.iter().zip(columns) {
        helpers::render_highlighted_text(out, &cell.text, &cell.highlight_ranges, theme, item.is_cursor);
        out.push_str(&" ".repeat(column.width.saturating_sub(cell.text.chars().count())));
        line_len += column.width;
    }

    out.push_str(&" ".repeat(cols.saturating_sub(line_len)));
    out.push_str(Theme::reset());
    row + 1
}

fn apply_row_colors(out: &mut String, is_cursor: bool, theme: &Theme) {
    if is_cursor {
        out.push_str(&Theme::fg(&theme.colors.selection_fg));
        out.push_str(&Theme::bg(&theme.colors.selection_bg));
    } else {
        out.push_str(&Theme::fg(&theme.colors.text_normal));
    }
}

/// Writes a checkbox followed by a space. Leaves the background untouched.
fn render_checkbox(out: &mut String, state: CheckState, theme: &Theme) {
    let color = match state {
        CheckState::Unchecked => &theme.colors.text_dim,
        CheckState::Partial | CheckState::Checked => &theme.colors.checkbox_fg,
    };
    out.push_str(&Theme::fg(color));
    out.push_str(state.glyph());
    out.push(' ');
}
