//! Composable UI component renderers.
//!
//! Each component writes one part of the frame into a `String` and returns the
//! next free row.
//!
//! # Components
//!
//! - [`header`]: Title bar with context and row count
//! - [`search`]: Filter input box
//! - [`table`]: Column headers and rows, with checkboxes in multi-select mode
//! - [`empty`]: Message shown instead of rows
//! - [`toast`]: Recent dispatcher notifications
//! - [`action_bar`]: Bulk actions for the current selection
//! - [`footer`]: Keybinding hints or the last hint
//!
//! # Layout Modes
//!
//! - [`render_normal_mode`]: Header + Table + Bottom
//! - [`render_search_mode`]: Header + `SearchBar` + Table + Bottom
//!
//! The bottom section is anchored to the last rows of the screen:
//!
//! ```text
//! [Toasts]
//! [Action bar]
//! [Border]
//! [Footer]
//! ```

mod action_bar;
mod empty;
mod footer;
mod header;
mod search;
mod table;
mod toast;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{SearchBarInfo, UIViewModel};

use action_bar::render_action_bar;
use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use search::render_search_bar;
use table::{render_table_headers, render_table_rows};
use toast::render_toasts;

/// Renders a horizontal border line on `row`.
///
/// # Returns
///
/// The next available row position (row + 1)
fn render_border(out: &mut String, row: usize, color: &str, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&"─".repeat(cols));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders the normal mode layout (no search bar).
pub fn render_normal_mode(out: &mut String, vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // row 1 stays blank

    current_row = render_header(out, current_row, &vm.header, theme, cols);
    current_row = render_border(out, current_row, &theme.colors.border, cols);
    render_table_section(out, current_row, vm, theme, cols);
    render_bottom_section(out, vm, theme, cols, rows);
}

/// Renders the search mode layout (with search bar).
pub fn render_search_mode(out: &mut String, vm: &UIViewModel, search: &SearchBarInfo, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // row 1 stays blank

    current_row = render_header(out, current_row, &vm.header, theme, cols);
    current_row = render_border(out, current_row, &theme.colors.border, cols);
    current_row = render_search_bar(out, current_row, search, theme, cols);
    render_table_section(out, current_row, vm, theme, cols);
    render_bottom_section(out, vm, theme, cols, rows);
}

fn render_table_section(out: &mut String, row: usize, vm: &UIViewModel, theme: &Theme, cols: usize) {
    let current_row = render_table_headers(out, row, &vm.columns, vm.select_all, theme);

    if let Some(empty) = &vm.empty_state {
        render_empty_state(out, current_row + 1, empty, theme, cols);
    } else {
        render_table_rows(out, current_row, &vm.rows, &vm.columns, theme, cols);
    }
}

fn render_bottom_section(out: &mut String, vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let footer_row = rows.saturating_sub(1).max(1);
    let border_row = footer_row.saturating_sub(1);
    let bar_rows = usize::from(vm.action_bar.is_some());
    let toast_row = border_row.saturating_sub(bar_rows + vm.toasts.len());

    let mut current_row = render_toasts(out, toast_row, &vm.toasts, theme, cols);
    if let Some(bar) = &vm.action_bar {
        current_row = render_action_bar(out, current_row, bar, theme, cols);
    }
    render_border(out, current_row, &theme.colors.border, cols);
    render_footer(out, footer_row, &vm.footer, theme, cols);
}
