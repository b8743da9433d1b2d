//! Toast renderer for dispatcher notifications.

use crate::bulk::NotificationKind;
use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ToastItem;

/// Renders one toast per line starting at `row`, colored by kind.
///
/// # Returns
///
/// The next available row position (row + number of toasts)
pub fn render_toasts(out: &mut String, row: usize, toasts: &[ToastItem], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for toast in toasts {
        let (marker, color) = match toast.kind {
            NotificationKind::Started => ("…", &theme.colors.toast_started_fg),
            NotificationKind::Success => ("✓", &theme.colors.toast_success_fg),
            NotificationKind::Failure => ("✗", &theme.colors.toast_failure_fg),
        };
        let text = truncate(&format!(" {marker} {}", toast.message), cols);

        position_cursor(out, current_row, 1);
        out.push_str(&Theme::fg(color));
        out.push_str(&text);
        out.push_str(&" ".repeat(cols.saturating_sub(text.chars().count())));
        out.push_str(Theme::reset());
        current_row += 1;
    }
    current_row
}
