//! View model types representing renderable UI state.
//!
//! View models are computed from [`AppState`](crate::app::AppState) by
//! `compute_viewmodel` and consumed by the renderer. They contain no business
//! logic, only display-ready data: cell text is already formatted, checkbox
//! states are already derived from the selection, and the action bar already
//! knows which actions are busy.
//!
//! # Example
//!
//! ```
//! use bulkbar::ui::viewmodel::{CheckState, ColumnInfo};
//!
//! let column = ColumnInfo { title: "Status".to_string(), width: 11 };
//! assert_eq!(CheckState::Partial.glyph(), "[-]");
//! # let _ = column;
//! ```

use crate::bulk::NotificationKind;

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Data columns, without the checkbox column.
    pub columns: Vec<ColumnInfo>,

    /// Header checkbox; `Some` only in multi-select mode.
    pub select_all: Option<CheckState>,

    /// Rows inside the visible window.
    pub rows: Vec<RowItem>,

    /// Cursor position relative to the window.
    pub cursor_index: usize,

    /// Bulk-action bar; shown only while something is selected.
    pub action_bar: Option<ActionBarInfo>,

    /// Most recent notifications, oldest first.
    pub toasts: Vec<ToastItem>,

    pub footer: FooterInfo,

    /// Shown instead of the rows when there is nothing to list.
    pub empty_state: Option<EmptyState>,

    /// Shown while the filter is being edited.
    pub search_bar: Option<SearchBarInfo>,
}

/// Tri-state checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Partial,
    Checked,
}

impl CheckState {
    #[must_use]
    pub const fn from_selected(selected: bool) -> Self {
        if selected {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }

    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Unchecked => "[ ]",
            Self::Partial => "[-]",
            Self::Checked => "[x]",
        }
    }
}

/// Table header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub title: String,
    pub width: usize,
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowItem {
    /// Row checkbox; `Some` only in multi-select mode.
    pub checkbox: Option<CheckState>,

    /// One cell per entry of [`UIViewModel::columns`].
    pub cells: Vec<CellItem>,

    /// Whether the cursor is on this row.
    pub is_cursor: bool,
}

/// A table cell, truncated to its column width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellItem {
    pub text: String,

    /// Character ranges matching the search filter, `(start, end)` with an
    /// exclusive end.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

/// Context-sensitive bulk-action bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBarInfo {
    /// For example "2 orders selected".
    pub summary: String,
    pub actions: Vec<ActionItem>,
}

/// One entry in the action bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    /// Number key that invokes the action, starting at 1.
    pub key: usize,
    pub label: String,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastItem {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,

    /// One-off hint after a command that could not run.
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
}
