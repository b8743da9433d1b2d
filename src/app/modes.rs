//! Table and input mode types.
//!
//! [`TableMode`] decides whether rows can be selected at all; [`InputMode`]
//! decides how typed characters are interpreted.
//!
//! # State Machine
//!
//! ```text
//!   SingleRow ──(m)──▶ MultiSelect        every transition clears the selection
//!       ▲                    │
//!       └───────(m)──────────┘
//!
//!   Normal ──(/)──▶ Search ──(/ or ESC)──▶ Normal
//! ```

/// Row interaction mode of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableMode {
    /// A cursor highlights one row; nothing can be selected and no selection
    /// column is shown.
    #[default]
    SingleRow,

    /// Rows carry a checkbox and can be selected for bulk actions.
    MultiSelect,
}

impl TableMode {
    #[must_use]
    pub const fn from_enabled(multi_select: bool) -> Self {
        if multi_select {
            Self::MultiSelect
        } else {
            Self::SingleRow
        }
    }

    #[must_use]
    pub const fn is_multi_select(self) -> bool {
        matches!(self, Self::MultiSelect)
    }
}

/// Current input handling mode.
///
/// Controls which commands are active and what the footer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation, selection and bulk-action commands.
    #[default]
    Normal,

    /// Typed characters extend the row filter.
    Search,
}
