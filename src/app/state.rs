//! Application state and view model computation.
//!
//! [`AppState`] holds everything the event handler mutates: the table
//! controller, the input mode and the search query, plus a one-off hint shown
//! in the footer. Action busy flags and notifications are not part of it; they
//! belong to the dispatcher and the toast log and are passed in when a view
//! model is computed.
//!
//! # View Model Computation
//!
//! `compute_viewmodel` turns a state snapshot into a renderable
//! [`UIViewModel`]: it windows the visible rows around the cursor, derives
//! checkbox states from the selection, formats cells, highlights filter
//! matches and builds the action bar for the active context.

use super::modes::InputMode;
use super::table::{Column, TableController};
use crate::bulk::{ActionRegistry, Notification};
use crate::domain::Entity;
use crate::ui::helpers::truncate;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    ActionBarInfo, ActionItem, CellItem, CheckState, ColumnInfo, EmptyState, FooterInfo, HeaderInfo,
    RowItem, SearchBarInfo, ToastItem, UIViewModel,
};
use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use std::collections::BTreeSet;

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Rows, cursor and selection of the active context.
    pub table: TableController,

    /// Current input handling mode.
    pub input_mode: InputMode,

    /// Filter text being edited in search mode.
    pub search_query: String,

    /// Color scheme for rendering.
    pub theme: Theme,

    /// Why the last command did nothing, if it did nothing. Cleared by the
    /// next event.
    pub hint: Option<String>,
}

impl AppState {
    #[must_use]
    pub fn new(table: TableController, theme: Theme) -> Self {
        Self {
            table,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme,
            hint: None,
        }
    }

    /// Pushes the search query into the table filter.
    pub fn apply_search_filter(&mut self) {
        let _span = tracing::debug_span!("apply_search_filter",
            total_rows = self.table.rows().len(),
            query_len = self.search_query.len(),
            input_mode = ?self.input_mode
        ).entered();

        self.table.set_filter(&self.search_query);
    }

    /// Computes a renderable view model.
    ///
    /// # Parameters
    ///
    /// * `registry` - Actions and busy flags for the action bar
    /// * `toasts` - Recent notifications, oldest first
    /// * `rows` - Terminal height in character cells
    /// * `cols` - Terminal width in character cells
    ///
    /// # Windowing Algorithm
    ///
    /// 1. Subtract UI chrome (header, borders, footer, search bar, action bar, toasts)
    /// 2. Center the window on the cursor
    /// 3. Slide the window back if it runs past the end
    #[must_use]
    pub fn compute_viewmodel(
        &self,
        registry: &ActionRegistry,
        toasts: &[Notification],
        rows: usize,
        cols: usize,
    ) -> UIViewModel {
        let now = Utc::now();
        let data_columns: Vec<Column> = self
            .table
            .columns()
            .into_iter()
            .filter(|column| *column != Column::Select)
            .collect();

        let action_bar = self.compute_action_bar(registry);
        let toasts: Vec<ToastItem> = toasts
            .iter()
            .map(|notification| ToastItem {
                kind: notification.kind,
                message: notification.message.clone(),
            })
            .collect();

        let mut viewmodel = UIViewModel {
            header: self.compute_header(),
            columns: data_columns
                .iter()
                .map(|column| ColumnInfo {
                    title: column.header().to_string(),
                    width: column.width(),
                })
                .collect(),
            select_all: self.table.is_multi_select().then(|| self.select_all_state()),
            rows: vec![],
            cursor_index: 0,
            action_bar,
            toasts,
            footer: self.compute_footer(),
            empty_state: None,
            search_bar: self.compute_search_bar(),
        };

        let visible = self.table.visible_rows();
        if visible.is_empty() {
            viewmodel.empty_state = Some(self.compute_empty_state());
            return viewmodel;
        }

        let available_rows = self
            .calculate_available_rows(rows, viewmodel.action_bar.is_some(), viewmodel.toasts.len())
            .max(1);
        let cursor = self.table.cursor();

        let mut visible_start = cursor.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(visible.len());
        if visible_end - visible_start < available_rows && visible.len() >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let matcher = (!self.search_query.is_empty()).then(SkimMatcherV2::default);

        viewmodel.rows = visible[visible_start..visible_end]
            .iter()
            .enumerate()
            .map(|(relative_idx, entity)| {
                let is_cursor = visible_start + relative_idx == cursor;
                self.compute_row(entity, &data_columns, is_cursor, now, cols, matcher.as_ref())
            })
            .collect();
        viewmodel.cursor_index = cursor.saturating_sub(visible_start);

        viewmodel
    }

    fn compute_row(
        &self,
        entity: &Entity,
        columns: &[Column],
        is_cursor: bool,
        now: DateTime<Utc>,
        cols: usize,
        matcher: Option<&SkimMatcherV2>,
    ) -> RowItem {
        let mut remaining = cols;
        let cells = columns
            .iter()
            .map(|column| {
                let width = column.width().min(remaining);
                remaining = remaining.saturating_sub(width);

                let text = truncate(&column.cell(entity, now), width.saturating_sub(1));
                let highlight_ranges = match (column, matcher) {
                    (Column::Name | Column::Customer | Column::Id | Column::Email, Some(m)) => {
                        self.compute_highlight_ranges(&text, m)
                    }
                    _ => vec![],
                };
                CellItem {
                    text,
                    highlight_ranges,
                }
            })
            .collect();

        RowItem {
            checkbox: self
                .table
                .is_multi_select()
                .then(|| CheckState::from_selected(self.table.is_row_selected(entity))),
            cells,
            is_cursor,
        }
    }

    /// Coalesces fuzzy match indices into `(start, end)` runs.
    /// Character ranges of `text` matched by any whitespace-separated token
    /// of the query, merged into runs.
    fn compute_highlight_ranges(&self, text: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let haystack = text.to_lowercase();
        let indices: BTreeSet<usize> = self
            .search_query
            .to_lowercase()
            .split_whitespace()
            .filter_map(|token| matcher.fuzzy_indices(&haystack, token))
            .flat_map(|(_score, indices)| indices)
            .collect();

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }

    fn select_all_state(&self) -> CheckState {
        if self.table.is_all_visible_selected() {
            CheckState::Checked
        } else if self.table.is_partially_selected() {
            CheckState::Partial
        } else {
            CheckState::Unchecked
        }
    }

    fn compute_action_bar(&self, registry: &ActionRegistry) -> Option<ActionBarInfo> {
        let count = self.table.selection().count();
        if !self.table.is_multi_select() || count == 0 {
            return None;
        }

        let context = self.table.context();
        let actions = registry
            .actions_for(context)
            .iter()
            .enumerate()
            .map(|(idx, action)| ActionItem {
                key: idx + 1,
                label: action.label().to_string(),
                busy: action.is_busy(),
            })
            .collect();

        Some(ActionBarInfo {
            summary: format!("{count} {} selected", context.noun(count)),
            actions,
        })
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = self.table.context().title();
        let visible = self.table.visible_rows().len();
        let total = self.table.rows().len();

        let title = if visible == total {
            format!(" {title} ({total}) ")
        } else {
            format!(" {title} ({visible} of {total}) ")
        };
        HeaderInfo { title }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.input_mode, self.table.is_multi_select()) {
            (InputMode::Search, _) => "/: exit search  Backspace: delete  Type to filter",
            (InputMode::Normal, false) => {
                "j/k: move  m: multi-select  /: search  u/o: users/orders  r: refresh  q: quit"
            }
            (InputMode::Normal, true) => {
                "j/k: move  x: toggle  a: all  c: clear  1-9: action  m: single-row  /: search  q: quit"
            }
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
            hint: self.hint.clone(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        (self.input_mode == InputMode::Search).then(|| SearchBarInfo {
            query: self.search_query.clone(),
        })
    }

    fn compute_empty_state(&self) -> EmptyState {
        let noun = self.table.context().noun(0);
        if self.table.rows().is_empty() {
            EmptyState {
                message: format!("No {noun} loaded"),
                subtitle: "Press r to refresh".to_string(),
            }
        } else {
            EmptyState {
                message: format!("No {noun} match \"{}\"", self.table.filter()),
                subtitle: "Press / to clear the filter".to_string(),
            }
        }
    }

    /// Rows left for the table after subtracting UI chrome.
    ///
    /// Normal mode reserves 6 rows (blank, header, 2 borders, column headers,
    /// footer); search mode 3 more for the search box. The action bar and each
    /// toast take one row.
    const fn calculate_available_rows(&self, total_rows: usize, action_bar: bool, toasts: usize) -> usize {
        let chrome = match self.input_mode {
            InputMode::Normal => 6,
            InputMode::Search => 9,
        };
        let bar = if action_bar { 1 } else { 0 };
        total_rows.saturating_sub(chrome + bar + toasts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::TableMode;
    use crate::bulk::NotificationKind;
    use crate::domain::{Context, Order, SelectionMode, User};

    fn state(mode: TableMode, rows: usize) -> AppState {
        let mut table = TableController::new(Context::Orders, mode, SelectionMode::Multiple);
        table.set_data(
            (1..=rows)
                .map(|i| Entity::from(Order::new(format!("o-{i}"), format!("Customer {i}"), 100)))
                .collect(),
        );
        AppState::new(table, Theme::default())
    }

    #[test]
    fn single_row_mode_has_no_checkboxes_or_bar() {
        let state = state(TableMode::SingleRow, 3);

        let vm = state.compute_viewmodel(&ActionRegistry::builtin(), &[], 24, 80);

        assert_eq!(vm.select_all, None);
        assert!(vm.rows.iter().all(|row| row.checkbox.is_none()));
        assert!(vm.action_bar.is_none());
        assert_eq!(vm.columns[0].title, "ID");
        assert!(vm.rows[0].is_cursor);
    }

    #[test]
    fn checkboxes_follow_the_selection() {
        let mut state = state(TableMode::MultiSelect, 3);
        state.table.toggle_cursor_row();

        let vm = state.compute_viewmodel(&ActionRegistry::builtin(), &[], 24, 80);

        assert_eq!(vm.select_all, Some(CheckState::Partial));
        assert_eq!(vm.rows[0].checkbox, Some(CheckState::Checked));
        assert_eq!(vm.rows[1].checkbox, Some(CheckState::Unchecked));

        state.table.select_all_visible();
        let vm = state.compute_viewmodel(&ActionRegistry::builtin(), &[], 24, 80);
        assert_eq!(vm.select_all, Some(CheckState::Checked));
    }

    #[test]
    fn action_bar_lists_context_actions_with_busy_flags() {
        let mut state = state(TableMode::MultiSelect, 3);
        state.table.select_all_visible();
        let registry = ActionRegistry::builtin();
        registry
            .find_action(Context::Orders, "shipOrders")
            .unwrap()
            .set_busy(true);

        let vm = state.compute_viewmodel(&registry, &[], 24, 80);
        let bar = vm.action_bar.unwrap();

        assert_eq!(bar.summary, "3 orders selected");
        let labels: Vec<(usize, &str, bool)> = bar
            .actions
            .iter()
            .map(|a| (a.key, a.label.as_str(), a.busy))
            .collect();
        assert_eq!(
            labels,
            vec![(1, "Process", false), (2, "Ship", true), (3, "Cancel", false)]
        );
    }

    #[test]
    fn window_keeps_the_cursor_visible() {
        let mut state = state(TableMode::SingleRow, 50);
        for _ in 0..40 {
            state.table.move_cursor_down();
        }

        let vm = state.compute_viewmodel(&ActionRegistry::builtin(), &[], 16, 80);

        assert_eq!(vm.rows.len(), 10);
        assert!(vm.rows[vm.cursor_index].is_cursor);
        assert_eq!(vm.rows[vm.cursor_index].cells[0].text, "o-41");
    }

    #[test]
    fn toasts_are_passed_through() {
        let state = state(TableMode::MultiSelect, 1);
        let toasts = vec![Notification {
            kind: NotificationKind::Failure,
            message: "Ship failed".to_string(),
        }];

        let vm = state.compute_viewmodel(&ActionRegistry::builtin(), &toasts, 24, 80);

        assert_eq!(vm.toasts.len(), 1);
        assert_eq!(vm.toasts[0].kind, NotificationKind::Failure);
    }

    #[test]
    fn empty_states_distinguish_no_data_from_no_match() {
        let table = TableController::new(Context::Users, TableMode::SingleRow, SelectionMode::Multiple);
        let mut state = AppState::new(table, Theme::default());

        let vm = state.compute_viewmodel(&ActionRegistry::builtin(), &[], 24, 80);
        assert_eq!(vm.empty_state.unwrap().message, "No users loaded");

        state
            .table
            .set_data(vec![Entity::from(User::new("u-1", "Ada", "ada@example.com"))]);
        state.search_query = "zzz".to_string();
        state.apply_search_filter();

        let vm = state.compute_viewmodel(&ActionRegistry::builtin(), &[], 24, 80);
        assert_eq!(vm.empty_state.unwrap().message, "No users match \"zzz\"");
        assert_eq!(vm.header.title, " Users (0 of 1) ");
    }

    #[test]
    fn filter_matches_are_highlighted() {
        let mut state = state(TableMode::SingleRow, 3);
        state.input_mode = InputMode::Search;
        state.search_query = "o-2".to_string();
        state.apply_search_filter();

        let vm = state.compute_viewmodel(&ActionRegistry::builtin(), &[], 24, 80);

        assert_eq!(vm.rows.len(), 1);
        assert_eq!(vm.rows[0].cells[0].highlight_ranges, vec![(0, 3)]);
        assert!(vm.search_bar.is_some());
    }

    #[test]
    fn every_filter_token_is_highlighted() {
        let mut table = TableController::new(Context::Orders, TableMode::SingleRow, SelectionMode::Multiple);
        table.set_data(vec![
            Entity::from(Order::new("o-1", "Grace Hopper", 100)),
            Entity::from(Order::new("o-2", "Ada Lovelace", 100)),
        ]);
        let mut state = AppState::new(table, Theme::default());
        state.input_mode = InputMode::Search;
        state.search_query = "hop gra".to_string();
        state.apply_search_filter();

        let vm = state.compute_viewmodel(&ActionRegistry::builtin(), &[], 24, 80);

        assert_eq!(vm.rows.len(), 1);
        assert_eq!(vm.rows[0].cells[1].text, "Grace Hopper");
        assert_eq!(vm.rows[0].cells[1].highlight_ranges, vec![(0, 3), (6, 9)]);
    }
}
