//! Table controller: rows, cursor, filter and the selection they drive.
//!
//! The controller owns the current data batch of one [`Context`] and the
//! [`SelectionSet`] built on top of it. Whenever the set of rows a user can
//! see is replaced (new batch, new filter, new context, new mode) the
//! selection is cleared, so a selection never refers to rows that are gone.
//!
//! Aggregate selection state is computed from counts alone:
//!
//! | selected | visible | all | partial |
//! |---|---|---|---|
//! | 0 | 0 | no | no |
//! | 0 | n | no | no |
//! | k, 0 < k < n | n | no | yes |
//! | n | n | yes | no |

use super::modes::TableMode;
use crate::domain::entity::time_ago;
use crate::domain::{Context, Entity, SelectionMode, SelectionSet};
use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// A table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Checkbox column, present only in multi-select mode.
    Select,
    Id,
    Name,
    Email,
    Customer,
    Total,
    Status,
    LastLogin,
    Created,
}

impl Column {
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Select => "",
            Self::Id => "ID",
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Customer => "Customer",
            Self::Total => "Total",
            Self::Status => "Status",
            Self::LastLogin => "Last login",
            Self::Created => "Created",
        }
    }

    /// Display width in terminal cells.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Select => 3,
            Self::Id => 8,
            Self::Name | Self::Customer => 20,
            Self::Email => 26,
            Self::Total => 10,
            Self::Status | Self::LastLogin | Self::Created => 11,
        }
    }

    /// Cell text for `entity`. The select column renders as a checkbox, so
    /// its text is empty.
    #[must_use]
    pub fn cell(self, entity: &Entity, now: DateTime<Utc>) -> String {
        match (self, entity) {
            (Self::Id, _) => entity.id().to_string(),
            (Self::Name, Entity::User(user)) => user.name.clone(),
            (Self::Email, Entity::User(user)) => user.email.clone(),
            (Self::LastLogin, Entity::User(user)) => user
                .last_login
                .map_or_else(|| "never".to_string(), |at| time_ago(at, now)),
            (Self::Customer, Entity::Order(order)) => order.customer.clone(),
            (Self::Total, Entity::Order(order)) => order.total_display(),
            (Self::Status, _) => entity.status_label().to_string(),
            (Self::Created, Entity::User(user)) => time_ago(user.created_at, now),
            (Self::Created, Entity::Order(order)) => time_ago(order.created_at, now),
            _ => String::new(),
        }
    }
}

/// Rows and selection of the table for one context.
///
/// # Example
///
/// ```
/// use bulkbar::app::{TableController, TableMode};
/// use bulkbar::domain::{Context, Entity, Order, SelectionMode};
///
/// let mut table = TableController::new(Context::Orders, TableMode::MultiSelect, SelectionMode::Multiple);
/// let rows = vec![
///     Entity::from(Order::new("o-1", "Ada", 100)),
///     Entity::from(Order::new("o-2", "Grace", 200)),
/// ];
/// table.set_data(rows.clone());
///
/// table.toggle_row(&rows[0]);
/// assert!(table.is_partially_selected());
///
/// table.select_all_visible();
/// assert!(table.is_all_visible_selected());
/// ```
#[derive(Debug, Clone)]
pub struct TableController {
    context: Context,
    mode: TableMode,
    rows: Vec<Entity>,
    visible: Vec<Entity>,
    filter: String,
    cursor: usize,
    selection: SelectionSet,
}

impl TableController {
    #[must_use]
    pub fn new(context: Context, mode: TableMode, multiplicity: SelectionMode) -> Self {
        Self {
            context,
            mode,
            rows: Vec::new(),
            visible: Vec::new(),
            filter: String::new(),
            cursor: 0,
            selection: SelectionSet::new(multiplicity),
        }
    }

    #[must_use]
    pub const fn context(&self) -> Context {
        self.context
    }

    #[must_use]
    pub const fn mode(&self) -> TableMode {
        self.mode
    }

    /// The full batch, unfiltered.
    #[must_use]
    pub fn rows(&self) -> &[Entity] {
        &self.rows
    }

    /// Rows passing the current filter, in batch order.
    #[must_use]
    pub fn visible_rows(&self) -> &[Entity] {
        &self.visible
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The visible row under the cursor.
    #[must_use]
    pub fn cursor_row(&self) -> Option<&Entity> {
        self.visible.get(self.cursor)
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Selected entities in selection order.
    #[must_use]
    pub fn selected(&self) -> Vec<Entity> {
        self.selection.selected()
    }

    #[must_use]
    pub fn is_row_selected(&self, entity: &Entity) -> bool {
        self.selection.is_selected(entity)
    }

    /// Replaces the batch.
    ///
    /// The selection is cleared unconditionally, even when `batch` holds the
    /// same records as before. The cursor stays put when still in range.
    pub fn set_data(&mut self, batch: Vec<Entity>) {
        let _span = tracing::debug_span!("set_data", context = %self.context, rows = batch.len()).entered();

        self.rows = batch;
        self.selection.clear();
        self.refilter();
    }

    /// Switches between single-row and multi-select mode.
    ///
    /// Any actual transition clears the selection. Setting the current mode
    /// again changes nothing.
    pub fn set_multi_select_enabled(&mut self, enabled: bool) {
        let mode = TableMode::from_enabled(enabled);
        if mode == self.mode {
            return;
        }

        tracing::debug!(from = ?self.mode, to = ?mode, cleared = self.selection.count(), "table mode changed");
        self.mode = mode;
        self.selection.clear();
    }

    #[must_use]
    pub const fn is_multi_select(&self) -> bool {
        self.mode.is_multi_select()
    }

    /// Toggles `entity`'s selection. Returns whether anything changed.
    ///
    /// No-op in single-row mode or when `entity` is not a visible row.
    pub fn toggle_row(&mut self, entity: &Entity) -> bool {
        if !self.is_multi_select() || !self.is_visible(entity) {
            return false;
        }
        self.selection.toggle(entity);
        true
    }

    /// Toggles the row under the cursor.
    pub fn toggle_cursor_row(&mut self) -> bool {
        match self.cursor_row().cloned() {
            Some(entity) => self.toggle_row(&entity),
            None => false,
        }
    }

    /// Selects every visible row. No-op in single-row mode.
    pub fn select_all_visible(&mut self) {
        if !self.is_multi_select() {
            return;
        }
        for entity in &self.visible {
            self.selection.select(entity);
        }
    }

    /// Deselects every visible row.
    pub fn deselect_all_visible(&mut self) {
        for entity in &self.visible {
            self.selection.deselect(entity);
        }
    }

    /// Header checkbox behavior: deselect all when everything visible is
    /// selected, select all otherwise.
    pub fn toggle_all_visible(&mut self) {
        if self.is_all_visible_selected() {
            self.deselect_all_visible();
        } else {
            self.select_all_visible();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn is_all_visible_selected(&self) -> bool {
        let visible = self.visible.len();
        visible > 0 && self.selection.count() == visible
    }

    #[must_use]
    pub fn is_partially_selected(&self) -> bool {
        let count = self.selection.count();
        count > 0 && count < self.visible.len()
    }

    /// Column layout for the current context and mode.
    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        let data: &[Column] = match self.context {
            Context::Users => &[Column::Name, Column::Email, Column::Status, Column::LastLogin],
            Context::Orders => &[Column::Id, Column::Customer, Column::Total, Column::Status, Column::Created],
        };

        let mut columns = Vec::with_capacity(data.len() + 1);
        if self.is_multi_select() {
            columns.push(Column::Select);
        }
        columns.extend_from_slice(data);
        columns
    }

    /// Narrows the visible rows to those fuzzy-matching every whitespace
    /// separated token of `query`. Clears the selection when the query
    /// changes.
    pub fn set_filter(&mut self, query: &str) {
        if query == self.filter {
            return;
        }
        self.filter = query.to_string();
        self.selection.clear();
        self.refilter();
    }

    /// Switches to another context. Rows and selection are dropped until the
    /// next [`set_data`](Self::set_data).
    pub fn set_context(&mut self, context: Context) {
        if context == self.context {
            return;
        }

        tracing::debug!(from = %self.context, to = %context, "table context changed");
        self.context = context;
        self.rows.clear();
        self.visible.clear();
        self.filter.clear();
        self.cursor = 0;
        self.selection.clear();
    }

    /// Moves the cursor down one row, wrapping to the top.
    pub fn move_cursor_down(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.visible.len();
    }

    /// Moves the cursor up one row, wrapping to the bottom.
    pub fn move_cursor_up(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        if self.cursor == 0 {
            self.cursor = self.visible.len() - 1;
        } else {
            self.cursor -= 1;
        }
    }

    fn is_visible(&self, entity: &Entity) -> bool {
        self.visible.iter().any(|row| row.id() == entity.id())
    }

    fn refilter(&mut self) {
        let tokens: Vec<String> = self
            .filter
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        self.visible = if tokens.is_empty() {
            self.rows.clone()
        } else {
            let matcher = SkimMatcherV2::default();
            self.rows
                .iter()
                .filter(|entity| {
                    let text = entity.search_text().to_lowercase();
                    tokens.iter().all(|token| matcher.fuzzy_match(&text, token).is_some())
                })
                .cloned()
                .collect()
        };

        if self.visible.is_empty() {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.min(self.visible.len() - 1);
        }

        tracing::debug!(visible = self.visible.len(), total = self.rows.len(), "rows filtered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, OrderStatus, User};

    fn orders(n: usize) -> Vec<Entity> {
        (1..=n)
            .map(|i| Entity::from(Order::new(format!("o-{i}"), format!("Customer {i}"), 1000)))
            .collect()
    }

    fn multi(rows: Vec<Entity>) -> TableController {
        let mut table = TableController::new(Context::Orders, TableMode::MultiSelect, SelectionMode::Multiple);
        table.set_data(rows);
        table
    }

    #[test]
    fn toggle_twice_restores_the_selection() {
        let rows = orders(3);
        let mut table = multi(rows.clone());
        table.toggle_row(&rows[2]);

        table.toggle_row(&rows[0]);
        table.toggle_row(&rows[0]);

        let ids: Vec<&str> = table.selection().ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["o-3"]);
    }

    #[test]
    fn select_all_then_deselect_all() {
        let rows = orders(4);
        let mut table = multi(rows);

        table.select_all_visible();
        assert!(table.is_all_visible_selected());
        assert!(!table.is_partially_selected());

        table.deselect_all_visible();
        assert_eq!(table.selection().count(), 0);
        assert!(!table.is_all_visible_selected());
    }

    #[test]
    fn aggregate_flags_follow_counts() {
        let rows = orders(3);
        let mut table = multi(rows.clone());
        assert!(!table.is_all_visible_selected());
        assert!(!table.is_partially_selected());

        table.toggle_row(&rows[0]);
        assert!(table.is_partially_selected());
        assert!(!table.is_all_visible_selected());

        table.toggle_row(&rows[1]);
        table.toggle_row(&rows[2]);
        assert!(table.is_all_visible_selected());
        assert!(!table.is_partially_selected());
    }

    #[test]
    fn empty_table_is_never_all_selected() {
        let mut table = multi(vec![]);

        table.select_all_visible();

        assert!(!table.is_all_visible_selected());
        assert!(!table.is_partially_selected());
    }

    #[test]
    fn identical_batch_still_clears_selection() {
        let rows = orders(2);
        let mut table = multi(rows.clone());
        table.select_all_visible();

        table.set_data(rows);

        assert_eq!(table.selection().count(), 0);
    }

    #[test]
    fn selection_matches_refreshed_snapshots_by_id() {
        let rows = orders(2);
        let mut table = multi(rows.clone());
        table.toggle_row(&rows[0]);

        let mut processed = rows[0].as_order().unwrap().clone();
        processed.status = OrderStatus::Processed;

        assert!(table.is_row_selected(&Entity::from(processed)));
    }

    #[test]
    fn turning_multi_select_off_clears_and_drops_select_column() {
        let rows = orders(2);
        let mut table = multi(rows.clone());
        table.select_all_visible();
        assert_eq!(table.columns()[0], Column::Select);

        table.set_multi_select_enabled(false);

        assert_eq!(table.selection().count(), 0);
        assert!(!table.columns().contains(&Column::Select));

        table.set_multi_select_enabled(true);
        assert_eq!(table.selection().count(), 0);
        assert_eq!(table.columns()[0], Column::Select);
    }

    #[test]
    fn single_row_mode_ignores_selection_requests() {
        let rows = orders(3);
        let mut table = TableController::new(Context::Orders, TableMode::SingleRow, SelectionMode::Multiple);
        table.set_data(rows.clone());

        assert!(!table.toggle_row(&rows[0]));
        table.select_all_visible();

        assert_eq!(table.selection().count(), 0);
        table.move_cursor_down();
        assert_eq!(table.cursor_row(), Some(&rows[1]));
    }

    #[test]
    fn single_multiplicity_keeps_one_row() {
        let rows = orders(3);
        let mut table = TableController::new(Context::Orders, TableMode::MultiSelect, SelectionMode::Single);
        table.set_data(rows.clone());

        table.toggle_row(&rows[0]);
        table.toggle_row(&rows[1]);

        assert_eq!(table.selected(), vec![rows[1].clone()]);
    }

    #[test]
    fn rows_outside_the_view_cannot_be_toggled() {
        let mut table = multi(orders(2));

        assert!(!table.toggle_row(&Entity::from(Order::new("o-99", "Nobody", 1))));
        assert!(table.selection().is_empty());
    }

    #[test]
    fn filter_narrows_rows_and_clears_selection() {
        let rows = vec![
            Entity::from(User::new("u-1", "Ada Lovelace", "ada@example.com")),
            Entity::from(User::new("u-2", "Grace Hopper", "grace@example.com")),
            Entity::from(User::new("u-3", "Alan Turing", "alan@example.com")),
        ];
        let mut table = TableController::new(Context::Users, TableMode::MultiSelect, SelectionMode::Multiple);
        table.set_data(rows.clone());
        table.toggle_row(&rows[1]);

        table.set_filter("grace");

        assert_eq!(table.visible_rows(), &rows[1..2]);
        assert!(table.selection().is_empty());

        table.select_all_visible();
        assert!(table.is_all_visible_selected());
        assert_eq!(table.rows().len(), 3);
    }

    #[test]
    fn context_switch_drops_rows_and_selection() {
        let mut table = multi(orders(2));
        table.select_all_visible();

        table.set_context(Context::Users);

        assert_eq!(table.context(), Context::Users);
        assert!(table.rows().is_empty());
        assert!(table.selection().is_empty());
        assert_eq!(table.columns()[1], Column::Name);
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut table = multi(orders(3));

        table.move_cursor_up();
        assert_eq!(table.cursor(), 2);
        table.move_cursor_down();
        assert_eq!(table.cursor(), 0);
    }

    #[test]
    fn cursor_is_clamped_when_rows_shrink() {
        let mut table = multi(orders(5));
        for _ in 0..4 {
            table.move_cursor_down();
        }

        table.set_data(orders(2));

        assert_eq!(table.cursor(), 1);
    }

    #[test]
    fn cells_render_per_variant() {
        let now = Utc::now();
        let order = Entity::from(Order::new("o-1", "Ada", 1250));

        assert_eq!(Column::Total.cell(&order, now), "$12.50");
        assert_eq!(Column::Status.cell(&order, now), "pending");
        assert_eq!(Column::Email.cell(&order, now), "");

        let user = Entity::from(User::new("u-1", "Ada", "ada@example.com"));
        assert_eq!(Column::LastLogin.cell(&user, now), "never");
    }
}
