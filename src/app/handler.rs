//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place application state changes. It reads the
//! action registry to refuse bulk actions that cannot run, but never starts
//! one itself: it returns [`Effect`]s and the runtime feeds the results back as
//! [`Event::BatchLoaded`] and [`Event::ActionFinished`].
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`
//! - **Selection**: `ToggleRow`, `SelectAll`, `ClearSelection`, `ToggleMultiSelect`
//! - **Data**: `SwitchContext`, `Refresh`, `BatchLoaded`
//! - **Search**: `SearchMode`, `ExitSearch`, `Char`, `Backspace`
//! - **Bulk actions**: `InvokeAction`, `ActionFinished`
//!
//! # Example
//!
//! ```
//! use bulkbar::app::{handle_event, AppState, Effect, Event, TableController, TableMode};
//! use bulkbar::bulk::ActionRegistry;
//! use bulkbar::domain::{Context, SelectionMode};
//! use bulkbar::ui::Theme;
//!
//! let table = TableController::new(Context::Users, TableMode::SingleRow, SelectionMode::Multiple);
//! let mut state = AppState::new(table, Theme::default());
//! let registry = ActionRegistry::builtin();
//!
//! let (_, effects) = handle_event(&mut state, &registry, &Event::SwitchContext(Context::Orders))?;
//! assert_eq!(effects, vec![Effect::LoadBatch(Context::Orders)]);
//! # Ok::<(), bulkbar::BulkbarError>(())
//! ```

use super::effects::Effect;
use super::modes::InputMode;
use super::state::AppState;
use crate::bulk::{ActionRegistry, DispatchOutcome};
use crate::domain::error::Result;
use crate::domain::{Context, Entity};

/// Events triggered by user input or by completed effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the cursor down one row (wraps to top).
    KeyDown,
    /// Moves the cursor up one row (wraps to bottom).
    KeyUp,
    /// Toggles the row under the cursor.
    ToggleRow,
    /// Header checkbox: selects every visible row, or deselects them all when
    /// they are all selected already.
    SelectAll,
    /// Clears the selection.
    ClearSelection,
    /// Switches between single-row and multi-select mode.
    ToggleMultiSelect,
    /// Shows another context and loads its batch.
    SwitchContext(Context),
    /// Reloads the current batch.
    Refresh,
    /// Enters search mode with an empty query.
    SearchMode,
    /// Leaves search mode and clears the filter.
    ExitSearch,
    /// Appends a character to the search query.
    Char(char),
    /// Removes the last character from the search query.
    Backspace,
    /// Runs the n-th action of the active context (zero-based) over the
    /// selection.
    InvokeAction(usize),
    /// A batch requested with [`Effect::LoadBatch`] arrived.
    BatchLoaded { context: Context, entities: Vec<Entity> },
    /// A dispatched bulk action settled.
    ActionFinished(DispatchOutcome),
    /// Stops the application.
    Quit,
}

/// Processes an event, mutates application state, and returns effects to run.
///
/// # Returns
///
/// `(needs_render, effects)`: whether anything visible changed, and the
/// effects to execute in order.
///
/// # Errors
///
/// None of the current events fail; the `Result` leaves room for handlers
/// that reach into fallible collaborators.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, registry: &ActionRegistry, event: &Event) -> Result<(bool, Vec<Effect>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    state.hint = None;

    match event {
        Event::KeyDown => {
            state.table.move_cursor_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.table.move_cursor_up();
            Ok((true, vec![]))
        }
        Event::ToggleRow => {
            if !state.table.is_multi_select() {
                state.hint = Some("Turn on multi-select with m to select rows".to_string());
                return Ok((true, vec![]));
            }
            let changed = state.table.toggle_cursor_row();
            tracing::debug!(changed, selected = state.table.selection().count(), "row toggled");
            Ok((changed, vec![]))
        }
        Event::SelectAll => {
            if !state.table.is_multi_select() {
                state.hint = Some("Turn on multi-select with m to select rows".to_string());
                return Ok((true, vec![]));
            }
            state.table.toggle_all_visible();
            Ok((true, vec![]))
        }
        Event::ClearSelection => {
            let had_selection = !state.table.selection().is_empty();
            state.table.clear_selection();
            Ok((had_selection, vec![]))
        }
        Event::ToggleMultiSelect => {
            let enabled = !state.table.is_multi_select();
            state.table.set_multi_select_enabled(enabled);
            Ok((true, vec![]))
        }
        Event::SwitchContext(context) => {
            tracing::debug!(from = %state.table.context(), to = %context, "switching context");
            state.input_mode = InputMode::Normal;
            state.search_query.clear();
            state.table.set_context(*context);
            Ok((true, vec![Effect::LoadBatch(*context)]))
        }
        Event::Refresh => Ok((false, vec![Effect::LoadBatch(state.table.context())])),
        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search;
            state.search_query.clear();
            state.apply_search_filter();
            Ok((true, vec![]))
        }
        Event::ExitSearch => {
            tracing::debug!(query = %state.search_query, "exiting search mode");
            state.input_mode = InputMode::Normal;
            state.search_query.clear();
            state.apply_search_filter();
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            if state.input_mode != InputMode::Search {
                return Ok((false, vec![]));
            }
            state.search_query.push(*c);
            tracing::trace!(query = %state.search_query, char = %c, "search query updated");
            state.apply_search_filter();
            Ok((true, vec![]))
        }
        Event::Backspace => {
            if state.input_mode != InputMode::Search {
                return Ok((false, vec![]));
            }
            state.search_query.pop();
            state.apply_search_filter();
            Ok((true, vec![]))
        }
        Event::InvokeAction(index) => Ok(invoke_action(state, registry, *index)),
        Event::BatchLoaded { context, entities } => {
            if *context != state.table.context() {
                tracing::debug!(loaded = %context, active = %state.table.context(), "dropping stale batch");
                return Ok((false, vec![]));
            }
            tracing::debug!(context = %context, rows = entities.len(), "batch loaded");
            state.table.set_data(entities.clone());
            Ok((true, vec![]))
        }
        Event::ActionFinished(outcome) => {
            if !outcome.clears_selection() {
                return Ok((true, vec![]));
            }
            if outcome.context() != state.table.context() {
                return Ok((true, vec![]));
            }
            state.table.clear_selection();
            Ok((true, vec![Effect::LoadBatch(outcome.context())]))
        }
        Event::Quit => Ok((false, vec![Effect::Quit])),
    }
}

/// Validates a bulk-action request against the table and registry and turns
/// it into a dispatch effect, or into a footer hint when it cannot run.
fn invoke_action(state: &mut AppState, registry: &ActionRegistry, index: usize) -> (bool, Vec<Effect>) {
    let context = state.table.context();
    let Some(action) = registry.actions_for(context).get(index) else {
        state.hint = Some(format!("No action {} for {context}", index + 1));
        return (true, vec![]);
    };

    if state.table.selection().is_empty() {
        state.hint = Some(format!("Select {} to {}", context.noun(2), action.label().to_lowercase()));
        return (true, vec![]);
    }
    if action.is_busy() {
        state.hint = Some(format!("{} is still running", action.label()));
        return (true, vec![]);
    }

    let entities = state.table.selected();
    tracing::debug!(context = %context, action = %action.name(), count = entities.len(), "dispatching bulk action");
    (
        true,
        vec![Effect::Dispatch {
            context,
            action: action.name().to_string(),
            entities,
        }],
    )
}
