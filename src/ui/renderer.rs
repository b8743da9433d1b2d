//! Top-level rendering coordinator.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to specialized component renderers
//!
//! The result is one complete frame, starting with a clear-screen sequence,
//! that the runtime writes to the terminal in one go.

use crate::app::AppState;
use crate::bulk::{ActionRegistry, Notification};
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Clears the screen and homes the cursor.
const CLEAR_SCREEN: &str = "\u{1b}[2J\u{1b}[H";

/// Renders the current state into an ANSI frame.
///
/// # Parameters
///
/// * `state` - Current application state
/// * `registry` - Action registry, for the action bar and busy flags
/// * `toasts` - Recent notifications, oldest first
/// * `rows` - Terminal height in rows
/// * `cols` - Terminal width in columns
#[must_use]
pub fn render(state: &AppState, registry: &ActionRegistry, toasts: &[Notification], rows: usize, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel(registry, toasts, rows, cols);

    render_viewmodel(&viewmodel, &state.theme, rows, cols)
}

/// Renders a view model with the layout matching its input mode.
#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let mut out = String::from(CLEAR_SCREEN);

    if let Some(search) = &vm.search_bar {
        components::render_search_mode(&mut out, vm, search, theme, cols, rows);
    } else {
        components::render_normal_mode(&mut out, vm, theme, cols, rows);
    }

    out
}
