//! Bulkbar: a terminal data table with multi-row selection and a
//! context-sensitive bulk-action bar.
//!
//! Bulkbar provides:
//! - A table of users or orders with single-row and multi-select modes
//! - A selection set keyed by record identity that survives re-sorting and
//!   reloads of equal data
//! - A bulk-action bar listing the actions registered for the current context
//! - An asynchronous dispatcher that runs one batch operation per action at a
//!   time and reports progress through toast notifications

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal runtime (main.rs)                         │  ← stdin commands
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, effects                          │
//! │  - Table controller and selection                   │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Bulk Layer    │   │ Storage Layer │
//! │ (ui/)         │   │ (bulk/)       │   │ (storage/)    │
//! │ - Rendering   │   │ - Registry    │   │ - DataSource  │
//! │ - Theming     │   │ - Dispatcher  │   │ - In-memory   │
//! │ - Components  │   │ - Toasts      │   │   store       │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Users, orders, selection set (domain/)           │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber writing a rotating log file   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with the event/effect model
//! - [`bulk`]: Action registry, batch operations, dispatcher, notifications
//! - [`config`]: Runtime configuration from TOML and `key=value` arguments
//! - [`domain`]: Core domain types (entities, selection set, errors)
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`storage`]: The data collaborator and its in-memory implementation
//! - [`ui`]: Terminal rendering with theme support
//! - [`observability`]: Log file setup for `tracing`
//!
//! # Event Flow
//!
//! 1. The runtime turns a line of input into an [`Event`]
//! 2. [`handle_event`] updates [`AppState`] and returns [`Effect`]s
//! 3. The runtime executes effects: loading a batch from the data source or
//!    handing a selection to the [`bulk::ActionDispatcher`]
//! 4. Finished dispatches come back as [`Event::ActionFinished`]
//! 5. The frame is rebuilt from a fresh view model
//!
//! # Example
//!
//! ```rust
//! use bulkbar::bulk::ActionRegistry;
//! use bulkbar::domain::{Context, Entity, Order};
//! use bulkbar::{handle_event, initialize, Config, Effect, Event};
//!
//! let registry = ActionRegistry::builtin();
//! let mut state = initialize(&Config::default());
//!
//! let (_, effects) = handle_event(&mut state, &registry, &Event::SwitchContext(Context::Orders))?;
//! assert_eq!(effects, vec![Effect::LoadBatch(Context::Orders)]);
//!
//! let orders: Vec<Entity> = vec![Order::new("o-1", "Ada", 1200).into()];
//! let loaded = Event::BatchLoaded { context: Context::Orders, entities: orders };
//! handle_event(&mut state, &registry, &loaded)?;
//! handle_event(&mut state, &registry, &Event::ToggleRow)?;
//! assert_eq!(state.table.selection().count(), 1);
//! # Ok::<(), bulkbar::BulkbarError>(())
//! ```

pub mod app;
pub mod bulk;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod storage;

pub mod ui;

pub mod observability;

pub use app::{handle_event, AppState, Effect, Event, InputMode, TableMode};
pub use config::Config;
pub use domain::{BulkbarError, Result};
pub use ui::Theme;

use app::TableController;

/// Builds the initial application state.
///
/// The table starts empty in the configured context and mode; rows arrive
/// through the first [`Effect::LoadBatch`]. The theme comes from
/// `theme_file`, then `theme_name`, then the default.
///
/// # Parameters
///
/// * `config` - Runtime configuration
///
/// # Returns
///
/// An `AppState` ready for event processing.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        context = %config.context,
        multi_select = config.multi_select,
        selection = ?config.selection,
        "initializing bulkbar"
    );

    let theme_path = config.theme_path();
    let theme = Theme::resolve(config.theme_name.as_deref(), theme_path.as_deref());

    let table = TableController::new(
        config.context,
        TableMode::from_enabled(config.multi_select),
        config.selection,
    );

    AppState::new(table, theme)
}
