//! Application layer coordinating table state, events and effects.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Command → Event → handle_event → State Mutations → Effects → Runtime
//!                        ↑                                        │
//!                        └──── BatchLoaded / ActionFinished ──────┘
//! ```
//!
//! # Modules
//!
//! - [`table`]: Rows, cursor, filter and selection of one context
//! - [`handler`]: Event processing and state transitions
//! - [`effects`]: Side effects returned by the handler
//! - [`modes`]: Table and input modes
//! - [`state`]: Application state and view model computation

pub mod effects;
pub mod handler;
pub mod modes;
pub mod state;
pub mod table;

pub use effects::Effect;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, TableMode};
pub use state::AppState;
pub use table::{Column, TableController};
