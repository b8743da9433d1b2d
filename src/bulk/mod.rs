//! Bulk actions over a selection.
//!
//! - [`registry`]: which actions exist per context, and whether each is busy
//! - [`operations`]: what each action does to a batch of entities
//! - [`dispatcher`]: runs an action and reports its lifecycle
//! - [`notify`]: where lifecycle notifications go

pub mod dispatcher;
pub mod error;
pub mod notify;
pub mod operations;
pub mod registry;

pub use dispatcher::{ActionDispatcher, DispatchOutcome};
pub use error::{DispatchError, OperationError};
pub use notify::{Notification, NotificationKind, Notifier, ToastLog};
pub use operations::{BatchOperation, OperationTable, SimulatedOperation, Transition};
pub use registry::{ActionDescriptor, ActionRegistry};
