//! Errors raised around bulk-action dispatch.
//!
//! Two classes are kept apart:
//!
//! - [`DispatchError`]: the caller asked for something it must never ask for
//!   (unknown action, empty selection, re-entering a busy action). Returned to
//!   the caller; never shown to the user as a notification.
//! - [`OperationError`]: the bulk operation itself failed. Caught by the
//!   dispatcher and reported through a failure notification.

use crate::domain::{Context, EntityId};
use thiserror::Error;

/// Configuration or invalid-invocation error returned by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No action with this name is declared for the context.
    #[error("no action `{name}` is declared for {context}")]
    UnknownAction { context: Context, name: String },

    /// A declared action has no operation in the operation table.
    #[error("action `{name}` for {context} has no registered operation")]
    MissingOperation { context: Context, name: String },

    /// An action name was declared twice for the same context.
    #[error("action `{name}` is already declared for {context}")]
    DuplicateAction { context: Context, name: String },

    /// Dispatch was requested with nothing selected.
    #[error("action `{name}` invoked with an empty selection")]
    EmptySelection { name: String },

    /// The action is still running from a previous invocation.
    #[error("action `{name}` is already running")]
    Busy { name: String },
}

/// Failure of a bulk operation, reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// The simulated backend refused one record, failing the whole batch.
    #[error("{id} rejected: {reason}")]
    Rejected { id: EntityId, reason: String },

    /// A record of another context was passed to the operation.
    #[error("{id} is not one of the {expected}")]
    WrongKind { id: EntityId, expected: Context },

    /// The data collaborator refused the updated batch.
    #[error("could not store updated batch: {0}")]
    Storage(String),
}
