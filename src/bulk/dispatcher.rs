//! Bulk-action dispatcher.
//!
//! The dispatcher runs one bulk action against a selection and walks it
//! through a fixed lifecycle:
//!
//! ```text
//! resolve → busy on → "started" → operation.await → replace batch → "success" → busy off
//!                                          └──── error ─────────→ "failure" → busy off
//! ```
//!
//! Everything up to the "started" notification happens synchronously inside
//! [`ActionDispatcher::invoke`]; the returned future covers the rest. That
//! keeps the busy flag observable the moment a call site hands an action over,
//! and makes the operation the only suspension point.

use super::error::{DispatchError, OperationError};
use super::notify::{NotificationKind, Notifier};
use super::operations::OperationTable;
use super::registry::{ActionDescriptor, ActionRegistry};
use crate::domain::{Context, Entity};
use crate::storage::DataSource;
use futures_util::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Duration;

/// How a dispatched action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The operation succeeded and the data collaborator holds the updates.
    Succeeded {
        context: Context,
        action: String,
        updated: Vec<Entity>,
    },
    /// The operation failed; nothing was stored.
    Failed {
        context: Context,
        action: String,
        error: OperationError,
    },
}

impl DispatchOutcome {
    #[must_use]
    pub const fn context(&self) -> Context {
        match self {
            Self::Succeeded { context, .. } | Self::Failed { context, .. } => *context,
        }
    }

    #[must_use]
    pub fn action(&self) -> &str {
        match self {
            Self::Succeeded { action, .. } | Self::Failed { action, .. } => action,
        }
    }

    /// Whether the caller should clear its selection.
    ///
    /// Only successful actions clear; after a failure the selection stays so
    /// the user can retry.
    #[must_use]
    pub const fn clears_selection(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Holds an action's busy flag for the lifetime of one invocation.
struct BusyGuard<'a> {
    descriptor: &'a ActionDescriptor,
}

impl<'a> BusyGuard<'a> {
    fn engage(descriptor: &'a ActionDescriptor) -> Self {
        descriptor.set_busy(true);
        Self { descriptor }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.descriptor.set_busy(false);
    }
}

/// Executes bulk actions against the current selection.
pub struct ActionDispatcher {
    registry: ActionRegistry,
    operations: OperationTable,
    data: Rc<dyn DataSource>,
    notifier: Rc<dyn Notifier>,
}

impl ActionDispatcher {
    /// Creates a dispatcher, checking that every declared action can run.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingOperation`] for the first declared
    /// action with no entry in `operations`.
    pub fn new(
        registry: ActionRegistry,
        operations: OperationTable,
        data: Rc<dyn DataSource>,
        notifier: Rc<dyn Notifier>,
    ) -> Result<Self, DispatchError> {
        if let Some((context, missing)) = registry
            .iter()
            .find(|(_, action)| !operations.contains(action.name()))
        {
            return Err(DispatchError::MissingOperation {
                context,
                name: missing.name().to_string(),
            });
        }

        Ok(Self {
            registry,
            operations,
            data,
            notifier,
        })
    }

    /// Dispatcher over the built-in actions with simulated `latency`.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in tables; the `Result` mirrors [`Self::new`].
    pub fn builtin(
        latency: Duration,
        data: Rc<dyn DataSource>,
        notifier: Rc<dyn Notifier>,
    ) -> Result<Self, DispatchError> {
        Self::new(ActionRegistry::builtin(), OperationTable::builtin(latency), data, notifier)
    }

    #[must_use]
    pub const fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Starts `action_name` over `selected`.
    ///
    /// On `Ok`, the action is already marked busy and its "started"
    /// notification sent; awaiting the returned future completes it. Dropping
    /// the future without awaiting it releases the busy flag.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnknownAction`] if the action is not declared for `context`
    /// - [`DispatchError::MissingOperation`] if the action has no operation
    /// - [`DispatchError::EmptySelection`] if `selected` is empty
    /// - [`DispatchError::Busy`] if the same action is still running
    ///
    /// None of these start anything or emit a notification.
    pub fn invoke(
        &self,
        context: Context,
        action_name: &str,
        selected: Vec<Entity>,
    ) -> Result<LocalBoxFuture<'_, DispatchOutcome>, DispatchError> {
        let descriptor = self.registry.find_action(context, action_name)?;
        let operation = self
            .operations
            .get(action_name)
            .ok_or_else(|| DispatchError::MissingOperation {
                context,
                name: action_name.to_string(),
            })?;

        if selected.is_empty() {
            return Err(DispatchError::EmptySelection {
                name: action_name.to_string(),
            });
        }
        if descriptor.is_busy() {
            tracing::warn!(context = %context, action = %action_name, "rejected re-entrant bulk action");
            return Err(DispatchError::Busy {
                name: action_name.to_string(),
            });
        }

        let guard = BusyGuard::engage(descriptor);
        let count = selected.len();
        let noun = context.noun(count);
        let label = descriptor.label().to_string();
        let action = descriptor.name().to_string();

        tracing::info!(context = %context, action = %action, count, "bulk action started");
        self.notifier
            .notify(NotificationKind::Started, &format!("{label}: updating {count} {noun}"));

        let pending = operation.run(selected);

        Ok(Box::pin(async move {
            let _guard = guard;

            let stored = match pending.await {
                Ok(updated) => self
                    .data
                    .replace_batch(context, updated.clone())
                    .map(|()| updated)
                    .map_err(|e| OperationError::Storage(e.to_string())),
                Err(error) => Err(error),
            };

            match stored {
                Ok(updated) => {
                    tracing::info!(context = %context, action = %action, count, "bulk action succeeded");
                    self.notifier
                        .notify(NotificationKind::Success, &format!("{label}: {count} {noun} updated"));
                    DispatchOutcome::Succeeded {
                        context,
                        action,
                        updated,
                    }
                }
                Err(error) => {
                    tracing::warn!(context = %context, action = %action, error = %error, "bulk action failed");
                    self.notifier
                        .notify(NotificationKind::Failure, &format!("{label} failed: {error}"));
                    DispatchOutcome::Failed {
                        context,
                        action,
                        error,
                    }
                }
            }
        }))
    }
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("registry", &self.registry)
            .field("operations", &self.operations)
            .finish_non_exhaustive()
    }
}
