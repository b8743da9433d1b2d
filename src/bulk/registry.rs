//! Per-context registry of bulk actions.
//!
//! The registry maps each [`Context`] to its actions in declaration order. It
//! is built once at startup and handed to the dispatcher, which owns it; the
//! only runtime mutation is an action's busy flag.

use super::error::DispatchError;
use crate::domain::Context;
use std::cell::Cell;
use std::collections::BTreeMap;

/// A named, labelled bulk action with its own busy flag.
///
/// Descriptors say *what* is offered; how an action executes lives in the
/// dispatcher's operation table, looked up by [`name`](Self::name).
#[derive(Debug)]
pub struct ActionDescriptor {
    name: String,
    label: String,
    busy: Cell<bool>,
}

impl ActionDescriptor {
    fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            busy: Cell::new(false),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether an invocation of this action is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    pub(crate) fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }
}

/// Ordered bulk actions per context.
///
/// # Example
///
/// ```
/// use bulkbar::bulk::ActionRegistry;
/// use bulkbar::domain::Context;
///
/// let registry = ActionRegistry::builtin();
/// let names: Vec<&str> = registry
///     .actions_for(Context::Orders)
///     .iter()
///     .map(|action| action.name())
///     .collect();
/// assert_eq!(names, vec!["processOrders", "shipOrders", "cancelOrders"]);
/// ```
#[derive(Debug, Default)]
pub struct ActionRegistry {
    contexts: BTreeMap<Context, Vec<ActionDescriptor>>,
}

impl ActionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the actions shipped for users and orders.
    #[must_use]
    pub fn builtin() -> Self {
        let declarations: [(Context, &str, &str); 6] = [
            (Context::Users, "activateUsers", "Activate"),
            (Context::Users, "suspendUsers", "Suspend"),
            (Context::Users, "resetPasswords", "Reset passwords"),
            (Context::Orders, "processOrders", "Process"),
            (Context::Orders, "shipOrders", "Ship"),
            (Context::Orders, "cancelOrders", "Cancel"),
        ];

        let mut contexts: BTreeMap<Context, Vec<ActionDescriptor>> = BTreeMap::new();
        for (context, name, label) in declarations {
            contexts
                .entry(context)
                .or_default()
                .push(ActionDescriptor::new(name, label));
        }
        Self { contexts }
    }

    /// Appends an action to a context's list.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DuplicateAction`] if the name is already
    /// declared for `context`.
    pub fn register(
        &mut self,
        context: Context,
        name: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<(), DispatchError> {
        let name = name.into();
        let actions = self.contexts.entry(context).or_default();
        if actions.iter().any(|action| action.name == name) {
            return Err(DispatchError::DuplicateAction { context, name });
        }

        tracing::debug!(context = %context, action = %name, "bulk action registered");
        actions.push(ActionDescriptor::new(name, label));
        Ok(())
    }

    /// Actions for `context` in declaration order; empty if none are declared.
    #[must_use]
    pub fn actions_for(&self, context: Context) -> &[ActionDescriptor] {
        self.contexts
            .get(&context)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolves an action by name.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownAction`] if `name` is not declared for
    /// `context`. This is a configuration error on the caller's side.
    pub fn find_action(&self, context: Context, name: &str) -> Result<&ActionDescriptor, DispatchError> {
        self.actions_for(context)
            .iter()
            .find(|action| action.name == name)
            .ok_or_else(|| DispatchError::UnknownAction {
                context,
                name: name.to_string(),
            })
    }

    /// All declarations as `(context, descriptor)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Context, &ActionDescriptor)> {
        self.contexts
            .iter()
            .flat_map(|(context, actions)| actions.iter().map(move |action| (*context, action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keeps_declaration_order() {
        let registry = ActionRegistry::builtin();
        let labels: Vec<&str> = registry
            .actions_for(Context::Users)
            .iter()
            .map(ActionDescriptor::label)
            .collect();

        assert_eq!(labels, vec!["Activate", "Suspend", "Reset passwords"]);
    }

    #[test]
    fn find_action_is_scoped_to_context() {
        let registry = ActionRegistry::builtin();

        assert!(registry.find_action(Context::Orders, "processOrders").is_ok());
        assert_eq!(
            registry.find_action(Context::Users, "processOrders").unwrap_err(),
            DispatchError::UnknownAction {
                context: Context::Users,
                name: "processOrders".to_string(),
            }
        );
    }

    #[test]
    fn register_appends_and_rejects_duplicates() {
        let mut registry = ActionRegistry::new();
        registry.register(Context::Orders, "refundOrders", "Refund").unwrap();
        registry.register(Context::Orders, "archiveOrders", "Archive").unwrap();

        let err = registry
            .register(Context::Orders, "refundOrders", "Refund again")
            .unwrap_err();
        assert!(matches!(err, DispatchError::DuplicateAction { .. }));

        let names: Vec<&str> = registry
            .actions_for(Context::Orders)
            .iter()
            .map(ActionDescriptor::name)
            .collect();
        assert_eq!(names, vec!["refundOrders", "archiveOrders"]);
        assert!(registry.actions_for(Context::Users).is_empty());
    }

    #[test]
    fn busy_flags_are_independent() {
        let registry = ActionRegistry::builtin();
        let process = registry.find_action(Context::Orders, "processOrders").unwrap();
        let ship = registry.find_action(Context::Orders, "shipOrders").unwrap();

        process.set_busy(true);

        assert!(process.is_busy());
        assert!(!ship.is_busy());
    }
}
