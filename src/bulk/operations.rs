//! Bulk operations and the name-indexed table the dispatcher runs them from.
//!
//! An operation takes the selected entities by value and resolves to the
//! updated snapshots. The shipped operations are pure per-record transitions
//! behind a simulated backend delay; the delay is plain tokio time, so tests
//! control it with a paused clock.

use super::error::OperationError;
use crate::domain::{Context, Entity, Order, OrderStatus, User, UserStatus};
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::time::Duration;

/// An asynchronous bulk operation over a batch of entities.
pub trait BatchOperation {
    /// Runs the operation. Resolves to one updated entity per input entity, or
    /// fails the whole batch.
    fn run(&self, entities: Vec<Entity>) -> BoxFuture<'static, Result<Vec<Entity>, OperationError>>;
}

/// Pure per-record transition applied by a [`SimulatedOperation`].
pub type Transition = fn(&Entity, DateTime<Utc>) -> Result<Entity, OperationError>;

/// In-memory stand-in for a backend call: waits `latency`, then applies a
/// transition to every record. Any rejection fails the whole batch.
#[derive(Clone, Copy)]
pub struct SimulatedOperation {
    latency: Duration,
    transition: Transition,
}

impl SimulatedOperation {
    #[must_use]
    pub const fn new(latency: Duration, transition: Transition) -> Self {
        Self { latency, transition }
    }
}

impl BatchOperation for SimulatedOperation {
    fn run(&self, entities: Vec<Entity>) -> BoxFuture<'static, Result<Vec<Entity>, OperationError>> {
        let Self { latency, transition } = *self;
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            let now = Utc::now();
            let updated: Result<Vec<Entity>, OperationError> =
                entities.iter().map(|entity| transition(entity, now)).collect();
            updated
        })
    }
}

/// Operations keyed by action name.
#[derive(Default)]
pub struct OperationTable {
    operations: HashMap<String, Box<dyn BatchOperation>>,
}

impl OperationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with an operation for every action in
    /// [`ActionRegistry::builtin`](super::ActionRegistry::builtin).
    #[must_use]
    pub fn builtin(latency: Duration) -> Self {
        let transitions: [(&str, Transition); 6] = [
            ("activateUsers", activate_user),
            ("suspendUsers", suspend_user),
            ("resetPasswords", reset_password),
            ("processOrders", process_order),
            ("shipOrders", ship_order),
            ("cancelOrders", cancel_order),
        ];

        let mut table = Self::new();
        for (name, transition) in transitions {
            table.insert(name, SimulatedOperation::new(latency, transition));
        }
        table
    }

    /// Adds or replaces the operation for `name`.
    pub fn insert(&mut self, name: impl Into<String>, operation: impl BatchOperation + 'static) {
        self.operations.insert(name.into(), Box::new(operation));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn BatchOperation> {
        self.operations.get(name).map(|operation| &**operation)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }
}

impl std::fmt::Debug for OperationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.operations.keys().collect();
        names.sort();
        f.debug_struct("OperationTable").field("operations", &names).finish()
    }
}

fn expect_user(entity: &Entity) -> Result<&User, OperationError> {
    entity.as_user().ok_or_else(|| OperationError::WrongKind {
        id: entity.id().clone(),
        expected: Context::Users,
    })
}

fn expect_order(entity: &Entity) -> Result<&Order, OperationError> {
    entity.as_order().ok_or_else(|| OperationError::WrongKind {
        id: entity.id().clone(),
        expected: Context::Orders,
    })
}

fn reject(entity: &Entity, reason: impl Into<String>) -> OperationError {
    OperationError::Rejected {
        id: entity.id().clone(),
        reason: reason.into(),
    }
}

fn activate_user(entity: &Entity, _now: DateTime<Utc>) -> Result<Entity, OperationError> {
    let user = expect_user(entity)?;
    Ok(Entity::User(User {
        status: UserStatus::Active,
        ..user.clone()
    }))
}

fn suspend_user(entity: &Entity, _now: DateTime<Utc>) -> Result<Entity, OperationError> {
    let user = expect_user(entity)?;
    Ok(Entity::User(User {
        status: UserStatus::Suspended,
        ..user.clone()
    }))
}

fn reset_password(entity: &Entity, now: DateTime<Utc>) -> Result<Entity, OperationError> {
    let user = expect_user(entity)?;
    if user.status == UserStatus::Suspended {
        return Err(reject(entity, "account is suspended"));
    }
    Ok(Entity::User(User {
        password_reset_at: Some(now),
        ..user.clone()
    }))
}

fn process_order(entity: &Entity, now: DateTime<Utc>) -> Result<Entity, OperationError> {
    let order = expect_order(entity)?;
    match order.status {
        OrderStatus::Pending => Ok(Entity::Order(Order {
            status: OrderStatus::Processed,
            processed_at: Some(now),
            ..order.clone()
        })),
        other => Err(reject(entity, format!("order is already {}", other.label()))),
    }
}

fn ship_order(entity: &Entity, now: DateTime<Utc>) -> Result<Entity, OperationError> {
    let order = expect_order(entity)?;
    match order.status {
        OrderStatus::Processed => Ok(Entity::Order(Order {
            status: OrderStatus::Shipped,
            shipped_at: Some(now),
            ..order.clone()
        })),
        other => Err(reject(entity, format!("only processed orders ship, this one is {}", other.label()))),
    }
}

fn cancel_order(entity: &Entity, _now: DateTime<Utc>) -> Result<Entity, OperationError> {
    let order = expect_order(entity)?;
    match order.status {
        OrderStatus::Pending | OrderStatus::Processed => Ok(Entity::Order(Order {
            status: OrderStatus::Cancelled,
            ..order.clone()
        })),
        other => Err(reject(entity, format!("order is already {}", other.label()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(id: &str) -> Entity {
        Entity::from(Order::new(id, "Grace", 1000))
    }

    fn with_status(id: &str, status: OrderStatus) -> Entity {
        let mut order = Order::new(id, "Grace", 1000);
        order.status = status;
        Entity::from(order)
    }

    #[tokio::test]
    async fn process_marks_pending_orders_processed() {
        let table = OperationTable::builtin(Duration::ZERO);
        let before = Utc::now();

        let updated = table
            .get("processOrders")
            .unwrap()
            .run(vec![pending("o-1"), pending("o-2")])
            .await
            .unwrap();

        assert_eq!(updated.len(), 2);
        for entity in &updated {
            let order = entity.as_order().unwrap();
            assert_eq!(order.status, OrderStatus::Processed);
            assert!(order.processed_at.unwrap() >= before);
        }
    }

    #[tokio::test]
    async fn one_rejection_fails_the_batch() {
        let table = OperationTable::builtin(Duration::ZERO);

        let err = table
            .get("shipOrders")
            .unwrap()
            .run(vec![
                with_status("o-1", OrderStatus::Processed),
                with_status("o-2", OrderStatus::Pending),
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, OperationError::Rejected { ref id, .. } if id.as_str() == "o-2"));
    }

    #[tokio::test]
    async fn wrong_kind_is_rejected() {
        let table = OperationTable::builtin(Duration::ZERO);

        let err = table
            .get("activateUsers")
            .unwrap()
            .run(vec![pending("o-1")])
            .await
            .unwrap_err();

        assert_eq!(
            err,
            OperationError::WrongKind {
                id: "o-1".into(),
                expected: Context::Users,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_driven_by_tokio_time() {
        let table = OperationTable::builtin(Duration::from_secs(2));
        let started = tokio::time::Instant::now();

        let updated = table
            .get("cancelOrders")
            .unwrap()
            .run(vec![with_status("o-1", OrderStatus::Processed)])
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(updated[0].status_label(), "cancelled");
    }

    #[test]
    fn user_transitions() {
        let now = Utc::now();
        let user = Entity::from(User::new("u-1", "Ada", "ada@example.com"));

        let suspended = suspend_user(&user, now).unwrap();
        assert_eq!(suspended.status_label(), "suspended");
        assert!(reset_password(&suspended, now).is_err());

        let reset = reset_password(&user, now).unwrap();
        assert_eq!(reset.as_user().unwrap().password_reset_at, Some(now));
        assert_eq!(activate_user(&suspended, now).unwrap().status_label(), "active");
    }

    #[test]
    fn transitions_leave_input_untouched() {
        let original = pending("o-1");
        let copy = original.clone();

        let _ = process_order(&original, Utc::now()).unwrap();

        assert_eq!(original, copy);
    }
}
