//! In-memory data collaborator.
//!
//! Batches live in memory only and are seeded from an embedded JSON fixture.
//! Every replacement produces a brand new vector and bumps a revision counter,
//! so the table always receives a fresh batch after a bulk action.
//!
//! # Fixture Format
//!
//! A JSON array of entities, each tagged by `kind`:
//!
//! ```json
//! [
//!   { "kind": "user", "id": "u-1001", "name": "Ada Lovelace", "email": "ada@example.com",
//!     "status": "active", "created_at": "2024-03-01T09:00:00Z" },
//!   { "kind": "order", "id": "o-5001", "customer": "Ada Lovelace", "total_cents": 12999,
//!     "status": "pending", "created_at": "2024-03-04T10:15:00Z" }
//! ]
//! ```

use crate::domain::error::{BulkbarError, Result};
use crate::domain::{Context, Entity, EntityId};
use crate::storage::backend::DataSource;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Fixture shipped with the binary.
const SEED_JSON: &str = include_str!("../../fixtures/seed.json");

/// In-memory batches per context.
///
/// # Example
///
/// ```
/// use bulkbar::domain::{Context, Entity, Order};
/// use bulkbar::storage::{DataSource, MemoryStore};
///
/// let store = MemoryStore::from_entities(vec![Entity::from(Order::new("o-1", "Grace", 500))]);
/// assert_eq!(store.batch(Context::Orders)?.len(), 1);
/// assert!(store.batch(Context::Users)?.is_empty());
/// # Ok::<(), bulkbar::BulkbarError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    batches: RefCell<BTreeMap<Context, Vec<Entity>>>,
    revision: Cell<u64>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from entities of any context, keeping their order.
    #[must_use]
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        let mut batches: BTreeMap<Context, Vec<Entity>> = BTreeMap::new();
        for entity in entities {
            batches.entry(entity.context()).or_default().push(entity);
        }
        Self {
            batches: RefCell::new(batches),
            revision: Cell::new(0),
        }
    }

    /// Parses a JSON fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or an id repeats within a
    /// context.
    pub fn from_json(json: &str) -> Result<Self> {
        let entities: Vec<Entity> = serde_json::from_str(json)?;

        let mut seen: HashSet<(Context, &EntityId)> = HashSet::new();
        for entity in &entities {
            if !seen.insert((entity.context(), entity.id())) {
                return Err(BulkbarError::Storage(format!(
                    "duplicate id {} in {} fixture",
                    entity.id(),
                    entity.context()
                )));
            }
        }

        tracing::debug!(entity_count = entities.len(), "parsed entity fixture");
        Ok(Self::from_entities(entities))
    }

    /// Store seeded with the bundled demo users and orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled fixture fails to parse.
    pub fn seeded() -> Result<Self> {
        Self::from_json(SEED_JSON)
    }

    /// Number of replacements performed so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }
}

impl DataSource for MemoryStore {
    fn batch(&self, context: Context) -> Result<Vec<Entity>> {
        Ok(self.batches.borrow().get(&context).cloned().unwrap_or_default())
    }

    fn replace_batch(&self, context: Context, updated: Vec<Entity>) -> Result<()> {
        let _span = tracing::debug_span!("replace_batch", context = %context, updated = updated.len()).entered();

        if let Some(stray) = updated.iter().find(|entity| entity.context() != context) {
            return Err(BulkbarError::Storage(format!(
                "{} belongs to {}, not {context}",
                stray.id(),
                stray.context()
            )));
        }

        let mut by_id: HashMap<EntityId, Entity> = HashMap::new();
        let mut order: Vec<EntityId> = Vec::with_capacity(updated.len());
        for entity in updated {
            let id = entity.id().clone();
            if by_id.insert(id.clone(), entity).is_none() {
                order.push(id);
            }
        }

        let mut batches = self.batches.borrow_mut();
        let current = batches.get(&context).map(Vec::as_slice).unwrap_or_default();

        let mut next: Vec<Entity> = current
            .iter()
            .map(|entity| by_id.remove(entity.id()).unwrap_or_else(|| entity.clone()))
            .collect();
        let appended = order.iter().filter_map(|id| by_id.remove(id));
        next.extend(appended);

        batches.insert(context, next);
        drop(batches);

        self.revision.set(self.revision.get() + 1);
        tracing::debug!(revision = self.revision.get(), "batch replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, OrderStatus, User};

    fn order(id: &str) -> Entity {
        Entity::from(Order::new(id, "Grace", 1000))
    }

    #[test]
    fn seeded_store_has_both_contexts() {
        let store = MemoryStore::seeded().unwrap();

        assert!(!store.batch(Context::Users).unwrap().is_empty());
        assert!(!store.batch(Context::Orders).unwrap().is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn replace_swaps_by_id_and_keeps_order() {
        let store = MemoryStore::from_entities(vec![order("o-1"), order("o-2"), order("o-3")]);
        let before = store.batch(Context::Orders).unwrap();

        let mut shipped = Order::new("o-2", "Grace", 1000);
        shipped.status = OrderStatus::Shipped;
        store
            .replace_batch(Context::Orders, vec![Entity::from(shipped)])
            .unwrap();

        let after = store.batch(Context::Orders).unwrap();
        let ids: Vec<&str> = after.iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["o-1", "o-2", "o-3"]);
        assert_eq!(after[1].status_label(), "shipped");
        assert_eq!(before[1].status_label(), "pending");
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn replace_appends_unknown_ids() {
        let store = MemoryStore::from_entities(vec![order("o-1")]);

        store.replace_batch(Context::Orders, vec![order("o-9")]).unwrap();

        assert_eq!(store.batch(Context::Orders).unwrap().len(), 2);
    }

    #[test]
    fn replace_rejects_records_of_other_context() {
        let store = MemoryStore::from_entities(vec![order("o-1")]);
        let user = Entity::from(User::new("u-1", "Ada", "ada@example.com"));

        let err = store.replace_batch(Context::Orders, vec![user]).unwrap_err();

        assert!(matches!(err, BulkbarError::Storage(_)));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn duplicate_fixture_ids_are_rejected() {
        let json = r#"[
            {"kind": "order", "id": "o-1", "customer": "a", "total_cents": 1,
             "status": "pending", "created_at": "2024-01-01T00:00:00Z"},
            {"kind": "order", "id": "o-1", "customer": "b", "total_cents": 2,
             "status": "pending", "created_at": "2024-01-01T00:00:00Z"}
        ]"#;

        assert!(MemoryStore::from_json(json).is_err());
    }
}
