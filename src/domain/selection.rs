//! Identity-keyed selection set.
//!
//! The table's data batch is replaced wholesale on every refresh, so the same
//! logical record arrives as a new, possibly different, [`Entity`] value. The
//! selection therefore stores entities under their [`EntityId`] and answers
//! every membership question by id alone.

use super::entity::{Entity, EntityId};
use indexmap::IndexMap;

/// How many entities may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one entity; selecting another replaces it.
    Single,
    /// Any number of entities.
    #[default]
    Multiple,
}

/// Collection of selected entities, keyed by identity, in selection order.
///
/// # Example
///
/// ```
/// use bulkbar::domain::{Entity, Order, OrderStatus, SelectionMode, SelectionSet};
///
/// let mut selection = SelectionSet::new(SelectionMode::Multiple);
/// let pending = Entity::from(Order::new("o-1", "Grace", 1000));
/// selection.select(&pending);
///
/// // A refreshed snapshot of the same order is still selected.
/// let mut refreshed = Order::new("o-1", "Grace", 1000);
/// refreshed.status = OrderStatus::Processed;
/// assert!(selection.is_selected(&Entity::from(refreshed)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    mode: SelectionMode,
    entries: IndexMap<EntityId, Entity>,
}

impl SelectionSet {
    #[must_use]
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            entries: IndexMap::new(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Adds `entity`. An already-selected id keeps its position and takes the
    /// newer snapshot.
    pub fn select(&mut self, entity: &Entity) {
        if self.mode == SelectionMode::Single && !self.is_selected(entity) {
            self.entries.clear();
        }
        self.entries.insert(entity.id().clone(), entity.clone());
    }

    /// Removes the entity with the same id as `entity`, if present.
    pub fn deselect(&mut self, entity: &Entity) {
        self.entries.shift_remove(entity.id());
    }

    /// Deselects if selected, selects otherwise.
    pub fn toggle(&mut self, entity: &Entity) {
        if self.is_selected(entity) {
            self.deselect(entity);
        } else {
            self.select(entity);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn is_selected(&self, entity: &Entity) -> bool {
        self.contains_id(entity.id())
    }

    #[must_use]
    pub fn contains_id(&self, id: &EntityId) -> bool {
        self.entries.contains_key(id)
    }

    /// Selected entities in the order they were selected.
    #[must_use]
    pub fn selected(&self) -> Vec<Entity> {
        self.entries.values().cloned().collect()
    }

    /// Selected identities in the order they were selected.
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entries.keys()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Order, OrderStatus, User, UserStatus};

    fn order(id: &str) -> Entity {
        Entity::from(Order::new(id, "Grace", 1000))
    }

    #[test]
    fn membership_uses_identity_not_structure() {
        let mut selection = SelectionSet::new(SelectionMode::Multiple);
        let original = User::new("u-1", "Ada", "ada@example.com");
        let mut changed = original.clone();
        changed.name = "Ada Lovelace".to_string();
        changed.status = UserStatus::Suspended;

        selection.select(&Entity::from(original));

        assert!(selection.is_selected(&Entity::from(changed.clone())));
        selection.select(&Entity::from(changed));
        assert_eq!(selection.count(), 1);
    }

    #[test]
    fn reselect_keeps_position_and_takes_newer_snapshot() {
        let mut selection = SelectionSet::new(SelectionMode::Multiple);
        selection.select(&order("o-1"));
        selection.select(&order("o-2"));

        let mut newer = Order::new("o-1", "Grace", 1000);
        newer.status = OrderStatus::Shipped;
        selection.select(&Entity::from(newer));

        let selected = selection.selected();
        assert_eq!(selected[0].id().as_str(), "o-1");
        assert_eq!(selected[0].status_label(), "shipped");
        assert_eq!(selected[1].id().as_str(), "o-2");
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let mut selection = SelectionSet::new(SelectionMode::Multiple);
        let a = order("o-1");
        let b = order("o-2");
        selection.select(&b);

        selection.toggle(&a);
        selection.toggle(&a);
        assert!(!selection.is_selected(&a));

        selection.toggle(&b);
        selection.toggle(&b);
        assert!(selection.is_selected(&b));
    }

    #[test]
    fn clear_always_empties() {
        let mut selection = SelectionSet::new(SelectionMode::Multiple);
        selection.clear();
        assert_eq!(selection.count(), 0);

        for id in ["o-1", "o-2", "o-3"] {
            selection.select(&order(id));
        }
        selection.clear();
        assert_eq!(selection.count(), 0);
        assert!(selection.is_empty());
    }

    #[test]
    fn deselect_preserves_order_of_the_rest() {
        let mut selection = SelectionSet::new(SelectionMode::Multiple);
        for id in ["o-1", "o-2", "o-3"] {
            selection.select(&order(id));
        }

        selection.deselect(&order("o-2"));

        let ids: Vec<&str> = selection.ids().map(EntityId::as_str).collect();
        assert_eq!(ids, vec!["o-1", "o-3"]);
    }

    #[test]
    fn single_mode_replaces_previous_selection() {
        let mut selection = SelectionSet::new(SelectionMode::Single);
        selection.select(&order("o-1"));
        selection.select(&order("o-2"));

        assert_eq!(selection.count(), 1);
        assert!(selection.contains_id(&EntityId::from("o-2")));

        selection.select(&order("o-2"));
        assert_eq!(selection.count(), 1);
    }
}
