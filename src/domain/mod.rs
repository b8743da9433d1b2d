//! Domain layer for bulkbar.
//!
//! Core record types and the identity-keyed selection set, independent of the
//! terminal front-end, the dispatcher and the data collaborator.
//!
//! # Organization
//!
//! - [`entity`]: Selectable records (users, orders), their identity and context
//! - [`selection`]: Selection set keyed by entity identity
//! - [`error`]: Error types and result alias
//!
//! # Examples
//!
//! ```
//! use bulkbar::domain::{Entity, EntityId, SelectionSet, SelectionMode};
//!
//! let mut selection = SelectionSet::new(SelectionMode::Multiple);
//! assert_eq!(selection.count(), 0);
//! ```

pub mod entity;
pub mod error;
pub mod selection;

pub use entity::{Context, Entity, EntityId, Order, OrderStatus, User, UserStatus};
pub use error::{BulkbarError, Result};
pub use selection::{SelectionMode, SelectionSet};
