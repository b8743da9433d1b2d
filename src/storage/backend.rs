//! Data collaborator abstraction.
//!
//! This module defines the [`DataSource`] trait the application reads batches
//! from and the dispatcher writes updated records to. The trait is deliberately
//! small: the table only ever needs the latest batch of a context, and bulk
//! actions only ever hand back a set of updated records.

use crate::domain::error::Result;
use crate::domain::{Context, Entity};

/// Sole authority on the records shown in the table.
///
/// Methods take `&self`: the store is shared between the event loop and every
/// in-flight bulk action on a single thread, so implementations use interior
/// mutability.
///
/// # Implementations
///
/// - [`MemoryStore`](super::MemoryStore): in-memory batches seeded from JSON
pub trait DataSource {
    /// Returns the current batch for `context`, in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch cannot be produced.
    fn batch(&self, context: Context) -> Result<Vec<Entity>>;

    /// Replaces the batch for `context` with one where every record of
    /// `updated` takes the place of the record with the same id.
    ///
    /// The previous batch is never modified in place; readers holding it keep
    /// a consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a record in `updated` belongs to another context.
    fn replace_batch(&self, context: Context, updated: Vec<Entity>) -> Result<()>;
}
