//! Side effects requested by the event handler.
//!
//! [`handle_event`](super::handle_event) never touches the data collaborator or
//! the dispatcher itself. It returns [`Effect`]s and the runtime performs them,
//! feeding their results back in as events.

use crate::domain::{Context, Entity};

/// Commands the runtime executes after an event has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the current batch for a context and answer with
    /// [`Event::BatchLoaded`](super::Event::BatchLoaded).
    LoadBatch(Context),

    /// Start a bulk action over a snapshot of the selection and answer with
    /// [`Event::ActionFinished`](super::Event::ActionFinished) once it settles.
    Dispatch {
        context: Context,
        action: String,
        entities: Vec<Entity>,
    },

    /// Stop the event loop.
    Quit,
}
