//! Data collaborator layer.
//!
//! This module provides the [`DataSource`] abstraction the table reads its rows
//! from, and the in-memory implementation the binary runs against. There is no
//! persistence: every batch lives for the lifetime of the process.
//!
//! # Modules
//!
//! - `backend`: `DataSource` trait
//! - `memory`: `MemoryStore`, in-memory batches seeded from a JSON fixture

pub mod backend;
pub mod memory;

pub use backend::DataSource;
pub use memory::MemoryStore;
