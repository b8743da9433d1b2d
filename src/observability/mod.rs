//! Logging to a rotating file.
//!
//! The terminal belongs to the table, so log output goes to
//! `<data dir>/bulkbar.log` instead of stderr:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → bulkbar.log (+ 3 rotated backups)
//! ```
//!
//! # Configuration
//!
//! The level is taken from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `file_writer`: Size-rotated log file

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
