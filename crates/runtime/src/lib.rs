//! Real-time orchestration for the outbreak simulation.
//!
//! This crate wraps the pure [`outbreak_core`] engine in a shared-state
//! session: a scheduler task paces turns in wall-clock time, bots keep
//! the world populated, and [`GameHandle`] is the cloneable façade
//! clients use to join, submit intents, and read their view of the
//! world.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and its configuration
//! - [`handle`] exposes the client-facing API
//! - `scheduler` and `bots` stay internal to the crate
pub mod error;
pub mod handle;
pub mod runtime;

mod bots;
mod scheduler;

pub use error::{Result, RuntimeError};
pub use handle::{GameHandle, StatusSnapshot};
pub use runtime::{Runtime, RuntimeConfig};
