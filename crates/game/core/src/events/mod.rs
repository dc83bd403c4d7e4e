//! Append-only event log with per-player visibility filtering.
//!
//! Tiles, players, and the registry write here as a side effect of tick
//! phases; the external API layer reads via [`EventLog::query`]. The log
//! is the only structure in the core touched from genuinely concurrent
//! contexts.
mod kind;
mod log;
mod record;

pub use kind::{EventKind, Visibility};
pub use log::EventLog;
pub use record::{EventFilters, EventId, GameEvent};
