//! Authoritative tick simulation for the grid survival game.
//!
//! `outbreak-core` defines the canonical rules: the infection grid, the
//! per-tile combat resolver, the player registry's movement and upkeep
//! state machines, and the append-only event log with per-player
//! visibility. All state mutation flows through [`engine::Game::tick`];
//! the runtime crate drives the real-time pacing and exposes snapshots
//! to external consumers.
pub mod config;
pub mod engine;
pub mod events;
pub mod grid;
pub mod players;
pub mod state;

pub use config::GameConfig;
pub use engine::{Game, GameState};
pub use events::{EventFilters, EventId, EventKind, EventLog, GameEvent, Visibility};
pub use grid::{GameGrid, Surroundings, Tile, TileSummary};
pub use players::{PlayerRegistry, RegistryError};
pub use state::{
    Card, Direction, Hand, HandSlot, PlayerId, PlayerSnapshot, PlayerState, Position, Terrain,
    TerrainReward,
};
