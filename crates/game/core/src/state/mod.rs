//! Leaf state types: identifiers, coordinates, closed enumerations, and
//! the per-player record.
//!
//! The registry and the grid mutate these exclusively through the
//! operations on [`PlayerState`] and the engine's tick phases.
mod card;
mod common;
mod direction;
mod hand;
mod player;
mod terrain;

pub use card::Card;
pub use common::{PlayerId, Position};
pub use direction::Direction;
pub use hand::{Hand, HandSlot};
pub use player::{PlayerSnapshot, PlayerState};
pub use terrain::{Terrain, TerrainReward};
