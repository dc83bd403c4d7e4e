use serde_json::json;

use crate::config::GameConfig;
use crate::events::{EventKind, EventLog};
use crate::grid::GameGrid;
use crate::state::{Card, Direction, Hand, PlayerId, Position, Terrain};

/// Mutable state of one participant.
///
/// The tile's occupant set is the source of truth for "who is here";
/// `position` is a cache that the registry keeps in agreement with it.
/// Dead players are never removed, only flagged and skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub direction: Direction,
    pub play: Card,
    pub consume: Card,
    pub discard: Card,
    pub hand: Hand,
    pub alive: bool,
    pub is_bot: bool,
}

impl PlayerState {
    pub fn new(id: PlayerId, name: String, position: Position) -> Self {
        Self {
            id,
            name,
            position,
            direction: Direction::Stay,
            play: Card::None,
            consume: Card::None,
            discard: Card::None,
            hand: Hand::starting(),
            alive: true,
            is_bot: false,
        }
    }

    /// Upkeep step: eat the pending consume card or starve.
    ///
    /// An unset choice defaults to food, falling back to wood. Consuming
    /// wood lights a fire that attracts nearby zombies to this tile. A
    /// missing card is the sole soft failure and always means death.
    pub fn consume(&mut self, grid: &mut GameGrid, events: &EventLog) {
        if !self.alive {
            return;
        }

        if self.consume == Card::None {
            self.consume = if self.hand.find(Card::Food).is_some() {
                Card::Food
            } else {
                Card::Wood
            };
        }

        match self.hand.find(self.consume) {
            Some(slot) => {
                if self.consume == Card::Wood {
                    grid.fire_attracting_to(self.position);
                }
                events.append(
                    EventKind::CardConsumed,
                    Some(&self.id),
                    json!({
                        "card": self.consume.to_string(),
                        "card_slot": slot,
                        "x": self.position.x,
                        "y": self.position.y,
                    }),
                );
                self.hand.clear_slot(slot);
            }
            None => {
                events.append(
                    EventKind::PlayerDeath,
                    Some(&self.id),
                    json!({
                        "reason": "starvation",
                        "card": self.consume.to_string(),
                        "x": self.position.x,
                        "y": self.position.y,
                    }),
                );
                self.alive = false;
            }
        }
    }

    /// True iff the player stands on a laboratory holding enough research
    /// cards acquired somewhere other than this laboratory.
    ///
    /// Research picked up here does not count, so a single tile can never
    /// be both the source and the redemption point of the same card.
    pub fn has_win_condition(&self, grid: &GameGrid, config: &GameConfig) -> bool {
        if grid.tile_at(self.position.x, self.position.y).terrain() != Terrain::Laboratory {
            return false;
        }

        let foreign_research = self
            .hand
            .slots()
            .iter()
            .filter(|slot| {
                slot.card == Card::Research && slot.acquired_at != Some(self.position)
            })
            .count();

        foreign_research >= config.victory_research
    }

    /// Routes a raw card token to the matching pending intent.
    ///
    /// Case-insensitive; "weapon" arms the combat play, any other
    /// recognized card name sets the consume choice, junk is ignored.
    pub fn card_input(&mut self, token: &str, events: &EventLog) {
        let Ok(card) = token.parse::<Card>() else {
            return;
        };

        if card == Card::Weapon {
            if let Some(slot) = self.hand.find(Card::Weapon) {
                events.append(
                    EventKind::CardPlayed,
                    Some(&self.id),
                    json!({
                        "card": Card::Weapon.to_string(),
                        "card_slot": slot,
                        "x": self.position.x,
                        "y": self.position.y,
                    }),
                );
            }
            self.play = Card::Weapon;
        } else {
            events.append(
                EventKind::CardSelected,
                Some(&self.id),
                json!({
                    "card": card.to_string(),
                    "action": "consume",
                    "x": self.position.x,
                    "y": self.position.y,
                }),
            );
            self.consume = card;
        }
    }

    /// Read-only projection for the external layer.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            x: self.position.x,
            y: self.position.y,
            direction: self.direction,
            play: self.play,
            consume: self.consume,
            discard: self.discard,
            cards: self.hand.cards(),
            alive: self.alive,
            is_bot: self.is_bot,
        }
    }
}

/// Serializable view of a player's own state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub play: Card,
    pub consume: Card,
    pub discard: Card,
    pub cards: [Card; GameConfig::HAND_SLOTS],
    pub alive: bool,
    pub is_bot: bool,
}
