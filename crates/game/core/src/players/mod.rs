//! The player registry: join, movement, hand limiting, and upkeep across
//! all participants.
use std::collections::BTreeMap;

use serde_json::json;
use sha2::{Digest, Sha256};

use crate::config::GameConfig;
use crate::events::{EventKind, EventLog};
use crate::grid::GameGrid;
use crate::state::{Card, Direction, PlayerId, PlayerState, Position};

/// Errors surfaced at the registry's intent-setting seam.
///
/// The simulation phases themselves never fail; only external requests
/// naming a player can.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
}

/// Owns every player record, dead or alive, for the process lifetime.
pub struct PlayerRegistry {
    players: BTreeMap<PlayerId, PlayerState>,
    joined: u64,
    id_salt: String,
    name_max_length: usize,
}

impl PlayerRegistry {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            players: BTreeMap::new(),
            joined: 0,
            id_salt: config.id_salt.clone(),
            name_max_length: config.name_max_length,
        }
    }

    /// Creates a player with the starting hand on the given entry tile,
    /// registering it in both the registry and the tile's occupant set.
    pub fn join(
        &mut self,
        grid: &mut GameGrid,
        name: &str,
        entry: Position,
        events: &EventLog,
    ) -> PlayerId {
        self.register(grid, name, entry, false, events)
    }

    /// Like [`join`](Self::join) but flags the player as a bot.
    pub fn join_bot(
        &mut self,
        grid: &mut GameGrid,
        name: &str,
        entry: Position,
        events: &EventLog,
    ) -> PlayerId {
        self.register(grid, name, entry, true, events)
    }

    fn register(
        &mut self,
        grid: &mut GameGrid,
        name: &str,
        entry: Position,
        is_bot: bool,
        events: &EventLog,
    ) -> PlayerId {
        let name: String = name.chars().take(self.name_max_length).collect();
        let id = self.mint_id(&name);

        let mut player = PlayerState::new(id.clone(), name.clone(), entry);
        player.is_bot = is_bot;

        if let Some(tile) = grid.tile_mut(entry) {
            tile.add_occupant(id.clone());
        }
        self.players.insert(id.clone(), player);

        events.append(
            EventKind::PlayerJoin,
            Some(&id),
            json!({
                "name": name,
                "x": entry.x,
                "y": entry.y,
                "bot": is_bot,
            }),
        );
        id
    }

    /// Opaque ID: salted hash over a monotonic join counter and the name.
    fn mint_id(&mut self, name: &str) -> PlayerId {
        self.joined += 1;
        let mut hasher = Sha256::new();
        hasher.update(self.id_salt.as_bytes());
        hasher.update(self.joined.to_be_bytes());
        hasher.update(name.as_bytes());
        let digest = hasher.finalize();
        PlayerId::new(hex::encode(&digest[..16]))
    }

    /// Movement phase: applies each alive player's pending direction,
    /// clamped to the map, relocating tile membership when the position
    /// actually changes. Pending directions reset to `Stay`.
    pub fn move_players(&mut self, grid: &mut GameGrid, events: &EventLog) {
        for player in self.players.values_mut() {
            if !player.alive || player.direction == Direction::Stay {
                continue;
            }

            let from = player.position;
            let to = from
                .offset(player.direction)
                .clamped(grid.width(), grid.height());

            if to != from {
                grid.relocate(&player.id, from, to);
                player.position = to;
                events.append(
                    EventKind::PlayerMove,
                    Some(&player.id),
                    json!({
                        "direction": player.direction.to_string(),
                        "from": { "x": from.x, "y": from.y },
                        "to": { "x": to.x, "y": to.y },
                    }),
                );
            }
            player.direction = Direction::Stay;
        }
    }

    /// Trims every oversized hand down to the limit, honoring the
    /// player's discard choice when it names a held card and falling back
    /// to a fixed slot otherwise. Discard choices always reset.
    pub fn limit_hands(&mut self, events: &EventLog) {
        for player in self.players.values_mut() {
            if player.hand.filled() > GameConfig::HAND_LIMIT {
                let slot = player
                    .hand
                    .find(player.discard)
                    .unwrap_or(GameConfig::FALLBACK_DISCARD_SLOT);
                let removed = player.hand.clear_slot(slot);
                if removed.is_some() {
                    events.append(
                        EventKind::CardDiscarded,
                        Some(&player.id),
                        json!({
                            "card": removed.to_string(),
                            "card_slot": slot,
                        }),
                    );
                }
            }
            player.discard = Card::None;
        }
    }

    /// Upkeep phase: every alive player consumes (or starves).
    pub fn players_consume(&mut self, grid: &mut GameGrid, events: &EventLog) {
        for player in self.players.values_mut() {
            player.consume(grid, events);
        }
    }

    /// True iff any player currently satisfies the win condition.
    pub fn has_anyone_won(&self, grid: &GameGrid, config: &GameConfig) -> bool {
        self.players
            .values()
            .any(|player| player.has_win_condition(grid, config))
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values()
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut PlayerState> {
        self.players.values_mut()
    }

    pub fn bots_mut(&mut self) -> impl Iterator<Item = &mut PlayerState> {
        self.players.values_mut().filter(|player| player.is_bot)
    }

    pub fn alive_bot_count(&self) -> usize {
        self.players
            .values()
            .filter(|player| player.is_bot && player.alive)
            .count()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    // ===== intent setters used by the external layer =====

    pub fn set_direction(
        &mut self,
        id: &PlayerId,
        direction: Direction,
    ) -> Result<(), RegistryError> {
        self.intent(id)?.direction = direction;
        Ok(())
    }

    pub fn set_play(&mut self, id: &PlayerId, card: Card) -> Result<(), RegistryError> {
        self.intent(id)?.play = card;
        Ok(())
    }

    pub fn set_consume(&mut self, id: &PlayerId, card: Card) -> Result<(), RegistryError> {
        self.intent(id)?.consume = card;
        Ok(())
    }

    pub fn set_discard(&mut self, id: &PlayerId, card: Card) -> Result<(), RegistryError> {
        self.intent(id)?.discard = card;
        Ok(())
    }

    /// Routes a raw card token through the player's input mapping.
    pub fn card_input(
        &mut self,
        id: &PlayerId,
        token: &str,
        events: &EventLog,
    ) -> Result<(), RegistryError> {
        let player = self
            .players
            .get_mut(id)
            .ok_or_else(|| RegistryError::PlayerNotFound(id.clone()))?;
        player.card_input(token, events);
        Ok(())
    }

    fn intent(&mut self, id: &PlayerId) -> Result<&mut PlayerState, RegistryError> {
        self.players
            .get_mut(id)
            .ok_or_else(|| RegistryError::PlayerNotFound(id.clone()))
    }
}
