use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use outbreak_core::{
    Card, Direction, EventFilters, Game, GameConfig, GameEvent, PlayerId, PlayerSnapshot,
    Surroundings,
};

use crate::error::{Result, RuntimeError};

/// Point-in-time view of the session, cheap enough to serve on every
/// status request.
#[derive(Clone, Debug, Serialize)]
pub struct StatusSnapshot {
    pub turn: u64,
    pub seconds_left: u32,
    pub remaining_turns: u32,
    pub won: bool,
    pub game_over: bool,
    pub players: usize,
    pub alive_players: usize,
}

/// Client-facing handle to interact with the running session.
///
/// Cloneable; every clone shares the same world. Reads take the shared
/// lock, intents and joins take the exclusive one, so nothing here can
/// observe a half-applied tick.
#[derive(Clone)]
pub struct GameHandle {
    game: Arc<RwLock<Game>>,
}

impl GameHandle {
    pub(crate) fn new(game: Arc<RwLock<Game>>) -> Self {
        Self { game }
    }

    /// Admits a new player and returns its opaque ID.
    pub async fn join(&self, name: &str) -> PlayerId {
        self.game.write().await.join(name)
    }

    /// Serializable view of one player's own state.
    pub async fn player(&self, id: &PlayerId) -> Result<PlayerSnapshot> {
        let game = self.game.read().await;
        game.registry()
            .player(id)
            .map(|player| player.snapshot())
            .ok_or_else(|| RuntimeError::PlayerNotFound(id.clone()))
    }

    /// The 3×3 neighborhood around the player's tile.
    pub async fn surroundings(&self, id: &PlayerId) -> Result<Surroundings> {
        let game = self.game.read().await;
        let position = game
            .registry()
            .player(id)
            .map(|player| player.position)
            .ok_or_else(|| RuntimeError::PlayerNotFound(id.clone()))?;
        Ok(game.grid().surroundings(position, game.registry()))
    }

    pub async fn set_direction(&self, id: &PlayerId, direction: Direction) -> Result<()> {
        let mut game = self.game.write().await;
        game.registry_mut().set_direction(id, direction)?;
        Ok(())
    }

    pub async fn set_play(&self, id: &PlayerId, card: Card) -> Result<()> {
        let mut game = self.game.write().await;
        game.registry_mut().set_play(id, card)?;
        Ok(())
    }

    pub async fn set_consume(&self, id: &PlayerId, card: Card) -> Result<()> {
        let mut game = self.game.write().await;
        game.registry_mut().set_consume(id, card)?;
        Ok(())
    }

    pub async fn set_discard(&self, id: &PlayerId, card: Card) -> Result<()> {
        let mut game = self.game.write().await;
        game.registry_mut().set_discard(id, card)?;
        Ok(())
    }

    /// Routes a raw card token through the player's input mapping.
    /// Unrecognized tokens are ignored, matching the core's contract.
    pub async fn card_input(&self, id: &PlayerId, token: &str) -> Result<()> {
        let mut game = self.game.write().await;
        game.card_input(id, token)?;
        Ok(())
    }

    /// Events visible to the player under the given filters. The default
    /// filter set applies the configured reporting window.
    pub async fn events(
        &self,
        id: &PlayerId,
        filters: Option<EventFilters>,
    ) -> Result<Vec<GameEvent>> {
        let game = self.game.read().await;
        if game.registry().player(id).is_none() {
            return Err(RuntimeError::PlayerNotFound(id.clone()));
        }
        let filters = filters
            .unwrap_or_else(|| EventFilters::last_turns(game.config().default_reported_turns));
        Ok(game.events().query(id, &filters))
    }

    /// The session's full configuration.
    pub async fn config(&self) -> GameConfig {
        self.game.read().await.config().clone()
    }

    pub async fn status(&self) -> StatusSnapshot {
        let game = self.game.read().await;
        StatusSnapshot {
            turn: game.events().current_turn(),
            seconds_left: game.state().seconds_left(),
            remaining_turns: game.state().remaining_turns(),
            won: game.state().have_won(),
            game_over: game.state().is_game_over(),
            players: game.registry().len(),
            alive_players: game
                .registry()
                .players()
                .filter(|player| player.alive)
                .count(),
        }
    }

    /// Forces one full turn immediately, outside the scheduler cadence.
    pub async fn advance_turn(&self) {
        let mut game = self.game.write().await;
        crate::bots::randomize(&mut game);
        game.tick();
        crate::bots::restock(&mut game);
    }
}
