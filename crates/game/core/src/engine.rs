//! The engine: turn/win bookkeeping and the fixed-order tick pipeline
//! driving every simulation phase.
use std::sync::Arc;

use serde_json::json;

use crate::config::GameConfig;
use crate::events::{EventKind, EventLog};
use crate::grid::GameGrid;
use crate::players::PlayerRegistry;
use crate::state::{Card, Direction, Hand, PlayerId};

/// Turn countdown and victory flags, separate from the world itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    turn_timer: u32,
    remaining_turns: u32,
    won: bool,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            turn_timer: config.turn_length_secs,
            remaining_turns: config.max_turns,
            won: false,
        }
    }

    /// One second of wall clock elapsed.
    pub fn timer_down(&mut self) {
        self.turn_timer = self.turn_timer.saturating_sub(1);
    }

    pub fn is_turn_over(&self) -> bool {
        self.turn_timer == 0
    }

    pub fn reset_timer(&mut self, config: &GameConfig) {
        self.turn_timer = config.turn_length_secs;
    }

    pub fn seconds_left(&self) -> u32 {
        self.turn_timer
    }

    pub fn remaining_turns(&self) -> u32 {
        self.remaining_turns
    }

    pub fn win(&mut self) {
        self.won = true;
    }

    pub fn have_won(&self) -> bool {
        self.won
    }

    /// The session ends on victory or when no turns remain.
    pub fn is_game_over(&self) -> bool {
        self.won || self.remaining_turns == 0
    }

    fn end_turn(&mut self) {
        self.remaining_turns = self.remaining_turns.saturating_sub(1);
    }
}

/// The whole simulation: world, players, log, and turn state under one
/// owner. All mutation goes through `&mut self`, so a tick is atomic
/// with respect to any external reader.
pub struct Game {
    config: GameConfig,
    grid: GameGrid,
    registry: PlayerRegistry,
    events: Arc<EventLog>,
    state: GameState,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let mut rng = rand::thread_rng();
        let grid = GameGrid::generate(&config, &mut rng);
        let registry = PlayerRegistry::new(&config);
        let state = GameState::new(&config);
        Self {
            config,
            grid,
            registry,
            events: Arc::new(EventLog::new()),
            state,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &GameGrid {
        &self.grid
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PlayerRegistry {
        &mut self.registry
    }

    pub fn events(&self) -> &Arc<EventLog> {
        &self.events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Admits a player at a random entry tile.
    pub fn join(&mut self, name: &str) -> PlayerId {
        let entry = self.grid.entry_position(&mut rand::thread_rng());
        self.registry.join(&mut self.grid, name, entry, &self.events)
    }

    pub fn join_bot(&mut self, name: &str) -> PlayerId {
        let entry = self.grid.entry_position(&mut rand::thread_rng());
        self.registry
            .join_bot(&mut self.grid, name, entry, &self.events)
    }

    /// Routes a raw card token for a player.
    pub fn card_input(&mut self, id: &PlayerId, token: &str) -> Result<(), crate::players::RegistryError> {
        self.registry.card_input(id, token, &self.events)
    }

    /// Runs one full turn through every phase, in order: movement,
    /// resource distribution, combat, infection spread, consumption, and
    /// hand limiting, then the victory check.
    pub fn tick(&mut self) {
        let turn = self.events.advance_turn();
        self.events.append(
            EventKind::GameTick,
            None,
            json!({
                "turn": turn,
                "remaining_turns": self.state.remaining_turns,
            }),
        );

        self.registry.move_players(&mut self.grid, &self.events);
        self.grid.distribute_resources(&mut self.registry, &self.events);
        self.grid
            .resolve_combat_all_tiles(&mut self.registry, &self.events, &self.config);
        self.grid.spread_infection(&self.config);
        self.registry.players_consume(&mut self.grid, &self.events);
        self.registry.limit_hands(&self.events);

        if self.registry.has_anyone_won(&self.grid, &self.config) {
            self.state.win();
        }
        self.state.end_turn();
    }

    /// Starts a fresh session on a new map, keeping the roster: every
    /// player is revived with the starting hand and scattered to a new
    /// entry tile. The event log carries over.
    pub fn reset_world(&mut self) {
        let mut rng = rand::thread_rng();
        self.grid = GameGrid::generate(&self.config, &mut rng);
        self.state = GameState::new(&self.config);

        let mut placements = Vec::new();
        for player in self.registry.players_mut() {
            let entry = self.grid.entry_position(&mut rng);
            player.position = entry;
            player.direction = Direction::Stay;
            player.play = Card::Dice;
            player.consume = Card::None;
            player.discard = Card::None;
            player.hand = Hand::starting();
            player.alive = true;
            placements.push((player.id.clone(), entry));
        }
        for (id, entry) in placements {
            if let Some(tile) = self.grid.tile_mut(entry) {
                tile.add_occupant(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventFilters;
    use crate::state::Terrain;

    fn flat_game(terrain: Terrain) -> Game {
        let config = GameConfig::with_dimensions(4, 4);
        let mut game = Game::new(config);
        game.grid = GameGrid::flat(&game.config, terrain);
        game
    }

    #[test]
    fn tick_advances_the_turn_and_logs_it() {
        let mut game = flat_game(Terrain::Farm);
        let before = game.state.remaining_turns();

        game.tick();

        assert_eq!(game.events.current_turn(), 1);
        assert_eq!(game.events.count_of(EventKind::GameTick), 1);
        assert_eq!(game.state.remaining_turns(), before - 1);
    }

    #[test]
    fn movement_resolves_before_resources_are_distributed() {
        // A player walking onto a farm tile this turn draws from it this
        // same turn.
        let mut game = flat_game(Terrain::Farm);
        let id = game.join("walker");
        game.registry
            .set_direction(&id, Direction::East)
            .unwrap();
        let before = game.registry.player(&id).unwrap().position;

        game.tick();

        let player = game.registry.player(&id).unwrap();
        let moved = player.position != before;
        // On a 4-wide map only an east-edge start cannot move.
        assert_eq!(moved, before.x < 3);
        // Farm yields one food; consumption then eats one. Filled count
        // is back to the starting three.
        assert_eq!(player.hand.filled(), 3);
    }

    #[test]
    fn timer_runs_down_and_resets() {
        let config = GameConfig::with_dimensions(3, 3);
        let mut state = GameState::new(&config);
        for _ in 0..config.turn_length_secs {
            assert!(!state.is_turn_over());
            state.timer_down();
        }
        assert!(state.is_turn_over());
        state.reset_timer(&config);
        assert!(!state.is_turn_over());
    }

    #[test]
    fn game_over_on_exhausted_turns_or_victory() {
        let config = GameConfig::with_dimensions(3, 3);
        let mut state = GameState::new(&config);
        assert!(!state.is_game_over());

        state.win();
        assert!(state.is_game_over());
        assert!(state.have_won());

        let mut state = GameState::new(&config);
        for _ in 0..config.max_turns {
            state.end_turn();
        }
        assert!(state.is_game_over());
        assert!(!state.have_won());
    }

    #[test]
    fn reset_world_revives_the_roster_on_a_fresh_map() {
        let mut game = flat_game(Terrain::City);
        let id = game.join("survivor");
        {
            let player = game.registry.player_mut(&id).unwrap();
            player.alive = false;
            player.hand = Hand::from_cards([Card::Research; GameConfig::HAND_SLOTS]);
        }
        game.state.win();

        game.reset_world();

        let player = game.registry.player(&id).unwrap();
        assert!(player.alive);
        assert_eq!(player.hand, Hand::starting());
        assert!(!game.state.is_game_over());
        let pos = player.position;
        assert!(game.grid.tile_at(pos.x, pos.y).occupants().contains(&id));
    }

    #[test]
    fn ticks_are_recorded_into_the_player_visible_log() {
        let mut game = flat_game(Terrain::Farm);
        let id = game.join("reader");
        game.tick();
        game.tick();

        let visible = game
            .events
            .query(&id, &EventFilters::kind(EventKind::GameTick));
        assert_eq!(visible.len(), 2);
    }
}
