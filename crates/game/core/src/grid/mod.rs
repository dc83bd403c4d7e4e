//! The spatial grid: tile storage, infection spread, resource
//! distribution, and the parallel per-tile combat resolver.
mod tile;

pub use tile::{Tile, TileSummary};

use std::collections::HashMap;

use rand::Rng;
use rayon::prelude::*;
use serde_json::json;

use crate::config::GameConfig;
use crate::events::{EventKind, EventLog};
use crate::players::PlayerRegistry;
use crate::state::{PlayerId, PlayerState, Position, Terrain};

/// The full `width × height` tile array.
///
/// Out-of-range lookups resolve to an Edge sentinel so neighbor-scanning
/// code never branches on bounds.
pub struct GameGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    edge: Tile,
}

impl GameGrid {
    /// Generates a map with uniformly random non-Edge terrain.
    pub fn generate(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let width = config.map_width;
        let height = config.map_height;
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let terrain =
                    Terrain::GENERATABLE[rng.gen_range(0..Terrain::GENERATABLE.len())];
                tiles.push(Tile::new(Position::new(x, y), terrain));
            }
        }
        Self {
            width,
            height,
            tiles,
            edge: Tile::edge(),
        }
    }

    /// Uniform-terrain map, for tests and scripted scenarios.
    pub fn flat(config: &GameConfig, terrain: Terrain) -> Self {
        let width = config.map_width;
        let height = config.map_height;
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(Position::new(x, y), terrain));
            }
        }
        Self {
            width,
            height,
            tiles,
            edge: Tile::edge(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// Tile lookup with the Edge sentinel for out-of-range coordinates.
    pub fn tile_at(&self, x: i32, y: i32) -> &Tile {
        match self.index(x, y) {
            Some(index) => &self.tiles[index],
            None => &self.edge,
        }
    }

    pub fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.index(position.x, position.y)
            .map(|index| &mut self.tiles[index])
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Moves a player's tile membership. Caller updates the player's own
    /// position cache.
    pub fn relocate(&mut self, player: &PlayerId, from: Position, to: Position) {
        if let Some(tile) = self.tile_mut(from) {
            tile.remove_occupant(player);
        }
        if let Some(tile) = self.tile_mut(to) {
            tile.add_occupant(player.clone());
        }
    }

    /// Random in-bounds position for a joining player.
    pub fn entry_position(&self, rng: &mut impl Rng) -> Position {
        Position::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height))
    }

    /// Grants each alive occupant this tick's terrain yield, filling
    /// empty hand slots up to the terrain amount. This is the only place
    /// research acquisition provenance is written.
    pub fn distribute_resources(&self, registry: &mut PlayerRegistry, events: &EventLog) {
        for tile in &self.tiles {
            let Some(reward) = tile.terrain().reward() else {
                continue;
            };
            for id in tile.occupants() {
                let Some(player) = registry.player_mut(id) else {
                    continue;
                };
                if !player.alive {
                    continue;
                }
                let mut granted = 0;
                for _ in 0..reward.amount {
                    let Some(slot) = player.hand.grant(reward.card, tile.position()) else {
                        break;
                    };
                    granted += 1;
                    events.append(
                        EventKind::CardDrawn,
                        Some(&player.id),
                        json!({
                            "card": reward.card.to_string(),
                            "card_slot": slot,
                            "x": tile.position().x,
                            "y": tile.position().y,
                        }),
                    );
                }
                if granted > 0 {
                    events.append(
                        EventKind::ResourceGained,
                        Some(&player.id),
                        json!({
                            "card": reward.card.to_string(),
                            "amount": granted,
                            "terrain": tile.terrain().to_string(),
                        }),
                    );
                }
            }
        }
    }

    /// Resolves combat on every tile concurrently and joins before
    /// returning.
    ///
    /// Alive players are grouped by position into disjoint mutable
    /// borrows, so the "one tile per player" partition is enforced by the
    /// borrow checker rather than by locks. Each worker touches exactly
    /// one tile and the players standing on it.
    pub fn resolve_combat_all_tiles(
        &mut self,
        registry: &mut PlayerRegistry,
        events: &EventLog,
        config: &GameConfig,
    ) {
        let mut groups: HashMap<Position, Vec<&mut PlayerState>> = HashMap::new();
        for player in registry.players_mut() {
            if player.alive {
                groups.entry(player.position).or_default().push(player);
            }
        }

        let work: Vec<(&mut Tile, Vec<&mut PlayerState>)> = self
            .tiles
            .iter_mut()
            .map(|tile| {
                let group = groups.remove(&tile.position()).unwrap_or_default();
                (tile, group)
            })
            .collect();

        work.into_par_iter().for_each(|(tile, mut group)| {
            tile.resolve_combat(&mut group, events, config);
        });
    }

    /// One infection step: every spreader increments each of its four
    /// cardinal in-bounds neighbors, bounded by the cutoff.
    pub fn spread_infection(&mut self, config: &GameConfig) {
        let spreaders: Vec<Position> = self
            .tiles
            .iter()
            .filter(|tile| tile.is_spreader(config))
            .map(Tile::position)
            .collect();

        for position in spreaders {
            for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
                if let Some(index) = self.index(position.x + dx, position.y + dy) {
                    self.tiles[index].spread_to(config);
                }
            }
        }
    }

    /// Fire attraction: pulls one zombie from each of the up-to-8
    /// surrounding tiles that have any, then adds the pulled total to the
    /// center without the cutoff cap.
    pub fn fire_attracting_to(&mut self, center: Position) {
        let mut pulled = 0;
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(index) = self.index(center.x + dx, center.y + dy) {
                    if self.tiles[index].remove_zombies(1) {
                        pulled += 1;
                    }
                }
            }
        }
        if pulled > 0 {
            if let Some(tile) = self.tile_mut(center) {
                tile.add_zombies(pulled);
            }
        }
    }

    /// 3×3 neighborhood of tile summaries centered on `center`, with
    /// Edge-defaulted summaries past the map boundary.
    pub fn surroundings(&self, center: Position, registry: &PlayerRegistry) -> Surroundings {
        let summarize = |dx: i32, dy: i32| {
            self.tile_at(center.x + dx, center.y + dy)
                .summary(|id| registry.player(id).map(|p| p.direction))
        };
        Surroundings {
            nw: summarize(-1, -1),
            nn: summarize(0, -1),
            ne: summarize(1, -1),
            ww: summarize(-1, 0),
            ce: summarize(0, 0),
            ee: summarize(1, 0),
            sw: summarize(-1, 1),
            ss: summarize(0, 1),
            se: summarize(1, 1),
        }
    }
}

/// The 3×3 neighborhood projection served to each player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Surroundings {
    pub nw: TileSummary,
    pub nn: TileSummary,
    pub ne: TileSummary,
    pub ww: TileSummary,
    pub ce: TileSummary,
    pub ee: TileSummary,
    pub sw: TileSummary,
    pub ss: TileSummary,
    pub se: TileSummary,
}
