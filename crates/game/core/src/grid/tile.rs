use rand::Rng;
use serde_json::json;

use crate::config::GameConfig;
use crate::events::{EventKind, EventLog};
use crate::state::{Card, Direction, PlayerId, PlayerState, Position, Terrain};

/// One grid cell: terrain, zombie count, and the players currently here.
///
/// A player appears in exactly one tile's occupant set at all times,
/// mirroring its own position cache. That exact partition is what makes
/// the per-tile combat fan-out safe without locks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    position: Position,
    terrain: Terrain,
    zombies: i32,
    occupants: Vec<PlayerId>,
}

impl Tile {
    pub fn new(position: Position, terrain: Terrain) -> Self {
        Self {
            position,
            terrain,
            zombies: 0,
            occupants: Vec::new(),
        }
    }

    /// Out-of-bounds sentinel. Zombie count -1 marks it as synthetic.
    pub fn edge() -> Self {
        Self {
            position: Position::new(-1, -1),
            terrain: Terrain::Edge,
            zombies: -1,
            occupants: Vec::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn zombies(&self) -> i32 {
        self.zombies
    }

    pub fn occupants(&self) -> &[PlayerId] {
        &self.occupants
    }

    /// Adds a player here. Idempotent.
    pub fn add_occupant(&mut self, player: PlayerId) {
        if !self.occupants.contains(&player) {
            self.occupants.push(player);
        }
    }

    /// Removes a player. Idempotent; unknown players are a no-op.
    pub fn remove_occupant(&mut self, player: &PlayerId) {
        if let Some(index) = self.occupants.iter().position(|id| id == player) {
            self.occupants.swap_remove(index);
        }
    }

    /// A tile propagates infection when it is a city or its horde has
    /// reached the cutoff.
    pub fn is_spreader(&self, config: &GameConfig) -> bool {
        self.terrain == Terrain::City || self.zombies >= config.zombie_cutoff
    }

    /// Bounded infection increment: grows the horde by one unless the
    /// cutoff has been reached.
    pub fn spread_to(&mut self, config: &GameConfig) {
        if self.zombies < config.zombie_cutoff {
            self.zombies += 1;
        }
    }

    /// Uncapped increment, used by fire attraction only.
    pub fn spread_to_unbound(&mut self) {
        self.zombies += 1;
    }

    pub fn add_zombies(&mut self, count: i32) {
        self.zombies += count;
    }

    /// Removes up to `count` zombies. Returns false and clamps to zero
    /// when fewer were present, so callers know how trustworthy the pull
    /// was.
    pub fn remove_zombies(&mut self, count: i32) -> bool {
        if self.zombies < count {
            self.zombies = 0;
            return false;
        }
        self.zombies -= count;
        true
    }

    /// Resolves one tick of combat between this tile's horde and the
    /// given occupants, which must be exactly the alive players standing
    /// here.
    ///
    /// Strict majority rule: the players need `total > zombies` to clear
    /// the tile; a tie goes to the zombies and everyone dies, with the
    /// dead joining the horde through the bounded increment.
    pub fn resolve_combat(
        &mut self,
        occupants: &mut [&mut PlayerState],
        events: &EventLog,
        config: &GameConfig,
    ) {
        if occupants.is_empty() {
            return;
        }

        events.append(
            EventKind::CombatStart,
            None,
            json!({
                "x": self.position.x,
                "y": self.position.y,
                "zombies": self.zombies,
                "players": occupants.len(),
            }),
        );

        let mut rng = rand::thread_rng();
        let mut total_strength = 0;
        for player in occupants.iter_mut() {
            let weapon_slot = (player.play == Card::Weapon)
                .then(|| player.hand.find(Card::Weapon))
                .flatten();
            let strength = match weapon_slot {
                Some(slot) => {
                    player.hand.clear_slot(slot);
                    events.append(
                        EventKind::CardUsed,
                        Some(&player.id),
                        json!({
                            "card": Card::Weapon.to_string(),
                            "card_slot": slot,
                            "strength": config.weapon_strength,
                        }),
                    );
                    config.weapon_strength
                }
                None => {
                    let roll = rng.gen_range(config.attack_min..=config.attack_max);
                    events.append(
                        EventKind::DiceRoll,
                        Some(&player.id),
                        json!({ "roll": roll }),
                    );
                    roll
                }
            };
            total_strength += strength;
            // Back to the default play: roll the dice next fight.
            player.play = Card::Dice;
        }

        let involved: Vec<String> = occupants.iter().map(|p| p.id.to_string()).collect();

        if total_strength > self.zombies {
            events.append(
                EventKind::CombatResult,
                None,
                json!({
                    "x": self.position.x,
                    "y": self.position.y,
                    "involved_players": involved,
                    "total_strength": total_strength,
                    "zombies": self.zombies,
                    "players_won": true,
                }),
            );
            self.zombies = 0;
        } else {
            let zombies_before = self.zombies;
            let mut killed = 0;
            for player in occupants.iter_mut() {
                player.alive = false;
                killed += 1;
                events.append(
                    EventKind::PlayerDeath,
                    Some(&player.id),
                    json!({
                        "reason": "combat",
                        "x": self.position.x,
                        "y": self.position.y,
                    }),
                );
            }
            for _ in 0..killed {
                self.spread_to(config);
            }
            events.append(
                EventKind::ZombieSpawn,
                None,
                json!({
                    "x": self.position.x,
                    "y": self.position.y,
                    "risen": self.zombies - zombies_before,
                }),
            );
            events.append(
                EventKind::CombatResult,
                None,
                json!({
                    "x": self.position.x,
                    "y": self.position.y,
                    "involved_players": involved,
                    "total_strength": total_strength,
                    "zombies": zombies_before,
                    "players_won": false,
                }),
            );
        }
    }

    /// Read-only projection for the external layer. Exposes aggregate
    /// counts only, never identities or hands; the `plan_*` fields report
    /// how many occupants plan to leave in each cardinal direction.
    pub fn summary(&self, direction_of: impl Fn(&PlayerId) -> Option<Direction>) -> TileSummary {
        let mut summary = TileSummary {
            terrain: self.terrain,
            zombies: self.zombies,
            players: self.occupants.len(),
            plan_north: 0,
            plan_east: 0,
            plan_south: 0,
            plan_west: 0,
        };
        for id in &self.occupants {
            match direction_of(id) {
                Some(Direction::North) => summary.plan_north += 1,
                Some(Direction::East) => summary.plan_east += 1,
                Some(Direction::South) => summary.plan_south += 1,
                Some(Direction::West) => summary.plan_west += 1,
                Some(Direction::Stay) | None => {}
            }
        }
        summary
    }
}

/// Aggregate view of one tile, the unit the API layer serializes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSummary {
    pub terrain: Terrain,
    pub zombies: i32,
    pub players: usize,
    pub plan_north: usize,
    pub plan_east: usize,
    pub plan_south: usize,
    pub plan_west: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Hand;

    fn player(id: &str, position: Position) -> PlayerState {
        PlayerState::new(PlayerId::new(id), id.to_owned(), position)
    }

    #[test]
    fn occupant_add_is_idempotent_and_remove_tolerates_strangers() {
        let mut tile = Tile::new(Position::ORIGIN, Terrain::Farm);
        let id = PlayerId::new("a");

        tile.add_occupant(id.clone());
        tile.add_occupant(id.clone());
        assert_eq!(tile.occupants().len(), 1);

        tile.remove_occupant(&PlayerId::new("ghost"));
        assert_eq!(tile.occupants().len(), 1);

        tile.remove_occupant(&id);
        tile.remove_occupant(&id);
        assert!(tile.occupants().is_empty());
    }

    #[test]
    fn spread_to_respects_the_cutoff() {
        let config = GameConfig::new();
        let mut tile = Tile::new(Position::ORIGIN, Terrain::Farm);

        for _ in 0..10 {
            tile.spread_to(&config);
        }
        assert_eq!(tile.zombies(), config.zombie_cutoff);

        tile.spread_to_unbound();
        assert_eq!(tile.zombies(), config.zombie_cutoff + 1);
    }

    #[test]
    fn cities_always_spread_and_hordes_spread_past_the_cutoff() {
        let config = GameConfig::new();
        let city = Tile::new(Position::ORIGIN, Terrain::City);
        assert!(city.is_spreader(&config));

        let mut farm = Tile::new(Position::ORIGIN, Terrain::Farm);
        assert!(!farm.is_spreader(&config));
        farm.add_zombies(config.zombie_cutoff);
        assert!(farm.is_spreader(&config));
    }

    #[test]
    fn remove_zombies_reports_shortfall_and_clamps() {
        let mut tile = Tile::new(Position::ORIGIN, Terrain::Farm);
        tile.add_zombies(2);

        assert!(tile.remove_zombies(1));
        assert!(!tile.remove_zombies(5));
        assert_eq!(tile.zombies(), 0);
    }

    #[test]
    fn overwhelming_horde_kills_an_unarmed_player() {
        let config = GameConfig::new();
        let events = EventLog::new();
        let mut tile = Tile::new(Position::ORIGIN, Terrain::Farm);
        tile.add_zombies(100);

        let mut lone = player("lone", Position::ORIGIN);
        tile.resolve_combat(&mut [&mut lone], &events, &config);

        assert!(!lone.alive);
        // Bounded increment: the cutoff is far below 100, so the count
        // stays where it was.
        assert_eq!(tile.zombies(), 100);
    }

    #[test]
    fn any_roll_beats_an_empty_tile() {
        let config = GameConfig::new();
        let events = EventLog::new();
        let mut tile = Tile::new(Position::ORIGIN, Terrain::Farm);

        let mut fighter = player("fighter", Position::ORIGIN);
        tile.resolve_combat(&mut [&mut fighter], &events, &config);

        assert!(fighter.alive);
        assert_eq!(tile.zombies(), 0);
        assert_eq!(fighter.play, Card::Dice);
    }

    #[test]
    fn played_weapon_is_spent_and_counts_fixed_strength() {
        let config = GameConfig::new();
        let events = EventLog::new();
        let mut tile = Tile::new(Position::ORIGIN, Terrain::Farm);
        tile.add_zombies(config.weapon_strength - 1);

        let mut armed = player("armed", Position::ORIGIN);
        armed.hand = Hand::from_cards([
            Card::Weapon,
            Card::None,
            Card::None,
            Card::None,
            Card::None,
        ]);
        armed.play = Card::Weapon;

        tile.resolve_combat(&mut [&mut armed], &events, &config);

        assert!(armed.alive);
        assert_eq!(tile.zombies(), 0);
        assert_eq!(armed.hand.find(Card::Weapon), None);
    }

    #[test]
    fn ties_go_to_the_zombies() {
        let config = GameConfig::new();
        let events = EventLog::new();
        let mut tile = Tile::new(Position::ORIGIN, Terrain::Farm);
        // Weapon play is deterministic: strength exactly equals the horde.
        tile.add_zombies(config.weapon_strength);

        let mut armed = player("armed", Position::ORIGIN);
        armed.hand = Hand::from_cards([
            Card::Weapon,
            Card::None,
            Card::None,
            Card::None,
            Card::None,
        ]);
        armed.play = Card::Weapon;

        tile.resolve_combat(&mut [&mut armed], &events, &config);

        assert!(!armed.alive);
        assert_eq!(tile.zombies(), config.weapon_strength);
    }

    #[test]
    fn empty_tile_combat_is_a_no_op() {
        let config = GameConfig::new();
        let events = EventLog::new();
        let mut tile = Tile::new(Position::ORIGIN, Terrain::Farm);
        tile.add_zombies(2);

        tile.resolve_combat(&mut [], &events, &config);

        assert_eq!(tile.zombies(), 2);
        assert_eq!(events.total_events(), 0);
    }

    #[test]
    fn summary_counts_pending_cardinal_moves_only() {
        let mut tile = Tile::new(Position::ORIGIN, Terrain::City);
        tile.add_zombies(2);
        for id in ["a", "b", "c"] {
            tile.add_occupant(PlayerId::new(id));
        }

        let summary = tile.summary(|id| match id.as_str() {
            "a" => Some(Direction::North),
            "b" => Some(Direction::North),
            "c" => Some(Direction::Stay),
            _ => None,
        });

        assert_eq!(summary.terrain, Terrain::City);
        assert_eq!(summary.zombies, 2);
        assert_eq!(summary.players, 3);
        assert_eq!(summary.plan_north, 2);
        assert_eq!(summary.plan_east, 0);
        assert_eq!(summary.plan_south, 0);
        assert_eq!(summary.plan_west, 0);
    }
}
