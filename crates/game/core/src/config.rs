/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Grid width in tiles.
    pub map_width: i32,
    /// Grid height in tiles.
    pub map_height: i32,
    /// Real-time seconds between ticks.
    pub turn_length_secs: u32,
    /// Total ticks before the round ends without a winner.
    pub max_turns: u32,
    /// Non-local research cards required at a laboratory to win.
    pub victory_research: usize,
    /// Zombie count at or above which a tile spreads infection; also the
    /// cap for the bounded increment.
    pub zombie_cutoff: i32,
    /// Fixed strength contributed by playing a weapon card.
    pub weapon_strength: i32,
    /// Minimum unarmed dice roll (inclusive).
    pub attack_min: i32,
    /// Maximum unarmed dice roll (inclusive).
    pub attack_max: i32,
    /// Bot population the runtime keeps topped up each turn.
    pub bot_count: usize,
    /// Join names longer than this are truncated.
    pub name_max_length: usize,
    /// Default `last_n_turns` window for event queries.
    pub default_reported_turns: u64,
    /// Process salt mixed into opaque player IDs.
    pub id_salt: String,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Number of card slots in a player's hand.
    pub const HAND_SLOTS: usize = 5;
    /// Hands are trimmed down to this many cards after consumption.
    pub const HAND_LIMIT: usize = 4;
    /// Slot discarded when the player's discard choice is absent or unset.
    pub const FALLBACK_DISCARD_SLOT: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAP_WIDTH: i32 = 50;
    pub const DEFAULT_MAP_HEIGHT: i32 = 50;
    pub const DEFAULT_TURN_LENGTH_SECS: u32 = 15;
    pub const DEFAULT_MAX_TURNS: u32 = 500;
    pub const DEFAULT_VICTORY_RESEARCH: usize = 2;
    pub const DEFAULT_ZOMBIE_CUTOFF: i32 = 3;
    pub const DEFAULT_WEAPON_STRENGTH: i32 = 3;
    pub const DEFAULT_ATTACK_MIN: i32 = 1;
    pub const DEFAULT_ATTACK_MAX: i32 = 6;
    pub const DEFAULT_NAME_MAX_LENGTH: usize = 20;
    pub const DEFAULT_REPORTED_TURNS: u64 = 5;

    pub fn new() -> Self {
        Self {
            map_width: Self::DEFAULT_MAP_WIDTH,
            map_height: Self::DEFAULT_MAP_HEIGHT,
            turn_length_secs: Self::DEFAULT_TURN_LENGTH_SECS,
            max_turns: Self::DEFAULT_MAX_TURNS,
            victory_research: Self::DEFAULT_VICTORY_RESEARCH,
            zombie_cutoff: Self::DEFAULT_ZOMBIE_CUTOFF,
            weapon_strength: Self::DEFAULT_WEAPON_STRENGTH,
            attack_min: Self::DEFAULT_ATTACK_MIN,
            attack_max: Self::DEFAULT_ATTACK_MAX,
            bot_count: 0,
            name_max_length: Self::DEFAULT_NAME_MAX_LENGTH,
            default_reported_turns: Self::DEFAULT_REPORTED_TURNS,
            id_salt: "6LIBN8OWPzTKctUvbZtXV2mFn2tCq3qZKjHYbTTnLWtu6oGTU3ow3tuNx9SBTuND"
                .to_owned(),
        }
    }

    /// Small map preset used by tests and local experiments.
    pub fn with_dimensions(map_width: i32, map_height: i32) -> Self {
        Self {
            map_width,
            map_height,
            ..Self::new()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
