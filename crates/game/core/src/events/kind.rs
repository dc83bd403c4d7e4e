/// Closed vocabulary of game events.
///
/// Every kind maps to exactly one [`Visibility`] rule through
/// [`EventKind::visibility`]; adding a variant forces that decision at
/// compile time instead of scattering it across query call sites.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EventKind {
    PlayerJoin,
    PlayerMove,
    CardSelected,
    CardPlayed,
    CardUsed,
    CardConsumed,
    CardDiscarded,
    CardDrawn,
    DiceRoll,
    CombatStart,
    CombatResult,
    ZombieSpawn,
    PlayerDeath,
    ResourceGained,
    GameTick,
}

/// Who may see events of a given kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// Only the event's own player.
    Owner,
    /// Every requester, including unknown player IDs.
    Global,
    /// Requesters named in the event's `involved_players` detail list, or
    /// the owner when no list is present.
    Participants,
}

impl EventKind {
    pub fn visibility(self) -> Visibility {
        match self {
            EventKind::PlayerDeath | EventKind::GameTick => Visibility::Global,
            EventKind::CombatResult => Visibility::Participants,
            EventKind::PlayerJoin
            | EventKind::PlayerMove
            | EventKind::CardSelected
            | EventKind::CardPlayed
            | EventKind::CardUsed
            | EventKind::CardConsumed
            | EventKind::CardDiscarded
            | EventKind::CardDrawn
            | EventKind::DiceRoll
            | EventKind::CombatStart
            | EventKind::ZombieSpawn
            | EventKind::ResourceGained => Visibility::Owner,
        }
    }
}
