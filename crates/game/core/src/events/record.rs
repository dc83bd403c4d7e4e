use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::events::EventKind;
use crate::state::PlayerId;

/// Monotonic identifier assigned to each appended event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evt-{}", self.0)
    }
}

/// One append-only log entry. Never mutated after being written.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameEvent {
    pub id: EventId,
    pub kind: EventKind,
    /// Originating player; `None` for map-global events.
    pub player_id: Option<PlayerId>,
    pub timestamp: DateTime<Utc>,
    pub turn: u64,
    /// Free-form structured payload.
    pub details: Value,
}

impl GameEvent {
    /// Participant IDs from the `involved_players` detail list, if present.
    pub fn participants(&self) -> Option<impl Iterator<Item = &str>> {
        self.details
            .get("involved_players")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str))
    }
}

/// Filtering options for event queries, applied on top of the
/// per-kind visibility policy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventFilters {
    /// Only this event kind.
    pub kind: Option<EventKind>,
    /// Only events at or after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Cap on the number of returned events.
    pub limit: Option<usize>,
    /// Only events from the most recent N turns.
    pub last_n_turns: Option<u64>,
}

impl EventFilters {
    pub fn kind(kind: EventKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn last_turns(turns: u64) -> Self {
        Self {
            last_n_turns: Some(turns),
            ..Self::default()
        }
    }
}
