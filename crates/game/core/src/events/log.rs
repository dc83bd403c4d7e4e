use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde_json::Value;
use strum::EnumCount as _;

use crate::events::{EventFilters, EventId, EventKind, GameEvent, Visibility};
use crate::state::PlayerId;

/// Thread-safe, append-only store of game events.
///
/// Appends take the write lock briefly; queries take the read lock.
/// Aggregate counters live outside the lock as atomics so status reads
/// never contend with combat workers appending in parallel.
pub struct EventLog {
    events: RwLock<Vec<GameEvent>>,
    next_id: AtomicU64,
    current_turn: AtomicU64,
    total: AtomicU64,
    per_kind: [AtomicU64; EventKind::COUNT],
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::with_capacity(1024)),
            next_id: AtomicU64::new(0),
            current_turn: AtomicU64::new(0),
            total: AtomicU64::new(0),
            per_kind: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Appends an event stamped with the current turn and wall clock.
    /// Safe under unlimited concurrent callers.
    pub fn append(&self, kind: EventKind, player_id: Option<&PlayerId>, details: Value) {
        let event = GameEvent {
            id: EventId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            kind,
            player_id: player_id.cloned(),
            timestamp: Utc::now(),
            turn: self.current_turn.load(Ordering::Relaxed),
            details,
        };

        let mut events = match self.events.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event);
        drop(events);

        self.total.fetch_add(1, Ordering::Relaxed);
        self.per_kind[kind as usize].fetch_add(1, Ordering::Relaxed);
    }

    /// Advances the turn counter and returns the new turn number.
    pub fn advance_turn(&self) -> u64 {
        self.current_turn.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn current_turn(&self) -> u64 {
        self.current_turn.load(Ordering::Relaxed)
    }

    /// Total number of appended events, lock-free.
    pub fn total_events(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Number of appended events of one kind, lock-free.
    pub fn count_of(&self, kind: EventKind) -> u64 {
        self.per_kind[kind as usize].load(Ordering::Relaxed)
    }

    /// Events visible to `player_id`, oldest first, after applying the
    /// visibility policy and the given filters.
    ///
    /// An unknown player ID is not an error: such a requester simply sees
    /// only global events.
    pub fn query(&self, player_id: &PlayerId, filters: &EventFilters) -> Vec<GameEvent> {
        let min_turn = filters.last_n_turns.map(|window| {
            self.current_turn().saturating_sub(window)
        });

        let events = match self.events.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Scan newest-first so the limit keeps the most recent matches,
        // then restore chronological order.
        let mut result: Vec<GameEvent> = Vec::new();
        for event in events.iter().rev() {
            if let Some(min_turn) = min_turn {
                if event.turn < min_turn {
                    continue;
                }
            }
            if !Self::visible_to(event, player_id) {
                continue;
            }
            if let Some(kind) = filters.kind {
                if event.kind != kind {
                    continue;
                }
            }
            if let Some(since) = filters.since {
                if event.timestamp < since {
                    continue;
                }
            }
            result.push(event.clone());
            if let Some(limit) = filters.limit {
                if result.len() >= limit {
                    break;
                }
            }
        }
        result.reverse();
        result
    }

    fn visible_to(event: &GameEvent, player_id: &PlayerId) -> bool {
        match event.kind.visibility() {
            Visibility::Global => true,
            Visibility::Owner => event.player_id.as_ref() == Some(player_id),
            Visibility::Participants => match event.participants() {
                Some(mut participants) => {
                    participants.any(|id| id == player_id.as_str())
                }
                None => event.player_id.as_ref() == Some(player_id),
            },
        }
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pid(id: &str) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn movement_is_private_and_death_is_global() {
        let log = EventLog::new();
        log.append(EventKind::PlayerMove, Some(&pid("a")), json!({}));
        log.append(EventKind::PlayerDeath, Some(&pid("b")), json!({}));

        let seen_by_b = log.query(&pid("b"), &EventFilters::default());
        assert_eq!(seen_by_b.len(), 1);
        assert_eq!(seen_by_b[0].kind, EventKind::PlayerDeath);

        let seen_by_a = log.query(&pid("a"), &EventFilters::default());
        assert_eq!(seen_by_a.len(), 2);

        let seen_by_nobody = log.query(&pid("nonexistent"), &EventFilters::default());
        assert_eq!(seen_by_nobody.len(), 1);
        assert_eq!(seen_by_nobody[0].kind, EventKind::PlayerDeath);
    }

    #[test]
    fn combat_results_are_visible_to_participants() {
        let log = EventLog::new();
        log.append(
            EventKind::CombatResult,
            None,
            json!({ "involved_players": ["a", "b"] }),
        );
        // No participant list: falls back to the owner.
        log.append(EventKind::CombatResult, Some(&pid("c")), json!({}));

        assert_eq!(log.query(&pid("a"), &EventFilters::default()).len(), 1);
        assert_eq!(log.query(&pid("b"), &EventFilters::default()).len(), 1);
        assert_eq!(log.query(&pid("c"), &EventFilters::default()).len(), 1);
        assert!(log.query(&pid("d"), &EventFilters::default()).is_empty());
    }

    #[test]
    fn results_are_chronological_and_limited_to_the_newest() {
        let log = EventLog::new();
        for n in 0..5 {
            log.append(EventKind::PlayerMove, Some(&pid("a")), json!({ "n": n }));
        }

        let limited = log.query(
            &pid("a"),
            &EventFilters {
                limit: Some(2),
                ..EventFilters::default()
            },
        );
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].details["n"], 3);
        assert_eq!(limited[1].details["n"], 4);
        assert!(limited[0].id < limited[1].id);
    }

    #[test]
    fn kind_filter_applies_on_top_of_visibility() {
        let log = EventLog::new();
        log.append(EventKind::PlayerMove, Some(&pid("a")), json!({}));
        log.append(EventKind::CardConsumed, Some(&pid("a")), json!({}));

        let moves = log.query(&pid("a"), &EventFilters::kind(EventKind::PlayerMove));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].kind, EventKind::PlayerMove);
    }

    #[test]
    fn turn_window_drops_old_events() {
        let log = EventLog::new();
        log.append(EventKind::PlayerMove, Some(&pid("a")), json!({ "age": "old" }));
        for _ in 0..3 {
            log.advance_turn();
        }
        log.append(EventKind::PlayerMove, Some(&pid("a")), json!({ "age": "new" }));

        let recent = log.query(&pid("a"), &EventFilters::last_turns(2));
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].details["age"], "new");

        let all = log.query(&pid("a"), &EventFilters::default());
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn counters_track_appends_per_kind() {
        let log = EventLog::new();
        log.append(EventKind::DiceRoll, Some(&pid("a")), json!({}));
        log.append(EventKind::DiceRoll, Some(&pid("b")), json!({}));
        log.append(EventKind::GameTick, None, json!({}));

        assert_eq!(log.total_events(), 3);
        assert_eq!(log.count_of(EventKind::DiceRoll), 2);
        assert_eq!(log.count_of(EventKind::GameTick), 1);
        assert_eq!(log.count_of(EventKind::PlayerDeath), 0);
    }

    #[test]
    fn concurrent_appends_do_not_lose_events() {
        let log = std::sync::Arc::new(EventLog::new());
        let mut handles = Vec::new();
        for worker in 0..8 {
            let log = log.clone();
            handles.push(std::thread::spawn(move || {
                let id = pid(&format!("w{worker}"));
                for _ in 0..100 {
                    log.append(EventKind::DiceRoll, Some(&id), json!({}));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(log.total_events(), 800);
        assert_eq!(log.count_of(EventKind::DiceRoll), 800);
        assert_eq!(log.query(&pid("w0"), &EventFilters::default()).len(), 100);
    }
}
