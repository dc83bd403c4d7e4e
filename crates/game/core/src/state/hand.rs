use crate::config::GameConfig;
use crate::state::{Card, Position};

/// One hand slot: a card plus, for research cards, the coordinates where
/// it was picked up.
///
/// Keeping the provenance inside the slot makes the invariant "slot
/// cleared implies provenance cleared" structural rather than a
/// bookkeeping duty spread across call sites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandSlot {
    pub card: Card,
    pub acquired_at: Option<Position>,
}

impl HandSlot {
    pub const EMPTY: Self = Self {
        card: Card::None,
        acquired_at: None,
    };
}

/// Fixed-size hand of [`GameConfig::HAND_SLOTS`] card slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hand {
    slots: [HandSlot; GameConfig::HAND_SLOTS],
}

impl Hand {
    /// Hand with the given cards and no provenance.
    pub fn from_cards(cards: [Card; GameConfig::HAND_SLOTS]) -> Self {
        Self {
            slots: cards.map(|card| HandSlot {
                card,
                acquired_at: None,
            }),
        }
    }

    /// The starting hand every player joins with.
    pub fn starting() -> Self {
        Self::from_cards([Card::Food, Card::Wood, Card::Wood, Card::None, Card::None])
    }

    pub fn slots(&self) -> &[HandSlot; GameConfig::HAND_SLOTS] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> &HandSlot {
        &self.slots[index]
    }

    /// Index of the first empty slot, if any.
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.card == Card::None)
    }

    /// Index of the first slot holding `card`, if any.
    pub fn find(&self, card: Card) -> Option<usize> {
        if card == Card::None {
            return None;
        }
        self.slots.iter().position(|slot| slot.card == card)
    }

    /// Number of non-empty slots.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.card.is_some()).count()
    }

    /// Places `card` into the first empty slot, recording provenance for
    /// research cards. Returns the slot index, or `None` when full.
    pub fn grant(&mut self, card: Card, origin: Position) -> Option<usize> {
        let index = self.first_empty()?;
        self.slots[index] = HandSlot {
            card,
            acquired_at: (card == Card::Research).then_some(origin),
        };
        Some(index)
    }

    /// Empties the slot and returns the card it held.
    pub fn clear_slot(&mut self, index: usize) -> Card {
        let card = self.slots[index].card;
        self.slots[index] = HandSlot::EMPTY;
        card
    }

    /// Card contents without provenance, for snapshots.
    pub fn cards(&self) -> [Card; GameConfig::HAND_SLOTS] {
        self.slots.map(|slot| slot.card)
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self {
            slots: [HandSlot::EMPTY; GameConfig::HAND_SLOTS],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_hand_contents() {
        let hand = Hand::starting();
        assert_eq!(
            hand.cards(),
            [Card::Food, Card::Wood, Card::Wood, Card::None, Card::None]
        );
        assert_eq!(hand.filled(), 3);
        assert_eq!(hand.first_empty(), Some(3));
    }

    #[test]
    fn grant_records_provenance_only_for_research() {
        let mut hand = Hand::default();
        let origin = Position::new(4, 7);

        let food = hand.grant(Card::Food, origin).unwrap();
        assert_eq!(hand.slot(food).acquired_at, None);

        let research = hand.grant(Card::Research, origin).unwrap();
        assert_eq!(hand.slot(research).acquired_at, Some(origin));
    }

    #[test]
    fn grant_returns_none_when_full() {
        let mut hand = Hand::from_cards([Card::Wood; GameConfig::HAND_SLOTS]);
        assert_eq!(hand.grant(Card::Food, Position::ORIGIN), None);
    }

    #[test]
    fn clearing_a_slot_drops_provenance() {
        let mut hand = Hand::default();
        let index = hand.grant(Card::Research, Position::new(1, 1)).unwrap();
        assert_eq!(hand.clear_slot(index), Card::Research);
        assert_eq!(*hand.slot(index), HandSlot::EMPTY);
    }

    #[test]
    fn find_never_matches_the_empty_sentinel() {
        let hand = Hand::default();
        assert_eq!(hand.find(Card::None), None);
    }
}
