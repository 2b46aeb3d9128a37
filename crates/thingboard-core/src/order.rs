//! Persisted display order of cards within sections.

use crate::card::CardId;
use crate::section::SectionId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Per-section display order of member cards.
///
/// The board's card-to-section assignment is authoritative; this index only
/// records the user-significant sequence within each section. Every write
/// drops entries that no longer reference current members, so a stale
/// identifier never survives a reflow cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderStore {
    orders: HashMap<SectionId, Vec<CardId>>,
}

impl OrderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Display order for a section. Empty when never written.
    pub fn order_of(&self, section: SectionId) -> &[CardId] {
        self.orders.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace a section's order, keeping only current `members` and
    /// dropping duplicates.
    pub fn set_order(&mut self, section: SectionId, cards: Vec<CardId>, members: &HashSet<CardId>) {
        let mut seen = HashSet::with_capacity(cards.len());
        let kept: Vec<CardId> = cards
            .into_iter()
            .filter(|id| members.contains(id) && seen.insert(*id))
            .collect();
        if kept.is_empty() {
            self.orders.remove(&section);
        } else {
            self.orders.insert(section, kept);
        }
    }

    /// Drop one card from every list.
    pub fn remove_card(&mut self, card: CardId) {
        for list in self.orders.values_mut() {
            list.retain(|id| *id != card);
        }
        self.orders.retain(|_, list| !list.is_empty());
    }

    /// Drop a section's list entirely.
    pub fn remove_section(&mut self, section: SectionId) {
        self.orders.remove(&section);
    }

    /// Whether a section's list mentions a card.
    pub fn contains(&self, section: SectionId, card: CardId) -> bool {
        self.order_of(section).contains(&card)
    }

    /// Re-validate every list against current membership.
    ///
    /// `is_member(section, card)` must report the authoritative assignment.
    pub fn prune(&mut self, is_member: impl Fn(SectionId, CardId) -> bool) {
        for (section, list) in self.orders.iter_mut() {
            list.retain(|card| is_member(*section, *card));
        }
        self.orders.retain(|_, list| !list.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ids(n: usize) -> Vec<CardId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_set_order_filters_non_members() {
        let mut store = OrderStore::new();
        let section = Uuid::new_v4();
        let cards = ids(3);
        let members: HashSet<CardId> = cards[..2].iter().copied().collect();

        store.set_order(section, cards.clone(), &members);
        assert_eq!(store.order_of(section), &cards[..2]);
    }

    #[test]
    fn test_set_order_drops_duplicates() {
        let mut store = OrderStore::new();
        let section = Uuid::new_v4();
        let cards = ids(2);
        let members: HashSet<CardId> = cards.iter().copied().collect();

        store.set_order(
            section,
            vec![cards[0], cards[1], cards[0]],
            &members,
        );
        assert_eq!(store.order_of(section), cards.as_slice());
    }

    #[test]
    fn test_remove_card_prunes_all_lists() {
        let mut store = OrderStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let cards = ids(2);
        let members: HashSet<CardId> = cards.iter().copied().collect();

        store.set_order(a, cards.clone(), &members);
        store.set_order(b, vec![cards[0]], &members);
        store.remove_card(cards[0]);

        assert_eq!(store.order_of(a), &cards[1..]);
        assert!(store.order_of(b).is_empty());
    }

    #[test]
    fn test_prune_against_membership() {
        let mut store = OrderStore::new();
        let section = Uuid::new_v4();
        let cards = ids(3);
        let members: HashSet<CardId> = cards.iter().copied().collect();
        store.set_order(section, cards.clone(), &members);

        // Only the middle card is still a member.
        store.prune(|_, card| card == cards[1]);
        assert_eq!(store.order_of(section), &cards[1..2]);
    }
}
