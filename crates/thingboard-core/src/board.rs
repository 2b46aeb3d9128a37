//! The board document: authoritative card and section state.

use crate::card::{Card, CardId};
use crate::order::OrderStore;
use crate::pack::{self, PackItem, Packing};
use crate::section::{Section, SectionId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// A snapshot of board state for undo/redo.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardSnapshot {
    cards: HashMap<CardId, Card>,
    sections: HashMap<SectionId, Section>,
    section_order: Vec<SectionId>,
    order: OrderStore,
}

/// A dashboard document: every card and section, plus the persisted
/// display order.
///
/// Membership is authoritative on the cards (`card.section`); the order
/// store is a secondary display-order index kept consistent on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// All cards, keyed by ID.
    pub cards: HashMap<CardId, Card>,
    /// All sections, keyed by ID.
    pub sections: HashMap<SectionId, Section>,
    /// Render and hit-test priority of sections (back to front).
    pub section_order: Vec<SectionId>,
    /// Persisted display order of cards within each section.
    pub order: OrderStore,
    /// Undo history stack.
    #[serde(skip)]
    undo_stack: Vec<BoardSnapshot>,
    /// Redo history stack.
    #[serde(skip)]
    redo_stack: Vec<BoardSnapshot>,
}

impl Default for BoardDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardDocument {
    /// Create a new empty board.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            cards: HashMap::new(),
            sections: HashMap::new(),
            section_order: Vec::new(),
            order: OrderStore::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Copy of the layout state without the undo history, used as a drag
    /// baseline.
    pub fn clone_layout(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            cards: self.cards.clone(),
            sections: self.sections.clone(),
            section_order: self.section_order.clone(),
            order: self.order.clone(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            cards: self.cards.clone(),
            sections: self.sections.clone(),
            section_order: self.section_order.clone(),
            order: self.order.clone(),
        }
    }

    fn restore(&mut self, snapshot: BoardSnapshot) {
        self.cards = snapshot.cards;
        self.sections = snapshot.sections;
        self.section_order = snapshot.section_order;
        self.order = snapshot.order;
    }

    /// Push current state to the undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change. Returns false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(snapshot) = self.undo_stack.pop() {
            let current = self.snapshot();
            self.redo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    /// Redo the last undone change. Returns false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(snapshot) = self.redo_stack.pop() {
            let current = self.snapshot();
            self.undo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Add a section to the board.
    pub fn add_section(&mut self, section: Section) -> SectionId {
        let id = section.id;
        self.section_order.push(id);
        self.sections.insert(id, section);
        id
    }

    /// Remove a section. Member cards become free-floating at their current
    /// canvas position.
    pub fn remove_section(&mut self, id: SectionId) -> Option<Section> {
        let section = self.sections.remove(&id)?;
        self.section_order.retain(|s| *s != id);
        self.order.remove_section(id);
        let interior = section.interior_origin();
        for card in self.cards.values_mut() {
            if card.section == Some(id) {
                card.section = None;
                card.position += Vec2::new(interior.x, interior.y);
            }
        }
        Some(section)
    }

    /// Add a card. A reference to an unknown section is treated as
    /// unassigned rather than rejected.
    pub fn add_card(&mut self, mut card: Card) -> CardId {
        if let Some(section) = card.section {
            if self.sections.contains_key(&section) {
                let mut list = self.order.order_of(section).to_vec();
                list.push(card.id);
                let mut members = self.member_set(section);
                members.insert(card.id);
                self.order.set_order(section, list, &members);
            } else {
                card.section = None;
            }
        }
        let id = card.id;
        self.cards.insert(id, card);
        id
    }

    /// Remove a card from the board.
    pub fn remove_card(&mut self, id: CardId) -> Option<Card> {
        self.order.remove_card(id);
        self.cards.remove(&id)
    }

    /// IDs of the cards assigned to a section (authoritative membership).
    pub fn member_ids(&self, section: SectionId) -> Vec<CardId> {
        self.cards
            .values()
            .filter(|c| c.section == Some(section))
            .map(|c| c.id)
            .collect()
    }

    fn member_set(&self, section: SectionId) -> HashSet<CardId> {
        self.cards
            .values()
            .filter(|c| c.section == Some(section))
            .map(|c| c.id)
            .collect()
    }

    /// Member cards as the packer sees them.
    pub fn pack_items(&self, section: SectionId) -> Vec<PackItem> {
        self.cards
            .values()
            .filter(|c| c.section == Some(section))
            .map(|c| PackItem::new(c.id, c.size(), c.position))
            .collect()
    }

    /// Topmost section whose frame contains a canvas point.
    pub fn section_at(&self, point: Point) -> Option<SectionId> {
        self.section_order
            .iter()
            .rev()
            .copied()
            .find(|id| self.sections.get(id).is_some_and(|s| s.contains(point)))
    }

    /// A card's rectangle in canvas coordinates.
    pub fn card_canvas_rect(&self, id: CardId) -> Option<Rect> {
        let card = self.cards.get(&id)?;
        let rect = card.rect();
        match card.section.and_then(|s| self.sections.get(&s)) {
            Some(section) => {
                let origin = section.interior_origin();
                Some(rect + Vec2::new(origin.x, origin.y))
            }
            None => Some(rect),
        }
    }

    /// Move a card into a section at an interior position, maintaining the
    /// order lists on both sides.
    pub fn assign_card(&mut self, card: CardId, section: SectionId, position: Point) {
        let previous = match self.cards.get_mut(&card) {
            Some(c) => {
                let previous = c.section;
                c.section = Some(section);
                c.position = position;
                previous
            }
            None => return,
        };
        if previous != Some(section) {
            self.order.remove_card(card);
            let mut list = self.order.order_of(section).to_vec();
            list.push(card);
            let members = self.member_set(section);
            self.order.set_order(section, list, &members);
        }
    }

    /// Detach a card from its section, leaving it free at a canvas position.
    pub fn unassign_card(&mut self, card: CardId, position: Point) {
        if let Some(c) = self.cards.get_mut(&card) {
            c.section = None;
            c.position = position;
        }
        self.order.remove_card(card);
    }

    /// Ungroup: detach a card, keeping it where it visually sits, and
    /// re-pack the vacated section.
    pub fn ungroup_card(&mut self, card: CardId) -> bool {
        let Some(canvas_rect) = self.card_canvas_rect(card) else {
            return false;
        };
        let previous = self.cards.get(&card).and_then(|c| c.section);
        self.unassign_card(card, canvas_rect.origin());
        if let Some(section) = previous {
            self.reflow_section(section);
        }
        previous.is_some()
    }

    /// Write packed positions and the derived height back into the
    /// document. Returns whether anything changed.
    pub fn apply_packing(&mut self, section: SectionId, packing: &Packing) -> bool {
        let mut changed = false;
        for (id, pos) in &packing.positions {
            if let Some(card) = self.cards.get_mut(id) {
                if card.section == Some(section) && card.position != *pos {
                    card.position = *pos;
                    changed = true;
                }
            }
        }
        if let Some(sec) = self.sections.get_mut(&section) {
            let before = sec.height;
            sec.set_content_height(packing.height);
            changed |= (sec.height - before).abs() > f64::EPSILON;
        }
        changed
    }

    /// Full deterministic re-pack of one section from the display order.
    pub fn reflow_section(&mut self, section: SectionId) -> bool {
        let Some(sec) = self.sections.get(&section) else {
            return false;
        };
        let inner = sec.inner_width();
        let items = self.pack_items(section);
        let order = self.order.order_of(section).to_vec();
        let packing = pack::pack(inner, &items, &order);
        self.apply_packing(section, &packing)
    }

    /// Re-pack every section. Returns the sections whose geometry changed.
    pub fn reflow_all(&mut self) -> Vec<SectionId> {
        let ids = self.section_order.clone();
        ids.into_iter()
            .filter(|id| self.reflow_section(*id))
            .collect()
    }

    /// Overlap self-correction over the current positions of a section,
    /// without re-packing. Used after admitting upstream state that may
    /// assign identical coordinates.
    pub fn repair_section(&mut self, section: SectionId) -> bool {
        let Some(sec) = self.sections.get(&section) else {
            return false;
        };
        let inner = sec.inner_width();
        let items = self.pack_items(section);
        let mut packing = Packing {
            positions: items.iter().map(|i| (i.id, i.position)).collect(),
            height: 0.0,
        };
        pack::fix_overlaps(inner, &items, &mut packing);
        self.apply_packing(section, &packing)
    }

    /// Persist the reading order of a section's current arrangement into
    /// the order store. Returns the new order.
    pub fn persist_reading_order(&mut self, section: SectionId) -> Vec<CardId> {
        let entries: Vec<(CardId, Rect)> = self
            .cards
            .values()
            .filter(|c| c.section == Some(section))
            .map(|c| (c.id, c.rect()))
            .collect();
        let ordered = pack::reading_order(&entries);
        let members: HashSet<CardId> = entries.iter().map(|(id, _)| *id).collect();
        self.order.set_order(section, ordered.clone(), &members);
        ordered
    }

    /// Serialize the board to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a board from JSON. Order lists are re-validated against
    /// membership so a hand-edited snapshot cannot carry stale entries.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut board: Self = serde_json::from_str(json)?;
        let cards = board.cards.clone();
        board
            .order
            .prune(|section, card| cards.get(&card).is_some_and(|c| c.section == Some(section)));
        Ok(board)
    }
}
