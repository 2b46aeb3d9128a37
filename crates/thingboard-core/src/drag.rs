//! Pointer-driven card moves with live cross-section preview.
//!
//! A gesture snapshots the board at start (the baseline) and computes every
//! preview from that snapshot, never from the previous frame, so repeated
//! moves cannot compound drift. Exactly one document mutation happens per
//! completed gesture, on drop; a cancelled gesture discards the baseline.

use crate::board::BoardDocument;
use crate::card::CardId;
use crate::events::CommitEvent;
use crate::geometry::{self, GAP};
use crate::pack::{self, FixedCard, PackItem, Packing};
use crate::section::SectionId;
use kurbo::{Point, Rect, Vec2};
use std::collections::HashMap;

/// Live preview of the board while a card is being dragged.
#[derive(Debug, Clone)]
pub struct DragPreview {
    /// Section the card would join if released now.
    pub target: Option<SectionId>,
    /// Canvas rectangle of the dragged card, tracking the pointer.
    pub card_rect: Rect,
    /// Re-packed arrangement of each section affected by the hypothesis.
    pub sections: HashMap<SectionId, Packing>,
}

/// An in-progress card drag.
#[derive(Debug, Clone)]
pub struct DragGesture {
    card: CardId,
    baseline: BoardDocument,
    /// Pointer offset from the card's canvas origin at grab time.
    grab_offset: Vec2,
}

impl DragGesture {
    /// Start dragging a card. Returns `None` if the card does not exist.
    pub fn begin(board: &BoardDocument, card: CardId, pointer: Point) -> Option<Self> {
        let rect = board.card_canvas_rect(card)?;
        Some(Self {
            card,
            baseline: board.clone_layout(),
            grab_offset: pointer - rect.origin(),
        })
    }

    /// The card being dragged.
    pub fn card(&self) -> CardId {
        self.card
    }

    /// Compute the preview for the current pointer position, from the
    /// baseline.
    pub fn preview(&self, pointer: Point) -> DragPreview {
        let origin = pointer - self.grab_offset;
        let Some(card) = self.baseline.cards.get(&self.card) else {
            return DragPreview {
                target: None,
                card_rect: Rect::from_origin_size(origin, kurbo::Size::ZERO),
                sections: HashMap::new(),
            };
        };
        let size = card.size();
        let card_rect = Rect::from_origin_size(origin, size);
        let mut sections = HashMap::new();

        match self.baseline.section_at(card_rect.center()) {
            Some(target) => {
                let section = &self.baseline.sections[&target];
                let interior = section.interior_origin();
                let fixed = FixedCard {
                    id: self.card,
                    position: Point::new(origin.x - interior.x, origin.y - interior.y),
                    size,
                };
                let mut items = self.baseline.pack_items(target);
                if card.section != Some(target) {
                    items.push(PackItem::new(self.card, size, fixed.position));
                }
                let order = self.baseline.order.order_of(target).to_vec();
                let packing = pack::pack_with_fixed(section.inner_width(), &items, &order, &fixed);
                sections.insert(target, packing);
                DragPreview {
                    target: Some(target),
                    card_rect,
                    sections,
                }
            }
            None => {
                // Leaving every section: preview the vacated section
                // without the card, the card itself free on the canvas.
                if let Some(previous) = card.section {
                    if let Some(section) = self.baseline.sections.get(&previous) {
                        let items: Vec<PackItem> = self
                            .baseline
                            .pack_items(previous)
                            .into_iter()
                            .filter(|i| i.id != self.card)
                            .collect();
                        let order = self.baseline.order.order_of(previous).to_vec();
                        let packing = pack::pack(section.inner_width(), &items, &order);
                        sections.insert(previous, packing);
                    }
                }
                DragPreview {
                    target: None,
                    card_rect,
                    sections,
                }
            }
        }
    }

    /// Release the card: commit the final section, position, and order.
    ///
    /// A card removed while the gesture was in flight makes this a no-op.
    pub fn drop(self, board: &mut BoardDocument, pointer: Point) -> Vec<CommitEvent> {
        let mut events = Vec::new();
        let (previous, size) = match board.cards.get(&self.card) {
            Some(card) => (card.section, card.size()),
            None => return events,
        };
        let origin = pointer - self.grab_offset;
        let card_rect = Rect::from_origin_size(origin, size);
        board.push_undo();

        match board.section_at(card_rect.center()) {
            Some(target) => {
                let section = &board.sections[&target];
                let interior = section.interior_origin();
                let inner_width = section.inner_width();
                let dropped = Point::new(
                    geometry::clamp_x(origin.x - interior.x, size.width, inner_width),
                    (origin.y - interior.y).max(GAP),
                );
                board.assign_card(self.card, target, dropped);

                let items = board.pack_items(target);
                let order = board.order.order_of(target).to_vec();
                let fixed = FixedCard {
                    id: self.card,
                    position: dropped,
                    size,
                };
                let mut packing = pack::pack_with_fixed(inner_width, &items, &order, &fixed);
                pack::fix_overlaps(inner_width, &items, &mut packing);
                board.apply_packing(target, &packing);
                let new_order = board.persist_reading_order(target);

                if previous != Some(target) {
                    events.push(CommitEvent::MembershipChanged {
                        card: self.card,
                        section: Some(target),
                    });
                }
                events.push(CommitEvent::OrderChanged {
                    section: target,
                    cards: new_order,
                });
                events.push(CommitEvent::CardGeometryChanged {
                    card: self.card,
                    rect: board.cards[&self.card].rect(),
                });
                events.push(CommitEvent::SectionGeometryChanged {
                    section: target,
                    rect: board.sections[&target].frame_rect(),
                });

                if let Some(vacated) = previous.filter(|p| *p != target) {
                    self.reflow_vacated(board, vacated, &mut events);
                }
            }
            None => {
                board.unassign_card(self.card, origin);
                if previous.is_some() {
                    events.push(CommitEvent::MembershipChanged {
                        card: self.card,
                        section: None,
                    });
                }
                events.push(CommitEvent::CardGeometryChanged {
                    card: self.card,
                    rect: board.cards[&self.card].rect(),
                });
                if let Some(vacated) = previous {
                    self.reflow_vacated(board, vacated, &mut events);
                }
            }
        }
        events
    }

    fn reflow_vacated(
        &self,
        board: &mut BoardDocument,
        section: SectionId,
        events: &mut Vec<CommitEvent>,
    ) {
        if !board.sections.contains_key(&section) {
            return;
        }
        board.reflow_section(section);
        let order = board.persist_reading_order(section);
        events.push(CommitEvent::OrderChanged {
            section,
            cards: order,
        });
        events.push(CommitEvent::SectionGeometryChanged {
            section,
            rect: board.sections[&section].frame_rect(),
        });
    }

    /// Abandon the gesture without mutating the document.
    pub fn cancel(self) {}
}
