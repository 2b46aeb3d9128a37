//! Commit events emitted toward the embedding application.
//!
//! The engine mutates its own document; collaborators that persist dashboard
//! content observe those mutations through these events.

use crate::card::CardId;
use crate::section::SectionId;
use kurbo::Rect;

/// A card or a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Card(CardId),
    Section(SectionId),
}

/// One committed change, reported after a gesture or reflow completes.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitEvent {
    /// A card changed sections, or became free-floating (`None`).
    MembershipChanged {
        card: CardId,
        section: Option<SectionId>,
    },
    /// A section's persisted display order was rewritten.
    OrderChanged {
        section: SectionId,
        cards: Vec<CardId>,
    },
    /// A card moved or changed size. The rect is interior-relative for
    /// members and canvas-relative for free cards.
    CardGeometryChanged { card: CardId, rect: Rect },
    /// A section moved or changed size on the canvas.
    SectionGeometryChanged { section: SectionId, rect: Rect },
}
