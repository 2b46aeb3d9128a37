//! Descriptors: the shapes collaborators hand the engine.
//!
//! The collaborator that parses device descriptions produces these records;
//! admission is lenient. Non-positive or undersized dimensions clamp to the
//! kind's minimums, and a reference to a section the board does not know is
//! treated as unassigned. Malformed input degrades, it never raises.

use crate::board::BoardDocument;
use crate::card::{Card, CardId, CardKind};
use crate::geometry::{MIN_SECTION_HEIGHT, MIN_SECTION_WIDTH};
use crate::section::{Section, SectionId, SectionStyle};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A card as described by the dashboard-content collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDescriptor {
    /// Identifier; omitted for brand-new cards.
    #[serde(default)]
    pub id: Option<CardId>,
    pub title: String,
    pub kind: CardKind,
    pub declared_width: f64,
    pub declared_height: f64,
    /// Requested section membership, possibly unknown to the board.
    #[serde(default)]
    pub section: Option<SectionId>,
}

impl CardDescriptor {
    /// Admit the descriptor into the board, clamping sizes to the kind's
    /// minimum and degrading an unknown section reference to unassigned.
    /// Returns the card's identifier.
    pub fn admit(self, board: &mut BoardDocument) -> CardId {
        let mut card = Card::new(self.kind, self.title);
        if let Some(id) = self.id {
            card.id = id;
        }
        let min = card.min_size();
        card.width = if self.declared_width > 0.0 {
            self.declared_width.max(min.width)
        } else {
            card.kind.default_size().width
        };
        card.height = if self.declared_height > 0.0 {
            self.declared_height.max(min.height)
        } else {
            card.kind.default_size().height
        };
        card.section = self.section;
        // add_card degrades an unknown section to unassigned.
        board.add_card(card)
    }
}

/// A section as described by the dashboard-content collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDescriptor {
    #[serde(default)]
    pub id: Option<SectionId>,
    pub title: String,
    pub declared_width: f64,
    pub declared_height: f64,
    #[serde(default)]
    pub style: Option<SectionStyle>,
}

impl SectionDescriptor {
    /// Admit the descriptor into the board, clamping the frame to the
    /// minimum section size. Returns the section's identifier.
    pub fn admit(self, board: &mut BoardDocument) -> SectionId {
        let mut section = Section::new(self.title);
        if let Some(id) = self.id {
            section.id = id;
        }
        if self.declared_width > 0.0 {
            section.width = self.declared_width.max(MIN_SECTION_WIDTH);
        }
        if self.declared_height > 0.0 {
            section.min_height = self.declared_height.max(MIN_SECTION_HEIGHT);
            section.height = section.min_height;
        }
        if let Some(style) = self.style {
            section.style = style;
        }
        board.add_section(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_size_falls_back_to_default() {
        let mut board = BoardDocument::new();
        let id = CardDescriptor {
            id: None,
            title: "Power".to_string(),
            kind: CardKind::Toggle,
            declared_width: -5.0,
            declared_height: 0.0,
            section: None,
        }
        .admit(&mut board);

        let default = CardKind::Toggle.default_size();
        assert!((board.cards[&id].width - default.width).abs() < f64::EPSILON);
        assert!((board.cards[&id].height - default.height).abs() < f64::EPSILON);
    }

    #[test]
    fn test_undersized_card_clamps_to_kind_minimum() {
        let mut board = BoardDocument::new();
        let id = CardDescriptor {
            id: None,
            title: "History".to_string(),
            kind: CardKind::Chart,
            declared_width: 10.0,
            declared_height: 10.0,
            section: None,
        }
        .admit(&mut board);

        let min = CardKind::Chart.min_size();
        assert!((board.cards[&id].width - min.width).abs() < f64::EPSILON);
        assert!((board.cards[&id].height - min.height).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_section_reference_degrades_to_unassigned() {
        let mut board = BoardDocument::new();
        let id = CardDescriptor {
            id: None,
            title: "Power".to_string(),
            kind: CardKind::Toggle,
            declared_width: 140.0,
            declared_height: 90.0,
            section: Some(Uuid::new_v4()),
        }
        .admit(&mut board);

        assert!(board.cards[&id].section.is_none());
    }

    #[test]
    fn test_section_descriptor_establishes_minimum_height() {
        let mut board = BoardDocument::new();
        let id = SectionDescriptor {
            id: None,
            title: "Lamp".to_string(),
            declared_width: 500.0,
            declared_height: 300.0,
            style: None,
        }
        .admit(&mut board);

        let section = &board.sections[&id];
        assert!((section.width - 500.0).abs() < f64::EPSILON);
        assert!((section.min_height - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_section_descriptor_clamps_tiny_frame() {
        let mut board = BoardDocument::new();
        let id = SectionDescriptor {
            id: None,
            title: "Lamp".to_string(),
            declared_width: 20.0,
            declared_height: 10.0,
            style: None,
        }
        .admit(&mut board);

        let section = &board.sections[&id];
        assert!((section.width - MIN_SECTION_WIDTH).abs() < f64::EPSILON);
        assert!((section.min_height - MIN_SECTION_HEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_descriptor_keeps_supplied_id() {
        let mut board = BoardDocument::new();
        let wanted = Uuid::new_v4();
        let id = CardDescriptor {
            id: Some(wanted),
            title: "Power".to_string(),
            kind: CardKind::Toggle,
            declared_width: 140.0,
            declared_height: 90.0,
            section: None,
        }
        .admit(&mut board);

        assert_eq!(id, wanted);
    }
}
