//! Cards: the widgets placed on the board.

use crate::section::SectionId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a card, unchanged across reflows.
pub type CardId = Uuid;

/// The content a card hosts, derived from the device affordance it is
/// bound to. The kind fixes the card's minimum usable size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    /// On/off switch bound to a boolean property or action.
    Toggle,
    /// Momentary action trigger.
    Button,
    /// Numeric property with a bounded range.
    Slider,
    /// Read-only numeric indicator.
    Gauge,
    /// Rolling history of a numeric property.
    Chart,
    /// Free-form text readout (status strings, event logs).
    Text,
}

impl CardKind {
    /// Smallest size at which this content renders usably.
    pub fn min_size(&self) -> Size {
        match self {
            CardKind::Toggle => Size::new(96.0, 64.0),
            CardKind::Button => Size::new(96.0, 64.0),
            CardKind::Slider => Size::new(160.0, 72.0),
            CardKind::Gauge => Size::new(140.0, 110.0),
            CardKind::Chart => Size::new(220.0, 140.0),
            CardKind::Text => Size::new(120.0, 64.0),
        }
    }

    /// Size given to a freshly added card.
    pub fn default_size(&self) -> Size {
        match self {
            CardKind::Toggle => Size::new(140.0, 90.0),
            CardKind::Button => Size::new(140.0, 90.0),
            CardKind::Slider => Size::new(200.0, 90.0),
            CardKind::Gauge => Size::new(160.0, 130.0),
            CardKind::Chart => Size::new(260.0, 160.0),
            CardKind::Text => Size::new(180.0, 90.0),
        }
    }

    /// Human-readable kind name.
    pub fn label(&self) -> &'static str {
        match self {
            CardKind::Toggle => "Toggle",
            CardKind::Button => "Button",
            CardKind::Slider => "Slider",
            CardKind::Gauge => "Gauge",
            CardKind::Chart => "Chart",
            CardKind::Text => "Text",
        }
    }
}

/// A single widget on the board, bound to one device affordance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier.
    pub id: CardId,
    /// Display title, usually the affordance name.
    pub title: String,
    /// Hosted content type.
    pub kind: CardKind,
    /// Top-left corner, relative to the owning section's interior, or to
    /// the canvas when unassigned.
    pub position: Point,
    /// Declared width.
    pub width: f64,
    /// Declared height.
    pub height: f64,
    /// Owning section; `None` while the card floats free on the canvas.
    pub section: Option<SectionId>,
}

impl Card {
    /// Create a new unassigned card with the kind's default size.
    pub fn new(kind: CardKind, title: impl Into<String>) -> Self {
        let size = kind.default_size();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            kind,
            position: Point::ZERO,
            width: size.width,
            height: size.height,
            section: None,
        }
    }

    /// Declared size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Minimum size derived from the content kind.
    pub fn min_size(&self) -> Size {
        self.kind.min_size()
    }

    /// Set the declared size, clamped to the kind's minimum.
    pub fn set_size(&mut self, size: Size) {
        let min = self.min_size();
        self.width = size.width.max(min.width);
        self.height = size.height.max(min.height);
    }

    /// The card's rectangle in its own coordinate frame (section interior
    /// for members, canvas for free cards).
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_uses_kind_default_size() {
        let card = Card::new(CardKind::Chart, "Temperature history");
        assert!((card.width - 260.0).abs() < f64::EPSILON);
        assert!((card.height - 160.0).abs() < f64::EPSILON);
        assert!(card.section.is_none());
    }

    #[test]
    fn test_set_size_clamps_to_minimum() {
        let mut card = Card::new(CardKind::Slider, "Brightness");
        card.set_size(Size::new(10.0, 10.0));
        let min = CardKind::Slider.min_size();
        assert!((card.width - min.width).abs() < f64::EPSILON);
        assert!((card.height - min.height).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rect_tracks_position_and_size() {
        let mut card = Card::new(CardKind::Text, "Status");
        card.position = Point::new(16.0, 32.0);
        let rect = card.rect();
        assert!((rect.x0 - 16.0).abs() < f64::EPSILON);
        assert!((rect.x1 - (16.0 + card.width)).abs() < f64::EPSILON);
    }
}
