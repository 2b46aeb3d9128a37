//! Sections: named rectangular groupings of cards.

use crate::geometry::{GAP, MIN_SECTION_HEIGHT, MIN_SECTION_WIDTH, SECTION_HEADER_HEIGHT};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a section.
pub type SectionId = Uuid;

/// Serializable RGBA8 color used by section styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl StyleColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

/// Visual style of a section frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionStyle {
    /// Frame background.
    pub background: StyleColor,
    /// Frame border.
    pub border: StyleColor,
}

impl Default for SectionStyle {
    fn default() -> Self {
        Self {
            background: StyleColor::new(246, 247, 249, 255),
            border: StyleColor::new(210, 214, 220, 255),
        }
    }
}

/// A named grouping of cards, typically one per connected device.
///
/// The frame height is derived by the packer from the member cards;
/// `min_height` is the floor established by manual resize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier.
    pub id: SectionId,
    /// Display title, usually the device name.
    pub title: String,
    /// Top-left of the frame on the canvas.
    pub origin: Point,
    /// Frame width.
    pub width: f64,
    /// Frame height, derived from content except during manual resize.
    pub height: f64,
    /// Height floor; derived heights never go below it.
    pub min_height: f64,
    /// Frame style.
    pub style: SectionStyle,
}

impl Section {
    /// Create a new empty section at the canvas origin.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            origin: Point::ZERO,
            width: MIN_SECTION_WIDTH * 2.4,
            height: MIN_SECTION_HEIGHT,
            min_height: MIN_SECTION_HEIGHT,
            style: SectionStyle::default(),
        }
    }

    /// The frame rectangle on the canvas.
    pub fn frame_rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.width,
            self.origin.y + self.height,
        )
    }

    /// Width available to packed cards, inside the horizontal padding.
    pub fn inner_width(&self) -> f64 {
        (self.width - 2.0 * GAP).max(0.0)
    }

    /// Canvas position of the interior origin: below the header, after the
    /// left padding. Member card positions are relative to this point.
    pub fn interior_origin(&self) -> Point {
        Point::new(self.origin.x + GAP, self.origin.y + SECTION_HEADER_HEIGHT)
    }

    /// Apply a derived interior content height, clamping to the minimum.
    pub fn set_content_height(&mut self, content: f64) {
        self.height = (SECTION_HEADER_HEIGHT + content).max(self.min_height);
    }

    /// Whether a canvas point falls inside the frame.
    pub fn contains(&self, point: Point) -> bool {
        self.frame_rect().contains(point)
    }
}
