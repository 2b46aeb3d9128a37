//! Layout measurements and rectangle arithmetic shared by the engine.

use kurbo::{Point, Rect, Size};

/// Minimum spacing kept between cards, and between a card and its section's
/// interior edges.
pub const GAP: f64 = 16.0;

/// Horizontal step of the best-position scan used by fixed-card packing.
pub const COLUMN_STEP: f64 = 4.0;

/// Height of a section's title bar, above the packed interior.
pub const SECTION_HEADER_HEIGHT: f64 = 28.0;

/// Smallest section frame a resize gesture will produce.
pub const MIN_SECTION_WIDTH: f64 = 200.0;

/// Smallest section frame height; also the derived-height floor for empty
/// sections.
pub const MIN_SECTION_HEIGHT: f64 = 120.0;

/// Padding added around observed content when auto-fitting a card.
pub const AUTO_FIT_PADDING: f64 = 12.0;

/// Size changes smaller than this are ignored by the auto-fit observer.
pub const SIZE_EPSILON: f64 = 0.5;

/// Build a rectangle from a top-left position and a size.
pub fn rect_at(position: Point, size: Size) -> Rect {
    Rect::from_origin_size(position, size)
}

/// Whether two rectangles come closer than `gap` on both axes.
///
/// Rectangles separated by exactly `gap` do not overlap.
pub fn overlaps_with_gap(a: Rect, b: Rect, gap: f64) -> bool {
    a.x0 < b.x1 + gap && b.x0 < a.x1 + gap && a.y0 < b.y1 + gap && b.y0 < a.y1 + gap
}

/// Clamp a card's x so it lies within `[0, inner_width - width]`.
///
/// A card wider than the interior is pinned to the left edge rather than
/// rejected.
pub fn clamp_x(x: f64, width: f64, inner_width: f64) -> f64 {
    if width >= inner_width {
        return 0.0;
    }
    x.clamp(0.0, inner_width - width)
}

/// Quantized row index used when deriving reading order from positions.
///
/// Cards whose tops fall in the same band are treated as one visual row and
/// ordered left to right.
pub fn row_band(y: f64) -> i64 {
    (y / GAP).round() as i64
}
