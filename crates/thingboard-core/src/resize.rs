//! Pointer-driven resize of cards and sections.
//!
//! Sizes update live from the captured starting geometry, so rapid move
//! events never accumulate drift. Section resizes repack their children on
//! every move (the wrap points change); releasing either kind of resize
//! runs one full reflow across all sections.

use crate::board::BoardDocument;
use crate::events::{CommitEvent, NodeRef};
use crate::geometry::{MIN_SECTION_HEIGHT, MIN_SECTION_WIDTH};
use kurbo::{Point, Rect, Size};

/// Visual size of a resize handle.
pub const HANDLE_SIZE: f64 = 10.0;
/// Handle hit tolerance around the handle center.
pub const HANDLE_HIT_TOLERANCE: f64 = 12.0;

/// Which resize affordance was grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    /// Bottom-right corner: both axes.
    Corner,
    /// Right edge midpoint: width only (cards).
    Right,
}

/// Canvas position of the corner handle on a node's rectangle.
pub fn corner_handle_position(rect: Rect) -> Point {
    Point::new(rect.x1, rect.y1)
}

/// Canvas position of the width-only handle on a card's rectangle.
pub fn right_handle_position(rect: Rect) -> Point {
    Point::new(rect.x1, rect.center().y)
}

/// Which handle (if any) a canvas point hits on a node's rectangle.
/// `width_only` adds the right-edge handle that cards expose.
pub fn hit_test_handles(
    rect: Rect,
    point: Point,
    tolerance: f64,
    width_only: bool,
) -> Option<ResizeHandle> {
    let hits = |handle: Point| {
        let dx = point.x - handle.x;
        let dy = point.y - handle.y;
        dx * dx + dy * dy <= tolerance * tolerance
    };
    if hits(corner_handle_position(rect)) {
        return Some(ResizeHandle::Corner);
    }
    if width_only && hits(right_handle_position(rect)) {
        return Some(ResizeHandle::Right);
    }
    None
}

/// An in-progress resize gesture.
#[derive(Debug, Clone)]
pub struct ResizeGesture {
    target: NodeRef,
    handle: ResizeHandle,
    start_pointer: Point,
    start_size: Size,
    /// Section height floor at gesture start, restored on cancel.
    start_min_height: f64,
}

impl ResizeGesture {
    /// Start resizing a node. Returns `None` if the node does not exist.
    pub fn begin(
        board: &BoardDocument,
        target: NodeRef,
        handle: ResizeHandle,
        pointer: Point,
    ) -> Option<Self> {
        let (start_size, start_min_height) = match target {
            NodeRef::Card(id) => (board.cards.get(&id)?.size(), 0.0),
            NodeRef::Section(id) => {
                let section = board.sections.get(&id)?;
                (
                    Size::new(section.width, section.height),
                    section.min_height,
                )
            }
        };
        Some(Self {
            target,
            handle,
            start_pointer: pointer,
            start_size,
            start_min_height,
        })
    }

    /// The node being resized. While a resize is active the node is not
    /// independently draggable.
    pub fn target(&self) -> NodeRef {
        self.target
    }

    /// Apply the size for the current pointer position.
    pub fn update(&self, board: &mut BoardDocument, pointer: Point) {
        let delta = pointer - self.start_pointer;
        match self.target {
            NodeRef::Card(id) => {
                if let Some(card) = board.cards.get_mut(&id) {
                    let min = card.min_size();
                    card.width = (self.start_size.width + delta.x).max(min.width);
                    if self.handle == ResizeHandle::Corner {
                        card.height = (self.start_size.height + delta.y).max(min.height);
                    }
                }
            }
            NodeRef::Section(id) => {
                if let Some(section) = board.sections.get_mut(&id) {
                    section.width = (self.start_size.width + delta.x).max(MIN_SECTION_WIDTH);
                    // The dragged height becomes the new floor; the reflow
                    // below derives the actual height from it.
                    section.min_height =
                        (self.start_size.height + delta.y).max(MIN_SECTION_HEIGHT);
                    board.reflow_section(id);
                }
            }
        }
    }

    /// Release: apply the final size and reflow every section.
    ///
    /// A node removed while the gesture was in flight makes this a no-op.
    pub fn finish(self, board: &mut BoardDocument, pointer: Point) -> Vec<CommitEvent> {
        let mut events = Vec::new();
        let exists = match self.target {
            NodeRef::Card(id) => board.cards.contains_key(&id),
            NodeRef::Section(id) => board.sections.contains_key(&id),
        };
        if !exists {
            return events;
        }

        self.update(board, pointer);
        let changed = board.reflow_all();

        match self.target {
            NodeRef::Card(id) => {
                events.push(CommitEvent::CardGeometryChanged {
                    card: id,
                    rect: board.cards[&id].rect(),
                });
                if let Some(section) = board.cards[&id].section {
                    events.push(CommitEvent::SectionGeometryChanged {
                        section,
                        rect: board.sections[&section].frame_rect(),
                    });
                }
            }
            NodeRef::Section(id) => {
                events.push(CommitEvent::SectionGeometryChanged {
                    section: id,
                    rect: board.sections[&id].frame_rect(),
                });
            }
        }
        for section in changed {
            let already = events.iter().any(|e| {
                matches!(e, CommitEvent::SectionGeometryChanged { section: s, .. } if *s == section)
            });
            if !already {
                events.push(CommitEvent::SectionGeometryChanged {
                    section,
                    rect: board.sections[&section].frame_rect(),
                });
            }
        }
        events
    }

    /// Abandon the gesture, restoring the starting geometry.
    pub fn cancel(self, board: &mut BoardDocument) {
        match self.target {
            NodeRef::Card(id) => {
                if let Some(card) = board.cards.get_mut(&id) {
                    card.width = self.start_size.width;
                    card.height = self.start_size.height;
                    if let Some(section) = card.section {
                        board.reflow_section(section);
                    }
                }
            }
            NodeRef::Section(id) => {
                if let Some(section) = board.sections.get_mut(&id) {
                    section.width = self.start_size.width;
                    section.height = self.start_size.height;
                    section.min_height = self.start_min_height;
                    board.reflow_section(id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, CardId, CardKind};
    use crate::geometry::GAP;
    use crate::section::{Section, SectionId};

    fn board_with_section(inner: f64) -> (BoardDocument, SectionId) {
        let mut board = BoardDocument::new();
        let mut section = Section::new("Device");
        section.width = inner + 2.0 * GAP;
        let id = board.add_section(section);
        (board, id)
    }

    fn add_member(board: &mut BoardDocument, section: SectionId, w: f64, h: f64) -> CardId {
        let mut card = Card::new(CardKind::Gauge, "Reading");
        card.section = Some(section);
        card.width = w;
        card.height = h;
        let id = board.add_card(card);
        board.reflow_section(section);
        id
    }

    #[test]
    fn test_card_resize_grows_from_start_size() {
        let (mut board, section) = board_with_section(460.0);
        let a = add_member(&mut board, section, 200.0, 150.0);

        let gesture =
            ResizeGesture::begin(&board, NodeRef::Card(a), ResizeHandle::Corner, Point::ZERO)
                .unwrap();
        gesture.update(&mut board, Point::new(40.0, 30.0));
        assert!((board.cards[&a].width - 240.0).abs() < f64::EPSILON);
        assert!((board.cards[&a].height - 180.0).abs() < f64::EPSILON);

        // Deltas are absolute against the start, not cumulative.
        gesture.update(&mut board, Point::new(10.0, 10.0));
        assert!((board.cards[&a].width - 210.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_card_resize_clamps_to_kind_minimum() {
        let (mut board, section) = board_with_section(460.0);
        let a = add_member(&mut board, section, 200.0, 150.0);

        let gesture =
            ResizeGesture::begin(&board, NodeRef::Card(a), ResizeHandle::Corner, Point::ZERO)
                .unwrap();
        gesture.update(&mut board, Point::new(-500.0, -500.0));
        let min = board.cards[&a].min_size();
        assert!((board.cards[&a].width - min.width).abs() < f64::EPSILON);
        assert!((board.cards[&a].height - min.height).abs() < f64::EPSILON);
    }

    #[test]
    fn test_width_only_handle_keeps_height() {
        let (mut board, section) = board_with_section(460.0);
        let a = add_member(&mut board, section, 200.0, 150.0);

        let gesture =
            ResizeGesture::begin(&board, NodeRef::Card(a), ResizeHandle::Right, Point::ZERO)
                .unwrap();
        gesture.update(&mut board, Point::new(60.0, 60.0));
        assert!((board.cards[&a].width - 260.0).abs() < f64::EPSILON);
        assert!((board.cards[&a].height - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_section_resize_repacks_children_live() {
        let (mut board, section) = board_with_section(460.0);
        add_member(&mut board, section, 200.0, 150.0);
        let b = add_member(&mut board, section, 220.0, 160.0);
        assert_eq!(board.cards[&b].position, Point::new(216.0, GAP));

        let gesture = ResizeGesture::begin(
            &board,
            NodeRef::Section(section),
            ResizeHandle::Corner,
            Point::ZERO,
        )
        .unwrap();
        // Narrow the section so the second card no longer fits in row one.
        gesture.update(&mut board, Point::new(-92.0, 0.0));
        assert_eq!(board.cards[&b].position, Point::new(0.0, GAP + 150.0 + GAP));
    }

    #[test]
    fn test_section_manual_resize_establishes_minimum() {
        let (mut board, section) = board_with_section(460.0);
        add_member(&mut board, section, 200.0, 150.0);
        let before = board.sections[&section].height;

        let gesture = ResizeGesture::begin(
            &board,
            NodeRef::Section(section),
            ResizeHandle::Corner,
            Point::ZERO,
        )
        .unwrap();
        let events = gesture.finish(&mut board, Point::new(0.0, 200.0));

        let section_state = &board.sections[&section];
        assert!((section_state.min_height - (before + 200.0)).abs() < f64::EPSILON);
        assert!((section_state.height - (before + 200.0)).abs() < f64::EPSILON);
        assert!(!events.is_empty());
    }

    #[test]
    fn test_cancel_restores_start_geometry() {
        let (mut board, section) = board_with_section(460.0);
        let a = add_member(&mut board, section, 200.0, 150.0);

        let gesture =
            ResizeGesture::begin(&board, NodeRef::Card(a), ResizeHandle::Corner, Point::ZERO)
                .unwrap();
        gesture.update(&mut board, Point::new(100.0, 100.0));
        gesture.clone().cancel(&mut board);

        assert!((board.cards[&a].width - 200.0).abs() < f64::EPSILON);
        assert!((board.cards[&a].height - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_finish_after_node_removed_is_discarded() {
        let (mut board, section) = board_with_section(460.0);
        let a = add_member(&mut board, section, 200.0, 150.0);
        let gesture =
            ResizeGesture::begin(&board, NodeRef::Card(a), ResizeHandle::Corner, Point::ZERO)
                .unwrap();

        board.remove_card(a);
        let events = gesture.finish(&mut board, Point::new(50.0, 50.0));
        assert!(events.is_empty());
    }

    #[test]
    fn test_handle_hit_testing() {
        let rect = Rect::new(0.0, 0.0, 200.0, 150.0);
        assert_eq!(
            hit_test_handles(rect, Point::new(198.0, 148.0), HANDLE_HIT_TOLERANCE, true),
            Some(ResizeHandle::Corner)
        );
        assert_eq!(
            hit_test_handles(rect, Point::new(199.0, 75.0), HANDLE_HIT_TOLERANCE, true),
            Some(ResizeHandle::Right)
        );
        // Width-only handle disabled for sections.
        assert_eq!(
            hit_test_handles(rect, Point::new(199.0, 75.0), HANDLE_HIT_TOLERANCE, false),
            None
        );
        assert_eq!(
            hit_test_handles(rect, Point::new(100.0, 75.0), HANDLE_HIT_TOLERANCE, true),
            None
        );
    }
}
