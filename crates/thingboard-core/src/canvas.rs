//! The canvas coordinator: owns the board document and routes pointer
//! events to the drag and resize gestures.
//!
//! All geometry mutation happens synchronously inside the handlers here, so
//! no two gestures ever run at once and every handler reads current
//! authoritative state. Turning edit mode off or tearing the canvas down
//! cancels any in-flight gesture before new wiring begins.

use crate::autofit::AutoFitObserver;
use crate::board::BoardDocument;
use crate::card::CardId;
use crate::drag::{DragGesture, DragPreview};
use crate::events::{CommitEvent, NodeRef};
use crate::geometry::SECTION_HEADER_HEIGHT;
use crate::input::{InputState, MouseButton, PointerEvent};
use crate::resize::{self, ResizeGesture, ResizeHandle, HANDLE_HIT_TOLERANCE};
use crate::section::SectionId;
use crate::wiring::Wiring;
use kurbo::{Point, Size};

/// Pointer travel below this is a click, not a drag.
const DRAG_THRESHOLD: f64 = 4.0;

/// What a canvas point lands on, topmost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HitTarget {
    CardHandle { card: CardId, handle: ResizeHandle },
    SectionHandle { section: SectionId },
    CardBody(CardId),
}

#[derive(Debug)]
enum Gesture {
    Idle,
    Drag {
        gesture: DragGesture,
        start: Point,
        preview: Option<DragPreview>,
    },
    Resize(ResizeGesture),
}

/// Owns the board and the interaction state around it.
#[derive(Debug)]
pub struct Canvas {
    board: BoardDocument,
    /// Frame-based input tracking; the shell feeds it raw events.
    pub input: InputState,
    gesture: Gesture,
    autofit: AutoFitObserver,
    wiring: Wiring,
    edit_mode: bool,
    selected: Option<NodeRef>,
    pending: Vec<CommitEvent>,
}

impl Canvas {
    /// Wrap a board document.
    pub fn new(board: BoardDocument) -> Self {
        Self {
            board,
            input: InputState::new(),
            gesture: Gesture::Idle,
            autofit: AutoFitObserver::new(),
            wiring: Wiring::new(),
            edit_mode: true,
            selected: None,
            pending: Vec::new(),
        }
    }

    pub fn board(&self) -> &BoardDocument {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut BoardDocument {
        &mut self.board
    }

    /// Replace the board wholesale, e.g. after loading a snapshot. Any
    /// in-flight gesture is cancelled first.
    pub fn set_board(&mut self, board: BoardDocument) {
        self.cancel_gesture();
        self.autofit.clear();
        self.selected = None;
        self.board = board;
        self.board.reflow_all();
    }

    /// The generation counter guarding async device wiring.
    pub fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Toggle edit mode. Turning it off synchronously cancels any active
    /// gesture and supersedes outstanding wiring tickets.
    pub fn set_edit_mode(&mut self, edit: bool) {
        if self.edit_mode && !edit {
            self.cancel_gesture();
            self.wiring.supersede();
        }
        self.edit_mode = edit;
    }

    /// The currently selected node, if any.
    pub fn selected(&self) -> Option<NodeRef> {
        self.selected
    }

    pub fn select(&mut self, node: Option<NodeRef>) {
        self.selected = node;
    }

    /// The card an active drag is moving.
    pub fn dragging_card(&self) -> Option<CardId> {
        match &self.gesture {
            Gesture::Drag { gesture, .. } => Some(gesture.card()),
            _ => None,
        }
    }

    /// The node an active resize is working on. Such a node is not
    /// independently draggable until the gesture ends.
    pub fn resizing_node(&self) -> Option<NodeRef> {
        match &self.gesture {
            Gesture::Resize(gesture) => Some(gesture.target()),
            _ => None,
        }
    }

    /// The live drag preview, present from the first move after grab.
    pub fn drag_preview(&self) -> Option<&DragPreview> {
        match &self.gesture {
            Gesture::Drag { preview, .. } => preview.as_ref(),
            _ => None,
        }
    }

    /// Route one pointer event. Gestures only start in edit mode; an
    /// already-running gesture always sees its move and release events.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.input.handle_pointer_event(event.clone());
        match event {
            PointerEvent::Down { position, button: MouseButton::Left } => {
                if self.edit_mode {
                    self.begin_gesture(position);
                }
            }
            PointerEvent::Move { position } => match &mut self.gesture {
                Gesture::Drag { gesture, preview, .. } => {
                    // Recomputed from the baseline every move, never from
                    // the previous preview frame.
                    *preview = Some(gesture.preview(position));
                }
                Gesture::Resize(gesture) => {
                    gesture.update(&mut self.board, position);
                }
                Gesture::Idle => {}
            },
            PointerEvent::Up { position, button: MouseButton::Left } => {
                self.end_gesture(position);
            }
            _ => {}
        }
    }

    fn begin_gesture(&mut self, position: Point) {
        let Some(hit) = self.hit_test(position) else {
            self.selected = None;
            return;
        };
        match hit {
            HitTarget::CardHandle { card, handle } => {
                if let Some(gesture) =
                    ResizeGesture::begin(&self.board, NodeRef::Card(card), handle, position)
                {
                    self.selected = Some(NodeRef::Card(card));
                    self.gesture = Gesture::Resize(gesture);
                }
            }
            HitTarget::SectionHandle { section } => {
                if let Some(gesture) = ResizeGesture::begin(
                    &self.board,
                    NodeRef::Section(section),
                    ResizeHandle::Corner,
                    position,
                ) {
                    self.selected = Some(NodeRef::Section(section));
                    self.gesture = Gesture::Resize(gesture);
                }
            }
            HitTarget::CardBody(card) => {
                if let Some(gesture) = DragGesture::begin(&self.board, card, position) {
                    self.selected = Some(NodeRef::Card(card));
                    self.gesture = Gesture::Drag {
                        gesture,
                        start: position,
                        preview: None,
                    };
                }
            }
        }
    }

    fn end_gesture(&mut self, position: Point) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Drag { gesture, start, .. } => {
                let travelled = (position - start).hypot();
                if travelled < DRAG_THRESHOLD {
                    // A click, not a move; nothing to commit.
                    gesture.cancel();
                } else {
                    let events = gesture.drop(&mut self.board, position);
                    self.pending.extend(events);
                }
            }
            Gesture::Resize(gesture) => {
                let events = gesture.finish(&mut self.board, position);
                self.pending.extend(events);
            }
            Gesture::Idle => {}
        }
    }

    fn cancel_gesture(&mut self) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Drag { gesture, .. } => gesture.cancel(),
            Gesture::Resize(gesture) => gesture.cancel(&mut self.board),
            Gesture::Idle => {}
        }
    }

    /// Topmost interactive target under a canvas point. Free cards sit
    /// above sections; inside a section, card handles win over the frame
    /// handle and the frame handle over card bodies.
    fn hit_test(&self, point: Point) -> Option<HitTarget> {
        let card_hit = |id: CardId| -> Option<HitTarget> {
            let rect = self.board.card_canvas_rect(id)?;
            if let Some(handle) =
                resize::hit_test_handles(rect, point, HANDLE_HIT_TOLERANCE, true)
            {
                return Some(HitTarget::CardHandle { card: id, handle });
            }
            rect.contains(point).then_some(HitTarget::CardBody(id))
        };

        for card in self.board.cards.values().filter(|c| c.section.is_none()) {
            if let Some(hit) = card_hit(card.id) {
                return Some(hit);
            }
        }

        for section_id in self.board.section_order.iter().rev() {
            let Some(section) = self.board.sections.get(section_id) else {
                continue;
            };
            let frame = section.frame_rect();
            for card in self.board.member_ids(*section_id) {
                if let Some(hit) = card_hit(card) {
                    return Some(hit);
                }
            }
            if resize::hit_test_handles(frame, point, HANDLE_HIT_TOLERANCE, false).is_some() {
                return Some(HitTarget::SectionHandle { section: *section_id });
            }
            if frame.contains(point) {
                // The frame body is not draggable; stop the scan so a
                // lower section cannot claim the point.
                return None;
            }
        }
        None
    }

    /// The section whose title bar contains a canvas point; double-clicking
    /// it starts renaming in the shell.
    pub fn section_title_at(&self, point: Point) -> Option<SectionId> {
        self.board.section_order.iter().rev().copied().find(|id| {
            self.board.sections.get(id).is_some_and(|s| {
                let frame = s.frame_rect();
                frame.contains(point) && point.y < frame.y0 + SECTION_HEADER_HEIGHT
            })
        })
    }

    /// Feed one card's rendered content size through the auto-fit path.
    /// A growth triggers the same full reflow as a manual resize release.
    pub fn observe_content(&mut self, card: CardId, content: Size) {
        let Some(target) = self
            .board
            .cards
            .get(&card)
            .and_then(|c| self.autofit.observe(c, content))
        else {
            return;
        };
        if let Some(c) = self.board.cards.get_mut(&card) {
            c.set_size(target);
        }
        let changed = self.board.reflow_all();
        self.pending.push(CommitEvent::CardGeometryChanged {
            card,
            rect: self.board.cards[&card].rect(),
        });
        for section in changed {
            self.pending.push(CommitEvent::SectionGeometryChanged {
                section,
                rect: self.board.sections[&section].frame_rect(),
            });
        }
    }

    /// Remove a card, dropping its auto-fit history with it.
    pub fn remove_card(&mut self, card: CardId) {
        self.autofit.forget(card);
        if self.dragging_card() == Some(card) {
            self.cancel_gesture();
        }
        if self.selected == Some(NodeRef::Card(card)) {
            self.selected = None;
        }
        self.board.remove_card(card);
    }

    /// Re-pack every section from the display order.
    pub fn reflow_all(&mut self) -> Vec<SectionId> {
        self.board.reflow_all()
    }

    /// Take the commit events accumulated since the last drain.
    pub fn drain_events(&mut self) -> Vec<CommitEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Tear the canvas down: cancel any in-flight gesture, clear observer
    /// history, and supersede outstanding wiring tickets.
    pub fn teardown(&mut self) {
        self.cancel_gesture();
        self.autofit.clear();
        self.wiring.supersede();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, CardKind};
    use crate::geometry::GAP;
    use crate::section::Section;

    fn canvas_with_section() -> (Canvas, SectionId, CardId) {
        let mut board = BoardDocument::new();
        let mut section = Section::new("Lamp");
        section.origin = Point::new(0.0, 0.0);
        section.width = 460.0 + 2.0 * GAP;
        let section_id = board.add_section(section);
        let mut card = Card::new(CardKind::Gauge, "Brightness");
        card.section = Some(section_id);
        card.width = 200.0;
        card.height = 150.0;
        let card_id = board.add_card(card);
        board.reflow_section(section_id);
        (Canvas::new(board), section_id, card_id)
    }

    fn press(canvas: &mut Canvas, at: Point) {
        canvas.handle_pointer(PointerEvent::Down {
            position: at,
            button: MouseButton::Left,
        });
    }

    fn release(canvas: &mut Canvas, at: Point) {
        canvas.handle_pointer(PointerEvent::Up {
            position: at,
            button: MouseButton::Left,
        });
    }

    fn move_to(canvas: &mut Canvas, at: Point) {
        canvas.handle_pointer(PointerEvent::Move { position: at });
    }

    #[test]
    fn test_drag_through_pointer_events() {
        let (mut canvas, section, card) = canvas_with_section();
        let grab = canvas.board().card_canvas_rect(card).unwrap().center();

        press(&mut canvas, grab);
        assert_eq!(canvas.dragging_card(), Some(card));

        let outside = Point::new(grab.x, 900.0);
        move_to(&mut canvas, outside);
        assert!(canvas.drag_preview().is_some());
        release(&mut canvas, outside);

        assert!(canvas.board().cards[&card].section.is_none());
        let events = canvas.drain_events();
        assert!(events.contains(&CommitEvent::MembershipChanged { card, section: None }));
        assert!(!canvas.board().order.contains(section, card));
    }

    #[test]
    fn test_click_without_travel_selects_only() {
        let (mut canvas, _, card) = canvas_with_section();
        let grab = canvas.board().card_canvas_rect(card).unwrap().center();
        let before = canvas.board().cards[&card].position;

        press(&mut canvas, grab);
        release(&mut canvas, Point::new(grab.x + 1.0, grab.y));

        assert_eq!(canvas.selected(), Some(NodeRef::Card(card)));
        assert_eq!(canvas.board().cards[&card].position, before);
        assert!(canvas.drain_events().is_empty());
        assert!(!canvas.board().can_undo());
    }

    #[test]
    fn test_edit_mode_off_ignores_presses() {
        let (mut canvas, _, card) = canvas_with_section();
        canvas.set_edit_mode(false);
        let grab = canvas.board().card_canvas_rect(card).unwrap().center();

        press(&mut canvas, grab);
        assert!(canvas.dragging_card().is_none());
    }

    #[test]
    fn test_disabling_edit_mode_cancels_active_drag() {
        let (mut canvas, section, card) = canvas_with_section();
        let grab = canvas.board().card_canvas_rect(card).unwrap().center();

        press(&mut canvas, grab);
        move_to(&mut canvas, Point::new(grab.x, 900.0));
        canvas.set_edit_mode(false);

        assert!(canvas.dragging_card().is_none());
        assert_eq!(canvas.board().cards[&card].section, Some(section));
        assert!(canvas.drain_events().is_empty());
    }

    #[test]
    fn test_corner_handle_starts_resize_not_drag() {
        let (mut canvas, _, card) = canvas_with_section();
        let rect = canvas.board().card_canvas_rect(card).unwrap();
        let corner = Point::new(rect.x1, rect.y1);

        press(&mut canvas, corner);
        assert_eq!(canvas.resizing_node(), Some(NodeRef::Card(card)));
        assert!(canvas.dragging_card().is_none());

        move_to(&mut canvas, Point::new(corner.x + 50.0, corner.y + 20.0));
        assert!((canvas.board().cards[&card].width - 250.0).abs() < f64::EPSILON);

        release(&mut canvas, Point::new(corner.x + 50.0, corner.y + 20.0));
        assert!(canvas.resizing_node().is_none());
        assert!(!canvas.drain_events().is_empty());
    }

    #[test]
    fn test_section_corner_handle_resizes_frame() {
        let (mut canvas, section, _) = canvas_with_section();
        let frame = canvas.board().sections[&section].frame_rect();
        let corner = Point::new(frame.x1, frame.y1);
        let width_before = canvas.board().sections[&section].width;

        press(&mut canvas, corner);
        assert_eq!(canvas.resizing_node(), Some(NodeRef::Section(section)));
        move_to(&mut canvas, Point::new(corner.x + 80.0, corner.y));
        release(&mut canvas, Point::new(corner.x + 80.0, corner.y));

        assert!((canvas.board().sections[&section].width - (width_before + 80.0)).abs()
            < f64::EPSILON);
    }

    #[test]
    fn test_observe_content_grows_and_reflows() {
        let (mut canvas, section, card) = canvas_with_section();

        canvas.observe_content(card, Size::new(400.0, 200.0));
        assert!(canvas.board().cards[&card].width > 400.0);
        let events = canvas.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, CommitEvent::CardGeometryChanged { card: c, .. } if *c == card)));
        assert!(events.iter().any(
            |e| matches!(e, CommitEvent::SectionGeometryChanged { section: s, .. } if *s == section)
        ));

        // The same measurement again is hysteresis-gated.
        canvas.observe_content(card, Size::new(400.0, 200.0));
        assert!(canvas.drain_events().is_empty());
    }

    #[test]
    fn test_teardown_supersedes_wiring() {
        let (mut canvas, _, _) = canvas_with_section();
        let ticket = canvas.wiring().begin();
        assert!(canvas.wiring().is_current(ticket));

        canvas.teardown();
        assert!(!canvas.wiring().is_current(ticket));
    }

    #[test]
    fn test_remove_card_mid_drag_cancels_gesture() {
        let (mut canvas, _, card) = canvas_with_section();
        let grab = canvas.board().card_canvas_rect(card).unwrap().center();
        press(&mut canvas, grab);
        assert_eq!(canvas.dragging_card(), Some(card));

        canvas.remove_card(card);
        assert!(canvas.dragging_card().is_none());
        assert!(!canvas.board().cards.contains_key(&card));
    }

    #[test]
    fn test_section_title_hit() {
        let (canvas, section, _) = canvas_with_section();
        let frame = canvas.board().sections[&section].frame_rect();
        let in_title = Point::new(frame.center().x, frame.y0 + 10.0);
        let in_body = Point::new(frame.center().x, frame.y0 + SECTION_HEADER_HEIGHT + 30.0);

        assert_eq!(canvas.section_title_at(in_title), Some(section));
        assert_eq!(canvas.section_title_at(in_body), None);
    }

    #[test]
    fn test_empty_press_clears_selection() {
        let (mut canvas, _, card) = canvas_with_section();
        let grab = canvas.board().card_canvas_rect(card).unwrap().center();
        press(&mut canvas, grab);
        release(&mut canvas, grab);
        assert!(canvas.selected().is_some());

        press(&mut canvas, Point::new(2000.0, 2000.0));
        assert!(canvas.selected().is_none());
    }
}
