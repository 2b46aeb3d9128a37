//! Application state and frame loop.

use crate::content::{self, DemoValue};
use egui::{Color32, CornerRadius, FontId, Stroke, StrokeKind};
use kurbo::{Point, Size};
use std::collections::HashMap;
use thingboard_core::input::Modifiers as CoreModifiers;
use thingboard_core::{
    geometry::{GAP, SECTION_HEADER_HEIGHT},
    BoardDocument, Canvas, CardDescriptor, CardId, CardKind, FileStorage, MouseButton, NodeRef,
    PointerEvent, SectionDescriptor, Storage, StyleColor, Ticket,
};
use thingboard_widgets::theme;

/// Frames a simulated device connection takes before its cards arrive.
const WIRING_DELAY_FRAMES: u8 = 2;

/// Left margin for freshly placed sections and free cards.
const CANVAS_MARGIN: f64 = 24.0;

/// A device connection in flight; its ticket is checked before any cards
/// are added, so a superseded connection adds nothing.
pub(crate) struct PendingDevice {
    pub ticket: Ticket,
    pub frames_left: u8,
    pub name: String,
}

/// One card queued for painting this frame.
struct CardPaint {
    id: CardId,
    kind: CardKind,
    title: String,
    rect: egui::Rect,
    dragged: bool,
}

/// One section frame queued for painting this frame.
struct SectionPaint {
    rect: egui::Rect,
    title: String,
    fill: Color32,
    border: Color32,
    selected: bool,
}

pub struct ThingboardApp {
    pub(crate) canvas: Canvas,
    /// Demo affordance values, keyed by card.
    pub(crate) values: HashMap<CardId, DemoValue>,
    pub(crate) pending_device: Option<PendingDevice>,
    pub(crate) device_counter: usize,
    /// Whether the "Add card" dropdown is open.
    pub(crate) menu_open: bool,
    storage: Option<FileStorage>,
}

impl ThingboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            canvas: Canvas::new(BoardDocument::new()),
            values: HashMap::new(),
            pending_device: None,
            device_counter: 0,
            menu_open: false,
            storage: FileStorage::default_location()
                .map_err(|e| log::warn!("no default storage location: {e}"))
                .ok(),
        };
        // Seed the board so the first launch has something to rearrange.
        app.connect_device("Ceiling Lamp".to_string());
        app.device_counter = 1;
        app
    }

    /// Begin a simulated device connection. The cards arrive a couple of
    /// frames later, guarded by a wiring ticket.
    pub(crate) fn begin_device_wiring(&mut self) {
        self.device_counter += 1;
        self.pending_device = Some(PendingDevice {
            ticket: self.canvas.wiring().begin(),
            frames_left: WIRING_DELAY_FRAMES,
            name: format!("Device {}", self.device_counter),
        });
    }

    fn tick_wiring(&mut self) {
        if let Some(pending) = &mut self.pending_device {
            if pending.frames_left > 0 {
                pending.frames_left -= 1;
                return;
            }
        }
        if let Some(pending) = self.pending_device.take() {
            if self.canvas.wiring().is_current(pending.ticket) {
                self.connect_device(pending.name);
            } else {
                log::debug!("stale wiring sequence for '{}' dropped", pending.name);
            }
        }
    }

    /// Admit a section plus a standard set of affordance cards for it.
    fn connect_device(&mut self, name: String) {
        let board = self.canvas.board_mut();
        board.push_undo();
        let below_existing = board
            .sections
            .values()
            .map(|s| s.frame_rect().y1)
            .fold(0.0f64, f64::max)
            + CANVAS_MARGIN;
        let section = SectionDescriptor {
            id: None,
            title: name,
            declared_width: 560.0,
            declared_height: 0.0,
            style: None,
        }
        .admit(board);
        if let Some(s) = board.sections.get_mut(&section) {
            s.origin = Point::new(CANVAS_MARGIN, below_existing);
        }

        let affordances = [
            (CardKind::Toggle, "Power"),
            (CardKind::Slider, "Brightness"),
            (CardKind::Gauge, "Temperature"),
            (CardKind::Chart, "History"),
        ];
        let mut added = Vec::new();
        for (kind, title) in affordances {
            let id = CardDescriptor {
                id: None,
                title: title.to_string(),
                kind,
                declared_width: 0.0,
                declared_height: 0.0,
                section: Some(section),
            }
            .admit(board);
            added.push((id, kind));
        }
        board.reflow_section(section);
        for (id, kind) in added {
            self.values.insert(id, content::default_value(kind));
        }
    }

    /// Add one free-floating card of the given kind.
    pub(crate) fn add_free_card(&mut self, kind: CardKind) {
        let board = self.canvas.board_mut();
        board.push_undo();
        let id = CardDescriptor {
            id: None,
            title: kind.label().to_string(),
            kind,
            declared_width: 0.0,
            declared_height: 0.0,
            section: None,
        }
        .admit(board);
        let below_existing = board
            .sections
            .values()
            .map(|s| s.frame_rect().y1)
            .chain(
                board
                    .cards
                    .values()
                    .filter(|c| c.section.is_none() && c.id != id)
                    .map(|c| c.rect().y1),
            )
            .fold(0.0f64, f64::max)
            + CANVAS_MARGIN;
        if let Some(c) = board.cards.get_mut(&id) {
            c.position = Point::new(CANVAS_MARGIN, below_existing);
        }
        self.values.insert(id, content::default_value(kind));
    }

    pub(crate) fn delete_selected(&mut self) {
        match self.canvas.selected() {
            Some(NodeRef::Card(id)) => {
                self.canvas.board_mut().push_undo();
                self.canvas.remove_card(id);
                self.values.remove(&id);
            }
            Some(NodeRef::Section(id)) => {
                self.canvas.board_mut().push_undo();
                self.canvas.board_mut().remove_section(id);
                self.canvas.select(None);
            }
            None => {}
        }
    }

    pub(crate) fn quick_save(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let board = self.canvas.board();
        match pollster::block_on(storage.save(&board.id, board)) {
            Ok(()) => log::info!("saved board '{}'", board.name),
            Err(e) => log::error!("save failed: {e}"),
        }
    }

    pub(crate) fn export_board(&self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("board", &["json"])
            .set_file_name(format!("{}.json", self.canvas.board().name))
            .save_file()
        else {
            return;
        };
        match self.canvas.board().to_json() {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    log::error!("export failed: {e}");
                }
            }
            Err(e) => log::error!("export failed: {e}"),
        }
    }

    pub(crate) fn import_board(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("board", &["json"])
            .pick_file()
        else {
            return;
        };
        let board = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| BoardDocument::from_json(&json).map_err(|e| e.to_string()));
        match board {
            Ok(board) => {
                self.canvas.set_board(board);
                // Cards from the snapshot need demo values of their own.
                let kinds: Vec<(CardId, CardKind)> = self
                    .canvas
                    .board()
                    .cards
                    .values()
                    .map(|c| (c.id, c.kind))
                    .collect();
                self.values.clear();
                for (id, kind) in kinds {
                    self.values.insert(id, content::default_value(kind));
                }
            }
            Err(e) => log::error!("import failed: {e}"),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // A focused text edit owns the keyboard.
        if ctx.wants_keyboard_input() {
            return;
        }
        let (undo, redo, delete) = ctx.input(|i| {
            (
                i.modifiers.command && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                i.modifiers.command
                    && (i.key_pressed(egui::Key::Y)
                        || (i.modifiers.shift && i.key_pressed(egui::Key::Z))),
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
            )
        });
        if undo && self.canvas.board_mut().undo() {
            self.canvas.reflow_all();
        }
        if redo && self.canvas.board_mut().redo() {
            self.canvas.reflow_all();
        }
        if delete && self.canvas.edit_mode() {
            self.delete_selected();
        }
    }

    /// Translate egui pointer state into engine pointer events.
    fn feed_pointer(&mut self, ctx: &egui::Context, response: &egui::Response, origin: egui::Pos2) {
        let (pos, pressed, released, modifiers) = ctx.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.modifiers,
            )
        });
        self.canvas.input.set_modifiers(CoreModifiers {
            shift: modifiers.shift,
            ctrl: modifiers.ctrl,
            alt: modifiers.alt,
            meta: modifiers.mac_cmd,
        });
        let Some(pos) = pos else {
            return;
        };
        let point = Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);

        if pressed && response.hovered() {
            self.canvas.handle_pointer(PointerEvent::Down {
                position: point,
                button: MouseButton::Left,
            });
            if self.canvas.input.is_double_click() {
                if let Some(section) = self.canvas.section_title_at(point) {
                    self.canvas.select(Some(NodeRef::Section(section)));
                }
            }
        } else if released {
            self.canvas.handle_pointer(PointerEvent::Up {
                position: point,
                button: MouseButton::Left,
            });
        } else if self.canvas.input.pointer_position != point {
            self.canvas.handle_pointer(PointerEvent::Move { position: point });
        }
    }

    /// Build this frame's paint lists from the board, honoring the live
    /// drag preview where one exists.
    fn paint_plan(&self, origin: egui::Pos2) -> (Vec<SectionPaint>, Vec<CardPaint>) {
        let board = self.canvas.board();
        let preview = self.canvas.drag_preview();
        let dragging = self.canvas.dragging_card();
        let selected = self.canvas.selected();

        let mut sections = Vec::new();
        let mut cards = Vec::new();

        for section_id in &board.section_order {
            let Some(section) = board.sections.get(section_id) else {
                continue;
            };
            let packing = preview.and_then(|p| p.sections.get(section_id));
            let mut frame = section.frame_rect();
            if let Some(packing) = packing {
                let height = (SECTION_HEADER_HEIGHT + packing.height).max(section.min_height);
                frame = kurbo::Rect::new(frame.x0, frame.y0, frame.x1, frame.y0 + height);
            }
            sections.push(SectionPaint {
                rect: to_screen(origin, frame),
                title: section.title.clone(),
                fill: style_color(section.style.background),
                border: style_color(section.style.border),
                selected: selected == Some(NodeRef::Section(*section_id)),
            });

            let interior = section.interior_origin();
            for card_id in board.member_ids(*section_id) {
                if Some(card_id) == dragging {
                    continue;
                }
                let Some(card) = board.cards.get(&card_id) else {
                    continue;
                };
                let position = packing
                    .and_then(|p| p.positions.get(&card_id).copied())
                    .unwrap_or(card.position);
                let rect = kurbo::Rect::from_origin_size(
                    Point::new(interior.x + position.x, interior.y + position.y),
                    card.size(),
                );
                cards.push(CardPaint {
                    id: card_id,
                    kind: card.kind,
                    title: card.title.clone(),
                    rect: to_screen(origin, rect),
                    dragged: false,
                });
            }
        }

        for card in board.cards.values().filter(|c| c.section.is_none()) {
            if Some(card.id) == dragging {
                continue;
            }
            cards.push(CardPaint {
                id: card.id,
                kind: card.kind,
                title: card.title.clone(),
                rect: to_screen(origin, card.rect()),
                dragged: false,
            });
        }

        if let (Some(id), Some(preview)) = (dragging, preview) {
            if let Some(card) = board.cards.get(&id) {
                cards.push(CardPaint {
                    id,
                    kind: card.kind,
                    title: card.title.clone(),
                    rect: to_screen(origin, preview.card_rect),
                    dragged: true,
                });
            }
        }

        (sections, cards)
    }

    fn paint_board(&mut self, ui: &mut egui::Ui, painter: &egui::Painter, origin: egui::Pos2) {
        let edit_mode = self.canvas.edit_mode();
        let selected_card = match self.canvas.selected() {
            Some(NodeRef::Card(id)) => Some(id),
            _ => None,
        };
        let (sections, cards) = self.paint_plan(origin);
        let time = ui.input(|i| i.time);

        for section in &sections {
            painter.rect_filled(section.rect, CornerRadius::same(8), section.fill);
            let stroke = if section.selected {
                Stroke::new(2.0, theme::ACCENT)
            } else {
                Stroke::new(1.0, section.border)
            };
            painter.rect_stroke(section.rect, CornerRadius::same(8), stroke, StrokeKind::Inside);
            painter.text(
                egui::pos2(
                    section.rect.left() + GAP as f32,
                    section.rect.top() + SECTION_HEADER_HEIGHT as f32 / 2.0,
                ),
                egui::Align2::LEFT_CENTER,
                &section.title,
                FontId::proportional(14.0),
                theme::TEXT,
            );
            if edit_mode {
                paint_handle(painter, section.rect.right_bottom());
            }
        }

        let mut measured: Vec<(CardId, Size)> = Vec::new();
        for card in &cards {
            self.paint_card(ui, painter, card, edit_mode, selected_card, time, &mut measured);
        }
        for (id, size) in measured {
            self.canvas.observe_content(id, size);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_card(
        &mut self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        card: &CardPaint,
        edit_mode: bool,
        selected_card: Option<CardId>,
        time: f64,
        measured: &mut Vec<(CardId, Size)>,
    ) {
        let rect = card.rect;
        painter.rect_filled(rect, CornerRadius::same(6), Color32::WHITE);
        let stroke = if card.dragged {
            Stroke::new(2.0, theme::ACCENT)
        } else if selected_card == Some(card.id) {
            Stroke::new(1.5, theme::ACCENT)
        } else {
            Stroke::new(1.0, theme::BORDER)
        };
        painter.rect_stroke(rect, CornerRadius::same(6), stroke, StrokeKind::Inside);
        painter.text(
            egui::pos2(rect.left() + 8.0, rect.top() + 12.0),
            egui::Align2::LEFT_CENTER,
            &card.title,
            FontId::proportional(12.0),
            theme::TEXT_MUTED,
        );

        let body = egui::Rect::from_min_max(
            egui::pos2(rect.left() + 8.0, rect.top() + 24.0),
            egui::pos2(rect.right() - 8.0, rect.bottom() - 8.0),
        );
        if body.width() < 8.0 || body.height() < 8.0 {
            return;
        }
        let Some(value) = self.values.get_mut(&card.id) else {
            return;
        };
        let mut used = Size::ZERO;
        ui.scope_builder(egui::UiBuilder::new().max_rect(body), |ui| {
            ui.add_enabled_ui(!edit_mode, |ui| {
                content::card_body(ui, card.kind, value, time);
                let min = ui.min_rect().size();
                used = Size::new(min.x as f64, min.y as f64);
            });
        });
        if !edit_mode && content_drives_autofit(card.kind) {
            measured.push((card.id, used));
        }

        if edit_mode {
            paint_handle(painter, rect.right_bottom());
            paint_handle(painter, egui::pos2(rect.right(), rect.center().y));
        }
    }
}

impl eframe::App for ThingboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.canvas.input.begin_frame();
        self.tick_wiring();
        self.handle_shortcuts(ctx);

        self.show_toolbar(ctx);
        self.show_inspector(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::from_rgb(248, 249, 251)))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
                let origin = response.rect.min;
                self.feed_pointer(ctx, &response, origin);
                self.paint_board(ui, &painter, origin);
            });

        for event in self.canvas.drain_events() {
            log::debug!("commit: {event:?}");
        }

        // Charts keep moving even without input.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

/// Whether a kind's rendered content has an intrinsic size worth watching.
/// Stretchy bodies (charts, gauges) fill whatever the card gives them and
/// would otherwise chase their own card.
fn content_drives_autofit(kind: CardKind) -> bool {
    !matches!(kind, CardKind::Chart | CardKind::Gauge)
}

fn paint_handle(painter: &egui::Painter, at: egui::Pos2) {
    let rect = egui::Rect::from_center_size(at, egui::vec2(8.0, 8.0));
    painter.rect_filled(rect, CornerRadius::same(2), Color32::WHITE);
    painter.rect_stroke(
        rect,
        CornerRadius::same(2),
        Stroke::new(1.0, theme::ACCENT),
        StrokeKind::Inside,
    );
}

fn to_screen(origin: egui::Pos2, rect: kurbo::Rect) -> egui::Rect {
    egui::Rect::from_min_max(
        egui::pos2(origin.x + rect.x0 as f32, origin.y + rect.y0 as f32),
        egui::pos2(origin.x + rect.x1 as f32, origin.y + rect.y1 as f32),
    )
}

fn style_color(color: StyleColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub(crate) fn to_style_color(color: Color32) -> StyleColor {
    StyleColor::new(color.r(), color.g(), color.b(), color.a())
}
