//! Toolbar and inspector panels.

use crate::app::{to_style_color, ThingboardApp};
use egui::{Align2, Color32, Vec2};
use thingboard_core::{CardId, CardKind, NodeRef, SectionId};
use thingboard_widgets::{
    buttons::{TextButton, ToggleButton},
    frames::{menu_item, panel_frame},
    layout::{section_label, vertical_separator},
    swatch::{SwatchRow, SECTION_PALETTE},
};

/// Card kinds offered by the "Add card" menu.
const CARD_KINDS: [CardKind; 6] = [
    CardKind::Toggle,
    CardKind::Button,
    CardKind::Slider,
    CardKind::Gauge,
    CardKind::Chart,
    CardKind::Text,
];

impl ThingboardApp {
    pub(crate) fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.canvas.board_mut().name)
                        .desired_width(160.0),
                );
                vertical_separator(ui);

                if ToggleButton::new("Edit", self.canvas.edit_mode()).show(ui) {
                    let edit = !self.canvas.edit_mode();
                    self.canvas.set_edit_mode(edit);
                }
                vertical_separator(ui);

                if TextButton::new("Connect device")
                    .enabled(self.pending_device.is_none())
                    .show(ui)
                {
                    self.begin_device_wiring();
                }
                if TextButton::new("Add card").show(ui) {
                    self.menu_open = !self.menu_open;
                }
                vertical_separator(ui);

                let can_undo = self.canvas.board().can_undo();
                if TextButton::new("Undo").enabled(can_undo).show(ui)
                    && self.canvas.board_mut().undo()
                {
                    self.canvas.reflow_all();
                }
                let can_redo = self.canvas.board().can_redo();
                if TextButton::new("Redo").enabled(can_redo).show(ui)
                    && self.canvas.board_mut().redo()
                {
                    self.canvas.reflow_all();
                }
                vertical_separator(ui);

                if TextButton::new("Save").show(ui) {
                    self.quick_save();
                }
                if TextButton::new("Export...").show(ui) {
                    self.export_board();
                }
                if TextButton::new("Import...").show(ui) {
                    self.import_board();
                }

                if self.pending_device.is_some() {
                    ui.weak("connecting...");
                }
            });
            ui.add_space(4.0);
        });

        if self.menu_open {
            self.show_add_card_menu(ctx);
        }
    }

    fn show_add_card_menu(&mut self, ctx: &egui::Context) {
        let response = egui::Area::new(egui::Id::new("add_card_menu"))
            .anchor(Align2::LEFT_TOP, Vec2::new(240.0, 44.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.set_width(140.0);
                    ui.vertical(|ui| {
                        ui.spacing_mut().item_spacing = Vec2::new(0.0, 2.0);
                        for kind in CARD_KINDS {
                            if menu_item(ui, kind.label(), "") {
                                self.add_free_card(kind);
                                self.menu_open = false;
                            }
                        }
                    });
                });
            })
            .response;
        if response.clicked_elsewhere() {
            self.menu_open = false;
        }
    }

    pub(crate) fn show_inspector(&mut self, ctx: &egui::Context) {
        let Some(selected) = self.canvas.selected() else {
            return;
        };
        egui::SidePanel::right("inspector")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                match selected {
                    NodeRef::Section(id) => self.section_inspector(ui, id),
                    NodeRef::Card(id) => self.card_inspector(ui, id),
                }
            });
    }

    fn section_inspector(&mut self, ui: &mut egui::Ui, id: SectionId) {
        let member_count = self.canvas.board().member_ids(id).len();
        let mut remove = false;
        if let Some(section) = self.canvas.board_mut().sections.get_mut(&id) {
            section_label(ui, "SECTION");
            ui.text_edit_singleline(&mut section.title);
            ui.add_space(8.0);

            section_label(ui, "BACKGROUND");
            let current = Color32::from_rgba_unmultiplied(
                section.style.background.r,
                section.style.background.g,
                section.style.background.b,
                section.style.background.a,
            );
            if let Some(picked) = SwatchRow::new(&SECTION_PALETTE, current).show(ui) {
                section.style.background = to_style_color(picked);
                section.style.border = to_style_color(darken(picked));
            }
            ui.add_space(8.0);
            ui.weak(format!(
                "{member_count} card{}",
                if member_count == 1 { "" } else { "s" }
            ));
            ui.add_space(8.0);

            if TextButton::new("Remove section").show(ui) {
                remove = true;
            }
        } else {
            self.canvas.select(None);
            return;
        }
        if remove {
            self.canvas.board_mut().push_undo();
            self.canvas.board_mut().remove_section(id);
            self.canvas.select(None);
        }
    }

    fn card_inspector(&mut self, ui: &mut egui::Ui, id: CardId) {
        let mut ungroup = false;
        let mut remove = false;
        if let Some(card) = self.canvas.board_mut().cards.get_mut(&id) {
            section_label(ui, "CARD");
            ui.text_edit_singleline(&mut card.title);
            ui.add_space(4.0);
            ui.weak(card.kind.label());
            ui.weak(format!("{:.0} x {:.0}", card.width, card.height));
            ui.add_space(8.0);

            if TextButton::new("Ungroup")
                .enabled(card.section.is_some())
                .show(ui)
            {
                ungroup = true;
            }
            if TextButton::new("Remove card").show(ui) {
                remove = true;
            }
        } else {
            self.canvas.select(None);
            return;
        }
        if ungroup {
            self.canvas.board_mut().push_undo();
            self.canvas.board_mut().ungroup_card(id);
        }
        if remove {
            self.canvas.board_mut().push_undo();
            self.canvas.remove_card(id);
            self.values.remove(&id);
        }
    }
}

/// Slightly darker shade of a palette color, used for section borders.
fn darken(color: Color32) -> Color32 {
    let f = |c: u8| (c as f32 * 0.85) as u8;
    Color32::from_rgba_unmultiplied(f(color.r()), f(color.g()), f(color.b()), color.a())
}
