//! Color swatches for section styling.

use egui::{vec2, Color32, CornerRadius, CursorIcon, Sense, Stroke, StrokeKind, Ui};

use crate::{sizing, theme};

/// Preset section background colors, muted so card content stays readable.
pub const SECTION_PALETTE: [Color32; 8] = [
    Color32::from_rgb(246, 247, 249), // neutral
    Color32::from_rgb(254, 242, 242), // red
    Color32::from_rgb(255, 247, 237), // orange
    Color32::from_rgb(254, 252, 232), // yellow
    Color32::from_rgb(240, 253, 244), // green
    Color32::from_rgb(236, 254, 255), // cyan
    Color32::from_rgb(239, 246, 255), // blue
    Color32::from_rgb(250, 245, 255), // purple
];

/// A single clickable color swatch.
pub struct ColorSwatch {
    color: Color32,
    selected: bool,
    size: f32,
}

impl ColorSwatch {
    /// Create a new swatch.
    pub fn new(color: Color32, selected: bool) -> Self {
        Self {
            color,
            selected,
            size: sizing::SMALL,
        }
    }

    /// Set the swatch size.
    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Show the swatch and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let (rect, response) = ui.allocate_exact_size(vec2(self.size, self.size), Sense::click());

        if ui.is_rect_visible(rect) {
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), self.color);

            let stroke = if self.selected {
                Stroke::new(2.0, theme::ACCENT)
            } else if response.hovered() {
                Stroke::new(1.5, Color32::from_gray(160))
            } else {
                Stroke::new(1.0, theme::BORDER)
            };
            ui.painter().rect_stroke(
                rect,
                CornerRadius::same(sizing::CORNER_RADIUS),
                stroke,
                StrokeKind::Inside,
            );
        }

        let clicked = response.clicked();
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A horizontal row of swatches over a palette.
pub struct SwatchRow<'a> {
    palette: &'a [Color32],
    current: Color32,
}

impl<'a> SwatchRow<'a> {
    /// Create a row over a palette, highlighting the current color.
    pub fn new(palette: &'a [Color32], current: Color32) -> Self {
        Self { palette, current }
    }

    /// Show the row; returns the newly picked color if one was clicked.
    pub fn show(self, ui: &mut Ui) -> Option<Color32> {
        let mut picked = None;
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 4.0;
            for &color in self.palette {
                if ColorSwatch::new(color, color == self.current).show(ui) {
                    picked = Some(color);
                }
            }
        });
        picked
    }
}
