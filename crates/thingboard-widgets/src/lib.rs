//! Reusable egui widget components for the Thingboard dashboard chrome.
//!
//! - **Buttons**: text buttons and toggle buttons for the toolbar
//! - **Frames**: panel, toolbar, and menu-item chrome
//! - **Layout**: section labels, separators, spacing helpers
//! - **Swatch**: color swatch rows for section styling

pub mod buttons;
pub mod frames;
pub mod layout;
pub mod swatch;

pub use buttons::{TextButton, ToggleButton};
pub use frames::{menu_item, menu_item_enabled, menu_separator, panel_frame, toolbar_frame};
pub use layout::{section_label, separator, vertical_separator};
pub use swatch::{ColorSwatch, SwatchRow, SECTION_PALETTE};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Small control size (color swatches)
    pub const SMALL: f32 = 20.0;
    /// Medium control size (toolbar buttons)
    pub const MEDIUM: f32 = 28.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Selected background
    pub const SELECTED_BG: Color32 = Color32::from_rgb(235, 245, 255);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
