//! Main application entry point.

mod app;
mod content;
mod ui;

use app::ThingboardApp;

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting Thingboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Thingboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Thingboard",
        options,
        Box::new(|cc| Ok(Box::new(ThingboardApp::new(cc)))),
    )
}
