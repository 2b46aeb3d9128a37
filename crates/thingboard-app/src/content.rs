//! Demo card bodies, one per card kind.
//!
//! Stands in for the device I/O collaborator: each card shows a plausible
//! affordance widget driven by local demo state instead of a live device.

use egui::{Color32, Stroke, Ui};
use thingboard_core::CardKind;

/// Local stand-in for a device affordance's value.
#[derive(Debug, Clone)]
pub enum DemoValue {
    Bool(bool),
    Number(f64),
    Series(Vec<f64>),
    Text(String),
    Count(u32),
}

/// Starting value for a freshly added card.
pub fn default_value(kind: CardKind) -> DemoValue {
    match kind {
        CardKind::Toggle => DemoValue::Bool(false),
        CardKind::Button => DemoValue::Count(0),
        CardKind::Slider => DemoValue::Number(40.0),
        CardKind::Gauge => DemoValue::Number(21.5),
        CardKind::Chart => DemoValue::Series(Vec::new()),
        CardKind::Text => DemoValue::Text("online".to_string()),
    }
}

/// Samples kept in a chart series.
const SERIES_CAPACITY: usize = 120;

/// Render one card's body. `time` drives the demo signal for charts.
pub fn card_body(ui: &mut Ui, kind: CardKind, value: &mut DemoValue, time: f64) {
    match (kind, value) {
        (CardKind::Toggle, DemoValue::Bool(on)) => {
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(*on, if *on { "On" } else { "Off" })
                    .clicked()
                {
                    *on = !*on;
                }
            });
        }
        (CardKind::Button, DemoValue::Count(count)) => {
            ui.horizontal(|ui| {
                if ui.button("Trigger").clicked() {
                    *count += 1;
                }
                if *count > 0 {
                    ui.weak(format!("x{count}"));
                }
            });
        }
        (CardKind::Slider, DemoValue::Number(level)) => {
            ui.add(egui::Slider::new(level, 0.0..=100.0).show_value(true));
        }
        (CardKind::Gauge, DemoValue::Number(reading)) => {
            ui.vertical(|ui| {
                ui.heading(format!("{reading:.1}"));
                ui.add(egui::ProgressBar::new((*reading / 40.0).clamp(0.0, 1.0) as f32));
            });
        }
        (CardKind::Chart, DemoValue::Series(series)) => {
            series.push(20.0 + 4.0 * (time * 0.7).sin() + (time * 2.3).sin());
            if series.len() > SERIES_CAPACITY {
                series.remove(0);
            }
            chart_line(ui, series);
        }
        (CardKind::Text, DemoValue::Text(text)) => {
            ui.label(text.as_str());
        }
        // Kind and value drifted apart (e.g. a hand-edited snapshot);
        // show nothing rather than panic.
        _ => {
            ui.weak("--");
        }
    }
}

/// Plot a rolling series as a polyline across the available rect.
fn chart_line(ui: &mut Ui, series: &[f64]) {
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
    if series.len() < 2 || !ui.is_rect_visible(rect) {
        return;
    }
    let (min, max) = series.iter().fold((f64::MAX, f64::MIN), |(lo, hi), v| {
        (lo.min(*v), hi.max(*v))
    });
    let span = (max - min).max(1e-6);
    let points: Vec<egui::Pos2> = series
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = rect.left() + rect.width() * i as f32 / (series.len() - 1) as f32;
            let y = rect.bottom() - rect.height() * ((v - min) / span) as f32;
            egui::pos2(x, y)
        })
        .collect();
    ui.painter().add(egui::Shape::line(
        points,
        Stroke::new(1.5, Color32::from_rgb(59, 130, 246)),
    ));
}
