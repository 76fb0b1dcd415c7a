//! Native mood journal dashboard
//!
//! A desktop app for exploring which journal items show up together and how
//! they line up with mood and sleep.

mod app;

use eframe::egui;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("Feelviz"),
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native(
        "Feelviz",
        options,
        Box::new(|cc| Ok(Box::new(app::FeelvizApp::new(cc)))),
    )
}
