#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use sasdesk::SasDesk;

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`). windows: $env:RUST_LOG="info"; cargo run

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "McSAS3 Configuration Interface",
        native_options,
        Box::new(|cc| Ok(Box::new(SasDesk::new(cc)))),
    )
}
