mod app;
mod color;
mod config;
mod data;
mod selection;
mod state;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;

use app::GlassDashboardApp;
use clap::Parser;
use config::{Args, DashboardConfig};
use eframe::egui;
use state::AppState;

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let config = match DashboardConfig::resolve(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // No dashboard without data: a load failure ends the process here.
    let dataset = match data::loader::load_file(&config.data_path) {
        Ok(dataset) => Arc::new(dataset),
        Err(e) => {
            log::error!("Failed to load catalog: {e:#}");
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([900.0, 500.0]),
        ..Default::default()
    };

    let state = AppState::new(dataset, config.currency_symbol);
    let result = eframe::run_native(
        "Glass Dashboard – Performance Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(GlassDashboardApp::new(state)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("UI error: {e}");
            ExitCode::FAILURE
        }
    }
}
