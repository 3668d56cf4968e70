mod app;
mod color;
mod data;
mod state;
mod ui;

use app::JobScopeApp;
use data::loader;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // One blocking fetch per session; a failure keeps the app running
    // with an error banner instead of aborting.
    let source = loader::data_source();
    log::info!("loading postings from {source}");
    let load_result = loader::load_dataset(&source);
    match &load_result {
        Ok(ds) => log::info!("loaded {} postings", ds.len()),
        Err(e) => log::error!("dataset load failed: {e}"),
    }
    let state = AppState::new(load_result);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "JobScope – Job Market Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(JobScopeApp::new(state)))),
    )
}
