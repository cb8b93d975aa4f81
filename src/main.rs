mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::SalesPandaApp;
use clap::Parser;
use eframe::egui;
use sales_panda::config::{load_config, AppConfig, CliArgs};
use state::AppState;

/// Resolve the config and data file from the command line.
fn startup(args: &CliArgs) -> anyhow::Result<(AppConfig, PathBuf)> {
    let config = load_config(args.config.as_deref())?;
    let data_path = args.data_path(&config);
    Ok((config, data_path))
}

fn main() -> eframe::Result {
    env_logger::init();

    let args = CliArgs::parse();
    let (config, data_path) = match startup(&args) {
        Ok(v) => v,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            std::process::exit(2);
        }
    };

    // Loaded before the window opens; a missing file leaves the dashboard
    // empty with the error in the top bar.
    let mut state = AppState::new(config.dashboard.top_n, config.dashboard.currency.clone());
    state.load_path(&data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.dashboard.window_width, config.dashboard.window_height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Panda – Sales Dashboard",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(SalesPandaApp::new(state)))
        }),
    )
}
