//! # Tower Link Planner
//!
//! Desktop tool for laying out point-to-point radio links on a map. Towers are
//! placed by clicking the map, links connect towers that share a frequency,
//! and selecting a link shades its first Fresnel zone.
//!
//! ## Usage
//!
//! ```text
//! towerlink-planner [CONFIG.toml]
//! ```
//!
//! Without an argument, `towerlink.toml` in the working directory is used if it
//! exists. Log verbosity can be raised or lowered with `RUST_LOG`.

use eframe::egui;
use env_logger::Builder;
use log::{LevelFilter, info};
use std::path::PathBuf;

use crate::config::PlannerConfig;
use crate::ui::AppState;

mod config;
mod planner;
mod ui;

fn main() -> anyhow::Result<()> {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("towerlink_planner"), LevelFilter::Debug)
        .parse_default_env()
        .init();

    let config = PlannerConfig::resolve(std::env::args_os().nth(1).map(PathBuf::from))?;
    info!("Starting up with {:?}", config);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]).with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Tower Link Planner",
        native_options,
        Box::new(move |cc| Ok(Box::new(AppState::new(&config, cc.storage)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run the UI: {e}"))?;

    info!("Shut down");
    Ok(())
}
