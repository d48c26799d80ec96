mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{
    commands::BackendCommand,
    runtime::{self, BackendSettings},
};
use crate::config::{load_startup_config, CliArgs};
use crate::controller::events::UiEvent;
use crate::ui::LookupApp;

const APP_TITLE: &str = "Find Your Council Member";

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();
    let startup = load_startup_config(&cli)?;
    init_tracing(&startup.log_filter);
    tracing::info!(server_url = %startup.server_url, "starting desktop gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(
        BackendSettings {
            server_url: startup.server_url.clone(),
            user_agent: format!("desktop_gui/{}", env!("CARGO_PKG_VERSION")),
        },
        cmd_rx,
        ui_tx,
    )
    .context("failed to spawn backend worker thread")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([820.0, 760.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(LookupApp::new(cmd_tx, ui_rx, &startup)))),
    )
    .map_err(|err| anyhow!("desktop gui exited with error: {err}"))
}
