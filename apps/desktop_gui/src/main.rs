mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::PixelBoardApp;

#[derive(Parser, Debug)]
#[command(about = "Shared pixel board")]
struct Args {
    /// Overrides the backend url from pixelboard.toml and the environment.
    #[arg(long)]
    backend_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let settings = client_core::load_settings()
        .and_then(|settings| settings.with_backend_override(args.backend_url.as_deref()))
        .context("invalid backend configuration")?;
    tracing::info!(backend_url = %settings.backend_url, "starting pixel board");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Pixel Board")
            .with_inner_size([1780.0, 880.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Pixel Board",
        options,
        Box::new(|_cc| Ok(Box::new(PixelBoardApp::new(cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow!("gui exited with error: {err}"))
}
