use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    fetch_snapshot, HttpPixelBackend, Notice, PixelBackend, RefreshTrigger, SubmissionController,
};
use shared::domain::{CellCoord, HexColor};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Overrides the backend url from pixelboard.toml and the environment.
    #[arg(long)]
    backend_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints the current board and leaderboard as JSON.
    Snapshot,
    /// Proposes a new color for one cell.
    Paint {
        #[arg(long)]
        x: i64,
        #[arg(long)]
        y: i64,
        #[arg(long)]
        color: HexColor,
        #[arg(long)]
        user: String,
    },
}

/// A one-shot process has no poller to wake, so a refresh is just logged.
struct NoRefresh;

impl RefreshTrigger for NoRefresh {
    fn trigger_now(&self) {
        tracing::debug!("write acknowledged; re-run snapshot to see it");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let args = Args::parse();

    let settings = client_core::load_settings()
        .and_then(|settings| settings.with_backend_override(args.backend_url.as_deref()))
        .context("invalid backend configuration")?;
    let backend = Arc::new(HttpPixelBackend::new(&settings.backend_url));

    match args.command {
        Command::Snapshot => {
            let (cells, scoreboard) = fetch_snapshot(backend.as_ref())
                .await
                .context("failed to fetch board")?;
            let pixels: Vec<_> = cells
                .iter()
                .map(|cell| {
                    serde_json::json!({
                        "x": cell.coord.x(),
                        "y": cell.coord.y(),
                        "color": cell.color,
                        "user": cell.owner,
                        "updated_at": cell.updated_at,
                    })
                })
                .collect();
            let snapshot = serde_json::json!({
                "pixels": pixels,
                "leaderboard": scoreboard.entries(),
            });
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Paint { x, y, color, user } => {
            let coord = CellCoord::new(x, y).context("cell is off the board")?;
            let backend: Arc<dyn PixelBackend> = backend;
            let submission = SubmissionController::new(backend, Arc::new(NoRefresh));
            let result = submission.submit(Some(coord), &user, color).await;
            let notice = Notice::from_submission(&result);
            println!("{}", notice.message);
            result.context("pixel update failed")?;
        }
    }

    Ok(())
}
