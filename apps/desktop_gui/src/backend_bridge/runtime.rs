//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{BoardClient, ClientSettings, Notice, SyncEvent};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let (client, events) = BoardClient::connect(&settings);
            let forwarder = tokio::spawn(forward_sync_events(events, ui_tx.clone()));
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Syncing with {}",
                settings.backend_url
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend worker received command");
                match cmd {
                    BackendCommand::SubmitPixel {
                        selection,
                        user,
                        color,
                    } => {
                        let result = client.submit(selection, &user, color).await;
                        let notice = Notice::from_submission(&result);
                        let _ = ui_tx.try_send(UiEvent::Submitted(notice));
                    }
                    BackendCommand::Refresh => client.refresh(),
                    BackendCommand::Shutdown => break,
                }
            }

            client.shutdown().await;
            forwarder.abort();
            tracing::info!("backend worker stopped");
        });
    });
}

async fn forward_sync_events(mut events: broadcast::Receiver<SyncEvent>, ui_tx: Sender<UiEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => match ui_tx.try_send(UiEvent::Sync(event)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("ui event queue is full; dropping sync result");
                }
                Err(TrySendError::Disconnected(_)) => break,
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "ui fell behind sync events; waiting for the next cycle");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
