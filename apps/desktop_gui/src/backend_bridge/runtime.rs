//! Backend worker: a dedicated thread driving a tokio runtime that serves the
//! UI command queue and reports back through UI events.

use std::{sync::Arc, thread};

use client_core::{LookupClient, LookupError, LookupService};
use crossbeam_channel::{Receiver, Sender};
use uuid::Uuid;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::map::tiles::{decode_tile_image, TileImage};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub server_url: String,
    pub user_agent: String,
}

pub fn launch(
    settings: BackendSettings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("lookup-backend".to_string())
        .spawn(move || run_backend(settings, cmd_rx, ui_tx))
}

fn run_backend(settings: BackendSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to build backend runtime: {err}");
            report_startup_failure(&ui_tx, format!("failed to build runtime: {err}"));
            drain_after_startup_failure(&cmd_rx, &ui_tx, "backend runtime unavailable");
            return;
        }
    };

    runtime.block_on(async move {
        let http = match reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .build()
        {
            Ok(http) => http,
            Err(err) => {
                tracing::error!("failed to build http client: {err}");
                report_startup_failure(&ui_tx, format!("failed to build http client: {err}"));
                drain_after_startup_failure(&cmd_rx, &ui_tx, "http client unavailable");
                return;
            }
        };

        let service: Arc<dyn LookupService> =
            match LookupClient::with_http_client(http.clone(), &settings.server_url) {
                Ok(client) => {
                    tracing::info!(endpoint = %client.endpoint(), "lookup client ready");
                    Arc::new(client)
                }
                Err(err) => {
                    tracing::error!("failed to build lookup client: {err:#}");
                    report_startup_failure(&ui_tx, format!("{err:#}"));
                    drain_after_startup_failure(&cmd_rx, &ui_tx, "lookup client unavailable");
                    return;
                }
            };

        let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::Lookup {
                    request_id,
                    address,
                } => {
                    let service = Arc::clone(&service);
                    let ui_tx = ui_tx.clone();
                    tokio::spawn(async move {
                        let event = run_lookup(service.as_ref(), request_id, &address).await;
                        deliver(&ui_tx, event);
                    });
                }
                BackendCommand::FetchTile { key, url } => {
                    let http = http.clone();
                    let ui_tx = ui_tx.clone();
                    tokio::spawn(async move {
                        let event = match fetch_tile(&http, &url).await {
                            Ok(image) => UiEvent::TileLoaded { key, image },
                            Err(reason) => {
                                tracing::debug!(%url, "tile fetch failed: {reason}");
                                UiEvent::TileFailed { key, reason }
                            }
                        };
                        deliver(&ui_tx, event);
                    });
                }
            }
        }
        tracing::info!("ui command queue closed; backend worker stopping");
    });
}

/// Blocks until the UI takes the event; every queued lookup must settle.
fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if ui_tx.send(event).is_err() {
        tracing::debug!("ui event receiver dropped");
    }
}

fn report_startup_failure(ui_tx: &Sender<UiEvent>, message: String) {
    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
        UiErrorContext::BackendStartup,
        message,
    )));
}

/// Keeps answering lookups after a failed startup so none stays in flight.
fn drain_after_startup_failure(
    cmd_rx: &Receiver<BackendCommand>,
    ui_tx: &Sender<UiEvent>,
    detail: &str,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        if let BackendCommand::Lookup { request_id, .. } = cmd {
            deliver(
                ui_tx,
                UiEvent::LookupSettled {
                    request_id,
                    outcome: Err(LookupError::transport(detail)),
                },
            );
        }
    }
}

pub async fn run_lookup(service: &dyn LookupService, request_id: Uuid, address: &str) -> UiEvent {
    let outcome = service.lookup(address).await;
    match &outcome {
        Ok(data) => tracing::info!(
            %request_id,
            district = %data.district.number,
            representatives = data.representatives.len(),
            "lookup succeeded"
        ),
        Err(err) => tracing::warn!(
            %request_id,
            kind = ?err.kind(),
            diagnostic = err.diagnostic().unwrap_or_default(),
            "lookup failed: {err}"
        ),
    }
    UiEvent::LookupSettled {
        request_id,
        outcome,
    }
}

pub async fn fetch_tile(http: &reqwest::Client, url: &str) -> Result<TileImage, String> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|err| format!("tile request failed: {err}"))?
        .error_for_status()
        .map_err(|err| format!("tile server error: {err}"))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|err| format!("failed to read tile body: {err}"))?;
    decode_tile_image(&bytes)
}
