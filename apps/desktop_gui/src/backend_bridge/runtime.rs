//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::HttpGenerationClient;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    client: HttpGenerationClient,
    repaint: egui::Context,
) {
    let spawned = thread::Builder::new()
        .name("ragmail-backend".into())
        .spawn(move || run_worker(cmd_rx, ui_tx, client, repaint));
    if let Err(err) = spawned {
        tracing::error!("failed to spawn backend worker thread: {err}");
    }
}

fn run_worker(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    client: HttpGenerationClient,
    repaint: egui::Context,
) {
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
            repaint.request_repaint();
            return;
        }
    };

    // Commands are handed to the runtime as they arrive; nothing here waits on
    // a previous request, so overlapping submissions run side by side.
    while let Ok(cmd) = cmd_rx.recv() {
        let ui_tx = ui_tx.clone();
        let repaint = repaint.clone();
        let client = client.clone();
        runtime.spawn(async move {
            let event = match cmd {
                BackendCommand::Submit(pending) => {
                    let token = pending.token();
                    let settlement = pending.await;
                    UiEvent::Settled { token, settlement }
                }
                BackendCommand::CheckHealth => match client.health().await {
                    Ok(health) => UiEvent::HealthChecked(health),
                    Err(err) => UiEvent::Error(UiError::from_generation(
                        UiErrorContext::HealthCheck,
                        &err,
                    )),
                },
                BackendCommand::ListProjects => match client.list_projects().await {
                    Ok(catalog) => UiEvent::ProjectsLoaded(catalog.projects),
                    Err(err) => UiEvent::Error(UiError::from_generation(
                        UiErrorContext::ListProjects,
                        &err,
                    )),
                },
            };
            let _ = ui_tx.try_send(event);
            repaint.request_repaint();
        });
    }
    tracing::debug!("ui command channel closed; backend worker exiting");
}
