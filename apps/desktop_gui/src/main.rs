use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use clap::Parser;
use client_core::{
    config::DEFAULT_SETTINGS_FILE, load_settings, HttpGenerationClient, SubmissionController,
};
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::{RagmailApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(name = "ragmail-gui")]
struct Args {
    /// Settings file. Falls back to ./ragmail.toml, then the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    base_url: Option<String>,
}

fn resolve_config_path(
    explicit: Option<PathBuf>,
    local_default_exists: bool,
    user_config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }
    if local_default_exists {
        return None;
    }
    user_config_dir
        .map(|dir| dir.join("ragmail").join(DEFAULT_SETTINGS_FILE))
        .filter(|path| path.is_file())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config_path = resolve_config_path(
        args.config,
        Path::new(DEFAULT_SETTINGS_FILE).is_file(),
        dirs::config_dir(),
    );
    let settings = load_settings(config_path.as_deref(), args.base_url.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let client = HttpGenerationClient::new(settings.base_url()?);
    let controller = SubmissionController::new(Arc::new(client.clone()));
    let startup = StartupConfig {
        base_url: client.base_url().to_string(),
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("RAGmail")
            .with_inner_size([1200.0, 780.0])
            .with_min_inner_size([860.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "RAGmail",
        options,
        Box::new(move |cc| {
            backend_bridge::runtime::launch(cmd_rx, ui_tx, client, cc.egui_ctx.clone());
            Ok(Box::new(RagmailApp::new(cmd_tx, ui_rx, controller, startup)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop GUI exited with error: {err}"))
}
