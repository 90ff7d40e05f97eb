mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Result};
use clap::Parser;
use client_core::{load_settings, AppEvent, BackendCommand, HttpBackend};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{
    backend_bridge::runtime::spawn_backend_thread, controller::orchestration::GuiController,
    ui::DesktopGuiApp,
};

#[derive(Parser, Debug)]
#[command(name = "mindzap-desktop", about = "MindZap desktop client")]
struct Args {
    /// Backend base URL; overrides mindzap.toml and MINDZAP_BACKEND_URL.
    #[arg(long)]
    backend_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(raw) = args.backend_url.as_deref() {
        settings.override_backend_url(raw)?;
    }
    tracing::info!(backend_url = %settings.backend_url, "starting desktop client");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<AppEvent>(64);
    spawn_backend_thread(HttpBackend::from_settings(&settings), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("MindZap - Login")
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "MindZap",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DesktopGuiApp::new(GuiController::new(
                cmd_tx, ui_rx,
            ))))
        }),
    )
    .map_err(|err| anyhow!("desktop ui terminated with an error: {err}"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Args;

    #[test]
    fn backend_url_flag_is_optional() {
        let args = Args::try_parse_from(["mindzap-desktop"]).expect("no flags");
        assert!(args.backend_url.is_none());

        let args = Args::try_parse_from(["mindzap-desktop", "--backend-url", "http://10.0.0.5:5000"])
            .expect("flag");
        assert_eq!(args.backend_url.as_deref(), Some("http://10.0.0.5:5000"));
    }
}
