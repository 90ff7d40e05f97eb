//! Runtime bridge between the UI command queue and backend event intake.

use std::thread;

use client_core::{execute_command, AppEvent, BackendCommand, HttpBackend};
use crossbeam_channel::{Receiver, Sender};

/// Runs commands one at a time on a dedicated thread and reports each outcome
/// back to the UI. The thread exits once either channel is closed.
pub fn spawn_backend_thread(
    backend: HttpBackend,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<AppEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.send(AppEvent::BackendUnavailable(format!(
                    "Backend worker startup failure: {err}"
                )));
                return;
            }
        };

        tracing::info!(backend_url = %backend.base_url(), "backend worker started");
        while let Ok(command) = cmd_rx.recv() {
            let name = command.name();
            let event = runtime.block_on(execute_command(&backend, command));
            tracing::debug!(command = name, outcome = event.name(), "backend command finished");
            if ui_tx.send(event).is_err() {
                tracing::debug!("ui event queue closed; stopping backend worker");
                break;
            }
        }
        tracing::info!("backend worker stopped");
    })
}
