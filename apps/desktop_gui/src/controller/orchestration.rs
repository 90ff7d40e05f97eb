//! Command orchestration from UI actions to the backend command queue.

use client_core::{AppEvent, AppState, BackendCommand};
use crossbeam_channel::{Receiver, Sender, TrySendError};

/// Queues a command for the backend worker, or explains why it could not be.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), String> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            Err("UI command queue is full; please retry".to_string())
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            Err("Backend command processor disconnected (possible startup/runtime failure); restart the application".to_string())
        }
    }
}

/// Owns the [`AppState`] on the UI thread and routes its commands to the worker.
pub struct GuiController {
    state: AppState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<AppEvent>,
}

impl GuiController {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<AppEvent>) -> Self {
        Self {
            state: AppState::new(),
            cmd_tx,
            ui_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn handle(&mut self, event: AppEvent) {
        if let Some(cmd) = self.state.dispatch(event) {
            if let Err(reason) = dispatch_backend_command(&self.cmd_tx, cmd) {
                self.state.dispatch(AppEvent::BackendUnavailable(reason));
            }
        }
    }

    /// Applies every completion the worker has reported since the last frame.
    pub fn drain_backend_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.handle(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::{BackendError, RequestKind};
    use crossbeam_channel::bounded;
    use shared::{domain::View, protocol::LoginResponse};

    use super::*;

    fn login_submitted() -> AppEvent {
        AppEvent::LoginSubmitted {
            username: "alice@mindzap.io".to_string(),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn submitted_login_is_queued_for_the_worker() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (_ui_tx, ui_rx) = bounded(4);
        let mut controller = GuiController::new(cmd_tx, ui_rx);

        controller.handle(login_submitted());

        let queued = cmd_rx.try_recv().expect("queued command");
        assert_eq!(queued.kind(), RequestKind::Login);
        assert_eq!(controller.state().in_flight(), Some(RequestKind::Login));
    }

    #[test]
    fn worker_completion_is_applied_on_drain() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(4);
        let mut controller = GuiController::new(cmd_tx, ui_rx);
        controller.handle(login_submitted());
        let request_id = cmd_rx.try_recv().expect("queued command").request_id();

        ui_tx
            .send(AppEvent::LoginCompleted {
                request_id,
                submitted_username: "alice@mindzap.io".to_string(),
                result: Ok(LoginResponse {
                    message: None,
                    username: Some("alice@mindzap.io".to_string()),
                }),
            })
            .expect("send completion");
        controller.drain_backend_events();

        assert_eq!(controller.state().view(), View::Dashboard);
        assert_eq!(controller.state().session(), Some("alice@mindzap.io"));
    }

    #[test]
    fn disconnected_worker_releases_the_request() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (_ui_tx, ui_rx) = bounded(4);
        drop(cmd_rx);
        let mut controller = GuiController::new(cmd_tx, ui_rx);

        controller.handle(login_submitted());

        assert!(!controller.state().is_busy());
        assert_eq!(controller.state().view(), View::Login);
        assert_eq!(
            controller.state().notice().map(|n| n.title.as_str()),
            Some("Backend Unavailable")
        );
    }

    #[test]
    fn failed_completion_keeps_login_view() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(4);
        let mut controller = GuiController::new(cmd_tx, ui_rx);
        controller.handle(login_submitted());
        let request_id = cmd_rx.try_recv().expect("queued command").request_id();

        ui_tx
            .send(AppEvent::LoginCompleted {
                request_id,
                submitted_username: "alice@mindzap.io".to_string(),
                result: Err(BackendError::ConnectionFailure("refused".to_string())),
            })
            .expect("send completion");
        controller.drain_backend_events();

        assert_eq!(controller.state().view(), View::Login);
        assert!(!controller.state().is_busy());
    }
}
