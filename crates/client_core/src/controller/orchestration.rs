//! Runs controller commands against a backend and feeds the outcome back.

use tracing::debug;

use super::{
    events::{AppEvent, BackendCommand},
    reducer::AppState,
};
use crate::BackendApi;

/// Executes one command and turns its outcome into the completion event.
pub async fn execute_command(backend: &dyn BackendApi, command: BackendCommand) -> AppEvent {
    debug!(
        command = command.name(),
        request_id = command.request_id(),
        "executing backend command"
    );
    match command {
        BackendCommand::Login {
            request_id,
            username,
            password,
        } => {
            let result = backend.login(&username, &password).await;
            AppEvent::LoginCompleted {
                request_id,
                submitted_username: username,
                result,
            }
        }
        BackendCommand::Register {
            request_id,
            username,
            password,
        } => AppEvent::RegisterCompleted {
            request_id,
            result: backend.register(&username, &password).await,
        },
        BackendCommand::FetchProfile {
            request_id,
            username,
            purpose,
        } => {
            let result = backend.fetch_profile(&username).await;
            AppEvent::ProfileFetched {
                request_id,
                purpose,
                username,
                result,
            }
        }
        BackendCommand::UpdateProfile {
            request_id,
            username,
            fields,
        } => AppEvent::ProfileSaveCompleted {
            request_id,
            result: backend.update_profile(&username, &fields).await,
        },
    }
}

/// Drives an [`AppState`] inline: each event is dispatched and any resulting
/// backend command is awaited before `send` returns.
pub struct SessionDriver<B: BackendApi> {
    backend: B,
    state: AppState,
}

impl<B: BackendApi> SessionDriver<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn send(&mut self, event: AppEvent) -> &AppState {
        let mut next = self.state.dispatch(event);
        while let Some(command) = next {
            let outcome = execute_command(&self.backend, command).await;
            next = self.state.dispatch(outcome);
        }
        &self.state
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
