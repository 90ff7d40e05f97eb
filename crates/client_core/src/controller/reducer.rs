//! Navigation/session state machine.
//!
//! Every view change goes through [`AppState::dispatch`]. Backend work is
//! returned as a [`BackendCommand`] and its outcome comes back as another
//! [`AppEvent`], so the state itself never blocks or performs I/O.

use shared::{
    domain::{ProfileData, View},
    protocol::{LoginResponse, MessageResponse, UpdateProfileResponse},
};
use tracing::{debug, info, warn};

use super::events::{
    AppEvent, BackendCommand, Notice, ProfileFetchPurpose, RequestId, RequestKind,
};
use crate::error::BackendError;

const APP_NAME: &str = "MindZap";

/// Which request a failure notice is describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureContext {
    Login,
    Register,
    ProfileFetch,
    ProfileUpdate,
}

impl FailureContext {
    fn connection_message(self) -> &'static str {
        match self {
            FailureContext::Login | FailureContext::Register => {
                "Could not connect to the backend server. Please ensure the backend is running."
            }
            FailureContext::ProfileFetch => "Could not connect to backend to fetch profile.",
            FailureContext::ProfileUpdate => "Could not connect to backend to update profile.",
        }
    }

    fn activity(self) -> &'static str {
        match self {
            FailureContext::Login => "during login",
            FailureContext::Register => "during registration",
            FailureContext::ProfileFetch => "fetching profile",
            FailureContext::ProfileUpdate => "updating profile",
        }
    }
}

fn failure_notice(context: FailureContext, err: &BackendError) -> Notice {
    let notice = match err {
        BackendError::ConnectionFailure(_) => {
            Notice::error("Connection Error", context.connection_message())
        }
        BackendError::Http { message, .. }
            if err.is_client_rejection() && context == FailureContext::Login =>
        {
            let message = if message.is_empty() {
                "An unknown error occurred during login."
            } else {
                message.as_str()
            };
            Notice::warning("Login Failed", message)
        }
        BackendError::Http { message, .. }
            if err.is_client_rejection() && context == FailureContext::Register =>
        {
            let message = if message.is_empty() {
                "The backend rejected the registration."
            } else {
                message.as_str()
            };
            Notice::warning("Registration Failed", message)
        }
        BackendError::Http { .. } => Notice::error("Server Error", err.to_string()),
        BackendError::MalformedResponse { .. } => Notice::error("Response Error", err.to_string()),
        BackendError::MissingUsername => {
            Notice::warning("Profile Error", "No user logged in to view profile.")
        }
        BackendError::Unexpected(detail) => Notice::error(
            "Unexpected Error",
            format!("An unexpected error occurred {}: {detail}", context.activity()),
        ),
    };
    notice.caused_by(err.kind())
}

/// The outstanding backend request and the view it was issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRequest {
    id: RequestId,
    kind: RequestKind,
    issued_from: View,
}

/// The whole client state. Views render from a shared reference to it.
#[derive(Debug, Clone)]
pub struct AppState {
    view: View,
    session: Option<String>,
    dashboard_display: Option<String>,
    profile: Option<ProfileData>,
    notice: Option<Notice>,
    in_flight: Option<PendingRequest>,
    last_request_id: RequestId,
    login_form_generation: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: View::Login,
            session: None,
            dashboard_display: None,
            profile: None,
            notice: None,
            in_flight: None,
            last_request_id: 0,
            login_form_generation: 0,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// The logged-in identity, if any.
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// The identity currently shown on the dashboard.
    pub fn dashboard_display(&self) -> Option<&str> {
        self.dashboard_display.as_deref()
    }

    pub fn profile(&self) -> Option<&ProfileData> {
        self.profile.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn in_flight(&self) -> Option<RequestKind> {
        self.in_flight.map(|pending| pending.kind)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Bumped after each successful login so the login form can clear its fields.
    pub fn login_form_generation(&self) -> u64 {
        self.login_form_generation
    }

    pub fn window_title(&self) -> String {
        let identity = self.session.as_deref().unwrap_or_default();
        match self.view {
            View::Login | View::Register => format!("{APP_NAME} - {}", self.view.label()),
            View::Dashboard | View::Profile | View::Settings => {
                format!("{APP_NAME} - {} ({identity})", self.view.label())
            }
        }
    }

    /// Single entry point mapping an event to a transition.
    pub fn dispatch(&mut self, event: AppEvent) -> Option<BackendCommand> {
        debug!(event = event.name(), view = self.view.label(), "dispatching controller event");
        let command = match event {
            AppEvent::LoginSubmitted { username, password } => {
                self.attempt_login(username, password)
            }
            AppEvent::LoginCompleted {
                request_id,
                submitted_username,
                result,
            } => {
                if let Some(pending) = self.finish_request(request_id) {
                    self.complete_login(pending, submitted_username, result);
                }
                None
            }
            AppEvent::SwitchToRegister => {
                if self.view == View::Login {
                    self.view = View::Register;
                }
                None
            }
            AppEvent::SwitchToLogin => {
                if self.view == View::Register {
                    self.show_login();
                }
                None
            }
            AppEvent::RegisterSubmitted {
                username,
                password,
                confirm_password,
            } => self.attempt_register(username, password, confirm_password),
            AppEvent::RegisterCompleted { request_id, result } => {
                if let Some(pending) = self.finish_request(request_id) {
                    self.complete_register(pending, result);
                }
                None
            }
            AppEvent::ProfileIconClicked => self.show_profile(),
            AppEvent::ProfileFetched {
                request_id,
                purpose,
                username,
                result,
            } => {
                if let Some(pending) = self.finish_request(request_id) {
                    self.complete_profile_fetch(pending, purpose, username, result);
                }
                None
            }
            AppEvent::ProfileSaveRequested { fields } => self.save_profile(fields),
            AppEvent::ProfileSaveCompleted { request_id, result } => self
                .finish_request(request_id)
                .and_then(|_| self.complete_profile_save(result)),
            AppEvent::ProfileUpdated { username } => self.sync_after_profile_update(username),
            AppEvent::SettingsToggled(checked) => {
                self.toggle_settings(checked);
                None
            }
            AppEvent::HomeRequested => {
                if self.require_session("No user logged in.").is_some() {
                    self.view = View::Dashboard;
                }
                None
            }
            AppEvent::LogoutRequested => {
                info!("logging out");
                self.show_login();
                None
            }
            AppEvent::NoticeDismissed => {
                self.notice = None;
                None
            }
            AppEvent::BackendUnavailable(reason) => {
                warn!(%reason, "backend worker unavailable");
                self.in_flight = None;
                self.notice = Some(Notice::error("Backend Unavailable", reason));
                None
            }
        };
        self.check_invariants();
        command
    }

    /// Validates the credentials locally and issues the login request.
    pub fn attempt_login(&mut self, username: String, password: String) -> Option<BackendCommand> {
        if self.view != View::Login {
            debug!(view = self.view.label(), "ignoring login submission outside login view");
            return None;
        }
        let username = username.trim().to_string();
        if username.is_empty() || password.is_empty() {
            self.notice = Some(Notice::warning(
                "Login Failed",
                "Please enter both username and password.",
            ));
            return None;
        }
        self.begin_request(|request_id| BackendCommand::Login {
            request_id,
            username,
            password,
        })
    }

    /// Opens the profile view for the current session, or falls back to Login.
    pub fn show_profile(&mut self) -> Option<BackendCommand> {
        let username = self.require_session("No user logged in to view profile.")?;
        self.begin_request(|request_id| BackendCommand::FetchProfile {
            request_id,
            username,
            purpose: ProfileFetchPurpose::Open,
        })
    }

    /// Re-fetches the profile after an edit. `renamed_to` is the new identity
    /// when the edit changed the username.
    pub fn sync_after_profile_update(
        &mut self,
        renamed_to: Option<String>,
    ) -> Option<BackendCommand> {
        let current = self.require_session("No user logged in to view profile.")?;
        let username = renamed_to
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or(current);
        self.begin_request(|request_id| BackendCommand::FetchProfile {
            request_id,
            username,
            purpose: ProfileFetchPurpose::Resync,
        })
    }

    fn attempt_register(
        &mut self,
        username: String,
        password: String,
        confirm_password: String,
    ) -> Option<BackendCommand> {
        if self.view != View::Register {
            return None;
        }
        let username = username.trim().to_string();
        if username.is_empty() || password.is_empty() {
            self.notice = Some(Notice::warning(
                "Registration Failed",
                "Please fill in all fields.",
            ));
            return None;
        }
        if password != confirm_password {
            self.notice = Some(Notice::warning(
                "Registration Failed",
                "Passwords do not match.",
            ));
            return None;
        }
        self.begin_request(|request_id| BackendCommand::Register {
            request_id,
            username,
            password,
        })
    }

    fn save_profile(&mut self, fields: ProfileData) -> Option<BackendCommand> {
        let username = self.require_session("No user logged in to view profile.")?;
        if self.view != View::Profile {
            return None;
        }
        self.begin_request(|request_id| BackendCommand::UpdateProfile {
            request_id,
            username,
            fields,
        })
    }

    fn toggle_settings(&mut self, checked: bool) {
        if self.require_session("No user logged in.").is_none() {
            return;
        }
        match (checked, self.view) {
            (true, View::Dashboard | View::Profile) => self.view = View::Settings,
            (false, View::Settings) => self.view = View::Dashboard,
            _ => {}
        }
    }

    fn complete_login(
        &mut self,
        pending: PendingRequest,
        submitted_username: String,
        result: Result<LoginResponse, BackendError>,
    ) {
        if !self.still_on(pending) {
            return;
        }
        match result {
            Ok(response) => {
                let identity = response
                    .username
                    .filter(|name| !name.is_empty())
                    .unwrap_or(submitted_username);
                info!(%identity, "login succeeded");
                self.notice = Some(Notice::info(
                    "Login Success",
                    response
                        .message
                        .unwrap_or_else(|| "Login successful!".to_string()),
                ));
                self.login_form_generation = self.login_form_generation.wrapping_add(1);
                self.profile = None;
                self.show_dashboard(identity);
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "login failed: {err}");
                self.notice = Some(failure_notice(FailureContext::Login, &err));
            }
        }
    }

    fn complete_register(
        &mut self,
        pending: PendingRequest,
        result: Result<MessageResponse, BackendError>,
    ) {
        if !self.still_on(pending) {
            return;
        }
        match result {
            Ok(response) => {
                self.show_login();
                self.notice = Some(Notice::info(
                    "Registration Success",
                    response
                        .message
                        .unwrap_or_else(|| "Registration successful! Please log in.".to_string()),
                ));
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "registration failed: {err}");
                self.notice = Some(failure_notice(FailureContext::Register, &err));
            }
        }
    }

    fn complete_profile_fetch(
        &mut self,
        pending: PendingRequest,
        purpose: ProfileFetchPurpose,
        username: String,
        result: Result<ProfileData, BackendError>,
    ) {
        // A resync still applies after navigating away; it carries the new identity.
        if purpose == ProfileFetchPurpose::Open && !self.still_on(pending) {
            return;
        }
        match (purpose, result) {
            (ProfileFetchPurpose::Open, Ok(profile)) => {
                self.profile = Some(profile);
                self.view = View::Profile;
            }
            (ProfileFetchPurpose::Open, Err(err)) => {
                warn!(kind = ?err.kind(), "profile fetch failed: {err}");
                self.notice = Some(failure_notice(FailureContext::ProfileFetch, &err));
            }
            (ProfileFetchPurpose::Resync, Ok(profile)) => {
                let identity = profile
                    .username()
                    .map(str::to_string)
                    .unwrap_or(username);
                if self.session.as_deref() != Some(identity.as_str()) {
                    info!(%identity, "session identity changed after profile update");
                }
                self.session = Some(identity.clone());
                self.dashboard_display = Some(identity);
                self.profile = Some(profile);
            }
            (ProfileFetchPurpose::Resync, Err(err)) => {
                warn!(kind = ?err.kind(), "profile re-sync failed: {err}");
                let diagnostic = failure_notice(FailureContext::ProfileFetch, &err);
                self.notice = Some(
                    Notice::warning(
                        "Profile Sync Error",
                        format!(
                            "Could not re-fetch updated profile data. {}",
                            diagnostic.message
                        ),
                    )
                    .caused_by(err.kind()),
                );
            }
        }
    }

    fn complete_profile_save(
        &mut self,
        result: Result<UpdateProfileResponse, BackendError>,
    ) -> Option<BackendCommand> {
        match result {
            Ok(response) => {
                self.notice = Some(Notice::info(
                    "Profile Updated",
                    response
                        .message
                        .unwrap_or_else(|| "Profile updated successfully.".to_string()),
                ));
                self.sync_after_profile_update(response.username)
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "profile update failed: {err}");
                self.notice = Some(failure_notice(FailureContext::ProfileUpdate, &err));
                None
            }
        }
    }

    fn show_login(&mut self) {
        if let Some(pending) = self.in_flight.take() {
            debug!(
                request_id = pending.id,
                kind = ?pending.kind,
                "abandoning request on return to login"
            );
        }
        self.view = View::Login;
        self.session = None;
        self.dashboard_display = None;
        self.profile = None;
    }

    fn show_dashboard(&mut self, identity: String) {
        self.session = Some(identity.clone());
        self.dashboard_display = Some(identity);
        self.view = View::Dashboard;
    }

    /// Returns the session identity, or redirects to Login with a warning.
    fn require_session(&mut self, missing_message: &str) -> Option<String> {
        match self.session.as_deref().filter(|identity| !identity.is_empty()) {
            Some(identity) => Some(identity.to_string()),
            None => {
                warn!(view = self.view.label(), "no session; returning to login");
                self.show_login();
                self.notice = Some(Notice::warning("Profile Error", missing_message));
                None
            }
        }
    }

    fn begin_request(
        &mut self,
        build: impl FnOnce(RequestId) -> BackendCommand,
    ) -> Option<BackendCommand> {
        if let Some(pending) = self.in_flight {
            debug!(pending = ?pending.kind, "request already in flight");
            self.notice = Some(Notice::info(
                "Request In Progress",
                "Please wait for the current request to finish.",
            ));
            return None;
        }
        self.last_request_id = self.last_request_id.wrapping_add(1);
        let command = build(self.last_request_id);
        self.in_flight = Some(PendingRequest {
            id: command.request_id(),
            kind: command.kind(),
            issued_from: self.view,
        });
        Some(command)
    }

    /// Releases the in-flight guard if `request_id` is the outstanding request.
    /// Completions of abandoned requests yield `None` and must be ignored.
    fn finish_request(&mut self, request_id: RequestId) -> Option<PendingRequest> {
        match self.in_flight {
            Some(pending) if pending.id == request_id => self.in_flight.take(),
            pending => {
                debug!(
                    request_id,
                    pending = ?pending.map(|p| p.id),
                    "dropping result of an abandoned request"
                );
                None
            }
        }
    }

    /// Whether the user is still on the view the request was issued from.
    fn still_on(&self, pending: PendingRequest) -> bool {
        if self.view == pending.issued_from {
            return true;
        }
        debug!(
            kind = ?pending.kind,
            issued_from = pending.issued_from.label(),
            view = self.view.label(),
            "dropping result after the user navigated away"
        );
        false
    }

    fn check_invariants(&self) {
        debug_assert!(
            !self.view.requires_session() || self.session.is_some(),
            "{:?} shown without a session",
            self.view
        );
        debug_assert_eq!(self.session, self.dashboard_display);
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
