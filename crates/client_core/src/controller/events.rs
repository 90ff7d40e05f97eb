//! Events fed into the controller, commands it issues, and user-facing notices.

use std::fmt;

use shared::{
    domain::ProfileData,
    protocol::{LoginResponse, MessageResponse, UpdateProfileResponse},
};

use crate::error::{BackendError, BackendErrorKind};

/// Why a profile is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFetchPurpose {
    /// The user opened the profile view.
    Open,
    /// Re-sync after the profile was edited.
    Resync,
}

/// Ties a completion event to the command that produced it.
pub type RequestId = u64;

pub enum AppEvent {
    LoginSubmitted {
        username: String,
        password: String,
    },
    LoginCompleted {
        request_id: RequestId,
        submitted_username: String,
        result: Result<LoginResponse, BackendError>,
    },
    SwitchToRegister,
    SwitchToLogin,
    RegisterSubmitted {
        username: String,
        password: String,
        confirm_password: String,
    },
    RegisterCompleted {
        request_id: RequestId,
        result: Result<MessageResponse, BackendError>,
    },
    ProfileIconClicked,
    ProfileFetched {
        request_id: RequestId,
        purpose: ProfileFetchPurpose,
        username: String,
        result: Result<ProfileData, BackendError>,
    },
    ProfileSaveRequested {
        fields: ProfileData,
    },
    ProfileSaveCompleted {
        request_id: RequestId,
        result: Result<UpdateProfileResponse, BackendError>,
    },
    /// The profile changed on the backend; `username` is set when it was renamed.
    ProfileUpdated {
        username: Option<String>,
    },
    SettingsToggled(bool),
    HomeRequested,
    LogoutRequested,
    NoticeDismissed,
    /// The command could not be handed to the backend worker.
    BackendUnavailable(String),
}

impl AppEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::LoginSubmitted { .. } => "login_submitted",
            AppEvent::LoginCompleted { .. } => "login_completed",
            AppEvent::SwitchToRegister => "switch_to_register",
            AppEvent::SwitchToLogin => "switch_to_login",
            AppEvent::RegisterSubmitted { .. } => "register_submitted",
            AppEvent::RegisterCompleted { .. } => "register_completed",
            AppEvent::ProfileIconClicked => "profile_icon_clicked",
            AppEvent::ProfileFetched { .. } => "profile_fetched",
            AppEvent::ProfileSaveRequested { .. } => "profile_save_requested",
            AppEvent::ProfileSaveCompleted { .. } => "profile_save_completed",
            AppEvent::ProfileUpdated { .. } => "profile_updated",
            AppEvent::SettingsToggled(_) => "settings_toggled",
            AppEvent::HomeRequested => "home_requested",
            AppEvent::LogoutRequested => "logout_requested",
            AppEvent::NoticeDismissed => "notice_dismissed",
            AppEvent::BackendUnavailable(_) => "backend_unavailable",
        }
    }
}

/// Backend requests issued by the controller. At most one is outstanding.
#[derive(Clone, PartialEq)]
pub enum BackendCommand {
    Login {
        request_id: RequestId,
        username: String,
        password: String,
    },
    Register {
        request_id: RequestId,
        username: String,
        password: String,
    },
    FetchProfile {
        request_id: RequestId,
        username: String,
        purpose: ProfileFetchPurpose,
    },
    UpdateProfile {
        request_id: RequestId,
        username: String,
        fields: ProfileData,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Login,
    Register,
    ProfileFetch(ProfileFetchPurpose),
    ProfileUpdate,
}

impl BackendCommand {
    pub fn kind(&self) -> RequestKind {
        match self {
            BackendCommand::Login { .. } => RequestKind::Login,
            BackendCommand::Register { .. } => RequestKind::Register,
            BackendCommand::FetchProfile { purpose, .. } => RequestKind::ProfileFetch(*purpose),
            BackendCommand::UpdateProfile { .. } => RequestKind::ProfileUpdate,
        }
    }

    pub fn request_id(&self) -> RequestId {
        match self {
            BackendCommand::Login { request_id, .. }
            | BackendCommand::Register { request_id, .. }
            | BackendCommand::FetchProfile { request_id, .. }
            | BackendCommand::UpdateProfile { request_id, .. } => *request_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Login { .. } => "login",
            BackendCommand::Register { .. } => "register",
            BackendCommand::FetchProfile { .. } => "fetch_profile",
            BackendCommand::UpdateProfile { .. } => "update_profile",
        }
    }
}

// Passwords never reach logs or panic messages.
impl fmt::Debug for BackendCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendCommand::Login {
                request_id,
                username,
                ..
            } => f
                .debug_struct("Login")
                .field("request_id", request_id)
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            BackendCommand::Register {
                request_id,
                username,
                ..
            } => f
                .debug_struct("Register")
                .field("request_id", request_id)
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            BackendCommand::FetchProfile {
                request_id,
                username,
                purpose,
            } => f
                .debug_struct("FetchProfile")
                .field("request_id", request_id)
                .field("username", username)
                .field("purpose", purpose)
                .finish(),
            BackendCommand::UpdateProfile {
                request_id,
                username,
                fields,
            } => f
                .debug_struct("UpdateProfile")
                .field("request_id", request_id)
                .field("username", username)
                .field("fields", fields)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Warning,
    Error,
}

/// A message for the user, shown until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub title: String,
    pub message: String,
    /// Set when the notice reports a failed backend call.
    pub cause: Option<BackendErrorKind>,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Error, title, message)
    }

    fn new(severity: NoticeSeverity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
            cause: None,
        }
    }

    pub fn caused_by(mut self, kind: BackendErrorKind) -> Self {
        self.cause = Some(kind);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_debug_output_redacts_passwords() {
        let cmd = BackendCommand::Login {
            request_id: 1,
            username: "a@b.io".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{cmd:?}");
        assert!(rendered.contains("a@b.io"));
        assert!(!rendered.contains("hunter2"));
        assert_eq!(cmd.kind(), RequestKind::Login);
    }

    #[test]
    fn fetch_kind_carries_purpose() {
        let cmd = BackendCommand::FetchProfile {
            request_id: 7,
            username: "a@b.io".to_string(),
            purpose: ProfileFetchPurpose::Resync,
        };
        assert_eq!(
            cmd.kind(),
            RequestKind::ProfileFetch(ProfileFetchPurpose::Resync)
        );
        assert_eq!(cmd.name(), "fetch_profile");
        assert_eq!(cmd.request_id(), 7);
    }
}
