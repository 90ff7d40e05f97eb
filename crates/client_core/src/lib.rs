use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::ProfileData,
    error::ApiErrorBody,
    protocol::{
        LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UpdateProfileResponse,
    },
};
use tracing::{debug, warn};
use url::Url;

pub mod config;
pub mod controller;
pub mod error;

pub use config::{load_settings, Settings};
pub use controller::{
    events::{
        AppEvent, BackendCommand, Notice, NoticeSeverity, ProfileFetchPurpose, RequestId,
        RequestKind,
    },
    orchestration::{execute_command, SessionDriver},
    reducer::AppState,
};
pub use error::{BackendError, BackendErrorKind};

/// The backend calls the controller can issue.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, BackendError>;
    async fn register(&self, username: &str, password: &str)
        -> Result<MessageResponse, BackendError>;
    async fn fetch_profile(&self, username: &str) -> Result<ProfileData, BackendError>;
    async fn update_profile(
        &self,
        username: &str,
        fields: &ProfileData,
    ) -> Result<UpdateProfileResponse, BackendError>;
}

pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.backend_url.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base path, percent-encoding each one so an
    /// email address stays a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                BackendError::Unexpected(format!(
                    "backend url '{}' cannot carry a path",
                    self.base_url
                ))
            })?;
            path.pop_if_empty().extend(segments.iter().copied());
        }
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        let raw = response.text().await.map_err(BackendError::from_transport)?;

        if !status.is_success() {
            let message = ApiErrorBody::message_or_raw(&raw);
            warn!(status = status.as_u16(), %message, "backend returned an error status");
            return Err(BackendError::Http {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&raw).map_err(|err| BackendError::malformed(err, &raw))
    }
}

fn require_username(username: &str) -> Result<&str, BackendError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(BackendError::MissingUsername);
    }
    Ok(username)
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, BackendError> {
        let url = self.endpoint(&["login"])?;
        debug!(endpoint = %url, %username, "sending login request");
        let response = self
            .http
            .post(url)
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(BackendError::from_transport)?;
        let body: LoginResponse = Self::read_json(response).await?;
        debug!(username = ?body.username, "login accepted");
        Ok(body)
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<MessageResponse, BackendError> {
        let url = self.endpoint(&["register"])?;
        debug!(endpoint = %url, %username, "sending registration request");
        let response = self
            .http
            .post(url)
            .json(&RegisterRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(BackendError::from_transport)?;
        Self::read_json(response).await
    }

    async fn fetch_profile(&self, username: &str) -> Result<ProfileData, BackendError> {
        let username = require_username(username)?;
        let url = self.endpoint(&["profile", username])?;
        debug!(endpoint = %url, "fetching profile");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(BackendError::from_transport)?;
        let value: serde_json::Value = Self::read_json(response).await?;
        let raw = value.to_string();
        let profile = ProfileData::from_value(value)
            .ok_or_else(|| BackendError::malformed("profile payload is not a JSON object", &raw))?;
        debug!(fields = profile.iter().count(), "fetched profile");
        Ok(profile)
    }

    async fn update_profile(
        &self,
        username: &str,
        fields: &ProfileData,
    ) -> Result<UpdateProfileResponse, BackendError> {
        let username = require_username(username)?;
        let url = self.endpoint(&["profile", username])?;
        debug!(endpoint = %url, "updating profile");
        let response = self
            .http
            .put(url)
            .json(fields)
            .send()
            .await
            .map_err(BackendError::from_transport)?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
