use std::{fs, path::Path};

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::warn;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const SETTINGS_FILE: &str = "mindzap.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: Url,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend url is valid"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
}

/// Compiled-in defaults, overlaid by `mindzap.toml` in the working directory,
/// then by `MINDZAP_BACKEND_URL` / `APP__BACKEND_URL`.
pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    resolve_settings(file.as_deref(), |name| std::env::var(name).ok())
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let file_cfg: FileSettings = toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
    let mut settings = Settings::default();
    if let Some(raw_url) = file_cfg.backend_url {
        settings.backend_url = parse_backend_url(&raw_url)
            .with_context(|| format!("invalid backend_url in '{}'", path.display()))?;
    }
    Ok(settings)
}

fn resolve_settings(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.backend_url {
                    apply_backend_url(&mut settings, &v, SETTINGS_FILE);
                }
            }
            Err(err) => warn!("ignoring unreadable {SETTINGS_FILE}: {err}"),
        }
    }

    if let Some(v) = env("MINDZAP_BACKEND_URL") {
        apply_backend_url(&mut settings, &v, "MINDZAP_BACKEND_URL");
    }
    if let Some(v) = env("APP__BACKEND_URL") {
        apply_backend_url(&mut settings, &v, "APP__BACKEND_URL");
    }

    settings
}

fn apply_backend_url(settings: &mut Settings, raw: &str, source: &str) {
    match parse_backend_url(raw) {
        Ok(url) => settings.backend_url = url,
        Err(err) => warn!(source = %source, "ignoring backend url override: {err:#}"),
    }
}

impl Settings {
    /// Applies an explicit `--backend-url` flag. Unlike file and env
    /// overrides, a bad flag is an error.
    pub fn override_backend_url(&mut self, raw: &str) -> anyhow::Result<()> {
        self.backend_url = parse_backend_url(raw)?;
        Ok(())
    }
}

pub fn parse_backend_url(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("backend url is empty");
    }

    let url = Url::parse(raw).with_context(|| format!("'{raw}' is not a valid url"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("backend url '{raw}' must use http or https");
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        bail!("backend url '{raw}' has no host");
    }
    Ok(url)
}
