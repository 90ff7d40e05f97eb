use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, AppEvent, AppState, BackendApi, HttpBackend, NoticeSeverity, SessionDriver,
};
use shared::domain::View;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mindzap", about = "Headless MindZap session client")]
struct Args {
    /// Backend base URL; overrides mindzap.toml and MINDZAP_BACKEND_URL.
    #[arg(long, global = true)]
    backend_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print the resulting session.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Open the profile view after logging in.
        #[arg(long)]
        show_profile: bool,
    },
    /// Fetch and print a profile without logging in.
    Profile {
        #[arg(long)]
        username: String,
    },
}

fn print_notice(state: &AppState) {
    if let Some(notice) = state.notice() {
        let level = match notice.severity {
            NoticeSeverity::Info => "info",
            NoticeSeverity::Warning => "warning",
            NoticeSeverity::Error => "error",
        };
        match notice.cause {
            Some(kind) => println!(
                "[{level}] {} ({}): {}",
                notice.title,
                kind.label(),
                notice.message
            ),
            None => println!("[{level}] {}: {}", notice.title, notice.message),
        }
    }
}

fn print_profile(state: &AppState) -> Result<()> {
    if let Some(profile) = state.profile() {
        println!("{}", serde_json::to_string_pretty(profile)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(raw) = args.backend_url.as_deref() {
        settings.override_backend_url(raw)?;
    }
    let backend = HttpBackend::from_settings(&settings);
    tracing::debug!(backend_url = %backend.base_url(), "using backend");

    match args.command {
        Command::Login {
            username,
            password,
            show_profile,
        } => {
            let mut driver = SessionDriver::new(backend);
            let state = driver
                .send(AppEvent::LoginSubmitted { username, password })
                .await;
            print_notice(state);
            if state.view() != View::Dashboard {
                bail!("login did not complete");
            }
            println!("{}", state.window_title());

            if show_profile {
                let state = driver.send(AppEvent::ProfileIconClicked).await;
                if state.view() != View::Profile {
                    print_notice(state);
                    bail!("profile could not be loaded");
                }
                print_profile(state)?;
            }
        }
        Command::Profile { username } => match backend.fetch_profile(&username).await {
            Ok(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
            Err(err) => bail!("profile fetch failed ({}): {err}", err.kind().label()),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Args, Command};

    #[test]
    fn parses_login_with_global_backend_url() {
        let args = Args::try_parse_from([
            "mindzap",
            "login",
            "--username",
            "alice@mindzap.io",
            "--password",
            "pw",
            "--show-profile",
            "--backend-url",
            "http://127.0.0.1:5001",
        ])
        .expect("parse");
        assert_eq!(args.backend_url.as_deref(), Some("http://127.0.0.1:5001"));
        assert!(matches!(
            args.command,
            Command::Login { ref username, show_profile: true, .. } if username == "alice@mindzap.io"
        ));
    }

    #[test]
    fn login_requires_password() {
        assert!(Args::try_parse_from(["mindzap", "login", "--username", "a@b.io"]).is_err());
    }
}
