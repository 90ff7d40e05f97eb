//! One render function per view. Each reads the shared [`AppState`] and
//! returns the event its widgets produced this frame, if any.

use client_core::{AppEvent, AppState, Notice, NoticeSeverity};
use eframe::egui;
use shared::domain::View;

use super::forms::{LoginForm, ProfileField, ProfileForm, RegisterForm};

const FORM_WIDTH: f32 = 360.0;

fn submit_pressed(ui: &egui::Ui, response: &egui::Response) -> bool {
    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

fn busy_row(ui: &mut egui::Ui, state: &AppState) {
    if state.is_busy() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.weak("Contacting backend...");
        });
    }
}

pub fn login_view(ui: &mut egui::Ui, state: &AppState, form: &mut LoginForm) -> Option<AppEvent> {
    let mut event = None;
    ui.vertical_centered(|ui| {
        ui.set_max_width(FORM_WIDTH);
        ui.add_space(48.0);
        ui.heading("MindZap");
        ui.weak("Sign in to continue.");
        ui.add_space(16.0);

        ui.add(
            egui::TextEdit::singleline(&mut form.username)
                .hint_text("Email")
                .desired_width(f32::INFINITY),
        );
        let password = ui.add(
            egui::TextEdit::singleline(&mut form.password)
                .hint_text("Password")
                .password(true)
                .desired_width(f32::INFINITY),
        );

        ui.add_space(8.0);
        let sign_in = ui.add_enabled(!state.is_busy(), egui::Button::new("Sign in"));
        if sign_in.clicked() || (!state.is_busy() && submit_pressed(ui, &password)) {
            event = Some(form.submit());
        }
        busy_row(ui, state);

        ui.add_space(12.0);
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("No account yet?");
            if ui.link("Create one").clicked() {
                event = Some(AppEvent::SwitchToRegister);
            }
        });
    });
    event
}

pub fn register_view(
    ui: &mut egui::Ui,
    state: &AppState,
    form: &mut RegisterForm,
) -> Option<AppEvent> {
    let mut event = None;
    ui.vertical_centered(|ui| {
        ui.set_max_width(FORM_WIDTH);
        ui.add_space(48.0);
        ui.heading("Create your account");
        ui.add_space(16.0);

        ui.add(
            egui::TextEdit::singleline(&mut form.username)
                .hint_text("Email")
                .desired_width(f32::INFINITY),
        );
        ui.add(
            egui::TextEdit::singleline(&mut form.password)
                .hint_text("Password")
                .password(true)
                .desired_width(f32::INFINITY),
        );
        let confirm = ui.add(
            egui::TextEdit::singleline(&mut form.confirm_password)
                .hint_text("Confirm password")
                .password(true)
                .desired_width(f32::INFINITY),
        );

        ui.add_space(8.0);
        let register = ui.add_enabled(!state.is_busy(), egui::Button::new("Register"));
        if register.clicked() || (!state.is_busy() && submit_pressed(ui, &confirm)) {
            event = Some(form.submit());
        }
        busy_row(ui, state);

        ui.add_space(12.0);
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Already registered?");
            if ui.link("Back to sign in").clicked() {
                event = Some(AppEvent::SwitchToLogin);
            }
        });
    });
    event
}

/// Navigation row shared by the signed-in views.
fn signed_in_header(ui: &mut egui::Ui, state: &AppState) -> Option<AppEvent> {
    let mut event = None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(state.view() != View::Dashboard, egui::Button::new("Home"))
            .clicked()
        {
            event = Some(AppEvent::HomeRequested);
        }

        let mut settings_checked = state.view() == View::Settings;
        if ui.toggle_value(&mut settings_checked, "Settings").changed() {
            event = Some(AppEvent::SettingsToggled(settings_checked));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let identity = state.dashboard_display().unwrap_or_default();
            if ui
                .add_enabled(!state.is_busy(), egui::Button::new(format!("👤 {identity}")))
                .on_hover_text("Open profile")
                .clicked()
            {
                event = Some(AppEvent::ProfileIconClicked);
            }
            if state.is_busy() {
                ui.spinner();
            }
        });
    });
    ui.separator();
    event
}

pub fn dashboard_view(ui: &mut egui::Ui, state: &AppState) -> Option<AppEvent> {
    let event = signed_in_header(ui, state);
    ui.add_space(24.0);
    ui.heading(format!(
        "Welcome, {}",
        state.dashboard_display().unwrap_or_default()
    ));
    ui.label("Open your profile from the top-right corner, or adjust settings.");
    event
}

pub fn profile_view(
    ui: &mut egui::Ui,
    state: &AppState,
    form: &mut ProfileForm,
) -> Option<AppEvent> {
    let mut event = signed_in_header(ui, state);
    ui.heading("Profile");
    ui.add_space(8.0);

    if form.fields.is_empty() {
        ui.weak("The backend returned no profile fields.");
    } else {
        egui::Grid::new("profile_fields")
            .num_columns(2)
            .striped(true)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for field in &mut form.fields {
                    match field {
                        ProfileField::Text { key, value } => {
                            ui.label(key.as_str());
                            ui.text_edit_singleline(value);
                        }
                        ProfileField::ReadOnly { key, rendered } => {
                            ui.label(key.as_str());
                            ui.weak(rendered.as_str());
                        }
                    }
                    ui.end_row();
                }
            });
    }

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        let can_save = form.is_dirty() && !state.is_busy();
        if ui.add_enabled(can_save, egui::Button::new("Save changes")).clicked() {
            event = Some(AppEvent::ProfileSaveRequested {
                fields: form.edited_fields(),
            });
        }
        if ui.button("Log out").clicked() {
            event = Some(AppEvent::LogoutRequested);
        }
    });
    event
}

/// Local display preferences edited on the settings view.
#[derive(Debug, Clone, Copy)]
pub struct DisplayPreferences {
    pub dark_mode: bool,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

pub fn settings_view(
    ui: &mut egui::Ui,
    state: &AppState,
    preferences: &mut DisplayPreferences,
) -> Option<AppEvent> {
    let mut event = signed_in_header(ui, state);
    ui.heading("Settings");
    ui.add_space(8.0);
    ui.checkbox(&mut preferences.dark_mode, "Dark mode");
    ui.add_space(12.0);
    if ui.button("Log out").clicked() {
        event = Some(AppEvent::LogoutRequested);
    }
    event
}

/// Modal-style window for the pending notice.
pub fn notice_window(ctx: &egui::Context, notice: &Notice) -> Option<AppEvent> {
    let mut event = None;
    let color = match notice.severity {
        NoticeSeverity::Info => egui::Color32::from_rgb(88, 166, 255),
        NoticeSeverity::Warning => egui::Color32::from_rgb(240, 180, 60),
        NoticeSeverity::Error => egui::Color32::from_rgb(235, 87, 87),
    };
    egui::Window::new(notice.title.as_str())
        .id(egui::Id::new("notice_window"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.set_max_width(FORM_WIDTH);
            ui.colored_label(color, notice.message.as_str());
            ui.add_space(8.0);
            if ui.button("OK").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                event = Some(AppEvent::NoticeDismissed);
            }
        });
    event
}
