use std::time::Duration;

use client_core::AppEvent;
use eframe::egui;
use shared::domain::View;

use super::{
    forms::{LoginForm, ProfileForm, RegisterForm},
    views::{self, DisplayPreferences},
};
use crate::controller::orchestration::GuiController;

pub struct DesktopGuiApp {
    controller: GuiController,

    login_form: LoginForm,
    register_form: RegisterForm,
    profile_form: ProfileForm,
    preferences: DisplayPreferences,

    applied_title: Option<String>,
    applied_dark_mode: Option<bool>,
}

impl DesktopGuiApp {
    pub fn new(controller: GuiController) -> Self {
        Self {
            controller,
            login_form: LoginForm::default(),
            register_form: RegisterForm::default(),
            profile_form: ProfileForm::default(),
            preferences: DisplayPreferences::default(),
            applied_title: None,
            applied_dark_mode: None,
        }
    }

    fn apply_window_state(&mut self, ctx: &egui::Context) {
        let title = self.controller.state().window_title();
        if self.applied_title.as_deref() != Some(title.as_str()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.applied_title = Some(title);
        }

        if self.applied_dark_mode != Some(self.preferences.dark_mode) {
            ctx.set_visuals(if self.preferences.dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            self.applied_dark_mode = Some(self.preferences.dark_mode);
        }
    }

    fn show_current_view(&mut self, ctx: &egui::Context) -> Option<AppEvent> {
        let state = self.controller.state();
        self.login_form.sync(state.login_form_generation());
        self.profile_form.sync(state.profile());

        let mut event = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            event = match state.view() {
                View::Login => views::login_view(ui, state, &mut self.login_form),
                View::Register => views::register_view(ui, state, &mut self.register_form),
                View::Dashboard => views::dashboard_view(ui, state),
                View::Profile => views::profile_view(ui, state, &mut self.profile_form),
                View::Settings => views::settings_view(ui, state, &mut self.preferences),
            };
        });

        if let Some(notice) = state.notice() {
            // The notice's own button wins over whatever the view produced.
            if let Some(dismissed) = views::notice_window(ctx, notice) {
                event = Some(dismissed);
            }
        }
        event
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.drain_backend_events();
        self.apply_window_state(ctx);

        if let Some(event) = self.show_current_view(ctx) {
            tracing::debug!(event = event.name(), "ui event");
            self.controller.handle(event);
            ctx.request_repaint();
        }

        if self.controller.state().is_busy() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
