use std::time::{Duration, Instant};

use arboard::Clipboard;
use client_core::{
    ClipboardWriter, PreviewView, ResultPresenter, Settlement, SubmissionController, SubmitError,
    ViewState, ViewStateReader,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{domain::FormField, protocol::ProjectSummary};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const PENDING_REPAINT_INTERVAL: Duration = Duration::from_millis(100);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(185, 28, 28);
const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(21, 128, 61);

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub base_url: String,
}

struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

pub struct RagmailApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: SubmissionController,
    view: ViewStateReader,
    presenter: ResultPresenter,
    projects: Vec<ProjectSummary>,
    service_status: String,
    status: String,
    validation_hint: Option<String>,
}

impl RagmailApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        controller: SubmissionController,
        startup: StartupConfig,
    ) -> Self {
        let view = controller.view_state();
        let mut app = Self {
            cmd_tx,
            ui_rx,
            controller,
            view,
            presenter: ResultPresenter::new(),
            projects: Vec::new(),
            service_status: format!("Connecting to {}", startup.base_url),
            status: String::new(),
            validation_hint: None,
        };
        app.dispatch(BackendCommand::CheckHealth);
        app.dispatch(BackendCommand::ListProjects);
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Settled { token, settlement } => {
                    tracing::debug!(request_token = token, ?settlement, "submission settled");
                    if settlement == Settlement::Succeeded {
                        self.status = "Email generated".to_string();
                    }
                }
                UiEvent::HealthChecked(health) => {
                    self.service_status = if health.is_ready() {
                        "Service ready".to_string()
                    } else {
                        format!(
                            "Service {} (generator ready: {}, vector db loaded: {})",
                            health.status, health.email_generator_ready, health.vector_db_loaded
                        )
                    };
                }
                UiEvent::ProjectsLoaded(projects) => {
                    self.projects = projects;
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    match err.context() {
                        UiErrorContext::HealthCheck | UiErrorContext::BackendStartup => {
                            self.service_status = err.status_line();
                        }
                        _ => self.status = err.status_line(),
                    }
                }
            }
        }
    }

    fn submit(&mut self) {
        match self.controller.submit() {
            Ok(pending) => {
                self.validation_hint = None;
                self.status.clear();
                self.dispatch(BackendCommand::Submit(pending));
            }
            Err(SubmitError::MissingRequired(missing)) => {
                self.validation_hint = Some(format!(
                    "Please fill in: {}",
                    missing
                        .fields
                        .iter()
                        .filter_map(|key| FormField::ALL.into_iter().find(|f| f.key() == *key))
                        .map(FormField::label)
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
        }
    }

    fn reset(&mut self) {
        self.controller.reset();
        self.validation_hint = None;
    }

    fn copy_email(&mut self, state: &ViewState) {
        if let Err(err) = self
            .presenter
            .copy(state, &mut SystemClipboard, Instant::now())
        {
            self.status =
                UiError::from_message(UiErrorContext::Clipboard, err.to_string()).status_line();
        }
    }

    fn download_email(&mut self, state: &ViewState) {
        let Some(export) = self.presenter.download_now(state) else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&export.file_name)
            .add_filter("Text", &["txt"])
            .save_file()
        else {
            return;
        };
        match export.save_as(&path) {
            Ok(()) => self.status = format!("Saved email to {}", path.display()),
            Err(err) => {
                self.status =
                    UiError::from_message(UiErrorContext::Export, format!("{err:#}"))
                        .status_line();
            }
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui, state: &ViewState) {
        ui.heading("Professor Details");
        ui.add_space(8.0);

        for field in FormField::ALL {
            let label = if field.is_required() {
                format!("{} *", field.label())
            } else {
                format!("{} (Optional)", field.label())
            };
            ui.label(label);
            let value = self.controller.field_mut(field);
            let edit = match field {
                FormField::PaperSummary => egui::TextEdit::multiline(value).desired_rows(3),
                _ => egui::TextEdit::singleline(value),
            };
            ui.add(edit.hint_text(placeholder(field)).desired_width(f32::INFINITY));

            if field == FormField::ForceProject {
                ui.small("Leave blank to let AI choose the best project");
                if !self.projects.is_empty() {
                    let mut picked = None;
                    ui.horizontal_wrapped(|ui| {
                        for project in &self.projects {
                            if ui
                                .small_button(&project.title)
                                .on_hover_text(&project.description)
                                .clicked()
                            {
                                picked = Some(project.title.clone());
                            }
                        }
                    });
                    if let Some(title) = picked {
                        self.controller.update_field(FormField::ForceProject, title);
                    }
                }
            }
            ui.add_space(6.0);
        }

        if let Some(hint) = &self.validation_hint {
            ui.colored_label(ERROR_COLOR, hint);
        }
        if let Some(error) = &state.error {
            ui.colored_label(ERROR_COLOR, error);
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let label = if state.is_pending {
                "Generating..."
            } else {
                "🚀 Generate Email"
            };
            if ui
                .add_enabled(!state.is_pending, egui::Button::new(label))
                .clicked()
            {
                self.submit();
            }
            if state.is_pending {
                ui.add(egui::Spinner::new());
            }
            if ui.button("Clear").clicked() {
                self.reset();
            }
        });
    }

    fn show_preview(&mut self, ui: &mut egui::Ui, state: &ViewState) {
        match self.presenter.view(state) {
            PreviewView::Pending => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.add(egui::Spinner::new().size(48.0));
                    ui.label(client_core::presenter::PENDING_HEADLINE);
                    ui.small(client_core::presenter::PENDING_HINT);
                });
            }
            PreviewView::Idle => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading(format!("📧 {}", client_core::presenter::IDLE_HEADLINE));
                    ui.label(client_core::presenter::IDLE_HINT);
                });
            }
            PreviewView::Populated(result) => {
                let now = Instant::now();
                let mut copy_clicked = false;
                let mut download_clicked = false;
                ui.horizontal(|ui| {
                    ui.heading("Generated Email");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        download_clicked = ui.button("💾 Download").clicked();
                        let copy_label = if self.presenter.is_copied(now) {
                            "✓ Copied!"
                        } else {
                            "📋 Copy"
                        };
                        copy_clicked = ui.button(copy_label).clicked();
                    });
                });
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("📊 Selected Project:");
                    ui.strong(&result.selected_project);
                    ui.separator();
                    ui.label("📈 Relevance:");
                    ui.strong(format!("{}/10", result.relevance_score));
                });
                ui.separator();

                let mut body: &str = &result.email;
                egui::ScrollArea::vertical()
                    .max_height(scroll_height(ui.available_height()))
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut body)
                                .font(egui::TextStyle::Monospace)
                                .desired_width(f32::INFINITY),
                        );
                    });

                if let Some(message) = result.status_message() {
                    ui.colored_label(SUCCESS_COLOR, format!("✓ {message}"));
                }

                if copy_clicked {
                    self.copy_email(state);
                }
                if download_clicked {
                    self.download_email(state);
                }
            }
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, state: &ViewState) {
        let mut next = state.is_pending.then_some(PENDING_REPAINT_INTERVAL);
        if let Some(left) = self.presenter.copied_remaining(Instant::now()) {
            next = Some(next.map_or(left, |current| current.min(left)));
        }
        if let Some(after) = next {
            ctx.request_repaint_after(after);
        }
    }
}

/// Height left for the email body once the status annotation row is reserved.
fn scroll_height(available: f32) -> f32 {
    (available - 40.0).max(0.0)
}

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::ProfessorName => "Dr. Michael Chen",
        FormField::UniversityName => "MIT",
        FormField::ResearchDomain => "multi-agent systems, natural language processing",
        FormField::PaperTitle => "Coordinated Multi-Agent Planning for Complex Tasks",
        FormField::PaperSummary => "Brief summary of the paper's main contributions...",
        FormField::ForceProject => "HireFlow",
    }
}

impl eframe::App for RagmailApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        let state = self.view.snapshot_and_mark_seen();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🎓 RAGmail");
                ui.label("AI-Powered Professor Outreach Email Generator");
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.service_status);
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        egui::SidePanel::left("form_panel")
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.show_form(ui, &state));
            });

        egui::CentralPanel::default().show(ctx, |ui| self.show_preview(ui, &state));

        self.schedule_repaint(ctx, &state);
    }
}
