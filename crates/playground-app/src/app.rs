//! Main egui application: composes the panels and owns the open session.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};

use playground_core::dispatcher::PromptInput;
use playground_core::event_bus::EventBus;
use playground_core::ports::SandboxHost;
use playground_core::sandbox::SharedHost;
use playground_core::{PlaygroundServices, PlaygroundSession};
use playground_platform::browser_services;
use playground_platform::config_store;
use playground_platform::sandbox_host::IframeHost;
use playground_types::config::PlaygroundConfig;
use playground_types::session::SessionSummary;
use playground_types::Result;
use playground_ui::panels::sessions::DashboardAction;
use playground_ui::panels::settings::{SaveFeedback, SettingsAction};
use playground_ui::panels::{chat, code, preview, sessions, settings};
use playground_ui::state::{Screen, UiState, ViewMode};
use playground_ui::theme;

/// Polling interval while a session is open, so timer-driven saves show up
const IDLE_REPAINT: Duration = Duration::from_millis(250);

/// Results of async work, picked up on the next frame
enum Completion {
    Sessions(Result<Vec<SessionSummary>>),
    Opened {
        session: PlaygroundSession,
        result: Result<()>,
    },
}

type Mailbox = Rc<RefCell<Vec<Completion>>>;

/// The main application state
pub struct PlaygroundApp {
    ui_state: UiState,
    config: PlaygroundConfig,
    event_bus: EventBus,
    canvas: web_sys::HtmlCanvasElement,
    host: Option<Rc<IframeHost>>,
    /// Outlives service rebuilds so generations never repeat
    shared_host: Option<SharedHost>,
    services: Option<PlaygroundServices>,
    /// Config the current services were built from
    services_config: PlaygroundConfig,
    session: Option<PlaygroundSession>,
    /// A create or open is in flight; further requests are ignored
    opening: bool,
    mailbox: Mailbox,
    save_feedback: Option<SaveFeedback>,
    first_frame: bool,
}

impl PlaygroundApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, canvas: web_sys::HtmlCanvasElement) -> Self {
        let config = config_store::load_config();

        let host = match IframeHost::new() {
            Ok(host) => Some(Rc::new(host)),
            Err(e) => {
                log::error!("Preview sandbox unavailable: {}", e);
                None
            }
        };

        let shared_host = host
            .clone()
            .map(|host| SharedHost::new(host as Rc<dyn SandboxHost>));

        let mut app = Self {
            ui_state: UiState::new(),
            services_config: config.clone(),
            config,
            event_bus: EventBus::new(),
            canvas,
            host,
            shared_host,
            services: None,
            session: None,
            opening: false,
            mailbox: Rc::new(RefCell::new(Vec::new())),
            save_feedback: None,
            first_frame: true,
        };
        app.rebuild_services();
        app
    }

    /// (Re)create the adapters from the current config.
    fn rebuild_services(&mut self) {
        self.services_config = self.config.clone();
        let Some(host) = self.shared_host.clone() else {
            self.services = None;
            self.ui_state.dashboard_error = Some("The preview sandbox could not be created".to_string());
            return;
        };
        match browser_services(&self.config, host) {
            Ok(services) => {
                self.services = Some(services);
                self.ui_state.dashboard_error = None;
            }
            Err(e) => {
                log::warn!("Playground services unavailable: {}", e);
                self.services = None;
                self.ui_state.dashboard_error = Some(e.to_string());
                self.ui_state.show_settings = true;
            }
        }
    }

    fn refresh_sessions(&mut self, ctx: &egui::Context) {
        let Some(services) = self.services.clone() else {
            return;
        };
        self.ui_state.sessions_loading = true;
        let mailbox = self.mailbox.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = services.storage.list_sessions().await;
            mailbox.borrow_mut().push(Completion::Sessions(result));
            ctx.request_repaint();
        });
    }

    /// Claim the single open slot. False while another open is in flight.
    fn begin_open(&mut self) -> bool {
        if self.opening {
            log::debug!("Ignoring open request while another session is opening");
            return false;
        }
        self.opening = true;
        true
    }

    fn create_session(&mut self, ctx: &egui::Context) {
        let Some(services) = self.services.clone() else {
            return;
        };
        if !self.begin_open() {
            return;
        }
        let session = PlaygroundSession::new(&services, &self.config, self.event_bus.clone());
        let mailbox = self.mailbox.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match services.storage.create_session().await {
                Ok(record) => {
                    log::info!("Created session {}", record.id);
                    session.open(record)
                }
                Err(e) => Err(e),
            };
            mailbox.borrow_mut().push(Completion::Opened { session, result });
            ctx.request_repaint();
        });
    }

    fn open_session(&mut self, id: String, ctx: &egui::Context) {
        let Some(services) = self.services.clone() else {
            return;
        };
        if !self.begin_open() {
            return;
        }
        let session = PlaygroundSession::new(&services, &self.config, self.event_bus.clone());
        let mailbox = self.mailbox.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = session.load(&id).await;
            mailbox.borrow_mut().push(Completion::Opened { session, result });
            ctx.request_repaint();
        });
    }

    fn close_session(&mut self, ctx: &egui::Context) {
        if let Some(session) = self.session.take() {
            session.close();
        }
        if let Some(host) = &self.host {
            host.set_visible(false);
        }
        // Drop the close events so they don't leak into the next session.
        let _ = self.event_bus.drain();
        self.ui_state.leave_session();
        self.refresh_sessions(ctx);
    }

    fn handle_completions(&mut self) {
        let completions: Vec<Completion> = self.mailbox.borrow_mut().drain(..).collect();
        for completion in completions {
            match completion {
                Completion::Sessions(Ok(list)) => {
                    self.ui_state.set_sessions(list);
                    self.ui_state.dashboard_error = None;
                }
                Completion::Sessions(Err(e)) => {
                    log::error!("Failed to list sessions: {}", e);
                    self.ui_state.sessions_loading = false;
                    self.ui_state.dashboard_error = Some(format!("Could not load sessions: {}", e));
                }
                Completion::Opened { session, result: Ok(()) } => {
                    self.opening = false;
                    if let Some(previous) = self.session.replace(session) {
                        previous.close();
                    }
                }
                Completion::Opened { session, result: Err(e) } => {
                    self.opening = false;
                    log::error!("Failed to open session: {}", e);
                    session.close();
                    self.ui_state.dashboard_error = Some(format!("Could not open session: {}", e));
                }
            }
        }
    }

    /// Pull session changes into the UI projection.
    fn sync_from_session(&mut self) {
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
        }
        let Some(session) = &self.session else {
            return;
        };
        if self.ui_state.take_transcript_stale() {
            self.ui_state.transcript = session.transcript();
        }
        if self.ui_state.take_source_stale() {
            self.ui_state.draft = session.source();
            self.ui_state.session_name = session.session_name().unwrap_or_default();
        }
        if let Some(host) = &self.host {
            for message in host.drain_messages() {
                session.handle_sandbox_message(&message);
            }
        }
    }

    fn accept_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if self.ui_state.screen != Screen::Editor {
            return;
        }
        for file in dropped {
            match &file.bytes {
                Some(bytes) => {
                    if self.ui_state.attach_dropped_file(&file.name, &file.mime, bytes) {
                        log::info!("Attached image {}", file.name);
                    }
                }
                None => log::warn!("Dropped file {} has no readable contents", file.name),
            }
        }
    }

    fn submit_prompt(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let (text, image) = self.ui_state.take_input();
        let mut input = PromptInput::text(text);
        if let Some(image) = image {
            input = input.with_image(image.data_url);
        }
        if !session.submit(input) {
            log::warn!("Prompt rejected while another is in flight");
        }
    }

    /// Lay the sandbox frame over `rect`, or hide it.
    fn place_sandbox(&self, ctx: &egui::Context, rect: Option<egui::Rect>) {
        let Some(host) = &self.host else {
            return;
        };
        match rect {
            Some(rect) => {
                let zoom = ctx.zoom_factor();
                let origin = self.canvas.get_bounding_client_rect();
                host.set_bounds(
                    origin.left() as f32 + rect.left() * zoom,
                    origin.top() as f32 + rect.top() * zoom,
                    rect.width() * zoom,
                    rect.height() * zoom,
                );
                host.set_visible(true);
            }
            None => host.set_visible(false),
        }
    }

    fn save_settings(&mut self, ctx: &egui::Context) {
        // A rebuilt memory store starts empty, so only rebuild on real changes.
        let adapters_changed = self.services.is_none()
            || self.config.generator != self.services_config.generator
            || self.config.storage != self.services_config.storage;
        if adapters_changed {
            self.rebuild_services();
            if self.ui_state.screen == Screen::Dashboard {
                self.refresh_sessions(ctx);
            }
        }
        self.save_feedback = Some(match config_store::save_config(&self.config) {
            Ok(()) if self.session.is_some() => SaveFeedback {
                message: "Saved. Applies to the next session opened.".to_string(),
                success: true,
            },
            Ok(()) => SaveFeedback {
                message: "Saved".to_string(),
                success: true,
            },
            Err(e) => {
                log::error!("Failed to save config: {}", e);
                SaveFeedback {
                    message: format!("Save failed: {}", e),
                    success: false,
                }
            }
        });
    }
}

impl eframe::App for PlaygroundApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.refresh_sessions(ctx);
            self.first_frame = false;
        }

        self.handle_completions();
        self.sync_from_session();
        self.accept_dropped_files(ctx);

        if self.ui_state.is_busy() {
            ctx.request_repaint();
        } else if self.session.is_some() {
            ctx.request_repaint_after(IDLE_REPAINT);
        }

        // ── Top bar ──────────────────────────────────────────
        let mut back_clicked = false;
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Component Playground")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                if self.ui_state.screen == Screen::Editor {
                    if ui.button("< Sessions").clicked() {
                        back_clicked = true;
                    }
                    ui.label(RichText::new(&self.ui_state.session_name).color(theme::TEXT_PRIMARY));
                    ui.separator();
                    ui.label(
                        RichText::new(&self.ui_state.status_text)
                            .color(theme::TEXT_SECONDARY)
                            .small(),
                    );
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                    ui.label(
                        RichText::new(self.config.generator.backend.label())
                            .color(theme::TEXT_SECONDARY)
                            .small(),
                    );
                });
            });
        });
        if back_clicked {
            self.close_session(ctx);
        }

        // ── Settings sidebar ─────────────────────────────────
        if self.ui_state.show_settings {
            SidePanel::right("settings_panel")
                .default_width(300.0)
                .resizable(true)
                .show(ctx, |ui| {
                    match settings::settings_panel(ui, &mut self.config, self.save_feedback.as_ref()) {
                        SettingsAction::SaveClicked => self.save_settings(ctx),
                        SettingsAction::Changed => self.save_feedback = None,
                        SettingsAction::None => {}
                    }
                });
        }

        // ── Main content ─────────────────────────────────────
        let mut sandbox_rect = None;
        match self.ui_state.screen {
            Screen::Dashboard => {
                let mut action = DashboardAction::None;
                CentralPanel::default().show(ctx, |ui| {
                    action = sessions::dashboard_panel(ui, &self.ui_state);
                });
                match action {
                    DashboardAction::None => {}
                    DashboardAction::Refresh => self.refresh_sessions(ctx),
                    DashboardAction::Create => self.create_session(ctx),
                    DashboardAction::Open(id) => self.open_session(id, ctx),
                }
            }
            Screen::Editor => {
                let mut send = false;
                SidePanel::left("chat_panel")
                    .default_width(380.0)
                    .resizable(true)
                    .show(ctx, |ui| {
                        send = chat::chat_panel(ui, &mut self.ui_state);
                    });
                if send {
                    self.submit_prompt();
                }

                let mut edited = false;
                let preview_state = self
                    .session
                    .as_ref()
                    .map(|s| s.preview_state())
                    .unwrap_or_default();
                CentralPanel::default().show(ctx, |ui| {
                    code::view_toggle(ui, &mut self.ui_state);
                    ui.separator();
                    match self.ui_state.view_mode {
                        ViewMode::Code => edited = code::code_panel(ui, &mut self.ui_state),
                        ViewMode::Preview => {
                            sandbox_rect = preview::preview_panel(ui, &preview_state);
                        }
                    }
                });
                if edited {
                    if let Some(session) = &self.session {
                        let draft = &self.ui_state.draft;
                        session.edit_source(draft.markup.clone(), draft.style.clone());
                    }
                }
            }
        }

        self.place_sandbox(ctx, sandbox_rect);
    }
}
