use eframe::egui;
use std::sync::mpsc;
use std::time::Duration;

use crate::engine::engine::Engine;
use crate::engine::exporter;
use crate::engine::llm_client::{BackendError, HttpBackend};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::turn::TurnPhase;
use crate::model::council::DebateTranscript;
use crate::model::generation_config::{GenerationConfig, MODEL_PRESETS};
use crate::model::session_state::SessionState;
use crate::model::story_node::{NodeId, TimelineNode};
use crate::ui::center_panel::draw_center_panel;
use crate::ui::left_panel::draw_left_panel;
use crate::ui::right_panel::draw_right_panel;
use crate::ui::settings::AppSettings;
use crate::ui::settings_io;

/* =========================
   Tabs
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeftTab {
    #[default]
    Setup,
    Settings,
}

/* =========================
   UI State
   ========================= */

pub struct UiState {
    pub left_tab: LeftTab,

    pub form: GenerationConfig,
    pub settings: AppSettings,
    pub export_dir_text: String,
    pub models: Vec<(String, String)>,

    /// Last snapshot received from the engine
    pub session: SessionState,
    pub story_text: String,
    pub timeline: Vec<TimelineNode>,

    pub council: Option<DebateTranscript>,
    pub council_unreachable: bool,

    /// Set while a turn is running; every story action is disabled meanwhile
    pub in_flight: Option<TurnPhase>,
    pub error: Option<String>,
    pub status: Option<String>,
    pub should_auto_scroll: bool,
    /// A models/health query has been sent and not yet answered
    pub awaiting_query: bool,
    /// A node was picked in the timeline and its snapshot has not arrived yet
    pub pending_selection: bool,
}

impl UiState {
    fn new(settings: AppSettings) -> Self {
        let form = GenerationConfig {
            model: settings.default_model.clone(),
            ..Default::default()
        };

        Self {
            left_tab: LeftTab::default(),
            form,
            export_dir_text: settings.export_dir.display().to_string(),
            settings,
            models: MODEL_PRESETS
                .iter()
                .map(|(id, label)| (id.to_string(), label.to_string()))
                .collect(),
            session: SessionState::default(),
            story_text: String::new(),
            timeline: Vec::new(),
            council: None,
            council_unreachable: false,
            in_flight: None,
            error: None,
            status: None,
            should_auto_scroll: false,
            awaiting_query: false,
            pending_selection: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || self.pending_selection
    }

    /// Reset per-turn feedback before a new act is requested.
    fn begin_turn(&mut self) {
        self.error = None;
        self.council = None;
        self.council_unreachable = false;
        self.in_flight = Some(TurnPhase::Generation);
    }

    /// Whether `id` should be requested; story actions stay disabled until
    /// the engine answers.
    fn begin_selection(&mut self, id: NodeId) -> bool {
        if self.is_busy() || self.session.active_leaf == Some(id) {
            return false;
        }
        self.pending_selection = true;
        true
    }

    fn handle_response(&mut self, resp: EngineResponse) {
        match resp {
            EngineResponse::PhaseChanged(phase) => {
                self.in_flight = Some(phase);
            }
            EngineResponse::CouncilConvened(transcript) => {
                self.council_unreachable = transcript.is_none();
                self.council = transcript;
            }
            EngineResponse::SessionUpdated(session) => {
                self.in_flight = None;
                self.pending_selection = false;
                self.story_text = session.story_text();
                self.timeline = session.timeline();
                self.session = session;
                self.should_auto_scroll = true;
            }
            EngineResponse::TurnFailed(message) => {
                self.in_flight = None;
                self.pending_selection = false;
                self.error = Some(message);
            }
            EngineResponse::ModelsListed(Ok(models)) => {
                self.awaiting_query = false;
                self.status = Some(format!("{} models available", models.len()));
                if !models.is_empty() {
                    self.models = models.into_iter().map(|m| (m.clone(), m)).collect();
                }
            }
            EngineResponse::ModelsListed(Err(e)) => {
                self.awaiting_query = false;
                self.status = Some(format!("Could not list models: {e}"));
            }
            EngineResponse::HealthChecked(result) => {
                self.awaiting_query = false;
                self.status = Some(result.unwrap_or_else(|e| format!("Backend unreachable: {e}")));
            }
        }
    }

    /// Title shown above the story and used for exports.
    pub fn story_title(&self) -> String {
        self.session
            .config
            .as_ref()
            .map(|c| c.act_name.clone())
            .unwrap_or_else(|| "Narrative Stream".to_string())
    }
}

/* =========================
   App
   ========================= */

pub struct StoryApp {
    pub ui: UiState,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl StoryApp {
    pub fn new(settings: AppSettings) -> Result<Self, BackendError> {
        let backend = HttpBackend::new(settings.api_base_url.clone(), settings.request_timeout())?;
        log::info!("Using narrative backend at {}", backend.base_url());

        let (cmd_tx, resp_rx) = Engine::spawn(backend);

        Ok(Self {
            ui: UiState::new(settings),
            cmd_tx,
            resp_rx,
        })
    }

    pub fn send_command(&mut self, cmd: EngineCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            log::error!("Engine thread is gone; command dropped");
            self.ui.in_flight = None;
            self.ui.pending_selection = false;
            self.ui.error = Some("The story engine stopped unexpectedly.".into());
        }
    }

    pub fn start_story(&mut self) {
        if self.ui.is_busy() {
            return;
        }
        self.ui.begin_turn();

        let config = self.ui.form.clone();
        let council = self.ui.settings.council_enabled;
        self.send_command(EngineCommand::StartStory { config, council });
    }

    pub fn choose_branch(&mut self, choice: String) {
        if self.ui.is_busy() || !self.ui.session.has_started() {
            return;
        }
        self.ui.begin_turn();

        let council = self.ui.settings.council_enabled;
        self.send_command(EngineCommand::ChooseBranch { choice, council });
    }

    pub fn select_node(&mut self, id: NodeId) {
        if !self.ui.begin_selection(id) {
            return;
        }
        self.send_command(EngineCommand::SelectNode(id));
    }

    pub fn refresh_models(&mut self) {
        self.ui.awaiting_query = true;
        self.send_command(EngineCommand::RefreshModels);
    }

    pub fn check_health(&mut self) {
        self.ui.awaiting_query = true;
        self.send_command(EngineCommand::CheckHealth);
    }

    pub fn save_settings(&mut self) {
        self.ui.settings.export_dir = self.ui.export_dir_text.trim().into();
        self.ui.status = Some(match settings_io::save_settings(&self.ui.settings) {
            Ok(()) => "Settings saved. Backend changes apply on next launch.".into(),
            Err(e) => format!("Could not save settings: {e:#}"),
        });
    }

    pub fn export_with_dialog(&mut self) {
        let title = self.ui.story_title();
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(exporter::markdown_file_name(&title))
            .add_filter("Markdown", &["md"])
            .save_file()
        else {
            return;
        };

        self.ui.status = Some(match exporter::write_markdown(&path, &title, &self.ui.story_text) {
            Ok(()) => format!("Exported to {}", path.display()),
            Err(e) => format!("Export failed: {e:#}"),
        });
    }

    pub fn quick_export(&mut self) {
        let title = self.ui.story_title();
        let dir = self.ui.settings.export_dir.clone();

        self.ui.status = Some(match exporter::export_to_dir(&dir, &title, &self.ui.story_text) {
            Ok(path) => format!("Exported to {}", path.display()),
            Err(e) => format!("Export failed: {e:#}"),
        });
    }

    fn poll_engine(&mut self) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            self.ui.handle_response(resp);
        }
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for StoryApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.ui.settings.ui_scale);

        self.poll_engine();

        draw_left_panel(ctx, self);
        draw_right_panel(ctx, self);
        draw_center_panel(ctx, self);

        self.ui.should_auto_scroll = false;

        if self.ui.is_busy() || self.ui.awaiting_query {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
