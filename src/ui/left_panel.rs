use eframe::egui;

use crate::engine::turn::TurnPhase;
use crate::model::narrative_stats::{NarrativeStats, ALIGNMENT_MAX, ALIGNMENT_MIN};
use crate::ui::app::{LeftTab, StoryApp, UiState};
use crate::ui::settings::{UI_SCALE_MAX, UI_SCALE_MIN};

pub fn draw_left_panel(ctx: &egui::Context, app: &mut StoryApp) {
    egui::SidePanel::left("left")
        .resizable(true)
        .default_width(320.0)
        .min_width(260.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut app.ui.left_tab, LeftTab::Setup, "Simulation");
                ui.selectable_value(&mut app.ui.left_tab, LeftTab::Settings, "Settings");
            });

            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| match app.ui.left_tab {
                LeftTab::Setup => draw_setup(ui, app),
                LeftTab::Settings => draw_settings(ui, app),
            });
        });
}

/* =========================
   Simulation config
   ========================= */

fn draw_setup(ui: &mut egui::Ui, app: &mut StoryApp) {
    let busy = app.ui.is_busy();
    let mut begin = false;

    {
        let UiState { form, models, .. } = &mut app.ui;

        ui.heading("Simulation Config");

        ui.label("API Key");
        ui.add(
            egui::TextEdit::singleline(&mut form.api_key)
                .password(true)
                .hint_text("sk-or-v1-... (empty uses the backend's key)"),
        );

        ui.label("Model");
        let selected = models
            .iter()
            .find(|(id, _)| *id == form.model)
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| form.model.clone());
        egui::ComboBox::from_id_salt("model_select")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                for (id, label) in models.iter() {
                    ui.selectable_value(&mut form.model, id.clone(), label.as_str());
                }
            });

        ui.label("Act Name");
        ui.text_edit_singleline(&mut form.act_name);

        ui.label("World Description");
        ui.text_edit_multiline(&mut form.world_description);
    }

    ui.checkbox(&mut app.ui.settings.council_enabled, "Convene the council before each act");

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        let label = if app.ui.session.has_started() {
            "Restart Generation"
        } else {
            "Initiate Generation"
        };
        if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
            begin = true;
        }
        if let Some(phase) = app.ui.in_flight {
            ui.spinner();
            ui.label(match phase {
                TurnPhase::Council => "Council in session…",
                TurnPhase::Generation => "Writing…",
            });
        }
    });

    if let Some(err) = &app.ui.error {
        ui.add_space(6.0);
        ui.colored_label(egui::Color32::from_rgb(230, 90, 90), format!("⚠ {err}"));
    }

    if begin {
        app.start_story();
    }

    if app.ui.session.has_started() {
        ui.separator();
        draw_status_hud(ui, &app.ui.session.stats);
    }

    if app.ui.council.is_some() || app.ui.council_unreachable {
        ui.separator();
        draw_council(ui, &app.ui);
    }
}

/* =========================
   Status HUD
   ========================= */

fn draw_status_hud(ui: &mut egui::Ui, stats: &NarrativeStats) {
    ui.heading("Karmic Engine");

    let span = (ALIGNMENT_MAX - ALIGNMENT_MIN) as f32;
    let fraction = (stats.alignment - ALIGNMENT_MIN) as f32 / span;
    ui.label(format!("Dharma: {} · {}", stats.alignment, stats.alignment_label()));
    ui.add(egui::ProgressBar::new(fraction).text(format!("{:+}", stats.alignment)));

    ui.label(format!("Karma: {}", stats.karma));

    ui.collapsing("Inventory", |ui| {
        if stats.inventory.is_empty() {
            ui.label("No Astras or Artifacts detected.");
        } else {
            for item in &stats.inventory {
                ui.label(format!("• {item}"));
            }
        }
    });
}

/* =========================
   Council transcript
   ========================= */

fn draw_council(ui: &mut egui::Ui, state: &UiState) {
    ui.heading("Council");

    let Some(transcript) = &state.council else {
        ui.label("The council could not be reached; the act was written without a consensus.");
        return;
    };

    egui::CollapsingHeader::new("Debate")
        .id_salt("council_debate")
        .default_open(false)
        .show(ui, |ui| {
            for step in &transcript.debate {
                ui.label(egui::RichText::new(step.speaker.as_str()).strong());
                ui.label(step.content.as_str());
                ui.add_space(4.0);
            }
        });

    ui.label(egui::RichText::new("Consensus").strong());
    ui.label(transcript.consensus.as_str());
}

/* =========================
   Settings
   ========================= */

fn draw_settings(ui: &mut egui::Ui, app: &mut StoryApp) {
    ui.heading("Backend");

    ui.label("API base URL");
    ui.text_edit_singleline(&mut app.ui.settings.api_base_url);

    ui.label("Request timeout (seconds)");
    ui.add(egui::DragValue::new(&mut app.ui.settings.request_timeout_secs).range(5..=600));

    ui.horizontal(|ui| {
        if ui.button("Test connection").clicked() {
            app.check_health();
        }
        if ui.button("Refresh models").clicked() {
            app.refresh_models();
        }
    });

    ui.label("Default model");
    ui.text_edit_singleline(&mut app.ui.settings.default_model);

    ui.separator();
    ui.heading("Export");
    ui.label("Quick export folder");
    ui.text_edit_singleline(&mut app.ui.export_dir_text);

    ui.separator();
    ui.heading("Display");
    ui.add(egui::Slider::new(&mut app.ui.settings.ui_scale, UI_SCALE_MIN..=UI_SCALE_MAX).text("UI scale"));

    ui.separator();
    if ui.button("Save settings").clicked() {
        app.save_settings();
    }

    if let Some(status) = &app.ui.status {
        ui.label(status.as_str());
    }
}
