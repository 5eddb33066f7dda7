use eframe::egui;

use super::app::StoryApp;
use crate::engine::illustration::scene_image_url;

pub fn draw_center_panel(ctx: &egui::Context, app: &mut StoryApp) {
    if !app.ui.session.has_started() {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.heading("Ready to Initialize");
                ui.label("Configure the simulation on the left to begin the narrative.");
            });
        });
        return;
    }

    let busy = app.ui.is_busy();
    let mut chosen: Option<String> = None;
    let mut export_dialog = false;
    let mut export_quick = false;

    // ---------- Choices ----------
    egui::TopBottomPanel::bottom("choices").show(ctx, |ui| {
        ui.add_space(4.0);
        let choices = app.ui.session.current_choices();
        if choices.is_empty() {
            ui.label("No branches offered for this act.");
        }
        for (i, choice) in choices.iter().enumerate() {
            let button = egui::Button::new(format!("{}. {}", i + 1, choice)).wrap();
            if ui.add_enabled(!busy, button).clicked() {
                chosen = Some(choice.clone());
            }
        }
        ui.add_space(4.0);
    });

    // ---------- Story ----------
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(app.ui.story_title());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Quick export").clicked() {
                    export_quick = true;
                }
                if ui.button("Export…").clicked() {
                    export_dialog = true;
                }
            });
        });

        if let Some(status) = &app.ui.status {
            ui.small(status.as_str());
        }

        if let Some(url) = app.ui.session.current_image_prompt().and_then(scene_image_url) {
            ui.hyperlink_to("🖼 Scene illustration", url.as_str());
        }

        ui.separator();

        egui::ScrollArea::vertical()
            .stick_to_bottom(app.ui.should_auto_scroll)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(app.ui.story_text.as_str());
            });
    });

    if export_dialog {
        app.export_with_dialog();
    }
    if export_quick {
        app.quick_export();
    }
    if let Some(choice) = chosen {
        app.choose_branch(choice);
    }
}
