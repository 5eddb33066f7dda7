use eframe::egui;

use super::app::StoryApp;
use crate::model::story_node::{NodeId, TimelineNode};

pub fn draw_right_panel(ctx: &egui::Context, app: &mut StoryApp) {
    let mut selected: Option<NodeId> = None;
    let busy = app.ui.is_busy();

    egui::SidePanel::right("right")
        .resizable(true)
        .default_width(260.0)
        .min_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Multiverse Topology");
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                if app.ui.timeline.is_empty() {
                    ui.label("No timelines yet.");
                }
                for root in &app.ui.timeline {
                    draw_timeline_node(ui, root, busy, &mut selected);
                }
            });

            ui.separator();
            ui.small("Highlighted: current timeline reality branch");
        });

    if let Some(id) = selected {
        app.select_node(id);
    }
}

fn draw_timeline_node(
    ui: &mut egui::Ui,
    node: &TimelineNode,
    busy: bool,
    selected: &mut Option<NodeId>,
) {
    let mut label = node.title.clone();
    if let Some(d) = node.alignment_delta.filter(|d| *d != 0) {
        label.push_str(&format!("  dharma {d:+}"));
    }
    if let Some(k) = node.karma_delta.filter(|k| *k != 0) {
        label.push_str(&format!("  karma {k:+}"));
    }

    let button = egui::Button::new(label).selected(node.is_current);
    if ui.add_enabled(!busy, button).clicked() {
        *selected = Some(node.id);
    }

    if !node.children.is_empty() {
        ui.indent(node.id, |ui| {
            for child in &node.children {
                draw_timeline_node(ui, child, busy, selected);
            }
        });
    }
}
