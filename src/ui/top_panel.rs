//! # Top Panel - Tools and Session Summary
//!
//! This module renders the fixed-height tool bar:
//! - Mode buttons (View, Tower, Link) with keyboard shortcuts
//! - Tower and link counts, and the frequency new towers start with
//! - The hint for the current interaction state
//! - Current map center and zoom

use crate::planner::Tool;
use crate::ui::AppState;
use eframe::egui;
use egui::Color32;

const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);

/// Render the top tool bar.
///
/// Mode buttons are disabled while a frequency change waits for confirmation.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_tools").exact_height(44.0).show(ctx, |ui| {
        ui.horizontal_centered(|ui| {
            ui.heading("Tower Link Planner");
            ui.separator();

            let current = state.controller.mode().tool();
            let mut picked = None;
            ui.add_enabled_ui(state.pending_change.is_none(), |ui| {
                for (tool, shortcut) in [(Tool::View, "V"), (Tool::PlaceTower, "T"), (Tool::Link, "L")] {
                    let text = egui::RichText::new(tool.to_string()).strong();
                    let text = if tool == current { text.color(ACCENT) } else { text };
                    if ui.selectable_label(tool == current, text).on_hover_text(format!("Shortcut: {}", shortcut)).clicked() {
                        picked = Some(tool);
                    }
                }
            });
            if let Some(tool) = picked {
                state.set_tool(tool);
            }

            ui.separator();
            let model = state.controller.model();
            ui.label("Towers:");
            ui.label(egui::RichText::new(model.towers().len().to_string()).monospace().strong());
            ui.label("Links:");
            ui.label(egui::RichText::new(model.links().len().to_string()).monospace().strong());
            ui.label("New towers:");
            ui.label(egui::RichText::new(format!("{} GHz", model.default_frequency_ghz())).monospace().strong());

            ui.separator();
            ui.label(egui::RichText::new(state.controller.mode().hint()).italics());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let view = &state.layers.view;
                ui.label(egui::RichText::new(format!("{}  z{:.1}", view.center, view.zoom)).monospace().weak());
            });
        });
    });
}
