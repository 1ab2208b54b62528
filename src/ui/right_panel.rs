//! # Right Panel - Properties, Links Overview and Activity
//!
//! This module renders the resizable right panel:
//! - Properties of the selected tower (editable name and frequency, position,
//!   delete) or link (endpoints, distance, frequency, delete)
//! - A links overview table; clicking a row selects that link
//! - The activity tab listing every notice with its local timestamp
//!
//! ## Editing
//!
//! Text fields commit when they lose focus or on Enter. Commits go through
//! `InteractionController::update_tower`, which validates the input. A
//! frequency change on a linked tower comes back as a pending decision and is
//! stored on `AppState` until the confirmation window resolves it.

use crate::planner::SelectedEntity;
use crate::planner::types::{LinkId, Selection, TowerId};
use crate::ui::app_state::InspectorTab;
use crate::ui::{AppState, UiSurface, notice_color};
use eframe::egui;
use egui::Color32;
use egui_extras::{Column, TableBuilder};

const DANGER: Color32 = Color32::from_rgb(220, 38, 38);
const VALUE_COLOR: Color32 = Color32::from_rgb(96, 165, 250);

/// Render the right inspector panel and remember its width.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let panel = egui::SidePanel::right("inspector_right")
        .resizable(true)
        .default_width(state.right_panel_width)
        .width_range(280.0..=720.0)
        .show(ctx, |ui| {
            let editable = state.pending_change.is_none();
            ui.add_enabled_ui(editable, |ui| match state.controller.selection() {
                Some(Selection::Tower(id)) => render_tower_properties(ui, state, id),
                Some(Selection::Link(id)) => render_link_properties(ui, state, id),
                None => {
                    ui.heading("Properties");
                    ui.separator();
                    ui.label(egui::RichText::new("Select a tower or link to view its properties.").weak());
                }
            });

            ui.add_space(8.0);
            ui.separator();
            ui.horizontal(|ui| {
                ui.selectable_value(&mut state.inspector_tab, InspectorTab::Links, "Links");
                ui.selectable_value(&mut state.inspector_tab, InspectorTab::Activity, "Activity");
            });
            ui.separator();
            match state.inspector_tab {
                InspectorTab::Links => {
                    ui.add_enabled_ui(editable, |ui| render_links_table(ui, state));
                }
                InspectorTab::Activity => render_activity_table(ui, state),
            }
        });
    state.right_panel_width = panel.response.rect.width();
}

/// Heading with a close button that clears the selection.
fn properties_header(ui: &mut egui::Ui, state: &mut AppState, title: &str) {
    let mut close = false;
    ui.horizontal(|ui| {
        ui.heading(title);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            close = ui.small_button("✕").on_hover_text("Close").clicked();
        });
    });
    ui.separator();
    if close {
        state.controller.deselect_all(&mut state.layers);
    }
}

fn danger_button(ui: &mut egui::Ui, text: &str) -> bool {
    ui.add(egui::Button::new(egui::RichText::new(text).color(Color32::WHITE)).fill(DANGER)).clicked()
}

fn render_tower_properties(ui: &mut egui::Ui, state: &mut AppState, id: TowerId) {
    let Some(tower) = state.controller.model().find_tower(id).cloned() else {
        return;
    };
    state.tower_form.sync(&tower);
    properties_header(ui, state, "Tower Properties");

    let mut commit: Option<(&str, String)> = None;
    egui::Grid::new("tower_properties").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
        ui.label("Name:");
        if ui.text_edit_singleline(&mut state.tower_form.name).lost_focus() && state.tower_form.name != tower.name {
            commit = Some(("name", state.tower_form.name.clone()));
        }
        ui.end_row();

        ui.label("Frequency (GHz):");
        let response = ui.text_edit_singleline(&mut state.tower_form.frequency);
        if response.lost_focus() && state.tower_form.frequency != tower.frequency_ghz.to_string() {
            commit = Some(("frequency", state.tower_form.frequency.clone()));
        }
        ui.end_row();

        ui.label("Latitude:");
        ui.label(egui::RichText::new(format!("{:.6}", tower.position.lat)).monospace());
        ui.end_row();

        ui.label("Longitude:");
        ui.label(egui::RichText::new(format!("{:.6}", tower.position.lon)).monospace());
        ui.end_row();

        ui.label("Links:");
        ui.label(egui::RichText::new(state.controller.model().links_incident_to(id).len().to_string()).strong());
        ui.end_row();

        if let Some(change) = state.controller.model().awaiting_decision(id) {
            ui.label("Pending:");
            ui.label(egui::RichText::new(format!("{} GHz, awaiting confirmation", change.frequency_ghz)).color(DANGER));
            ui.end_row();
        }
    });

    if let Some((field, value)) = commit {
        let mut surface = UiSurface::new(&mut state.layers, &mut state.notices);
        state.pending_change = state.controller.update_tower(id, field, &value, &mut surface);
        if let Some(tower) = state.controller.model().find_tower(id) {
            state.tower_form.load(tower);
        }
    }

    ui.add_space(8.0);
    if danger_button(ui, "Delete Tower") {
        let mut surface = UiSurface::new(&mut state.layers, &mut state.notices);
        state.controller.delete_tower(id, &mut surface);
        state.tower_form = Default::default();
    }
}

fn render_link_properties(ui: &mut egui::Ui, state: &mut AppState, id: LinkId) {
    let Some(SelectedEntity::Link { source, target, distance_m, .. }) = state.controller.selected() else {
        return;
    };
    let (source_name, target_name, frequency_ghz) = (source.name.clone(), target.name.clone(), source.frequency_ghz);
    properties_header(ui, state, "Link Properties");

    egui::Grid::new("link_properties").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
        ui.label("Source:");
        ui.label(egui::RichText::new(source_name).strong());
        ui.end_row();

        ui.label("Target:");
        ui.label(egui::RichText::new(target_name).strong());
        ui.end_row();

        ui.label("Distance:");
        ui.label(egui::RichText::new(format!("{:.2} km", distance_m / 1000.0)).strong().color(VALUE_COLOR));
        ui.end_row();

        ui.label("Frequency:");
        ui.label(egui::RichText::new(format!("{} GHz", frequency_ghz)).strong().color(VALUE_COLOR));
        ui.end_row();
    });
    ui.label(egui::RichText::new("The first Fresnel zone is shaded on the map.").weak());

    ui.add_space(8.0);
    if danger_button(ui, "Delete Link") {
        let mut surface = UiSurface::new(&mut state.layers, &mut state.notices);
        state.controller.delete_link(id, &mut surface);
    }
}

/// Links overview. Clicking a source name selects the link as a map click would.
fn render_links_table(ui: &mut egui::Ui, state: &mut AppState) {
    let model = state.controller.model();
    let rows: Vec<(LinkId, String, String, f64, f64)> = model
        .links()
        .iter()
        .filter_map(|link| {
            let (source, target) = model.link_endpoints(link.id)?;
            Some((link.id, source.name.clone(), target.name.clone(), model.link_distance_m(link.id)?, source.frequency_ghz))
        })
        .collect();
    if rows.is_empty() {
        ui.label(egui::RichText::new("No links yet. Use the Link tool to connect two towers.").weak());
        return;
    }

    let selected = state.controller.selection();
    let mut clicked = None;
    let row_height = ui.text_style_height(&egui::TextStyle::Body) * 1.4;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(110.0).at_least(60.0)) // Source
        .column(Column::initial(110.0).at_least(60.0)) // Target
        .column(Column::initial(80.0).at_least(50.0)) // Distance
        .column(Column::remainder()) // Frequency
        .header(row_height, |mut header| {
            header.col(|ui| {
                ui.strong("Source");
            });
            header.col(|ui| {
                ui.strong("Target");
            });
            header.col(|ui| {
                ui.strong("Distance");
            });
            header.col(|ui| {
                ui.strong("GHz");
            });
        })
        .body(|body| {
            body.rows(row_height, rows.len(), |mut row| {
                let (id, source, target, distance_m, frequency_ghz) = &rows[row.index()];
                row.col(|ui| {
                    if ui.selectable_label(selected == Some(Selection::Link(*id)), source.as_str()).clicked() {
                        clicked = Some(*id);
                    }
                });
                row.col(|ui| {
                    ui.label(target.as_str());
                });
                row.col(|ui| {
                    ui.label(format!("{:.2} km", distance_m / 1000.0));
                });
                row.col(|ui| {
                    ui.label(frequency_ghz.to_string());
                });
            });
        });

    if let Some(id) = clicked {
        let mut surface = UiSurface::new(&mut state.layers, &mut state.notices);
        state.controller.handle_link_click(id, &mut surface);
    }
}

/// Notice history, newest first.
fn render_activity_table(ui: &mut egui::Ui, state: &AppState) {
    let history = state.notices.history();
    if history.is_empty() {
        ui.label(egui::RichText::new("No activity yet.").weak());
        return;
    }

    let row_height = ui.text_style_height(&egui::TextStyle::Body) * 1.3;
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(70.0).at_least(60.0)) // Time
        .column(Column::remainder()) // Message
        .header(row_height, |mut header| {
            header.col(|ui| {
                ui.strong("Time");
            });
            header.col(|ui| {
                ui.strong("Message");
            });
        })
        .body(|body| {
            let row_count = history.len();
            body.rows(row_height, row_count, |mut row| {
                let record = &history[row_count - 1 - row.index()];
                row.col(|ui| {
                    ui.label(egui::RichText::new(record.at.format("%H:%M:%S").to_string()).monospace());
                });
                row.col(|ui| {
                    ui.label(egui::RichText::new(&record.notice.message).color(notice_color(record.notice.level)));
                });
            });
        });
}
