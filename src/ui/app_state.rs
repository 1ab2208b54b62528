//! # Application State Management
//!
//! This module implements the central `AppState` struct which owns the planning
//! session and coordinates the rendering of all UI components. It implements the
//! `eframe::App` trait to integrate with the egui application framework.
//!
//! ## Responsibilities
//!
//! - Owns the `InteractionController` (and through it the network model)
//! - Owns the map layers and the notice board the controller draws and reports to
//! - Holds a frequency change that waits for operator confirmation and shows
//!   the modal that resolves it
//! - Coordinates rendering of all UI panels (top, right, map) and the toast
//! - Persists panel width and the last map view across application sessions
//!
//! ## Confirmation Flow
//!
//! `InteractionController::update_tower` may return a pending frequency change.
//! While one is stored here, the map and property editors are disabled and the
//! confirmation window is the only way forward, so no other mutation can
//! interleave with the decision.

use eframe::egui;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::UiSurface;
use super::map::MapLayers;
use super::notices::NoticeBoard;
use super::projection::MapView;
use crate::config::PlannerConfig;
use crate::planner::surface::NoticeLevel;
use crate::planner::types::{GeoPoint, Tower, TowerId};
use crate::planner::{InteractionController, NetworkModel, PendingFrequencyChange, Tool};

/// Default width of the right inspector panel in points.
pub const DEFAULT_RIGHT_PANEL_WIDTH: f32 = 360.0;

/// Currently selected tab in the lower half of the right panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InspectorTab {
    #[default]
    Links,
    Activity,
}

/// Edit buffers of the tower properties form.
///
/// Buffers are loaded from the model when a different tower gets selected
/// and after every commit, so rejected input snaps back to the stored value.
#[derive(Debug, Default)]
pub struct TowerForm {
    pub tower: Option<TowerId>,
    pub name: String,
    pub frequency: String,
}

impl TowerForm {
    pub fn load(&mut self, tower: &Tower) {
        self.tower = Some(tower.id);
        self.name = tower.name.clone();
        self.frequency = tower.frequency_ghz.to_string();
    }

    /// Reload the buffers if `tower` is not the one being edited.
    pub fn sync(&mut self, tower: &Tower) {
        if self.tower != Some(tower.id) {
            self.load(tower);
        }
    }
}

/// Central application state.
pub struct AppState {
    /// Interaction state machine owning the network model.
    pub controller: InteractionController,
    /// Visuals drawn by the controller and the map view they are painted through.
    pub layers: MapLayers,
    /// Toast and notice history.
    pub notices: NoticeBoard,
    /// Frequency change waiting for the operator's answer.
    pub pending_change: Option<PendingFrequencyChange>,
    pub tower_form: TowerForm,
    pub inspector_tab: InspectorTab,
    /// Width of the right inspector panel in points.
    pub right_panel_width: f32,
}

/// Settings persisted across application sessions.
#[derive(Default, Serialize, Deserialize)]
struct PersistedSettings {
    right_panel_width: Option<f32>,
    view_center: Option<GeoPoint>,
    view_zoom: Option<f64>,
}

impl AppState {
    /// Create a new AppState, restoring the last map view if one was persisted.
    pub fn new(config: &PlannerConfig, storage: Option<&dyn eframe::Storage>) -> Self {
        let persisted: PersistedSettings = storage.and_then(|s| eframe::get_value(s, "app_settings")).unwrap_or_default();
        let view = MapView::new(
            persisted.view_center.unwrap_or(config.initial_center),
            persisted.view_zoom.unwrap_or(config.initial_zoom),
        );
        log::debug!("Initial map view: center {} zoom {:.2}", view.center, view.zoom);

        Self {
            controller: InteractionController::new(NetworkModel::new(config.default_frequency_ghz), config.fresnel_samples),
            layers: MapLayers::new(view),
            notices: NoticeBoard::new(Duration::from_millis(config.notice_duration_ms)),
            pending_change: None,
            tower_form: TowerForm::default(),
            inspector_tab: InspectorTab::default(),
            right_panel_width: persisted.right_panel_width.unwrap_or(DEFAULT_RIGHT_PANEL_WIDTH),
        }
    }

    /// Switch the active tool from the toolbar or a shortcut.
    pub fn set_tool(&mut self, tool: Tool) {
        let mut surface = UiSurface::new(&mut self.layers, &mut self.notices);
        self.controller.set_tool(tool, &mut surface);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.pending_change.is_some() || ctx.wants_keyboard_input() {
            return;
        }
        let tool = ctx.input(|i| {
            if i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::V) {
                Some(Tool::View)
            } else if i.key_pressed(egui::Key::T) {
                Some(Tool::PlaceTower)
            } else if i.key_pressed(egui::Key::L) {
                Some(Tool::Link)
            } else {
                None
            }
        });
        if let Some(tool) = tool {
            self.set_tool(tool);
        }
    }

    /// Modal asking whether to remove incident links for a frequency change.
    fn render_confirmation(&mut self, ctx: &egui::Context) {
        let Some(pending) = &self.pending_change else {
            return;
        };
        let tower_name = self.controller.model().find_tower(pending.tower).map(|t| t.name.clone()).unwrap_or_default();
        let message = format!(
            "Changing the frequency of {} to {} GHz will remove {} connected link(s). Continue?",
            tower_name,
            pending.frequency_ghz,
            pending.incident_links.len()
        );

        let mut answer = None;
        egui::Window::new("Confirm frequency change")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(16.0);
                    ui.label(message);
                    ui.add_space(16.0);
                    ui.horizontal(|ui| {
                        if ui.button("Remove links").clicked() {
                            answer = Some(true);
                        }
                        if ui.button("Cancel").clicked() {
                            answer = Some(false);
                        }
                    });
                    ui.add_space(8.0);
                });
            });

        if let Some(accepted) = answer {
            if let Some(pending) = self.pending_change.take() {
                let tower = pending.tower;
                let mut surface = UiSurface::new(&mut self.layers, &mut self.notices);
                self.controller.resolve_frequency_change(pending, accepted, &mut surface);
                if let Some(tower) = self.controller.model().find_tower(tower) {
                    self.tower_form.load(tower);
                }
            }
        }
    }

    fn render_toast(&self, ctx: &egui::Context) {
        let now = Instant::now();
        if let Some(notice) = self.notices.active_toast(now) {
            egui::Area::new(egui::Id::new("toast"))
                .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -32.0))
                .order(egui::Order::Foreground)
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).fill(notice_color(notice.level)).show(ui, |ui| {
                        ui.label(egui::RichText::new(&notice.message).color(Color32::WHITE).strong());
                    });
                });
        }
        if let Some(remaining) = self.notices.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }
}

/// Background color for a notice of the given level.
pub fn notice_color(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => Color32::from_rgb(37, 99, 235),
        NoticeLevel::Success => Color32::from_rgb(5, 150, 105),
        NoticeLevel::Error => Color32::from_rgb(220, 38, 38),
    }
}

impl eframe::App for AppState {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            right_panel_width: Some(self.right_panel_width),
            view_center: Some(self.layers.view.center),
            view_zoom: Some(self.layers.view.zoom),
        };
        eframe::set_value(storage, "app_settings", &settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        self.render_confirmation(ctx);

        // Panels layout: top (fixed), right (resizable), map fills the remaining using CentralPanel
        super::top_panel::render(ctx, self);
        super::right_panel::render(ctx, self);
        super::map::render(ctx, self);

        self.render_toast(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tower_form_reloads_only_for_a_different_tower() {
        let mut model = NetworkModel::default();
        let first = model.add_tower(GeoPoint::new(20.0, 78.0)).clone();
        let second = model.add_tower(GeoPoint::new(21.0, 78.0)).clone();

        let mut form = TowerForm::default();
        form.sync(&first);
        assert_eq!(form.name, "Tower 1");
        assert_eq!(form.frequency, "5.8");

        form.name = "Ridge".to_string();
        form.sync(&first);
        assert_eq!(form.name, "Ridge");

        form.sync(&second);
        assert_eq!(form.tower, Some(second.id));
        assert_eq!(form.name, "Tower 2");
    }

    #[test]
    fn new_state_uses_configured_defaults() {
        let config = PlannerConfig { initial_zoom: 7.0, ..PlannerConfig::default() };
        let state = AppState::new(&config, None);
        assert_eq!(state.layers.view.zoom, 7.0);
        assert!((state.layers.view.center.lat - config.initial_center.lat).abs() < 1e-9);
        assert!((state.layers.view.center.lon - config.initial_center.lon).abs() < 1e-9);
        assert_eq!(state.right_panel_width, DEFAULT_RIGHT_PANEL_WIDTH);
        assert!(state.pending_change.is_none());
        assert_eq!(state.controller.model().default_frequency_ghz(), config.default_frequency_ghz);
    }
}
