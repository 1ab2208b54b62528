// UI module for the Tower Link Planner
//
// This module organizes the desktop host into separate components:
// - `top_panel`: Tool bar with mode buttons, counts and the current hint
// - `right_panel`: Tower/link properties, links overview and activity log
// - `map`: Central map with towers, links and clearance polygons
// - `projection`: Web Mercator view used by the map
// - `notices`: Toasts and notice history
// - `app_state`: Application state management and main update loop

pub mod app_state;
pub mod map;
pub mod notices;
pub mod projection;
pub mod right_panel;
pub mod top_panel;

use crate::planner::surface::{LinkStyle, Notice, Notifier, PolygonStyle, Renderer, ScreenPoint, ScreenProjector, TowerStyle, VisualKey};
use crate::planner::types::{GeoPoint, LinkId, TowerId};

pub use app_state::{AppState, notice_color};
use map::MapLayers;
use notices::NoticeBoard;

/// Drawing and notification surface handed to the controller for one
/// operation. Borrows the map layers and the notice board of `AppState`.
pub struct UiSurface<'a> {
    layers: &'a mut MapLayers,
    notices: &'a mut NoticeBoard,
}

impl<'a> UiSurface<'a> {
    pub fn new(layers: &'a mut MapLayers, notices: &'a mut NoticeBoard) -> Self {
        Self { layers, notices }
    }
}

impl ScreenProjector for UiSurface<'_> {
    fn project_to_screen(&self, point: GeoPoint) -> ScreenPoint {
        self.layers.project_to_screen(point)
    }

    fn unproject_from_screen(&self, point: ScreenPoint) -> GeoPoint {
        self.layers.unproject_from_screen(point)
    }
}

impl Renderer for UiSurface<'_> {
    fn draw_tower_marker(&mut self, id: TowerId, position: GeoPoint, style: TowerStyle, label: &str) {
        self.layers.draw_tower_marker(id, position, style, label);
    }

    fn draw_link_line(&mut self, id: LinkId, from: GeoPoint, to: GeoPoint, style: LinkStyle, label: &str) {
        self.layers.draw_link_line(id, from, to, style, label);
    }

    fn draw_polygon(&mut self, id: LinkId, points: &[GeoPoint], style: PolygonStyle) {
        self.layers.draw_polygon(id, points, style);
    }

    fn remove_visual(&mut self, key: VisualKey) {
        self.layers.remove_visual(key);
    }
}

impl Notifier for UiSurface<'_> {
    fn notify(&mut self, notice: Notice) {
        self.notices.notify(notice);
    }
}
