//! In-memory collaborators for exercising the core without a window.

use std::collections::HashMap;

use super::surface::{LinkStyle, Notice, Notifier, PolygonStyle, Renderer, ScreenPoint, ScreenProjector, TowerStyle, VisualKey};
use super::types::{GeoPoint, LinkId, TowerId};

/// Plate carrée projection with a fixed number of pixels per degree.
pub struct Equirectangular {
    pixels_per_degree: f64,
}

impl Equirectangular {
    pub fn new(pixels_per_degree: f64) -> Self {
        Self { pixels_per_degree }
    }
}

impl ScreenProjector for Equirectangular {
    fn project_to_screen(&self, point: GeoPoint) -> ScreenPoint {
        ScreenPoint::new(point.lon * self.pixels_per_degree, -point.lat * self.pixels_per_degree)
    }

    fn unproject_from_screen(&self, point: ScreenPoint) -> GeoPoint {
        GeoPoint::new(-point.y / self.pixels_per_degree, point.x / self.pixels_per_degree)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Tower { position: GeoPoint, style: TowerStyle, label: String },
    Link { from: GeoPoint, to: GeoPoint, style: LinkStyle, label: String },
    Polygon { points: Vec<GeoPoint>, style: PolygonStyle },
}

/// Renderer and notifier that records the current visuals and every notice.
pub struct RecordingSurface {
    pub projector: Equirectangular,
    pub visuals: HashMap<VisualKey, Visual>,
    pub notices: Vec<Notice>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self { projector: Equirectangular::new(100.0), visuals: HashMap::new(), notices: Vec::new() }
    }

    pub fn tower_style(&self, id: TowerId) -> Option<TowerStyle> {
        match self.visuals.get(&VisualKey::Tower(id)) {
            Some(Visual::Tower { style, .. }) => Some(*style),
            _ => None,
        }
    }

    pub fn tower_label(&self, id: TowerId) -> Option<&str> {
        match self.visuals.get(&VisualKey::Tower(id)) {
            Some(Visual::Tower { label, .. }) => Some(label),
            _ => None,
        }
    }

    pub fn link_style(&self, id: LinkId) -> Option<LinkStyle> {
        match self.visuals.get(&VisualKey::Link(id)) {
            Some(Visual::Link { style, .. }) => Some(*style),
            _ => None,
        }
    }

    pub fn link_label(&self, id: LinkId) -> Option<&str> {
        match self.visuals.get(&VisualKey::Link(id)) {
            Some(Visual::Link { label, .. }) => Some(label),
            _ => None,
        }
    }

    pub fn clearance(&self, id: LinkId) -> Option<&[GeoPoint]> {
        match self.visuals.get(&VisualKey::Clearance(id)) {
            Some(Visual::Polygon { points, .. }) => Some(points),
            _ => None,
        }
    }

    pub fn clearance_count(&self) -> usize {
        self.visuals.keys().filter(|k| matches!(k, VisualKey::Clearance(_))).count()
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl ScreenProjector for RecordingSurface {
    fn project_to_screen(&self, point: GeoPoint) -> ScreenPoint {
        self.projector.project_to_screen(point)
    }

    fn unproject_from_screen(&self, point: ScreenPoint) -> GeoPoint {
        self.projector.unproject_from_screen(point)
    }
}

impl Renderer for RecordingSurface {
    fn draw_tower_marker(&mut self, id: TowerId, position: GeoPoint, style: TowerStyle, label: &str) {
        self.visuals.insert(VisualKey::Tower(id), Visual::Tower { position, style, label: label.to_string() });
    }

    fn draw_link_line(&mut self, id: LinkId, from: GeoPoint, to: GeoPoint, style: LinkStyle, label: &str) {
        self.visuals.insert(VisualKey::Link(id), Visual::Link { from, to, style, label: label.to_string() });
    }

    fn draw_polygon(&mut self, id: LinkId, points: &[GeoPoint], style: PolygonStyle) {
        self.visuals.insert(VisualKey::Clearance(id), Visual::Polygon { points: points.to_vec(), style });
    }

    fn remove_visual(&mut self, key: VisualKey) {
        self.visuals.remove(&key);
    }
}

impl Notifier for RecordingSurface {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
