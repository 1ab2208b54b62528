//! Collaborator traits consumed by the planner core.
//!
//! The core never owns drawing handles. It asks a [`Renderer`] to draw or
//! remove primitives keyed by entity id, projects through the renderer's
//! [`ScreenProjector`], and reports operator-facing messages to a [`Notifier`].

use super::types::{GeoPoint, LinkId, TowerId};

/// A point in the renderer's screen (layer) space, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Projection between geographic coordinates and screen space at the
/// current view.
pub trait ScreenProjector {
    fn project_to_screen(&self, point: GeoPoint) -> ScreenPoint;
    fn unproject_from_screen(&self, point: ScreenPoint) -> GeoPoint;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TowerStyle {
    Default,
    Selected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    Default,
    Selected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonStyle {
    /// First Fresnel zone clearance area around a link.
    FresnelClearance,
}

/// Key of a visual primitive held by the renderer.
///
/// A link owns two independent visuals: its line and, while selected, its
/// clearance polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKey {
    Tower(TowerId),
    Link(LinkId),
    Clearance(LinkId),
}

/// Drawing surface for towers, links and clearance polygons.
///
/// Drawing an id that is already present replaces the previous primitive.
pub trait Renderer: ScreenProjector {
    fn draw_tower_marker(&mut self, id: TowerId, position: GeoPoint, style: TowerStyle, label: &str);
    fn draw_link_line(&mut self, id: LinkId, from: GeoPoint, to: GeoPoint, style: LinkStyle, label: &str);
    fn draw_polygon(&mut self, id: LinkId, points: &[GeoPoint], style: PolygonStyle);
    fn remove_visual(&mut self, key: VisualKey);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Operator-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Sink for operator-facing messages (toasts in the desktop UI).
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}
