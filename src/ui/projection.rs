//! Web Mercator view state for the map panel.
//!
//! Geographic points are mapped to a square "world" of `256 · 2^zoom` pixels
//! (the slippy-map convention), then shifted so that the view center lands in
//! the middle of the on-screen viewport. `MapView` implements the core's
//! `ScreenProjector`, so clearance polygons are built in exactly the space the
//! map is painted in.

use std::f64::consts::PI;

use crate::config::MAX_ZOOM;
use crate::planner::surface::{ScreenPoint, ScreenProjector};
use crate::planner::types::GeoPoint;

/// Edge length of one zoom-0 world tile in screen points.
pub const TILE_SIZE: f64 = 256.0;

/// Web Mercator valid latitude range.
pub const MAX_LAT: f64 = 85.05112878;

/// Lowest zoom the view allows.
pub const MIN_ZOOM: f64 = 1.0;

/// Current pan/zoom and on-screen viewport of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: f64,
    /// Top-left corner of the viewport in screen points.
    viewport_min: ScreenPoint,
    viewport_width: f64,
    viewport_height: f64,
}

impl MapView {
    pub fn new(center: GeoPoint, zoom: f64) -> Self {
        Self {
            center: clamp_point(center),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            viewport_min: ScreenPoint::new(0.0, 0.0),
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    /// Degrees of longitude covered by one screen point.
    pub fn degrees_per_point(&self) -> f64 {
        360.0 / self.world_size()
    }

    /// Position of `point` in world pixels at the current zoom.
    fn to_world(&self, point: GeoPoint) -> (f64, f64) {
        let size = self.world_size();
        let lat_rad = point.lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
        let x = (point.lon + 180.0) / 360.0 * size;
        let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * size;
        (x, y)
    }

    fn from_world(&self, x: f64, y: f64) -> GeoPoint {
        let size = self.world_size();
        let lon = x / size * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
        GeoPoint::new(lat, lon)
    }

    fn viewport_center(&self) -> (f64, f64) {
        (self.viewport_min.x + self.viewport_width / 2.0, self.viewport_min.y + self.viewport_height / 2.0)
    }

    /// Update the on-screen viewport. Returns true if it changed.
    pub fn set_viewport(&mut self, min: ScreenPoint, width: f64, height: f64) -> bool {
        let changed = self.viewport_min != min || self.viewport_width != width || self.viewport_height != height;
        self.viewport_min = min;
        self.viewport_width = width;
        self.viewport_height = height;
        changed
    }

    /// Move the map content by a screen delta (drag direction).
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.to_world(self.center);
        self.center = clamp_point(self.from_world(cx - dx, cy - dy));
    }

    /// Change zoom by `delta` levels keeping the point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: ScreenPoint, delta: f64) {
        let new_zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        if new_zoom == self.zoom {
            return;
        }
        let anchored = self.unproject_from_screen(anchor);
        self.zoom = new_zoom;
        let (ax, ay) = self.to_world(anchored);
        let (vx, vy) = self.viewport_center();
        self.center = clamp_point(self.from_world(ax - (anchor.x - vx), ay - (anchor.y - vy)));
    }

    /// Geographic bounds currently visible: (north-west, south-east).
    pub fn visible_bounds(&self) -> (GeoPoint, GeoPoint) {
        let nw = self.unproject_from_screen(self.viewport_min);
        let se = self.unproject_from_screen(ScreenPoint::new(self.viewport_min.x + self.viewport_width, self.viewport_min.y + self.viewport_height));
        (nw, se)
    }
}

fn clamp_point(point: GeoPoint) -> GeoPoint {
    let lon = (point.lon + 180.0).rem_euclid(360.0) - 180.0;
    GeoPoint::new(point.lat.clamp(-MAX_LAT, MAX_LAT), lon)
}

impl ScreenProjector for MapView {
    fn project_to_screen(&self, point: GeoPoint) -> ScreenPoint {
        let (x, y) = self.to_world(point);
        let (cx, cy) = self.to_world(self.center);
        let (vx, vy) = self.viewport_center();
        ScreenPoint::new(x - cx + vx, y - cy + vy)
    }

    fn unproject_from_screen(&self, point: ScreenPoint) -> GeoPoint {
        let (cx, cy) = self.to_world(self.center);
        let (vx, vy) = self.viewport_center();
        self.from_world(point.x - vx + cx, point.y - vy + cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> MapView {
        let mut view = MapView::new(GeoPoint::new(20.0, 78.0), 5.0);
        view.set_viewport(ScreenPoint::new(100.0, 50.0), 800.0, 600.0);
        view
    }

    fn close(a: GeoPoint, b: GeoPoint) -> bool {
        (a.lat - b.lat).abs() < 1e-9 && (a.lon - b.lon).abs() < 1e-9
    }

    #[test]
    fn center_projects_to_viewport_middle() {
        let view = view();
        let p = view.project_to_screen(view.center);
        assert!((p.x - 500.0).abs() < 1e-9);
        assert!((p.y - 350.0).abs() < 1e-9);
    }

    #[test]
    fn unproject_inverts_project() {
        let view = view();
        let point = GeoPoint::new(23.25, 77.41);
        assert!(close(view.unproject_from_screen(view.project_to_screen(point)), point));
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let view = view();
        let origin = view.project_to_screen(GeoPoint::new(20.0, 78.0));
        let north = view.project_to_screen(GeoPoint::new(21.0, 78.0));
        let east = view.project_to_screen(GeoPoint::new(20.0, 79.0));
        assert!(north.y < origin.y);
        assert!(east.x > origin.x);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut view = view();
        let anchor = ScreenPoint::new(250.0, 120.0);
        let before = view.unproject_from_screen(anchor);
        view.zoom_at(anchor, 1.5);
        assert_eq!(view.zoom, 6.5);
        assert!(close(view.unproject_from_screen(anchor), before));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = view();
        view.zoom_at(ScreenPoint::new(500.0, 350.0), 100.0);
        assert_eq!(view.zoom, MAX_ZOOM);
        view.zoom_at(ScreenPoint::new(500.0, 350.0), -100.0);
        assert_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn pan_moves_content_with_the_drag() {
        let mut view = view();
        let point = GeoPoint::new(21.0, 79.0);
        let before = view.project_to_screen(point);
        view.pan_by(40.0, -25.0);
        let after = view.project_to_screen(point);
        assert!((after.x - before.x - 40.0).abs() < 1e-6);
        assert!((after.y - before.y + 25.0).abs() < 1e-6);
    }

    #[test]
    fn viewport_change_is_reported() {
        let mut view = view();
        assert!(!view.set_viewport(ScreenPoint::new(100.0, 50.0), 800.0, 600.0));
        assert!(view.set_viewport(ScreenPoint::new(100.0, 50.0), 900.0, 600.0));
    }
}
