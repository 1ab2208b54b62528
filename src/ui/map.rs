//! # Central Map
//!
//! This module renders the interactive map and is the planner's drawing surface.
//!
//! - `MapLayers` keeps every visual the controller asked for, keyed by
//!   `VisualKey`, and implements the `Renderer` trait over a Web Mercator
//!   `MapView`.
//! - `render` paints a graticule, clearance polygons, link lines and tower
//!   markers, then forwards clicks to the `InteractionController`.
//!
//! ## Interaction
//!
//! Dragging pans and the scroll wheel zooms around the pointer. Any view change
//! asks the controller to regenerate the selected link's clearance polygon,
//! since polygons are built in screen space. A click is hit-tested against
//! tower markers first, then link lines, and otherwise counts as a
//! map-background click.

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke};
use std::collections::HashMap;

use super::UiSurface;
use super::projection::MapView;
use crate::planner::Mode;
use crate::planner::surface::{LinkStyle, PolygonStyle, Renderer, ScreenPoint, ScreenProjector, TowerStyle, VisualKey};
use crate::planner::types::{GeoPoint, LinkId, TowerId};
use crate::ui::AppState;

const TOWER_SIZE: f32 = 20.0;
const TOWER_SELECTED_SIZE: f32 = 26.0;
const TOWER_COLOR: Color32 = Color32::from_rgb(59, 130, 246);
const TOWER_SELECTED_COLOR: Color32 = Color32::from_rgb(96, 165, 250);
const TOWER_GLOW_COLOR: Color32 = Color32::from_rgba_premultiplied(48, 82, 125, 125);
const TOWER_LABEL_COLOR: Color32 = Color32::from_rgb(226, 232, 240);

const LINK_COLOR: Color32 = Color32::from_rgb(59, 130, 246);
const LINK_SELECTED_COLOR: Color32 = Color32::from_rgb(245, 158, 11);
const LINK_HOVER_COLOR: Color32 = Color32::from_rgb(96, 165, 250);
const LINK_WIDTH: f32 = 3.0;
const LINK_SELECTED_WIDTH: f32 = 4.0;
const LINK_HOVER_WIDTH: f32 = 5.0;
/// Pointer distance (screen points) within which a link line counts as hit.
const LINK_HIT_TOLERANCE: f32 = 6.0;

const CLEARANCE_FILL: Color32 = Color32::from_rgba_premultiplied(3, 37, 26, 51);
const CLEARANCE_STROKE: Color32 = Color32::from_rgb(16, 185, 129);
const CLEARANCE_DASH: f32 = 5.0;

const GRATICULE_COLOR: Color32 = Color32::from_rgb(30, 41, 59);
const GRATICULE_LABEL_COLOR: Color32 = Color32::from_rgb(71, 85, 105);
/// Minimum spacing between graticule lines in screen points.
const GRATICULE_MIN_SPACING: f64 = 90.0;
const GRATICULE_STEPS: [f64; 16] = [0.0005, 0.001, 0.002, 0.005, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 30.0];

/// Scroll distance (points) that changes zoom by one level.
const SCROLL_POINTS_PER_ZOOM_LEVEL: f64 = 120.0;

#[derive(Debug, Clone, PartialEq)]
enum Visual {
    Tower { position: GeoPoint, style: TowerStyle, label: String },
    Link { from: GeoPoint, to: GeoPoint, style: LinkStyle, label: String },
    Clearance { points: Vec<GeoPoint>, style: PolygonStyle },
}

/// Entity under a screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Tower(TowerId),
    Link(LinkId),
}

/// Retained map content plus the view it is painted through.
pub struct MapLayers {
    pub view: MapView,
    visuals: HashMap<VisualKey, Visual>,
}

impl MapLayers {
    pub fn new(view: MapView) -> Self {
        Self { view, visuals: HashMap::new() }
    }

    /// Topmost entity at `pointer`. Tower markers win over link lines.
    pub fn hit_test(&self, pointer: Pos2) -> Option<Hit> {
        let tower = self
            .visuals
            .iter()
            .filter_map(|(key, visual)| match (key, visual) {
                (VisualKey::Tower(id), Visual::Tower { position, style, .. }) => {
                    let anchor = self.screen_pos(*position);
                    marker_rect(anchor, *style).contains(pointer).then(|| (*id, anchor.distance_sq(pointer)))
                }
                _ => None,
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((id, _)) = tower {
            return Some(Hit::Tower(id));
        }

        self.visuals
            .iter()
            .filter_map(|(key, visual)| match (key, visual) {
                (VisualKey::Link(id), Visual::Link { from, to, .. }) => {
                    let distance = distance_to_segment(pointer, self.screen_pos(*from), self.screen_pos(*to));
                    (distance <= LINK_HIT_TOLERANCE).then_some((*id, distance))
                }
                _ => None,
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| Hit::Link(id))
    }

    fn screen_pos(&self, point: GeoPoint) -> Pos2 {
        to_pos(self.view.project_to_screen(point))
    }

    /// Paint all layers bottom-up: clearance polygons, link lines, towers.
    fn paint(&self, painter: &egui::Painter, hovered: Option<Hit>) {
        for visual in self.visuals.values() {
            if let Visual::Clearance { points, style: PolygonStyle::FresnelClearance } = visual {
                let outline: Vec<Pos2> = points.iter().map(|p| self.screen_pos(*p)).collect();
                if outline.len() < 3 {
                    continue;
                }
                painter.add(Shape::convex_polygon(outline.clone(), CLEARANCE_FILL, Stroke::NONE));
                let mut closed = outline;
                closed.push(closed[0]);
                painter.extend(Shape::dashed_line(&closed, Stroke::new(1.0, CLEARANCE_STROKE), CLEARANCE_DASH, CLEARANCE_DASH));
            }
        }

        for (key, visual) in &self.visuals {
            if let (VisualKey::Link(id), Visual::Link { from, to, style, .. }) = (key, visual) {
                let stroke = match style {
                    LinkStyle::Selected => Stroke::new(LINK_SELECTED_WIDTH, LINK_SELECTED_COLOR),
                    LinkStyle::Default if hovered == Some(Hit::Link(*id)) => Stroke::new(LINK_HOVER_WIDTH, LINK_HOVER_COLOR),
                    LinkStyle::Default => Stroke::new(LINK_WIDTH, LINK_COLOR),
                };
                painter.line_segment([self.screen_pos(*from), self.screen_pos(*to)], stroke);
            }
        }

        // Selected markers last so they sit on top.
        for wanted in [TowerStyle::Default, TowerStyle::Selected] {
            for visual in self.visuals.values() {
                if let Visual::Tower { position, style, label } = visual {
                    if *style == wanted {
                        paint_tower(painter, self.screen_pos(*position), *style, label);
                    }
                }
            }
        }
    }

    fn link_label(&self, id: LinkId) -> Option<&str> {
        match self.visuals.get(&VisualKey::Link(id)) {
            Some(Visual::Link { label, .. }) => Some(label),
            _ => None,
        }
    }
}

impl ScreenProjector for MapLayers {
    fn project_to_screen(&self, point: GeoPoint) -> ScreenPoint {
        self.view.project_to_screen(point)
    }

    fn unproject_from_screen(&self, point: ScreenPoint) -> GeoPoint {
        self.view.unproject_from_screen(point)
    }
}

impl Renderer for MapLayers {
    fn draw_tower_marker(&mut self, id: TowerId, position: GeoPoint, style: TowerStyle, label: &str) {
        self.visuals.insert(VisualKey::Tower(id), Visual::Tower { position, style, label: label.to_string() });
    }

    fn draw_link_line(&mut self, id: LinkId, from: GeoPoint, to: GeoPoint, style: LinkStyle, label: &str) {
        self.visuals.insert(VisualKey::Link(id), Visual::Link { from, to, style, label: label.to_string() });
    }

    fn draw_polygon(&mut self, id: LinkId, points: &[GeoPoint], style: PolygonStyle) {
        self.visuals.insert(VisualKey::Clearance(id), Visual::Clearance { points: points.to_vec(), style });
    }

    fn remove_visual(&mut self, key: VisualKey) {
        self.visuals.remove(&key);
    }
}

fn to_pos(point: ScreenPoint) -> Pos2 {
    egui::pos2(point.x as f32, point.y as f32)
}

fn to_screen(pos: Pos2) -> ScreenPoint {
    ScreenPoint::new(pos.x as f64, pos.y as f64)
}

/// Bounding box of a tower marker. The anchor is the base midpoint of the
/// triangle, which sits on the tower's position.
fn marker_rect(anchor: Pos2, style: TowerStyle) -> Rect {
    let size = match style {
        TowerStyle::Default => TOWER_SIZE,
        TowerStyle::Selected => TOWER_SELECTED_SIZE,
    };
    Rect::from_min_max(egui::pos2(anchor.x - size / 2.0, anchor.y - size), egui::pos2(anchor.x + size / 2.0, anchor.y))
}

fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

fn paint_tower(painter: &egui::Painter, anchor: Pos2, style: TowerStyle, label: &str) {
    let rect = marker_rect(anchor, style);
    let fill = match style {
        TowerStyle::Default => TOWER_COLOR,
        TowerStyle::Selected => {
            painter.circle_filled(rect.center(), rect.width() * 0.8, TOWER_GLOW_COLOR);
            TOWER_SELECTED_COLOR
        }
    };
    let apex = egui::pos2(anchor.x, rect.top());
    painter.add(Shape::convex_polygon(vec![apex, rect.right_bottom(), rect.left_bottom()], fill, Stroke::new(2.0, Color32::WHITE)));
    painter.circle_filled(egui::pos2(anchor.x, rect.bottom() - rect.height() * 0.35), rect.width() * 0.12, Color32::WHITE);
    painter.text(egui::pos2(anchor.x, anchor.y + 3.0), Align2::CENTER_TOP, label, FontId::proportional(12.0), TOWER_LABEL_COLOR);
}

/// Latitude/longitude lines at a step that keeps them roughly evenly spaced.
fn draw_graticule(painter: &egui::Painter, rect: Rect, view: &MapView) {
    let min_step = view.degrees_per_point() * GRATICULE_MIN_SPACING;
    let step = GRATICULE_STEPS.iter().copied().find(|s| *s >= min_step).unwrap_or(30.0);
    let decimals = if step >= 1.0 { 0 } else { (-step.log10()).ceil() as usize };
    let stroke = Stroke::new(1.0, GRATICULE_COLOR);
    let font = FontId::monospace(10.0);
    let (nw, se) = view.visible_bounds();

    for i in (nw.lon / step).floor() as i64..=(se.lon / step).ceil() as i64 {
        let lon = i as f64 * step;
        let x = view.project_to_screen(GeoPoint::new(view.center.lat, lon)).x as f32;
        if x < rect.left() || x > rect.right() {
            continue;
        }
        painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
        painter.text(egui::pos2(x + 3.0, rect.bottom() - 3.0), Align2::LEFT_BOTTOM, format!("{:.*}°", decimals, lon), font.clone(), GRATICULE_LABEL_COLOR);
    }

    for i in (se.lat / step).floor() as i64..=(nw.lat / step).ceil() as i64 {
        let lat = i as f64 * step;
        let y = view.project_to_screen(GeoPoint::new(lat, view.center.lon)).y as f32;
        if y < rect.top() || y > rect.bottom() {
            continue;
        }
        painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], stroke);
        painter.text(egui::pos2(rect.left() + 3.0, y - 2.0), Align2::LEFT_BOTTOM, format!("{:.*}°", decimals, lat), font.clone(), GRATICULE_LABEL_COLOR);
    }
}

fn draw_hover_label(painter: &egui::Painter, pointer: Pos2, text: &str) {
    let galley = painter.layout_no_wrap(text.to_string(), FontId::proportional(13.0), Color32::WHITE);
    let rect = Align2::LEFT_BOTTOM.anchor_size(pointer + egui::vec2(14.0, -10.0), galley.size()).expand(5.0);
    painter.rect_filled(rect, 4.0, Color32::from_rgba_premultiplied(15, 23, 42, 230));
    painter.galley(rect.min + egui::vec2(5.0, 5.0), galley, Color32::WHITE);
}

/// Render the central map panel and forward pointer input to the controller.
///
/// While a frequency change waits for confirmation the map is display-only.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().frame(egui::Frame::NONE).show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        let response = ui.interact(rect, egui::Id::new("map_canvas"), egui::Sense::click_and_drag());
        let interactive = state.pending_change.is_none();

        let mut view_changed = state.layers.view.set_viewport(to_screen(rect.min), rect.width() as f64, rect.height() as f64);
        if interactive {
            if response.dragged() {
                let delta = response.drag_delta();
                if delta != egui::Vec2::ZERO {
                    state.layers.view.pan_by(delta.x as f64, delta.y as f64);
                    view_changed = true;
                }
            }
            if let Some(pointer) = response.hover_pos() {
                let scroll = ui.input(|i| i.smooth_scroll_delta.y);
                if scroll != 0.0 {
                    state.layers.view.zoom_at(to_screen(pointer), scroll as f64 / SCROLL_POINTS_PER_ZOOM_LEVEL);
                    view_changed = true;
                }
            }
        }
        if view_changed {
            state.controller.refresh_view(&mut state.layers);
        }

        if interactive && response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let hit = state.layers.hit_test(pointer);
                let position = state.layers.view.unproject_from_screen(to_screen(pointer));
                let mut surface = UiSurface::new(&mut state.layers, &mut state.notices);
                match hit {
                    Some(Hit::Tower(id)) => state.controller.handle_tower_click(id, &mut surface),
                    Some(Hit::Link(id)) => state.controller.handle_link_click(id, &mut surface),
                    None => state.controller.handle_map_click(position, &mut surface),
                }
            }
        }

        let hovered = response.hover_pos().and_then(|pointer| state.layers.hit_test(pointer));
        if interactive {
            if response.dragged() {
                ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
            } else if hovered.is_some() {
                ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
            } else if state.controller.mode() == Mode::PlaceTower && response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);
        draw_graticule(&painter, rect, &state.layers.view);
        state.layers.paint(&painter, hovered);

        if let (Some(Hit::Link(id)), Some(pointer)) = (hovered, response.hover_pos()) {
            if let Some(label) = state.layers.link_label(id) {
                draw_hover_label(&painter, pointer, label);
            }
        }
    });
}
