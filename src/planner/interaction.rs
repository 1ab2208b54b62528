//! Modal interaction controller.
//!
//! The controller is a finite state machine over operator intent. It receives
//! map-background, tower and link clicks from the host, turns them into
//! [`NetworkModel`] operations, owns the single selection pointer, and tells
//! the [`Renderer`] what to draw or remove.
//!
//! ## States
//!
//! ```text
//!            set_tool(View)          set_tool(PlaceTower)
//!   ┌──────────────────────► View ◄───────────── PlaceTower
//!   │                         ▲   map click: add tower  │
//!   │                         └─────────────────────────┘
//!   │
//!   │  set_tool(Link)
//!   └──► LinkAwaitFirst ──tower──► LinkAwaitSecond { pending }
//!              ▲                         │
//!              └── same tower / other tower (link attempt) ──┘
//! ```
//!
//! Entering any tool clears the selection and abandons a link draft.

use log::{debug, warn};
use std::fmt;

use super::geometry;
use super::network::{Decision, NetworkModel, PendingFrequencyChange, UpdateOutcome};
use super::surface::{LinkStyle, Notice, Notifier, PolygonStyle, Renderer, ScreenProjector, TowerStyle, VisualKey};
use super::types::{GeoPoint, Link, LinkId, Selection, Tower, TowerId};

/// Tool picked by the operator from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    View,
    PlaceTower,
    Link,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::View => write!(f, "View"),
            Tool::PlaceTower => write!(f, "Tower"),
            Tool::Link => write!(f, "Link"),
        }
    }
}

/// Current interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    PlaceTower,
    LinkAwaitFirst,
    /// Link draft holding the first endpoint.
    LinkAwaitSecond { pending: TowerId },
}

impl Mode {
    pub fn tool(&self) -> Tool {
        match self {
            Mode::View => Tool::View,
            Mode::PlaceTower => Tool::PlaceTower,
            Mode::LinkAwaitFirst | Mode::LinkAwaitSecond { .. } => Tool::Link,
        }
    }

    /// Short instruction shown to the operator for this state.
    pub fn hint(&self) -> &'static str {
        match self {
            Mode::View => "Click a tower or link to inspect it",
            Mode::PlaceTower => "Click on the map to place a tower",
            Mode::LinkAwaitFirst => "Click the first tower to connect",
            Mode::LinkAwaitSecond { .. } => "Click the second tower to connect",
        }
    }
}

/// Read-only snapshot of the selected entity for the properties view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectedEntity<'a> {
    Tower(&'a Tower),
    Link {
        link: &'a Link,
        source: &'a Tower,
        target: &'a Tower,
        distance_m: f64,
    },
}

/// Owns the session's network model, the interaction state and the selection.
pub struct InteractionController {
    model: NetworkModel,
    mode: Mode,
    selection: Option<Selection>,
    fresnel_samples: usize,
}

impl InteractionController {
    pub fn new(model: NetworkModel, fresnel_samples: usize) -> Self {
        Self {
            model,
            mode: Mode::View,
            selection: None,
            fresnel_samples,
        }
    }

    pub fn model(&self) -> &NetworkModel {
        &self.model
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Resolve the selection pointer into entity snapshots.
    ///
    /// Returns `None` if nothing is selected or the entity no longer exists.
    pub fn selected(&self) -> Option<SelectedEntity<'_>> {
        match self.selection? {
            Selection::Tower(id) => self.model.find_tower(id).map(SelectedEntity::Tower),
            Selection::Link(id) => {
                let link = self.model.find_link(id)?;
                let (source, target) = self.model.link_endpoints(id)?;
                Some(SelectedEntity::Link {
                    link,
                    source,
                    target,
                    distance_m: geometry::distance_m(source.position, target.position),
                })
            }
        }
    }

    /// Hover/tooltip label for a link: distance and operating frequency.
    pub fn link_label(&self, id: LinkId) -> String {
        match (self.model.link_endpoints(id), self.model.link_distance_m(id)) {
            (Some((source, _)), Some(distance)) => format!("{:.2} km | {} GHz", distance / 1000.0, source.frequency_ghz),
            _ => String::new(),
        }
    }

    /// Switch tool. Clears the selection and drops any link draft.
    pub fn set_tool<S: Renderer + Notifier>(&mut self, tool: Tool, surface: &mut S) {
        if let Mode::LinkAwaitSecond { pending } = self.mode {
            debug!("Abandoning link draft from tower {}", pending);
        }
        self.deselect_all(surface);
        self.mode = match tool {
            Tool::View => Mode::View,
            Tool::PlaceTower => Mode::PlaceTower,
            Tool::Link => Mode::LinkAwaitFirst,
        };
        debug!("Mode -> {:?}", self.mode);
        surface.notify(Notice::info(format!("Mode: {}", tool)));
    }

    /// Click on empty map background at `position`.
    pub fn handle_map_click<S: Renderer + Notifier>(&mut self, position: GeoPoint, surface: &mut S) {
        match self.mode {
            Mode::View => self.deselect_all(surface),
            Mode::PlaceTower => {
                let id = self.model.add_tower(position).id;
                self.select_tower(id, surface);
                // Single-shot placement; keep the new tower selected
                self.mode = Mode::View;
                debug!("Mode -> {:?}", self.mode);
                surface.notify(Notice::info(format!("Mode: {}", Tool::View)));
            }
            Mode::LinkAwaitFirst | Mode::LinkAwaitSecond { .. } => {}
        }
    }

    /// Click on a tower marker.
    pub fn handle_tower_click<S: Renderer + Notifier>(&mut self, id: TowerId, surface: &mut S) {
        if self.model.find_tower(id).is_none() {
            warn!("Click on unknown tower {}", id);
            return;
        }
        match self.mode {
            Mode::View | Mode::PlaceTower => self.select_tower(id, surface),
            Mode::LinkAwaitFirst => {
                self.mode = Mode::LinkAwaitSecond { pending: id };
                debug!("Mode -> {:?}", self.mode);
                surface.notify(Notice::info("Select second tower to connect"));
            }
            Mode::LinkAwaitSecond { pending } if pending == id => {
                self.mode = Mode::LinkAwaitFirst;
                surface.notify(Notice::error("Cannot connect tower to itself"));
            }
            Mode::LinkAwaitSecond { pending } => {
                self.mode = Mode::LinkAwaitFirst;
                match self.model.add_link(pending, id) {
                    Ok(link) => {
                        let link = link.id;
                        self.draw_link(link, surface);
                        surface.notify(Notice::success("Link created successfully"));
                    }
                    Err(e) => {
                        warn!("Link {} -> {} rejected: {}", pending, id, e);
                        surface.notify(Notice::error(e.to_string()));
                    }
                }
            }
        }
    }

    /// Click on a link line. Ignored while drafting a link.
    pub fn handle_link_click<S: Renderer + Notifier>(&mut self, id: LinkId, surface: &mut S) {
        match self.mode {
            Mode::View | Mode::PlaceTower => self.select_link(id, surface),
            Mode::LinkAwaitFirst | Mode::LinkAwaitSecond { .. } => {}
        }
    }

    /// Clear the selection, restore default styles and hide clearance polygons.
    pub fn deselect_all<S: Renderer>(&mut self, surface: &mut S) {
        self.selection = None;
        for tower in self.model.towers() {
            surface.draw_tower_marker(tower.id, tower.position, TowerStyle::Default, &tower.name);
        }
        let link_ids: Vec<LinkId> = self.model.links().iter().map(|l| l.id).collect();
        for id in link_ids {
            self.draw_link(id, surface);
            surface.remove_visual(VisualKey::Clearance(id));
        }
    }

    fn select_tower<S: Renderer>(&mut self, id: TowerId, surface: &mut S) {
        self.deselect_all(surface);
        self.selection = Some(Selection::Tower(id));
        self.draw_tower(id, surface);
    }

    fn select_link<S: Renderer>(&mut self, id: LinkId, surface: &mut S) {
        if self.model.find_link(id).is_none() {
            return;
        }
        self.deselect_all(surface);
        self.selection = Some(Selection::Link(id));
        self.draw_link(id, surface);
        self.draw_clearance(id, surface);
    }

    /// The host's view (pan, zoom, viewport size) changed.
    ///
    /// Clearance polygons are built in screen space, so the selected link's
    /// polygon is rebuilt against the new projection.
    pub fn refresh_view<S: Renderer>(&mut self, surface: &mut S) {
        if let Some(Selection::Link(id)) = self.selection {
            self.draw_clearance(id, surface);
        }
    }

    /// Form entry point: change one tower field from raw input.
    ///
    /// Returns the pending change if the operator has to confirm dropping the
    /// tower's links; the host resolves it with
    /// [`resolve_frequency_change`](Self::resolve_frequency_change).
    pub fn update_tower<S: Renderer + Notifier>(&mut self, id: TowerId, field: &str, value: &str, surface: &mut S) -> Option<PendingFrequencyChange> {
        match self.model.update_tower_field(id, field, value, Decision::Ask) {
            Ok(UpdateOutcome::NeedsConfirmation(pending)) => Some(pending),
            Ok(outcome) => {
                self.apply_outcome(id, outcome, surface);
                None
            }
            Err(e) => {
                warn!("Update of tower {} rejected: {}", id, e);
                surface.notify(Notice::error(e.to_string()));
                None
            }
        }
    }

    /// Apply the operator's answer to a pending frequency change.
    pub fn resolve_frequency_change<S: Renderer + Notifier>(&mut self, pending: PendingFrequencyChange, accepted: bool, surface: &mut S) {
        let tower = pending.tower;
        match self.model.resolve_frequency_change(pending, accepted) {
            Ok(outcome) => self.apply_outcome(tower, outcome, surface),
            Err(e) => surface.notify(Notice::error(e.to_string())),
        }
    }

    fn apply_outcome<S: Renderer + Notifier>(&mut self, tower: TowerId, outcome: UpdateOutcome, surface: &mut S) {
        match outcome {
            UpdateOutcome::Applied { removed_links } => {
                for link in &removed_links {
                    self.forget_link(link.id, surface);
                }
                self.draw_tower(tower, surface);
                let incident: Vec<LinkId> = self.model.links_incident_to(tower).iter().map(|l| l.id).collect();
                for id in incident {
                    self.draw_link(id, surface);
                    if self.selection == Some(Selection::Link(id)) {
                        self.draw_clearance(id, surface);
                    }
                }
                surface.notify(Notice::success("Updated successfully"));
            }
            UpdateOutcome::Declined => surface.notify(Notice::info("Frequency unchanged")),
            UpdateOutcome::NeedsConfirmation(_) => {}
        }
    }

    /// Form entry point: delete a tower and its links.
    pub fn delete_tower<S: Renderer + Notifier>(&mut self, id: TowerId, surface: &mut S) {
        let Some(removal) = self.model.delete_tower(id) else {
            return;
        };
        for link in &removal.links {
            self.forget_link(link.id, surface);
        }
        surface.remove_visual(VisualKey::Tower(id));
        if self.mode == (Mode::LinkAwaitSecond { pending: id }) {
            self.mode = Mode::LinkAwaitFirst;
        }
        self.deselect_all(surface);
        surface.notify(Notice::info("Tower deleted"));
    }

    /// Form entry point: delete a link.
    pub fn delete_link<S: Renderer + Notifier>(&mut self, id: LinkId, surface: &mut S) {
        if self.model.delete_link(id).is_none() {
            return;
        }
        self.forget_link(id, surface);
        self.deselect_all(surface);
        surface.notify(Notice::info("Link deleted"));
    }

    /// Drop the visuals of a removed link and any selection pointing at it.
    fn forget_link<S: Renderer>(&mut self, id: LinkId, surface: &mut S) {
        surface.remove_visual(VisualKey::Link(id));
        surface.remove_visual(VisualKey::Clearance(id));
        if self.selection == Some(Selection::Link(id)) {
            self.selection = None;
        }
    }

    fn draw_tower<S: Renderer>(&self, id: TowerId, surface: &mut S) {
        if let Some(tower) = self.model.find_tower(id) {
            let style = if self.selection == Some(Selection::Tower(id)) { TowerStyle::Selected } else { TowerStyle::Default };
            surface.draw_tower_marker(id, tower.position, style, &tower.name);
        }
    }

    fn draw_link<S: Renderer>(&self, id: LinkId, surface: &mut S) {
        if let Some((source, target)) = self.model.link_endpoints(id) {
            let style = if self.selection == Some(Selection::Link(id)) { LinkStyle::Selected } else { LinkStyle::Default };
            surface.draw_link_line(id, source.position, target.position, style, &self.link_label(id));
        }
    }

    fn draw_clearance<S: Renderer>(&self, id: LinkId, surface: &mut S) {
        let Some((source, target)) = self.model.link_endpoints(id) else {
            return;
        };
        let projector: &dyn ScreenProjector = &*surface;
        let points = geometry::fresnel_clearance_polygon(source.position, target.position, source.frequency_ghz, self.fresnel_samples, projector);
        if points.is_empty() {
            surface.remove_visual(VisualKey::Clearance(id));
        } else {
            surface.draw_polygon(id, &points, PolygonStyle::FresnelClearance);
        }
    }
}
