//! The tower/link network model.
//!
//! `NetworkModel` exclusively owns every tower and link record and is the only
//! place they are mutated. After every call the following hold:
//! - every link references two towers currently in the model
//! - no link connects a tower to itself
//! - at most one link exists per unordered tower pair
//! - a link was only ever created between towers of equal frequency
//!
//! Rejected operations never leave a partial mutation behind.
//!
//! ## Destructive frequency changes
//!
//! Changing the frequency of a tower that has links would break the equal
//! frequency rule, so the change deletes those links. Callers choose how the
//! operator is asked via [`Decision`]; with [`Decision::Ask`] the model hands
//! back a [`PendingFrequencyChange`] and locks the tower until the caller
//! resolves it with [`NetworkModel::resolve_frequency_change`]. Each pending
//! change can be resolved exactly once. Re-entering the current frequency is
//! a no-op and never touches links.

use log::{debug, info, warn};
use std::collections::HashMap;

use super::errors::{LinkError, ValidationError};
use super::geometry;
use super::types::{DEFAULT_FREQUENCY_GHZ, GeoPoint, Link, LinkId, Tower, TowerField, TowerId, TowerUpdate};

/// Two frequencies closer than this (GHz) are considered equal.
pub const FREQUENCY_TOLERANCE_GHZ: f64 = 1e-9;

/// How a destructive frequency change should be decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Hand the decision back to the caller as a pending change.
    Ask,
    /// The operator already agreed to drop the incident links.
    Confirm,
    /// The operator refused; leave the tower unchanged.
    Decline,
}

/// A frequency change waiting for the operator's yes/no.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFrequencyChange {
    pub tower: TowerId,
    pub frequency_ghz: f64,
    /// Links that will be deleted if the change is accepted.
    pub incident_links: Vec<LinkId>,
}

/// Result of a tower update that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The field was written. `removed_links` lists links deleted on the way.
    Applied { removed_links: Vec<Link> },
    /// Nothing changed yet; the caller must resolve the pending change.
    NeedsConfirmation(PendingFrequencyChange),
    /// The operator refused; nothing changed.
    Declined,
}

/// Everything removed by a tower deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct TowerRemoval {
    pub tower: Tower,
    pub links: Vec<Link>,
}

pub fn same_frequency(a_ghz: f64, b_ghz: f64) -> bool {
    (a_ghz - b_ghz).abs() <= FREQUENCY_TOLERANCE_GHZ
}

/// Owned store of towers and links for one planning session.
pub struct NetworkModel {
    towers: Vec<Tower>,
    links: Vec<Link>,
    default_frequency_ghz: f64,
    /// Sequence number for the next default tower name; never reused.
    next_tower_number: u32,
    /// Outstanding frequency change decisions; their towers are locked.
    awaiting_decision: HashMap<TowerId, PendingFrequencyChange>,
}

impl Default for NetworkModel {
    fn default() -> Self {
        Self::new(DEFAULT_FREQUENCY_GHZ)
    }
}

impl NetworkModel {
    /// Create an empty model whose new towers start at `default_frequency_ghz`.
    pub fn new(default_frequency_ghz: f64) -> Self {
        Self {
            towers: Vec::new(),
            links: Vec::new(),
            default_frequency_ghz,
            next_tower_number: 1,
            awaiting_decision: HashMap::new(),
        }
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn default_frequency_ghz(&self) -> f64 {
        self.default_frequency_ghz
    }

    pub fn find_tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn find_link(&self, id: LinkId) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn links_incident_to(&self, tower: TowerId) -> Vec<&Link> {
        self.links.iter().filter(|l| l.touches(tower)).collect()
    }

    /// The link connecting `a` and `b` in either direction, if any.
    pub fn link_between(&self, a: TowerId, b: TowerId) -> Option<&Link> {
        self.links.iter().find(|l| l.connects(a, b))
    }

    /// Source and target towers of a link.
    pub fn link_endpoints(&self, id: LinkId) -> Option<(&Tower, &Tower)> {
        let link = self.find_link(id)?;
        Some((self.find_tower(link.source)?, self.find_tower(link.target)?))
    }

    /// Great-circle length of a link in meters.
    pub fn link_distance_m(&self, id: LinkId) -> Option<f64> {
        self.link_endpoints(id).map(|(a, b)| geometry::distance_m(a.position, b.position))
    }

    /// Unresolved frequency change locking `tower`, if any.
    pub fn awaiting_decision(&self, tower: TowerId) -> Option<&PendingFrequencyChange> {
        self.awaiting_decision.get(&tower)
    }

    /// Place a new tower with the default name and frequency.
    pub fn add_tower(&mut self, position: GeoPoint) -> &Tower {
        let tower = Tower {
            id: TowerId::new(),
            position,
            frequency_ghz: self.default_frequency_ghz,
            name: format!("Tower {}", self.next_tower_number),
        };
        self.next_tower_number += 1;
        info!("Added {} ({}) at {}", tower.name, tower.id, tower.position);
        self.towers.push(tower);
        &self.towers[self.towers.len() - 1]
    }

    /// Parse a raw `(field, value)` pair from a form and apply it.
    pub fn update_tower_field(&mut self, id: TowerId, field: &str, value: &str, decision: Decision) -> Result<UpdateOutcome, ValidationError> {
        let field: TowerField = field.parse()?;
        let update = TowerUpdate::parse(field, value)?;
        self.update_tower(id, update, decision)
    }

    /// Apply a field change to a tower.
    ///
    /// A frequency change on a tower with incident links is only applied once
    /// the operator agrees to lose those links, see [`Decision`].
    pub fn update_tower(&mut self, id: TowerId, update: TowerUpdate, decision: Decision) -> Result<UpdateOutcome, ValidationError> {
        if self.awaiting_decision.contains_key(&id) {
            warn!("Rejected update of tower {}: decision pending", id);
            return Err(ValidationError::AwaitingConfirmation(id));
        }
        let index = self.tower_index(id).ok_or(ValidationError::UnknownTower(id))?;

        match update {
            TowerUpdate::Name(name) => {
                if name.trim().is_empty() {
                    return Err(ValidationError::EmptyName);
                }
                info!("Renamed tower {} from '{}' to '{}'", id, self.towers[index].name, name);
                self.towers[index].name = name;
                Ok(UpdateOutcome::Applied { removed_links: Vec::new() })
            }
            TowerUpdate::FrequencyGhz(frequency_ghz) => {
                if !frequency_ghz.is_finite() || frequency_ghz <= 0.0 {
                    return Err(ValidationError::InvalidFrequency(frequency_ghz.to_string()));
                }
                let current = self.towers[index].frequency_ghz;
                let incident_links: Vec<LinkId> = self.links_incident_to(id).iter().map(|l| l.id).collect();
                if same_frequency(current, frequency_ghz) {
                    debug!("Tower {} already on {} GHz", id, current);
                    return Ok(UpdateOutcome::Applied { removed_links: Vec::new() });
                }
                if incident_links.is_empty() {
                    return Ok(self.apply_frequency_change(id, frequency_ghz));
                }
                if decision == Decision::Ask {
                    debug!("Frequency change on tower {} needs confirmation ({} links)", id, incident_links.len());
                    let pending = PendingFrequencyChange {
                        tower: id,
                        frequency_ghz,
                        incident_links,
                    };
                    self.awaiting_decision.insert(id, pending.clone());
                    return Ok(UpdateOutcome::NeedsConfirmation(pending));
                }
                Ok(self.decide_frequency_change(id, frequency_ghz, decision))
            }
        }
    }

    fn decide_frequency_change(&mut self, id: TowerId, frequency_ghz: f64, decision: Decision) -> UpdateOutcome {
        match decision {
            Decision::Confirm => self.apply_frequency_change(id, frequency_ghz),
            Decision::Decline | Decision::Ask => {
                debug!("Frequency change on tower {} declined", id);
                UpdateOutcome::Declined
            }
        }
    }

    /// Resolve a change previously returned as [`UpdateOutcome::NeedsConfirmation`].
    ///
    /// Only the change currently outstanding for its tower is accepted, and
    /// only once. On acceptance every link incident to the tower at
    /// resolution time is deleted before the frequency is written.
    pub fn resolve_frequency_change(&mut self, pending: PendingFrequencyChange, accepted: bool) -> Result<UpdateOutcome, ValidationError> {
        let tower = pending.tower;
        if self.tower_index(tower).is_none() {
            return Err(ValidationError::UnknownTower(tower));
        }
        if self.awaiting_decision.get(&tower) != Some(&pending) {
            warn!("Rejected resolution for tower {}: not the outstanding change", tower);
            return Err(ValidationError::NoPendingChange(tower));
        }
        self.awaiting_decision.remove(&tower);
        let decision = if accepted { Decision::Confirm } else { Decision::Decline };
        Ok(self.decide_frequency_change(tower, pending.frequency_ghz, decision))
    }

    fn apply_frequency_change(&mut self, id: TowerId, frequency_ghz: f64) -> UpdateOutcome {
        let incident: Vec<LinkId> = self.links_incident_to(id).iter().map(|l| l.id).collect();
        let removed_links: Vec<Link> = incident.into_iter().filter_map(|link| self.delete_link(link)).collect();
        if let Some(index) = self.tower_index(id) {
            info!("Tower {} frequency {} -> {} GHz", id, self.towers[index].frequency_ghz, frequency_ghz);
            self.towers[index].frequency_ghz = frequency_ghz;
        }
        UpdateOutcome::Applied { removed_links }
    }

    /// Delete a tower and every link touching it.
    ///
    /// Unknown ids are a no-op returning `None`.
    pub fn delete_tower(&mut self, id: TowerId) -> Option<TowerRemoval> {
        let index = self.tower_index(id)?;
        self.awaiting_decision.remove(&id);
        let incident: Vec<LinkId> = self.links_incident_to(id).iter().map(|l| l.id).collect();
        let links: Vec<Link> = incident.into_iter().filter_map(|link| self.delete_link(link)).collect();
        let tower = self.towers.remove(index);
        info!("Deleted {} ({}) and {} incident links", tower.name, tower.id, links.len());
        Some(TowerRemoval { tower, links })
    }

    /// Connect two towers.
    ///
    /// # Errors
    ///
    /// - `SelfLink` if both ids are the same tower
    /// - `UnknownTower` if either tower does not exist
    /// - `AwaitingConfirmation` if either tower has an unresolved frequency change
    /// - `FrequencyMismatch` if the towers operate on different frequencies
    /// - `DuplicateLink` if the towers are already connected in either direction
    pub fn add_link(&mut self, source: TowerId, target: TowerId) -> Result<&Link, LinkError> {
        if source == target {
            return Err(LinkError::SelfLink);
        }
        let source_tower = self.find_tower(source).ok_or(LinkError::UnknownTower(source))?;
        let target_tower = self.find_tower(target).ok_or(LinkError::UnknownTower(target))?;
        if let Some(locked) = [source, target].into_iter().find(|t| self.awaiting_decision.contains_key(t)) {
            return Err(LinkError::AwaitingConfirmation(locked));
        }
        if !same_frequency(source_tower.frequency_ghz, target_tower.frequency_ghz) {
            return Err(LinkError::FrequencyMismatch {
                source_ghz: source_tower.frequency_ghz,
                target_ghz: target_tower.frequency_ghz,
            });
        }
        if self.link_between(source, target).is_some() {
            return Err(LinkError::DuplicateLink);
        }

        let link = Link { id: LinkId::new(), source, target };
        info!("Linked {} <-> {} ({})", source_tower.name, target_tower.name, link.id);
        self.links.push(link);
        Ok(&self.links[self.links.len() - 1])
    }

    /// Remove a link; unknown ids are a no-op returning `None`.
    pub fn delete_link(&mut self, id: LinkId) -> Option<Link> {
        let index = self.links.iter().position(|l| l.id == id)?;
        let link = self.links.remove(index);
        debug!("Deleted link {}", link.id);
        Some(link)
    }

    fn tower_index(&self, id: TowerId) -> Option<usize> {
        self.towers.iter().position(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_two(frequency_a: f64, frequency_b: f64) -> (NetworkModel, TowerId, TowerId) {
        let mut model = NetworkModel::default();
        let a = model.add_tower(GeoPoint::new(0.0, 0.0)).id;
        let b = model.add_tower(GeoPoint::new(0.0, 1.0)).id;
        model.update_tower(a, TowerUpdate::FrequencyGhz(frequency_a), Decision::Ask).unwrap();
        model.update_tower(b, TowerUpdate::FrequencyGhz(frequency_b), Decision::Ask).unwrap();
        (model, a, b)
    }

    fn assert_no_dangling(model: &NetworkModel) {
        for link in model.links() {
            assert!(model.find_tower(link.source).is_some());
            assert!(model.find_tower(link.target).is_some());
            assert_ne!(link.source, link.target);
        }
    }

    #[test]
    fn new_towers_get_defaults_and_sequential_names() {
        let mut model = NetworkModel::default();
        let first = model.add_tower(GeoPoint::new(1.0, 2.0)).clone();
        let second = model.add_tower(GeoPoint::new(3.0, 4.0)).clone();
        assert_eq!(first.name, "Tower 1");
        assert_eq!(second.name, "Tower 2");
        assert_eq!(first.frequency_ghz, DEFAULT_FREQUENCY_GHZ);
        assert_eq!(first.position, GeoPoint::new(1.0, 2.0));
        assert_ne!(first.id, second.id);

        // Names keep counting after deletions
        model.delete_tower(second.id);
        assert_eq!(model.add_tower(GeoPoint::new(0.0, 0.0)).name, "Tower 3");
    }

    #[test]
    fn configured_default_frequency_is_used() {
        let mut model = NetworkModel::new(2.4);
        assert_eq!(model.add_tower(GeoPoint::new(0.0, 0.0)).frequency_ghz, 2.4);
    }

    #[test]
    fn equal_frequency_link_succeeds_once_in_either_order() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        let link = model.add_link(a, b).unwrap().clone();
        assert_eq!((link.source, link.target), (a, b));
        assert_eq!(model.add_link(a, b), Err(LinkError::DuplicateLink));
        assert_eq!(model.add_link(b, a), Err(LinkError::DuplicateLink));
        assert_eq!(model.links().len(), 1);
        assert_eq!(model.link_between(b, a).map(|l| l.id), Some(link.id));
    }

    #[test]
    fn scenario_equator_link_distance() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        let link = model.add_link(a, b).unwrap().id;
        let km = model.link_distance_m(link).unwrap() / 1000.0;
        assert!((km - 111.3).abs() < 0.05, "got {km} km");
    }

    #[test]
    fn frequency_mismatch_carries_both_values_and_leaves_model_unchanged() {
        let (mut model, a, b) = model_with_two(5.8, 2.4);
        assert_eq!(model.add_link(a, b), Err(LinkError::FrequencyMismatch { source_ghz: 5.8, target_ghz: 2.4 }));
        assert_eq!(model.add_link(b, a), Err(LinkError::FrequencyMismatch { source_ghz: 2.4, target_ghz: 5.8 }));
        assert!(model.links().is_empty());
        assert_eq!(model.towers().len(), 2);
    }

    #[test]
    fn self_link_is_rejected() {
        let (mut model, a, _) = model_with_two(5.8, 5.8);
        assert_eq!(model.add_link(a, a), Err(LinkError::SelfLink));
        assert!(model.links().is_empty());
    }

    #[test]
    fn link_to_unknown_tower_is_rejected() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        model.delete_tower(b);
        assert_eq!(model.add_link(a, b), Err(LinkError::UnknownTower(b)));
    }

    #[test]
    fn delete_tower_cascades_to_incident_links() {
        let mut model = NetworkModel::default();
        let a = model.add_tower(GeoPoint::new(0.0, 0.0)).id;
        let b = model.add_tower(GeoPoint::new(0.0, 1.0)).id;
        let c = model.add_tower(GeoPoint::new(1.0, 0.0)).id;
        let ab = model.add_link(a, b).unwrap().id;
        let ca = model.add_link(c, a).unwrap().id;
        let bc = model.add_link(b, c).unwrap().id;

        let removal = model.delete_tower(a).unwrap();
        assert_eq!(removal.tower.id, a);
        let mut removed: Vec<LinkId> = removal.links.iter().map(|l| l.id).collect();
        removed.sort();
        let mut expected = vec![ab, ca];
        expected.sort();
        assert_eq!(removed, expected);

        assert!(model.find_tower(a).is_none());
        assert!(model.find_link(ab).is_none());
        assert!(model.find_link(bc).is_some());
        assert!(model.links_incident_to(a).is_empty());
        assert_no_dangling(&model);
    }

    #[test]
    fn deletes_of_unknown_ids_are_noops() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        let link = model.add_link(a, b).unwrap().id;
        assert!(model.delete_link(LinkId::new()).is_none());
        assert!(model.delete_tower(TowerId::new()).is_none());
        assert!(model.delete_link(link).is_some());
        assert!(model.delete_link(link).is_none());
        assert_eq!(model.towers().len(), 2);
    }

    #[test]
    fn declined_frequency_change_keeps_tower_and_link() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        let link = model.add_link(a, b).unwrap().id;

        let outcome = model.update_tower(a, TowerUpdate::FrequencyGhz(2.4), Decision::Decline).unwrap();
        assert_eq!(outcome, UpdateOutcome::Declined);
        assert_eq!(model.find_tower(a).unwrap().frequency_ghz, 5.8);
        assert!(model.find_link(link).is_some());
    }

    #[test]
    fn confirmed_frequency_change_drops_incident_links() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        let link = model.add_link(a, b).unwrap().id;

        let outcome = model.update_tower(a, TowerUpdate::FrequencyGhz(2.4), Decision::Confirm).unwrap();
        match outcome {
            UpdateOutcome::Applied { removed_links } => {
                assert_eq!(removed_links.len(), 1);
                assert_eq!(removed_links[0].id, link);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(model.find_tower(a).unwrap().frequency_ghz, 2.4);
        assert!(model.links().is_empty());
    }

    #[test]
    fn pending_change_locks_tower_until_resolved() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        let link = model.add_link(a, b).unwrap().id;

        let pending = match model.update_tower(a, TowerUpdate::FrequencyGhz(2.4), Decision::Ask).unwrap() {
            UpdateOutcome::NeedsConfirmation(pending) => pending,
            other => panic!("unexpected outcome {other:?}"),
        };
        assert_eq!(pending.incident_links, vec![link]);
        assert_eq!(model.awaiting_decision(a), Some(&pending));
        assert_eq!(model.find_tower(a).unwrap().frequency_ghz, 5.8);

        assert_eq!(
            model.update_tower(a, TowerUpdate::Name("Other".into()), Decision::Confirm),
            Err(ValidationError::AwaitingConfirmation(a))
        );
        let c = model.add_tower(GeoPoint::new(2.0, 2.0)).id;
        assert_eq!(model.add_link(c, a), Err(LinkError::AwaitingConfirmation(a)));

        let outcome = model.resolve_frequency_change(pending.clone(), false).unwrap();
        assert_eq!(outcome, UpdateOutcome::Declined);
        assert_eq!(model.awaiting_decision(a), None);
        assert!(model.find_link(link).is_some());

        // Asking again and accepting applies the change
        let pending = match model.update_tower(a, TowerUpdate::FrequencyGhz(2.4), Decision::Ask).unwrap() {
            UpdateOutcome::NeedsConfirmation(pending) => pending,
            other => panic!("unexpected outcome {other:?}"),
        };
        assert!(matches!(model.resolve_frequency_change(pending, true), Ok(UpdateOutcome::Applied { .. })));
        assert_eq!(model.find_tower(a).unwrap().frequency_ghz, 2.4);
        assert!(model.links().is_empty());
    }

    #[test]
    fn deleting_locked_tower_discards_pending_change() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        model.add_link(a, b).unwrap();
        let pending = match model.update_tower(a, TowerUpdate::FrequencyGhz(2.4), Decision::Ask).unwrap() {
            UpdateOutcome::NeedsConfirmation(pending) => pending,
            other => panic!("unexpected outcome {other:?}"),
        };
        model.delete_tower(a);
        assert_eq!(model.awaiting_decision(a), None);
        assert_eq!(model.resolve_frequency_change(pending, true), Err(ValidationError::UnknownTower(a)));
        assert_no_dangling(&model);
    }

    #[test]
    fn unlinked_or_unchanged_frequency_applies_without_confirmation() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        let outcome = model.update_tower(a, TowerUpdate::FrequencyGhz(2.4), Decision::Ask).unwrap();
        assert_eq!(outcome, UpdateOutcome::Applied { removed_links: Vec::new() });

        model.update_tower(a, TowerUpdate::FrequencyGhz(5.8), Decision::Ask).unwrap();
        model.add_link(a, b).unwrap();
        let outcome = model.update_tower(a, TowerUpdate::FrequencyGhz(5.8), Decision::Ask).unwrap();
        assert_eq!(outcome, UpdateOutcome::Applied { removed_links: Vec::new() });
        assert_eq!(model.links().len(), 1);
    }

    #[test]
    fn same_frequency_in_other_spelling_keeps_links() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        let link = model.add_link(a, b).unwrap().id;

        let outcome = model.update_tower_field(a, "frequency", "5.80", Decision::Ask).unwrap();
        assert_eq!(outcome, UpdateOutcome::Applied { removed_links: Vec::new() });
        let outcome = model.update_tower(a, TowerUpdate::FrequencyGhz(5.8 + 1e-12), Decision::Confirm).unwrap();
        assert_eq!(outcome, UpdateOutcome::Applied { removed_links: Vec::new() });
        assert!(model.find_link(link).is_some());
        assert_eq!(model.find_tower(a).unwrap().frequency_ghz, 5.8);
        assert_eq!(model.awaiting_decision(a), None);
    }

    #[test]
    fn each_linked_tower_keeps_its_own_lock() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        let c = model.add_tower(GeoPoint::new(1.0, 0.0)).id;
        let d = model.add_tower(GeoPoint::new(1.0, 1.0)).id;
        model.add_link(a, b).unwrap();
        model.add_link(c, d).unwrap();

        let first = match model.update_tower(a, TowerUpdate::FrequencyGhz(2.4), Decision::Ask).unwrap() {
            UpdateOutcome::NeedsConfirmation(pending) => pending,
            other => panic!("unexpected outcome {other:?}"),
        };
        assert!(matches!(
            model.update_tower(c, TowerUpdate::FrequencyGhz(2.4), Decision::Ask),
            Ok(UpdateOutcome::NeedsConfirmation(_))
        ));

        assert_eq!(model.awaiting_decision(a), Some(&first));
        assert!(model.awaiting_decision(c).is_some());
        assert_eq!(
            model.update_tower(a, TowerUpdate::Name("Other".into()), Decision::Ask),
            Err(ValidationError::AwaitingConfirmation(a))
        );
        assert_eq!(
            model.update_tower(a, TowerUpdate::FrequencyGhz(5.0), Decision::Ask),
            Err(ValidationError::AwaitingConfirmation(a))
        );
        assert_eq!(model.find_tower(a).unwrap().name, "Tower 1");
    }

    #[test]
    fn pending_change_resolves_only_once() {
        let (mut model, a, b) = model_with_two(5.8, 5.8);
        let link = model.add_link(a, b).unwrap().id;
        let pending = match model.update_tower(a, TowerUpdate::FrequencyGhz(2.4), Decision::Ask).unwrap() {
            UpdateOutcome::NeedsConfirmation(pending) => pending,
            other => panic!("unexpected outcome {other:?}"),
        };

        assert_eq!(model.resolve_frequency_change(pending.clone(), false), Ok(UpdateOutcome::Declined));
        assert_eq!(model.resolve_frequency_change(pending.clone(), true), Err(ValidationError::NoPendingChange(a)));
        assert_eq!(model.find_tower(a).unwrap().frequency_ghz, 5.8);
        assert!(model.find_link(link).is_some());

        // A change that was never handed out is rejected as well
        let forged = PendingFrequencyChange { tower: b, frequency_ghz: 2.4, incident_links: vec![link] };
        assert_eq!(model.resolve_frequency_change(forged, true), Err(ValidationError::NoPendingChange(b)));
        assert_eq!(model.find_tower(b).unwrap().frequency_ghz, 5.8);
    }

    #[test]
    fn field_updates_are_validated() {
        let (mut model, a, _) = model_with_two(5.8, 5.8);
        assert_eq!(
            model.update_tower_field(a, "altitude", "10", Decision::Ask),
            Err(ValidationError::UnknownField("altitude".into()))
        );
        assert_eq!(
            model.update_tower_field(a, "frequency", "fast", Decision::Ask),
            Err(ValidationError::InvalidFrequency("fast".into()))
        );
        assert_eq!(
            model.update_tower(a, TowerUpdate::FrequencyGhz(-1.0), Decision::Confirm),
            Err(ValidationError::InvalidFrequency("-1".into()))
        );
        let ghost = TowerId::new();
        assert_eq!(
            model.update_tower_field(ghost, "name", "x", Decision::Ask),
            Err(ValidationError::UnknownTower(ghost))
        );

        model.update_tower_field(a, "name", "Ridge", Decision::Ask).unwrap();
        assert_eq!(model.find_tower(a).unwrap().name, "Ridge");
        assert_eq!(model.find_tower(a).unwrap().frequency_ghz, 5.8);
    }
}
