//! Type definitions for the planner core.
//!
//! Contains the domain records owned by the network model:
//! - Geographic points
//! - Towers and links with their opaque ids
//! - Typed tower field updates parsed from form input
//! - The selection pointer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::ValidationError;

/// Default operating frequency assigned to a freshly placed tower.
pub const DEFAULT_FREQUENCY_GHZ: f64 = 5.8;

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// Opaque tower identifier, unique for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TowerId(Uuid);

impl TowerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque link identifier, unique for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(Uuid);

impl LinkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fixed transmitter/receiver placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Tower {
    pub id: TowerId,
    pub position: GeoPoint,
    pub frequency_ghz: f64,
    pub name: String,
}

/// An undirected line-of-sight connection between two towers.
///
/// `source` and `target` only record which tower was clicked first; equality
/// and duplicate checks treat the pair as unordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub source: TowerId,
    pub target: TowerId,
}

impl Link {
    /// True if this link has `tower` as one of its endpoints.
    pub fn touches(&self, tower: TowerId) -> bool {
        self.source == tower || self.target == tower
    }

    /// True if this link connects `a` and `b` in either order.
    pub fn connects(&self, a: TowerId, b: TowerId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Editable tower fields exposed to the properties form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TowerField {
    Name,
    FrequencyGhz,
}

impl FromStr for TowerField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(TowerField::Name),
            "frequency" | "frequency_ghz" | "frequencyGHz" => Ok(TowerField::FrequencyGhz),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

/// A validated change to a single tower field.
#[derive(Debug, Clone, PartialEq)]
pub enum TowerUpdate {
    Name(String),
    FrequencyGhz(f64),
}

impl TowerUpdate {
    /// Parse raw form input into a typed update.
    ///
    /// Names are trimmed and must not be empty. Frequencies must parse as a
    /// finite, strictly positive number of GHz.
    pub fn parse(field: TowerField, value: &str) -> Result<Self, ValidationError> {
        match field {
            TowerField::Name => {
                let name = value.trim();
                if name.is_empty() {
                    return Err(ValidationError::EmptyName);
                }
                Ok(TowerUpdate::Name(name.to_string()))
            }
            TowerField::FrequencyGhz => {
                let frequency: f64 = value.trim().parse().map_err(|_| ValidationError::InvalidFrequency(value.to_string()))?;
                if !frequency.is_finite() || frequency <= 0.0 {
                    return Err(ValidationError::InvalidFrequency(value.to_string()));
                }
                Ok(TowerUpdate::FrequencyGhz(frequency))
            }
        }
    }
}

/// The single selected entity, tagged by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Tower(TowerId),
    Link(LinkId),
}
