//! Tower/link planning core.
//!
//! This module contains everything with real logic in the planner:
//! - The tower/link network model and its consistency rules
//! - The modal interaction controller (view, place tower, draft link)
//! - Great-circle distance and first Fresnel zone geometry
//!
//! ## Module Organization
//!
//! - `types`: Core data structures (towers, links, ids, selection)
//! - `errors`: Validation and link creation errors
//! - `geometry`: Distance and Fresnel clearance polygon calculations
//! - `surface`: Traits the core uses to draw, project and notify
//! - `network`: The owned tower/link store with CRUD operations
//! - `interaction`: The mode state machine routing clicks to the model
//!
//! The desktop UI in `crate::ui` implements the `surface` traits; nothing in
//! this module depends on egui.

pub mod errors;
pub mod geometry;
pub mod interaction;
pub mod network;
pub mod surface;
pub mod types;

#[cfg(test)]
pub(crate) mod test_surface;

pub use interaction::{InteractionController, Mode, SelectedEntity, Tool};
pub use network::{NetworkModel, PendingFrequencyChange};
