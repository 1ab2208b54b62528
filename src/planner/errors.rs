//! Errors raised by the network model.
//!
//! Every error here is a local, recoverable condition. Operations that return
//! one of these leave the model exactly as it was before the call.

use thiserror::Error;

use super::types::TowerId;

/// Rejected tower field change.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Unknown tower field '{0}'")]
    UnknownField(String),
    #[error("Invalid frequency '{0}', expected a positive number of GHz")]
    InvalidFrequency(String),
    #[error("Tower name must not be empty")]
    EmptyName,
    #[error("Tower {0} does not exist")]
    UnknownTower(TowerId),
    #[error("Tower {0} has a frequency change awaiting confirmation")]
    AwaitingConfirmation(TowerId),
    #[error("No frequency change for tower {0} is awaiting confirmation")]
    NoPendingChange(TowerId),
}

/// Rejected link creation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinkError {
    #[error("Cannot connect tower to itself")]
    SelfLink,
    #[error("Frequency mismatch! {source_ghz}GHz vs {target_ghz}GHz")]
    FrequencyMismatch { source_ghz: f64, target_ghz: f64 },
    #[error("Link already exists")]
    DuplicateLink,
    #[error("Tower {0} does not exist")]
    UnknownTower(TowerId),
    #[error("Tower {0} has a frequency change awaiting confirmation")]
    AwaitingConfirmation(TowerId),
}
