//! Error types for the orrery engine.

use thiserror::Error;

/// Result type for engine operations.
pub type OrreryResult<T> = Result<T, OrreryError>;

/// Errors raised while building or mutating a simulation.
///
/// Everything except `UnknownBody` and `HandleOutOfRange` is a configuration
/// error and is only produced while a manifest is validated, before any tick
/// runs.
#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("manifest parse error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("duplicate body name: {0}")]
    DuplicateBody(String),

    #[error("body {body} references missing parent {parent}")]
    MissingParentReference { body: String, parent: String },

    #[error("parent cycle through body {0}")]
    ParentCycle(String),

    #[error("no central body (orbit_radius == 0 without a parent)")]
    NoCentralBody,

    #[error("more than one central body: {0:?}")]
    MultipleCentralBodies(Vec<String>),

    #[error("invalid {field} for body {body}: {reason}")]
    InvalidParameter {
        body: String,
        field: &'static str,
        reason: &'static str,
    },

    #[error("unknown body: {0}")]
    UnknownBody(String),

    #[error("drawable handle {0} exceeds the exact f32 range of the instance buffer")]
    HandleOutOfRange(u32),
}
