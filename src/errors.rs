//! Error Types
//!
//! This module defines the error types used by the rig loaders.
//!
//! # Overview
//!
//! The per-frame pipeline never fails: missing clips, missing keys and
//! malformed numbers all degrade to "no contribution" or safe defaults.
//! Errors only surface at the load boundary, where [`RigError`] covers:
//! - Unknown bone identifiers (a skeleton/topology mismatch)
//! - Structurally invalid actions
//! - JSON and I/O failures
//!
//! # Usage
//!
//! ```rust,ignore
//! use rigmotion::errors::{RigError, Result};
//!
//! fn load(json: &str) -> Result<ActionLibrary> {
//!     ActionLibrary::from_json_str(json)
//! }
//! ```

use thiserror::Error;

/// The error type for rig data loading.
#[derive(Error, Debug)]
pub enum RigError {
    // ========================================================================
    // Topology Errors
    // ========================================================================
    /// A bone identifier that is not part of the fixed skeleton.
    #[error("Unknown bone identifier: {0:?}")]
    UnknownBone(String),

    // ========================================================================
    // Clip Errors
    // ========================================================================
    /// An action whose data cannot be used at all.
    #[error("Invalid action {id:?}: {reason}")]
    InvalidAction {
        /// Action identifier
        id: String,
        /// What is wrong with it
        reason: String,
    },

    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
