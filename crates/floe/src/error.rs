//! Error types for Floe push operations.

use std::io;

use thiserror::Error;

use floe_core::plan::PlanError;

/// The main error type for Floe operations.
///
/// Only structurally broken plans and failed object/connection creation
/// abort a run. Unresolved references degrade gracefully (they are logged
/// as warnings by the components that encounter them), and diagram-content
/// and flow failures are caught by the orchestrator so later phases still
/// execute.
#[derive(Debug, Error)]
pub enum FloeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed plan: {0}")]
    MalformedPlan(#[from] PlanError),

    #[error("invalid plan JSON: {0}")]
    PlanJson(#[from] serde_json::Error),

    #[error("remote call failed during {operation}: {detail}")]
    Remote { operation: String, detail: String },

    #[error("API error {status} on {operation}: {body}")]
    Api {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("no root object found in landscape {landscape}")]
    MissingRoot { landscape: String },
}

impl FloeError {
    /// Wrap a transport-level failure with the name of the operation that
    /// was in flight.
    pub fn remote(operation: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Remote {
            operation: operation.into(),
            detail: err.to_string(),
        }
    }
}
