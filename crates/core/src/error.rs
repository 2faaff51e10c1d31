//! Domain error type shared by every crate in the workspace.

use crate::types::DbId;

/// Failures raised by domain rules and by the layers built on them.
///
/// The API maps each variant onto one HTTP status; see
/// `wishdrop_api::error::AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced row (wish, badge, profile, ...) does not exist or is
    /// not visible to the caller.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input broke a domain rule. Never coerced into a valid value.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The request is valid but the current state does not allow it,
    /// e.g. donating to a funded wish.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
