use thiserror::Error;

use crate::gateway::GatewayError;

/// Failures of Entity Store operations.
///
/// `Validation` and `NotFound` are caught before any gateway call; `Gateway`
/// wraps a failed backend call. None of them leave a partially updated
/// snapshot behind.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable wire code used by the daemon's error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound { .. } => "not_found",
            Self::Gateway(_) => "gateway_failed",
        }
    }
}

/// Malformed or incomplete input, rejected at the store boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("quartal must be between 1 and 4, got {0}")]
    QuartalOutOfRange(i64),
    #[error("stufe must be a positive integer, got {0}")]
    StufeNotPositive(i64),
    #[error("subject name must not be empty")]
    EmptySubjectName,
    #[error("a grade needs at least one of oral or written score")]
    NoScore,
    #[error("{which} score must be between 0 and 15, got {value}")]
    ScoreOutOfRange { which: &'static str, value: f64 },
    #[error("weighting must be between 0.0 and 1.0, got {0}")]
    WeightingOutOfRange(f64),
}
