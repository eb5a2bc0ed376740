use thiserror::Error;

/// Error taxonomy for the risk and forecasting core.
///
/// Degraded confidence (one or more risk signals unavailable) is *not* an
/// error: the calculation proceeds with neutral defaults and reports a lower
/// confidence value.
#[derive(Debug, Error)]
pub enum ClimateFinanceError {
    #[error("Validation failed: {field} — {reason}")]
    Validation { field: String, reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Invalid configuration snapshot: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ClimateFinanceError {
    fn from(e: serde_json::Error) -> Self {
        ClimateFinanceError::Serialization(e.to_string())
    }
}

impl ClimateFinanceError {
    /// Shorthand for a validation failure on a named field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ClimateFinanceError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        ClimateFinanceError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}
