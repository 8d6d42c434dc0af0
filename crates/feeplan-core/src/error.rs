use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeePlanError {
    #[error("Invalid plan: {field} — {reason}")]
    InvalidPlan { field: String, reason: String },

    #[error("Non-convergent: {function} stopped after {iterations} iterations ({remaining} outstanding)")]
    NonConvergent {
        function: String,
        iterations: u32,
        remaining: Decimal,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FeePlanError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        FeePlanError::InvalidPlan {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FeePlanError {
    fn from(e: serde_json::Error) -> Self {
        FeePlanError::Serialization(e.to_string())
    }
}
