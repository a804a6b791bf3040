use thiserror::Error;

#[derive(Debug, Error)]
pub enum HouseInvestError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for HouseInvestError {
    fn from(e: serde_json::Error) -> Self {
        HouseInvestError::SerializationError(e.to_string())
    }
}
