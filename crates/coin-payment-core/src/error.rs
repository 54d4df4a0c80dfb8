use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoinPaymentError {
    #[error("Parameter must be a positive integer, not \"{value}\"!")]
    InvalidParameter { value: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

impl CoinPaymentError {
    pub(crate) fn invalid_parameter(value: impl std::fmt::Display) -> Self {
        CoinPaymentError::InvalidParameter {
            value: value.to_string(),
        }
    }
}
