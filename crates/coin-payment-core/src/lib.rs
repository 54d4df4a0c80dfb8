pub mod error;
pub mod payment;
pub mod types;

pub use error::CoinPaymentError;
pub use types::*;

/// Standard result type for all coin-payment operations
pub type CoinPaymentResult<T> = Result<T, CoinPaymentError>;
