pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "mortgage")]
pub mod mortgage;

#[cfg(feature = "housing")]
pub mod housing;

pub use error::HouseInvestError;
pub use types::*;

/// Standard result type for all house-invest operations
pub type HouseInvestResult<T> = Result<T, HouseInvestError>;
