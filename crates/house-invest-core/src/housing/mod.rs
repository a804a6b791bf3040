pub mod comparison;
pub mod house_investment;
pub mod scenario;
