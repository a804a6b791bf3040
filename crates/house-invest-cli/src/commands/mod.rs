pub mod housing;
pub mod mortgage;
pub mod time_value;
