pub mod aggregate;
pub mod bin;
pub mod extent;
