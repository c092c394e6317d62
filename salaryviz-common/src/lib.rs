pub mod data;
pub mod error;

pub use arrow;
