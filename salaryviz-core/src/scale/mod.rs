pub mod linear;
pub mod ordinal;
pub mod point;
pub mod schemes;
pub mod sequential;
pub mod ticks;
