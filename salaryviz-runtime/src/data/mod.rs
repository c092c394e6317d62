pub mod loader;
pub mod normalize;
