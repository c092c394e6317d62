pub mod brush;
pub mod view;
pub mod zoom;
