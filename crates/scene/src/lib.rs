pub mod entity;
pub mod list_panel;
pub mod selection;
pub mod world;

pub use entity::*;
pub use world::*;
