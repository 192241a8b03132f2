pub mod camera;
pub mod components;
pub mod controls;
pub mod entity;
pub mod picking;
pub mod registry;
pub mod selection;
pub mod spatial;
pub mod world;

pub use world::*;
